//! Metadata members: typed views over table rows.
//!
//! A member ties a row to its decoded form; signature-bearing members hold a
//! [`crate::metadata::lazy::LazyDecodeCell`] so their blobs are read at most
//! once and only when asked for. Members are handed out as
//! [`MemberRc`] clones of the single instance cached per token.

mod assembly;
mod customattribute;
mod method;
mod standalonesig;
mod typedef;
mod typespec;

use std::sync::Arc;

pub use assembly::Assembly;
pub use customattribute::CustomAttribute;
pub use method::MethodDef;
pub use standalonesig::StandAloneSig;
pub use typedef::{TypeDefinition, TypeReference};
pub use typespec::TypeSpec;

use crate::{
    metadata::{context::ResolutionContext, streams::Row, streams::TableId, token::Token},
    Error, Result,
};

/// Any member kind this core models, dispatched by table.
#[derive(Debug)]
pub enum Member {
    /// Defining assembly
    Assembly(Assembly),
    /// Method definition
    MethodDef(MethodDef),
    /// Type definition
    TypeDef(TypeDefinition),
    /// Type reference
    TypeRef(TypeReference),
    /// Type specification
    TypeSpec(TypeSpec),
    /// Standalone (local variable) signature
    StandAloneSig(StandAloneSig),
    /// Custom attribute application
    CustomAttribute(CustomAttribute),
}

/// Shared handle to a cached member.
pub type MemberRc = Arc<Member>;

impl Member {
    /// The token of the underlying row.
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Member::Assembly(member) => member.token(),
            Member::MethodDef(member) => member.token(),
            Member::TypeDef(member) => member.token(),
            Member::TypeRef(member) => member.token(),
            Member::TypeSpec(member) => member.token(),
            Member::StandAloneSig(member) => member.token(),
            Member::CustomAttribute(member) => member.token(),
        }
    }

    /// The resolution context that produced this member, if still alive.
    /// `None` for in-memory members without an attached context.
    #[must_use]
    pub fn context(&self) -> Option<Arc<ResolutionContext>> {
        match self {
            Member::Assembly(member) => member.context(),
            Member::MethodDef(member) => member.context(),
            Member::TypeDef(member) => member.context(),
            Member::TypeRef(member) => member.context(),
            Member::TypeSpec(member) => member.context(),
            Member::StandAloneSig(member) => member.context(),
            Member::CustomAttribute(member) => member.context(),
        }
    }
}

/// Maps type specifications to the definitions they describe.
///
/// The context holds at most one resolver; [`TypeSpec::resolve`] fails
/// without one rather than guessing.
pub trait MemberResolver: Send + Sync {
    /// Resolves `spec` to a type definition.
    ///
    /// # Errors
    /// Implementations report unresolvable specifications with
    /// [`crate::Error::MemberResolution`].
    fn resolve_type(&self, spec: &TypeSpec) -> Result<Arc<TypeDefinition>>;
}

/// Constructs the member for `row`, dispatching on its table.
pub(crate) fn member_from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Member> {
    match row.token().table_id() {
        Some(TableId::Assembly) => Ok(Member::Assembly(Assembly::from_row(context, row)?)),
        Some(TableId::MethodDef) => Ok(Member::MethodDef(MethodDef::from_row(context, row)?)),
        Some(TableId::TypeDef) => Ok(Member::TypeDef(TypeDefinition::from_row(context, row)?)),
        Some(TableId::TypeRef) => Ok(Member::TypeRef(TypeReference::from_row(context, row)?)),
        Some(TableId::TypeSpec) => Ok(Member::TypeSpec(TypeSpec::from_row(context, row)?)),
        Some(TableId::StandAloneSig) => Ok(Member::StandAloneSig(StandAloneSig::from_row(
            context, row,
        )?)),
        Some(TableId::CustomAttribute) => Ok(Member::CustomAttribute(CustomAttribute::from_row(
            context, row,
        )?)),
        None => Err(Error::MemberResolution(row.token())),
    }
}
