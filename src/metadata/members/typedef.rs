//! Type definitions and references: named types backed by `TypeDef` and
//! `TypeRef` rows. Resolvers produce [`TypeDefinition`] values when asked to
//! resolve a type specification.

use std::sync::{Arc, Weak};

use crate::{
    metadata::{context::ResolutionContext, streams::Row, token::Token},
    Result,
};

/// A row of the `TypeDef` table.
#[derive(Debug)]
pub struct TypeDefinition {
    token: Token,
    context: Weak<ResolutionContext>,
    name: String,
    namespace: String,
}

impl TypeDefinition {
    /// Builds the type definition from its table row.
    ///
    /// Row layout: column 0 is the `#Strings` offset of the type name,
    /// column 1 the offset of the namespace.
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let (name, namespace) = read_name_columns(context, row)?;
        Ok(TypeDefinition {
            token: row.token(),
            context: Arc::downgrade(context),
            name,
            namespace,
        })
    }

    /// Creates a definition that is not backed by a loaded row, for resolvers
    /// that synthesize their results. No context is attached.
    #[must_use]
    pub fn new(token: Token, name: String, namespace: String) -> Self {
        TypeDefinition {
            token,
            context: Weak::new(),
            name,
            namespace,
        }
    }

    /// The token of the backing row.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// The context this member was resolved from, if still alive. `None` for
    /// synthesized definitions.
    #[must_use]
    pub fn context(&self) -> Option<Arc<ResolutionContext>> {
        self.context.upgrade()
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace, empty for global types.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// A row of the `TypeRef` table: a type in another scope, known by name only.
#[derive(Debug)]
pub struct TypeReference {
    token: Token,
    context: Weak<ResolutionContext>,
    name: String,
    namespace: String,
}

impl TypeReference {
    /// Builds the type reference from its table row; same layout as
    /// [`TypeDefinition::from_row`].
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let (name, namespace) = read_name_columns(context, row)?;
        Ok(TypeReference {
            token: row.token(),
            context: Arc::downgrade(context),
            name,
            namespace,
        })
    }

    /// The token of the backing row.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// The context this member was resolved from, if still alive.
    #[must_use]
    pub fn context(&self) -> Option<Arc<ResolutionContext>> {
        self.context.upgrade()
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace, empty for global types.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

fn read_name_columns(
    context: &Arc<ResolutionContext>,
    row: &Row,
) -> Result<(String, String)> {
    let (Some(name_offset), Some(namespace_offset)) = (row.column(0), row.column(1)) else {
        return Err(malformed_error!(
            "Type row {} is missing name columns",
            row.token()
        ));
    };

    let strings = context.streams().strings();
    Ok((
        strings.get(name_offset as usize)?.to_string(),
        strings.get(namespace_offset as usize)?.to_string(),
    ))
}
