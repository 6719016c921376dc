//! The resolution context: streams, the member identity map and the
//! resolver seam.
//!
//! One [`ResolutionContext`] describes one loaded image. It owns the stream
//! container, caches exactly one member instance per token and carries the
//! root assembly member read from row 1 of the `Assembly` table. Members
//! hold the context weakly; dropping the context invalidates their pending
//! decode steps instead of leaking a reference cycle.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::{
    metadata::{
        members::{member_from_row, Member, MemberRc, MemberResolver},
        streams::{StreamContainer, TableId},
        token::Token,
    },
    Error, Result,
};

/// Name of the core library; the assembly defining the base types.
const CORE_LIBRARY_NAME: &str = "mscorlib";

/// Token-to-member identity map over one stream container.
pub struct ResolutionContext {
    streams: Arc<StreamContainer>,
    assembly: OnceLock<MemberRc>,
    core_library: OnceLock<bool>,
    members: DashMap<Token, MemberRc>,
    resolver: OnceLock<Box<dyn MemberResolver>>,
}

impl ResolutionContext {
    /// Creates a context over `streams` and reads its root assembly member
    /// from row 1 of the `Assembly` table.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberResolution`] when the assembly table has
    /// no row 1; an image without a defining assembly is not representable.
    pub fn new(streams: Arc<StreamContainer>) -> Result<Arc<Self>> {
        let context = Arc::new(ResolutionContext {
            streams,
            assembly: OnceLock::new(),
            core_library: OnceLock::new(),
            members: DashMap::new(),
            resolver: OnceLock::new(),
        });

        let member = context.resolve(Token::from_parts(TableId::Assembly, 1))?;
        let Member::Assembly(assembly) = member.as_ref() else {
            return Err(malformed_error!(
                "Assembly row 1 did not produce an assembly member"
            ));
        };

        let _ = context
            .core_library
            .set(assembly.name() == CORE_LIBRARY_NAME);
        let _ = context.assembly.set(Arc::clone(&member));

        Ok(context)
    }

    /// The stream container backing this context.
    #[must_use]
    pub fn streams(&self) -> &StreamContainer {
        &self.streams
    }

    /// The root assembly member.
    ///
    /// # Errors
    /// Only fails while [`ResolutionContext::new`] is still constructing the
    /// context, before the assembly slot is filled.
    pub fn assembly(&self) -> Result<&MemberRc> {
        match self.assembly.get() {
            Some(member) => Ok(member),
            None => Err(malformed_error!("Resolution context not yet constructed")),
        }
    }

    /// True when this context describes the core library itself, decided by
    /// the assembly name at construction.
    #[must_use]
    pub fn is_core_library(&self) -> bool {
        self.core_library.get().copied().unwrap_or(false)
    }

    /// Resolves `token` to its member, or `None` when no row exists for it.
    ///
    /// The first resolution of a token constructs the member and caches it;
    /// every later resolution returns a clone of the same [`MemberRc`].
    ///
    /// # Errors
    /// Propagates member construction errors (missing columns, bad heap
    /// offsets).
    pub fn try_resolve(self: &Arc<Self>, token: Token) -> Result<Option<MemberRc>> {
        if let Some(member) = self.members.get(&token) {
            return Ok(Some(Arc::clone(member.value())));
        }

        let Some(row) = self.streams.tables().try_resolve_row(token) else {
            return Ok(None);
        };

        let row = row.clone();
        let member = Arc::new(member_from_row(self, &row)?);
        self.cache_member(Arc::clone(&member))?;

        Ok(Some(member))
    }

    /// Resolves `token` to its member.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberResolution`] when no row exists for the
    /// token, plus the conditions of [`ResolutionContext::try_resolve`].
    pub fn resolve(self: &Arc<Self>, token: Token) -> Result<MemberRc> {
        match self.try_resolve(token)? {
            Some(member) => Ok(member),
            None => Err(Error::MemberResolution(token)),
        }
    }

    /// Inserts `member` into the identity map under its token. On concurrent
    /// insertion for the same token the last write wins.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for members whose token has
    /// row id 0; a member without an assigned row cannot be cached.
    pub fn cache_member(&self, member: MemberRc) -> Result<()> {
        let token = member.token();
        if token.is_null() {
            return Err(Error::InvalidArgument(
                "Cannot cache a member that has no metadata token assigned yet".to_string(),
            ));
        }

        self.members.insert(token, member);
        Ok(())
    }

    /// Configures the resolver used by
    /// [`crate::metadata::members::TypeSpec::resolve`]. The first resolver
    /// sticks; later calls are no-ops.
    pub fn set_resolver(&self, resolver: Box<dyn MemberResolver>) {
        let _ = self.resolver.set(resolver);
    }

    /// The configured resolver, if any.
    #[must_use]
    pub fn resolver(&self) -> Option<&dyn MemberResolver> {
        self.resolver.get().map(AsRef::as_ref)
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("is_core_library", &self.is_core_library())
            .field("cached_members", &self.members.len())
            .field("has_resolver", &self.resolver.get().is_some())
            .finish()
    }
}
