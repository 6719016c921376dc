//! Type specifications: types described by a blob instead of a name.
//!
//! A [`TypeSpec`] exists in two states. Row-backed specs carry a pending
//! decode step over their blob; the step registers the spec's own token in
//! the request's traversal set before walking the payload, so a payload that
//! loops back to the same token short-circuits instead of recursing forever.
//! In-memory specs are built around an already materialized signature, carry
//! an unassigned token and never read bytes; attaching a context later
//! enables resolution without re-decoding anything.

use std::sync::{Arc, OnceLock, Weak};

use crate::{
    metadata::{
        context::ResolutionContext,
        lazy::LazyDecodeCell,
        members::typedef::TypeDefinition,
        protection::RecursionProtection,
        signatures::{SignatureParser, TypeSignature},
        streams::{Row, TableId},
        token::Token,
    },
    Error, Result,
};

/// A row of the `TypeSpec` table, or an in-memory specification awaiting one.
#[derive(Debug)]
pub struct TypeSpec {
    token: Token,
    context: OnceLock<Weak<ResolutionContext>>,
    signature: LazyDecodeCell<TypeSignature>,
}

impl TypeSpec {
    /// Builds the specification from its table row.
    ///
    /// Row layout: column 0 is the `#Blob` offset of the type signature. The
    /// blob is not touched until the signature is first accessed.
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let token = row.token();
        let Some(blob_offset) = row.column(0) else {
            return Err(malformed_error!(
                "TypeSpec row {} is missing its blob column",
                token
            ));
        };

        let weak = Arc::downgrade(context);
        let step_context = weak.clone();
        let signature = LazyDecodeCell::pending(move |protection: &mut RecursionProtection| {
            // The spec's own token joins the traversal set before the payload
            // is walked; a payload referring back to it then short-circuits.
            protection.enter(token);

            let Some(context) = step_context.upgrade() else {
                return Err(Error::ResolverUnavailable);
            };

            let data = context.streams().blob().get(blob_offset as usize)?;
            SignatureParser::with_context(data, &context, protection).parse_type()
        });

        let slot = OnceLock::new();
        let _ = slot.set(weak);

        Ok(TypeSpec {
            token,
            context: slot,
            signature,
        })
    }

    /// Creates an in-memory specification around `signature`.
    ///
    /// The token is an unassigned `TypeSpec` token (row id 0) and no context
    /// is attached yet; such a member cannot be cached or resolved until a
    /// context is attached and a real row assigned.
    #[must_use]
    pub fn new(signature: TypeSignature) -> Self {
        TypeSpec {
            token: Token::from_parts(TableId::TypeSpec, 0),
            context: OnceLock::new(),
            signature: LazyDecodeCell::materialized(signature),
        }
    }

    /// Attaches a resolution context to an in-memory specification, enabling
    /// [`TypeSpec::resolve`]. The first attached context sticks; later calls
    /// are no-ops.
    pub fn attach_context(&self, context: &Arc<ResolutionContext>) {
        let _ = self.context.set(Arc::downgrade(context));
    }

    /// The context this specification is bound to, if one is attached and
    /// still alive.
    #[must_use]
    pub fn context(&self) -> Option<Arc<ResolutionContext>> {
        self.context.get().and_then(Weak::upgrade)
    }

    /// The token of the backing row; row id 0 for in-memory specifications.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// The decoded signature, decoding the blob on first access.
    ///
    /// # Errors
    /// Propagates blob and grammar errors from the decode step.
    pub fn signature(&self) -> Result<Arc<TypeSignature>> {
        self.signature.get()
    }

    /// Like [`TypeSpec::signature`], but threads the caller's traversal set
    /// through the decode so nested specifications share one request.
    ///
    /// # Errors
    /// Same conditions as [`TypeSpec::signature`].
    pub fn signature_protected(
        &self,
        protection: &mut RecursionProtection,
    ) -> Result<Arc<TypeSignature>> {
        self.signature.get_protected(protection)
    }

    /// Assigns `signature` directly, discarding any pending decode and
    /// replacing an already materialized signature. Assignment always wins.
    pub fn set_signature(&self, signature: TypeSignature) {
        self.signature.set(signature);
    }

    /// Display name projected from the signature.
    ///
    /// # Errors
    /// Same conditions as [`TypeSpec::signature`].
    pub fn name(&self) -> Result<String> {
        Ok(self.signature()?.name())
    }

    /// Namespace projected from the signature.
    ///
    /// # Errors
    /// Same conditions as [`TypeSpec::signature`].
    pub fn namespace(&self) -> Result<String> {
        Ok(self.signature()?.namespace().to_string())
    }

    /// Value-type classification of the described type; `false` when the
    /// signature cannot be decoded.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.signature()
            .map(|signature| signature.is_value_type())
            .unwrap_or(false)
    }

    /// Resolves the described type to its definition through the context's
    /// configured resolver.
    ///
    /// # Errors
    /// Returns [`crate::Error::ResolverUnavailable`] when no context is
    /// attached, the context has been dropped, or no resolver is configured;
    /// otherwise propagates the resolver's error.
    pub fn resolve(&self) -> Result<Arc<TypeDefinition>> {
        let Some(context) = self.context() else {
            return Err(Error::ResolverUnavailable);
        };

        let Some(resolver) = context.resolver() else {
            return Err(Error::ResolverUnavailable);
        };

        resolver.resolve_type(self)
    }
}
