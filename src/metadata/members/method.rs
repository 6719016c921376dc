//! Method definitions; attribute decoding needs their signatures to shape
//! fixed arguments.

use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        context::ResolutionContext,
        lazy::LazyDecodeCell,
        protection::RecursionProtection,
        signatures::{SignatureMethod, SignatureParser},
        streams::Row,
        token::Token,
    },
    Error, Result,
};

/// A row of the `MethodDef` table: a name and a lazily decoded method
/// signature.
#[derive(Debug)]
pub struct MethodDef {
    token: Token,
    context: Weak<ResolutionContext>,
    name: String,
    signature: LazyDecodeCell<SignatureMethod>,
}

impl MethodDef {
    /// Builds the method member from its table row.
    ///
    /// Row layout: column 0 is the `#Strings` offset of the method name,
    /// column 1 the `#Blob` offset of the signature. The signature blob is
    /// not touched until first accessed.
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let token = row.token();
        let (Some(name_offset), Some(blob_offset)) = (row.column(0), row.column(1)) else {
            return Err(malformed_error!(
                "MethodDef row {} is missing columns",
                token
            ));
        };

        let name = context
            .streams()
            .strings()
            .get(name_offset as usize)?
            .to_string();

        let weak = Arc::downgrade(context);
        let step_context = weak.clone();
        let signature = LazyDecodeCell::pending(move |protection: &mut RecursionProtection| {
            let Some(context) = step_context.upgrade() else {
                return Err(Error::ResolverUnavailable);
            };

            let data = context.streams().blob().get(blob_offset as usize)?;
            SignatureParser::with_context(data, &context, protection).parse_method_signature()
        });

        Ok(MethodDef {
            token,
            context: weak,
            name,
            signature,
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

    /// The method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decoded method signature, decoding the blob on first access.
    ///
    /// # Errors
    /// Propagates blob and grammar errors from the decode step.
    pub fn signature(&self) -> Result<Arc<SignatureMethod>> {
        self.signature.get()
    }

    /// Like [`MethodDef::signature`], but threads the caller's traversal set
    /// through the decode so it joins an enclosing request.
    ///
    /// # Errors
    /// Same conditions as [`MethodDef::signature`].
    pub fn signature_protected(
        &self,
        protection: &mut RecursionProtection,
    ) -> Result<Arc<SignatureMethod>> {
        self.signature.get_protected(protection)
    }
}
