//! Standalone signatures: local variable blobs referenced from method bodies.

use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        context::ResolutionContext,
        lazy::LazyDecodeCell,
        protection::RecursionProtection,
        signatures::{LocalVariableSignature, SignatureParser},
        streams::Row,
        token::Token,
    },
    Error, Result,
};

/// A row of the `StandAloneSig` table holding a local variable signature.
#[derive(Debug)]
pub struct StandAloneSig {
    token: Token,
    context: Weak<ResolutionContext>,
    signature: LazyDecodeCell<LocalVariableSignature>,
}

impl StandAloneSig {
    /// Builds the member from its table row.
    ///
    /// Row layout: column 0 is the `#Blob` offset of the signature. The blob
    /// is not touched until first accessed.
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let token = row.token();
        let Some(blob_offset) = row.column(0) else {
            return Err(malformed_error!(
                "StandAloneSig row {} is missing its blob column",
                token
            ));
        };

        let weak = Arc::downgrade(context);
        let step_context = weak.clone();
        let signature = LazyDecodeCell::pending(move |protection: &mut RecursionProtection| {
            let Some(context) = step_context.upgrade() else {
                return Err(Error::ResolverUnavailable);
            };

            let data = context.streams().blob().get(blob_offset as usize)?;
            SignatureParser::with_context(data, &context, protection).parse_local_var_signature()
        });

        Ok(StandAloneSig {
            token,
            context: weak,
            signature,
        })
    }

    /// Creates an in-memory member around an already built signature. No
    /// context is attached.
    #[must_use]
    pub fn new(token: Token, signature: LocalVariableSignature) -> Self {
        StandAloneSig {
            token,
            context: Weak::new(),
            signature: LazyDecodeCell::materialized(signature),
        }
    }

    /// The token of the backing row.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// The context this member was resolved from, if still alive. `None` for
    /// in-memory members.
    #[must_use]
    pub fn context(&self) -> Option<Arc<ResolutionContext>> {
        self.context.upgrade()
    }

    /// The decoded local variable signature, decoding the blob on first
    /// access.
    ///
    /// # Errors
    /// Propagates blob and grammar errors from the decode step.
    pub fn signature(&self) -> Result<Arc<LocalVariableSignature>> {
        self.signature.get()
    }

    /// Like [`StandAloneSig::signature`], threading the caller's traversal
    /// set through the decode.
    ///
    /// # Errors
    /// Same conditions as [`StandAloneSig::signature`].
    pub fn signature_protected(
        &self,
        protection: &mut RecursionProtection,
    ) -> Result<Arc<LocalVariableSignature>> {
        self.signature.get_protected(protection)
    }
}
