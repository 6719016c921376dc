//! Custom attribute applications: a parent, a constructor reference and a
//! value blob shaped by that constructor's parameter list.

use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        context::ResolutionContext,
        lazy::LazyDecodeCell,
        members::Member,
        protection::RecursionProtection,
        signatures::{CustomAttributeSignature, SignatureParser},
        streams::Row,
        token::Token,
    },
    Error, Result,
};

/// A row of the `CustomAttribute` table.
///
/// Decoding the value blob resolves the constructor first: its parameter
/// types dictate how the fixed argument bytes are interpreted. When the
/// constructor or its signature is unavailable the blob decodes with zero
/// fixed arguments rather than failing.
#[derive(Debug)]
pub struct CustomAttribute {
    token: Token,
    context: Weak<ResolutionContext>,
    parent: Token,
    constructor: Token,
    value: LazyDecodeCell<CustomAttributeSignature>,
}

impl CustomAttribute {
    /// Builds the member from its table row.
    ///
    /// Row layout: column 0 is the raw parent token, column 1 the raw
    /// constructor token, column 2 the `#Blob` offset of the value. The blob
    /// is not touched until first accessed.
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let token = row.token();
        let (Some(parent), Some(constructor), Some(blob_offset)) =
            (row.column(0), row.column(1), row.column(2))
        else {
            return Err(malformed_error!(
                "CustomAttribute row {} is missing columns",
                token
            ));
        };

        let parent = Token::new(parent);
        let constructor = Token::new(constructor);

        let weak = Arc::downgrade(context);
        let step_context = weak.clone();
        let value = LazyDecodeCell::pending(move |protection: &mut RecursionProtection| {
            let Some(context) = step_context.upgrade() else {
                return Err(Error::ResolverUnavailable);
            };

            let ctor_signature = match context.try_resolve(constructor)? {
                Some(member) => match member.as_ref() {
                    Member::MethodDef(method) => method.signature_protected(protection).ok(),
                    _ => None,
                },
                None => None,
            };

            let data = context.streams().blob().get(blob_offset as usize)?;
            SignatureParser::with_context(data, &context, protection)
                .parse_custom_attribute(ctor_signature.as_deref())
        });

        Ok(CustomAttribute {
            token,
            context: weak,
            parent,
            constructor,
            value,
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

    /// Token of the member the attribute is applied to.
    #[must_use]
    pub fn parent(&self) -> Token {
        self.parent
    }

    /// Token of the attribute constructor.
    #[must_use]
    pub fn constructor(&self) -> Token {
        self.constructor
    }

    /// The decoded attribute value, decoding the blob on first access.
    ///
    /// # Errors
    /// Propagates blob and grammar errors from the decode step, including
    /// the invalid-argument error for a bad prolog.
    pub fn value(&self) -> Result<Arc<CustomAttributeSignature>> {
        self.value.get()
    }

    /// Assigns `value` directly, discarding any pending decode and replacing
    /// an already materialized value. Assignment always wins.
    pub fn set_value(&self, value: CustomAttributeSignature) {
        self.value.set(value);
    }
}
