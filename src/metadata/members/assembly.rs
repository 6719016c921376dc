//! The defining assembly, read from row 1 of the `Assembly` table.

use std::sync::{Arc, Weak};

use crate::{
    metadata::{context::ResolutionContext, streams::Row, token::Token},
    Result,
};

/// The assembly a resolution context describes. Its name decides the
/// core-library flag of the context.
#[derive(Debug)]
pub struct Assembly {
    token: Token,
    context: Weak<ResolutionContext>,
    name: String,
}

impl Assembly {
    /// Builds the assembly member from its table row.
    ///
    /// Row layout: column 0 is the `#Strings` offset of the assembly name.
    pub(crate) fn from_row(context: &Arc<ResolutionContext>, row: &Row) -> Result<Self> {
        let Some(name_offset) = row.column(0) else {
            return Err(malformed_error!(
                "Assembly row {} is missing its name column",
                row.token()
            ));
        };

        let name = context
            .streams()
            .strings()
            .get(name_offset as usize)?
            .to_string();

        Ok(Assembly {
            token: row.token(),
            context: Arc::downgrade(context),
            name,
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

    /// The assembly name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
