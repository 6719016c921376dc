//! Recursion protection for nested signature decodes.
//!
//! The signature grammar can legally describe cycles through indirection: a
//! type specification's payload may reference another type specification
//! whose payload ultimately refers back to the first. A
//! [`RecursionProtection`] is created once per outermost decode request and
//! passed down by mutable reference through every nested decode in that
//! request, so a re-entered token can be recognized and short-circuited.

use std::collections::HashSet;

use crate::metadata::token::Token;

/// Set of tokens already entered during the current top-level decode.
///
/// Owned, not thread-local or global: cycle detection stays scoped to one
/// decode request.
#[derive(Debug, Default)]
pub struct RecursionProtection {
    traversed: HashSet<Token>,
}

impl RecursionProtection {
    /// Creates an empty protection set for a fresh top-level decode.
    #[must_use]
    pub fn new() -> Self {
        RecursionProtection::default()
    }

    /// Records that `token` is being entered.
    ///
    /// Returns `true` if the token was not yet traversed; `false` signals a
    /// re-entry that the caller must short-circuit instead of recursing.
    pub fn enter(&mut self, token: Token) -> bool {
        self.traversed.insert(token)
    }

    /// True if `token` has already been entered in this decode request.
    #[must_use]
    pub fn contains(&self, token: Token) -> bool {
        self.traversed.contains(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_reports_first_entry_only() {
        let mut protection = RecursionProtection::new();
        let token = Token::new(0x1B000001);

        assert!(!protection.contains(token));
        assert!(protection.enter(token));
        assert!(protection.contains(token));
        assert!(!protection.enter(token));
    }

    #[test]
    fn tokens_are_tracked_independently() {
        let mut protection = RecursionProtection::new();
        assert!(protection.enter(Token::new(0x1B000001)));
        assert!(protection.enter(Token::new(0x1B000002)));
        assert!(!protection.enter(Token::new(0x1B000001)));
    }
}
