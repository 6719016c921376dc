//! Metadata tokens addressing rows in the metadata table set.

use std::fmt;

use crate::metadata::streams::TableId;

/// A metadata token naming one row in the metadata table set.
///
/// Tokens are 32-bit values where:
/// - The high byte (bits 24-31) selects the table
/// - The low 24 bits (bits 0-23) hold the 1-based row id
///
/// A row id of 0 means "unassigned / no row". Two tokens are equal iff both
/// fields match.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a row id.
    ///
    /// Passing `rid` 0 produces an unassigned token of the given kind, the
    /// state of members constructed in memory before any real row exists.
    #[must_use]
    pub fn from_parts(table: TableId, rid: u32) -> Self {
        Token((u32::from(table as u8) << 24) | (rid & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table selector from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The table selector as a [`TableId`], if it names a known table
    #[must_use]
    pub fn table_id(&self) -> Option<TableId> {
        TableId::from_repr(self.table())
    }

    /// Extracts the row id from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// True if the row id is 0, i.e. no row has been assigned yet
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn from_parts_packs_fields() {
        let token = Token::from_parts(TableId::TypeSpec, 5);
        assert_eq!(token.value(), 0x1B000005);
        assert_eq!(token.table(), 0x1B);
        assert_eq!(token.table_id(), Some(TableId::TypeSpec));
        assert_eq!(token.row(), 5);
    }

    #[test]
    fn null_means_unassigned_row() {
        assert!(Token::from_parts(TableId::TypeSpec, 0).is_null());
        assert!(!Token::new(0x1B000001).is_null());
        // A null token still carries its table kind
        assert_eq!(
            Token::from_parts(TableId::TypeSpec, 0).table_id(),
            Some(TableId::TypeSpec)
        );
    }

    #[test]
    fn equality_requires_both_fields() {
        assert_eq!(Token::new(0x1B000001), Token::new(0x1B000001));
        assert_ne!(Token::new(0x1B000001), Token::new(0x1B000002));
        assert_ne!(Token::new(0x1B000001), Token::new(0x02000001));
    }

    #[test]
    fn unknown_table_selector() {
        assert_eq!(Token::new(0xFE000001).table_id(), None);
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Token::new(0x1B000001), "spec");
        map.insert(Token::new(0x06000001), "method");

        assert_eq!(map.get(&Token::new(0x1B000001)), Some(&"spec"));
        assert_eq!(map.get(&Token::new(0x06000001)), Some(&"method"));
    }

    #[test]
    fn display_and_debug() {
        let token = Token::new(0x1B000005);
        assert_eq!(format!("{token}"), "0x1b000005");
        let debug = format!("{token:?}");
        assert!(debug.contains("table: 0x1b"));
        assert!(debug.contains("row: 5"));
    }
}
