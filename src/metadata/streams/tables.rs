//! Table stream: token-addressed rows of raw column values.
//!
//! Physical image parsing lives outside this crate; the table stream is
//! handed in as already-decoded rows. Row ids are 1-based, id 0 means
//! "no row" per the token model.

use std::collections::HashMap;

use strum::FromRepr;

use crate::metadata::token::Token;

/// Identifiers for the metadata tables this core touches.
///
/// The numeric values are the table ids defined by the CLI file format and
/// double as the high byte of a [`Token`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, FromRepr)]
#[repr(u8)]
pub enum TableId {
    /// `TypeRef` table (0x01) - references to types in external scopes
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - type definitions
    TypeDef = 0x02,
    /// `MethodDef` table (0x06) - method definitions, holds signature blobs
    MethodDef = 0x06,
    /// `CustomAttribute` table (0x0C) - attribute applications with payload blobs
    CustomAttribute = 0x0C,
    /// `StandAloneSig` table (0x11) - standalone signatures, e.g. local variables
    StandAloneSig = 0x11,
    /// `TypeSpec` table (0x1B) - blob-described type specifications
    TypeSpec = 0x1B,
    /// `Assembly` table (0x20) - the defining assembly, exactly one row
    Assembly = 0x20,
}

/// One table slot: an immutable ordered tuple of raw column values, keyed by
/// its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    token: Token,
    columns: Box<[u32]>,
}

impl Row {
    /// Creates a row keyed by `token` holding the given raw column values.
    #[must_use]
    pub fn new(token: Token, columns: Vec<u32>) -> Self {
        Row {
            token,
            columns: columns.into_boxed_slice(),
        }
    }

    /// The token addressing this row.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Raw value of column `index`, or `None` past the column count.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<u32> {
        self.columns.get(index).copied()
    }

    /// Number of columns in this row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// All rows of one metadata table.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Row lookup by 1-based row id; id 0 and ids past the end yield `None`.
    #[must_use]
    pub fn row(&self, rid: u32) -> Option<&Row> {
        if rid == 0 {
            return None;
        }

        self.rows.get((rid - 1) as usize)
    }

    /// Number of rows in this table.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// The decoded table stream: tables addressed by [`TableId`].
#[derive(Debug, Default)]
pub struct TableStream {
    tables: HashMap<TableId, Table>,
}

impl TableStream {
    /// Creates an empty table stream.
    #[must_use]
    pub fn new() -> Self {
        TableStream::default()
    }

    /// Appends a row to `table`, assigning it the next row id.
    ///
    /// Returns the token of the new row.
    pub fn push_row(&mut self, table: TableId, columns: Vec<u32>) -> Token {
        let entry = self.tables.entry(table).or_default();
        let token = Token::from_parts(table, entry.row_count() + 1);
        entry.rows.push(Row::new(token, columns));
        token
    }

    /// The table with the given id, if any rows were loaded for it.
    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Maps a token to its row.
    ///
    /// Returns `None` for unknown table selectors, row id 0 and row ids past
    /// the end of the table.
    #[must_use]
    pub fn try_resolve_row(&self, token: Token) -> Option<&Row> {
        let id = token.table_id()?;
        self.tables.get(&id)?.row(token.row())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_sequential_tokens() {
        let mut stream = TableStream::new();
        let first = stream.push_row(TableId::TypeSpec, vec![0x10]);
        let second = stream.push_row(TableId::TypeSpec, vec![0x20]);

        assert_eq!(first, Token::new(0x1B000001));
        assert_eq!(second, Token::new(0x1B000002));
        assert_eq!(stream.table(TableId::TypeSpec).unwrap().row_count(), 2);
    }

    #[test]
    fn resolve_row_round_trips_token() {
        let mut stream = TableStream::new();
        let token = stream.push_row(TableId::MethodDef, vec![1, 2, 3]);

        let row = stream.try_resolve_row(token).unwrap();
        assert_eq!(row.token(), token);
        assert_eq!(row.column(0), Some(1));
        assert_eq!(row.column(2), Some(3));
        assert_eq!(row.column(3), None);
    }

    #[test]
    fn rid_zero_never_resolves() {
        let mut stream = TableStream::new();
        stream.push_row(TableId::TypeSpec, vec![0]);

        assert!(stream
            .try_resolve_row(Token::from_parts(TableId::TypeSpec, 0))
            .is_none());
    }

    #[test]
    fn unknown_selector_and_missing_rows() {
        let stream = TableStream::new();
        assert!(stream.try_resolve_row(Token::new(0xFE000001)).is_none());
        assert!(stream.try_resolve_row(Token::new(0x1B000001)).is_none());
    }
}
