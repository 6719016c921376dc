//! Cursor-based parser for metadata blobs.
//!
//! [`Parser`] maintains a position within a byte slice and provides
//! bounds-checked reads for the primitives and variable-length encodings the
//! signature grammar uses: little-endian integers, compressed unsigned
//! integers, compressed `TypeDefOrRef` coded tokens and length-prefixed
//! UTF-8 strings.

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::token::Token,
    Error::OutOfBounds,
    Result,
};

/// A bounds-checked cursor over one blob of metadata bytes.
///
/// # Examples
///
/// ```rust
/// use cilmeta::Parser;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut parser = Parser::new(&data);
/// let value = parser.read_le::<u16>()?;
/// assert_eq!(value, 0x0201);
/// # Ok::<(), cilmeta::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] from a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Current offset into the underlying data.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// True while at least one byte remains.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes left between the cursor and the end of the data.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Look at the current byte without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no byte remains.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(OutOfBounds),
        }
    }

    /// Move forward by one byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the end has been reached.
    pub fn advance(&mut self) -> Result<()> {
        if self.position >= self.data.len() {
            return Err(OutOfBounds);
        }

        self.position += 1;
        Ok(())
    }

    /// Read a `T` at the current position in little-endian and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer as defined in ECMA-335 II.23.2.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data
    /// length, or [`crate::Error::Malformed`] for an invalid leading byte.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            return Ok(((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read a compressed `TypeDefOrRef` coded token (II.23.2.8).
    ///
    /// The low two bits select the table (`TypeDef`, `TypeRef` or `TypeSpec`),
    /// the remaining bits hold the row id.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the table selector is invalid,
    /// or the errors of [`Parser::read_compressed_uint`].
    pub fn read_compressed_token(&mut self) -> Result<Token> {
        let compressed_token = self.read_compressed_uint()?;

        let table: u32 = match compressed_token & 0x3 {
            0x0 => 0x0200_0000, // TypeDef
            0x1 => 0x0100_0000, // TypeRef
            0x2 => 0x1B00_0000, // TypeSpec
            _ => {
                return Err(malformed_error!(
                    "Invalid compressed token - {}",
                    compressed_token
                ))
            }
        };

        Ok(Token::new(table + (compressed_token >> 2)))
    }

    /// Read a SerString: compressed byte length followed by UTF-8 data.
    ///
    /// A single `0xFF` byte encodes the null string and yields `None`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncated data or
    /// [`crate::Error::Malformed`] if the bytes are not valid UTF-8.
    pub fn read_prefixed_string_utf8(&mut self) -> Result<Option<String>> {
        if self.peek_byte()? == 0xFF {
            self.advance()?;
            return Ok(None);
        }

        let length = self.read_compressed_uint()? as usize;
        let Some(end) = self.position.checked_add(length) else {
            return Err(OutOfBounds);
        };

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let bytes = &self.data[self.position..end];
        self.position = end;

        match std::str::from_utf8(bytes) {
            Ok(value) => Ok(Some(value.to_string())),
            Err(_) => Err(malformed_error!("SerString is not valid UTF-8")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_and_advance() {
        let data = [0xAA, 0xBB];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.peek_byte().unwrap(), 0xAA);
        assert_eq!(parser.pos(), 0);
        parser.advance().unwrap();
        assert_eq!(parser.peek_byte().unwrap(), 0xBB);
        parser.advance().unwrap();
        assert!(!parser.has_more_data());
        assert!(parser.advance().is_err());
    }

    #[test]
    fn compressed_uint_all_widths() {
        let mut parser = Parser::new(&[0x03]);
        assert_eq!(parser.read_compressed_uint().unwrap(), 3);

        let mut parser = Parser::new(&[0x80, 0x80]);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x80);

        let mut parser = Parser::new(&[0xBF, 0xFF]);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x3FFF);

        let mut parser = Parser::new(&[0xC0, 0x00, 0x40, 0x00]);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x4000);

        let mut parser = Parser::new(&[0xE0]);
        assert!(parser.read_compressed_uint().is_err());
    }

    #[test]
    fn compressed_token_tables() {
        // (rid << 2) | selector
        let mut parser = Parser::new(&[0x42]); // 0b0100_0010 -> TypeSpec, rid 0x10
        assert_eq!(
            parser.read_compressed_token().unwrap(),
            Token::new(0x1B000010)
        );

        let mut parser = Parser::new(&[0x35]); // TypeRef, rid 0x0D
        assert_eq!(
            parser.read_compressed_token().unwrap(),
            Token::new(0x0100000D)
        );

        let mut parser = Parser::new(&[0x04]); // TypeDef, rid 1
        assert_eq!(
            parser.read_compressed_token().unwrap(),
            Token::new(0x02000001)
        );

        let mut parser = Parser::new(&[0x07]); // selector 3 is reserved
        assert!(parser.read_compressed_token().is_err());
    }

    #[test]
    fn prefixed_string() {
        let mut parser = Parser::new(&[0x05, b'H', b'e', b'l', b'l', b'o']);
        assert_eq!(
            parser.read_prefixed_string_utf8().unwrap(),
            Some("Hello".to_string())
        );

        let mut parser = Parser::new(&[0xFF]);
        assert_eq!(parser.read_prefixed_string_utf8().unwrap(), None);

        let mut parser = Parser::new(&[0x04, b'a']);
        assert!(parser.read_prefixed_string_utf8().is_err());
    }
}
