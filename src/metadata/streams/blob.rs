//! Blob heap (`#Blob`): byte pool addressed by offset.
//!
//! Each valid blob carries its size compressed into the leading bytes:
//!
//! * first byte `0bbbbbbb` - the next `bbbbbbb` bytes are the data
//! * first bytes `10bbbbbb x` - the next `(bbbbbb << 8) + x` bytes are the data
//! * first bytes `110bbbbb x y z` - the next `(bbbbb << 24) + (x << 16) + (y << 8) + z`
//!   bytes are the data
//!
//! Offset 0 is the mandatory leading null byte of the heap.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The `#Blob` heap, holding variable-length payloads (signatures, custom
/// attribute data) referenced by table columns.
///
/// The heap owns its bytes; readers returned by [`BlobHeap::get`] and
/// [`BlobHeap::parser_at`] borrow from it, so the heap must outlive every
/// pending decode.
#[derive(Debug)]
pub struct BlobHeap {
    data: Vec<u8>,
}

impl BlobHeap {
    /// Creates a blob heap from its raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the data is empty or does not
    /// start with the mandatory null byte.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(BlobHeap { data })
    }

    /// The blob stored at `offset`: decodes the compressed length prefix and
    /// returns a view over exactly that many bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the offset or the declared
    /// length falls outside the heap.
    pub fn get(&self, offset: usize) -> Result<&[u8]> {
        if offset > self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[offset..]);
        let length = parser.read_compressed_uint()? as usize;
        let skip = parser.pos();

        let Some(data_start) = offset.checked_add(skip) else {
            return Err(OutOfBounds);
        };

        let Some(data_end) = data_start.checked_add(length) else {
            return Err(OutOfBounds);
        };

        if data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }

    /// A parser scoped to the blob at `offset`.
    ///
    /// # Errors
    /// Same conditions as [`BlobHeap::get`].
    pub fn parser_at(&self, offset: usize) -> Result<Parser<'_>> {
        Ok(Parser::new(self.get(offset)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_heap_prefix() {
        assert!(BlobHeap::new(Vec::new()).is_err());
        assert!(BlobHeap::new(vec![0x01]).is_err());
    }

    #[test]
    fn short_form_length() {
        let heap = BlobHeap::new(vec![0x00, 0x03, 0x41, 0x42, 0x43]).unwrap();
        assert_eq!(heap.get(1).unwrap(), &[0x41, 0x42, 0x43]);
    }

    #[test]
    fn two_byte_length() {
        let mut data = vec![0x00, 0x80, 0x80];
        data.extend(std::iter::repeat(0xAB).take(0x80));
        let heap = BlobHeap::new(data).unwrap();

        let blob = heap.get(1).unwrap();
        assert_eq!(blob.len(), 0x80);
        assert!(blob.iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn truncated_blob_is_out_of_bounds() {
        let heap = BlobHeap::new(vec![0x00, 0x05, 0x41]).unwrap();
        assert!(matches!(heap.get(1), Err(OutOfBounds)));
        assert!(matches!(heap.get(99), Err(OutOfBounds)));
    }

    #[test]
    fn parser_is_scoped_to_one_blob() {
        let heap = BlobHeap::new(vec![0x00, 0x02, 0x1D, 0x0E, 0x01, 0x08]).unwrap();
        let mut parser = heap.parser_at(1).unwrap();

        assert_eq!(parser.read_le::<u8>().unwrap(), 0x1D);
        assert_eq!(parser.read_le::<u8>().unwrap(), 0x0E);
        assert!(!parser.has_more_data());
    }
}
