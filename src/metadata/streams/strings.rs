//! Strings heap (`#Strings`): NUL-terminated UTF-8 names addressed by offset.

use crate::{Error::OutOfBounds, Result};

/// The `#Strings` heap. Offset 0 is the mandatory empty string.
#[derive(Debug)]
pub struct StringsHeap {
    data: Vec<u8>,
}

impl StringsHeap {
    /// Creates a strings heap from its raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the data is empty or does not
    /// start with the mandatory null byte.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Strings heap"));
        }

        Ok(StringsHeap { data })
    }

    /// The NUL-terminated string starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for offsets past the heap end,
    /// or [`crate::Error::Malformed`] for unterminated or non-UTF-8 data.
    pub fn get(&self, offset: usize) -> Result<&str> {
        if offset >= self.data.len() {
            return Err(OutOfBounds);
        }

        let Some(terminator) = self.data[offset..].iter().position(|b| *b == 0) else {
            return Err(malformed_error!(
                "Unterminated string at #Strings offset {}",
                offset
            ));
        };

        match std::str::from_utf8(&self.data[offset..offset + terminator]) {
            Ok(value) => Ok(value),
            Err(_) => Err(malformed_error!(
                "Invalid UTF-8 at #Strings offset {}",
                offset
            )),
        }
    }
}
