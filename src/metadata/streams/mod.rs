//! Metadata stream access.
//!
//! The [`StreamContainer`] owns the decoded streams of one image: the table
//! stream, the blob heap and the strings heap. Streams are read-only and
//! shared by reference across many members; no member mutates another's
//! backing bytes.

mod blob;
mod strings;
mod tables;

pub use blob::BlobHeap;
pub use strings::StringsHeap;
pub use tables::{Row, Table, TableId, TableStream};

/// The stream set backing one resolution context.
#[derive(Debug)]
pub struct StreamContainer {
    tables: TableStream,
    blob: BlobHeap,
    strings: StringsHeap,
}

impl StreamContainer {
    /// Bundles the three streams of a loaded image.
    #[must_use]
    pub fn new(tables: TableStream, blob: BlobHeap, strings: StringsHeap) -> Self {
        StreamContainer {
            tables,
            blob,
            strings,
        }
    }

    /// The table stream.
    #[must_use]
    pub fn tables(&self) -> &TableStream {
        &self.tables
    }

    /// The `#Blob` heap.
    #[must_use]
    pub fn blob(&self) -> &BlobHeap {
        &self.blob
    }

    /// The `#Strings` heap.
    #[must_use]
    pub fn strings(&self) -> &StringsHeap {
        &self.strings
    }
}
