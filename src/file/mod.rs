//! Low-level byte access for metadata decoding.
//!
//! Provides the [`crate::file::parser::Parser`] cursor used by the signature
//! codec and the heap readers, plus the compressed-integer helpers shared by
//! the decode and encode sides.

pub(crate) mod io;
pub(crate) mod parser;
