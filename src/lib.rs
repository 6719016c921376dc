#![deny(missing_docs)]

//! # cilmeta
//!
//! Token-addressed metadata resolution and lazily decoded ECMA-335 signature
//! graphs.
//!
//! This crate implements the core of a managed-image metadata layer: it turns
//! a table row and a blob offset into a typed, possibly self-referential
//! object graph (type specifications, boxed/array/pointer type signatures,
//! custom attribute payloads, local variable lists) and serializes the same
//! graph back to byte-exact output.
//!
//! # Architecture
//!
//! - [`crate::metadata::context::ResolutionContext`] - per-image cache mapping
//!   tokens to decoded members
//! - [`crate::metadata::lazy::LazyDecodeCell`] - compute-once holder used
//!   everywhere a signature is decoded on demand
//! - [`crate::metadata::protection::RecursionProtection`] - traversal-token
//!   set threaded through nested decodes to guard against self-reference
//! - [`crate::metadata::signatures`] - the tagged-variant signature grammar
//!   with decode, measure and serialize operations
//! - [`crate::metadata::members`] - member kinds built on the above
//!
//! The control flow: a caller asks the resolution context to resolve a token,
//! a cache miss fetches the row from the table stream, a typed member is
//! constructed which internally owns a lazy decode cell, and the first access
//! to that cell runs the signature codec against a blob reader with a fresh
//! recursion protection set. The result is memoized and the member cached by
//! token.
//!
//! # Round-trip contract
//!
//! For every signature node `measure` equals the number of bytes `serialize`
//! emits, transitively for every nested node. Downstream heap layout is
//! computed from `measure` before any byte is written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cilmeta::metadata::signatures::parse_type_spec_signature;
//!
//! // SZArray of String
//! let spec = parse_type_spec_signature(&[0x1D, 0x0E])?;
//! assert!(!spec.base.is_value_type());
//! # Ok::<(), cilmeta::Error>(())
//! ```
//!
//! # Thread safety
//!
//! A resolution context is designed to be driven by one logical owner at a
//! time. Concurrent resolution of the same token without external locking may
//! duplicate decode work and settles last-write-wins in the cache; it never
//! corrupts already cached entries.

#[macro_use]
mod error;
pub(crate) mod file;
pub mod metadata;

pub use crate::error::Error;
pub use crate::file::io::CilIO;
pub use crate::file::parser::Parser;

/// Convenience alias for `Result<T, cilmeta::Error>`
pub type Result<T> = std::result::Result<T, Error>;
