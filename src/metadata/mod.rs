//! Metadata object model: tokens, streams, members and signatures.
//!
//! The layering is strict: streams hold raw bytes and rows, signatures are
//! decoded views over blob bytes, members tie rows to lazily decoded
//! signatures, and the [`context::ResolutionContext`] owns the identity map
//! that makes token resolution idempotent.

pub mod context;
pub mod lazy;
pub mod members;
pub mod protection;
pub mod signatures;
pub mod streams;
pub mod token;
