use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, covering every failure this library can return.
///
/// Decoding is one-shot: a malformed blob fails immediately to the caller of
/// the specific operation and is never silently skipped or partially applied.
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata is damaged and could not be decoded.
    ///
    /// Includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading a heap or blob.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// An argument violated a documented precondition.
    ///
    /// Raised when caching a member whose token has no row id yet, or when a
    /// custom attribute blob does not start with the `0x0001` prolog.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// A token could not be mapped to a row or member.
    ///
    /// The associated [`Token`] identifies the token that failed to resolve.
    #[error("Invalid metadata token - {0}")]
    MemberResolution(Token),

    /// A type specification could not be resolved to a definition because no
    /// resolution context or no configured member resolver is available.
    #[error("No resolution context or member resolver available")]
    ResolverUnavailable,

    /// Recursion limit reached.
    ///
    /// To prevent stack overflow while decoding deeply nested signatures, a
    /// maximum recursion depth is enforced. The associated value shows the
    /// limit that was reached.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
