//! Signature blob codec: typed views over `#Blob` payloads.
//!
//! [`types`] defines the signature tree, [`parser`] decodes blobs into it and
//! [`encoders`] measures and re-emits the wire form. The free functions here
//! are the standalone entry points; decoding that follows `TypeSpec` tokens
//! through a resolution context goes through
//! [`parser::SignatureParser::with_context`] instead.

pub mod encoders;
pub mod parser;
pub mod types;

pub use parser::{SignatureParser, MAX_RECURSION_DEPTH};
pub use types::{
    ArrayDimension, CustomAttributeArgument, CustomAttributeNamedArgument,
    CustomAttributeSignature, LocalVariableSignature, SerializedType, SignatureArray,
    SignatureLocalVariable, SignatureMethod, SignatureParameter, SignaturePointer,
    SignatureSzArray, SignatureTypeSpec, TypeSignature,
};

use crate::Result;

/// Parses a single type signature from `data` without following tokens.
///
/// # Errors
/// See [`SignatureParser::parse_type`].
pub fn parse_type_signature(data: &[u8]) -> Result<TypeSignature> {
    SignatureParser::new(data).parse_type()
}

/// Parses a type specification blob from `data` without following tokens.
///
/// # Errors
/// See [`SignatureParser::parse_type_spec_signature`].
pub fn parse_type_spec_signature(data: &[u8]) -> Result<SignatureTypeSpec> {
    SignatureParser::new(data).parse_type_spec_signature()
}

/// Parses a method signature from `data`.
///
/// # Errors
/// See [`SignatureParser::parse_method_signature`].
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    SignatureParser::new(data).parse_method_signature()
}

/// Parses a local variable signature from `data`.
///
/// # Errors
/// See [`SignatureParser::parse_local_var_signature`].
pub fn parse_local_var_signature(data: &[u8]) -> Result<LocalVariableSignature> {
    SignatureParser::new(data).parse_local_var_signature()
}

/// Parses a custom attribute blob from `data`, shaping fixed arguments by
/// `ctor` when available.
///
/// # Errors
/// See [`SignatureParser::parse_custom_attribute`].
pub fn parse_custom_attribute_signature(
    data: &[u8],
    ctor: Option<&SignatureMethod>,
) -> Result<CustomAttributeSignature> {
    SignatureParser::new(data).parse_custom_attribute(ctor)
}
