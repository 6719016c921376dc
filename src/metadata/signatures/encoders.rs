//! Encoder for the signature blob grammar.
//!
//! Every node kind has a `measure_*` / `serialize_*` pair and the two agree
//! byte for byte: `measure` returns exactly the number of bytes `serialize`
//! appends, transitively through nested nodes. Writers rely on this to
//! reserve blob space before emitting.
//!
//! Serialization canonicalizes two things decode is tolerant about: the
//! leading byte of a local variable signature is always the `LOCAL_SIG`
//! constant, and the named argument count of a custom attribute is always
//! written even when zero.

use crate::{
    file::io::{compressed_uint_size, write_compressed_uint},
    metadata::{
        signatures::types::{
            CustomAttributeArgument, CustomAttributeNamedArgument, CustomAttributeSignature,
            LocalVariableSignature, SerializedType, SignatureLocalVariable, SignatureMethod,
            SignatureParameter, SignatureTypeSpec, TypeSignature, CALLING_CONVENTION,
            ELEMENT_TYPE, SERIALIZATION_TYPE, SIGNATURE_HEADER,
        },
        streams::TableId,
        token::Token,
    },
    Error, Result,
};

/// Packs a token into the `TypeDefOrRef` coded form (II.23.2.8).
///
/// # Errors
/// Returns [`crate::Error::InvalidArgument`] for tokens outside the
/// `TypeDef` / `TypeRef` / `TypeSpec` tables.
fn encode_type_def_or_ref(token: Token) -> Result<u32> {
    let selector = match token.table_id() {
        Some(TableId::TypeDef) => 0,
        Some(TableId::TypeRef) => 1,
        Some(TableId::TypeSpec) => 2,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "Token {token} cannot be coded as TypeDefOrRef"
            )))
        }
    };

    Ok((token.row() << 2) | selector)
}

fn measure_coded_token(token: Token) -> Result<u32> {
    Ok(compressed_uint_size(encode_type_def_or_ref(token)?))
}

fn write_coded_token(token: Token, buffer: &mut Vec<u8>) -> Result<()> {
    write_compressed_uint(encode_type_def_or_ref(token)?, buffer);
    Ok(())
}

fn measure_modifiers(modifiers: &[Token]) -> Result<u32> {
    let mut size = 0;
    for token in modifiers {
        size += 1 + measure_coded_token(*token)?;
    }
    Ok(size)
}

fn write_modifiers(modifiers: &[Token], buffer: &mut Vec<u8>) -> Result<()> {
    for token in modifiers {
        buffer.push(ELEMENT_TYPE::CMOD_OPT);
        write_coded_token(*token, buffer)?;
    }
    Ok(())
}

/// Byte size of a type node on the wire.
///
/// # Errors
/// Returns [`crate::Error::InvalidArgument`] for tokens that cannot be coded.
pub fn measure_type(signature: &TypeSignature) -> Result<u32> {
    match signature {
        TypeSignature::Void
        | TypeSignature::Boolean
        | TypeSignature::Char
        | TypeSignature::I1
        | TypeSignature::U1
        | TypeSignature::I2
        | TypeSignature::U2
        | TypeSignature::I4
        | TypeSignature::U4
        | TypeSignature::I8
        | TypeSignature::U8
        | TypeSignature::R4
        | TypeSignature::R8
        | TypeSignature::String
        | TypeSignature::Object
        | TypeSignature::I
        | TypeSignature::U
        | TypeSignature::TypedByRef => Ok(1),
        TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
            Ok(1 + measure_coded_token(*token)?)
        }
        TypeSignature::Ptr(pointer) => {
            Ok(1 + measure_modifiers(&pointer.modifiers)? + measure_type(&pointer.base)?)
        }
        TypeSignature::ByRef(base) | TypeSignature::Pinned(base) | TypeSignature::Boxed(base) => {
            Ok(1 + measure_type(base)?)
        }
        TypeSignature::SzArray(array) => {
            Ok(1 + measure_modifiers(&array.modifiers)? + measure_type(&array.base)?)
        }
        TypeSignature::Array(array) => {
            let mut size = 1 + measure_type(&array.base)? + compressed_uint_size(array.rank);

            let sizes: Vec<u32> = array
                .dimensions
                .iter()
                .map_while(|dim| dim.size)
                .collect();
            size += compressed_uint_size(sizes.len() as u32);
            for value in &sizes {
                size += compressed_uint_size(*value);
            }

            let bounds: Vec<u32> = array
                .dimensions
                .iter()
                .map_while(|dim| dim.lower_bound)
                .collect();
            size += compressed_uint_size(bounds.len() as u32);
            for value in &bounds {
                size += compressed_uint_size(*value);
            }

            Ok(size)
        }
        TypeSignature::GenericInst(base, args) => {
            let mut size = 1 + measure_type(base)? + compressed_uint_size(args.len() as u32);
            for arg in args {
                size += measure_type(arg)?;
            }
            Ok(size)
        }
        TypeSignature::GenericParamType(index) | TypeSignature::GenericParamMethod(index) => {
            Ok(1 + compressed_uint_size(*index))
        }
        TypeSignature::FnPtr(method) => Ok(1 + measure_method_signature(method)?),
    }
}

/// Appends the wire form of a type node to `buffer`.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn serialize_type(signature: &TypeSignature, buffer: &mut Vec<u8>) -> Result<()> {
    buffer.push(signature.element_type());

    match signature {
        TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
            write_coded_token(*token, buffer)?;
        }
        TypeSignature::Ptr(pointer) => {
            write_modifiers(&pointer.modifiers, buffer)?;
            serialize_type(&pointer.base, buffer)?;
        }
        TypeSignature::ByRef(base) | TypeSignature::Pinned(base) | TypeSignature::Boxed(base) => {
            serialize_type(base, buffer)?;
        }
        TypeSignature::SzArray(array) => {
            write_modifiers(&array.modifiers, buffer)?;
            serialize_type(&array.base, buffer)?;
        }
        TypeSignature::Array(array) => {
            serialize_type(&array.base, buffer)?;
            write_compressed_uint(array.rank, buffer);

            let sizes: Vec<u32> = array
                .dimensions
                .iter()
                .map_while(|dim| dim.size)
                .collect();
            write_compressed_uint(sizes.len() as u32, buffer);
            for value in &sizes {
                write_compressed_uint(*value, buffer);
            }

            let bounds: Vec<u32> = array
                .dimensions
                .iter()
                .map_while(|dim| dim.lower_bound)
                .collect();
            write_compressed_uint(bounds.len() as u32, buffer);
            for value in &bounds {
                write_compressed_uint(*value, buffer);
            }
        }
        TypeSignature::GenericInst(base, args) => {
            serialize_type(base, buffer)?;
            write_compressed_uint(args.len() as u32, buffer);
            for arg in args {
                serialize_type(arg, buffer)?;
            }
        }
        TypeSignature::GenericParamType(index) | TypeSignature::GenericParamMethod(index) => {
            write_compressed_uint(*index, buffer);
        }
        TypeSignature::FnPtr(method) => {
            serialize_method_signature(method, buffer)?;
        }
        _ => {}
    }

    Ok(())
}

fn measure_param(param: &SignatureParameter) -> Result<u32> {
    let mut size = measure_modifiers(&param.modifiers)?;
    if param.by_ref {
        size += 1;
    }
    Ok(size + measure_type(&param.base)?)
}

fn write_param(param: &SignatureParameter, buffer: &mut Vec<u8>) -> Result<()> {
    write_modifiers(&param.modifiers, buffer)?;
    if param.by_ref {
        buffer.push(ELEMENT_TYPE::BYREF);
    }
    serialize_type(&param.base, buffer)
}

fn method_header_byte(signature: &SignatureMethod) -> u8 {
    let mut header = if signature.cdecl {
        CALLING_CONVENTION::C
    } else if signature.stdcall {
        CALLING_CONVENTION::STDCALL
    } else if signature.thiscall {
        CALLING_CONVENTION::THISCALL
    } else if signature.fastcall {
        CALLING_CONVENTION::FASTCALL
    } else if signature.vararg {
        CALLING_CONVENTION::VARARG
    } else {
        CALLING_CONVENTION::DEFAULT
    };

    if signature.param_count_generic > 0 {
        header |= CALLING_CONVENTION::GENERIC;
    }
    if signature.has_this {
        header |= CALLING_CONVENTION::HASTHIS;
    }
    if signature.explicit_this {
        header |= CALLING_CONVENTION::EXPLICITTHIS;
    }

    header
}

/// Byte size of a method signature on the wire.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn measure_method_signature(signature: &SignatureMethod) -> Result<u32> {
    let mut size = 1;

    if signature.param_count_generic > 0 {
        size += compressed_uint_size(signature.param_count_generic);
    }

    let declared = (signature.params.len() + signature.varargs.len()) as u32;
    size += compressed_uint_size(declared);
    size += measure_param(&signature.return_type)?;

    for param in &signature.params {
        size += measure_param(param)?;
    }

    if !signature.varargs.is_empty() {
        size += 1; // sentinel
        for param in &signature.varargs {
            size += measure_param(param)?;
        }
    }

    Ok(size)
}

/// Appends the wire form of a method signature to `buffer`.
///
/// The emitted parameter count is derived from the actual parameter lists,
/// not the `param_count` field, so a signature built in memory serializes
/// consistently.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn serialize_method_signature(
    signature: &SignatureMethod,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    buffer.push(method_header_byte(signature));

    if signature.param_count_generic > 0 {
        write_compressed_uint(signature.param_count_generic, buffer);
    }

    let declared = (signature.params.len() + signature.varargs.len()) as u32;
    write_compressed_uint(declared, buffer);
    write_param(&signature.return_type, buffer)?;

    for param in &signature.params {
        write_param(param, buffer)?;
    }

    if !signature.varargs.is_empty() {
        buffer.push(ELEMENT_TYPE::SENTINEL);
        for param in &signature.varargs {
            write_param(param, buffer)?;
        }
    }

    Ok(())
}

fn measure_local(local: &SignatureLocalVariable) -> Result<u32> {
    let mut size = measure_modifiers(&local.modifiers)?;
    if local.is_pinned {
        size += 1;
    }
    if local.is_byref {
        size += 1;
    }
    Ok(size + measure_type(&local.base)?)
}

fn write_local(local: &SignatureLocalVariable, buffer: &mut Vec<u8>) -> Result<()> {
    write_modifiers(&local.modifiers, buffer)?;
    if local.is_pinned {
        buffer.push(ELEMENT_TYPE::PINNED);
    }
    if local.is_byref {
        buffer.push(ELEMENT_TYPE::BYREF);
    }
    serialize_type(&local.base, buffer)
}

/// Byte size of a local variable signature on the wire.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn measure_local_var_signature(signature: &LocalVariableSignature) -> Result<u32> {
    let mut size = 1 + compressed_uint_size(signature.locals.len() as u32);
    for local in &signature.locals {
        size += measure_local(local)?;
    }
    Ok(size)
}

/// Appends the wire form of a local variable signature to `buffer`.
///
/// The leading byte is always the `LOCAL_SIG` constant `0x07`; the decoded
/// attribute byte is deliberately not round-tripped.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn serialize_local_var_signature(
    signature: &LocalVariableSignature,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    buffer.push(SIGNATURE_HEADER::LOCAL_SIG);
    write_compressed_uint(signature.locals.len() as u32, buffer);

    for local in &signature.locals {
        write_local(local, buffer)?;
    }

    Ok(())
}

/// Byte size of a type specification blob: exactly one type node.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn measure_type_spec(signature: &SignatureTypeSpec) -> Result<u32> {
    measure_type(&signature.base)
}

/// Appends the wire form of a type specification blob to `buffer`.
///
/// # Errors
/// Same conditions as [`measure_type`].
pub fn serialize_type_spec(signature: &SignatureTypeSpec, buffer: &mut Vec<u8>) -> Result<()> {
    serialize_type(&signature.base, buffer)
}

fn serstring_size(value: Option<&str>) -> u32 {
    match value {
        None => 1,
        Some(text) => compressed_uint_size(text.len() as u32) + text.len() as u32,
    }
}

fn write_serstring(value: Option<&str>, buffer: &mut Vec<u8>) {
    match value {
        None => buffer.push(0xFF),
        Some(text) => {
            write_compressed_uint(text.len() as u32, buffer);
            buffer.extend_from_slice(text.as_bytes());
        }
    }
}

fn measure_serialized_type(arg_type: &SerializedType) -> u32 {
    match arg_type {
        SerializedType::Enum(name) => 1 + serstring_size(Some(name)),
        SerializedType::SzArray(element) => 1 + measure_serialized_type(element),
        _ => 1,
    }
}

fn write_serialized_type(arg_type: &SerializedType, buffer: &mut Vec<u8>) {
    buffer.push(arg_type.tag());
    match arg_type {
        SerializedType::Enum(name) => write_serstring(Some(name), buffer),
        SerializedType::SzArray(element) => write_serialized_type(element, buffer),
        _ => {}
    }
}

fn measure_argument(argument: &CustomAttributeArgument) -> u32 {
    match argument {
        CustomAttributeArgument::Bool(_)
        | CustomAttributeArgument::I1(_)
        | CustomAttributeArgument::U1(_) => 1,
        CustomAttributeArgument::Char(_)
        | CustomAttributeArgument::I2(_)
        | CustomAttributeArgument::U2(_) => 2,
        CustomAttributeArgument::I4(_)
        | CustomAttributeArgument::U4(_)
        | CustomAttributeArgument::R4(_) => 4,
        CustomAttributeArgument::I8(_)
        | CustomAttributeArgument::U8(_)
        | CustomAttributeArgument::R8(_) => 8,
        CustomAttributeArgument::String(value) | CustomAttributeArgument::Type(value) => {
            serstring_size(value.as_deref())
        }
        CustomAttributeArgument::Array(None) => 4,
        CustomAttributeArgument::Array(Some(values)) => {
            4 + values.iter().map(measure_argument).sum::<u32>()
        }
        CustomAttributeArgument::Object(arg_type, value) => {
            measure_serialized_type(arg_type) + measure_argument(value)
        }
    }
}

fn write_argument(argument: &CustomAttributeArgument, buffer: &mut Vec<u8>) {
    match argument {
        CustomAttributeArgument::Bool(value) => buffer.push(u8::from(*value)),
        CustomAttributeArgument::Char(value) => {
            buffer.extend_from_slice(&(*value as u16).to_le_bytes());
        }
        CustomAttributeArgument::I1(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::U1(value) => buffer.push(*value),
        CustomAttributeArgument::I2(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::U2(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::I4(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::U4(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::I8(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::U8(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::R4(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::R8(value) => buffer.extend_from_slice(&value.to_le_bytes()),
        CustomAttributeArgument::String(value) | CustomAttributeArgument::Type(value) => {
            write_serstring(value.as_deref(), buffer);
        }
        CustomAttributeArgument::Array(None) => {
            buffer.extend_from_slice(&u32::MAX.to_le_bytes());
        }
        CustomAttributeArgument::Array(Some(values)) => {
            buffer.extend_from_slice(&(values.len() as u32).to_le_bytes());
            for value in values {
                write_argument(value, buffer);
            }
        }
        CustomAttributeArgument::Object(arg_type, value) => {
            write_serialized_type(arg_type, buffer);
            write_argument(value, buffer);
        }
    }
}

fn measure_named_argument(named: &CustomAttributeNamedArgument) -> u32 {
    1 + measure_serialized_type(&named.arg_type)
        + serstring_size(Some(&named.name))
        + measure_argument(&named.value)
}

fn write_named_argument(named: &CustomAttributeNamedArgument, buffer: &mut Vec<u8>) {
    buffer.push(if named.is_field {
        SERIALIZATION_TYPE::FIELD
    } else {
        SERIALIZATION_TYPE::PROPERTY
    });
    write_serialized_type(&named.arg_type, buffer);
    write_serstring(Some(&named.name), buffer);
    write_argument(&named.value, buffer);
}

/// Byte size of a custom attribute blob on the wire.
#[must_use]
pub fn measure_custom_attribute(signature: &CustomAttributeSignature) -> u32 {
    let mut size = 2; // prolog
    for argument in &signature.fixed_args {
        size += measure_argument(argument);
    }

    size += 2; // named argument count
    for named in &signature.named_args {
        size += measure_named_argument(named);
    }

    size
}

/// Appends the wire form of a custom attribute blob to `buffer`.
///
/// The named argument count is always written, even when zero.
pub fn serialize_custom_attribute(signature: &CustomAttributeSignature, buffer: &mut Vec<u8>) {
    buffer.extend_from_slice(&0x0001u16.to_le_bytes());

    for argument in &signature.fixed_args {
        write_argument(argument, buffer);
    }

    buffer.extend_from_slice(&(signature.named_args.len() as u16).to_le_bytes());
    for named in &signature.named_args {
        write_named_argument(named, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::parser::SignatureParser;
    use crate::metadata::signatures::types::{ArrayDimension, SignatureArray, SignatureSzArray};

    fn assert_type_round_trip(data: &[u8]) {
        let signature = SignatureParser::new(data).parse_type().unwrap();

        assert_eq!(measure_type(&signature).unwrap() as usize, data.len());

        let mut buffer = Vec::new();
        serialize_type(&signature, &mut buffer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn primitive_and_wrapper_round_trips() {
        assert_type_round_trip(&[0x0E]); // string
        assert_type_round_trip(&[0x1D, 0x0E]); // string[]
        assert_type_round_trip(&[0x0F, 0x08]); // int32*
        assert_type_round_trip(&[0x10, 0x1C]); // object&
        assert_type_round_trip(&[0x45, 0x08]); // pinned int32
        assert_type_round_trip(&[0x51, 0x0E]); // boxed string
        assert_type_round_trip(&[0x12, 0x35]); // class TypeRef:0x0D
        assert_type_round_trip(&[0x11, 0x42]); // valuetype TypeSpec:0x10
        assert_type_round_trip(&[0x13, 0x01]); // !1
        assert_type_round_trip(&[0x1E, 0x02]); // !!2
    }

    #[test]
    fn composite_round_trips() {
        // List<int32, string> shape
        assert_type_round_trip(&[0x15, 0x12, 0x05, 0x02, 0x08, 0x0E]);
        // int32[2][1, 10][1, 3]
        assert_type_round_trip(&[0x14, 0x08, 0x02, 0x01, 0x0A, 0x02, 0x01, 0x03]);
        // fnptr: default, 1 param, string -> void
        assert_type_round_trip(&[0x1B, 0x00, 0x01, 0x01, 0x0E]);
    }

    #[test]
    fn measure_matches_spec_example() {
        let signature = SignatureParser::new(&[0x1D, 0x0E]).parse_type().unwrap();
        assert_eq!(measure_type(&signature).unwrap(), 2);
    }

    #[test]
    fn coded_token_selectors() {
        assert_eq!(
            encode_type_def_or_ref(Token::new(0x02000001)).unwrap(),
            0x04
        );
        assert_eq!(
            encode_type_def_or_ref(Token::new(0x0100000D)).unwrap(),
            0x35
        );
        assert_eq!(
            encode_type_def_or_ref(Token::new(0x1B000010)).unwrap(),
            0x42
        );
        assert!(encode_type_def_or_ref(Token::new(0x06000001)).is_err());
    }

    #[test]
    fn wide_coded_token_uses_two_byte_compressed_form() {
        // TypeRef rid 0x40 codes to 0x101, needing the two-byte encoding
        let token = Token::new(0x01000040);
        assert_eq!(measure_coded_token(token).unwrap(), 2);

        let mut buffer = Vec::new();
        write_coded_token(token, &mut buffer).unwrap();
        assert_eq!(buffer, vec![0x81, 0x01]);
    }

    #[test]
    fn method_signature_round_trip() {
        let data = [0x20, 0x02, 0x01, 0x0E, 0x08];
        let signature = SignatureParser::new(&data)
            .parse_method_signature()
            .unwrap();

        assert_eq!(
            measure_method_signature(&signature).unwrap() as usize,
            data.len()
        );

        let mut buffer = Vec::new();
        serialize_method_signature(&signature, &mut buffer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn vararg_method_round_trip_keeps_sentinel() {
        let data = [0x05, 0x03, 0x01, 0x08, 0x41, 0x0E, 0x1C];
        let signature = SignatureParser::new(&data)
            .parse_method_signature()
            .unwrap();

        assert_eq!(
            measure_method_signature(&signature).unwrap() as usize,
            data.len()
        );

        let mut buffer = Vec::new();
        serialize_method_signature(&signature, &mut buffer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn generic_method_round_trip() {
        let data = [0x10, 0x01, 0x01, 0x01, 0x1E, 0x00];
        let signature = SignatureParser::new(&data)
            .parse_method_signature()
            .unwrap();

        let mut buffer = Vec::new();
        serialize_method_signature(&signature, &mut buffer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn local_var_serialization_pins_the_leading_byte() {
        // Decoded with a non-standard attribute byte
        let mut signature = SignatureParser::new(&[0x99, 0x01, 0x08])
            .parse_local_var_signature()
            .unwrap();
        assert_eq!(signature.attributes, 0x99);

        let mut buffer = Vec::new();
        serialize_local_var_signature(&signature, &mut buffer).unwrap();
        assert_eq!(buffer, vec![0x07, 0x01, 0x08]);

        // Changing the field afterwards still does not reach the wire
        signature.attributes = 0x42;
        let mut buffer = Vec::new();
        serialize_local_var_signature(&signature, &mut buffer).unwrap();
        assert_eq!(buffer[0], 0x07);

        assert_eq!(
            measure_local_var_signature(&signature).unwrap() as usize,
            buffer.len()
        );
    }

    #[test]
    fn local_var_pinned_byref_round_trip() {
        let data = [0x07, 0x02, 0x45, 0x1C, 0x10, 0x08];
        let signature = SignatureParser::new(&data)
            .parse_local_var_signature()
            .unwrap();

        assert_eq!(
            measure_local_var_signature(&signature).unwrap() as usize,
            data.len()
        );

        let mut buffer = Vec::new();
        serialize_local_var_signature(&signature, &mut buffer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn empty_custom_attribute_blob() {
        let signature = CustomAttributeSignature::default();
        assert_eq!(measure_custom_attribute(&signature), 4);

        let mut buffer = Vec::new();
        serialize_custom_attribute(&signature, &mut buffer);
        assert_eq!(buffer, vec![0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn custom_attribute_with_args_round_trip() {
        let signature = CustomAttributeSignature {
            fixed_args: vec![
                CustomAttributeArgument::I4(42),
                CustomAttributeArgument::String(Some("hi".to_string())),
                CustomAttributeArgument::Array(Some(vec![
                    CustomAttributeArgument::U1(1),
                    CustomAttributeArgument::U1(2),
                ])),
            ],
            named_args: vec![CustomAttributeNamedArgument {
                is_field: true,
                arg_type: SerializedType::Bool,
                name: "Flag".to_string(),
                value: CustomAttributeArgument::Bool(true),
            }],
        };

        let mut buffer = Vec::new();
        serialize_custom_attribute(&signature, &mut buffer);
        assert_eq!(measure_custom_attribute(&signature) as usize, buffer.len());

        // prolog + i4 + serstring("hi") + array(4 + 2) + count + named
        let expected_named = 1 + 1 + (1 + 4) + 1;
        assert_eq!(buffer.len(), 2 + 4 + 3 + 6 + 2 + expected_named);

        // and the bytes decode back to the same value
        let ctor = crate::metadata::signatures::types::SignatureMethod {
            param_count: 3,
            params: vec![
                SignatureParameter {
                    modifiers: Vec::new(),
                    by_ref: false,
                    base: TypeSignature::I4,
                },
                SignatureParameter {
                    modifiers: Vec::new(),
                    by_ref: false,
                    base: TypeSignature::String,
                },
                SignatureParameter {
                    modifiers: Vec::new(),
                    by_ref: false,
                    base: TypeSignature::SzArray(SignatureSzArray {
                        modifiers: Vec::new(),
                        base: Box::new(TypeSignature::U1),
                    }),
                },
            ],
            ..Default::default()
        };

        let decoded = SignatureParser::new(&buffer)
            .parse_custom_attribute(Some(&ctor))
            .unwrap();
        assert_eq!(decoded, signature);
    }

    #[test]
    fn tagged_object_and_enum_sizes() {
        let named = CustomAttributeNamedArgument {
            is_field: false,
            arg_type: SerializedType::Enum("My.Level".to_string()),
            name: "Level".to_string(),
            value: CustomAttributeArgument::I4(3),
        };
        // tag + (tag + serstring) + serstring + i4
        assert_eq!(measure_named_argument(&named), 1 + (1 + 9) + 6 + 4);

        let object = CustomAttributeArgument::Object(
            SerializedType::U1,
            Box::new(CustomAttributeArgument::U1(7)),
        );
        assert_eq!(measure_argument(&object), 2);
    }

    #[test]
    fn array_with_trailing_unsized_dimensions() {
        let signature = TypeSignature::Array(SignatureArray {
            base: Box::new(TypeSignature::I4),
            rank: 3,
            dimensions: vec![
                ArrayDimension {
                    size: Some(4),
                    lower_bound: Some(0),
                },
                ArrayDimension {
                    size: None,
                    lower_bound: None,
                },
            ],
        });

        let mut buffer = Vec::new();
        serialize_type(&signature, &mut buffer).unwrap();
        assert_eq!(measure_type(&signature).unwrap() as usize, buffer.len());
        // ARRAY I4 rank=3 sizes=[4] bounds=[0]
        assert_eq!(buffer, vec![0x14, 0x08, 0x03, 0x01, 0x04, 0x01, 0x00]);
    }
}
