//! Decoder for the signature blob grammar.
//!
//! [`SignatureParser`] walks one blob with a bounds-checked cursor and builds
//! the typed signature tree. Two modes exist:
//!
//! * **Standalone** ([`SignatureParser::new`]): tokens embedded in the grammar
//!   are recorded but never followed.
//! * **Context-bound** ([`SignatureParser::with_context`]): a `TypeSpec` token
//!   encountered inside the grammar is resolved through the
//!   [`ResolutionContext`] and its own payload is decoded as part of the same
//!   request, sharing the caller's [`RecursionProtection`] set. A token
//!   already in the set is kept as a raw reference instead of recursing, which
//!   is what terminates cyclic specifications.
//!
//! Independent of token cycles, a depth counter bounds how deep the grammar
//! itself may nest (`byref` of `pointer` of `array` of ...).

use std::sync::Arc;

use crate::{
    metadata::{
        context::ResolutionContext,
        members::Member,
        protection::RecursionProtection,
        signatures::types::{
            ArrayDimension, CustomAttributeArgument, CustomAttributeNamedArgument,
            CustomAttributeSignature, LocalVariableSignature, SerializedType, SignatureArray,
            SignatureLocalVariable, SignatureMethod, SignatureParameter, SignaturePointer,
            SignatureSzArray, SignatureTypeSpec, TypeSignature, CALLING_CONVENTION, ELEMENT_TYPE,
            SERIALIZATION_TYPE,
        },
        streams::TableId,
        token::Token,
    },
    Error, Parser, Result,
};

/// Upper bound on grammar nesting depth, independent of token cycles.
pub const MAX_RECURSION_DEPTH: usize = 50;

/// Resolution scope of a context-bound decode: the context to resolve
/// `TypeSpec` tokens against and the traversal set of the current request.
struct DecodeScope<'a> {
    context: &'a Arc<ResolutionContext>,
    protection: &'a mut RecursionProtection,
}

/// Parser for signature blobs.
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
    scope: Option<DecodeScope<'a>>,
}

impl<'a> SignatureParser<'a> {
    /// Creates a standalone parser over `data`; embedded tokens are not
    /// followed.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
            scope: None,
        }
    }

    /// Creates a context-bound parser: `TypeSpec` tokens in the grammar are
    /// resolved through `context` and decoded within the caller's traversal
    /// set.
    #[must_use]
    pub fn with_context(
        data: &'a [u8],
        context: &'a Arc<ResolutionContext>,
        protection: &'a mut RecursionProtection,
    ) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
            scope: Some(DecodeScope {
                context,
                protection,
            }),
        }
    }

    /// Reads a `TypeDefOrRef` coded token and, in context-bound mode, pulls
    /// the decode of a referenced `TypeSpec` into the current request.
    ///
    /// A token already traversed in this request is returned as-is without
    /// recursing; the node then carries the raw token and the cycle ends.
    fn read_type_def_or_ref(&mut self) -> Result<Token> {
        let token = self.parser.read_compressed_token()?;

        if token.table_id() == Some(TableId::TypeSpec) {
            if let Some(scope) = self.scope.as_mut() {
                if scope.protection.enter(token) {
                    if let Some(member) = scope.context.try_resolve(token)? {
                        if let Member::TypeSpec(spec) = member.as_ref() {
                            spec.signature_protected(scope.protection)?;
                        }
                    }
                }
            }
        }

        Ok(token)
    }

    /// Reads the run of `CMOD_OPT` / `CMOD_REQD` modifiers at the cursor.
    fn read_custom_modifiers(&mut self) -> Result<Vec<Token>> {
        let mut modifiers = Vec::new();

        while self.parser.has_more_data()
            && matches!(
                self.parser.peek_byte()?,
                ELEMENT_TYPE::CMOD_OPT | ELEMENT_TYPE::CMOD_REQD
            )
        {
            self.parser.advance()?;
            modifiers.push(self.read_type_def_or_ref()?);
        }

        Ok(modifiers)
    }

    /// Parses one type node at the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] past [`MAX_RECURSION_DEPTH`]
    /// nested nodes, [`crate::Error::Malformed`] on unknown element bytes and
    /// [`crate::Error::OutOfBounds`] on truncated data.
    pub fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(Error::RecursionLimit(self.depth));
        }

        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<TypeSignature> {
        let element = self.parser.read_le::<u8>()?;
        match element {
            ELEMENT_TYPE::VOID => Ok(TypeSignature::Void),
            ELEMENT_TYPE::BOOLEAN => Ok(TypeSignature::Boolean),
            ELEMENT_TYPE::CHAR => Ok(TypeSignature::Char),
            ELEMENT_TYPE::I1 => Ok(TypeSignature::I1),
            ELEMENT_TYPE::U1 => Ok(TypeSignature::U1),
            ELEMENT_TYPE::I2 => Ok(TypeSignature::I2),
            ELEMENT_TYPE::U2 => Ok(TypeSignature::U2),
            ELEMENT_TYPE::I4 => Ok(TypeSignature::I4),
            ELEMENT_TYPE::U4 => Ok(TypeSignature::U4),
            ELEMENT_TYPE::I8 => Ok(TypeSignature::I8),
            ELEMENT_TYPE::U8 => Ok(TypeSignature::U8),
            ELEMENT_TYPE::R4 => Ok(TypeSignature::R4),
            ELEMENT_TYPE::R8 => Ok(TypeSignature::R8),
            ELEMENT_TYPE::STRING => Ok(TypeSignature::String),
            ELEMENT_TYPE::OBJECT => Ok(TypeSignature::Object),
            ELEMENT_TYPE::I => Ok(TypeSignature::I),
            ELEMENT_TYPE::U => Ok(TypeSignature::U),
            ELEMENT_TYPE::TYPEDBYREF => Ok(TypeSignature::TypedByRef),
            ELEMENT_TYPE::CLASS => Ok(TypeSignature::Class(self.read_type_def_or_ref()?)),
            ELEMENT_TYPE::VALUETYPE => Ok(TypeSignature::ValueType(self.read_type_def_or_ref()?)),
            ELEMENT_TYPE::PTR => {
                let modifiers = self.read_custom_modifiers()?;
                Ok(TypeSignature::Ptr(SignaturePointer {
                    modifiers,
                    base: Box::new(self.parse_type()?),
                }))
            }
            ELEMENT_TYPE::BYREF => Ok(TypeSignature::ByRef(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::PINNED => Ok(TypeSignature::Pinned(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::BOXED => Ok(TypeSignature::Boxed(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::SZARRAY => {
                let modifiers = self.read_custom_modifiers()?;
                Ok(TypeSignature::SzArray(SignatureSzArray {
                    modifiers,
                    base: Box::new(self.parse_type()?),
                }))
            }
            ELEMENT_TYPE::ARRAY => {
                let base = self.parse_type()?;
                let rank = self.parser.read_compressed_uint()?;

                let num_sizes = self.parser.read_compressed_uint()?;
                let mut dimensions = Vec::with_capacity(num_sizes as usize);
                for _ in 0..num_sizes {
                    dimensions.push(ArrayDimension {
                        size: Some(self.parser.read_compressed_uint()?),
                        lower_bound: None,
                    });
                }

                let num_bounds = self.parser.read_compressed_uint()?;
                for index in 0..num_bounds as usize {
                    let bound = self.parser.read_compressed_uint()?;
                    if index >= dimensions.len() {
                        dimensions.push(ArrayDimension::default());
                    }
                    dimensions[index].lower_bound = Some(bound);
                }

                Ok(TypeSignature::Array(SignatureArray {
                    base: Box::new(base),
                    rank,
                    dimensions,
                }))
            }
            ELEMENT_TYPE::GENERICINST => {
                let base = self.parse_type()?;
                let count = self.parser.read_compressed_uint()?;

                let mut args = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    args.push(self.parse_type()?);
                }

                Ok(TypeSignature::GenericInst(Box::new(base), args))
            }
            ELEMENT_TYPE::VAR => Ok(TypeSignature::GenericParamType(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::MVAR => Ok(TypeSignature::GenericParamMethod(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::FNPTR => Ok(TypeSignature::FnPtr(Box::new(
                self.parse_method_signature()?,
            ))),
            _ => Err(malformed_error!("Unknown element type - {:#04x}", element)),
        }
    }

    /// Parses a full type specification blob: exactly one type node.
    ///
    /// # Errors
    /// Same conditions as [`SignatureParser::parse_type`].
    pub fn parse_type_spec_signature(&mut self) -> Result<SignatureTypeSpec> {
        Ok(SignatureTypeSpec {
            base: self.parse_type()?,
        })
    }

    fn parse_param(&mut self) -> Result<SignatureParameter> {
        let modifiers = self.read_custom_modifiers()?;

        let by_ref = self.parser.peek_byte()? == ELEMENT_TYPE::BYREF;
        if by_ref {
            self.parser.advance()?;
        }

        Ok(SignatureParameter {
            modifiers,
            by_ref,
            base: self.parse_type()?,
        })
    }

    /// Parses a method signature (II.23.2.1): calling convention byte,
    /// optional generic parameter count, parameter count, return type and
    /// parameters. A `SENTINEL` byte splits declared parameters from varargs.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown calling convention,
    /// plus the conditions of [`SignatureParser::parse_type`].
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let header = self.parser.read_le::<u8>()?;

        let mut signature = SignatureMethod {
            has_this: header & CALLING_CONVENTION::HASTHIS != 0,
            explicit_this: header & CALLING_CONVENTION::EXPLICITTHIS != 0,
            default: false,
            ..SignatureMethod::default()
        };

        match header & 0x0F {
            CALLING_CONVENTION::DEFAULT => signature.default = true,
            CALLING_CONVENTION::C => signature.cdecl = true,
            CALLING_CONVENTION::STDCALL => signature.stdcall = true,
            CALLING_CONVENTION::THISCALL => signature.thiscall = true,
            CALLING_CONVENTION::FASTCALL => signature.fastcall = true,
            CALLING_CONVENTION::VARARG => signature.vararg = true,
            _ => {
                return Err(malformed_error!(
                    "Invalid calling convention - {:#04x}",
                    header
                ))
            }
        }

        if header & CALLING_CONVENTION::GENERIC != 0 {
            signature.param_count_generic = self.parser.read_compressed_uint()?;
        }

        signature.param_count = self.parser.read_compressed_uint()?;
        signature.return_type = self.parse_param()?;

        let mut past_sentinel = false;
        for _ in 0..signature.param_count {
            if !past_sentinel
                && self.parser.has_more_data()
                && self.parser.peek_byte()? == ELEMENT_TYPE::SENTINEL
            {
                self.parser.advance()?;
                past_sentinel = true;
            }

            let param = self.parse_param()?;
            if past_sentinel {
                signature.varargs.push(param);
            } else {
                signature.params.push(param);
            }
        }

        Ok(signature)
    }

    /// Parses a local variable signature (II.23.2.6).
    ///
    /// The leading attribute byte is consumed and kept as data; it is not
    /// validated here, and re-serialization will emit the `LOCAL_SIG`
    /// constant regardless of its value.
    ///
    /// # Errors
    /// Same conditions as [`SignatureParser::parse_type`].
    pub fn parse_local_var_signature(&mut self) -> Result<LocalVariableSignature> {
        let attributes = self.parser.read_le::<u8>()?;
        let count = self.parser.read_compressed_uint()?;

        let mut locals = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut local = SignatureLocalVariable {
                modifiers: Vec::new(),
                is_byref: false,
                is_pinned: false,
                base: TypeSignature::Void,
            };

            loop {
                match self.parser.peek_byte()? {
                    ELEMENT_TYPE::CMOD_OPT | ELEMENT_TYPE::CMOD_REQD => {
                        self.parser.advance()?;
                        local.modifiers.push(self.read_type_def_or_ref()?);
                    }
                    ELEMENT_TYPE::PINNED => {
                        self.parser.advance()?;
                        local.is_pinned = true;
                    }
                    ELEMENT_TYPE::BYREF => {
                        self.parser.advance()?;
                        local.is_byref = true;
                    }
                    _ => break,
                }
            }

            local.base = self.parse_type()?;
            locals.push(local);
        }

        Ok(LocalVariableSignature { attributes, locals })
    }

    fn read_serialized_type(&mut self) -> Result<SerializedType> {
        let tag = self.parser.read_le::<u8>()?;
        match tag {
            SERIALIZATION_TYPE::BOOLEAN => Ok(SerializedType::Bool),
            SERIALIZATION_TYPE::CHAR => Ok(SerializedType::Char),
            SERIALIZATION_TYPE::I1 => Ok(SerializedType::I1),
            SERIALIZATION_TYPE::U1 => Ok(SerializedType::U1),
            SERIALIZATION_TYPE::I2 => Ok(SerializedType::I2),
            SERIALIZATION_TYPE::U2 => Ok(SerializedType::U2),
            SERIALIZATION_TYPE::I4 => Ok(SerializedType::I4),
            SERIALIZATION_TYPE::U4 => Ok(SerializedType::U4),
            SERIALIZATION_TYPE::I8 => Ok(SerializedType::I8),
            SERIALIZATION_TYPE::U8 => Ok(SerializedType::U8),
            SERIALIZATION_TYPE::R4 => Ok(SerializedType::R4),
            SERIALIZATION_TYPE::R8 => Ok(SerializedType::R8),
            SERIALIZATION_TYPE::STRING => Ok(SerializedType::String),
            SERIALIZATION_TYPE::TYPE => Ok(SerializedType::Type),
            SERIALIZATION_TYPE::TAGGED_OBJECT => Ok(SerializedType::TaggedObject),
            SERIALIZATION_TYPE::ENUM => match self.parser.read_prefixed_string_utf8()? {
                Some(name) => Ok(SerializedType::Enum(name)),
                None => Err(malformed_error!("Enum field type without a type name")),
            },
            SERIALIZATION_TYPE::SZARRAY => Ok(SerializedType::SzArray(Box::new(
                self.read_serialized_type()?,
            ))),
            _ => Err(malformed_error!(
                "Unknown serialization type - {:#04x}",
                tag
            )),
        }
    }

    fn read_char_value(&mut self) -> Result<char> {
        let unit = self.parser.read_le::<u16>()?;
        match char::from_u32(u32::from(unit)) {
            Some(value) => Ok(value),
            None => Err(malformed_error!("Invalid character value - {:#06x}", unit)),
        }
    }

    fn read_serialized_value(&mut self, arg_type: &SerializedType) -> Result<CustomAttributeArgument> {
        match arg_type {
            SerializedType::Bool => Ok(CustomAttributeArgument::Bool(
                self.parser.read_le::<u8>()? != 0,
            )),
            SerializedType::Char => Ok(CustomAttributeArgument::Char(self.read_char_value()?)),
            SerializedType::I1 => Ok(CustomAttributeArgument::I1(self.parser.read_le::<i8>()?)),
            SerializedType::U1 => Ok(CustomAttributeArgument::U1(self.parser.read_le::<u8>()?)),
            SerializedType::I2 => Ok(CustomAttributeArgument::I2(self.parser.read_le::<i16>()?)),
            SerializedType::U2 => Ok(CustomAttributeArgument::U2(self.parser.read_le::<u16>()?)),
            SerializedType::I4 => Ok(CustomAttributeArgument::I4(self.parser.read_le::<i32>()?)),
            SerializedType::U4 => Ok(CustomAttributeArgument::U4(self.parser.read_le::<u32>()?)),
            SerializedType::I8 => Ok(CustomAttributeArgument::I8(self.parser.read_le::<i64>()?)),
            SerializedType::U8 => Ok(CustomAttributeArgument::U8(self.parser.read_le::<u64>()?)),
            SerializedType::R4 => Ok(CustomAttributeArgument::R4(self.parser.read_le::<f32>()?)),
            SerializedType::R8 => Ok(CustomAttributeArgument::R8(self.parser.read_le::<f64>()?)),
            SerializedType::String => Ok(CustomAttributeArgument::String(
                self.parser.read_prefixed_string_utf8()?,
            )),
            SerializedType::Type => Ok(CustomAttributeArgument::Type(
                self.parser.read_prefixed_string_utf8()?,
            )),
            SerializedType::TaggedObject => {
                let inner = self.read_serialized_type()?;
                let value = self.read_serialized_value(&inner)?;
                Ok(CustomAttributeArgument::Object(inner, Box::new(value)))
            }
            // The underlying type would need resolving the enum definition;
            // assume the standard 32-bit layout.
            SerializedType::Enum(_) => {
                Ok(CustomAttributeArgument::I4(self.parser.read_le::<i32>()?))
            }
            SerializedType::SzArray(element) => {
                let count = self.parser.read_le::<u32>()?;
                if count == u32::MAX {
                    return Ok(CustomAttributeArgument::Array(None));
                }

                let mut values = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    values.push(self.read_serialized_value(element)?);
                }
                Ok(CustomAttributeArgument::Array(Some(values)))
            }
        }
    }

    /// Reads one fixed argument, its shape dictated by the constructor's
    /// parameter type.
    fn read_fixed_arg(&mut self, param_type: &TypeSignature) -> Result<CustomAttributeArgument> {
        match param_type {
            TypeSignature::Boolean => Ok(CustomAttributeArgument::Bool(
                self.parser.read_le::<u8>()? != 0,
            )),
            TypeSignature::Char => Ok(CustomAttributeArgument::Char(self.read_char_value()?)),
            TypeSignature::I1 => Ok(CustomAttributeArgument::I1(self.parser.read_le::<i8>()?)),
            TypeSignature::U1 => Ok(CustomAttributeArgument::U1(self.parser.read_le::<u8>()?)),
            TypeSignature::I2 => Ok(CustomAttributeArgument::I2(self.parser.read_le::<i16>()?)),
            TypeSignature::U2 => Ok(CustomAttributeArgument::U2(self.parser.read_le::<u16>()?)),
            TypeSignature::I4 => Ok(CustomAttributeArgument::I4(self.parser.read_le::<i32>()?)),
            TypeSignature::U4 => Ok(CustomAttributeArgument::U4(self.parser.read_le::<u32>()?)),
            TypeSignature::I8 => Ok(CustomAttributeArgument::I8(self.parser.read_le::<i64>()?)),
            TypeSignature::U8 => Ok(CustomAttributeArgument::U8(self.parser.read_le::<u64>()?)),
            TypeSignature::R4 => Ok(CustomAttributeArgument::R4(self.parser.read_le::<f32>()?)),
            TypeSignature::R8 => Ok(CustomAttributeArgument::R8(self.parser.read_le::<f64>()?)),
            TypeSignature::String => Ok(CustomAttributeArgument::String(
                self.parser.read_prefixed_string_utf8()?,
            )),
            TypeSignature::Object => {
                let inner = self.read_serialized_type()?;
                let value = self.read_serialized_value(&inner)?;
                Ok(CustomAttributeArgument::Object(inner, Box::new(value)))
            }
            // The only class type legal as an attribute parameter is
            // System.Type, stored as its assembly-qualified name.
            TypeSignature::Class(_) => Ok(CustomAttributeArgument::Type(
                self.parser.read_prefixed_string_utf8()?,
            )),
            // An unresolved value type parameter is an enum; assume the
            // standard 32-bit underlying layout.
            TypeSignature::ValueType(_) => {
                Ok(CustomAttributeArgument::I4(self.parser.read_le::<i32>()?))
            }
            TypeSignature::SzArray(array) => {
                let count = self.parser.read_le::<u32>()?;
                if count == u32::MAX {
                    return Ok(CustomAttributeArgument::Array(None));
                }

                let mut values = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    values.push(self.read_fixed_arg(&array.base)?);
                }
                Ok(CustomAttributeArgument::Array(Some(values)))
            }
            _ => Err(malformed_error!(
                "Unsupported custom attribute parameter type - {:#04x}",
                param_type.element_type()
            )),
        }
    }

    /// Parses a custom attribute blob (II.23.3).
    ///
    /// Fixed arguments are shaped by the constructor's parameter list; when
    /// `ctor` is `None` the fixed argument section cannot be interpreted and
    /// decoding continues with zero fixed arguments. A blob ending right
    /// after the fixed arguments is read as having no named arguments.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] when the two-byte prolog is
    /// not `0x0001`, or [`crate::Error::Malformed`] on unknown tags inside
    /// the argument sections.
    pub fn parse_custom_attribute(
        &mut self,
        ctor: Option<&SignatureMethod>,
    ) -> Result<CustomAttributeSignature> {
        let prolog = self.parser.read_le::<u16>()?;
        if prolog != 0x0001 {
            return Err(Error::InvalidArgument(format!(
                "Invalid custom attribute prolog: {prolog:#06x}"
            )));
        }

        let mut signature = CustomAttributeSignature::default();

        if let Some(ctor) = ctor {
            for param in &ctor.params {
                signature.fixed_args.push(self.read_fixed_arg(&param.base)?);
            }
        }

        // Writers may omit the named argument section entirely.
        if self.parser.remaining() < 2 {
            return Ok(signature);
        }

        let named_count = self.parser.read_le::<u16>()?;
        for _ in 0..named_count {
            let member_tag = self.parser.read_le::<u8>()?;
            let is_field = match member_tag {
                SERIALIZATION_TYPE::FIELD => true,
                SERIALIZATION_TYPE::PROPERTY => false,
                _ => {
                    return Err(malformed_error!(
                        "Invalid named argument member tag - {:#04x}",
                        member_tag
                    ))
                }
            };

            let arg_type = self.read_serialized_type()?;
            let Some(name) = self.parser.read_prefixed_string_utf8()? else {
                return Err(malformed_error!("Named argument without a name"));
            };
            let value = self.read_serialized_value(&arg_type)?;

            signature.named_args.push(CustomAttributeNamedArgument {
                is_field,
                arg_type,
                name,
                value,
            });
        }

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::types::SIGNATURE_HEADER;

    #[test]
    fn szarray_of_string() {
        let mut parser = SignatureParser::new(&[0x1D, 0x0E]);
        let signature = parser.parse_type().unwrap();

        let TypeSignature::SzArray(array) = &signature else {
            panic!("expected SzArray, got {signature:?}");
        };
        assert_eq!(*array.base, TypeSignature::String);
        assert!(array.modifiers.is_empty());
        assert!(!signature.is_value_type());
        assert_eq!(signature.name(), "String[]");
    }

    #[test]
    fn class_and_valuetype_tokens() {
        // CLASS, TypeRef rid 0x0D
        let mut parser = SignatureParser::new(&[0x12, 0x35]);
        assert_eq!(
            parser.parse_type().unwrap(),
            TypeSignature::Class(Token::new(0x0100000D))
        );

        // VALUETYPE, TypeSpec rid 0x10
        let mut parser = SignatureParser::new(&[0x11, 0x42]);
        assert_eq!(
            parser.parse_type().unwrap(),
            TypeSignature::ValueType(Token::new(0x1B000010))
        );
    }

    #[test]
    fn generic_instantiation() {
        // GENERICINST CLASS <token> 2 I4 STRING
        let mut parser = SignatureParser::new(&[0x15, 0x12, 0x05, 0x02, 0x08, 0x0E]);
        let TypeSignature::GenericInst(base, args) = parser.parse_type().unwrap() else {
            panic!("expected GenericInst");
        };

        assert_eq!(*base, TypeSignature::Class(Token::new(0x01000001)));
        assert_eq!(args, vec![TypeSignature::I4, TypeSignature::String]);
    }

    #[test]
    fn multi_dimensional_array() {
        // ARRAY I4 rank=2 sizes=[10] bounds=[1,3]
        let mut parser = SignatureParser::new(&[0x14, 0x08, 0x02, 0x01, 0x0A, 0x02, 0x01, 0x03]);
        let TypeSignature::Array(array) = parser.parse_type().unwrap() else {
            panic!("expected Array");
        };

        assert_eq!(*array.base, TypeSignature::I4);
        assert_eq!(array.rank, 2);
        assert_eq!(array.dimensions.len(), 2);
        assert_eq!(array.dimensions[0].size, Some(10));
        assert_eq!(array.dimensions[0].lower_bound, Some(1));
        assert_eq!(array.dimensions[1].size, None);
        assert_eq!(array.dimensions[1].lower_bound, Some(3));
    }

    #[test]
    fn recursion_limit_on_deep_nesting() {
        // A long chain of BYREF bytes never reaches a terminal node
        let data = vec![ELEMENT_TYPE::BYREF; MAX_RECURSION_DEPTH + 10];
        let mut parser = SignatureParser::new(&data);

        assert!(matches!(
            parser.parse_type(),
            Err(Error::RecursionLimit(_))
        ));
    }

    #[test]
    fn unknown_element_type() {
        let mut parser = SignatureParser::new(&[0xF0]);
        assert!(matches!(parser.parse_type(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn instance_method_with_params() {
        // HASTHIS|DEFAULT, 2 params, returns void: (string, int32) -> void
        let mut parser = SignatureParser::new(&[0x20, 0x02, 0x01, 0x0E, 0x08]);
        let signature = parser.parse_method_signature().unwrap();

        assert!(signature.has_this);
        assert!(signature.default);
        assert_eq!(signature.param_count, 2);
        assert_eq!(signature.return_type.base, TypeSignature::Void);
        assert_eq!(signature.params.len(), 2);
        assert_eq!(signature.params[0].base, TypeSignature::String);
        assert_eq!(signature.params[1].base, TypeSignature::I4);
        assert!(signature.varargs.is_empty());
    }

    #[test]
    fn vararg_method_splits_at_sentinel() {
        // VARARG, 3 params, void(i4, ..., string, object)
        let mut parser =
            SignatureParser::new(&[0x05, 0x03, 0x01, 0x08, 0x41, 0x0E, 0x1C]);
        let signature = parser.parse_method_signature().unwrap();

        assert!(signature.vararg);
        assert_eq!(signature.params.len(), 1);
        assert_eq!(signature.varargs.len(), 2);
        assert_eq!(signature.varargs[0].base, TypeSignature::String);
        assert_eq!(signature.varargs[1].base, TypeSignature::Object);
    }

    #[test]
    fn generic_method_reads_generic_count() {
        // GENERIC|DEFAULT, 1 generic param, 1 param, MVAR 0 -> void
        let mut parser = SignatureParser::new(&[0x10, 0x01, 0x01, 0x01, 0x1E, 0x00]);
        let signature = parser.parse_method_signature().unwrap();

        assert_eq!(signature.param_count_generic, 1);
        assert_eq!(signature.params[0].base, TypeSignature::GenericParamMethod(0));
    }

    #[test]
    fn local_var_signature_keeps_attribute_byte() {
        // Attribute byte is data, not validated
        let mut parser = SignatureParser::new(&[0x99, 0x01, 0x08]);
        let signature = parser.parse_local_var_signature().unwrap();

        assert_eq!(signature.attributes, 0x99);
        assert_eq!(signature.locals.len(), 1);
        assert_eq!(signature.locals[0].base, TypeSignature::I4);
    }

    #[test]
    fn local_var_pinned_and_byref() {
        let mut parser = SignatureParser::new(&[
            SIGNATURE_HEADER::LOCAL_SIG,
            0x02,
            ELEMENT_TYPE::PINNED,
            0x1C,
            ELEMENT_TYPE::BYREF,
            0x08,
        ]);
        let signature = parser.parse_local_var_signature().unwrap();

        assert!(signature.locals[0].is_pinned);
        assert_eq!(signature.locals[0].base, TypeSignature::Object);
        assert!(signature.locals[1].is_byref);
        assert_eq!(signature.locals[1].base, TypeSignature::I4);
    }

    #[test]
    fn custom_attribute_minimal_blob() {
        // Prolog only, zero named arguments, no constructor available
        let mut parser = SignatureParser::new(&[0x01, 0x00, 0x00, 0x00]);
        let signature = parser.parse_custom_attribute(None).unwrap();

        assert!(signature.fixed_args.is_empty());
        assert!(signature.named_args.is_empty());
    }

    #[test]
    fn custom_attribute_rejects_bad_prolog() {
        let mut parser = SignatureParser::new(&[0x02, 0x00, 0x00, 0x00]);
        assert!(matches!(
            parser.parse_custom_attribute(None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn custom_attribute_missing_ctor_skips_fixed_args() {
        // Fixed argument bytes are present, but without the constructor the
        // section cannot be interpreted
        let mut parser = SignatureParser::new(&[0x01, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let signature = parser.parse_custom_attribute(None).unwrap();

        assert!(signature.fixed_args.is_empty());
    }

    #[test]
    fn custom_attribute_fixed_args_follow_ctor() {
        let ctor = SignatureMethod {
            has_this: true,
            param_count: 2,
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
            ],
            ..SignatureMethod::default()
        };

        let mut data = vec![0x01, 0x00];
        data.extend_from_slice(&42i32.to_le_bytes());
        data.push(0x02);
        data.extend_from_slice(b"hi");
        data.extend_from_slice(&[0x00, 0x00]);

        let mut parser = SignatureParser::new(&data);
        let signature = parser.parse_custom_attribute(Some(&ctor)).unwrap();

        assert_eq!(signature.fixed_args.len(), 2);
        assert_eq!(signature.fixed_args[0], CustomAttributeArgument::I4(42));
        assert_eq!(
            signature.fixed_args[1],
            CustomAttributeArgument::String(Some("hi".to_string()))
        );
    }

    #[test]
    fn custom_attribute_truncated_after_fixed_args() {
        let ctor = SignatureMethod {
            param_count: 1,
            params: vec![SignatureParameter {
                modifiers: Vec::new(),
                by_ref: false,
                base: TypeSignature::U1,
            }],
            ..SignatureMethod::default()
        };

        // Blob ends right after the fixed argument; no named section
        let data = [0x01, 0x00, 0x2A];
        let mut parser = SignatureParser::new(&data);
        let signature = parser.parse_custom_attribute(Some(&ctor)).unwrap();

        assert_eq!(signature.fixed_args[0], CustomAttributeArgument::U1(0x2A));
        assert!(signature.named_args.is_empty());
    }

    #[test]
    fn custom_attribute_named_field() {
        // 1 named arg: field "Flag" of type bool, value true
        let mut data = vec![0x01, 0x00, 0x01, 0x00];
        data.push(SERIALIZATION_TYPE::FIELD);
        data.push(SERIALIZATION_TYPE::BOOLEAN);
        data.push(0x04);
        data.extend_from_slice(b"Flag");
        data.push(0x01);

        let mut parser = SignatureParser::new(&data);
        let signature = parser.parse_custom_attribute(None).unwrap();

        assert_eq!(signature.named_args.len(), 1);
        let named = &signature.named_args[0];
        assert!(named.is_field);
        assert_eq!(named.name, "Flag");
        assert_eq!(named.arg_type, SerializedType::Bool);
        assert_eq!(named.value, CustomAttributeArgument::Bool(true));
    }

    #[test]
    fn custom_attribute_named_enum_property() {
        // Property "Level" of enum type "My.Level", value 3
        let mut data = vec![0x01, 0x00, 0x01, 0x00];
        data.push(SERIALIZATION_TYPE::PROPERTY);
        data.push(SERIALIZATION_TYPE::ENUM);
        data.push(0x08);
        data.extend_from_slice(b"My.Level");
        data.push(0x05);
        data.extend_from_slice(b"Level");
        data.extend_from_slice(&3i32.to_le_bytes());

        let mut parser = SignatureParser::new(&data);
        let signature = parser.parse_custom_attribute(None).unwrap();

        let named = &signature.named_args[0];
        assert!(!named.is_field);
        assert_eq!(named.arg_type, SerializedType::Enum("My.Level".to_string()));
        assert_eq!(named.value, CustomAttributeArgument::I4(3));
    }

    #[test]
    fn tagged_object_fixed_arg() {
        let ctor = SignatureMethod {
            param_count: 1,
            params: vec![SignatureParameter {
                modifiers: Vec::new(),
                by_ref: false,
                base: TypeSignature::Object,
            }],
            ..SignatureMethod::default()
        };

        // Boxed u1 value 7
        let data = [0x01, 0x00, SERIALIZATION_TYPE::U1, 0x07, 0x00, 0x00];
        let mut parser = SignatureParser::new(&data);
        let signature = parser.parse_custom_attribute(Some(&ctor)).unwrap();

        assert_eq!(
            signature.fixed_args[0],
            CustomAttributeArgument::Object(
                SerializedType::U1,
                Box::new(CustomAttributeArgument::U1(7))
            )
        );
    }

    #[test]
    fn null_array_fixed_arg() {
        let ctor = SignatureMethod {
            param_count: 1,
            params: vec![SignatureParameter {
                modifiers: Vec::new(),
                by_ref: false,
                base: TypeSignature::SzArray(SignatureSzArray {
                    modifiers: Vec::new(),
                    base: Box::new(TypeSignature::I4),
                }),
            }],
            ..SignatureMethod::default()
        };

        let data = [0x01, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00];
        let mut parser = SignatureParser::new(&data);
        let signature = parser.parse_custom_attribute(Some(&ctor)).unwrap();

        assert_eq!(signature.fixed_args[0], CustomAttributeArgument::Array(None));
    }
}
