//! The signature type tree: decoded views over `#Blob` signature payloads.

use crate::metadata::token::Token;

/// `ELEMENT_TYPE` discriminator constants (II.23.1.16).
///
/// The tag byte identifying which signature grammar production follows.
#[allow(non_snake_case, missing_docs)]
pub mod ELEMENT_TYPE {
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    // Followed by type
    pub const PTR: u8 = 0x0F;
    // Followed by type
    pub const BYREF: u8 = 0x10;
    // Followed by TypeDefOrRef coded token
    pub const VALUETYPE: u8 = 0x11;
    // Followed by TypeDefOrRef coded token
    pub const CLASS: u8 = 0x12;
    // Generic parameter in a generic type definition, by index
    pub const VAR: u8 = 0x13;
    // type rank boundsCount bound1 ... loCount lo1 ...
    pub const ARRAY: u8 = 0x14;
    // Generic type instantiation: type type-arg-count type-1 ... type-n
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    // System.IntPtr
    pub const I: u8 = 0x18;
    // System.UIntPtr
    pub const U: u8 = 0x19;
    // Followed by full method signature
    pub const FNPTR: u8 = 0x1B;
    // System.Object
    pub const OBJECT: u8 = 0x1C;
    // Single-dim array with 0 lower bound
    pub const SZARRAY: u8 = 0x1D;
    // Generic parameter in a generic method definition, by index
    pub const MVAR: u8 = 0x1E;
    // Required modifier, followed by a TypeDefOrRef coded token
    pub const CMOD_REQD: u8 = 0x1F;
    // Optional modifier, followed by a TypeDefOrRef coded token
    pub const CMOD_OPT: u8 = 0x20;
    // Sentinel for vararg method signature
    pub const SENTINEL: u8 = 0x41;
    // Denotes a local variable pointing at a pinned object
    pub const PINNED: u8 = 0x45;
    // Boxed object, used in custom attribute blobs
    pub const BOXED: u8 = 0x51;
}

/// Leading bytes of non-type signature blobs.
#[allow(non_snake_case, missing_docs)]
pub mod SIGNATURE_HEADER {
    pub const FIELD: u8 = 0x06;
    pub const LOCAL_SIG: u8 = 0x07;
}

/// Calling convention bits of a method signature's first byte (II.23.2.1).
#[allow(non_snake_case, missing_docs)]
pub mod CALLING_CONVENTION {
    pub const DEFAULT: u8 = 0x0;
    pub const C: u8 = 0x1;
    pub const STDCALL: u8 = 0x2;
    pub const THISCALL: u8 = 0x3;
    pub const FASTCALL: u8 = 0x4;
    pub const VARARG: u8 = 0x5;
    pub const GENERIC: u8 = 0x10;
    pub const HASTHIS: u8 = 0x20;
    pub const EXPLICITTHIS: u8 = 0x40;
}

/// `CorSerializationType` tags used inside custom attribute blobs (II.23.3).
#[allow(non_snake_case, missing_docs)]
pub mod SERIALIZATION_TYPE {
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const SZARRAY: u8 = 0x1D;
    pub const TYPE: u8 = 0x50;
    pub const TAGGED_OBJECT: u8 = 0x51;
    pub const ENUM: u8 = 0x55;
    pub const FIELD: u8 = 0x53;
    pub const PROPERTY: u8 = 0x54;
}

/// One dimension of a multi-dimensional array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayDimension {
    /// Declared size, if the signature carries one
    pub size: Option<u32>,
    /// Declared lower bound, if the signature carries one
    pub lower_bound: Option<u32>,
}

/// A parsed type signature node.
///
/// A closed tagged variant: each variant either terminates (primitive or
/// class reference by token) or wraps nested signature nodes, forming a tree
/// that is acyclic in data. Cycles become reachable only through member
/// resolution, when a `Class`/`ValueType` token names a type specification
/// whose payload loops back.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSignature {
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// System.String
    String,
    /// System.Object
    Object,
    /// signed integer, sized to the executing platform
    I,
    /// unsigned integer, sized to the executing platform
    U,
    /// Typed reference, carries both a value and its type
    TypedByRef,
    /// Reference type named by a `TypeDefOrRef` coded token
    Class(Token),
    /// Value type named by a `TypeDefOrRef` coded token
    ValueType(Token),
    /// A pointer to a type
    Ptr(SignaturePointer),
    /// Type passed by reference
    ByRef(Box<TypeSignature>),
    /// A pinned local variable type
    Pinned(Box<TypeSignature>),
    /// A boxed value, used in custom attribute blobs
    Boxed(Box<TypeSignature>),
    /// Single dimension array with zero lower bound
    SzArray(SignatureSzArray),
    /// Multi-dimensional array
    Array(SignatureArray),
    /// Generic type and its arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// Generic type parameter, index into the declaring type's parameters
    GenericParamType(u32),
    /// Generic method parameter, index into the declaring method's parameters
    GenericParamMethod(u32),
    /// Function pointer with a full method signature
    FnPtr(Box<SignatureMethod>),
}

/// A single dimension array with zero lower bound
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureSzArray {
    /// Custom modifier tokens preceding the element type
    pub modifiers: Vec<Token>,
    /// The element type
    pub base: Box<TypeSignature>,
}

/// A multi-dimensional array
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureArray {
    /// The element type
    pub base: Box<TypeSignature>,
    /// The number of dimensions
    pub rank: u32,
    /// Declared dimensions; may be fewer than `rank`, in order from dimension 0
    pub dimensions: Vec<ArrayDimension>,
}

/// A pointer to a type
#[derive(Debug, Clone, PartialEq)]
pub struct SignaturePointer {
    /// Custom modifier tokens preceding the pointee type
    pub modifiers: Vec<Token>,
    /// The type pointed to
    pub base: Box<TypeSignature>,
}

/// Parameter with optional custom modifiers (II.23.2.10)
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParameter {
    /// Custom modifier tokens of the parameter
    pub modifiers: Vec<Token>,
    /// Parameter is passed by reference
    pub by_ref: bool,
    /// The type of the parameter
    pub base: TypeSignature,
}

/// A method signature (II.23.2.1)
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureMethod {
    /// Instance method, encodes the keyword `instance`
    pub has_this: bool,
    /// Explicit `this` parameter
    pub explicit_this: bool,
    /// Managed default calling convention
    pub default: bool,
    /// Variable argument list
    pub vararg: bool,
    /// Native `cdecl` calling convention
    pub cdecl: bool,
    /// Native `stdcall` calling convention
    pub stdcall: bool,
    /// Native `thiscall` calling convention
    pub thiscall: bool,
    /// Native `fastcall` calling convention
    pub fastcall: bool,
    /// Number of generic parameters the method declares
    pub param_count_generic: u32,
    /// Declared parameter count, covers `params` and `varargs`
    pub param_count: u32,
    /// The return type
    pub return_type: SignatureParameter,
    /// The declared parameters
    pub params: Vec<SignatureParameter>,
    /// The vararg parameters following the sentinel
    pub varargs: Vec<SignatureParameter>,
}

impl Default for SignatureMethod {
    fn default() -> Self {
        SignatureMethod {
            has_this: false,
            explicit_this: false,
            default: true,
            vararg: false,
            cdecl: false,
            stdcall: false,
            thiscall: false,
            fastcall: false,
            param_count_generic: 0,
            param_count: 0,
            return_type: SignatureParameter {
                modifiers: Vec::new(),
                by_ref: false,
                base: TypeSignature::Void,
            },
            params: Vec::new(),
            varargs: Vec::new(),
        }
    }
}

/// A type specification signature (II.23.2.14): one type node
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureTypeSpec {
    /// The described type
    pub base: TypeSignature,
}

/// One local variable in a local variable signature
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureLocalVariable {
    /// Custom modifier tokens
    pub modifiers: Vec<Token>,
    /// Passed by reference
    pub is_byref: bool,
    /// Pinned in place for the garbage collector
    pub is_pinned: bool,
    /// The variable type
    pub base: TypeSignature,
}

/// A local variable signature (II.23.2.6).
///
/// The attribute byte is kept as read for inspection, but serialization
/// always emits the `LOCAL_SIG` constant `0x07` as the leading byte; the
/// attribute field is a protocol constant on the wire, not a round-tripped
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableSignature {
    /// The attribute byte as read from the blob
    pub attributes: u8,
    /// The local variables, in slot order
    pub locals: Vec<SignatureLocalVariable>,
}

impl Default for LocalVariableSignature {
    fn default() -> Self {
        LocalVariableSignature {
            attributes: SIGNATURE_HEADER::LOCAL_SIG,
            locals: Vec::new(),
        }
    }
}

/// The type of a named custom attribute argument as written on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedType {
    /// bool
    Bool,
    /// char, one UTF-16 code unit
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// SerString
    String,
    /// System.Type, written as its assembly-qualified name
    Type,
    /// Boxed value carrying its own type tag
    TaggedObject,
    /// Enum, named by its full type name
    Enum(String),
    /// Single dimension array of a nested serialized type
    SzArray(Box<SerializedType>),
}

/// A single custom attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// Boolean value
    Bool(bool),
    /// Character value (one UTF-16 code unit)
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// SerString; `None` is the null string
    String(Option<String>),
    /// Type reference by assembly-qualified name; `None` is the null type
    Type(Option<String>),
    /// Array of arguments; `None` is the null array
    Array(Option<Vec<CustomAttributeArgument>>),
    /// Boxed value: the wire type tag plus the value itself
    Object(SerializedType, Box<CustomAttributeArgument>),
}

/// A named argument (field or property) in a custom attribute
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeNamedArgument {
    /// Whether this names a field (`true`) or a property (`false`)
    pub is_field: bool,
    /// The wire type of the argument
    pub arg_type: SerializedType,
    /// Name of the field or property
    pub name: String,
    /// The argument value
    pub value: CustomAttributeArgument,
}

/// A custom attribute signature (II.23.3).
///
/// Fixed arguments follow the attribute constructor's declared parameter
/// list; named arguments carry their own explicit count and wire types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomAttributeSignature {
    /// Fixed arguments, in constructor parameter order
    pub fixed_args: Vec<CustomAttributeArgument>,
    /// Named arguments (fields and properties), in wire order
    pub named_args: Vec<CustomAttributeNamedArgument>,
}

impl TypeSignature {
    /// The wire discriminator of this node.
    #[must_use]
    pub fn element_type(&self) -> u8 {
        match self {
            TypeSignature::Void => ELEMENT_TYPE::VOID,
            TypeSignature::Boolean => ELEMENT_TYPE::BOOLEAN,
            TypeSignature::Char => ELEMENT_TYPE::CHAR,
            TypeSignature::I1 => ELEMENT_TYPE::I1,
            TypeSignature::U1 => ELEMENT_TYPE::U1,
            TypeSignature::I2 => ELEMENT_TYPE::I2,
            TypeSignature::U2 => ELEMENT_TYPE::U2,
            TypeSignature::I4 => ELEMENT_TYPE::I4,
            TypeSignature::U4 => ELEMENT_TYPE::U4,
            TypeSignature::I8 => ELEMENT_TYPE::I8,
            TypeSignature::U8 => ELEMENT_TYPE::U8,
            TypeSignature::R4 => ELEMENT_TYPE::R4,
            TypeSignature::R8 => ELEMENT_TYPE::R8,
            TypeSignature::String => ELEMENT_TYPE::STRING,
            TypeSignature::Object => ELEMENT_TYPE::OBJECT,
            TypeSignature::I => ELEMENT_TYPE::I,
            TypeSignature::U => ELEMENT_TYPE::U,
            TypeSignature::TypedByRef => ELEMENT_TYPE::TYPEDBYREF,
            TypeSignature::Class(_) => ELEMENT_TYPE::CLASS,
            TypeSignature::ValueType(_) => ELEMENT_TYPE::VALUETYPE,
            TypeSignature::Ptr(_) => ELEMENT_TYPE::PTR,
            TypeSignature::ByRef(_) => ELEMENT_TYPE::BYREF,
            TypeSignature::Pinned(_) => ELEMENT_TYPE::PINNED,
            TypeSignature::Boxed(_) => ELEMENT_TYPE::BOXED,
            TypeSignature::SzArray(_) => ELEMENT_TYPE::SZARRAY,
            TypeSignature::Array(_) => ELEMENT_TYPE::ARRAY,
            TypeSignature::GenericInst(_, _) => ELEMENT_TYPE::GENERICINST,
            TypeSignature::GenericParamType(_) => ELEMENT_TYPE::VAR,
            TypeSignature::GenericParamMethod(_) => ELEMENT_TYPE::MVAR,
            TypeSignature::FnPtr(_) => ELEMENT_TYPE::FNPTR,
        }
    }

    /// Display name, projected through nested nodes.
    ///
    /// Wrapper variants derive their name from the wrapped node (`String[]`,
    /// `Int32*`); token references display their token since the node itself
    /// carries no name data.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            TypeSignature::Void => "Void".to_string(),
            TypeSignature::Boolean => "Boolean".to_string(),
            TypeSignature::Char => "Char".to_string(),
            TypeSignature::I1 => "SByte".to_string(),
            TypeSignature::U1 => "Byte".to_string(),
            TypeSignature::I2 => "Int16".to_string(),
            TypeSignature::U2 => "UInt16".to_string(),
            TypeSignature::I4 => "Int32".to_string(),
            TypeSignature::U4 => "UInt32".to_string(),
            TypeSignature::I8 => "Int64".to_string(),
            TypeSignature::U8 => "UInt64".to_string(),
            TypeSignature::R4 => "Single".to_string(),
            TypeSignature::R8 => "Double".to_string(),
            TypeSignature::String => "String".to_string(),
            TypeSignature::Object => "Object".to_string(),
            TypeSignature::I => "IntPtr".to_string(),
            TypeSignature::U => "UIntPtr".to_string(),
            TypeSignature::TypedByRef => "TypedReference".to_string(),
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => token.to_string(),
            TypeSignature::Ptr(pointer) => format!("{}*", pointer.base.name()),
            TypeSignature::ByRef(base) => format!("{}&", base.name()),
            TypeSignature::Pinned(base) | TypeSignature::Boxed(base) => base.name(),
            TypeSignature::SzArray(array) => format!("{}[]", array.base.name()),
            TypeSignature::Array(array) => {
                format!("{}[{}]", array.base.name(), ",".repeat(array.rank.saturating_sub(1) as usize))
            }
            TypeSignature::GenericInst(base, args) => {
                let arguments: Vec<String> = args.iter().map(TypeSignature::name).collect();
                format!("{}<{}>", base.name(), arguments.join(","))
            }
            TypeSignature::GenericParamType(index) => format!("!{index}"),
            TypeSignature::GenericParamMethod(index) => format!("!!{index}"),
            TypeSignature::FnPtr(_) => "*fn".to_string(),
        }
    }

    /// Namespace, projected through nested nodes.
    ///
    /// Primitives live in `System`; token references and generic parameters
    /// have no namespace data on the node.
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
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
            | TypeSignature::TypedByRef => "System",
            TypeSignature::Ptr(pointer) => pointer.base.namespace(),
            TypeSignature::ByRef(base) | TypeSignature::Pinned(base) | TypeSignature::Boxed(base) => {
                base.namespace()
            }
            TypeSignature::SzArray(array) => array.base.namespace(),
            TypeSignature::Array(array) => array.base.namespace(),
            TypeSignature::GenericInst(base, _) => base.namespace(),
            _ => "",
        }
    }

    /// The first non-wrapper node, recursing through the wrapper variants.
    #[must_use]
    pub fn innermost(&self) -> &TypeSignature {
        match self {
            TypeSignature::Ptr(pointer) => pointer.base.innermost(),
            TypeSignature::ByRef(base) | TypeSignature::Pinned(base) | TypeSignature::Boxed(base) => {
                base.innermost()
            }
            TypeSignature::SzArray(array) => array.base.innermost(),
            TypeSignature::Array(array) => array.base.innermost(),
            TypeSignature::GenericInst(base, _) => base.innermost(),
            _ => self,
        }
    }

    /// Value-type classification.
    ///
    /// Primitives and explicit value types are value types; strings, objects,
    /// class references, arrays and pointers are not. Boxing always yields a
    /// reference, so a boxed node is never a value type.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            TypeSignature::Boolean
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
            | TypeSignature::I
            | TypeSignature::U
            | TypeSignature::TypedByRef
            | TypeSignature::ValueType(_) => true,
            TypeSignature::Pinned(base) => base.is_value_type(),
            TypeSignature::GenericInst(base, _) => base.is_value_type(),
            _ => false,
        }
    }
}

impl SerializedType {
    /// The wire tag of this serialized type.
    #[must_use]
    pub fn tag(&self) -> u8 {
        match self {
            SerializedType::Bool => SERIALIZATION_TYPE::BOOLEAN,
            SerializedType::Char => SERIALIZATION_TYPE::CHAR,
            SerializedType::I1 => SERIALIZATION_TYPE::I1,
            SerializedType::U1 => SERIALIZATION_TYPE::U1,
            SerializedType::I2 => SERIALIZATION_TYPE::I2,
            SerializedType::U2 => SERIALIZATION_TYPE::U2,
            SerializedType::I4 => SERIALIZATION_TYPE::I4,
            SerializedType::U4 => SERIALIZATION_TYPE::U4,
            SerializedType::I8 => SERIALIZATION_TYPE::I8,
            SerializedType::U8 => SERIALIZATION_TYPE::U8,
            SerializedType::R4 => SERIALIZATION_TYPE::R4,
            SerializedType::R8 => SERIALIZATION_TYPE::R8,
            SerializedType::String => SERIALIZATION_TYPE::STRING,
            SerializedType::Type => SERIALIZATION_TYPE::TYPE,
            SerializedType::TaggedObject => SERIALIZATION_TYPE::TAGGED_OBJECT,
            SerializedType::Enum(_) => SERIALIZATION_TYPE::ENUM,
            SerializedType::SzArray(_) => SERIALIZATION_TYPE::SZARRAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_type_round_trips_tags() {
        assert_eq!(TypeSignature::String.element_type(), 0x0E);
        assert_eq!(
            TypeSignature::SzArray(SignatureSzArray {
                modifiers: Vec::new(),
                base: Box::new(TypeSignature::String),
            })
            .element_type(),
            0x1D
        );
        assert_eq!(
            TypeSignature::Boxed(Box::new(TypeSignature::I4)).element_type(),
            0x51
        );
    }

    #[test]
    fn name_projects_through_wrappers() {
        let array_of_string = TypeSignature::SzArray(SignatureSzArray {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::String),
        });
        assert_eq!(array_of_string.name(), "String[]");
        assert_eq!(array_of_string.namespace(), "System");

        let ptr = TypeSignature::Ptr(SignaturePointer {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::I4),
        });
        assert_eq!(ptr.name(), "Int32*");

        let by_ref = TypeSignature::ByRef(Box::new(TypeSignature::Boolean));
        assert_eq!(by_ref.name(), "Boolean&");
    }

    #[test]
    fn innermost_skips_wrappers() {
        let nested = TypeSignature::Pinned(Box::new(TypeSignature::SzArray(SignatureSzArray {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::Ptr(SignaturePointer {
                modifiers: Vec::new(),
                base: Box::new(TypeSignature::U8),
            })),
        })));

        assert_eq!(*nested.innermost(), TypeSignature::U8);
        assert_eq!(*TypeSignature::I4.innermost(), TypeSignature::I4);
    }

    #[test]
    fn value_type_classification() {
        assert!(TypeSignature::I4.is_value_type());
        assert!(TypeSignature::ValueType(Token::new(0x02000001)).is_value_type());
        assert!(!TypeSignature::String.is_value_type());
        assert!(!TypeSignature::Class(Token::new(0x02000001)).is_value_type());

        // Boxing always produces a reference
        assert!(!TypeSignature::Boxed(Box::new(TypeSignature::I4)).is_value_type());

        // Generic instantiation follows its base
        let inst = TypeSignature::GenericInst(
            Box::new(TypeSignature::ValueType(Token::new(0x02000002))),
            vec![TypeSignature::I4],
        );
        assert!(inst.is_value_type());
    }
}
