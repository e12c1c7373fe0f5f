// crates/parser/src/ast.rs

use lexer::token::Primitive;
use std::fmt;

/// Data model used to size primitives and pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abi {
    /// 64-bit: pointer and `long` are 8 bytes, `long double` is 16.
    Lp64,
    /// 32-bit: pointer and `long` are 4 bytes, `long double` is 8.
    Ilp32,
}

impl Abi {
    pub fn host() -> Abi {
        if cfg!(target_pointer_width = "32") {
            Abi::Ilp32
        } else {
            Abi::Lp64
        }
    }

    pub fn pointer_width(self) -> usize {
        match self {
            Abi::Lp64 => 8,
            Abi::Ilp32 => 4,
        }
    }

    /// (size, alignment) in bytes.
    pub fn primitive_layout(self, primitive: Primitive) -> (usize, usize) {
        let word = self.pointer_width();
        match primitive {
            Primitive::Void => (0, 1),
            Primitive::Bool | Primitive::Char | Primitive::UnsignedChar => (1, 1),
            Primitive::Short | Primitive::UnsignedShort => (2, 2),
            Primitive::Int | Primitive::UnsignedInt | Primitive::Float => (4, 4),
            Primitive::Long | Primitive::UnsignedLong => (word, word),
            Primitive::LongLong | Primitive::UnsignedLongLong | Primitive::Double => (8, 8),
            Primitive::LongDouble => match self {
                Abi::Lp64 => (16, 16),
                Abi::Ilp32 => (8, 8),
            },
            Primitive::CString | Primitive::Object | Primitive::Class | Primitive::Selector => {
                (word, word)
            }
        }
    }
}

impl Default for Abi {
    fn default() -> Self {
        Abi::host()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Bool,
    Char,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
    CString,

    /// `@`, with the class or protocol hint of `@"NSString"` when present.
    Object(Option<String>),
    Class,
    Selector,
    Block,

    Pointer(Box<TypeNode>),

    Array {
        count: u32,
        element: Box<TypeNode>,
    },

    Struct {
        name: Option<String>,
        fields: Vec<TypeNode>,
    },

    Union {
        name: Option<String>,
        fields: Vec<TypeNode>,
    },

    /// Width in bits.
    Bitfield(u32),

    Unknown,
}

/// A parsed type with its structurally derived size and alignment.
///
/// Nodes are immutable once built: the only way to get one is through the
/// constructors below, which compute the layout from the children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    kind: TypeKind,
    size: usize,
    align: usize,
}

fn round_up(value: usize, align: usize) -> usize {
    if align <= 1 {
        value
    } else {
        value.div_ceil(align).saturating_mul(align)
    }
}

impl TypeNode {
    pub fn primitive(primitive: Primitive, abi: Abi) -> TypeNode {
        let kind = match primitive {
            Primitive::Void => TypeKind::Void,
            Primitive::Bool => TypeKind::Bool,
            Primitive::Char => TypeKind::Char,
            Primitive::UnsignedChar => TypeKind::UnsignedChar,
            Primitive::Short => TypeKind::Short,
            Primitive::UnsignedShort => TypeKind::UnsignedShort,
            Primitive::Int => TypeKind::Int,
            Primitive::UnsignedInt => TypeKind::UnsignedInt,
            Primitive::Long => TypeKind::Long,
            Primitive::UnsignedLong => TypeKind::UnsignedLong,
            Primitive::LongLong => TypeKind::LongLong,
            Primitive::UnsignedLongLong => TypeKind::UnsignedLongLong,
            Primitive::Float => TypeKind::Float,
            Primitive::Double => TypeKind::Double,
            Primitive::LongDouble => TypeKind::LongDouble,
            Primitive::CString => TypeKind::CString,
            Primitive::Object => TypeKind::Object(None),
            Primitive::Class => TypeKind::Class,
            Primitive::Selector => TypeKind::Selector,
        };
        let (size, align) = abi.primitive_layout(primitive);
        TypeNode { kind, size, align }
    }

    pub fn object(class: Option<String>, abi: Abi) -> TypeNode {
        let class = class.filter(|name| !name.is_empty());
        TypeNode::word(TypeKind::Object(class), abi)
    }

    pub fn selector(abi: Abi) -> TypeNode {
        TypeNode::word(TypeKind::Selector, abi)
    }

    pub fn block(abi: Abi) -> TypeNode {
        TypeNode::word(TypeKind::Block, abi)
    }

    pub fn pointer(pointee: TypeNode, abi: Abi) -> TypeNode {
        TypeNode::word(TypeKind::Pointer(Box::new(pointee)), abi)
    }

    fn word(kind: TypeKind, abi: Abi) -> TypeNode {
        let width = abi.pointer_width();
        TypeNode {
            kind,
            size: width,
            align: width,
        }
    }

    pub fn array(count: u32, element: TypeNode) -> TypeNode {
        let size = (count as usize).saturating_mul(element.byte_size());
        let align = element.align;
        TypeNode {
            kind: TypeKind::Array {
                count,
                element: Box::new(element),
            },
            size,
            align,
        }
    }

    /// C aggregate layout. Bitfields pack at bit granularity; the next
    /// ordinary field starts on a byte boundary aligned to its own alignment.
    pub fn structure(name: Option<String>, fields: Vec<TypeNode>) -> TypeNode {
        let mut bits: usize = 0;
        let mut align = 1;

        for field in &fields {
            match field.kind {
                TypeKind::Bitfield(width) => bits = bits.saturating_add(width as usize),
                _ => {
                    let offset = round_up(bits.div_ceil(8), field.align);
                    bits = offset.saturating_add(field.size).saturating_mul(8);
                    align = align.max(field.align);
                }
            }
        }

        TypeNode {
            kind: TypeKind::Struct {
                name: anonymous(name),
                fields,
            },
            size: round_up(bits.div_ceil(8), align),
            align,
        }
    }

    pub fn union(name: Option<String>, fields: Vec<TypeNode>) -> TypeNode {
        let align = fields.iter().map(|f| f.align).max().unwrap_or(1);
        let widest = fields.iter().map(TypeNode::byte_size).max().unwrap_or(0);

        TypeNode {
            kind: TypeKind::Union {
                name: anonymous(name),
                fields,
            },
            size: round_up(widest, align),
            align,
        }
    }

    pub fn bitfield(width: u32) -> TypeNode {
        TypeNode {
            kind: TypeKind::Bitfield(width),
            size: width as usize,
            align: 1,
        }
    }

    pub fn unknown() -> TypeNode {
        TypeNode {
            kind: TypeKind::Unknown,
            size: 0,
            align: 1,
        }
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn into_kind(self) -> TypeKind {
        self.kind
    }

    /// Size in bytes, or in bits when `is_bitfield()` is true.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alignment(&self) -> usize {
        self.align
    }

    pub fn is_bitfield(&self) -> bool {
        matches!(self.kind, TypeKind::Bitfield(_))
    }

    /// Size in bytes; bitfields round up to whole bytes.
    pub fn byte_size(&self) -> usize {
        if self.is_bitfield() {
            self.size.div_ceil(8)
        } else {
            self.size
        }
    }

    /// False when an `Unknown` is reachable without going through a pointer.
    pub fn is_sized(&self) -> bool {
        match &self.kind {
            TypeKind::Unknown => false,
            TypeKind::Array { element, .. } => element.is_sized(),
            TypeKind::Struct { fields, .. } | TypeKind::Union { fields, .. } => {
                fields.iter().all(TypeNode::is_sized)
            }
            _ => true,
        }
    }

    /// Bytes needed to store a value of this type, or -1 when unresolvable.
    pub fn storage_size(&self) -> i64 {
        if self.is_sized() {
            i64::try_from(self.byte_size()).unwrap_or(i64::MAX)
        } else {
            -1
        }
    }
}

fn anonymous(name: Option<String>) -> Option<String> {
    name.filter(|name| !name.is_empty() && name != "?")
}

fn write_fields(f: &mut fmt::Formatter, name: &Option<String>, fields: &[TypeNode]) -> fmt::Result {
    write!(f, "{}=", name.as_deref().unwrap_or("?"))?;
    for field in fields {
        write!(f, "{}", field)?;
    }
    Ok(())
}

// Canonical encoding text; parsing it yields an equal node.
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = match &self.kind {
            TypeKind::Void => 'v',
            TypeKind::Bool => 'B',
            TypeKind::Char => 'c',
            TypeKind::UnsignedChar => 'C',
            TypeKind::Short => 's',
            TypeKind::UnsignedShort => 'S',
            TypeKind::Int => 'i',
            TypeKind::UnsignedInt => 'I',
            TypeKind::Long => 'l',
            TypeKind::UnsignedLong => 'L',
            TypeKind::LongLong => 'q',
            TypeKind::UnsignedLongLong => 'Q',
            TypeKind::Float => 'f',
            TypeKind::Double => 'd',
            TypeKind::LongDouble => 'D',
            TypeKind::CString => '*',
            TypeKind::Class => '#',
            TypeKind::Selector => ':',
            TypeKind::Unknown => '?',
            TypeKind::Object(None) => '@',
            TypeKind::Object(Some(class)) => return write!(f, "@\"{}\"", class),
            TypeKind::Block => return write!(f, "@?"),
            TypeKind::Pointer(pointee) => return write!(f, "^{}", pointee),
            TypeKind::Array { count, element } => return write!(f, "[{}{}]", count, element),
            TypeKind::Struct { name, fields } => {
                write!(f, "{{")?;
                write_fields(f, name, fields)?;
                return write!(f, "}}");
            }
            TypeKind::Union { name, fields } => {
                write!(f, "(")?;
                write_fields(f, name, fields)?;
                return write!(f, ")");
            }
            TypeKind::Bitfield(width) => return write!(f, "b{}", width),
        };
        write!(f, "{}", code)
    }
}
