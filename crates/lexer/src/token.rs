use logos::Logos;
use std::fmt;

/// Single-character codes with a fixed size in the host data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
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
    Object,
    Class,
    Selector,
}

impl Primitive {
    /// The encoding character for this primitive.
    pub fn code(self) -> char {
        match self {
            Primitive::Void => 'v',
            Primitive::Bool => 'B',
            Primitive::Char => 'c',
            Primitive::UnsignedChar => 'C',
            Primitive::Short => 's',
            Primitive::UnsignedShort => 'S',
            Primitive::Int => 'i',
            Primitive::UnsignedInt => 'I',
            Primitive::Long => 'l',
            Primitive::UnsignedLong => 'L',
            Primitive::LongLong => 'q',
            Primitive::UnsignedLongLong => 'Q',
            Primitive::Float => 'f',
            Primitive::Double => 'd',
            Primitive::LongDouble => 'D',
            Primitive::CString => '*',
            Primitive::Object => '@',
            Primitive::Class => '#',
            Primitive::Selector => ':',
        }
    }
}

/// Modifiers the runtime prepends to a type. They never form a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Const,
    In,
    InOut,
    Out,
    ByCopy,
    ByRef,
    Oneway,
    Atomic,
    Ownership,
}

impl Qualifier {
    pub fn code(self) -> char {
        match self {
            Qualifier::Const => 'r',
            Qualifier::In => 'n',
            Qualifier::InOut => 'N',
            Qualifier::Out => 'o',
            Qualifier::ByCopy => 'O',
            Qualifier::ByRef => 'R',
            Qualifier::Oneway => 'V',
            Qualifier::Atomic => 'A',
            Qualifier::Ownership => '+',
        }
    }
}

// Strips the one-byte opener and the trailing delimiter (`=` or `"`).
fn inner(slice: &str, prefix: usize) -> String {
    slice[prefix..slice.len() - 1].to_string()
}

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
pub enum Token {
    // --- Primitives ---
    #[token("v", |_| Primitive::Void)]
    #[token("B", |_| Primitive::Bool)]
    #[token("c", |_| Primitive::Char)]
    #[token("C", |_| Primitive::UnsignedChar)]
    #[token("s", |_| Primitive::Short)]
    #[token("S", |_| Primitive::UnsignedShort)]
    #[token("i", |_| Primitive::Int)]
    #[token("I", |_| Primitive::UnsignedInt)]
    #[token("l", |_| Primitive::Long)]
    #[token("L", |_| Primitive::UnsignedLong)]
    #[token("q", |_| Primitive::LongLong)]
    #[token("Q", |_| Primitive::UnsignedLongLong)]
    #[token("f", |_| Primitive::Float)]
    #[token("d", |_| Primitive::Double)]
    #[token("D", |_| Primitive::LongDouble)]
    #[token("*", |_| Primitive::CString)]
    #[token("@", |_| Primitive::Object)]
    #[token("#", |_| Primitive::Class)]
    #[token(":", |_| Primitive::Selector)]
    Primitive(Primitive),

    // --- Qualifiers (const, in, inout, out, bycopy, byref, oneway, atomic, ownership) ---
    #[token("r", |_| Qualifier::Const)]
    #[token("n", |_| Qualifier::In)]
    #[token("N", |_| Qualifier::InOut)]
    #[token("o", |_| Qualifier::Out)]
    #[token("O", |_| Qualifier::ByCopy)]
    #[token("R", |_| Qualifier::ByRef)]
    #[token("V", |_| Qualifier::Oneway)]
    #[token("A", |_| Qualifier::Atomic)]
    #[token("+", |_| Qualifier::Ownership)]
    Qualifier(Qualifier),

    // --- Object forms ---
    #[token("@?")]
    Block,

    // @"NSString", @"<NSCopying>"
    #[regex(r#"@"[^"]*""#, |lex| inner(lex.slice(), 2))]
    ClassName(String),

    // "x" in {CGPoint="x"d"y"d}
    #[regex(r#""[^"]*""#, |lex| inner(lex.slice(), 1))]
    FieldName(String),

    #[token("^")]
    Caret,

    #[token("?")]
    Question,

    #[token("b")]
    Bit,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),

    // --- Delimiters ---
    #[token("{")]
    LBrace,

    // `{Name=`: the name runs up to `=` and never crosses a delimiter
    #[regex(r#"\{[^{}()\[\]"=^]*="#, |lex| inner(lex.slice(), 1))]
    StructHead(String),

    // `{Name}`: a body with no `=` is a name when any character in it is not
    // a type code. `{i}` stays an anonymous struct with one field.
    #[regex(
        r#"\{[vBcCsSiIlLqQfdD*@#:rnNoORVA+?b0-9]*[^{}()\[\]"=^vBcCsSiIlLqQfdD*@#:rnNoORVA+?b0-9][^{}()\[\]"=^]*\}"#,
        |lex| inner(lex.slice(), 1)
    )]
    StructRef(String),

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[regex(r#"\([^{}()\[\]"=^]*="#, |lex| inner(lex.slice(), 1))]
    UnionHead(String),

    #[regex(
        r#"\([vBcCsSiIlLqQfdD*@#:rnNoORVA+?b0-9]*[^{}()\[\]"=^vBcCsSiIlLqQfdD*@#:rnNoORVA+?b0-9][^{}()\[\]"=^]*\)"#,
        |lex| inner(lex.slice(), 1)
    )]
    UnionRef(String),

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    // Produced by `lex` for anything logos rejects
    Unknown(char),
}

impl Token {
    pub fn is_qualifier(&self) -> bool {
        matches!(self, Token::Qualifier(_))
    }

    pub fn opens_group(&self) -> bool {
        matches!(
            self,
            Token::LBrace
                | Token::StructHead(_)
                | Token::LParen
                | Token::UnionHead(_)
                | Token::LBracket
        )
    }

    /// `<` and `>` are not here: they only group inside a block signature.
    pub fn closes_group(&self) -> bool {
        matches!(self, Token::RBrace | Token::RParen | Token::RBracket)
    }
}

// Renders the token as it appears in an encoding string
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Primitive(p) => write!(f, "{}", p.code()),
            Token::Qualifier(q) => write!(f, "{}", q.code()),
            Token::Block => write!(f, "@?"),
            Token::ClassName(name) => write!(f, "@\"{}\"", name),
            Token::FieldName(name) => write!(f, "\"{}\"", name),
            Token::Caret => write!(f, "^"),
            Token::Question => write!(f, "?"),
            Token::Bit => write!(f, "b"),
            Token::Number(n) => write!(f, "{}", n),
            Token::LBrace => write!(f, "{{"),
            Token::StructHead(name) => write!(f, "{{{}=", name),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::StructRef(name) => write!(f, "{{{}}}", name),
            Token::UnionHead(name) => write!(f, "({}=", name),
            Token::UnionRef(name) => write!(f, "({})", name),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LAngle => write!(f, "<"),
            Token::RAngle => write!(f, ">"),
            Token::Unknown(c) => write!(f, "{}", c),
        }
    }
}
