pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{Abi, TypeKind, TypeNode};
pub use error::ParseError;
pub use lexer::token::Primitive;
pub use parser::{MAX_DEPTH, TypeCursor, TypeParser};

/// Parses the first type descriptor of `encoding` for the host data model.
pub fn parse(encoding: &str) -> Result<TypeNode, ParseError> {
    TypeParser::default().parse(encoding)
}

/// Parses one descriptor at byte `offset`; returns the offset just past it.
pub fn parse_at(encoding: &str, offset: usize) -> Result<(TypeNode, usize), ParseError> {
    TypeParser::default().parse_at(encoding, offset)
}

pub fn parse_all(encoding: &str) -> Result<Vec<TypeNode>, ParseError> {
    TypeParser::default().parse_all(encoding)
}

/// Storage size in bytes of a single descriptor, -1 when unresolvable.
pub fn size_of(encoding: &str) -> Result<i64, ParseError> {
    TypeParser::default().size_of(encoding)
}

#[cfg(test)]
mod tests;
