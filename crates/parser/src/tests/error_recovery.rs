// Error Tests
//
// Every failure maps to one ParseError kind with the offset it was found at.

use crate::ast::Abi;
use crate::error::ParseError;
use crate::parser::{MAX_DEPTH, TypeParser};

fn parse_err(input: &str) -> ParseError {
    match TypeParser::new(Abi::Lp64).parse(input) {
        Ok(node) => panic!("Expected {:?} to fail, parsed {:?}", input, node),
        Err(e) => e,
    }
}

// ==================== EMPTY INPUT TESTS ====================

#[test]
fn test_empty_input() {
    assert_eq!(parse_err(""), ParseError::EmptyInput);
}

#[test]
fn test_qualifiers_only() {
    assert_eq!(parse_err("rn"), ParseError::EmptyInput);
}

#[test]
fn test_offset_past_end() {
    let parser = TypeParser::new(Abi::Lp64);
    assert_eq!(parser.parse_at("i", 1), Err(ParseError::EmptyInput));
}

// ==================== UNTERMINATED GROUP TESTS ====================

#[test]
fn test_lone_brace() {
    assert_eq!(parse_err("{"), ParseError::UnterminatedGroup { offset: 1 });
}

#[test]
fn test_unterminated_struct() {
    assert!(matches!(parse_err("{CGPoint=dd"), ParseError::UnterminatedGroup { .. }));
}

#[test]
fn test_unterminated_union() {
    assert!(matches!(parse_err("(?=if"), ParseError::UnterminatedGroup { .. }));
}

#[test]
fn test_unterminated_array() {
    assert!(matches!(parse_err("[4i"), ParseError::UnterminatedGroup { .. }));
}

#[test]
fn test_unterminated_block_signature() {
    assert!(matches!(parse_err("@?<v@?"), ParseError::UnterminatedGroup { .. }));
}

#[test]
fn test_block_signature_inside_struct() {
    let node = TypeParser::new(Abi::Lp64).parse("{S=@?<v@?>i}").unwrap();
    assert_eq!(node.size(), 16);
}

#[test]
fn test_angle_before_block_is_not_payload() {
    // Only `<` right after `@?` opens a payload
    let node = TypeParser::new(Abi::Lp64).parse("{S=<@?}").unwrap();
    assert_eq!(node.size(), 8);
}

#[test]
fn test_unterminated_pointee() {
    assert!(matches!(parse_err("^{S=i"), ParseError::UnterminatedGroup { .. }));
}

#[test]
fn test_mismatched_closer() {
    assert_eq!(parse_err("{i)"), ParseError::UnterminatedGroup { offset: 2 });
}

#[test]
fn test_stray_closer() {
    assert!(matches!(parse_err("}"), ParseError::UnterminatedGroup { .. }));
}

// ==================== MALFORMED LENGTH TESTS ====================

#[test]
fn test_non_numeric_array_length() {
    assert_eq!(parse_err("[abc]"), ParseError::MalformedLength { offset: 1 });
}

#[test]
fn test_missing_array_length() {
    assert!(matches!(parse_err("[i]"), ParseError::MalformedLength { .. }));
}

#[test]
fn test_overflowing_array_length() {
    assert!(matches!(parse_err("[99999999999i]"), ParseError::MalformedLength { .. }));
}

#[test]
fn test_bitfield_without_width() {
    assert!(matches!(parse_err("b"), ParseError::MalformedLength { .. }));
    assert!(matches!(parse_err("{?=bi}"), ParseError::MalformedLength { .. }));
}

#[test]
fn test_malformed_length_inside_struct() {
    assert_eq!(parse_err("{S=i[xi]}"), ParseError::MalformedLength { offset: 5 });
}

// ==================== NESTING TESTS ====================

#[test]
fn test_deep_pointer_chain() {
    let input = format!("{}i", "^".repeat(MAX_DEPTH + 8));
    assert!(matches!(parse_err(&input), ParseError::NestingTooDeep { limit: MAX_DEPTH, .. }));
}

#[test]
fn test_deep_structs() {
    let input = format!("{}i{}", "{".repeat(MAX_DEPTH + 1), "}".repeat(MAX_DEPTH + 1));
    assert_eq!(
        parse_err(&input),
        ParseError::NestingTooDeep {
            offset: MAX_DEPTH,
            limit: MAX_DEPTH
        }
    );
}

#[test]
fn test_unbalanced_garbage_is_too_deep_before_unterminated() {
    let input = "[1".repeat(MAX_DEPTH * 4);
    assert!(matches!(parse_err(&input), ParseError::NestingTooDeep { .. }));
}

#[test]
fn test_depth_at_limit_is_accepted() {
    let parser = TypeParser::new(Abi::Lp64);
    let input = format!("{}i{}", "{".repeat(MAX_DEPTH), "}".repeat(MAX_DEPTH));
    assert_eq!(parser.parse(&input).unwrap().size(), 4);
    let pointers = format!("{}i", "^".repeat(MAX_DEPTH - 1));
    assert!(parser.parse(&pointers).is_ok());
}

#[test]
fn test_deep_type_after_first_does_not_fail_first() {
    let input = format!("i{}", "{".repeat(MAX_DEPTH * 2));
    let (node, end) = TypeParser::new(Abi::Lp64).parse_at(&input, 0).unwrap();
    assert_eq!(node.size(), 4);
    assert_eq!(end, 1);
}

// ==================== ERROR DISPLAY TESTS ====================

#[test]
fn test_error_messages_and_codes() {
    let err = ParseError::MalformedLength { offset: 1 };
    assert_eq!(err.to_string(), "missing or non-numeric length at offset 1");
    assert_eq!(err.code(), "E003");
    assert_eq!(err.offset(), 1);
    assert_eq!(ParseError::EmptyInput.code(), "E001");
}
