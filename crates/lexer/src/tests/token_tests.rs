// Token Recognition Tests
//
// Tests for primitives, qualifiers, object forms and delimiters.

use crate::lex_tokens;
use crate::token::{Primitive, Qualifier, Token};
use logos::Logos;

// Helper function to tokenize and assert single token
fn assert_single_token(input: &str, expected: Token) {
    let mut lexer = Token::lexer(input);
    let token = lexer.next();
    assert_eq!(token, Some(Ok(expected)), "Failed to match token for input: {}", input);
    assert_eq!(lexer.next(), None, "Expected single token, found more");
}

// ==================== PRIMITIVE TESTS ====================

#[test]
fn test_every_primitive_code() {
    let table = [
        ("v", Primitive::Void),
        ("B", Primitive::Bool),
        ("c", Primitive::Char),
        ("C", Primitive::UnsignedChar),
        ("s", Primitive::Short),
        ("S", Primitive::UnsignedShort),
        ("i", Primitive::Int),
        ("I", Primitive::UnsignedInt),
        ("l", Primitive::Long),
        ("L", Primitive::UnsignedLong),
        ("q", Primitive::LongLong),
        ("Q", Primitive::UnsignedLongLong),
        ("f", Primitive::Float),
        ("d", Primitive::Double),
        ("D", Primitive::LongDouble),
        ("*", Primitive::CString),
        ("@", Primitive::Object),
        ("#", Primitive::Class),
        (":", Primitive::Selector),
    ];

    for (code, primitive) in table {
        assert_single_token(code, Token::Primitive(primitive));
        assert_eq!(primitive.code().to_string(), code);
    }
}

// ==================== QUALIFIER TESTS ====================

#[test]
fn test_qualifiers() {
    assert_single_token("r", Token::Qualifier(Qualifier::Const));
    assert_single_token("n", Token::Qualifier(Qualifier::In));
    assert_single_token("N", Token::Qualifier(Qualifier::InOut));
    assert_single_token("o", Token::Qualifier(Qualifier::Out));
    assert_single_token("O", Token::Qualifier(Qualifier::ByCopy));
    assert_single_token("R", Token::Qualifier(Qualifier::ByRef));
    assert_single_token("V", Token::Qualifier(Qualifier::Oneway));
    assert_single_token("A", Token::Qualifier(Qualifier::Atomic));
    assert_single_token("+", Token::Qualifier(Qualifier::Ownership));
}

#[test]
fn test_qualified_pointer() {
    let tokens = lex_tokens("r^*");
    assert_eq!(
        tokens,
        vec![
            Token::Qualifier(Qualifier::Const),
            Token::Caret,
            Token::Primitive(Primitive::CString),
        ]
    );
}

// ==================== OBJECT FORM TESTS ====================

#[test]
fn test_block() {
    assert_single_token("@?", Token::Block);
}

#[test]
fn test_class_name() {
    assert_single_token("@\"NSString\"", Token::ClassName("NSString".to_string()));
}

#[test]
fn test_protocol_class_name() {
    assert_single_token(
        "@\"<NSCopying>\"",
        Token::ClassName("<NSCopying>".to_string()),
    );
}

#[test]
fn test_block_with_signature() {
    let tokens = lex_tokens("@?<v@?>");
    assert_eq!(
        tokens,
        vec![
            Token::Block,
            Token::LAngle,
            Token::Primitive(Primitive::Void),
            Token::Block,
            Token::RAngle,
        ]
    );
}

// ==================== AGGREGATE TESTS ====================

#[test]
fn test_struct_head() {
    let tokens = lex_tokens("{CGPoint=dd}");
    assert_eq!(
        tokens,
        vec![
            Token::StructHead("CGPoint".to_string()),
            Token::Primitive(Primitive::Double),
            Token::Primitive(Primitive::Double),
            Token::RBrace,
        ]
    );
}

#[test]
fn test_anonymous_struct_without_equals() {
    let tokens = lex_tokens("{i}");
    assert_eq!(
        tokens,
        vec![Token::LBrace, Token::Primitive(Primitive::Int), Token::RBrace]
    );
}

#[test]
fn test_struct_referenced_by_name() {
    assert_single_token("{CGPoint}", Token::StructRef("CGPoint".to_string()));
    assert_single_token("{__CFString}", Token::StructRef("__CFString".to_string()));
    assert_single_token("(_Opaque)", Token::UnionRef("_Opaque".to_string()));
}

#[test]
fn test_type_code_bodies_are_not_names() {
    // Every character is a code, so these stay field lists
    for input in ["{i}", "{if}", "{?}", "{b4}", "{}"] {
        assert_eq!(lex_tokens(input)[0], Token::LBrace, "{}", input);
    }
    assert_eq!(lex_tokens("(cs)")[0], Token::LParen);
}

#[test]
fn test_name_ref_stops_at_nested_group() {
    let tokens = lex_tokens("{x{i}}");
    assert_eq!(tokens[0], Token::LBrace);
    assert_eq!(tokens[1], Token::Unknown('x'));
}

#[test]
fn test_angles_are_not_groups() {
    assert!(!Token::LAngle.opens_group());
    assert!(!Token::RAngle.closes_group());
    assert!(Token::StructHead("S".to_string()).opens_group());
    assert!(!Token::StructRef("S".to_string()).opens_group());
}

#[test]
fn test_nested_struct_heads() {
    let tokens = lex_tokens("{S={i}{f}}");
    assert_eq!(tokens[0], Token::StructHead("S".to_string()));
    assert_eq!(tokens[1], Token::LBrace);
    assert_eq!(tokens[4], Token::LBrace);
    assert_eq!(tokens.len(), 8);
}

#[test]
fn test_union_head() {
    let tokens = lex_tokens("(?=if)");
    assert_eq!(
        tokens,
        vec![
            Token::UnionHead("?".to_string()),
            Token::Primitive(Primitive::Int),
            Token::Primitive(Primitive::Float),
            Token::RParen,
        ]
    );
}

#[test]
fn test_templated_struct_name() {
    let tokens = lex_tokens("{pair<int, float>=if}");
    assert_eq!(tokens[0], Token::StructHead("pair<int, float>".to_string()));
}

#[test]
fn test_field_names() {
    let tokens = lex_tokens("{CGPoint=\"x\"d\"y\"d}");
    assert_eq!(tokens[1], Token::FieldName("x".to_string()));
    assert_eq!(tokens[3], Token::FieldName("y".to_string()));
}

#[test]
fn test_array_and_bitfield() {
    assert_eq!(
        lex_tokens("[12i]"),
        vec![
            Token::LBracket,
            Token::Number(12),
            Token::Primitive(Primitive::Int),
            Token::RBracket,
        ]
    );
    assert_eq!(lex_tokens("b3"), vec![Token::Bit, Token::Number(3)]);
}
