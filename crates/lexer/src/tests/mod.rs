// Test module for lexer
//
// Unit tests for the type-encoding lexer, grouped by token family.

mod token_tests;
