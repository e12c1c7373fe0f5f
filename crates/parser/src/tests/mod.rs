// Test module for parser
//
// Unit tests for the type-encoding grammar, organized by construct.

mod error_recovery;
