// Test module for layout
//
// Unit tests for signature slot resolution and property attribute strings.
