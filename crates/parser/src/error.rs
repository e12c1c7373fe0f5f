// Error reporting with Ariadne
//
// Parse failures carry the byte offset where they were detected so the CLI
// can point at the offending part of the encoding.

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::Simple;
use lexer::token::Token;
use std::ops::Range;
use thiserror::Error;

/// Labels attached to the numeric parts of the grammar.
pub(crate) const ARRAY_LENGTH: &str = "array length";
pub(crate) const BITFIELD_WIDTH: &str = "bitfield width";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty type encoding")]
    EmptyInput,

    #[error("unterminated or unbalanced group at offset {offset}")]
    UnterminatedGroup { offset: usize },

    #[error("missing or non-numeric length at offset {offset}")]
    MalformedLength { offset: usize },

    #[error("nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::EmptyInput => 0,
            ParseError::UnterminatedGroup { offset }
            | ParseError::MalformedLength { offset }
            | ParseError::NestingTooDeep { offset, .. } => *offset,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseError::EmptyInput => "E001",
            ParseError::UnterminatedGroup { .. } => "E002",
            ParseError::MalformedLength { .. } => "E003",
            ParseError::NestingTooDeep { .. } => "E004",
        }
    }

    /// Maps a chumsky error from a parse that started at `base`.
    pub(crate) fn from_simple(error: &Simple<Token>, base: usize) -> ParseError {
        let offset = base + error.span().start;
        match error.label() {
            Some(ARRAY_LENGTH) | Some(BITFIELD_WIDTH) => ParseError::MalformedLength { offset },
            _ => ParseError::UnterminatedGroup { offset },
        }
    }
}

/// Prints a report for `error` against the encoding it came from.
pub fn report_error(filename: &str, source: &str, error: &ParseError) -> std::io::Result<()> {
    // Errors at the end of input point at the last character
    let start = error.offset().min(source.len().saturating_sub(1));
    let span: Range<usize> = start..(start + 1).min(source.len());

    let help = match error {
        ParseError::EmptyInput => "Pass at least one type code, e.g. 'i' or '{CGPoint=dd}'",
        ParseError::UnterminatedGroup { .. } => "Every '{', '(', '[' and '<' needs its matching closer",
        ParseError::MalformedLength { .. } => "Arrays are written '[<count><type>]' and bitfields 'b<width>'",
        ParseError::NestingTooDeep { .. } => "The encoding nests too deeply to be a real runtime type",
    };

    let report = Report::build(ReportKind::Error, filename, start)
        .with_code(error.code())
        .with_message("Type Encoding Error")
        .with_help(help);

    // Nothing to point at in an empty encoding
    let report = if source.is_empty() {
        report.with_note(error.to_string())
    } else {
        report.with_label(
            Label::new((filename, span))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
    };

    report.finish().eprint((filename, Source::from(source)))
}
