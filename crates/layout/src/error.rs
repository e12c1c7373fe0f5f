// Error handling for the layout engine
//
// Parse failures pass through untouched; the engine adds the errors that
// only make sense once a whole signature or attribute list is in play.

use ariadne::{Color, Label, Report, ReportKind, Source};
use parser::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `available` counts the return type and both implicit slots.
    #[error("argument index {index} is out of range: the signature has {available} slots")]
    IndexOutOfRange { index: usize, available: usize },

    #[error("property attributes have no 'T' entry")]
    MissingTypeAttribute,
}

impl LayoutError {
    pub fn code(&self) -> &'static str {
        match self {
            LayoutError::Parse(e) => e.code(),
            LayoutError::IndexOutOfRange { .. } => "E101",
            LayoutError::MissingTypeAttribute => "E102",
        }
    }
}

/// Prints a report for `error` against the string it came from.
pub fn report_error(filename: &str, source: &str, error: &LayoutError) -> std::io::Result<()> {
    let (message, help) = match error {
        LayoutError::Parse(e) => return parser::error::report_error(filename, source, e),
        LayoutError::IndexOutOfRange { available, .. } => (
            "Argument Index Out Of Range",
            format!(
                "Valid indices are 0 through {} (0 is the return type, 1 and 2 are self and _cmd)",
                available.saturating_sub(1)
            ),
        ),
        LayoutError::MissingTypeAttribute => (
            "Missing Property Type",
            "Attribute strings start with 'T' followed by the type encoding".to_string(),
        ),
    };

    Report::build(ReportKind::Error, filename, 0)
        .with_code(error.code())
        .with_message(message)
        .with_label(
            Label::new((filename, 0..source.len()))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .with_help(help)
        .finish()
        .eprint((filename, Source::from(source)))
}
