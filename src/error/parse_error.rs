use pest::error::{ErrorVariant, LineColLocation};

use crate::interpreter::parser::Rule;

#[derive(Debug)]
/// Represents all errors that can occur before evaluation starts.
pub enum ParseError {
    /// A line is indented to a level that no enclosing block opened.
    InvalidIndentation {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The grammar failed to match the (normalized) source.
    Syntax {
        /// Line of the failure in the normalized source.
        line: usize,
        /// Column of the failure in the normalized source.
        col: usize,
        /// Human-readable description of what the parser expected.
        message: String,
        /// The grammar rule the failure is attributed to.
        rule: String,
    },
    /// An integer literal does not fit into a signed 64-bit value.
    NumberLiteral {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Converts a `pest` parse failure into a [`ParseError::Syntax`],
    /// keeping the position and the first rule the parser expected.
    #[must_use]
    pub fn from_pest(error: &pest::error::Error<Rule>) -> Self {
        let (line, col) = match error.line_col {
            LineColLocation::Pos((line, col)) | LineColLocation::Span((line, col), _) => (line, col),
        };
        let rule = match &error.variant {
            ErrorVariant::ParsingError { positives, .. } => positives
                .first()
                .map(|rule| format!("{rule:?}"))
                .unwrap_or_default(),
            ErrorVariant::CustomError { .. } => String::new(),
        };
        Self::Syntax {
            line,
            col,
            message: error.variant.message().into_owned(),
            rule,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIndentation { line } => {
                write!(f, "Error on line {line}: Inconsistent indentation.")
            }
            Self::Syntax {
                line,
                col,
                message,
                rule,
            } => write!(f, "{line}:{col}: {message} | rule: {rule}"),
            Self::NumberLiteral { line } => {
                write!(f, "Error on line {line}: Integer literal is out of range.")
            }
        }
    }
}

impl std::error::Error for ParseError {}
