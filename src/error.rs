pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A character inside an action that no token rule accepts.
    UnexpectedCharacter {
        found: String,
    },
    UnexpectedToken {
        expected: String,
        found: String,
    },
    UnexpectedEOF {
        /// Describes what was expected, e.g., "(expected '}}')"
        expected_what: String,
    },
    /// Tokens remaining after a complete action.
    TrailingTokens {
        found: String,
    },
    /// An opening `{{` without a matching `}}`.
    UnbalancedDelimiter,
    InvalidLiteral {
        literal: String,
        reason: String,
    },
    NestingTooDeep {
        limit: usize,
    },
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { found } => {
                write!(f, "Unexpected character '{}'", found)
            }
            Self::UnexpectedToken { expected, found } => {
                write!(f, "Expected {}, found {}", expected, found)
            }
            Self::UnexpectedEOF { expected_what } => {
                write!(f, "Unexpected end of action{}", expected_what)
            }
            Self::TrailingTokens { found } => {
                write!(f, "Unexpected {} after end of action", found)
            }
            Self::UnbalancedDelimiter => {
                write!(f, "Unclosed action, expected '}}}}'")
            }
            Self::InvalidLiteral { literal, reason } => {
                write!(f, "Invalid literal {}: {}", literal, reason)
            }
            Self::NestingTooDeep { limit } => {
                write!(f, "Nesting exceeds the limit of {} levels", limit)
            }
        }
    }
}

impl std::error::Error for ParseErrorKind {}

impl ParseErrorKind {
    pub fn unexpected_eof(expected: Option<&str>) -> Self {
        Self::UnexpectedEOF {
            expected_what: expected.map_or_else(String::new, |e| format!(" (expected {})", e)),
        }
    }
}

/// The error returned when a template cannot be parsed.
///
/// `line` and `column` are 1-indexed and point into the whole input given to
/// [`crate::parse`], not just the failing action. `source` holds the text of
/// the action being parsed, delimiters included; it is empty when the failure
/// happened before an action could be carved out of the input.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub filename: String,
    pub line: usize,
    pub column: usize,
    pub source: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Builds an error for the byte at `offset` within `input`.
    pub(crate) fn at(filename: &str, input: &str, offset: usize, kind: ParseErrorKind) -> Self {
        let (line, column) = line_and_column(input, offset);
        Self {
            filename: filename.to_owned(),
            line,
            column,
            source: String::new(),
            kind,
        }
    }

    pub(crate) fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.filename, self.line, self.column, self.kind
        )?;
        if !self.source.is_empty() {
            write!(f, " in {:?}", self.source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Columns count characters, not bytes.
fn line_and_column(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let mut line = 1;
    let mut column = 1;
    for (idx, ch) in input.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_line_and_column() {
        let input = "first\nsecond {{ [ }}";
        assert_eq!(line_and_column(input, 0), (1, 1));
        assert_eq!(line_and_column(input, 5), (1, 6));
        assert_eq!(line_and_column(input, 6), (2, 1));
        assert_eq!(line_and_column(input, 16), (2, 11));
        assert_eq!(line_and_column(input, 1000), (2, 15));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_display_includes_location_and_source() {
        let err = ParseError::at(
            "page.tmpl",
            "{{ [ }}",
            3,
            ParseErrorKind::UnexpectedCharacter {
                found: "[".to_string(),
            },
        )
        .with_source("{{ [ }}");
        assert_eq!(
            err.to_string(),
            "page.tmpl:1:4: Unexpected character '[' in \"{{ [ }}\""
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_error_source_is_kind() {
        let err = ParseError::at("t", "{{", 0, ParseErrorKind::UnbalancedDelimiter);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Unclosed action, expected '}}'"));
    }
}
