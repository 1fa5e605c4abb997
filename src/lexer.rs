//! Tokenizer for the content of a single action, delimiters included.
//!
//! Rules are tried in the order of [`RULES`] and the first one matching at
//! the current position wins, even when a later rule would match more text.
//! The trailing [`TokenKind::Text`] rule accepts any single character, so
//! lexing never fails; the parser reports a `Text` token as an unexpected
//! character.

use once_cell::sync::Lazy;
use regex::Regex;

/// A dotted chain of identifiers, e.g. `name` or `user.name`.
const SCALAR: &str = r"[a-zA-Z][_a-zA-Z0-9]*(?:\.[a-zA-Z][_a-zA-Z0-9]*)*";

/// Whitespace as the template language understands it: ASCII only.
const SPACE: &str = r"[\t\n\f\r ]";

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `range $i, $e :=`
    Range,
    /// `$name :=` or `$name =`
    Assignment,
    Ident,
    /// `.Field.Sub`, `$var.Field`, `.` or `$`
    Keyword,
    /// A backtick quoted raw string.
    Literal,
    String,
    Rune,
    Float,
    Int,
    Comment,
    Space,
    Pipe,
    GroupOpen,
    GroupClose,
    StatementOpen,
    StatementClose,
    /// Anything no other rule accepts, one character at a time.
    Text,
}

impl TokenKind {
    /// A human readable name used in error messages.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Range => "range header",
            Self::Assignment => "assignment",
            Self::Ident => "identifier",
            Self::Keyword => "keyword",
            Self::Literal => "raw string",
            Self::String => "string",
            Self::Rune => "rune",
            Self::Float => "float",
            Self::Int => "integer",
            Self::Comment => "comment",
            Self::Space => "whitespace",
            Self::Pipe => "'|'",
            Self::GroupOpen => "'('",
            Self::GroupClose => "')'",
            Self::StatementOpen => "'{{'",
            Self::StatementClose => "'}}'",
            Self::Text => "text",
        }
    }

    /// Whether a token of this kind can begin a variable.
    pub const fn starts_variable(self) -> bool {
        match self {
            Self::Range
            | Self::Assignment
            | Self::Ident
            | Self::Keyword
            | Self::Literal
            | Self::String
            | Self::Rune
            | Self::Float
            | Self::Int
            | Self::Comment
            | Self::Space
            | Self::GroupOpen => true,
            Self::Pipe
            | Self::GroupClose
            | Self::StatementOpen
            | Self::StatementClose
            | Self::Text => false,
        }
    }
}

/// A lexed token, borrowing its text from the action source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token within the action source.
    pub offset: usize,
}

static RULES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    let rules = [
        (
            TokenKind::Range,
            format!(r"range{SPACE}+\${SCALAR}(?:{SPACE}*,{SPACE}*\${SCALAR})?{SPACE}+:="),
        ),
        (TokenKind::Assignment, format!(r"\${SCALAR}{SPACE}+:?=")),
        (TokenKind::Ident, r"[_a-zA-Z][_a-zA-Z0-9]*".to_string()),
        (TokenKind::Keyword, format!(r"[.$](?:{SCALAR})?")),
        (TokenKind::Literal, r"`[^`]*`".to_string()),
        (TokenKind::String, r#""(?:\\.|[^"\\\n])*""#.to_string()),
        (TokenKind::Rune, r"'(?:\\.|[^'\\\n])+'".to_string()),
        (TokenKind::Float, r"[0-9]+\.[0-9]+".to_string()),
        (TokenKind::Int, r"[0-9]+".to_string()),
        (TokenKind::Comment, r"(?s:/\*.*?\*/)".to_string()),
        (TokenKind::Space, format!(r"{SPACE}+")),
        (TokenKind::Pipe, r"\|".to_string()),
        (TokenKind::GroupOpen, r"\(".to_string()),
        (TokenKind::GroupClose, r"\)".to_string()),
        (TokenKind::StatementOpen, r"\{\{-?".to_string()),
        (TokenKind::StatementClose, r"-?\}\}".to_string()),
        (TokenKind::Text, r"(?s:.)".to_string()),
    ];

    rules
        .into_iter()
        .map(|(kind, pattern)| {
            let anchored = format!(r"\A(?:{pattern})");
            let regex = Regex::new(&anchored)
                .unwrap_or_else(|e| panic!("invalid {:?} token rule: {}", kind, e));
            (kind, regex)
        })
        .collect()
});

/// Splits `source` into tokens. Every byte of the input belongs to exactly
/// one token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset < source.len() {
        let rest = &source[offset..];
        let Some(token) = next_token(rest, offset) else {
            break;
        };
        offset += token.text.len();
        tokens.push(token);
    }
    tokens
}

fn next_token(rest: &str, offset: usize) -> Option<Token<'_>> {
    RULES.iter().find_map(|(kind, regex)| {
        regex
            .find(rest)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| Token {
                kind: *kind,
                text: m.as_str(),
                offset,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .into_iter()
            .map(|token| (token.kind, token.text))
            .collect()
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_statement_delimiters() {
        assert_eq!(
            kinds("{{- x -}}"),
            vec![
                (TokenKind::StatementOpen, "{{-"),
                (TokenKind::Space, " "),
                (TokenKind::Ident, "x"),
                (TokenKind::Space, " "),
                (TokenKind::StatementClose, "-}}"),
            ]
        );
        assert_eq!(
            kinds("{{x}}"),
            vec![
                (TokenKind::StatementOpen, "{{"),
                (TokenKind::Ident, "x"),
                (TokenKind::StatementClose, "}}"),
            ]
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_range_header_beats_identifier() {
        assert_eq!(
            kinds("range $index, $element := pipeline"),
            vec![
                (TokenKind::Range, "range $index, $element :="),
                (TokenKind::Space, " "),
                (TokenKind::Ident, "pipeline"),
            ]
        );
        assert_eq!(
            kinds("range $item := .Items"),
            vec![
                (TokenKind::Range, "range $item :="),
                (TokenKind::Space, " "),
                (TokenKind::Keyword, ".Items"),
            ]
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_plain_range_is_identifier() {
        assert_eq!(
            kinds("range .Items"),
            vec![
                (TokenKind::Ident, "range"),
                (TokenKind::Space, " "),
                (TokenKind::Keyword, ".Items"),
            ]
        );
        assert_eq!(kinds("ranger"), vec![(TokenKind::Ident, "ranger")]);
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_assignment() {
        assert_eq!(kinds("$name :="), vec![(TokenKind::Assignment, "$name :=")]);
        assert_eq!(kinds("$name\t="), vec![(TokenKind::Assignment, "$name\t=")]);
        assert_eq!(
            kinds("$name"),
            vec![(TokenKind::Keyword, "$name")],
            "a variable without an operator is a keyword"
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_keywords() {
        assert_eq!(kinds(".Field"), vec![(TokenKind::Keyword, ".Field")]);
        assert_eq!(
            kinds(".Field.Sub_1"),
            vec![(TokenKind::Keyword, ".Field.Sub_1")]
        );
        assert_eq!(kinds("$var.Field"), vec![(TokenKind::Keyword, "$var.Field")]);
        assert_eq!(kinds("."), vec![(TokenKind::Keyword, ".")]);
        assert_eq!(kinds("$"), vec![(TokenKind::Keyword, "$")]);
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_quoted_tokens() {
        assert_eq!(
            kinds(r#""inner \"quoted\"""#),
            vec![(TokenKind::String, r#""inner \"quoted\"""#)]
        );
        assert_eq!(kinds("`raw \\n`"), vec![(TokenKind::Literal, "`raw \\n`")]);
        assert_eq!(kinds(r"'\''"), vec![(TokenKind::Rune, r"'\''")]);
        assert_eq!(kinds("'x'"), vec![(TokenKind::Rune, "'x'")]);
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_comment_inside_string_is_string() {
        assert_eq!(
            kinds(r#""a /* not a comment */""#),
            vec![(TokenKind::String, r#""a /* not a comment */""#)]
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_numbers() {
        assert_eq!(kinds("0.1"), vec![(TokenKind::Float, "0.1")]);
        assert_eq!(kinds("10"), vec![(TokenKind::Int, "10")]);
        assert_eq!(
            kinds("1."),
            vec![(TokenKind::Int, "1"), (TokenKind::Keyword, ".")]
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_comments_are_lazy() {
        assert_eq!(
            kinds("/* a */ /* b */"),
            vec![
                (TokenKind::Comment, "/* a */"),
                (TokenKind::Space, " "),
                (TokenKind::Comment, "/* b */"),
            ]
        );
        assert_eq!(
            kinds("/*\n multi\n*/"),
            vec![(TokenKind::Comment, "/*\n multi\n*/")]
        );
        assert_eq!(kinds("/**/"), vec![(TokenKind::Comment, "/**/")]);
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_space_run_is_one_token() {
        assert_eq!(kinds(" \t\n "), vec![(TokenKind::Space, " \t\n ")]);
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_pipes_and_groups() {
        assert_eq!(
            kinds("(a)|b"),
            vec![
                (TokenKind::GroupOpen, "("),
                (TokenKind::Ident, "a"),
                (TokenKind::GroupClose, ")"),
                (TokenKind::Pipe, "|"),
                (TokenKind::Ident, "b"),
            ]
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_unknown_characters_fall_back_to_text() {
        assert_eq!(
            kinds("[ é"),
            vec![
                (TokenKind::Text, "["),
                (TokenKind::Space, " "),
                (TokenKind::Text, "é"),
            ]
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_offsets_cover_input() {
        let source = "{{ $x := .Y | z }}";
        let tokens = tokenize(source);
        let mut expected = 0;
        for token in &tokens {
            assert_eq!(token.offset, expected, "token {:?} is out of place", token);
            expected += token.text.len();
        }
        assert_eq!(expected, source.len());
    }
}
