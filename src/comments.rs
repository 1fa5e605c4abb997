//! Removal of `/* ... */` comments from template actions.
//!
//! [`remove_comments`] scans the text directly and never fails.
//! [`prune_comments`] parses the template, drops comment variables from the
//! tree and renders it again. It is slower and fails on anything
//! [`crate::parse`] rejects.
//!
//! Both keep actions that hold nothing but a comment, e.g.
//! `{{/* note */}}`, because an emptied action would be invalid.

use log::{debug, trace};

use crate::{
    error::ParseResult,
    parser::parse,
    render::Render,
    segment::{CLOSE, OPEN, Scan, carve},
    walk::WalkVariables,
};

const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";
const TRIM_MARKER: char = '-';

/// Removes block comments from every action of `input`, leaving comment
/// markers inside string, rune and raw literals untouched.
///
/// Trim markers next to the delimiters are preserved. An action left with
/// only whitespace once its comments are gone is kept exactly as it was.
/// Malformed input is copied through as-is.
///
/// ```rust
/// use tmpltree::remove_comments;
///
/// assert_eq!(
///     remove_comments(r#"a {{- _ "x /* kept */" /* dropped */ -}} b"#),
///     r#"a {{- _ "x /* kept */"  -}} b"#,
/// );
/// assert_eq!(remove_comments("{{/* kept */}}"), "{{/* kept */}}");
/// ```
pub fn remove_comments(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut rest = input;
    loop {
        let Scan::Found(found) = carve(rest) else {
            cleaned.push_str(rest);
            break;
        };

        cleaned.push_str(found.before);
        cleaned.push_str(OPEN);
        clean_action(found.inner, &mut cleaned);
        cleaned.push_str(CLOSE);
        rest = found.after;
    }

    debug!(
        "removed comments: {} bytes in, {} bytes out",
        input.len(),
        cleaned.len()
    );
    cleaned
}

/// Removes comments from the inside of one action, writing the result to
/// `out`.
fn clean_action(inner: &str, out: &mut String) {
    let mut body = inner;
    let mut trims_left = false;
    let mut trims_right = false;
    if body.len() > 1 {
        if let Some(stripped) = body.strip_suffix(TRIM_MARKER) {
            trims_right = true;
            body = stripped;
        }
        if let Some(stripped) = body.strip_prefix(TRIM_MARKER) {
            trims_left = true;
            body = stripped;
        }
    }

    let stripped = strip_comments(body);
    if trims_left {
        out.push(TRIM_MARKER);
    }
    if stripped.trim().is_empty() {
        out.push_str(body);
    } else {
        out.push_str(&stripped);
    }
    if trims_right {
        out.push(TRIM_MARKER);
    }
}

/// Strips comments until none remain. Removing one comment can join a `/`
/// and a `*` into a new opener, and that comment is stripped as well.
fn strip_comments(body: &str) -> String {
    let mut current = strip_comments_once(body);
    loop {
        let next = strip_comments_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Removes each terminated comment outside of quotes. An unterminated
/// comment or quote runs to the end of `body` and is kept.
fn strip_comments_once(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut idx = 0;
    while let Some(rest) = body.get(idx..) {
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if let Some(quote) = Quote::from_char(ch) {
            let len = quote.span_len(rest);
            out.push_str(&rest[..len]);
            idx += len;
            continue;
        }

        if rest.starts_with(COMMENT_OPEN) {
            let search_from = COMMENT_OPEN.len();
            if let Some(end) = rest[search_from..].find(COMMENT_CLOSE) {
                let len = search_from + end + COMMENT_CLOSE.len();
                trace!("removing comment {:?}", &rest[..len]);
                idx += len;
                continue;
            }
            out.push_str(rest);
            break;
        }

        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Double,
    Single,
    Raw,
}

impl Quote {
    const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            '`' => Some(Self::Raw),
            _ => None,
        }
    }

    const fn delimiter(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
            Self::Raw => '`',
        }
    }

    /// Byte length of the quoted span at the start of `text`, both quotes
    /// included. Raw literals have no escapes.
    fn span_len(self, text: &str) -> usize {
        let delimiter = self.delimiter();
        let mut chars = text.char_indices().skip(1);
        while let Some((idx, ch)) = chars.next() {
            if ch == '\\' && self != Self::Raw {
                chars.next();
                continue;
            }
            if ch == delimiter {
                return idx + ch.len_utf8();
            }
        }
        text.len()
    }
}

/// Parses `input`, removes the comments of every variable group holding
/// more than one variable, and renders the result.
///
/// Groups consisting of a single comment, as in `{{/* note */}}`, are left
/// alone. Fails with the parse error if `input` cannot be parsed.
///
/// ```rust
/// use tmpltree::prune_comments;
///
/// assert_eq!(
///     prune_comments(r#"before {{ _ "thing" /* comment */ }} after"#).unwrap(),
///     r#"before {{ _ "thing"  }} after"#,
/// );
/// ```
pub fn prune_comments(input: &str) -> ParseResult<String> {
    let mut tree = parse("prune-comments.tmpl", input)?;
    let mut pruned = 0;
    tree.walk_variables_mut(|variables| {
        if variables.len() > 1 {
            pruned += variables.prune_comments();
        }
        false
    });
    debug!("pruned {} comments", pruned);
    Ok(tree.render())
}
