//! Splits template source into literal text and `{{ ... }}` action regions.
//!
//! A backslash escapes whatever character follows it, so `\{{` and `\}}` are
//! never treated as delimiters. Delimiters do not nest: the first unescaped
//! `}}` after an opening `{{` closes it.

pub(crate) const OPEN: &str = "{{";
pub(crate) const CLOSE: &str = "}}";

/// One action region carved out of a larger input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Carve<'a> {
    /// Text preceding the opening delimiter, verbatim.
    pub before: &'a str,
    /// Everything between the delimiters, trim markers included.
    pub inner: &'a str,
    /// Text following the closing delimiter.
    pub after: &'a str,
    /// Byte offset of the opening delimiter within the scanned input.
    pub open_at: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan<'a> {
    Found(Carve<'a>),
    /// An opening delimiter at the given offset was never closed.
    Unclosed(usize),
    NotFound,
}

/// Locates the first balanced action region in `input`.
pub(crate) fn carve(input: &str) -> Scan<'_> {
    let Some(open_at) = find_unescaped(input, 0, OPEN) else {
        return Scan::NotFound;
    };
    let inner_at = open_at + OPEN.len();
    let Some(close_at) = find_unescaped(input, inner_at, CLOSE) else {
        return Scan::Unclosed(open_at);
    };

    Scan::Found(Carve {
        before: &input[..open_at],
        inner: &input[inner_at..close_at],
        after: &input[close_at + CLOSE.len()..],
        open_at,
    })
}

/// Finds `needle` at or after `from`, skipping any backslash-escaped
/// character. Only ASCII needles are supported, which keeps every returned
/// offset on a char boundary.
fn find_unescaped(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let needle = needle.as_bytes();
    let mut idx = from;
    while idx < bytes.len() {
        let rest = bytes.get(idx..)?;
        if rest.first() == Some(&b'\\') {
            idx += 2;
            continue;
        }
        if rest.starts_with(needle) {
            return Some(idx);
        }
        idx += 1;
    }
    None
}
