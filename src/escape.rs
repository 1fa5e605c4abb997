//! Unquoting of string and rune tokens, and the canonical quoting the
//! renderer uses to write them back out.

/// Decodes a double quoted string token, quotes included.
pub(crate) fn unquote_string(raw: &str) -> Result<String, String> {
    let body = strip_quotes(raw, '"')?;
    unescape(body, '"')
}

/// Decodes a single quoted rune token, quotes included.
pub(crate) fn unquote_rune(raw: &str) -> Result<char, String> {
    let body = strip_quotes(raw, '\'')?;
    let decoded = unescape(body, '\'')?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        (None, _) => Err("empty rune".to_string()),
        (Some(_), Some(_)) => Err("more than one character in rune".to_string()),
    }
}

/// Strips the surrounding backticks of a raw literal. Nothing inside is
/// escaped.
pub(crate) fn unquote_literal(raw: &str) -> Result<&str, String> {
    strip_quotes(raw, '`')
}

/// Quotes `value` as a double quoted string.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        push_escaped(&mut out, ch, '"');
    }
    out.push('"');
    out
}

/// Quotes `value` as a single quoted rune.
pub fn quote_rune(value: char) -> String {
    let mut out = String::with_capacity(4);
    out.push('\'');
    push_escaped(&mut out, value, '\'');
    out.push('\'');
    out
}

fn strip_quotes(raw: &str, quote: char) -> Result<&str, String> {
    raw.strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .ok_or_else(|| format!("missing {} quotes", quote))
}

fn push_escaped(out: &mut String, ch: char, quote: char) {
    match ch {
        '\\' => out.push_str(r"\\"),
        '\u{07}' => out.push_str(r"\a"),
        '\u{08}' => out.push_str(r"\b"),
        '\u{0c}' => out.push_str(r"\f"),
        '\n' => out.push_str(r"\n"),
        '\r' => out.push_str(r"\r"),
        '\t' => out.push_str(r"\t"),
        '\u{0b}' => out.push_str(r"\v"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let code = u32::from(c);
            if code < 0x80 {
                out.push_str(&format!(r"\x{:02x}", code));
            } else if code <= 0xffff {
                out.push_str(&format!(r"\u{:04x}", code));
            } else {
                out.push_str(&format!(r"\U{:08x}", code));
            }
        }
        c => out.push(c),
    }
}

fn unescape(body: &str, quote: char) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\n' {
            return Err("newline in quoted literal".to_string());
        }
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let escaped = chars
            .next()
            .ok_or_else(|| "trailing backslash".to_string())?;
        let decoded = match escaped {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            '\\' => '\\',
            c if c == quote => c,
            'x' => ascii_escape(read_digits(&mut chars, 2, 16)?)?,
            'u' => code_point(read_digits(&mut chars, 4, 16)?)?,
            'U' => code_point(read_digits(&mut chars, 8, 16)?)?,
            first @ '0'..='7' => {
                let rest = read_digits(&mut chars, 2, 8)?;
                let high = first.to_digit(8).unwrap_or_default();
                ascii_escape(high * 64 + rest)?
            }
            other => return Err(format!("unknown escape sequence '\\{}'", other)),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn read_digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Result<u32, String> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| format!("expected {} base-{} digits in escape", count, radix))?;
        value = value * radix + digit;
    }
    Ok(value)
}

/// Byte escapes must stay within ASCII so the decoded text remains UTF-8.
fn ascii_escape(value: u32) -> Result<char, String> {
    if value < 0x80 {
        code_point(value)
    } else {
        Err(format!("byte escape {:#04x} is not ASCII", value))
    }
}

fn code_point(value: u32) -> Result<char, String> {
    char::from_u32(value).ok_or_else(|| format!("invalid code point {:#x}", value))
}
