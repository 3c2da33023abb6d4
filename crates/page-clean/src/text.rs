//! Text-level helpers: entity decoding and whitespace handling.
//!
//! The parser stores text payloads entity-decoded; the serializer re-escapes
//! the minimal set on output. Decoding is hand-rolled and covers the named
//! entities that actually occur in captured listing pages plus all numeric
//! references.

use std::borrow::Cow;

/// Longest entity body we are willing to scan for a terminating `;`.
const MAX_ENTITY_LEN: usize = 32;

/// Decode HTML character references in `input`.
///
/// Unknown or malformed references are kept literally. Returns a borrowed
/// string when no `&` is present.
pub(crate) fn decode_html_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match parse_entity(rest) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Parse a single reference at the start of `s` (which begins with `&`).
///
/// Returns the decoded char and the number of input bytes consumed.
fn parse_entity(s: &str) -> Option<(char, usize)> {
    let window = &s[..s.len().min(MAX_ENTITY_LEN)];
    let semi = window.find(';')?;
    let body = &s[1..semi];
    if body.is_empty() {
        return None;
    }

    let decoded = if let Some(num) = body.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        char::from_u32(code)?
    } else {
        named_entity(body)?
    };
    Some((decoded, semi + 1))
}

/// Named entities worth decoding; everything else stays literal.
fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "shy" => '\u{00AD}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "deg" => '\u{00B0}',
        "middot" => '\u{00B7}',
        "bull" => '\u{2022}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "laquo" => '\u{00AB}',
        "raquo" => '\u{00BB}',
        "times" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "plusmn" => '\u{00B1}',
        "sect" => '\u{00A7}',
        "para" => '\u{00B6}',
        "yen" => '\u{00A5}',
        "pound" => '\u{00A3}',
        "cent" => '\u{00A2}',
        "euro" => '\u{20AC}',
        _ => return None,
    };
    Some(ch)
}

/// Collapse all whitespace runs to single spaces and trim both ends.
///
/// This is the normalization used for guard text, emptiness checks and
/// visible-text extraction; it treats ideographic space (U+3000) and NBSP as
/// whitespace like any other.
pub(crate) fn compress_ws(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Collapse runs of horizontal whitespace (spaces and tabs) to one space.
///
/// Newlines are untouched; single tabs are canonicalized to a space.
pub(crate) fn collapse_horizontal_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_horizontal = false;
    for ch in input.chars() {
        if ch == ' ' || ch == '\t' {
            if !prev_horizontal {
                out.push(' ');
                prev_horizontal = true;
            }
        } else {
            out.push(ch);
            prev_horizontal = false;
        }
    }
    out
}

/// Collapse runs of two or more newlines down to one; `\r` is dropped.
pub(crate) fn collapse_newline_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_newline = false;
    for ch in input.chars() {
        match ch {
            '\r' => {}
            '\n' => {
                if !prev_newline {
                    out.push('\n');
                    prev_newline = true;
                }
            }
            _ => {
                out.push(ch);
                prev_newline = false;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_html_entities("a &amp; b"), "a & b");
        assert_eq!(decode_html_entities("x&nbsp;y"), "x\u{00A0}y");
        assert_eq!(decode_html_entities("&#65;&#x42;"), "AB");
    }

    #[test]
    fn keeps_unknown_and_unterminated_references() {
        assert_eq!(decode_html_entities("&bogus; & rest"), "&bogus; & rest");
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
    }

    #[test]
    fn borrows_when_no_ampersand() {
        assert!(matches!(decode_html_entities("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn compress_ws_handles_ideographic_space() {
        assert_eq!(compress_ws("  山田\u{3000}\u{3000}太郎\t"), "山田 太郎");
    }

    #[test]
    fn collapse_runs() {
        assert_eq!(collapse_horizontal_runs("a  \t b"), "a b");
        assert_eq!(collapse_newline_runs("a\n\n\nb"), "a\nb");
    }
}
