//! String literal codec
//!
//! Encodes document text as a double-quoted literal that is valid both as
//! JSON and as a JavaScript expression, and decodes it back. The literal is
//! always a single line: every control character is escaped, so the text can
//! never break out of the assignment statement it is placed in.

use crate::error::EmbedResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// How non-ASCII characters are written into the literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// Every character outside printable ASCII becomes a `\uXXXX` escape.
    /// Characters beyond the BMP are written as surrogate pairs.
    #[default]
    Ascii,
    /// Non-ASCII characters are written verbatim (UTF-8), except the
    /// U+2028/U+2029 line terminators.
    Utf8,
}

/// Encode `text` as a quoted string literal
pub fn encode(text: &str, escaping: Escaping) -> EmbedResult<String> {
    let json = serde_json::to_string(text)?;

    // serde_json escapes quotes, backslashes and C0 controls; only the
    // remaining non-ASCII range differs between the modes.
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        let escape = match escaping {
            Escaping::Ascii => !c.is_ascii() || c == '\u{7f}',
            Escaping::Utf8 => c == '\u{2028}' || c == '\u{2029}',
        };
        if escape {
            push_utf16_escapes(&mut out, c);
        } else {
            out.push(c);
        }
    }

    Ok(out)
}

/// Decode a quoted string literal produced by [`encode`]
pub fn decode(literal: &str) -> EmbedResult<String> {
    Ok(serde_json::from_str::<String>(literal.trim())?)
}

fn push_utf16_escapes(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        // Writing to a String cannot fail
        let _ = write!(out, "\\u{:04x}", unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TRICKY: &str = "Hello \"World\"\nLine2\\path\ttab\r\n\u{0}\u{1b}[0m café – 日本語 🦀 \u{2028}end";

    #[test]
    fn test_quotes_and_newlines() {
        let literal = encode("Hello \"World\"\nLine2", Escaping::Ascii).unwrap();
        assert_eq!(literal, r#""Hello \"World\"\nLine2""#);
        assert_eq!(decode(&literal).unwrap(), "Hello \"World\"\nLine2");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(encode("", Escaping::Ascii).unwrap(), "\"\"");
        assert_eq!(decode("\"\"").unwrap(), "");
    }

    #[test]
    fn test_ascii_mode_is_pure_ascii() {
        let literal = encode(TRICKY, Escaping::Ascii).unwrap();
        assert!(literal.is_ascii());
        assert!(!literal.contains('\n'));
        assert!(!literal.contains('\r'));
        assert_eq!(decode(&literal).unwrap(), TRICKY);
    }

    #[test]
    fn test_utf8_mode_keeps_text_readable() {
        let literal = encode(TRICKY, Escaping::Utf8).unwrap();
        assert!(literal.contains("café"));
        assert!(literal.contains("🦀"));
        assert!(literal.contains("\\u2028"));
        assert!(!literal.contains('\u{2028}'));
        assert_eq!(decode(&literal).unwrap(), TRICKY);
    }

    #[test]
    fn test_ascii_escapes_match_json_dumps() {
        assert_eq!(encode("é", Escaping::Ascii).unwrap(), "\"\\u00e9\"");
        assert_eq!(encode("–", Escaping::Ascii).unwrap(), "\"\\u2013\"");
        assert_eq!(encode("🦀", Escaping::Ascii).unwrap(), "\"\\ud83e\\udd80\"");
        assert_eq!(encode("\u{7f}", Escaping::Ascii).unwrap(), "\"\\u007f\"");
        assert_eq!(encode("\u{1}", Escaping::Ascii).unwrap(), "\"\\u0001\"");
    }

    #[test]
    fn test_decode_rejects_non_string() {
        assert!(decode("42").is_err());
        assert!(decode("\"unterminated").is_err());
    }
}
