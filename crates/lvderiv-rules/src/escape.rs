//! Visible form of control characters in rule text.
//!
//! Rules are stored in tab-separated tables, so raw control characters (a
//! stray SOH byte, a tab) would corrupt the row. They are written as `\t`,
//! `\n`, `\r` or `\xHH` (lowercase hex) instead; everything else passes
//! through untouched.
//!
//! Backslashes themselves are not escaped, so reading a row back is only
//! exact when the rule has no backslash sequence of its own that looks like
//! one of these escapes. `\1` and `\g<1>` are safe; a literal `\t` next to a
//! control byte comes back as a real tab.

use std::borrow::Cow;

fn is_control(ch: char) -> bool {
    (ch as u32) < 0x20 || ch == '\u{7f}'
}

pub fn escape_control(rule: &str) -> Cow<'_, str> {
    if !rule.chars().any(is_control) {
        return Cow::Borrowed(rule);
    }

    let mut out = String::with_capacity(rule.len() + 8);
    for ch in rule.chars() {
        match ch {
            '\t' => out.push_str(r"\t"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            c if is_control(c) => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Inverse of [`escape_control`].
///
/// Only sequences that [`escape_control`] can produce are decoded; `\x41` or
/// `\1` stay as written.
pub fn unescape_control(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        let decoded = match tail.as_bytes().get(1) {
            Some(b't') => Some(('\t', 2)),
            Some(b'n') => Some(('\n', 2)),
            Some(b'r') => Some(('\r', 2)),
            Some(b'x') => tail
                .get(2..4)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .and_then(char::from_u32)
                .filter(|c| is_control(*c) && !matches!(c, '\t' | '\n' | '\r'))
                .map(|c| (c, 4)),
            _ => None,
        };

        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &tail[len..];
            }
            None => {
                out.push('\\');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soh_is_hex_escaped() {
        assert_eq!(escape_control("s#^(.*?)t$#\u{1}šana#"), r"s#^(.*?)t$#\x01šana#");
    }

    #[test]
    fn named_escapes() {
        assert_eq!(escape_control("a\tb\nc\rd\u{7f}"), r"a\tb\nc\rd\x7f");
    }

    #[test]
    fn clean_rules_are_borrowed() {
        assert!(matches!(escape_control(r"s#t$#\1šana#"), Cow::Borrowed(_)));
        assert!(matches!(unescape_control("s#t$#šana#"), Cow::Borrowed(_)));
    }

    #[test]
    fn unescape_leaves_group_references_alone() {
        assert_eq!(unescape_control(r"s#^(.*?)t$#\1šana#"), r"s#^(.*?)t$#\1šana#");
        assert_eq!(unescape_control(r"\x41\x0"), r"\x41\x0");
    }

    #[test]
    fn literal_escape_beside_control_byte_reads_back_as_control() {
        let raw = "s#^(.*?)t$#\u{1}\\tx#";
        assert_eq!(escape_control(raw), r"s#^(.*?)t$#\x01\tx#");
        assert_eq!(unescape_control(&escape_control(raw)), "s#^(.*?)t$#\u{1}\tx#");
    }

    #[test]
    fn group_references_survive_roundtrip() {
        let raw = "s#^(.*?)(t)$#\u{1}\\g<2>\\2#";
        assert_eq!(unescape_control(&escape_control(raw)), raw);
    }

    #[test]
    fn roundtrip_with_soh() {
        let raw = "s#^(.*?)t$#\u{1}šana#";
        assert_eq!(unescape_control(&escape_control(raw)), raw);
    }
}
