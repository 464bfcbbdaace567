//! Replacement templates.
//!
//! Models write replacements in backslash style (`\1šana`, `\g<1>s`), the way
//! `sed` and most scripting languages spell them. The `regex` crate expands
//! `$1` / `${1}` instead, so templates are rewritten before substitution:
//!
//! | input          | output        |
//! |----------------|---------------|
//! | `\1`, `\12`    | `${1}`, `${12}` |
//! | `\g<1>`, `\g<name>` | `${1}`, `${name}` |
//! | `\\`           | `\`           |
//! | `\n` `\t` ...  | the control character |
//! | `$`            | `$$` (literal dollar) |
//!
//! A reference to a group the pattern does not define, an unknown ASCII
//! letter escape, or a dangling backslash is an error.

use regex::Regex;

fn fail(replacement: &str, reason: impl Into<String>) -> crate::RuleError {
    crate::RuleError::Replacement {
        replacement: replacement.to_string(),
        reason: reason.into(),
    }
}

fn check_group_number(
    replacement: &str,
    regex: &Regex,
    number: usize,
) -> Result<(), crate::RuleError> {
    if number == 0 || number >= regex.captures_len() {
        return Err(fail(
            replacement,
            format!(
                "invalid group reference {number} (pattern has {} group(s))",
                regex.captures_len() - 1
            ),
        ));
    }
    Ok(())
}

/// Rewrite a backslash-style replacement into a `regex` expansion template.
pub fn translate_replacement(replacement: &str, regex: &Regex) -> Result<String, crate::RuleError> {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '$' => out.push_str("$$"),
            '\\' => {
                let Some(next) = chars.next() else {
                    return Err(fail(replacement, "dangling backslash at end of replacement"));
                };
                match next {
                    '\\' => out.push('\\'),
                    '0' => {
                        // Octal escape: up to two more octal digits.
                        let mut value = 0u32;
                        for _ in 0..2 {
                            match chars.peek().and_then(|c| c.to_digit(8)) {
                                Some(d) => {
                                    value = value * 8 + d;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        out.push(char::from_u32(value).unwrap_or('\0'));
                    }
                    '1'..='9' => {
                        let mut number = next.to_digit(10).unwrap_or(0) as usize;
                        if let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                            number = number * 10 + d as usize;
                            chars.next();
                        }
                        check_group_number(replacement, regex, number)?;
                        out.push_str(&format!("${{{number}}}"));
                    }
                    'g' => {
                        if chars.next() != Some('<') {
                            return Err(fail(replacement, "expected `<` after `\\g`"));
                        }
                        let mut name = String::new();
                        loop {
                            match chars.next() {
                                Some('>') => break,
                                Some(c) => name.push(c),
                                None => {
                                    return Err(fail(replacement, "unterminated `\\g<...>`"))
                                }
                            }
                        }
                        if let Ok(number) = name.parse::<usize>() {
                            if number != 0 {
                                check_group_number(replacement, regex, number)?;
                            }
                            out.push_str(&format!("${{{number}}}"));
                        } else if regex.capture_names().flatten().any(|n| n == name) {
                            out.push_str(&format!("${{{name}}}"));
                        } else {
                            return Err(fail(replacement, format!("unknown group name {name:?}")));
                        }
                    }
                    'a' => out.push('\u{7}'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\u{b}'),
                    c if c.is_ascii_alphabetic() => {
                        return Err(fail(replacement, format!("bad escape \\{c}")));
                    }
                    c => {
                        out.push('\\');
                        out.push(c);
                    }
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
