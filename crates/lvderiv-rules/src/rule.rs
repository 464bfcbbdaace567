//! Parsing and applying `s#PATTERN#REPLACEMENT#` rules.

use regex::Regex;
use std::borrow::Cow;

use crate::template::translate_replacement;

/// Start-of-heading control byte. Some models emit it where `\1` was meant.
const SOH: char = '\u{1}';

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("not a substitution rule (expected `s#PATTERN#REPLACEMENT#`): {0:?}")]
    Shape(String),
    #[error("pattern {pattern:?} does not compile: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("replacement {replacement:?} cannot be expanded: {reason}")]
    Replacement { replacement: String, reason: String },
}

/// A rule whose pattern is known to compile.
///
/// The parser does not check how many capture groups the pattern has; a
/// replacement that refers to a group the pattern lacks is only detected at
/// apply time (and yields no candidate).
#[derive(Debug, Clone)]
pub struct DerivationRule {
    pattern: String,
    replacement: String,
    regex: Regex,
}

/// Replace every SOH byte with the two characters `\1`.
pub fn normalize_soh(line: &str) -> Cow<'_, str> {
    if line.contains(SOH) {
        Cow::Owned(line.replace(SOH, r"\1"))
    } else {
        Cow::Borrowed(line)
    }
}

/// Split `s#P#R#` into `(P, R)`.
///
/// Equivalent to matching `^s#(.*?)#(.*?)#$`: the pattern segment ends at the
/// first `#` after the prefix, and any further `#` belongs to the replacement.
fn split_rule_shape(line: &str) -> Option<(&str, &str)> {
    if line.contains('\n') {
        return None;
    }
    let body = line.strip_prefix("s#")?.strip_suffix('#')?;
    body.split_once('#')
}

impl DerivationRule {
    /// Parse a single raw line of model output.
    pub fn parse(raw: &str) -> Result<Self, RuleError> {
        let line = normalize_soh(raw);
        let (pattern, replacement) =
            split_rule_shape(&line).ok_or_else(|| RuleError::Shape(line.to_string()))?;

        let regex = Regex::new(pattern).map_err(|source| RuleError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Number of capture groups in the pattern, not counting the implicit
    /// whole-match group.
    pub fn capture_groups(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Apply the rule to `lemma`.
    ///
    /// Returns `None` when the pattern is empty, does not occur anywhere in
    /// the lemma, or the replacement cannot be expanded. Otherwise every match
    /// is substituted, empty matches included.
    pub fn apply(&self, lemma: &str) -> Option<String> {
        if self.pattern.is_empty() || !self.regex.is_match(lemma) {
            return None;
        }
        let template = translate_replacement(&self.replacement, &self.regex).ok()?;
        Some(substitute_all(&self.regex, lemma, &template))
    }
}

/// Replace every match of `regex` in `haystack` with the expansion of
/// `template`.
///
/// Unlike [`Regex::replace_all`], an empty match directly after a non-empty
/// one is substituted too (`x*` on `abxd` gives `-a-b--d-`). Only an empty
/// match at the very position where the previous empty match ended is
/// skipped, by moving one character ahead.
fn substitute_all(regex: &Regex, haystack: &str, template: &str) -> String {
    let mut out = String::with_capacity(haystack.len() + template.len());
    let mut last = 0;
    let mut pos = 0;
    let mut after_empty = false;

    while pos <= haystack.len() {
        let Some(caps) = regex.captures_at(haystack, pos) else {
            break;
        };
        let Some(m) = caps.get(0) else {
            break;
        };

        if after_empty && m.start() == pos && m.end() == pos {
            match haystack[pos..].chars().next() {
                Some(ch) => {
                    pos += ch.len_utf8();
                    after_empty = false;
                    continue;
                }
                None => break,
            }
        }

        out.push_str(&haystack[last..m.start()]);
        caps.expand(template, &mut out);
        last = m.end();
        after_empty = m.start() == m.end();
        pos = m.end();
    }

    out.push_str(&haystack[last..]);
    out
}

/// Derive a candidate from `lemma` using the raw rule line `rule`.
///
/// Rejected rules and non-matching patterns produce the empty string.
pub fn apply_rule(lemma: &str, rule: &str) -> String {
    DerivationRule::parse(rule)
        .ok()
        .and_then(|r| r.apply(lemma))
        .unwrap_or_default()
}
