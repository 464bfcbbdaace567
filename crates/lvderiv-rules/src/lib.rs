//! Derivation rule grammar
//!
//! Models are asked to answer with sed-style substitution rules, one per line:
//!
//! ```text
//! s#^(.*?)t$#\1šana#
//! ```
//!
//! This crate turns such lines into compiled rules and applies them to lemmas:
//! - [`DerivationRule::parse`]: shape check + pattern compilation
//! - [`DerivationRule::apply`] / [`apply_rule`]: substitution over a lemma
//! - [`escape_control`] / [`unescape_control`]: visible form of raw control
//!   characters for tab-separated output
//!
//! Model output is **untrusted**: a line that does not parse, a pattern the
//! engine rejects, or a replacement that cannot be expanded never panics and
//! never aborts a run; it just yields no candidate.

pub mod escape;
pub mod rule;
pub mod template;

pub use escape::{escape_control, unescape_control};
pub use rule::{apply_rule, normalize_soh, DerivationRule, RuleError};
pub use template::translate_replacement;
