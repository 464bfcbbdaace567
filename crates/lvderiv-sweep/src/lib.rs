//! Derivation experiments over a fixed catalog of Latvian word-formation
//! categories.
//!
//! - [`catalog`]: transformation categories with worked examples, and the
//!   evaluation lemma set
//! - [`prompts`]: the Latvian prompt templates
//! - [`sweep`]: rule-based sweep (model writes rules, rules derive candidates)
//! - [`derive`]: direct experiment (model proposes candidates itself)
//! - [`output`]: result file naming and writing

pub mod catalog;
pub mod derive;
pub mod output;
pub mod prompts;
pub mod sweep;

pub use catalog::{
    examples_for, find_transformation, EvaluationLemma, TransformationCategory,
    EVALUATION_LEMMAS, TRANSFORMATIONS,
};
pub use derive::{parse_derivation_lines, DerivationRecord, DirectDerivation, ShotMode};
pub use output::{
    append_rules, derivation_results_path, regex_results_path, rules_table_path,
    write_derivations, write_results, DERIVATION_RESULTS_DIR, REGEX_RESULTS_DIR,
};
pub use sweep::{should_evaluate, RegexSweep, ResultRecord, SweepConfig, DEFAULT_MODEL_DELAY};
