//! Corpus side of lvderiv
//!
//! - [`validator`]: frequency lookups against the NoSketch Engine corpus
//!   service, bucketed into [`FrequencyTier`]s
//! - [`filter`]: vertical (token-per-line) corpus → `(word, lemma)` pairs
//! - [`table`]: tab/comma separated output with UTF-8 BOM

pub mod filter;
pub mod table;
pub mod validator;

pub use filter::{filter_corpus, filter_corpus_file, is_valid_word, WordLemma};
pub use table::{DelimitedWriter, UTF8_BOM};
pub use validator::{
    classify_response, FixedFrequencies, FrequencyTier, FrequencyValidator, NoSketchValidator,
    ValidationFailure, ValidationResult,
};
