//! Direct derivation experiment: the model proposes derivatives itself,
//! without going through rules.

use std::time::Duration;

use lvderiv_corpus::{FrequencyValidator, ValidationResult};
use lvderiv_llm::ModelBackend;
use tracing::{debug, warn};

use crate::catalog::{
    examples_for, EvaluationLemma, TransformationCategory, EVALUATION_LEMMAS, TRANSFORMATIONS,
};
use crate::prompts::{derivation_prompt, response_lines};
use crate::sweep::{ask_model, DEFAULT_MODEL_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotMode {
    ZeroShot,
    FewShot,
}

impl ShotMode {
    pub fn from_zero_shot(zero_shot: bool) -> Self {
        if zero_shot {
            Self::ZeroShot
        } else {
            Self::FewShot
        }
    }

    /// File name suffix.
    pub fn label(self) -> &'static str {
        match self {
            Self::ZeroShot => "zero-shot",
            Self::FewShot => "few-shot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationRecord {
    pub lemma: String,
    pub source: String,
    pub candidate: String,
    pub target: String,
    pub explanation: String,
    pub validation: ValidationResult,
    pub group: String,
}

/// Split `<derivative>, <explanation>` lines at the first comma.
///
/// A line without a comma is all candidate, with an empty explanation.
pub fn parse_derivation_lines(response: &str) -> Vec<(String, String)> {
    response_lines(response)
        .into_iter()
        .map(|line| match line.split_once(',') {
            Some((candidate, explanation)) => {
                (candidate.trim().to_string(), explanation.trim().to_string())
            }
            None => (line, String::new()),
        })
        .collect()
}

pub struct DirectDerivation<'a> {
    backend: &'a dyn ModelBackend,
    validator: &'a dyn FrequencyValidator,
    catalog: &'a [TransformationCategory],
    lemmas: &'a [EvaluationLemma],
    mode: ShotMode,
    model_delay: Duration,
}

impl<'a> DirectDerivation<'a> {
    pub fn new(
        backend: &'a dyn ModelBackend,
        validator: &'a dyn FrequencyValidator,
        mode: ShotMode,
    ) -> Self {
        Self {
            backend,
            validator,
            catalog: TRANSFORMATIONS,
            lemmas: EVALUATION_LEMMAS,
            mode,
            model_delay: DEFAULT_MODEL_DELAY,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a [TransformationCategory]) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_lemmas(mut self, lemmas: &'a [EvaluationLemma]) -> Self {
        self.lemmas = lemmas;
        self
    }

    pub fn with_model_delay(mut self, delay: Duration) -> Self {
        self.model_delay = delay;
        self
    }

    pub fn prompt_for(&self, lemma: &EvaluationLemma) -> String {
        let examples = match self.mode {
            ShotMode::ZeroShot => None,
            ShotMode::FewShot => Some(examples_for(self.catalog, lemma.source, lemma.target)),
        };
        derivation_prompt(lemma, examples)
    }

    /// Ask for every lemma in order and validate every returned candidate.
    pub fn run(&self) -> Vec<DerivationRecord> {
        let mut records = Vec::new();
        for lemma in self.lemmas {
            let response = match ask_model(self.backend, &self.prompt_for(lemma), self.model_delay) {
                Ok(text) => text,
                Err(e) => {
                    warn!(lemma = lemma.text, error = %e, "model call failed; lemma skipped");
                    continue;
                }
            };
            for (candidate, explanation) in parse_derivation_lines(&response) {
                let validation = self.validator.validate(&candidate);
                debug!(lemma = lemma.text, %candidate, tier = %validation.tier, "candidate");
                records.push(DerivationRecord {
                    lemma: lemma.text.to_string(),
                    source: lemma.source.to_string(),
                    candidate,
                    target: lemma.target.to_string(),
                    explanation,
                    validation,
                    group: lemma.group.to_string(),
                });
            }
        }
        records
    }
}
