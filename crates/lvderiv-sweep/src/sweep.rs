//! Rule-based derivation sweep.
//!
//! For every transformation category the model is asked for sed-style rules;
//! each rule is applied to the evaluation lemmas and every non-empty
//! candidate is checked against the corpus.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use lvderiv_corpus::{FrequencyValidator, ValidationResult};
use lvderiv_llm::{LlmError, ModelBackend};
use lvderiv_rules::apply_rule;
use tracing::{debug, info, warn};

use crate::catalog::{
    EvaluationLemma, TransformationCategory, EVALUATION_LEMMAS, TRANSFORMATIONS,
};
use crate::output::append_rules;
use crate::prompts::{response_lines, rule_prompt};

pub const DEFAULT_MODEL_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Rules table, appended to once per category.
    pub rules_path: PathBuf,
    /// Pause after every model call.
    pub model_delay: Duration,
}

impl SweepConfig {
    pub fn new(rules_path: impl Into<PathBuf>) -> Self {
        Self {
            rules_path: rules_path.into(),
            model_delay: DEFAULT_MODEL_DELAY,
        }
    }

    pub fn with_model_delay(mut self, delay: Duration) -> Self {
        self.model_delay = delay;
        self
    }
}

/// One validated candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub lemma: String,
    /// The lemma's own source category.
    pub source: String,
    /// Raw rule line as the model wrote it.
    pub rule: String,
    pub candidate: String,
    /// Target category of the sweep that produced the rule.
    pub target: String,
    pub validation: ValidationResult,
    pub group: String,
}

/// Whether rules from `category` are tried on `lemma`.
///
/// A pair is skipped only when both the source and the target category
/// differ.
pub fn should_evaluate(lemma: &EvaluationLemma, category: &TransformationCategory) -> bool {
    lemma.source == category.source || lemma.target == category.target
}

/// Send `prompt` and wait out the pause, successful or not.
pub(crate) fn ask_model(
    backend: &dyn ModelBackend,
    prompt: &str,
    delay: Duration,
) -> Result<String, LlmError> {
    debug!(backend = backend.label(), %prompt, "model request");
    let response = backend.generate(prompt);
    if let Ok(text) = &response {
        info!(backend = backend.label(), response = %text, "model response");
    }
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    response
}

pub struct RegexSweep<'a> {
    backend: &'a dyn ModelBackend,
    validator: &'a dyn FrequencyValidator,
    catalog: &'a [TransformationCategory],
    lemmas: &'a [EvaluationLemma],
    config: SweepConfig,
}

impl<'a> RegexSweep<'a> {
    /// Sweep over the built-in catalog and lemma set.
    pub fn new(
        backend: &'a dyn ModelBackend,
        validator: &'a dyn FrequencyValidator,
        config: SweepConfig,
    ) -> Self {
        Self {
            backend,
            validator,
            catalog: TRANSFORMATIONS,
            lemmas: EVALUATION_LEMMAS,
            config,
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

    /// Run every category in catalog order and collect the records.
    ///
    /// Model and validation failures are logged and skipped; only writing the
    /// rules table can fail the run.
    pub fn run(&self) -> Result<Vec<ResultRecord>> {
        let mut records = Vec::new();
        for category in self.catalog {
            let rules = self.request_rules(category);
            append_rules(&self.config.rules_path, category, &rules)?;
            let before = records.len();
            self.evaluate(category, &rules, &mut records);
            info!(
                source = category.source,
                target = category.target,
                rules = rules.len(),
                records = records.len() - before,
                "category done"
            );
        }
        Ok(records)
    }

    fn request_rules(&self, category: &TransformationCategory) -> Vec<String> {
        match ask_model(self.backend, &rule_prompt(category), self.config.model_delay) {
            Ok(text) => response_lines(&text),
            Err(e) => {
                warn!(
                    source = category.source,
                    target = category.target,
                    error = %e,
                    "model call failed; no rules for this category"
                );
                Vec::new()
            }
        }
    }

    fn evaluate(
        &self,
        category: &TransformationCategory,
        rules: &[String],
        records: &mut Vec<ResultRecord>,
    ) {
        for lemma in self.lemmas {
            if !should_evaluate(lemma, category) {
                continue;
            }
            for rule in rules {
                let candidate = apply_rule(lemma.text, rule);
                if candidate.is_empty() {
                    continue;
                }
                let validation = self.validator.validate(&candidate);
                debug!(lemma = lemma.text, %rule, %candidate, tier = %validation.tier, "candidate");
                records.push(ResultRecord {
                    lemma: lemma.text.to_string(),
                    source: lemma.source.to_string(),
                    rule: rule.clone(),
                    candidate,
                    target: category.target.to_string(),
                    validation,
                    group: lemma.group.to_string(),
                });
            }
        }
    }
}
