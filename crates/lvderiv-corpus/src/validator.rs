//! Corpus frequency validation.
//!
//! Candidates are looked up in the CommonCrawl corpus of the Latvian NoSketch
//! Engine instance, matching either the lowercased word form or the lemma.
//! The total hit count (`fullsize`) is bucketed into a [`FrequencyTier`].
//!
//! Failures never escape [`FrequencyValidator::validate`]: a non-200 status,
//! a transport error or an unreadable body all become
//! [`FrequencyTier::ValidationError`] rows for manual review.

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

pub const CORPUS_URL_ENV: &str = "LVDERIV_CORPUS_URL";
pub const DEFAULT_CORPUS_URL: &str = "https://nosketch.korpuss.lv/bonito/run.cgi/view";
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Highest hit count that still needs a human look.
const RARE_MAX: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyTier {
    NotFound,
    RareNeedsReview,
    Frequent,
    ValidationError,
}

impl FrequencyTier {
    pub fn classify(count: u64) -> Self {
        match count {
            0 => Self::NotFound,
            1..=RARE_MAX => Self::RareNeedsReview,
            _ => Self::Frequent,
        }
    }

    /// Short code used in result tables.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "F",
            Self::RareNeedsReview => "M",
            Self::Frequent => "T",
            Self::ValidationError => "validation_error",
        }
    }
}

impl std::fmt::Display for FrequencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub tier: FrequencyTier,
    /// Absent only for [`FrequencyTier::ValidationError`].
    pub frequency: Option<u64>,
}

impl ValidationResult {
    pub fn from_count(count: u64) -> Self {
        Self {
            tier: FrequencyTier::classify(count),
            frequency: Some(count),
        }
    }

    pub fn error() -> Self {
        Self {
            tier: FrequencyTier::ValidationError,
            frequency: None,
        }
    }

    /// Frequency as a table cell (empty when absent).
    pub fn frequency_cell(&self) -> String {
        self.frequency.map(|f| f.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationFailure {
    #[error("corpus service returned HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Something that can tell how often a word occurs.
pub trait FrequencyValidator {
    fn validate(&self, word: &str) -> ValidationResult;
}

/// Classify a raw corpus service reply.
pub fn classify_response(status: u16, body: &str) -> Result<ValidationResult, ValidationFailure> {
    if status != 200 {
        return Err(ValidationFailure::Status(status));
    }
    let v: serde_json::Value = serde_json::from_str(body)?;
    let obj = v
        .as_object()
        .ok_or_else(|| ValidationFailure::Shape("top-level value is not an object".to_string()))?;
    let count = match obj.get("fullsize") {
        None => 0,
        Some(n) => n.as_u64().ok_or_else(|| {
            ValidationFailure::Shape(format!("`fullsize` is not a non-negative integer: {n}"))
        })?,
    };
    Ok(ValidationResult::from_count(count))
}

// ============================================================================
// NoSketch Engine client
// ============================================================================

pub struct NoSketchValidator {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl NoSketchValidator {
    /// Validator for the default endpoint (or `LVDERIV_CORPUS_URL`) with the
    /// standard 10 second timeout.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var(CORPUS_URL_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CORPUS_URL.to_string());
        Self::new(&base_url, DEFAULT_VALIDATION_TIMEOUT)
    }

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build http client: {e}"))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('?').to_string(),
        })
    }

    /// Search URL for `word`: up to 2 hits, JSON, matching word form or lemma.
    pub fn query_url(&self, word: &str) -> String {
        let w = urlencoding::encode(word);
        format!(
            "{}?corpname=CommonCrawl&format=json&pagesize=2&fromp=0&attrs=word&\
             ctxattrs=word%2Ctag&kwicleftctx=5%23&kwicrightctx=5%23&async=0&\
             q=q[lc%3D%22{w}%22+|+lemma_lc%3D%22{w}%22]",
            self.base_url
        )
    }

    fn lookup(&self, word: &str) -> Result<ValidationResult, ValidationFailure> {
        let url = self.query_url(word);
        debug!(%url, "corpus lookup");
        let resp = self.client.get(&url).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        classify_response(status, &body)
    }
}

impl FrequencyValidator for NoSketchValidator {
    fn validate(&self, word: &str) -> ValidationResult {
        match self.lookup(word) {
            Ok(result) => result,
            Err(e) => {
                warn!(word, error = %e, "validation failed");
                ValidationResult::error()
            }
        }
    }
}

// ============================================================================
// Offline validator
// ============================================================================

/// Validator backed by a fixed word → count table.
///
/// Words missing from the table count as not found; a `None` count simulates a
/// failed lookup.
#[derive(Debug, Clone, Default)]
pub struct FixedFrequencies {
    counts: HashMap<String, Option<u64>>,
}

impl FixedFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, word: &str, count: u64) -> Self {
        self.counts.insert(word.to_string(), Some(count));
        self
    }

    pub fn failing(mut self, word: &str) -> Self {
        self.counts.insert(word.to_string(), None);
        self
    }
}

impl FrequencyValidator for FixedFrequencies {
    fn validate(&self, word: &str) -> ValidationResult {
        match self.counts.get(word) {
            Some(Some(count)) => ValidationResult::from_count(*count),
            Some(None) => ValidationResult::error(),
            None => ValidationResult::from_count(0),
        }
    }
}
