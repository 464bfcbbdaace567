//! Backend selection and environment configuration.

use std::str::FromStr;
use std::time::Duration;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";
pub const ANTHROPIC_VERSION_ENV: &str = "ANTHROPIC_VERSION";
pub const LVDERIV_LLM_TIMEOUT_SECS_ENV: &str = "LVDERIV_LLM_TIMEOUT_SECS";
pub const LVDERIV_MOCK_RESPONSE_ENV: &str = "LVDERIV_MOCK_RESPONSE";

pub(crate) const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub(crate) const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub(crate) const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub(crate) const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

// Reasoning models can take a while on long rule lists.
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    O3,
    Gpt41,
    Gemini25Flash,
    Claude37Sonnet,
    Mock,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::O3,
        ModelKind::Gpt41,
        ModelKind::Gemini25Flash,
        ModelKind::Claude37Sonnet,
        ModelKind::Mock,
    ];

    /// Selector as accepted on the command line.
    pub fn selector(self) -> &'static str {
        match self {
            Self::O3 => "o3-2025-04-16",
            Self::Gpt41 => "gpt-4.1-2025-04-14",
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Claude37Sonnet => "claude-3-7-sonnet",
            Self::Mock => "mock",
        }
    }

    /// Model id sent to the provider API.
    pub fn api_model(self) -> &'static str {
        match self {
            Self::O3 => "o3-2025-04-16",
            Self::Gpt41 => "gpt-4.1-2025-04-14",
            Self::Gemini25Flash => "gemini-2.5-flash-preview-04-17",
            Self::Claude37Sonnet => "claude-3-7-sonnet-20250219",
            Self::Mock => "mock",
        }
    }

    /// Whether the reasoning switch changes anything for this model.
    pub fn supports_reasoning(self) -> bool {
        matches!(self, Self::Gemini25Flash | Self::Claude37Sonnet)
    }

    /// Credential env var, if the backend needs one.
    pub fn credential_env(self) -> Option<&'static str> {
        match self {
            Self::O3 | Self::Gpt41 => Some(OPENAI_API_KEY_ENV),
            Self::Gemini25Flash => Some(GEMINI_API_KEY_ENV),
            Self::Claude37Sonnet => Some(ANTHROPIC_API_KEY_ENV),
            Self::Mock => None,
        }
    }
}

impl FromStr for ModelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.selector() == s)
            .ok_or_else(|| ConfigError::UnknownModel(s.to_string()))
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "unknown model {0:?} (expected one of: o3-2025-04-16, gpt-4.1-2025-04-14, gemini-2.5-flash, claude-3-7-sonnet, mock)"
    )]
    UnknownModel(String),
    #[error("{model} backend requires {var} (set it in your env; do not hardcode secrets in scripts)")]
    MissingCredential {
        model: &'static str,
        var: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Resolved backend configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub kind: ModelKind,
    pub reasoning: bool,
    pub api_key: String,
    pub base_url: Option<String>,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl LlmConfig {
    /// Resolve credentials and endpoint overrides for `kind` from the environment.
    pub fn from_env(kind: ModelKind, reasoning: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(kind, reasoning, |var| std::env::var(var).ok())
    }

    /// Like [`LlmConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(kind: ModelKind, reasoning: bool, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match kind.credential_env() {
            Some(var) => {
                let key = lookup(var).unwrap_or_default().trim().to_string();
                if key.is_empty() {
                    return Err(ConfigError::MissingCredential {
                        model: kind.selector(),
                        var,
                    });
                }
                key
            }
            None => String::new(),
        };

        let base_url_env = match kind {
            ModelKind::O3 | ModelKind::Gpt41 => Some(OPENAI_BASE_URL_ENV),
            ModelKind::Gemini25Flash => Some(GEMINI_BASE_URL_ENV),
            ModelKind::Claude37Sonnet => Some(ANTHROPIC_BASE_URL_ENV),
            ModelKind::Mock => None,
        };
        let base_url = base_url_env
            .and_then(|var| lookup(var))
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            kind,
            reasoning,
            api_key,
            base_url,
            timeout: parse_timeout(lookup(LVDERIV_LLM_TIMEOUT_SECS_ENV).as_deref())?,
        })
    }

    /// Name for this run: `<selector>_reasoning` / `<selector>_non-reasoning`
    /// for models with a reasoning switch, the bare selector otherwise.
    pub fn run_label(&self) -> String {
        run_label(self.kind, self.reasoning)
    }
}

pub fn run_label(kind: ModelKind, reasoning: bool) -> String {
    if kind.supports_reasoning() {
        let r = if reasoning { "reasoning" } else { "non-reasoning" };
        format!("{}_{r}", kind.selector())
    } else {
        kind.selector().to_string()
    }
}

/// Parse the `LVDERIV_LLM_TIMEOUT_SECS` setting.
///
/// Absent or blank uses the default (120s); `0` disables the timeout.
pub fn parse_timeout(value: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let secs = match value.map(str::trim) {
        None | Some("") => DEFAULT_LLM_TIMEOUT_SECS,
        Some(v) => v.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "{LVDERIV_LLM_TIMEOUT_SECS_ENV}={v:?} (expected integer seconds; 0 disables)"
            ))
        })?,
    };

    Ok(if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    })
}

pub(crate) fn normalize_http_base_url(base_url: &str, default: &str) -> String {
    let mut host = base_url.trim().to_string();
    if host.is_empty() {
        host = default.to_string();
    }
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("https://{host}");
    }
    host.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_roundtrip() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.selector().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let err = "gpt-5".parse::<ModelKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModel(ref s) if s == "gpt-5"));
    }

    #[test]
    fn run_labels() {
        assert_eq!(run_label(ModelKind::O3, true), "o3-2025-04-16");
        assert_eq!(run_label(ModelKind::Gpt41, false), "gpt-4.1-2025-04-14");
        assert_eq!(run_label(ModelKind::Gemini25Flash, true), "gemini-2.5-flash_reasoning");
        assert_eq!(
            run_label(ModelKind::Claude37Sonnet, false),
            "claude-3-7-sonnet_non-reasoning"
        );
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn mock_needs_no_credential() {
        let config = LlmConfig::from_lookup(ModelKind::Mock, false, vars(&[])).unwrap();
        assert!(config.api_key.is_empty());
        assert_eq!(config.timeout, Some(Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS)));
    }

    #[test]
    fn missing_credential_is_fatal() {
        for kind in [ModelKind::O3, ModelKind::Gemini25Flash, ModelKind::Claude37Sonnet] {
            let err = LlmConfig::from_lookup(kind, false, vars(&[])).unwrap_err();
            assert!(matches!(err, ConfigError::MissingCredential { .. }), "{kind}");
        }
        let err = LlmConfig::from_lookup(ModelKind::Gpt41, false, vars(&[(OPENAI_API_KEY_ENV, "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { var: OPENAI_API_KEY_ENV, .. }));
    }

    #[test]
    fn credential_and_overrides_are_read() {
        let config = LlmConfig::from_lookup(
            ModelKind::Claude37Sonnet,
            true,
            vars(&[
                (ANTHROPIC_API_KEY_ENV, "sk-test"),
                (ANTHROPIC_BASE_URL_ENV, "http://127.0.0.1:8080"),
                (LVDERIV_LLM_TIMEOUT_SECS_ENV, "0"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(config.timeout, None);
        assert_eq!(config.run_label(), "claude-3-7-sonnet_reasoning");
    }

    #[test]
    fn bad_timeout_is_invalid() {
        let err = LlmConfig::from_lookup(ModelKind::Mock, false, vars(&[(LVDERIV_LLM_TIMEOUT_SECS_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(parse_timeout(Some("0")).unwrap(), None);
        assert_eq!(parse_timeout(Some(" 7 ")).unwrap(), Some(Duration::from_secs(7)));
        assert_eq!(parse_timeout(Some("")).unwrap(), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout(None).unwrap(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn base_url_normalization() {
        assert_eq!(
            normalize_http_base_url("api.example.com/", DEFAULT_OPENAI_BASE_URL),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_http_base_url("  ", DEFAULT_ANTHROPIC_BASE_URL),
            DEFAULT_ANTHROPIC_BASE_URL
        );
    }
}
