//! Run settings: command-line flag first, then environment, then default.

use std::time::Duration;

use anyhow::{anyhow, Result};
use lvderiv_llm::ModelKind;

pub const LVDERIV_MODEL_ENV: &str = "LVDERIV_MODEL";
pub const LVDERIV_REASONING_ENV: &str = "LVDERIV_REASONING";
pub const LVDERIV_MODEL_DELAY_MS_ENV: &str = "LVDERIV_MODEL_DELAY_MS";

pub const DEFAULT_MODEL: ModelKind = ModelKind::Claude37Sonnet;
const DEFAULT_MODEL_DELAY_MS: u64 = 1000;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn resolve_model<F>(flag: Option<&str>, lookup: F) -> Result<ModelKind>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(flag.map(str::to_string)).or_else(|| non_empty(lookup(LVDERIV_MODEL_ENV))) {
        Some(selector) => Ok(selector.parse::<ModelKind>()?),
        None => Ok(DEFAULT_MODEL),
    }
}

pub fn resolve_reasoning<F>(flag: bool, lookup: F) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    if flag {
        return Ok(true);
    }
    match non_empty(lookup(LVDERIV_REASONING_ENV)) {
        None => Ok(false),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow!(
                "invalid {LVDERIV_REASONING_ENV}={v:?} (expected 1/0, true/false, yes/no, on/off)"
            )),
        },
    }
}

pub fn resolve_model_delay<F>(lookup: F) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let ms = match non_empty(lookup(LVDERIV_MODEL_DELAY_MS_ENV)) {
        None => DEFAULT_MODEL_DELAY_MS,
        Some(v) => v.parse::<u64>().map_err(|_| {
            anyhow!("invalid {LVDERIV_MODEL_DELAY_MS_ENV}={v:?} (expected integer milliseconds)")
        })?,
    };
    Ok(Duration::from_millis(ms))
}

pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn flag_beats_env_beats_default() {
        let env = vars(&[(LVDERIV_MODEL_ENV, "gpt-4.1-2025-04-14")]);
        assert_eq!(resolve_model(Some("mock"), &env).unwrap(), ModelKind::Mock);
        assert_eq!(resolve_model(None, &env).unwrap(), ModelKind::Gpt41);
        assert_eq!(resolve_model(Some("  "), &env).unwrap(), ModelKind::Gpt41);
        assert_eq!(resolve_model(None, vars(&[])).unwrap(), DEFAULT_MODEL);
    }

    #[test]
    fn unknown_model_is_fatal() {
        assert!(resolve_model(Some("llama"), vars(&[])).is_err());
        assert!(resolve_model(None, vars(&[(LVDERIV_MODEL_ENV, "o4")])).is_err());
    }

    #[test]
    fn reasoning() {
        assert!(resolve_reasoning(true, vars(&[(LVDERIV_REASONING_ENV, "off")])).unwrap());
        assert!(resolve_reasoning(false, vars(&[(LVDERIV_REASONING_ENV, "Yes")])).unwrap());
        assert!(!resolve_reasoning(false, vars(&[])).unwrap());
        assert!(resolve_reasoning(false, vars(&[(LVDERIV_REASONING_ENV, "maybe")])).is_err());
    }

    #[test]
    fn model_delay() {
        assert_eq!(resolve_model_delay(vars(&[])).unwrap(), Duration::from_secs(1));
        assert_eq!(
            resolve_model_delay(vars(&[(LVDERIV_MODEL_DELAY_MS_ENV, "0")])).unwrap(),
            Duration::ZERO
        );
        assert!(resolve_model_delay(vars(&[(LVDERIV_MODEL_DELAY_MS_ENV, "1s")])).is_err());
    }
}
