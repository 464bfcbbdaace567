//! Scripted backend for tests and offline dry runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{LlmError, ModelBackend};

/// Replays a fixed list of responses in order, wrapping around at the end.
///
/// A `None` entry simulates a failed request.
pub struct MockBackend {
    responses: Vec<Option<String>>,
    response_idx: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(responses: Vec<String>) -> Self {
        Self::scripted(responses.into_iter().map(Some).collect())
    }

    pub fn scripted(responses: Vec<Option<String>>) -> Self {
        Self {
            responses,
            response_idx: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl ModelBackend for MockBackend {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut p) = self.prompts.lock() {
            p.push(prompt.to_string());
        }
        if self.responses.is_empty() {
            return Ok(String::new());
        }
        let idx = self.response_idx.fetch_add(1, Ordering::SeqCst);
        match &self.responses[idx % self.responses.len()] {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Api {
                backend: "mock",
                status: 503,
                body: "scripted failure".to_string(),
            }),
        }
    }

    fn label(&self) -> &str {
        "mock"
    }
}
