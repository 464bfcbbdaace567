//! LLM backends
//!
//! Every backend is reduced to one operation: prompt text in, response text
//! out ([`ModelBackend::generate`]). Request shaping and authentication stay
//! inside each backend; callers pick one once at startup via
//! [`create_backend`] and never branch on the provider again.
//!
//! Configuration is read from the environment (see [`config`]); a missing
//! credential for the selected backend is a [`ConfigError`].

pub mod config;
pub mod mock;
pub mod providers;

pub use config::{ConfigError, LlmConfig, ModelKind};
pub use mock::MockBackend;
pub use providers::{create_backend, AnthropicBackend, GeminiBackend, OpenAiBackend};

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{backend} http error {status}: {body}")]
    Api {
        backend: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A text generation backend.
pub trait ModelBackend {
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Label used in logs and output file names (e.g. `gemini-2.5-flash_reasoning`).
    fn label(&self) -> &str;
}

impl<T: ModelBackend + ?Sized> ModelBackend for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt)
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
