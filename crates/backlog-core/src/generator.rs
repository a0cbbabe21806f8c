use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The model provider refused the call because a quota or rate limit was
    /// hit. Callers surface this separately; it is never retried here.
    #[error("generation quota exhausted: {message}")]
    QuotaExceeded { message: String },

    #[error("text generation failed: {message}")]
    Failed { message: String },
}

impl GenerationError {
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        GenerationError::QuotaExceeded {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        GenerationError::Failed {
            message: message.into(),
        }
    }
}

/// The text-in/text-out model call the pipeline is built around.
///
/// Implementations own prompt composition, transport and credentials. The
/// pipeline calls [`TextGenerator::generate`] once per run with the raw
/// backlog text and treats the reply as untrusted.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self(prompt)
    }
}
