// crates/backlog-core/src/error.rs

use backlog_parser::ResponseError;
use thiserror::Error;

use crate::generator::GenerationError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Backlog text is empty")]
    EmptyInput,

    #[error("Generation quota exhausted: {message}")]
    QuotaExceeded { message: String },

    #[error("Text generation failed: {message}")]
    Generation { message: String },

    #[error("Model response could not be parsed: {0}")]
    UnparsableResponse(#[from] ResponseError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PipelineError::QuotaExceeded { .. })
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::QuotaExceeded { message } => PipelineError::QuotaExceeded { message },
            GenerationError::Failed { message } => PipelineError::Generation { message },
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
