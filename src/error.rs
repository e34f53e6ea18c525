use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unsupported file type '{0}'. Please upload CSV or extracted PDF text.")]
    UnsupportedFileType(String),

    #[error("Document contains no readable lines: {0}")]
    EmptyDocument(String),

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "openai")]
    #[error("No API key available for narration (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[cfg(feature = "openai")]
    #[error("Narration service error: {0}")]
    Narration(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
