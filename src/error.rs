use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid patient profile: {0}")]
    InvalidProfile(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Advisory source unavailable: {0}")]
    AdvisoryUnavailable(String),

    #[error("Advisory call timed out after {millis}ms")]
    AdvisoryTimeout { millis: u64 },

    #[error("Malformed advisory response: {0}")]
    MalformedAdvisory(String),
}

pub type AdrResult<T> = Result<T, AdrError>;
