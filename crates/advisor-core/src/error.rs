use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
