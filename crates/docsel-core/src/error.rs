use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Document cannot be selected: {0}")]
    Unselectable(String),

    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
