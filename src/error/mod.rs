use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerialTraceError {
    #[error("Invalid serialization entry: {0}")]
    InvalidEntry(String),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerialTraceError>;
