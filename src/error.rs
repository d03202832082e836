use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilError {
    /// Parallel columns of a table disagree in length.
    #[error("Validation: all columns of {table} must have the same length, got {lengths}")]
    Validation { table: &'static str, lengths: String },

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    /// The remote service answered, but not with a success status.
    #[error("External service error (HTTP {status}): {body}")]
    ExternalService { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Invalid plot configuration: {0}")]
    InvalidConfig(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SoilError>;
