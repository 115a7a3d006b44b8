use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid year '{0}': please enter a whole number.")]
    InvalidYear(String),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
