use thiserror::Error;

/// Errors loading screening configuration
#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}
