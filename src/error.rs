use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtractorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Snap unit {0} must be between 1 and 90 and divide 180")]
    InvalidSnapUnit(u16),
}

pub type Result<T> = std::result::Result<T, ProtractorError>;
