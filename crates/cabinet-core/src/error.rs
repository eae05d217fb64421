use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Input validation errors
    #[error("Invalid RFID tag: {0}")]
    InvalidRfid(String),

    // Hardware errors
    #[error("Hardware operation failed: {0}")]
    HardwareError(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
