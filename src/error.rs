use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid calibration table: {0}")]
    Calibration(String),

    #[error("Invalid block size {size}: must be a power of two and at least 4")]
    InvalidBlockSize { size: usize },

    #[error("Failed to parse configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
