//! Error types for FruitSpin

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type FsResult<T> = Result<T, FsError>;
