//! Persistence errors

/// Save, load, export and import failures
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed save file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid save data: {0}")]
    Invalid(String),
}

pub type SaveResult<T> = Result<T, SaveError>;
