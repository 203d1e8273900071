use thiserror::Error;

/// Error type that captures tracker failures outside of input validation.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Stored ledger is corrupt: {0}")]
    CorruptState(String),
    #[error("Stored ledger uses schema version {found}, newest supported is {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// True when the stored value exists but cannot be trusted.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            TrackerError::CorruptState(_) | TrackerError::UnsupportedSchema { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
