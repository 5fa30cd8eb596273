use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid source: {0}")]
    InvalidSource(String),
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Renderer bundle error: {0}")]
    Bundle(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether the error came from the caller's descriptor rather than the
    /// transport or encoding steps
    pub fn is_invalid_source(&self) -> bool {
        matches!(self, BridgeError::InvalidSource(_))
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::Fetch(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Which presentation path a resolved source takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PayloadKind {
    /// The embedding surface loads the URI natively
    Uri,
    /// The payload is packaged into a standalone artifact
    Html,
}
