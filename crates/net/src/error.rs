//! Network error types

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    #[error("Empty response")]
    EmptyResponse,
}

impl Error {
    /// HTTP status of a failed call, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            Error::Client(e) => e.status().map(|s| s.as_u16()),
            Error::EmptyResponse => None,
        }
    }
}
