use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The caller presented no credential, or the backend rejected it.
    #[error("invalid or missing API token")]
    InvalidToken,

    /// The backend answered with a non-2xx status; the message body is
    /// passed through to the user.
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cannot decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}
