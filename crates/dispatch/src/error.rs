use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// The classifier emitted an operation name no factory is registered
    /// for. A registry/classifier mismatch, not a user error.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("malformed operation token: {0}")]
    MalformedToken(#[from] stratus_protocol::TokenError),

    /// A wizard was asked to run for a caller with no API token.
    #[error("caller has no API token")]
    MissingToken,

    #[error("intent classifier failed: {0}")]
    Classifier(String),

    #[error(transparent)]
    Backend(#[from] stratus_backend::BackendError),
}
