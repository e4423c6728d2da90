use itdesk_auth::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the credential. The session has already been
    /// cleared and the client sent to the login view.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid endpoint: {0}")]
    InvalidUrl(String),

    #[error("session storage error: {0}")]
    Session(#[from] StoreError),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
