use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach scheduling service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid response payload: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ClientError::Unauthorized { message },
            404 => ClientError::NotFound { message },
            _ => ClientError::Rejected { status, message },
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Transport(_) => ErrorCode::Transport,
            ClientError::Unauthorized { .. } => ErrorCode::Unauthorized,
            ClientError::NotFound { .. } => ErrorCode::NotFound,
            ClientError::Rejected { status, .. } => ErrorCode::from_status(*status),
            ClientError::Decode(_) => ErrorCode::Internal,
            ClientError::InvalidInput(_) => ErrorCode::Validation,
        }
    }

    /// Profile lookups answer 404, or 401/403 when the user has no worker row
    /// yet; both mean "register first".
    pub fn is_missing_profile(&self) -> bool {
        matches!(
            self,
            ClientError::NotFound { .. } | ClientError::Unauthorized { .. }
        )
    }

    /// Text suitable for a dialog: the service's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized { message }
            | ClientError::NotFound { message }
            | ClientError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&ClientError> for ApiError {
    fn from(value: &ClientError) -> Self {
        ApiError::new(value.code(), value.user_message())
    }
}
