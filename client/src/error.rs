use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request to LCD failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from LCD: {0}")]
    InvalidResponse(String),

    #[error("LCD endpoint unreachable: {0}")]
    Unreachable(String),
}

impl ClientError {
    /// Transport-level failures that may succeed if simply retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestFailed(_) | Self::Unreachable(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ClientError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::RequestFailed(e.to_string())
        }
    }
}
