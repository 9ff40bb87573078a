use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("chain client error: {0}")]
    Client(#[from] govlens_client::ClientError),

    #[error("store error: {0}")]
    Store(#[from] govlens_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Whether offering the user a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Client(e) => e.is_retryable(),
            Self::Store(_) | Self::Config(_) | Self::Io(_) => false,
        }
    }
}
