use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtworkError {
    #[error("Fetch denied by policy: {0}")]
    PolicyDenied(String),

    #[error("No artwork found in any permitted source")]
    AllSourcesExhausted,

    #[error("Image decoding failed: {0}")]
    Decode(String),

    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Rate limited by {provider}, retry after {retry_after_seconds}s")]
    RateLimited {
        provider: String,
        retry_after_seconds: u64,
    },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Track carries no artwork identity")]
    MissingIdentity,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, ArtworkError>;
