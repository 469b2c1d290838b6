/// Closed error set every feed adapter maps to (§4.2).
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed authentication failed: {0}")]
    AuthError(String),
    #[error("feed connection failed: {0}")]
    ConnectionError(String),
    #[error("feed API error: {0}")]
    ApiError(String),
    #[error("failed to parse feed response: {0}")]
    ParseError(String),
    #[error("feed rate limited, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },
    #[error("feed resource not found")]
    NotFound,
    #[error("invalid feed configuration: {0}")]
    ConfigError(String),
    #[error("IOC repository error: {0}")]
    StoreError(String),
}

impl FeedError {
    /// Any error text containing `429` or `rate` (case-insensitive) is
    /// reinterpreted as a rate-limit signal with the adapter's default
    /// backoff (§4.2, OTX adapter: `retry_after = 60`).
    pub fn from_provider_text(text: &str, default_retry_after: u64) -> FeedError {
        let lower = text.to_lowercase();
        if lower.contains("429") || lower.contains("rate") {
            FeedError::RateLimit {
                retry_after: default_retry_after,
            }
        } else {
            FeedError::ApiError(text.to_string())
        }
    }
}
