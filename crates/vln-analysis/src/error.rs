use thiserror::Error;

/// Failure of a single text-generation call.
///
/// The dispatcher never propagates these: each one becomes a degraded
/// `ProviderResponse`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{provider} returned status {status}: {body}")]
    UnexpectedStatus {
        provider: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the provider's documented shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
