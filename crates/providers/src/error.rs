use thiserror::Error;

/// Failures of the map-search provider. Surfaced to the caller; a request
/// that hits one of these fails as a whole.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("map search transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("map search response was not decodable: {0}")]
    Malformed(String),

    #[error("map search provider rejected the request: {info} (code {code})")]
    Status { code: String, info: String },
}

/// Failures of the generation provider. Never surfaced; every variant is
/// absorbed into the rule fallback.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation provider is not configured")]
    Unconfigured,

    #[error("generation transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation response carried no usable content")]
    EmptyContent,

    #[error("generation provider returned status {0}")]
    BadStatus(u16),
}
