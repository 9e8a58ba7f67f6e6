use nearby_providers::ProviderError;
use thiserror::Error;

/// Request-level failures. Everything else the pipeline can hit (generation
/// failures, the enrichment deadline) degrades internally and never reaches
/// the caller as an error.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl RecommendError {
    /// Envelope code for the outbound `{code, message, data}` shape.
    pub fn envelope_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Configuration(_) | Self::Provider(_) => 500,
        }
    }
}
