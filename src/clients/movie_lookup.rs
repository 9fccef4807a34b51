use async_trait::async_trait;
use thiserror::Error;

use crate::model::enrichment::EnrichmentFields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    Found(EnrichmentFields),
    NotFound,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Rate limited")]
    RateLimited,

    #[error("Connection error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LookupError {
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::Network(_) => true,
            LookupError::Api { status, .. } => *status >= 500,
            LookupError::RateLimited | LookupError::InvalidResponse(_) => false,
        }
    }
}

/// Anything that can turn a title (and optional year) into enrichment fields.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, title: &str, year: Option<&str>)
        -> Result<LookupResponse, LookupError>;
}
