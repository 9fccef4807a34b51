use async_trait::async_trait;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    RetryIf,
};

use crate::clients::movie_lookup::{LookupError, LookupResponse, MovieLookup};

/// Retries network and 5xx failures. Rate limiting is passed straight through.
#[derive(Debug, Clone)]
pub struct RetryingLookup<L> {
    inner: L,
    base_delay_millis: u64,
    max_retries: usize,
}

impl<L: MovieLookup> RetryingLookup<L> {
    pub fn new(inner: L, max_retries: usize) -> Self {
        Self {
            inner,
            base_delay_millis: 10,
            max_retries,
        }
    }

    pub fn with_base_delay_millis(mut self, base_delay_millis: u64) -> Self {
        self.base_delay_millis = base_delay_millis;
        self
    }
}

#[async_trait]
impl<L: MovieLookup> MovieLookup for RetryingLookup<L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn lookup(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<LookupResponse, LookupError> {
        let retry_strategy = ExponentialBackoff::from_millis(self.base_delay_millis)
            .map(jitter)
            .take(self.max_retries);

        RetryIf::start(
            retry_strategy,
            || async move {
                let result = self.inner.lookup(title, year).await;
                if let Err(e) = &result {
                    if e.is_transient() {
                        log::debug!("Transient {} failure for {}: {}", self.inner.name(), title, e);
                    }
                }
                result
            },
            |e: &LookupError| e.is_transient(),
        )
        .await
    }
}
