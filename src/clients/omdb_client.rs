use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use crate::{
    clients::movie_lookup::{LookupError, LookupResponse, MovieLookup},
    extractors::omdb_extractor::OmdbExtractor,
};

pub const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
    /// Adds `type=movie`, so series and episodes with the same title are skipped.
    pub movies_only: bool,
    pub upscale_posters: bool,
    pub timeout: Duration,
}

impl OmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        OmdbConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_OMDB_BASE_URL.to_string(),
            movies_only: true,
            upscale_posters: false,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    config: OmdbConfig,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Result<Self, reqwest::Error> {
        let user_agent = header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    fn query_params<'a>(&'a self, title: &'a str, year: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![("t", title)];
        if let Some(year) = year {
            params.push(("y", year));
        }
        params.push(("apikey", self.config.api_key.as_str()));
        params.push(("plot", "short"));
        if self.config.movies_only {
            params.push(("type", "movie"));
        }
        params
    }

    async fn get_title_body(&self, title: &str, year: Option<&str>) -> Result<String, LookupError> {
        let resp = self
            .client
            .get(self.config.base_url.as_str())
            .query(&self.query_params(title, year))
            .send()
            .await
            .map_err(|e| LookupError::Network(format!("request for '{}' failed: {}", title, e)))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimited);
        }

        let body = resp.text().await.map_err(|e| {
            LookupError::Network(format!("failed to read body for '{}': {}", title, e))
        })?;

        if !status.is_success() {
            if OmdbExtractor::is_rate_limit_body(&body) {
                return Err(LookupError::RateLimited);
            }
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl MovieLookup for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn lookup(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<LookupResponse, LookupError> {
        log::debug!("Querying OMDb for {} ({})", title, year.unwrap_or("any year"));
        let body = self.get_title_body(title, year).await?;
        OmdbExtractor::extract_response(&body, self.config.upscale_posters)
    }
}
