use serde::Deserialize;

use crate::{
    clients::movie_lookup::{LookupError, LookupResponse},
    model::enrichment::EnrichmentFields,
};

const NOT_AVAILABLE: &str = "N/A";
const REQUEST_LIMIT_ERROR: &str = "Request limit reached!";

const POSTER_WIDTH_UPSCALES: [(&str, &str); 4] = [
    ("SX300", "SX600"),
    ("SX200", "SX600"),
    ("SX150", "SX600"),
    ("SX100", "SX600"),
];
const POSTER_HEIGHT_UPSCALES: [(&str, &str); 4] = [
    ("SY300", "SY900"),
    ("SY200", "SY900"),
    ("SY150", "SY900"),
    ("SY100", "SY900"),
];

#[derive(Debug, Deserialize)]
struct OmdbTitleBody {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Actors", default)]
    actors: Option<String>,
    #[serde(rename = "Director", default)]
    director: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Debug)]
pub struct OmdbExtractor {}

impl OmdbExtractor {
    pub fn extract_response(
        body: &str,
        upscale_posters: bool,
    ) -> Result<LookupResponse, LookupError> {
        let parsed: OmdbTitleBody = serde_json::from_str(body)
            .map_err(|e| LookupError::InvalidResponse(format!("parse OMDb body: {e}")))?;

        if parsed.response.eq_ignore_ascii_case("true") {
            let poster = OmdbExtractor::clean_field(parsed.poster);
            let poster = if upscale_posters {
                OmdbExtractor::upscale_poster(&poster)
            } else {
                poster
            };

            return Ok(LookupResponse::Found(EnrichmentFields {
                cast: OmdbExtractor::extract_cast(parsed.actors.as_deref()),
                director: Some(OmdbExtractor::clean_field(parsed.director)),
                poster: Some(poster),
            }));
        }

        if OmdbExtractor::is_rate_limit_error(parsed.error.as_deref()) {
            return Err(LookupError::RateLimited);
        }

        Ok(LookupResponse::NotFound)
    }

    /// OMDb also reports an exhausted daily quota in the body, usually with a 401.
    pub fn is_rate_limit_body(body: &str) -> bool {
        serde_json::from_str::<OmdbTitleBody>(body)
            .map(|parsed| OmdbExtractor::is_rate_limit_error(parsed.error.as_deref()))
            .unwrap_or(false)
    }

    fn is_rate_limit_error(error: Option<&str>) -> bool {
        error.is_some_and(|e| e.trim() == REQUEST_LIMIT_ERROR)
    }

    fn extract_cast(actors: Option<&str>) -> Vec<String> {
        match actors.map(str::trim) {
            None | Some("") | Some(NOT_AVAILABLE) => vec![],
            Some(actors) => actors
                .split(',')
                .map(|actor| actor.trim().to_string())
                .filter(|actor| !actor.is_empty())
                .collect(),
        }
    }

    fn clean_field(value: Option<String>) -> String {
        match value {
            Some(v) if v.trim() != NOT_AVAILABLE => v.trim().to_string(),
            _ => String::new(),
        }
    }

    /// Amazon-hosted posters encode their size in the URL; ask for a larger one.
    pub fn upscale_poster(poster: &str) -> String {
        if !poster.contains("_V1_") {
            return poster.to_string();
        }

        POSTER_WIDTH_UPSCALES
            .iter()
            .chain(POSTER_HEIGHT_UPSCALES.iter())
            .fold(poster.to_string(), |url, (from, to)| url.replace(from, to))
    }
}
