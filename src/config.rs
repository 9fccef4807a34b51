use std::path::{Path, PathBuf};

use crate::{clients::omdb_client::OmdbConfig, enrichment::enrichment_pass::PassOptions};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub in_place: bool,
    pub fallback_table: Option<PathBuf>,
    pub omdb: OmdbConfig,
    /// Extra attempts per lookup on network or server errors; 0 disables retrying.
    pub retries: usize,
    pub pass: PassOptions,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, omdb: OmdbConfig) -> Self {
        let input = input.into();
        RunConfig {
            output: RunConfig::default_output_path(&input),
            input,
            in_place: false,
            fallback_table: None,
            omdb,
            retries: 0,
            pass: PassOptions::default(),
        }
    }

    pub fn default_output_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "movies".to_string());
        input.with_file_name(format!("{}_with_cast.json", stem))
    }
}
