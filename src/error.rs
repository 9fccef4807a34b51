use std::path::PathBuf;

use thiserror::Error;

/// File-level failures. Any of these aborts the run before the catalog is written.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("input file {path} not found")]
    InputNotFound { path: PathBuf },

    #[error("could not read input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file {path} is not a JSON array of movies: {source}")]
    InputMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write output file {path}: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output {path} is the input file; pass --in-place to overwrite it")]
    InPlaceNotRequested { path: PathBuf },

    #[error("could not load fallback table {path}: {reason}")]
    FallbackTable { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("could not build HTTP client: {0}")]
    Client(String),
}
