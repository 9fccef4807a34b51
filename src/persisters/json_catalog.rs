use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{error::CatalogError, model::movie::MovieRecord};

pub struct JsonCatalog {}

impl JsonCatalog {
    pub fn load_catalog(path: &Path) -> Result<Vec<MovieRecord>, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CatalogError::InputNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CatalogError::InputRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|e| CatalogError::InputMalformed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    // written to a temp file next to `path`, then renamed over it
    pub fn save_catalog(path: &Path, movies: &[MovieRecord]) -> Result<(), CatalogError> {
        let write_failed = |source: io::Error| CatalogError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let content = serde_json::to_string_pretty(movies)
            .map_err(|e| write_failed(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(directory).map_err(write_failed)?;
        temp_file.write_all(content.as_bytes()).map_err(write_failed)?;
        temp_file.flush().map_err(write_failed)?;
        temp_file
            .persist(path)
            .map_err(|e| write_failed(e.error))?;

        Ok(())
    }

    pub fn check_output_path(input: &Path, output: &Path, in_place: bool) -> Result<(), CatalogError> {
        if in_place || !JsonCatalog::same_file(input, output) {
            return Ok(());
        }

        Err(CatalogError::InPlaceNotRequested {
            path: output.to_path_buf(),
        })
    }

    fn same_file(a: &Path, b: &Path) -> bool {
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => a == b,
        }
    }
}
