use std::{collections::HashMap, fs, io, path::Path};

use crate::error::CatalogError;

// titles match exactly, case and punctuation included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackTable {
    casts: HashMap<String, Vec<String>>,
}

impl FallbackTable {
    pub fn new(casts: HashMap<String, Vec<String>>) -> Self {
        FallbackTable { casts }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| {
            let reason = if e.kind() == io::ErrorKind::NotFound {
                "file not found".to_string()
            } else {
                e.to_string()
            };
            CatalogError::FallbackTable {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        let casts = serde_json::from_str(&content).map_err(|e| CatalogError::FallbackTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(FallbackTable::new(casts))
    }

    pub fn cast_for(&self, title: &str) -> Option<&[String]> {
        self.casts.get(title).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }
}

impl<T, A> FromIterator<(T, Vec<A>)> for FallbackTable
where
    T: Into<String>,
    A: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, Vec<A>)>>(iter: I) -> Self {
        FallbackTable::new(
            iter.into_iter()
                .map(|(title, cast)| (title.into(), cast.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}
