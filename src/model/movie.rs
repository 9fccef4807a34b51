use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::enrichment::EnrichmentFields;

// keys not typed here land in `extra` and are written back untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieRecord {
    pub fn titled(title: &str, year: Option<&str>) -> Self {
        MovieRecord {
            title: Some(title.to_string()),
            year: year.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn lookup_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn lookup_year(&self) -> Option<&str> {
        self.year.as_deref().filter(|y| !y.is_empty())
    }

    pub fn numeric_year(&self) -> Option<u32> {
        self.lookup_year().and_then(|y| y.trim().parse::<u32>().ok())
    }

    pub fn has_cast(&self) -> bool {
        self.cast.as_ref().is_some_and(|cast| !cast.is_empty())
    }

    pub fn needs_enrichment(&self) -> bool {
        self.lookup_title().is_some() && !self.has_cast()
    }

    // an existing director or poster is never blanked out
    pub fn apply_enrichment(&mut self, fields: EnrichmentFields) {
        self.cast = Some(fields.cast);
        merge_text_field(&mut self.director, fields.director);
        merge_text_field(&mut self.poster, fields.poster);
    }

    pub fn display_title(&self) -> &str {
        self.lookup_title().unwrap_or("Unknown Title")
    }
}

fn merge_text_field(current: &mut Option<String>, incoming: Option<String>) {
    let Some(incoming) = incoming else {
        return;
    };

    if !incoming.is_empty() || current.is_none() {
        *current = Some(incoming);
    }
}
