use crate::clients::movie_lookup::LookupError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentFields {
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub poster: Option<String>,
}

impl EnrichmentFields {
    pub fn cast_only(cast: Vec<String>) -> Self {
        EnrichmentFields {
            cast,
            director: None,
            poster: None,
        }
    }

    /// What a record degrades to when the lookup finds nothing or fails.
    pub fn empty() -> Self {
        EnrichmentFields {
            cast: vec![],
            director: Some(String::new()),
            poster: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    FallbackTable,
    Lookup,
}

#[derive(Debug)]
pub enum Resolution {
    Found {
        fields: EnrichmentFields,
        source: FieldSource,
    },
    NotFound,
    LookupFailed(LookupError),
    RateLimited,
}

impl Resolution {
    pub fn consumed_lookup(&self) -> bool {
        match self {
            Resolution::Found { source, .. } => *source == FieldSource::Lookup,
            Resolution::NotFound | Resolution::LookupFailed(_) => true,
            Resolution::RateLimited => false,
        }
    }

    pub fn into_fields(self) -> Option<EnrichmentFields> {
        match self {
            Resolution::Found { fields, .. } => Some(fields),
            Resolution::NotFound | Resolution::LookupFailed(_) => Some(EnrichmentFields::empty()),
            Resolution::RateLimited => None,
        }
    }
}
