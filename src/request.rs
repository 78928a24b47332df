use anyhow::{anyhow, Result};

use crate::language_utils;
use crate::sources::SubtitleSource;

// @module: Acquisition request and title normalization

// @struct: One subtitle lookup: what to search and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionRequest {
    // @field: Title as the user gave it
    pub title: String,

    // @field: Release year, narrows the candidate URLs when known
    pub year: Option<u16>,

    // @field: Lowercase two-letter language code
    pub language: String,

    // @field: Provider the candidates are built against
    pub source: SubtitleSource,

    // @field: IMDb identifier (e.g. "tt0133093") for id-keyed candidates
    pub imdb_id: Option<String>,
}

impl AcquisitionRequest {
    // @creates: Validated request
    // @validates: Sluggable title and a recognized language code
    pub fn new(title: &str, year: Option<u16>, language: &str, source: SubtitleSource) -> Result<Self> {
        let language = language_utils::normalize_to_part1(language)?;
        let title = title.trim().to_string();

        if slugify(&title, '-').is_empty() {
            return Err(anyhow!("Title '{}' has no characters usable in a URL", title));
        }

        Ok(AcquisitionRequest {
            title,
            year,
            language,
            source,
            imdb_id: None,
        })
    }

    /// Attach an IMDb identifier; blank values are ignored
    pub fn with_imdb_id(mut self, imdb_id: &str) -> Self {
        let cleaned = imdb_id.trim();
        if !cleaned.is_empty() {
            self.imdb_id = Some(cleaned.to_string());
        }
        self
    }

    /// Lowercase title slug with `-` between words
    pub fn dash_slug(&self) -> String {
        slugify(&self.title, '-')
    }

    /// Lowercase title slug with `_` between words
    pub fn underscore_slug(&self) -> String {
        slugify(&self.title, '_')
    }

    /// Uppercase language code as it appears in track labels
    pub fn label_language(&self) -> String {
        self.language.to_uppercase()
    }
}

/// Normalize a title for URL building: lowercase, keep only ASCII word
/// characters and whitespace, then join the words with `separator`.
/// Deterministic and free of any I/O; the same title always yields the
/// same slug.
pub fn slugify(title: &str, separator: char) -> String {
    let mut cleaned = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            cleaned.push(c);
        } else if c.is_whitespace() {
            cleaned.push(' ');
        }
    }

    let sep = separator.to_string();
    cleaned.split_whitespace().collect::<Vec<_>>().join(&sep)
}
