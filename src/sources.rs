use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::request::AcquisitionRequest;

// @module: Subtitle provider catalogue and candidate URL templates

// Candidate lists stay short on purpose: every extra guess is another
// network round trip before the next source can be tried
const MAX_CANDIDATES_PER_SOURCE: usize = 3;

/// Subtitle provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleSource {
    // @source: my-subs.co direct SRT files
    #[default]
    MySubs,
    // @source: tvsubtitles.net direct SRT files
    TvSubtitles,
    // @source: opensubtitles.org direct SRT files
    OpenSubtitles,
}

impl SubtitleSource {
    // @returns: Capitalized source name as used in track labels
    pub fn display_name(&self) -> &str {
        match self {
            Self::MySubs => "My-Subs",
            Self::TvSubtitles => "TVsubtitles",
            Self::OpenSubtitles => "OpenSubtitles",
        }
    }

    // @returns: Lowercase source identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::MySubs => "mysubs".to_string(),
            Self::TvSubtitles => "tvsubtitles".to_string(),
            Self::OpenSubtitles => "opensubtitles".to_string(),
        }
    }

    /// Site root the candidate paths are appended to
    pub fn base_url(&self) -> &str {
        match self {
            Self::MySubs => "https://my-subs.co",
            Self::TvSubtitles => "https://www.tvsubtitles.net",
            Self::OpenSubtitles => "https://www.opensubtitles.org",
        }
    }

    /// Build the ordered candidate URLs for a request.
    ///
    /// The paths are best-effort guesses at each site's direct-file layout:
    /// a year-qualified or id-keyed form first when the request carries that
    /// detail, the plain dashed slug next, an underscore-delimited variant
    /// last. Content validation after the fetch is what actually decides
    /// whether a guess was right. Pure string assembly, no I/O.
    pub fn candidate_urls(&self, request: &AcquisitionRequest) -> Vec<String> {
        let base = self.base_url();
        let dash = request.dash_slug();
        let underscore = request.underscore_slug();
        let lang = &request.language;

        let mut urls = Vec::new();
        match self {
            Self::MySubs => {
                if let Some(year) = request.year {
                    urls.push(format!("{base}/subtitles/{dash}-{year}-{lang}.srt"));
                }
                urls.push(format!("{base}/subtitles/{dash}-{lang}.srt"));
                urls.push(format!("{base}/subtitles/{underscore}_{lang}.srt"));
            }
            Self::TvSubtitles => {
                if let Some(year) = request.year {
                    urls.push(format!("{base}/files/{dash}-{year}-{lang}.srt"));
                }
                urls.push(format!("{base}/files/{dash}-{lang}.srt"));
                urls.push(format!("{base}/files/{underscore}_{lang}.srt"));
            }
            Self::OpenSubtitles => {
                if let Some(imdb) = &request.imdb_id {
                    urls.push(format!("{base}/srt/{imdb}-{lang}.srt"));
                }
                urls.push(format!("{base}/srt/{dash}-{lang}.srt"));
                urls.push(format!("{base}/srt/{underscore}_{lang}.srt"));
            }
        }

        dedupe_preserving_order(&mut urls);
        urls.truncate(MAX_CANDIDATES_PER_SOURCE);
        urls
    }
}

// Implement Display trait for SubtitleSource
impl std::fmt::Display for SubtitleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for SubtitleSource
impl std::str::FromStr for SubtitleSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "mysubs" => Ok(Self::MySubs),
            "tvsubtitles" => Ok(Self::TvSubtitles),
            "opensubtitles" => Ok(Self::OpenSubtitles),
            _ => Err(anyhow!("Invalid subtitle source: {}", s)),
        }
    }
}

fn dedupe_preserving_order(urls: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    urls.retain(|url| seen.insert(url.clone()));
}
