/*!
 * Subtitle acquisition strategy.
 *
 * Given a request, the acquirer walks a short plan of candidate URLs:
 * each candidate is fetched directly first, then through every configured
 * relay prefix in order, and the first body that validates as SubRip and
 * parses to at least one record wins. Attempts are strictly sequential;
 * nothing is probed past the first success. When the whole plan fails, the
 * error carries every attempted URL with its reason.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use log::{debug, info, warn};
use url::Url;

use crate::errors::{AcquireError, AttemptFailure, AttemptRecord};
use crate::fetch::Fetcher;
use crate::request::AcquisitionRequest;
use crate::srt_codec::{self, CaptionTrack};
use crate::subtitle_cache::SubtitleCache;

// @struct: One planned fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    // @field: URL handed to the fetcher, relay-wrapped when a relay is in play
    pub fetch_url: String,

    // @field: The candidate being probed
    pub target_url: String,

    // @field: Relay prefix in use, None for a direct attempt
    pub relay: Option<String>,
}

impl Attempt {
    fn describe(&self) -> String {
        match &self.relay {
            Some(relay) => format!("{} via {}", self.target_url, relay),
            None => format!("{} (direct)", self.target_url),
        }
    }
}

// @struct: Cursor over the candidate and relay lists
//
// relay_index 0 means a direct fetch; 1..=relays.len() selects a relay.
// Once the relays for a candidate are spent the cursor moves to the next
// candidate's direct fetch.
#[derive(Debug, Clone)]
pub struct AttemptPlan {
    candidates: Vec<String>,
    relays: Vec<String>,
    candidate_index: usize,
    relay_index: usize,
}

impl AttemptPlan {
    pub fn new(candidates: Vec<String>, relays: Vec<String>) -> Self {
        AttemptPlan {
            candidates,
            relays,
            candidate_index: 0,
            relay_index: 0,
        }
    }

    /// How many attempts this plan can make in total
    pub fn total_attempts(&self) -> usize {
        self.candidates.len() * (self.relays.len() + 1)
    }

    /// Advance the cursor and describe the next fetch, or None when the
    /// plan is spent
    pub fn next_attempt(&mut self) -> Option<Attempt> {
        let candidate = self.candidates.get(self.candidate_index)?.clone();

        let attempt = if self.relay_index == 0 {
            Attempt {
                fetch_url: candidate.clone(),
                target_url: candidate,
                relay: None,
            }
        } else {
            let relay = self.relays[self.relay_index - 1].clone();
            Attempt {
                fetch_url: relay_wrap(&relay, &candidate),
                target_url: candidate,
                relay: Some(relay),
            }
        };

        self.relay_index += 1;
        if self.relay_index > self.relays.len() {
            self.relay_index = 0;
            self.candidate_index += 1;
        }

        Some(attempt)
    }
}

/// Build the relay form of a candidate URL. Prefixes carrying a query
/// parameter get the candidate percent-encoded; plain path prefixes get it
/// appended as-is.
pub fn relay_wrap(relay: &str, target: &str) -> String {
    if relay.contains('?') {
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{}{}", relay, encoded)
    } else {
        format!("{}{}", relay, target)
    }
}

/// Walks candidate URLs and relays until one yields a usable caption track
pub struct SubtitleAcquirer {
    /// Transport the attempts go through
    fetcher: Arc<dyn Fetcher>,

    /// Relay prefixes tried, in order, after a direct fetch fails
    relays: Vec<String>,

    /// Optional cache of previously accepted bodies
    cache: Option<SubtitleCache>,

    /// Optional cooperative stop flag, checked between attempts
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl SubtitleAcquirer {
    /// Create an acquirer over a fetcher and an ordered relay list.
    /// Blank relay entries are dropped.
    pub fn new(fetcher: Arc<dyn Fetcher>, relays: Vec<String>) -> Self {
        let relays = relays
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        SubtitleAcquirer {
            fetcher,
            relays,
            cache: None,
            cancel_flag: None,
        }
    }

    /// Reuse accepted bodies across lookups
    pub fn with_cache(mut self, cache: SubtitleCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Stop between attempts once the flag is raised
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Acquire a caption track for a request.
    ///
    /// Candidates come from the request's source; the winning track is
    /// labelled "{LANG} - {source name}". On exhaustion the error lists
    /// every URL tried and why it was rejected.
    pub async fn acquire(&self, request: &AcquisitionRequest) -> Result<CaptionTrack, AcquireError> {
        let label = format!(
            "{} - {}",
            request.label_language(),
            request.source.display_name()
        );

        if let Some(track) = self.from_cache(request, &label) {
            return Ok(track);
        }

        let candidates = request.source.candidate_urls(request);
        if candidates.is_empty() {
            return Err(AcquireError::InvalidRequest(format!(
                "No candidate URLs could be built for '{}'",
                request.title
            )));
        }

        info!(
            "Looking up '{}' ({}) on {}: {} candidate URL(s), {} relay(s)",
            request.title,
            request.language,
            request.source.display_name(),
            candidates.len(),
            self.relays.len()
        );

        let (track, body) = self.run_plan(candidates, &label).await?;

        if let Some(cache) = &self.cache {
            cache.store(request, &body);
        }

        Ok(track)
    }

    /// Acquire a caption track from one user-supplied URL, still falling
    /// back through the relays when the direct fetch fails
    pub async fn acquire_from_url(
        &self,
        target_url: &str,
        language: Option<&str>,
    ) -> Result<CaptionTrack, AcquireError> {
        if Url::parse(target_url).is_err() {
            return Err(AcquireError::InvalidRequest(format!(
                "'{}' is not a valid URL",
                target_url
            )));
        }

        let label = match language {
            Some(code) => format!("{} - Manual URL", code.to_uppercase()),
            None => "Manual URL".to_string(),
        };

        info!("Fetching manual subtitle URL {}", target_url);

        let (track, _body) = self.run_plan(vec![target_url.to_string()], &label).await?;
        Ok(track)
    }

    fn from_cache(&self, request: &AcquisitionRequest, label: &str) -> Option<CaptionTrack> {
        let cache = self.cache.as_ref()?;
        let body = cache.get(request)?;

        let records = srt_codec::parse(&body);
        match CaptionTrack::new(label.to_string(), records) {
            Ok(track) => Some(track),
            // A cached body that no longer parses is ignored and re-fetched
            Err(_) => None,
        }
    }

    async fn run_plan(
        &self,
        candidates: Vec<String>,
        label: &str,
    ) -> Result<(CaptionTrack, String), AcquireError> {
        let mut plan = AttemptPlan::new(candidates, self.relays.clone());
        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(plan.total_attempts());

        while let Some(attempt) = plan.next_attempt() {
            if self.is_cancelled() {
                info!("Acquisition cancelled after {} attempt(s)", attempts.len());
                return Err(AcquireError::Cancelled { attempts });
            }

            debug!("Trying {}", attempt.describe());

            match self.try_attempt(&attempt, label).await {
                Ok((track, body)) => {
                    info!(
                        "Accepted {} ({} records, {})",
                        attempt.describe(),
                        track.record_count(),
                        srt_codec::format_timecode(track.span_secs())
                    );
                    return Ok((track, body));
                }
                Err(reason) => {
                    warn!("Rejected {}: {}", attempt.describe(), reason);
                    attempts.push(AttemptRecord {
                        url: attempt.target_url,
                        relay: attempt.relay,
                        reason,
                    });
                }
            }
        }

        Err(AcquireError::Exhausted { attempts })
    }

    async fn try_attempt(
        &self,
        attempt: &Attempt,
        label: &str,
    ) -> Result<(CaptionTrack, String), AttemptFailure> {
        let response = self
            .fetcher
            .fetch_text(&attempt.fetch_url)
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(AttemptFailure::HttpStatus(response.status));
        }

        if !srt_codec::looks_like_subrip(&response.body) {
            return Err(AttemptFailure::NotSubtitle);
        }

        let records = srt_codec::parse(&response.body);
        if records.is_empty() {
            return Err(AttemptFailure::NoRecords);
        }

        let track = CaptionTrack::new(label.to_string(), records)
            .map_err(|_| AttemptFailure::NoRecords)?;
        Ok((track, response.body))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}
