/*!
 * In-memory cache of acquired subtitle payloads.
 *
 * Keyed by title slug, language, and source, so repeating a lookup within
 * one run skips the whole candidate/relay dance. Nothing is persisted:
 * the cache lives and dies with the process.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

use crate::request::AcquisitionRequest;

/// Cache key combining the normalized title, language, and source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Dash-separated title slug
    slug: String,

    /// Lowercase two-letter language code
    language: String,

    /// Lowercase source identifier
    source: String,
}

impl CacheKey {
    /// Derive the key for a request
    fn for_request(request: &AcquisitionRequest) -> Self {
        Self {
            slug: request.dash_slug(),
            language: request.language.clone(),
            source: request.source.to_lowercase_string(),
        }
    }
}

/// Cache of raw SRT bodies accepted by a previous acquisition
pub struct SubtitleCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl SubtitleCache {
    /// Create a new cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get the cached SRT body for a request
    pub fn get(&self, request: &AcquisitionRequest) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::for_request(request);
        let cache = self.cache.read();

        match cache.get(&key) {
            Some(body) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!(
                    "Cache hit for '{}' ({}, {})",
                    key.slug, key.language, key.source
                );

                Some(body.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;

                debug!(
                    "Cache miss for '{}' ({}, {})",
                    key.slug, key.language, key.source
                );

                None
            }
        }
    }

    /// Store an accepted SRT body for a request
    pub fn store(&self, request: &AcquisitionRequest, body: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::for_request(request);
        let mut cache = self.cache.write();

        debug!(
            "Caching {} bytes for '{}' ({}, {})",
            body.len(),
            key.slug,
            key.language,
            key.source
        );

        cache.insert(key, body.to_string());
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache and its counters
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Subtitle cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SubtitleCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for SubtitleCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}
