/*!
 * Tests for the in-memory subtitle cache
 */

use subseek::request::AcquisitionRequest;
use subseek::sources::SubtitleSource;
use subseek::subtitle_cache::SubtitleCache;
use crate::common;

/// Test store and retrieve for the same request
#[test]
fn test_cache_withStoredBody_shouldReturnItForSameRequest() {
    let cache = SubtitleCache::new(true);
    let request = common::matrix_request();

    assert!(cache.get(&request).is_none());
    cache.store(&request, common::SAMPLE_SRT);

    assert_eq!(cache.get(&request).as_deref(), Some(common::SAMPLE_SRT));
    assert_eq!(cache.len(), 1);
}

/// Test the key separates languages and sources for one title
#[test]
fn test_cache_withDifferentLanguageOrSource_shouldMiss() {
    let cache = SubtitleCache::new(true);
    let en = common::matrix_request();
    let fr =
        AcquisitionRequest::new("The Matrix", Some(1999), "fr", SubtitleSource::MySubs).unwrap();
    let other_source =
        AcquisitionRequest::new("The Matrix", Some(1999), "en", SubtitleSource::TvSubtitles)
            .unwrap();

    cache.store(&en, common::SAMPLE_SRT);

    assert!(cache.get(&fr).is_none());
    assert!(cache.get(&other_source).is_none());
    assert!(cache.get(&en).is_some());
}

/// Test hit and miss counters feed the stats tuple
#[test]
fn test_cache_stats_withHitsAndMisses_shouldTrackRates() {
    let cache = SubtitleCache::new(true);
    let request = common::matrix_request();

    let _ = cache.get(&request); // miss
    cache.store(&request, common::SAMPLE_SRT);
    let _ = cache.get(&request); // hit
    let _ = cache.get(&request); // hit

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!(hits, 2);
    assert_eq!(misses, 1);
    assert!((hit_rate - 2.0 / 3.0).abs() < 1e-9);
}

/// Test a disabled cache never stores or returns anything
#[test]
fn test_cache_whenDisabled_shouldStayEmpty() {
    let cache = SubtitleCache::new(false);
    let request = common::matrix_request();

    cache.store(&request, common::SAMPLE_SRT);

    assert!(cache.get(&request).is_none());
    assert!(cache.is_empty());
    assert!(!cache.is_enabled());
}

/// Test clear drops entries and resets counters
#[test]
fn test_cache_clear_withEntries_shouldResetEverything() {
    let cache = SubtitleCache::new(true);
    let request = common::matrix_request();

    cache.store(&request, common::SAMPLE_SRT);
    let _ = cache.get(&request);
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats(), (0, 0, 0.0));
}

/// Test clones observe each other's writes
#[test]
fn test_cache_clone_withSharedStorage_shouldSeeWrites() {
    let cache = SubtitleCache::new(true);
    let clone = cache.clone();
    let request = common::matrix_request();

    cache.store(&request, common::SAMPLE_SRT);

    assert!(clone.get(&request).is_some());
}
