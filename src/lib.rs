/*!
 * # subseek - SubRip subtitle finder
 *
 * A Rust library for locating and parsing SubRip (SRT) subtitles.
 *
 * ## Features
 *
 * - Parse SubRip text into timed caption records, tolerating sloppy input
 * - Build heuristic download URLs per subtitle source from a title slug
 * - Fetch candidates sequentially, direct first, then through relay endpoints
 * - Validate payloads before accepting them as subtitle content
 * - Generic retry with linear backoff for transport-level flakiness
 * - In-memory caching of accepted payloads per (title, language, source)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `srt_codec`: SubRip parsing, time code conversion, canonical encoding
 * - `request`: Acquisition requests and title slug derivation
 * - `sources`: Subtitle provider catalogue and candidate URL templates
 * - `fetch`: The injected fetch capability:
 *   - `fetch::http`: reqwest-backed implementation
 *   - `fetch::mock`: scripted fetcher for tests
 * - `acquisition`: The candidate/relay walk that produces a caption track
 * - `retry`: Generic linear-backoff retry helper
 * - `subtitle_cache`: In-memory cache of accepted SRT payloads
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod acquisition;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod fetch;
pub mod file_utils;
pub mod language_utils;
pub mod request;
pub mod retry;
pub mod sources;
pub mod srt_codec;
pub mod subtitle_cache;

// Re-export main types for easier usage
pub use app_config::Config;
pub use acquisition::SubtitleAcquirer;
pub use request::AcquisitionRequest;
pub use sources::SubtitleSource;
pub use srt_codec::{CaptionRecord, CaptionTrack};
pub use fetch::{FetchResponse, Fetcher};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use errors::{AcquireError, AppError, AttemptFailure, AttemptRecord, FetchError, TimeCodeError};
