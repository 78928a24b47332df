/*!
 * Common test utilities for the subseek test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;

use subseek::request::AcquisitionRequest;
use subseek::sources::SubtitleSource;

/// Route log output through env_logger so RUST_LOG surfaces parser and
/// acquisition diagnostics during test debugging. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A well-formed three-block SRT payload
pub const SAMPLE_SRT: &str = "1\n\
00:00:01,000 --> 00:00:04,000\n\
This is a test subtitle.\n\
\n\
2\n\
00:00:05,000 --> 00:00:09,000\n\
It contains multiple entries.\n\
\n\
3\n\
00:00:10,000 --> 00:00:14,000\n\
For testing purposes.\n";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Builds an SRT payload with `count` sequential one-second blocks
pub fn build_srt(count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        let start = 2 * i as u64;
        let end = start + 1;
        out.push_str(&format!(
            "{}\n00:00:{:02},000 --> 00:00:{:02},500\nCaption number {}\n\n",
            i + 1,
            start,
            end,
            i + 1
        ));
    }
    out
}

/// A request for "The Matrix" in English against the default source
pub fn matrix_request() -> AcquisitionRequest {
    AcquisitionRequest::new("The Matrix", Some(1999), "en", SubtitleSource::MySubs)
        .expect("valid request")
}
