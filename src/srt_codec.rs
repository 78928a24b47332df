use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{debug, warn};

use crate::errors::TimeCodeError;

// @module: SubRip parsing and encoding

// @const: HH:MM:SS shape used to sniff SubRip payloads
static TIME_SHAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}").unwrap()
});

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionRecord {
    // @field: 1-based position in the emitted sequence
    pub index: usize,

    // @field: Start offset in seconds
    pub start_secs: f64,

    // @field: End offset in seconds, never before the start
    pub end_secs: f64,

    // @field: Caption text, inner lines joined with \n
    pub text: String,
}

impl CaptionRecord {
    /// Creates a new caption record without validation - used by tests and external consumers
    pub fn new(index: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        CaptionRecord {
            index,
            start_secs,
            end_secs,
            text,
        }
    }

    // @creates: Validated caption record
    // @validates: Non-negative ordered offsets and non-empty text
    pub fn new_validated(index: usize, start_secs: f64, end_secs: f64, text: String) -> Result<Self> {
        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(anyhow!("Invalid start offset {} for record {}", start_secs, index));
        }
        if !end_secs.is_finite() || end_secs < start_secs {
            return Err(anyhow!(
                "Invalid time range: end {} precedes start {}",
                end_secs, start_secs
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty caption text for record {}", index));
        }

        Ok(CaptionRecord {
            index,
            start_secs,
            end_secs,
            text: trimmed_text.to_string(),
        })
    }

    /// Seconds this caption stays on screen
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Start offset as a formatted SRT time code
    pub fn format_start_time(&self) -> String {
        format_timecode(self.start_secs)
    }

    /// End offset as a formatted SRT time code
    pub fn format_end_time(&self) -> String {
        format_timecode(self.end_secs)
    }
}

impl fmt::Display for CaptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

// @struct: Ordered caption records under a display label
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    // @field: Display label, e.g. "EN - My-Subs"
    pub label: String,

    // @field: Records in playback order, re-indexed from 1
    pub records: Vec<CaptionRecord>,
}

impl CaptionTrack {
    // @creates: Track from already-parsed records
    // @validates: At least one record
    pub fn new(label: String, records: Vec<CaptionRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(anyhow!("A caption track needs at least one record"));
        }
        Ok(CaptionTrack { label, records })
    }

    /// Number of records in the track
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// End offset of the last record, i.e. how far into playback the track reaches
    pub fn span_secs(&self) -> f64 {
        self.records.last().map(|r| r.end_secs).unwrap_or(0.0)
    }

    /// Canonical SRT rendition of the whole track
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_string());
        }
        out
    }

    /// Write the track to an SRT file, creating parent directories as needed
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for record in &self.records {
            write!(file, "{}", record)?;
        }

        Ok(())
    }
}

/// Convert an SRT time code (HH:MM:SS,mmm or HH:MM:SS.mmm, milliseconds
/// optional) into fractional seconds
pub fn timecode_to_secs(code: &str) -> Result<f64, TimeCodeError> {
    let cleaned = code.trim().replace(',', ".");
    let parts: Vec<&str> = cleaned.split(':').collect();

    if parts.len() != 3 {
        return Err(TimeCodeError::Malformed {
            code: code.trim().to_string(),
        });
    }

    let hours: u64 = parse_clock_component(code, parts[0])?;
    let minutes: u64 = parse_clock_component(code, parts[1])?;

    let seconds: f64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| TimeCodeError::NonNumeric {
            code: code.trim().to_string(),
            component: parts[2].trim().to_string(),
        })?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TimeCodeError::NonNumeric {
            code: code.trim().to_string(),
            component: parts[2].trim().to_string(),
        });
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Format fractional seconds as an SRT time code (HH:MM:SS,mmm)
pub fn format_timecode(secs: f64) -> String {
    let clamped = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
    let total_ms = (clamped * 1000.0).round() as u64;

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Cheap sniff for SubRip payloads: an arrow token plus at least one
/// HH:MM:SS-shaped time pattern
pub fn looks_like_subrip(text: &str) -> bool {
    text.contains("-->") && TIME_SHAPE_REGEX.is_match(text)
}

/// Parse SRT text into caption records.
///
/// Tolerant line-oriented pass: blank lines separate blocks, a digit-only
/// line opens the next block (its value is discarded, records are re-indexed
/// from 1 on emission), the first line holding `-->` inside a block carries
/// the time codes, everything after it is caption text. Blocks whose text is
/// empty are dropped. Never fails: unusable input yields an empty vec.
pub fn parse(content: &str) -> Vec<CaptionRecord> {
    // SubRip files arrive with \n, \r\n, or occasionally lone-\r endings;
    // fold everything to \n before splitting so \r\n never becomes a
    // spurious blank line
    let content = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut records = Vec::new();

    // Builder state for the block currently being read
    let mut block_open = false;
    let mut start_secs: Option<f64> = None;
    let mut end_secs: Option<f64> = None;
    let mut text = String::new();
    let mut line_number = 0;

    for line in content.lines() {
        line_number += 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if block_open {
                finalize_block(&mut records, start_secs, end_secs, &text);
                block_open = false;
                start_secs = None;
                end_secs = None;
                text.clear();
            }
            continue;
        }

        // A bare number is the source id of the next block; the value itself
        // is discarded and also ends any block still being read
        if is_digit_only(trimmed) {
            if block_open {
                finalize_block(&mut records, start_secs, end_secs, &text);
            }
            block_open = true;
            start_secs = None;
            end_secs = None;
            text.clear();
            continue;
        }

        if block_open && start_secs.is_none() && trimmed.contains("-->") {
            let (start, end) = parse_time_line(trimmed, line_number);
            start_secs = Some(start);
            end_secs = Some(end);
            continue;
        }

        if block_open && start_secs.is_some() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(trimmed);
        } else {
            debug!("Ignoring line {} outside any caption block: {}", line_number, trimmed);
        }
    }

    if block_open {
        finalize_block(&mut records, start_secs, end_secs, &text);
    }

    records
}

/// Parse a whole SRT payload into a labelled track
pub fn parse_track(label: String, content: &str) -> Result<CaptionTrack> {
    CaptionTrack::new(label, parse(content))
}

fn parse_clock_component(code: &str, component: &str) -> Result<u64, TimeCodeError> {
    component
        .trim()
        .parse()
        .map_err(|_| TimeCodeError::NonNumeric {
            code: code.trim().to_string(),
            component: component.trim().to_string(),
        })
}

/// Split a `start --> end` line into two offsets, substituting zero (with a
/// warning) for any side that fails to convert
fn parse_time_line(line: &str, line_number: usize) -> (f64, f64) {
    let mut sides = line.splitn(2, "-->");
    let raw_start = sides.next().unwrap_or("");
    let raw_end = sides.next().unwrap_or("");

    // Extended SRT may append position metadata after the end code
    let start_code = raw_start.split_whitespace().next().unwrap_or("");
    let end_code = raw_end.split_whitespace().next().unwrap_or("");

    (
        tolerant_secs(start_code, line_number),
        tolerant_secs(end_code, line_number),
    )
}

fn tolerant_secs(code: &str, line_number: usize) -> f64 {
    match timecode_to_secs(code) {
        Ok(secs) => secs,
        Err(e) => {
            warn!("Line {}: {}; substituting 00:00:00,000", line_number, e);
            0.0
        }
    }
}

/// Emit the finished block if it has time codes and non-empty text
fn finalize_block(
    records: &mut Vec<CaptionRecord>,
    start_secs: Option<f64>,
    end_secs: Option<f64>,
    text: &str,
) {
    let (Some(start), Some(end)) = (start_secs, end_secs) else {
        if !text.trim().is_empty() {
            debug!("Dropping caption block without time codes: {}", text.trim());
        }
        return;
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        debug!("Dropping caption block at {:.3}s with no text", start);
        return;
    }

    let end = if end < start {
        warn!(
            "End time {:.3}s precedes start {:.3}s; clamping to the start",
            end, start
        );
        start
    } else {
        end
    };

    records.push(CaptionRecord {
        index: records.len() + 1,
        start_secs: start,
        end_secs: end,
        text: trimmed.to_string(),
    });
}

fn is_digit_only(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}
