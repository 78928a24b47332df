/*!
 * Tests for SubRip parsing and encoding
 */

use std::fmt::Write;
use anyhow::Result;
use subseek::srt_codec::{self, CaptionRecord, CaptionTrack};
use subseek::errors::TimeCodeError;
use crate::common;

/// Test time code conversion for the documented reference values
#[test]
fn test_timecode_to_secs_withValidCodes_shouldMatchReferenceValues() {
    assert_eq!(srt_codec::timecode_to_secs("00:01:02,500").unwrap(), 62.5);
    assert_eq!(srt_codec::timecode_to_secs("01:00:00.000").unwrap(), 3600.0);
    assert_eq!(srt_codec::timecode_to_secs("00:00:00,000").unwrap(), 0.0);
}

/// Test that milliseconds are optional and both separators are accepted
#[test]
fn test_timecode_to_secs_withOptionalMillis_shouldParseBothForms() {
    assert_eq!(srt_codec::timecode_to_secs("00:00:05").unwrap(), 5.0);
    assert_eq!(srt_codec::timecode_to_secs("01:23:45,678").unwrap(), 5025.678);
    assert_eq!(srt_codec::timecode_to_secs("01:23:45.678").unwrap(), 5025.678);
}

/// Test time code conversion failure modes
#[test]
fn test_timecode_to_secs_withMalformedCodes_shouldReturnTypedErrors() {
    assert!(matches!(
        srt_codec::timecode_to_secs("12:34"),
        Err(TimeCodeError::Malformed { .. })
    ));
    assert!(matches!(
        srt_codec::timecode_to_secs("ab:cd:ef"),
        Err(TimeCodeError::NonNumeric { .. })
    ));
    assert!(matches!(
        srt_codec::timecode_to_secs(""),
        Err(TimeCodeError::Malformed { .. })
    ));
    assert!(matches!(
        srt_codec::timecode_to_secs("00:-1:00,000"),
        Err(TimeCodeError::NonNumeric { .. })
    ));
}

/// Test time code formatting round-trips the reference values
#[test]
fn test_format_timecode_withFractionalSeconds_shouldEmitCanonicalForm() {
    assert_eq!(srt_codec::format_timecode(62.5), "00:01:02,500");
    assert_eq!(srt_codec::format_timecode(3600.0), "01:00:00,000");
    assert_eq!(srt_codec::format_timecode(0.0), "00:00:00,000");
    assert_eq!(srt_codec::format_timecode(-5.0), "00:00:00,000");
}

/// Test the two-block example parses to exactly those records
#[test]
fn test_parse_withTwoBlocks_shouldYieldBothRecordsInOrder() {
    let text = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], CaptionRecord::new(1, 1.0, 2.0, "Hello".to_string()));
    assert_eq!(records[1], CaptionRecord::new(2, 3.0, 4.0, "World".to_string()));
}

/// Test that every well-formed block comes back, in source order, with
/// ordered offsets
#[test]
fn test_parse_withManyBlocks_shouldPreserveCountAndOrder() {
    let text = common::build_srt(25);
    let records = srt_codec::parse(&text);

    assert_eq!(records.len(), 25);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.index, i + 1);
        assert!(record.end_secs >= record.start_secs);
        assert!(record.text.contains(&format!("number {}", i + 1)));
    }
}

/// Test empty and unusable input yields an empty sequence, never a panic
#[test]
fn test_parse_withEmptyOrGarbageInput_shouldReturnEmptyVec() {
    assert!(srt_codec::parse("").is_empty());
    assert!(srt_codec::parse("   \n\n  \n").is_empty());
    assert!(srt_codec::parse("no subtitles here, just prose").is_empty());
}

/// Test CRLF line endings parse the same as LF
#[test]
fn test_parse_withCrlfLineEndings_shouldParseLikeLf() {
    let text = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "Hello");
    assert_eq!(records[1].text, "World");
}

/// Test lone-CR line endings (old Mac exports) parse the same as LF
#[test]
fn test_parse_withLoneCrLineEndings_shouldParseLikeLf() {
    let text = "1\r00:00:01,000 --> 00:00:02,000\rHello\r\r2\r00:00:03,000 --> 00:00:04,000\rWorld\r";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "Hello");
    assert_eq!(records[1].text, "World");
}

/// Test that dot-separated millisecond codes are accepted inside blocks
#[test]
fn test_parse_withDotSeparator_shouldAcceptTimeLine() {
    let text = "1\n00:00:01.500 --> 00:00:02.750\nHi\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].start_secs, 1.5);
    assert_eq!(records[0].end_secs, 2.75);
}

/// Test multi-line captions accumulate joined with newline
#[test]
fn test_parse_withMultiLineText_shouldJoinWithNewline() {
    let text = "1\n00:00:01,000 --> 00:00:02,000\nfirst line\nsecond line\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "first line\nsecond line");
}

/// Test the explicit policy: a timed block with no text is dropped
#[test]
fn test_parse_withTimedBlockWithoutText_shouldDropRecord() {
    let text = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].index, 1);
    assert_eq!(records[0].text, "Kept");
}

/// Test source ids are discarded and records re-indexed from 1
#[test]
fn test_parse_withDuplicateSourceIds_shouldReindexOnEmission() {
    let text = "7\n00:00:01,000 --> 00:00:02,000\nA\n\n7\n00:00:03,000 --> 00:00:04,000\nB\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].index, 1);
    assert_eq!(records[1].index, 2);
}

/// Test a malformed time code inside a block degrades to zero rather than
/// sinking the whole track
#[test]
fn test_parse_withMalformedTimeCode_shouldSubstituteZero() {
    let text = "1\nnot-a-time --> 00:00:02,000\nStill here\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].start_secs, 0.0);
    assert_eq!(records[0].end_secs, 2.0);
}

/// Test an inverted time range is clamped so end never precedes start
#[test]
fn test_parse_withInvertedRange_shouldClampEndToStart() {
    let text = "1\n00:00:05,000 --> 00:00:02,000\nBackwards\n";
    let records = srt_codec::parse(text);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].start_secs, 5.0);
    assert_eq!(records[0].end_secs, 5.0);
}

/// Test record display formatting
#[test]
fn test_caption_record_display_withValidRecord_shouldFormatAsSrtBlock() {
    let record = CaptionRecord::new(1, 5.0, 10.0, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", record).unwrap();

    assert!(output.contains("1"));
    assert!(output.contains("00:00:05,000 --> 00:00:10,000"));
    assert!(output.contains("Test subtitle"));
}

/// Test validated construction rejects bad records
#[test]
fn test_caption_record_new_validated_withBadInput_shouldReject() {
    assert!(CaptionRecord::new_validated(1, -1.0, 2.0, "x".to_string()).is_err());
    assert!(CaptionRecord::new_validated(1, 3.0, 2.0, "x".to_string()).is_err());
    assert!(CaptionRecord::new_validated(1, 1.0, 2.0, "   ".to_string()).is_err());
    assert!(CaptionRecord::new_validated(1, 1.0, 2.0, "ok".to_string()).is_ok());
}

/// Test a track is never constructed from zero records
#[test]
fn test_caption_track_new_withNoRecords_shouldFail() {
    assert!(CaptionTrack::new("EN - My-Subs".to_string(), Vec::new()).is_err());
}

/// Test parse -> encode -> parse is identity on records
#[test]
fn test_round_trip_withParsedTrack_shouldBeIdentityOnRecords() -> Result<()> {
    let records = srt_codec::parse(common::SAMPLE_SRT);
    let track = CaptionTrack::new("EN - My-Subs".to_string(), records.clone())?;

    let reparsed = srt_codec::parse(&track.to_srt_string());
    assert_eq!(reparsed, records);

    Ok(())
}

/// Test the SubRip sniff accepts real payloads and rejects prose
#[test]
fn test_looks_like_subrip_withVariousBodies_shouldClassifyCorrectly() {
    assert!(srt_codec::looks_like_subrip(common::SAMPLE_SRT));
    assert!(!srt_codec::looks_like_subrip("<html><body>404</body></html>"));
    // An arrow alone is not enough without a time shape
    assert!(!srt_codec::looks_like_subrip("a --> b"));
}

/// Test track span and record count helpers
#[test]
fn test_caption_track_helpers_withSampleTrack_shouldReportSpanAndCount() -> Result<()> {
    let track = srt_codec::parse_track("EN - My-Subs".to_string(), common::SAMPLE_SRT)?;

    assert_eq!(track.record_count(), 3);
    assert_eq!(track.span_secs(), 14.0);
    assert_eq!(track.records[0].duration_secs(), 3.0);

    Ok(())
}
