/*!
 * Unit tests for SRT cue parsing and serialization
 */

use sublingo::subtitle_codec::{parse_srt, serialize_srt, SubtitleCue};

use crate::common::SAMPLE_SRT;

#[test]
fn test_parse_srt_withSingleCue_shouldRoundTripByteIdentical() {
    let input = "1\n00:00:01,000 --> 00:00:03,000\nHello\n";

    let cues = parse_srt(input);
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].seq_num, 1);
    assert_eq!(cues[0].start, "00:00:01,000");
    assert_eq!(cues[0].end, "00:00:03,000");
    assert_eq!(cues[0].text, "Hello");

    assert_eq!(serialize_srt(&cues), input);
}

#[test]
fn test_parse_srt_withSampleDocument_shouldParseAllCues() {
    let cues = parse_srt(SAMPLE_SRT);
    assert_eq!(cues.len(), 3);
    assert_eq!(cues[1].text, "It contains multiple entries.");
    assert_eq!(cues[2].start, "00:00:10,000");
}

#[test]
fn test_parse_srt_withMultiLineText_shouldJoinWithNewlines() {
    let input = "1\n00:00:01,000 --> 00:00:03,000\nFirst line\nSecond line\n\n";
    let cues = parse_srt(input);
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "First line\nSecond line");
}

#[test]
fn test_parse_srt_withBadTimecodeBlock_shouldSkipOnlyThatBlock() {
    let input = "1\n00:00:01,000 --> 00:00:03,000\nGood\n\n2\nnot a timecode\nBad\n\n3\n00:00:07,000 --> 00:00:09,000\nAlso good\n";
    let cues = parse_srt(input);
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "Good");
    assert_eq!(cues[1].seq_num, 3);
}

#[test]
fn test_parse_srt_withNonIntegerSequence_shouldSkipBlock() {
    let input = "one\n00:00:01,000 --> 00:00:03,000\nText\n";
    assert!(parse_srt(input).is_empty());
}

#[test]
fn test_parse_srt_withIncompleteBlock_shouldSkipBlock() {
    let input = "1\n00:00:01,000 --> 00:00:03,000\n";
    assert!(parse_srt(input).is_empty());
}

#[test]
fn test_parse_srt_withNonContiguousIndices_shouldKeepIndicesVerbatim() {
    let input = "10\n00:00:01,000 --> 00:00:03,000\nA\n\n12\n00:00:04,000 --> 00:00:05,000\nB\n";
    let cues = parse_srt(input);
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].seq_num, 10);
    assert_eq!(cues[1].seq_num, 12);

    // Serialization writes them back untouched, no renumbering
    let out = serialize_srt(&cues);
    assert!(out.starts_with("10\n"));
    assert!(out.contains("\n12\n"));
}

#[test]
fn test_parse_srt_withEmptyInput_shouldReturnNoCues() {
    assert!(parse_srt("").is_empty());
    assert!(parse_srt("\n\n\n").is_empty());
}

#[test]
fn test_parse_srt_withWindowsLineEndings_shouldStillParse() {
    let input = "1\r\n00:00:01,000 --> 00:00:03,000\r\nHello\r\n\r\n";
    let cues = parse_srt(input);
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hello");
}

#[test]
fn test_serialize_srt_withHandBuiltCues_shouldEmitBlankLineSeparatedBlocks() {
    let cues = vec![
        SubtitleCue::new(1, "00:00:01,000", "00:00:02,000", "A"),
        SubtitleCue::new(2, "00:00:03,000", "00:00:04,000", "B"),
    ];
    assert_eq!(
        serialize_srt(&cues),
        "1\n00:00:01,000 --> 00:00:02,000\nA\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n"
    );
}
