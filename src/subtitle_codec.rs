use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

// @module: SRT cue parsing and serialization

// @const: SRT cue timecode line, capturing start and end timestamps
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3}) --> (\d{2}:\d{2}:\d{2},\d{3})$").unwrap()
});

/// A single timed subtitle cue.
///
/// The sequence number and the timecodes are carried verbatim from the
/// source file: the pipeline only ever rewrites cue text, so output files
/// stay aligned with the original timing and numbering. Sequence numbers
/// are not required to be contiguous and are never renumbered.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    /// Sequence number as it appeared in the source
    pub seq_num: usize,

    /// Start timestamp, opaque `HH:MM:SS,mmm` string
    pub start: String,

    /// End timestamp, opaque `HH:MM:SS,mmm` string
    pub end: String,

    /// Cue text, possibly multi-line (newline-joined)
    pub text: String,
}

impl SubtitleCue {
    /// Create a new cue
    pub fn new(seq_num: usize, start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        SubtitleCue {
            seq_num,
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Parse SRT text into an ordered sequence of cues.
///
/// A well-formed cue block is three or more non-blank lines followed by a
/// blank line: sequence number, timecode line, then one or more text lines
/// that get newline-joined. A block whose second line fails the timecode
/// pattern is skipped with a warning; it never aborts the whole parse.
pub fn parse_srt(content: &str) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();

    let mut block: Vec<&str> = Vec::new();
    for line in content.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !block.is_empty() {
                if let Some(cue) = parse_block(&block) {
                    cues.push(cue);
                }
                block.clear();
            }
            continue;
        }
        block.push(line);
    }

    cues
}

/// Parse one blank-line-delimited block into a cue, or None if malformed
fn parse_block(lines: &[&str]) -> Option<SubtitleCue> {
    if lines.len() < 3 {
        warn!("Skipping incomplete subtitle block: {:?}", lines.first());
        return None;
    }

    let seq_num = match lines[0].trim().parse::<usize>() {
        Ok(num) => num,
        Err(_) => {
            warn!("Skipping subtitle block with invalid sequence number: {}", lines[0]);
            return None;
        }
    };

    let caps = match TIMECODE_REGEX.captures(lines[1].trim()) {
        Some(caps) => caps,
        None => {
            warn!("Skipping subtitle block {} with invalid timecode line: {}", seq_num, lines[1]);
            return None;
        }
    };

    Some(SubtitleCue {
        seq_num,
        start: caps[1].to_string(),
        end: caps[2].to_string(),
        text: lines[2..].join("\n"),
    })
}

/// Serialize cues back to SRT text.
///
/// Emits index line, timecode line, text, and a blank line per cue, in the
/// order given. Sequence numbers are written back verbatim.
pub fn serialize_srt(cues: &[SubtitleCue]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(cues.len() * 4);

    for cue in cues {
        lines.push(cue.seq_num.to_string());
        lines.push(format!("{} --> {}", cue.start, cue.end));
        lines.push(cue.text.clone());
        lines.push(String::new());
    }

    lines.join("\n")
}
