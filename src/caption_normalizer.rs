use std::borrow::Cow;
use std::fs;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, trace};
use crate::errors::TranscriptError;

// @module: WebVTT caption normalization

// @const: Cue timing line, positioning attributes after the end time are ignored
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3}\s+-->\s+\d{2}:\d{2}:\d{2}\.\d{3}").unwrap()
});

// @const: Cue sequence number
static SEQUENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @const: Inline cue markup such as <c>, </c>, <v Speaker> or <00:00:01.000>
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").unwrap()
});

/// File header token of a WebVTT document
pub const HEADER_TOKEN: &str = "WEBVTT";

// @const: Header metadata keywords, compared case-insensitively
const METADATA_KEYWORDS: [&str; 2] = ["kind:", "language:"];

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Classification of a single trimmed caption line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Header,
    Metadata,
    Comment,
    /// Opens a STYLE or REGION definition block
    BlockStart,
    Timing,
    SequenceNumber,
    Text,
}

/// Parser state between lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    Normal,
    InStyleBlock,
}

/// Returns true when `line` is `keyword` alone or `keyword` followed by whitespace
fn is_keyword_line(line: &str, keyword: &str) -> bool {
    match line.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

fn starts_with_ignore_ascii_case(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len()
        && line.is_char_boundary(prefix.len())
        && line[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Classify an already trimmed line
pub fn classify_line(line: &str) -> LineKind {
    if line.is_empty() {
        return LineKind::Blank;
    }
    if is_keyword_line(line, HEADER_TOKEN) {
        return LineKind::Header;
    }
    if METADATA_KEYWORDS.iter().any(|kw| starts_with_ignore_ascii_case(line, kw)) {
        return LineKind::Metadata;
    }
    if is_keyword_line(line, "NOTE") {
        return LineKind::Comment;
    }
    if is_keyword_line(line, "STYLE") || is_keyword_line(line, "REGION") {
        return LineKind::BlockStart;
    }
    if TIMING_REGEX.is_match(line) {
        return LineKind::Timing;
    }
    if SEQUENCE_REGEX.is_match(line) {
        return LineKind::SequenceNumber;
    }
    LineKind::Text
}

/// Remove inline markup tags and trim the result
pub fn strip_markup(line: &str) -> Cow<'_, str> {
    match MARKUP_REGEX.replace_all(line, "") {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Cow::Owned(s)
            } else {
                Cow::Owned(trimmed.to_string())
            }
        }
    }
}

/// Line-driven state machine turning a caption document into a cleaned transcript.
///
/// Feed lines in document order with [`feed_line`](Self::feed_line), then call
/// [`finish`](Self::finish). A segment identical to the previously accepted one
/// is dropped, so rolling captions that repeat the same text across consecutive
/// cue blocks collapse to a single occurrence. Non-adjacent repeats are kept.
#[derive(Debug, Default)]
pub struct CaptionNormalizer {
    state: ParseState,
    last_accepted: Option<String>,
    segments: Vec<String>,
    duplicates_dropped: usize,
}

impl CaptionNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current parser state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Segments accepted so far
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments dropped as immediate repeats
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Consume one raw line
    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();

        if self.state == ParseState::InStyleBlock {
            if line.is_empty() {
                self.state = ParseState::Normal;
            }
            return;
        }

        match classify_line(line) {
            LineKind::BlockStart => {
                trace!("Entering definition block: {}", line);
                self.state = ParseState::InStyleBlock;
            }
            LineKind::Text => self.accept(line),
            kind => trace!("Discarding {:?} line", kind),
        }
    }

    fn accept(&mut self, line: &str) {
        let segment = strip_markup(line);
        if segment.is_empty() {
            return;
        }
        if self.last_accepted.as_deref() == Some(&*segment) {
            self.duplicates_dropped += 1;
            return;
        }
        let segment = segment.into_owned();
        self.segments.push(segment.clone());
        self.last_accepted = Some(segment);
    }

    /// Join accepted segments and collapse whitespace runs into single spaces
    pub fn finish(self) -> String {
        debug!(
            "Accepted {} segment(s), dropped {} repeat(s)",
            self.segments.len(),
            self.duplicates_dropped
        );
        self.segments
            .iter()
            .flat_map(|segment| segment.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Normalize a sequence of caption lines into a cleaned transcript
pub fn normalize_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalizer = CaptionNormalizer::new();
    for (i, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if i == 0 {
            normalizer.feed_line(line.trim_start_matches(BYTE_ORDER_MARK));
        } else {
            normalizer.feed_line(line);
        }
    }
    normalizer.finish()
}

/// Normalize the full text of a caption document
pub fn normalize_str(content: &str) -> String {
    normalize_lines(content.lines())
}

/// Read and normalize a caption file.
///
/// Fails with [`TranscriptError::ReadFailure`] when the file cannot be read or is
/// not valid UTF-8. An empty transcript is still a success.
pub fn normalize_file<P: AsRef<Path>>(path: P) -> Result<String, TranscriptError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| TranscriptError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_str(&content))
}
