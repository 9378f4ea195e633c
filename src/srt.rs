use std::fmt;

/// A single subtitle unit after validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubtitleEntry {
    pub index: Option<u64>,
    /// `HH:MM:SS,mmm`, exactly as it appeared in the source.
    pub start_time: Option<String>,
    /// `HH:MM:SS,mmm`, exactly as it appeared in the source.
    pub end_time: Option<String>,
    pub text: String,
    pub speaker: Option<String>,
}

/// Options controlling how subtitle text is turned into entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Strip a leading `Name:` prefix from each entry and keep it as the speaker.
    pub remove_speaker_names: bool,
    /// Collapse temporally adjacent entries of the same speaker.
    pub merge_consecutive_lines: bool,
    /// Drop entries whose text is empty.
    pub remove_empty_lines: bool,
    pub trim_whitespace: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            remove_speaker_names: false,
            merge_consecutive_lines: true,
            remove_empty_lines: true,
            trim_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Ass,
    Sup,
}

impl SubtitleFormat {
    pub fn tag(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Ass => "ass",
            SubtitleFormat::Sup => "sup",
        }
    }

    /// Looks up the format for a file extension, without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(SubtitleFormat::Srt),
            "ass" | "ssa" => Some(SubtitleFormat::Ass),
            "sup" => Some(SubtitleFormat::Sup),
            _ => None,
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.tag())
    }
}

/// Outcome of a single parse. Failed results never carry entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub success: bool,
    pub content: Vec<SubtitleEntry>,
    pub line_count: usize,
    pub original_format: SubtitleFormat,
    pub error: Option<String>,
}

impl ParseResult {
    pub fn succeeded(format: SubtitleFormat, content: Vec<SubtitleEntry>) -> Self {
        Self {
            success: true,
            line_count: content.len(),
            content,
            original_format: format,
            error: None,
        }
    }

    pub fn failed<S: Into<String>>(format: SubtitleFormat, error: S) -> Self {
        Self {
            success: false,
            content: Vec::new(),
            line_count: 0,
            original_format: format,
            error: Some(error.into()),
        }
    }
}
