//! Turns SRT subtitles into plain narrative documents.
//!
//! Timing and numbering are stripped, speaker attribution and line order are
//! kept, and consecutive lines from the same speaker can be merged into one
//! paragraph.

pub mod error;
pub mod intake;
pub mod parser;
pub mod processor;
pub mod serialiser;
pub mod srt;

pub use crate::error::SrtDocError;
pub use crate::parser::{parse_srt, parse_subtitles};
pub use crate::serialiser::DocumentOptions;
pub use crate::srt::{ParseOptions, ParseResult, SubtitleEntry, SubtitleFormat};
