use crate::error::SrtDocError;
use crate::processor;
use crate::srt::{ParseOptions, ParseResult, SubtitleEntry, SubtitleFormat};

use std::fmt;

use log::{debug, error, info, warn};
use nom::bytes::complete::{tag, take_while, take_while_m_n};
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map, recognize};
use nom::error::VerboseError;
use nom::sequence::tuple;
use nom::IResult;
use regex::Regex;

const BLOCK_SEPARATOR: &str = r"\n[\s\x{FEFF}]*\n";
const SPEAKER_PREFIX: &str = r"^([^：:]+)[：:]\s*(.*)$";

/// Parses an SRT document into its final entry sequence.
///
/// Malformed blocks are skipped without failing the parse. A document with
/// no valid blocks is a successful parse with zero entries. Only an internal
/// fault produces a failed result.
pub fn parse_srt(content: &str, options: &ParseOptions) -> ParseResult {
    let parser = match Parser::new(*options) {
        Ok(parser) => parser,
        Err(err) => {
            error!("Failed to set up SRT parser: {}", err);
            return ParseResult::failed(SubtitleFormat::Srt, err.to_string());
        }
    };

    let entries = parser.parse(content);
    let entries = processor::process(entries, options);
    if entries.is_empty() {
        warn!("No subtitle entries found in the supplied text");
    }
    ParseResult::succeeded(SubtitleFormat::Srt, entries)
}

/// Parses subtitle text of the given format. Only SRT is understood; every
/// other format yields a failed result.
pub fn parse_subtitles(
    content: &str,
    format: SubtitleFormat,
    options: &ParseOptions,
) -> ParseResult {
    match format {
        SubtitleFormat::Srt => parse_srt(content, options),
        SubtitleFormat::Ass | SubtitleFormat::Sup => {
            warn!("Refusing to parse {} subtitles", format);
            ParseResult::failed(
                format,
                format!("Parsing {} subtitles is not supported yet", format),
            )
        }
    }
}

/// Why a block was left out of the output.
#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    TooFewLines(usize),
    BadIndex,
    BadTimeLine,
    EmptyText,
}

impl fmt::Display for Rejection {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::TooFewLines(n) => write!(fmt, "only {} non-empty line(s)", n),
            Rejection::BadIndex => write!(fmt, "index line is not a number"),
            Rejection::BadTimeLine => write!(fmt, "time line is malformed"),
            Rejection::EmptyText => write!(fmt, "text is empty"),
        }
    }
}

pub struct Parser {
    options: ParseOptions,
    block_separator: Regex,
    speaker_prefix: Regex,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Result<Self, SrtDocError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|err| {
                SrtDocError::ParseError(format!("Invalid pattern /{}/: {}", pattern, err))
            })
        };
        Ok(Self {
            options,
            block_separator: compile(BLOCK_SEPARATOR)?,
            speaker_prefix: compile(SPEAKER_PREFIX)?,
        })
    }

    /// Splits the text into blocks and returns the entries of every valid
    /// block, in source order. No merging is done here.
    pub fn parse(&self, input: &str) -> Vec<SubtitleEntry> {
        let text = normalise(input);
        let mut entries = Vec::new();
        let mut skipped = 0;

        let blocks = self
            .block_separator
            .split(&text)
            .filter(|block| !trim_line(block).is_empty());
        for (n, block) in blocks.enumerate() {
            match self.entry(block) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    skipped += 1;
                    debug!("Skipping block {}: {}", n + 1, reason);
                }
            }
        }

        info!("Parsed {} entries, skipped {} blocks", entries.len(), skipped);
        entries
    }

    fn entry(&self, block: &str) -> Result<SubtitleEntry, Rejection> {
        let lines: Vec<&str> = block
            .split('\n')
            .map(trim_line)
            .filter(|line| !line.is_empty())
            .collect();

        // A block holding only an index and a time line is an entry with
        // empty text, subject to `remove_empty_lines`.
        if lines.len() < 2 {
            return Err(Rejection::TooFewLines(lines.len()));
        }
        if lines.len() < 3 && self.options.remove_empty_lines {
            return Err(Rejection::TooFewLines(lines.len()));
        }

        let (_, index) = seq_num(lines[0]).map_err(|_| Rejection::BadIndex)?;
        let (_, (start, end)) = show_hide(lines[1]).map_err(|_| Rejection::BadTimeLine)?;

        let mut text = lines[2..].join(" ");
        if self.options.trim_whitespace {
            text = trim_line(&text).to_string();
        }
        if self.options.remove_empty_lines && text.is_empty() {
            return Err(Rejection::EmptyText);
        }

        let mut speaker = None;
        if self.options.remove_speaker_names {
            if let Some(caps) = self.speaker_prefix.captures(&text) {
                speaker = Some(caps[1].trim().to_string());
                text = caps[2].trim().to_string();
            }
        }

        Ok(SubtitleEntry {
            index,
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            text,
            speaker,
        })
    }
}

/// Trims whitespace, counting a stray byte-order mark as whitespace.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

fn normalise(input: &str) -> String {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Any run of digits is a valid index line; the number itself is dropped
/// if it does not fit.
fn seq_num(input: &str) -> IResult<&str, Option<u64>, VerboseError<&str>> {
    all_consuming(map(digit1, |s: &str| s.parse().ok()))(input)
}

fn show_hide(input: &str) -> IResult<&str, (&str, &str), VerboseError<&str>> {
    let (input, (show_at, _, _, _, hide_at)) = all_consuming(tuple((
        timestamp,
        take_while(char::is_whitespace),
        tag("-->"),
        take_while(char::is_whitespace),
        timestamp,
    )))(input)?;

    Ok((input, (show_at, hide_at)))
}

/// Recognises a strict `HH:MM:SS,mmm` timestamp.
fn timestamp(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize(tuple((
        digits(2),
        tag(":"),
        digits(2),
        tag(":"),
        digits(2),
        tag(","),
        digits(3),
    )))(input)
}

fn digits<'a>(
    n: usize,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str, VerboseError<&'a str>> {
    take_while_m_n(n, n, |c: char| c.is_ascii_digit())
}
