use crate::error::SrtDocError;
use crate::srt::SubtitleEntry;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Controls how entries are laid out in the narrative document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub title: Option<String>,
    /// Prefix each paragraph with its 1-based position in the document.
    pub include_line_numbers: bool,
    pub include_timestamps: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: Some("Subtitles".to_string()),
            include_line_numbers: false,
            include_timestamps: false,
        }
    }
}

/// Writes the entries as a plain-text document, one paragraph per entry.
pub fn serialise<W: Write>(
    entries: &[SubtitleEntry],
    opts: &DocumentOptions,
    dst: W,
) -> Result<()> {
    if entries.is_empty() {
        return Err(SrtDocError::NoContent.into());
    }

    let mut writer = BufWriter::new(dst);
    write_document(&mut writer, entries, opts).context("Failed to write document.")?;
    writer.flush().context("Failed to write document.")?;
    Ok(())
}

fn write_document<W: Write>(
    buf: &mut W,
    entries: &[SubtitleEntry],
    opts: &DocumentOptions,
) -> Result<()> {
    if let Some(title) = &opts.title {
        writeln!(buf, "{}", title)?;
        writeln!(buf)?;
    }
    for (n, entry) in entries.iter().enumerate() {
        if n > 0 {
            writeln!(buf)?;
        }
        write_paragraph(buf, n + 1, entry, opts)?;
    }
    Ok(())
}

fn write_paragraph<W: Write>(
    buf: &mut W,
    number: usize,
    entry: &SubtitleEntry,
    opts: &DocumentOptions,
) -> Result<()> {
    if opts.include_line_numbers {
        write!(buf, "{}. ", number)?;
    }
    if opts.include_timestamps {
        if let (Some(start), Some(end)) = (&entry.start_time, &entry.end_time) {
            write!(buf, "[{} --> {}] ", start, end)?;
        }
    }
    if let Some(speaker) = &entry.speaker {
        write!(buf, "{}：", speaker)?;
    }
    writeln!(buf, "{}", entry.text)?;
    Ok(())
}
