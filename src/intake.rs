use crate::error::SrtDocError;
use crate::srt::SubtitleFormat;

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

/// Largest subtitle file accepted, in bytes.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Determines the subtitle format from a file's extension.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<SubtitleFormat, SrtDocError> {
    let path = path.as_ref();
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(SubtitleFormat::from_extension)
        .ok_or_else(|| SrtDocError::UnsupportedFormat(path.display().to_string()))
}

/// Reads the whole input, either from the named file or from standard input
/// when `input` is `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        check_size(buffer.len() as u64)?;
        decode(buffer).context("Standard input is not valid UTF-8")
    } else {
        read_file(input)
    }
}

/// Reads a subtitle file, rejecting it before reading if it is too large.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let size = std::fs::metadata(path)
        .context(format!("Failed to open input file: '{}'", path.display()))?
        .len();
    check_size(size).context(format!("Refusing to read '{}'", path.display()))?;

    let bytes = std::fs::read(path)
        .context(format!("Failed to open input file: '{}'", path.display()))?;
    info!("Read {} bytes from '{}'", bytes.len(), path.display());
    decode(bytes).context(format!("Input file is not valid UTF-8: '{}'", path.display()))
}

fn check_size(size: u64) -> Result<(), SrtDocError> {
    debug!("Input is {} bytes", size);
    if size > MAX_FILE_SIZE {
        return Err(SrtDocError::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

fn decode(bytes: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(bytes)?)
}
