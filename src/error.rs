use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SrtDocError {
    ParseError(String),
    UnsupportedFormat(String),
    FileTooLarge { size: u64, limit: u64 },
    NoContent,
}

impl Error for SrtDocError {}

impl fmt::Display for SrtDocError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SrtDocError::ParseError(msg) => write!(fmt, "{}", msg),
            SrtDocError::UnsupportedFormat(what) => {
                write!(fmt, "Unsupported subtitle format: '{}'", what)
            }
            SrtDocError::FileTooLarge { size, limit } => write!(
                fmt,
                "File is {} bytes, which exceeds the limit of {} bytes",
                size, limit
            ),
            SrtDocError::NoContent => write!(fmt, "There is no content to write"),
        }
    }
}
