use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SubreviewError {
    Parse(String),
    Timestamp(String),
}

impl Error for SubreviewError {}

impl fmt::Display for SubreviewError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubreviewError::Parse(msg) => write!(fmt, "{}", msg),
            SubreviewError::Timestamp(ts) => write!(
                fmt,
                "Invalid timestamp '{}', expected HH:MM:SS,mmm",
                ts
            ),
        }
    }
}
