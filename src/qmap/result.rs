use std::{
    fmt,
    num::NonZeroU64,
    string::{String, ToString},
};

use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub message: String,
    pub line_number: Option<NonZeroU64>,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line_number {
            Some(ln) => write!(f, "Line {}: {}", ln, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Failure while reading a MAP document.
///
/// `Format` covers structural problems (missing tokens, unterminated blocks,
/// malformed property lines), `Numeric` a numeric face field that is not a
/// valid float.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Format(LineError),
    #[error("{0}")]
    Numeric(LineError),
}

impl Error {
    pub fn from_format(message: String, line_number: NonZeroU64) -> Error {
        Error::Format(LineError {
            message,
            line_number: Some(line_number),
        })
    }

    pub fn from_numeric(message: String, line_number: NonZeroU64) -> Error {
        Error::Numeric(LineError {
            message,
            line_number: Some(line_number),
        })
    }

    pub fn from_io(io_error: std::io::Error) -> Error {
        Error::Io(io_error.to_string())
    }

    pub fn eof() -> Error {
        Error::Format(LineError {
            message: String::from("Unexpected EOF"),
            line_number: None,
        })
    }

    pub fn line_number(&self) -> Option<NonZeroU64> {
        match self {
            Error::Io(_) => None,
            Error::Format(err) | Error::Numeric(err) => err.line_number,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(io_error: std::io::Error) -> Error {
        Error::from_io(io_error)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
