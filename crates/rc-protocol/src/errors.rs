use thiserror::Error;

use crate::datatypes::Value;

/// Wire datatype codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{datatype} expects exactly {expected} bytes, got {actual}")]
    Length {
        datatype: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Stream ended after {available} of {expected} bytes while reading {datatype}")]
    Truncated {
        datatype: &'static str,
        expected: usize,
        available: usize,
    },

    #[error("Value {value} is out of range for {datatype}")]
    OutOfRange {
        datatype: &'static str,
        value: Value,
    },

    #[error("Cannot encode {value} as {datatype}")]
    KindMismatch {
        datatype: &'static str,
        value: Value,
    },

    #[error("Unknown datatype: {0}")]
    UnknownDatatype(String),

    #[error("Invalid {datatype} literal: '{literal}'")]
    InvalidLiteral {
        datatype: &'static str,
        literal: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
