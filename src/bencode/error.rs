use thiserror::Error;

use super::value::Type;

/// Errors produced while decoding bencode input.
///
/// Every variant carries the byte offset (relative to the start of the
/// buffer handed to the decoder) at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Malformed integer, length prefix, separator or terminator.
    #[error("syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },

    /// The input ended before the value was complete.
    #[error("unexpected end of input at offset {offset}")]
    Truncated { offset: usize },

    /// The lead byte does not start any bencode type.
    #[error("invalid lead byte {byte:#04x} at offset {offset}")]
    InvalidLeadByte { offset: usize, byte: u8 },

    /// A dictionary key is not a byte string.
    #[error("dictionary key at offset {offset} is a {found}, expected string")]
    InvalidKeyType { offset: usize, found: Type },

    /// Lists and dictionaries are nested deeper than the configured limit.
    #[error("nesting deeper than {limit} levels at offset {offset}")]
    TooDeep { offset: usize, limit: usize },

    /// The input or a declared string length exceeds the configured limit.
    #[error("length {len} at offset {offset} exceeds limit of {limit} bytes")]
    TooLarge {
        offset: usize,
        len: usize,
        limit: usize,
    },

    /// Bytes remain after a complete top-level value.
    #[error("trailing data after value at offset {offset}")]
    TrailingData { offset: usize },
}

impl DecodeError {
    /// Returns the byte offset at which the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Syntax { offset, .. }
            | DecodeError::Truncated { offset }
            | DecodeError::InvalidLeadByte { offset, .. }
            | DecodeError::InvalidKeyType { offset, .. }
            | DecodeError::TooDeep { offset, .. }
            | DecodeError::TooLarge { offset, .. }
            | DecodeError::TrailingData { offset } => *offset,
        }
    }
}

/// Errors produced while encoding or marshalling.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The input has no bencode representation.
    #[error("unsupported value: {0}")]
    Unsupported(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while unmarshalling into a typed destination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnmarshalError {
    #[error("bencode error: {0}")]
    Decode(#[from] DecodeError),

    /// The decoded value's type does not match the destination.
    #[error("can't unmarshal {actual} into {expected} at {path}")]
    KindMismatch {
        expected: Type,
        actual: Type,
        path: String,
    },

    /// A mapping destination declares keys that are not strings.
    #[error("map key has wrong type: expected string, got {found}")]
    UnsupportedKey { found: &'static str },

    /// An integer does not fit the destination integer type.
    #[error("integer {value} out of range for {target} at {path}")]
    IntegerOutOfRange {
        value: i64,
        target: &'static str,
        path: String,
    },

    /// A byte string destined for a `String` is not valid UTF-8.
    #[error("invalid utf-8 string at {path}")]
    InvalidUtf8 { path: String },
}

impl UnmarshalError {
    /// Prefixes the location of this error with a list index or dictionary key.
    pub(crate) fn within(mut self, segment: &str) -> Self {
        match &mut self {
            UnmarshalError::KindMismatch { path, .. }
            | UnmarshalError::IntegerOutOfRange { path, .. }
            | UnmarshalError::InvalidUtf8 { path } => {
                // paths are rooted at "$"
                *path = format!("${}{}", segment, path.get(1..).unwrap_or_default());
            }
            UnmarshalError::Decode(_) | UnmarshalError::UnsupportedKey { .. } => {}
        }
        self
    }
}
