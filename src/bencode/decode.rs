use super::error::DecodeError;
use super::value::{Type, Value};
use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_LEN, DEFAULT_MAX_STRING_LEN, END, STRING_SEPARATOR,
};
use bytes::Bytes;
use std::collections::BTreeMap;

/// Resource limits applied while decoding untrusted input.
///
/// # Examples
///
/// ```
/// use bcodec::bencode::{Decoder, DecodeError, Limits};
///
/// let decoder = Decoder::new(Limits::default().with_max_depth(1));
/// assert!(decoder.decode(b"li1ee").is_ok());
/// assert!(matches!(
///     decoder.decode(b"lli1eee"),
///     Err(DecodeError::TooDeep { offset: 1, limit: 1 })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested lists/dictionaries.
    pub max_depth: usize,
    /// Maximum length of the whole input buffer.
    pub max_input_len: usize,
    /// Maximum declared length of a single byte string.
    pub max_string_len: usize,
}

impl Limits {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }
}

/// A bencode decoder configured with a set of [`Limits`].
///
/// The decoder holds no state between calls and can be shared freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    limits: Limits,
}

impl Decoder {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Decodes a buffer that must contain exactly one value.
    ///
    /// # Errors
    ///
    /// Besides any error from [`Decoder::decode_value`], returns
    /// [`DecodeError::TrailingData`] if bytes follow the value.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        let (value, consumed) = self.decode_value(data)?;

        if consumed != data.len() {
            return Err(DecodeError::TrailingData { offset: consumed });
        }

        Ok(value)
    }

    /// Decodes the first value in `data` and returns it together with the
    /// number of bytes it occupied. Bytes after the value are not inspected.
    pub fn decode_value(&self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        self.check_input(data)?;

        let mut parser = Parser::new(data, &self.limits);
        let value = parser.decode_value(0)?;
        Ok((value, parser.pos))
    }

    /// Iterates over consecutive top-level values in `data`.
    ///
    /// Each item is the value's starting offset and the value itself. The
    /// iterator stops after the first error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bcodec::bencode::{Decoder, Value};
    ///
    /// let decoder = Decoder::default();
    /// let values: Vec<_> = decoder
    ///     .values(b"i1e4:spamle")
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    ///
    /// assert_eq!(values[0], (0, Value::Integer(1)));
    /// assert_eq!(values[1], (3, Value::string("spam")));
    /// assert_eq!(values[2], (9, Value::List(vec![])));
    /// ```
    pub fn values<'a>(&'a self, data: &'a [u8]) -> Values<'a> {
        Values {
            parser: Parser::new(data, &self.limits),
            checked: false,
            done: false,
        }
    }

    fn check_input(&self, data: &[u8]) -> Result<(), DecodeError> {
        if data.len() > self.limits.max_input_len {
            tracing::debug!(
                "Rejecting {} byte input, limit is {}",
                data.len(),
                self.limits.max_input_len
            );
            return Err(DecodeError::TooLarge {
                offset: 0,
                len: data.len(),
                limit: self.limits.max_input_len,
            });
        }
        Ok(())
    }
}

/// Iterator returned by [`Decoder::values`].
#[derive(Debug)]
pub struct Values<'a> {
    parser: Parser<'a>,
    checked: bool,
    done: bool,
}

impl Iterator for Values<'_> {
    type Item = Result<(usize, Value), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.checked {
            self.checked = true;
            let decoder = Decoder::new(*self.parser.limits);
            if let Err(e) = decoder.check_input(self.parser.data) {
                self.done = true;
                return Some(Err(e));
            }
        }

        if self.parser.pos >= self.parser.data.len() {
            self.done = true;
            return None;
        }

        let start = self.parser.pos;
        match self.parser.decode_value(0) {
            Ok(value) => Some(Ok((start, value))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decodes a buffer that must contain exactly one value, using default [`Limits`].
///
/// # Examples
///
/// ```
/// use bcodec::bencode::{decode, Value};
///
/// assert_eq!(decode(b"i-25e").unwrap(), Value::Integer(-25));
/// assert!(decode(b"i42eextra").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::default().decode(data)
}

/// Decodes the first value in `data` using default [`Limits`], returning the
/// value and the number of bytes consumed.
///
/// # Examples
///
/// ```
/// use bcodec::bencode::{decode_value, Value};
///
/// let (value, consumed) = decode_value(b"11:some stringi1e").unwrap();
/// assert_eq!(value, Value::string("some string"));
/// assert_eq!(consumed, 14);
/// ```
pub fn decode_value(data: &[u8]) -> Result<(Value, usize), DecodeError> {
    Decoder::default().decode_value(data)
}

#[derive(Debug)]
struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
    limits: &'a Limits,
}

impl<'a> Parser<'a> {
    fn new(data: &'a [u8], limits: &'a Limits) -> Self {
        Self {
            data,
            pos: 0,
            limits,
        }
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::Truncated { offset: self.pos })
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let lead = self.peek()?;

        match Type::of(lead) {
            Type::Integer => self.decode_integer(),
            Type::ByteString => self.decode_bytes().map(Value::Bytes),
            Type::List => self.decode_list(depth),
            Type::Dictionary => self.decode_dict(depth),
            Type::Invalid => Err(DecodeError::InvalidLeadByte {
                offset: self.pos,
                byte: lead,
            }),
        }
    }

    fn enter_container(&self, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.limits.max_depth {
            tracing::debug!(
                "Nesting limit of {} reached at offset {}",
                self.limits.max_depth,
                self.pos
            );
            return Err(DecodeError::TooDeep {
                offset: self.pos,
                limit: self.limits.max_depth,
            });
        }
        Ok(())
    }

    fn decode_integer(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;
        self.pos += 1;

        let digits_start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos] != END {
            self.pos += 1;
        }

        if self.pos >= self.data.len() {
            return Err(syntax(start, "unterminated integer"));
        }

        let text = &self.data[digits_start..self.pos];
        let negative = text.first() == Some(&b'-');
        let digits = if negative { &text[1..] } else { text };

        if digits.is_empty() {
            return Err(syntax(digits_start, "empty integer"));
        }
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(syntax(digits_start, "invalid digit in integer"));
        }
        if digits[0] == b'0' && digits.len() > 1 {
            return Err(syntax(digits_start, "leading zero in integer"));
        }
        if negative && digits == b"0" {
            return Err(syntax(digits_start, "negative zero"));
        }

        let value: i64 = std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| syntax(digits_start, "integer out of range"))?;

        self.pos += 1;
        Ok(Value::Integer(value))
    }

    fn decode_bytes(&mut self) -> Result<Bytes, DecodeError> {
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        match self.data.get(self.pos) {
            None => return Err(DecodeError::Truncated { offset: self.pos }),
            Some(&STRING_SEPARATOR) => {}
            Some(_) => return Err(syntax(self.pos, "expected ':' after string length")),
        }

        let len = self.data[start..self.pos]
            .iter()
            .try_fold(0usize, |acc, &d| {
                acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
            })
            .ok_or_else(|| syntax(start, "string length out of range"))?;

        if len > self.limits.max_string_len {
            tracing::debug!(
                "Declared string length {} at offset {} exceeds limit {}",
                len,
                start,
                self.limits.max_string_len
            );
            return Err(DecodeError::TooLarge {
                offset: start,
                len,
                limit: self.limits.max_string_len,
            });
        }

        self.pos += 1;

        if len > self.data.len() - self.pos {
            return Err(DecodeError::Truncated {
                offset: self.data.len(),
            });
        }

        let bytes = Bytes::copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;

        Ok(bytes)
    }

    fn decode_list(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.enter_container(depth)?;
        self.pos += 1;
        let mut list = Vec::new();

        while self.peek()? != END {
            list.push(self.decode_value(depth + 1)?);
        }

        self.pos += 1;
        Ok(Value::List(list))
    }

    fn decode_dict(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.enter_container(depth)?;
        self.pos += 1;
        let mut dict = BTreeMap::new();

        loop {
            let lead = self.peek()?;
            if lead == END {
                break;
            }

            let key_offset = self.pos;
            let key = match Type::of(lead) {
                Type::ByteString => self.decode_bytes()?,
                Type::Invalid => {
                    return Err(DecodeError::InvalidLeadByte {
                        offset: key_offset,
                        byte: lead,
                    })
                }
                found => {
                    return Err(DecodeError::InvalidKeyType {
                        offset: key_offset,
                        found,
                    })
                }
            };

            let value = self.decode_value(depth + 1)?;

            // last occurrence of a key wins
            if dict.insert(key, value).is_some() {
                tracing::trace!("Duplicate dictionary key at offset {}", key_offset);
            }
        }

        self.pos += 1;
        Ok(Value::Dict(dict))
    }
}

fn syntax(offset: usize, reason: &'static str) -> DecodeError {
    DecodeError::Syntax { offset, reason }
}
