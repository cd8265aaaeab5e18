use super::encode::{encode_to, write_bytes};
use super::error::EncodeError;
use super::value::Value;
use crate::constants::{DICT_START, END, INTEGER_START, LIST_START};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::io::Write;

/// Types that can be written as bencode.
///
/// Implemented for [`Value`], the primitive integers, strings, byte buffers,
/// sequences of marshalable items and maps keyed by byte-like keys. Map
/// entries are always written in ascending key order, whatever the map's own
/// iteration order.
pub trait Marshal {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError>;
}

/// Returns the canonical bencode encoding of `value`.
///
/// # Errors
///
/// Returns [`EncodeError::Unsupported`] if `value` (or anything inside it) has
/// no bencode representation, such as a floating point number or an unsigned
/// integer above `i64::MAX`.
///
/// # Examples
///
/// ```
/// use bcodec::bencode::marshal;
/// use std::collections::HashMap;
///
/// let mut dict = HashMap::new();
/// dict.insert("foo", 42i64);
/// dict.insert("bar", 7);
/// assert_eq!(marshal(&dict).unwrap(), b"d3:bari7e3:fooi42ee");
///
/// assert_eq!(marshal(&vec!["b", "a"]).unwrap(), b"l1:b1:ae");
/// assert!(marshal(&u64::MAX).is_err());
/// ```
pub fn marshal<T: Marshal + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    value.marshal_to(&mut buf)?;
    Ok(buf)
}

impl Marshal for Value {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        encode_to(self, writer)
    }
}

impl<T: Marshal + ?Sized> Marshal for &T {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        (**self).marshal_to(writer)
    }
}

fn write_integer<W: Write>(value: i64, writer: &mut W) -> Result<(), EncodeError> {
    write!(writer, "{}{}", INTEGER_START as char, value)?;
    writer.write_all(&[END])?;
    Ok(())
}

macro_rules! marshal_integer {
    ($($ty:ty),*) => {
        $(
            impl Marshal for $ty {
                fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
                    let value = i64::try_from(*self).map_err(|_| {
                        EncodeError::Unsupported(format!(
                            "integer {} does not fit in i64",
                            self
                        ))
                    })?;
                    write_integer(value, writer)
                }
            }
        )*
    };
}

marshal_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! marshal_float {
    ($($ty:ty),*) => {
        $(
            impl Marshal for $ty {
                fn marshal_to<W: Write>(&self, _writer: &mut W) -> Result<(), EncodeError> {
                    Err(EncodeError::Unsupported(format!(
                        "floating point value {}",
                        self
                    )))
                }
            }
        )*
    };
}

marshal_float!(f32, f64);

impl Marshal for str {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        write_bytes(self.as_bytes(), writer)
    }
}

impl Marshal for String {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        write_bytes(self.as_bytes(), writer)
    }
}

impl Marshal for Bytes {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        write_bytes(self, writer)
    }
}

impl<T: Marshal> Marshal for [T] {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_all(&[LIST_START])?;
        for item in self {
            item.marshal_to(writer)?;
        }
        writer.write_all(&[END])?;
        Ok(())
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.as_slice().marshal_to(writer)
    }
}

impl<K, V> Marshal for BTreeMap<K, V>
where
    K: AsRef<[u8]>,
    V: Marshal,
{
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        marshal_dict(self.iter().map(|(k, v)| (k.as_ref(), v)).collect(), writer)
    }
}

impl<K, V, S> Marshal for HashMap<K, V, S>
where
    K: AsRef<[u8]>,
    V: Marshal,
    S: BuildHasher,
{
    fn marshal_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        marshal_dict(self.iter().map(|(k, v)| (k.as_ref(), v)).collect(), writer)
    }
}

fn marshal_dict<V, W>(mut entries: Vec<(&[u8], &V)>, writer: &mut W) -> Result<(), EncodeError>
where
    V: Marshal,
    W: Write,
{
    entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

    if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(EncodeError::Unsupported(format!(
            "duplicate dictionary key {:?}",
            String::from_utf8_lossy(pair[0].0)
        )));
    }

    writer.write_all(&[DICT_START])?;
    for (key, value) in entries {
        write_bytes(key, writer)?;
        value.marshal_to(writer)?;
    }
    writer.write_all(&[END])?;
    Ok(())
}
