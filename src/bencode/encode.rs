use super::error::EncodeError;
use super::value::Value;
use crate::constants::{DICT_START, END, INTEGER_START, LIST_START, STRING_SEPARATOR};
use std::io::Write;

/// Encodes a bencode value to a byte vector.
///
/// The output is canonical:
/// - Integers: `i<number>e`, no leading zeros
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`, items in their original order
/// - Dictionaries: `d<key><value>...e`, keys in ascending byte order
///
/// # Errors
///
/// Encoding into a `Vec` does not fail in practice; the `Result` is shared
/// with [`encode_to`], whose writer may.
///
/// # Examples
///
/// ```
/// use bcodec::bencode::{encode, Value};
/// use std::collections::BTreeMap;
/// use bytes::Bytes;
///
/// assert_eq!(encode(&Value::Integer(-12)).unwrap(), b"i-12e");
///
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// assert_eq!(encode(&list).unwrap(), b"li1e3:twoe");
///
/// let mut dict = BTreeMap::new();
/// dict.insert(Bytes::from_static(b"foo"), Value::Integer(42));
/// dict.insert(Bytes::from_static(b"bar"), Value::string("spam"));
/// assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d3:bar4:spam3:fooi42ee");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_to(value, &mut buf)?;
    Ok(buf)
}

/// Writes the canonical encoding of `value` into `writer`.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the writer fails. Nothing is rolled back:
/// the writer may hold a partial encoding afterwards.
pub fn encode_to<W: Write>(value: &Value, writer: &mut W) -> Result<(), EncodeError> {
    match value {
        Value::Integer(i) => {
            write!(writer, "{}{}", INTEGER_START as char, i)?;
            writer.write_all(&[END])?;
        }
        Value::Bytes(b) => write_bytes(b, writer)?,
        Value::List(l) => {
            writer.write_all(&[LIST_START])?;
            for item in l {
                encode_to(item, writer)?;
            }
            writer.write_all(&[END])?;
        }
        Value::Dict(d) => {
            writer.write_all(&[DICT_START])?;
            // BTreeMap<Bytes, _> iterates in ascending byte order of the keys
            for (key, val) in d {
                write_bytes(key, writer)?;
                encode_to(val, writer)?;
            }
            writer.write_all(&[END])?;
        }
    }
    Ok(())
}

pub(crate) fn write_bytes<W: Write>(bytes: &[u8], writer: &mut W) -> Result<(), EncodeError> {
    write!(writer, "{}", bytes.len())?;
    writer.write_all(&[STRING_SEPARATOR])?;
    writer.write_all(bytes)?;
    Ok(())
}
