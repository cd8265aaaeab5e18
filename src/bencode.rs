//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding into a generic value
//!
//! ```
//! use bcodec::bencode::{decode, decode_value, Value};
//!
//! let value = decode(b"l4:spami42ee").unwrap();
//! let list = value.as_list().unwrap();
//! assert_eq!(list[0].as_str(), Some("spam"));
//! assert_eq!(list[1].as_integer(), Some(42));
//!
//! // Decode only the first value and leave the rest of the buffer alone
//! let (value, consumed) = decode_value(b"i-25etrailing").unwrap();
//! assert_eq!(value, Value::Integer(-25));
//! assert_eq!(consumed, 5);
//! ```
//!
//! ## Encoding
//!
//! ```
//! use bcodec::bencode::{encode, marshal, Value};
//! use std::collections::HashMap;
//!
//! let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
//! assert_eq!(encode(&list).unwrap(), b"li1ei2ee");
//!
//! // Typed values encode the same way, with keys always sorted
//! let mut dict = HashMap::new();
//! dict.insert("foo".to_string(), Value::Integer(42));
//! dict.insert("bar".to_string(), Value::string("spam"));
//! assert_eq!(marshal(&dict).unwrap(), b"d3:bar4:spam3:fooi42ee");
//! ```
//!
//! ## Decoding into a typed destination
//!
//! ```
//! use bcodec::bencode::unmarshal;
//! use std::collections::BTreeMap;
//!
//! let mut peers: BTreeMap<String, Vec<i64>> = BTreeMap::new();
//! unmarshal(b"d5:aliceli1ei2ee3:bobli3eee", &mut peers).unwrap();
//! assert_eq!(peers["alice"], [1, 2]);
//! assert_eq!(peers["bob"], [3]);
//! ```
//!
//! # Error Handling
//!
//! Decoding can fail for various reasons:
//!
//! - [`DecodeError::Syntax`] - Malformed integer, length prefix or separator
//! - [`DecodeError::Truncated`] - Input ended unexpectedly
//! - [`DecodeError::InvalidLeadByte`] - Byte that starts no bencode type
//! - [`DecodeError::InvalidKeyType`] - Dictionary key that is not a string
//! - [`DecodeError::TooDeep`] - Nesting limit exceeded (64 levels by default)
//! - [`DecodeError::TooLarge`] - Input or string length over the configured limit
//! - [`DecodeError::TrailingData`] - Extra data after the value
//!
//! Unmarshalling adds [`UnmarshalError::KindMismatch`] when the decoded value
//! does not fit the destination. Duplicate dictionary keys are accepted and the
//! last occurrence wins.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod marshal;
mod unmarshal;
mod value;

pub use decode::{decode, decode_value, Decoder, Limits, Values};
pub use encode::{encode, encode_to};
pub use error::{DecodeError, EncodeError, UnmarshalError};
pub use marshal::{marshal, Marshal};
pub use unmarshal::{unmarshal, Shape, Unmarshal};
pub use value::{type_of, Type, Value};
