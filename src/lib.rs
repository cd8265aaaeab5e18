//! bcodec - A bencode codec
//!
//! This library decodes bencode into a generic [`Value`] tree, encodes values
//! back into canonical bytes, and bridges decoded data into statically typed
//! Rust destinations.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode decoding, canonical encoding, marshal/unmarshal
//! - [`constants`] - Wire-format bytes and default resource limits
//!
//! Decoding works on in-memory buffers only. All entry points are pure
//! functions over their inputs and may be called from any thread.

pub mod bencode;
pub mod constants;

pub use bencode::{
    decode, decode_value, encode, marshal, type_of, unmarshal, DecodeError, Decoder, EncodeError,
    Limits, Marshal, Shape, Type, Unmarshal, UnmarshalError, Value,
};
