//! Codec constants and default resource limits.
//!
//! The defaults are sized for torrent metainfo and DHT/tracker messages, which
//! rarely nest more than a handful of levels and stay well below a few
//! megabytes. Callers decoding larger documents can raise them through
//! [`Limits`](crate::bencode::Limits).

// ============================================================================
// Resource limits
// ============================================================================

/// Maximum nesting depth of lists and dictionaries accepted by the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Maximum size of a whole input buffer accepted by the decoder (64 MiB).
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024 * 1024;

/// Maximum declared length of a single byte string (16 MiB).
pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;

// ============================================================================
// Wire format
// ============================================================================

/// Lead byte of an integer.
pub const INTEGER_START: u8 = b'i';

/// Lead byte of a list.
pub const LIST_START: u8 = b'l';

/// Lead byte of a dictionary.
pub const DICT_START: u8 = b'd';

/// Terminator of integers, lists and dictionaries.
pub const END: u8 = b'e';

/// Separator between a byte string's length prefix and its contents.
pub const STRING_SEPARATOR: u8 = b':';
