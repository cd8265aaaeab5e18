use super::decode::Decoder;
use super::error::UnmarshalError;
use super::value::{Type, Value};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

const ROOT: &str = "$";

/// The shape a destination type expects a decoded value to have.
///
/// # Examples
///
/// ```
/// use bcodec::bencode::{Shape, Unmarshal};
/// use std::collections::BTreeMap;
///
/// assert_eq!(
///     <BTreeMap<String, Vec<i64>>>::shape(),
///     Shape::Mapping {
///         key: Box::new(Shape::String),
///         value: Box::new(Shape::Sequence(Box::new(Shape::Integer))),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Accepts any value.
    Any,
    Integer,
    String,
    Sequence(Box<Shape>),
    Mapping { key: Box<Shape>, value: Box<Shape> },
}

impl Shape {
    /// The value type this shape accepts, or `None` for [`Shape::Any`].
    pub fn kind(&self) -> Option<Type> {
        match self {
            Shape::Any => None,
            Shape::Integer => Some(Type::Integer),
            Shape::String => Some(Type::ByteString),
            Shape::Sequence(_) => Some(Type::List),
            Shape::Mapping { .. } => Some(Type::Dictionary),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().map_or("any", |kind| kind.name())
    }

    /// Checks that every mapping in this shape is keyed by strings.
    pub fn validate(&self) -> Result<(), UnmarshalError> {
        match self {
            Shape::Any | Shape::Integer | Shape::String => Ok(()),
            Shape::Sequence(item) => item.validate(),
            Shape::Mapping { key, value } => {
                if **key != Shape::String {
                    return Err(UnmarshalError::UnsupportedKey { found: key.name() });
                }
                value.validate()
            }
        }
    }
}

/// Types that can be built from a decoded [`Value`].
///
/// `from_value` must check the value's type against [`Unmarshal::shape`] and
/// fail with [`UnmarshalError::KindMismatch`] rather than coerce.
pub trait Unmarshal: Sized {
    fn shape() -> Shape;

    fn from_value(value: Value) -> Result<Self, UnmarshalError>;
}

impl Decoder {
    /// Decodes `data` and stores the result in `dest`.
    ///
    /// The destination's shape is validated before any input is read. `dest`
    /// is only replaced once the whole value has been converted; on error it
    /// keeps its previous contents.
    ///
    /// # Errors
    ///
    /// - [`UnmarshalError::UnsupportedKey`] if the destination has non-string map keys
    /// - [`UnmarshalError::Decode`] if `data` is not a single valid bencode value
    /// - [`UnmarshalError::KindMismatch`] and friends if the value does not fit
    pub fn unmarshal<T: Unmarshal>(&self, data: &[u8], dest: &mut T) -> Result<(), UnmarshalError> {
        T::shape().validate()?;

        let value = self.decode(data)?;
        *dest = T::from_value(value)?;
        Ok(())
    }
}

/// Decodes `data` into `dest` using default limits.
///
/// # Examples
///
/// ```
/// use bcodec::bencode::{unmarshal, UnmarshalError};
/// use std::collections::BTreeMap;
///
/// let mut names: Vec<String> = Vec::new();
/// unmarshal(b"l4:spam4:eggse", &mut names).unwrap();
/// assert_eq!(names, ["spam", "eggs"]);
///
/// let mut counts: BTreeMap<String, i64> = BTreeMap::new();
/// let err = unmarshal(b"d3:bar4:spam3:fooi42ee", &mut counts).unwrap_err();
/// assert!(matches!(err, UnmarshalError::KindMismatch { .. }));
/// assert!(counts.is_empty());
/// ```
pub fn unmarshal<T: Unmarshal>(data: &[u8], dest: &mut T) -> Result<(), UnmarshalError> {
    Decoder::default().unmarshal(data, dest)
}

fn mismatch(expected: Type, actual: &Value) -> UnmarshalError {
    UnmarshalError::KindMismatch {
        expected,
        actual: actual.kind(),
        path: ROOT.to_string(),
    }
}

fn key_segment(key: &[u8]) -> String {
    format!(".{}", String::from_utf8_lossy(key))
}

impl Unmarshal for Value {
    fn shape() -> Shape {
        Shape::Any
    }

    fn from_value(value: Value) -> Result<Self, UnmarshalError> {
        Ok(value)
    }
}

macro_rules! unmarshal_integer {
    ($($ty:ty),*) => {
        $(
            impl Unmarshal for $ty {
                fn shape() -> Shape {
                    Shape::Integer
                }

                fn from_value(value: Value) -> Result<Self, UnmarshalError> {
                    match value {
                        Value::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                            UnmarshalError::IntegerOutOfRange {
                                value: i,
                                target: stringify!($ty),
                                path: ROOT.to_string(),
                            }
                        }),
                        other => Err(mismatch(Type::Integer, &other)),
                    }
                }
            }
        )*
    };
}

unmarshal_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Unmarshal for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn from_value(value: Value) -> Result<Self, UnmarshalError> {
        match value {
            Value::Bytes(b) => String::from_utf8(b.to_vec()).map_err(|_| {
                UnmarshalError::InvalidUtf8 {
                    path: ROOT.to_string(),
                }
            }),
            other => Err(mismatch(Type::ByteString, &other)),
        }
    }
}

impl Unmarshal for Bytes {
    fn shape() -> Shape {
        Shape::String
    }

    fn from_value(value: Value) -> Result<Self, UnmarshalError> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(mismatch(Type::ByteString, &other)),
        }
    }
}

impl<T: Unmarshal> Unmarshal for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }

    fn from_value(value: Value) -> Result<Self, UnmarshalError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|e| e.within(&format!("[{}]", i))))
                .collect(),
            other => Err(mismatch(Type::List, &other)),
        }
    }
}

impl<K, V> Unmarshal for BTreeMap<K, V>
where
    K: Unmarshal + Ord,
    V: Unmarshal,
{
    fn shape() -> Shape {
        Shape::Mapping {
            key: Box::new(K::shape()),
            value: Box::new(V::shape()),
        }
    }

    fn from_value(value: Value) -> Result<Self, UnmarshalError> {
        match value {
            Value::Dict(entries) => entries
                .into_iter()
                .map(|(key, item)| unmarshal_entry(key, item))
                .collect(),
            other => Err(mismatch(Type::Dictionary, &other)),
        }
    }
}

impl<K, V, S> Unmarshal for HashMap<K, V, S>
where
    K: Unmarshal + Eq + Hash,
    V: Unmarshal,
    S: BuildHasher + Default,
{
    fn shape() -> Shape {
        Shape::Mapping {
            key: Box::new(K::shape()),
            value: Box::new(V::shape()),
        }
    }

    fn from_value(value: Value) -> Result<Self, UnmarshalError> {
        match value {
            Value::Dict(entries) => entries
                .into_iter()
                .map(|(key, item)| unmarshal_entry(key, item))
                .collect(),
            other => Err(mismatch(Type::Dictionary, &other)),
        }
    }
}

fn unmarshal_entry<K, V>(key: Bytes, item: Value) -> Result<(K, V), UnmarshalError>
where
    K: Unmarshal,
    V: Unmarshal,
{
    let raw = key.clone();
    let key = K::from_value(Value::Bytes(key)).map_err(|e| e.within(&key_segment(&raw)))?;
    let item = V::from_value(item).map_err(|e| e.within(&key_segment(&raw)))?;
    Ok((key, item))
}
