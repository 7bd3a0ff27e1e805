//! This module includes the abstraction over a decoded DICOM element value.
//!
//! A value is a sum type over the concrete data types an element may decode
//! into: a text string, an opaque or typed numeric sequence, or nothing.
//! A single number and a sequence of one number share the same
//! representation; consumers discriminate via [`multiplicity`].
//!
//! [`multiplicity`]: enum.PrimitiveValue.html#method.multiplicity

use smallvec::SmallVec;
use snafu::Snafu;
use std::borrow::Cow;

/// An aggregation of one or more values of the same element.
pub type C<T> = SmallVec<[T; 2]>;

/// An enum representing the specific type of a primitive value,
/// without the value proper.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ValueType {
    /// No value.
    Empty,
    /// A character string.
    Str,
    /// A sequence of unsigned 8-bit integers, or opaque bytes.
    U8,
    /// A sequence of signed 16-bit integers.
    I16,
    /// A sequence of unsigned 16-bit integers.
    U16,
    /// A sequence of signed 32-bit integers.
    I32,
    /// A sequence of unsigned 32-bit integers.
    U32,
    /// A sequence of 32-bit floating point numbers.
    F32,
    /// A sequence of 64-bit floating point numbers.
    F64,
}

/// An error raised when retrieving a value of one type
/// from a value of an incompatible type.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(display("bad value cast: requested {} but value is {:?}", requested, got))]
pub struct CastValueError {
    /// The value type requested by the caller.
    pub requested: &'static str,
    /// The value type effectively present.
    pub got: ValueType,
}

/// Representation of a decoded DICOM element value.
///
/// The textual variant holds the value as read from the stream;
/// trailing padding spaces or NUL bytes are kept
/// and are the consumer's responsibility to trim.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// No data. Used for zero-length values.
    Empty,
    /// A string of characters.
    Str(String),
    /// A sequence of unsigned 8-bit integers,
    /// also used for opaque byte data.
    U8(C<u8>),
    /// A sequence of signed 16-bit integers.
    I16(C<i16>),
    /// A sequence of unsigned 16-bit integers.
    U16(C<u16>),
    /// A sequence of signed 32-bit integers.
    I32(C<i32>),
    /// A sequence of unsigned 32-bit integers.
    U32(C<u32>),
    /// A sequence of 32-bit floating point numbers.
    F32(C<f32>),
    /// A sequence of 64-bit floating point numbers.
    F64(C<f64>),
}

/// Macro for implementing getters to single and multi-values
/// of each variant.
///
/// Should be placed inside `PrimitiveValue`'s impl block.
macro_rules! impl_primitive_getters {
    ($name_single: ident, $name_multi: ident, $variant: ident, $ret: ty) => {
        /// Get a single value of the requested type.
        ///
        /// If it contains multiple values,
        /// only the first one is returned.
        /// An error is returned if the variant is not compatible.
        pub fn $name_single(&self) -> Result<$ret, CastValueError> {
            match self {
                PrimitiveValue::$variant(c) if !c.is_empty() => Ok(c[0]),
                value => Err(CastValueError {
                    requested: stringify!($name_single),
                    got: value.value_type(),
                }),
            }
        }

        /// Get a sequence of values of the requested type without copying.
        ///
        /// An error is returned if the variant is not compatible.
        pub fn $name_multi(&self) -> Result<&[$ret], CastValueError> {
            match self {
                PrimitiveValue::$variant(c) => Ok(c),
                value => Err(CastValueError {
                    requested: stringify!($name_multi),
                    got: value.value_type(),
                }),
            }
        }
    };
}

impl PrimitiveValue {
    /// Retrieve the specific type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            PrimitiveValue::Empty => ValueType::Empty,
            PrimitiveValue::Str(_) => ValueType::Str,
            PrimitiveValue::U8(_) => ValueType::U8,
            PrimitiveValue::I16(_) => ValueType::I16,
            PrimitiveValue::U16(_) => ValueType::U16,
            PrimitiveValue::I32(_) => ValueType::I32,
            PrimitiveValue::U32(_) => ValueType::U32,
            PrimitiveValue::F32(_) => ValueType::F32,
            PrimitiveValue::F64(_) => ValueType::F64,
        }
    }

    /// Obtain the number of individual values.
    ///
    /// A value decoded from a payload of exactly one element
    /// has multiplicity 1 and reads back through the scalar getters;
    /// larger payloads yield the element count.
    pub fn multiplicity(&self) -> u32 {
        match self {
            PrimitiveValue::Empty => 0,
            PrimitiveValue::Str(_) => 1,
            PrimitiveValue::U8(c) => c.len() as u32,
            PrimitiveValue::I16(c) => c.len() as u32,
            PrimitiveValue::U16(c) => c.len() as u32,
            PrimitiveValue::I32(c) => c.len() as u32,
            PrimitiveValue::U32(c) => c.len() as u32,
            PrimitiveValue::F32(c) => c.len() as u32,
            PrimitiveValue::F64(c) => c.len() as u32,
        }
    }

    /// Check whether the value holds no data.
    pub fn is_empty(&self) -> bool {
        self.multiplicity() == 0
    }

    /// Get the value as a string slice,
    /// if the value is textual.
    ///
    /// Trailing padding is not removed.
    pub fn string(&self) -> Result<&str, CastValueError> {
        match self {
            PrimitiveValue::Str(s) => Ok(s),
            value => Err(CastValueError {
                requested: "string",
                got: value.value_type(),
            }),
        }
    }

    /// Get the value as a string of text,
    /// also accepting opaque byte data by decoding it as UTF-8,
    /// with invalid sequences replaced.
    ///
    /// Returns `None` for the numeric variants.
    pub fn to_str(&self) -> Option<Cow<'_, str>> {
        match self {
            PrimitiveValue::Str(s) => Some(Cow::from(s.as_str())),
            PrimitiveValue::U8(b) => Some(String::from_utf8_lossy(b)),
            PrimitiveValue::Empty => Some(Cow::from("")),
            _ => None,
        }
    }

    impl_primitive_getters!(uint8, uint8_slice, U8, u8);
    impl_primitive_getters!(uint16, uint16_slice, U16, u16);
    impl_primitive_getters!(int16, int16_slice, I16, i16);
    impl_primitive_getters!(uint32, uint32_slice, U32, u32);
    impl_primitive_getters!(int32, int32_slice, I32, i32);
    impl_primitive_getters!(float32, float32_slice, F32, f32);
    impl_primitive_getters!(float64, float64_slice, F64, f64);
}

impl From<&str> for PrimitiveValue {
    fn from(s: &str) -> Self {
        PrimitiveValue::Str(s.to_owned())
    }
}

impl From<String> for PrimitiveValue {
    fn from(s: String) -> Self {
        PrimitiveValue::Str(s)
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(v: Vec<u8>) -> Self {
        PrimitiveValue::U8(C::from_vec(v))
    }
}
