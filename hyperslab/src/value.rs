//! Tagged values for the boundary of the engine.

use derive_more::From;

use crate::{
    storage::{ReadableStorageTraits, VariableId},
    AccessPattern, Buffer, Element, ElementType, TransferError, TransferOptions,
};

/// A tagged value.
///
/// Callers that hold loosely typed data (e.g. a scripting runtime) convert it to a value before writing an attribute, and receive values from value reads.
/// The engine itself only transfers [`ElementType`] tagged buffers.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Value {
    /// Character data.
    Text(Vec<u8>),
    /// An integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A buffer of elements.
    Buffer(Buffer),
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.as_bytes().to_vec())
    }
}

fn first<T: Element + Into<R>, R>(buffer: &Buffer) -> Option<R> {
    buffer.element::<T>(0).ok().flatten().map(Into::into)
}

impl Value {
    /// Create a value from a buffer.
    ///
    /// Character data becomes [`Value::Text`].
    /// A buffer holding exactly one numeric element becomes [`Value::Integer`] or [`Value::Float`] if `scalar` is true.
    /// Anything else stays a [`Value::Buffer`].
    #[must_use]
    pub fn from_buffer(buffer: Buffer, scalar: bool) -> Self {
        if buffer.element_type() == ElementType::Char {
            return Self::Text(buffer.into_bytes());
        }
        if !scalar || buffer.num_elements() != 1 {
            return Self::Buffer(buffer);
        }
        let value = match buffer.element_type() {
            ElementType::Char => None,
            ElementType::Int8 => first::<i8, i64>(&buffer).map(Self::Integer),
            ElementType::UInt8 => first::<u8, i64>(&buffer).map(Self::Integer),
            ElementType::Int16 => first::<i16, i64>(&buffer).map(Self::Integer),
            ElementType::Int32 => first::<i32, i64>(&buffer).map(Self::Integer),
            ElementType::Float32 => first::<f32, f64>(&buffer).map(Self::Float),
            ElementType::Float64 => first::<f64, f64>(&buffer).map(Self::Float),
        };
        value.unwrap_or(Self::Buffer(buffer))
    }

    /// Return the integer of a [`Value::Integer`].
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        if let Self::Integer(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Return the number of a [`Value::Float`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let Self::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Return the characters of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&[u8]> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// Return the buffer of a [`Value::Buffer`].
    #[must_use]
    pub fn as_buffer(&self) -> Option<&Buffer> {
        if let Self::Buffer(buffer) = self {
            Some(buffer)
        } else {
            None
        }
    }
}

/// Read the elements of `variable` addressed by `pattern` as a value with default options.
///
/// # Errors
/// See [`read_value_opt`].
pub fn read_value<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
) -> Result<Value, TransferError> {
    read_value_opt(storage, variable, pattern, &TransferOptions::default())
}

/// Read the elements of `variable` addressed by `pattern` as a value.
///
/// A read of a single numeric element (e.g. [`AccessPattern::Point`]) returns a scalar if [`TransferOptions::scalar_reads`] is enabled.
/// See [`Value::from_buffer`].
///
/// # Errors
/// See [`read_opt`](crate::read_opt).
pub fn read_value_opt<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    options: &TransferOptions,
) -> Result<Value, TransferError> {
    let buffer = crate::read_opt(storage, variable, pattern, options)?;
    Ok(Value::from_buffer(buffer, options.scalar_reads()))
}
