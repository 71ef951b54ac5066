//! Range checked conversion between element and native representations.
//!
//! Stores hold elements in their [`NativeType`] and callers hold elements in an [`ElementType`].
//! Converting between the two reads each source element into a wide intermediate number and writes it back out in the destination representation.
//! A value that the destination cannot represent is a [`ConversionError::Range`] error, and the remaining elements are still converted.
//! Integer conversions are exact, floating point values are truncated toward zero when converted to integers.
//!
//! [`NativeType::Byte`] is converted to and from both [`ElementType::Int8`] and [`ElementType::UInt8`] as a raw byte copy.

use thiserror::Error;

use crate::{ElementType, NativeType};

/// A conversion error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// At least one value was not representable in the destination type.
    #[error("numeric conversion not representable")]
    Range,
    /// Attempt to convert between text and numbers.
    #[error("attempt to convert between text and numbers")]
    Char,
    /// The native type cannot be converted.
    #[error("native type {0} cannot be converted")]
    BadType(NativeType),
    /// The source and destination do not hold the same number of elements.
    #[error("source holds {src} elements but destination holds {dst} elements")]
    Length {
        /// The number of source elements.
        src: usize,
        /// The number of destination elements.
        dst: usize,
    },
}

#[derive(Copy, Clone, Debug)]
enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// A fixed width scalar representation shared by element and native types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Repr {
    Raw,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl Repr {
    const fn size(self) -> usize {
        match self {
            Self::Raw | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    const fn of_element(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Char => Self::Raw,
            ElementType::Int8 => Self::I8,
            ElementType::UInt8 => Self::U8,
            ElementType::Int16 => Self::I16,
            ElementType::Int32 => Self::I32,
            ElementType::Float32 => Self::F32,
            ElementType::Float64 => Self::F64,
        }
    }

    fn of_native(native: NativeType) -> Result<Self, ConversionError> {
        Ok(match native {
            NativeType::Char => Self::Raw,
            NativeType::Byte => Self::I8,
            NativeType::UByte => Self::U8,
            NativeType::Short => Self::I16,
            NativeType::UShort => Self::U16,
            NativeType::Int => Self::I32,
            NativeType::UInt => Self::U32,
            NativeType::Int64 => Self::I64,
            NativeType::UInt64 => Self::U64,
            NativeType::Float => Self::F32,
            NativeType::Double => Self::F64,
            NativeType::String => return Err(ConversionError::BadType(native)),
        })
    }

    fn read(self, bytes: &[u8]) -> Number {
        use bytemuck::pod_read_unaligned as read;
        match self {
            Self::Raw | Self::U8 => Number::UInt(u64::from(bytes[0])),
            Self::I8 => Number::Int(i64::from(read::<i8>(bytes))),
            Self::I16 => Number::Int(i64::from(read::<i16>(bytes))),
            Self::U16 => Number::UInt(u64::from(read::<u16>(bytes))),
            Self::I32 => Number::Int(i64::from(read::<i32>(bytes))),
            Self::U32 => Number::UInt(u64::from(read::<u32>(bytes))),
            Self::I64 => Number::Int(read::<i64>(bytes)),
            Self::U64 => Number::UInt(read::<u64>(bytes)),
            Self::F32 => Number::Float(f64::from(read::<f32>(bytes))),
            Self::F64 => Number::Float(read::<f64>(bytes)),
        }
    }

    fn write(self, number: Number, out: &mut [u8]) -> Result<(), ConversionError> {
        match self {
            Self::Raw | Self::U8 => out.copy_from_slice(&cast::<u8>(number)?.to_ne_bytes()),
            Self::I8 => out.copy_from_slice(&cast::<i8>(number)?.to_ne_bytes()),
            Self::I16 => out.copy_from_slice(&cast::<i16>(number)?.to_ne_bytes()),
            Self::U16 => out.copy_from_slice(&cast::<u16>(number)?.to_ne_bytes()),
            Self::I32 => out.copy_from_slice(&cast::<i32>(number)?.to_ne_bytes()),
            Self::U32 => out.copy_from_slice(&cast::<u32>(number)?.to_ne_bytes()),
            Self::I64 => out.copy_from_slice(&cast::<i64>(number)?.to_ne_bytes()),
            Self::U64 => out.copy_from_slice(&cast::<u64>(number)?.to_ne_bytes()),
            Self::F32 => {
                let value = cast::<f64>(number)?;
                #[allow(clippy::cast_possible_truncation)]
                let narrowed = value as f32;
                if value.is_finite() && narrowed.is_infinite() {
                    return Err(ConversionError::Range);
                }
                out.copy_from_slice(&narrowed.to_ne_bytes());
            }
            Self::F64 => out.copy_from_slice(&cast::<f64>(number)?.to_ne_bytes()),
        }
        Ok(())
    }
}

fn cast<T: num::NumCast>(number: Number) -> Result<T, ConversionError> {
    match number {
        Number::Int(value) => num::cast(value),
        Number::UInt(value) => num::cast(value),
        Number::Float(value) => num::cast(value),
    }
    .ok_or(ConversionError::Range)
}

fn convert(
    src_repr: Repr,
    src: &[u8],
    dst_repr: Repr,
    dst: &mut [u8],
    raw: bool,
) -> Result<(), ConversionError> {
    if (src_repr == Repr::Raw) != (dst_repr == Repr::Raw) {
        return Err(ConversionError::Char);
    }
    let num_src = src.len() / src_repr.size();
    let num_dst = dst.len() / dst_repr.size();
    if num_src != num_dst
        || src.len() % src_repr.size() != 0
        || dst.len() % dst_repr.size() != 0
    {
        return Err(ConversionError::Length {
            src: num_src,
            dst: num_dst,
        });
    }
    if raw || src_repr == dst_repr {
        dst.copy_from_slice(src);
        return Ok(());
    }

    let mut result = Ok(());
    for (src, dst) in src
        .chunks_exact(src_repr.size())
        .zip(dst.chunks_exact_mut(dst_repr.size()))
    {
        if let Err(err) = dst_repr.write(src_repr.read(src), dst) {
            result = Err(err);
        }
    }
    result
}

fn is_raw_byte(element_type: ElementType, native: NativeType) -> bool {
    native == NativeType::Byte && matches!(element_type, ElementType::Int8 | ElementType::UInt8)
}

/// Convert elements of `element_type` in `src` to elements of `native` in `dst`.
///
/// All bytes are in host byte order.
///
/// # Errors
/// Returns a [`ConversionError`] if
///  - exactly one of `element_type` and `native` is character data,
///  - `native` is [`NativeType::String`],
///  - `src` and `dst` do not hold the same number of elements, or
///  - any element is not representable in `native`. Representable elements are still converted.
pub fn convert_element_to_native(
    element_type: ElementType,
    src: &[u8],
    native: NativeType,
    dst: &mut [u8],
) -> Result<(), ConversionError> {
    convert(
        Repr::of_element(element_type),
        src,
        Repr::of_native(native)?,
        dst,
        is_raw_byte(element_type, native),
    )
}

/// Convert elements of `native` in `src` to elements of `element_type` in `dst`.
///
/// All bytes are in host byte order.
///
/// # Errors
/// See [`convert_element_to_native`].
pub fn convert_native_to_element(
    native: NativeType,
    src: &[u8],
    element_type: ElementType,
    dst: &mut [u8],
) -> Result<(), ConversionError> {
    convert(
        Repr::of_native(native)?,
        src,
        Repr::of_element(element_type),
        dst,
        is_raw_byte(element_type, native),
    )
}
