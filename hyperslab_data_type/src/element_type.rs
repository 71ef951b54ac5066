use derive_more::Display;
use thiserror::Error;

use crate::NativeType;

/// The in-memory representation of the elements of a [`Buffer`](crate::Buffer).
///
/// Every element type is described by one row of [`ELEMENT_TYPE_TABLE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum ElementType {
    /// Character data.
    ///
    /// Shares the representation of [`ElementType::Int8`], but is only convertible to and from character data.
    #[display("char")]
    Char,
    /// Signed 8-bit integer.
    #[display("int8")]
    Int8,
    /// Unsigned 8-bit integer.
    #[display("uint8")]
    UInt8,
    /// Signed 16-bit integer.
    #[display("int16")]
    Int16,
    /// Signed 32-bit integer.
    #[display("int32")]
    Int32,
    /// IEEE 754 single precision floating point.
    #[display("float32")]
    Float32,
    /// IEEE 754 double precision floating point.
    #[display("float64")]
    Float64,
}

/// A row of the element type table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ElementTypeInfo {
    /// The element type.
    pub element_type: ElementType,
    /// The width of one element in bytes.
    pub size: usize,
    /// The native representation the element type is stored as.
    pub native: NativeType,
}

/// The element type table.
///
/// Indexed by [`ElementType`] discriminant.
pub const ELEMENT_TYPE_TABLE: [ElementTypeInfo; 7] = [
    ElementTypeInfo {
        element_type: ElementType::Char,
        size: 1,
        native: NativeType::Char,
    },
    ElementTypeInfo {
        element_type: ElementType::Int8,
        size: 1,
        native: NativeType::Byte,
    },
    ElementTypeInfo {
        element_type: ElementType::UInt8,
        size: 1,
        native: NativeType::Byte,
    },
    ElementTypeInfo {
        element_type: ElementType::Int16,
        size: 2,
        native: NativeType::Short,
    },
    ElementTypeInfo {
        element_type: ElementType::Int32,
        size: 4,
        native: NativeType::Int,
    },
    ElementTypeInfo {
        element_type: ElementType::Float32,
        size: 4,
        native: NativeType::Float,
    },
    ElementTypeInfo {
        element_type: ElementType::Float64,
        size: 8,
        native: NativeType::Double,
    },
];

/// An unsupported type error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum UnsupportedTypeError {
    /// The native type has no element type mapping.
    #[error("native type {0} has no element type mapping")]
    Unmapped(NativeType),
    /// Character data cannot be converted to or from numbers.
    #[error("element type {element_type} cannot be converted to or from native type {native}")]
    Inconvertible {
        /// The element type.
        element_type: ElementType,
        /// The native type.
        native: NativeType,
    },
}

impl ElementType {
    /// All element types, in table order.
    pub const ALL: [Self; 7] = [
        Self::Char,
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::Int32,
        Self::Float32,
        Self::Float64,
    ];

    /// Return the row of [`ELEMENT_TYPE_TABLE`] describing this element type.
    #[must_use]
    pub const fn info(self) -> ElementTypeInfo {
        ELEMENT_TYPE_TABLE[self as usize]
    }

    /// Return the width of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        self.info().size
    }

    /// Return the native type this element type is stored as.
    #[must_use]
    pub const fn native(self) -> NativeType {
        self.info().native
    }

    /// Returns true if this is [`ElementType::Char`].
    #[must_use]
    pub const fn is_char(self) -> bool {
        matches!(self, Self::Char)
    }

    /// Returns true for the floating point element types.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Return the element type used to hold elements of `native` when no buffer is supplied.
    ///
    /// [`NativeType::Byte`] is signed, so it maps to [`ElementType::Int8`].
    /// Bytes are copied verbatim to and from [`ElementType::UInt8`] buffers, so supply one to read byte data as unsigned.
    ///
    /// # Errors
    /// Returns [`UnsupportedTypeError::Unmapped`] if `native` has no element type mapping.
    pub fn from_native(native: NativeType) -> Result<Self, UnsupportedTypeError> {
        match native {
            NativeType::Char => Ok(Self::Char),
            NativeType::Byte => Ok(Self::Int8),
            NativeType::Short => Ok(Self::Int16),
            NativeType::Int => Ok(Self::Int32),
            NativeType::Float => Ok(Self::Float32),
            NativeType::Double => Ok(Self::Float64),
            NativeType::UByte
            | NativeType::UShort
            | NativeType::UInt
            | NativeType::Int64
            | NativeType::UInt64
            | NativeType::String => Err(UnsupportedTypeError::Unmapped(native)),
        }
    }

    /// Check that elements of this type can be converted to and from `native`.
    ///
    /// # Errors
    /// Returns [`UnsupportedTypeError`] if `native` is unmapped, or if exactly one of the element type and `native` is character data.
    pub fn check_convertible(self, native: NativeType) -> Result<(), UnsupportedTypeError> {
        Self::from_native(native)?;
        if self.is_char() == (native == NativeType::Char) {
            Ok(())
        } else {
            Err(UnsupportedTypeError::Inconvertible {
                element_type: self,
                native,
            })
        }
    }
}
