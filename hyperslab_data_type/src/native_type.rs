use derive_more::Display;

/// The element type of a variable or attribute as reported by a store.
///
/// The discriminants are the store's own type codes.
/// Only [`Byte`](NativeType::Byte), [`Char`](NativeType::Char), [`Short`](NativeType::Short), [`Int`](NativeType::Int), [`Float`](NativeType::Float) and [`Double`](NativeType::Double) have an [`ElementType`](crate::ElementType) mapping.
/// The remaining codes can be reported by a store but cannot be transferred.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[repr(i32)]
pub enum NativeType {
    /// Signed 8-bit integer.
    #[display("byte")]
    Byte = 1,
    /// Character data.
    #[display("char")]
    Char = 2,
    /// Signed 16-bit integer.
    #[display("short")]
    Short = 3,
    /// Signed 32-bit integer.
    #[display("int")]
    Int = 4,
    /// IEEE 754 single precision floating point.
    #[display("float")]
    Float = 5,
    /// IEEE 754 double precision floating point.
    #[display("double")]
    Double = 6,
    /// Unsigned 8-bit integer.
    #[display("ubyte")]
    UByte = 7,
    /// Unsigned 16-bit integer.
    #[display("ushort")]
    UShort = 8,
    /// Unsigned 32-bit integer.
    #[display("uint")]
    UInt = 9,
    /// Signed 64-bit integer.
    #[display("int64")]
    Int64 = 10,
    /// Unsigned 64-bit integer.
    #[display("uint64")]
    UInt64 = 11,
    /// Variable length string.
    #[display("string")]
    String = 12,
}

impl NativeType {
    /// All native types, in code order.
    pub const ALL: [Self; 12] = [
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::Double,
        Self::UByte,
        Self::UShort,
        Self::UInt,
        Self::Int64,
        Self::UInt64,
        Self::String,
    ];

    /// Return the type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Create a native type from a type code.
    ///
    /// Returns [`None`] if `code` is not a known type code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|native| native.code() == code)
    }

    /// Return the storage width of one element in bytes.
    ///
    /// Strings are stored as opaque 8 byte handles.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::Char | Self::UByte => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Double | Self::Int64 | Self::UInt64 | Self::String => 8,
        }
    }

    /// Returns true if the native type holds numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Char | Self::String)
    }

    /// Return the default fill value in host byte order.
    ///
    /// Stores initialise unwritten elements to this value when prefilling is enabled.
    #[must_use]
    #[allow(clippy::excessive_precision)]
    pub fn fill_value(self) -> Vec<u8> {
        match self {
            Self::Byte => (-127i8).to_ne_bytes().to_vec(),
            Self::Char | Self::String => vec![0; self.size()],
            Self::Short => (-32767i16).to_ne_bytes().to_vec(),
            Self::Int => (-2_147_483_647_i32).to_ne_bytes().to_vec(),
            Self::Float => 9.969_209_968_386_869e36_f32.to_ne_bytes().to_vec(),
            Self::Double => 9.969_209_968_386_869e36_f64.to_ne_bytes().to_vec(),
            Self::UByte => u8::MAX.to_ne_bytes().to_vec(),
            Self::UShort => u16::MAX.to_ne_bytes().to_vec(),
            Self::UInt => u32::MAX.to_ne_bytes().to_vec(),
            Self::Int64 => (-9_223_372_036_854_775_806_i64).to_ne_bytes().to_vec(),
            Self::UInt64 => (u64::MAX - 1).to_ne_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_type_codes() {
        for native in NativeType::ALL {
            assert_eq!(NativeType::from_code(native.code()), Some(native));
            assert_eq!(native.fill_value().len(), native.size());
        }
        assert_eq!(NativeType::from_code(0), None);
        assert_eq!(NativeType::from_code(13), None);
        assert_eq!(NativeType::Int.code(), 4);
        assert_eq!(NativeType::Double.to_string(), "double");
    }

    #[test]
    fn native_type_fill_value() {
        assert_eq!(NativeType::Int.fill_value(), (-2_147_483_647_i32).to_ne_bytes());
        assert_eq!(NativeType::Char.fill_value(), [0]);
        assert!(!NativeType::Char.is_numeric());
        assert!(NativeType::UShort.is_numeric());
    }
}
