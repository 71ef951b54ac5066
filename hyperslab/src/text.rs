//! Character data transfers.
//!
//! Variables with the [`NativeType::Char`] native type hold text.
//! Text is transferred as opaque bytes through [`ElementType::Char`] buffers, and never converted to or from numbers.

use crate::{
    storage::{ReadableStorageTraits, StoreMetadataTraits, VariableId, WritableStorageTraits},
    AccessPattern, Buffer, ElementType, NativeType, ShapeError, TransferError, TransferOptions,
};

fn check_text<TStorage: ?Sized + StoreMetadataTraits>(
    storage: &TStorage,
    variable: VariableId,
) -> Result<(), TransferError> {
    let native: NativeType = storage.native_type(variable)?;
    ElementType::Char.check_convertible(native)?;
    Ok(())
}

/// Read the characters of `variable` addressed by `pattern` with default options.
///
/// # Errors
/// See [`read_text_opt`].
pub fn read_text<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
) -> Result<Vec<u8>, TransferError> {
    read_text_opt(storage, variable, pattern, &TransferOptions::default())
}

/// Read the characters of `variable` addressed by `pattern`.
///
/// The number of characters is the number of addressed elements.
///
/// # Errors
/// Returns [`TransferError::UnsupportedType`] if `variable` does not hold character data, otherwise see [`read_opt`](crate::read_opt).
pub fn read_text_opt<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    options: &TransferOptions,
) -> Result<Vec<u8>, TransferError> {
    check_text(storage, variable)?;
    Ok(crate::read_opt(storage, variable, pattern, options)?.into_bytes())
}

/// Write `text` to the characters of `variable` addressed by `pattern` with default options.
///
/// # Errors
/// See [`write_text_opt`].
pub fn write_text<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    text: &[u8],
) -> Result<(), TransferError> {
    write_text_opt(storage, variable, pattern, text, &TransferOptions::default())
}

/// Write `text` to the characters of `variable` addressed by `pattern`.
///
/// Writing [`AccessPattern::Whole`] of a one dimensional variable writes `text` from the first character, and `text` may be shorter than the variable.
/// Otherwise `text` must hold exactly the addressed elements.
///
/// # Errors
/// Returns [`TransferError::UnsupportedType`] if `variable` does not hold character data, a [`ShapeError`] if `text` is too long for a one dimensional variable, otherwise see [`write_opt`](crate::write_opt).
pub fn write_text_opt<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    text: &[u8],
    options: &TransferOptions,
) -> Result<(), TransferError> {
    check_text(storage, variable)?;
    let buffer = Buffer::from_text(text);
    if let AccessPattern::Whole = pattern {
        if let [length] = storage.shape(variable)?[..] {
            let count = buffer.num_elements();
            if count > length {
                return Err(ShapeError::ExtentOutOfBounds {
                    axis: 0,
                    start: 0,
                    count,
                    stride: 1,
                    length,
                }
                .into());
            }
            let pattern = AccessPattern::slab([0], [count]);
            return crate::write_opt(storage, variable, &pattern, &buffer, options);
        }
    }
    crate::write_opt(storage, variable, pattern, &buffer, options)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::storage::store::MemoryStore;

    #[test]
    fn text_whole_1d() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let x = store.define_dimension("x", 8)?;
        let variable = store.define_variable("name", NativeType::Char, &[x])?;
        write_text(&store, variable, &AccessPattern::Whole, b"slab")?;
        assert_eq!(
            read_text(&store, variable, &AccessPattern::Whole)?,
            b"slab\0\0\0\0"
        );
        assert_eq!(
            read_text(&store, variable, &AccessPattern::slab([1], [2]))?,
            b"la"
        );
        assert!(matches!(
            write_text(&store, variable, &AccessPattern::Whole, b"too long text"),
            Err(TransferError::Shape(ShapeError::ExtentOutOfBounds { .. }))
        ));
        Ok(())
    }

    #[test]
    fn text_whole_2d() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let y = store.define_dimension("y", 2)?;
        let x = store.define_dimension("x", 3)?;
        let variable = store.define_variable("names", NativeType::Char, &[y, x])?;
        assert_eq!(
            write_text(&store, variable, &AccessPattern::Whole, b"abcd"),
            Err(ShapeError::ElementCount {
                got: 4,
                expected: 6
            }
            .into())
        );
        write_text(&store, variable, &AccessPattern::Whole, b"abcdef")?;
        write_text(&store, variable, &AccessPattern::point([1, 0]), b"X")?;
        assert_eq!(
            read_text(&store, variable, &AccessPattern::strided_slab([0, 2], [2, 2], [1, -1]))?,
            b"cbfe"
        );
        assert_eq!(
            read_text(&store, variable, &AccessPattern::Whole)?,
            b"abcXef"
        );
        Ok(())
    }

    #[test]
    fn text_numeric_variable() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let x = store.define_dimension("x", 2)?;
        let variable = store.define_variable("v", NativeType::Short, &[x])?;
        assert!(matches!(
            read_text(&store, variable, &AccessPattern::Whole),
            Err(TransferError::UnsupportedType(_))
        ));
        assert!(matches!(
            write_text(&store, variable, &AccessPattern::Whole, b"ab"),
            Err(TransferError::UnsupportedType(_))
        ));
        Ok(())
    }
}
