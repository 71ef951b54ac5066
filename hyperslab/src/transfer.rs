//! The typed transfer engine.
//!
//! A transfer moves the elements of a variable addressed by an [`AccessPattern`] between a store and a [`Buffer`].
//! Every transfer follows the same steps regardless of direction, pattern or element type:
//!  1. the element type of the buffer is checked against the native type of the variable with the element type table,
//!  2. the pattern is normalised to a [`StridedSubset`] of the variable shape, which checks its dimensionality, its memory map and (optionally) its bounds,
//!  3. the buffer is checked to hold the elements of the subset, or allocated for reads without a buffer, and
//!  4. the store primitive matching the pattern is called once with the element type of the buffer.
//!
//! Steps 1 to 3 only query store metadata, so a transfer that fails validation never reads or writes variable data.

use derive_more::Display;

use crate::{
    storage::{
        ReadableStorageTraits, StorageError, StoreMetadataTraits, VariableId,
        WritableStorageTraits,
    },
    transfer_error::backend_error,
    AccessPattern, Buffer, ElementType, ShapeError, StridedSubset, TransferError,
    TransferOptions,
};

/// The direction of a transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum TransferDirection {
    /// From the store to a buffer.
    #[display("read")]
    Read,
    /// From a buffer to the store.
    #[display("write")]
    Write,
}

/// The outcome of a [`transfer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transferred {
    /// The buffer holding the elements read.
    Read(Buffer),
    /// The elements were written.
    Written,
}

impl Transferred {
    /// Return the buffer of a read.
    #[must_use]
    pub fn into_buffer(self) -> Option<Buffer> {
        match self {
            Self::Read(buffer) => Some(buffer),
            Self::Written => None,
        }
    }
}

/// A transfer that has passed validation.
struct TransferPlan {
    element_type: ElementType,
    subset: StridedSubset,
    num_elements: u64,
}

impl TransferPlan {
    fn new<TStorage: ?Sized + StoreMetadataTraits>(
        storage: &TStorage,
        variable: VariableId,
        pattern: &AccessPattern,
        element_type: Option<ElementType>,
        options: &TransferOptions,
    ) -> Result<Self, TransferError> {
        let native = storage.native_type(variable)?;
        let element_type = match element_type {
            Some(element_type) => {
                element_type.check_convertible(native)?;
                element_type
            }
            None => ElementType::from_native(native)?,
        };
        let shape = storage.shape(variable)?;
        let subset = pattern.to_strided_subset(&shape)?;
        if options.validate_bounds() {
            subset.validate_bounds(&shape)?;
        }
        let num_elements = subset
            .num_elements()
            .ok_or_else(|| ShapeError::TooLarge(subset.count().to_vec()))?;
        subset.validate_imap(num_elements)?;
        Ok(Self {
            element_type,
            subset,
            num_elements,
        })
    }

    /// Return the number of bytes of `buffer` taking part in the transfer.
    ///
    /// A point transfer uses the first element of a buffer of any non-zero length.
    fn buffer_len(&self, pattern: &AccessPattern, buffer: &Buffer) -> Result<usize, ShapeError> {
        let got = buffer.num_elements();
        if let AccessPattern::Point { .. } = pattern {
            if got == 0 {
                return Err(ShapeError::ElementCountAtLeast { got, expected: 1 });
            }
            Ok(self.element_type.size())
        } else if got == self.num_elements {
            Ok(buffer.as_bytes().len())
        } else {
            Err(ShapeError::ElementCount {
                got,
                expected: self.num_elements,
            })
        }
    }

    fn allocate(&self) -> Result<Buffer, TransferError> {
        let shape = self.subset.count().to_vec();
        Buffer::new(self.element_type, shape.clone())
            .map_err(|_| ShapeError::TooLarge(shape).into())
    }

    fn log(&self, direction: TransferDirection, variable: VariableId, pattern: &AccessPattern) {
        log::debug!(
            "{direction} variable {variable} ({}, {}): {} elements of {}",
            pattern.kind(),
            self.subset,
            self.num_elements,
            self.element_type
        );
    }
}

fn get<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    element_type: ElementType,
    bytes: &mut [u8],
) -> Result<(), StorageError> {
    match pattern {
        AccessPattern::Point { index } => storage.get_var1(variable, index, element_type, bytes),
        AccessPattern::Whole => storage.get_var(variable, element_type, bytes),
        AccessPattern::Slab { start, count } => {
            storage.get_vara(variable, start, count, element_type, bytes)
        }
        AccessPattern::StridedSlab {
            start,
            count,
            stride,
        } => storage.get_vars(variable, start, count, stride, element_type, bytes),
        AccessPattern::MappedSlab {
            start,
            count,
            stride,
            imap,
        } => storage.get_varm(variable, start, count, stride, imap, element_type, bytes),
    }
}

fn put<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    element_type: ElementType,
    bytes: &[u8],
) -> Result<(), StorageError> {
    match pattern {
        AccessPattern::Point { index } => storage.put_var1(variable, index, element_type, bytes),
        AccessPattern::Whole => storage.put_var(variable, element_type, bytes),
        AccessPattern::Slab { start, count } => {
            storage.put_vara(variable, start, count, element_type, bytes)
        }
        AccessPattern::StridedSlab {
            start,
            count,
            stride,
        } => storage.put_vars(variable, start, count, stride, element_type, bytes),
        AccessPattern::MappedSlab {
            start,
            count,
            stride,
            imap,
        } => storage.put_varm(variable, start, count, stride, imap, element_type, bytes),
    }
}

/// Transfer the elements of `variable` addressed by `pattern` in `direction`.
///
/// A read fills `buffer` if supplied, or allocates a buffer of the default element type of the variable shaped like the addressed elements.
/// A write requires `buffer`.
///
/// # Errors
/// Returns a [`TransferError`] if
///  - the variable does not resolve,
///  - the element type of `buffer` cannot be transferred to or from the variable,
///  - `pattern` does not match the dimensionality of the variable, or lies outside of the variable,
///  - `buffer` does not hold the addressed elements,
///  - a write has no buffer, or
///  - the store reports a failure.
pub fn transfer<TStorage: ?Sized + ReadableStorageTraits + WritableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    direction: TransferDirection,
    pattern: &AccessPattern,
    buffer: Option<Buffer>,
    options: &TransferOptions,
) -> Result<Transferred, TransferError> {
    match (direction, buffer) {
        (TransferDirection::Read, Some(mut buffer)) => {
            read_into_opt(storage, variable, pattern, &mut buffer, options)?;
            Ok(Transferred::Read(buffer))
        }
        (TransferDirection::Read, None) => {
            read_opt(storage, variable, pattern, options).map(Transferred::Read)
        }
        (TransferDirection::Write, Some(buffer)) => {
            write_opt(storage, variable, pattern, &buffer, options)?;
            Ok(Transferred::Written)
        }
        (TransferDirection::Write, None) => Err(TransferError::MissingBuffer),
    }
}

/// Read the elements of `variable` addressed by `pattern` into a new buffer with default options.
///
/// # Errors
/// See [`read_opt`].
pub fn read<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
) -> Result<Buffer, TransferError> {
    read_opt(storage, variable, pattern, &TransferOptions::default())
}

/// Read the elements of `variable` addressed by `pattern` into a new buffer.
///
/// The buffer has the default element type of the native type of the variable, and the shape of the addressed elements (the variable shape for [`AccessPattern::Whole`], ones for [`AccessPattern::Point`], otherwise the count).
///
/// # Errors
/// Returns a [`TransferError`] if the variable does not resolve, its native type is unmapped, `pattern` is invalid for the variable, or the store reports a failure.
pub fn read_opt<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    options: &TransferOptions,
) -> Result<Buffer, TransferError> {
    let plan = TransferPlan::new(storage, variable, pattern, None, options)?;
    let mut buffer = plan.allocate()?;
    plan.log(TransferDirection::Read, variable, pattern);
    get(
        storage,
        variable,
        pattern,
        plan.element_type,
        buffer.as_bytes_mut(),
    )
    .map_err(backend_error)?;
    Ok(buffer)
}

/// Read the elements of `variable` addressed by `pattern` into `buffer` with default options.
///
/// # Errors
/// See [`read_into_opt`].
pub fn read_into<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    buffer: &mut Buffer,
) -> Result<(), TransferError> {
    read_into_opt(
        storage,
        variable,
        pattern,
        buffer,
        &TransferOptions::default(),
    )
}

/// Read the elements of `variable` addressed by `pattern` into `buffer`.
///
/// `buffer` must hold exactly the addressed elements, or at least one element for [`AccessPattern::Point`].
/// Elements are converted from the native type of the variable to the element type of `buffer`.
///
/// # Errors
/// Returns a [`TransferError`] if the variable does not resolve, the element type of `buffer` is not convertible, `pattern` is invalid for the variable, `buffer` does not hold the addressed elements, or the store reports a failure.
pub fn read_into_opt<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    buffer: &mut Buffer,
    options: &TransferOptions,
) -> Result<(), TransferError> {
    let plan = TransferPlan::new(
        storage,
        variable,
        pattern,
        Some(buffer.element_type()),
        options,
    )?;
    let len = plan.buffer_len(pattern, buffer)?;
    plan.log(TransferDirection::Read, variable, pattern);
    get(
        storage,
        variable,
        pattern,
        plan.element_type,
        &mut buffer.as_bytes_mut()[..len],
    )
    .map_err(backend_error)
}

/// Write `buffer` to the elements of `variable` addressed by `pattern` with default options.
///
/// # Errors
/// See [`write_opt`].
pub fn write<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    buffer: &Buffer,
) -> Result<(), TransferError> {
    write_opt(
        storage,
        variable,
        pattern,
        buffer,
        &TransferOptions::default(),
    )
}

/// Write `buffer` to the elements of `variable` addressed by `pattern`.
///
/// `buffer` must hold exactly the addressed elements, or at least one element for [`AccessPattern::Point`] of which the first is written.
/// Elements are converted from the element type of `buffer` to the native type of the variable.
///
/// # Errors
/// Returns a [`TransferError`] if the variable does not resolve, the element type of `buffer` is not convertible, `pattern` is invalid for the variable, `buffer` does not hold the addressed elements, or the store reports a failure.
/// A store failure may leave the addressed elements partially written.
pub fn write_opt<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    variable: VariableId,
    pattern: &AccessPattern,
    buffer: &Buffer,
    options: &TransferOptions,
) -> Result<(), TransferError> {
    let plan = TransferPlan::new(
        storage,
        variable,
        pattern,
        Some(buffer.element_type()),
        options,
    )?;
    let len = plan.buffer_len(pattern, buffer)?;
    plan.log(TransferDirection::Write, variable, pattern);
    put(
        storage,
        variable,
        pattern,
        plan.element_type,
        &buffer.as_bytes()[..len],
    )
    .map_err(backend_error)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::storage::{status, store::MemoryStore, NativeType};

    fn store_1d() -> Result<(MemoryStore, VariableId), Box<dyn Error>> {
        let store = MemoryStore::new();
        let x = store.define_dimension("x", 10)?;
        let variable = store.define_variable("v", NativeType::Int, &[x])?;
        write(
            &store,
            variable,
            &AccessPattern::Whole,
            &Buffer::from_elements((0..10).collect::<Vec<i32>>()),
        )?;
        Ok((store, variable))
    }

    #[test]
    fn transfer_directions() -> Result<(), Box<dyn Error>> {
        let (store, variable) = store_1d()?;
        let options = TransferOptions::default();
        let pattern = AccessPattern::slab([2], [3]);
        let written = transfer(
            &store,
            variable,
            TransferDirection::Write,
            &pattern,
            Some(Buffer::from_elements(vec![7i16, 8, 9])),
            &options,
        )?;
        assert_eq!(written, Transferred::Written);
        assert_eq!(written.into_buffer(), None);

        let read = transfer(
            &store,
            variable,
            TransferDirection::Read,
            &pattern,
            None,
            &options,
        )?;
        assert_eq!(
            read.into_buffer().map(|buffer| buffer.to_elements::<i32>()),
            Some(Ok(vec![7, 8, 9]))
        );

        let read = transfer(
            &store,
            variable,
            TransferDirection::Read,
            &pattern,
            Some(Buffer::from_elements(vec![0f64; 3])),
            &options,
        )?;
        assert_eq!(
            read.into_buffer().map(|buffer| buffer.to_elements::<f64>()),
            Some(Ok(vec![7.0, 8.0, 9.0]))
        );

        assert_eq!(
            transfer(
                &store,
                variable,
                TransferDirection::Write,
                &pattern,
                None,
                &options
            ),
            Err(TransferError::MissingBuffer)
        );
        Ok(())
    }

    #[test]
    fn transfer_point_buffer() -> Result<(), Box<dyn Error>> {
        let (store, variable) = store_1d()?;
        let pattern = AccessPattern::point([4]);
        write(
            &store,
            variable,
            &pattern,
            &Buffer::from_elements(vec![40i32, 41, 42]),
        )?;
        let mut buffer = Buffer::from_elements(vec![0i32; 2]);
        read_into(&store, variable, &pattern, &mut buffer)?;
        assert_eq!(buffer.to_elements::<i32>()?, vec![40, 0]);
        assert_eq!(
            read_into(
                &store,
                variable,
                &pattern,
                &mut Buffer::from_elements(Vec::<i32>::new())
            ),
            Err(ShapeError::ElementCountAtLeast {
                got: 0,
                expected: 1
            }
            .into())
        );
        Ok(())
    }

    #[test]
    fn transfer_buffer_mismatch() -> Result<(), Box<dyn Error>> {
        let (store, variable) = store_1d()?;
        assert_eq!(
            write(
                &store,
                variable,
                &AccessPattern::slab([0], [4]),
                &Buffer::from_elements(vec![1i32; 3])
            ),
            Err(ShapeError::ElementCount {
                got: 3,
                expected: 4
            }
            .into())
        );
        assert_eq!(
            write(
                &store,
                variable,
                &AccessPattern::mapped_slab([0], [4], [1], [2]),
                &Buffer::from_elements(vec![1i32; 4])
            ),
            Err(ShapeError::MapOutOfBounds {
                min: 0,
                max: 6,
                len: 4
            }
            .into())
        );
        assert!(matches!(
            write(
                &store,
                variable,
                &AccessPattern::Whole,
                &Buffer::from_text("0123456789")
            ),
            Err(TransferError::UnsupportedType(_))
        ));
        assert_eq!(read(&store, variable, &AccessPattern::Whole)?.to_elements::<i32>()?, (0..10).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn transfer_bounds() -> Result<(), Box<dyn Error>> {
        let (store, variable) = store_1d()?;
        let pattern = AccessPattern::slab([8], [3]);
        assert!(matches!(
            read(&store, variable, &pattern),
            Err(TransferError::Shape(ShapeError::ExtentOutOfBounds { .. }))
        ));
        let options = TransferOptions::default().with_validate_bounds(false);
        assert_eq!(
            read_opt(&store, variable, &pattern, &options).map_err(|err| err.status()),
            Err(Some(status::EDGE))
        );
        assert_eq!(
            read_opt(&store, variable, &AccessPattern::point([10]), &options)
                .map_err(|err| err.status()),
            Err(Some(status::INVALID_COORDS))
        );
        Ok(())
    }

    #[test]
    fn transfer_logs() -> Result<(), Box<dyn Error>> {
        let (store, variable) = store_1d()?;
        testing_logger::setup();
        read(&store, variable, &AccessPattern::slab([2], [3]))?;
        let options = TransferOptions::default().with_validate_bounds(false);
        assert!(read_opt(&store, variable, &AccessPattern::slab([8], [3]), &options).is_err());
        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 3);
            assert_eq!(captured_logs[0].level, log::Level::Debug);
            assert_eq!(
                captured_logs[0].body,
                "read variable 0 (slab, start [2] count [3] stride [1] imap [1]): 3 elements of int32"
            );
            assert_eq!(captured_logs[2].level, log::Level::Warn);
            assert!(captured_logs[2].body.starts_with("store call failed: "));
        });
        Ok(())
    }

    #[test]
    fn transfer_unmapped() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let x = store.define_dimension("x", 2)?;
        let variable = store.define_variable("v", NativeType::UInt64, &[x])?;
        assert!(matches!(
            read(&store, variable, &AccessPattern::Whole),
            Err(TransferError::UnsupportedType(_))
        ));
        assert!(matches!(
            read(&store, VariableId(7), &AccessPattern::Whole),
            Err(TransferError::NotOpen(_))
        ));
        Ok(())
    }
}
