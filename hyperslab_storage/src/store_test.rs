//! Store test utilities.
//!
//! Each function takes a variable of shape `[4, 3]` with native type [`NativeType::Int`].
//! [`store_write`] must run first, the remaining functions expect the data it leaves behind.

use std::error::Error;

use hyperslab_data_type::{convert_from_bytes_slice, transmute_to_bytes};

use crate::{
    status, AttributeStorageTraits, AttributeTarget, ElementType, NativeType,
    ReadableStorageTraits, StorageError, VariableId, WritableStorageTraits,
};

/// The data of the test variable after [`store_write`].
pub const STORE_TEST_DATA: [i32; 12] = [-1, 7, -2, 50, 52, 41, 51, 53, 43, -3, 10, -4];

/// Write the test variable with each write primitive.
///
/// # Errors
/// Returns an error if a write fails.
///
/// # Panics
/// Panics if the variable does not have the expected shape or native type.
pub fn store_write<TStorage: WritableStorageTraits + ?Sized>(
    store: &TStorage,
    variable: VariableId,
) -> Result<(), Box<dyn Error>> {
    assert_eq!(store.shape(variable)?, vec![4, 3]);
    assert_eq!(store.rank(variable)?, 2);
    assert_eq!(store.native_type(variable)?, NativeType::Int);

    let values: Vec<i32> = (0..12).collect();
    store.put_var(variable, ElementType::Int32, transmute_to_bytes(&values))?;
    store.put_vara(
        variable,
        &[1, 1],
        &[2, 2],
        ElementType::Float64,
        transmute_to_bytes(&[40.0f64, 41.0, 42.0, 43.0]),
    )?;
    store.put_vars(
        variable,
        &[0, 0],
        &[2, 2],
        &[3, 2],
        ElementType::Int16,
        transmute_to_bytes(&[-1i16, -2, -3, -4]),
    )?;
    store.put_varm(
        variable,
        &[1, 0],
        &[2, 2],
        &[1, 1],
        &[1, 2],
        ElementType::Int32,
        transmute_to_bytes(&[50i32, 51, 52, 53]),
    )?;
    store.put_var1(variable, &[0, 1], ElementType::Int8, transmute_to_bytes(&[7i8]))?;
    Ok(())
}

/// Read the test variable with each read primitive.
///
/// # Errors
/// Returns an error if a read fails.
///
/// # Panics
/// Panics if the read data is not as expected.
pub fn store_read<TStorage: ReadableStorageTraits + ?Sized>(
    store: &TStorage,
    variable: VariableId,
) -> Result<(), Box<dyn Error>> {
    let mut bytes = vec![0u8; 12 * 4];
    store.get_var(variable, ElementType::Int32, &mut bytes)?;
    assert_eq!(convert_from_bytes_slice::<i32>(&bytes), STORE_TEST_DATA);

    let mut bytes = vec![0u8; 8];
    store.get_var1(variable, &[1, 2], ElementType::Float64, &mut bytes)?;
    assert_eq!(convert_from_bytes_slice::<f64>(&bytes), vec![41.0]);

    let mut bytes = vec![0u8; 4 * 2];
    store.get_vara(variable, &[2, 1], &[2, 2], ElementType::Int16, &mut bytes)?;
    assert_eq!(convert_from_bytes_slice::<i16>(&bytes), vec![53, 43, 10, -4]);

    let mut bytes = vec![0u8; 4 * 4];
    store.get_vars(
        variable,
        &[3, 2],
        &[2, 2],
        &[-3, -2],
        ElementType::Float32,
        &mut bytes,
    )?;
    assert_eq!(
        convert_from_bytes_slice::<f32>(&bytes),
        vec![-4.0, -3.0, -2.0, -1.0]
    );

    let mut bytes = vec![0u8; 12 * 4];
    store.get_varm(
        variable,
        &[0, 0],
        &[4, 3],
        &[1, 1],
        &[1, 4],
        ElementType::Int32,
        &mut bytes,
    )?;
    assert_eq!(
        convert_from_bytes_slice::<i32>(&bytes),
        vec![-1, 50, 51, -3, 7, 52, 53, 10, -2, 41, 43, -4]
    );
    Ok(())
}

/// Check the status codes reported for invalid transfers.
///
/// # Errors
/// Returns an error if a valid transfer fails.
///
/// # Panics
/// Panics if an invalid transfer succeeds or reports an unexpected status.
pub fn store_errors<TStorage: ReadableStorageTraits + WritableStorageTraits + ?Sized>(
    store: &TStorage,
    variable: VariableId,
) -> Result<(), Box<dyn Error>> {
    let status_of = |result: Result<(), StorageError>| result.map_err(|err| err.status());
    let mut bytes = vec![0u8; 4 * 4];

    assert_eq!(
        status_of(store.get_var1(variable, &[4, 0], ElementType::Int32, &mut bytes[..4])),
        Err(status::INVALID_COORDS)
    );
    assert_eq!(
        status_of(store.get_vara(variable, &[3, 0], &[2, 1], ElementType::Int32, &mut bytes[..8])),
        Err(status::EDGE)
    );
    assert_eq!(
        status_of(store.get_vars(
            variable,
            &[0, 0],
            &[2, 2],
            &[0, 1],
            ElementType::Int32,
            &mut bytes
        )),
        Err(status::STRIDE)
    );
    assert_eq!(
        status_of(store.get_vara(variable, &[0, 0], &[2, 2], ElementType::Int32, &mut bytes[..12])),
        Err(status::INVALID_ARGUMENT)
    );
    assert_eq!(
        status_of(store.get_vara(variable, &[0], &[1], ElementType::Int32, &mut bytes[..4])),
        Err(status::INVALID_ARGUMENT)
    );
    assert_eq!(
        status_of(store.get_var1(variable, &[0, 0], ElementType::Char, &mut bytes[..1])),
        Err(status::CHAR_CONVERSION)
    );
    assert_eq!(
        store.get_var1(VariableId(usize::MAX), &[0, 0], ElementType::Int32, &mut bytes[..4]),
        Err(StorageError::InvalidVariable(VariableId(usize::MAX)))
    );

    // Unrepresentable values are reported without touching the stored element
    assert_eq!(
        status_of(store.put_var1(
            variable,
            &[0, 0],
            ElementType::Float64,
            transmute_to_bytes(&[1e10f64])
        )),
        Err(status::RANGE)
    );
    store.get_var1(variable, &[0, 0], ElementType::Int32, &mut bytes[..4])?;
    assert_eq!(convert_from_bytes_slice::<i32>(&bytes[..4]), vec![-1]);
    Ok(())
}

/// Write and read attributes of the store and of the test variable.
///
/// # Errors
/// Returns an error if a valid attribute operation fails.
///
/// # Panics
/// Panics if an attribute is not as expected.
pub fn store_attributes<TStorage: AttributeStorageTraits + ?Sized>(
    store: &TStorage,
    variable: VariableId,
) -> Result<(), Box<dyn Error>> {
    let global = AttributeTarget::Global;
    let target = AttributeTarget::from(variable);
    let status_of = |result: Result<(), StorageError>| result.map_err(|err| err.status());

    assert_eq!(store.attribute_info(global, "title")?, None);
    store.put_att(global, "title", NativeType::Char, ElementType::Char, b"hyperslab")?;
    assert_eq!(
        store.attribute_info(global, "title")?,
        Some((NativeType::Char, 9))
    );
    let mut text = vec![0u8; 9];
    store.get_att(global, "title", ElementType::Char, &mut text)?;
    assert_eq!(text, b"hyperslab");

    store.put_att(
        target,
        "scale",
        NativeType::Double,
        ElementType::Float32,
        transmute_to_bytes(&[0.5f32, 2.0]),
    )?;
    assert_eq!(
        store.attribute_info(target, "scale")?,
        Some((NativeType::Double, 2))
    );
    let mut bytes = vec![0u8; 2 * 8];
    store.get_att(target, "scale", ElementType::Float64, &mut bytes)?;
    assert_eq!(convert_from_bytes_slice::<f64>(&bytes), vec![0.5, 2.0]);
    assert_eq!(
        status_of(store.get_att(target, "scale", ElementType::Float64, &mut bytes[..8])),
        Err(status::INVALID_ARGUMENT)
    );

    assert_eq!(
        status_of(store.put_att(
            target,
            "valid_max",
            NativeType::Short,
            ElementType::Int32,
            transmute_to_bytes(&[70000i32])
        )),
        Err(status::RANGE)
    );
    assert_eq!(
        store.attribute_info(target, "valid_max")?,
        Some((NativeType::Short, 1))
    );

    assert_eq!(
        status_of(store.get_att(global, "missing", ElementType::Int32, &mut bytes[..4])),
        Err(status::NOT_ATTRIBUTE)
    );
    assert_eq!(
        status_of(store.get_att(global, "title", ElementType::Int32, &mut bytes[..4])),
        Err(status::CHAR_CONVERSION)
    );
    assert_eq!(
        store.attribute_info(AttributeTarget::Variable(VariableId(usize::MAX)), "scale"),
        Err(StorageError::InvalidVariable(VariableId(usize::MAX)))
    );
    Ok(())
}
