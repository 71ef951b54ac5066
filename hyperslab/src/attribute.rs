//! Attribute values.
//!
//! Attributes are transferred whole, through the same element type table as variables.

use crate::{
    storage::{status, AttributeStorageTraits, AttributeTarget, StorageError},
    transfer_error::backend_error,
    Buffer, ElementType, NativeType, ShapeError, TransferError, Value,
};

/// Read the attribute `name` of `target` as a value.
///
/// Returns [`None`] if the attribute does not exist.
/// Character data is returned as [`Value::Text`], a single number as [`Value::Integer`] or [`Value::Float`], and anything else as a [`Value::Buffer`] of the default element type of the attribute.
///
/// # Errors
/// Returns a [`TransferError`] if `target` does not resolve, the native type of the attribute is unmapped, or the store reports a failure.
pub fn get_attribute<TStorage: ?Sized + AttributeStorageTraits>(
    storage: &TStorage,
    target: AttributeTarget,
    name: &str,
) -> Result<Option<Value>, TransferError> {
    let Some((native, len)) = storage.attribute_info(target, name)? else {
        return Ok(None);
    };
    let element_type = ElementType::from_native(native)?;
    let mut buffer = Buffer::new(element_type, vec![len])
        .map_err(|_| ShapeError::TooLarge(vec![len]))?;
    log::debug!("read {target} attribute {name}: {len} elements of {element_type}");
    storage
        .get_att(target, name, element_type, buffer.as_bytes_mut())
        .map_err(backend_error)?;
    Ok(Some(Value::from_buffer(buffer, true)))
}

/// Read the attribute `name` of `target` into `buffer`.
///
/// `buffer` must hold exactly the elements of the attribute.
///
/// # Errors
/// Returns a [`TransferError`] if `target` does not resolve, the attribute does not exist, the element type of `buffer` is not convertible, `buffer` holds the wrong number of elements, or the store reports a failure.
pub fn get_attribute_into<TStorage: ?Sized + AttributeStorageTraits>(
    storage: &TStorage,
    target: AttributeTarget,
    name: &str,
    buffer: &mut Buffer,
) -> Result<(), TransferError> {
    let (native, len) = storage
        .attribute_info(target, name)?
        .ok_or_else(|| backend_error(StorageError::from_status(status::NOT_ATTRIBUTE)))?;
    buffer.element_type().check_convertible(native)?;
    if buffer.num_elements() != len {
        return Err(ShapeError::ElementCount {
            got: buffer.num_elements(),
            expected: len,
        }
        .into());
    }
    storage
        .get_att(target, name, buffer.element_type(), buffer.as_bytes_mut())
        .map_err(backend_error)
}

/// Create or replace the attribute `name` of `target` with `value`.
///
/// The native type of the attribute follows from the value:
///  - [`Value::Text`] is stored as [`NativeType::Char`],
///  - [`Value::Integer`] as a single [`NativeType::Int`],
///  - [`Value::Float`] as a single [`NativeType::Double`], and
///  - [`Value::Buffer`] as the native type of its element type.
///
/// # Errors
/// Returns a [`TransferError`] if `target` does not resolve, an integer is not representable as [`NativeType::Int`], or the store reports a failure.
pub fn put_attribute<TStorage: ?Sized + AttributeStorageTraits>(
    storage: &TStorage,
    target: AttributeTarget,
    name: &str,
    value: &Value,
) -> Result<(), TransferError> {
    let buffer = match value {
        Value::Text(text) => Buffer::from_text(text.clone()),
        Value::Integer(value) => {
            let value = i32::try_from(*value)
                .map_err(|_| backend_error(StorageError::from_status(status::RANGE)))?;
            Buffer::from_elements(vec![value])
        }
        Value::Float(value) => Buffer::from_elements(vec![*value]),
        Value::Buffer(buffer) => buffer.clone(),
    };
    let element_type = buffer.element_type();
    let native: NativeType = element_type.native();
    log::debug!(
        "write {target} attribute {name}: {} elements of {element_type} as {native}",
        buffer.num_elements()
    );
    storage
        .put_att(target, name, native, element_type, buffer.as_bytes())
        .map_err(backend_error)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::storage::{store::MemoryStore, VariableId};

    #[test]
    fn attribute_values() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let global = AttributeTarget::Global;
        put_attribute(&store, global, "title", &Value::from("hyperslab"))?;
        put_attribute(&store, global, "version", &Value::Integer(3))?;
        put_attribute(&store, global, "scale", &Value::Float(0.5))?;
        put_attribute(
            &store,
            global,
            "range",
            &Value::Buffer(Buffer::from_elements(vec![-1i16, 1])),
        )?;

        assert_eq!(
            get_attribute(&store, global, "title")?,
            Some(Value::Text(b"hyperslab".to_vec()))
        );
        assert_eq!(
            get_attribute(&store, global, "version")?,
            Some(Value::Integer(3))
        );
        assert_eq!(
            get_attribute(&store, global, "scale")?,
            Some(Value::Float(0.5))
        );
        assert_eq!(
            get_attribute(&store, global, "range")?,
            Some(Value::Buffer(Buffer::from_elements(vec![-1i16, 1])))
        );
        assert_eq!(get_attribute(&store, global, "missing")?, None);
        Ok(())
    }

    #[test]
    fn attribute_into() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let x = store.define_dimension("x", 1)?;
        let variable = store.define_variable("v", NativeType::Float, &[x])?;
        let target = AttributeTarget::from(variable);
        put_attribute(
            &store,
            target,
            "valid_range",
            &Value::Buffer(Buffer::from_elements(vec![0.0f32, 100.0])),
        )?;
        let mut buffer = Buffer::from_elements(vec![0f64; 2]);
        get_attribute_into(&store, target, "valid_range", &mut buffer)?;
        assert_eq!(buffer.to_elements::<f64>()?, vec![0.0, 100.0]);

        assert_eq!(
            get_attribute_into(
                &store,
                target,
                "valid_range",
                &mut Buffer::from_elements(vec![0f64; 3])
            ),
            Err(ShapeError::ElementCount {
                got: 3,
                expected: 2
            }
            .into())
        );
        assert!(matches!(
            get_attribute_into(
                &store,
                target,
                "valid_range",
                &mut Buffer::from_text("ab")
            ),
            Err(TransferError::UnsupportedType(_))
        ));
        assert_eq!(
            get_attribute_into(&store, target, "missing", &mut buffer)
                .map_err(|err| err.status()),
            Err(Some(status::NOT_ATTRIBUTE))
        );
        assert!(matches!(
            get_attribute(&store, AttributeTarget::from(VariableId(9)), "valid_range"),
            Err(TransferError::NotOpen(_))
        ));
        Ok(())
    }

    #[test]
    fn attribute_unsigned_bytes() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let global = AttributeTarget::Global;
        put_attribute(
            &store,
            global,
            "flag",
            &Value::Buffer(Buffer::from_elements(vec![200u8])),
        )?;
        assert_eq!(store.attribute_info(global, "flag")?, Some((NativeType::Byte, 1)));
        assert_eq!(get_attribute(&store, global, "flag")?, Some(Value::Integer(-56)));
        let mut buffer = Buffer::from_elements(vec![0u8]);
        get_attribute_into(&store, global, "flag", &mut buffer)?;
        assert_eq!(buffer.to_elements::<u8>()?, vec![200]);
        Ok(())
    }

    #[test]
    fn attribute_integer_range() {
        let store = MemoryStore::new();
        let err = put_attribute(
            &store,
            AttributeTarget::Global,
            "big",
            &Value::Integer(i64::from(i32::MAX) + 1),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(status::RANGE));
    }
}
