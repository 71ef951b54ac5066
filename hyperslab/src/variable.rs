use std::sync::Arc;

use crate::{
    get_attribute, put_attribute, read_into_opt, read_opt, read_text_opt, read_value_opt,
    storage::{
        AttributeStorageTraits, AttributeTarget, ReadableStorageTraits, StoreMetadataTraits,
        VariableId, WritableStorageTraits,
    },
    write_opt, write_text_opt, AccessPattern, ArrayShape, Buffer, ElementType, NativeType,
    TransferError, TransferOptions, UnsupportedTypeError, Value,
};

/// A variable in a store.
///
/// A variable caches its native type and shape when opened, and transfers with its own [`TransferOptions`].
/// Every transfer still validates against the store metadata.
///
/// ### Example
/// ```rust
/// # use std::sync::Arc;
/// # use hyperslab::{Buffer, Variable};
/// # use hyperslab::storage::{store::MemoryStore, NativeType};
/// let store = Arc::new(MemoryStore::new());
/// let x = store.define_dimension("x", 4)?;
/// let id = store.define_variable("v", NativeType::Int, &[x])?;
/// let variable = Variable::open(store, id)?;
/// variable.store_whole(&Buffer::from_elements(vec![1i32, 2, 3, 4]))?;
/// let slab = variable.retrieve_strided_slab([3], [2], [-2])?;
/// assert_eq!(slab.to_elements::<i32>()?, vec![4, 2]);
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Variable<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    id: VariableId,
    native: NativeType,
    shape: ArrayShape,
    options: TransferOptions,
}

impl<TStorage: ?Sized + StoreMetadataTraits> Variable<TStorage> {
    /// Open the variable `id` in `storage`.
    ///
    /// # Errors
    /// Returns [`TransferError::NotOpen`] if the variable does not resolve.
    pub fn open(storage: Arc<TStorage>, id: VariableId) -> Result<Self, TransferError> {
        let native = storage.native_type(id)?;
        let shape = storage.shape(id)?;
        Ok(Self {
            storage,
            id,
            native,
            shape,
            options: TransferOptions::default(),
        })
    }
}

impl<TStorage: ?Sized> Variable<TStorage> {
    /// Return the underlying storage.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }

    /// Return the variable identifier.
    #[must_use]
    pub const fn id(&self) -> VariableId {
        self.id
    }

    /// Return the native type.
    #[must_use]
    pub const fn native_type(&self) -> NativeType {
        self.native
    }

    /// Return the default element type of buffers read from the variable.
    ///
    /// # Errors
    /// Returns [`UnsupportedTypeError`] if the native type is unmapped.
    pub fn element_type(&self) -> Result<ElementType, UnsupportedTypeError> {
        ElementType::from_native(self.native)
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Return the number of elements.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Return the transfer options.
    #[must_use]
    pub const fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Set the transfer options.
    pub fn set_options(&mut self, options: TransferOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Set the transfer options.
    #[must_use]
    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Variable<TStorage> {
    /// Read the elements addressed by `pattern` into a new buffer.
    ///
    /// # Errors
    /// See [`read_opt`](crate::read_opt).
    pub fn retrieve(&self, pattern: &AccessPattern) -> Result<Buffer, TransferError> {
        read_opt(&*self.storage, self.id, pattern, &self.options)
    }

    /// Read the elements addressed by `pattern` into `buffer`.
    ///
    /// # Errors
    /// See [`read_into_opt`](crate::read_into_opt).
    pub fn retrieve_into(
        &self,
        pattern: &AccessPattern,
        buffer: &mut Buffer,
    ) -> Result<(), TransferError> {
        read_into_opt(&*self.storage, self.id, pattern, buffer, &self.options)
    }

    /// Read the element at `index`.
    ///
    /// # Errors
    /// See [`read_opt`](crate::read_opt).
    pub fn retrieve_point(&self, index: impl Into<Vec<u64>>) -> Result<Buffer, TransferError> {
        self.retrieve(&AccessPattern::point(index))
    }

    /// Read every element.
    ///
    /// # Errors
    /// See [`read_opt`](crate::read_opt).
    pub fn retrieve_whole(&self) -> Result<Buffer, TransferError> {
        self.retrieve(&AccessPattern::Whole)
    }

    /// Read the hyper-rectangle at `start` with `count` elements on each axis.
    ///
    /// # Errors
    /// See [`read_opt`](crate::read_opt).
    pub fn retrieve_slab(
        &self,
        start: impl Into<Vec<u64>>,
        count: impl Into<Vec<u64>>,
    ) -> Result<Buffer, TransferError> {
        self.retrieve(&AccessPattern::slab(start, count))
    }

    /// Read the hyper-rectangle at `start` with `count` elements on each axis sampled every `stride` elements.
    ///
    /// # Errors
    /// See [`read_opt`](crate::read_opt).
    pub fn retrieve_strided_slab(
        &self,
        start: impl Into<Vec<u64>>,
        count: impl Into<Vec<u64>>,
        stride: impl Into<Vec<i64>>,
    ) -> Result<Buffer, TransferError> {
        self.retrieve(&AccessPattern::strided_slab(start, count, stride))
    }

    /// Read a strided hyper-rectangle into a new buffer laid out by `imap`.
    ///
    /// The new buffer holds exactly the addressed elements, so `imap` must address each of its offsets once (e.g. a transposed layout).
    ///
    /// # Errors
    /// See [`read_opt`](crate::read_opt).
    pub fn retrieve_mapped_slab(
        &self,
        start: impl Into<Vec<u64>>,
        count: impl Into<Vec<u64>>,
        stride: impl Into<Vec<i64>>,
        imap: impl Into<Vec<i64>>,
    ) -> Result<Buffer, TransferError> {
        self.retrieve(&AccessPattern::mapped_slab(start, count, stride, imap))
    }

    /// Read the elements addressed by `pattern` as a value.
    ///
    /// # Errors
    /// See [`read_value_opt`](crate::read_value_opt).
    pub fn retrieve_value(&self, pattern: &AccessPattern) -> Result<Value, TransferError> {
        read_value_opt(&*self.storage, self.id, pattern, &self.options)
    }

    /// Read the characters addressed by `pattern`.
    ///
    /// # Errors
    /// See [`read_text_opt`](crate::read_text_opt).
    pub fn retrieve_text(&self, pattern: &AccessPattern) -> Result<Vec<u8>, TransferError> {
        read_text_opt(&*self.storage, self.id, pattern, &self.options)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> Variable<TStorage> {
    /// Write `buffer` to the elements addressed by `pattern`.
    ///
    /// # Errors
    /// See [`write_opt`](crate::write_opt).
    pub fn store(&self, pattern: &AccessPattern, buffer: &Buffer) -> Result<(), TransferError> {
        write_opt(&*self.storage, self.id, pattern, buffer, &self.options)
    }

    /// Write the first element of `buffer` at `index`.
    ///
    /// # Errors
    /// See [`write_opt`](crate::write_opt).
    pub fn store_point(
        &self,
        index: impl Into<Vec<u64>>,
        buffer: &Buffer,
    ) -> Result<(), TransferError> {
        self.store(&AccessPattern::point(index), buffer)
    }

    /// Write every element.
    ///
    /// # Errors
    /// See [`write_opt`](crate::write_opt).
    pub fn store_whole(&self, buffer: &Buffer) -> Result<(), TransferError> {
        self.store(&AccessPattern::Whole, buffer)
    }

    /// Write the hyper-rectangle at `start` with `count` elements on each axis.
    ///
    /// # Errors
    /// See [`write_opt`](crate::write_opt).
    pub fn store_slab(
        &self,
        start: impl Into<Vec<u64>>,
        count: impl Into<Vec<u64>>,
        buffer: &Buffer,
    ) -> Result<(), TransferError> {
        self.store(&AccessPattern::slab(start, count), buffer)
    }

    /// Write the hyper-rectangle at `start` with `count` elements on each axis sampled every `stride` elements.
    ///
    /// # Errors
    /// See [`write_opt`](crate::write_opt).
    pub fn store_strided_slab(
        &self,
        start: impl Into<Vec<u64>>,
        count: impl Into<Vec<u64>>,
        stride: impl Into<Vec<i64>>,
        buffer: &Buffer,
    ) -> Result<(), TransferError> {
        self.store(&AccessPattern::strided_slab(start, count, stride), buffer)
    }

    /// Write a strided hyper-rectangle from `buffer` laid out by `imap`.
    ///
    /// # Errors
    /// See [`write_opt`](crate::write_opt).
    pub fn store_mapped_slab(
        &self,
        start: impl Into<Vec<u64>>,
        count: impl Into<Vec<u64>>,
        stride: impl Into<Vec<i64>>,
        imap: impl Into<Vec<i64>>,
        buffer: &Buffer,
    ) -> Result<(), TransferError> {
        self.store(
            &AccessPattern::mapped_slab(start, count, stride, imap),
            buffer,
        )
    }

    /// Write `text` to the characters addressed by `pattern`.
    ///
    /// # Errors
    /// See [`write_text_opt`](crate::write_text_opt).
    pub fn store_text(&self, pattern: &AccessPattern, text: &[u8]) -> Result<(), TransferError> {
        write_text_opt(&*self.storage, self.id, pattern, text, &self.options)
    }
}

impl<TStorage: ?Sized + AttributeStorageTraits> Variable<TStorage> {
    /// Read the attribute `name` of the variable.
    ///
    /// # Errors
    /// See [`get_attribute`](crate::get_attribute).
    pub fn attribute(&self, name: &str) -> Result<Option<Value>, TransferError> {
        get_attribute(&*self.storage, AttributeTarget::Variable(self.id), name)
    }

    /// Create or replace the attribute `name` of the variable.
    ///
    /// # Errors
    /// See [`put_attribute`](crate::put_attribute).
    pub fn set_attribute(&self, name: &str, value: &Value) -> Result<(), TransferError> {
        put_attribute(
            &*self.storage,
            AttributeTarget::Variable(self.id),
            name,
            value,
        )
    }
}
