use auto_impl::auto_impl;
use hyperslab_subset::natural_imap;

use crate::{
    ArrayShape, AttributeTarget, DimensionId, ElementType, NativeType, StorageError, VariableId,
};

/// Store metadata traits.
///
/// Metadata lookups on a closed store fail with [`StorageError::NotOpen`], and lookups of unknown variables with [`StorageError::InvalidVariable`].
#[auto_impl(&, Arc)]
pub trait StoreMetadataTraits: Send + Sync {
    /// Return the number of dimensions of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `variable` does not resolve.
    fn rank(&self, variable: VariableId) -> Result<usize, StorageError> {
        Ok(self.dimension_ids(variable)?.len())
    }

    /// Return the native type of the elements of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `variable` does not resolve.
    fn native_type(&self, variable: VariableId) -> Result<NativeType, StorageError>;

    /// Return the dimensions of `variable`, slowest varying first.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `variable` does not resolve.
    fn dimension_ids(&self, variable: VariableId) -> Result<Vec<DimensionId>, StorageError>;

    /// Return the length of `dimension`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `dimension` does not resolve.
    fn dimension_length(&self, dimension: DimensionId) -> Result<u64, StorageError>;

    /// Return the shape of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `variable` or any of its dimensions do not resolve.
    fn shape(&self, variable: VariableId) -> Result<ArrayShape, StorageError> {
        self.dimension_ids(variable)?
            .into_iter()
            .map(|dimension| self.dimension_length(dimension))
            .collect()
    }
}

/// Readable storage traits.
///
/// Each primitive reads elements of `variable` into `bytes`, which holds elements of `element_type` in host byte order.
/// The store converts from the native type of `variable` and reports values that are not representable in `element_type` with the native range status, after transferring the rest.
///
/// Only [`get_varm`](ReadableStorageTraits::get_varm) must be implemented.
/// The other primitives delegate `get_var1` to `get_vara`, `get_var` to `get_vara`, `get_vara` to `get_vars`, and `get_vars` to `get_varm`.
#[auto_impl(&, Arc)]
pub trait ReadableStorageTraits: StoreMetadataTraits {
    /// Read the element at `index`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not resolve, `index` is out of bounds, or the element cannot be converted.
    fn get_var1(
        &self,
        variable: VariableId,
        index: &[u64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let count = vec![1; index.len()];
        self.get_vara(variable, index, &count, element_type, bytes)
    }

    /// Read every element.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not resolve, `bytes` is too small, or an element cannot be converted.
    fn get_var(
        &self,
        variable: VariableId,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let shape = self.shape(variable)?;
        let start = vec![0; shape.len()];
        self.get_vara(variable, &start, &shape, element_type, bytes)
    }

    /// Read the hyper-rectangle at `start` with `count` elements on each axis.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not resolve, the hyper-rectangle is out of bounds, `bytes` is too small, or an element cannot be converted.
    fn get_vara(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let stride = vec![1; start.len()];
        self.get_vars(variable, start, count, &stride, element_type, bytes)
    }

    /// Read the hyper-rectangle at `start` with `count` elements on each axis sampled every `stride` elements.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not resolve, a stride is zero, the hyper-rectangle is out of bounds, `bytes` is too small, or an element cannot be converted.
    fn get_vars(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let imap = natural_imap(count);
        self.get_varm(variable, start, count, stride, &imap, element_type, bytes)
    }

    /// Read a strided hyper-rectangle with the element at position `i` placed at element offset `sum(i * imap)` of `bytes`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not resolve, a stride is zero, the hyper-rectangle is out of bounds, `imap` addresses elements outside of `bytes`, or an element cannot be converted.
    #[allow(clippy::too_many_arguments)]
    fn get_varm(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError>;
}

/// Writable storage traits.
///
/// Each primitive writes elements of `element_type` in host byte order from `bytes` to `variable`.
/// The store converts to the native type of `variable` and reports values that are not representable with the native range status, after transferring the rest.
///
/// Only [`put_varm`](WritableStorageTraits::put_varm) must be implemented, the other primitives delegate as in [`ReadableStorageTraits`].
#[auto_impl(&, Arc)]
pub trait WritableStorageTraits: StoreMetadataTraits {
    /// Write the element at `index`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not resolve, `index` is out of bounds, or the element cannot be converted.
    fn put_var1(
        &self,
        variable: VariableId,
        index: &[u64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let count = vec![1; index.len()];
        self.put_vara(variable, index, &count, element_type, bytes)
    }

    /// Write every element.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not resolve, `bytes` is too small, or an element cannot be converted.
    fn put_var(
        &self,
        variable: VariableId,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let shape = self.shape(variable)?;
        let start = vec![0; shape.len()];
        self.put_vara(variable, &start, &shape, element_type, bytes)
    }

    /// Write the hyper-rectangle at `start` with `count` elements on each axis.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not resolve, the hyper-rectangle is out of bounds, `bytes` is too small, or an element cannot be converted.
    fn put_vara(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let stride = vec![1; start.len()];
        self.put_vars(variable, start, count, &stride, element_type, bytes)
    }

    /// Write the hyper-rectangle at `start` with `count` elements on each axis sampled every `stride` elements.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not resolve, a stride is zero, the hyper-rectangle is out of bounds, `bytes` is too small, or an element cannot be converted.
    fn put_vars(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let imap = natural_imap(count);
        self.put_varm(variable, start, count, stride, &imap, element_type, bytes)
    }

    /// Write a strided hyper-rectangle with the element at position `i` taken from element offset `sum(i * imap)` of `bytes`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not resolve, a stride is zero, the hyper-rectangle is out of bounds, `imap` addresses elements outside of `bytes`, or an element cannot be converted.
    #[allow(clippy::too_many_arguments)]
    fn put_varm(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError>;
}

/// A supertrait of [`ReadableStorageTraits`] and [`WritableStorageTraits`].
pub trait ReadableWritableStorageTraits: ReadableStorageTraits + WritableStorageTraits {}

impl<T> ReadableWritableStorageTraits for T where T: ReadableStorageTraits + WritableStorageTraits {}

/// Attribute storage traits.
#[auto_impl(&, Arc)]
pub trait AttributeStorageTraits: Send + Sync {
    /// Return the native type and number of elements of the attribute `name` of `target`.
    ///
    /// Returns [`None`] if the attribute does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `target` does not resolve.
    fn attribute_info(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<(NativeType, u64)>, StorageError>;

    /// Read every element of the attribute `name` of `target` into `bytes`, which holds elements of `element_type`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if `target` does not resolve, the attribute does not exist, `bytes` does not hold the attribute, or an element cannot be converted.
    fn get_att(
        &self,
        target: AttributeTarget,
        name: &str,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError>;

    /// Create or replace the attribute `name` of `target` with native type `native`, from `bytes` holding elements of `element_type`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, `target` does not resolve, or an element cannot be converted.
    fn put_att(
        &self,
        target: AttributeTarget,
        name: &str,
        native: NativeType,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError>;
}
