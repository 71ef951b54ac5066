//! A storage adapter which records performance metrics.

use crate::{
    ArrayShape, AttributeStorageTraits, AttributeTarget, DimensionId, ElementType, NativeType,
    ReadableStorageTraits, StorageError, StoreMetadataTraits, VariableId, WritableStorageTraits,
};

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// The performance metrics storage adapter. Accumulates metrics, such as bytes read and written.
///
/// It is intended to aid in testing by allowing the application to validate that metrics (e.g., bytes read/written, total store calls) match expected values for specific operations.
/// Every call on the adapter counts once, even if the wrapped store implements it by delegating to another primitive.
///
/// ### Example
/// ```rust
/// # use std::sync::Arc;
/// # use hyperslab_storage::store::MemoryStore;
/// # use hyperslab_storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter;
/// let store = Arc::new(MemoryStore::new());
/// let store = Arc::new(PerformanceMetricsStorageAdapter::new(store));
/// // do some store operations...
/// // assert_eq!(store.bytes_read(), ...);
/// // assert_eq!(store.reads(), ...);
/// assert_eq!(store.total_calls(), 0);
/// ```
#[derive(Debug)]
pub struct PerformanceMetricsStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    bytes_read: AtomicUsize,
    bytes_written: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    metadata_queries: AtomicUsize,
    attribute_reads: AtomicUsize,
    attribute_writes: AtomicUsize,
}

impl<TStorage: ?Sized> PerformanceMetricsStorageAdapter<TStorage> {
    /// Create a new performance metrics storage adapter.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self {
            storage,
            bytes_read: AtomicUsize::default(),
            bytes_written: AtomicUsize::default(),
            reads: AtomicUsize::default(),
            writes: AtomicUsize::default(),
            metadata_queries: AtomicUsize::default(),
            attribute_reads: AtomicUsize::default(),
            attribute_writes: AtomicUsize::default(),
        }
    }

    /// Reset the performance metrics.
    pub fn reset(&self) {
        self.bytes_read.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.metadata_queries.store(0, Ordering::Relaxed);
        self.attribute_reads.store(0, Ordering::Relaxed);
        self.attribute_writes.store(0, Ordering::Relaxed);
    }

    /// Returns the number of bytes read into caller buffers by successful reads.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read.load(Ordering::Relaxed)
    }

    /// Returns the number of bytes written from caller buffers by successful writes.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Returns the number of variable read requests.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of variable write requests.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the number of metadata requests (rank, native type, dimensions and shape).
    pub fn metadata_queries(&self) -> usize {
        self.metadata_queries.load(Ordering::Relaxed)
    }

    /// Returns the number of attribute read requests, including attribute info requests.
    pub fn attribute_reads(&self) -> usize {
        self.attribute_reads.load(Ordering::Relaxed)
    }

    /// Returns the number of attribute write requests.
    pub fn attribute_writes(&self) -> usize {
        self.attribute_writes.load(Ordering::Relaxed)
    }

    /// Returns the total number of requests of any kind.
    pub fn total_calls(&self) -> usize {
        self.reads()
            + self.writes()
            + self.metadata_queries()
            + self.attribute_reads()
            + self.attribute_writes()
    }

    fn record_read(&self, result: &Result<(), StorageError>, len: usize) {
        if result.is_ok() {
            self.bytes_read.fetch_add(len, Ordering::Relaxed);
        }
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn record_write(&self, result: &Result<(), StorageError>, len: usize) {
        if result.is_ok() {
            self.bytes_written.fetch_add(len, Ordering::Relaxed);
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_metadata(&self) {
        self.metadata_queries.fetch_add(1, Ordering::Relaxed);
    }
}

impl<TStorage: ?Sized + StoreMetadataTraits> StoreMetadataTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn rank(&self, variable: VariableId) -> Result<usize, StorageError> {
        self.record_metadata();
        self.storage.rank(variable)
    }

    fn native_type(&self, variable: VariableId) -> Result<NativeType, StorageError> {
        self.record_metadata();
        self.storage.native_type(variable)
    }

    fn dimension_ids(&self, variable: VariableId) -> Result<Vec<DimensionId>, StorageError> {
        self.record_metadata();
        self.storage.dimension_ids(variable)
    }

    fn dimension_length(&self, dimension: DimensionId) -> Result<u64, StorageError> {
        self.record_metadata();
        self.storage.dimension_length(dimension)
    }

    fn shape(&self, variable: VariableId) -> Result<ArrayShape, StorageError> {
        self.record_metadata();
        self.storage.shape(variable)
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn get_var1(
        &self,
        variable: VariableId,
        index: &[u64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.get_var1(variable, index, element_type, bytes);
        self.record_read(&result, bytes.len());
        result
    }

    fn get_var(
        &self,
        variable: VariableId,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.get_var(variable, element_type, bytes);
        self.record_read(&result, bytes.len());
        result
    }

    fn get_vara(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .get_vara(variable, start, count, element_type, bytes);
        self.record_read(&result, bytes.len());
        result
    }

    fn get_vars(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .get_vars(variable, start, count, stride, element_type, bytes);
        self.record_read(&result, bytes.len());
        result
    }

    fn get_varm(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .get_varm(variable, start, count, stride, imap, element_type, bytes);
        self.record_read(&result, bytes.len());
        result
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn put_var1(
        &self,
        variable: VariableId,
        index: &[u64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.put_var1(variable, index, element_type, bytes);
        self.record_write(&result, bytes.len());
        result
    }

    fn put_var(
        &self,
        variable: VariableId,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.put_var(variable, element_type, bytes);
        self.record_write(&result, bytes.len());
        result
    }

    fn put_vara(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .put_vara(variable, start, count, element_type, bytes);
        self.record_write(&result, bytes.len());
        result
    }

    fn put_vars(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .put_vars(variable, start, count, stride, element_type, bytes);
        self.record_write(&result, bytes.len());
        result
    }

    fn put_varm(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .put_varm(variable, start, count, stride, imap, element_type, bytes);
        self.record_write(&result, bytes.len());
        result
    }
}

impl<TStorage: ?Sized + AttributeStorageTraits> AttributeStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn attribute_info(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<(NativeType, u64)>, StorageError> {
        self.attribute_reads.fetch_add(1, Ordering::Relaxed);
        self.storage.attribute_info(target, name)
    }

    fn get_att(
        &self,
        target: AttributeTarget,
        name: &str,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.get_att(target, name, element_type, bytes);
        if result.is_ok() {
            self.bytes_read.fetch_add(bytes.len(), Ordering::Relaxed);
        }
        self.attribute_reads.fetch_add(1, Ordering::Relaxed);
        result
    }

    fn put_att(
        &self,
        target: AttributeTarget,
        name: &str,
        native: NativeType,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let result = self
            .storage
            .put_att(target, name, native, element_type, bytes);
        if result.is_ok() {
            self.bytes_written.fetch_add(bytes.len(), Ordering::Relaxed);
        }
        self.attribute_writes.fetch_add(1, Ordering::Relaxed);
        result
    }
}
