//! A storage adapter which logs store calls.

use std::{fmt::Debug, io::Write, sync::Arc};

use parking_lot::Mutex;

use crate::{
    ArrayShape, AttributeStorageTraits, AttributeTarget, DimensionId, ElementType, NativeType,
    ReadableStorageTraits, StorageError, StoreMetadataTraits, VariableId, WritableStorageTraits,
};

/// The usage log storage adapter. Logs store calls to a writer.
///
/// Each call is written as one line holding the output of the prefix function, the call and its result.
/// A failure to write the log is reported with [`log::warn!`] and does not change the result of the call.
///
/// ### Example
/// ```rust
/// # use std::sync::Arc;
/// # use parking_lot::Mutex;
/// # use hyperslab_storage::store::MemoryStore;
/// # use hyperslab_storage::storage_adapter::usage_log::UsageLogStorageAdapter;
/// let store = Arc::new(MemoryStore::new());
/// let log_writer = Arc::new(Mutex::new(std::io::stdout()));
/// let store = Arc::new(UsageLogStorageAdapter::new(store, log_writer, || "[store] ".to_string()));
/// ```
pub struct UsageLogStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    handle: Arc<Mutex<dyn Write + Send>>,
    prefix_func: fn() -> String,
}

impl<TStorage: ?Sized> Debug for UsageLogStorageAdapter<TStorage> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageLogStorageAdapter").finish_non_exhaustive()
    }
}

impl<TStorage: ?Sized> UsageLogStorageAdapter<TStorage> {
    /// Create a new usage log storage adapter.
    #[must_use]
    pub fn new(
        storage: Arc<TStorage>,
        handle: Arc<Mutex<dyn Write + Send>>,
        prefix_func: fn() -> String,
    ) -> Self {
        Self {
            storage,
            handle,
            prefix_func,
        }
    }

    fn log<T: Debug>(
        &self,
        call: std::fmt::Arguments<'_>,
        result: Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        if let Err(err) = writeln!(
            self.handle.lock(),
            "{}{call} -> {result:?}",
            (self.prefix_func)()
        ) {
            log::warn!("usage log write failed: {err}");
        }
        result
    }
}

impl<TStorage: ?Sized + StoreMetadataTraits> StoreMetadataTraits
    for UsageLogStorageAdapter<TStorage>
{
    fn rank(&self, variable: VariableId) -> Result<usize, StorageError> {
        self.log(format_args!("rank({variable})"), self.storage.rank(variable))
    }

    fn native_type(&self, variable: VariableId) -> Result<NativeType, StorageError> {
        self.log(
            format_args!("native_type({variable})"),
            self.storage.native_type(variable),
        )
    }

    fn dimension_ids(&self, variable: VariableId) -> Result<Vec<DimensionId>, StorageError> {
        self.log(
            format_args!("dimension_ids({variable})"),
            self.storage.dimension_ids(variable),
        )
    }

    fn dimension_length(&self, dimension: DimensionId) -> Result<u64, StorageError> {
        self.log(
            format_args!("dimension_length({dimension})"),
            self.storage.dimension_length(dimension),
        )
    }

    fn shape(&self, variable: VariableId) -> Result<ArrayShape, StorageError> {
        self.log(format_args!("shape({variable})"), self.storage.shape(variable))
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for UsageLogStorageAdapter<TStorage>
{
    fn get_var1(
        &self,
        variable: VariableId,
        index: &[u64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.get_var1(variable, index, element_type, bytes);
        self.log(
            format_args!("get_var1({variable}, {index:?}, {element_type}, len={})", bytes.len()),
            result,
        )
    }

    fn get_var(
        &self,
        variable: VariableId,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.get_var(variable, element_type, bytes);
        self.log(
            format_args!("get_var({variable}, {element_type}, len={})", bytes.len()),
            result,
        )
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
        self.log(
            format_args!(
                "get_vara({variable}, {start:?}, {count:?}, {element_type}, len={})",
                bytes.len()
            ),
            result,
        )
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
        self.log(
            format_args!(
                "get_vars({variable}, {start:?}, {count:?}, {stride:?}, {element_type}, len={})",
                bytes.len()
            ),
            result,
        )
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
        self.log(
            format_args!(
                "get_varm({variable}, {start:?}, {count:?}, {stride:?}, {imap:?}, {element_type}, len={})",
                bytes.len()
            ),
            result,
        )
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for UsageLogStorageAdapter<TStorage>
{
    fn put_var1(
        &self,
        variable: VariableId,
        index: &[u64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        self.log(
            format_args!("put_var1({variable}, {index:?}, {element_type}, len={})", bytes.len()),
            self.storage.put_var1(variable, index, element_type, bytes),
        )
    }

    fn put_var(
        &self,
        variable: VariableId,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        self.log(
            format_args!("put_var({variable}, {element_type}, len={})", bytes.len()),
            self.storage.put_var(variable, element_type, bytes),
        )
    }

    fn put_vara(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        self.log(
            format_args!(
                "put_vara({variable}, {start:?}, {count:?}, {element_type}, len={})",
                bytes.len()
            ),
            self.storage
                .put_vara(variable, start, count, element_type, bytes),
        )
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
        self.log(
            format_args!(
                "put_vars({variable}, {start:?}, {count:?}, {stride:?}, {element_type}, len={})",
                bytes.len()
            ),
            self.storage
                .put_vars(variable, start, count, stride, element_type, bytes),
        )
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
        self.log(
            format_args!(
                "put_varm({variable}, {start:?}, {count:?}, {stride:?}, {imap:?}, {element_type}, len={})",
                bytes.len()
            ),
            self.storage
                .put_varm(variable, start, count, stride, imap, element_type, bytes),
        )
    }
}

impl<TStorage: ?Sized + AttributeStorageTraits> AttributeStorageTraits
    for UsageLogStorageAdapter<TStorage>
{
    fn attribute_info(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<(NativeType, u64)>, StorageError> {
        self.log(
            format_args!("attribute_info({target}, {name})"),
            self.storage.attribute_info(target, name),
        )
    }

    fn get_att(
        &self,
        target: AttributeTarget,
        name: &str,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let result = self.storage.get_att(target, name, element_type, bytes);
        self.log(
            format_args!("get_att({target}, {name}, {element_type}, len={})", bytes.len()),
            result,
        )
    }

    fn put_att(
        &self,
        target: AttributeTarget,
        name: &str,
        native: NativeType,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        self.log(
            format_args!(
                "put_att({target}, {name}, {native}, {element_type}, len={})",
                bytes.len()
            ),
            self.storage
                .put_att(target, name, native, element_type, bytes),
        )
    }
}
