#![allow(missing_docs)]

use std::error::Error;
use std::sync::Arc;

use parking_lot::Mutex;

use hyperslab_storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter;
use hyperslab_storage::storage_adapter::usage_log::UsageLogStorageAdapter;
use hyperslab_storage::store::MemoryStore;
use hyperslab_storage::{NativeType, ReadableWritableStorage, VariableId};

fn memory_store() -> Result<(Arc<MemoryStore>, VariableId), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let y = store.define_dimension("y", 4)?;
    let x = store.define_dimension("x", 3)?;
    let variable = store.define_variable("test", NativeType::Int, &[y, x])?;
    Ok((store, variable))
}

#[test]
fn layered_adapters() -> Result<(), Box<dyn Error>> {
    let (store, variable) = memory_store()?;
    let log_writer = Arc::new(Mutex::new(Vec::<u8>::new()));
    let store = Arc::new(UsageLogStorageAdapter::new(
        store,
        log_writer.clone(),
        String::new,
    ));
    let store = Arc::new(PerformanceMetricsStorageAdapter::new(store));
    hyperslab_storage::store_test::store_write(&store, variable)?;
    hyperslab_storage::store_test::store_read(&store, variable)?;
    hyperslab_storage::store_test::store_errors(&store, variable)?;
    hyperslab_storage::store_test::store_attributes(&store, variable)?;

    let logged_calls = log_writer.lock().iter().filter(|&&byte| byte == b'\n').count();
    assert_eq!(logged_calls, store.total_calls());
    Ok(())
}

#[test]
fn dyn_storage() -> Result<(), Box<dyn Error>> {
    let (store, variable) = memory_store()?;
    let storage: ReadableWritableStorage = Arc::new(PerformanceMetricsStorageAdapter::new(store));
    hyperslab_storage::store_test::store_write(&storage, variable)?;
    hyperslab_storage::store_test::store_read(&storage, variable)?;
    Ok(())
}
