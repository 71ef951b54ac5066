//! The storage API for the [`hyperslab`](https://docs.rs/hyperslab/latest/hyperslab/index.html) crate.
//!
//! A store holds dimensions, variables and attributes.
//! The storage API has two halves:
//!  - [`StoreMetadataTraits`]: the rank, native type, dimensions and shape of a variable, and
//!  - the strided I/O primitives of [`ReadableStorageTraits`] and [`WritableStorageTraits`], and attribute I/O with [`AttributeStorageTraits`].
//!
//! Every I/O primitive takes the [`ElementType`] of the caller's memory, and the store converts to and from the native type of the variable.
//! Failures carry the native status code of the store, see [`status`].
//!
//! This crate includes an in-memory store ([`store::MemoryStore`]) and [`storage_adapter`]s which record metrics or log usage.
//!
//! ## Licence
//! `hyperslab_storage` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.

pub mod status;
pub mod storage_adapter;
mod storage_sync;
pub mod store;

#[cfg(any(test, feature = "tests"))]
/// Store test utilities (for external store development).
pub mod store_test;

use std::sync::Arc;

use derive_more::{Display, From};
use thiserror::Error;

pub use hyperslab_data_type::{ArrayShape, ElementType, NativeType};

pub use self::storage_sync::{
    AttributeStorageTraits, ReadableStorageTraits, ReadableWritableStorageTraits,
    StoreMetadataTraits, WritableStorageTraits,
};

/// [`Arc`] wrapped readable storage.
pub type ReadableStorage = Arc<dyn ReadableStorageTraits>;

/// [`Arc`] wrapped writable storage.
pub type WritableStorage = Arc<dyn WritableStorageTraits>;

/// [`Arc`] wrapped readable and writable storage.
pub type ReadableWritableStorage = Arc<dyn ReadableWritableStorageTraits>;

/// [`Arc`] wrapped attribute storage.
pub type AttributeStorage = Arc<dyn AttributeStorageTraits>;

/// The identifier of a variable in a store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display("{_0}")]
pub struct VariableId(pub usize);

/// The identifier of a dimension in a store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display("{_0}")]
pub struct DimensionId(pub usize);

/// The owner of an attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum AttributeTarget {
    /// An attribute of the store.
    #[display("global")]
    Global,
    /// An attribute of a variable.
    #[display("variable {_0}")]
    Variable(VariableId),
}

impl From<VariableId> for AttributeTarget {
    fn from(variable: VariableId) -> Self {
        Self::Variable(variable)
    }
}

/// A storage error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The store is not open.
    #[error("the store is not open")]
    NotOpen,
    /// The variable does not exist.
    #[error("variable {0} does not exist")]
    InvalidVariable(VariableId),
    /// The dimension does not exist.
    #[error("dimension {0} does not exist")]
    InvalidDimension(DimensionId),
    /// A failure reported by the store with its native status code.
    #[error("{message} (status {status})")]
    Status {
        /// The native status code.
        status: i32,
        /// The message of the store for `status`.
        message: String,
    },
    /// A write operation was attempted on a read only store.
    #[error("a write operation was attempted on a read only store")]
    ReadOnly,
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    /// Create a [`StorageError::Status`] with the message for `status`.
    #[must_use]
    pub fn from_status(status: i32) -> Self {
        Self::Status {
            status,
            message: status::message(status).to_string(),
        }
    }

    /// Return the native status code of the error.
    #[must_use]
    pub fn status(&self) -> i32 {
        match self {
            Self::NotOpen => status::BAD_ID,
            Self::InvalidVariable(_) => status::NOT_VARIABLE,
            Self::InvalidDimension(_) => status::BAD_DIMENSION,
            Self::Status { status, .. } => *status,
            Self::ReadOnly => status::PERMISSION,
            Self::Other(_) => status::INVALID_ARGUMENT,
        }
    }
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}
