use thiserror::Error;

use crate::{
    storage::StorageError, IncompatibleDimensionalityError, ShapeError, UnsupportedTypeError,
};

/// A transfer error.
///
/// [`TransferError::Shape`] and [`TransferError::UnsupportedType`] are detected before the store is called, so a transfer failing with either has no side effects.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The access pattern or buffer does not match the variable.
    #[error(transparent)]
    Shape(#[from] ShapeError),
    /// The element type cannot be transferred to or from the variable.
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),
    /// The store reported a failure.
    #[error("{message} (status {status})")]
    Backend {
        /// The native status code.
        status: i32,
        /// The message of the store.
        message: String,
    },
    /// The store, variable or dimension does not resolve.
    #[error("{0}")]
    NotOpen(String),
    /// A write was requested without a buffer.
    #[error("a write requires a buffer")]
    MissingBuffer,
}

impl TransferError {
    /// Return the native status code of a [`TransferError::Backend`] error.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        if let Self::Backend { status, .. } = self {
            Some(*status)
        } else {
            None
        }
    }
}

impl From<IncompatibleDimensionalityError> for TransferError {
    fn from(err: IncompatibleDimensionalityError) -> Self {
        Self::Shape(err.into())
    }
}

impl From<StorageError> for TransferError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotOpen
            | StorageError::InvalidVariable(_)
            | StorageError::InvalidDimension(_) => Self::NotOpen(err.to_string()),
            StorageError::Status { status, message } => Self::Backend { status, message },
            StorageError::ReadOnly | StorageError::Other(_) => Self::Backend {
                status: err.status(),
                message: err.to_string(),
            },
        }
    }
}

/// Convert a store error for a store call, logging it.
pub(crate) fn backend_error(err: StorageError) -> TransferError {
    log::warn!("store call failed: {err}");
    err.into()
}
