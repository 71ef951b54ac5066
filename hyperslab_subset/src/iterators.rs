//! Strided subset iterators.
//!
//! [`StridedIndices`] iterates over the elements of a [`StridedSubset`](crate::StridedSubset) in row-major order of the subset count.
//! Each item is a `(store index, buffer offset)` pair, where the store index is linearised in row-major order of the variable shape and the buffer offset follows the memory map.
//! Create one with [`StridedSubset::strided_indices`](crate::StridedSubset::strided_indices).
//!
//! [`StridedIndices`] supports [`iter()`](StridedIndices::iter) and [`into_iter()`](IntoIterator::into_iter) ([`IntoIterator`]).

mod strided_indices_iterator;

pub use strided_indices_iterator::{
    StridedIndices, StridedIndicesIntoIterator, StridedIndicesIterator,
};
