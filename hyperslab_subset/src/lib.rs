//! The access pattern API for the [`hyperslab`](https://docs.rs/hyperslab/latest/hyperslab/index.html) crate.
//!
//! An [`AccessPattern`] names the elements of a variable that a transfer touches.
//! Once the shape of the variable is known, every pattern normalises to a [`StridedSubset`] with a start, count, stride and memory map (imap) per axis.
//! [`StridedSubset::strided_indices`] validates a subset against the variable shape and a buffer length, and iterates over `(store index, buffer offset)` pairs.
//!
//! ## Licence
//! `hyperslab_subset` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod access_pattern;
pub mod iterators;
mod strided_subset;

pub use access_pattern::{AccessPattern, AccessPatternKind};
pub use hyperslab_data_type::ArrayShape;
pub use strided_subset::{ShapeError, StridedSubset};

/// An ND index to an element in a variable.
pub type ArrayIndices = Vec<u64>;

/// An ND index to an element in a variable.
/// Uses [`TinyVec`](tinyvec::TinyVec) for stack allocation up to 4 dimensions.
pub type ArrayIndicesTinyVec = tinyvec::TinyVec<[u64; 4]>;

/// An incompatible dimensionality error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("incompatible dimensionality {0}, expected {1}")]
pub struct IncompatibleDimensionalityError(usize, usize);

impl IncompatibleDimensionalityError {
    /// Create a new incompatible dimensionality error.
    #[must_use]
    pub const fn new(got: usize, expected: usize) -> Self {
        Self(got, expected)
    }

    /// Return the dimensionality that was supplied.
    #[must_use]
    pub const fn got(&self) -> usize {
        self.0
    }

    /// Return the dimensionality that was expected.
    #[must_use]
    pub const fn expected(&self) -> usize {
        self.1
    }
}

/// Return the memory map of a row-major buffer with shape `count`.
///
/// The last axis has a map of 1, and every other axis steps over the elements of the axes after it.
#[must_use]
pub fn natural_imap(count: &[u64]) -> Vec<i64> {
    let mut imap = vec![1i64; count.len()];
    for axis in (0..count.len().saturating_sub(1)).rev() {
        let next = i64::try_from(count[axis + 1]).unwrap_or(i64::MAX);
        imap[axis] = imap[axis + 1].saturating_mul(next);
    }
    imap
}

/// Unravel a linearised index to ND indices.
///
/// Returns [`None`] if `index` is out-of-bounds of `shape`.
#[must_use]
pub fn unravel_index(mut index: u64, shape: &[u64]) -> Option<ArrayIndicesTinyVec> {
    let total_size: u64 = shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))?;
    if index >= total_size {
        return None;
    }

    match shape.len() {
        0 => Some(ArrayIndicesTinyVec::new()),
        1 => Some(tinyvec::tiny_vec!([u64; 4] => index)),
        2 => {
            let i1 = index % shape[1];
            index /= shape[1];
            Some(tinyvec::tiny_vec!([u64; 4] => index, i1))
        }
        len => {
            let mut indices = ArrayIndicesTinyVec::with_capacity(len);
            indices.resize(len, 0);
            for axis in (0..len).rev() {
                indices[axis] = index % shape[axis];
                index /= shape[axis];
            }
            Some(indices)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_imap_row_major() {
        assert_eq!(natural_imap(&[]), Vec::<i64>::new());
        assert_eq!(natural_imap(&[7]), vec![1]);
        assert_eq!(natural_imap(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(natural_imap(&[5, 0, 4]), vec![0, 4, 1]);
    }

    #[test]
    fn unravel() {
        let shape = [4, 3, 2];
        assert_eq!(
            unravel_index(11, &shape),
            Some(tinyvec::tiny_vec!([u64; 4] => 1, 2, 1))
        );
        assert_eq!(unravel_index(24, &shape), None);
        assert_eq!(
            unravel_index(5, &[10]),
            Some(tinyvec::tiny_vec!([u64; 4] => 5))
        );
        assert_eq!(
            unravel_index(7, &[3, 4]),
            Some(tinyvec::tiny_vec!([u64; 4] => 1, 3))
        );
        assert_eq!(unravel_index(0, &[]), Some(ArrayIndicesTinyVec::new()));
        let shape5 = [2, 2, 2, 2, 3];
        let indices = unravel_index(47, &shape5).unwrap();
        assert_eq!(indices.as_slice(), &[1, 1, 1, 1, 2]);
    }

    #[test]
    fn incompatible_dimensionality() {
        let err = IncompatibleDimensionalityError::new(1, 2);
        assert_eq!(err.got(), 1);
        assert_eq!(err.expected(), 2);
        assert_eq!(err.to_string(), "incompatible dimensionality 1, expected 2");
    }
}
