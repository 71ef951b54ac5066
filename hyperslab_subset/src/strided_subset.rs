use std::fmt::Display;

use itertools::izip;
use thiserror::Error;

use crate::iterators::StridedIndices;
use crate::{natural_imap, ArrayIndices, ArrayShape, IncompatibleDimensionalityError};

/// A shape error.
///
/// Shape errors are detected before any element is transferred.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A per-axis sequence does not match the dimensionality of the variable.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// A stride of zero.
    #[error("illegal stride 0 on axis {axis}")]
    IllegalStride {
        /// The axis.
        axis: usize,
    },
    /// A start index beyond the dimension length.
    #[error("index {index} on axis {axis} exceeds dimension length {length}")]
    IndexOutOfBounds {
        /// The axis.
        axis: usize,
        /// The index.
        index: u64,
        /// The dimension length.
        length: u64,
    },
    /// A start, count and stride reaching beyond the dimension.
    #[error("start {start} + count {count} with stride {stride} on axis {axis} exceeds dimension length {length}")]
    ExtentOutOfBounds {
        /// The axis.
        axis: usize,
        /// The start index.
        start: u64,
        /// The number of elements.
        count: u64,
        /// The stride.
        stride: i64,
        /// The dimension length.
        length: u64,
    },
    /// Memory map offsets outside of the buffer.
    #[error("memory map offsets {min}..={max} are outside a buffer of {len} elements")]
    MapOutOfBounds {
        /// The smallest offset.
        min: i128,
        /// The largest offset.
        max: i128,
        /// The number of elements in the buffer.
        len: u64,
    },
    /// A buffer holding the wrong number of elements.
    #[error("buffer holds {got} elements, expected {expected}")]
    ElementCount {
        /// The number of elements in the buffer.
        got: u64,
        /// The required number of elements.
        expected: u64,
    },
    /// A buffer too small to hold a single element.
    #[error("buffer holds {got} elements, expected at least {expected}")]
    ElementCountAtLeast {
        /// The number of elements in the buffer.
        got: u64,
        /// The minimum number of elements.
        expected: u64,
    },
    /// A subset with more elements than can be addressed.
    #[error("subset with count {0:?} has too many elements")]
    TooLarge(ArrayShape),
}

/// A strided subset of a variable.
///
/// Each axis has a start index, a count of elements, a stride between consecutive elements of the variable, and an imap between consecutive elements of the buffer.
/// The element at position `i` of the subset is the variable element at `start + i * stride`, held at buffer offset `sum(i * imap)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StridedSubset {
    pub(crate) start: ArrayIndices,
    pub(crate) count: ArrayShape,
    pub(crate) stride: Vec<i64>,
    pub(crate) imap: Vec<i64>,
}

impl Display for StridedSubset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "start {:?} count {:?} stride {:?} imap {:?}",
            self.start, self.count, self.stride, self.imap
        )
    }
}

impl StridedSubset {
    /// Create a new strided subset.
    ///
    /// # Errors
    /// Returns [`ShapeError::IncompatibleDimensionality`] if `count`, `stride` or `imap` differ in length from `start`.
    pub fn new(
        start: ArrayIndices,
        count: ArrayShape,
        stride: Vec<i64>,
        imap: Vec<i64>,
    ) -> Result<Self, ShapeError> {
        let dimensionality = start.len();
        for len in [count.len(), stride.len(), imap.len()] {
            if len != dimensionality {
                return Err(IncompatibleDimensionalityError::new(len, dimensionality).into());
            }
        }
        Ok(Self {
            start,
            count,
            stride,
            imap,
        })
    }

    /// Create a new strided subset with a stride of 1 and a row-major memory map.
    ///
    /// # Errors
    /// Returns [`ShapeError::IncompatibleDimensionality`] if `count` differs in length from `start`.
    pub fn new_with_start_count(
        start: ArrayIndices,
        count: ArrayShape,
    ) -> Result<Self, ShapeError> {
        let stride = vec![1; start.len()];
        let imap = natural_imap(&count);
        Self::new(start, count, stride, imap)
    }

    /// Create a new strided subset covering every element of a variable with `shape`.
    #[must_use]
    pub fn new_with_shape(shape: ArrayShape) -> Self {
        Self {
            start: vec![0; shape.len()],
            stride: vec![1; shape.len()],
            imap: natural_imap(&shape),
            count: shape,
        }
    }

    /// Create a new strided subset of the single element at `index`.
    #[must_use]
    pub fn new_point(index: ArrayIndices) -> Self {
        Self {
            count: vec![1; index.len()],
            stride: vec![1; index.len()],
            imap: vec![1; index.len()],
            start: index,
        }
    }

    /// Return the dimensionality of the subset.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// Return the start index on each axis.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// Return the number of elements on each axis.
    #[must_use]
    pub fn count(&self) -> &[u64] {
        &self.count
    }

    /// Return the stride on each axis.
    #[must_use]
    pub fn stride(&self) -> &[i64] {
        &self.stride
    }

    /// Return the memory map on each axis.
    #[must_use]
    pub fn imap(&self) -> &[i64] {
        &self.imap
    }

    /// Return the number of elements of the subset.
    ///
    /// Returns [`None`] if the number of elements overflows [`u64`].
    #[must_use]
    pub fn num_elements(&self) -> Option<u64> {
        self.count
            .iter()
            .try_fold(1u64, |acc, &count| acc.checked_mul(count))
    }

    /// Return the number of elements of the subset as a [`usize`].
    ///
    /// # Errors
    /// Returns [`ShapeError::TooLarge`] if the number of elements exceeds [`usize::MAX`].
    pub fn num_elements_usize(&self) -> Result<usize, ShapeError> {
        self.num_elements()
            .and_then(|num_elements| usize::try_from(num_elements).ok())
            .ok_or_else(|| ShapeError::TooLarge(self.count.clone()))
    }

    /// Returns true if the subset has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count.contains(&0)
    }

    /// Returns true if the memory map is the row-major map of `count`.
    #[must_use]
    pub fn has_natural_imap(&self) -> bool {
        self.imap == natural_imap(&self.count)
    }

    /// Check that the subset lies within a variable with `shape`.
    ///
    /// On each axis, the stride must be non-zero, `start` must be less than the dimension length (or equal to it if `count` is zero), and the last index `start + (count - 1) * stride` must lie within the dimension.
    ///
    /// # Errors
    /// Returns a [`ShapeError`] for the first axis that breaks these rules, or if the dimensionality of `shape` differs.
    pub fn validate_bounds(&self, shape: &[u64]) -> Result<(), ShapeError> {
        if shape.len() != self.dimensionality() {
            return Err(
                IncompatibleDimensionalityError::new(self.dimensionality(), shape.len()).into(),
            );
        }
        for (axis, (&start, &count, &stride, &length)) in
            izip!(&self.start, &self.count, &self.stride, shape).enumerate()
        {
            if stride == 0 {
                return Err(ShapeError::IllegalStride { axis });
            }
            if start > length || (start == length && count > 0) {
                return Err(ShapeError::IndexOutOfBounds {
                    axis,
                    index: start,
                    length,
                });
            }
            if count > 0 {
                let last = i128::from(start) + (i128::from(count) - 1) * i128::from(stride);
                if last < 0 || last >= i128::from(length) {
                    return Err(ShapeError::ExtentOutOfBounds {
                        axis,
                        start,
                        count,
                        stride,
                        length,
                    });
                }
            }
        }
        Ok(())
    }

    /// Return the smallest and largest buffer offsets addressed by the memory map.
    ///
    /// Returns [`None`] if the subset is empty.
    #[must_use]
    pub fn imap_extent(&self) -> Option<(i128, i128)> {
        if self.is_empty() {
            return None;
        }
        Some(std::iter::zip(&self.count, &self.imap).fold(
            (0i128, 0i128),
            |(min, max), (&count, &imap)| {
                let reach = (i128::from(count) - 1) * i128::from(imap);
                (min + reach.min(0), max + reach.max(0))
            },
        ))
    }

    /// Check that every buffer offset addressed by the memory map lies within a buffer of `len` elements.
    ///
    /// # Errors
    /// Returns [`ShapeError::MapOutOfBounds`] if an offset is negative or not less than `len`.
    pub fn validate_imap(&self, len: u64) -> Result<(), ShapeError> {
        match self.imap_extent() {
            Some((min, max)) if min < 0 || max >= i128::from(len) => {
                Err(ShapeError::MapOutOfBounds { min, max, len })
            }
            _ => Ok(()),
        }
    }

    /// Return an iterator over the `(store index, buffer offset)` pairs of the subset.
    ///
    /// Store indices are linearised in row-major order of `shape`, buffer offsets are in elements.
    ///
    /// # Errors
    /// Returns a [`ShapeError`] if the subset is not within `shape` (see [`validate_bounds`](Self::validate_bounds)) or addresses offsets outside a buffer of `buffer_len` elements (see [`validate_imap`](Self::validate_imap)).
    pub fn strided_indices(
        &self,
        shape: &[u64],
        buffer_len: u64,
    ) -> Result<StridedIndices, ShapeError> {
        self.validate_bounds(shape)?;
        self.validate_imap(buffer_len)?;
        StridedIndices::new(self.clone(), shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_subset_new() {
        assert!(StridedSubset::new(vec![0, 0], vec![1, 1], vec![1, 1], vec![1, 1]).is_ok());
        assert_eq!(
            StridedSubset::new(vec![0, 0], vec![1], vec![1, 1], vec![1, 1]),
            Err(ShapeError::IncompatibleDimensionality(
                IncompatibleDimensionalityError::new(1, 2)
            ))
        );
        let subset = StridedSubset::new_with_start_count(vec![1, 2], vec![3, 4]).unwrap();
        assert_eq!(subset.stride(), &[1, 1]);
        assert_eq!(subset.imap(), &[4, 1]);
        assert_eq!(subset.num_elements(), Some(12));
        assert_eq!(subset.num_elements_usize(), Ok(12));
        assert!(!subset.is_empty());
        assert_eq!(
            subset.to_string(),
            "start [1, 2] count [3, 4] stride [1, 1] imap [4, 1]"
        );

        let subset = StridedSubset::new_point(vec![3, 1, 4]);
        assert_eq!(subset.count(), &[1, 1, 1]);
        assert_eq!(subset.num_elements(), Some(1));
        assert!(subset.has_natural_imap());
    }

    #[test]
    fn strided_subset_bounds() {
        let shape = [10, 5];
        let whole = StridedSubset::new_with_shape(shape.to_vec());
        assert!(whole.validate_bounds(&shape).is_ok());
        assert!(whole.validate_bounds(&[10]).is_err());

        let subset = StridedSubset::new_with_start_count(vec![8, 0], vec![3, 5]).unwrap();
        assert_eq!(
            subset.validate_bounds(&shape),
            Err(ShapeError::ExtentOutOfBounds {
                axis: 0,
                start: 8,
                count: 3,
                stride: 1,
                length: 10
            })
        );

        let subset = StridedSubset::new_point(vec![3, 5]);
        assert_eq!(
            subset.validate_bounds(&shape),
            Err(ShapeError::IndexOutOfBounds {
                axis: 1,
                index: 5,
                length: 5
            })
        );

        let empty = StridedSubset::new_with_start_count(vec![10, 0], vec![0, 5]).unwrap();
        assert!(empty.validate_bounds(&shape).is_ok());

        let zero = StridedSubset::new(vec![0, 0], vec![1, 1], vec![1, 0], vec![1, 1]).unwrap();
        assert_eq!(
            zero.validate_bounds(&shape),
            Err(ShapeError::IllegalStride { axis: 1 })
        );

        let strided = StridedSubset::new(vec![1, 0], vec![3, 1], vec![3, 1], vec![1, 1]).unwrap();
        assert!(strided.validate_bounds(&shape).is_ok());
        let strided = StridedSubset::new(vec![1, 0], vec![4, 1], vec![3, 1], vec![1, 1]).unwrap();
        assert!(strided.validate_bounds(&shape).is_err());

        let reverse = StridedSubset::new(vec![9, 4], vec![10, 5], vec![-1, -1], vec![5, 1]).unwrap();
        assert!(reverse.validate_bounds(&shape).is_ok());
        let reverse = StridedSubset::new(vec![5, 0], vec![7, 1], vec![-1, 1], vec![1, 1]).unwrap();
        assert!(reverse.validate_bounds(&shape).is_err());
    }

    #[test]
    fn strided_subset_imap() {
        let subset = StridedSubset::new(vec![0, 0], vec![2, 3], vec![1, 1], vec![1, 2]).unwrap();
        assert!(!subset.has_natural_imap());
        assert_eq!(subset.imap_extent(), Some((0, 5)));
        assert!(subset.validate_imap(6).is_ok());
        assert_eq!(
            subset.validate_imap(5),
            Err(ShapeError::MapOutOfBounds {
                min: 0,
                max: 5,
                len: 5
            })
        );

        let negative = StridedSubset::new(vec![0], vec![3], vec![1], vec![-1]).unwrap();
        assert_eq!(negative.imap_extent(), Some((-2, 0)));
        assert!(negative.validate_imap(3).is_err());

        let empty = StridedSubset::new(vec![0], vec![0], vec![1], vec![-1]).unwrap();
        assert_eq!(empty.imap_extent(), None);
        assert!(empty.validate_imap(0).is_ok());
    }
}
