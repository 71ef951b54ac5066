use std::iter::FusedIterator;

use crate::{unravel_index, ShapeError, StridedSubset};

/// The `(store index, buffer offset)` pairs of a strided subset.
///
/// Iterates over the last axis of the subset fastest (i.e. C-contiguous order).
/// For example, consider a 4x3 variable with linearised indices
/// ```text
///  0  1  2
///  3  4  5
///  6  7  8
///  9 10 11
/// ```
/// A subset with start `[3, 0]`, count `[2, 2]`, stride `[-2, 2]` and the row-major imap `[2, 1]` produces `[(9, 0), (11, 1), (3, 2), (5, 3)]`.
#[derive(Clone, Debug)]
pub struct StridedIndices {
    pub(crate) subset: StridedSubset,
    pub(crate) array_strides: Vec<u64>,
    pub(crate) range: std::ops::Range<usize>,
}

impl StridedIndices {
    /// Create a new strided indices struct.
    ///
    /// The subset must lie within `shape` and address non-negative buffer offsets.
    /// [`StridedSubset::strided_indices`] checks this before construction.
    pub(crate) fn new(subset: StridedSubset, shape: &[u64]) -> Result<Self, ShapeError> {
        let length = subset.num_elements_usize()?;
        let mut array_strides = vec![1u64; shape.len()];
        for axis in (0..shape.len().saturating_sub(1)).rev() {
            array_strides[axis] = array_strides[axis + 1] * shape[axis + 1];
        }
        Ok(Self {
            subset,
            array_strides,
            range: 0..length,
        })
    }

    /// Return the strided subset.
    #[must_use]
    pub fn subset(&self) -> &StridedSubset {
        &self.subset
    }

    /// Return the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Returns true if the number of elements is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a new serial iterator.
    #[must_use]
    pub fn iter(&self) -> StridedIndicesIterator<'_> {
        <&Self as IntoIterator>::into_iter(self)
    }
}

impl<'a> IntoIterator for &'a StridedIndices {
    type Item = (u64, u64);
    type IntoIter = StridedIndicesIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        StridedIndicesIterator {
            subset: &self.subset,
            array_strides: &self.array_strides,
            range: self.range.clone(),
        }
    }
}

impl IntoIterator for StridedIndices {
    type Item = (u64, u64);
    type IntoIter = StridedIndicesIntoIterator;

    fn into_iter(self) -> Self::IntoIter {
        StridedIndicesIntoIterator {
            subset: self.subset,
            array_strides: self.array_strides,
            range: self.range,
        }
    }
}

/// Serial strided indices iterator.
///
/// See [`StridedIndices`].
#[derive(Clone)]
pub struct StridedIndicesIterator<'a> {
    subset: &'a StridedSubset,
    array_strides: &'a [u64],
    range: std::ops::Range<usize>,
}

/// Serial strided indices iterator.
///
/// See [`StridedIndices`].
#[derive(Clone)]
pub struct StridedIndicesIntoIterator {
    subset: StridedSubset,
    array_strides: Vec<u64>,
    range: std::ops::Range<usize>,
}

/// Compute the store index and buffer offset of the element at `position` of `subset`.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn strided_index(
    position: usize,
    subset: &StridedSubset,
    array_strides: &[u64],
) -> Option<(u64, u64)> {
    let indices = unravel_index(position as u64, &subset.count)?;
    let mut store_index: i128 = 0;
    let mut buffer_offset: i128 = 0;
    for (axis, &i) in indices.iter().enumerate() {
        let i = i128::from(i);
        let coordinate = i128::from(subset.start[axis]) + i * i128::from(subset.stride[axis]);
        store_index += coordinate * i128::from(array_strides[axis]);
        buffer_offset += i * i128::from(subset.imap[axis]);
    }
    Some((store_index as u64, buffer_offset as u64))
}

macro_rules! impl_strided_indices_iterator {
    ($iterator_type:ty) => {
        impl Iterator for $iterator_type {
            type Item = (u64, u64);

            fn next(&mut self) -> Option<Self::Item> {
                if self.range.start >= self.range.end {
                    return None;
                }
                let position = self.range.start;
                self.range.start += 1;
                strided_index(position, &self.subset, &self.array_strides)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let length = self.range.end.saturating_sub(self.range.start);
                (length, Some(length))
            }
        }

        impl DoubleEndedIterator for $iterator_type {
            fn next_back(&mut self) -> Option<Self::Item> {
                if self.range.end > self.range.start {
                    self.range.end -= 1;
                    strided_index(self.range.end, &self.subset, &self.array_strides)
                } else {
                    None
                }
            }
        }

        impl ExactSizeIterator for $iterator_type {}

        impl FusedIterator for $iterator_type {}
    };
}

impl_strided_indices_iterator!(StridedIndicesIterator<'_>);
impl_strided_indices_iterator!(StridedIndicesIntoIterator);

#[cfg(test)]
mod tests {
    use crate::{AccessPattern, ShapeError, StridedSubset};

    #[test]
    fn strided_indices_slab() {
        //  0  1  2  3
        //  4  5  6  7
        //  8  9 10 11
        // 12 13 14 15
        let subset = StridedSubset::new_with_start_count(vec![1, 1], vec![2, 2]).unwrap();
        let indices = subset.strided_indices(&[4, 4], 4).unwrap();
        assert_eq!(indices.len(), 4);
        assert!(!indices.is_empty());

        let mut iter = indices.iter();
        assert_eq!(iter.size_hint(), (4, Some(4)));
        assert_eq!(iter.next_back(), Some((10, 3)));
        assert_eq!(iter.next(), Some((5, 0)));
        assert_eq!(iter.next(), Some((6, 1)));
        assert_eq!(iter.next(), Some((9, 2)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let expected = vec![(5, 0), (6, 1), (9, 2), (10, 3)];
        assert_eq!(indices.iter().collect::<Vec<_>>(), expected);
        assert_eq!(indices.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn strided_indices_negative_stride() {
        let subset = StridedSubset::new(vec![3, 0], vec![2, 2], vec![-2, 2], vec![2, 1]).unwrap();
        let indices = subset.strided_indices(&[4, 3], 4).unwrap();
        assert_eq!(
            indices.iter().collect::<Vec<_>>(),
            vec![(9, 0), (11, 1), (3, 2), (5, 3)]
        );
    }

    #[test]
    fn strided_indices_transposed() {
        // A 2x3 slab held column-major in the buffer.
        let subset = AccessPattern::mapped_slab([0, 0], [2, 3], [1, 1], [1, 2])
            .to_strided_subset(&[2, 3])
            .unwrap();
        let indices = subset.strided_indices(&[2, 3], 6).unwrap();
        assert_eq!(
            indices.iter().collect::<Vec<_>>(),
            vec![(0, 0), (1, 2), (2, 4), (3, 1), (4, 3), (5, 5)]
        );
    }

    #[test]
    fn strided_indices_point_and_empty() {
        let subset = AccessPattern::point([2, 1, 3])
            .to_strided_subset(&[3, 2, 4])
            .unwrap();
        let indices = subset.strided_indices(&[3, 2, 4], 1).unwrap();
        assert_eq!(indices.iter().collect::<Vec<_>>(), vec![(23, 0)]);

        let subset = StridedSubset::new_with_start_count(vec![0, 2], vec![3, 0]).unwrap();
        let indices = subset.strided_indices(&[3, 2], 0).unwrap();
        assert!(indices.is_empty());
        assert_eq!(indices.iter().next(), None);
    }

    #[test]
    fn strided_indices_invalid() {
        let subset = StridedSubset::new_with_start_count(vec![1, 1], vec![2, 2]).unwrap();
        assert!(matches!(
            subset.strided_indices(&[2, 2], 4),
            Err(ShapeError::ExtentOutOfBounds { axis: 0, .. })
        ));
        assert!(matches!(
            subset.strided_indices(&[4, 4], 3),
            Err(ShapeError::MapOutOfBounds { .. })
        ));
        assert!(matches!(
            subset.strided_indices(&[4], 4),
            Err(ShapeError::IncompatibleDimensionality(_))
        ));
    }
}
