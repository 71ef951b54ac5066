use derive_more::Display;

use crate::{
    natural_imap, ArrayIndices, ArrayShape, IncompatibleDimensionalityError, ShapeError,
    StridedSubset,
};

/// The elements of a variable touched by a transfer.
///
/// Every per-axis sequence must have one entry per dimension of the variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessPattern {
    /// One element.
    Point {
        /// The index of the element on each axis.
        index: ArrayIndices,
    },
    /// Every element of the variable.
    Whole,
    /// An axis-aligned hyper-rectangle.
    Slab {
        /// The first index on each axis.
        start: ArrayIndices,
        /// The number of elements on each axis.
        count: ArrayShape,
    },
    /// A hyper-rectangle sampled at a regular interval on each axis.
    ///
    /// A negative stride traverses the axis in reverse from `start`.
    StridedSlab {
        /// The first index on each axis.
        start: ArrayIndices,
        /// The number of elements on each axis.
        count: ArrayShape,
        /// The sampling interval on each axis.
        stride: Vec<i64>,
    },
    /// A strided hyper-rectangle with an explicit buffer offset multiplier on each axis.
    ///
    /// The element at position `i` of the subset is held at buffer offset `sum(i[axis] * imap[axis])`.
    MappedSlab {
        /// The first index on each axis.
        start: ArrayIndices,
        /// The number of elements on each axis.
        count: ArrayShape,
        /// The sampling interval on each axis.
        stride: Vec<i64>,
        /// The buffer offset multiplier on each axis, in elements.
        imap: Vec<i64>,
    },
}

/// The variant of an [`AccessPattern`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum AccessPatternKind {
    /// [`AccessPattern::Point`].
    #[display("point")]
    Point,
    /// [`AccessPattern::Whole`].
    #[display("whole")]
    Whole,
    /// [`AccessPattern::Slab`].
    #[display("slab")]
    Slab,
    /// [`AccessPattern::StridedSlab`].
    #[display("strided slab")]
    StridedSlab,
    /// [`AccessPattern::MappedSlab`].
    #[display("mapped slab")]
    MappedSlab,
}

impl AccessPattern {
    /// Create a [`AccessPattern::Point`].
    #[must_use]
    pub fn point(index: impl Into<ArrayIndices>) -> Self {
        Self::Point {
            index: index.into(),
        }
    }

    /// Create a [`AccessPattern::Whole`].
    #[must_use]
    pub const fn whole() -> Self {
        Self::Whole
    }

    /// Create a [`AccessPattern::Slab`].
    #[must_use]
    pub fn slab(start: impl Into<ArrayIndices>, count: impl Into<ArrayShape>) -> Self {
        Self::Slab {
            start: start.into(),
            count: count.into(),
        }
    }

    /// Create a [`AccessPattern::StridedSlab`].
    #[must_use]
    pub fn strided_slab(
        start: impl Into<ArrayIndices>,
        count: impl Into<ArrayShape>,
        stride: impl Into<Vec<i64>>,
    ) -> Self {
        Self::StridedSlab {
            start: start.into(),
            count: count.into(),
            stride: stride.into(),
        }
    }

    /// Create a [`AccessPattern::MappedSlab`].
    #[must_use]
    pub fn mapped_slab(
        start: impl Into<ArrayIndices>,
        count: impl Into<ArrayShape>,
        stride: impl Into<Vec<i64>>,
        imap: impl Into<Vec<i64>>,
    ) -> Self {
        Self::MappedSlab {
            start: start.into(),
            count: count.into(),
            stride: stride.into(),
            imap: imap.into(),
        }
    }

    /// Return the variant of the pattern.
    #[must_use]
    pub const fn kind(&self) -> AccessPatternKind {
        match self {
            Self::Point { .. } => AccessPatternKind::Point,
            Self::Whole => AccessPatternKind::Whole,
            Self::Slab { .. } => AccessPatternKind::Slab,
            Self::StridedSlab { .. } => AccessPatternKind::StridedSlab,
            Self::MappedSlab { .. } => AccessPatternKind::MappedSlab,
        }
    }

    /// Return the number of elements on each axis, or [`None`] for [`AccessPattern::Whole`].
    #[must_use]
    pub fn count(&self) -> Option<ArrayShape> {
        match self {
            Self::Point { index } => Some(vec![1; index.len()]),
            Self::Whole => None,
            Self::Slab { count, .. }
            | Self::StridedSlab { count, .. }
            | Self::MappedSlab { count, .. } => Some(count.clone()),
        }
    }

    /// Check that every per-axis sequence of the pattern has `dimensionality` entries.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] naming the first sequence whose length differs.
    pub fn check_dimensionality(
        &self,
        dimensionality: usize,
    ) -> Result<(), IncompatibleDimensionalityError> {
        let lengths = match self {
            Self::Point { index } => vec![index.len()],
            Self::Whole => vec![],
            Self::Slab { start, count } => vec![start.len(), count.len()],
            Self::StridedSlab {
                start,
                count,
                stride,
            } => vec![start.len(), count.len(), stride.len()],
            Self::MappedSlab {
                start,
                count,
                stride,
                imap,
            } => vec![start.len(), count.len(), stride.len(), imap.len()],
        };
        match lengths.iter().find(|&&len| len != dimensionality) {
            Some(&len) => Err(IncompatibleDimensionalityError::new(len, dimensionality)),
            None => Ok(()),
        }
    }

    /// Normalise the pattern to a [`StridedSubset`] of a variable with `shape`.
    ///
    /// [`AccessPattern::Whole`] covers `shape`, [`AccessPattern::Point`] has a count of 1 on every axis, and patterns without a stride or memory map get a stride of 1 and a row-major memory map.
    /// Bounds are not checked, see [`StridedSubset::validate_bounds`].
    ///
    /// # Errors
    /// Returns [`ShapeError::IncompatibleDimensionality`] if a per-axis sequence does not match the dimensionality of `shape`.
    pub fn to_strided_subset(&self, shape: &[u64]) -> Result<StridedSubset, ShapeError> {
        self.check_dimensionality(shape.len())?;
        let subset = match self {
            Self::Point { index } => StridedSubset::new_point(index.clone()),
            Self::Whole => StridedSubset::new_with_shape(shape.to_vec()),
            Self::Slab { start, count } => StridedSubset {
                start: start.clone(),
                count: count.clone(),
                stride: vec![1; shape.len()],
                imap: natural_imap(count),
            },
            Self::StridedSlab {
                start,
                count,
                stride,
            } => StridedSubset {
                start: start.clone(),
                count: count.clone(),
                stride: stride.clone(),
                imap: natural_imap(count),
            },
            Self::MappedSlab {
                start,
                count,
                stride,
                imap,
            } => StridedSubset {
                start: start.clone(),
                count: count.clone(),
                stride: stride.clone(),
                imap: imap.clone(),
            },
        };
        Ok(subset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_pattern_kind() {
        assert_eq!(AccessPattern::point([1, 2]).kind(), AccessPatternKind::Point);
        assert_eq!(AccessPattern::whole().kind(), AccessPatternKind::Whole);
        assert_eq!(AccessPattern::slab([0], [3]).kind(), AccessPatternKind::Slab);
        assert_eq!(
            AccessPattern::mapped_slab([0], [3], [1], [1])
                .kind()
                .to_string(),
            "mapped slab"
        );
    }

    #[test]
    fn access_pattern_count() {
        assert_eq!(AccessPattern::point([4, 5, 6]).count(), Some(vec![1, 1, 1]));
        assert_eq!(AccessPattern::whole().count(), None);
        assert_eq!(
            AccessPattern::strided_slab([0, 0], [2, 3], [2, 1]).count(),
            Some(vec![2, 3])
        );
    }

    #[test]
    fn access_pattern_dimensionality() {
        assert!(AccessPattern::whole().check_dimensionality(3).is_ok());
        assert!(AccessPattern::slab([0, 0], [1, 1])
            .check_dimensionality(2)
            .is_ok());
        assert_eq!(
            AccessPattern::slab([0], [5]).check_dimensionality(2),
            Err(IncompatibleDimensionalityError::new(1, 2))
        );
        assert_eq!(
            AccessPattern::strided_slab([0, 0], [5, 5], [1]).check_dimensionality(2),
            Err(IncompatibleDimensionalityError::new(1, 2))
        );
        assert!(AccessPattern::mapped_slab([0, 0], [1, 1], [1, 1], [1, 1, 1])
            .check_dimensionality(2)
            .is_err());
    }

    #[test]
    fn access_pattern_to_strided_subset() {
        let shape = [4, 6];
        let subset = AccessPattern::whole().to_strided_subset(&shape).unwrap();
        assert_eq!(subset.start(), &[0, 0]);
        assert_eq!(subset.count(), &[4, 6]);
        assert_eq!(subset.stride(), &[1, 1]);
        assert_eq!(subset.imap(), &[6, 1]);

        let subset = AccessPattern::point([2, 3]).to_strided_subset(&shape).unwrap();
        assert_eq!(subset.start(), &[2, 3]);
        assert_eq!(subset.count(), &[1, 1]);

        let subset = AccessPattern::strided_slab([0, 1], [2, 2], [2, 3])
            .to_strided_subset(&shape)
            .unwrap();
        assert_eq!(subset.stride(), &[2, 3]);
        assert_eq!(subset.imap(), &[2, 1]);
        assert!(subset.has_natural_imap());

        let subset = AccessPattern::mapped_slab([0, 0], [2, 3], [1, 1], [1, 2])
            .to_strided_subset(&shape)
            .unwrap();
        assert!(!subset.has_natural_imap());

        assert!(matches!(
            AccessPattern::slab([0], [5]).to_strided_subset(&shape),
            Err(ShapeError::IncompatibleDimensionality(_))
        ));
    }
}
