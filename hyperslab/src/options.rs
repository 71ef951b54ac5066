//! Transfer options.

/// Transfer options.
///
/// ### Example
/// ```rust
/// # use hyperslab::TransferOptions;
/// let options = TransferOptions::default().with_scalar_reads(false);
/// assert!(options.validate_bounds());
/// assert!(!options.scalar_reads());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    validate_bounds: bool,
    scalar_reads: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            validate_bounds: true,
            scalar_reads: true,
        }
    }
}

impl TransferOptions {
    /// Return the validate bounds setting.
    #[must_use]
    pub fn validate_bounds(&self) -> bool {
        self.validate_bounds
    }

    /// Set whether or not to validate bounds.
    ///
    /// If enabled, a start, count or stride outside of the variable is reported as a [`ShapeError`](crate::ShapeError) before the store is called.
    /// Otherwise, the store checks bounds and reports them with its own status.
    pub fn set_validate_bounds(&mut self, validate_bounds: bool) -> &mut Self {
        self.validate_bounds = validate_bounds;
        self
    }

    /// Set whether or not to validate bounds.
    #[must_use]
    pub fn with_validate_bounds(mut self, validate_bounds: bool) -> Self {
        self.validate_bounds = validate_bounds;
        self
    }

    /// Return the scalar reads setting.
    #[must_use]
    pub fn scalar_reads(&self) -> bool {
        self.scalar_reads
    }

    /// Set whether or not single element reads of values return a scalar [`Value`](crate::Value).
    ///
    /// If disabled, [`read_value`](crate::read_value) returns a [`Value::Buffer`](crate::Value::Buffer) for numeric data of any length.
    pub fn set_scalar_reads(&mut self, scalar_reads: bool) -> &mut Self {
        self.scalar_reads = scalar_reads;
        self
    }

    /// Set whether or not single element reads of values return a scalar [`Value`](crate::Value).
    #[must_use]
    pub fn with_scalar_reads(mut self, scalar_reads: bool) -> Self {
        self.scalar_reads = scalar_reads;
        self
    }
}
