//! `hyperslab` is a type-polymorphic strided N-dimensional array transfer engine.
//!
//! It moves the elements of a store variable addressed by an [`AccessPattern`] between the store and a type-erased [`Buffer`]:
//!  - [`AccessPattern::Point`]: one element,
//!  - [`AccessPattern::Whole`]: every element,
//!  - [`AccessPattern::Slab`]: an axis-aligned hyper-rectangle,
//!  - [`AccessPattern::StridedSlab`]: a hyper-rectangle sampled with a (possibly negative) stride on each axis, and
//!  - [`AccessPattern::MappedSlab`]: a strided hyper-rectangle with an explicit buffer layout (imap), e.g. for transposed reads.
//!
//! Buffers are tagged with an [`ElementType`], and the store converts to and from the [`NativeType`] of the variable through a single element type table ([`ELEMENT_TYPE_TABLE`]).
//! Every transfer validates the element type, dimensionality, bounds and buffer length before the store is called.
//!
//! ## Getting Started
//! ```rust
//! use hyperslab::{read, write, AccessPattern, Buffer};
//! use hyperslab::storage::{store::MemoryStore, NativeType};
//!
//! let store = MemoryStore::new();
//! let y = store.define_dimension("y", 2)?;
//! let x = store.define_dimension("x", 3)?;
//! let variable = store.define_variable("temperature", NativeType::Float, &[y, x])?;
//!
//! let buffer = Buffer::from_elements(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! write(&store, variable, &AccessPattern::Whole, &buffer)?;
//!
//! // Read the first column
//! let column = read(&store, variable, &AccessPattern::slab([0, 0], [2, 1]))?;
//! assert_eq!(column.to_elements::<f32>()?, vec![1.0, 4.0]);
//!
//! // Read the whole variable transposed
//! let transposed = read(&store, variable, &AccessPattern::mapped_slab([0, 0], [2, 3], [1, 1], [1, 2]))?;
//! assert_eq!(transposed.to_elements::<f32>()?, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crates
//!  - [`hyperslab_data_type`](data_type): element types, native types, buffers and conversion,
//!  - [`hyperslab_subset`](subset): access patterns and strided subsets, and
//!  - [`hyperslab_storage`](storage): the store traits, the in-memory store and storage adapters.
//!
//! ## Licence
//! `hyperslab` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod attribute;
mod options;
mod text;
mod transfer;
mod transfer_error;
mod value;
mod variable;

pub use hyperslab_data_type as data_type;
pub use hyperslab_storage as storage;
pub use hyperslab_subset as subset;

pub use hyperslab_data_type::{
    ArrayShape, Buffer, BufferError, Element, ElementType, NativeType, UnsupportedTypeError,
    ELEMENT_TYPE_TABLE,
};
pub use hyperslab_subset::{
    AccessPattern, AccessPatternKind, IncompatibleDimensionalityError, ShapeError, StridedSubset,
};

pub use self::attribute::{get_attribute, get_attribute_into, put_attribute};
pub use self::options::TransferOptions;
pub use self::text::{read_text, read_text_opt, write_text, write_text_opt};
pub use self::transfer::{
    read, read_into, read_into_opt, read_opt, transfer, write, write_opt, TransferDirection,
    Transferred,
};
pub use self::transfer_error::TransferError;
pub use self::value::{read_value, read_value_opt, Value};
pub use self::variable::Variable;

/// Return the element type of buffers allocated for reads of `native` data.
///
/// # Errors
/// Returns [`UnsupportedTypeError::Unmapped`] if `native` has no element type mapping.
pub fn element_type_for_native(native: NativeType) -> Result<ElementType, UnsupportedTypeError> {
    ElementType::from_native(native)
}

/// Return the native type that elements of `element_type` are stored as.
#[must_use]
pub const fn native_for_element_type(element_type: ElementType) -> NativeType {
    element_type.native()
}
