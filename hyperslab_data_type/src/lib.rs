//! The element type API for the [`hyperslab`](https://docs.rs/hyperslab/latest/hyperslab/index.html) crate.
//!
//! This crate defines
//!  - [`ElementType`]: the in-memory representation of buffer elements, and the one table ([`ELEMENT_TYPE_TABLE`]) mapping each to a storage width and a [`NativeType`],
//!  - [`NativeType`]: the element type codes a store reports for its variables and attributes,
//!  - [`Element`]: host scalars that can be moved in and out of a [`Buffer`],
//!  - [`Buffer`]: a type-erased, contiguous, shaped region of elements, and
//!  - [`convert`]: range checked conversion between element and native representations.
//!
//! ## Licence
//! `hyperslab_data_type` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod buffer;
pub mod convert;
mod element;
mod element_type;
mod native_type;

pub use buffer::{Buffer, BufferError};
pub use element::Element;
pub use element_type::{ElementType, ElementTypeInfo, UnsupportedTypeError, ELEMENT_TYPE_TABLE};
pub use native_type::NativeType;

/// The shape of an array or buffer.
pub type ArrayShape = Vec<u64>;

/// Transmute from `Vec<T>` to `Vec<u8>`.
#[must_use]
pub fn transmute_to_bytes_vec<T: bytemuck::NoUninit>(from: Vec<T>) -> Vec<u8> {
    bytemuck::allocation::try_cast_vec(from)
        .unwrap_or_else(|(_err, from)| convert_to_bytes_vec(&from))
}

/// Convert from `&[T]` to `Vec<u8>`.
#[must_use]
pub fn convert_to_bytes_vec<T: bytemuck::NoUninit>(from: &[T]) -> Vec<u8> {
    bytemuck::allocation::pod_collect_to_vec(from)
}

/// Convert from `&[u8]` to `Vec<T>`.
#[must_use]
pub fn convert_from_bytes_slice<T: bytemuck::Pod>(from: &[u8]) -> Vec<T> {
    bytemuck::allocation::pod_collect_to_vec(from)
}

/// Transmute from `&[T]` to `&[u8]`.
#[must_use]
pub fn transmute_to_bytes<T: bytemuck::NoUninit>(from: &[T]) -> &[u8] {
    bytemuck::must_cast_slice(from)
}
