use thiserror::Error;

use crate::{convert_from_bytes_slice, transmute_to_bytes_vec, ArrayShape, Element, ElementType};

/// A buffer error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The requested scalar type does not match the buffer element type.
    #[error("cannot view a buffer of {buffer} as {requested}")]
    IncompatibleElementType {
        /// The buffer element type.
        buffer: ElementType,
        /// The requested element type.
        requested: ElementType,
    },
    /// The number of bytes does not match the shape and element type.
    #[error("got {got} bytes, expected {expected} for shape {shape:?}")]
    InvalidBytesLength {
        /// The number of bytes.
        got: usize,
        /// The expected number of bytes.
        expected: u64,
        /// The shape.
        shape: ArrayShape,
    },
    /// The shape does not match the number of elements.
    #[error("shape {shape:?} does not hold {num_elements} elements")]
    InvalidShape {
        /// The shape.
        shape: ArrayShape,
        /// The number of elements.
        num_elements: u64,
    },
    /// The buffer is too large to be allocated.
    #[error("a buffer of {element_type} with shape {shape:?} exceeds the addressable size")]
    TooLarge {
        /// The element type.
        element_type: ElementType,
        /// The shape.
        shape: ArrayShape,
    },
}

/// A type-erased, contiguous region of elements.
///
/// A buffer holds its elements in host byte order and row-major order with respect to its shape.
/// The product of the shape always equals the number of elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buffer {
    element_type: ElementType,
    shape: ArrayShape,
    bytes: Vec<u8>,
}

/// Return the product of `shape`, or [`None`] if it overflows.
///
/// A shape with a zero length axis holds no elements regardless of its other axes.
fn shape_product(shape: &[u64]) -> Option<u64> {
    if shape.contains(&0) {
        Some(0)
    } else {
        shape.iter().try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
    }
}

fn num_bytes(element_type: ElementType, shape: &[u64]) -> Result<usize, BufferError> {
    shape_product(shape)
        .and_then(|num_elements| num_elements.checked_mul(element_type.size() as u64))
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| BufferError::TooLarge {
            element_type,
            shape: shape.to_vec(),
        })
}

impl Buffer {
    /// Create a zero initialised buffer.
    ///
    /// # Errors
    /// Returns [`BufferError::TooLarge`] if the buffer size exceeds [`usize::MAX`].
    pub fn new(element_type: ElementType, shape: ArrayShape) -> Result<Self, BufferError> {
        let len = num_bytes(element_type, &shape)?;
        Ok(Self {
            element_type,
            shape,
            bytes: vec![0; len],
        })
    }

    /// Create a one dimensional buffer from a vector of elements.
    #[must_use]
    pub fn from_elements<T: Element>(elements: Vec<T>) -> Self {
        let shape = vec![elements.len() as u64];
        Self {
            element_type: T::ELEMENT_TYPE,
            shape,
            bytes: transmute_to_bytes_vec(elements),
        }
    }

    /// Create a buffer from a vector of elements with a shape.
    ///
    /// # Errors
    /// Returns [`BufferError::InvalidShape`] if the product of `shape` is not the number of elements.
    pub fn from_elements_with_shape<T: Element>(
        elements: Vec<T>,
        shape: ArrayShape,
    ) -> Result<Self, BufferError> {
        let mut buffer = Self::from_elements(elements);
        buffer.reshape(shape)?;
        Ok(buffer)
    }

    /// Create a one dimensional [`ElementType::Char`] buffer from text bytes.
    #[must_use]
    pub fn from_text(text: impl Into<Vec<u8>>) -> Self {
        let bytes = text.into();
        Self {
            element_type: ElementType::Char,
            shape: vec![bytes.len() as u64],
            bytes,
        }
    }

    /// Create a buffer from raw bytes in host byte order.
    ///
    /// # Errors
    /// Returns [`BufferError::InvalidBytesLength`] if the length of `bytes` does not match `element_type` and `shape`.
    pub fn from_bytes(
        element_type: ElementType,
        shape: ArrayShape,
        bytes: Vec<u8>,
    ) -> Result<Self, BufferError> {
        let expected = num_bytes(element_type, &shape)?;
        if bytes.len() == expected {
            Ok(Self {
                element_type,
                shape,
                bytes,
            })
        } else {
            Err(BufferError::InvalidBytesLength {
                got: bytes.len(),
                expected: expected as u64,
                shape,
            })
        }
    }

    /// Return the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the number of elements.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        (self.bytes.len() / self.element_type.size()) as u64
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Return the underlying bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return the underlying bytes mutably.
    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Convert into the underlying bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Change the shape without changing the elements.
    ///
    /// # Errors
    /// Returns [`BufferError::InvalidShape`] if the product of `shape` is not the number of elements.
    pub fn reshape(&mut self, shape: ArrayShape) -> Result<(), BufferError> {
        let num_elements = self.num_elements();
        if shape_product(&shape) == Some(num_elements) {
            self.shape = shape;
            Ok(())
        } else {
            Err(BufferError::InvalidShape {
                shape,
                num_elements,
            })
        }
    }

    /// Copy the elements out as host scalars.
    ///
    /// # Errors
    /// Returns [`BufferError::IncompatibleElementType`] if `T` cannot represent the buffer element type.
    pub fn to_elements<T: Element>(&self) -> Result<Vec<T>, BufferError> {
        if T::is_compatible(self.element_type) {
            Ok(convert_from_bytes_slice::<T>(&self.bytes))
        } else {
            Err(BufferError::IncompatibleElementType {
                buffer: self.element_type,
                requested: T::ELEMENT_TYPE,
            })
        }
    }

    /// Return the element at the linearised index `index`.
    ///
    /// Returns [`None`] if `index` is out of bounds.
    ///
    /// # Errors
    /// Returns [`BufferError::IncompatibleElementType`] if `T` cannot represent the buffer element type.
    pub fn element<T: Element>(&self, index: usize) -> Result<Option<T>, BufferError> {
        if !T::is_compatible(self.element_type) {
            return Err(BufferError::IncompatibleElementType {
                buffer: self.element_type,
                requested: T::ELEMENT_TYPE,
            });
        }
        let size = self.element_type.size();
        Ok(index
            .checked_mul(size)
            .and_then(|start| self.bytes.get(start..start + size))
            .map(bytemuck::pod_read_unaligned::<T>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_elements() {
        let buffer = Buffer::from_elements(vec![1.5f64, -2.0, 3.25]);
        assert_eq!(buffer.element_type(), ElementType::Float64);
        assert_eq!(buffer.shape(), &[3]);
        assert_eq!(buffer.num_elements(), 3);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert_eq!(buffer.to_elements::<f64>().unwrap(), vec![1.5, -2.0, 3.25]);
        assert_eq!(buffer.element::<f64>(1).unwrap(), Some(-2.0));
        assert_eq!(buffer.element::<f64>(3).unwrap(), None);
        assert_eq!(
            buffer.to_elements::<f32>(),
            Err(BufferError::IncompatibleElementType {
                buffer: ElementType::Float64,
                requested: ElementType::Float32
            })
        );
    }

    #[test]
    fn buffer_shape() {
        let mut buffer = Buffer::new(ElementType::Int16, vec![2, 3]).unwrap();
        assert_eq!(buffer.num_elements(), 6);
        assert_eq!(buffer.to_elements::<i16>().unwrap(), vec![0; 6]);
        assert!(buffer.reshape(vec![3, 2]).is_ok());
        assert_eq!(buffer.shape(), &[3, 2]);
        assert!(buffer.reshape(vec![4, 2]).is_err());

        let buffer = Buffer::from_elements_with_shape(vec![1i32, 2, 3, 4], vec![2, 2]).unwrap();
        assert_eq!(buffer.shape(), &[2, 2]);
        assert!(Buffer::from_elements_with_shape(vec![1i32, 2, 3], vec![2, 2]).is_err());

        assert!(Buffer::new(ElementType::Float64, vec![u64::MAX, 2]).is_err());
        assert!(Buffer::new(ElementType::Int8, vec![]).unwrap().num_elements() == 1);
    }

    #[test]
    fn buffer_shape_overflow() {
        let mut buffer = Buffer::new(ElementType::Int32, vec![0]).unwrap();
        assert!(buffer.reshape(vec![u64::MAX, 2, 0]).is_ok());
        assert_eq!(buffer.shape(), &[u64::MAX, 2, 0]);
        assert!(matches!(
            buffer.reshape(vec![u64::MAX, 2]),
            Err(BufferError::InvalidShape { .. })
        ));
        assert_eq!(
            Buffer::new(ElementType::Int8, vec![u64::MAX, 2, 0])
                .unwrap()
                .num_elements(),
            0
        );

        let mut buffer = Buffer::from_elements(vec![1u8, 2]);
        assert!(matches!(
            buffer.reshape(vec![u64::MAX, u64::MAX]),
            Err(BufferError::InvalidShape { .. })
        ));
    }

    #[test]
    fn buffer_text_and_bytes() {
        let buffer = Buffer::from_text("abc");
        assert_eq!(buffer.element_type(), ElementType::Char);
        assert_eq!(buffer.to_elements::<u8>().unwrap(), b"abc".to_vec());
        assert_eq!(buffer.into_bytes(), b"abc".to_vec());

        assert!(Buffer::from_bytes(ElementType::Int32, vec![2], vec![0; 8]).is_ok());
        assert_eq!(
            Buffer::from_bytes(ElementType::Int32, vec![2], vec![0; 7]),
            Err(BufferError::InvalidBytesLength {
                got: 7,
                expected: 8,
                shape: vec![2]
            })
        );
    }
}
