//! A synchronous in-memory store.

use std::collections::BTreeMap;

use hyperslab_data_type::convert::{
    convert_element_to_native, convert_native_to_element, ConversionError,
};
use hyperslab_subset::{iterators::StridedIndices, ShapeError, StridedSubset};
use parking_lot::RwLock;

use crate::{
    status, ArrayShape, AttributeStorageTraits, AttributeTarget, DimensionId, ElementType,
    NativeType, ReadableStorageTraits, StorageError, StoreMetadataTraits, VariableId,
    WritableStorageTraits,
};

#[derive(Debug)]
struct Dimension {
    name: String,
    length: u64,
}

#[derive(Debug, Clone)]
struct Attribute {
    native: NativeType,
    bytes: Vec<u8>,
}

#[derive(Debug)]
struct Variable {
    name: String,
    native: NativeType,
    dimensions: Vec<DimensionId>,
    shape: ArrayShape,
    data: Vec<u8>,
    attributes: BTreeMap<String, Attribute>,
}

#[derive(Debug)]
struct MemoryStoreState {
    open: bool,
    read_only: bool,
    fill: bool,
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    attributes: BTreeMap<String, Attribute>,
}

/// A synchronous in-memory store.
///
/// Dimensions and variables are defined with [`define_dimension`](MemoryStore::define_dimension) and [`define_variable`](MemoryStore::define_variable).
/// New variables are prefilled with the default fill value of their native type unless prefilling is disabled with [`set_fill`](MemoryStore::set_fill).
/// After [`close`](MemoryStore::close), every operation fails with [`StorageError::NotOpen`].
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryStoreState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the byte range of element `index` with elements of `size` bytes.
#[allow(clippy::cast_possible_truncation)]
fn element_range(index: u64, size: usize) -> std::ops::Range<usize> {
    let start = index as usize * size;
    start..start + size
}

fn shape_status(err: &ShapeError) -> StorageError {
    StorageError::from_status(match err {
        ShapeError::IllegalStride { .. } => status::STRIDE,
        ShapeError::IndexOutOfBounds { .. } => status::INVALID_COORDS,
        ShapeError::ExtentOutOfBounds { .. } => status::EDGE,
        _ => status::INVALID_ARGUMENT,
    })
}

fn conversion_status(err: ConversionError) -> StorageError {
    StorageError::from_status(match err {
        ConversionError::Range => status::RANGE,
        ConversionError::Char => status::CHAR_CONVERSION,
        ConversionError::BadType(_) => status::BAD_TYPE,
        ConversionError::Length { .. } => status::INVALID_ARGUMENT,
    })
}

fn check_types(native: NativeType, element_type: ElementType) -> Result<(), StorageError> {
    if native == NativeType::String {
        Err(StorageError::from_status(status::BAD_TYPE))
    } else if (native == NativeType::Char) != element_type.is_char() {
        Err(StorageError::from_status(status::CHAR_CONVERSION))
    } else {
        Ok(())
    }
}

/// Convert `src` holding elements of `element_type` to a new attribute of `native`.
fn encode_attribute(
    native: NativeType,
    element_type: ElementType,
    src: &[u8],
) -> (Attribute, Result<(), StorageError>) {
    let len = src.len() / element_type.size();
    let mut bytes = vec![0; len * native.size()];
    let result = convert_element_to_native(element_type, src, native, &mut bytes)
        .map_err(conversion_status);
    (Attribute { native, bytes }, result)
}

impl Variable {
    fn strided_indices(
        &self,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes_len: usize,
    ) -> Result<StridedIndices, StorageError> {
        check_types(self.native, element_type)?;
        let subset = StridedSubset::new(start.to_vec(), count.to_vec(), stride.to_vec(), imap.to_vec())
            .map_err(|err| shape_status(&err))?;
        let buffer_len = (bytes_len / element_type.size()) as u64;
        subset
            .strided_indices(&self.shape, buffer_len)
            .map_err(|err| shape_status(&err))
    }
}

impl MemoryStoreState {
    fn check_open(&self) -> Result<(), StorageError> {
        if self.open {
            Ok(())
        } else {
            Err(StorageError::NotOpen)
        }
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        self.check_open()?;
        if self.read_only {
            Err(StorageError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn dimension(&self, dimension: DimensionId) -> Result<&Dimension, StorageError> {
        self.check_open()?;
        self.dimensions
            .get(dimension.0)
            .ok_or(StorageError::InvalidDimension(dimension))
    }

    fn variable(&self, variable: VariableId) -> Result<&Variable, StorageError> {
        self.check_open()?;
        self.variables
            .get(variable.0)
            .ok_or(StorageError::InvalidVariable(variable))
    }

    fn variable_mut(&mut self, variable: VariableId) -> Result<&mut Variable, StorageError> {
        self.check_writable()?;
        self.variables
            .get_mut(variable.0)
            .ok_or(StorageError::InvalidVariable(variable))
    }

    fn attributes(
        &self,
        target: AttributeTarget,
    ) -> Result<&BTreeMap<String, Attribute>, StorageError> {
        match target {
            AttributeTarget::Global => {
                self.check_open()?;
                Ok(&self.attributes)
            }
            AttributeTarget::Variable(variable) => Ok(&self.variable(variable)?.attributes),
        }
    }

    fn attributes_mut(
        &mut self,
        target: AttributeTarget,
    ) -> Result<&mut BTreeMap<String, Attribute>, StorageError> {
        match target {
            AttributeTarget::Global => {
                self.check_writable()?;
                Ok(&mut self.attributes)
            }
            AttributeTarget::Variable(variable) => Ok(&mut self.variable_mut(variable)?.attributes),
        }
    }
}

impl MemoryStore {
    /// Create a new memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryStoreState {
                open: true,
                read_only: false,
                fill: true,
                dimensions: Vec::new(),
                variables: Vec::new(),
                attributes: BTreeMap::new(),
            }),
        }
    }

    /// Define a dimension.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is closed or read only, or the name is in use.
    pub fn define_dimension(&self, name: &str, length: u64) -> Result<DimensionId, StorageError> {
        let mut state = self.state.write();
        state.check_writable()?;
        if state.dimensions.iter().any(|dimension| dimension.name == name) {
            return Err(StorageError::from_status(status::NAME_IN_USE));
        }
        state.dimensions.push(Dimension {
            name: name.to_string(),
            length,
        });
        Ok(DimensionId(state.dimensions.len() - 1))
    }

    /// Define a variable of `native` type over `dimensions`.
    ///
    /// A variable without dimensions holds a single element.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is closed or read only, the name is in use, a dimension does not resolve, or the variable is too large to hold in memory.
    pub fn define_variable(
        &self,
        name: &str,
        native: NativeType,
        dimensions: &[DimensionId],
    ) -> Result<VariableId, StorageError> {
        let mut state = self.state.write();
        state.check_writable()?;
        if state.variables.iter().any(|variable| variable.name == name) {
            return Err(StorageError::from_status(status::NAME_IN_USE));
        }
        let shape = dimensions
            .iter()
            .map(|&dimension| Ok(state.dimension(dimension)?.length))
            .collect::<Result<ArrayShape, StorageError>>()?;
        let len = shape
            .iter()
            .try_fold(native.size() as u64, |acc, &length| acc.checked_mul(length))
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(|| StorageError::Other(format!("variable {name} is too large")))?;
        let data = if state.fill {
            native
                .fill_value()
                .into_iter()
                .cycle()
                .take(len)
                .collect()
        } else {
            vec![0; len]
        };
        state.variables.push(Variable {
            name: name.to_string(),
            native,
            dimensions: dimensions.to_vec(),
            shape,
            data,
            attributes: BTreeMap::new(),
        });
        Ok(VariableId(state.variables.len() - 1))
    }

    /// Return the identifier of the dimension called `name`.
    ///
    /// # Errors
    /// Returns [`StorageError::NotOpen`] if the store is closed.
    pub fn dimension_id(&self, name: &str) -> Result<Option<DimensionId>, StorageError> {
        let state = self.state.read();
        state.check_open()?;
        Ok(state
            .dimensions
            .iter()
            .position(|dimension| dimension.name == name)
            .map(DimensionId))
    }

    /// Return the identifier of the variable called `name`.
    ///
    /// # Errors
    /// Returns [`StorageError::NotOpen`] if the store is closed.
    pub fn variable_id(&self, name: &str) -> Result<Option<VariableId>, StorageError> {
        let state = self.state.read();
        state.check_open()?;
        Ok(state
            .variables
            .iter()
            .position(|variable| variable.name == name)
            .map(VariableId))
    }

    /// Enable or disable prefilling of variables defined later with their default fill value.
    ///
    /// Returns the previous fill mode.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is closed or read only.
    pub fn set_fill(&self, fill: bool) -> Result<bool, StorageError> {
        let mut state = self.state.write();
        state.check_writable()?;
        Ok(std::mem::replace(&mut state.fill, fill))
    }

    /// Make the store read only, or writable again.
    pub fn set_read_only(&self, read_only: bool) {
        self.state.write().read_only = read_only;
    }

    /// Returns true if the store is read only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.state.read().read_only
    }

    /// Close the store.
    ///
    /// # Errors
    /// Returns [`StorageError::NotOpen`] if the store is already closed.
    pub fn close(&self) -> Result<(), StorageError> {
        let mut state = self.state.write();
        state.check_open()?;
        state.open = false;
        Ok(())
    }

    /// Returns true if the store is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.read().open
    }
}

impl StoreMetadataTraits for MemoryStore {
    fn rank(&self, variable: VariableId) -> Result<usize, StorageError> {
        Ok(self.state.read().variable(variable)?.dimensions.len())
    }

    fn native_type(&self, variable: VariableId) -> Result<NativeType, StorageError> {
        Ok(self.state.read().variable(variable)?.native)
    }

    fn dimension_ids(&self, variable: VariableId) -> Result<Vec<DimensionId>, StorageError> {
        Ok(self.state.read().variable(variable)?.dimensions.clone())
    }

    fn dimension_length(&self, dimension: DimensionId) -> Result<u64, StorageError> {
        Ok(self.state.read().dimension(dimension)?.length)
    }

    fn shape(&self, variable: VariableId) -> Result<ArrayShape, StorageError> {
        Ok(self.state.read().variable(variable)?.shape.clone())
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn get_varm(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let state = self.state.read();
        let variable = state.variable(variable)?;
        let indices =
            variable.strided_indices(start, count, stride, imap, element_type, bytes.len())?;
        let native_size = variable.native.size();
        let element_size = element_type.size();
        let mut result = Ok(());
        for (store_index, buffer_offset) in &indices {
            let src = &variable.data[element_range(store_index, native_size)];
            let dst = &mut bytes[element_range(buffer_offset, element_size)];
            match convert_native_to_element(variable.native, src, element_type, dst) {
                Ok(()) => {}
                Err(ConversionError::Range) => result = Err(conversion_status(ConversionError::Range)),
                Err(err) => return Err(conversion_status(err)),
            }
        }
        result
    }
}

impl WritableStorageTraits for MemoryStore {
    fn put_varm(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[i64],
        imap: &[i64],
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let mut state = self.state.write();
        let variable = state.variable_mut(variable)?;
        let indices =
            variable.strided_indices(start, count, stride, imap, element_type, bytes.len())?;
        let native = variable.native;
        let native_size = native.size();
        let element_size = element_type.size();
        let mut result = Ok(());
        for (store_index, buffer_offset) in &indices {
            let src = &bytes[element_range(buffer_offset, element_size)];
            let dst = &mut variable.data[element_range(store_index, native_size)];
            match convert_element_to_native(element_type, src, native, dst) {
                Ok(()) => {}
                Err(ConversionError::Range) => result = Err(conversion_status(ConversionError::Range)),
                Err(err) => return Err(conversion_status(err)),
            }
        }
        result
    }
}

impl AttributeStorageTraits for MemoryStore {
    fn attribute_info(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<(NativeType, u64)>, StorageError> {
        let state = self.state.read();
        Ok(state.attributes(target)?.get(name).map(|attribute| {
            (
                attribute.native,
                (attribute.bytes.len() / attribute.native.size()) as u64,
            )
        }))
    }

    fn get_att(
        &self,
        target: AttributeTarget,
        name: &str,
        element_type: ElementType,
        bytes: &mut [u8],
    ) -> Result<(), StorageError> {
        let state = self.state.read();
        let attribute = state
            .attributes(target)?
            .get(name)
            .ok_or_else(|| StorageError::from_status(status::NOT_ATTRIBUTE))?;
        check_types(attribute.native, element_type)?;
        convert_native_to_element(attribute.native, &attribute.bytes, element_type, bytes)
            .map_err(conversion_status)
    }

    fn put_att(
        &self,
        target: AttributeTarget,
        name: &str,
        native: NativeType,
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let mut state = self.state.write();
        let attributes = state.attributes_mut(target)?;
        check_types(native, element_type)?;
        let (attribute, result) = encode_attribute(native, element_type, bytes);
        attributes.insert(name.to_string(), attribute);
        result
    }
}
