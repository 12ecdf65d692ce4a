//! Arrays whose entries are stored as opaque encoded byte strings.

mod read;

use std::fmt::{Display, Formatter};

use ragged_array::{Attributes, EqualSizedArray, RaggedArray};
use ragged_dtype::NativePType;
use ragged_error::{RaggedResult, ragged_bail};
pub use read::*;

use crate::DataType;

/// Encoded entries that all decode to `decoded_size` elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayOfEncodedEqualSizedArrays {
    encoded_data: RaggedArray<u8>,
    decoded_size: u64,
    attrs: Attributes,
}

impl ArrayOfEncodedEqualSizedArrays {
    pub fn new(encoded_data: RaggedArray<u8>, decoded_size: u64) -> Self {
        Self {
            encoded_data,
            decoded_size,
            attrs: Attributes::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn len(&self) -> usize {
        self.encoded_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoded_data.is_empty()
    }

    pub fn encoded_data(&self) -> &RaggedArray<u8> {
        &self.encoded_data
    }

    pub fn encoded_data_mut(&mut self) -> &mut RaggedArray<u8> {
        &mut self.encoded_data
    }

    pub fn decoded_size(&self) -> u64 {
        self.decoded_size
    }

    pub fn set_decoded_size(&mut self, decoded_size: u64) {
        self.decoded_size = decoded_size;
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn datatype(&self) -> DataType {
        DataType::ArrayOfEncodedEqualSizedArrays
    }
}

/// Encoded entries with one decoded size per entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorOfEncodedVectors {
    encoded_data: RaggedArray<u8>,
    decoded_size: Vec<u64>,
    attrs: Attributes,
}

impl VectorOfEncodedVectors {
    pub fn try_new(encoded_data: RaggedArray<u8>, decoded_size: Vec<u64>) -> RaggedResult<Self> {
        if encoded_data.len() != decoded_size.len() {
            ragged_bail!(
                LengthMismatch: "{} encoded entries but {} decoded sizes",
                encoded_data.len(),
                decoded_size.len()
            );
        }
        Ok(Self {
            encoded_data,
            decoded_size,
            attrs: Attributes::default(),
        })
    }

    /// An empty array, usable as a read buffer.
    pub fn empty() -> Self {
        Self {
            encoded_data: RaggedArray::from_iter(std::iter::empty::<Vec<u8>>()),
            decoded_size: Vec::new(),
            attrs: Attributes::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn len(&self) -> usize {
        self.encoded_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoded_data.is_empty()
    }

    /// Truncates or extends both the entries and their decoded sizes.
    pub fn resize(&mut self, entry_count: usize) {
        self.encoded_data.resize(entry_count);
        self.decoded_size.resize(entry_count, 0);
    }

    pub fn encoded_data(&self) -> &RaggedArray<u8> {
        &self.encoded_data
    }

    pub fn decoded_size(&self) -> &[u64] {
        &self.decoded_size
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn datatype(&self) -> DataType {
        DataType::VectorOfEncodedVectors
    }

    /// Mutable access to both buffers for reads that fill them in place.
    pub(crate) fn parts_mut(&mut self) -> (&mut RaggedArray<u8>, &mut Vec<u64>) {
        (&mut self.encoded_data, &mut self.decoded_size)
    }
}

/// Either kind of encoded array.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedArray {
    EqualSized(ArrayOfEncodedEqualSizedArrays),
    Vectors(VectorOfEncodedVectors),
}

impl EncodedArray {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::EqualSized(array) => array.datatype(),
            Self::Vectors(array) => array.datatype(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::EqualSized(array) => array.len(),
            Self::Vectors(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn encoded_data(&self) -> &RaggedArray<u8> {
        match self {
            Self::EqualSized(array) => array.encoded_data(),
            Self::Vectors(array) => array.encoded_data(),
        }
    }

    pub fn attrs(&self) -> &Attributes {
        match self {
            Self::EqualSized(array) => array.attrs(),
            Self::Vectors(array) => array.attrs(),
        }
    }
}

impl From<ArrayOfEncodedEqualSizedArrays> for EncodedArray {
    fn from(array: ArrayOfEncodedEqualSizedArrays) -> Self {
        Self::EqualSized(array)
    }
}

impl From<VectorOfEncodedVectors> for EncodedArray {
    fn from(array: VectorOfEncodedVectors) -> Self {
        Self::Vectors(array)
    }
}

/// The result of decoding an [`EncodedArray`].
#[derive(Debug, Clone)]
pub enum Decoded<T> {
    Dense(EqualSizedArray<T>),
    Ragged(RaggedArray<T>),
}

/// Any object the encoded read path can return or fill.
#[derive(Debug, Clone)]
pub enum DataObject<T> {
    Encoded(EncodedArray),
    Dense(EqualSizedArray<T>),
    Ragged(RaggedArray<T>),
}

impl<T: NativePType> DataObject<T> {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Encoded(array) => array.datatype(),
            Self::Dense(_) => DataType::ArrayOfEqualSizedArrays,
            Self::Ragged(_) => DataType::VectorOfVectors,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Encoded(array) => array.len(),
            Self::Dense(array) => array.len(),
            Self::Ragged(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_encoded(&self) -> Option<&EncodedArray> {
        match self {
            Self::Encoded(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_dense(&self) -> Option<&EqualSizedArray<T>> {
        match self {
            Self::Dense(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_ragged(&self) -> Option<&RaggedArray<T>> {
        match self {
            Self::Ragged(array) => Some(array),
            _ => None,
        }
    }
}

impl<T: NativePType> PartialEq for Decoded<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a == b,
            (Self::Ragged(a), Self::Ragged(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: NativePType> PartialEq for DataObject<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Encoded(a), Self::Encoded(b)) => a == b,
            (Self::Dense(a), Self::Dense(b)) => a == b,
            (Self::Ragged(a), Self::Ragged(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> From<Decoded<T>> for DataObject<T> {
    fn from(decoded: Decoded<T>) -> Self {
        match decoded {
            Decoded::Dense(array) => Self::Dense(array),
            Decoded::Ragged(array) => Self::Ragged(array),
        }
    }
}

impl<T> From<EqualSizedArray<T>> for DataObject<T> {
    fn from(array: EqualSizedArray<T>) -> Self {
        Self::Dense(array)
    }
}

impl<T> From<RaggedArray<T>> for DataObject<T> {
    fn from(array: RaggedArray<T>) -> Self {
        Self::Ragged(array)
    }
}

impl<T> From<EncodedArray> for DataObject<T> {
    fn from(array: EncodedArray) -> Self {
        Self::Encoded(array)
    }
}

impl<T: NativePType> Display for DataObject<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encoded(array) => write!(f, "{} of {} entries", array.datatype(), array.len()),
            Self::Dense(array) => write!(f, "{array}"),
            Self::Ragged(array) => write!(f, "{array}"),
        }
    }
}
