use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ragged_error::{RaggedError, ragged_err};

/// The logical type of a stored object, as recorded in its `datatype` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Scalar,
    Array,
    VectorOfVectors,
    ArrayOfEqualSizedArrays,
    ArrayOfEncodedEqualSizedArrays,
    VectorOfEncodedVectors,
}

impl DataType {
    /// Whether objects of this type hold still-encoded entries.
    pub fn is_encoded(&self) -> bool {
        matches!(
            self,
            Self::ArrayOfEncodedEqualSizedArrays | Self::VectorOfEncodedVectors
        )
    }

    /// The type an encoded object of this type decodes to.
    pub fn decoded(&self) -> Option<Self> {
        match self {
            Self::ArrayOfEncodedEqualSizedArrays => Some(Self::ArrayOfEqualSizedArrays),
            Self::VectorOfEncodedVectors => Some(Self::VectorOfVectors),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "real",
            Self::Array => "array<1>{real}",
            Self::VectorOfVectors => "array<1>{array<1>{real}}",
            Self::ArrayOfEqualSizedArrays => "array_of_equalsized_arrays<1,1>{real}",
            Self::ArrayOfEncodedEqualSizedArrays => "array_of_encoded_equalsized_arrays<1,1>{real}",
            Self::VectorOfEncodedVectors => "array<1>{encoded_array<1>{real}}",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = RaggedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        [
            Self::Scalar,
            Self::Array,
            Self::VectorOfVectors,
            Self::ArrayOfEqualSizedArrays,
            Self::ArrayOfEncodedEqualSizedArrays,
            Self::VectorOfEncodedVectors,
        ]
        .into_iter()
        .find(|dtype| dtype.as_str() == compact)
        .ok_or_else(|| ragged_err!(UnsupportedType: "unknown datatype '{}'", s))
    }
}
