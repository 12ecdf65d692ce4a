use std::fmt::{Display, Formatter};

use num_traits::NumCast;
use ragged_error::{RaggedResult, ragged_err};

use crate::{NativePType, PType};

/// A dynamically typed primitive scalar.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum PValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

/// A dynamically typed flat array of primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum PValues {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! match_each_pvalue {
    ($enum:ident, $self:expr, | $v:ident | $body:expr) => {
        match $self {
            $enum::U8($v) => $body,
            $enum::U16($v) => $body,
            $enum::U32($v) => $body,
            $enum::U64($v) => $body,
            $enum::I8($v) => $body,
            $enum::I16($v) => $body,
            $enum::I32($v) => $body,
            $enum::I64($v) => $body,
            $enum::F32($v) => $body,
            $enum::F64($v) => $body,
        }
    };
}

impl PValue {
    pub fn ptype(&self) -> PType {
        match self {
            Self::U8(_) => PType::U8,
            Self::U16(_) => PType::U16,
            Self::U32(_) => PType::U32,
            Self::U64(_) => PType::U64,
            Self::I8(_) => PType::I8,
            Self::I16(_) => PType::I16,
            Self::I32(_) => PType::I32,
            Self::I64(_) => PType::I64,
            Self::F32(_) => PType::F32,
            Self::F64(_) => PType::F64,
        }
    }

    /// Converts to `T`, failing if the value is not representable in `T`.
    pub fn cast<T: NativePType>(self) -> RaggedResult<T> {
        let cast: Option<T> = match_each_pvalue!(PValue, self, |v| <T as NumCast>::from(v));
        cast.ok_or_else(|| {
            ragged_err!(
                InvalidArgument: "value {} of type {} cannot be represented as {}",
                self,
                self.ptype(),
                T::PTYPE
            )
        })
    }
}

impl Display for PValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match_each_pvalue!(PValue, self, |v| write!(f, "{v}"))
    }
}

impl PValues {
    pub fn ptype(&self) -> PType {
        match self {
            Self::U8(_) => PType::U8,
            Self::U16(_) => PType::U16,
            Self::U32(_) => PType::U32,
            Self::U64(_) => PType::U64,
            Self::I8(_) => PType::I8,
            Self::I16(_) => PType::I16,
            Self::I32(_) => PType::I32,
            Self::I64(_) => PType::I64,
            Self::F32(_) => PType::F32,
            Self::F64(_) => PType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match_each_pvalue!(PValues, self, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the values as `&[T]`, failing if the stored type is not exactly `T`.
    pub fn as_slice<T: NativePType>(&self) -> RaggedResult<&[T]> {
        T::try_as_slice(self).ok_or_else(|| ragged_err!(MismatchedTypes: T::PTYPE, self.ptype()))
    }

    /// Returns the value at `index` converted to `T`.
    pub fn get_as<T: NativePType>(&self, index: usize) -> RaggedResult<T> {
        let len = self.len();
        let value: Option<PValue> = match_each_pvalue!(PValues, self, |v| v
            .get(index)
            .map(|x| x.into_pvalue()));
        value
            .ok_or_else(|| ragged_err!(OutOfBounds: index, 0, len))?
            .cast::<T>()
    }
}

impl<T: NativePType> From<Vec<T>> for PValues {
    fn from(values: Vec<T>) -> Self {
        T::into_pvalues(values)
    }
}

#[cfg(test)]
mod tests {
    use ragged_error::RaggedError;

    use super::*;

    #[test]
    fn cast_widens() {
        assert_eq!(PValue::U32(17).cast::<u64>().unwrap(), 17u64);
        assert_eq!(PValue::I8(-3).cast::<f64>().unwrap(), -3.0);
    }

    #[test]
    fn cast_rejects_out_of_range() {
        let err = PValue::I16(-1).cast::<u32>().unwrap_err();
        assert!(matches!(err, RaggedError::InvalidArgument(..)));
    }

    #[test]
    fn exact_slice_access() {
        let values = PValues::from(vec![1u16, 2, 3]);
        assert_eq!(values.ptype(), PType::U16);
        assert_eq!(values.as_slice::<u16>().unwrap(), &[1, 2, 3]);
        assert!(matches!(
            values.as_slice::<u32>().unwrap_err(),
            RaggedError::MismatchedTypes(..)
        ));
    }

    #[test]
    fn get_as_converts_and_bounds_checks() {
        let values = PValues::from(vec![5u8, 6]);
        assert_eq!(values.get_as::<i64>(1).unwrap(), 6);
        assert!(matches!(
            values.get_as::<i64>(2).unwrap_err(),
            RaggedError::OutOfBounds(2, 0, 2, _)
        ));
    }
}
