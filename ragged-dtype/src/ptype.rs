use std::fmt::{Debug, Display, Formatter};
use std::panic::RefUnwindSafe;

use num_traits::{Num, NumCast};

use crate::{PValue, PValues};

/// The runtime tag of a fixed-width numeric element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PType {
    /// An 8-bit unsigned integer
    U8,
    /// A 16-bit unsigned integer
    U16,
    /// A 32-bit unsigned integer
    U32,
    /// A 64-bit unsigned integer
    U64,
    /// An 8-bit signed integer
    I8,
    /// A 16-bit signed integer
    I16,
    /// A 32-bit signed integer
    I32,
    /// A 64-bit signed integer
    I64,
    /// A 32-bit floating point number
    F32,
    /// A 64-bit floating point number
    F64,
}

impl PType {
    /// Returns the number of bytes in this PType
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// The element name used in storage datatype strings.
    ///
    /// Every numeric type is stored as `real`; the concrete width lives in the dataset itself.
    pub const fn element_type_name(&self) -> &'static str {
        "real"
    }
}

impl Display for PType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U8 => write!(f, "u8"),
            Self::U16 => write!(f, "u16"),
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::I8 => write!(f, "i8"),
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
        }
    }
}

/// A trait for native Rust types that correspond 1:1 to a [`PType`].
pub trait NativePType:
    Send
    + Sync
    + Clone
    + Copy
    + Debug
    + Display
    + Default
    + RefUnwindSafe
    + Num
    + NumCast
    + PartialEq
    + PartialOrd
    + 'static
{
    /// The PType that corresponds to this native type
    const PTYPE: PType;

    /// The value used to pad short rows when converting to a dense layout.
    ///
    /// `NaN` for floating point types, the maximum representable value for integers.
    fn pad_value() -> Self;

    /// Whether this instance (`self`) is NaN.
    /// For integer types, this is always `false`.
    fn is_nan(self) -> bool;

    /// Equality that treats two `NaN`s as equal.
    fn is_eq(self, other: Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }

    /// Decodes a value from exactly `PTYPE.byte_width()` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;

    /// Appends the little-endian bytes of this value to `out`.
    fn extend_le_bytes(self, out: &mut Vec<u8>);

    /// Wraps this value in a dynamically typed [`PValue`].
    fn into_pvalue(self) -> PValue;

    /// Wraps a vector of values in a dynamically typed [`PValues`].
    fn into_pvalues(values: Vec<Self>) -> PValues;

    /// Borrows the values of `values` when they hold exactly this type.
    fn try_as_slice(values: &PValues) -> Option<&[Self]>;
}

macro_rules! native_ptype {
    ($T:ty, $ptype:ident, int) => {
        native_ptype!($T, $ptype, <$T>::MAX, |_v: $T| false);
    };
    ($T:ty, $ptype:ident, float) => {
        native_ptype!($T, $ptype, <$T>::NAN, |v: $T| v.is_nan());
    };
    ($T:ty, $ptype:ident, $pad:expr, $is_nan:expr) => {
        impl NativePType for $T {
            const PTYPE: PType = PType::$ptype;

            #[inline]
            fn pad_value() -> Self {
                $pad
            }

            #[inline]
            fn is_nan(self) -> bool {
                ($is_nan)(self)
            }

            fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                Some(<$T>::from_le_bytes(bytes.try_into().ok()?))
            }

            fn extend_le_bytes(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn into_pvalue(self) -> PValue {
                PValue::$ptype(self)
            }

            fn into_pvalues(values: Vec<Self>) -> PValues {
                PValues::$ptype(values)
            }

            fn try_as_slice(values: &PValues) -> Option<&[Self]> {
                match values {
                    PValues::$ptype(v) => Some(v.as_slice()),
                    _ => None,
                }
            }
        }
    };
}

native_ptype!(u8, U8, int);
native_ptype!(u16, U16, int);
native_ptype!(u32, U32, int);
native_ptype!(u64, U64, int);
native_ptype!(i8, I8, int);
native_ptype!(i16, I16, int);
native_ptype!(i32, I32, int);
native_ptype!(i64, I64, int);
native_ptype!(f32, F32, float);
native_ptype!(f64, F64, float);
