//! Element types for ragged arrays.
//!
//! Ragged arrays are generic over a fixed-width numeric element type. [`PType`] is the runtime
//! tag for those types, [`NativePType`] ties a Rust primitive to its tag, and [`PValue`] /
//! [`PValues`] hold dynamically typed scalars and flat arrays for storage collaborators.

pub use ptype::*;
pub use pvalue::*;

mod ptype;
mod pvalue;
