//! Reading ragged and encoded arrays from hierarchical storage.
//!
//! Storage is reached through the [`DatasetReader`] trait and decompression through the
//! [`Codec`] trait; neither is implemented here beyond the in-memory [`MemoryStore`]. The entry
//! point for compressed data is [`read_encoded`], which returns an encoded array either as stored
//! or decoded, optionally filling a caller supplied buffer.

pub use codec::*;
pub use datatype::*;
pub use encoded::*;
pub use memory::*;
pub use read::*;
pub use window::*;

mod codec;
mod datatype;
mod encoded;
mod memory;
mod read;
#[cfg(feature = "test-harness")]
pub mod test_harness;
mod window;
