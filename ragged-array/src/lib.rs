//! Ragged arrays stored as a pair of flat, contiguous buffers.
//!
//! A [`RaggedArray`] holds an ordered sequence of variable-length entries in one
//! `flattened_data` buffer, with a `cumulative_length` index whose `i`-th value is the exclusive
//! end offset of entry `i`. The [`offsets`] module contains the pure algorithms that move between
//! grouped labels, cumulative lengths and exploded per-element arrays, and [`EqualSizedArray`] is
//! the padded dense form produced by [`RaggedArray::to_dense`].

pub use attrs::*;
pub use dense::*;
pub use options::*;
pub use ragged::*;

mod attrs;
mod dense;
pub mod offsets;
mod options;
mod ragged;
