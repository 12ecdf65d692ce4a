mod builder;

use std::fmt::{Display, Formatter};

pub use builder::*;
use itertools::Itertools;
use ragged_dtype::{NativePType, PType};
use ragged_error::{RaggedResult, ragged_bail};

use crate::offsets::{entry_bounds, entry_lengths, total_length, validate_cumulative_length};
use crate::{Attributes, RaggedOptions};

/// A sequence of variable-length entries stored in two flat buffers.
///
/// `flattened_data` holds the entries back to back and `cumulative_length[i]` is the exclusive
/// end offset of entry `i` within it. The physical length of `flattened_data` may exceed the
/// logical length `cumulative_length[last]`; the slack is reused by later writes.
///
/// A valid array satisfies:
/// - `cumulative_length` is non-decreasing,
/// - `cumulative_length[last] <= flattened_data.len()`,
/// - entry `i` is exactly `flattened_data[cumulative_length[i - 1]..cumulative_length[i]]`.
///
/// Views returned by [`get`](Self::get) and [`iter`](Self::iter) borrow the array, so they cannot
/// be held across [`set_vector`](Self::set_vector), which may reallocate the flat buffer.
#[derive(Debug, Clone)]
pub struct RaggedArray<T> {
    flattened_data: Vec<T>,
    cumulative_length: Vec<usize>,
    attrs: Attributes,
    options: RaggedOptions,
}

impl<T: NativePType> RaggedArray<T> {
    /// Creates an array from buffers that already satisfy the offset invariants.
    pub fn try_new(flattened_data: Vec<T>, cumulative_length: Vec<usize>) -> RaggedResult<Self> {
        validate_cumulative_length(&cumulative_length)?;
        let used = total_length(&cumulative_length);
        if used > flattened_data.len() {
            ragged_bail!(
                InvalidShape: "cumulative_length ends at {} but flattened_data only holds {} elements",
                used,
                flattened_data.len()
            );
        }

        Ok(Self {
            flattened_data,
            cumulative_length,
            attrs: Attributes::default(),
            options: RaggedOptions::default(),
        })
    }

    /// Creates `entry_count` empty entries, pre-sizing the flat buffer for entries of roughly
    /// `avg_entry_len` elements.
    pub fn with_shape(entry_count: usize, avg_entry_len: usize) -> RaggedResult<Self> {
        Self::builder()
            .shape_guess(entry_count, avg_entry_len)
            .build()
    }

    pub fn builder() -> RaggedArrayBuilder<T> {
        RaggedArrayBuilder::default()
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_options(mut self, options: RaggedOptions) -> Self {
        self.options = options;
        self
    }

    /// The number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.cumulative_length.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cumulative_length.is_empty()
    }

    pub fn ptype(&self) -> PType {
        T::PTYPE
    }

    pub fn cumulative_length(&self) -> &[usize] {
        &self.cumulative_length
    }

    /// The whole flat buffer, including any unused slack past the last entry.
    pub fn flattened_data(&self) -> &[T] {
        &self.flattened_data
    }

    /// The number of flat elements allocated, used or not.
    pub fn physical_len(&self) -> usize {
        self.flattened_data.len()
    }

    /// The number of flat elements covered by entries.
    pub fn logical_len(&self) -> usize {
        total_length(&self.cumulative_length)
    }

    pub fn entry_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        entry_lengths(&self.cumulative_length)
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    pub fn options(&self) -> &RaggedOptions {
        &self.options
    }

    /// The storage datatype string of this array.
    pub fn datatype(&self) -> String {
        format!(
            "array<1>{{array<1>{{{}}}}}",
            T::PTYPE.element_type_name()
        )
    }

    /// Returns entry `index`.
    ///
    /// An entry left with out-of-order offsets by a longer [`set_vector`](Self::set_vector) on a
    /// previous entry reads as empty until it is rewritten.
    pub fn get(&self, index: usize) -> RaggedResult<&[T]> {
        if index >= self.len() {
            ragged_bail!(OutOfBounds: index, 0, self.len());
        }
        Ok(self.entry(index))
    }

    /// Iterates over the entries in order, with the same view of each entry as [`get`](Self::get).
    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.len()).map(|index| self.entry(index))
    }

    fn entry(&self, index: usize) -> &[T] {
        self.flattened_data
            .get(entry_bounds(&self.cumulative_length, index))
            .unwrap_or_default()
    }

    /// Overwrites entry `index` with `values`.
    ///
    /// The entry starts where entry `index - 1` ends. When `values` does not fit in the flat
    /// buffer, the buffer is grown by the configured growth factor until it does. Entries after
    /// `index` are not shifted: writing a different length leaves them pointing at their old
    /// offsets, so callers filling an array in order should write each entry after its
    /// predecessor.
    pub fn set_vector(&mut self, index: usize, values: &[T]) -> RaggedResult<()> {
        if index >= self.len() {
            ragged_bail!(OutOfBounds: index, 0, self.len());
        }
        self.write_entry(index, values);
        Ok(())
    }

    /// Appends a new entry after the current last one.
    pub fn push(&mut self, values: &[T]) {
        let index = self.len();
        self.resize(index + 1);
        self.write_entry(index, values);
    }

    /// Truncates or extends the offset index to `entry_count` entries.
    ///
    /// New entries are empty. The flat buffer is left untouched, so shrinking frees no memory.
    pub fn resize(&mut self, entry_count: usize) {
        let end = self.logical_len();
        self.cumulative_length.resize(entry_count, end);
    }

    /// Releases the two buffers, trimming the flat buffer to its logical length.
    pub fn into_parts(mut self) -> (Vec<T>, Vec<usize>) {
        let used = self.logical_len();
        self.flattened_data.truncate(used);
        (self.flattened_data, self.cumulative_length)
    }

    fn write_entry(&mut self, index: usize, values: &[T]) {
        let start = entry_bounds(&self.cumulative_length, index).start;
        let end = start + values.len();

        if end > self.flattened_data.len() {
            let grown = self.options.grown_len(self.flattened_data.len(), end);
            log::trace!(
                "growing flattened_data from {} to {} elements to fit entry {}",
                self.flattened_data.len(),
                grown,
                index
            );
            self.flattened_data.resize(grown, T::default());
        }

        self.flattened_data[start..end].copy_from_slice(values);
        self.cumulative_length[index] = end;
    }
}

impl<T: NativePType, I: IntoIterator<Item = T>> FromIterator<I> for RaggedArray<T> {
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        let mut flattened_data = Vec::new();
        let mut cumulative_length = Vec::new();
        for entry in iter {
            flattened_data.extend(entry);
            cumulative_length.push(flattened_data.len());
        }
        Self {
            flattened_data,
            cumulative_length,
            attrs: Attributes::default(),
            options: RaggedOptions::default(),
        }
    }
}

impl<T: NativePType> PartialEq for RaggedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cumulative_length == other.cumulative_length
            && self.flattened_data[..self.logical_len()]
                == other.flattened_data[..other.logical_len()]
            && self.attrs == other.attrs
    }
}

impl<T: NativePType> Display for RaggedArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.iter()
                .format_with(", ", |entry, f| f(&format_args!("[{}]", entry.iter().join(", "))))
        )?;
        let attrs = self.attrs.without_datatype();
        if !attrs.is_empty() {
            write!(f, " with attrs={attrs}")?;
        }
        Ok(())
    }
}
