//! Algorithms over cumulative length offset indices.
//!
//! A cumulative length array `cl` describes `cl.len()` runs (entries) where run `i` spans
//! `cl[i - 1]..cl[i]` (starting at 0 for the first run). These functions convert between such
//! an index, the grouped labels it was built from, and per-element ("exploded") arrays.

use std::iter;
use std::ops::Range;

use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_bail};

/// Per-entry lengths: the first difference of `cumulative_length` with an implicit leading 0.
///
/// An entry whose end precedes its start (see [`validate_cumulative_length`]) has length 0.
pub fn entry_lengths(cumulative_length: &[usize]) -> impl Iterator<Item = usize> + '_ {
    iter::once(&0)
        .chain(cumulative_length)
        .tuple_windows()
        .map(|(start, end)| end.saturating_sub(*start))
}

/// The flat range covered by entry `index`.
///
/// ## Panics
///
/// Panics if `index >= cumulative_length.len()`.
#[inline]
pub(crate) fn entry_bounds(cumulative_length: &[usize], index: usize) -> Range<usize> {
    let start = index.checked_sub(1).map_or(0, |prev| cumulative_length[prev]);
    start..cumulative_length[index]
}

/// The total number of flat elements described by `cumulative_length`.
#[inline]
pub fn total_length(cumulative_length: &[usize]) -> usize {
    cumulative_length.last().copied().unwrap_or(0)
}

/// Checks that `cumulative_length` is monotonically non-decreasing.
pub fn validate_cumulative_length(cumulative_length: &[usize]) -> RaggedResult<()> {
    if let Some((i, (prev, next))) = cumulative_length
        .iter()
        .tuple_windows()
        .find_position(|(prev, next)| next < prev)
    {
        ragged_bail!(
            InvalidShape: "cumulative_length decreases at index {} ({} < {})",
            i + 1,
            next,
            prev
        );
    }
    Ok(())
}

/// Builds a cumulative length array from labels in which equal values are contiguous.
///
/// Each run of equal labels becomes one entry whose value is the running element count at the
/// end of the run, e.g. `[3, 3, 3, 4]` becomes `[3, 4]`. Returns `None` for empty input.
pub fn build_cumulative_length<L: PartialEq>(sorted_labels: &[L]) -> Option<Vec<usize>> {
    let (first, rest) = sorted_labels.split_first()?;

    let mut cumulative_length = Vec::new();
    let mut prev = first;
    let mut end = 1;
    for label in rest {
        if label != prev {
            cumulative_length.push(end);
            prev = label;
        }
        end += 1;
    }
    cumulative_length.push(end);

    Some(cumulative_length)
}

/// Like [`build_cumulative_length`], writing into a pre-allocated `out`.
///
/// Returns the number of runs written, so the valid output is `out[..runs]`, or `None` for empty
/// input. `out` never needs to be longer than `sorted_labels`.
pub fn build_cumulative_length_into<L: PartialEq>(
    sorted_labels: &[L],
    out: &mut [usize],
) -> RaggedResult<Option<usize>> {
    let Some((first, rest)) = sorted_labels.split_first() else {
        return Ok(None);
    };

    let mut run = 0;
    let mut prev = first;
    let mut end = 1;
    for label in rest {
        if label != prev {
            if run + 1 >= out.len() {
                ragged_bail!(
                    BufferTooSmall: "cumulative_length output has {} slots but the labels contain more runs",
                    out.len()
                );
            }
            out[run] = end;
            run += 1;
            prev = label;
        }
        end += 1;
    }
    if run >= out.len() {
        ragged_bail!(
            BufferTooSmall: "cumulative_length output has {} slots but the labels contain more runs",
            out.len()
        );
    }
    out[run] = end;

    Ok(Some(run + 1))
}

/// Expands a cumulative length array into one run index per flat element.
///
/// `[2, 3]` becomes `[0, 0, 1]`. This inverts [`build_cumulative_length`] for indices without
/// empty entries.
pub fn explode_cumulative_length(cumulative_length: &[usize]) -> RaggedResult<Vec<usize>> {
    let mut out = vec![0; total_length(cumulative_length)];
    explode_cumulative_length_into(cumulative_length, &mut out)?;
    Ok(out)
}

/// Like [`explode_cumulative_length`], writing into `out`, whose length must equal the last
/// value of `cumulative_length` (or 0 when it is empty).
pub fn explode_cumulative_length_into(
    cumulative_length: &[usize],
    out: &mut [usize],
) -> RaggedResult<()> {
    validate_cumulative_length(cumulative_length)?;
    check_output_len(cumulative_length, out.len())?;

    let mut start = 0;
    for (run, &end) in cumulative_length.iter().enumerate() {
        out[start..end].fill(run);
        start = end;
    }
    Ok(())
}

/// Expands per-entry `values` into one value per flat element.
///
/// `explode([2, 3], [3, 4])` is `[3, 3, 4]`. `values` must have one element per entry.
pub fn explode<T: Clone>(cumulative_length: &[usize], values: &[T]) -> RaggedResult<Vec<T>> {
    check_values_len(cumulative_length, values.len())?;
    validate_cumulative_length(cumulative_length)?;

    let mut out = Vec::with_capacity(total_length(cumulative_length));
    for (value, len) in values.iter().zip(entry_lengths(cumulative_length)) {
        out.extend(iter::repeat_n(value.clone(), len));
    }
    Ok(out)
}

/// Like [`explode`], writing into `out`, whose length must equal the last value of
/// `cumulative_length` (or 0 when it is empty).
pub fn explode_into<T: Clone>(
    cumulative_length: &[usize],
    values: &[T],
    out: &mut [T],
) -> RaggedResult<()> {
    check_values_len(cumulative_length, values.len())?;
    validate_cumulative_length(cumulative_length)?;
    check_output_len(cumulative_length, out.len())?;

    let mut start = 0;
    for (value, &end) in values.iter().zip(cumulative_length) {
        out[start..end].fill(value.clone());
        start = end;
    }
    Ok(())
}

/// Applies [`explode`] to several parallel arrays sharing one `cumulative_length`.
pub fn explode_many<T: Clone>(
    cumulative_length: &[usize],
    arrays: &[&[T]],
) -> RaggedResult<Vec<Vec<T>>> {
    arrays
        .iter()
        .map(|values| explode(cumulative_length, values))
        .collect()
}

/// Applies [`explode_into`] to several parallel arrays, pairing `arrays[i]` with `outs[i]`.
pub fn explode_many_into<T: Clone>(
    cumulative_length: &[usize],
    arrays: &[&[T]],
    outs: &mut [&mut [T]],
) -> RaggedResult<()> {
    if arrays.len() != outs.len() {
        ragged_bail!(
            LengthMismatch: "{} input arrays but {} output arrays",
            arrays.len(),
            outs.len()
        );
    }
    for (values, out) in arrays.iter().zip(outs.iter_mut()) {
        explode_into(cumulative_length, values, out)?;
    }
    Ok(())
}

fn check_values_len(cumulative_length: &[usize], values_len: usize) -> RaggedResult<()> {
    if values_len != cumulative_length.len() {
        ragged_bail!(
            LengthMismatch: "values ({}) != cumulative_length ({})",
            values_len,
            cumulative_length.len()
        );
    }
    Ok(())
}

fn check_output_len(cumulative_length: &[usize], out_len: usize) -> RaggedResult<()> {
    let expected = total_length(cumulative_length);
    if out_len != expected {
        ragged_bail!(
            LengthMismatch: "cumulative_length ends at {} but the output has {} slots",
            expected,
            out_len
        );
    }
    Ok(())
}
