use ragged_array::{Attributes, RaggedArray};
use ragged_dtype::NativePType;
use ragged_error::{RaggedResult, ragged_bail, ragged_err};

use crate::{BufferSlot, RowSelection, RowWindow};

/// The name of the flat data dataset of a stored ragged array.
pub fn flattened_data_name(name: &str) -> String {
    format!("{name}/flattened_data")
}

/// The name of the offset index dataset of a stored ragged array.
pub fn cumulative_length_name(name: &str) -> String {
    format!("{name}/cumulative_length")
}

/// Read access to a hierarchical store of named datasets.
///
/// A ragged array named `name` is stored as two sibling datasets, `{name}/flattened_data` and
/// `{name}/cumulative_length`, with the offset index stored as `u64`.
pub trait DatasetReader {
    /// The number of rows in the array dataset `name`.
    fn dataset_len(&self, name: &str) -> RaggedResult<usize>;

    /// Reads the rows of `name` selected by `window` into `out`, converting to `T`.
    ///
    /// Returns the number of rows read.
    fn read_array_into<T: NativePType>(
        &self,
        name: &str,
        window: &RowWindow,
        out: BufferSlot<'_, Vec<T>>,
    ) -> RaggedResult<usize>;

    fn read_scalar<T: NativePType>(&self, name: &str) -> RaggedResult<T>;

    /// The attributes stored on the object `name`.
    fn read_attrs(&self, name: &str) -> RaggedResult<Attributes>;

    fn read_array<T: NativePType>(&self, name: &str, window: &RowWindow) -> RaggedResult<Vec<T>> {
        let mut values = Vec::new();
        let rows = self.read_array_into(name, window, BufferSlot::new(&mut values))?;
        values.truncate(rows);
        Ok(values)
    }

    /// Reads the entries of the ragged array `name` selected by `window` into `out`.
    ///
    /// Entries are written in order from `out.start` with
    /// [`RaggedArray::set_vector`], so entries of `out` after the window are left as they were.
    fn read_ragged_into<T: NativePType>(
        &self,
        name: &str,
        window: &RowWindow,
        mut out: BufferSlot<'_, RaggedArray<T>>,
    ) -> RaggedResult<usize> {
        let cl_name = cumulative_length_name(name);
        let selection = window.select(self.dataset_len(&cl_name)?)?;

        let (bounds, element_window) = match &selection {
            RowSelection::Range(range) if range.is_empty() => (Vec::new(), None),
            RowSelection::Range(range) => {
                let first = range.start.saturating_sub(1);
                let ends: Vec<u64> =
                    self.read_array(&cl_name, &RowWindow::range(first, range.end - first))?;
                let mut bounds = entry_bounds(&ends, range.start > 0)?;
                let base = bounds.first().map_or(0, |b| b.0);
                let end = bounds.last().map_or(base, |b| b.1);
                for b in &mut bounds {
                    *b = (b.0 - base, b.1 - base);
                }
                (bounds, Some(RowWindow::range(base, end - base)))
            }
            RowSelection::Indices(rows) => {
                let ends: Vec<u64> = self.read_array(&cl_name, &RowWindow::all())?;
                let all = entry_bounds(&ends, false)?;
                let mut elements = Vec::new();
                let mut bounds = Vec::with_capacity(rows.len());
                for &row in *rows {
                    let (start, end) = all[row];
                    bounds.push((elements.len(), elements.len() + end - start));
                    elements.extend(start..end);
                }
                (bounds, Some(RowWindow::with_indices(elements)))
            }
        };

        let data: Vec<T> = match element_window {
            Some(element_window) => self.read_array(&flattened_data_name(name), &element_window)?,
            None => Vec::new(),
        };

        out.reserve(bounds.len())?;
        for (k, (start, end)) in bounds.iter().enumerate() {
            let entry = data.get(*start..*end).ok_or_else(|| {
                ragged_err!(
                    InvalidShape: "entry {} of '{}' spans {}..{} but only {} elements were read",
                    k,
                    name,
                    start,
                    end,
                    data.len()
                )
            })?;
            out.buf.set_vector(out.start + k, entry)?;
        }
        Ok(bounds.len())
    }

    /// Reads the ragged array `name`, including its attributes.
    fn read_ragged<T: NativePType>(
        &self,
        name: &str,
        window: &RowWindow,
    ) -> RaggedResult<RaggedArray<T>> {
        let mut array = RaggedArray::with_shape(0, 0)?;
        self.read_ragged_into(name, window, BufferSlot::new(&mut array))?;
        Ok(array.with_attrs(self.read_attrs(name)?.without_datatype()))
    }
}

/// Converts stored end offsets into `(start, end)` pairs.
///
/// With `leading` the first offset only provides the start of the second.
fn entry_bounds(ends: &[u64], leading: bool) -> RaggedResult<Vec<(usize, usize)>> {
    let ends = ends
        .iter()
        .map(|&end| {
            usize::try_from(end)
                .map_err(|_| ragged_err!(InvalidShape: "offset {} does not fit in memory", end))
        })
        .collect::<RaggedResult<Vec<_>>>()?;

    let (mut previous, ends) = match (leading, ends.split_first()) {
        (true, Some((&first, rest))) => (first, rest),
        _ => (0, ends.as_slice()),
    };
    let mut bounds = Vec::with_capacity(ends.len());
    for &end in ends {
        if end < previous {
            ragged_bail!(
                InvalidShape: "cumulative_length decreases from {} to {}",
                previous,
                end
            );
        }
        bounds.push((previous, end));
        previous = end;
    }
    Ok(bounds)
}
