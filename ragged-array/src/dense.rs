use std::fmt::{Display, Formatter};
use std::ops::Range;

use itertools::Itertools;
use ragged_dtype::NativePType;
use ragged_error::{RaggedResult, ragged_bail};

use crate::offsets::entry_lengths;
use crate::{Attributes, RaggedArray};

/// A row-major rectangle of `len() * row_len()` values.
#[derive(Debug, Clone)]
pub struct EqualSizedArray<T> {
    values: Vec<T>,
    rows: usize,
    row_len: usize,
    attrs: Attributes,
}

impl<T: NativePType> EqualSizedArray<T> {
    /// Creates `rows` rows of `row_len` copies of `fill`.
    pub fn new(rows: usize, row_len: usize, fill: T) -> RaggedResult<Self> {
        let Some(total) = rows.checked_mul(row_len) else {
            ragged_bail!(InvalidShape: "{} rows of length {} overflow", rows, row_len);
        };
        Ok(Self {
            values: vec![fill; total],
            rows,
            row_len,
            attrs: Attributes::default(),
        })
    }

    /// Wraps row-major `values`, which must hold exactly `rows * row_len` elements.
    pub fn try_new(values: Vec<T>, rows: usize, row_len: usize) -> RaggedResult<Self> {
        if rows.checked_mul(row_len) != Some(values.len()) {
            ragged_bail!(
                InvalidShape: "{} values do not form {} rows of length {}",
                values.len(),
                rows,
                row_len
            );
        }
        Ok(Self {
            values,
            rows,
            row_len,
            attrs: Attributes::default(),
        })
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// The number of rows, including rows of a zero-width array.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row_len(&self) -> usize {
        self.row_len
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    pub fn row(&self, index: usize) -> RaggedResult<&[T]> {
        let range = self.row_range(index..index + 1)?;
        Ok(&self.values[range])
    }

    pub fn row_mut(&mut self, index: usize) -> RaggedResult<&mut [T]> {
        let range = self.row_range(index..index + 1)?;
        Ok(&mut self.values[range])
    }

    /// The contiguous values backing `rows`, row-major.
    pub fn rows_mut(&mut self, rows: Range<usize>) -> RaggedResult<&mut [T]> {
        let range = self.row_range(rows)?;
        Ok(&mut self.values[range])
    }

    /// Truncates or extends to `rows` rows, filling new rows with `fill`.
    pub fn resize(&mut self, rows: usize, fill: T) -> RaggedResult<()> {
        let Some(total) = rows.checked_mul(self.row_len) else {
            ragged_bail!(InvalidShape: "{} rows of length {} overflow", rows, self.row_len);
        };
        self.values.resize(total, fill);
        self.rows = rows;
        Ok(())
    }

    /// The storage datatype string of this array.
    pub fn datatype(&self) -> String {
        format!(
            "array_of_equalsized_arrays<1,1>{{{}}}",
            T::PTYPE.element_type_name()
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(|row| &self.values[row * self.row_len..(row + 1) * self.row_len])
    }

    fn row_range(&self, rows: Range<usize>) -> RaggedResult<Range<usize>> {
        if rows.start > rows.end || rows.end > self.rows {
            ragged_bail!(OutOfBounds: rows.end.saturating_sub(1).max(rows.start), 0, self.rows);
        }
        Ok(rows.start * self.row_len..rows.end * self.row_len)
    }
}

impl<T: NativePType> PartialEq for EqualSizedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.row_len == other.row_len
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.is_eq(*b))
            && self.attrs == other.attrs
    }
}

impl<T: NativePType> Display for EqualSizedArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.iter()
                .format_with(", ", |row, f| f(&format_args!("[{}]", row.iter().join(", "))))
        )?;
        let attrs = self.attrs.without_datatype();
        if !attrs.is_empty() {
            write!(f, " with attrs={attrs}")?;
        }
        Ok(())
    }
}

impl<T: NativePType> RaggedArray<T> {
    /// Pads every entry to the longest entry length with [`NativePType::pad_value`].
    pub fn to_dense(&self) -> EqualSizedArray<T> {
        self.to_dense_with(T::pad_value())
    }

    /// Pads every entry to the longest entry length with `fill`.
    pub fn to_dense_with(&self, fill: T) -> EqualSizedArray<T> {
        let row_len = entry_lengths(self.cumulative_length())
            .max()
            .unwrap_or(0);
        let mut values = Vec::with_capacity(self.len() * row_len);
        for entry in self.iter() {
            values.extend_from_slice(entry);
            values.extend(std::iter::repeat_n(fill, row_len.saturating_sub(entry.len())));
        }
        EqualSizedArray {
            values,
            rows: self.len(),
            row_len,
            attrs: self.attrs().clone(),
        }
    }
}
