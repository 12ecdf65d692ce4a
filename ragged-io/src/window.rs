use std::ops::Range;

use itertools::Either;
use ragged_array::{EqualSizedArray, RaggedArray};
use ragged_dtype::NativePType;
use ragged_error::{RaggedResult, ragged_bail};

/// The rows of a dataset a read should return.
///
/// Without `indices` the window is the contiguous run `start_row..start_row + n_rows`. With
/// `indices` the window selects `indices[start_row..start_row + n_rows]`, each of which must be a
/// valid row. In both cases `n_rows` is clamped to what is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWindow {
    pub start_row: usize,
    pub n_rows: usize,
    pub indices: Option<Vec<usize>>,
}

impl Default for RowWindow {
    fn default() -> Self {
        Self {
            start_row: 0,
            n_rows: usize::MAX,
            indices: None,
        }
    }
}

impl RowWindow {
    /// Every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn range(start_row: usize, n_rows: usize) -> Self {
        Self {
            start_row,
            n_rows,
            indices: None,
        }
    }

    pub fn with_indices(indices: Vec<usize>) -> Self {
        Self {
            indices: Some(indices),
            ..Self::default()
        }
    }

    /// Resolves the window against a dataset holding `available` rows.
    pub fn select(&self, available: usize) -> RaggedResult<RowSelection<'_>> {
        match &self.indices {
            None => {
                let start = self.start_row.min(available);
                let end = start.saturating_add(self.n_rows).min(available);
                Ok(RowSelection::Range(start..end))
            }
            Some(indices) => {
                let start = self.start_row.min(indices.len());
                let end = start.saturating_add(self.n_rows).min(indices.len());
                let selected = &indices[start..end];
                if let Some(&row) = selected.iter().find(|&&row| row >= available) {
                    ragged_bail!(OutOfBounds: row, 0, available);
                }
                Ok(RowSelection::Indices(selected))
            }
        }
    }
}

/// A [`RowWindow`] resolved against a concrete dataset length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSelection<'a> {
    Range(Range<usize>),
    Indices(&'a [usize]),
}

impl RowSelection<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Range(range) => range.len(),
            Self::Indices(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        match self {
            Self::Range(range) => Either::Left(range.clone()),
            Self::Indices(indices) => Either::Right(indices.iter().copied()),
        }
    }
}

/// A row-addressable output buffer that reads can grow.
pub trait RowBuffer {
    fn row_count(&self) -> usize;

    /// Extends the buffer to exactly `rows` rows.
    fn grow_rows(&mut self, rows: usize) -> RaggedResult<()>;
}

impl<T: NativePType> RowBuffer for Vec<T> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn grow_rows(&mut self, rows: usize) -> RaggedResult<()> {
        self.resize(rows, T::default());
        Ok(())
    }
}

impl<T: NativePType> RowBuffer for RaggedArray<T> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn grow_rows(&mut self, rows: usize) -> RaggedResult<()> {
        self.resize(rows);
        Ok(())
    }
}

impl<T: NativePType> RowBuffer for EqualSizedArray<T> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn grow_rows(&mut self, rows: usize) -> RaggedResult<()> {
        self.resize(rows, T::pad_value())
    }
}

/// A caller supplied destination for a read: rows land in `buf` starting at row `start`.
///
/// When `grow` is false a buffer that is too short is an error instead of being extended.
#[derive(Debug)]
pub struct BufferSlot<'a, B> {
    pub buf: &'a mut B,
    pub start: usize,
    pub grow: bool,
}

impl<'a, B: RowBuffer> BufferSlot<'a, B> {
    pub fn new(buf: &'a mut B) -> Self {
        Self {
            buf,
            start: 0,
            grow: true,
        }
    }

    pub fn at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.grow = false;
        self
    }

    /// Makes room for `rows` rows after `start`.
    pub fn reserve(&mut self, rows: usize) -> RaggedResult<()> {
        let required = self.start + rows;
        let available = self.buf.row_count();
        if available >= required {
            return Ok(());
        }
        if !self.grow {
            ragged_bail!(
                BufferTooSmall: "{} rows are needed from row {} but the buffer holds {}",
                rows,
                self.start,
                available
            );
        }
        log::trace!("growing output buffer from {available} to {required} rows");
        self.buf.grow_rows(required)
    }
}
