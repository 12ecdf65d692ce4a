use std::cell::Cell;
use std::collections::HashMap;

use ragged_array::{Attributes, DATATYPE_ATTR, RaggedArray};
use ragged_dtype::{NativePType, PValue, PValues};
use ragged_error::{RaggedResult, ragged_bail, ragged_err};

use crate::{BufferSlot, DataType, DatasetReader, EncodedArray, RowWindow};
use crate::{cumulative_length_name, flattened_data_name};

#[derive(Debug, Clone)]
enum Dataset {
    Scalar(PValue),
    Array(PValues),
}

/// An in-memory [`DatasetReader`], laid out the same way a file-backed store would be.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    datasets: HashMap<String, Dataset>,
    attrs: HashMap<String, Attributes>,
    reads: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of dataset reads served so far.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn write_array<T: NativePType>(&mut self, name: impl Into<String>, values: &[T]) {
        let name = name.into();
        self.datasets
            .insert(name.clone(), Dataset::Array(T::into_pvalues(values.to_vec())));
        self.set_datatype(name, DataType::Array);
    }

    pub fn write_scalar<T: NativePType>(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        self.datasets
            .insert(name.clone(), Dataset::Scalar(value.into_pvalue()));
        self.set_datatype(name, DataType::Scalar);
    }

    /// Merges `attrs` into the attributes stored on `name`.
    pub fn write_attrs(&mut self, name: impl Into<String>, attrs: &Attributes) {
        let stored = self.attrs.entry(name.into()).or_default();
        for (key, value) in attrs.iter() {
            stored.insert(key, value);
        }
    }

    /// Writes the entries of `array` as its two flat datasets plus its attributes.
    pub fn write_ragged<T: NativePType>(&mut self, name: &str, array: &RaggedArray<T>) {
        let (flattened_data, cumulative_length) = array.clone().into_parts();
        let cumulative_length: Vec<u64> =
            cumulative_length.into_iter().map(|end| end as u64).collect();
        self.write_array(flattened_data_name(name), &flattened_data);
        self.write_array(cumulative_length_name(name), &cumulative_length);
        self.write_attrs(name, array.attrs());
        self.set_datatype(name, DataType::VectorOfVectors);
    }

    pub fn write_encoded(&mut self, name: &str, array: &EncodedArray) {
        let decoded_size_name = format!("{name}/decoded_size");
        match array {
            EncodedArray::EqualSized(array) => {
                self.write_scalar(decoded_size_name, array.decoded_size());
            }
            EncodedArray::Vectors(array) => {
                self.write_array(decoded_size_name, array.decoded_size());
            }
        }
        self.write_ragged(&format!("{name}/encoded_data"), array.encoded_data());
        self.write_attrs(name, array.attrs());
        self.set_datatype(name, array.datatype());
    }

    fn set_datatype(&mut self, name: impl Into<String>, datatype: DataType) {
        self.attrs
            .entry(name.into())
            .or_default()
            .insert(DATATYPE_ATTR, datatype.to_string());
    }

    fn dataset(&self, name: &str) -> RaggedResult<&Dataset> {
        self.reads.set(self.reads.get() + 1);
        self.datasets
            .get(name)
            .ok_or_else(|| ragged_err!(NotFound: "no dataset named '{}'", name))
    }

    fn array(&self, name: &str) -> RaggedResult<&PValues> {
        match self.dataset(name)? {
            Dataset::Array(values) => Ok(values),
            Dataset::Scalar(_) => {
                ragged_bail!(MismatchedTypes: DataType::Array, DataType::Scalar)
            }
        }
    }
}

impl DatasetReader for MemoryStore {
    fn dataset_len(&self, name: &str) -> RaggedResult<usize> {
        Ok(self.array(name)?.len())
    }

    fn read_array_into<T: NativePType>(
        &self,
        name: &str,
        window: &RowWindow,
        mut out: BufferSlot<'_, Vec<T>>,
    ) -> RaggedResult<usize> {
        let values = self.array(name)?;
        let selection = window.select(values.len())?;
        out.reserve(selection.len())?;
        let start = out.start;
        for (k, row) in selection.iter().enumerate() {
            out.buf[start + k] = values.get_as::<T>(row)?;
        }
        log::trace!("read {} rows of '{}'", selection.len(), name);
        Ok(selection.len())
    }

    fn read_scalar<T: NativePType>(&self, name: &str) -> RaggedResult<T> {
        match self.dataset(name)? {
            Dataset::Scalar(value) => value.cast::<T>(),
            Dataset::Array(_) => {
                ragged_bail!(MismatchedTypes: DataType::Scalar, DataType::Array)
            }
        }
    }

    fn read_attrs(&self, name: &str) -> RaggedResult<Attributes> {
        self.attrs
            .get(name)
            .cloned()
            .ok_or_else(|| ragged_err!(NotFound: "no object named '{}'", name))
    }
}

#[cfg(test)]
mod tests {
    use ragged_error::RaggedError;

    use super::*;

    #[test]
    fn arrays_and_scalars() {
        let mut store = MemoryStore::new();
        store.write_array("a", &[1u32, 2, 3, 4]);
        store.write_scalar("s", 7u16);

        assert_eq!(store.read_array::<u64>("a", &RowWindow::range(1, 2)).unwrap(), vec![2, 3]);
        assert_eq!(store.read_scalar::<u64>("s").unwrap(), 7);
        assert_eq!(store.read_count(), 2);
        assert!(matches!(
            store.read_scalar::<u64>("a").unwrap_err(),
            RaggedError::MismatchedTypes(..)
        ));
        assert!(matches!(
            store.read_array::<u8>("missing", &RowWindow::all()).unwrap_err(),
            RaggedError::NotFound(..)
        ));
    }

    #[test]
    fn datatype_attrs_are_recorded() {
        let mut store = MemoryStore::new();
        store.write_scalar("s", 1.5f64);
        let ragged: RaggedArray<i32> = [vec![1], vec![2, 3]].into_iter().collect();
        store.write_ragged("r", &ragged);
        assert_eq!(store.read_attrs("s").unwrap().get(DATATYPE_ATTR), Some("real"));
        assert_eq!(
            store.read_attrs("r").unwrap().get(DATATYPE_ATTR),
            Some("array<1>{array<1>{real}}")
        );
    }

    #[test]
    fn ragged_windows() {
        let mut store = MemoryStore::new();
        let mut ragged: RaggedArray<i32> = [vec![1, 2], vec![3], vec![], vec![4, 5, 6]]
            .into_iter()
            .collect();
        ragged.attrs_mut().insert("units", "adc");
        store.write_ragged("r", &ragged);

        assert_eq!(store.read_ragged::<i32>("r", &RowWindow::all()).unwrap(), ragged);

        let tail = store.read_ragged::<i32>("r", &RowWindow::range(1, 3)).unwrap();
        assert_eq!(tail.cumulative_length(), &[1, 1, 4]);
        assert_eq!(tail.get(2).unwrap(), &[4, 5, 6]);

        let picked = store
            .read_ragged::<i64>("r", &RowWindow::with_indices(vec![3, 0]))
            .unwrap();
        assert_eq!(picked.get(0).unwrap(), &[4, 5, 6]);
        assert_eq!(picked.get(1).unwrap(), &[1, 2]);

        let empty = store.read_ragged::<i32>("r", &RowWindow::range(9, 2)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn ragged_into_offset_buffer() {
        let mut store = MemoryStore::new();
        let ragged: RaggedArray<u8> = [vec![7u8], vec![8, 9]].into_iter().collect();
        store.write_ragged("r", &ragged);

        let mut out: RaggedArray<u8> = [vec![1u8, 1]].into_iter().collect();
        let rows = store
            .read_ragged_into("r", &RowWindow::all(), BufferSlot::new(&mut out).at(1))
            .unwrap();
        assert_eq!(rows, 2);
        assert_eq!(out.cumulative_length(), &[2, 3, 5]);
        assert_eq!(out.get(2).unwrap(), &[8, 9]);

        let mut short: RaggedArray<u8> = [vec![1u8]].into_iter().collect();
        assert!(matches!(
            store
                .read_ragged_into("r", &RowWindow::all(), BufferSlot::new(&mut short).fixed())
                .unwrap_err(),
            RaggedError::BufferTooSmall(..)
        ));
    }
}
