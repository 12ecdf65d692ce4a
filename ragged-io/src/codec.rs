use ragged_array::{EqualSizedArray, RaggedArray};
use ragged_dtype::NativePType;
use ragged_error::{ContextExt, RaggedResult, ragged_bail, ragged_err};

use crate::{ArrayOfEncodedEqualSizedArrays, Decoded, EncodedArray, VectorOfEncodedVectors};

/// Decodes the byte strings of an [`EncodedArray`] into elements of `T`.
///
/// Implementors only decode one entry at a time; whole-array decoding is built on top of
/// [`decode_entry`](Self::decode_entry).
pub trait Codec<T: NativePType> {
    /// Decodes one encoded entry into `out`, which has exactly the entry's decoded length.
    fn decode_entry(&self, encoded: &[u8], out: &mut [T]) -> RaggedResult<()>;

    fn decode(&self, encoded: &EncodedArray) -> RaggedResult<Decoded<T>> {
        match encoded {
            EncodedArray::EqualSized(array) => {
                let row_len = decoded_len(array.decoded_size())?;
                let mut dense = EqualSizedArray::new(array.len(), row_len, T::default())?
                    .with_attrs(array.attrs().clone());
                self.decode_equal_sized_into(array, &mut dense, 0)?;
                Ok(Decoded::Dense(dense))
            }
            EncodedArray::Vectors(array) => {
                let mut total = 0;
                for &size in array.decoded_size() {
                    total += decoded_len(size)?;
                }
                let mut ragged = RaggedArray::builder()
                    .shape_guess(array.len(), 0)
                    .flattened_data(vec![T::default(); total])
                    .attrs(array.attrs().clone())
                    .build()?;
                self.decode_vectors_into(array, &mut ragged, 0)?;
                Ok(Decoded::Ragged(ragged))
            }
        }
    }

    /// Decodes every entry of `encoded` into the rows of `out` starting at `start_row`.
    fn decode_equal_sized_into(
        &self,
        encoded: &ArrayOfEncodedEqualSizedArrays,
        out: &mut EqualSizedArray<T>,
        start_row: usize,
    ) -> RaggedResult<()> {
        let row_len = decoded_len(encoded.decoded_size())?;
        if out.row_len() != row_len {
            ragged_bail!(
                LengthMismatch: "entries decode to {} elements but the output rows hold {}",
                row_len,
                out.row_len()
            );
        }
        let rows = out.rows_mut(start_row..start_row + encoded.len())?;
        if row_len == 0 {
            return Ok(());
        }
        for (i, (entry, row)) in encoded
            .encoded_data()
            .iter()
            .zip(rows.chunks_exact_mut(row_len))
            .enumerate()
        {
            self.decode_entry(entry, row)
                .with_context(|| format!("decoding entry {i}"))?;
        }
        Ok(())
    }

    /// Decodes every entry of `encoded` into `out` starting at entry `start_row`.
    ///
    /// Entries are decoded one at a time through a reused scratch buffer and written with
    /// [`RaggedArray::set_vector`].
    fn decode_vectors_into(
        &self,
        encoded: &VectorOfEncodedVectors,
        out: &mut RaggedArray<T>,
        start_row: usize,
    ) -> RaggedResult<()> {
        if start_row + encoded.len() > out.len() {
            ragged_bail!(OutOfBounds: start_row + encoded.len(), 0, out.len());
        }
        let mut scratch = Vec::new();
        for (i, (entry, &size)) in encoded
            .encoded_data()
            .iter()
            .zip(encoded.decoded_size())
            .enumerate()
        {
            scratch.clear();
            scratch.resize(decoded_len(size)?, T::default());
            self.decode_entry(entry, &mut scratch)
                .with_context(|| format!("decoding entry {i}"))?;
            out.set_vector(start_row + i, &scratch)?;
        }
        Ok(())
    }
}

fn decoded_len(size: u64) -> RaggedResult<usize> {
    usize::try_from(size)
        .map_err(|_| ragged_err!(InvalidShape: "decoded size {} does not fit in memory", size))
}
