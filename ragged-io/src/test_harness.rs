//! A trivial codec for exercising the encoded read path.

use ragged_array::{EqualSizedArray, RaggedArray};
use ragged_dtype::NativePType;
use ragged_error::{RaggedResult, ragged_bail};

use crate::{ArrayOfEncodedEqualSizedArrays, Codec, VectorOfEncodedVectors};

/// Stores every element as its little-endian bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl PlainCodec {
    pub fn encode_entry<T: NativePType>(values: &[T]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(values.len() * T::PTYPE.byte_width());
        for value in values {
            value.extend_le_bytes(&mut bytes);
        }
        bytes
    }

    pub fn encode_equal_sized<T: NativePType>(
        array: &EqualSizedArray<T>,
    ) -> ArrayOfEncodedEqualSizedArrays {
        let encoded_data: RaggedArray<u8> = array.iter().map(Self::encode_entry).collect();
        ArrayOfEncodedEqualSizedArrays::new(encoded_data, array.row_len() as u64)
            .with_attrs(array.attrs().clone())
    }

    pub fn encode_vectors<T: NativePType>(
        array: &RaggedArray<T>,
    ) -> RaggedResult<VectorOfEncodedVectors> {
        let encoded_data: RaggedArray<u8> = array.iter().map(Self::encode_entry).collect();
        let decoded_size = array.iter().map(|entry| entry.len() as u64).collect();
        Ok(VectorOfEncodedVectors::try_new(encoded_data, decoded_size)?
            .with_attrs(array.attrs().clone()))
    }
}

impl<T: NativePType> Codec<T> for PlainCodec {
    fn decode_entry(&self, encoded: &[u8], out: &mut [T]) -> RaggedResult<()> {
        let width = T::PTYPE.byte_width();
        if encoded.len() != out.len() * width {
            ragged_bail!(
                Decode: "{} bytes cannot hold {} values of type {}",
                encoded.len(),
                out.len(),
                T::PTYPE
            );
        }
        for (value, bytes) in out.iter_mut().zip(encoded.chunks_exact(width)) {
            match T::from_le_slice(bytes) {
                Some(decoded) => *value = decoded,
                None => ragged_bail!(Decode: "malformed {} value", T::PTYPE),
            }
        }
        Ok(())
    }
}
