use ragged_array::{DATATYPE_ATTR, EqualSizedArray};
use ragged_dtype::NativePType;
use ragged_error::{ContextExt, RaggedError, RaggedResult, ragged_bail, ragged_err};

use crate::{
    ArrayOfEncodedEqualSizedArrays, BufferSlot, Codec, DataObject, DataType, DatasetReader,
    EncodedArray, RowWindow, VectorOfEncodedVectors,
};

/// A caller supplied object that an encoded read fills from row `start` onwards.
#[derive(Debug, Clone)]
pub struct ObjectBuffer<T> {
    pub object: DataObject<T>,
    pub start: usize,
}

impl<T> ObjectBuffer<T> {
    pub fn new(object: impl Into<DataObject<T>>) -> Self {
        Self {
            object: object.into(),
            start: 0,
        }
    }

    pub fn at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }
}

/// Reads the encoded array `name` of type `kind`, optionally decoding it with `codec`.
///
/// Without `decode` the result is the still-encoded array. With `decode` it is the decoded dense
/// array (for [`DataType::ArrayOfEncodedEqualSizedArrays`]) or ragged array (for
/// [`DataType::VectorOfEncodedVectors`]).
///
/// When `buffer` is given the rows selected by `window` land in it from `buffer.start`, growing
/// it as needed, and the filled buffer is returned. Its type must match what the read produces:
/// the encoded kind itself without `decode`, or the decoded type with it. This is checked before
/// anything is read.
///
/// Returns the object together with the number of rows read.
pub fn read_encoded<T, R, C>(
    kind: DataType,
    name: &str,
    reader: &R,
    codec: &C,
    window: &RowWindow,
    decode: bool,
    buffer: Option<ObjectBuffer<T>>,
) -> RaggedResult<(DataObject<T>, usize)>
where
    T: NativePType,
    R: DatasetReader,
    C: Codec<T>,
{
    if !kind.is_encoded() {
        ragged_bail!(UnsupportedType: "'{}' is a {}, which is not an encoded type", name, kind);
    }
    if let Some(buffer) = &buffer {
        check_buffer(kind, name, decode, &buffer.object)?;
    }
    log::debug!(
        "reading {} '{}' from row {} (decode: {}, buffer: {})",
        kind,
        name,
        window.start_row,
        decode,
        buffer.is_some()
    );

    let buffer = match (decode, buffer) {
        (false, Some(buffer)) => {
            return read_into_encoded(name, reader, window, buffer);
        }
        (_, buffer) => buffer,
    };

    let decoded_size_name = format!("{name}/decoded_size");
    let encoded_data_name = format!("{name}/encoded_data");
    let encoded_data = reader.read_ragged::<u8>(&encoded_data_name, window)?;
    let rows = encoded_data.len();
    let attrs = reader.read_attrs(name)?.without_datatype();
    let encoded: EncodedArray = match kind {
        DataType::ArrayOfEncodedEqualSizedArrays => {
            let decoded_size = reader.read_scalar(&decoded_size_name)?;
            ArrayOfEncodedEqualSizedArrays::new(encoded_data, decoded_size)
                .with_attrs(attrs)
                .into()
        }
        _ => {
            let decoded_size = reader.read_array(&decoded_size_name, window)?;
            VectorOfEncodedVectors::try_new(encoded_data, decoded_size)
                .with_context(|| format!("reading '{name}'"))?
                .with_attrs(attrs)
                .into()
        }
    };

    if !decode {
        log::debug!("read {rows} encoded rows of '{name}'");
        return Ok((DataObject::Encoded(encoded), rows));
    }

    let Some(ObjectBuffer { object, start }) = buffer else {
        log::debug!("decoding {rows} rows of '{name}' into a new object");
        return Ok((codec.decode(&encoded)?.into(), rows));
    };

    log::debug!("decoding {rows} rows of '{name}' into the caller's buffer from row {start}");
    let object = match (object, &encoded) {
        (DataObject::Dense(mut dense), EncodedArray::EqualSized(array)) => {
            let row_len = usize::try_from(array.decoded_size()).map_err(|_| {
                ragged_err!(
                    InvalidShape: "decoded size {} does not fit in memory",
                    array.decoded_size()
                )
            })?;
            if dense.is_empty() && dense.row_len() != row_len {
                dense = EqualSizedArray::new(0, row_len, T::pad_value())?
                    .with_attrs(dense.attrs().clone());
            }
            BufferSlot::new(&mut dense).at(start).reserve(rows)?;
            codec.decode_equal_sized_into(array, &mut dense, start)?;
            DataObject::Dense(dense)
        }
        (DataObject::Ragged(mut ragged), EncodedArray::Vectors(array)) => {
            BufferSlot::new(&mut ragged).at(start).reserve(rows)?;
            codec.decode_vectors_into(array, &mut ragged, start)?;
            DataObject::Ragged(ragged)
        }
        (other, _) => return Err(buffer_mismatch(kind, name, decode, &other)),
    };
    Ok((object, rows))
}

/// Reads the encoded array `name`, taking its type from the stored `datatype` attribute.
pub fn read_encoded_object<T, R, C>(
    name: &str,
    reader: &R,
    codec: &C,
    window: &RowWindow,
    decode: bool,
    buffer: Option<ObjectBuffer<T>>,
) -> RaggedResult<(DataObject<T>, usize)>
where
    T: NativePType,
    R: DatasetReader,
    C: Codec<T>,
{
    let attrs = reader.read_attrs(name)?;
    let kind: DataType = attrs
        .get(DATATYPE_ATTR)
        .ok_or_else(|| ragged_err!(NotFound: "'{}' has no {} attribute", name, DATATYPE_ATTR))?
        .parse()?;
    read_encoded(kind, name, reader, codec, window, decode, buffer)
}

/// Fills a caller supplied encoded array without decoding it.
fn read_into_encoded<T: NativePType, R: DatasetReader>(
    name: &str,
    reader: &R,
    window: &RowWindow,
    buffer: ObjectBuffer<T>,
) -> RaggedResult<(DataObject<T>, usize)> {
    let ObjectBuffer { mut object, start } = buffer;
    let decoded_size_name = format!("{name}/decoded_size");
    let encoded_data_name = format!("{name}/encoded_data");

    let rows = match &mut object {
        DataObject::Encoded(EncodedArray::EqualSized(array)) => {
            array.set_decoded_size(reader.read_scalar(&decoded_size_name)?);
            reader.read_ragged_into(
                &encoded_data_name,
                window,
                BufferSlot::new(array.encoded_data_mut()).at(start),
            )?
        }
        DataObject::Encoded(EncodedArray::Vectors(array)) => {
            let (encoded_data, decoded_size) = array.parts_mut();
            reader.read_array_into(
                &decoded_size_name,
                window,
                BufferSlot::new(decoded_size).at(start),
            )?;
            reader.read_ragged_into(
                &encoded_data_name,
                window,
                BufferSlot::new(encoded_data).at(start),
            )?
        }
        other => {
            ragged_bail!(
                BufferTypeMismatch: "buffer for '{}' is a {}, not an encoded array",
                name,
                other.datatype()
            )
        }
    };
    log::debug!("read {rows} encoded rows of '{name}' into the caller's buffer");
    Ok((object, rows))
}

fn check_buffer<T: NativePType>(
    kind: DataType,
    name: &str,
    decode: bool,
    object: &DataObject<T>,
) -> RaggedResult<()> {
    let expected = if decode { kind.decoded() } else { Some(kind) };
    if expected == Some(object.datatype()) {
        Ok(())
    } else {
        Err(buffer_mismatch(kind, name, decode, object))
    }
}

fn buffer_mismatch<T: NativePType>(
    kind: DataType,
    name: &str,
    decode: bool,
    object: &DataObject<T>,
) -> RaggedError {
    let expected = if decode { kind.decoded().unwrap_or(kind) } else { kind };
    ragged_err!(
        BufferTypeMismatch: "buffer for '{}' is a {} but a {} is required",
        name,
        object.datatype(),
        expected
    )
}
