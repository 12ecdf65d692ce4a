#![cfg(test)]

use ragged_array::{Attributes, EqualSizedArray, RaggedArray};
use ragged_error::RaggedError;
use ragged_io::test_harness::PlainCodec;
use ragged_io::{
    ArrayOfEncodedEqualSizedArrays, DataObject, DataType, EncodedArray, MemoryStore,
    ObjectBuffer, RowWindow, VectorOfEncodedVectors, read_encoded, read_encoded_object,
};
use rstest::{fixture, rstest};

fn units(value: &str) -> Attributes {
    [("units", value)].into_iter().collect()
}

fn waveforms() -> EqualSizedArray<f32> {
    EqualSizedArray::try_new((1..=12).map(|v| v as f32).collect(), 4, 3)
        .unwrap()
        .with_attrs(units("adc"))
}

fn hits() -> RaggedArray<i32> {
    let hits: RaggedArray<i32> = [vec![1, 2], vec![3], vec![], vec![4, 5, 6]]
        .into_iter()
        .collect();
    hits.with_attrs(units("ns"))
}

#[fixture]
fn store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.write_encoded(
        "waveforms",
        &PlainCodec::encode_equal_sized(&waveforms()).into(),
    );
    store.write_encoded(
        "hits",
        &PlainCodec::encode_vectors(&hits()).unwrap().into(),
    );
    store.write_ragged("plain", &hits());
    store.write_encoded(
        "blank",
        &PlainCodec::encode_equal_sized(&EqualSizedArray::new(2, 0, 0.0f32).unwrap()).into(),
    );
    store
}

#[rstest]
fn rejects_non_encoded_kinds(store: MemoryStore) {
    let err = read_encoded::<i32, _, _>(
        DataType::VectorOfVectors,
        "plain",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, RaggedError::UnsupportedType(..)));
    assert_eq!(store.read_count(), 0);
}

#[rstest]
#[case::decoded_buffer_without_decode(
    DataType::VectorOfEncodedVectors,
    false,
    DataObject::Ragged(RaggedArray::from_iter([vec![0]]))
)]
#[case::encoded_buffer_with_decode(
    DataType::VectorOfEncodedVectors,
    true,
    DataObject::Encoded(VectorOfEncodedVectors::empty().into())
)]
#[case::other_encoded_kind(
    DataType::VectorOfEncodedVectors,
    false,
    DataObject::Encoded(
        ArrayOfEncodedEqualSizedArrays::new(RaggedArray::with_shape(0, 0).unwrap(), 0).into()
    )
)]
#[case::ragged_buffer_for_dense(
    DataType::ArrayOfEncodedEqualSizedArrays,
    true,
    DataObject::Ragged(RaggedArray::from_iter([vec![0]]))
)]
fn buffer_type_checked_before_reading(
    store: MemoryStore,
    #[case] kind: DataType,
    #[case] decode: bool,
    #[case] buffer: DataObject<i32>,
) {
    let name = match kind {
        DataType::ArrayOfEncodedEqualSizedArrays => "waveforms",
        _ => "hits",
    };
    let err = read_encoded(
        kind,
        name,
        &store,
        &PlainCodec,
        &RowWindow::all(),
        decode,
        Some(ObjectBuffer::new(buffer)),
    )
    .unwrap_err();
    assert!(matches!(err, RaggedError::BufferTypeMismatch(..)));
    assert_eq!(store.read_count(), 0);
}

#[rstest]
fn reads_encoded_without_decoding(store: MemoryStore) {
    let (object, rows) = read_encoded::<f32, _, _>(
        DataType::ArrayOfEncodedEqualSizedArrays,
        "waveforms",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        false,
        None,
    )
    .unwrap();
    assert_eq!(rows, 4);
    let expected: EncodedArray = PlainCodec::encode_equal_sized(&waveforms()).into();
    assert_eq!(object, DataObject::Encoded(expected));
}

#[rstest]
fn fills_encoded_buffer_from_offset(store: MemoryStore) {
    let mut buffer = VectorOfEncodedVectors::empty();
    buffer.resize(1);
    let (object, rows) = read_encoded::<i32, _, _>(
        DataType::VectorOfEncodedVectors,
        "hits",
        &store,
        &PlainCodec,
        &RowWindow::range(2, 10),
        false,
        Some(ObjectBuffer::new(EncodedArray::from(buffer)).at(1)),
    )
    .unwrap();
    assert_eq!(rows, 2);

    let Some(EncodedArray::Vectors(filled)) = object.as_encoded() else {
        panic!("expected the caller's buffer back, got {object}");
    };
    assert_eq!(filled.len(), 3);
    assert_eq!(filled.decoded_size(), &[0, 0, 3]);
    assert!(filled.encoded_data().get(1).unwrap().is_empty());
    assert_eq!(
        filled.encoded_data().get(2).unwrap(),
        PlainCodec::encode_entry(&[4, 5, 6]).as_slice()
    );
}

#[rstest]
fn fills_equal_sized_encoded_buffer(store: MemoryStore) {
    let buffer = ArrayOfEncodedEqualSizedArrays::new(RaggedArray::with_shape(0, 0).unwrap(), 0);
    let (object, rows) = read_encoded::<f32, _, _>(
        DataType::ArrayOfEncodedEqualSizedArrays,
        "waveforms",
        &store,
        &PlainCodec,
        &RowWindow::with_indices(vec![3, 1]),
        false,
        Some(ObjectBuffer::new(EncodedArray::from(buffer))),
    )
    .unwrap();
    assert_eq!(rows, 2);
    let Some(EncodedArray::EqualSized(filled)) = object.as_encoded() else {
        panic!("expected the caller's buffer back, got {object}");
    };
    assert_eq!(filled.decoded_size(), 3);
    assert_eq!(
        filled.encoded_data().get(0).unwrap(),
        PlainCodec::encode_entry(&[10.0f32, 11.0, 12.0]).as_slice()
    );
}

#[rstest]
fn decodes_into_new_objects(store: MemoryStore) {
    let (dense, rows) = read_encoded::<f32, _, _>(
        DataType::ArrayOfEncodedEqualSizedArrays,
        "waveforms",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        None,
    )
    .unwrap();
    assert_eq!(rows, 4);
    assert_eq!(dense, DataObject::Dense(waveforms()));

    let (ragged, rows) = read_encoded::<i32, _, _>(
        DataType::VectorOfEncodedVectors,
        "hits",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        None,
    )
    .unwrap();
    assert_eq!(rows, 4);
    assert_eq!(ragged, DataObject::Ragged(hits()));
}

#[rstest]
fn decodes_window_into_dense_buffer(store: MemoryStore) {
    let buffer = EqualSizedArray::new(1, 3, 0.0f32).unwrap();
    let (object, rows) = read_encoded(
        DataType::ArrayOfEncodedEqualSizedArrays,
        "waveforms",
        &store,
        &PlainCodec,
        &RowWindow::range(2, 2),
        true,
        Some(ObjectBuffer::new(buffer).at(1)),
    )
    .unwrap();
    assert_eq!(rows, 2);

    let dense = object.as_dense().unwrap();
    assert_eq!(dense.len(), 3);
    assert_eq!(dense.row(0).unwrap(), &[0.0, 0.0, 0.0]);
    assert_eq!(dense.row(1).unwrap(), &[7.0, 8.0, 9.0]);
    assert_eq!(dense.row(2).unwrap(), &[10.0, 11.0, 12.0]);
}

#[rstest]
fn decodes_into_empty_dense_buffer(store: MemoryStore) {
    let buffer = EqualSizedArray::new(0, 0, 0.0f32).unwrap();
    let (object, rows) = read_encoded(
        DataType::ArrayOfEncodedEqualSizedArrays,
        "waveforms",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        Some(ObjectBuffer::new(buffer)),
    )
    .unwrap();
    assert_eq!(rows, 4);
    assert_eq!(object.as_dense().unwrap().values(), waveforms().values());
}

#[rstest]
#[case::new_object(None)]
#[case::empty_buffer(Some(ObjectBuffer::new(EqualSizedArray::new(0, 0, 0.0f32).unwrap())))]
fn decodes_zero_width_rows(store: MemoryStore, #[case] buffer: Option<ObjectBuffer<f32>>) {
    let (object, rows) = read_encoded(
        DataType::ArrayOfEncodedEqualSizedArrays,
        "blank",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        buffer,
    )
    .unwrap();
    assert_eq!(rows, 2);

    let dense = object.as_dense().unwrap();
    assert_eq!(dense.len(), 2);
    assert_eq!(dense.row_len(), 0);
    assert!(dense.values().is_empty());
}

#[rstest]
fn decodes_window_into_ragged_buffer(store: MemoryStore) {
    let buffer: RaggedArray<i32> = [vec![9, 9]].into_iter().collect();
    let (object, rows) = read_encoded(
        DataType::VectorOfEncodedVectors,
        "hits",
        &store,
        &PlainCodec,
        &RowWindow::range(1, 2),
        true,
        Some(ObjectBuffer::new(buffer).at(1)),
    )
    .unwrap();
    assert_eq!(rows, 2);

    let ragged = object.as_ragged().unwrap();
    assert_eq!(ragged.len(), 3);
    assert_eq!(ragged.get(0).unwrap(), &[9, 9]);
    assert_eq!(ragged.get(1).unwrap(), &[3]);
    assert!(ragged.get(2).unwrap().is_empty());
}

#[rstest]
fn dispatches_on_stored_datatype(store: MemoryStore) {
    let (object, rows) = read_encoded_object::<i32, _, _>(
        "hits",
        &store,
        &PlainCodec,
        &RowWindow::with_indices(vec![3]),
        true,
        None,
    )
    .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(object.as_ragged().unwrap().get(0).unwrap(), &[4, 5, 6]);

    let err = read_encoded_object::<i32, _, _>(
        "plain",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, RaggedError::UnsupportedType(..)));
}

#[test]
fn codec_errors_carry_the_entry() {
    let mut store = MemoryStore::new();
    let encoded = VectorOfEncodedVectors::try_new(
        [vec![0u8, 0, 0, 0], vec![1u8, 2, 3]].into_iter().collect(),
        vec![1, 1],
    )
    .unwrap();
    store.write_encoded("broken", &encoded.into());

    let err = read_encoded::<i32, _, _>(
        DataType::VectorOfEncodedVectors,
        "broken",
        &store,
        &PlainCodec,
        &RowWindow::all(),
        true,
        None,
    )
    .unwrap_err();
    match err {
        RaggedError::Context(msg, source) => {
            assert_eq!(&*msg, "decoding entry 1");
            assert!(matches!(*source, RaggedError::Decode(..)));
        }
        other => panic!("expected context, got {other}"),
    }
}
