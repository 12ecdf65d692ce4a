#![allow(clippy::unwrap_used)]

use divan::Bencher;
use ragged_array::{RaggedArray, RaggedOptions};

fn main() {
    divan::main();
}

const ENTRY_COUNTS: &[usize] = &[1_000, 10_000, 100_000];

#[divan::bench(args = ENTRY_COUNTS)]
fn fill_presized(bencher: Bencher, entry_count: usize) {
    bencher
        .with_inputs(|| RaggedArray::<f32>::with_shape(entry_count, 16).unwrap())
        .bench_local_values(|mut array| {
            let entry = [1.0f32; 16];
            for i in 0..entry_count {
                array.set_vector(i, &entry[..i % 17]).unwrap();
            }
            array
        });
}

#[divan::bench(args = ENTRY_COUNTS)]
fn fill_growing(bencher: Bencher, entry_count: usize) {
    bencher
        .with_inputs(|| RaggedArray::<f32>::with_shape(entry_count, 0).unwrap())
        .bench_local_values(|mut array| {
            let entry = [1.0f32; 16];
            for i in 0..entry_count {
                array.set_vector(i, &entry[..i % 17]).unwrap();
            }
            array
        });
}

#[divan::bench(args = [2, 4, 8])]
fn push_with_growth_factor(bencher: Bencher, growth_factor: usize) {
    let options = RaggedOptions::default()
        .with_growth_factor(growth_factor)
        .unwrap();
    bencher.bench_local(|| {
        let mut array = RaggedArray::<u16>::with_shape(0, 0)
            .unwrap()
            .with_options(options);
        for i in 0..10_000u16 {
            array.push(&[i, i, i]);
        }
        array
    });
}

#[divan::bench]
fn to_dense(bencher: Bencher) {
    let array: RaggedArray<f64> = (0..10_000)
        .map(|i| vec![0.5f64; i % 64])
        .collect();
    bencher.bench_local(|| array.to_dense());
}
