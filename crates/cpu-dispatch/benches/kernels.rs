// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the dispatched operations, one series per tier the
//! running processor supports.

use cpu_dispatch::Dispatcher;
use cpu_features::{capabilities, SimdTier};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tensor_core::{Matrix, Vector};

const LENGTHS: [usize; 3] = [1 << 10, 1 << 14, 1 << 18];

fn dispatchers() -> Vec<(SimdTier, Dispatcher)> {
    let caps = capabilities();
    caps.tiers()
        .into_iter()
        .map(|tier| (tier, Dispatcher::with_capabilities(caps.capped(tier))))
        .collect()
}

fn bench_saturating_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_u8");
    for n in LENGTHS {
        let a: Vector<u8> = Vector::from_slice(n, 1, &(0..n).map(|i| i as u8).collect::<Vec<_>>()).unwrap();
        let b: Vector<u8> = Vector::filled(n, 1, 200).unwrap();
        let mut out: Vector<u8> = Vector::with_shape(n, 1).unwrap();
        group.throughput(Throughput::Bytes(n as u64));
        for (tier, d) in dispatchers() {
            group.bench_with_input(BenchmarkId::new(tier.as_str(), n), &n, |bench, _| {
                bench.iter(|| {
                    d.add(black_box(&a), black_box(&b), &mut out).unwrap();
                });
            });
        }
    }
    group.finish();
}

fn bench_convert_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_scale_i32_f32");
    for n in LENGTHS {
        let a: Vector<i32> = Vector::from_slice(n, 1, &(0..n as i32).collect::<Vec<_>>()).unwrap();
        let mut out: Vector<f32> = Vector::with_shape(n, 1).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        for (tier, d) in dispatchers() {
            group.bench_with_input(BenchmarkId::new(tier.as_str(), n), &n, |bench, _| {
                bench.iter(|| {
                    d.convert_scale(black_box(&a), 0.5f32, &mut out).unwrap();
                });
            });
        }
    }
    group.finish();
}

fn bench_row_sums(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_sums_f32");
    for side in [64usize, 256, 1024] {
        let a: Matrix<f32> = Matrix::filled(side, side, 1, 0.5).unwrap();
        let mut acc: Vector<f32> = Vector::filled(side, 1, 0.0).unwrap();
        group.throughput(Throughput::Elements((side * side) as u64));
        for (tier, d) in dispatchers() {
            group.bench_with_input(BenchmarkId::new(tier.as_str(), side), &side, |bench, _| {
                bench.iter(|| {
                    d.row_sums(black_box(&a), &mut acc).unwrap();
                });
            });
        }
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose_u8");
    for side in [64usize, 256, 1024] {
        let data: Vec<u8> = (0..side * side).map(|i| (i * 7) as u8).collect();
        let a: Matrix<u8> = Matrix::from_slice(side, side, 1, &data).unwrap();
        let mut b: Matrix<u8> = Matrix::with_shape(side, side, 1).unwrap();
        group.throughput(Throughput::Bytes((side * side) as u64));
        for (tier, d) in dispatchers() {
            group.bench_with_input(BenchmarkId::new(tier.as_str(), side), &side, |bench, _| {
                bench.iter(|| {
                    d.transpose(black_box(&a), &mut b).unwrap();
                });
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_saturating_add,
    bench_convert_scale,
    bench_row_sums,
    bench_transpose
);
criterion_main!(benches);
