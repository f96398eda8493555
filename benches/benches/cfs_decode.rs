//! Benchmark suite for CFS sprite decoding
//!
//! This benchmark measures RLE decompression, whole-record decoding and
//! compositing, the hot paths when a container is opened and previewed.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use std::hint::black_box;

use blo_benches::{generate_blo_data, generate_cfs_data, generate_frame_pixels};
use blo_types::{
	archive::Archive,
	file::cfs::{File, Layout, decode_rle, encode_rle},
	render::{RenderSettings, compose_frame, thumbnail},
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Benchmark scanline RLE decompression of a single plane
fn bench_rle(c: &mut Criterion) {
	let mut group = c.benchmark_group("cfs_rle");

	for size in [32u16, 128, 512] {
		let pixels = generate_frame_pixels(size, size, 7);
		let encoded = encode_rle(&pixels, usize::from(size), usize::from(size));
		let count = usize::from(size) * usize::from(size);

		group.throughput(Throughput::Elements(count as u64));
		group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
			let mut plane = vec![0u8; count];
			b.iter(|| {
				plane.fill(0);
				decode_rle(black_box(encoded), 0, usize::from(size), usize::from(size), &mut plane);
				black_box(&plane);
			});
		});
		group.bench_with_input(BenchmarkId::new("encode", size), &pixels, |b, pixels| {
			b.iter(|| black_box(encode_rle(black_box(pixels), usize::from(size), usize::from(size))));
		});
	}

	group.finish();
}

/// Benchmark whole-record decoding across header layouts
fn bench_record(c: &mut Criterion) {
	let mut group = c.benchmark_group("cfs_record");

	for layout in [Layout::V2, Layout::V4, Layout::V5] {
		for compressed in [true, false] {
			let data = generate_cfs_data(layout, 128, 4, 8, compressed);
			let label = format!("{layout}_{}", if compressed { "rle" } else { "raw" });

			group.throughput(Throughput::Bytes(data.len() as u64));
			group.bench_with_input(BenchmarkId::new("decode", label), &data, |b, data| {
				b.iter(|| black_box(File::decode("bench.cfs", black_box(data))));
			});
		}
	}

	group.finish();
}

/// Benchmark loading a full container
fn bench_archive(c: &mut Criterion) {
	let mut group = c.benchmark_group("blo_archive");

	for sprites in [4usize, 32] {
		let data = generate_blo_data(sprites, 96);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("load", sprites), &data, |b, data| {
			b.iter(|| black_box(Archive::load("bench.blo", black_box(data.clone()))));
		});
	}

	group.finish();
}

/// Benchmark compositing and thumbnails
fn bench_render(c: &mut Criterion) {
	let mut group = c.benchmark_group("cfs_render");
	let record = File::decode("bench.cfs", &generate_cfs_data(Layout::V4, 128, 2, 4, true));

	for zoom in [1.0, 2.0, 5.0] {
		let settings = RenderSettings {
			zoom,
			..RenderSettings::default()
		};
		group.bench_with_input(BenchmarkId::new("compose_frame", zoom), &settings, |b, settings| {
			b.iter(|| black_box(compose_frame(&record, black_box(3), settings)));
		});
	}

	group.bench_function("thumbnail", |b| {
		b.iter(|| black_box(thumbnail(black_box(&record), 70)));
	});

	group.finish();
}

criterion_group!(benches, bench_rle, bench_record, bench_archive, bench_render);
criterion_main!(benches);
