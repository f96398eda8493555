//! Benchmark helper utilities for blo-rs
//!
//! This module generates synthetic CFS records and BLO archives shaped like
//! the game's character sheets, so the benchmarks run without game data.

use blo_types::file::{
	blo::FileBuilder,
	cfs::{Encoder, Layout, Palette},
};

/// Generates a sprite frame of `width × height` palette indices.
///
/// The pattern mixes transparent runs, solid runs and shadow indices in
/// roughly the proportions of real character art.
pub fn generate_frame_pixels(width: u16, height: u16, seed: u32) -> Vec<u8> {
	let (width, height) = (u32::from(width), u32::from(height));
	let mut pixels = Vec::with_capacity((width * height) as usize);

	for y in 0..height {
		// an elliptical silhouette, transparent outside
		let dy = (2 * y) as i64 - height as i64;
		for x in 0..width {
			let dx = (2 * x) as i64 - width as i64;
			let inside = dx * dx * i64::from(height * height) + dy * dy * i64::from(width * width)
				< i64::from(width * width) * i64::from(height * height);
			let index = if !inside {
				0
			} else if (x + y + seed) % 23 == 0 {
				// sparse shadow pixels above max_solid_index
				240
			} else {
				(1 + (x / 4 + y / 3 + seed) % 200) as u8
			};
			pixels.push(index);
		}
	}

	pixels
}

/// Generates a CFS record with `rows × columns` frames.
pub fn generate_cfs_data(layout: Layout, size: u16, rows: u16, columns: u16, compressed: bool) -> Vec<u8> {
	let palette = Palette::from_slice(&(0..256u32).map(|i| 0xFF00_0000 | i * 0x0001_0101).collect::<Vec<_>>());
	let mut encoder = Encoder::new(layout, size, size)
		.grid(rows, columns)
		.animation_time(100)
		.light_shadow(32, 8)
		.max_solid_index(220)
		.palette(palette);
	if !compressed {
		encoder = encoder.uncompressed();
	}

	let frame_size = size - size / 4;
	for i in 0..u32::from(rows) * u32::from(columns) {
		let width = frame_size as i16;
		// every other frame is stored mirrored
		let width = if i % 2 == 0 {
			width
		} else {
			-width
		};
		encoder =
			encoder.frame(size / 8, size / 8, width, frame_size as i16, generate_frame_pixels(frame_size, frame_size, i));
	}

	encoder.build()
}

/// Generates a version 2 BLO archive holding `sprites` identical records.
pub fn generate_blo_data(sprites: usize, size: u16) -> Vec<u8> {
	let record = generate_cfs_data(Layout::V4, size, 8, 8, true);
	let mut builder = FileBuilder::new(2);
	for i in 0..sprites {
		builder.push(format!("walk_{i:03}.cfs"), record.clone());
	}
	builder.build()
}

#[cfg(test)]
mod tests {
	use super::*;
	use blo_types::file::cfs::File;

	#[test]
	fn test_generated_records_decode() {
		for layout in [Layout::V2, Layout::V3, Layout::V4, Layout::V5] {
			for compressed in [true, false] {
				let record = File::decode("bench.cfs", &generate_cfs_data(layout, 64, 2, 4, compressed));
				assert!(!record.is_fallback());
				assert_eq!(record.frames().len(), 8);
				assert_eq!(record.frames()[1].pixels(), generate_frame_pixels(48, 48, 1).as_slice());
			}
		}
	}
}
