//! End-to-end tests for `blo-rs`: container bytes in, composited pixels out.

use blo_rs::prelude::*;

mod library;
mod render;
mod scenario;

/// Palette with a handful of recognizable colors.
pub(crate) fn test_palette() -> Palette {
	let mut palette = Palette::new();
	palette.set(1, 0xFFFF_0000);
	palette.set(2, 0xFF00_FF00);
	palette.set(3, 0xFF00_00FF);
	palette.set(5, 0xFFAA_BBCC);
	palette.set(6, 0xFF64_C8FA);
	palette
}

/// A V4 record with one frame per entry of `frames`, each `width × height`.
pub(crate) fn sprite_bytes(width: u16, height: u16, grid: (u16, u16), frames: &[Vec<u8>]) -> Vec<u8> {
	let mut encoder = Encoder::new(CfsLayout::V4, width, height)
		.grid(grid.0, grid.1)
		.max_solid_index(200)
		.palette(test_palette());
	for pixels in frames {
		encoder = encoder.frame(0, 0, width as i16, height as i16, pixels.clone());
	}
	encoder.build()
}
