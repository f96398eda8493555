//! Decoding and compositing across record variants.

use blo_rs::prelude::*;

use crate::{sprite_bytes, test_palette};

#[test]
fn test_compressed_and_uncompressed_agree() {
	let pixels: Vec<u8> = (0..12u8 * 9).map(|i| if i % 7 == 0 { 0 } else { i % 4 }).collect();
	let compressed = sprite_bytes(12, 9, (1, 1), &[pixels.clone()]);
	let uncompressed = Encoder::new(CfsLayout::V4, 12, 9)
		.max_solid_index(200)
		.palette(test_palette())
		.uncompressed()
		.frame(0, 0, 12, 9, pixels.clone())
		.build();

	let a = SpriteRecord::decode("a.cfs", &compressed);
	let b = SpriteRecord::decode("b.cfs", &uncompressed);
	assert_eq!(a.frames()[0].pixels(), pixels.as_slice());
	assert_eq!(a.frames(), b.frames());
}

#[test]
fn test_mirrored_frames_display_as_drawn() {
	let pixels = vec![1, 2, 3, 0, 0, 0];
	for (width, height) in [(3i16, 2i16), (-3, 2), (3, -2), (-3, -2)] {
		for layout in [CfsLayout::V2, CfsLayout::V3, CfsLayout::V4, CfsLayout::V5] {
			let bytes = Encoder::new(layout, 8, 8)
				.max_solid_index(200)
				.palette(test_palette())
				.frame(1, 1, width, height, pixels.clone())
				.build();
			let sprite = SpriteRecord::decode("m.cfs", &bytes);
			assert_eq!(sprite.frames()[0].pixels(), pixels.as_slice(), "{layout} {width}x{height}");

			let cell = compose_cell(&sprite, 0, ColorAdjust::default()).unwrap();
			assert_eq!(cell.pixel(1, 1), Some(Color::rgb(255, 0, 0)));
			assert_eq!(cell.pixel(3, 1), Some(Color::rgb(0, 0, 255)));
			assert_eq!(cell.pixel(1, 2), Some(Color::transparent()));
		}
	}
}

#[test]
fn test_legacy_shadow_frames_darken() {
	// a 1×2 grid with 8 shadow frames: frames 2 and up are shadows
	let mut encoder = Encoder::new(CfsLayout::V3, 4, 4)
		.grid(1, 2)
		.light_shadow(0, 8)
		.max_solid_index(255)
		.palette(test_palette());
	for _ in 0..4 {
		encoder = encoder.frame(0, 0, 2, 2, vec![6; 4]);
	}
	let sprite = SpriteRecord::decode("shadow.cfs", &encoder.build());
	assert_eq!(sprite.frames().len(), 4);

	let solid = compose_cell(&sprite, 1, ColorAdjust::default()).unwrap();
	assert_eq!(solid.pixel(0, 0), Some(Color::new(100, 200, 250, 255)));

	let shadow = compose_cell(&sprite, 2, ColorAdjust::default()).unwrap();
	assert_eq!(shadow.pixel(0, 0), Some(Color::new(30, 60, 75, 128)));
}

#[test]
fn test_hue_shift_only_touches_opaque_pixels() {
	let bytes = Encoder::new(CfsLayout::V5, 2, 1)
		.max_solid_index(200)
		.palette({
			let mut palette = test_palette();
			palette.set(220, 0xFF64_6464);
			palette
		})
		.frame(0, 0, 2, 1, vec![1, 220])
		.build();
	let sprite = SpriteRecord::decode("tint.cfs", &bytes);
	let adjust = ColorAdjust::new(120.0, 0.0, 0.0);

	let cell = compose_cell(&sprite, 0, adjust).unwrap();
	assert_eq!(cell.pixel(0, 0), Some(Color::rgb(0, 255, 0)));
	// index 220 falls in the second shadow band: 0.6 factor, alpha 128
	assert_eq!(cell.pixel(1, 0), Some(Color::new(60, 60, 60, 128)));
}

#[test]
fn test_thumbnails_for_every_sprite() {
	let container = BloFileBuilder::new(1)
		.entry("tank.cfs", sprite_bytes(20, 10, (0, 0), &[vec![1; 200]]))
		.entry("broken.cfs", vec![0xFF; 64])
		.build();
	let archive = Archive::load("vehicles.blo", container).unwrap();

	let thumbs: Vec<_> = archive.sprites().iter().map(|sprite| thumbnail(sprite, 40)).collect();
	assert_eq!(thumbs.len(), 2);

	// 20×10 fits as 40×20, centered vertically
	assert_eq!(thumbs[0].pixel(0, 10), Some(Color::rgb(255, 0, 0)));
	assert_eq!(thumbs[0].pixel(0, 9), Some(Color::rgb(0x1E, 0x1E, 0x1E)));
	assert_eq!(thumbs[0].pixel(39, 29), Some(Color::rgb(255, 0, 0)));
	assert_eq!(thumbs[0].pixel(39, 30), Some(Color::rgb(0x1E, 0x1E, 0x1E)));

	// the placeholder draws its greyscale ramp
	assert!(archive.sprites()[1].is_fallback());
	assert_eq!(thumbs[1].width(), 40);
}
