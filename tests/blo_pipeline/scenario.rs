//! A walking animation stored the way the game ships it.

use blo_rs::prelude::*;

fn walk_cycle() -> Vec<u8> {
	let mut palette = Palette::new();
	palette.set(5, 0xFFAA_BBCC);

	let mut encoder = Encoder::new(CfsLayout::V4, 16, 16)
		.grid(2, 4)
		.animation_time(120)
		.light_shadow(32, 8)
		.max_solid_index(255)
		.uncompressed()
		.palette(palette);
	for _ in 0..8 {
		encoder = encoder.frame(0, 0, 16, 16, vec![5; 256]);
	}

	BloFileBuilder::new(2).entry("walk_N.cfs", encoder.build()).build()
}

#[test_log::test]
fn test_walk_cycle_decodes_uniformly() {
	let archive = Archive::load("gfx_men.blo", walk_cycle()).unwrap();
	assert_eq!(archive.version(), 2);
	assert_eq!(archive.category(), Category::Graphics);

	let sprite = archive.sprite("walk_N.cfs").unwrap();
	assert!(!sprite.is_fallback());
	assert_eq!(sprite.version(), 4);
	assert_eq!(sprite.frames().len(), 8);
	assert_eq!(sprite.animation_time(), 120);
	assert_eq!(
		sprite.grid(),
		Grid {
			rows: 2,
			columns: 4
		}
	);

	let first = &sprite.frames()[0];
	assert!(sprite.frames().iter().all(|frame| frame == first));
	assert!(first.pixels().iter().all(|&index| index == 5));

	for row in 0..2 {
		for column in 0..4 {
			let index = sprite.grid().frame_index(row, column);
			assert!(!sprite.is_legacy_shadow_frame(index));
			let resolver = Resolver::for_frame(sprite, index, ColorAdjust::default());
			assert_eq!(resolver.resolve(5), Color::new(0xAA, 0xBB, 0xCC, 255));
		}
	}
}

#[test]
fn test_walk_cycle_composes_centered() {
	let archive = Archive::load("gfx_men.blo", walk_cycle()).unwrap();
	let sprite = archive.sprite("walk_N.cfs").unwrap();

	let settings = RenderSettings {
		surface_width: 64,
		surface_height: 64,
		zoom: 2.0,
		..RenderSettings::default()
	};
	let surface = compose(sprite, 1, 3, &settings);

	// 16×16 cell at 2× covers 16..48 on both axes
	assert_eq!(surface.pixel(16, 16), Some(Color::new(0xAA, 0xBB, 0xCC, 255)));
	assert_eq!(surface.pixel(47, 47), Some(Color::new(0xAA, 0xBB, 0xCC, 255)));
	assert_eq!(surface.pixel(15, 16), Some(Color::transparent()));
	assert_eq!(surface.pixel(48, 48), Some(Color::transparent()));
}

#[test]
fn test_walk_cycle_past_grid_is_blank() {
	let archive = Archive::load("gfx_men.blo", walk_cycle()).unwrap();
	let sprite = archive.sprite("walk_N.cfs").unwrap();
	let surface = compose(sprite, 2, 0, &RenderSettings::preview());
	assert!(surface.as_bytes().iter().all(|&byte| byte == 0));
}
