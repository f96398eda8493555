//! Palette index to RGBA resolution.
//!
//! Resolution order for a single index:
//!
//! 1. Index 0 is transparent, whatever the palette holds.
//! 2. A palette color with a zero alpha byte is treated as opaque.
//! 3. Indices above `max_solid_index` are shadow pixels, attenuated in four
//!    bands by their distance from the threshold.
//! 4. Pixels of a legacy shadow frame are darkened to 30% at half opacity.
//! 5. Everything else is opaque, optionally shifted in HSV space.

use serde::{Deserialize, Serialize};

use crate::file::cfs::{Color, Palette, SpriteRecord};

/// Shadow bands as `(upper bound of level / range, RGB factor, alpha)`.
const SHADOW_BANDS: [(f64, f64, u8); 4] = [(0.25, 0.8, 192), (0.5, 0.6, 128), (0.75, 0.4, 96), (1.0, 0.2, 64)];

/// RGB factor applied to legacy shadow frames.
const LEGACY_SHADOW_FACTOR: f64 = 0.3;

/// Alpha of legacy shadow frame pixels.
const LEGACY_SHADOW_ALPHA: u8 = 128;

/// Hue, saturation and value adjustment applied to opaque pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorAdjust {
	/// Hue rotation in degrees
	pub hue_shift: f64,
	/// Saturation delta on a 0-100 scale
	pub saturation: f64,
	/// Value delta on a 0-100 scale
	pub value: f64,
}

impl ColorAdjust {
	/// Creates an adjustment.
	pub fn new(hue_shift: f64, saturation: f64, value: f64) -> Self {
		Self {
			hue_shift,
			saturation,
			value,
		}
	}

	/// Returns `true` when the adjustment leaves colors unchanged.
	#[inline]
	pub fn is_identity(&self) -> bool {
		self.hue_shift == 0.0 && self.saturation == 0.0 && self.value == 0.0
	}

	/// Applies the adjustment to an opaque color.
	pub fn apply(&self, color: Color) -> Color {
		let r = f64::from(color.r) / 255.0;
		let g = f64::from(color.g) / 255.0;
		let b = f64::from(color.b) / 255.0;

		let max = r.max(g).max(b);
		let min = r.min(g).min(b);
		let delta = max - min;

		let mut h = 0.0;
		let mut s = 0.0;
		let v = max;
		if delta != 0.0 {
			s = delta / max;
			h = if r == max {
				((g - b) / delta) % 6.0
			} else if g == max {
				(b - r) / delta + 2.0
			} else {
				(r - g) / delta + 4.0
			};
			h *= 60.0;
			if h < 0.0 {
				h += 360.0;
			}
		}

		h = (h + self.hue_shift) % 360.0;
		if h < 0.0 {
			h += 360.0;
		}
		let s = (s + self.saturation / 100.0).clamp(0.0, 1.0);
		let v = (v + self.value / 100.0).clamp(0.0, 1.0);

		let c = v * s;
		let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
		let m = v - c;
		let (r, g, b) = match h {
			h if h < 60.0 => (c, x, 0.0),
			h if h < 120.0 => (x, c, 0.0),
			h if h < 180.0 => (0.0, c, x),
			h if h < 240.0 => (0.0, x, c),
			h if h < 300.0 => (x, 0.0, c),
			_ => (c, 0.0, x),
		};

		let channel = |value: f64| ((value + m) * 255.0).round() as u8;
		Color::new(channel(r), channel(g), channel(b), color.a)
	}
}

fn scale(color: Color, factor: f64, alpha: u8) -> Color {
	let channel = |value: u8| (f64::from(value) * factor).floor() as u8;
	Color::new(channel(color.r), channel(color.g), channel(color.b), alpha)
}

/// Resolves one palette index.
///
/// # Arguments
///
/// * `index` - Palette index of the pixel
/// * `palette` - Palette of the sprite
/// * `max_solid_index` - Highest fully opaque index
/// * `adjust` - HSV adjustment for opaque pixels
/// * `legacy_shadow` - Whether the pixel belongs to a legacy shadow frame
pub fn resolve(index: u8, palette: &Palette, max_solid_index: u8, adjust: &ColorAdjust, legacy_shadow: bool) -> Color {
	if index == 0 {
		return Color::transparent();
	}

	let color = palette.color(index);

	if index > max_solid_index {
		let range = f64::from(255 - max_solid_index);
		let level = f64::from(index - max_solid_index);
		let (factor, alpha) = SHADOW_BANDS
			.iter()
			.find(|(bound, _, _)| level <= range * bound)
			.map_or((0.2, 64), |&(_, factor, alpha)| (factor, alpha));
		return scale(color, factor, alpha);
	}

	if legacy_shadow {
		return scale(color, LEGACY_SHADOW_FACTOR, LEGACY_SHADOW_ALPHA);
	}

	let opaque = Color {
		a: 255,
		..color
	};
	if adjust.is_identity() {
		opaque
	} else {
		adjust.apply(opaque)
	}
}

/// Color resolver bound to one frame of a sprite.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
	palette: &'a Palette,
	max_solid_index: u8,
	adjust: ColorAdjust,
	legacy_shadow: bool,
}

impl<'a> Resolver<'a> {
	/// Creates a resolver for frame `frame_index` of `sprite`.
	pub fn for_frame(sprite: &'a SpriteRecord, frame_index: usize, adjust: ColorAdjust) -> Self {
		Self {
			palette: sprite.palette(),
			max_solid_index: sprite.max_solid_index(),
			adjust,
			legacy_shadow: sprite.is_legacy_shadow_frame(frame_index),
		}
	}

	/// Creates a resolver that draws every non-zero index opaque, unadjusted.
	pub fn plain(palette: &'a Palette) -> Self {
		Self {
			palette,
			max_solid_index: u8::MAX,
			adjust: ColorAdjust::default(),
			legacy_shadow: false,
		}
	}

	/// Resolves one palette index.
	#[inline]
	pub fn resolve(&self, index: u8) -> Color {
		resolve(index, self.palette, self.max_solid_index, &self.adjust, self.legacy_shadow)
	}

	/// Resolves a whole plane into packed RGBA bytes.
	pub fn resolve_plane(&self, pixels: &[u8]) -> Vec<u8> {
		let mut rgba = Vec::with_capacity(pixels.len() * 4);
		for &index in pixels {
			rgba.extend_from_slice(&self.resolve(index).to_array());
		}
		rgba
	}
}
