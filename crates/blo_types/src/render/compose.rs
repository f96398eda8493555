//! Frame compositing onto RGBA surfaces.
//!
//! A frame is first placed in its sprite's logical cell at
//! `(frame.x, frame.y + y_sort_adjust)`, clipped to the cell. The cell is then
//! scaled by the zoom factor and centered on the output surface with
//! nearest-neighbor sampling.

use std::fmt;

use log::debug;

use super::{
	color::{ColorAdjust, Resolver},
	settings::RenderSettings,
};
use crate::file::cfs::{Color, Frame, SpriteRecord};

/// Background of thumbnails.
pub const THUMBNAIL_BACKGROUND: Color = Color::rgb(0x1E, 0x1E, 0x1E);

/// Thumbnail of a sprite without frames.
pub const THUMBNAIL_EMPTY: Color = Color::rgb(0x33, 0x33, 0x33);

/// An RGBA8 image buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Surface {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
}

impl Surface {
	/// Creates a fully transparent surface.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			pixels: vec![0; width as usize * height as usize * 4],
		}
	}

	/// Creates a surface filled with one color.
	pub fn filled(width: u32, height: u32, color: Color) -> Self {
		let mut surface = Self::new(width, height);
		surface.fill(color);
		surface
	}

	/// Wraps packed RGBA bytes.
	///
	/// Returns `None` if `pixels` does not hold `width * height` pixels.
	pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
		(pixels.len() == width as usize * height as usize * 4).then_some(Self {
			width,
			height,
			pixels,
		})
	}

	/// Surface width in pixels.
	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Surface height in pixels.
	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Packed RGBA bytes, row-major.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		&self.pixels
	}

	/// Consumes the surface, returning its RGBA bytes.
	#[inline]
	pub fn into_raw(self) -> Vec<u8> {
		self.pixels
	}

	#[inline]
	fn offset(&self, x: u32, y: u32) -> usize {
		(y as usize * self.width as usize + x as usize) * 4
	}

	/// Color at `(x, y)`, or `None` outside the surface.
	pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let i = self.offset(x, y);
		Some(Color::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]))
	}

	/// Overwrites the pixel at `(x, y)`; ignored outside the surface.
	pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
		if x >= self.width || y >= self.height {
			return;
		}
		let i = self.offset(x, y);
		self.pixels[i..i + 4].copy_from_slice(&color.to_array());
	}

	/// Draws `color` over the pixel at `(x, y)` with source-over blending.
	pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
		match color.a {
			0 => {}
			255 => self.set_pixel(x, y, color),
			_ => {
				let Some(under) = self.pixel(x, y) else {
					return;
				};
				let sa = f32::from(color.a) / 255.0;
				let da = f32::from(under.a) / 255.0;
				let out_a = sa + da * (1.0 - sa);
				let channel = |s: u8, d: u8| {
					((f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a).round() as u8
				};
				self.set_pixel(
					x,
					y,
					Color::new(
						channel(color.r, under.r),
						channel(color.g, under.g),
						channel(color.b, under.b),
						(out_a * 255.0).round() as u8,
					),
				);
			}
		}
	}

	/// Fills the surface with one color.
	pub fn fill(&mut self, color: Color) {
		let rgba = color.to_array();
		for pixel in self.pixels.chunks_exact_mut(4) {
			pixel.copy_from_slice(&rgba);
		}
	}

	/// Copies `source` with its top-left corner at `(x, y)`, clipping to
	/// this surface.
	pub fn blit(&mut self, source: &Surface, x: i64, y: i64) {
		for sy in 0..source.height {
			let dy = y + i64::from(sy);
			if dy < 0 || dy >= i64::from(self.height) {
				continue;
			}
			for sx in 0..source.width {
				let dx = x + i64::from(sx);
				if dx < 0 || dx >= i64::from(self.width) {
					continue;
				}
				if let Some(color) = source.pixel(sx, sy) {
					self.blend_pixel(dx as u32, dy as u32, color);
				}
			}
		}
	}

	/// Draws `source` scaled into the rectangle at `(x, y)` of size
	/// `width × height`, sampling the nearest source pixel at each
	/// destination pixel center.
	pub fn draw_scaled(&mut self, source: &Surface, x: f64, y: f64, width: f64, height: f64) {
		if source.width == 0 || source.height == 0 || width <= 0.0 || height <= 0.0 {
			return;
		}

		let scale_x = width / f64::from(source.width);
		let scale_y = height / f64::from(source.height);

		let x0 = x.floor().max(0.0) as u32;
		let y0 = y.floor().max(0.0) as u32;
		let x1 = (x + width).ceil().min(f64::from(self.width)).max(0.0) as u32;
		let y1 = (y + height).ceil().min(f64::from(self.height)).max(0.0) as u32;

		for dy in y0..y1 {
			let cy = f64::from(dy) + 0.5 - y;
			if cy < 0.0 || cy >= height {
				continue;
			}
			let sy = ((cy / scale_y) as u32).min(source.height - 1);

			for dx in x0..x1 {
				let cx = f64::from(dx) + 0.5 - x;
				if cx < 0.0 || cx >= width {
					continue;
				}
				let sx = ((cx / scale_x) as u32).min(source.width - 1);
				if let Some(color) = source.pixel(sx, sy) {
					self.blend_pixel(dx, dy, color);
				}
			}
		}
	}
}

impl fmt::Display for Surface {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{} RGBA surface", self.width, self.height)
	}
}

/// Resolves a frame's palette indices into a surface of the frame's size.
pub fn resolve_frame(frame: &Frame, resolver: &Resolver<'_>) -> Surface {
	Surface {
		width: u32::from(frame.width()),
		height: u32::from(frame.height()),
		pixels: resolver.resolve_plane(frame.pixels()),
	}
}

/// Places frame `frame_index` into the sprite's logical cell.
///
/// Returns `None` if the sprite has no such frame.
pub fn compose_cell(sprite: &SpriteRecord, frame_index: usize, adjust: ColorAdjust) -> Option<Surface> {
	let frame = sprite.frame(frame_index)?;
	let resolver = Resolver::for_frame(sprite, frame_index, adjust);
	let plane = resolve_frame(frame, &resolver);

	let mut cell = Surface::new(u32::from(sprite.width()), u32::from(sprite.height()));
	let x = i64::from(frame.x());
	let y = i64::from(frame.y()) + i64::from(sprite.y_sort_adjust());
	cell.blit(&plane, x, y);
	Some(cell)
}

/// Renders frame `frame_index` of a sprite onto an output surface.
///
/// An index past the decoded frames yields a blank surface.
pub fn compose_frame(sprite: &SpriteRecord, frame_index: usize, settings: &RenderSettings) -> Surface {
	let mut surface = match settings.background_color() {
		Some(color) => Surface::filled(settings.surface_width, settings.surface_height, color),
		None => Surface::new(settings.surface_width, settings.surface_height),
	};

	let Some(cell) = compose_cell(sprite, frame_index, settings.adjust()) else {
		debug!(
			"\"{}\": frame {frame_index} not decoded ({} frames), blank surface",
			sprite.name(),
			sprite.frames().len()
		);
		return surface;
	};

	let zoom = settings.effective_zoom();
	let width = f64::from(cell.width()) * zoom;
	let height = f64::from(cell.height()) * zoom;
	let x = (f64::from(surface.width()) - width) / 2.0;
	let y = (f64::from(surface.height()) - height) / 2.0;
	surface.draw_scaled(&cell, x, y, width, height);
	surface
}

/// Renders the frame at a grid position, using the inferred grid.
pub fn compose(sprite: &SpriteRecord, row: usize, column: usize, settings: &RenderSettings) -> Surface {
	compose_frame(sprite, sprite.grid().frame_index(row, column), settings)
}

/// Renders a square preview of a sprite's first frame.
///
/// The frame is drawn with its plain palette colors, fitted and centered on a
/// dark background.
pub fn thumbnail(sprite: &SpriteRecord, size: u32) -> Surface {
	let Some(frame) = sprite.frames().first() else {
		return Surface::filled(size, size, THUMBNAIL_EMPTY);
	};

	let plane = resolve_frame(frame, &Resolver::plain(sprite.palette()));
	let mut surface = Surface::filled(size, size, THUMBNAIL_BACKGROUND);

	let size_f = f64::from(size);
	let scale = (size_f / f64::from(frame.width())).min(size_f / f64::from(frame.height()));
	let width = f64::from(frame.width()) * scale;
	let height = f64::from(frame.height()) * scale;
	surface.draw_scaled(&plane, (size_f - width) / 2.0, (size_f - height) / 2.0, width, height);
	surface
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::cfs::{Encoder, Layout, Palette};

	fn sprite(width: u16, height: u16, y_sort: u16, frames: &[(u16, u16, i16, i16, Vec<u8>)]) -> SpriteRecord {
		let mut palette = Palette::new();
		palette.set(1, 0xFFFF_0000);
		palette.set(2, 0xFF00_FF00);
		let mut encoder = Encoder::new(Layout::V4, width, height)
			.max_solid_index(200)
			.y_sort_adjust(y_sort)
			.palette(palette);
		for (x, y, w, h, pixels) in frames {
			encoder = encoder.frame(*x, *y, *w, *h, pixels.clone());
		}
		SpriteRecord::decode("test.cfs", &encoder.build())
	}

	fn settings(width: u32, height: u32, zoom: f64) -> RenderSettings {
		RenderSettings {
			surface_width: width,
			surface_height: height,
			zoom,
			..RenderSettings::default()
		}
	}

	#[test]
	fn test_cell_placement_and_clipping() {
		let sprite = sprite(4, 4, 1, &[(3, 0, 2, 2, vec![1, 2, 1, 2])]);
		let cell = compose_cell(&sprite, 0, ColorAdjust::default()).unwrap();
		assert_eq!((cell.width(), cell.height()), (4, 4));
		// y = 0 + 1, column 4 falls outside the cell
		assert_eq!(cell.pixel(3, 1), Some(Color::rgb(255, 0, 0)));
		assert_eq!(cell.pixel(3, 2), Some(Color::rgb(255, 0, 0)));
		assert_eq!(cell.pixel(2, 1), Some(Color::transparent()));
		assert_eq!(cell.pixel(3, 0), Some(Color::transparent()));
		assert_eq!(cell.pixel(3, 3), Some(Color::transparent()));
	}

	#[test]
	fn test_large_y_sort_moves_frame_below_cell() {
		let sprite = sprite(4, 4, 0xFFFA, &[(0, 0, 2, 2, vec![1; 4])]);
		assert_eq!(sprite.y_sort_adjust(), 65530);
		let cell = compose_cell(&sprite, 0, ColorAdjust::default()).unwrap();
		assert!(cell.as_bytes().iter().all(|&byte| byte == 0));
	}

	#[test]
	fn test_zoom_and_center() {
		let sprite = sprite(2, 2, 0, &[(0, 0, 2, 2, vec![1, 0, 0, 2])]);
		let surface = compose_frame(&sprite, 0, &settings(10, 10, 2.0));
		// cell is 4×4 on screen, offset (3, 3)
		assert_eq!(surface.pixel(2, 2), Some(Color::transparent()));
		assert_eq!(surface.pixel(3, 3), Some(Color::rgb(255, 0, 0)));
		assert_eq!(surface.pixel(4, 4), Some(Color::rgb(255, 0, 0)));
		assert_eq!(surface.pixel(5, 5), Some(Color::rgb(0, 255, 0)));
		assert_eq!(surface.pixel(6, 6), Some(Color::rgb(0, 255, 0)));
		assert_eq!(surface.pixel(7, 7), Some(Color::transparent()));
		assert_eq!(surface.pixel(5, 3), Some(Color::transparent()));
	}

	#[test]
	fn test_zoom_is_clamped() {
		let sprite = sprite(2, 2, 0, &[(0, 0, 2, 2, vec![1; 4])]);
		let surface = compose_frame(&sprite, 0, &settings(100, 100, 500.0));
		// 20× zoom: 40×40 cell at (30, 30)
		assert_eq!(surface.pixel(29, 50), Some(Color::transparent()));
		assert_eq!(surface.pixel(30, 50), Some(Color::rgb(255, 0, 0)));
		assert_eq!(surface.pixel(69, 50), Some(Color::rgb(255, 0, 0)));
		assert_eq!(surface.pixel(70, 50), Some(Color::transparent()));
	}

	#[test]
	fn test_missing_frame_is_blank() {
		let sprite = sprite(2, 2, 0, &[(0, 0, 2, 2, vec![1; 4])]);
		let surface = compose(&sprite, 3, 0, &settings(8, 8, 1.0));
		assert!(surface.as_bytes().iter().all(|&b| b == 0));
	}

	#[test]
	fn test_background_blending() {
		let mut surface = Surface::filled(1, 1, Color::rgb(0, 0, 0));
		surface.blend_pixel(0, 0, Color::new(200, 100, 0, 128));
		assert_eq!(surface.pixel(0, 0), Some(Color::new(100, 50, 0, 255)));

		let mut surface = Surface::new(1, 1);
		surface.blend_pixel(0, 0, Color::new(200, 100, 0, 128));
		assert_eq!(surface.pixel(0, 0), Some(Color::new(200, 100, 0, 128)));
	}

	#[test]
	fn test_thumbnail_fit() {
		let sprite = sprite(8, 8, 0, &[(0, 0, 4, 2, vec![1, 1, 1, 1, 0, 0, 0, 0])]);
		let thumb = thumbnail(&sprite, 8);
		// scale 2: 8×4 at (0, 2)
		assert_eq!(thumb.pixel(0, 0), Some(THUMBNAIL_BACKGROUND));
		assert_eq!(thumb.pixel(0, 2), Some(Color::rgb(255, 0, 0)));
		assert_eq!(thumb.pixel(7, 3), Some(Color::rgb(255, 0, 0)));
		assert_eq!(thumb.pixel(7, 4), Some(THUMBNAIL_BACKGROUND));
		assert_eq!(thumb.pixel(0, 6), Some(THUMBNAIL_BACKGROUND));
	}

	#[test]
	fn test_surface_from_rgba() {
		assert!(Surface::from_rgba(2, 1, vec![0; 8]).is_some());
		assert!(Surface::from_rgba(2, 1, vec![0; 7]).is_none());
	}
}
