//! CFS palette support.
//!
//! Every sprite record embeds a 256-entry palette of packed little-endian
//! `u32` colors laid out as `0xAARRGGBB`. Slot 0 may hold arbitrary data in
//! shipped assets; transparency of index 0 is decided when resolving colors,
//! never here.

use std::fmt;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Unpacks a `0xAARRGGBB` value.
	pub const fn from_argb32(argb: u32) -> Self {
		Self {
			r: ((argb >> 16) & 0xFF) as u8,
			g: ((argb >> 8) & 0xFF) as u8,
			b: (argb & 0xFF) as u8,
			a: ((argb >> 24) & 0xFF) as u8,
		}
	}

	/// Packs the color as `0xAARRGGBB`.
	pub const fn to_argb32(&self) -> u32 {
		((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
	}

	/// Returns the color as `[r, g, b, a]`.
	pub const fn to_array(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// 256-slot packed color palette.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Palette {
	colors: [u32; 256],
}

impl Palette {
	/// Number of palette slots
	pub const PALETTE_SIZE: usize = 256;

	/// Size of a serialized palette in bytes
	pub const BYTE_SIZE: usize = Self::PALETTE_SIZE * 4;

	/// Sentinel used for slots that were never supplied (opaque magenta)
	pub const MISSING_COLOR: u32 = 0xFFFF_00FF;

	/// Creates a palette with every slot set to zero.
	pub fn new() -> Self {
		Self {
			colors: [0; 256],
		}
	}

	/// Creates a palette from 256 packed colors.
	pub fn from_packed(colors: [u32; 256]) -> Self {
		Self {
			colors,
		}
	}

	/// Creates a palette from up to 256 packed colors.
	///
	/// Slots without a supplied color are filled with [`Palette::MISSING_COLOR`]
	/// so they stand out when rendered.
	pub fn from_slice(colors: &[u32]) -> Self {
		let mut palette = Self {
			colors: [Self::MISSING_COLOR; 256],
		};
		let len = colors.len().min(Self::PALETTE_SIZE);
		palette.colors[..len].copy_from_slice(&colors[..len]);
		palette
	}

	/// Creates the greyscale ramp `0xFF000000 | i << 16 | i << 8 | i`.
	pub fn grayscale() -> Self {
		let mut colors = [0u32; 256];
		for (i, slot) in colors.iter_mut().enumerate() {
			let i = i as u32;
			*slot = 0xFF00_0000 | (i << 16) | (i << 8) | i;
		}
		Self {
			colors,
		}
	}

	/// Gets the packed color of a slot.
	#[inline]
	pub fn get(&self, index: u8) -> u32 {
		self.colors[index as usize]
	}

	/// Gets the unpacked color of a slot.
	#[inline]
	pub fn color(&self, index: u8) -> Color {
		Color::from_argb32(self.get(index))
	}

	/// Sets the packed color of a slot.
	#[inline]
	pub fn set(&mut self, index: u8, argb: u32) {
		self.colors[index as usize] = argb;
	}

	/// Returns the packed colors.
	#[inline]
	pub fn colors(&self) -> &[u32; 256] {
		&self.colors
	}

	/// Serializes the palette as 256 little-endian `u32` values.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(Self::BYTE_SIZE);
		for color in &self.colors {
			data.extend_from_slice(&color.to_le_bytes());
		}
		data
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let used = self.colors.iter().filter(|&&c| c != 0).count();
		write!(f, "CFS Palette: {used}/{} slots non-zero", Self::PALETTE_SIZE)
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = u32;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
