//! CFS frame structures.
//!
//! A record stores one [`FrameDescriptor`] per frame. Descriptors carry signed
//! dimensions: a negative width or height asks for the decoded plane to be
//! mirrored on that axis. Once decoded and mirrored, a frame becomes a
//! [`Frame`] with unsigned dimensions and a placement offset inside the
//! record's logical cell.

use std::fmt;

use crate::file::{BloFileError, FileType, reader::ByteReader};

/// Largest absolute frame width or height accepted by the decoder.
pub const MAX_FRAME_DIMENSION: u16 = 512;

/// Per-frame descriptor entry (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameDescriptor {
	/// Horizontal placement inside the logical cell
	pub x: u16,

	/// Vertical placement inside the logical cell
	pub y: u16,

	/// Signed width, negative means mirrored left-right
	pub width: i16,

	/// Signed height, negative means mirrored top-bottom
	pub height: i16,

	/// Offset of the pixel data relative to the frame-data base
	pub data_offset: u32,
}

impl FrameDescriptor {
	/// Size of a serialized descriptor in bytes
	pub const SIZE: usize = 12;

	/// Creates a new descriptor.
	pub fn new(x: u16, y: u16, width: i16, height: i16, data_offset: u32) -> Self {
		Self {
			x,
			y,
			width,
			height,
			data_offset,
		}
	}

	pub(crate) fn read(reader: &mut ByteReader<'_>) -> Result<Self, BloFileError> {
		Ok(Self {
			x: reader.read_u16()?,
			y: reader.read_u16()?,
			width: reader.read_i16()?,
			height: reader.read_i16()?,
			data_offset: reader.read_u32()?,
		})
	}

	/// Reads a descriptor from the start of `data`.
	///
	/// # Errors
	///
	/// Returns [`BloFileError::InsufficientData`] if fewer than 12 bytes are
	/// available.
	pub fn from_bytes(data: &[u8]) -> Result<Self, BloFileError> {
		Self::read(&mut ByteReader::new(data, FileType::Cfs))
	}

	/// Serializes the descriptor.
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0..2].copy_from_slice(&self.x.to_le_bytes());
		bytes[2..4].copy_from_slice(&self.y.to_le_bytes());
		bytes[4..6].copy_from_slice(&self.width.to_le_bytes());
		bytes[6..8].copy_from_slice(&self.height.to_le_bytes());
		bytes[8..12].copy_from_slice(&self.data_offset.to_le_bytes());
		bytes
	}

	/// Absolute width of the pixel plane.
	#[inline]
	pub fn abs_width(&self) -> u16 {
		self.width.unsigned_abs()
	}

	/// Absolute height of the pixel plane.
	#[inline]
	pub fn abs_height(&self) -> u16 {
		self.height.unsigned_abs()
	}

	/// Number of palette-index bytes in the decoded plane.
	#[inline]
	pub fn pixel_count(&self) -> usize {
		usize::from(self.abs_width()) * usize::from(self.abs_height())
	}

	/// Returns `true` if the plane must be mirrored left-right.
	#[inline]
	pub fn is_mirrored_horizontally(&self) -> bool {
		self.width < 0
	}

	/// Returns `true` if the plane must be mirrored top-bottom.
	#[inline]
	pub fn is_mirrored_vertically(&self) -> bool {
		self.height < 0
	}

	/// Returns `false` when either dimension exceeds [`MAX_FRAME_DIMENSION`].
	#[inline]
	pub fn is_within_limits(&self) -> bool {
		self.abs_width() <= MAX_FRAME_DIMENSION && self.abs_height() <= MAX_FRAME_DIMENSION
	}

	/// Returns `true` if either dimension is zero.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}
}

impl fmt::Display for FrameDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}×{} at ({}, {}), data +0x{:X}",
			self.width, self.height, self.x, self.y, self.data_offset
		)
	}
}

/// A decoded, normalized frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
	width: u16,
	height: u16,
	x: i32,
	y: i32,
	pixels: Vec<u8>,
}

impl Frame {
	/// Creates a frame from a decoded plane.
	///
	/// # Panics
	///
	/// Panics if `pixels.len()` is not `width * height`.
	pub fn new(width: u16, height: u16, x: i32, y: i32, pixels: Vec<u8>) -> Self {
		assert_eq!(
			pixels.len(),
			usize::from(width) * usize::from(height),
			"Frame pixel data size mismatch"
		);
		Self {
			width,
			height,
			x,
			y,
			pixels,
		}
	}

	/// Frame width in pixels.
	#[inline]
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Frame height in pixels.
	#[inline]
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Horizontal offset inside the logical cell.
	#[inline]
	pub fn x(&self) -> i32 {
		self.x
	}

	/// Vertical offset inside the logical cell.
	#[inline]
	pub fn y(&self) -> i32 {
		self.y
	}

	/// Palette indices in row-major order.
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Palette index at `(x, y)`, or `None` outside the plane.
	pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(usize::from(y) * usize::from(self.width) + usize::from(x)).copied()
	}

	/// Returns an iterator over the rows of the plane.
	pub fn rows(&self) -> RowIterator<'_> {
		RowIterator {
			frame: self,
			current_row: 0,
		}
	}

	/// Number of non-transparent pixels.
	pub fn opaque_pixel_count(&self) -> usize {
		self.pixels.iter().filter(|&&p| p != 0).count()
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{} at ({}, {})", self.width, self.height, self.x, self.y)
	}
}

/// Iterator over the rows of a [`Frame`].
#[derive(Debug, Clone)]
pub struct RowIterator<'a> {
	frame: &'a Frame,
	current_row: u16,
}

impl<'a> Iterator for RowIterator<'a> {
	type Item = &'a [u8];

	fn next(&mut self) -> Option<Self::Item> {
		if self.current_row >= self.frame.height {
			return None;
		}
		let width = usize::from(self.frame.width);
		let start = usize::from(self.current_row) * width;
		self.current_row += 1;
		Some(&self.frame.pixels[start..start + width])
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = usize::from(self.frame.height - self.current_row);
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for RowIterator<'_> {}
