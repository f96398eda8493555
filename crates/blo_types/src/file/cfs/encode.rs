//! CFS record construction.
//!
//! [`encode_rle`] is the inverse of the scanline decoder and [`Encoder`]
//! writes complete records in any of the four header layouts.

use super::{
	decode::{LONG_LINE_ESCAPE, mirror_horizontal, mirror_vertical},
	frame::FrameDescriptor,
	header::{Header, Layout},
	palette::Palette,
};

/// Largest skip or literal count a control byte can hold.
const MAX_RUN: usize = 0x0F;

/// Encodes one row as a control-byte stream.
///
/// Trailing transparent pixels are not written; the decoder leaves them at 0.
fn encode_scanline(row: &[u8], out: &mut Vec<u8>) {
	let end = row.iter().rposition(|&p| p != 0).map_or(0, |i| i + 1);
	let mut x = 0;

	while x < end {
		let mut skip = 0;
		while x < end && row[x] == 0 && skip < MAX_RUN {
			skip += 1;
			x += 1;
		}

		let literal_start = x;
		while x < end && row[x] != 0 && x - literal_start < MAX_RUN {
			x += 1;
		}

		out.push(((skip as u8) << 4) | (x - literal_start) as u8);
		out.extend_from_slice(&row[literal_start..x]);
	}
}

/// Encodes a `width * height` plane with the scanline RLE scheme.
///
/// The result starts with the scanline length table, using the `0xFF` escape
/// for lines of 255 bytes or more.
///
/// # Panics
///
/// Panics if `pixels.len()` is not `width * height`, or if a single encoded
/// scanline exceeds 65535 bytes.
pub fn encode_rle(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
	assert_eq!(pixels.len(), width * height, "Plane size mismatch");

	let mut lines = Vec::with_capacity(height);
	if width > 0 {
		for row in pixels.chunks_exact(width) {
			let mut line = Vec::new();
			encode_scanline(row, &mut line);
			lines.push(line);
		}
	} else {
		lines.resize(height, Vec::new());
	}

	let mut out = Vec::new();
	for line in &lines {
		if line.len() < usize::from(LONG_LINE_ESCAPE) {
			out.push(line.len() as u8);
		} else {
			assert!(line.len() <= usize::from(u16::MAX), "Scanline longer than 65535 bytes");
			out.push(LONG_LINE_ESCAPE);
			out.extend_from_slice(&(line.len() as u16).to_le_bytes());
		}
	}
	for line in &lines {
		out.extend_from_slice(line);
	}
	out
}

/// A frame queued in an [`Encoder`], pixels in display orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFrame {
	x: u16,
	y: u16,
	width: i16,
	height: i16,
	pixels: Vec<u8>,
}

/// Builder for `.cfs` sprite records.
///
/// # Examples
///
/// ```
/// use blo_types::file::cfs::{Encoder, File, Layout};
///
/// let bytes = Encoder::new(Layout::V4, 4, 4)
///     .grid(1, 1)
///     .frame(0, 0, 4, 4, vec![5; 16])
///     .build();
///
/// let record = File::decode("walk_N.cfs", &bytes);
/// assert!(!record.is_fallback());
/// assert_eq!(record.frames()[0].pixels(), &[5; 16]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
	layout: Layout,
	header: Header,
	palette: Palette,
	user_data: Vec<u8>,
	frames: Vec<PendingFrame>,
}

impl Encoder {
	/// Creates an encoder for a logical cell of `width × height`.
	///
	/// Frames are RLE-compressed unless [`Encoder::uncompressed`] is called.
	pub fn new(layout: Layout, width: u16, height: u16) -> Self {
		Self {
			layout,
			header: Header {
				width,
				height,
				..Header::default()
			},
			palette: Palette::new(),
			user_data: Vec::new(),
			frames: Vec::new(),
		}
	}

	/// Sets the declared animation grid.
	pub fn grid(mut self, rows: u16, columns: u16) -> Self {
		self.header.row_count = rows;
		self.header.column_count = columns;
		self
	}

	/// Sets the animation duration in milliseconds.
	pub fn animation_time(mut self, millis: u16) -> Self {
		self.header.animation_time = millis;
		self
	}

	/// Sets the light and shadow frame counts.
	pub fn light_shadow(mut self, light: u16, shadow: u16) -> Self {
		self.header.light_count = light;
		self.header.shadow_count = shadow;
		self
	}

	/// Sets the highest fully opaque palette index.
	pub fn max_solid_index(mut self, index: u8) -> Self {
		self.header.max_solid_index = index;
		self
	}

	/// Sets the vertical compositing offset (not stored by v2 records).
	pub fn y_sort_adjust(mut self, adjust: u16) -> Self {
		self.header.y_sort_adjust = adjust;
		self
	}

	/// Stores pixel planes raw instead of RLE-compressed.
	pub fn uncompressed(mut self) -> Self {
		self.header.compression_flags |= Header::NO_COMPRESSION;
		self
	}

	/// Sets the palette.
	pub fn palette(mut self, palette: Palette) -> Self {
		self.palette = palette;
		self
	}

	/// Sets the opaque user-data blob stored after the palette.
	///
	/// Blobs longer than 65535 bytes are truncated.
	pub fn user_data(mut self, data: Vec<u8>) -> Self {
		self.user_data = data;
		self.user_data.truncate(usize::from(u16::MAX));
		self
	}

	/// Appends a frame.
	///
	/// `pixels` holds `|width| * |height|` indices as they should appear after
	/// decoding; negative dimensions store the plane mirrored.
	///
	/// # Panics
	///
	/// Panics if `pixels.len()` does not match the absolute dimensions.
	pub fn frame(mut self, x: u16, y: u16, width: i16, height: i16, pixels: Vec<u8>) -> Self {
		assert_eq!(
			pixels.len(),
			usize::from(width.unsigned_abs()) * usize::from(height.unsigned_abs()),
			"Frame pixel data size mismatch"
		);
		self.frames.push(PendingFrame {
			x,
			y,
			width,
			height,
			pixels,
		});
		self
	}

	/// Returns the number of frames queued.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Serializes the record.
	pub fn build(&self) -> Vec<u8> {
		let uncompressed = self.header.compression_flags & Header::NO_COMPRESSION != 0;

		let mut descriptors = Vec::with_capacity(self.frames.len());
		let mut frame_data = Vec::new();
		for frame in &self.frames {
			let width = usize::from(frame.width.unsigned_abs());
			let height = usize::from(frame.height.unsigned_abs());

			let mut plane = frame.pixels.clone();
			if frame.height < 0 {
				mirror_vertical(&mut plane, width, height);
			}
			if frame.width < 0 {
				mirror_horizontal(&mut plane, width);
			}

			descriptors.push(FrameDescriptor::new(
				frame.x,
				frame.y,
				frame.width,
				frame.height,
				frame_data.len() as u32,
			));
			if uncompressed {
				frame_data.extend_from_slice(&plane);
			} else {
				frame_data.extend_from_slice(&encode_rle(&plane, width, height));
			}
		}

		let header = Header {
			frame_count: self.frames.len() as u16,
			user_data_size: self.user_data.len() as u16,
			data_size: frame_data.len() as u32,
			..self.header
		};

		let mut out = Vec::with_capacity(
			2 + self.layout.size()
				+ Palette::BYTE_SIZE
				+ self.user_data.len()
				+ descriptors.len() * FrameDescriptor::SIZE
				+ frame_data.len(),
		);
		out.extend_from_slice(&self.layout.version().to_le_bytes());
		self.layout.write_header(&header, &mut out);
		out.extend_from_slice(&self.palette.to_bytes());
		out.extend_from_slice(&self.user_data);
		for descriptor in &descriptors {
			out.extend_from_slice(&descriptor.to_bytes());
		}
		out.extend_from_slice(&frame_data);
		out
	}
}
