//! `.CFS` sprite animation record support.
//!
//! A CFS record holds every frame of one animated sprite together with the
//! palette used to color them.
//!
//! # File Structure
//!
//! | Section           | Size                    | Description                             |
//! |-------------------|-------------------------|-----------------------------------------|
//! | `version`         | 2                       | 2..=5, little-endian                    |
//! | header            | 30 / 56 / 127 / 180     | layout selected by version              |
//! | palette           | 1024                    | 256 × `u32` `0xAARRGGBB`                |
//! | user data         | `user_data_size`        | opaque, skipped                         |
//! | frame descriptors | `frame_count` × 12      | see [`FrameDescriptor`]                 |
//! | frame data        | `data_size`             | raw or RLE planes, offsets from here    |
//!
//! # Decoding policy
//!
//! Shipped assets are frequently damaged, so decoding degrades instead of
//! failing: descriptors larger than 512 pixels, empty frames and frames whose
//! data starts past the end of the record are skipped with a warning.
//! [`File::decode`] never fails; any hard error, or a record without a single
//! usable frame, yields the 32×32 placeholder from [`File::fallback`].

mod decode;
mod encode;
mod frame;
mod header;
mod palette;

use std::fmt;

use log::{debug, warn};

use crate::file::{BloFileError, FileType, reader::ByteReader};

pub use decode::{
	copy_uncompressed, decode_plane, decode_rle, decode_scanline, mirror_horizontal, mirror_vertical,
};
pub use encode::{Encoder, encode_rle};
pub use frame::{Frame, FrameDescriptor, MAX_FRAME_DIMENSION, RowIterator};
pub use header::{Header, Layout};
pub use palette::{Color, Palette};

/// CFS file constants.
pub mod constants {
	/// Records shorter than this are rejected outright
	pub const MIN_RECORD_SIZE: usize = 50;

	/// Largest logical cell width or height
	pub const MAX_SPRITE_DIMENSION: u16 = 1024;

	/// Light frame count expected by the engine (or 0)
	pub const EXPECTED_LIGHT_COUNT: u16 = 32;

	/// Shadow frame count expected by the engine (or 0)
	pub const EXPECTED_SHADOW_COUNT: u16 = 8;

	/// Placeholder cell size
	pub const FALLBACK_SIZE: u16 = 32;

	/// Placeholder animation duration in milliseconds
	pub const FALLBACK_ANIMATION_TIME: u16 = 200;
}

/// Animation grid with inferred dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
	/// Number of rows
	pub rows: usize,
	/// Number of columns
	pub columns: usize,
}

impl Grid {
	/// Completes a declared grid for `frame_count` frames.
	///
	/// A missing dimension is derived from the other one. When both are
	/// missing the grid is made roughly square with `ceil(sqrt(n))` columns.
	pub fn infer(rows: usize, columns: usize, frame_count: usize) -> Self {
		match (rows, columns) {
			(0, 0) if frame_count == 0 => Self::default(),
			(0, 0) => {
				let columns = (frame_count as f64).sqrt().ceil() as usize;
				Self {
					rows: frame_count.div_ceil(columns),
					columns,
				}
			}
			(0, columns) => Self {
				rows: frame_count.div_ceil(columns),
				columns,
			},
			(rows, 0) => Self {
				rows,
				columns: frame_count.div_ceil(rows),
			},
			(rows, columns) => Self {
				rows,
				columns,
			},
		}
	}

	/// Frame index of a grid cell, `row * columns + column`.
	#[inline]
	pub fn frame_index(&self, row: usize, column: usize) -> usize {
		row * self.columns + column
	}

	/// Number of cells in the grid.
	#[inline]
	pub fn cell_count(&self) -> usize {
		self.rows * self.columns
	}
}

impl fmt::Display for Grid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{}", self.rows, self.columns)
	}
}

/// A decoded CFS sprite record.
///
/// Records are immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	/// Name of the container entry
	name: String,

	/// Record version, 0 for the placeholder
	version: u16,

	/// Logical header fields
	header: Header,

	/// Color palette
	palette: Palette,

	/// Decoded frames, in descriptor order
	frames: Vec<Frame>,

	/// Set when this record is the placeholder
	fallback: bool,
}

/// Alias used where the record is handled as an in-memory sprite.
pub type SpriteRecord = File;

impl File {
	/// Decodes a record, substituting the placeholder on any failure.
	///
	/// # Arguments
	///
	/// * `name` - Entry name the record was stored under
	/// * `data` - Raw record bytes
	pub fn decode(name: &str, data: &[u8]) -> Self {
		match Self::try_decode(name, data) {
			Ok(record) if record.frames.is_empty() => {
				warn!("CFS \"{name}\": no usable frames, using placeholder");
				Self::fallback(name)
			}
			Ok(record) => record,
			Err(err) => {
				warn!("CFS \"{name}\": {err}, using placeholder");
				Self::fallback(name)
			}
		}
	}

	/// Decodes a record, reporting hard failures.
	///
	/// Frame-level anomalies are skipped, so a successful result may contain
	/// fewer frames than declared, or none at all.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The record is shorter than 50 bytes
	/// - The version is outside 2..=5
	/// - The logical cell is empty or larger than 1024 on either axis
	/// - The header, palette or descriptor table is truncated
	pub fn try_decode(name: &str, data: &[u8]) -> Result<Self, BloFileError> {
		if data.len() < constants::MIN_RECORD_SIZE {
			return Err(BloFileError::insufficient_data(
				FileType::Cfs,
				constants::MIN_RECORD_SIZE,
				data.len(),
			));
		}

		let version = u16::from_le_bytes([data[0], data[1]]);
		let layout = Layout::from_version(version)?;
		let (header, header_size) = layout.read_header(data, 2)?;

		debug!(
			"CFS \"{name}\" {layout}: {} frames, {}×{}, grid {}×{}, flags 0x{:X}",
			header.frame_count,
			header.width,
			header.height,
			header.row_count,
			header.column_count,
			header.compression_flags
		);

		if header.width == 0
			|| header.height == 0
			|| header.width > constants::MAX_SPRITE_DIMENSION
			|| header.height > constants::MAX_SPRITE_DIMENSION
		{
			return Err(BloFileError::InvalidSpriteDimensions {
				width: header.width,
				height: header.height,
			});
		}
		if header.light_count != 0 && header.light_count != constants::EXPECTED_LIGHT_COUNT {
			warn!("CFS \"{name}\": unexpected light count {}", header.light_count);
		}
		if header.shadow_count != 0 && header.shadow_count != constants::EXPECTED_SHADOW_COUNT {
			warn!("CFS \"{name}\": unexpected shadow count {}", header.shadow_count);
		}

		let mut reader = ByteReader::new(data, FileType::Cfs);
		reader.skip(2 + header_size)?;

		let mut colors = [0u32; Palette::PALETTE_SIZE];
		for color in colors.iter_mut() {
			*color = reader.read_u32()?;
		}
		let palette = Palette::from_packed(colors);

		reader.skip(usize::from(header.user_data_size))?;

		let mut descriptors = Vec::with_capacity(usize::from(header.frame_count));
		for i in 0..header.frame_count {
			let descriptor = FrameDescriptor::read(&mut reader)?;
			if !descriptor.is_within_limits() {
				warn!(
					"CFS \"{name}\" frame {i}: dimensions {}×{} exceed limit, skipping",
					descriptor.width, descriptor.height
				);
				continue;
			}
			descriptors.push((i, descriptor));
		}

		let base = reader.position();
		let uncompressed = header.is_uncompressed();
		let mut frames = Vec::with_capacity(descriptors.len());

		for (i, descriptor) in descriptors {
			if descriptor.is_empty() {
				warn!("CFS \"{name}\" frame {i}: empty frame, skipping");
				continue;
			}

			let start = usize::try_from(descriptor.data_offset)
				.ok()
				.and_then(|offset| base.checked_add(offset))
				.filter(|&start| start < data.len());
			let Some(start) = start else {
				warn!(
					"CFS \"{name}\" frame {i}: data offset {} out of bounds, skipping",
					descriptor.data_offset
				);
				continue;
			};

			let pixels = decode_plane(data, start, &descriptor, uncompressed);
			frames.push(Frame::new(
				descriptor.abs_width(),
				descriptor.abs_height(),
				i32::from(descriptor.x),
				i32::from(descriptor.y),
				pixels,
			));
		}

		debug!("CFS \"{name}\": decoded {}/{} frames", frames.len(), header.frame_count);

		Ok(Self {
			name: name.to_string(),
			version,
			header,
			palette,
			frames,
			fallback: false,
		})
	}

	/// Builds the placeholder record shown for undecodable entries.
	///
	/// One 32×32 frame filled with `i % 256` over a greyscale palette, with
	/// every index drawn opaque.
	pub fn fallback(name: &str) -> Self {
		let size = constants::FALLBACK_SIZE;
		let pixels = (0..usize::from(size) * usize::from(size)).map(|i| (i % 256) as u8).collect();

		Self {
			name: name.to_string(),
			version: 0,
			header: Header {
				frame_count: 1,
				animation_time: constants::FALLBACK_ANIMATION_TIME,
				width: size,
				height: size,
				row_count: 1,
				column_count: 1,
				max_solid_index: u8::MAX,
				..Header::default()
			},
			palette: Palette::grayscale(),
			frames: vec![Frame::new(size, size, 0, 0, pixels)],
			fallback: true,
		}
	}

	/// Returns the entry name.
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the record version (0 for the placeholder).
	#[inline]
	pub fn version(&self) -> u16 {
		self.version
	}

	/// Returns `true` if this is the placeholder record.
	#[inline]
	pub fn is_fallback(&self) -> bool {
		self.fallback
	}

	/// Returns the logical header fields.
	#[inline]
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Logical cell width.
	#[inline]
	pub fn width(&self) -> u16 {
		self.header.width
	}

	/// Logical cell height.
	#[inline]
	pub fn height(&self) -> u16 {
		self.header.height
	}

	/// Declared grid rows (may be 0).
	#[inline]
	pub fn row_count(&self) -> u16 {
		self.header.row_count
	}

	/// Declared grid columns (may be 0).
	#[inline]
	pub fn column_count(&self) -> u16 {
		self.header.column_count
	}

	/// Number of frames declared by the header.
	#[inline]
	pub fn frame_count(&self) -> u16 {
		self.header.frame_count
	}

	/// Animation duration in milliseconds.
	#[inline]
	pub fn animation_time(&self) -> u16 {
		self.header.animation_time
	}

	/// Downward compositing offset applied to every frame.
	#[inline]
	pub fn y_sort_adjust(&self) -> u16 {
		self.header.y_sort_adjust
	}

	/// Compression bitmask.
	#[inline]
	pub fn compression_flags(&self) -> u16 {
		self.header.compression_flags
	}

	/// Declared light frame count.
	#[inline]
	pub fn light_count(&self) -> u16 {
		self.header.light_count
	}

	/// Declared shadow frame count.
	#[inline]
	pub fn shadow_count(&self) -> u16 {
		self.header.shadow_count
	}

	/// Highest fully opaque palette index.
	#[inline]
	pub fn max_solid_index(&self) -> u8 {
		self.header.max_solid_index
	}

	/// Returns the palette.
	#[inline]
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Returns the decoded frames.
	#[inline]
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Returns a frame by index.
	#[inline]
	pub fn frame(&self, index: usize) -> Option<&Frame> {
		self.frames.get(index)
	}

	/// Animation grid, completed from the number of decoded frames.
	pub fn grid(&self) -> Grid {
		Grid::infer(
			usize::from(self.header.row_count),
			usize::from(self.header.column_count),
			self.frames.len(),
		)
	}

	/// Frame at a grid position, if decoded.
	pub fn frame_at(&self, row: usize, column: usize) -> Option<&Frame> {
		self.frame(self.grid().frame_index(row, column))
	}

	/// Returns `true` if `index` addresses a pre-rendered shadow frame.
	///
	/// Those frames sit directly after the declared `rows × columns` grid.
	pub fn is_legacy_shadow_frame(&self, index: usize) -> bool {
		let grid_end = usize::from(self.header.row_count) * usize::from(self.header.column_count);
		index >= grid_end && index < grid_end + usize::from(self.header.shadow_count)
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.fallback {
			return write!(f, "CFS \"{}\": placeholder", self.name);
		}
		write!(
			f,
			"CFS \"{}\" v{}: {}×{}, {}/{} frames, grid {}",
			self.name,
			self.version,
			self.header.width,
			self.header.height,
			self.frames.len(),
			self.header.frame_count,
			self.grid()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const ALL: [Layout; 4] = [Layout::V2, Layout::V3, Layout::V4, Layout::V5];

	fn assert_fallback(record: &File) {
		assert!(record.is_fallback());
		assert_eq!((record.width(), record.height()), (32, 32));
		assert_eq!(record.frames().len(), 1);
		assert_eq!(record.animation_time(), 200);
		assert_eq!(record.palette().get(7), 0xFF07_0707);
		let pixels = record.frames()[0].pixels();
		assert_eq!(pixels.len(), 1024);
		assert_eq!(pixels[300], (300 % 256) as u8);
	}

	#[test_log::test]
	fn test_garbage_yields_fallback() {
		assert_fallback(&File::decode("zero.cfs", &[0u8; 10]));
		assert_fallback(&File::decode("empty.cfs", &[]));

		let mut data = vec![0xAB; 400];
		data[0..2].copy_from_slice(&9u16.to_le_bytes());
		assert_fallback(&File::decode("future.cfs", &data));
	}

	#[test]
	fn test_try_decode_errors() {
		assert!(matches!(
			File::try_decode("x", &[0u8; 10]),
			Err(BloFileError::InsufficientData { expected: 50, .. })
		));

		let mut data = vec![0u8; 64];
		data[0] = 1;
		assert!(matches!(File::try_decode("x", &data), Err(BloFileError::UnsupportedSpriteVersion(1))));

		let bytes = Encoder::new(Layout::V3, 2000, 16).frame(0, 0, 1, 1, vec![1]).build();
		assert!(matches!(
			File::try_decode("x", &bytes),
			Err(BloFileError::InvalidSpriteDimensions { width: 2000, height: 16 })
		));

		let bytes = Encoder::new(Layout::V3, 0, 16).build();
		assert!(matches!(File::try_decode("x", &bytes), Err(BloFileError::InvalidSpriteDimensions { .. })));
	}

	#[test]
	fn test_truncated_descriptor_table() {
		let mut bytes = Encoder::new(Layout::V4, 8, 8).uncompressed().frame(0, 0, 2, 2, vec![1; 4]).build();
		bytes.truncate(2 + Layout::V4.size() + Palette::BYTE_SIZE + 4);
		assert!(matches!(File::try_decode("x", &bytes), Err(BloFileError::InsufficientData { .. })));
		assert!(File::decode("x", &bytes).is_fallback());
	}

	#[test]
	fn test_all_layouts_decode() {
		for layout in ALL {
			let mut palette = Palette::new();
			palette.set(9, 0xFF10_2030);
			let pixels: Vec<u8> = (0..24).map(|i| if i % 5 == 0 { 0 } else { 9 }).collect();

			let bytes = Encoder::new(layout, 40, 30)
				.grid(1, 2)
				.animation_time(120)
				.light_shadow(32, 8)
				.max_solid_index(180)
				.y_sort_adjust(4)
				.palette(palette.clone())
				.user_data(vec![0x55; 17])
				.frame(3, 4, 6, 4, pixels.clone())
				.frame(0, 0, -6, 4, pixels.clone())
				.build();

			let record = File::try_decode("walk.cfs", &bytes).unwrap();
			assert_eq!(record.version(), layout.version());
			assert_eq!((record.width(), record.height()), (40, 30));
			assert_eq!(record.animation_time(), 120);
			assert_eq!(record.max_solid_index(), 180);
			assert_eq!(record.palette(), &palette);
			assert_eq!(record.frames().len(), 2);
			assert_eq!(record.frames()[0].pixels(), pixels.as_slice());
			assert_eq!(record.frames()[1].pixels(), pixels.as_slice());
			assert_eq!((record.frames()[0].x(), record.frames()[0].y()), (3, 4));

			let expected_adjust = if layout == Layout::V2 { 0 } else { 4 };
			assert_eq!(record.y_sort_adjust(), expected_adjust);
		}
	}

	#[test_log::test]
	fn test_oversized_and_empty_frames_are_skipped() {
		let bytes = Encoder::new(Layout::V5, 64, 64)
			.uncompressed()
			.frame(0, 0, 513, 1, vec![1; 513])
			.frame(0, 0, 0, 3, vec![])
			.frame(0, 0, 2, 1, vec![7, 8])
			.build();

		let record = File::decode("x.cfs", &bytes);
		assert!(!record.is_fallback());
		assert_eq!(record.frame_count(), 3);
		assert_eq!(record.frames().len(), 1);
		assert_eq!(record.frames()[0].pixels(), &[7, 8]);
	}

	#[test_log::test]
	fn test_out_of_range_offset_is_skipped() {
		let mut bytes = Encoder::new(Layout::V3, 8, 8)
			.uncompressed()
			.frame(0, 0, 2, 1, vec![1, 2])
			.frame(0, 0, 2, 1, vec![3, 4])
			.build();
		let second = 2 + Layout::V3.size() + Palette::BYTE_SIZE + FrameDescriptor::SIZE;
		bytes[second + 8..second + 12].copy_from_slice(&0x00FF_FFFFu32.to_le_bytes());

		let record = File::decode("x.cfs", &bytes);
		assert_eq!(record.frames().len(), 1);
		assert_eq!(record.frames()[0].pixels(), &[1, 2]);
	}

	#[test_log::test]
	fn test_max_offset_is_skipped() {
		let mut bytes = Encoder::new(Layout::V4, 8, 8)
			.frame(0, 0, 2, 1, vec![1, 2])
			.frame(0, 0, 2, 1, vec![3, 4])
			.build();
		let first = 2 + Layout::V4.size() + Palette::BYTE_SIZE;
		bytes[first + 8..first + 12].copy_from_slice(&u32::MAX.to_le_bytes());

		let record = File::decode("x.cfs", &bytes);
		assert_eq!(record.frames().len(), 1);
		assert_eq!(record.frames()[0].pixels(), &[3, 4]);
	}

	#[test]
	fn test_y_sort_adjust_is_unsigned() {
		for (layout, at) in [(Layout::V3, 44), (Layout::V4, 44), (Layout::V5, 24)] {
			let mut bytes = Encoder::new(layout, 8, 8).frame(0, 0, 1, 1, vec![1]).build();
			bytes[at..at + 2].copy_from_slice(&[0xFA, 0xFF]);

			let record = File::try_decode("tall.cfs", &bytes).unwrap();
			assert_eq!(record.y_sort_adjust(), 65530, "{layout}");
		}
	}

	#[test_log::test]
	fn test_no_frames_yields_fallback() {
		let bytes = Encoder::new(Layout::V2, 8, 8).build();
		assert!(File::try_decode("x.cfs", &bytes).unwrap().frames().is_empty());
		assert!(File::decode("x.cfs", &bytes).is_fallback());
	}

	#[test]
	fn test_grid_inference() {
		assert_eq!(
			Grid::infer(0, 4, 10),
			Grid {
				rows: 3,
				columns: 4
			}
		);
		assert_eq!(
			Grid::infer(0, 0, 10),
			Grid {
				rows: 3,
				columns: 4
			}
		);
		assert_eq!(
			Grid::infer(2, 0, 7),
			Grid {
				rows: 2,
				columns: 4
			}
		);
		assert_eq!(
			Grid::infer(2, 4, 3),
			Grid {
				rows: 2,
				columns: 4
			}
		);
		assert_eq!(Grid::infer(0, 0, 0), Grid::default());
		assert_eq!(Grid::infer(0, 0, 9).frame_index(2, 1), 7);
	}

	#[test]
	fn test_legacy_shadow_frames() {
		let mut encoder = Encoder::new(Layout::V4, 8, 8).grid(1, 2).light_shadow(0, 8).uncompressed();
		for _ in 0..12 {
			encoder = encoder.frame(0, 0, 1, 1, vec![1]);
		}
		let record = File::decode("x.cfs", &encoder.build());
		assert!(!record.is_legacy_shadow_frame(1));
		assert!(record.is_legacy_shadow_frame(2));
		assert!(record.is_legacy_shadow_frame(9));
		assert!(!record.is_legacy_shadow_frame(10));
		assert_eq!(record.frame_at(0, 1), record.frame(1));
	}
}
