//! Version-specific CFS header layouts.
//!
//! The `u16` version at the start of a record selects one of four fixed
//! header layouts. All of them carry the same logical fields but place them
//! at different offsets and widths, interleaved with reserved bytes that are
//! skipped without interpretation.
//!
//! | Layout | Bytes after version | Notes                                               |
//! |--------|---------------------|-----------------------------------------------------|
//! | v2     | 30                  | 8-bit flags, no y-sort adjust                       |
//! | v3     | 56                  | `data_size` moved before 16 reserved bytes          |
//! | v4     | 127                 | v3 shape with 80 trailing reserved bytes            |
//! | v5     | 180                 | `data_size` first, 16-bit flags, 144 reserved bytes |

use std::fmt;

use log::trace;

use crate::file::{BloFileError, FileType, reader::ByteReader};

mod constants {
	/// v2: bytes between `max_solid_index` and `data_size`
	pub const V2_RESERVED: usize = 6;

	/// v3/v4: bytes between `data_size` and the two single reserved bytes
	pub const V3_RESERVED_BLOCK: usize = 16;

	/// v3: trailing reserved bytes
	pub const V3_TRAILER: usize = 9;

	/// v4: trailing reserved bytes (48 + 32)
	pub const V4_TRAILER: usize = 48 + 32;

	/// v5: three reserved `u16` before `max_solid_index`
	pub const V5_RESERVED_WORDS: usize = 6;

	/// v5: trailing reserved bytes (32 + 48 + 64)
	pub const V5_TRAILER: usize = 32 + 48 + 64;
}

/// One of the four header layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
	/// Version 2
	V2,
	/// Version 3
	V3,
	/// Version 4
	V4,
	/// Version 5
	V5,
}

impl Layout {
	/// Selects the layout for a record version.
	pub fn from_version(version: u16) -> Result<Self, BloFileError> {
		match version {
			2 => Ok(Self::V2),
			3 => Ok(Self::V3),
			4 => Ok(Self::V4),
			5 => Ok(Self::V5),
			_ => Err(BloFileError::UnsupportedSpriteVersion(version)),
		}
	}

	/// Returns the record version of this layout.
	pub fn version(self) -> u16 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
			Self::V5 => 5,
		}
	}

	/// Size of the header in bytes, not counting the version field.
	pub fn size(self) -> usize {
		match self {
			Self::V2 => 18 + 2 + constants::V2_RESERVED + 4,
			Self::V3 => 18 + 2 + 4 + constants::V3_RESERVED_BLOCK + 2 + 2 + 3 + constants::V3_TRAILER,
			Self::V4 => 18 + 2 + 4 + constants::V3_RESERVED_BLOCK + 2 + 2 + 3 + constants::V4_TRAILER,
			Self::V5 => 4 + 22 + constants::V5_RESERVED_WORDS + 1 + 3 + constants::V5_TRAILER,
		}
	}

	/// Reads the header starting at `offset` (just past the version field).
	///
	/// Returns the parsed header and the number of bytes consumed.
	pub fn read_header(self, data: &[u8], offset: usize) -> Result<(Header, usize), BloFileError> {
		let Some(bytes) = data.get(offset..) else {
			return Err(BloFileError::insufficient_data(FileType::Cfs, offset, data.len()));
		};
		let mut reader = ByteReader::new(bytes, FileType::Cfs);
		let header = match self {
			Self::V2 => read_v2(&mut reader)?,
			Self::V3 | Self::V4 => read_v3_v4(&mut reader, self)?,
			Self::V5 => read_v5(&mut reader)?,
		};
		trace!("CFS v{} header: {header:?}", self.version());
		Ok((header, reader.position()))
	}

	/// Appends the header in this layout to `out`, without the version field.
	///
	/// Fields the layout cannot represent are dropped (the v2 y-sort adjust)
	/// or truncated (8-bit compression flags before v5).
	pub fn write_header(self, header: &Header, out: &mut Vec<u8>) {
		let counts = |out: &mut Vec<u8>| {
			for value in [
				header.frame_count,
				header.animation_time,
				header.width,
				header.height,
				header.row_count,
				header.column_count,
				header.light_count,
				header.shadow_count,
				header.user_data_size,
			] {
				out.extend_from_slice(&value.to_le_bytes());
			}
		};

		match self {
			Self::V2 => {
				counts(out);
				out.push(header.compression_flags as u8);
				out.push(header.max_solid_index);
				out.extend_from_slice(&[0; constants::V2_RESERVED]);
				out.extend_from_slice(&header.data_size.to_le_bytes());
			}
			Self::V3 | Self::V4 => {
				counts(out);
				out.push(header.compression_flags as u8);
				out.push(header.max_solid_index);
				out.extend_from_slice(&header.data_size.to_le_bytes());
				out.extend_from_slice(&[0; constants::V3_RESERVED_BLOCK + 2]);
				out.extend_from_slice(&header.y_sort_adjust.to_le_bytes());
				let trailer = if self == Self::V3 {
					constants::V3_TRAILER
				} else {
					constants::V4_TRAILER
				};
				out.resize(out.len() + 3 + trailer, 0);
			}
			Self::V5 => {
				out.extend_from_slice(&header.data_size.to_le_bytes());
				counts(out);
				out.extend_from_slice(&header.y_sort_adjust.to_le_bytes());
				out.extend_from_slice(&header.compression_flags.to_le_bytes());
				out.extend_from_slice(&[0; constants::V5_RESERVED_WORDS]);
				out.push(header.max_solid_index);
				out.resize(out.len() + 3 + constants::V5_TRAILER, 0);
			}
		}
	}
}

impl fmt::Display for Layout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "v{}", self.version())
	}
}

/// Logical header fields shared by every layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Header {
	/// Number of frame descriptors that follow the palette
	pub frame_count: u16,
	/// Animation duration in milliseconds
	pub animation_time: u16,
	/// Logical cell width
	pub width: u16,
	/// Logical cell height
	pub height: u16,
	/// Rows of the animation grid (0 when unknown)
	pub row_count: u16,
	/// Columns of the animation grid (0 when unknown)
	pub column_count: u16,
	/// Light frame count, expected 0 or 32
	pub light_count: u16,
	/// Shadow frame count, expected 0 or 8
	pub shadow_count: u16,
	/// Size of the opaque user-data blob after the palette
	pub user_data_size: u16,
	/// Compression bitmask, bit 0 means "no compression"
	pub compression_flags: u16,
	/// Highest palette index drawn fully opaque
	pub max_solid_index: u8,
	/// Size of the frame pixel-data region
	pub data_size: u32,
	/// Downward compositing offset, unsigned (always 0 in v2)
	pub y_sort_adjust: u16,
}

impl Header {
	/// Bit 0 of the compression flags: pixel planes are stored raw.
	pub const NO_COMPRESSION: u16 = 0x1;

	/// Returns `true` when pixel planes are stored uncompressed.
	#[inline]
	pub fn is_uncompressed(&self) -> bool {
		self.compression_flags & Self::NO_COMPRESSION != 0
	}
}

fn read_counts(reader: &mut ByteReader<'_>, header: &mut Header) -> Result<(), BloFileError> {
	header.frame_count = reader.read_u16()?;
	header.animation_time = reader.read_u16()?;
	header.width = reader.read_u16()?;
	header.height = reader.read_u16()?;
	header.row_count = reader.read_u16()?;
	header.column_count = reader.read_u16()?;
	header.light_count = reader.read_u16()?;
	header.shadow_count = reader.read_u16()?;
	header.user_data_size = reader.read_u16()?;
	Ok(())
}

fn read_v2(reader: &mut ByteReader<'_>) -> Result<Header, BloFileError> {
	let mut header = Header::default();
	read_counts(reader, &mut header)?;
	header.compression_flags = u16::from(reader.read_u8()?);
	header.max_solid_index = reader.read_u8()?;
	reader.skip(constants::V2_RESERVED)?;
	header.data_size = reader.read_u32()?;
	Ok(header)
}

fn read_v3_v4(reader: &mut ByteReader<'_>, layout: Layout) -> Result<Header, BloFileError> {
	let mut header = Header::default();
	read_counts(reader, &mut header)?;
	header.compression_flags = u16::from(reader.read_u8()?);
	header.max_solid_index = reader.read_u8()?;
	header.data_size = reader.read_u32()?;
	reader.skip(constants::V3_RESERVED_BLOCK + 2)?;
	header.y_sort_adjust = reader.read_u16()?;
	reader.skip(3)?;
	reader.skip(if layout == Layout::V3 {
		constants::V3_TRAILER
	} else {
		constants::V4_TRAILER
	})?;
	Ok(header)
}

fn read_v5(reader: &mut ByteReader<'_>) -> Result<Header, BloFileError> {
	let mut header = Header {
		data_size: reader.read_u32()?,
		..Header::default()
	};
	read_counts(reader, &mut header)?;
	header.y_sort_adjust = reader.read_u16()?;
	header.compression_flags = reader.read_u16()?;
	reader.skip(constants::V5_RESERVED_WORDS)?;
	header.max_solid_index = reader.read_u8()?;
	reader.skip(3 + constants::V5_TRAILER)?;
	Ok(header)
}

#[cfg(test)]
mod tests {
	use super::*;

	const ALL: [Layout; 4] = [Layout::V2, Layout::V3, Layout::V4, Layout::V5];

	fn sample() -> Header {
		Header {
			frame_count: 8,
			animation_time: 400,
			width: 64,
			height: 48,
			row_count: 2,
			column_count: 4,
			light_count: 32,
			shadow_count: 8,
			user_data_size: 12,
			compression_flags: 0x1,
			max_solid_index: 200,
			data_size: 0x0001_2345,
			y_sort_adjust: 0xFFFA,
		}
	}

	#[test]
	fn test_layout_sizes() {
		assert_eq!(Layout::V2.size(), 30);
		assert_eq!(Layout::V3.size(), 56);
		assert_eq!(Layout::V4.size(), 127);
		assert_eq!(Layout::V5.size(), 180);
	}

	#[test]
	fn test_version_gate() {
		assert!(matches!(Layout::from_version(1), Err(BloFileError::UnsupportedSpriteVersion(1))));
		assert!(matches!(Layout::from_version(6), Err(BloFileError::UnsupportedSpriteVersion(6))));
		for layout in ALL {
			assert_eq!(Layout::from_version(layout.version()).unwrap(), layout);
		}
	}

	#[test]
	fn test_write_matches_size_and_reads_back() {
		for layout in ALL {
			let mut expected = sample();
			if layout == Layout::V2 {
				expected.y_sort_adjust = 0;
			}

			let mut bytes = Vec::new();
			layout.write_header(&sample(), &mut bytes);
			assert_eq!(bytes.len(), layout.size(), "{layout}");

			let (header, consumed) = layout.read_header(&bytes, 0).unwrap();
			assert_eq!(consumed, layout.size());
			assert_eq!(header, expected, "{layout}");
		}
	}

	#[test]
	fn test_v4_field_offsets() {
		let mut bytes = Vec::new();
		Layout::V4.write_header(&sample(), &mut bytes);
		// compression flags and max solid index follow the nine u16 counts
		assert_eq!(bytes[18], 0x1);
		assert_eq!(bytes[19], 200);
		assert_eq!(&bytes[20..24], &0x0001_2345u32.to_le_bytes());
		// y-sort adjust sits after 16 + 2 reserved bytes
		assert_eq!(&bytes[42..44], &[0xFA, 0xFF]);
	}

	#[test]
	fn test_v5_field_offsets() {
		let mut bytes = Vec::new();
		Layout::V5.write_header(&sample(), &mut bytes);
		assert_eq!(&bytes[0..4], &0x0001_2345u32.to_le_bytes());
		assert_eq!(&bytes[4..6], &8u16.to_le_bytes());
		assert_eq!(&bytes[22..24], &[0xFA, 0xFF]);
		assert_eq!(&bytes[24..26], &1u16.to_le_bytes());
		assert_eq!(bytes[32], 200);
	}

	#[test]
	fn test_truncated_header() {
		let mut bytes = Vec::new();
		Layout::V5.write_header(&sample(), &mut bytes);
		bytes.truncate(100);
		assert!(matches!(
			Layout::V5.read_header(&bytes, 0),
			Err(BloFileError::InsufficientData { .. })
		));
	}
}
