//! `.BLO` container format support.
//!
//! A BLO archive is a flat container of named byte ranges. It starts with a
//! tiny header followed by a fixed-size directory; entry payloads live
//! anywhere after the directory and are addressed by absolute offsets.
//!
//! # File Structure
//!
//! | Offset | Size       | Field         | Description                           |
//! |--------|------------|---------------|---------------------------------------|
//! | 0x00   | 4          | `version`     | 1 or 2, little-endian                 |
//! | 0x04   | 4          | `entry_count` | 1..=10000, little-endian              |
//! | 0x08   | n × row    | directory     | `entry_count` rows                    |
//!
//! Each directory row is a NUL-padded name (14 bytes in version 1, 32 bytes
//! in version 2) followed by a `u32` offset and a `u32` size.
//!
//! Directory rows with an empty name, a zero size or an offset past the end of
//! the archive are common in shipped files and are skipped without error.
//!
//! # Examples
//!
//! ```
//! use blo_types::file::blo::{File, FileBuilder};
//!
//! let bytes = FileBuilder::new(2)
//!     .entry("walk_N.cfs", vec![1, 2, 3])
//!     .entry("shot.wav", vec![4, 5])
//!     .build();
//!
//! let blo = File::from_bytes(&bytes).unwrap();
//! assert_eq!(blo.entries().len(), 2);
//! assert_eq!(blo.entry_data(&blo.entries()[0]).unwrap(), &[1, 2, 3]);
//! ```

mod builder;

use std::{fmt, io::Read};

use encoding_rs::WINDOWS_1252;
use log::{debug, warn};

use crate::file::{BloFileError, FileType};

pub use builder::FileBuilder;

/// BLO file constants.
pub mod constants {
	/// Size of the container header (`version` + `entry_count`)
	pub const HEADER_SIZE: usize = 8;

	/// Name field width for version 1 archives
	pub const NAME_LENGTH_V1: usize = 14;

	/// Name field width for version 2 archives
	pub const NAME_LENGTH_V2: usize = 32;

	/// Upper bound on the declared number of directory rows
	pub const MAX_ENTRY_COUNT: u32 = 10_000;

	/// Suffix of sprite animation entries
	pub const SPRITE_SUFFIX: &str = ".cfs";

	/// Suffix of audio entries
	pub const AUDIO_SUFFIX: &str = ".wav";
}

/// Returns the width of the name field for a container version.
#[inline]
pub(crate) fn name_length(version: u32) -> usize {
	if version == 2 {
		constants::NAME_LENGTH_V2
	} else {
		constants::NAME_LENGTH_V1
	}
}

/// What a directory entry contains, judged by its name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
	/// `.cfs` sprite animation record
	Sprite,
	/// `.wav` audio clip, passed through untouched
	Audio,
	/// Anything else
	Other,
}

impl fmt::Display for EntryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Sprite => write!(f, "sprite"),
			Self::Audio => write!(f, "audio"),
			Self::Other => write!(f, "other"),
		}
	}
}

/// One valid row of a BLO directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	/// Entry name, NUL-trimmed
	pub name: String,

	/// Absolute offset of the payload within the archive
	pub offset: u32,

	/// Payload size in bytes
	pub size: u32,
}

impl Entry {
	/// Creates a new entry.
	pub fn new(name: impl Into<String>, offset: u32, size: u32) -> Self {
		Self {
			name: name.into(),
			offset,
			size,
		}
	}

	/// Returns the entry name.
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Classifies the entry by its (case-insensitive) suffix.
	pub fn kind(&self) -> EntryKind {
		let lower = self.name.to_ascii_lowercase();
		if lower.ends_with(constants::SPRITE_SUFFIX) {
			EntryKind::Sprite
		} else if lower.ends_with(constants::AUDIO_SUFFIX) {
			EntryKind::Audio
		} else {
			EntryKind::Other
		}
	}

	/// Exclusive end offset of the payload.
	#[inline]
	pub fn end(&self) -> u64 {
		u64::from(self.offset) + u64::from(self.size)
	}
}

impl fmt::Display for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} @ 0x{:08X} ({} bytes)", self.name, self.offset, self.size)
	}
}

/// A parsed BLO archive.
///
/// The archive keeps its raw bytes so entry payloads can be borrowed without
/// copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	/// Complete archive data
	raw: Vec<u8>,

	/// Container format version (1 or 2)
	version: u32,

	/// Number of directory rows declared by the header
	declared_entries: u32,

	/// Valid directory entries, in directory order
	entries: Vec<Entry>,
}

impl File {
	/// Parses an archive from a byte slice.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The data is shorter than the 8-byte header
	/// - The version is not 1 or 2
	/// - The entry count is zero or greater than 10000
	pub fn from_bytes(data: &[u8]) -> Result<Self, BloFileError> {
		Self::from_vec(data.to_vec())
	}

	/// Parses an archive from any reader.
	///
	/// # Errors
	///
	/// Same as [`File::from_bytes`], plus IO errors from the reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, BloFileError> {
		let mut raw = Vec::new();
		reader.read_to_end(&mut raw)?;
		Self::from_vec(raw)
	}

	/// Parses an archive, taking ownership of the buffer.
	///
	/// # Errors
	///
	/// Same as [`File::from_bytes`].
	pub fn from_vec(raw: Vec<u8>) -> Result<Self, BloFileError> {
		let (version, declared_entries, entries) = read_directory(&raw)?;
		Ok(Self {
			raw,
			version,
			declared_entries,
			entries,
		})
	}

	/// Returns the container version.
	#[inline]
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Returns the number of directory rows declared by the header.
	#[inline]
	pub fn declared_entries(&self) -> u32 {
		self.declared_entries
	}

	/// Returns the valid directory entries.
	#[inline]
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Returns the archive length in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.raw.len()
	}

	/// Returns `true` if the archive holds no bytes.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.raw.is_empty()
	}

	/// Returns the raw archive bytes.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		&self.raw
	}

	/// Finds an entry by exact name.
	pub fn find(&self, name: &str) -> Option<&Entry> {
		self.entries.iter().find(|entry| entry.name == name)
	}

	/// Borrows the payload of an entry.
	///
	/// # Errors
	///
	/// Returns [`BloFileError::InvalidEntry`] if the entry's range runs past
	/// the end of the archive.
	pub fn entry_data(&self, entry: &Entry) -> Result<&[u8], BloFileError> {
		if entry.end() > self.raw.len() as u64 {
			return Err(BloFileError::InvalidEntry {
				name: entry.name.clone(),
				offset: entry.offset,
				size: entry.size,
				available: self.raw.len(),
			});
		}

		let start = entry.offset as usize;
		Ok(&self.raw[start..start + entry.size as usize])
	}

	/// Returns an iterator over entries and their payloads.
	pub fn iter(&self) -> EntryIterator<'_> {
		EntryIterator {
			file: self,
			current_index: 0,
		}
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"BLO v{}: {}/{} entries, {} bytes",
			self.version,
			self.entries.len(),
			self.declared_entries,
			self.raw.len()
		)
	}
}

/// Iterator over `(entry, payload)` pairs of an archive.
///
/// Entries whose range exceeds the archive yield an error instead of a slice.
#[derive(Debug, Clone)]
pub struct EntryIterator<'a> {
	file: &'a File,
	current_index: usize,
}

impl<'a> Iterator for EntryIterator<'a> {
	type Item = (&'a Entry, Result<&'a [u8], BloFileError>);

	fn next(&mut self) -> Option<Self::Item> {
		let entry = self.file.entries.get(self.current_index)?;
		self.current_index += 1;
		Some((entry, self.file.entry_data(entry)))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.file.entries.len() - self.current_index;
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for EntryIterator<'_> {}

impl<'a> IntoIterator for &'a File {
	type Item = (&'a Entry, Result<&'a [u8], BloFileError>);
	type IntoIter = EntryIterator<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Decodes a NUL-padded, single-byte encoded name field.
fn decode_name(field: &[u8]) -> String {
	let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
	let (name, _) = WINDOWS_1252.decode_without_bom_handling(&field[..end]);
	name.into_owned()
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
	u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Reads the header and directory, keeping only usable rows.
fn read_directory(raw: &[u8]) -> Result<(u32, u32, Vec<Entry>), BloFileError> {
	if raw.len() < constants::HEADER_SIZE {
		return Err(BloFileError::insufficient_data(
			FileType::Blo,
			constants::HEADER_SIZE,
			raw.len(),
		));
	}

	let version = read_u32(raw, 0);
	if !(1..=2).contains(&version) {
		return Err(BloFileError::UnsupportedContainerVersion(version));
	}

	let entry_count = read_u32(raw, 4);
	if entry_count == 0 || entry_count > constants::MAX_ENTRY_COUNT {
		return Err(BloFileError::InvalidEntryCount(entry_count));
	}

	debug!("BLO v{version}: {entry_count} directory rows");

	let name_len = name_length(version);
	let row_size = name_len + 8;
	let mut entries = Vec::with_capacity(entry_count as usize);
	let mut offset = constants::HEADER_SIZE;

	for i in 0..entry_count {
		if offset + row_size > raw.len() {
			warn!("BLO directory truncated at row {i} of {entry_count}");
			break;
		}

		let name = decode_name(&raw[offset..offset + name_len]);
		let entry_offset = read_u32(raw, offset + name_len);
		let size = read_u32(raw, offset + name_len + 4);
		offset += row_size;

		if name.is_empty() || size == 0 || entry_offset as usize >= raw.len() {
			continue;
		}

		debug!("Entry {i}: \"{name}\" at {entry_offset}, size {size}");
		entries.push(Entry::new(name, entry_offset, size));
	}

	Ok((version, entry_count, entries))
}
