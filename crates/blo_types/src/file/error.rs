//! Error types for file format parsing and manipulation.

use std::fmt;

use thiserror::Error;

/// Kinds of files handled by this crate, used to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.blo` container archive
	Blo,
	/// `.cfs` sprite animation record
	Cfs,
	/// `.wav` audio clip
	Wav,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Blo => write!(f, "BLO"),
			Self::Cfs => write!(f, "CFS"),
			Self::Wav => write!(f, "WAV"),
		}
	}
}

/// Errors that can occur when parsing or building BLO, CFS and WAV data.
#[derive(Debug, Error)]
pub enum BloFileError {
	/// Container header declares a version other than 1 or 2
	#[error("Unsupported container version: {0}")]
	UnsupportedContainerVersion(u32),

	/// Container header declares zero or more than 10000 entries
	#[error("Invalid entry count: {0}")]
	InvalidEntryCount(u32),

	/// Sprite record version outside 2..=5
	#[error("Unsupported CFS version: {0}")]
	UnsupportedSpriteVersion(u16),

	/// Sprite logical cell outside `(0, 1024]` on either axis
	#[error("Invalid sprite dimensions: {width}x{height}")]
	InvalidSpriteDimensions {
		/// Declared width
		width: u16,
		/// Declared height
		height: u16,
	},

	/// Not enough data to parse a structure
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// File type being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// A directory entry points outside of its archive
	#[error("Entry \"{name}\" at {offset} (+{size} bytes) exceeds archive length {available}")]
	InvalidEntry {
		/// Entry name
		name: String,
		/// Entry start offset
		offset: u32,
		/// Entry size in bytes
		size: u32,
		/// Archive length in bytes
		available: usize,
	},

	/// WAV header could not be read
	#[error("WAV error: {0}")]
	Wav(#[from] hound::Error),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl BloFileError {
	/// Shorthand for [`BloFileError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Returns `true` for errors that abort a whole container load.
	pub fn is_container_fatal(&self) -> bool {
		matches!(self, Self::UnsupportedContainerVersion(_) | Self::InvalidEntryCount(_))
	}
}
