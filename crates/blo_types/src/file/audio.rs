//! `.WAV` audio entries.
//!
//! Audio entries are handed to playback verbatim; nothing here is needed to
//! play them. [`AudioClip::spec`] and [`AudioClip::duration_ms`] only inspect
//! the RIFF header for listings.

use std::{fmt, io::Cursor};

use hound::{WavReader, WavSpec};

use crate::file::BloFileError;

/// An audio entry extracted from a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioClip {
	name: String,
	data: Vec<u8>,
}

impl AudioClip {
	/// Wraps the raw bytes of an audio entry.
	pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}

	/// Returns the entry name.
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the untouched `.wav` bytes.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Consumes the clip, returning its bytes.
	#[inline]
	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}

	/// Size of the clip in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the clip holds no bytes.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	fn reader(&self) -> Result<WavReader<Cursor<&[u8]>>, BloFileError> {
		Ok(WavReader::new(Cursor::new(self.data.as_slice()))?)
	}

	/// Reads the format of the clip from its RIFF header.
	///
	/// # Errors
	///
	/// Returns [`BloFileError::Wav`] if the header is not a valid WAV header.
	pub fn spec(&self) -> Result<WavSpec, BloFileError> {
		Ok(self.reader()?.spec())
	}

	/// Playback length in milliseconds.
	///
	/// # Errors
	///
	/// Returns [`BloFileError::Wav`] if the header is not a valid WAV header.
	pub fn duration_ms(&self) -> Result<u64, BloFileError> {
		let reader = self.reader()?;
		let rate = u64::from(reader.spec().sample_rate);
		if rate == 0 {
			return Ok(0);
		}
		Ok(u64::from(reader.duration()) * 1000 / rate)
	}
}

impl fmt::Display for AudioClip {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "WAV \"{}\": {} bytes", self.name, self.data.len())
	}
}
