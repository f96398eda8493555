//! Loading of whole containers.
//!
//! [`Archive::load`] runs the complete pipeline for one `.blo` file: the
//! directory is read, every `.cfs` entry is decoded into a sprite record and
//! every `.wav` entry is kept as an opaque audio clip.

mod category;
mod library;

use std::{collections::BTreeMap, fmt, io::Read};

use log::{debug, info, warn};

use crate::file::{
	BloFileError,
	audio::AudioClip,
	blo::{self, Entry, EntryKind},
	cfs::SpriteRecord,
};

pub use category::Category;
pub use library::{Library, LibraryConfig, SearchResults};

/// A decoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
	/// File name of the container
	name: String,

	/// Container format version
	version: u32,

	/// Valid directory entries
	entries: Vec<Entry>,

	/// Decoded sprites, in directory order
	sprites: Vec<SpriteRecord>,

	/// Audio clips keyed by entry name
	audio: BTreeMap<String, AudioClip>,
}

impl Archive {
	/// Decodes every sprite and audio entry of a container.
	///
	/// Sprite entries always produce a record (the placeholder when they
	/// cannot be decoded). Entries whose byte range exceeds the container are
	/// skipped with a warning.
	///
	/// # Arguments
	///
	/// * `name` - File name of the container
	/// * `data` - Complete container bytes
	///
	/// # Errors
	///
	/// Returns an error if the container header or directory is unreadable
	/// (bad version, bad entry count, fewer than 8 bytes).
	pub fn load(name: impl Into<String>, data: Vec<u8>) -> Result<Self, BloFileError> {
		let name = name.into();
		let container = blo::File::from_vec(data)?;
		debug!("{name}: {container}");

		let mut sprites = Vec::new();
		let mut audio = BTreeMap::new();

		for (entry, payload) in &container {
			let kind = entry.kind();
			if kind == EntryKind::Other {
				debug!("{name}: ignoring \"{}\"", entry.name);
				continue;
			}

			let payload = match payload {
				Ok(payload) => payload,
				Err(err) => {
					warn!("{name}: {err}, skipping");
					continue;
				}
			};

			match kind {
				EntryKind::Sprite => sprites.push(SpriteRecord::decode(&entry.name, payload)),
				EntryKind::Audio => {
					audio.insert(entry.name.clone(), AudioClip::new(entry.name.clone(), payload.to_vec()));
				}
				EntryKind::Other => {}
			}
		}

		info!("{name}: {} sprites, {} audio clips", sprites.len(), audio.len());

		Ok(Self {
			name,
			version: container.version(),
			entries: container.entries().to_vec(),
			sprites,
			audio,
		})
	}

	/// Reads and decodes a container from any reader.
	///
	/// # Errors
	///
	/// Same as [`Archive::load`], plus IO errors from the reader.
	pub fn from_reader<R: Read>(name: impl Into<String>, reader: &mut R) -> Result<Self, BloFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::load(name, data)
	}

	/// Returns the container file name.
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the container version.
	#[inline]
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Returns the valid directory entries.
	#[inline]
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Returns the decoded sprites.
	#[inline]
	pub fn sprites(&self) -> &[SpriteRecord] {
		&self.sprites
	}

	/// Finds a sprite by entry name.
	pub fn sprite(&self, name: &str) -> Option<&SpriteRecord> {
		self.sprites.iter().find(|sprite| sprite.name() == name)
	}

	/// Returns the audio clips, ordered by name.
	pub fn audio_clips(&self) -> impl Iterator<Item = &AudioClip> {
		self.audio.values()
	}

	/// Finds an audio clip by entry name.
	pub fn audio(&self, name: &str) -> Option<&AudioClip> {
		self.audio.get(name)
	}

	/// Category guessed from the container file name.
	pub fn category(&self) -> Category {
		Category::from_file_name(&self.name)
	}
}

impl fmt::Display for Archive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} (BLO v{}, {}): {} sprites, {} audio clips",
			self.name,
			self.version,
			self.category(),
			self.sprites.len(),
			self.audio.len()
		)
	}
}
