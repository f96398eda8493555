//! A bounded set of loaded containers.

use std::collections::VecDeque;

use log::info;
use serde::{Deserialize, Serialize};

use super::Archive;
use crate::file::{BloFileError, audio::AudioClip, cfs::SpriteRecord};

/// Library limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
	/// Containers kept resident before the oldest is evicted
	pub max_loaded: usize,
}

impl Default for LibraryConfig {
	fn default() -> Self {
		Self {
			max_loaded: 12,
		}
	}
}

/// Matches of a library search, each paired with its container name.
#[derive(Debug, Clone, Default)]
pub struct SearchResults<'a> {
	/// Matching sprites
	pub sprites: Vec<(&'a str, &'a SpriteRecord)>,
	/// Matching audio clips
	pub audio: Vec<(&'a str, &'a AudioClip)>,
}

impl SearchResults<'_> {
	/// Total number of matches.
	pub fn len(&self) -> usize {
		self.sprites.len() + self.audio.len()
	}

	/// Returns `true` if nothing matched.
	pub fn is_empty(&self) -> bool {
		self.sprites.is_empty() && self.audio.is_empty()
	}
}

/// Loaded containers, most recently loaded first.
///
/// # Examples
///
/// ```
/// use blo_types::archive::{Library, LibraryConfig};
/// use blo_types::file::blo::FileBuilder;
///
/// let mut library = Library::new(LibraryConfig { max_loaded: 1 });
/// library.load("a.blo", FileBuilder::new(2).entry("x.wav", vec![1]).build()).unwrap();
/// let evicted = library.load("b.blo", FileBuilder::new(2).entry("y.wav", vec![1]).build()).unwrap();
/// assert_eq!(evicted, vec!["a.blo".to_string()]);
/// assert_eq!(library.status(), "1/1 files in memory");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Library {
	config: LibraryConfig,
	archives: VecDeque<Archive>,
}

impl Library {
	/// Creates an empty library.
	///
	/// A `max_loaded` of zero is raised to one.
	pub fn new(config: LibraryConfig) -> Self {
		Self {
			config: LibraryConfig {
				max_loaded: config.max_loaded.max(1),
			},
			archives: VecDeque::new(),
		}
	}

	/// Returns the configuration.
	#[inline]
	pub fn config(&self) -> &LibraryConfig {
		&self.config
	}

	/// Decodes a container and adds it.
	///
	/// Returns the names of containers evicted to stay within the limit.
	///
	/// # Errors
	///
	/// Propagates container-level errors from [`Archive::load`]; the library
	/// is left unchanged in that case.
	pub fn load(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<Vec<String>, BloFileError> {
		let archive = Archive::load(name, data)?;
		Ok(self.insert(archive))
	}

	/// Adds an already decoded container.
	///
	/// A container with the same name is replaced, sprites included. Returns
	/// the names of evicted containers, least recently loaded last.
	pub fn insert(&mut self, archive: Archive) -> Vec<String> {
		self.archives.retain(|loaded| loaded.name() != archive.name());
		self.archives.push_front(archive);

		let limit = self.config.max_loaded;
		let mut evicted = Vec::new();
		while self.archives.len() > limit {
			if let Some(oldest) = self.archives.pop_back() {
				info!("Unloaded {} to free memory", oldest.name());
				evicted.push(oldest.name);
			}
		}
		evicted
	}

	/// Removes a container by name.
	pub fn unload(&mut self, name: &str) -> Option<Archive> {
		let index = self.archives.iter().position(|archive| archive.name() == name)?;
		self.archives.remove(index)
	}

	/// Finds a loaded container by name.
	pub fn get(&self, name: &str) -> Option<&Archive> {
		self.archives.iter().find(|archive| archive.name() == name)
	}

	/// Loaded containers, most recently loaded first.
	pub fn archives(&self) -> impl Iterator<Item = &Archive> {
		self.archives.iter()
	}

	/// Number of loaded containers.
	#[inline]
	pub fn len(&self) -> usize {
		self.archives.len()
	}

	/// Returns `true` if nothing is loaded.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.archives.is_empty()
	}

	/// All sprites with their container names.
	pub fn sprites(&self) -> impl Iterator<Item = (&str, &SpriteRecord)> {
		self.archives
			.iter()
			.flat_map(|archive| archive.sprites().iter().map(move |sprite| (archive.name(), sprite)))
	}

	/// Case-insensitive substring search over sprite and audio names.
	pub fn search(&self, query: &str) -> SearchResults<'_> {
		let query = query.to_lowercase();
		let matches = |name: &str| name.to_lowercase().contains(&query);

		let mut results = SearchResults::default();
		for archive in &self.archives {
			results.sprites.extend(
				archive
					.sprites()
					.iter()
					.filter(|sprite| matches(sprite.name()))
					.map(|sprite| (archive.name(), sprite)),
			);
			results.audio.extend(
				archive.audio_clips().filter(|clip| matches(clip.name())).map(|clip| (archive.name(), clip)),
			);
		}
		results
	}

	/// Memory summary, e.g. `"3/12 files in memory"`.
	pub fn status(&self) -> String {
		format!("{}/{} files in memory", self.archives.len(), self.config.max_loaded)
	}
}
