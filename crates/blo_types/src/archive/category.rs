//! Container categories guessed from file names.

use std::fmt;

use serde::{Deserialize, Serialize};

const GRAPHICS_KEYWORDS: [&str; 9] = ["gfx", "man", "char", "weapon", "vehicle", "tile", "floor", "wall", "object"];

const SOUND_KEYWORDS: [&str; 5] = ["sound", "audio", "sfx", "music", "voice"];

/// Broad content category of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	/// Sprite sheets and other graphics
	#[default]
	Graphics,
	/// Sound effects, music and voice
	Sounds,
}

impl Category {
	/// Guesses the category from keywords in a file name.
	///
	/// Graphics keywords win over sound keywords; names matching neither are
	/// graphics.
	pub fn from_file_name(name: &str) -> Self {
		let name = name.to_lowercase();
		if GRAPHICS_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
			Self::Graphics
		} else if SOUND_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
			Self::Sounds
		} else {
			Self::Graphics
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Graphics => write!(f, "graphics"),
			Self::Sounds => write!(f, "sounds"),
		}
	}
}
