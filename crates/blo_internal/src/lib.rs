//! This module is separated into its own crate to enable simple dynamic linking for `blo-rs`, and should not be used directly.

/// `use blo::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export blo_types for convenience
pub use blo_types;

// Re-export commonly used types at crate root
pub use blo_types::{
	archive::{Archive, Library, LibraryConfig},
	file::{BloFile, BloFileError, CfsFile, SpriteRecord},
	render::{RenderSettings, Surface},
};
