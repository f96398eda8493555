//! Prelude module for `blo_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use blo_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let record = SpriteRecord::fallback("missing.cfs");
//! let thumb = thumbnail(&record, 70);
//! assert_eq!(thumb.width(), 70);
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Audio types
	AudioClip,

	// BLO types
	BloEntry,
	BloFile,
	BloFileBuilder,
	BloFileError,

	// CFS types
	CfsFile,
	CfsHeader,
	CfsLayout,
	Color,
	EntryKind,
	FileType,
	Frame,
	FrameDescriptor,
	Grid,
	Palette,
	SpriteRecord,
};

#[doc(inline)]
pub use crate::file::cfs::Encoder;

// Container loading
#[doc(inline)]
pub use crate::archive::{Archive, Category, Library, LibraryConfig};

// Rendering
#[doc(inline)]
pub use crate::render::{
	ColorAdjust, RenderSettings, Resolver, Surface, compose, compose_cell, compose_frame, thumbnail,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
