//! File format support for the `blo-rs` project.

mod error;
mod reader;

pub mod audio;
pub mod blo;
pub mod cfs;

// Re-export unified error type
pub use error::{BloFileError, FileType};

// Re-export main file types
pub use audio::AudioClip;
pub use blo::{Entry as BloEntry, EntryKind, File as BloFile, FileBuilder as BloFileBuilder};
pub use cfs::{
	Color, Encoder as CfsEncoder, File as CfsFile, Frame, FrameDescriptor, Grid, Header as CfsHeader,
	Layout as CfsLayout, Palette, SpriteRecord,
};
