//! This crate provides the data types, decoders and compositor for the `blo-rs` project.
//!
//! # File Formats
//!
//! - **BLO**: Flat container archives holding named entries
//! - **CFS**: Versioned sprite animation records with palette and RLE frames
//! - **WAV**: Audio entries, passed through untouched
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```
//! use blo_types::prelude::*;
//!
//! let record = Encoder::new(CfsLayout::V4, 8, 8)
//!     .grid(1, 1)
//!     .frame(0, 0, 2, 2, vec![1, 2, 3, 4])
//!     .build();
//! let container = BloFileBuilder::new(2).entry("walk_N.cfs", record).build();
//!
//! let archive = Archive::load("gfx.blo", container).unwrap();
//! let surface = compose(&archive.sprites()[0], 0, 0, &RenderSettings::preview());
//! assert_eq!(surface.width(), 256);
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use blo_types::file::{BloFile, CfsFile};
//!
//! let data = std::fs::read("gfx.blo").unwrap();
//! let blo = BloFile::from_vec(data).unwrap();
//! for (entry, payload) in &blo {
//!     if let Ok(payload) = payload {
//!         let record = CfsFile::decode(entry.name(), payload);
//!         println!("{record}");
//!     }
//! }
//! ```

pub mod archive;
pub mod file;
pub mod render;

/// `use blo_types::prelude::*;` to import commonly used items.
pub mod prelude;
