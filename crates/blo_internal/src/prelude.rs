//! Prelude module for `blo_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use blo_internal::prelude::*;
//!
//! let library = Library::new(LibraryConfig::default());
//! assert_eq!(library.status(), "0/12 files in memory");
//!
//! let record = SpriteRecord::fallback("missing.cfs");
//! let surface = compose_frame(&record, 0, &RenderSettings::default());
//! assert_eq!((surface.width(), surface.height()), (700, 700));
//! ```

// Re-export everything from blo_types::prelude
#[doc(inline)]
pub use blo_types::prelude::*;

// Re-export the entire blo_types module for advanced usage
#[doc(inline)]
pub use blo_types;
