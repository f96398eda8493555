//! Color resolution and compositing of decoded sprites.

pub mod color;
pub mod compose;
pub mod settings;

pub use color::{ColorAdjust, Resolver, resolve};
pub use compose::{Surface, compose, compose_cell, compose_frame, resolve_frame, thumbnail};
pub use settings::RenderSettings;
