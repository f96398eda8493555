//! Rendering configuration.

use serde::{Deserialize, Serialize};

use super::color::ColorAdjust;
use crate::file::cfs::Color;

/// Zoom range accepted by the compositor.
pub const ZOOM_RANGE: (f64, f64) = (0.5, 20.0);

/// Largest hue shift in degrees, either direction.
pub const MAX_HUE_SHIFT: f64 = 360.0;

/// Largest saturation or value delta, either direction.
pub const MAX_SV_ADJUST: f64 = 100.0;

/// Settings for composing a frame onto an output surface.
///
/// Deserializes from partial input; missing fields take their defaults.
///
/// # Presets
///
/// - `default()`: 700×700 surface at 2× zoom, transparent background
/// - `preview()`: 256×256 surface at 1× zoom
/// - `thumbnail()`: 70×70 surface at 1× zoom on a dark background
///
/// # Examples
///
/// ```
/// use blo_types::render::RenderSettings;
///
/// let settings = RenderSettings {
///     zoom: 50.0,
///     ..RenderSettings::default()
/// };
/// assert_eq!(settings.effective_zoom(), 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
	/// Output surface width in pixels
	pub surface_width: u32,
	/// Output surface height in pixels
	pub surface_height: u32,
	/// Scale of the logical cell on the surface
	pub zoom: f64,
	/// Hue rotation in degrees
	pub hue_shift: f64,
	/// Saturation delta, -100 to 100
	pub saturation_adjust: f64,
	/// Value delta, -100 to 100
	pub value_adjust: f64,
	/// Surface fill as `[r, g, b, a]`, transparent when absent
	pub background: Option<[u8; 4]>,
}

impl Default for RenderSettings {
	fn default() -> Self {
		Self {
			surface_width: 700,
			surface_height: 700,
			zoom: 2.0,
			hue_shift: 0.0,
			saturation_adjust: 0.0,
			value_adjust: 0.0,
			background: None,
		}
	}
}

impl RenderSettings {
	/// Smaller surface at native scale.
	pub fn preview() -> Self {
		Self {
			surface_width: 256,
			surface_height: 256,
			zoom: 1.0,
			..Self::default()
		}
	}

	/// Settings matching sprite list thumbnails.
	pub fn thumbnail() -> Self {
		Self {
			surface_width: 70,
			surface_height: 70,
			zoom: 1.0,
			background: Some([0x1E, 0x1E, 0x1E, 0xFF]),
			..Self::default()
		}
	}

	/// Returns a copy with every field inside its accepted range.
	pub fn clamped(&self) -> Self {
		Self {
			zoom: self.effective_zoom(),
			hue_shift: self.hue_shift.clamp(-MAX_HUE_SHIFT, MAX_HUE_SHIFT),
			saturation_adjust: self.saturation_adjust.clamp(-MAX_SV_ADJUST, MAX_SV_ADJUST),
			value_adjust: self.value_adjust.clamp(-MAX_SV_ADJUST, MAX_SV_ADJUST),
			..self.clone()
		}
	}

	/// Zoom clamped to [`ZOOM_RANGE`]; NaN falls back to 1.
	pub fn effective_zoom(&self) -> f64 {
		if self.zoom.is_nan() {
			return 1.0;
		}
		self.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1)
	}

	/// Color adjustment with clamped deltas.
	pub fn adjust(&self) -> ColorAdjust {
		let clamped = self.clamped();
		ColorAdjust::new(clamped.hue_shift, clamped.saturation_adjust, clamped.value_adjust)
	}

	/// Background as a color.
	pub fn background_color(&self) -> Option<Color> {
		self.background.map(|[r, g, b, a]| Color::new(r, g, b, a))
	}
}
