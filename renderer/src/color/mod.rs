mod rgba;
mod xyza;

pub use rgba::RgbaSpectrum;
pub use xyza::Xyza;

/// Alias used throughout the renderer wherever the spec's "Rgb" color type
/// is referenced; kept distinct from `RgbaSpectrum` only in name so callers
/// that never touch the alpha channel read naturally.
pub type Rgb = RgbaSpectrum;
