//! Fits measured text into a target rectangle.
//!
//! [`scaled_text_bounding_box`] is for scaling already-rendered text (a
//! symbol drawn at the font's units per em); [`font_size_in_box`] is for
//! re-rendering the text at the size that fills the box. Both use the same
//! scale factor.

use crate::error::{Result, WheelError};
use crate::geometry::{BoundingBox, Size, scale_factor};
use crate::text_metrics::{GlyphShaper, measure_text};

/// Measures `text` and scales its box and offsets to fit `target`.
pub fn scaled_text_bounding_box<S: GlyphShaper + ?Sized>(
    shaper: &mut S,
    target: Size,
    text: &str,
    family: &str,
) -> Result<BoundingBox> {
    // Checked before shaping so a bad target fails without touching fonts.
    if !(target.width > 0.0 && target.height > 0.0) {
        return Err(WheelError::invalid_dimension(
            "scaled_text_bounding_box target",
            target.width,
            target.height,
        ));
    }
    let measured = measure_text(shaper, text, family)?;
    let scale = scale_factor(measured.bbox.size(), target)?;
    Ok(measured.bbox.scaled(scale))
}

/// Largest font size at which `text` fits in `target` on a single line.
///
/// The result is in the same units the shaper reports units per em in, so a
/// string drawn at this size spans `target` exactly on its tighter axis.
pub fn font_size_in_box<S: GlyphShaper + ?Sized>(
    shaper: &mut S,
    target: Size,
    text: &str,
    family: &str,
) -> Result<f64> {
    let measured = measure_text(shaper, text, family)?;
    let scale = scale_factor(measured.bbox.size(), target)?;
    Ok(f64::from(measured.units_per_em) * scale)
}
