//! Measures the ink of a shaped glyph run.
//!
//! The only contract with the shaping engine is [`GlyphRun`]: per-glyph
//! advances, offsets and ink extents in font units, plus the font's units per
//! em. Extents follow the HarfBuzz convention, y axis up: `y_bearing` is the
//! top of the ink above the baseline and `height` is negative, measured from
//! that top down to the bottom of the ink.

use crate::error::{Result, WheelError};
use crate::geometry::BoundingBox;

/// One shaped glyph, in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphRecord {
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_bearing: i32,
    pub y_bearing: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRun {
    pub glyphs: Vec<GlyphRecord>,
    pub units_per_em: u16,
}

impl GlyphRun {
    pub fn new(glyphs: Vec<GlyphRecord>, units_per_em: u16) -> Self {
        Self {
            glyphs,
            units_per_em,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Tight box around all glyph ink, or `None` for an empty run.
    ///
    /// The height runs from the highest ink point to the lowest one, so
    /// descenders count. The width is the pen position of the last glyph plus
    /// that glyph's own ink, not its advance. `y_offset` is the baseline that
    /// puts the top of the tallest glyph at y = 0; `x_offset` shifts the
    /// first glyph's ink to x = 0.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let (first, last) = (self.glyphs.first()?, self.glyphs.last()?);

        let top = self.glyphs.iter().map(|g| g.y_bearing).max()?;
        let bottom = self.glyphs.iter().map(|g| g.y_bearing + g.height).min()?;

        let pen: i64 = self.glyphs[..self.glyphs.len() - 1]
            .iter()
            .map(|g| i64::from(g.x_advance))
            .sum();
        let width = pen + i64::from(last.x_bearing) + i64::from(last.width);

        Some(BoundingBox {
            width: width as f64,
            height: f64::from(top - bottom),
            x_offset: -f64::from(first.x_bearing),
            y_offset: f64::from(top),
        })
    }
}

/// Seam to the external shaping engine.
pub trait GlyphShaper {
    /// Shapes a single-line, single-direction string with the font matched
    /// for `family`. Whitespace-only input shapes to an empty run.
    fn shape(&mut self, text: &str, family: &str) -> Result<GlyphRun>;
}

/// A string's ink box in font units, with the units per em it was shaped at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredText {
    pub bbox: BoundingBox,
    pub units_per_em: u16,
}

pub fn measure_text<S: GlyphShaper + ?Sized>(
    shaper: &mut S,
    text: &str,
    family: &str,
) -> Result<MeasuredText> {
    let run = shaper.shape(text, family)?;
    let bbox = run.bounding_box().ok_or_else(|| WheelError::EmptyInput {
        text: text.to_string(),
    })?;
    log::debug!(
        "measured {text:?} in {family}: {}x{} units ({} glyphs)",
        bbox.width,
        bbox.height,
        run.glyphs.len()
    );
    Ok(MeasuredText {
        bbox,
        units_per_em: run.units_per_em,
    })
}

/// Bounding box of `text` in font units, as seen by the shaper.
pub fn text_bounding_box<S: GlyphShaper + ?Sized>(
    shaper: &mut S,
    text: &str,
    family: &str,
) -> Result<BoundingBox> {
    measure_text(shaper, text, family).map(|measured| measured.bbox)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every glyph is a 600 unit wide box sitting on the baseline, 700 tall.
    /// 'g' and 'y' descend 200 units below it.
    pub(crate) struct MonoShaper;

    impl GlyphShaper for MonoShaper {
        fn shape(&mut self, text: &str, _family: &str) -> Result<GlyphRun> {
            if text.trim().is_empty() {
                return Ok(GlyphRun::new(Vec::new(), 1000));
            }
            let glyphs = text
                .chars()
                .map(|ch| {
                    let descends = matches!(ch, 'g' | 'y');
                    GlyphRecord {
                        x_advance: 600,
                        x_bearing: 0,
                        y_bearing: 700,
                        width: 600,
                        height: if descends { -900 } else { -700 },
                        ..GlyphRecord::default()
                    }
                })
                .collect();
            Ok(GlyphRun::new(glyphs, 1000))
        }
    }

    #[test]
    fn widths_scale_with_glyph_count() {
        let one = text_bounding_box(&mut MonoShaper, "A", "mono").unwrap();
        let two = text_bounding_box(&mut MonoShaper, "AA", "mono").unwrap();
        assert!((two.width / one.width - 2.0).abs() < 1e-9);
        assert_eq!(one.height, two.height);
    }

    #[test]
    fn descenders_extend_height() {
        let flat = text_bounding_box(&mut MonoShaper, "AB", "mono").unwrap();
        let deep = text_bounding_box(&mut MonoShaper, "Ag", "mono").unwrap();
        assert_eq!(flat.height, 700.0);
        assert_eq!(deep.height, 900.0);
        assert_eq!(deep.y_offset, 700.0);
    }

    #[test]
    fn last_glyph_ink_bounds_the_right_edge() {
        let run = GlyphRun::new(
            vec![
                GlyphRecord {
                    x_advance: 500,
                    x_bearing: 40,
                    y_bearing: 700,
                    width: 420,
                    height: -700,
                    ..GlyphRecord::default()
                },
                GlyphRecord {
                    x_advance: 650,
                    x_bearing: 30,
                    y_bearing: 500,
                    width: 200,
                    height: -500,
                    ..GlyphRecord::default()
                },
            ],
            1000,
        );
        let bbox = run.bounding_box().unwrap();
        assert_eq!(bbox.width, 500.0 + 30.0 + 200.0);
        assert_eq!(bbox.x_offset, -40.0);
        assert_eq!(bbox.y_offset, 700.0);
    }

    #[test]
    fn whitespace_is_empty_input() {
        for text in ["", "   ", "\t"] {
            let err = text_bounding_box(&mut MonoShaper, text, "mono").unwrap_err();
            assert!(matches!(err, WheelError::EmptyInput { .. }), "{text:?}");
        }
    }
}
