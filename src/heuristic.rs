use crate::error::Result;
use crate::text_metrics::{GlyphRecord, GlyphRun, GlyphShaper};

const UNITS_PER_EM: u16 = 1000;
const CAP_HEIGHT: i32 = 716;
const X_HEIGHT: i32 = 519;
const ASCENDER: i32 = 750;
const DESCENDER: i32 = -210;

/// Synthesizes glyph runs from calibrated per-character widths, for previews
/// without a usable system font. Ink boxes are coarse: capitals and digits
/// reach cap height, lowercase reaches x-height or ascender height, and a few
/// letters descend.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicShaper;

impl GlyphShaper for HeuristicShaper {
    fn shape(&mut self, text: &str, _family: &str) -> Result<GlyphRun> {
        if text.trim().is_empty() {
            return Ok(GlyphRun::new(Vec::new(), UNITS_PER_EM));
        }
        let glyphs = text
            .chars()
            .filter(|ch| *ch != '\n' && *ch != '\r')
            .map(synthesize_glyph)
            .collect();
        Ok(GlyphRun::new(glyphs, UNITS_PER_EM))
    }
}

fn synthesize_glyph(ch: char) -> GlyphRecord {
    let advance = (char_width_factor(ch) * f32::from(UNITS_PER_EM)).round() as i32;
    let mut record = GlyphRecord {
        x_advance: advance,
        ..GlyphRecord::default()
    };
    if ch.is_whitespace() {
        return record;
    }

    let (top, bottom) = vertical_ink(ch);
    // Side bearings of roughly 6% of the advance on each side.
    let bearing = advance * 6 / 100;
    record.x_bearing = bearing;
    record.width = (advance - 2 * bearing).max(1);
    record.y_bearing = top;
    record.height = bottom - top;
    record
}

fn vertical_ink(ch: char) -> (i32, i32) {
    match ch {
        'g' | 'p' | 'q' | 'y' => (X_HEIGHT, DESCENDER),
        'j' => (ASCENDER, DESCENDER),
        'b' | 'd' | 'f' | 'h' | 'i' | 'k' | 'l' | 't' => (ASCENDER, 0),
        '(' | ')' | '[' | ']' | '{' | '}' | '|' => (ASCENDER, DESCENDER),
        '.' | ',' => (X_HEIGHT / 4, 0),
        '-' => (X_HEIGHT * 3 / 5, X_HEIGHT * 2 / 5),
        c if c.is_ascii_lowercase() => (X_HEIGHT, 0),
        _ => (CAP_HEIGHT, 0),
    }
}

/// Advance widths in em, calibrated against a common sans-serif stack.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        '0' => 0.613,
        '1' => 0.396,
        '2' => 0.609,
        '3' => 0.597,
        '4' => 0.614,
        '5' => 0.586,
        '6' => 0.608,
        '7' => 0.559,
        '8' => 0.611,
        '9' => 0.595,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}
