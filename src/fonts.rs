//! Font matching and glyph shaping backed by `fontdb`, `ttf-parser` and
//! `rustybuzz`.
//!
//! [`FontContext`] owns the font cache. Faces are memoized by family for
//! the lifetime of the context. Shaping goes through a [`FontHandle`], which
//! borrows the shared glyph buffer and clears it on acquisition, before every
//! string, and on release.

use std::collections::HashMap;
use std::path::Path;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rustybuzz::ttf_parser::GlyphId;
use rustybuzz::{Face, UnicodeBuffer};

use crate::error::{Result, WheelError};
use crate::text_metrics::{GlyphRecord, GlyphRun, GlyphShaper};

struct LoadedFont {
    family: String,
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
}

impl LoadedFont {
    fn face(&self) -> Result<Face<'_>> {
        Face::from_slice(&self.data, self.index).ok_or_else(|| WheelError::FontNotFound {
            family: self.family.clone(),
        })
    }
}

pub struct FontContext {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFont>>,
    buffer: Vec<GlyphRecord>,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
            buffer: Vec::new(),
        }
    }

    /// Registers a font file so it can be matched by its family name.
    pub fn load_font_file(&mut self, path: &Path) -> Result<()> {
        self.db.load_font_file(path)?;
        // A new face may change what earlier patterns resolve to.
        self.faces.clear();
        Ok(())
    }

    /// Resolves `family` and returns a handle for shaping with it.
    pub fn acquire(&mut self, family: &str) -> Result<FontHandle<'_>> {
        let key = normalize_family_key(family);
        if self.faces.contains_key(&key) {
            log::debug!("font cache hit for '{key}'");
        } else {
            let loaded = self.load_face(&key);
            self.faces.insert(key.clone(), loaded);
        }

        let Some(font) = self.faces.get(&key).and_then(Option::as_ref) else {
            return Err(WheelError::FontNotFound { family: key });
        };
        self.buffer.clear();
        Ok(FontHandle {
            font,
            buffer: &mut self.buffer,
        })
    }

    fn load_face(&mut self, family_key: &str) -> Option<LoadedFont> {
        let names = parse_family_list(family_key);
        let families: Vec<Family<'_>> = names.iter().map(FamilyToken::as_family).collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
            log::debug!("loaded {} system font faces", self.db.len());
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let Some(id) = self.db.query(&query) else {
            log::warn!("no font matches '{family_key}'");
            return None;
        };
        if let Some(info) = self.db.face(id) {
            log::info!("resolved font '{family_key}' to {}", info.post_script_name);
        }

        self.db
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                Some(LoadedFont {
                    family: family_key.to_string(),
                    data: data.to_vec(),
                    index,
                    units_per_em: face.units_per_em().max(1),
                })
            })
            .flatten()
    }
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphShaper for FontContext {
    fn shape(&mut self, text: &str, family: &str) -> Result<GlyphRun> {
        self.acquire(family)?.shape(text)
    }
}

/// A font checked out of a [`FontContext`].
pub struct FontHandle<'a> {
    font: &'a LoadedFont,
    buffer: &'a mut Vec<GlyphRecord>,
}

impl FontHandle<'_> {
    /// Shapes one line of text with HarfBuzz rules (GPOS/`kern` kerning,
    /// ligatures) and records each glyph's ink box from its outline.
    pub fn shape(&mut self, text: &str) -> Result<GlyphRun> {
        self.buffer.clear();
        if text.trim().is_empty() {
            return Ok(GlyphRun::new(Vec::new(), self.font.units_per_em));
        }

        let face = self.font.face()?;
        let mut input = UnicodeBuffer::new();
        input.push_str(&text.replace(['\n', '\r'], ""));
        input.guess_segment_properties();
        let shaped = rustybuzz::shape(&face, &[], input);

        for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
            let mut record = GlyphRecord {
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                ..GlyphRecord::default()
            };
            let glyph = GlyphId(u16::try_from(info.glyph_id).unwrap_or(0));
            if let Some(rect) = face.glyph_bounding_box(glyph) {
                record.x_bearing = i32::from(rect.x_min);
                record.y_bearing = i32::from(rect.y_max);
                record.width = i32::from(rect.x_max) - i32::from(rect.x_min);
                record.height = i32::from(rect.y_min) - i32::from(rect.y_max);
            }
            self.buffer.push(record);
        }

        Ok(GlyphRun::new(self.buffer.clone(), self.font.units_per_em))
    }
}

impl Drop for FontHandle<'_> {
    fn drop(&mut self) {
        self.buffer.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FamilyToken {
    Generic(GenericFamily),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl FamilyToken {
    fn as_family(&self) -> Family<'_> {
        match self {
            FamilyToken::Generic(GenericFamily::Serif) => Family::Serif,
            FamilyToken::Generic(GenericFamily::SansSerif) => Family::SansSerif,
            FamilyToken::Generic(GenericFamily::Monospace) => Family::Monospace,
            FamilyToken::Generic(GenericFamily::Cursive) => Family::Cursive,
            FamilyToken::Generic(GenericFamily::Fantasy) => Family::Fantasy,
            FamilyToken::Name(name) => Family::Name(name.as_str()),
        }
    }
}

/// Splits a CSS-style family list, mapping generic names.
fn parse_family_list(font_family: &str) -> Vec<FamilyToken> {
    let mut order = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        let token = match raw.to_ascii_lowercase().as_str() {
            "serif" => FamilyToken::Generic(GenericFamily::Serif),
            "sans-serif" | "sans" | "system-ui" | "ui-sans-serif" => {
                FamilyToken::Generic(GenericFamily::SansSerif)
            }
            "monospace" | "mono" | "ui-monospace" => FamilyToken::Generic(GenericFamily::Monospace),
            "cursive" => FamilyToken::Generic(GenericFamily::Cursive),
            "fantasy" => FamilyToken::Generic(GenericFamily::Fantasy),
            _ => FamilyToken::Name(raw.to_string()),
        };
        order.push(token);
    }
    if order.is_empty() {
        order.push(FamilyToken::Generic(GenericFamily::SansSerif));
    }
    order
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
