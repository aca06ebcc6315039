//! Turns a wheel layout and its contents into plain drawing primitives.
//!
//! Nothing here knows about SVG syntax; [`crate::render`] serializes the
//! result.

use std::collections::HashMap;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::barcode::{BarcodeEncoder, BarcodeSymbol};
use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::geometry::{Point, Size, box_in_box};
use crate::layout::{PlaceholderBox, WheelLayout};
use crate::text_metrics::{GlyphShaper, measure_text};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Rotate { angle: f64, center: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Path {
        d: String,
        stroke: String,
        stroke_width: f64,
        fill: String,
    },
    /// Reference to a symbol whose rectangle already has the symbol's aspect
    /// ratio; `rotation` turns it about the rectangle's center.
    Use {
        href: String,
        insert: Point,
        size: Size,
        rotation: f64,
    },
    Image {
        href: String,
        insert: Point,
        size: Size,
        rotation: f64,
    },
    Rect {
        insert: Point,
        size: Size,
        rotation: f64,
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    Group {
        id: Option<String>,
        transform: Option<Transform>,
        children: Vec<Element>,
    },
}

/// Text drawn at the font's units per em inside a view box equal to its ink
/// box, so any use of the symbol scales the ink to fill the use rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSymbol {
    pub id: String,
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub insert: Point,
    pub viewbox: Size,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Def {
    Text(TextSymbol),
    Barcode(BarcodeSymbol),
    Style(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub viewbox_origin: Point,
    pub viewbox: Size,
    pub defs: Vec<Def>,
    pub body: Vec<Element>,
}

pub fn text_filled_symbol<S: GlyphShaper + ?Sized>(
    shaper: &mut S,
    text: &str,
    family: &str,
    id: impl Into<String>,
) -> Result<TextSymbol> {
    let measured = measure_text(shaper, text, family)?;
    Ok(TextSymbol {
        id: id.into(),
        text: text.to_string(),
        font_family: family.to_string(),
        font_size: f64::from(measured.units_per_em),
        insert: Point::new(measured.bbox.x_offset, measured.bbox.y_offset),
        viewbox: measured.bbox.size(),
    })
}

/// Path data for the wheel: for every slice a spoke out to its first
/// vertex, the arc to its second vertex, and a move back to the center.
pub fn wheel_path(layout: &WheelLayout) -> String {
    let center = layout.config.center;
    let radius = layout.config.radius;
    let mut d = format!("M {} {}", center.x, center.y);
    for pair in &layout.edges {
        d.push_str(&format!(" L {} {}", pair.start.x, pair.start.y));
        d.push_str(&format!(
            " A {radius} {radius} 0 0 1 {} {}",
            pair.end.x, pair.end.y
        ));
        d.push_str(&format!(" M {} {}", center.x, center.y));
    }
    d.push_str(" Z");
    d
}

/// External collaborators and the content of each slice.
pub struct WheelContents<'a> {
    pub catalog: &'a [CatalogEntry],
    pub encoder: Option<&'a dyn BarcodeEncoder>,
    /// Inline picture files as base64 data URIs instead of linking them.
    pub embed_pictures: bool,
}

impl WheelContents<'_> {
    pub fn template() -> Self {
        WheelContents {
            catalog: &[],
            encoder: None,
            embed_pictures: false,
        }
    }
}

/// Reads a picture and returns it as a `data:` URI.
pub fn picture_data_uri(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        picture_mime(path),
        STANDARD.encode(bytes)
    ))
}

fn picture_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn assemble_wheel<S: GlyphShaper + ?Sized>(
    layout: &WheelLayout,
    contents: &WheelContents<'_>,
    shaper: &mut S,
    theme: &Theme,
) -> Result<Document> {
    let config = &layout.config;
    let mut assembler = Assembler {
        shaper,
        theme,
        defs: Vec::new(),
        embed_pictures: contents.embed_pictures,
        text_ids: HashMap::new(),
        barcode_ids: HashMap::new(),
        viewboxes: HashMap::new(),
        pictures: HashMap::new(),
    };
    let placeholder = assembler.text_symbol(&theme.placeholder_text)?;

    if contents.catalog.len() > layout.slices.len() {
        log::warn!(
            "catalog has {} entries but the wheel only {} slices; extra entries are left out",
            contents.catalog.len(),
            layout.slices.len()
        );
    }

    let mut body = vec![Element::Path {
        d: wheel_path(layout),
        stroke: theme.wheel_stroke.clone(),
        stroke_width: theme.wheel_stroke_width,
        fill: "none".to_string(),
    }];

    for slice in &layout.slices {
        let entry = contents.catalog.get(slice.index);
        let mut children = Vec::with_capacity(slice.boxes.len());
        for placed in &slice.boxes {
            children.push(assembler.region(placed, entry, contents.encoder, &placeholder)?);
            if theme.draws_outlines() {
                children.push(Element::Rect {
                    insert: placed.insert,
                    size: placed.size,
                    rotation: 0.0,
                    fill: "none".to_string(),
                    stroke: theme.outline_stroke.clone(),
                    stroke_width: theme.wheel_stroke_width / 4.0,
                });
            }
        }
        body.push(Element::Group {
            id: Some(format!("slice-{}", slice.index)),
            transform: Some(Transform::Rotate {
                angle: slice.rotation,
                center: config.center,
            }),
            children,
        });
    }

    let mut defs = assembler.defs;
    defs.push(Def::Style(barcode_style(theme)));
    Ok(Document {
        viewbox_origin: Point::new(config.center.x - config.radius, config.center.y - config.radius),
        viewbox: Size::new(config.radius * 2.0, config.radius * 2.0),
        defs,
        body,
    })
}

struct Assembler<'a, S: GlyphShaper + ?Sized> {
    shaper: &'a mut S,
    theme: &'a Theme,
    defs: Vec<Def>,
    embed_pictures: bool,
    text_ids: HashMap<String, String>,
    barcode_ids: HashMap<String, String>,
    /// View box of every symbol emitted so far, by id.
    viewboxes: HashMap<String, Size>,
    /// Picture href by path, so each file is read once.
    pictures: HashMap<String, String>,
}

impl<S: GlyphShaper + ?Sized> Assembler<'_, S> {
    fn text_symbol(&mut self, text: &str) -> Result<String> {
        if let Some(id) = self.text_ids.get(text) {
            return Ok(id.clone());
        }
        let id = format!("text-{}", self.text_ids.len());
        let symbol = text_filled_symbol(self.shaper, text, &self.theme.font_family, id.clone())?;
        self.viewboxes.insert(id.clone(), symbol.viewbox);
        self.defs.push(Def::Text(symbol));
        self.text_ids.insert(text.to_string(), id.clone());
        Ok(id)
    }

    fn barcode_symbol(
        &mut self,
        entry: &CatalogEntry,
        encoder: &dyn BarcodeEncoder,
    ) -> Result<String> {
        if let Some(id) = self.barcode_ids.get(entry.upc.as_str()) {
            return Ok(id.clone());
        }
        let symbol = BarcodeSymbol::encode(encoder, &entry.upc)?;
        let id = symbol.id.clone();
        self.viewboxes.insert(id.clone(), symbol.viewbox);
        self.defs.push(Def::Barcode(symbol));
        self.barcode_ids
            .insert(entry.upc.as_str().to_string(), id.clone());
        Ok(id)
    }

    fn region(
        &mut self,
        placed: &PlaceholderBox,
        entry: Option<&CatalogEntry>,
        encoder: Option<&dyn BarcodeEncoder>,
        placeholder: &str,
    ) -> Result<Element> {
        let Some(entry) = entry else {
            return Ok(self.fitted_use(placed, placeholder));
        };

        let href = match placed.name.as_str() {
            "barcode" => match encoder {
                Some(encoder) => self.barcode_symbol(entry, encoder)?,
                None => placeholder.to_string(),
            },
            "upc" => self.text_symbol(entry.upc.as_str())?,
            "name" if entry.name.trim().is_empty() => {
                log::warn!("{} has no name, keeping the placeholder", entry.upc);
                placeholder.to_string()
            }
            "name" => self.text_symbol(&entry.name)?,
            "picture" => match &entry.picture {
                Some(path) => {
                    return Ok(Element::Image {
                        href: self.picture_href(path)?,
                        insert: placed.insert,
                        size: placed.size,
                        rotation: placed.rotation,
                    });
                }
                None => placeholder.to_string(),
            },
            _ => placeholder.to_string(),
        };
        Ok(self.fitted_use(placed, &href))
    }

    /// A `Use` of `href` scaled into the region and centered in it.
    fn fitted_use(&self, placed: &PlaceholderBox, href: &str) -> Element {
        let fit = self
            .viewboxes
            .get(href)
            .map(|viewbox| box_in_box(*viewbox, placed.size));
        let (insert, size) = match fit {
            Some(Ok(fit)) => (
                Point::new(placed.insert.x + fit.x_offset, placed.insert.y + fit.y_offset),
                fit.size(),
            ),
            // A region squeezed to nothing by the arc keeps its own rectangle.
            _ => (placed.insert, placed.size),
        };
        Element::Use {
            href: href.to_string(),
            insert,
            size,
            rotation: placed.rotation,
        }
    }

    fn picture_href(&mut self, path: &str) -> Result<String> {
        if !self.embed_pictures {
            return Ok(path.to_string());
        }
        if let Some(href) = self.pictures.get(path) {
            return Ok(href.clone());
        }
        let href = picture_data_uri(Path::new(path))?;
        log::debug!("embedded {path} ({} bytes of data URI)", href.len());
        self.pictures.insert(path.to_string(), href.clone());
        Ok(href)
    }
}

fn barcode_style(theme: &Theme) -> String {
    format!(
        ".background {{ fill: {}; stroke: none; }} .foreground {{ fill: {}; stroke: none; }} .fitted-text {{ fill: {}; }}",
        theme.background, theme.foreground, theme.foreground
    )
}
