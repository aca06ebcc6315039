//! UPC values and the external barcode encoder.
//!
//! The encoder is only trusted to produce rectangles. Its SVG output is
//! reduced to a flat list of bars; the human-readable text is dropped and
//! anything that is not a rectangle is rejected.

use std::fmt;
use std::process::Command;

use roxmltree::{Document, Node, ParsingOptions};
use serde::Serialize;

use crate::error::{Result, WheelError};
use crate::geometry::Size;

const UPC_DIGITS: usize = 11;

/// The encoder's canvas is 115x59; the bottom 9 units are reserved for text
/// that `--notext` leaves blank.
pub const BARCODE_VIEWBOX: Size = Size::new(115.0, 50.0);
pub const BARCODE_CLIP_HEIGHT: f64 = 50.0 / 59.0;

/// An 11-digit, zero-padded UPC-A payload (check digit excluded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Upc(String);

impl Upc {
    pub fn from_number(value: u64) -> Result<Self> {
        upc_value(&value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Upc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Left-pads a non-negative integer string to 11 digits.
pub fn upc_value(value: &str) -> Result<Upc> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WheelError::InvalidUpc {
            value: value.to_string(),
            reason: "only takes positive integer values",
        });
    }
    let significant = digits.trim_start_matches('0');
    if significant.len() > UPC_DIGITS {
        return Err(WheelError::InvalidUpc {
            value: value.to_string(),
            reason: "UPC values must be 11 or fewer digits long",
        });
    }
    Ok(Upc(format!("{significant:0>width$}", width = UPC_DIGITS)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BarFill {
    /// Painted white by the encoder; styled with the `background` class.
    Background,
    /// No fill given; styled with the `foreground` class.
    Foreground,
    Explicit(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: BarFill,
}

/// Seam to the external barcode encoder.
pub trait BarcodeEncoder {
    fn encode(&self, upc: &Upc) -> Result<Vec<BarRect>>;
}

/// Runs the `zint` command line to draw UPC-A barcodes.
#[derive(Debug, Clone)]
pub struct ZintEncoder {
    pub program: String,
}

impl ZintEncoder {
    pub fn new() -> Self {
        Self {
            program: "zint".to_string(),
        }
    }
}

impl Default for ZintEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeEncoder for ZintEncoder {
    fn encode(&self, upc: &Upc) -> Result<Vec<BarRect>> {
        let output = Command::new(&self.program)
            .args(["--direct", "--filetype=svg", "--barcode=34", "--notext", "-d"])
            .arg(upc.as_str())
            .output()
            .map_err(|err| WheelError::BarcodeEncoder(format!("running {}: {err}", self.program)))?;
        if !output.status.success() {
            return Err(WheelError::BarcodeEncoder(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let svg = String::from_utf8(output.stdout).map_err(|_| {
            WheelError::BarcodeEncoder(format!("{} wrote non UTF-8 output", self.program))
        })?;
        let bars = parse_bar_svg(&svg)?;
        log::debug!("encoded {upc} into {} bars", bars.len());
        Ok(bars)
    }
}

/// Extracts the bars from the first group of an encoder's SVG.
pub fn parse_bar_svg(svg: &str) -> Result<Vec<BarRect>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(svg, options)
        .map_err(|err| WheelError::BarcodeEncoder(format!("encoder output is not XML: {err}")))?;
    let group = doc
        .descendants()
        .find(|node| node.tag_name().name() == "g")
        .ok_or_else(|| WheelError::UnsupportedGeometry("no <g> group in encoder output".into()))?;

    let mut bars = Vec::new();
    for child in group.children().filter(Node::is_element) {
        match child.tag_name().name() {
            // Human-readable digits; the wheel prints the code itself.
            "text" | "tspan" => {}
            "rect" => bars.push(parse_rect(child)?),
            tag => {
                return Err(WheelError::UnsupportedGeometry(format!(
                    "encoder produced <{tag}>, only rectangles are supported"
                )));
            }
        }
    }
    Ok(bars)
}

fn parse_rect(node: Node<'_, '_>) -> Result<BarRect> {
    let coordinate = |name: &str| -> Result<Option<f64>> {
        node.attribute(name).map(|value| number(value, name)).transpose()
    };
    let missing = |name: &str| WheelError::UnsupportedGeometry(format!("<rect> without {name}"));
    let fill = match node.attribute("fill").map(str::trim) {
        Some(color) if is_white(color) => BarFill::Background,
        Some(color) => BarFill::Explicit(color.to_string()),
        None => BarFill::Foreground,
    };
    Ok(BarRect {
        // The encoder omits x and y when they are zero.
        x: coordinate("x")?.unwrap_or(0.0),
        y: coordinate("y")?.unwrap_or(0.0),
        width: coordinate("width")?.ok_or_else(|| missing("width"))?,
        height: coordinate("height")?.ok_or_else(|| missing("height"))?,
        fill,
    })
}

fn is_white(color: &str) -> bool {
    ["#FFFFFF", "#FFF", "white", "rgb(255,255,255)"]
        .iter()
        .any(|white| color.replace(' ', "").eq_ignore_ascii_case(white))
}

fn number(value: &str, name: &str) -> Result<f64> {
    value
        .trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .map_err(|_| WheelError::UnsupportedGeometry(format!("<rect> {name}={value:?} is not a number")))
}

/// A barcode ready to be defined once and referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarcodeSymbol {
    pub id: String,
    pub upc: Upc,
    pub bars: Vec<BarRect>,
    pub viewbox: Size,
    /// Fraction of the bounding box height left visible by the clip path.
    pub clip_height: f64,
}

impl BarcodeSymbol {
    pub fn new(upc: Upc, bars: Vec<BarRect>) -> Self {
        Self {
            id: format!("barcode-{upc}"),
            upc,
            bars,
            viewbox: BARCODE_VIEWBOX,
            clip_height: BARCODE_CLIP_HEIGHT,
        }
    }

    pub fn clip_id(&self) -> String {
        format!("{}-clip", self.id)
    }

    pub fn encode<E: BarcodeEncoder + ?Sized>(encoder: &E, upc: &Upc) -> Result<Self> {
        let bars = encoder.encode(upc)?;
        Ok(Self::new(upc.clone(), bars))
    }
}
