use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Family used both for measuring text and in the emitted `font-family`.
    /// Renderers must resolve it to the same face or fitted text will not
    /// fill its box.
    pub font_family: String,
    pub wheel_stroke: String,
    pub wheel_stroke_width: f64,
    /// Fill of barcode bars and fitted text.
    pub foreground: String,
    pub background: String,
    pub placeholder_text: String,
    /// Stroke of the outline drawn around each region; empty disables it.
    pub outline_stroke: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            wheel_stroke: "black".to_string(),
            wheel_stroke_width: 1.0,
            foreground: "black".to_string(),
            background: "white".to_string(),
            placeholder_text: "placeholder".to_string(),
            outline_stroke: String::new(),
        }
    }

    pub fn inverted() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            wheel_stroke: "#E6E6E6".to_string(),
            wheel_stroke_width: 1.0,
            foreground: "#F5F5F5".to_string(),
            background: "#1C2430".to_string(),
            placeholder_text: "placeholder".to_string(),
            outline_stroke: "#7A8AA6".to_string(),
        }
    }

    pub fn draws_outlines(&self) -> bool {
        !self.outline_stroke.trim().is_empty()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
