use crate::error::{Result, WheelError};
use crate::geometry::Point;
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelConfig {
    pub num_slices: usize,
    pub center: Point,
    pub radius: f64,
}

impl WheelConfig {
    pub fn new(num_slices: usize, center: Point, radius: f64) -> Result<Self> {
        let config = Self {
            num_slices,
            center,
            radius,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_slices < 2 {
            return Err(WheelError::InvalidConfig(format!(
                "a wheel needs at least 2 slices, got {}",
                self.num_slices
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(WheelError::InvalidConfig(format!(
                "wheel radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(WheelError::InvalidConfig(
                "wheel center must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Angle covered by one slice, in degrees.
    pub fn slice_angle(&self) -> f64 {
        360.0 / self.num_slices as f64
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            num_slices: 9,
            center: Point::new(100.0, 100.0),
            radius: 100.0,
        }
    }
}

/// One named region of a slice. `padding` and `width` are fractions of the
/// radius; `rotation` (degrees) turns the region's content about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderEntry {
    pub name: String,
    pub padding: f64,
    pub width: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl PlaceholderEntry {
    pub fn new(name: impl Into<String>, padding: f64, width: f64, rotation: f64) -> Self {
        Self {
            name: name.into(),
            padding,
            width,
            rotation,
        }
    }
}

/// Regions of a slice, innermost first. The last entry is the terminal
/// region, bounded by the wheel's arc; its `width` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlaceholderEntry>", into = "Vec<PlaceholderEntry>")]
pub struct PlaceholderSpec {
    entries: Vec<PlaceholderEntry>,
}

impl PlaceholderSpec {
    pub fn new(entries: Vec<PlaceholderEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(WheelError::InvalidConfig(
                "placeholder spec needs at least one region".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(WheelError::InvalidConfig(
                    "placeholder region names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(WheelError::InvalidConfig(format!(
                    "placeholder region '{}' appears twice",
                    entry.name
                )));
            }
            check_fraction(&entry.name, "padding", entry.padding)?;
            check_fraction(&entry.name, "width", entry.width)?;
            if !entry.rotation.is_finite() {
                return Err(WheelError::InvalidConfig(format!(
                    "rotation of region '{}' must be finite",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PlaceholderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PlaceholderEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Fraction of the radius the regions claim: every padding plus every
    /// width except the terminal region's.
    pub fn total_fraction(&self) -> f64 {
        let Some((terminal, inner)) = self.entries.split_last() else {
            return 0.0;
        };
        inner
            .iter()
            .map(|entry| entry.padding + entry.width)
            .sum::<f64>()
            + terminal.padding
    }

    /// Applies typed per-region overrides. Naming a region that is not in
    /// the list is an error.
    pub fn with_overrides(&self, overrides: &[RegionOverride]) -> Result<Self> {
        let mut entries = self.entries.clone();
        for region in overrides {
            let Some(entry) = entries.iter_mut().find(|entry| entry.name == region.name) else {
                return Err(WheelError::InvalidConfig(format!(
                    "override for unknown region '{}'",
                    region.name
                )));
            };
            if let Some(padding) = region.padding {
                entry.padding = padding;
            }
            if let Some(width) = region.width {
                entry.width = width;
            }
            if let Some(rotation) = region.rotation {
                entry.rotation = rotation;
            }
        }
        Self::new(entries)
    }
}

impl Default for PlaceholderSpec {
    fn default() -> Self {
        Self {
            entries: vec![
                PlaceholderEntry::new("barcode", 0.1, 0.15, 0.0),
                PlaceholderEntry::new("upc", 0.05, 0.2, 0.0),
                PlaceholderEntry::new("name", 0.05, 0.2, 90.0),
                PlaceholderEntry::new("picture", 0.02, 1.0, 90.0),
            ],
        }
    }
}

impl TryFrom<Vec<PlaceholderEntry>> for PlaceholderSpec {
    type Error = WheelError;

    fn try_from(entries: Vec<PlaceholderEntry>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<PlaceholderSpec> for Vec<PlaceholderEntry> {
    fn from(spec: PlaceholderSpec) -> Self {
        spec.entries
    }
}

fn check_fraction(name: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WheelError::InvalidConfig(format!(
            "{field} of region '{name}' must be a non-negative fraction, got {value}"
        )))
    }
}

/// Per-region override of the recognized layout options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionOverride {
    pub name: String,
    pub padding: Option<f64>,
    pub width: Option<f64>,
    pub rotation: Option<f64>,
}

impl RegionOverride {
    /// Parses `name:padding:width[:rotation]`; empty fields are left alone.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split(':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(WheelError::InvalidConfig(format!(
                "region override {input:?} has no region name"
            )));
        }
        let mut fields = [None; 3];
        for (slot, raw) in fields.iter_mut().zip(parts.by_ref()) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value = raw.parse::<f64>().map_err(|_| {
                WheelError::InvalidConfig(format!("region override {input:?}: bad number {raw:?}"))
            })?;
            *slot = Some(value);
        }
        if parts.next().is_some() {
            return Err(WheelError::InvalidConfig(format!(
                "region override {input:?} has too many fields"
            )));
        }
        let [padding, width, rotation] = fields;
        Ok(Self {
            name: name.to_string(),
            padding,
            width,
            rotation,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub wheel: WheelConfig,
    pub placeholders: PlaceholderSpec,
    pub theme: Theme,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            wheel: WheelConfig::default(),
            placeholders: PlaceholderSpec::default(),
            theme,
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WheelConfigFile {
    num_slices: Option<usize>,
    center: Option<Point>,
    radius: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    wheel_stroke: Option<String>,
    wheel_stroke_width: Option<f64>,
    foreground: Option<String>,
    background: Option<String>,
    placeholder_text: Option<String>,
    outline_stroke: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    wheel: Option<WheelConfigFile>,
    placeholders: Option<Vec<PlaceholderEntry>>,
    regions: Option<Vec<RegionOverride>>,
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let parsed = parse_config_file(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    apply_config_file(&mut config, parsed)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        // Fall back to JSON5 for comments and trailing commas.
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| anyhow::Error::new(json_err).context("config is neither JSON nor JSON5")),
    }
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) -> Result<()> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "classic" | "default" => config.theme = Theme::classic(),
            "inverted" | "dark" => config.theme = Theme::inverted(),
            other => log::warn!("unknown theme '{other}', keeping the current theme"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.wheel_stroke {
            config.theme.wheel_stroke = v;
        }
        if let Some(v) = vars.wheel_stroke_width {
            config.theme.wheel_stroke_width = v;
        }
        if let Some(v) = vars.foreground {
            config.theme.foreground = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
        if let Some(v) = vars.placeholder_text {
            config.theme.placeholder_text = v;
        }
        if let Some(v) = vars.outline_stroke {
            config.theme.outline_stroke = v;
        }
    }

    if let Some(wheel) = parsed.wheel {
        if let Some(v) = wheel.num_slices {
            config.wheel.num_slices = v;
        }
        if let Some(v) = wheel.center {
            config.wheel.center = v;
        }
        if let Some(v) = wheel.radius {
            config.wheel.radius = v;
        }
        config.wheel.validate()?;
    }

    if let Some(entries) = parsed.placeholders {
        config.placeholders = PlaceholderSpec::new(entries)?;
    }
    if let Some(overrides) = parsed.regions {
        config.placeholders = config.placeholders.with_overrides(&overrides)?;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_region_order() {
        let spec = PlaceholderSpec::default();
        let names: Vec<&str> = spec.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["barcode", "upc", "name", "picture"]);
        assert!((spec.total_fraction() - 0.77).abs() < 1e-12);
    }

    #[test]
    fn wheel_config_rejects_degenerate_wheels() {
        assert!(WheelConfig::new(1, Point::new(0.0, 0.0), 10.0).is_err());
        assert!(WheelConfig::new(3, Point::new(0.0, 0.0), 0.0).is_err());
        assert!(WheelConfig::new(3, Point::new(0.0, 0.0), f64::NAN).is_err());
        assert!(WheelConfig::new(2, Point::new(0.0, 0.0), 1.0).is_ok());
    }

    #[test]
    fn spec_rejects_duplicates_and_negative_fractions() {
        let dup = PlaceholderSpec::new(vec![
            PlaceholderEntry::new("a", 0.1, 0.1, 0.0),
            PlaceholderEntry::new("a", 0.1, 0.1, 0.0),
        ]);
        assert!(matches!(dup, Err(WheelError::InvalidConfig(_))));

        let negative = PlaceholderSpec::new(vec![PlaceholderEntry::new("a", -0.1, 0.1, 0.0)]);
        assert!(matches!(negative, Err(WheelError::InvalidConfig(_))));

        assert!(PlaceholderSpec::new(Vec::new()).is_err());
    }

    #[test]
    fn overrides_are_typed_and_checked() {
        let spec = PlaceholderSpec::default()
            .with_overrides(&[RegionOverride {
                name: "upc".to_string(),
                width: Some(0.1),
                ..RegionOverride::default()
            }])
            .unwrap();
        let upc = spec.get("upc").unwrap();
        assert_eq!(upc.width, 0.1);
        assert_eq!(upc.padding, 0.05);

        let unknown = PlaceholderSpec::default().with_overrides(&[RegionOverride {
            name: "logo".to_string(),
            padding: Some(0.1),
            ..RegionOverride::default()
        }]);
        assert!(matches!(unknown, Err(WheelError::InvalidConfig(_))));
    }

    #[test]
    fn region_override_parsing() {
        let parsed = RegionOverride::parse("name:0.1::45").unwrap();
        assert_eq!(parsed.name, "name");
        assert_eq!(parsed.padding, Some(0.1));
        assert_eq!(parsed.width, None);
        assert_eq!(parsed.rotation, Some(45.0));

        assert!(RegionOverride::parse(":0.1").is_err());
        assert!(RegionOverride::parse("name:abc").is_err());
        assert!(RegionOverride::parse("name:1:2:3:4").is_err());
    }

    #[test]
    fn config_file_layers_over_defaults() {
        let parsed = parse_config_file(
            r#"{
                "wheel": { "numSlices": 12, "radius": 250 },
                "regions": [ { "name": "picture", "padding": 0.05 } ],
                "themeVariables": { "fontFamily": "DejaVu Sans" }
            }"#,
        )
        .unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed).unwrap();
        assert_eq!(config.wheel.num_slices, 12);
        assert_eq!(config.wheel.radius, 250.0);
        assert_eq!(config.wheel.center, Point::new(100.0, 100.0));
        assert_eq!(config.placeholders.get("picture").unwrap().padding, 0.05);
        assert_eq!(config.theme.font_family, "DejaVu Sans");
    }

    #[test]
    fn config_file_accepts_json5() {
        let parsed = parse_config_file(
            "{\n  // nine is the classic wheel\n  wheel: { numSlices: 9, },\n}",
        )
        .unwrap();
        assert_eq!(parsed.wheel.unwrap().num_slices, Some(9));
    }

    #[test]
    fn placeholder_list_in_config_is_validated() {
        let parsed = parse_config_file(
            r#"{ "placeholders": [
                { "name": "label", "padding": 0.1, "width": 0.3 },
                { "name": "label", "padding": 0.1, "width": 0.3 }
            ] }"#,
        )
        .unwrap();
        let mut config = Config::default();
        assert!(apply_config_file(&mut config, parsed).is_err());
    }
}
