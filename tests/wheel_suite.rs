use std::path::{Path, PathBuf};

use barcode_wheel::barcode::{BarRect, parse_bar_svg};
use barcode_wheel::document::Element;
use barcode_wheel::layout::LAYOUT_EPSILON;
use barcode_wheel::layout_dump::write_layout_dump;
use barcode_wheel::{
    BarcodeEncoder, HeuristicShaper, PlaceholderEntry, PlaceholderSpec, Point, Size, Theme, Upc,
    WheelConfig, WheelContents, WheelError, assemble_wheel, compute_wheel_layout, load_catalog,
    load_config, render_svg, scaled_text_bounding_box,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Serves the recorded encoder output for every code.
struct RecordedEncoder {
    svg: String,
}

impl RecordedEncoder {
    fn load() -> Self {
        let svg = std::fs::read_to_string(fixture("zint_upc.svg")).expect("fixture read failed");
        Self { svg }
    }
}

impl BarcodeEncoder for RecordedEncoder {
    fn encode(&self, _upc: &Upc) -> barcode_wheel::Result<Vec<BarRect>> {
        parse_bar_svg(&self.svg)
    }
}

fn spec(entries: &[(&str, f64, f64)]) -> PlaceholderSpec {
    PlaceholderSpec::new(
        entries
            .iter()
            .map(|(name, padding, width)| PlaceholderEntry::new(*name, *padding, *width, 0.0))
            .collect(),
    )
    .expect("valid spec")
}

#[test]
fn nine_slice_wheel_matches_reference_geometry() {
    let config = WheelConfig::new(9, Point::new(100.0, 100.0), 100.0).unwrap();
    let layout = compute_wheel_layout(&config, &PlaceholderSpec::default()).unwrap();
    assert_eq!(layout.box_count(), 36);

    let barcode = layout.slices[0].box_named("barcode").unwrap();
    assert!((barcode.size.height - 6.84).abs() < 0.01);
    assert!((barcode.insert.x - 109.397).abs() < 1e-3);

    for (index, slice) in layout.slices.iter().enumerate() {
        let expected = 40.0 * (index as f64 - 0.5);
        assert!((slice.rotation - expected).abs() < 1e-9);
    }

    let first = layout.edges[0];
    assert!((first.start.x - 200.0).abs() < 1e-9);
    assert!((first.end.x - (100.0 + 100.0 * 40f64.to_radians().cos())).abs() < 1e-9);
    assert_eq!(layout.edges[8].end, layout.edges[0].start);
}

#[test]
fn single_region_reaches_the_arc() {
    let config = WheelConfig::default();
    let layout = compute_wheel_layout(&config, &spec(&[("picture", 0.02, 1.0)])).unwrap();
    let picture = &layout.slices[0].boxes[0];
    let theta = 20f64.to_radians();
    let height = 2.0 * theta.sin() * 0.02 * 100.0;
    let outer = (height / 200.0).asin().cos() * 100.0;
    assert!((picture.insert.x + picture.size.width - (100.0 + outer)).abs() < 1e-9);
}

#[test]
fn claiming_the_whole_radius_is_allowed_but_not_more() {
    let config = WheelConfig::default();
    let full = spec(&[("a", 0.3, 0.4), ("b", 0.3, 0.0)]);
    assert!(full.total_fraction() <= 1.0 + LAYOUT_EPSILON);
    assert!(compute_wheel_layout(&config, &full).is_ok());

    let over = spec(&[("a", 0.3, 0.4), ("b", 0.3001, 0.0)]);
    assert!(matches!(
        compute_wheel_layout(&config, &over),
        Err(WheelError::LayoutOverflow { .. })
    ));
}

#[test]
fn layout_is_idempotent() {
    let config = WheelConfig::new(7, Point::new(0.0, 0.0), 42.0).unwrap();
    let spec = PlaceholderSpec::default();
    assert_eq!(
        compute_wheel_layout(&config, &spec).unwrap(),
        compute_wheel_layout(&config, &spec).unwrap()
    );
}

#[test]
fn fitted_text_fills_and_stays_inside_the_target() {
    let target = Size::new(40.0, 6.84);
    let bbox =
        scaled_text_bounding_box(&mut HeuristicShaper, target, "Money Order", "sans-serif").unwrap();
    assert!(bbox.width <= target.width + 1e-9);
    assert!(bbox.height <= target.height + 1e-9);
    assert!(
        (bbox.width - target.width).abs() < 1e-9 || (bbox.height - target.height).abs() < 1e-9
    );

    let doubled = scaled_text_bounding_box(
        &mut HeuristicShaper,
        Size::new(80.0, 13.68),
        "Money Order",
        "sans-serif",
    )
    .unwrap();
    assert!((doubled.width / bbox.width - 2.0).abs() < 1e-9);

    assert!(matches!(
        scaled_text_bounding_box(&mut HeuristicShaper, Size::new(0.0, 5.0), "x", "sans-serif"),
        Err(WheelError::InvalidDimension { .. })
    ));
    assert!(matches!(
        scaled_text_bounding_box(&mut HeuristicShaper, target, "  ", "sans-serif"),
        Err(WheelError::EmptyInput { .. })
    ));
}

#[test]
fn catalog_wheel_renders_end_to_end() {
    let catalog = load_catalog(&fixture("catalog.csv")).unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog[2].name, "Fish & Chips, \"Large\"");

    let config = WheelConfig::new(catalog.len(), Point::new(100.0, 100.0), 100.0).unwrap();
    let layout = compute_wheel_layout(&config, &PlaceholderSpec::default()).unwrap();
    let encoder = RecordedEncoder::load();
    let contents = WheelContents {
        catalog: &catalog,
        encoder: Some(&encoder),
        embed_pictures: false,
    };
    let theme = Theme::classic();
    let document = assemble_wheel(&layout, &contents, &mut HeuristicShaper, &theme).unwrap();

    let pictures = document
        .body
        .iter()
        .filter_map(|element| match element {
            Element::Group { children, .. } => Some(children),
            _ => None,
        })
        .flatten()
        .filter(|child| matches!(child, Element::Image { .. }))
        .count();
    assert_eq!(pictures, 1);

    let svg = render_svg(&document, &theme);
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
    assert!(svg.contains("id=\"barcode-00000022001\""));
    assert!(svg.contains("id=\"barcode-00000012101-clip\""));
    assert!(svg.contains("Fish &amp; Chips, &quot;Large&quot;"));
    assert!(svg.contains("xlink:href=\"./random-picture.gif\""));
    assert_eq!(svg.matches("<g id=\"slice-").count(), 4);
}

#[test]
fn embedded_fixture_picture_round_trips_through_the_svg() {
    use base64::Engine as _;

    let picture = fixture("swatch.svg");
    let csv = format!("22001,Swatch,{}\n", picture.display());
    let catalog = barcode_wheel::parse_catalog(&csv).unwrap();
    let layout =
        compute_wheel_layout(&WheelConfig::default(), &PlaceholderSpec::default()).unwrap();
    let contents = WheelContents {
        catalog: &catalog,
        encoder: None,
        embed_pictures: true,
    };
    let theme = Theme::classic();
    let document = assemble_wheel(&layout, &contents, &mut HeuristicShaper, &theme).unwrap();
    let svg = render_svg(&document, &theme);

    let prefix = "xlink:href=\"data:image/svg+xml;base64,";
    let start = svg.find(prefix).expect("embedded picture") + prefix.len();
    let encoded = &svg[start..start + svg[start..].find('"').unwrap()];
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(decoded, std::fs::read(&picture).unwrap());
    assert!(!svg.contains("swatch.svg"));
}

#[test]
fn config_file_layers_over_defaults() {
    let config = load_config(Some(fixture("wheel.json5").as_path())).unwrap();
    assert_eq!(config.wheel.num_slices, 12);
    assert_eq!(config.wheel.radius, 150.0);
    assert_eq!(config.placeholders.get("name").unwrap().width, 0.25);
    assert_eq!(config.theme.placeholder_text, "coming soon");
    assert!(config.theme.draws_outlines());

    let layout = compute_wheel_layout(&config.wheel, &config.placeholders).unwrap();
    let document = assemble_wheel(
        &layout,
        &WheelContents::template(),
        &mut HeuristicShaper,
        &config.theme,
    )
    .unwrap();
    let svg = render_svg(&document, &config.theme);
    assert!(svg.contains(">coming soon</text>"));
    assert!(svg.contains("viewBox=\"0 0 300 300\""));
}

#[test]
fn layout_dump_is_pretty_json() {
    let layout =
        compute_wheel_layout(&WheelConfig::default(), &PlaceholderSpec::default()).unwrap();
    let path = std::env::temp_dir().join(format!("bwheel-dump-{}.json", std::process::id()));
    write_layout_dump(&path, &layout).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["num_slices"], 9);
    assert_eq!(value["slices"].as_array().unwrap().len(), 9);
    assert!(text.contains('\n'));
}
