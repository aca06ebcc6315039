use crate::barcode::{BarFill, BarcodeSymbol};
use crate::config::RenderConfig;
use crate::document::{Def, Document, Element, TextSymbol, Transform};
use crate::geometry::{Point, Size};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(document: &Document, theme: &Theme) -> String {
    let mut svg = String::new();
    let origin = document.viewbox_origin;
    let size = document.viewbox;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        num(size.width),
        num(size.height),
        num(origin.x),
        num(origin.y),
        num(size.width),
        num(size.height)
    ));

    svg.push_str("<defs>");
    for def in &document.defs {
        match def {
            Def::Style(css) => svg.push_str(&format!("<style>{}</style>", escape_xml(css))),
            Def::Text(symbol) => svg.push_str(&text_symbol_svg(symbol)),
            Def::Barcode(symbol) => svg.push_str(&barcode_symbol_svg(symbol)),
        }
    }
    svg.push_str("</defs>");

    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        num(origin.x),
        num(origin.y),
        escape_xml(&theme.background)
    ));

    for element in &document.body {
        element_svg(&mut svg, element);
    }

    svg.push_str("</svg>");
    svg
}

fn text_symbol_svg(symbol: &TextSymbol) -> String {
    format!(
        "<symbol id=\"{}\" viewBox=\"0 0 {} {}\"><text class=\"fitted-text\" x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\">{}</text></symbol>",
        escape_xml(&symbol.id),
        num(symbol.viewbox.width),
        num(symbol.viewbox.height),
        num(symbol.insert.x),
        num(symbol.insert.y),
        escape_xml(&symbol.font_family),
        num(symbol.font_size),
        escape_xml(&symbol.text)
    )
}

fn barcode_symbol_svg(symbol: &BarcodeSymbol) -> String {
    let clip_id = escape_xml(&symbol.clip_id());
    let mut out = format!(
        "<symbol id=\"{}\" viewBox=\"0 0 {} {}\">",
        escape_xml(&symbol.id),
        num(symbol.viewbox.width),
        num(symbol.viewbox.height)
    );
    out.push_str(&format!(
        "<clipPath id=\"{clip_id}\" clipPathUnits=\"objectBoundingBox\"><rect x=\"0\" y=\"0\" width=\"1\" height=\"{}\"/></clipPath>",
        num(symbol.clip_height)
    ));
    out.push_str(&format!("<g clip-path=\"url(#{clip_id})\">"));
    for bar in &symbol.bars {
        let paint = match &bar.fill {
            BarFill::Background => "class=\"background\"".to_string(),
            BarFill::Foreground => "class=\"foreground\"".to_string(),
            BarFill::Explicit(color) => format!("fill=\"{}\"", escape_xml(color)),
        };
        out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {paint}/>",
            num(bar.x),
            num(bar.y),
            num(bar.width),
            num(bar.height)
        ));
    }
    out.push_str("</g></symbol>");
    out
}

fn element_svg(svg: &mut String, element: &Element) {
    match element {
        Element::Path {
            d,
            stroke,
            stroke_width,
            fill,
        } => svg.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape_xml(d),
            escape_xml(fill),
            escape_xml(stroke),
            num(*stroke_width)
        )),
        Element::Use {
            href,
            insert,
            size,
            rotation,
        } => svg.push_str(&format!(
            "<use xlink:href=\"#{}\" {}{}/>",
            escape_xml(href),
            rect_attrs(*insert, *size),
            box_rotation(*insert, *size, *rotation)
        )),
        Element::Image {
            href,
            insert,
            size,
            rotation,
        } => svg.push_str(&format!(
            "<image xlink:href=\"{}\" {} preserveAspectRatio=\"xMidYMid meet\"{}/>",
            escape_xml(href),
            rect_attrs(*insert, *size),
            box_rotation(*insert, *size, *rotation)
        )),
        Element::Rect {
            insert,
            size,
            rotation,
            fill,
            stroke,
            stroke_width,
        } => svg.push_str(&format!(
            "<rect {} fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{}/>",
            rect_attrs(*insert, *size),
            escape_xml(fill),
            escape_xml(stroke),
            num(*stroke_width),
            box_rotation(*insert, *size, *rotation)
        )),
        Element::Group {
            id,
            transform,
            children,
        } => {
            svg.push_str("<g");
            if let Some(id) = id {
                svg.push_str(&format!(" id=\"{}\"", escape_xml(id)));
            }
            if let Some(transform) = transform {
                svg.push_str(&format!(" transform=\"{}\"", transform_attr(transform)));
            }
            svg.push('>');
            for child in children {
                element_svg(svg, child);
            }
            svg.push_str("</g>");
        }
    }
}

fn rect_attrs(insert: Point, size: Size) -> String {
    format!(
        "x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
        num(insert.x),
        num(insert.y),
        num(size.width),
        num(size.height)
    )
}

/// Rotation of a box about its own center; empty when there is none.
fn box_rotation(insert: Point, size: Size, rotation: f64) -> String {
    if rotation == 0.0 {
        return String::new();
    }
    let center = Point::new(insert.x + size.width / 2.0, insert.y + size.height / 2.0);
    format!(
        " transform=\"{}\"",
        transform_attr(&Transform::Rotate {
            angle: rotation,
            center
        })
    )
}

fn transform_attr(transform: &Transform) -> String {
    match transform {
        Transform::Rotate { angle, center } => {
            format!("rotate({} {} {})", num(*angle), num(center.x), num(center.y))
        }
    }
}

/// Formats a coordinate with at most four decimals and no trailing zeros.
fn num(value: f64) -> String {
    let mut text = format!("{value:.4}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            log::info!("wrote {}", path.display());
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme.font_family.clone();
    opt.fontdb_mut().load_system_fonts();
    opt.resources_dir = output.parent().map(Path::to_path_buf);

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let scale = (render_cfg.width / size.width()).min(render_cfg.height / size.height());
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    log::info!("wrote {} ({width}x{height})", output.display());
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
