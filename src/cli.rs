use crate::barcode::{BarcodeEncoder, ZintEncoder};
use crate::catalog::{CatalogEntry, load_catalog};
use crate::config::{Config, RegionOverride, load_config};
use crate::document::{WheelContents, assemble_wheel};
use crate::fonts::FontContext;
use crate::heuristic::HeuristicShaper;
use crate::layout::compute_wheel_layout;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::text_metrics::GlyphShaper;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bwheel", version, about = "Barcode wheel generator")]
pub struct Args {
    /// Catalog CSV (code,name,picture). Without it a placeholder template is drawn.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Number of slices
    #[arg(short = 'n', long = "slices")]
    pub slices: Option<usize>,

    /// Wheel radius
    #[arg(short = 'r', long = "radius")]
    pub radius: Option<f64>,

    /// Font family (or comma separated fallback list) for fitted text
    #[arg(long = "font-family")]
    pub font_family: Option<String>,

    /// Extra font files to make available for matching
    #[arg(long = "font-file")]
    pub font_files: Vec<PathBuf>,

    /// Measure text with built-in character widths instead of a font
    #[arg(long = "fast-text")]
    pub fast_text: bool,

    /// Leave barcode regions as placeholders instead of running zint
    #[arg(long = "no-barcodes")]
    pub no_barcodes: bool,

    /// Inline picture files as base64 data URIs
    #[arg(long = "embed-pictures")]
    pub embed_pictures: bool,

    /// Region override, name:padding:width[:rotation]
    #[arg(long = "region", value_name = "SPEC")]
    pub regions: Vec<String>,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let catalog = match args.input.as_deref() {
        Some(path) => load_catalog(path)
            .with_context(|| format!("reading catalog {}", path.display()))?,
        None => Vec::new(),
    };
    let config = resolve_config(&args, &catalog)?;

    let layout = compute_wheel_layout(&config.wheel, &config.placeholders)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }

    let mut shaper = build_shaper(&args)?;
    let encoder = ZintEncoder::new();
    let contents = WheelContents {
        catalog: &catalog,
        encoder: if args.no_barcodes || catalog.is_empty() {
            None
        } else {
            Some(&encoder as &dyn BarcodeEncoder)
        },
        embed_pictures: args.embed_pictures,
    };
    let document = assemble_wheel(&layout, &contents, shaper.as_mut(), &config.theme)?;
    let svg = render_svg(&document, &config.theme);

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
    }
    Ok(())
}

/// Layers command line flags over the config file.
fn resolve_config(args: &Args, catalog: &[CatalogEntry]) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(slices) = args.slices {
        config.wheel.num_slices = slices;
    } else if catalog.len() >= 2 {
        config.wheel.num_slices = catalog.len();
    }
    if let Some(radius) = args.radius {
        config.wheel.radius = radius;
    }
    config.wheel.validate()?;

    if let Some(family) = &args.font_family {
        config.theme.font_family = family.clone();
    }

    if !args.regions.is_empty() {
        let overrides = args
            .regions
            .iter()
            .map(|raw| RegionOverride::parse(raw))
            .collect::<crate::error::Result<Vec<_>>>()?;
        config.placeholders = config.placeholders.with_overrides(&overrides)?;
    }
    Ok(config)
}

fn build_shaper(args: &Args) -> Result<Box<dyn GlyphShaper>> {
    if args.fast_text {
        return Ok(Box::new(HeuristicShaper));
    }
    let mut fonts = FontContext::new();
    for path in &args.font_files {
        fonts
            .load_font_file(path)
            .with_context(|| format!("loading font {}", path.display()))?;
    }
    Ok(Box::new(fonts))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
