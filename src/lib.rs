pub mod barcode;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fit;
pub mod fonts;
pub mod geometry;
pub mod heuristic;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod text_metrics;
pub mod theme;

pub use barcode::{BarcodeEncoder, BarcodeSymbol, Upc, ZintEncoder, upc_value};
pub use catalog::{CatalogEntry, load_catalog, parse_catalog};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, PlaceholderEntry, PlaceholderSpec, WheelConfig, load_config};
pub use document::{Document, WheelContents, assemble_wheel};
pub use error::{Result, WheelError};
pub use fit::{font_size_in_box, scaled_text_bounding_box};
pub use fonts::FontContext;
pub use geometry::{BoundingBox, Point, Size, box_in_box, scale_factor};
pub use heuristic::HeuristicShaper;
pub use layout::{WheelLayout, compute_wheel_layout};
pub use render::render_svg;
pub use text_metrics::{GlyphShaper, measure_text, text_bounding_box};
pub use theme::Theme;
