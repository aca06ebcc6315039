//! Places a slice's named regions along its bisector.
//!
//! The math works on a reference slice whose bisector is the +x axis out of
//! the wheel center, spanning `±θ` where `θ` is half the slice angle. Regions
//! are walked innermost first. Every region but the last is a plain rectangle
//! whose inner corners touch the slice's straight edges. The last one is
//! bounded by the arc: its outer corners lie on the circle.

use crate::config::{PlaceholderEntry, PlaceholderSpec, WheelConfig};
use crate::error::{Result, WheelError};
use crate::geometry::{Point, Size};

use super::PlaceholderBox;

/// Slack allowed when comparing the claimed fraction against 1.0, so specs
/// written to sum to exactly 1 survive binary rounding.
pub const LAYOUT_EPSILON: f64 = 1e-9;

/// Tallest rectangle centered on the bisector, at `distance` (fraction of
/// the radius) from the center, whose corners stay inside the slice edges.
pub fn box_height(distance: f64, radius: f64, half_angle: f64) -> f64 {
    2.0 * half_angle.sin() * distance * radius
}

/// Rejects a spec whose regions claim more than the slice's length.
pub fn check_capacity(spec: &PlaceholderSpec) -> Result<f64> {
    let total = spec.total_fraction();
    if total > 1.0 + LAYOUT_EPSILON {
        return Err(WheelError::LayoutOverflow { total });
    }
    Ok(total)
}

/// Computes one box per region, in spec order, for the reference slice.
pub fn layout_slice(config: &WheelConfig, spec: &PlaceholderSpec) -> Result<Vec<PlaceholderBox>> {
    config.validate()?;
    check_capacity(spec)?;

    let geometry = SliceGeometry::new(config);
    let Some((terminal, inner)) = spec.entries().split_last() else {
        return Ok(Vec::new());
    };

    let mut boxes = Vec::with_capacity(spec.len());
    let mut distance_from_center = 0.0;
    for entry in inner {
        boxes.push(geometry.inner_box(entry, distance_from_center + entry.padding));
        distance_from_center += entry.padding + entry.width;
    }
    boxes.push(geometry.terminal_box(terminal, distance_from_center + terminal.padding));
    Ok(boxes)
}

struct SliceGeometry {
    center: Point,
    radius: f64,
    half_angle: f64,
}

impl SliceGeometry {
    fn new(config: &WheelConfig) -> Self {
        Self {
            center: config.center,
            radius: config.radius,
            half_angle: (config.slice_angle() / 2.0).to_radians(),
        }
    }

    /// Distance along the bisector to the region's inner edge, in the
    /// drawing's units.
    fn inner_edge_x(&self, distance: f64) -> f64 {
        self.center.x + distance * self.half_angle.cos() * self.radius
    }

    fn place(&self, entry: &PlaceholderEntry, distance: f64, width: f64, height: f64) -> PlaceholderBox {
        PlaceholderBox {
            name: entry.name.clone(),
            insert: Point::new(self.inner_edge_x(distance), self.center.y - height / 2.0),
            size: Size::new(width, height),
            rotation: entry.rotation,
        }
    }

    /// A region bounded by straight lines. Its width is a plain fraction of
    /// the radius projected onto the bisector; unlike its height it does not
    /// depend on the distance from the center.
    fn inner_box(&self, entry: &PlaceholderEntry, distance: f64) -> PlaceholderBox {
        let height = box_height(distance, self.radius, self.half_angle);
        let width = entry.width * self.radius * self.half_angle.cos();
        self.place(entry, distance, width, height)
    }

    /// The outermost region. Its outer corners sit where the arc crosses
    /// `±height / 2`: the right triangle from the center to such a corner has
    /// hypotenuse `radius` and opposite side `height / 2`, so the corner lies
    /// `cos(asin(height / 2r)) * r` along the bisector.
    fn terminal_box(&self, entry: &PlaceholderEntry, distance: f64) -> PlaceholderBox {
        let height = box_height(distance, self.radius, self.half_angle);
        let arc_x = (height / (2.0 * self.radius)).asin().cos() * self.radius;
        let inner_x = distance * self.radius * self.half_angle.cos();
        // Only rounding can push this below zero, when the regions claim the
        // whole radius and the box collapses onto the arc.
        let width = (arc_x - inner_x).max(0.0);
        self.place(entry, distance, width, height)
    }
}
