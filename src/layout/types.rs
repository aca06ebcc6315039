use serde::Serialize;

use crate::config::WheelConfig;
use crate::geometry::{Point, Size};

/// The two circumference points bounding one slice's arc, with the angles
/// (degrees) they were generated at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliceEdgePair {
    pub index: usize,
    pub start: Point,
    pub end: Point,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl SliceEdgePair {
    /// Angle swept from `start` to `end`, in degrees.
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// One region's rectangle, before the slice rotation is applied.
///
/// `rotation` (degrees) turns the content about the rectangle's own center;
/// `insert` and `size` describe the unrotated rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderBox {
    pub name: String,
    pub insert: Point,
    pub size: Size,
    pub rotation: f64,
}

impl PlaceholderBox {
    pub fn center(&self) -> Point {
        Point::new(
            self.insert.x + self.size.width / 2.0,
            self.insert.y + self.size.height / 2.0,
        )
    }

    /// Corners of the unrotated rectangle, clockwise from the insert point.
    pub fn edge_corners(&self) -> [Point; 4] {
        let Point { x, y } = self.insert;
        let Size { width, height } = self.size;
        [
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ]
    }

    /// Corners with the box's own rotation applied.
    pub fn corners(&self) -> [Point; 4] {
        let center = self.center();
        self.edge_corners()
            .map(|corner| corner.rotated_about(center, self.rotation))
    }
}

/// The boxes of one slice, and the rotation about the wheel center that
/// moves them from the layout's reference bisector (the +x axis) onto the
/// slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceLayout {
    pub index: usize,
    pub rotation: f64,
    pub boxes: Vec<PlaceholderBox>,
}

impl SliceLayout {
    pub fn box_named(&self, name: &str) -> Option<&PlaceholderBox> {
        self.boxes.iter().find(|placed| placed.name == name)
    }

    /// Corners of every box's unrotated rectangle, carried onto the slice.
    pub fn world_edge_corners(&self, wheel_center: Point) -> Vec<[Point; 4]> {
        self.boxes
            .iter()
            .map(|placed| {
                placed
                    .edge_corners()
                    .map(|corner| corner.rotated_about(wheel_center, self.rotation))
            })
            .collect()
    }

    /// Corners of every box with its own rotation and the slice rotation
    /// applied, in box order.
    pub fn world_corners(&self, wheel_center: Point) -> Vec<[Point; 4]> {
        self.boxes
            .iter()
            .map(|placed| {
                placed
                    .corners()
                    .map(|corner| corner.rotated_about(wheel_center, self.rotation))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelLayout {
    pub config: WheelConfig,
    pub vertices: Vec<Point>,
    pub edges: Vec<SliceEdgePair>,
    pub slices: Vec<SliceLayout>,
}

impl WheelLayout {
    pub fn box_count(&self) -> usize {
        self.slices.iter().map(|slice| slice.boxes.len()).sum()
    }
}
