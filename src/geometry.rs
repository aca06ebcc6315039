//! Scale-factor and aspect-fit math shared by the layout and fitting code.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WheelError};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates this point by `degrees` about `center`.
    ///
    /// Uses the SVG `rotate(a cx cy)` convention: with the y axis pointing
    /// down, positive angles turn clockwise on screen.
    pub fn rotated_about(self, center: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A measured or fitted box.
///
/// `x_offset`/`y_offset` are the translation that puts the box's top-left at
/// the origin. For measured text they are the SVG insertion point; for a box
/// fitted with [`box_in_box`] they are the margin that centers it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl BoundingBox {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Scales dimensions and offsets uniformly.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
            x_offset: self.x_offset * factor,
            y_offset: self.y_offset * factor,
        }
    }
}

/// Factor by which `source` must be scaled to fit exactly inside `target`
/// while keeping its aspect ratio.
pub fn scale_factor(source: Size, target: Size) -> Result<f64> {
    // NaN fails the positivity test too.
    if !source.is_positive() {
        return Err(WheelError::invalid_dimension(
            "scale_factor source",
            source.width,
            source.height,
        ));
    }
    if !target.is_positive() {
        return Err(WheelError::invalid_dimension(
            "scale_factor target",
            target.width,
            target.height,
        ));
    }

    let scale_width = target.width / source.width;
    let scale_height = target.height / source.height;
    Ok(scale_width.min(scale_height))
}

/// Scales `source` to fill `target` (aspect kept) and returns the scaled size
/// with the offsets that center it inside `target`.
pub fn box_in_box(source: Size, target: Size) -> Result<BoundingBox> {
    let scale = scale_factor(source, target)?;
    let fitted = source.scaled(scale);

    Ok(BoundingBox {
        width: fitted.width,
        height: fitted.height,
        x_offset: (target.width - fitted.width) / 2.0,
        y_offset: (target.height - fitted.height) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn scale_factor_picks_the_tighter_axis() {
        let factor = scale_factor(Size::new(10.0, 5.0), Size::new(100.0, 100.0)).unwrap();
        assert!((factor - 10.0).abs() < EPS);

        let factor = scale_factor(Size::new(5.0, 10.0), Size::new(100.0, 40.0)).unwrap();
        assert!((factor - 4.0).abs() < EPS);
    }

    #[test]
    fn scale_factor_is_scale_invariant() {
        let a = Size::new(13.0, 7.5);
        let b = Size::new(41.0, 3.25);
        let base = scale_factor(a, b).unwrap();
        for k in [0.001, 0.5, 3.0, 1234.5] {
            let scaled = scale_factor(a.scaled(k), b.scaled(k)).unwrap();
            assert!((scaled - base).abs() < 1e-9 * base.max(1.0), "k = {k}");
        }
    }

    #[test]
    fn scale_factor_rejects_non_positive_dimensions() {
        let good = Size::new(1.0, 1.0);
        for bad in [
            Size::new(0.0, 1.0),
            Size::new(1.0, 0.0),
            Size::new(-1.0, 1.0),
            Size::new(1.0, f64::NAN),
        ] {
            assert!(matches!(
                scale_factor(bad, good),
                Err(WheelError::InvalidDimension { .. })
            ));
            assert!(matches!(
                scale_factor(good, bad),
                Err(WheelError::InvalidDimension { .. })
            ));
        }
    }

    #[test]
    fn box_in_box_never_overflows_and_is_centered() {
        let cases = [
            (Size::new(115.0, 50.0), Size::new(30.0, 6.84)),
            (Size::new(3.0, 40.0), Size::new(20.0, 20.0)),
            (Size::new(1.0, 1.0), Size::new(7.0, 2.0)),
        ];
        for (source, target) in cases {
            let fitted = box_in_box(source, target).unwrap();
            assert!(fitted.width <= target.width + EPS);
            assert!(fitted.height <= target.height + EPS);
            assert!((fitted.x_offset + fitted.width / 2.0 - target.width / 2.0).abs() < EPS);
            assert!((fitted.y_offset + fitted.height / 2.0 - target.height / 2.0).abs() < EPS);
        }
    }

    #[test]
    fn box_in_box_keeps_aspect_ratio() {
        let fitted = box_in_box(Size::new(4.0, 2.0), Size::new(10.0, 10.0)).unwrap();
        assert!((fitted.width / fitted.height - 2.0).abs() < EPS);
        assert!((fitted.x_offset).abs() < EPS);
        assert!((fitted.y_offset - 2.5).abs() < EPS);
    }

    #[test]
    fn rotation_follows_svg_convention() {
        let center = Point::new(100.0, 100.0);
        let rotated = Point::new(110.0, 100.0).rotated_about(center, 90.0);
        assert!((rotated.x - 100.0).abs() < EPS);
        assert!((rotated.y - 110.0).abs() < EPS);
    }
}
