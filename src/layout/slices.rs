use crate::config::WheelConfig;
use crate::geometry::Point;

use super::SliceEdgePair;

/// Points where the slice boundaries meet the circumference, at
/// `0, 360/n, 720/n, ...` degrees.
///
/// Angles come from a vertex counter, so exactly `n` vertices are produced
/// no matter how `360/n` rounds.
pub fn gen_vertices(config: &WheelConfig) -> Vec<Point> {
    let step = config.slice_angle();
    (0..config.num_slices)
        .map(|idx| vertex_at(config, idx as f64 * step))
        .collect()
}

/// Pairs each vertex with its cyclic successor: pair `i` is
/// `(vertex[i], vertex[(i + 1) % n])`.
pub fn gen_slice_points(config: &WheelConfig) -> Vec<SliceEdgePair> {
    let vertices = gen_vertices(config);
    let step = config.slice_angle();
    let count = vertices.len();

    let mut rotated = vertices.clone();
    rotated.rotate_left(1);

    vertices
        .into_iter()
        .zip(rotated)
        .enumerate()
        .map(|(idx, (start, end))| SliceEdgePair {
            index: idx,
            start,
            end,
            start_angle: idx as f64 * step,
            end_angle: if idx + 1 == count {
                360.0
            } else {
                (idx + 1) as f64 * step
            },
        })
        .collect()
}

fn vertex_at(config: &WheelConfig, degrees: f64) -> Point {
    let radians = degrees.to_radians();
    Point::new(
        radians.cos() * config.radius + config.center.x,
        radians.sin() * config.radius + config.center.y,
    )
}
