mod placeholder;
mod slices;
pub(crate) mod types;
pub use placeholder::{LAYOUT_EPSILON, box_height, check_capacity, layout_slice};
pub use slices::{gen_slice_points, gen_vertices};
pub use types::*;

use crate::config::{PlaceholderSpec, WheelConfig};
use crate::error::Result;

/// Lays out the whole wheel: edge pairs plus one rotated copy of the
/// reference slice's boxes per slice.
///
/// Slice `i` is rotated by `(360 / n) * (i - 0.5)` degrees about the center.
/// Nothing is placed if the regions overflow the slice; `layout_slice`
/// validates both inputs before anything else is computed.
pub fn compute_wheel_layout(config: &WheelConfig, spec: &PlaceholderSpec) -> Result<WheelLayout> {
    let reference = layout_slice(config, spec)?;
    let step = config.slice_angle();
    let slices: Vec<SliceLayout> = (0..config.num_slices)
        .map(|index| SliceLayout {
            index,
            rotation: step * (index as f64 - 0.5),
            boxes: reference.clone(),
        })
        .collect();

    let layout = WheelLayout {
        config: *config,
        vertices: gen_vertices(config),
        edges: gen_slice_points(config),
        slices,
    };
    log::debug!(
        "laid out {} slices x {} regions ({:.3} of the radius claimed)",
        config.num_slices,
        spec.len(),
        spec.total_fraction()
    );
    Ok(layout)
}
