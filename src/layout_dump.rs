use crate::layout::WheelLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub num_slices: usize,
    pub center: [f64; 2],
    pub radius: f64,
    pub vertices: Vec<[f64; 2]>,
    pub edges: Vec<EdgeDump>,
    pub slices: Vec<SliceDump>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub index: usize,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Debug, Serialize)]
pub struct SliceDump {
    pub index: usize,
    pub rotation: f64,
    pub boxes: Vec<BoxDump>,
}

#[derive(Debug, Serialize)]
pub struct BoxDump {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub slice_rotation: f64,
    /// Corners with both rotations applied, in drawing coordinates.
    pub world_corners: Vec<[f64; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &WheelLayout) -> Self {
        let center = layout.config.center;
        let edges = layout
            .edges
            .iter()
            .map(|pair| EdgeDump {
                index: pair.index,
                start: [pair.start.x, pair.start.y],
                end: [pair.end.x, pair.end.y],
                start_angle: pair.start_angle,
                end_angle: pair.end_angle,
            })
            .collect();

        let slices = layout
            .slices
            .iter()
            .map(|slice| {
                let boxes = slice
                    .boxes
                    .iter()
                    .zip(slice.world_corners(center))
                    .map(|(placed, corners)| BoxDump {
                        name: placed.name.clone(),
                        x: placed.insert.x,
                        y: placed.insert.y,
                        width: placed.size.width,
                        height: placed.size.height,
                        rotation: placed.rotation,
                        slice_rotation: slice.rotation,
                        world_corners: corners.iter().map(|p| [p.x, p.y]).collect(),
                    })
                    .collect();
                SliceDump {
                    index: slice.index,
                    rotation: slice.rotation,
                    boxes,
                }
            })
            .collect();

        LayoutDump {
            num_slices: layout.config.num_slices,
            center: [center.x, center.y],
            radius: layout.config.radius,
            vertices: layout.vertices.iter().map(|p| [p.x, p.y]).collect(),
            edges,
            slices,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &WheelLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    log::debug!("wrote layout dump to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlaceholderSpec, WheelConfig};
    use crate::layout::compute_wheel_layout;

    #[test]
    fn dump_mirrors_the_layout() {
        let layout =
            compute_wheel_layout(&WheelConfig::default(), &PlaceholderSpec::default()).unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.vertices.len(), 9);
        assert_eq!(dump.edges.len(), 9);
        assert_eq!(dump.slices.len(), 9);
        assert_eq!(dump.slices[1].boxes.len(), 4);
        assert_eq!(dump.slices[1].boxes[3].name, "picture");
        assert_eq!(dump.slices[1].boxes[3].slice_rotation, 20.0);
        assert_eq!(dump.slices[1].boxes[3].world_corners.len(), 4);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["slices"][0]["rotation"], -20.0);
        assert_eq!(json["edges"][0]["start"][0], 200.0);
    }
}
