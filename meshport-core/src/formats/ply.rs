//! Stanford PLY reader, ASCII encoding only.
//!
//! ```text
//! ply
//! format ascii 1.0
//! element vertex 8
//! property float x
//! property float y
//! property float z
//! element face 12
//! property list uchar int vertex_indices
//! end_header
//! ```
use std::path::Path;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Encoding, Header};
use tracing::{debug, warn};

use super::read_file;
use crate::error::{IoError, IoResult};
use crate::geometry::{fan_triangulate, Mesh, Vec3};

pub fn load_ply<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let data = read_file(path.as_ref())?;
    decode_ply(&data)
}

/// Element counts and vertex property names pulled from the header.
#[derive(Debug, Default)]
struct Layout {
    vertex_count: usize,
    face_count: usize,
    vertex_properties: Vec<String>,
}

impl Layout {
    fn from_header(header: &Header) -> Self {
        let mut layout = Self::default();
        for (name, element) in &header.elements {
            match name.as_str() {
                "vertex" => {
                    layout.vertex_count = element.count;
                    layout.vertex_properties = element.properties.keys().cloned().collect();
                }
                "face" => layout.face_count = element.count,
                _ => debug!(element = %name, "ignoring PLY element"),
            }
        }
        layout
    }

    /// Column holding `axis`, falling back to declaration order.
    fn column(&self, axis: &str, fallback: usize) -> usize {
        self.vertex_properties
            .iter()
            .position(|name| name == axis)
            .unwrap_or(fallback)
    }
}

/// Parse the header, leaving `reader` at the first body byte.
fn read_layout(reader: &mut &[u8]) -> IoResult<Layout> {
    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(reader)
        .map_err(|e| IoError::malformed(format!("failed to parse PLY header: {e}")))?;

    if !matches!(header.encoding, Encoding::Ascii) {
        return Err(IoError::unsupported(format!(
            "PLY encoding {:?}, only ascii is supported",
            header.encoding
        )));
    }
    Ok(Layout::from_header(&header))
}

/// Decode an ASCII PLY file.
///
/// Each body line consumes one vertex or face slot even when it cannot be
/// parsed. Face indices outside the vertex list are dropped.
pub fn decode_ply(data: &[u8]) -> IoResult<Mesh> {
    let mut body = data;
    let layout = read_layout(&mut body)?;

    let text = String::from_utf8_lossy(body);
    let line_count = text.lines().count();
    let mut lines = text.lines();

    let columns = [
        layout.column("x", 0),
        layout.column("y", 1),
        layout.column("z", 2),
    ];

    // Declared counts are untrusted; a line holds at most one element
    let mut mesh = Mesh::with_capacity(
        layout.vertex_count.min(line_count),
        layout.face_count.min(line_count),
    );

    for line in lines.by_ref().take(layout.vertex_count) {
        let values: Vec<&str> = line.split_whitespace().collect();
        let coords: Option<Vec<f32>> = columns
            .iter()
            .map(|&col| values.get(col).and_then(|v| v.parse().ok()))
            .collect();
        if let Some(c) = coords {
            mesh.add_vertex(Vec3::new(c[0], c[1], c[2]));
        }
    }

    let mut dropped = 0usize;
    let mut polygon = Vec::new();
    for line in lines.take(layout.face_count) {
        let values: Vec<&str> = line.split_whitespace().collect();
        let Some(count) = values.first().and_then(|v| v.parse::<usize>().ok()) else {
            continue;
        };
        let Some(indices) = values.get(1..).and_then(|rest| rest.get(..count)) else {
            continue;
        };
        if count < 3 {
            continue;
        }

        polygon.clear();
        polygon.extend(
            indices
                .iter()
                .filter_map(|v| v.parse::<i64>().ok())
                .filter_map(|i| u32::try_from(i).ok()),
        );

        for [a, b, c] in fan_triangulate(&polygon) {
            if !mesh.add_face(a, b, c) {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!(dropped, "PLY faces referenced missing vertices");
    }
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "decoded PLY"
    );
    Ok(mesh)
}
