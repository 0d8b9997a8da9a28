/// Meshport Web - WASM bindings for the in-memory codecs
///
/// JavaScript hands over the raw bytes of a file plus its extension and gets
/// flat position/index arrays back, or the reverse for writing. Positions are
/// `x, y, z` triples, indices are 0-based triangle triples.

use meshport_core::extrude::{extrude_outlines, OutlinePath};
use meshport_core::formats::{self, MeshFormat, SaveOptions};
use meshport_core::projection::{fit_transform, project_wireframe, Viewport};
use meshport_core::{IoError, Mesh, RotationState, Vec3};
use nalgebra::Point2;
use wasm_bindgen::prelude::*;

/// A decoded mesh held on the WASM side.
#[wasm_bindgen]
pub struct WebMesh {
    mesh: Mesh,
}

#[wasm_bindgen]
impl WebMesh {
    /// Build a mesh from flat arrays; faces pointing past the vertices are dropped.
    #[wasm_bindgen(constructor)]
    pub fn new(positions: &[f32], indices: &[u32]) -> WebMesh {
        WebMesh {
            mesh: mesh_from_buffers(positions, indices),
        }
    }

    #[wasm_bindgen(getter, js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    #[wasm_bindgen(getter, js_name = faceCount)]
    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.mesh.vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn indices(&self) -> Vec<u32> {
        self.mesh.faces.iter().flatten().copied().collect()
    }

    /// Visible edges fitted to a `width` x `height` viewport, as `x0, y0, x1, y1` runs.
    pub fn wireframe(&self, width: f32, height: f32, rx: f32, ry: f32, rz: f32) -> Vec<f32> {
        wireframe_segments(&self.mesh, width, height, RotationState::new(rx, ry, rz))
    }

    /// Encode into the format named by `extension`.
    pub fn encode(&self, extension: &str, name: Option<String>) -> Result<Vec<u8>, JsValue> {
        encode_bytes(&self.mesh, extension, name).map_err(to_js)
    }
}

fn to_js(err: IoError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn format_for(extension: &str) -> Result<MeshFormat, IoError> {
    MeshFormat::from_extension(extension)
        .ok_or_else(|| IoError::unsupported(format!("unrecognized file extension .{extension}")))
}

fn mesh_from_buffers(positions: &[f32], indices: &[u32]) -> Mesh {
    let mut mesh = Mesh::with_capacity(positions.len() / 3, indices.len() / 3);
    for xyz in positions.chunks_exact(3) {
        mesh.add_vertex(Vec3::new(xyz[0], xyz[1], xyz[2]));
    }
    for abc in indices.chunks_exact(3) {
        mesh.add_face(abc[0], abc[1], abc[2]);
    }
    mesh
}

fn decode_bytes(bytes: &[u8], extension: &str) -> Result<Mesh, IoError> {
    formats::decode_mesh(bytes, format_for(extension)?)
}

fn encode_bytes(mesh: &Mesh, extension: &str, name: Option<String>) -> Result<Vec<u8>, IoError> {
    formats::encode_mesh(mesh, format_for(extension)?, &SaveOptions { name })
}

fn wireframe_segments(mesh: &Mesh, width: f32, height: f32, rotation: RotationState) -> Vec<f32> {
    let viewport = Viewport::new(width, height);
    let transform = fit_transform(mesh, &rotation, &viewport);
    project_wireframe(mesh, &transform, &viewport)
        .into_iter()
        .flat_map(|(a, b)| [a.x, a.y, b.x, b.y])
        .collect()
}

fn outline_from_buffer(points: &[f32]) -> OutlinePath {
    points
        .chunks_exact(2)
        .map(|xy| Point2::new(xy[0], xy[1]))
        .collect()
}

/// Decode the bytes of a file whose extension is `extension` (`"obj"`, `".3ds"`, ...).
#[wasm_bindgen(js_name = decodeMesh)]
pub fn decode_mesh(bytes: &[u8], extension: &str) -> Result<WebMesh, JsValue> {
    decode_bytes(bytes, extension)
        .map(|mesh| WebMesh { mesh })
        .map_err(to_js)
}

/// Encode flat arrays straight into file bytes.
#[wasm_bindgen(js_name = encodeMesh)]
pub fn encode_mesh(
    positions: &[f32],
    indices: &[u32],
    extension: &str,
    name: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    encode_bytes(&mesh_from_buffers(positions, indices), extension, name).map_err(to_js)
}

/// Extrude one closed outline given as `x, y` pairs into side walls of the given depth.
#[wasm_bindgen(js_name = extrudeOutline)]
pub fn extrude_outline(points: &[f32], depth: f32) -> WebMesh {
    WebMesh {
        mesh: extrude_outlines(&[outline_from_buffer(points)], depth),
    }
}
