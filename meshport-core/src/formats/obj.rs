//! Wavefront OBJ, geometry only.
//!
//! Only `v` and `f` records are read; normals, texture coordinates, groups
//! and materials are ignored. Polygons are fan-triangulated.
use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, warn};

use super::text::{float_triple, leading_index};
use super::{read_file, write_file};
use crate::error::IoResult;
use crate::geometry::{fan_triangulate, Mesh, Vec3};

pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let data = read_file(path.as_ref())?;
    decode_obj(&data)
}

/// Decode OBJ text. Never fails; unusable lines are skipped.
pub fn decode_obj(data: &[u8]) -> IoResult<Mesh> {
    let text = String::from_utf8_lossy(data);
    let mut mesh = Mesh::new();
    let mut dropped = 0usize;
    let mut polygon = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((keyword, rest)) = line.split_once(char::is_whitespace) else {
            continue;
        };

        match keyword {
            "v" => {
                if let Some([x, y, z]) = float_triple(rest) {
                    mesh.add_vertex(Vec3::new(x, y, z));
                }
            }
            "f" => {
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                if tokens.len() < 3 {
                    continue;
                }

                polygon.clear();
                polygon.extend(
                    tokens
                        .iter()
                        .filter_map(|token| resolve_index(token, mesh.vertex_count())),
                );

                for [a, b, c] in fan_triangulate(&polygon) {
                    if !mesh.add_face(a, b, c) {
                        dropped += 1;
                    }
                }
            }
            _ => {}
        }
    }

    if dropped > 0 {
        warn!(dropped, "OBJ faces referenced missing vertices");
    }
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "decoded OBJ"
    );
    Ok(mesh)
}

/// 1-based or negative (relative) OBJ index to a 0-based one.
fn resolve_index(token: &str, vertex_count: usize) -> Option<u32> {
    let index = leading_index(token)?;
    let resolved = match index {
        0 => return None,
        i if i > 0 => i - 1,
        i => vertex_count as i64 + i,
    };
    u32::try_from(resolved).ok()
}

/// Serialise `mesh` as OBJ text, with an `o` record when a name is given.
pub fn encode_obj(mesh: &Mesh, name: Option<&str>) -> Vec<u8> {
    let mut out = String::with_capacity(64 + mesh.vertex_count() * 40 + mesh.face_count() * 20);

    // Writing to a String cannot fail
    let _ = writeln!(out, "# Wavefront OBJ file");
    let _ = writeln!(out, "# Exported by meshport");
    let _ = writeln!(out, "# Vertices: {}", mesh.vertex_count());
    let _ = writeln!(out, "# Faces: {}", mesh.face_count());
    out.push('\n');

    if let Some(name) = name.filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "o {name}");
        out.push('\n');
    }

    for v in &mesh.vertices {
        let _ = writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z);
    }
    out.push('\n');

    for [a, b, c] in &mesh.faces {
        let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
    }

    out.into_bytes()
}

pub fn save_obj<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    write_file(path.as_ref(), &encode_obj(mesh, None))
}

pub fn save_obj_named<P: AsRef<Path>>(mesh: &Mesh, path: P, name: &str) -> IoResult<()> {
    write_file(path.as_ref(), &encode_obj(mesh, Some(name)))
}
