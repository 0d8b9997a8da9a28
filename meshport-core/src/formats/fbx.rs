//! Autodesk FBX, ASCII encoding only.
//!
//! The reader does not parse the node tree. It scans for geometry blocks
//! and pulls the `Vertices` and `PolygonVertexIndex` arrays out of each one,
//! which covers both FBX 6 and FBX 7 ASCII exports. Binary files are rejected.
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use super::text::comma_separated;
use super::{read_file, write_file};
use crate::error::{IoError, IoResult};
use crate::geometry::{fan_triangulate, Mesh, Vec3};

/// Geometry name used when none is supplied.
pub const DEFAULT_GEOMETRY_NAME: &str = "Mesh";

const BINARY_SIGNATURE: &[u8] = b"Kaydara FBX Binary";

pub fn load_fbx<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let data = read_file(path.as_ref())?;
    decode_fbx(&data)
}

/// Decode an ASCII FBX document.
///
/// Every geometry block is appended to the same mesh with its indices
/// offset past the vertices of earlier blocks. A document without any
/// vertices is an error, since that almost always means a layout the
/// scanner does not understand.
pub fn decode_fbx(data: &[u8]) -> IoResult<Mesh> {
    if data.starts_with(BINARY_SIGNATURE) {
        return Err(IoError::unsupported("binary FBX, only ASCII FBX is supported"));
    }

    let text = String::from_utf8_lossy(data);
    let lines: Vec<&str> = text.lines().collect();
    let mut mesh = Mesh::new();
    let mut blocks = 0usize;
    let mut i = 0;

    while i < lines.len() {
        if is_geometry_marker(lines[i].trim()) {
            i = scan_geometry_block(&lines, i, &mut mesh);
            blocks += 1;
        } else {
            i += 1;
        }
    }

    if mesh.is_empty() {
        return Err(IoError::empty(format!(
            "no vertices in {blocks} FBX geometry block(s)"
        )));
    }

    debug!(
        blocks,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "decoded FBX"
    );
    Ok(mesh)
}

fn is_geometry_marker(line: &str) -> bool {
    line.starts_with("Geometry:") || line.contains("Type: \"Mesh\"")
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Payload of an array continuation line, `None` when `line` is not one.
fn continuation(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("a:") {
        Some(rest)
    } else if line.starts_with('*') {
        Some(line.split_once(':').map_or("", |(_, rest)| rest))
    } else {
        None
    }
}

/// Collect values from continuation lines starting at `from`.
///
/// Returns the index of the first line that is not a continuation.
fn read_array<T: FromStr>(lines: &[&str], from: usize, depth: &mut i64, out: &mut Vec<T>) -> usize {
    let mut i = from;
    while let Some(line) = lines.get(i) {
        let line = line.trim();
        let Some(values) = continuation(line) else {
            break;
        };
        *depth += brace_delta(line);
        out.extend(comma_separated(values));
        i += 1;
    }
    i
}

/// Scan one geometry block starting at its marker line.
///
/// A marker that opens a brace ends when that brace closes. A marker
/// without one (FBX 6 `Type: "Mesh"`) ends when its enclosing block does.
/// Returns the index of the line after the block.
fn scan_geometry_block(lines: &[&str], start: usize, mesh: &mut Mesh) -> usize {
    let offset = mesh.vertex_count();
    let mut coords: Vec<f32> = Vec::new();
    let mut indices: Vec<i64> = Vec::new();
    let mut depth = 0i64;
    let mut opened = false;
    let mut i = start;

    while i < lines.len() {
        let line = lines[i].trim();
        depth += brace_delta(line);
        if i == start {
            opened = depth > 0;
        }

        if let Some(inline) = line.strip_prefix("Vertices:") {
            coords.extend(comma_separated::<f32>(inline));
            i = read_array(lines, i + 1, &mut depth, &mut coords);
            continue;
        }
        if let Some(inline) = line.strip_prefix("PolygonVertexIndex:") {
            indices.extend(comma_separated::<i64>(inline));
            i = read_array(lines, i + 1, &mut depth, &mut indices);
            continue;
        }

        i += 1;
        if (opened && depth <= 0) || depth < 0 {
            break;
        }
    }

    if coords.len() % 3 != 0 {
        debug!(values = coords.len(), "FBX vertex array is not a multiple of 3");
    }
    for xyz in coords.chunks_exact(3) {
        mesh.add_vertex(Vec3::new(xyz[0], xyz[1], xyz[2]));
    }

    let mut dropped = 0usize;
    for polygon in decode_polygons(&indices) {
        let shifted: Vec<u32> = polygon
            .iter()
            .filter_map(|&index| u32::try_from(index as usize + offset).ok())
            .collect();
        for [a, b, c] in fan_triangulate(&shifted) {
            if !mesh.add_face(a, b, c) {
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        warn!(dropped, "FBX faces referenced missing vertices");
    }

    i
}

/// Split a `PolygonVertexIndex` array into polygons.
///
/// A negative value `v` closes the current polygon with index `-v - 1`.
/// Values after the last closing index form no polygon and are discarded.
pub fn decode_polygons(values: &[i64]) -> Vec<Vec<u32>> {
    let mut polygons = Vec::new();
    let mut current = Vec::new();

    for &value in values {
        // !v == -v - 1 without overflow
        let (index, closes) = if value < 0 { (!value, true) } else { (value, false) };
        if let Ok(index) = u32::try_from(index) {
            current.push(index);
        }
        if closes && !current.is_empty() {
            polygons.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        debug!(values = current.len(), "discarding unterminated FBX polygon");
    }
    polygons
}

/// Serialise `mesh` as an FBX 7.4 ASCII document with one geometry object.
pub fn encode_fbx(mesh: &Mesh, name: &str) -> Vec<u8> {
    let mut out = String::with_capacity(512 + mesh.vertex_count() * 36 + mesh.face_count() * 24);

    // Writing to a String cannot fail
    let _ = writeln!(out, "; FBX 7.4.0 project file");
    let _ = writeln!(out, "; Created by meshport");
    out.push('\n');
    out.push_str("FBXHeaderExtension:  {\n\tFBXHeaderVersion: 1003\n\tFBXVersion: 7400\n}\n\n");
    out.push_str("Definitions:  {\n\tVersion: 100\n\tCount: 1\n");
    out.push_str("\tObjectType: \"Geometry\" {\n\t\tCount: 1\n\t}\n}\n\n");

    let name: String = name.chars().filter(|&c| c != '"' && c != '\n').collect();
    out.push_str("Objects:  {\n");
    let _ = writeln!(out, "\tGeometry: 1000000, \"Geometry::{name}\", \"Mesh\" {{");

    let _ = writeln!(out, "\t\tVertices: *{} {{", mesh.vertex_count() * 3);
    out.push_str("\t\t\ta: ");
    for (i, v) in mesh.vertices.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{:.6},{:.6},{:.6}", v.x, v.y, v.z);
    }
    out.push_str("\n\t\t}\n");

    let _ = writeln!(out, "\t\tPolygonVertexIndex: *{} {{", mesh.face_count() * 3);
    out.push_str("\t\t\ta: ");
    for (i, [a, b, c]) in mesh.faces.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{a},{b},{}", -(i64::from(*c) + 1));
    }
    out.push_str("\n\t\t}\n");

    out.push_str("\t\tGeometryVersion: 124\n\t}\n}\n");
    out.into_bytes()
}

pub fn save_fbx<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    save_fbx_named(mesh, path, DEFAULT_GEOMETRY_NAME)
}

pub fn save_fbx_named<P: AsRef<Path>>(mesh: &Mesh, path: P, name: &str) -> IoResult<()> {
    write_file(path.as_ref(), &encode_fbx(mesh, name))
}
