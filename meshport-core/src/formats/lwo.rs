//! LightWave object (LWO2) reader and writer.
//!
//! An IFF container: `FORM`, big-endian size, `LWO2`, then a flat list of
//! chunks (`tag`, big-endian u32 size, payload, pad byte when the size is odd).
//! Only `PNTS`, `POLS` (type `FACE`) and `TAGS` are interpreted when reading.
use std::path::Path;

use tracing::{debug, warn};

use super::binary::ByteReader;
use super::{read_file, write_file};
use crate::error::{IoError, IoResult};
use crate::geometry::{fan_triangulate, Mesh, Vec3};

/// Surface name used when none is supplied.
pub const DEFAULT_SURFACE_NAME: &str = "Default";

const FORM: &[u8; 4] = b"FORM";
const LWO2: &[u8; 4] = b"LWO2";
const PNTS: &[u8; 4] = b"PNTS";
const POLS: &[u8; 4] = b"POLS";
const TAGS: &[u8; 4] = b"TAGS";
const PTAG: &[u8; 4] = b"PTAG";
const SURF: &[u8; 4] = b"SURF";
const FACE: &[u8; 4] = b"FACE";
const COLR: &[u8; 4] = b"COLR";

/// Largest index the 4-byte variable-width form can hold.
pub const MAX_INDEX: u32 = 0x00FF_FFFF;

const SURFACE_GREY: f32 = 0.8;

pub fn load_lwo<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let data = read_file(path.as_ref())?;
    decode_lwo(&data)
}

/// Variable-width index: two bytes, or four when the first byte is 0xFF.
fn read_vx(reader: &mut ByteReader<'_>) -> IoResult<u32> {
    let first = u32::from(reader.read_u16_be()?);
    if first >> 8 == 0xFF {
        let second = u32::from(reader.read_u16_be()?);
        Ok(((first & 0xFF) << 16) | second)
    } else {
        Ok(first)
    }
}

/// Decode an LWO2 file.
///
/// Referenced points are de-duplicated by exact value, so the resulting
/// mesh only contains vertices some polygon uses.
pub fn decode_lwo(data: &[u8]) -> IoResult<Mesh> {
    let mut reader = ByteReader::new(data);
    if data.len() < 12 {
        return Err(IoError::malformed("LWO file shorter than its FORM header"));
    }
    if &reader.read_tag()? != FORM {
        return Err(IoError::malformed("missing FORM header"));
    }
    let form_size = reader.read_u32_be()?;
    let version = reader.read_tag()?;
    if &version != LWO2 {
        return Err(IoError::malformed(format!(
            "unsupported LWO version {:?}",
            String::from_utf8_lossy(&version)
        )));
    }

    let mut points: Vec<Vec3> = Vec::new();
    let mut mesh = Mesh::new();

    while reader.remaining() >= 8 {
        let tag = reader.read_tag()?;
        let size = reader.read_u32_be()? as usize;
        let body_start = reader.position();
        let body_end = body_start.saturating_add(size).min(reader.len());
        let body = &data[body_start..body_end];

        match &tag {
            PNTS => {
                points = read_points(body)?;
                debug!(points = points.len(), "LWO point list");
            }
            POLS => read_polygons(body, &points, &mut mesh)?,
            TAGS => {
                let tags = read_tags(body);
                debug!(?tags, "LWO surface tags");
            }
            other => debug!(tag = %String::from_utf8_lossy(other), size, "skipping LWO chunk"),
        }

        reader.seek(body_end);
        if size % 2 == 1 {
            reader.seek(body_end + 1);
        }
    }

    debug!(
        form_size,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "decoded LWO"
    );
    Ok(mesh)
}

fn read_points(body: &[u8]) -> IoResult<Vec<Vec3>> {
    let mut reader = ByteReader::new(body);
    let count = body.len() / 12;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x = reader.read_f32_be()?;
        let y = reader.read_f32_be()?;
        let z = reader.read_f32_be()?;
        points.push(Vec3::new(x, y, z));
    }
    Ok(points)
}

fn same_value(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Index of `point` in `mesh`, appending it when not present yet.
fn dedup_vertex(mesh: &mut Mesh, point: Vec3) -> u32 {
    let existing = mesh.vertices.iter().position(|v| {
        same_value(v.x, point.x) && same_value(v.y, point.y) && same_value(v.z, point.z)
    });
    match existing {
        Some(index) => index as u32,
        None => mesh.add_vertex(point),
    }
}

fn read_polygons(body: &[u8], points: &[Vec3], mesh: &mut Mesh) -> IoResult<()> {
    let mut reader = ByteReader::new(body);
    let kind = reader.read_tag()?;
    if &kind != FACE {
        debug!(kind = %String::from_utf8_lossy(&kind), "skipping LWO polygon list");
        return Ok(());
    }

    let mut indices = Vec::new();
    let mut polygon = Vec::new();
    let mut dropped = 0usize;

    while reader.remaining() > 0 {
        let Ok(count) = read_vx(&mut reader) else {
            break;
        };

        indices.clear();
        let complete = (0..count).try_for_each(|_| {
            indices.push(read_vx(&mut reader)?);
            Ok::<_, IoError>(())
        });
        if complete.is_err() {
            debug!("LWO polygon list truncated");
            break;
        }

        // Consumed but not kept
        if count < 3 {
            continue;
        }

        polygon.clear();
        for &index in &indices {
            match points.get(index as usize) {
                Some(&point) => polygon.push(dedup_vertex(mesh, point)),
                None => dropped += 1,
            }
        }
        for [a, b, c] in fan_triangulate(&polygon) {
            mesh.add_face(a, b, c);
        }
    }

    if dropped > 0 {
        warn!(dropped, "LWO polygons referenced missing points");
    }
    Ok(())
}

fn read_tags(body: &[u8]) -> Vec<String> {
    let mut reader = ByteReader::new(body);
    let mut tags = Vec::new();
    while reader.remaining() > 0 {
        let Ok(tag) = reader.read_cstr() else {
            break;
        };
        tags.push(String::from_utf8_lossy(tag).into_owned());
        // Strings are padded to an even length, NUL included
        if tag.len() % 2 == 0 {
            reader.seek(reader.position() + 1);
        }
    }
    tags
}

fn push_vx(out: &mut Vec<u8>, index: u32) -> IoResult<()> {
    if index > MAX_INDEX {
        return Err(IoError::invalid_argument(format!(
            "LWO index {index} exceeds {MAX_INDEX}"
        )));
    }
    if index < 0xFF00 {
        out.extend_from_slice(&(index as u16).to_be_bytes());
    } else {
        out.extend_from_slice(&(0xFF00 | (index >> 16) as u16).to_be_bytes());
        out.extend_from_slice(&((index & 0xFFFF) as u16).to_be_bytes());
    }
    Ok(())
}

fn push_string(out: &mut Vec<u8>, value: &str) {
    out.extend(value.bytes().filter(|&b| b != 0));
    out.push(0);
    if out.len() % 2 == 1 {
        out.push(0);
    }
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
}

/// Serialise `mesh` as LWO2 with every polygon on surface `surface`.
pub fn encode_lwo(mesh: &Mesh, surface: &str) -> IoResult<Vec<u8>> {
    let mut body = Vec::new();

    let mut tags = Vec::new();
    push_string(&mut tags, surface);
    write_chunk(&mut body, TAGS, &tags);

    let mut points = Vec::with_capacity(mesh.vertex_count() * 12);
    for v in &mesh.vertices {
        for value in [v.x, v.y, v.z] {
            points.extend_from_slice(&value.to_be_bytes());
        }
    }
    write_chunk(&mut body, PNTS, &points);

    let mut polygons = Vec::with_capacity(4 + mesh.face_count() * 8);
    polygons.extend_from_slice(FACE);
    for face in &mesh.faces {
        push_vx(&mut polygons, 3)?;
        for &index in face {
            push_vx(&mut polygons, index)?;
        }
    }
    write_chunk(&mut body, POLS, &polygons);

    let mut ptag = Vec::with_capacity(4 + mesh.face_count() * 4);
    ptag.extend_from_slice(SURF);
    for i in 0..mesh.face_count() {
        push_vx(&mut ptag, i as u32)?;
        ptag.extend_from_slice(&0u16.to_be_bytes());
    }
    write_chunk(&mut body, PTAG, &ptag);

    let mut surf = Vec::new();
    push_string(&mut surf, surface);
    push_string(&mut surf, "");
    let mut colour = Vec::with_capacity(14);
    for _ in 0..3 {
        colour.extend_from_slice(&SURFACE_GREY.to_be_bytes());
    }
    push_vx(&mut colour, 0)?;
    surf.extend_from_slice(COLR);
    surf.extend_from_slice(&(colour.len() as u16).to_be_bytes());
    surf.extend_from_slice(&colour);
    write_chunk(&mut body, SURF, &surf);

    let mut out = Vec::with_capacity(body.len() + 12);
    out.extend_from_slice(FORM);
    out.extend_from_slice(&(body.len() as u32 + 4).to_be_bytes());
    out.extend_from_slice(LWO2);
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn save_lwo<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    save_lwo_named(mesh, path, DEFAULT_SURFACE_NAME)
}

pub fn save_lwo_named<P: AsRef<Path>>(mesh: &Mesh, path: P, surface: &str) -> IoResult<()> {
    let data = encode_lwo(mesh, surface)?;
    write_file(path.as_ref(), &data)
}
