/// Autodesk 3D Studio (.3ds) reader and writer
///
/// ```text
/// chunk: UINT16 id, UINT32 length (header included), body
///
/// 0x4D4D main
///   0x3D3D editor
///     0x4000 object: name (NUL terminated), sub-chunks
///       0x4100 triangle mesh
///         0x4110 vertex list: UINT16 n, REAL32[3] x n
///         0x4120 face list:   UINT16 n, (UINT16 a, b, c, flags) x n
/// ```
///
/// All values are little-endian. Chunks not listed above are skipped.
use std::path::Path;

use tracing::{debug, warn};

use super::binary::ByteReader;
use super::{read_file, write_file};
use crate::error::{IoError, IoResult};
use crate::geometry::{Mesh, Vec3};

pub const MAIN: u16 = 0x4D4D;
pub const EDITOR: u16 = 0x3D3D;
pub const OBJECT: u16 = 0x4000;
pub const TRIANGLE_MESH: u16 = 0x4100;
pub const VERTEX_LIST: u16 = 0x4110;
pub const FACE_LIST: u16 = 0x4120;

/// Object name used when none is supplied.
pub const DEFAULT_OBJECT_NAME: &str = "Object";

const CHUNK_HEADER_SIZE: usize = 6;
const MAX_DEPTH: usize = 32;

pub fn load_3ds<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let data = read_file(path.as_ref())?;
    decode_3ds(&data)
}

/// Decode a 3DS file into one mesh holding every triangle mesh it contains.
///
/// Face indices of each triangle mesh are offset by the number of vertices
/// read before it, so multiple objects stay independent.
pub fn decode_3ds(data: &[u8]) -> IoResult<Mesh> {
    let mut reader = ByteReader::new(data);
    let mut state = ReadState {
        mesh: Mesh::new(),
        base: 0,
        dropped: 0,
    };
    read_chunks(&mut reader, data.len(), &mut state, 0)?;

    if state.dropped > 0 {
        warn!(dropped = state.dropped, "3DS faces referenced missing vertices");
    }
    debug!(
        vertices = state.mesh.vertex_count(),
        faces = state.mesh.face_count(),
        "decoded 3DS"
    );
    Ok(state.mesh)
}

struct ReadState {
    mesh: Mesh,
    /// First vertex of the triangle mesh currently being read.
    base: u32,
    dropped: usize,
}

fn read_chunks(reader: &mut ByteReader<'_>, end: usize, state: &mut ReadState, depth: usize) -> IoResult<()> {
    if depth > MAX_DEPTH {
        debug!(depth, "3DS chunk nesting too deep, skipping");
        reader.seek(end);
        return Ok(());
    }

    while reader.position() + CHUNK_HEADER_SIZE <= end {
        let id = reader.read_u16_le()?;
        let length = reader.read_u32_le()? as usize;
        let body_start = reader.position();
        let chunk_end = body_start
            .saturating_add(length.saturating_sub(CHUNK_HEADER_SIZE))
            .min(end);

        match id {
            MAIN | EDITOR => read_chunks(reader, chunk_end, state, depth + 1)?,
            OBJECT => {
                let name = reader.read_cstr()?;
                debug!(name = %String::from_utf8_lossy(name), "3DS object");
                read_chunks(reader, chunk_end, state, depth + 1)?;
            }
            TRIANGLE_MESH => {
                state.base = state.mesh.vertex_count() as u32;
                read_chunks(reader, chunk_end, state, depth + 1)?;
            }
            VERTEX_LIST => read_vertices(reader, &mut state.mesh)?,
            FACE_LIST => read_faces(reader, state)?,
            other => debug!(id = %format!("{other:#06X}"), length, "skipping 3DS chunk"),
        }

        reader.seek(chunk_end);
    }

    Ok(())
}

fn read_vertices(reader: &mut ByteReader<'_>, mesh: &mut Mesh) -> IoResult<()> {
    let count = reader.read_u16_le()?;
    mesh.vertices.reserve(count as usize);
    for _ in 0..count {
        let x = reader.read_f32_le()?;
        let y = reader.read_f32_le()?;
        let z = reader.read_f32_le()?;
        mesh.add_vertex(Vec3::new(x, y, z));
    }
    Ok(())
}

fn read_faces(reader: &mut ByteReader<'_>, state: &mut ReadState) -> IoResult<()> {
    let count = reader.read_u16_le()?;
    state.mesh.faces.reserve(count as usize);
    for _ in 0..count {
        let a = u32::from(reader.read_u16_le()?) + state.base;
        let b = u32::from(reader.read_u16_le()?) + state.base;
        let c = u32::from(reader.read_u16_le()?) + state.base;
        // Edge visibility flags
        reader.read_u16_le()?;

        if !state.mesh.add_face(a, b, c) {
            state.dropped += 1;
        }
    }
    Ok(())
}

/// Chunk writer that patches each length once the chunk is closed.
struct ChunkWriter {
    buf: Vec<u8>,
}

impl ChunkWriter {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Start a chunk and return its offset for `end_chunk`.
    fn begin_chunk(&mut self, id: u16) -> usize {
        let start = self.buf.len();
        self.buf.extend_from_slice(&id.to_le_bytes());
        self.buf.extend_from_slice(&0u32.to_le_bytes());
        start
    }

    fn end_chunk(&mut self, start: usize) {
        let length = (self.buf.len() - start) as u32;
        self.buf[start + 2..start + 6].copy_from_slice(&length.to_le_bytes());
    }

    fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn cstr(&mut self, value: &str) {
        self.buf.extend(value.bytes().filter(|&b| b != 0));
        self.buf.push(0);
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

fn u16_count(value: usize, what: &str) -> IoResult<u16> {
    u16::try_from(value).map_err(|_| {
        IoError::invalid_argument(format!("3DS holds at most {} {what}, got {value}", u16::MAX))
    })
}

/// Serialise `mesh` as a single 3DS object called `name`.
///
/// The format stores counts and indices as 16-bit values, so meshes with
/// more than 65535 vertices or faces are rejected.
pub fn encode_3ds(mesh: &Mesh, name: &str) -> IoResult<Vec<u8>> {
    let vertex_count = u16_count(mesh.vertex_count(), "vertices")?;
    let face_count = u16_count(mesh.face_count(), "faces")?;

    let mut w = ChunkWriter::new();
    let main = w.begin_chunk(MAIN);
    let editor = w.begin_chunk(EDITOR);
    let object = w.begin_chunk(OBJECT);
    w.cstr(name);
    let trimesh = w.begin_chunk(TRIANGLE_MESH);

    let vertices = w.begin_chunk(VERTEX_LIST);
    w.u16(vertex_count);
    for v in &mesh.vertices {
        w.f32(v.x);
        w.f32(v.y);
        w.f32(v.z);
    }
    w.end_chunk(vertices);

    let faces = w.begin_chunk(FACE_LIST);
    w.u16(face_count);
    for face in &mesh.faces {
        for &index in face {
            // Indices are below vertex_count, which already fits
            w.u16(u16_count(index as usize, "vertices")?);
        }
        w.u16(0);
    }
    w.end_chunk(faces);

    w.end_chunk(trimesh);
    w.end_chunk(object);
    w.end_chunk(editor);
    w.end_chunk(main);

    Ok(w.finish())
}

pub fn save_3ds<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    save_3ds_named(mesh, path, DEFAULT_OBJECT_NAME)
}

pub fn save_3ds_named<P: AsRef<Path>>(mesh: &Mesh, path: P, name: &str) -> IoResult<()> {
    let data = encode_3ds(mesh, name)?;
    write_file(path.as_ref(), &data)
}
