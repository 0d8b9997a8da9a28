/// STL reader for binary and ASCII files
///
/// ```text
/// binary: UINT8[80] header, UINT32 triangle count, then per triangle
///         REAL32[3] normal, REAL32[3] x 3 vertices, UINT16 attribute
/// ascii:  solid .. facet normal .. outer loop, vertex x y z (x3), endloop, endfacet .. endsolid
/// ```
use std::path::Path;

use tracing::debug;

use super::binary::ByteReader;
use super::read_file;
use super::text::keyword_triple;
use crate::error::IoResult;
use crate::geometry::{Mesh, Vec3};

const HEADER_SIZE: usize = 80;

/// Load an STL file, detecting ASCII vs binary from its content.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let data = read_file(path.as_ref())?;
    decode_stl(&data)
}

/// Decode STL bytes, detecting ASCII vs binary from the content.
pub fn decode_stl(data: &[u8]) -> IoResult<Mesh> {
    if is_ascii_stl(data) {
        Ok(parse_ascii_stl(&String::from_utf8_lossy(data)))
    } else {
        parse_binary_stl(data)
    }
}

/// ASCII only if the file starts with `solid` (any case) and also mentions
/// both `vertex` and `facet`; binary headers often start with `solid` too.
pub fn is_ascii_stl(data: &[u8]) -> bool {
    if data.len() < 5 || !data[..5].eq_ignore_ascii_case(b"solid") {
        return false;
    }
    let text = String::from_utf8_lossy(data);
    text.contains("vertex") && text.contains("facet")
}

/// Parse a binary STL file
///
/// Every triangle gets three fresh vertices; nothing is shared.
pub fn parse_binary_stl(data: &[u8]) -> IoResult<Mesh> {
    let mut reader = ByteReader::new(data);
    reader.read_bytes(HEADER_SIZE)?;
    let triangle_count = reader.read_u32_le()? as usize;

    // Capacity is capped by what the data can actually hold
    let capacity = triangle_count.min(reader.remaining() / 50);
    let mut mesh = Mesh::with_capacity(capacity * 3, capacity);

    for _ in 0..triangle_count {
        // Normal is recomputable and often wrong, skip it
        reader.read_bytes(12)?;

        let mut corners = [0u32; 3];
        for corner in &mut corners {
            let x = reader.read_f32_le()?;
            let y = reader.read_f32_le()?;
            let z = reader.read_f32_le()?;
            *corner = mesh.add_vertex(Vec3::new(x, y, z));
        }

        // Attribute byte count
        reader.read_u16_le()?;

        mesh.add_face(corners[0], corners[1], corners[2]);
    }

    debug!(triangles = triangle_count, "parsed binary STL");
    Ok(mesh)
}

/// Parse an ASCII STL file
///
/// Vertices are collected per facet and a face is emitted on `endfacet` only
/// when exactly three were seen. Malformed vertex lines are ignored.
pub fn parse_ascii_stl(input: &str) -> Mesh {
    let mut mesh = Mesh::new();
    let mut facet: Vec<Vec3> = Vec::with_capacity(3);
    let mut discarded = 0usize;

    for line in input.lines() {
        let trimmed = line.trim();

        if let Some([x, y, z]) = keyword_triple(trimmed, "vertex") {
            facet.push(Vec3::new(x, y, z));
        } else if trimmed.split_whitespace().next() == Some("endfacet") {
            if facet.len() == 3 {
                let a = mesh.add_vertex(facet[0]);
                let b = mesh.add_vertex(facet[1]);
                let c = mesh.add_vertex(facet[2]);
                mesh.add_face(a, b, c);
            } else {
                discarded += 1;
            }
            facet.clear();
        }
    }

    debug!(
        faces = mesh.face_count(),
        discarded, "parsed ASCII STL"
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    fn binary_stl(triangles: &[[[f32; 3]; 3]], header: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[..header.len()].copy_from_slice(header);
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for triangle in triangles {
            for value in [0.0f32, 0.0, 1.0] {
                data.extend_from_slice(&value.to_le_bytes());
            }
            for vertex in triangle {
                for value in vertex {
                    data.extend_from_slice(&value.to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_binary_triangles_do_not_share_vertices() {
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let data = binary_stl(&[tri, tri], b"binary");

        let mesh = decode_stl(&data).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(mesh.vertices[4], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let data = binary_stl(&[tri], b"solid exported by some tool");

        assert!(!is_ascii_stl(&data));
        assert_eq!(decode_stl(&data).unwrap().face_count(), 1);
    }

    #[test]
    fn test_binary_truncated() {
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let mut data = binary_stl(&[tri], b"");
        data.truncate(data.len() - 10);
        assert!(matches!(decode_stl(&data), Err(IoError::UnexpectedEof { .. })));

        assert!(matches!(decode_stl(&[0u8; 40]), Err(IoError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_ascii() {
        let text = "\
SOLID cube
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 1
      vertex 1.5 0 1
      vertex 1 1 1e0
    endloop
  endfacet
endsolid cube
";
        assert!(is_ascii_stl(text.as_bytes()));
        let mesh = decode_stl(text.as_bytes()).unwrap();

        // The two-vertex facet is discarded
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.faces[1], [3, 4, 5]);
        assert_eq!(mesh.vertices[4], Vec3::new(1.5, 0.0, 1.0));
    }
}
