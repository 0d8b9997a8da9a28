//! File round-trips through every format that has both a reader and a writer.
//!
//! Each test writes a mesh to a temporary directory, loads it back through
//! the extension-based dispatch and compares counts and coordinates.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use approx::assert_abs_diff_eq;
use meshport_core::formats::{fbx, lwo, obj, three_ds};
use meshport_core::{load_mesh, save_mesh, save_mesh_with, IoError, Mesh, SaveOptions, Vec3};
use tempfile::tempdir;

const TOLERANCE: f32 = 1e-5;

fn triangle() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_vertex(Vec3::new(0.25, -1.5, 3.125));
    mesh.add_vertex(Vec3::new(1.0, 0.0, -0.5));
    mesh.add_vertex(Vec3::new(-2.75, 4.0, 0.0625));
    mesh.add_face(0, 1, 2);
    mesh
}

fn assert_same_mesh(expected: &Mesh, actual: &Mesh) {
    assert_eq!(expected.vertex_count(), actual.vertex_count());
    assert_eq!(expected.face_count(), actual.face_count());
    for (e, a) in expected.vertices.iter().zip(&actual.vertices) {
        assert_abs_diff_eq!(e, a, epsilon = TOLERANCE);
    }
    assert_eq!(expected.faces, actual.faces);
}

fn roundtrip(mesh: &Mesh, extension: &str) -> Mesh {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join(format!("mesh.{extension}"));
    save_mesh(mesh, &path).expect("save");
    load_mesh(&path).expect("load")
}

#[test]
fn test_triangle_roundtrip() {
    let mesh = triangle();
    for extension in ["3ds", "lwo", "obj", "fbx"] {
        let loaded = roundtrip(&mesh, extension);
        assert_same_mesh(&mesh, &loaded);
    }
}

#[test]
fn test_empty_roundtrip() {
    let mesh = Mesh::new();
    for extension in ["3ds", "lwo", "obj"] {
        let loaded = roundtrip(&mesh, extension);
        assert!(loaded.is_empty(), "{extension} produced vertices");
        assert_eq!(loaded.face_count(), 0);
    }
}

#[test]
fn test_empty_fbx_has_no_geometry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.fbx");
    save_mesh(&Mesh::new(), &path).unwrap();
    assert!(matches!(load_mesh(&path), Err(IoError::EmptyResult { .. })));
}

#[test]
fn test_cube_via_3ds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.3ds");
    three_ds::save_3ds(&Mesh::cube(1.0), &path).unwrap();

    let cube = three_ds::load_3ds(&path).unwrap();
    assert_eq!(cube.vertex_count(), 8);
    assert_eq!(cube.face_count(), 12);
    assert!(cube.faces.iter().flatten().all(|&i| i < 8));
    assert_abs_diff_eq!(cube.max_extent(), 1.0, epsilon = TOLERANCE);
}

#[test]
fn test_cube_via_obj_and_fbx() {
    let cube = Mesh::cube(2.0);
    assert_same_mesh(&cube, &roundtrip(&cube, "obj"));
    assert_same_mesh(&cube, &roundtrip(&cube, "fbx"));
}

#[test]
fn test_named_writers() {
    let dir = tempdir().unwrap();
    let mesh = triangle();

    let obj_path = dir.path().join("named.obj");
    obj::save_obj_named(&mesh, &obj_path, "Widget").unwrap();
    let text = std::fs::read_to_string(&obj_path).unwrap();
    assert!(text.contains("\no Widget\n"));

    let fbx_path = dir.path().join("named.fbx");
    fbx::save_fbx_named(&mesh, &fbx_path, "Widget").unwrap();
    let text = std::fs::read_to_string(&fbx_path).unwrap();
    assert!(text.contains("\"Geometry::Widget\""));

    let lwo_path = dir.path().join("named.lwo");
    save_mesh_with(&mesh, &lwo_path, &SaveOptions::named("Steel")).unwrap();
    let bytes = std::fs::read(&lwo_path).unwrap();
    assert!(bytes.windows(6).any(|w| w == b"Steel\0"));
    assert_same_mesh(&mesh, &lwo::load_lwo(&lwo_path).unwrap());

    let tds_path = dir.path().join("named.3ds");
    three_ds::save_3ds_named(&mesh, &tds_path, "Widget").unwrap();
    let bytes = std::fs::read(&tds_path).unwrap();
    assert_eq!(&bytes[18..25], b"Widget\0");
}

#[test]
fn test_dispatch_by_extension() {
    let dir = tempdir().unwrap();

    let stl_path = dir.path().join("part.STL");
    std::fs::write(
        &stl_path,
        "solid part\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid part\n",
    )
    .unwrap();
    assert_eq!(load_mesh(&stl_path).unwrap().face_count(), 1);

    let ply_path = dir.path().join("part.ply");
    std::fs::write(
        &ply_path,
        "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n",
    )
    .unwrap();
    assert_eq!(load_mesh(&ply_path).unwrap().face_count(), 1);

    let unknown = dir.path().join("part.xyz");
    assert!(matches!(
        save_mesh(&triangle(), &unknown),
        Err(IoError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        save_mesh(&triangle(), dir.path().join("part.stl")),
        Err(IoError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.3ds");
    assert!(matches!(load_mesh(&missing), Err(IoError::FileNotFound { .. })));
}
