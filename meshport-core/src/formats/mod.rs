//! Codecs for every supported mesh format, plus extension-based dispatch.
//!
//! | Format | Read | Write |
//! |--------|------|-------|
//! | 3DS (chunked, little-endian) | yes | yes |
//! | LWO2 (IFF, big-endian) | yes | yes |
//! | OBJ | yes | yes |
//! | FBX (ASCII only) | yes | yes |
//! | STL (ASCII and binary) | yes | no |
//! | PLY (ASCII only) | yes | no |
//!
//! Each file is read or written in a single call; all parsing and
//! serialisation happens on in-memory buffers.

mod binary;
pub mod fbx;
pub mod lwo;
pub mod obj;
pub mod ply;
pub mod stl;
mod text;
pub mod three_ds;

use std::fs;
use std::path::Path;

use crate::error::{IoError, IoResult};
use crate::geometry::Mesh;

pub use fbx::{decode_fbx, encode_fbx, load_fbx, save_fbx, save_fbx_named};
pub use lwo::{decode_lwo, encode_lwo, load_lwo, save_lwo, save_lwo_named};
pub use obj::{decode_obj, encode_obj, load_obj, save_obj, save_obj_named};
pub use ply::{decode_ply, load_ply};
pub use stl::{decode_stl, load_stl};
pub use three_ds::{decode_3ds, encode_3ds, load_3ds, save_3ds, save_3ds_named};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Autodesk 3D Studio chunk format.
    ThreeDs,
    /// LightWave object (LWO2).
    Lwo,
    /// Wavefront OBJ.
    Obj,
    /// Stereolithography, ASCII or binary.
    Stl,
    /// Stanford polygon format, ASCII only.
    Ply,
    /// Autodesk FBX, ASCII only.
    Fbx,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 6] = [
        MeshFormat::ThreeDs,
        MeshFormat::Lwo,
        MeshFormat::Obj,
        MeshFormat::Stl,
        MeshFormat::Ply,
        MeshFormat::Fbx,
    ];

    /// Detect format from file extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Parse a bare extension such as `"obj"` or `".3DS"`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|format| format.extension() == ext)
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::ThreeDs => "3ds",
            Self::Lwo => "lwo",
            Self::Obj => "obj",
            Self::Stl => "stl",
            Self::Ply => "ply",
            Self::Fbx => "fbx",
        }
    }

    pub const fn has_writer(&self) -> bool {
        matches!(self, Self::ThreeDs | Self::Lwo | Self::Obj | Self::Fbx)
    }
}

/// Writer settings shared by all formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Object, surface or geometry name, depending on the format.
    /// Each writer falls back to its own default when unset.
    pub name: Option<String>,
}

impl SaveOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

fn format_for_path(path: &Path) -> IoResult<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)");
        IoError::unsupported(format!("unrecognized file extension .{extension}"))
    })
}

/// Load a mesh, picking the codec from the file extension.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let format = format_for_path(path)?;
    let data = read_file(path)?;
    decode_mesh(&data, format)
}

/// Decode an in-memory file of the given format.
pub fn decode_mesh(data: &[u8], format: MeshFormat) -> IoResult<Mesh> {
    match format {
        MeshFormat::ThreeDs => decode_3ds(data),
        MeshFormat::Lwo => decode_lwo(data),
        MeshFormat::Obj => decode_obj(data),
        MeshFormat::Stl => decode_stl(data),
        MeshFormat::Ply => decode_ply(data),
        MeshFormat::Fbx => decode_fbx(data),
    }
}

/// Save a mesh with default options, picking the codec from the file extension.
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    save_mesh_with(mesh, path, &SaveOptions::default())
}

pub fn save_mesh_with<P: AsRef<Path>>(mesh: &Mesh, path: P, options: &SaveOptions) -> IoResult<()> {
    let path = path.as_ref();
    check_output_path(path)?;
    let format = format_for_path(path)?;
    let data = encode_mesh(mesh, format, options)?;
    write_file(path, &data)
}

/// Serialise a mesh into the bytes of a file of the given format.
pub fn encode_mesh(mesh: &Mesh, format: MeshFormat, options: &SaveOptions) -> IoResult<Vec<u8>> {
    let name = options.name.as_deref();
    match format {
        MeshFormat::ThreeDs => encode_3ds(mesh, name.unwrap_or(three_ds::DEFAULT_OBJECT_NAME)),
        MeshFormat::Lwo => encode_lwo(mesh, name.unwrap_or(lwo::DEFAULT_SURFACE_NAME)),
        MeshFormat::Obj => Ok(encode_obj(mesh, name)),
        MeshFormat::Fbx => Ok(encode_fbx(mesh, name.unwrap_or(fbx::DEFAULT_GEOMETRY_NAME))),
        MeshFormat::Stl | MeshFormat::Ply => Err(IoError::unsupported(format!(
            "no writer for .{} files",
            format.extension()
        ))),
    }
}

/// Read a whole file, mapping a missing file to `FileNotFound`.
pub(crate) fn read_file(path: &Path) -> IoResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })
}

pub(crate) fn check_output_path(path: &Path) -> IoResult<()> {
    if path.as_os_str().is_empty() {
        return Err(IoError::invalid_argument("output path is empty"));
    }
    Ok(())
}

pub(crate) fn write_file(path: &Path, data: &[u8]) -> IoResult<()> {
    check_output_path(path)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(MeshFormat::from_path("model.3ds"), Some(MeshFormat::ThreeDs));
        assert_eq!(MeshFormat::from_path("model.3DS"), Some(MeshFormat::ThreeDs));
        assert_eq!(MeshFormat::from_path("/a/b/model.lwo"), Some(MeshFormat::Lwo));
        assert_eq!(MeshFormat::from_path("model.Obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("model.stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("model.ply"), Some(MeshFormat::Ply));
        assert_eq!(MeshFormat::from_path("model.fbx"), Some(MeshFormat::Fbx));
        assert_eq!(MeshFormat::from_path("model.xyz"), None);
        assert_eq!(MeshFormat::from_path("model"), None);
        assert_eq!(MeshFormat::from_path(""), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(MeshFormat::from_extension(".FBX"), Some(MeshFormat::Fbx));
        assert_eq!(MeshFormat::from_extension("lwo"), Some(MeshFormat::Lwo));
        assert_eq!(MeshFormat::from_extension(""), None);
    }

    #[test]
    fn test_writers() {
        let writable: Vec<_> = MeshFormat::ALL.into_iter().filter(MeshFormat::has_writer).collect();
        assert_eq!(
            writable,
            vec![MeshFormat::ThreeDs, MeshFormat::Lwo, MeshFormat::Obj, MeshFormat::Fbx]
        );
    }

    #[test]
    fn test_encode_without_writer_fails() {
        let err = encode_mesh(&Mesh::cube(1.0), MeshFormat::Stl, &SaveOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_unknown_extension() {
        let err = load_mesh("model.xyz").unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_mesh("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn test_save_empty_path() {
        let err = save_mesh(&Mesh::cube(1.0), "").unwrap_err();
        assert!(matches!(err, IoError::InvalidArgument { .. }));
    }
}
