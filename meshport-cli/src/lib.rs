/// Command implementations behind the `meshport` binary
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use meshport_core::{load_mesh, save_mesh_with, Bounds, Mesh, MeshFormat, SaveOptions};

pub mod report;

/// What `info` reports about a loaded mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSummary {
    pub path: PathBuf,
    pub format: MeshFormat,
    pub vertices: usize,
    pub faces: usize,
    pub bounds: Bounds,
}

impl MeshSummary {
    pub fn new(path: &Path, format: MeshFormat, mesh: &Mesh) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            bounds: mesh.bounds(),
        }
    }
}

fn format_of(path: &Path) -> Result<MeshFormat> {
    MeshFormat::from_path(path)
        .with_context(|| format!("no mesh format for extension of {}", path.display()))
}

fn writable_format_of(path: &Path) -> Result<MeshFormat> {
    let format = format_of(path)?;
    if !format.has_writer() {
        bail!(
            "{} files can be read but not written; use 3ds, lwo, obj or fbx",
            format.extension()
        );
    }
    Ok(format)
}

fn save(mesh: &Mesh, output: &Path, name: Option<&str>) -> Result<MeshSummary> {
    let format = writable_format_of(output)?;
    let options = SaveOptions {
        name: name.map(str::to_owned),
    };
    save_mesh_with(mesh, output, &options)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(MeshSummary::new(output, format, mesh))
}

/// Load `input` and summarise it.
pub fn info(input: &Path) -> Result<MeshSummary> {
    let format = format_of(input)?;
    let mesh = load_mesh(input).with_context(|| format!("failed to load {}", input.display()))?;
    Ok(MeshSummary::new(input, format, &mesh))
}

/// Re-encode `input` into `output`, formats picked by extension.
pub fn convert(input: &Path, output: &Path, name: Option<&str>) -> Result<MeshSummary> {
    // Fail before reading anything when the output cannot be written
    writable_format_of(output)?;
    let mesh = load_mesh(input).with_context(|| format!("failed to load {}", input.display()))?;
    save(&mesh, output, name)
}

/// Write a cube of edge length `size` centred on the origin.
pub fn cube(output: &Path, size: f32, name: Option<&str>) -> Result<MeshSummary> {
    if !(size.is_finite() && size > 0.0) {
        bail!("cube size must be a positive number, got {size}");
    }
    save(&Mesh::cube(size), output, name)
}
