/// Meshport Core Library - Triangle meshes and the file formats they travel in
///
/// This library provides the shared mesh model plus readers and writers for
/// 3DS, LWO, OBJ, FBX (ASCII), STL and PLY, along with the geometry helpers
/// the viewers and generators built on it need: transforms, line clipping,
/// outline extrusion and wireframe projection.

pub mod clip;
pub mod error;
pub mod extrude;
pub mod formats;
pub mod geometry;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use error::{IoError, IoResult};
pub use formats::{
    decode_mesh, encode_mesh, load_mesh, save_mesh, save_mesh_with, MeshFormat, SaveOptions,
};
pub use geometry::{fan_triangulate, Bounds, Face, Mesh, Vec3, Vec3Ext};
pub use transform::{RotationState, Transform4x4};
