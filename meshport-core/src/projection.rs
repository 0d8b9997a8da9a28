/// Wireframe projection of a mesh onto a 2D viewport
use nalgebra::Point2;

use crate::clip::{clip_line, ClipRect};
use crate::geometry::Mesh;
use crate::transform::{RotationState, Transform4x4};

/// Fraction of the smaller viewport side the model is scaled to.
pub const DEFAULT_FILL: f32 = 0.8;

/// Target drawing area in screen units, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub fill: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fill: DEFAULT_FILL,
        }
    }

    pub fn clip_rect(&self) -> ClipRect {
        ClipRect::from_size(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// A visible edge in screen space.
pub type Segment2 = (Point2<f32>, Point2<f32>);

/// Model transform that centres the mesh, rotates it and scales it to the viewport.
///
/// Y is flipped so that model up is screen up. The result is relative to the
/// viewport centre; `project_wireframe` adds that offset.
pub fn fit_transform(mesh: &Mesh, rotation: &RotationState, viewport: &Viewport) -> Transform4x4 {
    let center = mesh.center();
    let mut extent = mesh.max_extent();
    if extent == 0.0 {
        extent = 1.0;
    }
    let scale = viewport.width.min(viewport.height) * viewport.fill / extent;

    Transform4x4::scale(scale, -scale, scale)
        * rotation.to_transform()
        * Transform4x4::translation(-center.x, -center.y, -center.z)
}

/// Project every face edge and clip it against the viewport.
///
/// Faces referencing missing vertices are ignored. Edges shared by two faces
/// are emitted once per face.
pub fn project_wireframe(mesh: &Mesh, transform: &Transform4x4, viewport: &Viewport) -> Vec<Segment2> {
    let (cx, cy) = (viewport.width / 2.0, viewport.height / 2.0);
    let screen: Vec<Point2<f32>> = mesh
        .vertices
        .iter()
        .map(|vertex| {
            let v = transform.transform_point(vertex);
            Point2::new(cx + v.x, cy + v.y)
        })
        .collect();

    let rect = viewport.clip_rect();
    let mut segments = Vec::with_capacity(mesh.face_count() * 3);

    for face in &mesh.faces {
        let Some(corners) = face
            .iter()
            .map(|&index| screen.get(index as usize).copied())
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };

        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            if let Some(segment) = clip_line(corners[a], corners[b], &rect) {
                segments.push(segment);
            }
        }
    }

    segments
}
