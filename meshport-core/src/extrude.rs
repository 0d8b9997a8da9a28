//! Outline paths and their extrusion into side-wall meshes.
//!
//! Outlines come from a glyph or path source as move/line/curve verbs.
//! `OutlineBuilder` flattens those into polylines and `extrude_outlines`
//! turns each polyline into a hollow tube between z = 0 and z = depth.
use nalgebra::Point2;
use tracing::debug;

use crate::geometry::{Mesh, Vec3};

/// One contour as an ordered list of 2D points.
pub type OutlinePath = Vec<Point2<f32>>;

/// Default number of line segments per Bézier curve.
pub const DEFAULT_CURVE_SEGMENTS: usize = 20;

/// Flattens path verbs into `OutlinePath`s.
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    segments: usize,
    paths: Vec<OutlinePath>,
    current: OutlinePath,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::with_segments(DEFAULT_CURVE_SEGMENTS)
    }

    /// Builder approximating each curve with `segments` line segments (at least 1).
    pub fn with_segments(segments: usize) -> Self {
        Self {
            segments: segments.max(1),
            paths: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Start a new contour, finishing the current one.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.flush();
        self.current.push(Point2::new(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.current.push(Point2::new(x, y));
        self
    }

    /// Quadratic Bézier from the current point.
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        let p0 = self.cursor();
        let (p1, p2) = (Point2::new(cx, cy), Point2::new(x, y));
        for step in 1..=self.segments {
            let t = step as f32 / self.segments as f32;
            let mt = 1.0 - t;
            let point = p0.coords * (mt * mt) + p1.coords * (2.0 * mt * t) + p2.coords * (t * t);
            self.current.push(Point2::from(point));
        }
        self
    }

    /// Cubic Bézier from the current point.
    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> &mut Self {
        let p0 = self.cursor();
        let (p1, p2, p3) = (
            Point2::new(c1x, c1y),
            Point2::new(c2x, c2y),
            Point2::new(x, y),
        );
        for step in 1..=self.segments {
            let t = step as f32 / self.segments as f32;
            let mt = 1.0 - t;
            let point = p0.coords * (mt * mt * mt)
                + p1.coords * (3.0 * mt * mt * t)
                + p2.coords * (3.0 * mt * t * t)
                + p3.coords * (t * t * t);
            self.current.push(Point2::from(point));
        }
        self
    }

    /// Close the contour by repeating its first point if needed.
    pub fn close(&mut self) -> &mut Self {
        if let (Some(&first), Some(&last)) = (self.current.first(), self.current.last()) {
            if first != last {
                self.current.push(first);
            }
        }
        self
    }

    /// Finished contours; those with fewer than 3 points are dropped.
    pub fn finish(mut self) -> Vec<OutlinePath> {
        self.flush();
        self.paths
    }

    fn cursor(&self) -> Point2<f32> {
        self.current.last().copied().unwrap_or_else(Point2::origin)
    }

    fn flush(&mut self) {
        let path = std::mem::take(&mut self.current);
        if path.len() >= 3 {
            self.paths.push(path);
        }
    }
}

/// Extrude every outline along +Z, emitting only the side walls.
///
/// Each path contributes a front rail at z = 0 and a back rail at z = `depth`,
/// joined by two triangles per consecutive point pair. Caps are not
/// triangulated. Paths with fewer than 3 points are skipped.
pub fn extrude_outlines(paths: &[OutlinePath], depth: f32) -> Mesh {
    let mut mesh = Mesh::new();

    for path in paths.iter().filter(|path| path.len() >= 3) {
        let base = mesh.vertex_count() as u32;
        let count = path.len() as u32;

        for point in path {
            mesh.add_vertex(Vec3::new(point.x, point.y, 0.0));
        }
        for point in path {
            mesh.add_vertex(Vec3::new(point.x, point.y, depth));
        }

        for i in 0..count - 1 {
            let front_curr = base + i;
            let front_next = base + i + 1;
            let back_curr = base + count + i;
            let back_next = base + count + i + 1;

            mesh.add_face(front_curr, back_curr, front_next);
            mesh.add_face(front_next, back_curr, back_next);
        }
    }

    debug!(
        paths = paths.len(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "extruded outlines"
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> OutlinePath {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_extrude_square() {
        let mesh = extrude_outlines(&[square()], 2.0);
        assert_eq!(mesh.vertex_count(), 10);
        assert_eq!(mesh.face_count(), 8);

        // Front rail then back rail
        assert_eq!(mesh.vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[6], Vec3::new(1.0, 0.0, 2.0));

        assert_eq!(mesh.faces[0], [0, 5, 1]);
        assert_eq!(mesh.faces[1], [1, 5, 6]);
    }

    #[test]
    fn test_extrude_offsets_each_path() {
        let short = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let mesh = extrude_outlines(&[square(), short, square()], 1.0);
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.face_count(), 16);
        assert_eq!(mesh.faces[8], [10, 15, 11]);
    }

    #[test]
    fn test_extrude_nothing() {
        let mesh = extrude_outlines(&[], 1.0);
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_builder_closes_and_filters() {
        let mut builder = OutlineBuilder::new();
        builder
            .move_to(0.0, 0.0)
            .line_to(2.0, 0.0)
            .line_to(2.0, 2.0)
            .close()
            .move_to(5.0, 5.0)
            .line_to(6.0, 5.0);
        let paths = builder.finish();

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 4);
        assert_eq!(paths[0][3], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_builder_flattens_curves() {
        let mut builder = OutlineBuilder::with_segments(4);
        builder
            .move_to(0.0, 0.0)
            .quad_to(1.0, 2.0, 2.0, 0.0)
            .cubic_to(2.0, -1.0, 0.0, -1.0, 0.0, 0.0);
        let paths = builder.finish();

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.len(), 1 + 4 + 4);
        // Quadratic midpoint: 0.25 * p0 + 0.5 * p1 + 0.25 * p2
        assert!((path[2] - Point2::new(1.0, 1.0)).norm() < 1e-6);
        assert!((path[4] - Point2::new(2.0, 0.0)).norm() < 1e-6);
        assert!((path[8] - Point2::new(0.0, 0.0)).norm() < 1e-6);
    }
}
