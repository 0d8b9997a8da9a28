//! Geometry primitives and the shared triangle mesh container.
use nalgebra::Vector3;

/// Single-precision 3D vector used for every vertex position.
pub type Vec3 = Vector3<f32>;

/// A triangle as three 0-based indices into `Mesh::vertices`.
pub type Face = [u32; 3];

/// Extra vector operations not covered by nalgebra.
pub trait Vec3Ext {
    /// Unit vector in the same direction, or the vector itself when its length is zero.
    fn normalized_or_self(&self) -> Self;
}

impl Vec3Ext for Vec3 {
    fn normalized_or_self(&self) -> Self {
        let length = self.norm();
        if length > 0.0 {
            self / length
        } else {
            *self
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Width, height and depth of the box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }
}

/// A triangle soup: ordered vertices plus index triples.
///
/// Faces always reference existing vertices; `add_face` refuses anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Append a face if all three indices are in range.
    ///
    /// Returns `false` (and leaves the mesh untouched) otherwise.
    pub fn add_face(&mut self, a: u32, b: u32, c: u32) -> bool {
        let count = self.vertices.len();
        if [a, b, c].iter().any(|&index| index as usize >= count) {
            return false;
        }
        self.faces.push([a, b, c]);
        true
    }

    /// Component-wise min/max over all vertices, zero box when empty.
    pub fn bounds(&self) -> Bounds {
        let Some(first) = self.vertices.first() else {
            return Bounds {
                min: Vec3::zeros(),
                max: Vec3::zeros(),
            };
        };

        self.vertices.iter().fold(
            Bounds {
                min: *first,
                max: *first,
            },
            |bounds, vertex| Bounds {
                min: bounds.min.inf(vertex),
                max: bounds.max.sup(vertex),
            },
        )
    }

    pub fn center(&self) -> Vec3 {
        self.bounds().center()
    }

    /// Largest of width/height/depth; 0 for an empty mesh.
    pub fn max_extent(&self) -> f32 {
        let size = self.bounds().size();
        size.x.max(size.y).max(size.z)
    }

    /// Axis-aligned cube centred on the origin: 8 shared vertices, 12 faces.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 12);

        for (x, y, z) in [
            (-half, -half, -half),
            (half, -half, -half),
            (half, half, -half),
            (-half, half, -half),
            (-half, -half, half),
            (half, -half, half),
            (half, half, half),
            (-half, half, half),
        ] {
            mesh.add_vertex(Vec3::new(x, y, z));
        }

        for [a, b, c] in [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ] {
            mesh.add_face(a, b, c);
        }

        mesh
    }
}

/// Fan-triangulate a polygon from its first vertex.
///
/// Yields `len - 2` triangles for 3 or more vertices, nothing otherwise.
pub fn fan_triangulate(polygon: &[u32]) -> impl Iterator<Item = Face> + '_ {
    let anchor = polygon.first().copied().unwrap_or_default();
    polygon
        .windows(2)
        .skip(1)
        .map(move |pair| [anchor, pair[0], pair[1]])
}
