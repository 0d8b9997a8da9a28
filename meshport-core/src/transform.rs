/// 4x4 homogeneous transforms and rotation state
use std::ops::Mul;

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::geometry::Vec3;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// `Rx * Ry * Rz`, so Z is applied to a point first.
    pub fn to_transform(&self) -> Transform4x4 {
        Transform4x4::rotation_x(self.x)
            * Transform4x4::rotation_y(self.y)
            * Transform4x4::rotation_z(self.z)
    }
}

/// Homogeneous 4x4 matrix; `a * b` transforms by `b` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform4x4 {
    matrix: Matrix4<f32>,
}

impl Default for Transform4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform4x4 {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    pub fn rotation_x(radians: f32) -> Self {
        Self::from_matrix(Matrix4::new_rotation(Vector3::new(radians, 0.0, 0.0)))
    }

    pub fn rotation_y(radians: f32) -> Self {
        Self::from_matrix(Matrix4::new_rotation(Vector3::new(0.0, radians, 0.0)))
    }

    pub fn rotation_z(radians: f32) -> Self {
        Self::from_matrix(Matrix4::new_rotation(Vector3::new(0.0, 0.0, radians)))
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self::from_matrix(Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)))
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        Self::from_matrix(Matrix4::new_translation(&Vector3::new(tx, ty, tz)))
    }

    /// Apply the full affine map.
    ///
    /// The result is divided by W only when W is neither 0 nor 1.
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        let h = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        if h.w != 0.0 && h.w != 1.0 {
            Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w)
        } else {
            Vec3::new(h.x, h.y, h.z)
        }
    }
}

impl Mul for Transform4x4 {
    type Output = Transform4x4;

    fn mul(self, rhs: Transform4x4) -> Transform4x4 {
        Transform4x4::from_matrix(self.matrix * rhs.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).norm() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let transform = RotationState::zero().to_transform();
        assert!((transform.matrix() - Matrix4::identity()).norm() < 1e-6);
        assert_eq!(Transform4x4::default(), Transform4x4::identity());
    }

    #[test]
    fn test_axis_rotations() {
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert_close(
            Transform4x4::rotation_z(FRAC_PI_2).transform_point(&p),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_close(
            Transform4x4::rotation_y(FRAC_PI_2).transform_point(&p),
            Vec3::new(0.0, 0.0, -1.0),
        );
        assert_close(
            Transform4x4::rotation_x(FRAC_PI_2).transform_point(&Vec3::new(0.0, 1.0, 0.0)),
            Vec3::new(0.0, 0.0, 1.0),
        );
    }

    #[test]
    fn test_composition_applies_right_operand_first() {
        let translate = Transform4x4::translation(1.0, 0.0, 0.0);
        let scale = Transform4x4::scale(2.0, 2.0, 2.0);
        let p = Vec3::new(1.0, 1.0, 1.0);

        assert_close((scale * translate).transform_point(&p), Vec3::new(4.0, 2.0, 2.0));
        assert_close((translate * scale).transform_point(&p), Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_perspective_division() {
        let mut m = Matrix4::identity();
        m[(3, 3)] = 2.0;
        let p = Transform4x4::from_matrix(m).transform_point(&Vec3::new(2.0, 4.0, 6.0));
        assert_close(p, Vec3::new(1.0, 2.0, 3.0));

        // W == 0 leaves the point undivided
        m[(3, 3)] = 0.0;
        let p = Transform4x4::from_matrix(m).transform_point(&Vec3::new(2.0, 4.0, 6.0));
        assert_close(p, Vec3::new(2.0, 4.0, 6.0));
    }
}
