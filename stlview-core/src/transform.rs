/// 3D transformation matrices and rotation state
use nalgebra::{Matrix4, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Uniform scale matrix
    pub fn uniform_scale_matrix(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// Per-axis scale matrix
    pub fn scale_matrix(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_state_accumulates() {
        let mut state = RotationState::default();
        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn identity_rotation() {
        let matrix = Transform::rotation_matrix(&RotationState::default());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn uniform_scale_scales_points() {
        let m = Transform::uniform_scale_matrix(2.0);
        let p = m.transform_point(&nalgebra::Point3::new(1.0, 1.0, 1.0));
        assert!((p.x - 2.0).abs() < 1e-6);
    }
}
