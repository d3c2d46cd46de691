/// 3D transformation matrices and Euler rotation state
use nalgebra::{Matrix4, Vector3};

/// Euler rotation around three axes (in radians), applied in `XYZ` order
#[derive(Debug, Clone, Copy, PartialEq)]
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
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Build a rotation from angles given in degrees
    pub fn from_degrees(x: f32, y: f32, z: f32) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
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

        // Intrinsic XYZ: X is the outermost rotation
        rx * ry * rz
    }

    /// Local matrix of a node: translate, then rotate around its own origin
    pub fn model_matrix(position: &Vector3<f32>, rotation: &RotationState) -> Matrix4<f32> {
        Matrix4::new_translation(position) * Self::rotation_matrix(rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_from_degrees() {
        let rotation = RotationState::from_degrees(90.0, 0.0, 180.0);
        assert!((rotation.x - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((rotation.z - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_xyz_order() {
        // Z applied first, then X: (1,0,0) -> (0,1,0) -> (0,0,1)
        let rotation = RotationState::from_degrees(90.0, 0.0, 90.0);
        let matrix = Transform::rotation_matrix(&rotation);
        let p = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_model_matrix_translates_after_rotation() {
        let position = Vector3::new(0.0, 50.0, 0.0);
        let rotation = RotationState::from_degrees(0.0, 0.0, 90.0);
        let matrix = Transform::model_matrix(&position, &rotation);
        let p = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 51.0, 0.0)).norm() < 1e-5);
    }
}
