//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the world transform used to bake
//! mesh vertices into world space.

pub use nalgebra::{
    Vector3,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// World up axis (Y-up, right-handed)
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position, rotation and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.to_matrix().transform_point(&Point3::from(point)).coords
    }

    /// Combine this transform with a child transform (parent * child)
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }
}

/// Component-wise minimum of two vectors
pub fn min_components(a: &Vec3, b: &Vec3) -> Vec3 {
    Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

/// Component-wise maximum of two vectors
pub fn max_components(a: &Vec3, b: &Vec3) -> Vec3 {
    Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_point_applies_scale_then_rotation_then_translation() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let transform = Transform::new(Vec3::new(10.0, 0.0, 0.0), rotation, Vec3::new(2.0, 2.0, 2.0));

        // (1,0,0) -> scaled (2,0,0) -> rotated about +Y (0,0,-2) -> translated
        let p = transform.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(10.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_combine_matches_matrix_product() {
        let parent = Transform::new(
            Vec3::new(0.0, -3.2, 0.0),
            Quat::identity(),
            Vec3::new(0.5, 0.5, 0.5),
        );
        let child = Transform::from_position(Vec3::new(4.0, 2.0, 0.0));
        let combined = parent.combine(&child);

        let point = Vec3::new(1.0, 1.0, 1.0);
        let expected = parent.transform_point(child.transform_point(point));
        assert_relative_eq!(combined.transform_point(point), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_component_min_max() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(-1.0, 2.0, 3.0);
        assert_eq!(min_components(&a, &b), Vec3::new(-1.0, -2.0, 3.0));
        assert_eq!(max_components(&a, &b), Vec3::new(1.0, 2.0, 3.0));
    }
}
