//! Math utilities and types
//!
//! Provides the fundamental math types for the simulation. All gameplay math is
//! done in single precision, Y up, with column-major 4x4 world transforms.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// World up axis
pub fn up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Drop the vertical component of a vector
pub fn horizontal(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Flatten a direction onto the XZ plane and normalize it.
///
/// Returns `None` for directions that are (nearly) vertical.
pub fn flatten_direction(v: &Vec3) -> Option<Vec3> {
    let flat = horizontal(v);
    let len = flat.magnitude();
    if len > 1e-6 {
        Some(flat / len)
    } else {
        None
    }
}

/// Linear blend `a + (b - a) * t`, the same shape as GLSL `mix`.
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Transform a point by a homogeneous matrix.
pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(*point)).coords
}

/// Transform a direction by a homogeneous matrix (translation ignored).
pub fn transform_vector(matrix: &Mat4, vector: &Vec3) -> Vec3 {
    matrix.transform_vector(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flatten_direction() {
        let dir = flatten_direction(&Vec3::new(3.0, 10.0, 4.0)).unwrap();
        assert_relative_eq!(dir, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);

        assert!(flatten_direction(&Vec3::new(0.0, -1.0, 0.0)).is_none());
    }

    #[test]
    fn test_transform_helpers() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let point = transform_point(&matrix, &Vec3::zeros());
        assert_relative_eq!(point, Vec3::new(1.0, 2.0, 3.0));

        let dir = transform_vector(&matrix, &Vec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(dir, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_mix() {
        assert_relative_eq!(mix(1.0, 0.2, 0.0), 1.0);
        assert_relative_eq!(mix(1.0, 0.2, 1.0), 0.2);
        assert_relative_eq!(mix(0.0, 10.0, 0.25), 2.5);
    }
}
