use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};

// The scene convention is degree-based (the body table and the original
// parameter set are all in degrees), so these helpers take degrees and do the
// radian conversion in one place.

pub fn rotate_x(degrees: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), degrees.to_radians())
}

pub fn rotate_y(degrees: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), degrees.to_radians())
}

pub fn rotate_z(degrees: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), degrees.to_radians())
}

pub fn translate_x(distance: f64) -> Translation3<f64> {
    Translation3::new(distance, 0.0, 0.0)
}

/// A rigid placement plus a (possibly non-uniform) scale, kept separate so
/// that consumers that only care about placement never have to strip the
/// scale back out of a raw matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTransform {
    pub rigid: Isometry3<f64>,
    pub scale: Vector3<f64>,
}

impl RenderTransform {
    pub fn new(rigid: Isometry3<f64>, scale: Vector3<f64>) -> Self {
        RenderTransform { rigid, scale }
    }

    /// The full 4x4 model matrix, scale applied last (i.e. in mesh space).
    pub fn matrix(&self) -> Matrix4<f64> {
        self.rigid.to_homogeneous() * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    pub fn position(&self) -> Vector3<f64> {
        self.rigid.translation.vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_rotations_in_degrees() {
        let p = Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotate_y(90.0) * p, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(rotate_z(90.0) * p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            rotate_x(90.0) * Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_render_transform_matrix_order() {
        // Scale must apply before the rigid part: a unit-x point scaled by 2
        // then translated by 3 lands at 5, not at 8.
        let transform = RenderTransform::new(
            Isometry3::from(translate_x(3.0)),
            Vector3::new(2.0, 2.0, 2.0),
        );
        let moved = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(5.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
