use crate::float_types::{Real, tolerance};
use crate::geometry::Plane;
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Affine transformations shared by contours, contour collections and meshes.
///
/// Implementors provide [`TransformOps::transform`]; every other method is a
/// convenience wrapper building the corresponding homogeneous matrix.
pub trait TransformOps: Sized + Clone {
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Rotates by x_degrees, y_degrees, z_degrees (applied X, then Y, then Z)
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }

    /// Reflect (mirror) about `plane`.
    ///
    /// Reflection reverses handedness, so contours come back clockwise if they
    /// went in counter-clockwise.
    fn mirror(&self, plane: &Plane) -> Self {
        let len = plane.normal().norm();
        if len < tolerance() {
            return self.clone();
        }
        let n = plane.normal() / len;
        let offset = plane.point().coords;

        // Push the plane through the origin, reflect with R = I - 2 n n^T, pull it back.
        let t1 = Translation3::from(-offset).to_homogeneous();
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);
        let t2 = Translation3::from(offset).to_homogeneous();

        self.transform(&(t2 * reflect_4 * t1))
    }
}
