//! Camera placement and projection for preview images

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};
use remesh_core::{Drawable, PolygonMesh};

/// Sensor width of the default camera, in millimetres
pub const SENSOR_WIDTH_MM: f32 = 36.0;

/// Focal length used for previews, in millimetres
pub const PREVIEW_LENS_MM: f32 = 35.0;

/// A perspective camera, Z up
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Vertical field of view of a lens, fitting the sensor to the wider side
    pub fn fov_for_lens(lens_mm: f32, aspect_ratio: f32) -> f32 {
        let half = SENSOR_WIDTH_MM / (2.0 * lens_mm);
        if aspect_ratio >= 1.0 {
            2.0 * (half / aspect_ratio).atan()
        } else {
            2.0 * half.atan()
        }
    }

    /// Camera looking down at a mesh from the front-right at 45 degrees.
    ///
    /// The distance is 1.5 times the largest bounding box dimension and the
    /// camera sits 0.8 of that dimension above the centre.
    pub fn framing(mesh: &PolygonMesh, aspect_ratio: f32) -> Self {
        let mut max_dimension = mesh.max_dimension();
        if max_dimension <= f32::EPSILON {
            max_dimension = 1.0;
        }
        let center = mesh.center();
        let distance = max_dimension * 1.5;
        let position = Point3::new(
            center.x + distance * 0.7,
            center.y - distance * 0.7,
            center.z + max_dimension * 0.8,
        );

        Self::new(
            position,
            center,
            Vector3::z(),
            Self::fov_for_lens(PREVIEW_LENS_MM, aspect_ratio),
            aspect_ratio,
            max_dimension * 0.01,
            max_dimension * 10.0,
        )
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    /// Project a world point to pixel coordinates, `None` if it is behind
    /// the near plane
    pub fn project(&self, point: &Point3<f32>, width: u32, height: u32) -> Option<(f32, f32)> {
        let clip = self.projection_matrix() * self.view_matrix() * point.to_homogeneous();
        if clip.w < self.near {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some((
            (ndc_x + 1.0) * 0.5 * width as f32,
            (1.0 - ndc_y) * 0.5 * height as f32,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, -5.0, 0.0),
            Point3::origin(),
            Vector3::z(),
            std::f32::consts::FRAC_PI_4,
            4.0 / 3.0,
            0.1,
            100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use remesh_core::Point3f;

    fn unit_quad() -> PolygonMesh {
        PolygonMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(2.0, 0.0, 0.0),
                Point3f::new(2.0, 2.0, 0.0),
                Point3f::new(0.0, 2.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn test_framing_position() {
        let camera = Camera::framing(&unit_quad(), 800.0 / 600.0);
        // max dimension 2, distance 3
        assert_relative_eq!(camera.position.x, 1.0 + 2.1, epsilon = 1e-5);
        assert_relative_eq!(camera.position.y, 1.0 - 2.1, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, 1.6, epsilon = 1e-5);
        assert_eq!(camera.target, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_lens_field_of_view() {
        // A 35mm lens on a 36mm sensor is about 54.4 degrees wide
        let horizontal = 2.0 * (SENSOR_WIDTH_MM / (2.0 * PREVIEW_LENS_MM)).atan();
        assert_relative_eq!(horizontal.to_degrees(), 54.43, epsilon = 0.01);
        let vertical = Camera::fov_for_lens(PREVIEW_LENS_MM, 4.0 / 3.0);
        assert!(vertical < horizontal);
    }

    #[test]
    fn test_target_projects_to_image_centre() {
        let camera = Camera::framing(&unit_quad(), 800.0 / 600.0);
        let (x, y) = camera.project(&camera.target, 800, 600).unwrap();
        assert_relative_eq!(x, 400.0, epsilon = 1e-2);
        assert_relative_eq!(y, 300.0, epsilon = 1e-2);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = Camera::default();
        assert!(camera.project(&Point3::new(0.0, -10.0, 0.0), 800, 600).is_none());
        assert!(camera.project(&Point3::origin(), 800, 600).is_some());
    }

    #[test]
    fn test_flat_mesh_still_frames() {
        let point = PolygonMesh::from_vertices_and_faces(
            vec![Point3f::new(1.0, 1.0, 1.0); 3],
            vec![vec![0, 1, 2]],
        );
        let camera = Camera::framing(&point, 1.0);
        assert!(camera.near > 0.0);
        assert!((camera.position - camera.target).norm() > 0.0);
    }
}
