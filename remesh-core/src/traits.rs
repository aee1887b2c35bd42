//! Core traits for remesh

use crate::{mesh::*, point::*};

/// Anything with an axis-aligned extent, used to frame previews
pub trait Drawable {
    /// Minimum and maximum corners; both are the origin when there is
    /// nothing to bound
    fn bounding_box(&self) -> (Point3f, Point3f);

    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }

    /// Largest side of the bounding box
    fn max_dimension(&self) -> f32 {
        let (min, max) = self.bounding_box();
        (max - min).max()
    }
}

impl Drawable for PolygonMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let mut points = self.vertices.iter();
        let Some(first) = points.next() else {
            return (Point3f::origin(), Point3f::origin());
        };
        points.fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_and_center() {
        let mesh = PolygonMesh::from_vertices_and_faces(
            vec![
                Point3f::new(-1.0, 0.0, 2.0),
                Point3f::new(3.0, 4.0, -2.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        );
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, 0.0, -2.0));
        assert_eq!(max, Point3f::new(3.0, 4.0, 2.0));
        assert_eq!(mesh.center(), Point3f::new(1.0, 2.0, 0.0));
        assert_eq!(mesh.max_dimension(), 4.0);
    }

    #[test]
    fn test_empty_bounding_box() {
        let (min, max) = PolygonMesh::new().bounding_box();
        assert_eq!(min, Point3f::origin());
        assert_eq!(max, Point3f::origin());
    }
}
