//! Plain geometric primitives used by the relaxation engine.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position in three dimensional space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Coordinate along the global X axis.
    pub x: f64,
    /// Coordinate along the global Y axis.
    pub y: f64,
    /// Coordinate along the global Z axis.
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Return the point shifted by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vector3<f64>) -> Self {
        Self::from(self.to_vector() + offset)
    }
}

impl From<Vector3<f64>> for Point {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point> for Vector3<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Start of the segment.
    pub from: Point,
    /// End of the segment.
    pub to: Point,
}

impl Line {
    /// Create a [`Line`] from its two endpoints.
    #[must_use]
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.from.distance_to(self.to)
    }

    /// Vector pointing from `from` to `to`.
    #[must_use]
    pub fn direction(&self) -> Vector3<f64> {
        Vector3::from(self.to) - Vector3::from(self.from)
    }
}

/// Single-face triangular mesh spanning three points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Corner positions.
    pub vertices: [Point; 3],
    /// Faces as indices into `vertices`.
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Build a mesh holding the single face `a, b, c`.
    #[must_use]
    pub fn triangle(a: Point, b: Point, c: Point) -> Self {
        Self {
            vertices: [a, b, c],
            faces: vec![[0, 1, 2]],
        }
    }

    /// Face normal scaled by twice the face area.
    fn area_vector(&self) -> Vector3<f64> {
        let [a, b, c] = self.vertices.map(Point::to_vector);
        (b - a).cross(&(c - a))
    }

    /// Surface area of the mesh.
    ///
    /// # Examples
    /// ```
    /// use funicular::{point, TriangleMesh};
    ///
    /// let mesh = TriangleMesh::triangle(
    ///     point(0.0, 0.0, 0.0),
    ///     point(3.0, 0.0, 0.0),
    ///     point(0.0, 4.0, 0.0),
    /// );
    /// assert!((mesh.area() - 6.0).abs() < 1.0e-12);
    /// ```
    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * self.area_vector().norm()
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use funicular::point;
///
/// let origin = point(0.0, 0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Convenience helper for creating [`Line`] instances.
///
/// # Examples
/// ```
/// use funicular::{line, point};
///
/// let spring = line(point(0.0, 0.0, 0.0), point(3.0, 4.0, 0.0));
/// assert_eq!(spring.length(), 5.0);
/// ```
#[must_use]
pub const fn line(from: Point, to: Point) -> Line {
    Line::new(from, to)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn point_to_vector_roundtrip() {
        let origin = Point::new(1.0, 2.0, 3.0);
        let vector: Vector3<f64> = origin.into();
        assert_eq!(vector, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Point::from(vector), origin);
    }

    #[test]
    fn line_length_matches_distance() {
        let segment = line(point(1.0, 1.0, 1.0), point(2.0, 3.0, 3.0));
        assert_relative_eq!(segment.length(), 3.0, epsilon = 1.0e-12);
        assert_eq!(segment.direction(), Vector3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn triangle_area_is_orientation_independent() {
        let a = point(0.0, 0.0, 1.0);
        let b = point(0.0, 4.0, 1.0);
        let c = point(3.0, 0.0, 1.0);
        let forward = TriangleMesh::triangle(a, b, c);
        let backward = TriangleMesh::triangle(a, c, b);
        assert_relative_eq!(forward.area(), 6.0, epsilon = 1.0e-12);
        assert_relative_eq!(backward.area(), 6.0, epsilon = 1.0e-12);
    }

    #[test]
    fn collinear_triangle_has_no_area() {
        let mesh = TriangleMesh::triangle(
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(2.0, 0.0, 0.0),
        );
        assert_eq!(mesh.area(), 0.0);
    }
}
