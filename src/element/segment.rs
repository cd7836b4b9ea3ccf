use nalgebra::{Point1, Point2, Scalar, Vector2};
use numeric_literals::replace_float_literals;

use crate::element::ElementMapping;
use crate::mesh::TriangleMesh2d;
use crate::Real;

/// Affine map from the reference segment `[0, 1]` to a segment embedded in two dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SegmentMapping<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 2],
}

impl<T> SegmentMapping<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 2]) -> Self {
        Self { vertices }
    }

    /// Builds the mapping for boundary edge `edge_index` of the mesh, with its vertices in local
    /// order 0, 1.
    ///
    /// # Panics
    ///
    /// Panics if the edge index is out of bounds.
    pub fn from_mesh(mesh: &TriangleMesh2d<T>, edge_index: usize) -> Self {
        let [a, b] = mesh.edge_vertices(edge_index);
        Self::from_vertices([mesh.vertex(a).clone(), mesh.vertex(b).clone()])
    }
}

impl<T> SegmentMapping<T>
where
    T: Real,
{
    fn tangent(&self) -> Vector2<T> {
        self.vertices[1] - self.vertices[0]
    }

    pub fn length(&self) -> T {
        self.tangent().norm()
    }

    /// Unit normal pointing to the right of the segment direction.
    ///
    /// For boundary edges oriented counter-clockwise around the domain this is the outward normal.
    /// Returns `None` if the segment has zero length.
    pub fn normal(&self) -> Option<Vector2<T>> {
        let t = self.tangent();
        Vector2::new(t.y, -t.x).try_normalize(T::zero())
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn midpoint(&self) -> Point2<T> {
        self.map_reference_coords(&Point1::new(0.5))
    }
}

impl<T> ElementMapping<T, 1> for SegmentMapping<T>
where
    T: Real,
{
    fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    fn map_reference_coords(&self, xi: &Point1<T>) -> Point2<T> {
        self.vertices[0] + self.tangent() * xi.x
    }

    fn reference_jacobian(&self, _xi: &Point1<T>) -> Vector2<T> {
        self.tangent()
    }

    fn jacobian_determinant(&self, xi: &Point1<T>) -> T {
        let j = self.reference_jacobian(xi);
        (j.transpose() * j)[(0, 0)].sqrt()
    }
}
