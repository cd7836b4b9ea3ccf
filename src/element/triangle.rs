use nalgebra::{Matrix2, Point2, Scalar};
use numeric_literals::replace_float_literals;

use crate::element::ElementMapping;
use crate::mesh::TriangleMesh2d;
use crate::Real;

/// Affine map from the reference triangle with corners `(0, 0)`, `(1, 0)`, `(0, 1)` to a
/// physical triangle.
///
/// The vertices are copied at construction, so the mapping does not borrow the mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TriangleMapping<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 3],
}

impl<T> TriangleMapping<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 3]) -> Self {
        Self { vertices }
    }

    /// Builds the mapping for triangle `triangle_index` of the mesh, with its vertices in local
    /// order 0, 1, 2.
    ///
    /// # Panics
    ///
    /// Panics if the triangle index is out of bounds.
    pub fn from_mesh(mesh: &TriangleMesh2d<T>, triangle_index: usize) -> Self {
        let [a, b, c] = mesh.triangle_vertices(triangle_index);
        Self::from_vertices([mesh.vertex(a).clone(), mesh.vertex(b).clone(), mesh.vertex(c).clone()])
    }
}

impl<T> TriangleMapping<T>
where
    T: Real,
{
    /// The identity map on the reference triangle.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)])
    }

    /// The (unsigned) area of the physical triangle.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn area(&self) -> T {
        0.5 * self.jacobian().determinant().abs()
    }

    fn jacobian(&self) -> Matrix2<T> {
        let [a, b, c] = &self.vertices;
        Matrix2::from_columns(&[b - a, c - a])
    }
}

impl<T> ElementMapping<T, 2> for TriangleMapping<T>
where
    T: Real,
{
    fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        self.vertices[0] + self.jacobian() * xi.coords
    }

    fn reference_jacobian(&self, _xi: &Point2<T>) -> Matrix2<T> {
        self.jacobian()
    }

    fn jacobian_determinant(&self, _xi: &Point2<T>) -> T {
        self.jacobian().determinant()
    }
}

impl<T: Real> TriangleMapping<T> {
    /// Transforms reference gradients to physical gradients, `J⁻ᵀ ∇φ`.
    ///
    /// Returns `None` if the Jacobian is singular.
    pub fn inverse_transpose_jacobian(&self) -> Option<Matrix2<T>> {
        self.jacobian().try_inverse().map(|j_inv| j_inv.transpose())
    }

    /// Centroid of the physical triangle.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn centroid(&self) -> Point2<T> {
        let [a, b, c] = &self.vertices;
        Point2::from((a.coords + b.coords + c.coords) / 3.0)
    }
}
