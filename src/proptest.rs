use crate::element::{ElementMapping, SegmentMapping, TriangleMapping};
use crate::mesh::procedural::create_rectangular_uniform_tri_mesh_2d;
use crate::mesh::TriangleMesh2d;
use ::proptest::prelude::*;
use nalgebra::{Point1, Point2, Vector2};

pub fn point2() -> impl Strategy<Value = Point2<f64>> {
    // Coordinates of moderate size, so that element geometry stays well conditioned
    let range = -10.0..10.0;
    [range.clone(), range.clone()].prop_map(|[x, y]| Point2::new(x, y))
}

/// Points in the closed reference triangle `{ξ, η ≥ 0, ξ + η ≤ 1}`.
pub fn reference_triangle_point() -> impl Strategy<Value = Point2<f64>> {
    [0.0..=1.0, 0.0..=1.0].prop_map(|[xi, eta]: [f64; 2]| {
        // Reflect points of the upper half of the unit square into the triangle
        if xi + eta > 1.0 {
            Point2::new(1.0 - xi, 1.0 - eta)
        } else {
            Point2::new(xi, eta)
        }
    })
}

/// Points in the reference segment `[0, 1]`.
pub fn reference_segment_point() -> impl Strategy<Value = Point1<f64>> {
    (0.0..=1.0).prop_map(Point1::new)
}

impl Arbitrary for TriangleMapping<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Counter-clockwise triangles whose area is bounded away from zero.
    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        [point2(), point2(), point2()]
            .prop_map(|[a, b, c]| {
                let mapping = Self::from_vertices([a, b, c]);
                if mapping.jacobian_determinant(&Point2::origin()) < 0.0 {
                    Self::from_vertices([a, c, b])
                } else {
                    mapping
                }
            })
            .prop_filter("triangle must not be nearly degenerate", |mapping| {
                let [e1, e2] = [
                    mapping.vertices()[1] - mapping.vertices()[0],
                    mapping.vertices()[2] - mapping.vertices()[0],
                ];
                // Reject slivers by bounding the smallest angle-like ratio
                let det = mapping.jacobian_determinant(&Point2::origin());
                det > 0.5 && det > 1e-2 * e1.norm_squared().max(e2.norm_squared())
            })
            .boxed()
    }
}

impl Arbitrary for SegmentMapping<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        [point2(), point2()]
            .prop_map(|[a, b]| Self::from_vertices([a, b]))
            .prop_filter("segment must have non-negligible length", |segment| {
                segment.length() > 1e-2
            })
            .boxed()
    }
}

/// Uniform triangulations of rectangles with arbitrary origin and extents, with at most
/// `max_cells_per_dim` cells per dimension.
pub fn uniform_tri_mesh_strategy(max_cells_per_dim: usize) -> impl Strategy<Value = TriangleMesh2d<f64>> {
    let cells = 1..=max_cells_per_dim.max(1);
    (point2(), 0.1..5.0, 0.1..5.0, cells.clone(), cells).prop_map(|(origin, w, h, nx, ny)| {
        create_rectangular_uniform_tri_mesh_2d(&origin, &Vector2::new(w, h), nx, ny)
    })
}
