use galerkin::element::{ElementMapping, SegmentMapping};
use galerkin::mesh::procedural::create_unit_square_uniform_tri_mesh_2d;
use galerkin::nalgebra::{Point1, Point2, Vector2};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq, prop_assert_scalar_eq};
use proptest::prelude::*;

use galerkin::proptest::reference_segment_point;

#[test]
fn map_reference_coords_interpolates_end_points() {
    let mapping = SegmentMapping::from_vertices([Point2::new(1.0, 2.0), Point2::new(4.0, 6.0)]);
    assert_eq!(mapping.map_reference_coords(&Point1::new(0.0)), Point2::new(1.0, 2.0));
    assert_eq!(mapping.map_reference_coords(&Point1::new(1.0)), Point2::new(4.0, 6.0));
    let x = mapping.map_reference_coords(&Point1::new(0.25));
    assert_matrix_eq!(x.coords, Vector2::new(1.75, 3.0), comp = abs, tol = 1e-14);
    assert_matrix_eq!(mapping.midpoint().coords, Vector2::new(2.5, 4.0), comp = abs, tol = 1e-14);
}

#[test]
fn jacobian_determinant_is_length() {
    let mapping = SegmentMapping::from_vertices([Point2::new(1.0, 2.0), Point2::new(4.0, 6.0)]);
    let xi = Point1::new(0.3);
    assert_matrix_eq!(mapping.reference_jacobian(&xi), Vector2::new(3.0, 4.0), comp = abs, tol = 0.0);
    assert_scalar_eq!(mapping.jacobian_determinant(&xi), 5.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(mapping.length(), 5.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(mapping.checked_jacobian_determinant(&xi).unwrap(), 5.0, comp = abs, tol = 1e-14);
}

#[test]
fn zero_length_segment_is_degenerate() {
    let mapping = SegmentMapping::from_vertices([Point2::new(1.0, 2.0), Point2::new(1.0, 2.0)]);
    assert!(mapping
        .checked_jacobian_determinant(&Point1::new(0.5))
        .is_err());
    assert!(mapping.normal().is_none());
}

#[test]
fn normal_points_out_of_counterclockwise_boundary() {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(3);
    let center = Point2::new(0.5, 0.5);
    for e in 0..mesh.num_edges() {
        let mapping = SegmentMapping::from_mesh(&mesh, e);
        let normal = mapping.normal().unwrap();
        assert_scalar_eq!(normal.norm(), 1.0, comp = abs, tol = 1e-14);
        assert!(normal.dot(&(mapping.midpoint() - center)) > 0.0);
    }
}

#[test]
fn from_mesh_copies_vertices_in_local_order() {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(2);
    for e in 0..mesh.num_edges() {
        let mapping = SegmentMapping::from_mesh(&mesh, e);
        assert_eq!(&mapping.vertices()[0], mesh.vertex(mesh.edge_vertex_index(e, 0)));
        assert_eq!(&mapping.vertices()[1], mesh.vertex(mesh.edge_vertex_index(e, 1)));
    }
}

proptest! {
    #[test]
    fn length_element_is_independent_of_reference_point(
        mapping in any::<SegmentMapping<f64>>(),
        xi in reference_segment_point()
    ) {
        let expected = (mapping.vertices()[1] - mapping.vertices()[0]).norm();
        prop_assert_scalar_eq!(mapping.jacobian_determinant(&xi), expected, comp = abs, tol = 1e-12);
    }
}
