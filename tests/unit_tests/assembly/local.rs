use galerkin::assembly::local::{
    assemble_element_neumann_vector, assemble_element_source_vector, assemble_element_source_vector_into,
    assemble_element_stiffness_matrix, assemble_element_stiffness_matrix_into,
};
use galerkin::basis::{SegmentBasis, TriangleBasis};
use galerkin::element::{DegenerateElementError, SegmentMapping, TriangleMapping};
use galerkin::field::ConstantField;
use galerkin::nalgebra::{DMatrix, DMatrixViewMut, DVector, DVectorViewMut, Matrix3, Point2, Vector2, Vector3};
use galerkin::quadrature::QuadratureRule;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq, prop_assert_matrix_eq};
use proptest::prelude::*;
use util::{assert_panics, row_sums};

fn unit_right_triangle() -> TriangleMapping<f64> {
    TriangleMapping::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)])
}

#[test]
fn unit_right_triangle_stiffness_matrix() {
    let ke = assemble_element_stiffness_matrix(
        &unit_right_triangle(),
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    )
    .unwrap();

    #[rustfmt::skip]
    let expected = Matrix3::new(
        1.0, -0.5, -0.5,
        -0.5, 0.5, 0.0,
        -0.5, 0.0, 0.5);
    assert_matrix_eq!(ke, expected, comp = abs, tol = 1e-12);
}

#[test]
fn stiffness_matrix_does_not_depend_on_quadrature_for_constant_coefficient() {
    let mapping = TriangleMapping::from_vertices([Point2::new(0.5, 0.1), Point2::new(2.0, 0.4), Point2::new(1.0, 3.0)]);
    let basis = TriangleBasis::linear();
    let reference =
        assemble_element_stiffness_matrix(&mapping, &basis, &QuadratureRule::triangle(0), &ConstantField(2.0)).unwrap();
    for order in [2, 4, 6] {
        let ke = assemble_element_stiffness_matrix(&mapping, &basis, &QuadratureRule::triangle(order), &ConstantField(2.0))
            .unwrap();
        assert_matrix_eq!(ke, reference, comp = abs, tol = 1e-12);
    }
}

#[test]
fn stiffness_matrix_with_affine_coefficient_scales_with_centroid_value() {
    // Gradients are constant, so Ke(k) = k(centroid) Ke(1) for affine k
    let mapping = TriangleMapping::from_vertices([Point2::new(0.0, 0.0), Point2::new(2.0, 0.5), Point2::new(0.5, 1.5)]);
    let basis = TriangleBasis::linear();
    let quadrature = QuadratureRule::triangle(2);
    let k = |x: &Point2<f64>| 1.0 + 2.0 * x.x - x.y;
    let ke = assemble_element_stiffness_matrix(&mapping, &basis, &quadrature, &k).unwrap();
    let ke_unit = assemble_element_stiffness_matrix(&mapping, &basis, &quadrature, &ConstantField(1.0)).unwrap();
    let expected = ke_unit * k(&mapping.centroid());
    assert_matrix_eq!(ke, expected, comp = abs, tol = 1e-12);
}

#[test]
fn stiffness_matrix_into_overwrites_output() {
    let mut output = DMatrix::repeat(3, 3, 7.0);
    assemble_element_stiffness_matrix_into(
        DMatrixViewMut::from(&mut output),
        &unit_right_triangle(),
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    )
    .unwrap();
    assert_scalar_eq!(output[(1, 2)], 0.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(output[(0, 0)], 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn stiffness_matrix_output_size_is_checked() {
    let mut output = DMatrix::zeros(2, 3);
    assert_panics!(assemble_element_stiffness_matrix_into(
        DMatrixViewMut::from(&mut output),
        &unit_right_triangle(),
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    ));
}

#[test]
fn degenerate_triangle_leaves_zero_filled_output() {
    let mapping = TriangleMapping::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)]);
    let mut output = DMatrix::repeat(3, 3, 7.0);
    let result = assemble_element_stiffness_matrix_into(
        DMatrixViewMut::from(&mut output),
        &mapping,
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    );
    assert!(result.is_err());
    assert_eq!(output, DMatrix::zeros(3, 3));
}

#[test]
fn degenerate_triangle_is_reported() {
    let mapping = TriangleMapping::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)]);
    let err = assemble_element_stiffness_matrix(
        &mapping,
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    )
    .unwrap_err();
    assert!(err.downcast_ref::<DegenerateElementError<f64>>().is_some());

    let err = assemble_element_source_vector(
        &mapping,
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    )
    .unwrap_err();
    assert!(err.downcast_ref::<DegenerateElementError<f64>>().is_some());
}

#[test]
fn constant_source_is_distributed_equally() {
    let fe = assemble_element_source_vector(
        &unit_right_triangle(),
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    )
    .unwrap();
    assert_matrix_eq!(fe, Vector3::repeat(1.0 / 6.0), comp = abs, tol = 1e-14);
}

#[test]
fn linear_source_is_integrated_exactly() {
    // For affine f: int f phi_i = |T| / 12 (2 f_i + f_j + f_k)
    let f = |x: &Point2<f64>| x.x;
    let fe = assemble_element_source_vector(
        &unit_right_triangle(),
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &f,
    )
    .unwrap();
    assert_matrix_eq!(fe, Vector3::new(1.0, 2.0, 1.0) / 24.0, comp = abs, tol = 1e-14);
}

#[test]
fn source_vector_into_accumulates() {
    let mapping = unit_right_triangle();
    let basis = TriangleBasis::linear();
    let quadrature = QuadratureRule::triangle(2);
    let mut fe = DVector::repeat(3, 1.0);
    for _ in 0..2 {
        assemble_element_source_vector_into(
            DVectorViewMut::from(&mut fe),
            &mapping,
            &basis,
            &quadrature,
            &ConstantField(3.0),
        )
        .unwrap();
    }
    assert_matrix_eq!(fe, DVector::repeat(3, 2.0), comp = abs, tol = 1e-14);
}

#[test]
fn source_vector_output_size_is_checked() {
    let mut fe = DVector::zeros(2);
    assert_panics!(assemble_element_source_vector_into(
        DVectorViewMut::from(&mut fe),
        &unit_right_triangle(),
        &TriangleBasis::linear(),
        &QuadratureRule::triangle(2),
        &ConstantField(1.0),
    ));
}

#[test]
fn neumann_vector_on_segment() {
    let mapping = SegmentMapping::from_vertices([Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)]);
    let basis = SegmentBasis::linear();
    let quadrature = QuadratureRule::segment(2);

    let constant = assemble_element_neumann_vector(&mapping, &basis, &quadrature, &ConstantField(3.0)).unwrap();
    assert_matrix_eq!(constant, Vector2::new(3.0, 3.0), comp = abs, tol = 1e-14);

    // int_0^2 x (1 - x/2) dx = 2/3, int_0^2 x (x/2) dx = 4/3
    let linear = assemble_element_neumann_vector(&mapping, &basis, &quadrature, &|x: &Point2<f64>| x.x).unwrap();
    assert_matrix_eq!(linear, Vector2::new(2.0 / 3.0, 4.0 / 3.0), comp = abs, tol = 1e-14);
}

#[test]
fn neumann_vector_on_degenerate_segment_is_reported() {
    let mapping = SegmentMapping::from_vertices([Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)]);
    let result = assemble_element_neumann_vector(
        &mapping,
        &SegmentBasis::linear(),
        &QuadratureRule::segment(0),
        &ConstantField(1.0),
    );
    assert!(result.is_err());
}

proptest! {
    #[test]
    fn constant_coefficient_stiffness_is_symmetric_with_zero_row_sums(
        mapping in any::<TriangleMapping<f64>>(),
        k in 0.1..10.0
    ) {
        let ke = assemble_element_stiffness_matrix(
            &mapping,
            &TriangleBasis::linear(),
            &QuadratureRule::triangle(2),
            &ConstantField(k),
        )
        .unwrap();

        // Exact symmetry, not just up to rounding
        prop_assert_eq!(&ke, &ke.transpose());
        let scale = ke.abs().max();
        prop_assert_matrix_eq!(row_sums(&ke), DVector::zeros(3), comp = abs, tol = 1e-12 * scale);
        // Positive semi-definite: diagonal entries are positive
        for i in 0..3 {
            prop_assert!(ke[(i, i)] > 0.0);
        }
    }

    #[test]
    fn source_vector_sums_to_integral_of_source(mapping in any::<TriangleMapping<f64>>(), f in -5.0..5.0) {
        let fe = assemble_element_source_vector(
            &mapping,
            &TriangleBasis::linear(),
            &QuadratureRule::triangle(2),
            &ConstantField(f),
        )
        .unwrap();
        let expected = f * mapping.area();
        prop_assert!((fe.sum() - expected).abs() <= 1e-12 * (1.0 + expected.abs()));
    }
}
