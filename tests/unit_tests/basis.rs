use galerkin::basis::{LagrangeBasis, ReferenceBasis, SegmentBasis, TriangleBasis, UnsupportedBasisError};
use galerkin::nalgebra::{Point1, Point2, Vector1, Vector2};
use galerkin::proptest::{reference_segment_point, reference_triangle_point};
use matrixcompare::{assert_matrix_eq, prop_assert_matrix_eq, prop_assert_scalar_eq};
use proptest::prelude::*;
use util::assert_panics;

#[test]
fn number_of_functions() {
    assert_eq!(ReferenceBasis::<f64, 1>::num_functions(&SegmentBasis::linear()), 2);
    assert_eq!(ReferenceBasis::<f64, 2>::num_functions(&TriangleBasis::linear()), 3);
}

#[test]
fn triangle_lagrange_property() {
    // phi_i(v_j) = delta_ij for the reference vertices v_j
    let basis = TriangleBasis::linear();
    let vertices = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
    for i in 0..3 {
        for (j, v) in vertices.iter().enumerate() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(basis.evaluate(i, v), expected);
        }
    }
}

#[test]
fn segment_lagrange_property() {
    let basis = SegmentBasis::linear();
    let vertices = [Point1::new(0.0), Point1::new(1.0)];
    for i in 0..2 {
        for (j, v) in vertices.iter().enumerate() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(basis.evaluate(i, v), expected);
        }
    }
}

#[test]
fn triangle_gradients() {
    let basis = TriangleBasis::linear();
    let xi = Point2::new(0.2, 0.3);
    assert_matrix_eq!(basis.evaluate_gradient(0, &xi), Vector2::new(-1.0, -1.0));
    assert_matrix_eq!(basis.evaluate_gradient(1, &xi), Vector2::new(1.0, 0.0));
    assert_matrix_eq!(basis.evaluate_gradient(2, &xi), Vector2::new(0.0, 1.0));
}

#[test]
fn segment_gradients() {
    let basis = SegmentBasis::linear();
    let xi = Point1::new(0.7);
    assert_matrix_eq!(basis.evaluate_gradient(0, &xi), Vector1::new(-1.0));
    assert_matrix_eq!(basis.evaluate_gradient(1, &xi), Vector1::new(1.0));
}

#[test]
fn populate_basis_matches_evaluate() {
    let basis = TriangleBasis::linear();
    let xi = Point2::new(0.1, 0.6);
    let mut values = [0.0; 3];
    basis.populate_basis(&mut values, &xi);
    for (i, &value) in values.iter().enumerate() {
        assert_eq!(value, basis.evaluate(i, &xi));
    }

    let mut gradients = [Vector2::zeros(); 3];
    basis.populate_gradients(&mut gradients, &xi);
    for (i, gradient) in gradients.iter().enumerate() {
        assert_eq!(gradient, &basis.evaluate_gradient(i, &xi));
    }
}

#[test]
fn out_of_range_function_index_panics() {
    let triangle = TriangleBasis::linear();
    let segment = SegmentBasis::linear();
    assert_panics!(triangle.evaluate(3, &Point2::new(0.0, 0.0)));
    assert_panics!(triangle.evaluate_gradient(3, &Point2::new(0.0, 0.0)));
    assert_panics!(segment.evaluate(2, &Point1::new(0.0)));
    assert_panics!(segment.evaluate_gradient(2, &Point1::new(0.0)));
}

#[test]
fn wrong_buffer_length_panics() {
    let basis = TriangleBasis::linear();
    let mut values = [0.0; 2];
    assert_panics!(basis.populate_basis(&mut values, &Point2::new(0.0, 0.0)));
}

#[test]
fn only_linear_order_is_supported() {
    assert_eq!(LagrangeBasis::<2>::try_with_order(1), Ok(LagrangeBasis::<2>::linear()));
    assert_eq!(LagrangeBasis::<2>::try_with_order(2), Err(UnsupportedBasisError { order: 2 }));
    assert_eq!(LagrangeBasis::<1>::try_with_order(0), Err(UnsupportedBasisError { order: 0 }));
    assert_eq!(LagrangeBasis::<1>::new(1).order(), 1);
    assert_panics!(LagrangeBasis::<2>::new(3));
}

proptest! {
    #[test]
    fn triangle_partition_of_unity(xi in reference_triangle_point()) {
        let basis = TriangleBasis::linear();
        let sum: f64 = (0..3).map(|i| basis.evaluate(i, &xi)).sum();
        prop_assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);

        let gradient_sum: Vector2<f64> = (0..3).map(|i| basis.evaluate_gradient(i, &xi)).sum();
        prop_assert_matrix_eq!(gradient_sum, Vector2::zeros(), comp = abs, tol = 0.0);
    }

    #[test]
    fn segment_partition_of_unity(xi in reference_segment_point()) {
        let basis = SegmentBasis::linear();
        let sum: f64 = (0..2).map(|i| basis.evaluate(i, &xi)).sum();
        prop_assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);

        let gradient_sum: Vector1<f64> = (0..2).map(|i| basis.evaluate_gradient(i, &xi)).sum();
        prop_assert_matrix_eq!(gradient_sum, Vector1::zeros(), comp = abs, tol = 0.0);
    }

    #[test]
    fn triangle_basis_reproduces_reference_coordinates(xi in reference_triangle_point()) {
        // sum_i phi_i(xi) v_i = xi for the reference vertices v_i
        let basis = TriangleBasis::linear();
        prop_assert_scalar_eq!(basis.evaluate(1, &xi), xi.x, comp = abs, tol = 0.0);
        prop_assert_scalar_eq!(basis.evaluate(2, &xi), xi.y, comp = abs, tol = 0.0);
    }
}
