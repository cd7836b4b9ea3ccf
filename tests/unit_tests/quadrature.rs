use galerkin::quadrature::{QuadratureError, QuadratureRule, ReferenceDomain};
use matrixcompare::assert_scalar_eq;
use util::assert_panics;

const TRIANGLE_ORDERS: [usize; 4] = [0, 2, 4, 6];
const SEGMENT_ORDERS: [usize; 2] = [0, 2];

fn factorial(n: u32) -> f64 {
    (1..=n).map(f64::from).product()
}

/// Integral of `x^a y^b` over the reference triangle.
fn triangle_monomial_integral(a: u32, b: u32) -> f64 {
    factorial(a) * factorial(b) / factorial(a + b + 2)
}

#[test]
fn triangle_order_0_is_centroid_rule() {
    let rule = QuadratureRule::<f64, 2>::triangle(0);
    assert_eq!(rule.num_points(), 1);
    assert_eq!(rule.weight(0), 0.5);
    assert_scalar_eq!(rule.point(0).x, 1.0 / 3.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(rule.point(0).y, 1.0 / 3.0, comp = abs, tol = 1e-14);
}

#[test]
fn triangle_order_2_rule_is_exact_in_double_precision() {
    let rule = QuadratureRule::<f64, 2>::triangle(2);
    for i in 0..rule.num_points() {
        assert_eq!(rule.weight(i), 1.0 / 6.0);
        let p = rule.point(i);
        assert!(p.x == 1.0 / 6.0 || p.x == 2.0 / 3.0);
        assert!(p.y == 1.0 / 6.0 || p.y == 2.0 / 3.0);
    }
    let sum: f64 = rule.weights().iter().sum();
    assert_eq!(sum, 0.5);
}

#[test]
fn segment_order_0_is_midpoint_rule() {
    let rule = QuadratureRule::<f64, 1>::segment(0);
    assert_eq!(rule.num_points(), 1);
    assert_eq!(rule.weight(0), 1.0);
    assert_eq!(rule.point(0).x, 0.5);
}

#[test]
fn number_of_points() {
    let expected_triangle = [1, 3, 6, 12];
    for (&order, &n) in TRIANGLE_ORDERS.iter().zip(&expected_triangle) {
        assert_eq!(QuadratureRule::<f64, 2>::triangle(order).num_points(), n);
    }
    assert_eq!(QuadratureRule::<f64, 1>::segment(0).num_points(), 1);
    assert_eq!(QuadratureRule::<f64, 1>::segment(2).num_points(), 2);
}

#[test]
fn triangle_weights_sum_to_reference_area() {
    for order in TRIANGLE_ORDERS {
        let rule = QuadratureRule::<f64, 2>::triangle(order);
        let sum: f64 = rule.weights().iter().sum();
        assert_scalar_eq!(sum, 0.5, comp = abs, tol = 1e-12);
    }
}

#[test]
fn segment_weights_sum_to_reference_length() {
    for order in SEGMENT_ORDERS {
        let rule = QuadratureRule::<f64, 1>::segment(order);
        let sum: f64 = rule.weights().iter().sum();
        assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn triangle_points_lie_in_reference_triangle() {
    for order in TRIANGLE_ORDERS {
        let rule = QuadratureRule::<f64, 2>::triangle(order);
        for p in rule.points() {
            assert!(p.x > 0.0 && p.y > 0.0 && p.x + p.y < 1.0);
        }
    }
}

#[test]
fn triangle_rules_integrate_polynomials_exactly() {
    for order in TRIANGLE_ORDERS {
        let rule = QuadratureRule::<f64, 2>::triangle(order);
        assert_eq!(rule.degree(), order);
        let degree = order as u32;
        for a in 0..=degree {
            for b in 0..=(degree - a) {
                let integral = rule.integrate(|p| p.x.powi(a as i32) * p.y.powi(b as i32));
                let expected = triangle_monomial_integral(a, b);
                assert_scalar_eq!(integral, expected, comp = abs, tol = 1e-12);
            }
        }
    }
}

#[test]
fn segment_rules_integrate_polynomials_exactly() {
    for order in SEGMENT_ORDERS {
        let rule = QuadratureRule::<f64, 1>::segment(order);
        for a in 0..=order as i32 {
            let integral = rule.integrate(|p| p.x.powi(a));
            assert_scalar_eq!(integral, 1.0 / (a as f64 + 1.0), comp = abs, tol = 1e-14);
        }
    }
}

#[test]
fn two_point_gauss_rule_is_exact_for_cubics() {
    let rule = QuadratureRule::<f64, 1>::segment(2);
    let integral = rule.integrate(|p| p.x * p.x * p.x);
    assert_scalar_eq!(integral, 0.25, comp = abs, tol = 1e-14);
}

#[test]
fn iter_yields_weights_and_points_in_order() {
    let rule = QuadratureRule::<f64, 2>::triangle(4);
    for (i, (&w, p)) in rule.iter().enumerate() {
        assert_eq!(w, rule.weight(i));
        assert_eq!(p, rule.point(i));
    }
}

#[test]
fn unavailable_orders_are_reported() {
    assert_eq!(
        QuadratureRule::<f64, 2>::try_triangle(3),
        Err(QuadratureError::NoRuleAvailable {
            order: 3,
            domain: ReferenceDomain::Triangle
        })
    );
    assert_eq!(
        QuadratureRule::<f64, 1>::try_segment(4),
        Err(QuadratureError::NoRuleAvailable {
            order: 4,
            domain: ReferenceDomain::Segment
        })
    );
    let message = QuadratureRule::<f64, 1>::try_segment(1).unwrap_err().to_string();
    assert!(message.contains("order 1"));
}

#[test]
fn unavailable_orders_panic() {
    assert_panics!(QuadratureRule::<f64, 2>::triangle(1));
    assert_panics!(QuadratureRule::<f64, 2>::triangle(8));
    assert_panics!(QuadratureRule::<f64, 1>::segment(6));
}

#[test]
fn out_of_range_indices_panic() {
    let rule = QuadratureRule::<f64, 2>::triangle(2);
    assert_panics!(rule.point(3));
    assert_panics!(rule.weight(3));
    let rule = QuadratureRule::<f64, 1>::segment(0);
    assert_panics!(rule.point(1));
    assert_panics!(rule.weight(1));
}

#[test]
fn rules_work_in_single_precision() {
    let rule = QuadratureRule::<f32, 2>::triangle(6);
    let sum: f32 = rule.weights().iter().sum();
    assert_scalar_eq!(sum, 0.5f32, comp = abs, tol = 1e-6);
}
