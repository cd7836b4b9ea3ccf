//! Lagrange basis functions on the reference segment and the reference triangle.
use nalgebra::{Point, Point1, Point2, SVector, Vector1, Vector2};
use numeric_literals::replace_float_literals;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::Real;

/// Basis functions defined on a `D`-dimensional reference element.
pub trait ReferenceBasis<T: Real, const D: usize> {
    fn num_functions(&self) -> usize;

    /// Value of basis function `i` at reference coordinates `xi`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_functions()`.
    fn evaluate(&self, i: usize, xi: &Point<T, D>) -> T;

    /// Gradient of basis function `i` with respect to the reference coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_functions()`.
    fn evaluate_gradient(&self, i: usize, xi: &Point<T, D>) -> SVector<T, D>;

    /// Evaluates all basis functions at `xi`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `values` does not match the number of basis functions.
    fn populate_basis(&self, values: &mut [T], xi: &Point<T, D>) {
        assert_eq!(values.len(), self.num_functions(), "Output length must match number of basis functions");
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.evaluate(i, xi);
        }
    }

    /// Evaluates the reference gradients of all basis functions at `xi`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `gradients` does not match the number of basis functions.
    fn populate_gradients(&self, gradients: &mut [SVector<T, D>], xi: &Point<T, D>) {
        assert_eq!(
            gradients.len(),
            self.num_functions(),
            "Output length must match number of basis functions"
        );
        for (i, gradient) in gradients.iter_mut().enumerate() {
            *gradient = self.evaluate_gradient(i, xi);
        }
    }
}

/// The requested polynomial order is not supported.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnsupportedBasisError {
    pub order: usize,
}

impl Display for UnsupportedBasisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lagrange basis of order {} is not supported (only order 1 is available)",
            self.order
        )
    }
}

impl std::error::Error for UnsupportedBasisError {}

/// Linear Lagrange basis on the reference segment (`D = 1`) or the reference triangle (`D = 2`).
///
/// Function `i` is associated with vertex `i` of the reference element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LagrangeBasis<const D: usize>;

pub type SegmentBasis = LagrangeBasis<1>;
pub type TriangleBasis = LagrangeBasis<2>;

impl<const D: usize> LagrangeBasis<D> {
    pub fn linear() -> Self {
        Self
    }

    pub fn try_with_order(order: usize) -> Result<Self, UnsupportedBasisError> {
        if order == 1 {
            Ok(Self)
        } else {
            Err(UnsupportedBasisError { order })
        }
    }

    /// # Panics
    ///
    /// Panics if the order is not supported.
    pub fn new(order: usize) -> Self {
        match Self::try_with_order(order) {
            Ok(basis) => basis,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn order(&self) -> usize {
        1
    }
}

fn check_index(i: usize, num_functions: usize) {
    assert!(
        i < num_functions,
        "Basis function index {} out of range ({} functions)",
        i,
        num_functions
    );
}

impl<T: Real> ReferenceBasis<T, 1> for LagrangeBasis<1> {
    fn num_functions(&self) -> usize {
        2
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate(&self, i: usize, xi: &Point1<T>) -> T {
        check_index(i, 2);
        match i {
            0 => 1.0 - xi.x,
            _ => xi.x,
        }
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_gradient(&self, i: usize, _xi: &Point1<T>) -> Vector1<T> {
        check_index(i, 2);
        match i {
            0 => Vector1::new(-1.0),
            _ => Vector1::new(1.0),
        }
    }
}

impl<T: Real> ReferenceBasis<T, 2> for LagrangeBasis<2> {
    fn num_functions(&self) -> usize {
        3
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate(&self, i: usize, xi: &Point2<T>) -> T {
        check_index(i, 3);
        match i {
            0 => 1.0 - xi.x - xi.y,
            1 => xi.x,
            _ => xi.y,
        }
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_gradient(&self, i: usize, _xi: &Point2<T>) -> Vector2<T> {
        check_index(i, 3);
        match i {
            0 => Vector2::new(-1.0, -1.0),
            1 => Vector2::new(1.0, 0.0),
            _ => Vector2::new(0.0, 1.0),
        }
    }
}
