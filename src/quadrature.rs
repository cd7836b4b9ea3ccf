//! Quadrature rules on the reference triangle and the reference segment.
use nalgebra::{convert, Point, Point1, Point2, Scalar};
use num::Zero;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Zip;
use std::ops::{AddAssign, Mul};
use std::slice;

use crate::Real;

mod tables;

/// The reference domain a quadrature rule integrates over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceDomain {
    /// The triangle with corners `(0, 0)`, `(1, 0)`, `(0, 1)`. Its area is `1/2`.
    Triangle,
    /// The segment `[0, 1]`.
    Segment,
}

impl Display for ReferenceDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triangle => write!(f, "reference triangle"),
            Self::Segment => write!(f, "reference segment"),
        }
    }
}

/// Errors returned by quadrature constructors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuadratureError {
    /// Indicates that no rule of the requested order is available on the given domain.
    NoRuleAvailable { order: usize, domain: ReferenceDomain },
}

impl Display for QuadratureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable { order, domain } => {
                write!(f, "There is no quadrature rule of order {} available on the {}", order, domain)
            }
        }
    }
}

impl std::error::Error for QuadratureError {}

/// A quadrature rule with weights and points on a `D`-dimensional reference domain.
///
/// `D = 2` rules live on the reference triangle, `D = 1` rules on the reference segment.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule<T: Scalar, const D: usize> {
    weights: Vec<T>,
    points: Vec<Point<T, D>>,
    degree: usize,
}

pub type TriangleQuadrature<T> = QuadratureRule<T, 2>;
pub type SegmentQuadrature<T> = QuadratureRule<T, 1>;

impl<T: Real> QuadratureRule<T, 2> {
    /// Returns the rule on the reference triangle that is exact for polynomials of the given order.
    ///
    /// Available orders are 0, 2, 4 and 6, with 1, 3, 6 and 12 points respectively.
    pub fn try_triangle(order: usize) -> Result<Self, QuadratureError> {
        let table: &[[f64; 3]] = match order {
            0 => &tables::TRIANGLE_P0,
            2 => &tables::TRIANGLE_P2,
            4 => &tables::TRIANGLE_P4,
            6 => &tables::TRIANGLE_P6,
            _ => {
                return Err(QuadratureError::NoRuleAvailable {
                    order,
                    domain: ReferenceDomain::Triangle,
                })
            }
        };
        let weights = table.iter().map(|&[w, _, _]| convert(w)).collect();
        let points = table
            .iter()
            .map(|&[_, xi, eta]| Point2::new(convert(xi), convert(eta)))
            .collect();
        Ok(Self::from_parts(weights, points, order))
    }

    /// Same as [`try_triangle`](Self::try_triangle), but panics if the order is not available.
    pub fn triangle(order: usize) -> Self {
        match Self::try_triangle(order) {
            Ok(rule) => rule,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: Real> QuadratureRule<T, 1> {
    /// Returns the rule on the reference segment `[0, 1]` that is exact for polynomials of the given
    /// order.
    ///
    /// Available orders are 0 and 2, with 1 and 2 points respectively.
    pub fn try_segment(order: usize) -> Result<Self, QuadratureError> {
        let table: &[[f64; 2]] = match order {
            0 => &tables::SEGMENT_P0,
            2 => &tables::SEGMENT_P2,
            _ => {
                return Err(QuadratureError::NoRuleAvailable {
                    order,
                    domain: ReferenceDomain::Segment,
                })
            }
        };
        let weights = table.iter().map(|&[w, _]| convert(w)).collect();
        let points = table.iter().map(|&[_, xi]| Point1::new(convert(xi))).collect();
        Ok(Self::from_parts(weights, points, order))
    }

    /// Same as [`try_segment`](Self::try_segment), but panics if the order is not available.
    pub fn segment(order: usize) -> Self {
        match Self::try_segment(order) {
            Ok(rule) => rule,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: Scalar, const D: usize> QuadratureRule<T, D> {
    /// Constructs a rule from its weights and points.
    ///
    /// # Panics
    ///
    /// Panics if the number of weights and points differ.
    pub fn from_parts(weights: Vec<T>, points: Vec<Point<T, D>>, degree: usize) -> Self {
        assert_eq!(
            weights.len(),
            points.len(),
            "Number of weights and points must be the same"
        );
        Self {
            weights,
            points,
            degree,
        }
    }

    pub fn num_points(&self) -> usize {
        self.weights.len()
    }

    /// The `i`-th quadrature point.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_points()`.
    pub fn point(&self, i: usize) -> &Point<T, D> {
        assert!(
            i < self.num_points(),
            "Quadrature point index {} out of range ({} points)",
            i,
            self.num_points()
        );
        &self.points[i]
    }

    /// The `i`-th quadrature weight.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_points()`.
    pub fn weight(&self, i: usize) -> T {
        assert!(
            i < self.num_points(),
            "Quadrature weight index {} out of range ({} points)",
            i,
            self.num_points()
        );
        self.weights[i].clone()
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn points(&self) -> &[Point<T, D>] {
        &self.points
    }

    /// The polynomial order for which the rule is exact.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Iterates over `(weight, point)` pairs.
    pub fn iter(&self) -> Zip<slice::Iter<T>, slice::Iter<Point<T, D>>> {
        self.weights.iter().zip(self.points.iter())
    }

    /// Approximates the integral of the given function over the reference domain.
    pub fn integrate<U, Function>(&self, f: Function) -> U
    where
        Function: Fn(&Point<T, D>) -> U,
        U: Zero + Mul<T, Output = U> + AddAssign<U>,
    {
        let mut integral = U::zero();
        for (w, p) in self.iter() {
            integral += f(p) * w.clone();
        }
        integral
    }
}
