//! Scalar fields used as coefficients, sources and boundary data.
use nalgebra::{Point2, Scalar};

/// A scalar function of position.
///
/// Implemented for closures `Fn(&Point2<T>) -> T` and for [`ConstantField`]. Routines taking a
/// field accept `?Sized` types, so trait objects satisfy the same contract.
pub trait ScalarField<T: Scalar> {
    fn evaluate(&self, x: &Point2<T>) -> T;
}

impl<T, F> ScalarField<T> for F
where
    T: Scalar,
    F: Fn(&Point2<T>) -> T,
{
    fn evaluate(&self, x: &Point2<T>) -> T {
        self(x)
    }
}

/// A field taking the same value everywhere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConstantField<T>(pub T);

impl<T: Scalar> ScalarField<T> for ConstantField<T> {
    fn evaluate(&self, _x: &Point2<T>) -> T {
        self.0.clone()
    }
}
