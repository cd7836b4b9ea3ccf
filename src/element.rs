//! Affine mappings from reference elements to physical mesh elements.
use nalgebra::{Point, Point2, SMatrix};
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::Real;

mod segment;
mod triangle;

pub use segment::*;
pub use triangle::*;

/// Maps a `D`-dimensional reference element to a physical element embedded in two dimensions.
///
/// The mapping is affine, so the Jacobian does not depend on the reference coordinates. The
/// reference coordinates are still passed in so that callers can stay agnostic of this.
pub trait ElementMapping<T: Real, const D: usize> {
    /// The physical vertices of the element, in local order.
    fn vertices(&self) -> &[Point2<T>];

    /// Maps reference coordinates `xi` to physical coordinates.
    fn map_reference_coords(&self, xi: &Point<T, D>) -> Point2<T>;

    /// The Jacobian `dx/dxi` of the reference-to-physical map.
    fn reference_jacobian(&self, xi: &Point<T, D>) -> SMatrix<T, 2, D>;

    /// The (pseudo-)determinant of the Jacobian.
    ///
    /// For elements of full dimension this is the signed determinant. For segments it is the
    /// length element `sqrt(JᵀJ)`.
    fn jacobian_determinant(&self, xi: &Point<T, D>) -> T;

    /// Same as [`jacobian_determinant`](Self::jacobian_determinant), but fails unless the
    /// determinant is strictly positive and finite.
    fn checked_jacobian_determinant(&self, xi: &Point<T, D>) -> Result<T, DegenerateElementError<T>> {
        let determinant = self.jacobian_determinant(xi);
        if determinant > T::zero() && determinant.is_finite() {
            Ok(determinant)
        } else {
            Err(DegenerateElementError { determinant })
        }
    }
}

/// The element has a non-positive (or non-finite) Jacobian determinant.
///
/// For triangles this means that the element is degenerate or clockwise oriented. For segments
/// it means the two end points coincide.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DegenerateElementError<T> {
    pub determinant: T,
}

impl<T: Display> Display for DegenerateElementError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Degenerate element: Jacobian determinant is {} (must be positive)",
            self.determinant
        )
    }
}

impl<T: fmt::Debug + Display> std::error::Error for DegenerateElementError<T> {}
