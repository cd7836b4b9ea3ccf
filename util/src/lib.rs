//! Test helpers shared by the crates in the workspace.
use nalgebra::storage::Storage;
use nalgebra::{ClosedAdd, DVector, Dim, Matrix, Scalar};
use num::Zero;

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x - $y;

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq, "matrices differ by {:e} (abstol {:e})", max_absdiff, $tol);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::{catch_unwind, AssertUnwindSafe};
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(AssertUnwindSafe(|| $e));
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

/// Sums of the entries of every row of a matrix.
pub fn row_sums<T, R, C, S>(matrix: &Matrix<T, R, C, S>) -> DVector<T>
where
    T: Scalar + Zero + ClosedAdd,
    R: Dim,
    C: Dim,
    S: Storage<T, R, C>,
{
    DVector::from_iterator(
        matrix.nrows(),
        matrix.row_iter().map(|row| {
            row.iter()
                .cloned()
                .fold(T::zero(), |acc, x| acc + x)
        }),
    )
}

/// Number of distinct values in a slice of indices.
pub fn count_distinct(indices: &[usize]) -> usize {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}
