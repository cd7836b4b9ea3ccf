//! Sparse linear algebra used by `galerkin`.
//!
//! Currently this is a preconditioned Conjugate Gradient solver operating on
//! [`nalgebra_sparse::CsrMatrix`], which is the matrix type produced by global assembly.
pub mod cg;

pub use nalgebra_sparse::CsrMatrix;
