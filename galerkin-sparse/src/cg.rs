//! Preconditioned Conjugate Gradient for symmetric positive definite systems.
use core::fmt;
use log::debug;
use nalgebra::base::constraint::AreMultipliable;
use nalgebra::constraint::{DimEq, ShapeConstraint};
use nalgebra::storage::Storage;
use nalgebra::{ClosedAdd, ClosedMul, DVector, DVectorView, DVectorViewMut, Dim, Dyn, Matrix, RealField, Scalar, U1};
use nalgebra_sparse::ops::serial::spmm_csr_dense;
use nalgebra_sparse::ops::Op;
use nalgebra_sparse::CsrMatrix;
use num::{One, Zero};
use std::error::Error;

pub type OperatorError = Box<dyn Error + Send + Sync>;

/// A linear operator `x -> y = A x` acting on dense vectors.
pub trait LinearOperator<T: Scalar> {
    fn apply(&self, y: DVectorViewMut<T>, x: DVectorView<T>) -> Result<(), OperatorError>;
}

impl<'a, T, A> LinearOperator<T> for &'a A
where
    T: Scalar,
    A: ?Sized + LinearOperator<T>,
{
    fn apply(&self, y: DVectorViewMut<T>, x: DVectorView<T>) -> Result<(), OperatorError> {
        <A as LinearOperator<T>>::apply(self, y, x)
    }
}

impl<T, R, C, S> LinearOperator<T> for Matrix<T, R, C, S>
where
    T: Scalar + One + Zero + ClosedMul + ClosedAdd,
    R: Dim,
    C: Dim,
    S: Storage<T, R, C>,
    ShapeConstraint: DimEq<Dyn, R> + DimEq<C, Dyn> + AreMultipliable<R, C, Dyn, U1>,
{
    fn apply(&self, mut y: DVectorViewMut<T>, x: DVectorView<T>) -> Result<(), OperatorError> {
        y.gemv(T::one(), self, &x, T::zero());
        Ok(())
    }
}

impl<T> LinearOperator<T> for CsrMatrix<T>
where
    T: Scalar + Zero + One + ClosedMul + ClosedAdd,
{
    fn apply(&self, mut y: DVectorViewMut<T>, x: DVectorView<T>) -> Result<(), OperatorError> {
        spmm_csr_dense(T::zero(), &mut y, T::one(), Op::NoOp(self), Op::NoOp(&x));
        Ok(())
    }
}

/// The identity operator, i.e. no preconditioning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOperator;

impl<T: Scalar> LinearOperator<T> for IdentityOperator {
    fn apply(&self, mut y: DVectorViewMut<T>, x: DVectorView<T>) -> Result<(), OperatorError> {
        y.copy_from(&x);
        Ok(())
    }
}

/// Jacobi (diagonal) preconditioner `P = diag(A)^{-1}`.
///
/// Zero diagonal entries are treated as one, so that the preconditioner stays well-defined for
/// matrices with empty rows.
#[derive(Debug, Clone)]
pub struct JacobiPreconditioner<T: Scalar> {
    inverse_diagonal: DVector<T>,
}

impl<T: RealField + Copy> JacobiPreconditioner<T> {
    pub fn from_csr(matrix: &CsrMatrix<T>) -> Self {
        assert_eq!(matrix.nrows(), matrix.ncols(), "Matrix must be square");
        let inverse_diagonal = DVector::from_iterator(
            matrix.nrows(),
            (0..matrix.nrows()).map(|i| {
                let a_ii = matrix
                    .get_entry(i, i)
                    .map(|entry| entry.into_value())
                    .unwrap_or_else(T::zero);
                if a_ii == T::zero() {
                    T::one()
                } else {
                    T::one() / a_ii
                }
            }),
        );
        Self { inverse_diagonal }
    }

    pub fn inverse_diagonal(&self) -> &DVector<T> {
        &self.inverse_diagonal
    }
}

impl<T: RealField + Copy> LinearOperator<T> for JacobiPreconditioner<T> {
    fn apply(&self, mut y: DVectorViewMut<T>, x: DVectorView<T>) -> Result<(), OperatorError> {
        assert_eq!(x.len(), self.inverse_diagonal.len(), "Dimension mismatch in preconditioner");
        y.copy_from(&x);
        y.component_mul_assign(&self.inverse_diagonal);
        Ok(())
    }
}

pub trait CgStoppingCriterion<T: Scalar> {
    fn has_converged(&self, b_norm: T, iteration: usize, approx_residual: DVectorView<T>) -> bool;
}

/// Relative residual tolerance `||r|| <= tol * ||b||`.
///
/// The residual is the one updated by the CG recurrence, which may drift from the true residual
/// `b - Ax` for badly conditioned systems.
#[derive(Debug, Clone, Copy)]
pub struct RelativeResidualCriterion<T: Scalar> {
    tol: T,
}

impl<T: Scalar> RelativeResidualCriterion<T> {
    pub fn new(tol: T) -> Self {
        Self { tol }
    }

    pub fn tolerance(&self) -> &T {
        &self.tol
    }
}

impl Default for RelativeResidualCriterion<f64> {
    fn default() -> Self {
        Self::new(1e-10)
    }
}

impl Default for RelativeResidualCriterion<f32> {
    fn default() -> Self {
        Self::new(1e-5)
    }
}

impl<T: RealField> CgStoppingCriterion<T> for RelativeResidualCriterion<T> {
    fn has_converged(&self, b_norm: T, _iteration: usize, approx_residual: DVectorView<T>) -> bool {
        approx_residual.norm() <= self.tol.clone() * b_norm
    }
}

#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct CgWorkspace<T: Scalar> {
    r: DVector<T>,
    z: DVector<T>,
    p: DVector<T>,
    Ap: DVector<T>,
}

impl<T: Scalar + Zero> Default for CgWorkspace<T> {
    fn default() -> Self {
        Self {
            r: DVector::zeros(0),
            z: DVector::zeros(0),
            p: DVector::zeros(0),
            Ap: DVector::zeros(0),
        }
    }
}

impl<T: Scalar + Zero> CgWorkspace<T> {
    fn resize(&mut self, dim: usize) {
        self.r.resize_vertically_mut(dim, T::zero());
        self.z.resize_vertically_mut(dim, T::zero());
        self.p.resize_vertically_mut(dim, T::zero());
        self.Ap.resize_vertically_mut(dim, T::zero());
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum SolveErrorKind {
    OperatorError(OperatorError),
    PreconditionerError(OperatorError),
    IndefiniteOperator,
    IndefinitePreconditioner,
    MaxIterationsReached { max_iter: usize },
}

impl fmt::Display for SolveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OperatorError(err) => write!(f, "error applying operator: {}", err),
            Self::PreconditionerError(err) => write!(f, "error applying preconditioner: {}", err),
            Self::IndefiniteOperator => write!(f, "operator appears to be indefinite"),
            Self::IndefinitePreconditioner => write!(f, "preconditioner appears to be indefinite"),
            Self::MaxIterationsReached { max_iter } => {
                write!(f, "max iterations ({}) reached", max_iter)
            }
        }
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct SolveError {
    pub output: CgOutput,
    pub kind: SolveErrorKind,
}

impl SolveError {
    fn new(output: CgOutput, kind: SolveErrorKind) -> Self {
        Self { output, kind }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CG solve failed after {} iterations: {}",
            self.output.num_iterations, self.kind
        )
    }
}

impl std::error::Error for SolveError {}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgOutput {
    /// Number of updates made to the (initial) solution vector.
    pub num_iterations: usize,
}

/// Conjugate Gradient solver, configured builder-style.
///
/// ```ignore
/// let output = ConjugateGradient::new()
///     .with_operator(&a)
///     .with_preconditioner(JacobiPreconditioner::from_csr(&a))
///     .with_stopping_criterion(RelativeResidualCriterion::new(1e-10))
///     .solve_with_guess(&b, &mut x)?;
/// ```
#[derive(Debug)]
pub struct ConjugateGradient<T: Scalar, A, P, Criterion> {
    workspace: CgWorkspace<T>,
    operator: A,
    preconditioner: P,
    stopping_criterion: Criterion,
    max_iter: Option<usize>,
}

impl<T: Scalar + Zero> ConjugateGradient<T, (), IdentityOperator, ()> {
    pub fn new() -> Self {
        Self {
            workspace: CgWorkspace::default(),
            operator: (),
            preconditioner: IdentityOperator,
            stopping_criterion: (),
            max_iter: None,
        }
    }
}

impl<T: Scalar, P, Criterion> ConjugateGradient<T, (), P, Criterion> {
    pub fn with_operator<A>(self, operator: A) -> ConjugateGradient<T, A, P, Criterion> {
        ConjugateGradient {
            workspace: self.workspace,
            operator,
            preconditioner: self.preconditioner,
            stopping_criterion: self.stopping_criterion,
            max_iter: self.max_iter,
        }
    }
}

impl<T: Scalar, A, P, Criterion> ConjugateGradient<T, A, P, Criterion> {
    pub fn with_preconditioner<P2>(self, preconditioner: P2) -> ConjugateGradient<T, A, P2, Criterion> {
        ConjugateGradient {
            workspace: self.workspace,
            operator: self.operator,
            preconditioner,
            stopping_criterion: self.stopping_criterion,
            max_iter: self.max_iter,
        }
    }

    pub fn with_max_iter(self, max_iter: usize) -> Self {
        Self {
            max_iter: Some(max_iter),
            ..self
        }
    }
}

impl<T: Scalar, A, P> ConjugateGradient<T, A, P, ()> {
    pub fn with_stopping_criterion<Criterion>(self, stopping_criterion: Criterion) -> ConjugateGradient<T, A, P, Criterion> {
        ConjugateGradient {
            workspace: self.workspace,
            operator: self.operator,
            preconditioner: self.preconditioner,
            stopping_criterion,
            max_iter: self.max_iter,
        }
    }
}

impl<T, A, P, Criterion> ConjugateGradient<T, A, P, Criterion>
where
    T: RealField + Copy,
    A: LinearOperator<T>,
    P: LinearOperator<T>,
    Criterion: CgStoppingCriterion<T>,
{
    /// Solves `Ax = b`, using the contents of `x` as the initial guess.
    #[allow(non_snake_case)]
    pub fn solve_with_guess(&mut self, b: &DVector<T>, x: &mut DVector<T>) -> Result<CgOutput, SolveError> {
        use SolveErrorKind::*;
        assert_eq!(b.len(), x.len(), "Right-hand side and solution must have the same length");

        let mut output = CgOutput { num_iterations: 0 };
        self.workspace.resize(x.len());
        let CgWorkspace { r, z, p, Ap } = &mut self.workspace;

        let b_norm = b.norm();
        if b_norm == T::zero() {
            x.fill(T::zero());
            return Ok(output);
        }

        // r = b - Ax
        self.operator
            .apply((&mut *r).into(), (&*x).into())
            .map_err(|err| SolveError::new(output.clone(), OperatorError(err)))?;
        r.zip_apply(b, |Ax_i, b_i| *Ax_i = b_i - *Ax_i);

        // z = Pr
        self.preconditioner
            .apply((&mut *z).into(), (&*r).into())
            .map_err(|err| SolveError::new(output.clone(), PreconditionerError(err)))?;
        p.copy_from(z);
        let mut zTr = z.dot(r);

        loop {
            if self
                .stopping_criterion
                .has_converged(b_norm, output.num_iterations, (&*r).into())
            {
                break;
            }
            if let Some(max_iter) = self.max_iter {
                if output.num_iterations >= max_iter {
                    return Err(SolveError::new(output, MaxIterationsReached { max_iter }));
                }
            }

            // Ap = A * p
            self.operator
                .apply((&mut *Ap).into(), (&*p).into())
                .map_err(|err| SolveError::new(output.clone(), OperatorError(err)))?;
            let pAp = p.dot(Ap);

            if pAp <= T::zero() {
                return Err(SolveError::new(output, IndefiniteOperator));
            }
            if zTr <= T::zero() {
                return Err(SolveError::new(output, IndefinitePreconditioner));
            }

            let alpha = zTr / pAp;
            x.zip_apply(&*p, |x_i, p_i| *x_i += alpha * p_i);
            r.zip_apply(&*Ap, |r_i, Ap_i| *r_i -= alpha * Ap_i);
            output.num_iterations += 1;

            // z = P r
            self.preconditioner
                .apply((&mut *z).into(), (&*r).into())
                .map_err(|err| SolveError::new(output.clone(), PreconditionerError(err)))?;
            let zTr_next = z.dot(r);
            let beta = zTr_next / zTr;
            p.zip_apply(&*z, |p_i, z_i| *p_i = z_i + beta * *p_i);
            zTr = zTr_next;
        }

        debug!(
            "CG converged after {} iterations (n = {}, |b| = {})",
            output.num_iterations,
            x.len(),
            b_norm
        );
        Ok(output)
    }
}
