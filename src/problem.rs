//! Orchestration of a complete elliptic problem: assembly, boundary conditions and solve.
use eyre::{eyre, WrapErr};
use galerkin_sparse::cg::{ConjugateGradient, JacobiPreconditioner, RelativeResidualCriterion};
use log::{debug, info};
use nalgebra::{convert, DVector};
use nalgebra_sparse::convert::serial::convert_csr_dense;
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

use crate::assembly::global::{
    apply_dirichlet_penalty, assemble_neumann_vector_into, assemble_source_vector_into,
    assemble_stiffness_matrix_into, par_assemble_stiffness_matrix_into, sample_vertex_values, GlobalSystem,
    PenaltyStrategy,
};
use crate::field::{ConstantField, ScalarField};
use crate::mesh::procedural::BOUNDARY_ATTRIBUTE;
use crate::mesh::TriangleMesh2d;
use crate::quadrature::QuadratureRule;
use crate::Real;

/// Settings controlling the assembly of an [`EllipticProblem`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemSettings {
    /// Order of the triangle rule used for the stiffness matrix.
    pub stiffness_quadrature_order: usize,
    /// Order of the triangle rule used for the source term.
    pub source_quadrature_order: usize,
    /// Order of the segment rule used for Neumann terms.
    pub neumann_quadrature_order: usize,
    pub penalty: PenaltyStrategy,
    /// Compute element stiffness matrices in parallel.
    pub parallel: bool,
}

impl Default for ProblemSettings {
    fn default() -> Self {
        Self {
            stiffness_quadrature_order: 2,
            source_quadrature_order: 2,
            neumann_quadrature_order: 2,
            penalty: PenaltyStrategy::default(),
            parallel: false,
        }
    }
}

impl ProblemSettings {
    pub fn with_stiffness_quadrature_order(self, order: usize) -> Self {
        Self {
            stiffness_quadrature_order: order,
            ..self
        }
    }

    pub fn with_source_quadrature_order(self, order: usize) -> Self {
        Self {
            source_quadrature_order: order,
            ..self
        }
    }

    pub fn with_neumann_quadrature_order(self, order: usize) -> Self {
        Self {
            neumann_quadrature_order: order,
            ..self
        }
    }

    pub fn with_penalty(self, penalty: PenaltyStrategy) -> Self {
        Self { penalty, ..self }
    }

    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }
}

/// Boundary condition flags, indexed by edge attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundaryAttributes {
    /// `dirichlet[a]` is true if edges with attribute `a` carry a Dirichlet condition.
    pub dirichlet: Vec<bool>,
    /// `neumann[a]` is true if edges with attribute `a` carry a Neumann condition.
    pub neumann: Vec<bool>,
}

impl BoundaryAttributes {
    /// Dirichlet conditions on all edges with the given attribute, and no Neumann conditions.
    pub fn all_dirichlet(attribute: usize) -> Self {
        let mut dirichlet = vec![false; attribute + 1];
        dirichlet[attribute] = true;
        Self {
            dirichlet,
            neumann: vec![false; attribute + 1],
        }
    }

    /// Checks that every edge attribute of the mesh has an entry in both flag lists.
    fn validate<T: Real>(&self, mesh: &TriangleMesh2d<T>) -> eyre::Result<()> {
        if let Some(max_attribute) = mesh.edge_attributes().iter().copied().max() {
            if max_attribute >= self.dirichlet.len() || max_attribute >= self.neumann.len() {
                return Err(eyre!(
                    "Edge attribute {} has no boundary flag (dirichlet flags: {}, neumann flags: {})",
                    max_attribute,
                    self.dirichlet.len(),
                    self.neumann.len()
                ));
            }
        }
        Ok(())
    }
}

/// Solves a sparse linear system `K u = F`.
pub trait LinearSolver<T: Real> {
    fn solve(&self, matrix: &CsrMatrix<T>, rhs: &DVector<T>) -> eyre::Result<DVector<T>>;
}

/// Jacobi-preconditioned Conjugate Gradient.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConjugateGradientSolver {
    /// Relative residual tolerance.
    pub tolerance: f64,
    /// Maximum number of iterations. Ten times the number of unknowns if not set.
    pub max_iterations: Option<usize>,
}

impl Default for ConjugateGradientSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: None,
        }
    }
}

impl ConjugateGradientSolver {
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            ..self
        }
    }
}

impl<T: Real> LinearSolver<T> for ConjugateGradientSolver {
    fn solve(&self, matrix: &CsrMatrix<T>, rhs: &DVector<T>) -> eyre::Result<DVector<T>> {
        let n = rhs.len();
        let mut x = DVector::zeros(n);
        let output = ConjugateGradient::new()
            .with_operator(matrix)
            .with_preconditioner(JacobiPreconditioner::from_csr(matrix))
            .with_stopping_criterion(RelativeResidualCriterion::new(convert::<f64, T>(self.tolerance)))
            .with_max_iter(self.max_iterations.unwrap_or(10 * n))
            .solve_with_guess(rhs, &mut x)
            .wrap_err("Conjugate gradient solve failed")?;
        debug!("CG solve finished after {} iterations", output.num_iterations);
        Ok(x)
    }
}

/// Dense Cholesky factorization. Only suitable for small systems.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DenseCholeskySolver;

impl<T: Real> LinearSolver<T> for DenseCholeskySolver {
    fn solve(&self, matrix: &CsrMatrix<T>, rhs: &DVector<T>) -> eyre::Result<DVector<T>> {
        let cholesky = convert_csr_dense(matrix)
            .cholesky()
            .ok_or_else(|| eyre!("Cholesky factorization failed (matrix is not positive definite)"))?;
        Ok(cholesky.solve(rhs))
    }
}

type BoxedField<'a, T> = Box<dyn ScalarField<T> + Send + Sync + 'a>;

/// The problem `-div(k grad u) = f` in the mesh domain, with `u = g` on Dirichlet edges
/// (penalty method) and `k du/dn = h` on Neumann edges.
///
/// Fields default to `k = 1` and `f = g = h = 0`. Boundary flags default to
/// [`BoundaryAttributes::all_dirichlet`] on [`BOUNDARY_ATTRIBUTE`], matching the tagging of the
/// procedural meshes.
pub struct EllipticProblem<'a, T: Real> {
    mesh: &'a TriangleMesh2d<T>,
    diffusion: BoxedField<'a, T>,
    source: BoxedField<'a, T>,
    dirichlet: BoxedField<'a, T>,
    neumann: BoxedField<'a, T>,
    boundary: BoundaryAttributes,
    settings: ProblemSettings,
}

impl<'a, T: Real> EllipticProblem<'a, T> {
    pub fn new(mesh: &'a TriangleMesh2d<T>) -> Self {
        Self {
            mesh,
            diffusion: Box::new(ConstantField(T::one())),
            source: Box::new(ConstantField(T::zero())),
            dirichlet: Box::new(ConstantField(T::zero())),
            neumann: Box::new(ConstantField(T::zero())),
            boundary: BoundaryAttributes::all_dirichlet(BOUNDARY_ATTRIBUTE),
            settings: ProblemSettings::default(),
        }
    }

    pub fn with_diffusion(self, diffusion: impl ScalarField<T> + Send + Sync + 'a) -> Self {
        Self {
            diffusion: Box::new(diffusion),
            ..self
        }
    }

    pub fn with_source(self, source: impl ScalarField<T> + Send + Sync + 'a) -> Self {
        Self {
            source: Box::new(source),
            ..self
        }
    }

    pub fn with_dirichlet(self, dirichlet: impl ScalarField<T> + Send + Sync + 'a) -> Self {
        Self {
            dirichlet: Box::new(dirichlet),
            ..self
        }
    }

    pub fn with_neumann(self, neumann: impl ScalarField<T> + Send + Sync + 'a) -> Self {
        Self {
            neumann: Box::new(neumann),
            ..self
        }
    }

    pub fn with_boundary(self, boundary: BoundaryAttributes) -> Self {
        Self { boundary, ..self }
    }

    pub fn with_settings(self, settings: ProblemSettings) -> Self {
        Self { settings, ..self }
    }

    pub fn mesh(&self) -> &TriangleMesh2d<T> {
        self.mesh
    }

    pub fn settings(&self) -> &ProblemSettings {
        &self.settings
    }

    /// Assembles the penalized global system.
    ///
    /// Stiffness and source terms are assembled over all triangles, Neumann terms over all
    /// Neumann edges, and finally the Dirichlet penalty is applied with the Dirichlet data
    /// sampled at every vertex.
    pub fn assemble(&self) -> eyre::Result<GlobalSystem<T>> {
        let mesh = self.mesh;
        let settings = &self.settings;
        self.boundary.validate(mesh)?;

        let stiffness_quadrature = QuadratureRule::try_triangle(settings.stiffness_quadrature_order)
            .wrap_err("Invalid stiffness quadrature order")?;
        let source_quadrature = QuadratureRule::try_triangle(settings.source_quadrature_order)
            .wrap_err("Invalid source quadrature order")?;
        let neumann_quadrature = QuadratureRule::try_segment(settings.neumann_quadrature_order)
            .wrap_err("Invalid Neumann quadrature order")?;

        let mut system = GlobalSystem::zeros_for_mesh(mesh);
        let GlobalSystem { matrix, rhs } = &mut system;

        if settings.parallel {
            par_assemble_stiffness_matrix_into(matrix, mesh, &stiffness_quadrature, &*self.diffusion)?;
        } else {
            assemble_stiffness_matrix_into(matrix, mesh, &stiffness_quadrature, &*self.diffusion)?;
        }
        assemble_source_vector_into(rhs, mesh, &source_quadrature, &*self.source)?;
        assemble_neumann_vector_into(rhs, mesh, &self.boundary.neumann, &neumann_quadrature, &*self.neumann)?;

        let penalty = settings.penalty.resolve(matrix);
        let prescribed_values = sample_vertex_values(mesh, &*self.dirichlet);
        apply_dirichlet_penalty(mesh, &self.boundary.dirichlet, &prescribed_values, penalty, matrix, rhs);

        info!(
            "Assembled elliptic problem: {} vertices, {} triangles, {} boundary edges, {} stored entries",
            mesh.num_vertices(),
            mesh.num_triangles(),
            mesh.num_edges(),
            matrix.nnz()
        );
        Ok(system)
    }

    /// Assembles the system and solves it with the given solver.
    pub fn solve_with(&self, solver: &impl LinearSolver<T>) -> eyre::Result<DVector<T>> {
        let system = self.assemble()?;
        solver.solve(&system.matrix, &system.rhs)
    }

    /// Assembles the system and solves it with the default [`ConjugateGradientSolver`].
    pub fn solve(&self) -> eyre::Result<DVector<T>> {
        self.solve_with(&ConjugateGradientSolver::default())
    }
}

/// Solves `-div(k grad u) = f` with Dirichlet and Neumann data, using default settings and
/// the Conjugate Gradient solver.
///
/// Returns the solution at the mesh vertices.
pub fn solve_elliptic_problem<'a>(
    mesh: &'a TriangleMesh2d<f64>,
    diffusion: impl ScalarField<f64> + Send + Sync + 'a,
    source: impl ScalarField<f64> + Send + Sync + 'a,
    dirichlet: impl ScalarField<f64> + Send + Sync + 'a,
    neumann: impl ScalarField<f64> + Send + Sync + 'a,
    boundary: BoundaryAttributes,
) -> eyre::Result<DVector<f64>> {
    EllipticProblem::new(mesh)
        .with_diffusion(diffusion)
        .with_source(source)
        .with_dirichlet(dirichlet)
        .with_neumann(neumann)
        .with_boundary(boundary)
        .solve()
}
