//! Scatter of elementary contributions into the global system, global assembly loops and
//! Dirichlet enforcement by penalty.
use eyre::WrapErr;
use log::{debug, trace, warn};
use nalgebra::{convert, DMatrix, DVector, Scalar};
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::{CsrMatrix, SparseEntryMut};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assembly::local::{
    assemble_element_neumann_vector, assemble_element_source_vector, assemble_element_stiffness_matrix,
};
use crate::basis::LagrangeBasis;
use crate::element::{SegmentMapping, TriangleMapping};
use crate::field::ScalarField;
use crate::mesh::TriangleMesh2d;
use crate::quadrature::QuadratureRule;
use crate::Real;

/// Selects how the local vertex indices of an elementary vector are mapped to global indices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// The element index refers to a triangle, with three local vertices.
    Triangle,
    /// The element index refers to a boundary edge, with two local vertices.
    BoundaryEdge,
}

/// A global linear system `K u = F` with one unknown per mesh vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSystem<T: Scalar> {
    pub matrix: CsrMatrix<T>,
    pub rhs: DVector<T>,
}

impl<T: Real> GlobalSystem<T> {
    /// A zero system whose matrix has the sparsity pattern given by [`csr_pattern_for_mesh`].
    pub fn zeros_for_mesh(mesh: &TriangleMesh2d<T>) -> Self {
        Self {
            matrix: zero_csr_matrix_for_mesh(mesh),
            rhs: DVector::zeros(mesh.num_vertices()),
        }
    }

    pub fn num_unknowns(&self) -> usize {
        self.rhs.len()
    }
}

/// The sparsity pattern of a P1 system on the mesh.
///
/// Entry `(i, j)` is present if vertices `i` and `j` share a triangle. The full diagonal is always
/// present, also for vertices that belong to no triangle, so that penalty terms can be added to any
/// vertex.
pub fn csr_pattern_for_mesh<T: Scalar>(mesh: &TriangleMesh2d<T>) -> SparsityPattern {
    let n = mesh.num_vertices();
    let mut row_columns: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    for triangle in mesh.triangles() {
        for &row in triangle {
            row_columns[row].extend_from_slice(triangle);
        }
    }

    let mut offsets = Vec::with_capacity(n + 1);
    let mut column_indices = Vec::new();
    offsets.push(0);
    for mut columns in row_columns {
        columns.sort_unstable();
        columns.dedup();
        column_indices.extend(columns);
        offsets.push(column_indices.len());
    }

    SparsityPattern::try_from_offsets_and_indices(n, n, offsets, column_indices)
        .expect("Sorted, deduplicated and in-bounds indices always form a valid pattern")
}

fn zero_csr_matrix_for_mesh<T: Real>(mesh: &TriangleMesh2d<T>) -> CsrMatrix<T> {
    let pattern = csr_pattern_for_mesh(mesh);
    let values = vec![T::zero(); pattern.nnz()];
    CsrMatrix::try_from_pattern_and_values(pattern, values)
        .expect("Number of values matches number of explicitly stored entries")
}

fn add_to_entry<T: Real>(matrix: &mut CsrMatrix<T>, row: usize, col: usize, value: T) {
    match matrix.get_entry_mut(row, col) {
        Some(SparseEntryMut::NonZero(entry)) => *entry += value,
        _ => panic!("Entry ({}, {}) is not in the sparsity pattern of the global matrix", row, col),
    }
}

fn assert_global_matrix_dims<T: Scalar>(matrix: &CsrMatrix<T>, num_vertices: usize) {
    assert!(
        matrix.nrows() == num_vertices && matrix.ncols() == num_vertices,
        "Global matrix must be {n} x {n} (number of vertices), but is {} x {}",
        matrix.nrows(),
        matrix.ncols(),
        n = num_vertices
    );
}

/// Adds the elementary matrix of a triangle to the global matrix, `K[g(r), g(c)] += Ke[r][c]`,
/// with `g` the local-to-global vertex map of the triangle.
///
/// # Panics
///
/// Panics if `element_matrix` is not 3 × 3, if the global matrix is not square with one row per
/// vertex, or if an entry is missing from its sparsity pattern.
pub fn scatter_element_matrix<T: Real>(
    mesh: &TriangleMesh2d<T>,
    triangle_index: usize,
    element_matrix: &DMatrix<T>,
    global_matrix: &mut CsrMatrix<T>,
) {
    assert_eq!(element_matrix.shape(), (3, 3), "Element matrix must be 3 x 3");
    assert_global_matrix_dims(global_matrix, mesh.num_vertices());

    let global_indices = mesh.triangle_vertices(triangle_index);
    for (r, &row) in global_indices.iter().enumerate() {
        for (c, &col) in global_indices.iter().enumerate() {
            add_to_entry(global_matrix, row, col, element_matrix[(r, c)]);
        }
    }
}

/// Adds an elementary vector to the global vector, `F[g(r)] += Fe[r]`.
///
/// # Panics
///
/// Panics if the length of `element_vector` differs from the number of vertices of the element,
/// or if the global vector does not have one entry per mesh vertex.
pub fn scatter_element_vector<T: Real>(
    mesh: &TriangleMesh2d<T>,
    kind: ElementKind,
    element_index: usize,
    element_vector: &DVector<T>,
    global_vector: &mut DVector<T>,
) {
    assert_eq!(
        global_vector.len(),
        mesh.num_vertices(),
        "Global vector must have one entry per vertex"
    );
    let mut scatter = |global_indices: &[usize]| {
        assert_eq!(
            element_vector.len(),
            global_indices.len(),
            "Element vector length must match the number of element vertices"
        );
        for (&v, &value) in global_indices.iter().zip(element_vector.iter()) {
            global_vector[v] += value;
        }
    };
    match kind {
        ElementKind::Triangle => scatter(&mesh.triangle_vertices(element_index)),
        ElementKind::BoundaryEdge => scatter(&mesh.edge_vertices(element_index)),
    }
}

/// Assembles the stiffness matrices of all triangles into the global matrix.
pub fn assemble_stiffness_matrix_into<T, Coefficient>(
    global_matrix: &mut CsrMatrix<T>,
    mesh: &TriangleMesh2d<T>,
    quadrature: &QuadratureRule<T, 2>,
    coefficient: &Coefficient,
) -> eyre::Result<()>
where
    T: Real,
    Coefficient: ?Sized + ScalarField<T>,
{
    let basis = LagrangeBasis::<2>::linear();
    for t in 0..mesh.num_triangles() {
        let mapping = TriangleMapping::from_mesh(mesh, t);
        let element_matrix = assemble_element_stiffness_matrix(&mapping, &basis, quadrature, coefficient)
            .wrap_err_with(|| format!("Failed to assemble stiffness matrix of triangle {}", t))?;
        trace!("Stiffness matrix of triangle {}: {}", t, element_matrix);
        scatter_element_matrix(mesh, t, &element_matrix, global_matrix);
    }
    debug!("Assembled stiffness matrix from {} triangles", mesh.num_triangles());
    Ok(())
}

/// Parallel version of [`assemble_stiffness_matrix_into`].
///
/// Elementary matrices are computed in parallel and scattered serially in triangle order, so the
/// result does not depend on thread scheduling.
pub fn par_assemble_stiffness_matrix_into<T, Coefficient>(
    global_matrix: &mut CsrMatrix<T>,
    mesh: &TriangleMesh2d<T>,
    quadrature: &QuadratureRule<T, 2>,
    coefficient: &Coefficient,
) -> eyre::Result<()>
where
    T: Real,
    Coefficient: ?Sized + ScalarField<T> + Sync,
{
    let basis = LagrangeBasis::<2>::linear();
    let element_matrices = (0..mesh.num_triangles())
        .into_par_iter()
        .map(|t| {
            let mapping = TriangleMapping::from_mesh(mesh, t);
            assemble_element_stiffness_matrix(&mapping, &basis, quadrature, coefficient)
                .wrap_err_with(|| format!("Failed to assemble stiffness matrix of triangle {}", t))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    for (t, element_matrix) in element_matrices.iter().enumerate() {
        scatter_element_matrix(mesh, t, element_matrix, global_matrix);
    }
    debug!(
        "Assembled stiffness matrix from {} triangles (parallel)",
        mesh.num_triangles()
    );
    Ok(())
}

/// Assembles the source load vectors of all triangles into the global vector.
pub fn assemble_source_vector_into<T, Source>(
    global_vector: &mut DVector<T>,
    mesh: &TriangleMesh2d<T>,
    quadrature: &QuadratureRule<T, 2>,
    source: &Source,
) -> eyre::Result<()>
where
    T: Real,
    Source: ?Sized + ScalarField<T>,
{
    let basis = LagrangeBasis::<2>::linear();
    for t in 0..mesh.num_triangles() {
        let mapping = TriangleMapping::from_mesh(mesh, t);
        let element_vector = assemble_element_source_vector(&mapping, &basis, quadrature, source)
            .wrap_err_with(|| format!("Failed to assemble source vector of triangle {}", t))?;
        scatter_element_vector(mesh, ElementKind::Triangle, t, &element_vector, global_vector);
    }
    debug!("Assembled source vector from {} triangles", mesh.num_triangles());
    Ok(())
}

/// Assembles the Neumann load vectors of all boundary edges whose attribute is flagged in
/// `attribute_is_neumann` into the global vector.
///
/// Returns the number of edges that contributed.
///
/// # Panics
///
/// Panics if an edge attribute is not a valid index into `attribute_is_neumann`.
pub fn assemble_neumann_vector_into<T, Flux>(
    global_vector: &mut DVector<T>,
    mesh: &TriangleMesh2d<T>,
    attribute_is_neumann: &[bool],
    quadrature: &QuadratureRule<T, 1>,
    flux: &Flux,
) -> eyre::Result<usize>
where
    T: Real,
    Flux: ?Sized + ScalarField<T>,
{
    let basis = LagrangeBasis::<1>::linear();
    let mut num_edges = 0;
    for e in 0..mesh.num_edges() {
        if !attribute_flag(attribute_is_neumann, mesh.edge_attribute(e), e) {
            continue;
        }
        let mapping = SegmentMapping::from_mesh(mesh, e);
        let element_vector = assemble_element_neumann_vector(&mapping, &basis, quadrature, flux)
            .wrap_err_with(|| format!("Failed to assemble Neumann vector of boundary edge {}", e))?;
        scatter_element_vector(mesh, ElementKind::BoundaryEdge, e, &element_vector, global_vector);
        num_edges += 1;
    }
    debug!("Assembled Neumann contributions from {} boundary edges", num_edges);
    Ok(num_edges)
}

fn attribute_flag(flags: &[bool], attribute: usize, edge_index: usize) -> bool {
    assert!(
        attribute < flags.len(),
        "Attribute {} of edge {} has no entry in the boundary flags (length {})",
        attribute,
        edge_index,
        flags.len()
    );
    flags[attribute]
}

/// Enforces Dirichlet conditions by the penalty method.
///
/// For every boundary edge whose attribute is flagged in `attribute_is_dirichlet`, each of its
/// vertices `v` that has not been processed yet gets `K[v][v] += penalty` and
/// `F[v] += penalty * prescribed_values[v]`. Returns the processed vertices in processing order.
///
/// # Panics
///
/// Panics if `prescribed_values` or the system does not have one entry per vertex, or if an edge
/// attribute is not a valid index into `attribute_is_dirichlet`.
pub fn apply_dirichlet_penalty<T: Real>(
    mesh: &TriangleMesh2d<T>,
    attribute_is_dirichlet: &[bool],
    prescribed_values: &DVector<T>,
    penalty: T,
    global_matrix: &mut CsrMatrix<T>,
    global_vector: &mut DVector<T>,
) -> Vec<usize> {
    let n = mesh.num_vertices();
    assert_eq!(prescribed_values.len(), n, "Prescribed values must have one entry per vertex");
    assert_eq!(global_vector.len(), n, "Global vector must have one entry per vertex");
    assert_global_matrix_dims(global_matrix, n);

    let mut processed = vec![false; n];
    let mut processed_vertices = Vec::new();
    for e in 0..mesh.num_edges() {
        if !attribute_flag(attribute_is_dirichlet, mesh.edge_attribute(e), e) {
            continue;
        }
        for v in mesh.edge_vertices(e) {
            if !processed[v] {
                add_to_entry(global_matrix, v, v, penalty);
                global_vector[v] += penalty * prescribed_values[v];
                processed[v] = true;
                processed_vertices.push(v);
            }
        }
    }

    if processed_vertices.is_empty() {
        warn!("No Dirichlet vertices found, the system may be singular");
    }
    debug!(
        "Applied Dirichlet penalty {} to {} vertices",
        penalty,
        processed_vertices.len()
    );
    processed_vertices
}

/// Determines the penalty constant used for Dirichlet enforcement.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PenaltyStrategy {
    /// A fixed penalty value.
    Fixed(f64),
    /// `factor * max_i |K_ii|`, or `factor` if the diagonal is zero.
    RelativeToDiagonal { factor: f64 },
}

impl Default for PenaltyStrategy {
    fn default() -> Self {
        Self::Fixed(1e4)
    }
}

impl PenaltyStrategy {
    /// The penalty to use for the given (assembled, not yet penalized) matrix.
    pub fn resolve<T: Real>(&self, matrix: &CsrMatrix<T>) -> T {
        match *self {
            Self::Fixed(penalty) => convert(penalty),
            Self::RelativeToDiagonal { factor } => {
                let factor: T = convert(factor);
                let max_diag = matrix
                    .diagonal_as_csr()
                    .values()
                    .iter()
                    .fold(T::zero(), |max, &x| max.max(x.abs()));
                if max_diag > T::zero() {
                    factor * max_diag
                } else {
                    factor
                }
            }
        }
    }
}

/// Evaluates a field at every mesh vertex.
pub fn sample_vertex_values<T, Field>(mesh: &TriangleMesh2d<T>, field: &Field) -> DVector<T>
where
    T: Real,
    Field: ?Sized + ScalarField<T>,
{
    DVector::from_iterator(mesh.num_vertices(), mesh.vertices().iter().map(|x| field.evaluate(x)))
}
