//! Functionality for error estimation.
use eyre::eyre;
use nalgebra::{DVector, Point2, Vector2};

use crate::basis::{LagrangeBasis, ReferenceBasis};
use crate::element::{ElementMapping, TriangleMapping};
use crate::field::ScalarField;
use crate::mesh::TriangleMesh2d;
use crate::quadrature::QuadratureRule;
use crate::Real;

/// Estimate the squared $L^2$ error $\norm{u_h - u}^2_{L^2}$ on a single triangle, given the
/// values of $u_h$ at the three vertices.
#[allow(non_snake_case)]
pub fn estimate_element_L2_error_squared<T, U>(
    mapping: &TriangleMapping<T>,
    u: &U,
    u_h_element: &[T; 3],
    quadrature: &QuadratureRule<T, 2>,
) -> eyre::Result<T>
where
    T: Real,
    U: ?Sized + ScalarField<T>,
{
    let basis = LagrangeBasis::<2>::linear();
    let mut phi = [T::zero(); 3];
    let mut result = T::zero();
    for (&w, xi) in quadrature.iter() {
        let j_det = mapping.checked_jacobian_determinant(xi)?;
        basis.populate_basis(&mut phi, xi);
        let u_h = phi
            .iter()
            .zip(u_h_element)
            .fold(T::zero(), |sum, (&phi_i, &u_i)| sum + phi_i * u_i);
        let error = u_h - u.evaluate(&mapping.map_reference_coords(xi));
        result += w * error * error * j_det;
    }
    Ok(result)
}

/// Estimate the squared $H^1$ *seminorm* error $\seminorm{u_h - u}^2_{H^1}$ on a single triangle.
///
/// `u_grad` is the gradient of the exact solution.
#[allow(non_snake_case)]
pub fn estimate_element_H1_seminorm_error_squared<T, G>(
    mapping: &TriangleMapping<T>,
    u_grad: &G,
    u_h_element: &[T; 3],
    quadrature: &QuadratureRule<T, 2>,
) -> eyre::Result<T>
where
    T: Real,
    G: ?Sized + Fn(&Point2<T>) -> Vector2<T>,
{
    let basis = LagrangeBasis::<2>::linear();
    let j_inv_t = mapping
        .inverse_transpose_jacobian()
        .ok_or_else(|| eyre!("Singular element Jacobian encountered"))?;

    let mut result = T::zero();
    for (&w, xi) in quadrature.iter() {
        let j_det = mapping.checked_jacobian_determinant(xi)?;
        let u_h_grad = (0..3).fold(Vector2::zeros(), |sum, i| {
            sum + j_inv_t * basis.evaluate_gradient(i, xi) * u_h_element[i]
        });
        let error = u_h_grad - u_grad(&mapping.map_reference_coords(xi));
        result += w * error.norm_squared() * j_det;
    }
    Ok(result)
}

fn element_values<T: Real>(mesh: &TriangleMesh2d<T>, u_h: &DVector<T>, triangle_index: usize) -> [T; 3] {
    mesh.triangle_vertices(triangle_index).map(|v| u_h[v])
}

fn assert_one_value_per_vertex<T: Real>(mesh: &TriangleMesh2d<T>, u_h: &DVector<T>) {
    assert_eq!(
        u_h.len(),
        mesh.num_vertices(),
        "Discrete solution must have one value per vertex"
    );
}

/// Estimate the squared $L^2$ error $\norm{u_h - u}^2_{L^2}$ over the whole mesh, with $u_h$ the
/// piecewise linear interpolant of the vertex values.
#[allow(non_snake_case)]
pub fn estimate_L2_error_squared<T, U>(
    mesh: &TriangleMesh2d<T>,
    u: &U,
    u_h: &DVector<T>,
    quadrature: &QuadratureRule<T, 2>,
) -> eyre::Result<T>
where
    T: Real,
    U: ?Sized + ScalarField<T>,
{
    assert_one_value_per_vertex(mesh, u_h);
    let mut result = T::zero();
    for t in 0..mesh.num_triangles() {
        let mapping = TriangleMapping::from_mesh(mesh, t);
        result += estimate_element_L2_error_squared(&mapping, u, &element_values(mesh, u_h, t), quadrature)?;
    }
    Ok(result)
}

#[allow(non_snake_case)]
pub fn estimate_L2_error<T, U>(
    mesh: &TriangleMesh2d<T>,
    u: &U,
    u_h: &DVector<T>,
    quadrature: &QuadratureRule<T, 2>,
) -> eyre::Result<T>
where
    T: Real,
    U: ?Sized + ScalarField<T>,
{
    Ok(estimate_L2_error_squared(mesh, u, u_h, quadrature)?.sqrt())
}

#[allow(non_snake_case)]
pub fn estimate_H1_seminorm_error_squared<T, G>(
    mesh: &TriangleMesh2d<T>,
    u_grad: &G,
    u_h: &DVector<T>,
    quadrature: &QuadratureRule<T, 2>,
) -> eyre::Result<T>
where
    T: Real,
    G: ?Sized + Fn(&Point2<T>) -> Vector2<T>,
{
    assert_one_value_per_vertex(mesh, u_h);
    let mut result = T::zero();
    for t in 0..mesh.num_triangles() {
        let mapping = TriangleMapping::from_mesh(mesh, t);
        result +=
            estimate_element_H1_seminorm_error_squared(&mapping, u_grad, &element_values(mesh, u_h, t), quadrature)?;
    }
    Ok(result)
}

#[allow(non_snake_case)]
pub fn estimate_H1_seminorm_error<T, G>(
    mesh: &TriangleMesh2d<T>,
    u_grad: &G,
    u_h: &DVector<T>,
    quadrature: &QuadratureRule<T, 2>,
) -> eyre::Result<T>
where
    T: Real,
    G: ?Sized + Fn(&Point2<T>) -> Vector2<T>,
{
    Ok(estimate_H1_seminorm_error_squared(mesh, u_grad, u_h, quadrature)?.sqrt())
}
