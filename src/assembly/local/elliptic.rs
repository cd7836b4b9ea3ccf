use eyre::eyre;
use nalgebra::{DMatrix, DMatrixViewMut, SVector};

use crate::basis::ReferenceBasis;
use crate::element::ElementMapping;
use crate::field::ScalarField;
use crate::quadrature::QuadratureRule;
use crate::util::clone_upper_to_lower;
use crate::Real;

/// Computes the elementary stiffness matrix
/// `Ke[i][j] = Σ_k w_k k(x(ξ_k)) (J⁻ᵀ∇φ_i)·(J⁻ᵀ∇φ_j) |J|` for a triangle.
///
/// The output is overwritten. Only its upper triangle is computed and then mirrored, so the
/// result is exactly symmetric.
///
/// # Errors
///
/// Returns [`DegenerateElementError`](crate::element::DegenerateElementError) if the element
/// has a non-positive Jacobian determinant. The output is then left zero-filled.
///
/// # Panics
///
/// Panics if the output is not `n × n`, with `n` the number of basis functions.
#[allow(non_snake_case)]
pub fn assemble_element_stiffness_matrix_into<T, Mapping, Basis, Coefficient>(
    mut output: DMatrixViewMut<T>,
    mapping: &Mapping,
    basis: &Basis,
    quadrature: &QuadratureRule<T, 2>,
    coefficient: &Coefficient,
) -> eyre::Result<()>
where
    T: Real,
    Mapping: ElementMapping<T, 2>,
    Basis: ReferenceBasis<T, 2>,
    Coefficient: ?Sized + ScalarField<T>,
{
    let n = basis.num_functions();
    assert_eq!(output.nrows(), n, "Output matrix dimension mismatch");
    assert_eq!(output.ncols(), n, "Output matrix dimension mismatch");

    output.fill(T::zero());
    let mut phi_grad = vec![SVector::<T, 2>::zeros(); n];

    for (&weight, xi) in quadrature.iter() {
        let j_det = mapping.checked_jacobian_determinant(xi)?;
        let j_inv_t = mapping
            .reference_jacobian(xi)
            .try_inverse()
            .ok_or_else(|| eyre!("Singular element Jacobian encountered"))?
            .transpose();

        // Gradients with respect to physical coordinates
        basis.populate_gradients(&mut phi_grad, xi);
        for grad in &mut phi_grad {
            *grad = j_inv_t * *grad;
        }

        let x = mapping.map_reference_coords(xi);
        let scale = weight * coefficient.evaluate(&x) * j_det;
        for I in 0..n {
            for J in I..n {
                output[(I, J)] += scale * phi_grad[I].dot(&phi_grad[J]);
            }
        }
    }

    clone_upper_to_lower(&mut output);
    Ok(())
}

/// Same as [`assemble_element_stiffness_matrix_into`], but returns a newly allocated matrix.
pub fn assemble_element_stiffness_matrix<T, Mapping, Basis, Coefficient>(
    mapping: &Mapping,
    basis: &Basis,
    quadrature: &QuadratureRule<T, 2>,
    coefficient: &Coefficient,
) -> eyre::Result<DMatrix<T>>
where
    T: Real,
    Mapping: ElementMapping<T, 2>,
    Basis: ReferenceBasis<T, 2>,
    Coefficient: ?Sized + ScalarField<T>,
{
    let n = basis.num_functions();
    let mut output = DMatrix::zeros(n, n);
    assemble_element_stiffness_matrix_into(
        DMatrixViewMut::from(&mut output),
        mapping,
        basis,
        quadrature,
        coefficient,
    )?;
    Ok(output)
}
