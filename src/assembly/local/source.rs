use itertools::izip;
use nalgebra::{DVector, DVectorViewMut};

use crate::basis::ReferenceBasis;
use crate::element::ElementMapping;
use crate::field::ScalarField;
use crate::quadrature::QuadratureRule;
use crate::Real;

/// Accumulates `Fe[i] += Σ_k w_k f(x(ξ_k)) φ_i(ξ_k) |J|` into `output`.
///
/// Works for triangles (`D = 2`) as well as boundary segments (`D = 1`), where `|J|` is the
/// length element.
///
/// # Errors
///
/// Returns [`DegenerateElementError`](crate::element::DegenerateElementError) if the element
/// has a non-positive Jacobian determinant. The output is left untouched in that case.
///
/// # Panics
///
/// Panics if the length of the output does not match the number of basis functions.
pub fn assemble_element_source_vector_into<T, Mapping, Basis, Source, const D: usize>(
    mut output: DVectorViewMut<T>,
    mapping: &Mapping,
    basis: &Basis,
    quadrature: &QuadratureRule<T, D>,
    source: &Source,
) -> eyre::Result<()>
where
    T: Real,
    Mapping: ElementMapping<T, D>,
    Basis: ReferenceBasis<T, D>,
    Source: ?Sized + ScalarField<T>,
{
    let n = basis.num_functions();
    assert_eq!(output.len(), n, "Output vector dimension mismatch");

    let mut contributions = DVector::zeros(n);
    let mut phi = vec![T::zero(); n];
    for (&weight, xi) in quadrature.iter() {
        let j_det = mapping.checked_jacobian_determinant(xi)?;
        basis.populate_basis(&mut phi, xi);
        let f = source.evaluate(&mapping.map_reference_coords(xi));
        let scale = weight * f * j_det;
        for (c, &phi_i) in izip!(contributions.iter_mut(), &phi) {
            *c += scale * phi_i;
        }
    }

    output += contributions;
    Ok(())
}

/// Same as [`assemble_element_source_vector_into`], but returns a newly allocated vector.
pub fn assemble_element_source_vector<T, Mapping, Basis, Source, const D: usize>(
    mapping: &Mapping,
    basis: &Basis,
    quadrature: &QuadratureRule<T, D>,
    source: &Source,
) -> eyre::Result<DVector<T>>
where
    T: Real,
    Mapping: ElementMapping<T, D>,
    Basis: ReferenceBasis<T, D>,
    Source: ?Sized + ScalarField<T>,
{
    let mut output = DVector::zeros(basis.num_functions());
    assemble_element_source_vector_into(DVectorViewMut::from(&mut output), mapping, basis, quadrature, source)?;
    Ok(output)
}

/// Computes the Neumann load vector `Fe[i] = Σ_k w_k h(x(ξ_k)) φ_i(ξ_k) |J|` of a boundary
/// segment, with `|J|` the segment length.
pub fn assemble_element_neumann_vector<T, Mapping, Basis, Flux>(
    mapping: &Mapping,
    basis: &Basis,
    quadrature: &QuadratureRule<T, 1>,
    flux: &Flux,
) -> eyre::Result<DVector<T>>
where
    T: Real,
    Mapping: ElementMapping<T, 1>,
    Basis: ReferenceBasis<T, 1>,
    Flux: ?Sized + ScalarField<T>,
{
    assemble_element_source_vector(mapping, basis, quadrature, flux)
}
