//! Galerkin assembly of linear (P1) finite element systems for scalar elliptic problems in 2D.
//!
//! The crate provides the building blocks (quadrature, element mappings, reference basis,
//! elementary assembly, scatter into a global sparse system and Dirichlet enforcement by
//! penalty) together with a small orchestration layer in [`problem`].
use nalgebra::RealField;

pub mod assembly;
pub mod basis;
pub mod element;
pub mod error;
pub mod field;
pub mod mesh;
pub mod problem;
pub mod quadrature;
mod util;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate galerkin_sparse;
pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

/// Scalar type used throughout the crate.
///
/// Trait alias for the traits frequently needed by generic `galerkin` routines.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
