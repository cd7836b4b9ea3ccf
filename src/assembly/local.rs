//! Elementary matrices and vectors on a single triangle or boundary edge.
mod elliptic;
mod source;

pub use elliptic::*;
pub use source::*;
