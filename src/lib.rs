pub mod convergence;
pub mod stencil;
pub mod utilities;

/// Real type used for every coefficient, sample and accumulated result.
pub type Scalar = f64;

pub use crate::stencil::{Axis, DerivativeKind, StaggerType, StencilDescriptor, StencilError};
