//! Empirical accuracy check for the stencils.
//!
//! Samples `f(x, y) = sin(kx) cos(ky)` on the unit square at a sequence of resolutions, applies
//! a stencil at every interior cell and records the maximum error against the analytic
//! derivative. The ratio of errors between successive resolutions gives the observed order of
//! accuracy, which should approach the stencil's nominal order.

use crate::stencil::{Axis, DerivativeKind, StaggerType, StencilDescriptor, StencilError};
use crate::utilities::sample_with_halo;
use crate::Scalar;
use ndarray::parallel::prelude::*;
use ndarray::Array;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceParameters {
    pub derivative: DerivativeKind,
    pub order: usize,
    pub stagger: StaggerType,
    pub axis: Axis,
    /// Number of periods of the test function across the unit square
    pub wavenumber: Scalar,
    /// Interior cells per side at each refinement level
    pub resolutions: Vec<usize>,
}

impl Default for ConvergenceParameters {
    fn default() -> Self {
        ConvergenceParameters {
            derivative: DerivativeKind::First,
            order: 2,
            stagger: StaggerType::Central,
            axis: Axis::X,
            wavenumber: 1.0,
            resolutions: vec![16, 32, 64],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceRecord {
    pub n: usize,
    pub spacing: Scalar,
    pub max_error: Scalar,
    /// Absent for the coarsest level
    pub observed_order: Option<Scalar>,
}

/// Analytic derivative of `sin(kx) cos(ky)`.
fn exact(kind: DerivativeKind, axis: Axis, k: Scalar, x: Scalar, y: Scalar) -> Scalar {
    match (kind, axis) {
        (DerivativeKind::First, Axis::X) => k * (k * x).cos() * (k * y).cos(),
        (DerivativeKind::First, Axis::Y) => -k * (k * x).sin() * (k * y).sin(),
        (DerivativeKind::Second, _) => -k * k * (k * x).sin() * (k * y).cos(),
    }
}

/// Offset of the evaluation point from the cell, in units of the spacing.
fn evaluation_shift(stagger: StaggerType) -> Scalar {
    match stagger {
        StaggerType::Central => 0.0,
        StaggerType::Right => 0.5,
        StaggerType::Left => -0.5,
    }
}

/// Maximum error of `stencil` over the interior of an `n` by `n` grid.
pub fn max_error(stencil: &StencilDescriptor, axis: Axis, wavenumber: Scalar, n: usize) -> Scalar {
    let k = 2.0 * PI * wavenumber;
    let h = 1.0 / n as Scalar;
    let halo = stencil.reach();
    let grid = sample_with_halo(n, halo, h, |x, y| (k * x).sin() * (k * y).cos());

    let scale = h.powi(stencil.kind.spacing_power());
    let shift = evaluation_shift(stencil.stagger) * h;

    let errors = Array::from_shape_fn((n, n), |(row, col)| {
        let (i, j) = (row + halo, col + halo);
        let (mut x, mut y) = (col as Scalar * h, row as Scalar * h);
        match axis {
            Axis::X => x += shift,
            Axis::Y => y += shift,
        }
        stencil.apply_axis(&grid, i, j, axis) / scale - exact(stencil.kind, axis, k, x, y)
    });

    errors
        .axis_iter(ndarray::Axis(0))
        .into_par_iter()
        .map(|row| row.fold(0.0, |acc: Scalar, e| acc.max(e.abs())))
        .reduce(|| 0.0, Scalar::max)
}

/// Run the check at every resolution in `p.resolutions`, coarsest first as given.
pub fn run(p: &ConvergenceParameters) -> Result<Vec<ConvergenceRecord>, StencilError> {
    if p.resolutions.is_empty() {
        return Err(StencilError::InvalidParameters("no resolutions given".to_string()));
    }
    if p.resolutions.contains(&0) {
        return Err(StencilError::InvalidParameters("resolution must be positive".to_string()));
    }

    let stencil = StencilDescriptor::lookup(p.derivative, p.order, p.stagger)?;
    info!(
        derivative = %p.derivative,
        order = p.order,
        stagger = %p.stagger,
        axis = %p.axis,
        "convergence check"
    );

    let mut records: Vec<ConvergenceRecord> = Vec::with_capacity(p.resolutions.len());
    for &n in p.resolutions.iter() {
        let spacing = 1.0 / n as Scalar;
        let max_error = max_error(&stencil, p.axis, p.wavenumber, n);
        let observed_order = records
            .last()
            .map(|prev| (prev.max_error / max_error).ln() / (prev.spacing / spacing).ln());

        debug!(n, spacing, max_error, ?observed_order, "level done");
        records.push(ConvergenceRecord { n, spacing, max_error, observed_order });
    }

    Ok(records)
}
