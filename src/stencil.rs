//! Finite difference stencils on a regular grid.
//!
//! Stencils are selected at compile time by derivative (`First`, `Second`), accuracy order and
//! stagger (`Central`, `Left`, `Right`). Only combinations with a coefficient table exist, so
//! an unsupported request is rejected by the type checker:
//!
//! ```compile_fail
//! use fd_stencil::stencil::{first_x, Right};
//!
//! let grid = vec![vec![0.0; 16]; 16];
//! let _ = first_x::<4, Right>(&grid, 8, 8);
//! ```
//!
//! Left stagger has no tables at any order:
//!
//! ```compile_fail
//! use fd_stencil::stencil::{first_x, Left};
//!
//! let grid = vec![vec![0.0; 16]; 16];
//! let _ = first_x::<2, Left>(&grid, 8, 8);
//! ```
//!
//! ```compile_fail
//! use fd_stencil::stencil::second;
//!
//! // Even-length windows have no central stencil.
//! let _ = second(&[1.0, 2.0, 3.0, 4.0]);
//! ```
//!
//! All results are in index space; divide by the grid spacing raised to the derivative order.

mod coefficients;
mod descriptor;
mod grid;

pub use self::coefficients::{antisymmetric_coefficients, Accuracy, AccuracyOrder, Coefficients};
pub use self::descriptor::{stencil_start, StencilDescriptor, SUPPORTED};
pub use self::grid::Grid;

use crate::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Order of the derivative a stencil approximates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeKind {
    First,
    Second,
}

impl DerivativeKind {
    /// Power of the grid spacing that converts an estimate to physical units.
    pub fn spacing_power(self) -> i32 {
        match self {
            DerivativeKind::First => 1,
            DerivativeKind::Second => 2,
        }
    }
}

/// Position of the stencil relative to the evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerType {
    Central,
    Left,
    Right,
}

/// Grid direction along which a stencil is applied.
///
/// `X` walks along a row (the column index varies), `Y` walks down a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for DerivativeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DerivativeKind::First => write!(f, "first"),
            DerivativeKind::Second => write!(f, "second"),
        }
    }
}

impl fmt::Display for StaggerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StaggerType::Central => write!(f, "central"),
            StaggerType::Left => write!(f, "left"),
            StaggerType::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

impl FromStr for DerivativeKind {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(DerivativeKind::First),
            "second" => Ok(DerivativeKind::Second),
            _ => Err(StencilError::Parse(format!("unknown derivative `{}`", s))),
        }
    }
}

impl FromStr for StaggerType {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "central" => Ok(StaggerType::Central),
            "left" => Ok(StaggerType::Left),
            "right" => Ok(StaggerType::Right),
            _ => Err(StencilError::Parse(format!("unknown stagger `{}`", s))),
        }
    }
}

impl FromStr for Axis {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            _ => Err(StencilError::Parse(format!("unknown axis `{}`", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StencilError {
    #[error("no {kind} derivative stencil of order {order} with {stagger} stagger")]
    Unsupported {
        kind: DerivativeKind,
        order: usize,
        stagger: StaggerType,
    },

    #[error("stencil along {axis} at ({i}, {j}) leaves the grid")]
    OutOfBounds { i: usize, j: usize, axis: Axis },

    #[error("window has {actual} samples, stencil needs {expected}")]
    WindowLength { expected: usize, actual: usize },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    Parse(String),
}

/// Type-level derivative order.
pub trait Derivative {
    const KIND: DerivativeKind;
}

/// Type-level stagger.
pub trait Stagger {
    const TYPE: StaggerType;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct First;

#[derive(Debug, Clone, Copy, Default)]
pub struct Second;

#[derive(Debug, Clone, Copy, Default)]
pub struct Central;

#[derive(Debug, Clone, Copy, Default)]
pub struct Left;

#[derive(Debug, Clone, Copy, Default)]
pub struct Right;

impl Derivative for First {
    const KIND: DerivativeKind = DerivativeKind::First;
}

impl Derivative for Second {
    const KIND: DerivativeKind = DerivativeKind::Second;
}

impl Stagger for Central {
    const TYPE: StaggerType = StaggerType::Central;
}

impl Stagger for Left {
    const TYPE: StaggerType = StaggerType::Left;
}

impl Stagger for Right {
    const TYPE: StaggerType = StaggerType::Right;
}

/// A stencil fully determined by its type.
pub trait Stencil {
    const DESCRIPTOR: StencilDescriptor;
}

/// Stencil for derivative `D` at accuracy `A` with stagger `S`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteDifference<D, A, S>(PhantomData<(D, A, S)>);

impl<D, A, S> Stencil for FiniteDifference<D, A, S>
where
    D: Derivative,
    A: AccuracyOrder + Coefficients<S>,
    S: Stagger,
{
    const DESCRIPTOR: StencilDescriptor = StencilDescriptor::new(
        D::KIND,
        A::ORDER,
        S::TYPE,
        match D::KIND {
            DerivativeKind::First => A::FIRST,
            DerivativeKind::Second => A::SECOND,
        },
    );
}

/// Weighted sum `sum_k coefficients[k] * sample(k)`, accumulated in index order.
#[inline]
fn convolve<F>(coefficients: &[Scalar], sample: F) -> Scalar
where
    F: Fn(usize) -> Scalar,
{
    coefficients
        .iter()
        .enumerate()
        .fold(0.0, |acc, (k, w)| acc + w * sample(k))
}

/// A flat window of samples centred on the evaluation point.
///
/// Implemented for the odd lengths with a central stencil; the window length fixes the
/// accuracy order (`order = length - 1`).
pub trait CentralWindow {
    type Accuracy: AccuracyOrder + Coefficients<Central>;

    fn samples(&self) -> &[Scalar];
}

impl CentralWindow for [Scalar; 3] {
    type Accuracy = Accuracy<2>;

    fn samples(&self) -> &[Scalar] {
        self
    }
}

impl CentralWindow for [Scalar; 5] {
    type Accuracy = Accuracy<4>;

    fn samples(&self) -> &[Scalar] {
        self
    }
}

impl CentralWindow for [Scalar; 7] {
    type Accuracy = Accuracy<6>;

    fn samples(&self) -> &[Scalar] {
        self
    }
}

impl CentralWindow for [Scalar; 9] {
    type Accuracy = Accuracy<8>;

    fn samples(&self) -> &[Scalar] {
        self
    }
}

// Apply central derivatives on a 1d set of support points.

/// Central derivative `D` at the centre of `data`.
pub fn apply<D, W>(data: &W) -> Scalar
where
    D: Derivative,
    W: CentralWindow + ?Sized,
{
    let stencil = FiniteDifference::<D, W::Accuracy, Central>::DESCRIPTOR;
    let samples = data.samples();
    debug_assert_eq!(samples.len(), stencil.size());
    convolve(stencil.coefficients, |k| samples[k])
}

pub fn first<W: CentralWindow + ?Sized>(data: &W) -> Scalar {
    apply::<First, W>(data)
}

pub fn second<W: CentralWindow + ?Sized>(data: &W) -> Scalar {
    apply::<Second, W>(data)
}

// Apply coefficients for a particular derivative to the stencil at position (i, j).

/// Derivative `D` at row `i`, column `j` along `axis`.
///
/// The caller must provide enough halo around `(i, j)` for the stencil's reach. Indices are
/// not checked beyond the grid's own indexing, which panics; see
/// [`StencilDescriptor::try_apply_axis`] for a checked variant.
#[inline]
pub fn apply_axis<D, const ORDER: usize, S>(
    data: &(impl Grid + ?Sized),
    i: usize,
    j: usize,
    axis: Axis,
) -> Scalar
where
    D: Derivative,
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    FiniteDifference::<D, Accuracy<ORDER>, S>::DESCRIPTOR.apply_axis(data, i, j, axis)
}

#[inline]
pub fn apply_x<D, const ORDER: usize, S>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
where
    D: Derivative,
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    apply_axis::<D, ORDER, S>(data, i, j, Axis::X)
}

#[inline]
pub fn apply_y<D, const ORDER: usize, S>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
where
    D: Derivative,
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    apply_axis::<D, ORDER, S>(data, i, j, Axis::Y)
}

// Aliases to apply coefficients for first and second derivatives.

#[inline]
pub fn first_x<const ORDER: usize, S>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
where
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    apply_x::<First, ORDER, S>(data, i, j)
}

#[inline]
pub fn first_y<const ORDER: usize, S>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
where
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    apply_y::<First, ORDER, S>(data, i, j)
}

#[inline]
pub fn second_x<const ORDER: usize, S>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
where
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    apply_x::<Second, ORDER, S>(data, i, j)
}

#[inline]
pub fn second_y<const ORDER: usize, S>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
where
    S: Stagger,
    Accuracy<ORDER>: Coefficients<S>,
{
    apply_y::<Second, ORDER, S>(data, i, j)
}

/// Aliases that default to central derivatives.
pub mod central {
    use super::{Accuracy, Central, Coefficients, Grid};
    use crate::Scalar;

    #[inline]
    pub fn first_x<const ORDER: usize>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
    where
        Accuracy<ORDER>: Coefficients<Central>,
    {
        super::first_x::<ORDER, Central>(data, i, j)
    }

    #[inline]
    pub fn first_y<const ORDER: usize>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
    where
        Accuracy<ORDER>: Coefficients<Central>,
    {
        super::first_y::<ORDER, Central>(data, i, j)
    }

    #[inline]
    pub fn second_x<const ORDER: usize>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
    where
        Accuracy<ORDER>: Coefficients<Central>,
    {
        super::second_x::<ORDER, Central>(data, i, j)
    }

    #[inline]
    pub fn second_y<const ORDER: usize>(data: &(impl Grid + ?Sized), i: usize, j: usize) -> Scalar
    where
        Accuracy<ORDER>: Coefficients<Central>,
    {
        super::second_y::<ORDER, Central>(data, i, j)
    }
}
