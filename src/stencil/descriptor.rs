use super::coefficients::{Accuracy, AccuracyOrder, Coefficients};
use super::grid::Grid;
use super::{convolve, Axis, Central, DerivativeKind, FiniteDifference, First, Right, Second};
use super::{Stagger, StaggerType, Stencil, StencilError};
use crate::Scalar;
use serde::Serialize;
use tracing::debug;

/// Accuracy order and stagger pairs that have coefficient tables.
pub const SUPPORTED: [(usize, StaggerType); 5] = [
    (2, StaggerType::Central),
    (4, StaggerType::Central),
    (6, StaggerType::Central),
    (8, StaggerType::Central),
    (2, StaggerType::Right),
];

/// Offset of the first weight relative to the evaluation index.
pub const fn stencil_start(stagger: StaggerType, size: usize) -> isize {
    let half = (size / 2) as isize;
    match stagger {
        StaggerType::Central => -half,
        StaggerType::Left => -half - 1,
        StaggerType::Right => -half + 1,
    }
}

/// A resolved stencil: the weights plus where they sit relative to the evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StencilDescriptor {
    pub kind: DerivativeKind,
    pub order: usize,
    pub stagger: StaggerType,
    pub coefficients: &'static [Scalar],
    pub start: isize,
}

impl StencilDescriptor {
    pub const fn new(
        kind: DerivativeKind,
        order: usize,
        stagger: StaggerType,
        coefficients: &'static [Scalar],
    ) -> Self {
        StencilDescriptor {
            kind,
            order,
            stagger,
            coefficients,
            start: stencil_start(stagger, coefficients.len()),
        }
    }

    /// Resolve the tables for a combination only known at runtime.
    pub fn lookup(
        kind: DerivativeKind,
        order: usize,
        stagger: StaggerType,
    ) -> Result<Self, StencilError> {
        let descriptor = match (order, stagger) {
            (2, StaggerType::Central) => resolve::<2, Central>(kind),
            (4, StaggerType::Central) => resolve::<4, Central>(kind),
            (6, StaggerType::Central) => resolve::<6, Central>(kind),
            (8, StaggerType::Central) => resolve::<8, Central>(kind),
            (2, StaggerType::Right) => resolve::<2, Right>(kind),
            _ => {
                debug!(%kind, order, %stagger, "no coefficient table");
                return Err(StencilError::Unsupported { kind, order, stagger });
            }
        };
        Ok(descriptor)
    }

    /// Every descriptor with a coefficient table, first derivatives before second.
    pub fn supported() -> impl Iterator<Item = StencilDescriptor> {
        [DerivativeKind::First, DerivativeKind::Second]
            .into_iter()
            .flat_map(|kind| {
                SUPPORTED
                    .into_iter()
                    .filter_map(move |(order, stagger)| Self::lookup(kind, order, stagger).ok())
            })
    }

    pub const fn size(&self) -> usize {
        self.coefficients.len()
    }

    /// Number of halo cells needed on each side of an evaluation point.
    pub fn reach(&self) -> usize {
        let last = self.start + self.size() as isize - 1;
        self.start.unsigned_abs().max(last.unsigned_abs())
    }

    /// Weighted sum over a flat window, which must hold exactly `size()` samples.
    pub fn apply(&self, data: &[Scalar]) -> Result<Scalar, StencilError> {
        if data.len() != self.size() {
            return Err(StencilError::WindowLength {
                expected: self.size(),
                actual: data.len(),
            });
        }
        Ok(convolve(self.coefficients, |k| data[k]))
    }

    /// Derivative estimate at `(i, j)` along `axis`, in index-space units.
    ///
    /// The caller must leave at least `reach()` cells of halo around `(i, j)`. No bounds
    /// checking happens beyond the container's own indexing, which panics.
    #[inline]
    pub fn apply_axis<G: Grid + ?Sized>(&self, data: &G, i: usize, j: usize, axis: Axis) -> Scalar {
        let start = self.start;
        match axis {
            Axis::X => convolve(self.coefficients, |k| {
                data.value(i, (j as isize + k as isize + start) as usize)
            }),
            Axis::Y => convolve(self.coefficients, |k| {
                data.value((i as isize + k as isize + start) as usize, j)
            }),
        }
    }

    /// Like `apply_axis`, but reports a window that leaves the grid instead of indexing it.
    pub fn try_apply_axis<G: Grid + ?Sized>(
        &self,
        data: &G,
        i: usize,
        j: usize,
        axis: Axis,
    ) -> Result<Scalar, StencilError> {
        let mut result = 0.0;
        for (k, weight) in self.coefficients.iter().enumerate() {
            let (row, col) = match axis {
                Axis::X => (Some(i), offset(j, k, self.start)),
                Axis::Y => (offset(i, k, self.start), Some(j)),
            };
            let value = row
                .zip(col)
                .and_then(|(row, col)| data.get(row, col))
                .ok_or(StencilError::OutOfBounds { i, j, axis })?;
            result += weight * value;
        }
        Ok(result)
    }
}

fn offset(origin: usize, k: usize, start: isize) -> Option<usize> {
    let index = isize::try_from(origin).ok()?.checked_add(k as isize + start)?;
    usize::try_from(index).ok()
}

fn resolve<const ORDER: usize, S: Stagger>(kind: DerivativeKind) -> StencilDescriptor
where
    Accuracy<ORDER>: Coefficients<S> + AccuracyOrder,
{
    match kind {
        DerivativeKind::First => FiniteDifference::<First, Accuracy<ORDER>, S>::DESCRIPTOR,
        DerivativeKind::Second => FiniteDifference::<Second, Accuracy<ORDER>, S>::DESCRIPTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    #[test]
    fn central_start_is_minus_half_size() {
        for size in [3, 5, 7, 9].iter() {
            assert_eq!(stencil_start(StaggerType::Central, *size), -(*size as isize / 2));
        }
    }

    #[test]
    fn staggered_start() {
        assert_eq!(stencil_start(StaggerType::Right, 4), -1);
        assert_eq!(stencil_start(StaggerType::Right, 2), 0);
        assert_eq!(stencil_start(StaggerType::Left, 4), -3);
    }

    #[test]
    fn lookup_central() {
        let descriptor =
            StencilDescriptor::lookup(DerivativeKind::First, 4, StaggerType::Central).unwrap();
        assert_eq!(descriptor.size(), 5);
        assert_eq!(descriptor.start, -2);
        assert_eq!(descriptor.reach(), 2);
        assert_eq!(descriptor.coefficients[3], 2.0 / 3.0);
    }

    #[test]
    fn lookup_right() {
        let first = StencilDescriptor::lookup(DerivativeKind::First, 2, StaggerType::Right).unwrap();
        assert_eq!(first.size(), 2);
        assert_eq!(first.start, 0);
        assert_eq!(first.reach(), 1);

        let second =
            StencilDescriptor::lookup(DerivativeKind::Second, 2, StaggerType::Right).unwrap();
        assert_eq!(second.size(), 4);
        assert_eq!(second.start, -1);
        assert_eq!(second.reach(), 2);
    }

    #[test]
    fn lookup_rejects_missing_tables() {
        for order in [4, 6, 8].iter() {
            let result = StencilDescriptor::lookup(DerivativeKind::Second, *order, StaggerType::Right);
            assert_eq!(
                result,
                Err(StencilError::Unsupported {
                    kind: DerivativeKind::Second,
                    order: *order,
                    stagger: StaggerType::Right,
                })
            );
        }

        assert!(StencilDescriptor::lookup(DerivativeKind::First, 2, StaggerType::Left).is_err());
        assert!(StencilDescriptor::lookup(DerivativeKind::First, 3, StaggerType::Central).is_err());
        assert!(StencilDescriptor::lookup(DerivativeKind::First, 10, StaggerType::Central).is_err());
    }

    #[test]
    fn supported_lists_every_table() {
        let all: Vec<_> = StencilDescriptor::supported().collect();
        assert_eq!(all.len(), 10);
        assert!(all.iter().all(|d| d.stagger != StaggerType::Left));
        assert_eq!(all[0].kind, DerivativeKind::First);
        assert_eq!(all[9].kind, DerivativeKind::Second);
    }

    #[test]
    fn supported_pairs_match_lookup() {
        assert_eq!(StencilDescriptor::supported().count(), 2 * SUPPORTED.len());

        let staggers = [StaggerType::Central, StaggerType::Left, StaggerType::Right];
        for kind in [DerivativeKind::First, DerivativeKind::Second].iter() {
            for order in 0..=10 {
                for stagger in staggers.iter() {
                    let listed = SUPPORTED.contains(&(order, *stagger));
                    let resolved = StencilDescriptor::lookup(*kind, order, *stagger);
                    assert_eq!(listed, resolved.is_ok(), "{} {} {}", kind, order, stagger);
                    if let Ok(descriptor) = resolved {
                        assert_eq!(
                            (descriptor.kind, descriptor.order, descriptor.stagger),
                            (*kind, order, *stagger)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn apply_flat_window() {
        let descriptor =
            StencilDescriptor::lookup(DerivativeKind::Second, 2, StaggerType::Central).unwrap();
        assert_eq!(descriptor.apply(&[1.0, 4.0, 9.0]), Ok(2.0));
        assert_eq!(
            descriptor.apply(&[1.0, 4.0]),
            Err(StencilError::WindowLength { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn apply_axis_walks_columns_for_x_and_rows_for_y() {
        // value = 10 * row + col
        let grid = Array2::from_shape_fn((5, 5), |(row, col)| 10.0 * row as Scalar + col as Scalar);
        let descriptor =
            StencilDescriptor::lookup(DerivativeKind::First, 2, StaggerType::Central).unwrap();

        assert_abs_diff_eq!(descriptor.apply_axis(&grid, 2, 2, Axis::X), 1.0);
        assert_abs_diff_eq!(descriptor.apply_axis(&grid, 2, 2, Axis::Y), 10.0);
    }

    #[test]
    fn right_stagger_first_is_forward_difference() {
        let grid = vec![vec![0.0, 1.0, 4.0, 9.0]];
        let descriptor = StencilDescriptor::lookup(DerivativeKind::First, 2, StaggerType::Right).unwrap();
        assert_eq!(descriptor.apply_axis(&grid, 0, 1, Axis::X), 3.0);
    }

    #[test]
    fn checked_application_matches_unchecked_inside() {
        let grid = Array2::from_shape_fn((7, 7), |(row, col)| (row * row + 3 * col) as Scalar);
        let descriptor =
            StencilDescriptor::lookup(DerivativeKind::Second, 4, StaggerType::Central).unwrap();

        for axis in [Axis::X, Axis::Y].iter() {
            assert_eq!(
                descriptor.try_apply_axis(&grid, 3, 3, *axis),
                Ok(descriptor.apply_axis(&grid, 3, 3, *axis))
            );
        }
    }

    #[test]
    fn checked_application_reports_out_of_bounds() {
        let grid = Array2::<Scalar>::zeros((4, 4));
        let descriptor =
            StencilDescriptor::lookup(DerivativeKind::First, 4, StaggerType::Central).unwrap();

        assert_eq!(
            descriptor.try_apply_axis(&grid, 1, 2, Axis::Y),
            Err(StencilError::OutOfBounds { i: 1, j: 2, axis: Axis::Y })
        );
        assert_eq!(
            descriptor.try_apply_axis(&grid, 1, 2, Axis::X),
            Err(StencilError::OutOfBounds { i: 1, j: 2, axis: Axis::X })
        );
    }

    #[test]
    #[should_panic]
    fn unchecked_application_panics_without_halo() {
        let grid = Array2::<Scalar>::zeros((4, 4));
        let descriptor =
            StencilDescriptor::lookup(DerivativeKind::First, 8, StaggerType::Central).unwrap();
        descriptor.apply_axis(&grid, 0, 0, Axis::X);
    }
}
