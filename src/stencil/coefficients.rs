//! Finite difference coefficients for 1st and 2nd derivatives at various orders of accuracy.
//!
//! Tables are keyed at the type level by `Accuracy<ORDER>` and a stagger marker. Only the
//! combinations listed here exist; asking for any other one is a compile error rather than an
//! empty table.

use super::{Central, Right, Stagger};
use crate::Scalar;

/// Fill in antisymmetric (odd derivative) finite difference coefficients from the weights on
/// the positive side of the stencil, excluding the centre.
///
/// The full stencil has `M = 2N + 1` weights with a zero centre and
/// `coefficients[N - 1 - i] = -partial[i]`, `coefficients[N + 1 + i] = partial[i]`.
///
/// ```
/// use fd_stencil::stencil::antisymmetric_coefficients;
///
/// let full: [f64; 7] = antisymmetric_coefficients(&[0.75, -0.15, 1.0 / 60.0]);
/// assert_eq!(full, [-1.0 / 60.0, 0.15, -0.75, 0.0, 0.75, -0.15, 1.0 / 60.0]);
/// ```
pub const fn antisymmetric_coefficients<const N: usize, const M: usize>(
    partial: &[Scalar; N],
) -> [Scalar; M] {
    assert!(M == 2 * N + 1, "antisymmetric stencil needs 2N + 1 coefficients");

    let mut coefficients = [0.0; M];
    let mut i = 0;
    while i < N {
        coefficients[N - 1 - i] = -partial[i];
        coefficients[N + 1 + i] = partial[i];
        i += 1;
    }
    coefficients
}

/// Marker for the accuracy order of a stencil (the order of its leading truncation error).
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy<const ORDER: usize>;

/// Exposes the accuracy order carried by an `Accuracy<ORDER>` marker.
pub trait AccuracyOrder {
    const ORDER: usize;
}

impl<const ORDER: usize> AccuracyOrder for Accuracy<ORDER> {
    const ORDER: usize = ORDER;
}

/// Weights for the first and second derivative with stagger `S`.
pub trait Coefficients<S: Stagger> {
    const FIRST: &'static [Scalar];
    const SECOND: &'static [Scalar];
}

const CENTRAL_2_PARTIAL_FIRST: [Scalar; 1] = [0.5];
const CENTRAL_2_FIRST: [Scalar; 3] = antisymmetric_coefficients(&CENTRAL_2_PARTIAL_FIRST);
const CENTRAL_2_SECOND: [Scalar; 3] = [1.0, -2.0, 1.0];

const CENTRAL_4_PARTIAL_FIRST: [Scalar; 2] = [2.0 / 3.0, -1.0 / 12.0];
const CENTRAL_4_FIRST: [Scalar; 5] = antisymmetric_coefficients(&CENTRAL_4_PARTIAL_FIRST);
const CENTRAL_4_SECOND: [Scalar; 5] = [-1.0 / 12.0, 4.0 / 3.0, -5.0 / 2.0, 4.0 / 3.0, -1.0 / 12.0];

const CENTRAL_6_PARTIAL_FIRST: [Scalar; 3] = [3.0 / 4.0, -3.0 / 20.0, 1.0 / 60.0];
const CENTRAL_6_FIRST: [Scalar; 7] = antisymmetric_coefficients(&CENTRAL_6_PARTIAL_FIRST);
const CENTRAL_6_SECOND: [Scalar; 7] = [
    1.0 / 90.0,
    -3.0 / 20.0,
    3.0 / 2.0,
    -49.0 / 18.0,
    3.0 / 2.0,
    -3.0 / 20.0,
    1.0 / 90.0,
];

const CENTRAL_8_PARTIAL_FIRST: [Scalar; 4] = [4.0 / 5.0, -1.0 / 5.0, 4.0 / 105.0, -1.0 / 280.0];
const CENTRAL_8_FIRST: [Scalar; 9] = antisymmetric_coefficients(&CENTRAL_8_PARTIAL_FIRST);
const CENTRAL_8_SECOND: [Scalar; 9] = [
    -1.0 / 560.0,
    8.0 / 315.0,
    -1.0 / 5.0,
    8.0 / 5.0,
    -205.0 / 72.0,
    8.0 / 5.0,
    -1.0 / 5.0,
    8.0 / 315.0,
    -1.0 / 560.0,
];

// Right stagger: the second derivative table is four wide, not ORDER + 1.
const RIGHT_2_FIRST: [Scalar; 2] = [-1.0, 1.0];
const RIGHT_2_SECOND: [Scalar; 4] = [0.5, -0.5, -0.5, 0.5];

impl Coefficients<Central> for Accuracy<2> {
    const FIRST: &'static [Scalar] = &CENTRAL_2_FIRST;
    const SECOND: &'static [Scalar] = &CENTRAL_2_SECOND;
}

impl Coefficients<Central> for Accuracy<4> {
    const FIRST: &'static [Scalar] = &CENTRAL_4_FIRST;
    const SECOND: &'static [Scalar] = &CENTRAL_4_SECOND;
}

impl Coefficients<Central> for Accuracy<6> {
    const FIRST: &'static [Scalar] = &CENTRAL_6_FIRST;
    const SECOND: &'static [Scalar] = &CENTRAL_6_SECOND;
}

impl Coefficients<Central> for Accuracy<8> {
    const FIRST: &'static [Scalar] = &CENTRAL_8_FIRST;
    const SECOND: &'static [Scalar] = &CENTRAL_8_SECOND;
}

impl Coefficients<Right> for Accuracy<2> {
    const FIRST: &'static [Scalar] = &RIGHT_2_FIRST;
    const SECOND: &'static [Scalar] = &RIGHT_2_SECOND;
}

// TODO Right stagger at orders 4, 6 and 8 has no derived tables yet. Left stagger should share
// the Right tables once they are validated against its start offset.

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_antisymmetric(coefficients: &[Scalar]) {
        let size = coefficients.len();
        assert_eq!(size % 2, 1);
        assert_eq!(coefficients[size / 2], 0.0);
        for i in 0..size {
            assert_eq!(coefficients[i], -coefficients[size - 1 - i]);
        }
    }

    fn assert_symmetric(coefficients: &[Scalar]) {
        let size = coefficients.len();
        for i in 0..size {
            assert_eq!(coefficients[i], coefficients[size - 1 - i]);
        }
    }

    #[test]
    fn expansion_of_single_weight() {
        let full: [Scalar; 3] = antisymmetric_coefficients(&[0.5]);
        assert_eq!(full, [-0.5, 0.0, 0.5]);
    }

    #[test]
    fn expansion_sixth_order() {
        let full: [Scalar; 7] = antisymmetric_coefficients(&[0.75, -0.15, 1.0 / 60.0]);
        assert_eq!(full, [-1.0 / 60.0, 0.15, -0.75, 0.0, 0.75, -0.15, 1.0 / 60.0]);
        assert_antisymmetric(&full);
    }

    #[test]
    fn expansion_keeps_partial_on_positive_side() {
        let full: [Scalar; 9] = antisymmetric_coefficients(&CENTRAL_8_PARTIAL_FIRST);
        assert_eq!(&full[5..], &CENTRAL_8_PARTIAL_FIRST[..]);
        assert_antisymmetric(&full);
    }

    #[test]
    #[should_panic]
    fn expansion_rejects_wrong_output_length() {
        let _: [Scalar; 4] = antisymmetric_coefficients(&[0.5]);
    }

    #[test]
    fn central_tables_have_order_plus_one_weights() {
        assert_eq!(<Accuracy<2> as Coefficients<Central>>::FIRST.len(), 3);
        assert_eq!(<Accuracy<4> as Coefficients<Central>>::FIRST.len(), 5);
        assert_eq!(<Accuracy<6> as Coefficients<Central>>::SECOND.len(), 7);
        assert_eq!(<Accuracy<8> as Coefficients<Central>>::SECOND.len(), 9);
    }

    #[test]
    fn central_first_is_antisymmetric() {
        assert_antisymmetric(<Accuracy<2> as Coefficients<Central>>::FIRST);
        assert_antisymmetric(<Accuracy<4> as Coefficients<Central>>::FIRST);
        assert_antisymmetric(<Accuracy<6> as Coefficients<Central>>::FIRST);
        assert_antisymmetric(<Accuracy<8> as Coefficients<Central>>::FIRST);
    }

    #[test]
    fn central_second_is_symmetric() {
        assert_symmetric(<Accuracy<2> as Coefficients<Central>>::SECOND);
        assert_symmetric(<Accuracy<4> as Coefficients<Central>>::SECOND);
        assert_symmetric(<Accuracy<6> as Coefficients<Central>>::SECOND);
        assert_symmetric(<Accuracy<8> as Coefficients<Central>>::SECOND);
    }

    #[test]
    fn weights_sum_to_zero() {
        let tables: [&[Scalar]; 10] = [
            <Accuracy<2> as Coefficients<Central>>::FIRST,
            <Accuracy<2> as Coefficients<Central>>::SECOND,
            <Accuracy<4> as Coefficients<Central>>::FIRST,
            <Accuracy<4> as Coefficients<Central>>::SECOND,
            <Accuracy<6> as Coefficients<Central>>::FIRST,
            <Accuracy<6> as Coefficients<Central>>::SECOND,
            <Accuracy<8> as Coefficients<Central>>::FIRST,
            <Accuracy<8> as Coefficients<Central>>::SECOND,
            <Accuracy<2> as Coefficients<Right>>::FIRST,
            <Accuracy<2> as Coefficients<Right>>::SECOND,
        ];

        for table in tables.iter() {
            assert_abs_diff_eq!(table.iter().sum::<Scalar>(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn second_derivative_moments() {
        // sum_k w_k (k - c)^2 / 2 = 1 for every central second derivative
        let tables: [&[Scalar]; 4] = [
            <Accuracy<2> as Coefficients<Central>>::SECOND,
            <Accuracy<4> as Coefficients<Central>>::SECOND,
            <Accuracy<6> as Coefficients<Central>>::SECOND,
            <Accuracy<8> as Coefficients<Central>>::SECOND,
        ];

        for table in tables.iter() {
            let centre = (table.len() / 2) as Scalar;
            let moment: Scalar = table
                .iter()
                .enumerate()
                .map(|(k, w)| w * (k as Scalar - centre).powi(2))
                .sum();
            assert_abs_diff_eq!(0.5 * moment, 1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn accuracy_order_marker() {
        assert_eq!(<Accuracy<6> as AccuracyOrder>::ORDER, 6);
    }

    #[test]
    fn right_stagger_tables() {
        assert_eq!(<Accuracy<2> as Coefficients<Right>>::FIRST, &[-1.0, 1.0][..]);
        assert_eq!(<Accuracy<2> as Coefficients<Right>>::SECOND, &[0.5, -0.5, -0.5, 0.5][..]);
    }
}
