use crate::Scalar;
use ndarray::{ArrayBase, Data, Ix2};

/// Two-dimensional data indexed as `data[row][col]`.
pub trait Grid {
    /// Value at `(row, col)`. Panics if either index is out of range.
    fn value(&self, row: usize, col: usize) -> Scalar;

    /// Value at `(row, col)`, or `None` if either index is out of range.
    fn get(&self, row: usize, col: usize) -> Option<Scalar>;
}

impl<S> Grid for ArrayBase<S, Ix2>
where
    S: Data<Elem = Scalar>,
{
    #[inline]
    fn value(&self, row: usize, col: usize) -> Scalar {
        self[[row, col]]
    }

    fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        ArrayBase::get(self, [row, col]).copied()
    }
}

impl Grid for [Vec<Scalar>] {
    #[inline]
    fn value(&self, row: usize, col: usize) -> Scalar {
        self[row][col]
    }

    fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        <[Vec<Scalar>]>::get(self, row)?.get(col).copied()
    }
}

impl Grid for Vec<Vec<Scalar>> {
    #[inline]
    fn value(&self, row: usize, col: usize) -> Scalar {
        self.as_slice().value(row, col)
    }

    fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        Grid::get(self.as_slice(), row, col)
    }
}

impl<const C: usize> Grid for [[Scalar; C]] {
    #[inline]
    fn value(&self, row: usize, col: usize) -> Scalar {
        self[row][col]
    }

    fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        <[[Scalar; C]]>::get(self, row)?.get(col).copied()
    }
}

impl<const R: usize, const C: usize> Grid for [[Scalar; C]; R] {
    #[inline]
    fn value(&self, row: usize, col: usize) -> Scalar {
        self[row][col]
    }

    fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        Grid::get(&self[..], row, col)
    }
}
