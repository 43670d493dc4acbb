use crate::Scalar;
use ndarray::prelude::*;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::Serialize;
use std::fs;
use std::io::BufWriter;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Sample `f(x, y)` on an `n` by `n` grid of spacing `h`, padded with `halo` extra cells on
/// every side.
///
/// Storage index `(row, col)` holds `f((col - halo) h, (row - halo) h)`, so interior cells are
/// `halo..halo + n` along both axes.
pub fn sample_with_halo<F>(n: usize, halo: usize, h: Scalar, f: F) -> Array2<Scalar>
where
    F: Fn(Scalar, Scalar) -> Scalar,
{
    let size = n + 2 * halo;
    let coord = |idx: usize| (idx as Scalar - halo as Scalar) * h;
    Array::from_shape_fn((size, size), |(row, col)| f(coord(col), coord(row)))
}

/// Field of uniformly distributed values in `[-amplitude, amplitude]`.
pub fn random_field(rows: usize, cols: usize, amplitude: Scalar) -> Array2<Scalar> {
    random_field_using(rows, cols, amplitude, &mut rand::thread_rng())
}

/// As `random_field`, drawing from `rng` so a seeded generator reproduces the field.
pub fn random_field_using<R: Rng>(
    rows: usize,
    cols: usize,
    amplitude: Scalar,
    rng: &mut R,
) -> Array2<Scalar> {
    Array::random_using((rows, cols), Uniform::new_inclusive(-amplitude, amplitude), rng)
}

pub fn dump_default_to_json_file<T>(filename: &str) -> Result<()>
where
    T: Default + Serialize,
{
    let file = fs::File::create(filename)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &T::default())?;
    Ok(())
}
