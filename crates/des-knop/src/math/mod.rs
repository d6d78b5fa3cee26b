//! Small ndarray-like types used throughout the crate.
//!
//! `Array2` stores row-major matrices (samples x features, queries x
//! classifiers). Per-query outputs are plain `Vec`s.
pub mod matrix;

pub use matrix::{Array2, ShapeError};

/// Squared Euclidean distance between two equally long slices.
#[inline]
pub fn squared_euclidean(lhs: &[f64], rhs: &[f64]) -> f64 {
    debug_assert_eq!(lhs.len(), rhs.len());
    lhs.iter().zip(rhs.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// Index of the first maximum in `values`, `None` if empty.
///
/// Taking the first maximum makes every arg-max in the crate break ties
/// towards the lowest index.
pub fn argmax_first<T: PartialOrd + Copy>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            None => best = Some((idx, v)),
            Some((_, b)) if v > b => best = Some((idx, v)),
            Some(_) => {}
        }
    }
    best.map(|(idx, _)| idx)
}
