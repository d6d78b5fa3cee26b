//! Brute-force Euclidean k-nearest-neighbors.
//!
//! Used as the default [`RankingModel`] over output profiles; it is equally
//! usable by callers as the raw feature space oracle that produces the
//! [`NeighborSet`] handed to [`crate::Knop`].
use rayon::prelude::*;

use crate::error::{DesError, Result};
use crate::math::{argmax_first, squared_euclidean, Array2};
use crate::neighbors::NeighborSet;
use crate::ranking::RankingModel;

#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    n_neighbors: usize,
    fit_x: Option<Array2<f64>>,
    fit_y: Vec<usize>,
    n_classes: usize,
}

impl KNearestNeighbors {
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            fit_x: None,
            fit_y: Vec::new(),
            n_classes: 0,
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    fn fitted(&self) -> Result<&Array2<f64>> {
        self.fit_x
            .as_ref()
            .ok_or(DesError::NotFitted("KNearestNeighbors"))
    }

    /// Indices and distances of the `k` closest fitted rows, nearest first.
    /// Equal distances keep the lower index first.
    fn query_row(fit_x: &Array2<f64>, row: &[f64], k: usize) -> (Vec<usize>, Vec<f64>) {
        let mut dists: Vec<(usize, f64)> = fit_x
            .rows()
            .enumerate()
            .map(|(i, r)| (i, squared_euclidean(r, row)))
            .collect();
        dists.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        dists.truncate(k);
        dists.into_iter().map(|(i, d)| (i, d.sqrt())).unzip()
    }
}

impl RankingModel for KNearestNeighbors {
    fn fit(&mut self, x_meta: &Array2<f64>, y: &[usize]) -> Result<()> {
        if x_meta.nrows() != y.len() {
            return Err(DesError::shape("KNearestNeighbors::fit", x_meta.nrows(), y.len()));
        }
        if y.is_empty() {
            return Err(DesError::Configuration(
                "cannot fit nearest neighbors on zero samples".to_string(),
            ));
        }
        self.n_classes = y.iter().copied().max().map_or(0, |m| m + 1);
        self.fit_x = Some(x_meta.clone());
        self.fit_y = y.to_vec();
        Ok(())
    }

    fn predict(&self, x_meta: &Array2<f64>) -> Result<Vec<usize>> {
        let neighbors = self.kneighbors(x_meta, self.n_neighbors)?;
        Ok((0..neighbors.n_queries())
            .map(|q| {
                let mut votes = vec![0usize; self.n_classes];
                for &idx in neighbors.indices(q) {
                    votes[self.fit_y[idx]] += 1;
                }
                argmax_first(&votes).unwrap_or(0)
            })
            .collect())
    }

    fn kneighbors(&self, x_meta: &Array2<f64>, k: usize) -> Result<NeighborSet> {
        let fit_x = self.fitted()?;
        if x_meta.ncols() != fit_x.ncols() {
            return Err(DesError::shape(
                "KNearestNeighbors query width",
                fit_x.ncols(),
                x_meta.ncols(),
            ));
        }
        if k > fit_x.nrows() {
            return Err(DesError::Configuration(format!(
                "requested {} neighbors but only {} samples were fitted",
                k,
                fit_x.nrows()
            )));
        }

        let rows: Vec<(Vec<usize>, Vec<f64>)> = (0..x_meta.nrows())
            .into_par_iter()
            .map(|q| Self::query_row(fit_x, x_meta.row_slice(q), k))
            .collect();

        let n_queries = rows.len();
        let (indices, distances): (Vec<Vec<usize>>, Vec<Vec<f64>>) = rows.into_iter().unzip();
        NeighborSet::new(
            Array2::from_shape_vec((n_queries, k), indices.concat())?,
            Array2::from_shape_vec((n_queries, k), distances.concat())?,
        )
    }

    fn fit_data(&self) -> Option<&Array2<f64>> {
        self.fit_x.as_ref()
    }

    fn name(&self) -> &str {
        "knn"
    }
}
