//! Competence estimation strategies.
//!
//! A strategy receives the fit-time state of a [`crate::Knop`] through a
//! [`CompetenceContext`] and returns a `(queries, classifiers)` matrix of
//! non-negative competences. Strategies are injected at construction, so
//! tests and alternative rules never need to patch the selector.
use rayon::prelude::*;

use crate::error::{DesError, Result};
use crate::math::Array2;
use crate::neighbors::NeighborSet;
use crate::ranking::RankingModel;

/// Read-only fit-time state visible to competence strategies.
pub struct CompetenceContext<'a> {
    /// `hits[(i, j)]` is true when classifier `j` labels DSEL sample `i` correctly.
    pub hits: &'a Array2<bool>,
    pub y_dsel: &'a [usize],
    pub dsel_scores: &'a Array2<f64>,
    pub ranking: &'a dyn RankingModel,
    pub k: usize,
}

impl CompetenceContext<'_> {
    pub fn n_classifiers(&self) -> usize {
        self.hits.ncols()
    }

    /// Number of neighbors each classifier labels correctly.
    pub fn count_hits(&self, neighbors: &[usize]) -> Vec<f64> {
        let mut row = vec![0.0; self.n_classifiers()];
        for &idx in neighbors {
            for (acc, &hit) in row.iter_mut().zip(self.hits.row_slice(idx)) {
                if hit {
                    *acc += 1.0;
                }
            }
        }
        row
    }

    fn count_hits_batch(&self, neighbors: &NeighborSet) -> Result<Array2<f64>> {
        let rows: Vec<Vec<f64>> = (0..neighbors.n_queries())
            .into_par_iter()
            .map(|q| self.count_hits(neighbors.indices(q)))
            .collect();
        Ok(Array2::from_shape_vec(
            (rows.len(), self.n_classifiers()),
            rows.concat(),
        )?)
    }
}

pub trait CompetenceEstimator: Send + Sync {
    /// Competence of every classifier for every query.
    ///
    /// `query_meta` holds the queries' output profiles, `neighbors` the
    /// caller-supplied region of competence in the raw feature space.
    fn estimate(
        &self,
        ctx: &CompetenceContext<'_>,
        query_meta: &Array2<f64>,
        neighbors: &NeighborSet,
    ) -> Result<Array2<f64>>;

    fn name(&self) -> &str {
        "competence"
    }
}

/// Counts, over the supplied neighbors, how many each classifier gets right.
///
/// With k neighbors every competence is an integer in `0..=k`; a query with
/// no neighbors gets an all-zero row.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnopCompetence;

impl CompetenceEstimator for KnopCompetence {
    fn estimate(
        &self,
        ctx: &CompetenceContext<'_>,
        query_meta: &Array2<f64>,
        neighbors: &NeighborSet,
    ) -> Result<Array2<f64>> {
        if neighbors.n_queries() != query_meta.nrows() {
            return Err(DesError::shape(
                "KnopCompetence neighbors",
                query_meta.nrows(),
                neighbors.n_queries(),
            ));
        }
        ctx.count_hits_batch(neighbors)
    }

    fn name(&self) -> &str {
        "knop"
    }
}

/// Counts hits over the `k` DSEL samples whose output profiles are closest
/// to the query's own profile. The caller-supplied neighbors are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputProfileCompetence;

impl CompetenceEstimator for OutputProfileCompetence {
    fn estimate(
        &self,
        ctx: &CompetenceContext<'_>,
        query_meta: &Array2<f64>,
        _neighbors: &NeighborSet,
    ) -> Result<Array2<f64>> {
        let k = ctx.k.min(ctx.y_dsel.len());
        let profile_neighbors = ctx.ranking.kneighbors(query_meta, k)?;
        log::trace!(
            "Output profile neighborhoods of size {} for {} queries",
            k,
            query_meta.nrows()
        );
        ctx.count_hits_batch(&profile_neighbors)
    }

    fn name(&self) -> &str {
        "output-profile"
    }
}
