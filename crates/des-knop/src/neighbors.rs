//! Per-query regions of competence and DFP masks, passed explicitly to every
//! prediction-time call.
use crate::error::{DesError, Result};
use crate::math::Array2;

/// k nearest DSEL samples (indices and distances) for each query, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSet {
    indices: Array2<usize>,
    distances: Array2<f64>,
}

impl NeighborSet {
    pub fn new(indices: Array2<usize>, distances: Array2<f64>) -> Result<Self> {
        if indices.shape() != distances.shape() {
            return Err(DesError::shape(
                "NeighborSet distances",
                indices.shape(),
                distances.shape(),
            ));
        }
        Ok(Self { indices, distances })
    }

    /// Neighbors of a single query.
    pub fn single(indices: Vec<usize>, distances: Vec<f64>) -> Result<Self> {
        let k = indices.len();
        Self::new(
            Array2::from_shape_vec((1, k), indices)?,
            Array2::from_shape_vec((1, distances.len()), distances)?,
        )
    }

    /// `n_queries` queries without any neighbor (k = 0).
    pub fn empty(n_queries: usize) -> Self {
        Self {
            indices: Array2::zeros((n_queries, 0)),
            distances: Array2::zeros((n_queries, 0)),
        }
    }

    pub fn n_queries(&self) -> usize {
        self.indices.nrows()
    }

    pub fn k(&self) -> usize {
        self.indices.ncols()
    }

    pub fn indices(&self, query: usize) -> &[usize] {
        self.indices.row_slice(query)
    }

    pub fn distances(&self, query: usize) -> &[f64] {
        self.distances.row_slice(query)
    }

    pub fn index_matrix(&self) -> &Array2<usize> {
        &self.indices
    }

    pub fn distance_matrix(&self) -> &Array2<f64> {
        &self.distances
    }

    pub fn select_rows(&self, rows: &[usize]) -> NeighborSet {
        NeighborSet {
            indices: self.indices.select_rows(rows),
            distances: self.distances.select_rows(rows),
        }
    }

    /// Check the set against a batch of `n_queries` and a DSEL of `n_dsel` samples.
    pub fn validate(&self, n_queries: usize, n_dsel: usize) -> Result<()> {
        if self.n_queries() != n_queries {
            return Err(DesError::shape(
                "NeighborSet rows vs query rows",
                n_queries,
                self.n_queries(),
            ));
        }
        if let Some(&bad) = self.indices.as_slice().iter().find(|&&i| i >= n_dsel) {
            return Err(DesError::shape(
                "NeighborSet index vs DSEL size",
                format!("< {}", n_dsel),
                bad,
            ));
        }
        Ok(())
    }
}

/// Classifiers eligible for competence estimation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DfpMask {
    /// Every classifier is eligible for every query.
    #[default]
    All,
    /// One mask shared by every query of the batch.
    Broadcast(Vec<bool>),
    /// One mask row per query.
    PerQuery(Array2<bool>),
}

impl DfpMask {
    pub fn validate(&self, n_queries: usize, n_classifiers: usize) -> Result<()> {
        match self {
            DfpMask::All => Ok(()),
            DfpMask::Broadcast(mask) if mask.len() != n_classifiers => Err(DesError::shape(
                "DFP mask width",
                n_classifiers,
                mask.len(),
            )),
            DfpMask::Broadcast(_) => Ok(()),
            DfpMask::PerQuery(mask) if mask.shape() != (n_queries, n_classifiers) => Err(
                DesError::shape("DFP mask", (n_queries, n_classifiers), mask.shape()),
            ),
            DfpMask::PerQuery(_) => Ok(()),
        }
    }

    /// Mask row for `query`; `None` means every classifier is eligible.
    pub fn row(&self, query: usize) -> Option<&[bool]> {
        match self {
            DfpMask::All => None,
            DfpMask::Broadcast(mask) => Some(mask.as_slice()),
            DfpMask::PerQuery(mask) => Some(mask.row_slice(query)),
        }
    }

    /// Zero the competence of masked-out classifiers in place.
    pub fn apply(&self, competence: &mut Array2<f64>) {
        for q in 0..competence.nrows() {
            if let Some(mask) = self.row(q) {
                for (c, &keep) in competence.row_slice_mut(q).iter_mut().zip(mask) {
                    if !keep {
                        *c = 0.0;
                    }
                }
            }
        }
    }
}
