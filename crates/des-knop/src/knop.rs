//! k-Nearest Output Profiles (KNOP) dynamic ensemble selection.
use crate::competence::{CompetenceContext, CompetenceEstimator, KnopCompetence};
use crate::config::DesConfig;
use crate::dfp::frienemy_pruning;
use crate::error::{DesError, Result};
use crate::hardness::{hardness_region_competence, neighbor_majority};
use crate::knn::KNearestNeighbors;
use crate::math::Array2;
use crate::meta_features::MetaFeatureEncoder;
use crate::models::Classifier;
use crate::neighbors::{DfpMask, NeighborSet};
use crate::pool::Pool;
use crate::ranking::RankingModel;
use crate::selection;

/// State produced by `fit`, read-only afterwards.
struct Dsel {
    x: Array2<f64>,
    y: Vec<usize>,
    /// Output profiles of the DSEL samples.
    scores: Array2<f64>,
    hits: Array2<bool>,
}

impl Dsel {
    fn check_query(&self, query: &Array2<f64>) -> Result<()> {
        if query.ncols() != self.x.ncols() {
            return Err(DesError::shape(
                "query features vs DSEL features",
                self.x.ncols(),
                query.ncols(),
            ));
        }
        Ok(())
    }
}

pub struct Knop {
    pool: Pool,
    config: DesConfig,
    encoder: MetaFeatureEncoder,
    estimator: Box<dyn CompetenceEstimator>,
    roc_algorithm: Box<dyn RankingModel>,
    dsel: Option<Dsel>,
}

impl Knop {
    /// Build a KNOP selector over `pool`.
    ///
    /// Fails with [`DesError::Configuration`] if a classifier cannot estimate
    /// probabilities or the configuration is invalid.
    pub fn new(pool: Vec<Box<dyn Classifier>>, config: DesConfig) -> Result<Self> {
        Self::with_estimator(pool, config, Box::new(KnopCompetence))
    }

    /// Like [`Knop::new`] with a custom competence strategy.
    pub fn with_estimator(
        pool: Vec<Box<dyn Classifier>>,
        config: DesConfig,
        estimator: Box<dyn CompetenceEstimator>,
    ) -> Result<Self> {
        config.validate()?;
        let pool = Pool::new(pool)?;
        log::debug!(
            "KNOP with k={} mode={:?} competence={}",
            config.k,
            config.mode,
            estimator.name()
        );
        Ok(Self {
            pool,
            encoder: MetaFeatureEncoder::new(config.encoding),
            roc_algorithm: Box::new(KNearestNeighbors::new(config.k)),
            config,
            estimator,
            dsel: None,
        })
    }

    /// Replace the model fitted on the output profiles. Clears any fitted state.
    pub fn with_ranking_model(mut self, model: Box<dyn RankingModel>) -> Self {
        self.roc_algorithm = model;
        self.dsel = None;
        self
    }

    pub fn config(&self) -> &DesConfig {
        &self.config
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn n_classifiers(&self) -> usize {
        self.pool.len()
    }

    pub fn n_classes(&self) -> usize {
        self.pool.n_classes()
    }

    pub fn is_fitted(&self) -> bool {
        self.dsel.is_some()
    }

    fn fitted(&self) -> Result<&Dsel> {
        self.dsel.as_ref().ok_or(DesError::NotFitted("Knop"))
    }

    /// Output profiles of the DSEL samples, `(n_samples, profile width)`.
    pub fn dsel_scores(&self) -> Result<&Array2<f64>> {
        Ok(&self.fitted()?.scores)
    }

    /// Which classifier labels which DSEL sample correctly.
    pub fn dsel_hits(&self) -> Result<&Array2<bool>> {
        Ok(&self.fitted()?.hits)
    }

    pub fn dsel_labels(&self) -> Result<&[usize]> {
        Ok(&self.fitted()?.y)
    }

    pub fn ranking_model(&self) -> &dyn RankingModel {
        self.roc_algorithm.as_ref()
    }

    /// Fit on the dynamic selection set.
    ///
    /// Encodes DSEL into the output profile space, fits the ranking model on
    /// those profiles (never on the raw features) and records which
    /// classifier is right on which sample. Refitting replaces all state.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(DesError::shape("Knop::fit labels", x.nrows(), y.len()));
        }
        if y.is_empty() {
            return Err(DesError::Configuration(
                "the dynamic selection set is empty".to_string(),
            ));
        }
        let n_classes = self.pool.n_classes();
        if let Some(&bad) = y.iter().find(|&&l| l >= n_classes) {
            return Err(DesError::Configuration(format!(
                "DSEL label {} unknown to a pool of {} classes",
                bad, n_classes
            )));
        }
        if y.len() < self.config.k {
            log::warn!(
                "DSEL holds {} samples, fewer than k={}; output profile neighborhoods are truncated",
                y.len(),
                self.config.k
            );
        }

        self.dsel = None;
        let scores = self.encoder.encode(&self.pool, x)?;
        self.roc_algorithm.fit(&scores, y)?;

        let predictions = self.pool.predict_all(x)?;
        let mut hits = Array2::from_elem(predictions.shape(), false);
        for (i, row) in predictions.rows().enumerate() {
            for (j, &label) in row.iter().enumerate() {
                hits[(i, j)] = label == y[i];
            }
        }

        log::info!(
            "Fitted KNOP on {} DSEL samples, output profiles of width {}",
            y.len(),
            scores.ncols()
        );
        self.dsel = Some(Dsel {
            x: x.clone(),
            y: y.to_vec(),
            scores,
            hits,
        });
        Ok(())
    }

    /// Competence of every classifier for every query, `(queries, classifiers)`.
    ///
    /// `neighbors` holds each query's region of competence in the raw
    /// feature space; masked-out classifiers get competence 0.
    pub fn estimate_competence(
        &self,
        query: &Array2<f64>,
        neighbors: &NeighborSet,
        dfp_mask: &DfpMask,
    ) -> Result<Array2<f64>> {
        let dsel = self.fitted()?;
        dsel.check_query(query)?;
        neighbors.validate(query.nrows(), dsel.y.len())?;
        dfp_mask.validate(query.nrows(), self.n_classifiers())?;

        let query_meta = self.encoder.encode(&self.pool, query)?;
        let ctx = CompetenceContext {
            hits: &dsel.hits,
            y_dsel: &dsel.y,
            dsel_scores: &dsel.scores,
            ranking: self.roc_algorithm.as_ref(),
            k: self.config.k,
        };
        let mut competence = self.estimator.estimate(&ctx, &query_meta, neighbors)?;
        let expected = (query.nrows(), self.n_classifiers());
        if competence.shape() != expected {
            return Err(DesError::shape(
                "competence estimator output",
                expected,
                competence.shape(),
            ));
        }
        dfp_mask.apply(&mut competence);
        Ok(competence)
    }

    /// Selection mask, `(queries, classifiers)`.
    pub fn select(
        &self,
        query: &Array2<f64>,
        neighbors: &NeighborSet,
        dfp_mask: &DfpMask,
    ) -> Result<Array2<bool>> {
        let competence = self.estimate_competence(query, neighbors, dfp_mask)?;
        Ok(self.select_with(&competence))
    }

    /// Selection mask for an already computed competence matrix.
    pub fn select_with(&self, competence: &Array2<f64>) -> Array2<bool> {
        selection::select(competence, self.config.mode)
    }

    /// Final label per query given every classifier's label on it
    /// (`predictions`, `(queries, classifiers)`).
    pub fn classify_instance(
        &self,
        query: &Array2<f64>,
        predictions: &Array2<usize>,
        neighbors: &NeighborSet,
        dfp_mask: &DfpMask,
    ) -> Result<Vec<usize>> {
        let expected = (query.nrows(), self.n_classifiers());
        if predictions.shape() != expected {
            return Err(DesError::shape("predictions", expected, predictions.shape()));
        }
        let competence = self.estimate_competence(query, neighbors, dfp_mask)?;
        selection::aggregate(predictions, &competence, self.config.mode, self.n_classes())
    }

    /// Eligibility mask for `neighbors`: frienemy pruning when `dfp` is set.
    pub fn dfp_mask(&self, neighbors: &NeighborSet) -> Result<DfpMask> {
        if !self.config.dfp {
            return Ok(DfpMask::All);
        }
        let dsel = self.fitted()?;
        neighbors.validate(neighbors.n_queries(), dsel.y.len())?;
        Ok(DfpMask::PerQuery(frienemy_pruning(
            neighbors,
            &dsel.y,
            &dsel.hits,
            self.config.safe_k(),
        )))
    }

    /// Full prediction: k-NN rule for easy queries (when `with_ih`), the
    /// shared label when the pool agrees, dynamic selection otherwise.
    pub fn predict(&self, query: &Array2<f64>, neighbors: &NeighborSet) -> Result<Vec<usize>> {
        let dsel = self.fitted()?;
        dsel.check_query(query)?;
        neighbors.validate(query.nrows(), dsel.y.len())?;
        let predictions = self.pool.predict_all(query)?;
        let mut labels: Vec<Option<usize>> = vec![None; query.nrows()];

        if self.config.with_ih {
            let hardness = hardness_region_competence(neighbors, &dsel.y, self.config.safe_k());
            let knn_labels = neighbor_majority(neighbors, &dsel.y);
            for (q, label) in labels.iter_mut().enumerate() {
                if hardness[q] < self.config.ih_rate {
                    *label = knn_labels[q];
                }
            }
        }

        for (q, label) in labels.iter_mut().enumerate() {
            if label.is_some() {
                continue;
            }
            let row = predictions.row_slice(q);
            if row.iter().all(|&l| l == row[0]) {
                *label = Some(row[0]);
            }
        }

        let pending: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(q, l)| l.is_none().then_some(q))
            .collect();
        log::debug!(
            "{} of {} queries need dynamic selection",
            pending.len(),
            query.nrows()
        );

        if !pending.is_empty() {
            let sub_query = query.select_rows(&pending);
            let sub_neighbors = neighbors.select_rows(&pending);
            let sub_predictions = predictions.select_rows(&pending);
            let mask = self.dfp_mask(&sub_neighbors)?;
            let selected =
                self.classify_instance(&sub_query, &sub_predictions, &sub_neighbors, &mask)?;
            for (q, label) in pending.into_iter().zip(selected) {
                labels[q] = Some(label);
            }
        }

        labels
            .into_iter()
            .map(|l| l.ok_or_else(|| DesError::Model("query left without a label".to_string())))
            .collect()
    }

    /// Class probabilities combined from the selected classifiers,
    /// `(queries, classes)`; each row sums to one.
    pub fn predict_proba(
        &self,
        query: &Array2<f64>,
        neighbors: &NeighborSet,
    ) -> Result<Array2<f64>> {
        let dsel = self.fitted()?;
        dsel.check_query(query)?;
        neighbors.validate(query.nrows(), dsel.y.len())?;
        let mask = self.dfp_mask(neighbors)?;
        let competence = self.estimate_competence(query, neighbors, &mask)?;
        let probas = self.pool.predict_proba_all(query)?;
        selection::aggregate_proba(&probas, &competence, self.config.mode)
    }
}
