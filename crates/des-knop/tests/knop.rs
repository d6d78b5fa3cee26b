//! Fixture-driven tests of the KNOP pipeline.
mod common;

use common::*;
use des_knop::competence::{CompetenceContext, CompetenceEstimator, OutputProfileCompetence};
use des_knop::math::Array2;
use des_knop::models::Classifier;
use des_knop::{DesConfig, DesError, DfpMask, Knop, NeighborSet, Result, SelectionMode};

fn fitted_knop(config: DesConfig) -> Knop {
    let mut knop = Knop::new(create_pool_classifiers(), config).expect("valid pool");
    knop.fit(&x_dsel(), &y_dsel()).expect("fit");
    knop
}

fn pool_predictions(knop: &Knop, query: &Array2<f64>) -> Array2<usize> {
    knop.pool().predict_all(query).expect("predictions")
}

const EXPECTED: [[f64; 3]; 3] = [[4.0, 3.0, 4.0], [5.0, 2.0, 5.0], [2.0, 5.0, 2.0]];

// ---------------------------------------------------------------------------
// Construction and fit
// ---------------------------------------------------------------------------

/// A linear model that only exposes a decision margin.
struct Perceptron;

impl Classifier for Perceptron {
    fn n_classes(&self) -> usize {
        2
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        Ok(x.rows().map(|r| usize::from(r.iter().sum::<f64>() > 0.0)).collect())
    }
}

#[test]
fn rejects_pool_without_predict_proba() {
    let pool: Vec<Box<dyn Classifier>> = vec![Box::new(Perceptron), Box::new(Perceptron)];
    match Knop::new(pool, DesConfig::default()) {
        Err(DesError::Configuration(msg)) => assert!(msg.contains("predict_proba")),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("a pool without probabilities must be rejected"),
    }
}

#[test]
fn fit_builds_output_profiles() {
    let knop = fitted_knop(DesConfig::default());
    let scores = knop.dsel_scores().unwrap();
    assert_eq!(scores.shape(), (15, 6));
    for row in scores.rows() {
        assert_eq!(row, &[0.5, 0.5, 1.0, 0.0, 0.33, 0.67]);
    }
}

#[test]
fn ranking_model_is_fitted_on_output_profiles() {
    let knop = fitted_knop(DesConfig::default());
    let fit_data = knop.ranking_model().fit_data().expect("ranking model fitted");
    assert_eq!(fit_data, knop.dsel_scores().unwrap());
    assert_ne!(fit_data.shape(), x_dsel().shape());
}

#[test]
fn calls_before_fit_fail() {
    let knop = Knop::new(create_pool_classifiers(), DesConfig::default()).unwrap();
    let q = queries(1);
    assert!(matches!(
        knop.select(&q, &neighbors_row(0), &DfpMask::All),
        Err(DesError::NotFitted(_))
    ));
    assert!(matches!(
        knop.predict(&q, &neighbors_row(0)),
        Err(DesError::NotFitted(_))
    ));
}

#[test]
fn fit_rejects_label_count_mismatch() {
    let mut knop = Knop::new(create_pool_classifiers(), DesConfig::default()).unwrap();
    let mut y = y_dsel();
    y.pop();
    assert!(matches!(
        knop.fit(&x_dsel(), &y),
        Err(DesError::ShapeMismatch { .. })
    ));
    assert!(!knop.is_fitted());
}

#[test]
fn fit_rejects_empty_dsel() {
    let mut knop = Knop::new(create_pool_classifiers(), DesConfig::default()).unwrap();
    let empty: Array2<f64> = Array2::zeros((0, 2));
    assert!(matches!(
        knop.fit(&empty, &[]),
        Err(DesError::Configuration(_))
    ));
    assert!(!knop.is_fitted());
}

// ---------------------------------------------------------------------------
// Competence estimation
// ---------------------------------------------------------------------------

#[test]
fn estimate_competence_single_query() {
    let knop = fitted_knop(DesConfig::default());
    for (index, expected) in EXPECTED.iter().enumerate() {
        let competence = knop
            .estimate_competence(&queries(1), &neighbors_row(index), &DfpMask::All)
            .unwrap();
        assert_eq!(competence.shape(), (1, 3));
        assert_eq!(competence.row_slice(0), expected, "scenario {}", index);
    }
}

#[test]
fn estimate_competence_batch_matches_singles() {
    let knop = fitted_knop(DesConfig::default());
    let batch = knop
        .estimate_competence(&queries(3), &neighbors_all(), &DfpMask::All)
        .unwrap();
    assert_eq!(batch.shape(), (3, 3));
    for (index, expected) in EXPECTED.iter().enumerate() {
        assert_eq!(batch.row_slice(index), expected);
        let single = knop
            .estimate_competence(&queries(1), &neighbors_row(index), &DfpMask::All)
            .unwrap();
        assert_eq!(batch.row_slice(index), single.row_slice(0));
    }
}

#[test]
fn estimate_competence_without_neighbors_is_zero() {
    let knop = fitted_knop(DesConfig::default());
    let competence = knop
        .estimate_competence(&queries(2), &NeighborSet::empty(2), &DfpMask::All)
        .unwrap();
    assert!(competence.as_slice().iter().all(|&c| c == 0.0));

    let selected = knop
        .select(&queries(2), &NeighborSet::empty(2), &DfpMask::All)
        .unwrap();
    assert!(selected.as_slice().iter().all(|&s| s));
}

#[test]
fn dfp_mask_zeroes_competence() {
    let knop = fitted_knop(DesConfig::default());
    let competence = knop
        .estimate_competence(
            &queries(1),
            &neighbors_row(0),
            &DfpMask::Broadcast(vec![true, true, false]),
        )
        .unwrap();
    assert_eq!(competence.row_slice(0), &[4.0, 3.0, 0.0]);
}

#[test]
fn estimate_competence_is_idempotent() {
    let knop = fitted_knop(DesConfig::default());
    let first = knop
        .estimate_competence(&queries(3), &neighbors_all(), &DfpMask::All)
        .unwrap();
    let second = knop
        .estimate_competence(&queries(3), &neighbors_all(), &DfpMask::All)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn neighbor_index_outside_dsel_is_rejected() {
    let knop = fitted_knop(DesConfig::default());
    let nb = NeighborSet::single(vec![0, 15], vec![0.1, 0.2]).unwrap();
    assert!(matches!(
        knop.estimate_competence(&queries(1), &nb, &DfpMask::All),
        Err(DesError::ShapeMismatch { .. })
    ));
}

#[test]
fn output_profile_competence_uses_profile_neighbors() {
    let mut knop = Knop::with_estimator(
        create_pool_classifiers(),
        DesConfig::default(),
        Box::new(OutputProfileCompetence),
    )
    .unwrap();
    knop.fit(&x_dsel(), &y_dsel()).unwrap();
    // every profile is identical, so the first seven DSEL samples are chosen
    // whatever neighbors the caller passes
    let competence = knop
        .estimate_competence(&queries(1), &neighbors_row(2), &DfpMask::All)
        .unwrap();
    assert_eq!(competence.row_slice(0), &[4.0, 3.0, 4.0]);
}

// ---------------------------------------------------------------------------
// Selection and classification
// ---------------------------------------------------------------------------

struct ZeroCompetence;

impl CompetenceEstimator for ZeroCompetence {
    fn estimate(
        &self,
        ctx: &CompetenceContext<'_>,
        query_meta: &Array2<f64>,
        _neighbors: &NeighborSet,
    ) -> Result<Array2<f64>> {
        Ok(Array2::zeros((query_meta.nrows(), ctx.n_classifiers())))
    }
}

#[test]
fn zero_competence_selects_whole_pool() {
    let mut knop = Knop::with_estimator(
        create_pool_classifiers(),
        DesConfig::default(),
        Box::new(ZeroCompetence),
    )
    .unwrap();
    knop.fit(&x_dsel(), &y_dsel()).unwrap();
    let selected = knop
        .select(&queries(1), &neighbors_row(0), &DfpMask::All)
        .unwrap();
    assert_eq!(selected.row_slice(0), &[true, true, true]);
}

#[test]
fn select_keeps_maximal_classifiers() {
    let knop = fitted_knop(DesConfig::default());
    let selected = knop
        .select(&queries(3), &neighbors_all(), &DfpMask::All)
        .unwrap();
    assert_eq!(selected.row_slice(0), &[true, false, true]);
    assert_eq!(selected.row_slice(1), &[true, false, true]);
    assert_eq!(selected.row_slice(2), &[false, true, false]);
}

#[test]
fn classify_instance_single_query() {
    let knop = fitted_knop(DesConfig::default());
    let query = queries(1);
    let predictions = pool_predictions(&knop, &query);
    for (index, expected) in [0usize, 0, 1].iter().enumerate() {
        let label = knop
            .classify_instance(&query, &predictions, &neighbors_row(index), &DfpMask::All)
            .unwrap();
        assert_eq!(label, vec![*expected], "scenario {}", index);
    }
}

#[test]
fn classify_instance_batch() {
    for mode in [
        SelectionMode::Selection,
        SelectionMode::Weighting,
        SelectionMode::Hybrid,
    ] {
        let knop = fitted_knop(DesConfig::default().with_mode(mode));
        let query = queries(3);
        let predictions = pool_predictions(&knop, &query);
        let labels = knop
            .classify_instance(&query, &predictions, &neighbors_all(), &DfpMask::All)
            .unwrap();
        assert_eq!(labels, vec![0, 0, 1], "mode {:?}", mode);

        let again = knop
            .classify_instance(&query, &predictions, &neighbors_all(), &DfpMask::All)
            .unwrap();
        assert_eq!(labels, again);
    }
}

#[test]
fn classify_instance_rejects_prediction_shape() {
    let knop = fitted_knop(DesConfig::default());
    let predictions = Array2::from_shape_vec((1, 2), vec![0, 1]).unwrap();
    assert!(matches!(
        knop.classify_instance(&queries(1), &predictions, &neighbors_row(0), &DfpMask::All),
        Err(DesError::ShapeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn predict_rejects_query_with_wrong_feature_count() {
    // Scenario 2 is easy under IH and every route would settle it without
    // competence estimation.
    let knop = fitted_knop(DesConfig::default().with_ih(0.3).with_safe_k(3));
    let narrow = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
    assert!(matches!(
        knop.predict(&narrow, &neighbors_row(2)),
        Err(DesError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        knop.predict_proba(&narrow, &neighbors_row(2)),
        Err(DesError::ShapeMismatch { .. })
    ));
}

#[test]
fn predict_matches_classify_instance() {
    let knop = fitted_knop(DesConfig::default());
    assert_eq!(knop.predict(&queries(3), &neighbors_all()).unwrap(), vec![0, 0, 1]);
}

#[test]
fn predict_with_instance_hardness_uses_neighbor_majority() {
    // Scenario 2 has neighbors 5,3,4,8,10 of class 1 first: safe_k = 3 is pure.
    let knop = fitted_knop(DesConfig::default().with_ih(0.3).with_safe_k(3));
    let labels = knop.predict(&queries(3), &neighbors_all()).unwrap();
    assert_eq!(labels[2], 1);
    // scenario 0 starts with 8 (1), 11 (0), 4 (1): hardness 1/3 > 0.3, DES decides
    assert_eq!(labels[0], 0);
}

#[test]
fn predict_with_dfp_keeps_pool_when_all_pruned() {
    // Constant classifiers are only ever right on one class, so pruning
    // removes everyone and falls back to the whole pool.
    let knop = fitted_knop(DesConfig::default().with_dfp(true));
    let mask = knop.dfp_mask(&neighbors_all()).unwrap();
    match mask {
        DfpMask::PerQuery(mask) => assert!(mask.as_slice().iter().all(|&m| m)),
        other => panic!("expected a per-query mask, got {:?}", other),
    }
    assert_eq!(knop.predict(&queries(3), &neighbors_all()).unwrap(), vec![0, 0, 1]);
}

#[test]
fn predict_proba_rows_sum_to_one() {
    let knop = fitted_knop(DesConfig::default());
    let proba = knop.predict_proba(&queries(3), &neighbors_all()).unwrap();
    assert_eq!(proba.shape(), (3, 2));
    for row in proba.rows() {
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
    // scenario 0 selects classifiers 0 and 2
    assert!((proba[(0, 0)] - (0.5 + 0.33) / 2.0).abs() < 1e-9);
    // scenario 2 selects classifier 1 only
    assert_eq!(proba.row_slice(2), &[1.0, 0.0]);
}
