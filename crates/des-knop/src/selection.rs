//! Turning competences into selections and selections into labels.
use crate::config::SelectionMode;
use crate::error::{DesError, Result};
use crate::math::{argmax_first, Array2};

/// Selection mask per query.
///
/// A row whose competences are all zero selects the whole pool, so no query
/// is ever left without voters.
pub fn select(competence: &Array2<f64>, mode: SelectionMode) -> Array2<bool> {
    let mut mask = Array2::from_elem(competence.shape(), false);
    for (q, row) in competence.rows().enumerate() {
        let out = mask.row_slice_mut(q);
        if row.iter().all(|&c| c == 0.0) {
            out.iter_mut().for_each(|m| *m = true);
            continue;
        }
        match mode {
            SelectionMode::Selection | SelectionMode::Hybrid => {
                let best = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                for (m, &c) in out.iter_mut().zip(row) {
                    *m = c == best;
                }
            }
            SelectionMode::Weighting => {
                for (m, &c) in out.iter_mut().zip(row) {
                    *m = c > 0.0;
                }
            }
        }
    }
    mask
}

/// Vote weights per query derived from competences and the selection mask.
///
/// `Selection` gives every selected classifier weight 1; `Weighting` and
/// `Hybrid` use the competences of the selected classifiers. Rows that end
/// up with no positive weight fall back to uniform weights.
pub fn vote_weights(competence: &Array2<f64>, mode: SelectionMode) -> Array2<f64> {
    let mask = select(competence, mode);
    let mut weights = Array2::zeros(competence.shape());
    for q in 0..competence.nrows() {
        let row = weights.row_slice_mut(q);
        for (j, w) in row.iter_mut().enumerate() {
            if mask[(q, j)] {
                *w = match mode {
                    SelectionMode::Selection => 1.0,
                    SelectionMode::Weighting | SelectionMode::Hybrid => competence[(q, j)],
                };
            }
        }
        if row.iter().all(|&w| w <= 0.0) {
            row.iter_mut().for_each(|w| *w = 1.0);
        }
    }
    weights
}

/// Label with the largest summed weight; lowest label on ties.
///
/// Labels outside `0..n_classes` carry no vote.
pub fn weighted_majority_vote(predictions: &[usize], weights: &[f64], n_classes: usize) -> usize {
    let mut votes = vec![0.0; n_classes];
    for (&label, &w) in predictions.iter().zip(weights) {
        if let Some(v) = votes.get_mut(label) {
            *v += w;
        }
    }
    argmax_first(&votes).unwrap_or(0)
}

/// Label with the most votes among the selected classifiers.
pub fn majority_vote(predictions: &[usize], selected: &[bool], n_classes: usize) -> usize {
    let weights: Vec<f64> = selected.iter().map(|&s| f64::from(u8::from(s))).collect();
    weighted_majority_vote(predictions, &weights, n_classes)
}

/// Combine per-classifier labels (`predictions`, queries x classifiers) into
/// one label per query.
pub fn aggregate(
    predictions: &Array2<usize>,
    competence: &Array2<f64>,
    mode: SelectionMode,
    n_classes: usize,
) -> Result<Vec<usize>> {
    if predictions.shape() != competence.shape() {
        return Err(DesError::shape(
            "predictions vs competence",
            competence.shape(),
            predictions.shape(),
        ));
    }
    if let Some(&bad) = predictions.as_slice().iter().find(|&&l| l >= n_classes) {
        return Err(DesError::Configuration(format!(
            "predicted label {} out of range for {} classes",
            bad, n_classes
        )));
    }
    let weights = vote_weights(competence, mode);
    Ok(predictions
        .rows()
        .zip(weights.rows())
        .map(|(labels, w)| weighted_majority_vote(labels, w, n_classes))
        .collect())
}

/// Weighted average of the pool's probability outputs, one row per query.
pub fn aggregate_proba(
    probas: &[Array2<f64>],
    competence: &Array2<f64>,
    mode: SelectionMode,
) -> Result<Array2<f64>> {
    if probas.len() != competence.ncols() {
        return Err(DesError::shape(
            "probabilities vs classifiers",
            competence.ncols(),
            probas.len(),
        ));
    }
    let n_queries = competence.nrows();
    let n_classes = probas.first().map_or(0, |p| p.ncols());
    let weights = vote_weights(competence, mode);
    let mut out = Array2::zeros((n_queries, n_classes));

    for q in 0..n_queries {
        let w = weights.row_slice(q);
        let total: f64 = w.iter().sum();
        let row = out.row_slice_mut(q);
        for (proba, &wj) in probas.iter().zip(w) {
            for (acc, &p) in row.iter_mut().zip(proba.row_slice(q)) {
                *acc += wj * p;
            }
        }
        row.iter_mut().for_each(|p| *p /= total);
    }
    Ok(out)
}
