//! Dynamic frienemy pruning (DFP).
//!
//! When a query's region of competence spans more than one class (an
//! indecision region), only classifiers that label correctly at least one
//! neighbor of two different classes stay eligible.
use std::collections::BTreeSet;

use crate::math::Array2;
use crate::neighbors::NeighborSet;

/// Compute a `(queries, classifiers)` eligibility mask.
///
/// The indecision test looks at the first `safe_k` neighbors; the
/// per-classifier check uses the whole neighborhood. A row where every
/// classifier would be pruned is reset to all true.
pub fn frienemy_pruning(
    neighbors: &NeighborSet,
    y_dsel: &[usize],
    hits: &Array2<bool>,
    safe_k: usize,
) -> Array2<bool> {
    let n_classifiers = hits.ncols();
    let mut mask = Array2::from_elem((neighbors.n_queries(), n_classifiers), true);

    for q in 0..neighbors.n_queries() {
        let region = neighbors.indices(q);
        let safe = &region[..safe_k.min(region.len())];
        let region_classes: BTreeSet<usize> = safe.iter().map(|&i| y_dsel[i]).collect();
        if region_classes.len() <= 1 {
            continue;
        }

        let row = mask.row_slice_mut(q);
        for (clf, eligible) in row.iter_mut().enumerate() {
            let correct_classes: BTreeSet<usize> = region
                .iter()
                .filter(|&&i| hits[(i, clf)])
                .map(|&i| y_dsel[i])
                .collect();
            *eligible = correct_classes.len() > 1;
        }
        if row.iter().all(|&eligible| !eligible) {
            row.iter_mut().for_each(|eligible| *eligible = true);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_region_keeps_everyone() {
        let hits = Array2::from_elem((3, 2), false);
        let neighbors = NeighborSet::single(vec![0, 1, 2], vec![0.0; 3]).unwrap();
        let mask = frienemy_pruning(&neighbors, &[1, 1, 1], &hits, 3);
        assert_eq!(mask.row_slice(0), &[true, true]);
    }

    #[test]
    fn test_indecision_region_prunes() {
        // clf 0 is right on both classes, clf 1 only on class 0
        let hits = Array2::from_shape_vec(
            (4, 2),
            vec![true, true, true, true, true, false, false, false],
        )
        .unwrap();
        let neighbors = NeighborSet::single(vec![0, 1, 2, 3], vec![0.0; 4]).unwrap();
        let mask = frienemy_pruning(&neighbors, &[0, 0, 1, 1], &hits, 4);
        assert_eq!(mask.row_slice(0), &[true, false]);
    }

    #[test]
    fn test_all_pruned_resets() {
        let hits = Array2::from_shape_vec((2, 2), vec![true, true, false, false]).unwrap();
        let neighbors = NeighborSet::single(vec![0, 1], vec![0.0; 2]).unwrap();
        let mask = frienemy_pruning(&neighbors, &[0, 1], &hits, 2);
        assert_eq!(mask.row_slice(0), &[true, true]);
    }
}
