//! Instance hardness of a region of competence.
use crate::math::argmax_first;
use crate::neighbors::NeighborSet;

/// Fraction of the first `safe_k` neighbors outside the region's majority
/// class: `(safe_k - majority_count) / safe_k`.
///
/// A query without neighbors is maximally hard (1.0).
pub fn hardness_region_competence(
    neighbors: &NeighborSet,
    y_dsel: &[usize],
    safe_k: usize,
) -> Vec<f64> {
    (0..neighbors.n_queries())
        .map(|q| {
            let region = neighbors.indices(q);
            let region = &region[..safe_k.min(region.len())];
            if region.is_empty() {
                return 1.0;
            }
            let majority = majority_count(region.iter().map(|&i| y_dsel[i]));
            (region.len() - majority) as f64 / region.len() as f64
        })
        .collect()
}

/// Majority label among the neighbors of each query, lowest label on ties.
/// `None` for queries without neighbors.
pub fn neighbor_majority(neighbors: &NeighborSet, y_dsel: &[usize]) -> Vec<Option<usize>> {
    (0..neighbors.n_queries())
        .map(|q| {
            let labels: Vec<usize> = neighbors.indices(q).iter().map(|&i| y_dsel[i]).collect();
            let n_classes = labels.iter().copied().max()? + 1;
            let mut votes = vec![0usize; n_classes];
            for label in labels {
                votes[label] += 1;
            }
            argmax_first(&votes)
        })
        .collect()
}

fn majority_count(labels: impl Iterator<Item = usize>) -> usize {
    let mut counts: Vec<usize> = Vec::new();
    for label in labels {
        if label >= counts.len() {
            counts.resize(label + 1, 0);
        }
        counts[label] += 1;
    }
    counts.into_iter().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Array2;

    #[test]
    fn test_hardness_values() {
        let neighbors = NeighborSet::new(
            Array2::from_shape_vec((2, 4), vec![0, 1, 2, 3, 0, 2, 1, 3]).unwrap(),
            Array2::zeros((2, 4)),
        )
        .unwrap();
        let y = [0, 0, 1, 1];
        let hardness = hardness_region_competence(&neighbors, &y, 3);
        // first three of row 0: 0,0,1 -> 1/3 ; row 1: 0,1,0 -> 1/3
        assert!((hardness[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((hardness[1] - 1.0 / 3.0).abs() < 1e-12);

        let pure = hardness_region_competence(&neighbors, &y, 2);
        assert_eq!(pure[0], 0.0);
    }

    #[test]
    fn test_empty_region_is_hard() {
        let hardness = hardness_region_competence(&NeighborSet::empty(2), &[0, 1], 3);
        assert_eq!(hardness, vec![1.0, 1.0]);
    }

    #[test]
    fn test_neighbor_majority() {
        let neighbors = NeighborSet::single(vec![0, 2, 3], vec![0.0; 3]).unwrap();
        assert_eq!(neighbor_majority(&neighbors, &[0, 0, 1, 1]), vec![Some(1)]);
        assert_eq!(neighbor_majority(&NeighborSet::empty(1), &[0]), vec![None]);
    }
}
