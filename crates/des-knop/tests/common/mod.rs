//! Shared fixture: 15 DSEL samples, a pool of three constant classifiers and
//! three precomputed 7-neighborhoods.
#![allow(dead_code)]

use des_knop::math::Array2;
use des_knop::models::dummy::DummyClassifier;
use des_knop::models::Classifier;
use des_knop::NeighborSet;

pub fn x_dsel() -> Array2<f64> {
    Array2::from_shape_vec(
        (15, 2),
        vec![
            -1.0, 1.0, //
            -0.75, 0.5, //
            -1.5, 1.5, //
            1.0, 1.0, //
            0.75, 0.5, //
            1.5, 1.5, //
            1.0, -1.0, //
            -0.5, 0.5, //
            0.5, 0.5, //
            0.0, -1.0, //
            0.75, -0.75, //
            0.0, 0.0, //
            -1.0, -1.0, //
            0.0, -0.5, //
            1.0, -1.0,
        ],
    )
    .expect("fixture shape")
}

pub fn y_dsel() -> Vec<usize> {
    vec![0, 0, 0, 1, 1, 1, 0, 0, 1, 1, 1, 0, 1, 0, 0]
}

/// Neighbor indices in the raw feature space, one row per scenario.
pub const NEIGHBORS: [[usize; 7]; 3] = [
    [8, 11, 4, 7, 13, 10, 1],
    [7, 1, 11, 13, 0, 8, 4],
    [5, 3, 4, 8, 10, 11, 7],
];

pub const DISTANCES: [[f64; 7]; 3] = [
    [0.35355339, 0.35355339, 0.55901699, 0.79056942, 0.79056942, 0.90138782, 1.03077641],
    [0.3, 0.39051248, 0.53851648, 0.86023253, 0.94339811, 1.04403065, 1.28549601],
    [0.70710678, 1.41421356, 1.95256242, 2.12132034, 2.79508497, 2.82842712, 2.91547595],
];

pub fn neighbors_row(index: usize) -> NeighborSet {
    NeighborSet::single(NEIGHBORS[index].to_vec(), DISTANCES[index].to_vec()).expect("fixture")
}

pub fn neighbors_all() -> NeighborSet {
    NeighborSet::new(
        Array2::from_rows(NEIGHBORS.iter().map(|r| r.to_vec()).collect()).expect("fixture"),
        Array2::from_rows(DISTANCES.iter().map(|r| r.to_vec()).collect()).expect("fixture"),
    )
    .expect("fixture")
}

pub fn create_pool_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(DummyClassifier::constant(0, vec![0.5, 0.5]).expect("fixture")),
        Box::new(DummyClassifier::constant(1, vec![1.0, 0.0]).expect("fixture")),
        Box::new(DummyClassifier::constant(0, vec![0.33, 0.67]).expect("fixture")),
    ]
}

pub fn queries(n: usize) -> Array2<f64> {
    Array2::from_elem((n, 2), 1.0)
}
