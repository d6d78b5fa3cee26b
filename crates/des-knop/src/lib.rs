//! des-knop: dynamic ensemble selection with k-nearest output profiles.
//!
//! Given a pool of pre-trained probabilistic classifiers and a held-out
//! dynamic selection set (DSEL), a [`Knop`] instance estimates, for every
//! query, how competent each base classifier is in the query's region of
//! competence and aggregates the votes of the most competent ones.
//!
//! The crate keeps the moving parts small and swappable: the competence
//! rule is a [`competence::CompetenceEstimator`] strategy, the meta-space
//! model is a [`ranking::RankingModel`], and neighbors in the raw feature
//! space are always supplied by the caller as a [`NeighborSet`].
pub mod competence;
pub mod config;
pub mod dfp;
pub mod error;
pub mod hardness;
pub mod knn;
pub mod knop;
pub mod logging;
pub mod math;
pub mod meta_features;
pub mod models;
pub mod neighbors;
pub mod pool;
pub mod ranking;
pub mod selection;

pub use config::{DesConfig, MetaEncoding, SelectionMode};
pub use error::{DesError, Result};
pub use knop::Knop;
pub use neighbors::{DfpMask, NeighborSet};
pub use pool::Pool;
