//! Performance scoring and cross-session aggregation

pub mod scoring;
pub mod tracker;

pub use scoring::{DecisionScore, Scorer, SessionScore};
pub use tracker::{GlobalStats, Tracker};
