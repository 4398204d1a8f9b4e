//! Place-cell actor-critic agent.
//!
//! The agent approximates both policy and value with a shared population of
//! localized basis functions ("place cells") over a one-dimensional track.
//! [`params`] holds the five jointly learned parameter groups, [`model`] the
//! forward computations, and [`trainer`] the per-episode TD update rule.

pub mod model;
pub mod params;
pub mod trainer;

pub use params::PlaceCellParams;
pub use trainer::{Backprop, EpisodeReport, LearningRates, ParamGroup, TdConfig, TdTrainer};
