//! Experiment outputs: JSON snapshots and SVG figures.

mod figures;
mod snapshot;

pub use figures::{learning_curve, place_fields, trajectory};
pub use snapshot::Snapshot;
