use agent::PlaceCellParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Whole-run history: the parameter set after every episode, the per-episode
/// reward and latency series, and each episode's coordinate trajectory.
#[derive(Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub params: Vec<PlaceCellParams>,
    pub rewards: Vec<f32>,
    pub latencies: Vec<usize>,
    pub positions: Vec<Vec<f32>>,
}

impl Snapshot {
    /// Write the snapshot as pretty-printed JSON, creating parent directories
    /// as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, self)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let snapshot = serde_json::from_reader(file)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(snapshot)
    }
}
