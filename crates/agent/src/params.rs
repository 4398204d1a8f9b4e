use serde::{Deserialize, Serialize};

/// The five jointly learned parameter groups of the place-cell agent.
///
/// `actor` is row-major by cell: the weight from cell `i` to action `a` sits
/// at `i * n_actions + a`. Every update preserves the length of every group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceCellParams {
    /// Field centers, one per cell.
    pub centers: Vec<f32>,
    /// Field widths (sigma), one per cell.
    pub widths: Vec<f32>,
    /// Field gains (alpha); the activation carries the squared gain.
    pub gains: Vec<f32>,
    /// Actor weights, `n_cells * n_actions`.
    pub actor: Vec<f32>,
    /// Critic weights, one per cell.
    pub critic: Vec<f32>,
    n_actions: usize,
}

impl PlaceCellParams {
    /// Homogeneous population: centers evenly spaced over the track, constant
    /// width and gain, zero actor/critic weights.
    #[must_use]
    pub fn uniform(n_cells: usize, n_actions: usize, width: f32, gain: f32, size: f32) -> Self {
        let centers = (0..n_cells)
            .map(|i| {
                if n_cells < 2 {
                    0.0
                } else {
                    -size + 2.0 * size * i as f32 / (n_cells - 1) as f32
                }
            })
            .collect();
        Self {
            centers,
            widths: vec![width; n_cells],
            gains: vec![gain; n_cells],
            actor: vec![0.0; n_cells * n_actions],
            critic: vec![0.0; n_cells],
            n_actions,
        }
    }

    /// Heterogeneous population: centers scattered uniformly over the track,
    /// widths and gains drawn uniformly from `(0, 2*width]` and `(0, 2*gain]`.
    #[must_use]
    pub fn scattered(
        n_cells: usize,
        n_actions: usize,
        width: f32,
        gain: f32,
        size: f32,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let centers = (0..n_cells).map(|_| size * (2.0 * rng.f32() - 1.0)).collect();
        // 1 - f32() lies in (0, 1], keeping widths and gains strictly positive.
        let widths = (0..n_cells).map(|_| 2.0 * width * (1.0 - rng.f32())).collect();
        let gains = (0..n_cells).map(|_| 2.0 * gain * (1.0 - rng.f32())).collect();
        Self {
            centers,
            widths,
            gains,
            actor: vec![0.0; n_cells * n_actions],
            critic: vec![0.0; n_cells],
            n_actions,
        }
    }

    /// Number of place cells.
    #[must_use]
    pub fn n_cells(&self) -> usize {
        self.centers.len()
    }

    /// Number of discrete actions the actor head scores.
    #[must_use]
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Lengths of every group, in fixed order; used by shape-invariance checks.
    #[must_use]
    pub fn shape(&self) -> [usize; 5] {
        [
            self.centers.len(),
            self.widths.len(),
            self.gains.len(),
            self.actor.len(),
            self.critic.len(),
        ]
    }

    /// Largest gain in the population; logged per episode.
    #[must_use]
    pub fn max_gain(&self) -> f32 {
        self.gains.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}
