//! Per-episode TD actor-critic update over a rolled-out trajectory.

use std::str::FromStr;

use nav::Env;

use crate::model;
use crate::params::PlaceCellParams;

/// Which heads propagate the TD error into the field parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backprop {
    Actor,
    Critic,
    Both,
}

impl Backprop {
    fn through_actor(self) -> bool {
        matches!(self, Backprop::Actor | Backprop::Both)
    }

    fn through_critic(self) -> bool {
        matches!(self, Backprop::Critic | Backprop::Both)
    }
}

impl FromStr for Backprop {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actor" => Ok(Backprop::Actor),
            "critic" => Ok(Backprop::Critic),
            "both" => Ok(Backprop::Both),
            other => Err(format!("unknown backprop mode `{other}`")),
        }
    }
}

impl std::fmt::Display for Backprop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Backprop::Actor => "actor",
            Backprop::Critic => "critic",
            Backprop::Both => "both",
        };
        f.write_str(s)
    }
}

/// One of the five learned parameter groups, for selecting noise targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamGroup {
    Centers,
    Widths,
    Gains,
    Actor,
    Critic,
}

impl FromStr for ParamGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "centers" => Ok(ParamGroup::Centers),
            "widths" => Ok(ParamGroup::Widths),
            "gains" => Ok(ParamGroup::Gains),
            "actor" => Ok(ParamGroup::Actor),
            "critic" => Ok(ParamGroup::Critic),
            other => Err(format!("unknown parameter group `{other}`")),
        }
    }
}

impl std::fmt::Display for ParamGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParamGroup::Centers => "centers",
            ParamGroup::Widths => "widths",
            ParamGroup::Gains => "gains",
            ParamGroup::Actor => "actor",
            ParamGroup::Critic => "critic",
        };
        f.write_str(s)
    }
}

/// Fixed per-group learning rates.
#[derive(Clone, Copy, Debug)]
pub struct LearningRates {
    pub centers: f32,
    pub widths: f32,
    pub gains: f32,
    pub actor: f32,
    pub critic: f32,
}

/// Hyperparameters of the TD update.
#[derive(Clone, Debug)]
pub struct TdConfig {
    /// Discount factor.
    pub gamma: f32,
    /// Inverse temperature of the softmax action head.
    pub beta: f32,
    pub rates: LearningRates,
    pub backprop: Backprop,
    /// L2 decay on widths, applied with the width learning rate. 0 disables.
    pub l2_width: f32,
    /// L2 decay on gains, applied with the gain learning rate. 0 disables.
    pub l2_gain: f32,
    /// Magnitude clip for widths after each update. 0 disables.
    pub width_clip: f32,
    /// Magnitude clip for gains after each update. 0 disables.
    pub gain_clip: f32,
    /// Variance of Gaussian noise added to `noise_groups` after each update.
    pub noise: f32,
    pub noise_groups: Vec<ParamGroup>,
    /// Rollout horizon in steps.
    pub max_steps: usize,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            beta: 1.0,
            rates: LearningRates {
                centers: 1e-4,
                widths: 1e-4,
                gains: 1e-4,
                actor: 0.01,
                critic: 0.01,
            },
            backprop: Backprop::Both,
            l2_width: 0.0,
            l2_gain: 0.0,
            width_clip: 0.0,
            gain_clip: 0.0,
            noise: 0.0,
            noise_groups: vec![ParamGroup::Centers, ParamGroup::Widths, ParamGroup::Gains],
            max_steps: 100,
        }
    }
}

/// One episode of interaction. `positions` holds T+1 entries, the last being
/// the terminal position used to bootstrap the final value estimate.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub positions: Vec<f32>,
    pub actions: Vec<usize>,
    pub rewards: Vec<f32>,
}

/// Per-episode outcome returned by [`TdTrainer::episode`].
#[derive(Clone, Copy, Debug)]
pub struct EpisodeReport {
    pub total_reward: f32,
    pub latency: usize,
    /// Mean squared TD error over the trajectory.
    pub loss: f32,
}

/// Runs trials and applies the TD update to all five parameter groups.
pub struct TdTrainer<E: Env> {
    env: E,
    params: PlaceCellParams,
    cfg: TdConfig,
    rng: fastrand::Rng,
}

impl<E: Env> TdTrainer<E> {
    #[must_use]
    pub fn new(env: E, params: PlaceCellParams, cfg: TdConfig, seed: u64) -> Self {
        Self {
            env,
            params,
            cfg,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn params(&self) -> &PlaceCellParams {
        &self.params
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Consumes the trainer, handing the parameters back for the next goal.
    #[must_use]
    pub fn into_params(self) -> PlaceCellParams {
        self.params
    }

    /// Roll out one trial, update the parameters from its trajectory, and
    /// perturb the selected groups when noise is enabled.
    pub fn episode(&mut self) -> EpisodeReport {
        self.episode_with_trajectory().0
    }

    /// Like [`episode`], but hands the trajectory back for recording.
    ///
    /// [`episode`]: TdTrainer::episode
    pub fn episode_with_trajectory(&mut self) -> (EpisodeReport, Trajectory) {
        let (traj, total_reward, latency) = self.rollout();
        let loss = self.update(&traj);
        if self.cfg.noise > 0.0 {
            self.perturb();
        }
        (
            EpisodeReport {
                total_reward,
                latency,
                loss,
            },
            traj,
        )
    }

    /// Roll out one trial under the current policy.
    pub fn rollout(&mut self) -> (Trajectory, f32, usize) {
        let mut traj = Trajectory::default();
        let mut pos = self.env.reset();
        let mut total_reward = 0.0;
        let mut latency = self.cfg.max_steps;

        for t in 0..self.cfg.max_steps {
            let acts = model::activations(&self.params, pos);
            let probs = model::action_probs(&self.params, &acts, self.cfg.beta);
            let action = model::sample_action(&probs, &mut self.rng);
            let (next, reward, done) = self.env.step(action);

            traj.positions.push(pos);
            traj.actions.push(action);
            traj.rewards.push(reward);

            if reward > 0.0 && latency == self.cfg.max_steps {
                latency = t + 1;
            }
            total_reward += reward;
            pos = next;
            if done {
                break;
            }
        }
        // terminal position, for the bootstrap value
        traj.positions.push(pos);
        (traj, total_reward, latency)
    }

    /// Single pass over the trajectory: accumulate per-group gradients from
    /// the TD error at every step, then apply them with the per-group rates.
    ///
    /// The TD error is treated as a constant when differentiating, so the
    /// critic follows a semi-gradient rule and the actor the usual
    /// log-likelihood-ratio form. Field parameters receive the error through
    /// the heads enabled by [`Backprop`], chained through the activation
    /// derivatives with respect to center, width, and gain.
    pub fn update(&mut self, traj: &Trajectory) -> f32 {
        let n_steps = traj.actions.len();
        let npc = self.params.n_cells();
        let nact = self.params.n_actions();
        let cfg = &self.cfg;

        let acts: Vec<Vec<f32>> = traj
            .positions
            .iter()
            .map(|&x| model::activations(&self.params, x))
            .collect();
        let values: Vec<f32> = acts.iter().map(|a| model::value(&self.params, a)).collect();

        let mut g_centers = vec![0.0f32; npc];
        let mut g_widths = vec![0.0f32; npc];
        let mut g_gains = vec![0.0f32; npc];
        let mut g_actor = vec![0.0f32; npc * nact];
        let mut g_critic = vec![0.0f32; npc];
        let mut sq_error = 0.0f32;

        for t in 0..n_steps {
            let delta = traj.rewards[t] + cfg.gamma * values[t + 1] - values[t];
            sq_error += delta * delta;

            let x = traj.positions[t];
            let action = traj.actions[t];
            let probs = model::action_probs(&self.params, &acts[t], cfg.beta);

            for i in 0..npc {
                let act = acts[t][i];
                g_critic[i] += delta * act;
                for a in 0..nact {
                    let indicator = if a == action { 1.0 } else { 0.0 };
                    g_actor[i * nact + a] += delta * cfg.beta * (indicator - probs[a]) * act;
                }

                // signal reaching cell i's activation through the heads
                let mut signal = 0.0;
                if cfg.backprop.through_actor() {
                    let row = &self.params.actor[i * nact..(i + 1) * nact];
                    let expected: f32 = probs.iter().zip(row).map(|(&p, &w)| p * w).sum();
                    signal += cfg.beta * (row[action] - expected);
                }
                if cfg.backprop.through_critic() {
                    signal += 0.5 * self.params.critic[i];
                }
                let signal = delta * signal;

                let d = x - self.params.centers[i];
                let w = self.params.widths[i];
                let g = self.params.gains[i];
                g_centers[i] += signal * act * d / (w * w);
                g_widths[i] += signal * act * d * d / (w * w * w);
                g_gains[i] += signal * 2.0 * act / g;
            }
        }

        for i in 0..npc {
            self.params.centers[i] += cfg.rates.centers * g_centers[i];
            self.params.widths[i] +=
                cfg.rates.widths * (g_widths[i] - cfg.l2_width * self.params.widths[i]);
            self.params.gains[i] +=
                cfg.rates.gains * (g_gains[i] - cfg.l2_gain * self.params.gains[i]);
            if cfg.width_clip > 0.0 {
                self.params.widths[i] = self.params.widths[i].clamp(-cfg.width_clip, cfg.width_clip);
            }
            if cfg.gain_clip > 0.0 {
                self.params.gains[i] = self.params.gains[i].clamp(-cfg.gain_clip, cfg.gain_clip);
            }
            self.params.critic[i] += cfg.rates.critic * g_critic[i];
        }
        for (w, g) in self.params.actor.iter_mut().zip(&g_actor) {
            *w += cfg.rates.actor * g;
        }

        if n_steps == 0 {
            0.0
        } else {
            sq_error / n_steps as f32
        }
    }

    /// Add zero-mean Gaussian noise of the configured variance to the
    /// selected parameter groups.
    fn perturb(&mut self) {
        let sd = self.cfg.noise.sqrt();
        for group in self.cfg.noise_groups.clone() {
            let values: &mut [f32] = match group {
                ParamGroup::Centers => &mut self.params.centers,
                ParamGroup::Widths => &mut self.params.widths,
                ParamGroup::Gains => &mut self.params.gains,
                ParamGroup::Actor => &mut self.params.actor,
                ParamGroup::Critic => &mut self.params.critic,
            };
            for v in values.iter_mut() {
                *v += sd * gaussian(&mut self.rng);
            }
        }
    }
}

/// Standard normal draw via Box-Muller.
fn gaussian(rng: &mut fastrand::Rng) -> f32 {
    // 1 - f32() lies in (0, 1], keeping the log finite
    let u1 = 1.0 - rng.f32();
    let u2 = rng.f32();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}
