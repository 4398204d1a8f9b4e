//! Experiment loop: environment construction, training, logging, outputs.

use std::path::PathBuf;
use std::str::FromStr;

use agent::{Backprop, LearningRates, ParamGroup, PlaceCellParams, TdConfig, TdTrainer};
use anyhow::Result;
use clap::Parser;
use nav::{LineNav, LineNavConfig};
use report::Snapshot;

/// How the place-cell population is initialized.
#[derive(Clone, Copy, Debug)]
pub enum FieldInit {
    /// Evenly spaced centers, constant widths and gains.
    Uniform,
    /// Random centers, widths, and gains.
    Scattered,
}

impl FromStr for FieldInit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(FieldInit::Uniform),
            "scattered" => Ok(FieldInit::Scattered),
            other => Err(format!("unknown field init `{other}`")),
        }
    }
}

impl std::fmt::Display for FieldInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldInit::Uniform => f.write_str("uniform"),
            FieldInit::Scattered => f.write_str("scattered"),
        }
    }
}

/// Hyperparameters of one experiment run.
#[derive(Parser, Debug)]
#[command(about = "Place-cell TD actor-critic navigation on a 1-D track")]
pub struct Args {
    /// Training episodes per goal.
    #[arg(long, default_value_t = 50_000)]
    pub episodes: usize,

    /// Episode horizon in steps.
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Goal positions, trained one after another.
    #[arg(long, num_args = 1.., default_values_t = [0.5], allow_hyphen_values = true)]
    pub goals: Vec<f32>,

    /// Starting position of every episode.
    #[arg(long, default_value_t = -0.75, allow_hyphen_values = true)]
    pub start: f32,

    /// Radius of the rewarded region around the goal.
    #[arg(long, default_value_t = 0.05)]
    pub goal_radius: f32,

    /// Rewards collectable per episode before it ends.
    #[arg(long, default_value_t = 5)]
    pub max_rewards: usize,

    /// RNG seed for initialization and action sampling.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Place-cell population layout: uniform or scattered.
    #[arg(long, default_value_t = FieldInit::Uniform)]
    pub field_init: FieldInit,

    /// Heads that propagate the TD error into the fields: actor, critic, both.
    #[arg(long, default_value_t = Backprop::Both)]
    pub backprop: Backprop,

    /// Number of place cells.
    #[arg(long, default_value_t = 64)]
    pub cells: usize,

    /// Initial field gain (alpha).
    #[arg(long, default_value_t = 1.0)]
    pub gain: f32,

    /// Initial field width (sigma).
    #[arg(long, default_value_t = 0.1)]
    pub width: f32,

    /// Actor learning rate.
    #[arg(long, default_value_t = 0.01)]
    pub actor_lr: f32,

    /// Critic learning rate.
    #[arg(long, default_value_t = 0.01)]
    pub critic_lr: f32,

    /// Field center learning rate.
    #[arg(long, default_value_t = 1e-4)]
    pub center_lr: f32,

    /// Field gain learning rate.
    #[arg(long, default_value_t = 1e-4)]
    pub gain_lr: f32,

    /// Field width learning rate.
    #[arg(long, default_value_t = 1e-4)]
    pub width_lr: f32,

    /// Discount factor.
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f32,

    /// Number of discrete actions.
    #[arg(long, default_value_t = 2)]
    pub actions: usize,

    /// Inverse temperature of the softmax action head.
    #[arg(long, default_value_t = 1.0)]
    pub beta: f32,

    /// L2 penalty on field widths.
    #[arg(long, default_value_t = 0.0)]
    pub l2_width: f32,

    /// L2 penalty on field gains.
    #[arg(long, default_value_t = 0.0)]
    pub l2_gain: f32,

    /// Clip widths to this magnitude after each update (0 disables).
    #[arg(long, default_value_t = 0.0)]
    pub width_clip: f32,

    /// Clip gains to this magnitude after each update (0 disables).
    #[arg(long, default_value_t = 0.0)]
    pub gain_clip: f32,

    /// Variance of Gaussian parameter noise added after each update.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f32,

    /// Parameter groups receiving noise.
    #[arg(long, num_args = 1.., default_values_t = [ParamGroup::Centers, ParamGroup::Widths, ParamGroup::Gains])]
    pub noise_groups: Vec<ParamGroup>,

    /// Write the parameter/reward history as JSON under the data directory.
    #[arg(long)]
    pub save_data: bool,

    /// Write SVG figures under the figure directory.
    #[arg(long)]
    pub save_figs: bool,

    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "./fig")]
    pub fig_dir: PathBuf,
}

impl Args {
    /// Run name baked from the hyperparameters, used for output file names.
    fn run_name(&self) -> String {
        format!(
            "1d_td_{}a_{}n_{}s_{}e_{}gs_{}plr_{}clr_{}llr_{}alr_{}slr",
            self.actions,
            self.cells,
            self.seed,
            self.episodes,
            self.goal_radius,
            self.actor_lr,
            self.critic_lr,
            self.center_lr,
            self.gain_lr,
            self.width_lr,
        )
    }

    fn td_config(&self) -> TdConfig {
        TdConfig {
            gamma: self.gamma,
            beta: self.beta,
            rates: LearningRates {
                centers: self.center_lr,
                widths: self.width_lr,
                gains: self.gain_lr,
                actor: self.actor_lr,
                critic: self.critic_lr,
            },
            backprop: self.backprop,
            l2_width: self.l2_width,
            l2_gain: self.l2_gain,
            width_clip: self.width_clip,
            gain_clip: self.gain_clip,
            noise: self.noise,
            noise_groups: self.noise_groups.clone(),
            max_steps: self.max_steps,
        }
    }

    fn env_config(&self, goal: f32) -> LineNavConfig {
        LineNavConfig {
            start: self.start,
            goal,
            goal_radius: self.goal_radius,
            size: 1.0,
            max_speed: 0.1,
            n_actions: self.actions,
            max_steps: self.max_steps,
            max_rewards: self.max_rewards,
        }
    }
}

/// Train one agent across every goal in sequence and write the requested
/// outputs.
pub fn run(args: Args) -> Result<()> {
    tracing_subscriber::fmt::init();

    let name = args.run_name();
    tracing::info!("starting run {name}");

    let mut rng = fastrand::Rng::with_seed(args.seed);
    let mut params = match args.field_init {
        FieldInit::Uniform => {
            PlaceCellParams::uniform(args.cells, args.actions, args.width, args.gain, 1.0)
        }
        FieldInit::Scattered => PlaceCellParams::scattered(
            args.cells,
            args.actions,
            args.width,
            args.gain,
            1.0,
            &mut rng,
        ),
    };

    if args.save_figs {
        report::place_fields(
            &args.fig_dir.join(format!("{name}_fields_before.svg")),
            &params,
            args.start,
            args.goals[0],
            args.goal_radius,
            1.0,
            "Fields before learning",
        )?;
    }

    let mut snapshot = Snapshot::default();
    if args.save_data {
        snapshot.params.push(params.clone());
    }

    let mut last_positions = Vec::new();
    for &goal in &args.goals {
        let env = LineNav::new(args.env_config(goal));
        let mut trainer = TdTrainer::new(env, params, args.td_config(), args.seed);

        for episode in 0..args.episodes {
            let (report, traj) = trainer.episode_with_trajectory();
            tracing::info!(
                episode = episode + 1,
                goal,
                reward = report.total_reward,
                latency = report.latency,
                loss = report.loss,
                max_gain = trainer.params().max_gain(),
                "trial"
            );
            snapshot.rewards.push(report.total_reward);
            snapshot.latencies.push(report.latency);
            if args.save_data {
                snapshot.params.push(trainer.params().clone());
                snapshot.positions.push(traj.positions.clone());
            }
            last_positions = traj.positions;
        }
        params = trainer.into_params();
    }

    if args.save_data {
        let path = args.data_dir.join(format!("{name}.json"));
        snapshot.save(&path)?;
        tracing::info!("snapshot written to {}", path.display());
    }
    if args.save_figs {
        report::learning_curve(
            &args.fig_dir.join(format!("{name}_learning.svg")),
            &snapshot.rewards,
            &snapshot.latencies,
        )?;
        report::place_fields(
            &args.fig_dir.join(format!("{name}_fields_after.svg")),
            &params,
            args.start,
            *args.goals.last().unwrap_or(&0.0),
            args.goal_radius,
            1.0,
            "Fields after learning",
        )?;
        report::trajectory(
            &args.fig_dir.join(format!("{name}_trajectory.svg")),
            &last_positions,
            *args.goals.last().unwrap_or(&0.0),
            args.goal_radius,
            1.0,
        )?;
    }

    Ok(())
}
