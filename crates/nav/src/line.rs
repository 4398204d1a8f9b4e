use crate::Env;

/// Configuration for [`LineNav`].
#[derive(Clone, Copy, Debug)]
pub struct LineNavConfig {
    /// Starting position of every episode.
    pub start: f32,
    /// Center of the goal region.
    pub goal: f32,
    /// Reward is delivered within this distance of the goal.
    pub goal_radius: f32,
    /// Half-width of the track.
    pub size: f32,
    /// Displacement per step for the outermost actions.
    pub max_speed: f32,
    /// Number of discrete actions, mapped to evenly spaced directions.
    pub n_actions: usize,
    /// Episode horizon in steps.
    pub max_steps: usize,
    /// Rewards collectable per episode before the episode ends.
    pub max_rewards: usize,
}

impl Default for LineNavConfig {
    fn default() -> Self {
        Self {
            start: -0.75,
            goal: 0.5,
            goal_radius: 0.05,
            size: 1.0,
            max_speed: 0.1,
            n_actions: 2,
            max_steps: 100,
            max_rewards: 5,
        }
    }
}

/// One-dimensional navigation environment with a circular goal region.
///
/// The agent starts at a fixed position and picks one of `n_actions` discrete
/// actions per step. Action `i` maps to a direction evenly spaced over
/// `[-1, 1]`, scaled by `max_speed`; positions clamp to the track rather than
/// wrap. A unit reward is delivered on every step spent within `goal_radius`
/// of the goal, up to `max_rewards` per episode. The episode ends once the
/// reward cap is reached or the horizon elapses.
pub struct LineNav {
    cfg: LineNavConfig,
    pos: f32,
    steps: usize,
    collected: usize,
    first_reward: Option<usize>,
}

impl LineNav {
    #[must_use]
    pub fn new(cfg: LineNavConfig) -> Self {
        Self {
            cfg,
            pos: cfg.start,
            steps: 0,
            collected: 0,
            first_reward: None,
        }
    }

    /// Direction of action `i`, evenly spaced over `[-1, 1]`.
    fn direction(&self, action: usize) -> f32 {
        let n = self.cfg.n_actions;
        if n < 2 {
            return 0.0;
        }
        -1.0 + 2.0 * action as f32 / (n - 1) as f32
    }

    /// Current position on the track.
    #[must_use]
    pub fn pos(&self) -> f32 {
        self.pos
    }

    /// Center of the goal region.
    #[must_use]
    pub fn goal(&self) -> f32 {
        self.cfg.goal
    }

    /// Total reward collected this episode.
    #[must_use]
    pub fn total_reward(&self) -> f32 {
        self.collected as f32
    }

    /// Step index of the first reward, or the horizon if none was collected.
    #[must_use]
    pub fn latency(&self) -> usize {
        self.first_reward.unwrap_or(self.cfg.max_steps)
    }

    /// Steps taken this episode.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn config(&self) -> &LineNavConfig {
        &self.cfg
    }
}

impl Env for LineNav {
    fn step(&mut self, action: usize) -> (f32, f32, bool) {
        debug_assert!(action < self.cfg.n_actions, "action out of range");
        let velocity = self.direction(action) * self.cfg.max_speed;
        self.pos = (self.pos + velocity).clamp(-self.cfg.size, self.cfg.size);
        self.steps += 1;

        let mut reward = 0.0;
        if (self.pos - self.cfg.goal).abs() <= self.cfg.goal_radius
            && self.collected < self.cfg.max_rewards
        {
            reward = 1.0;
            self.collected += 1;
            if self.first_reward.is_none() {
                self.first_reward = Some(self.steps);
            }
        }

        let done = self.collected >= self.cfg.max_rewards || self.steps >= self.cfg.max_steps;
        (self.pos, reward, done)
    }

    fn reset(&mut self) -> f32 {
        self.pos = self.cfg.start;
        self.steps = 0;
        self.collected = 0;
        self.first_reward = None;
        self.pos
    }

    fn n_actions(&self) -> usize {
        self.cfg.n_actions
    }

    fn size(&self) -> f32 {
        self.cfg.size
    }
}
