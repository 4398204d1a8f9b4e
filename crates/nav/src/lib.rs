//! Navigation environments for place-cell learning experiments.
//!
//! The crate exposes the [`Env`] trait, a minimal step/reset interface in the
//! spirit of classic gym-style frameworks, and [`LineNav`], a one-dimensional
//! continuous track with a circular goal region. All stochasticity lives in
//! the agent; the environments themselves are deterministic.

mod line;

pub use line::{LineNav, LineNavConfig};

/// Reinforcement learning environment trait.
///
/// Each call to [`step`] advances the simulation by one discrete action and
/// returns the new position, a reward signal, and whether the episode has
/// terminated.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// Returns `(pos, reward, done)` where `pos` is the new position on the
    /// track, `reward` is the scalar reward, and `done` indicates episode
    /// termination.
    fn step(&mut self, action: usize) -> (f32, f32, bool);

    /// Reset the environment to its starting state and return the initial
    /// position.
    fn reset(&mut self) -> f32;

    /// Number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Half-width of the track; positions live in `[-size, size]`.
    fn size(&self) -> f32;
}
