//! Forward computations of the place-cell model.

use crate::params::PlaceCellParams;

/// Activation of every place cell at position `x`.
///
/// Cell `i` fires with `gain_i^2 * exp(-(x - center_i)^2 / (2 * width_i^2))`;
/// squaring the gain keeps the field amplitude non-negative whatever sign the
/// update drives the raw gain to. A zero width yields a non-finite activation
/// that propagates through the heads unchecked.
#[must_use]
pub fn activations(params: &PlaceCellParams, x: f32) -> Vec<f32> {
    params
        .centers
        .iter()
        .zip(&params.widths)
        .zip(&params.gains)
        .map(|((&c, &w), &g)| {
            let d = x - c;
            g * g * (-d * d / (2.0 * w * w)).exp()
        })
        .collect()
}

/// Softmax action distribution from the actor head.
///
/// Logits are `beta * (activations . actor_column_a)`; the max is subtracted
/// before exponentiation for numerical stability.
#[must_use]
pub fn action_probs(params: &PlaceCellParams, activations: &[f32], beta: f32) -> Vec<f32> {
    let nact = params.n_actions();
    let mut logits = vec![0.0f32; nact];
    for (i, &act) in activations.iter().enumerate() {
        for (a, logit) in logits.iter_mut().enumerate() {
            *logit += act * params.actor[i * nact + a];
        }
    }
    for logit in logits.iter_mut() {
        *logit *= beta;
    }
    let m = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|&v| (v - m).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|&e| e / sum).collect()
}

/// Value estimate from the critic head.
#[must_use]
pub fn value(params: &PlaceCellParams, activations: &[f32]) -> f32 {
    activations
        .iter()
        .zip(&params.critic)
        .map(|(&a, &w)| a * w)
        .sum()
}

/// Sample an action index from a categorical distribution by inverse CDF.
#[must_use]
pub fn sample_action(probs: &[f32], rng: &mut fastrand::Rng) -> usize {
    let u = rng.f32();
    let mut cum = 0.0;
    for (a, &p) in probs.iter().enumerate() {
        cum += p;
        if u < cum {
            return a;
        }
    }
    probs.len() - 1
}
