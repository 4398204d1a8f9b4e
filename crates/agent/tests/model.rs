use agent::{model, PlaceCellParams};

#[test]
fn activations_peak_at_the_field_center() {
    let params = PlaceCellParams::uniform(64, 2, 0.1, 1.0, 1.0);
    let acts = model::activations(&params, params.centers[10]);
    assert_eq!(acts.len(), 64);
    let at_center = acts[10];
    let off_center = model::activations(&params, params.centers[10] + 0.2)[10];
    assert!(at_center > off_center, "{at_center} vs {off_center}");
    assert!((at_center - 1.0).abs() < 1e-6, "unit gain squared at the center");
}

#[test]
fn zero_actor_weights_give_a_uniform_policy() {
    let params = PlaceCellParams::uniform(32, 4, 0.1, 1.0, 1.0);
    let acts = model::activations(&params, 0.3);
    let probs = model::action_probs(&params, &acts, 1.0);
    assert_eq!(probs.len(), 4);
    let sum: f32 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);
    for &p in &probs {
        assert!((p - 0.25).abs() < 1e-5);
    }
}

#[test]
fn biased_actor_weights_shift_the_policy() {
    let mut params = PlaceCellParams::uniform(8, 2, 0.2, 1.0, 1.0);
    // favor action 1 from every cell
    for i in 0..8 {
        params.actor[i * 2 + 1] = 1.0;
    }
    let acts = model::activations(&params, 0.0);
    let probs = model::action_probs(&params, &acts, 1.0);
    assert!(probs[1] > probs[0]);
    // higher inverse temperature sharpens the distribution
    let sharp = model::action_probs(&params, &acts, 5.0);
    assert!(sharp[1] > probs[1]);
}

#[test]
fn value_is_the_critic_weighted_activation_sum() {
    let mut params = PlaceCellParams::uniform(16, 2, 0.1, 1.0, 1.0);
    let acts = model::activations(&params, 0.0);
    assert_eq!(model::value(&params, &acts), 0.0);
    for w in params.critic.iter_mut() {
        *w = 1.0;
    }
    let v = model::value(&params, &acts);
    let expected: f32 = acts.iter().sum();
    assert!((v - expected).abs() < 1e-6);
}

#[test]
fn sampling_follows_the_distribution_edges() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..100 {
        assert_eq!(model::sample_action(&[1.0, 0.0], &mut rng), 0);
        assert_eq!(model::sample_action(&[0.0, 1.0], &mut rng), 1);
    }
}

#[test]
fn sampling_is_deterministic_for_a_fixed_seed() {
    let probs = [0.25, 0.25, 0.25, 0.25];
    let mut a = fastrand::Rng::with_seed(42);
    let mut b = fastrand::Rng::with_seed(42);
    for _ in 0..200 {
        assert_eq!(
            model::sample_action(&probs, &mut a),
            model::sample_action(&probs, &mut b)
        );
    }
}

#[test]
fn scattered_population_stays_on_the_track_with_positive_fields() {
    let mut rng = fastrand::Rng::with_seed(0);
    let params = PlaceCellParams::scattered(128, 2, 0.1, 1.0, 1.0, &mut rng);
    assert_eq!(params.n_cells(), 128);
    for &c in &params.centers {
        assert!((-1.0..=1.0).contains(&c));
    }
    for &w in &params.widths {
        assert!(w > 0.0 && w <= 0.2);
    }
    for &g in &params.gains {
        assert!(g > 0.0 && g <= 2.0);
    }
}
