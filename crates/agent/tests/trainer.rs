use agent::{model, LearningRates, ParamGroup, PlaceCellParams, TdConfig, TdTrainer};
use nav::{LineNav, LineNavConfig};

fn easy_env() -> LineNav {
    // start on the goal with a generous radius so every episode is rewarded
    LineNav::new(LineNavConfig {
        start: 0.0,
        goal: 0.0,
        goal_radius: 0.1,
        ..LineNavConfig::default()
    })
}

#[test]
fn parameter_shapes_survive_updates() {
    let params = PlaceCellParams::uniform(64, 2, 0.1, 1.0, 1.0);
    let shape = params.shape();
    let cfg = TdConfig {
        noise: 0.01,
        ..TdConfig::default()
    };
    let mut trainer = TdTrainer::new(easy_env(), params, cfg, 0);
    for _ in 0..20 {
        trainer.episode();
        assert_eq!(trainer.params().shape(), shape);
    }
}

#[test]
fn episodes_respect_reward_cap_and_horizon() {
    let params = PlaceCellParams::uniform(64, 2, 0.1, 1.0, 1.0);
    let mut trainer = TdTrainer::new(easy_env(), params, TdConfig::default(), 1);
    for _ in 0..50 {
        let report = trainer.episode();
        assert!(report.total_reward <= 5.0);
        assert!(report.latency <= 100);
        assert!(report.loss.is_finite());
    }
}

#[test]
fn rollout_records_the_terminal_position() {
    let params = PlaceCellParams::uniform(32, 2, 0.1, 1.0, 1.0);
    let mut trainer = TdTrainer::new(easy_env(), params, TdConfig::default(), 2);
    let (traj, total_reward, _) = trainer.rollout();
    assert_eq!(traj.positions.len(), traj.actions.len() + 1);
    assert_eq!(traj.rewards.len(), traj.actions.len());
    let sum: f32 = traj.rewards.iter().sum();
    assert_eq!(sum, total_reward);
}

#[test]
fn episode_hands_back_the_trajectory_it_trained_on() {
    let params = PlaceCellParams::uniform(32, 2, 0.1, 1.0, 1.0);
    let mut trainer = TdTrainer::new(easy_env(), params, TdConfig::default(), 4);
    let (report, traj) = trainer.episode_with_trajectory();
    assert_eq!(traj.positions.len(), traj.actions.len() + 1);
    let sum: f32 = traj.rewards.iter().sum();
    assert_eq!(sum, report.total_reward);
    assert!(traj.positions.len() <= 101);
}

#[test]
fn fixed_seed_reproduces_trajectories_and_parameters() {
    let run = || {
        let params = PlaceCellParams::uniform(64, 2, 0.1, 1.0, 1.0);
        let cfg = TdConfig {
            noise: 0.001,
            ..TdConfig::default()
        };
        let mut trainer = TdTrainer::new(easy_env(), params, cfg, 1234);
        let mut rewards = Vec::new();
        let mut losses = Vec::new();
        for _ in 0..30 {
            let report = trainer.episode();
            rewards.push(report.total_reward);
            losses.push(report.loss);
        }
        (rewards, losses, trainer.into_params())
    };
    let (rewards_a, losses_a, params_a) = run();
    let (rewards_b, losses_b, params_b) = run();
    assert_eq!(rewards_a, rewards_b);
    assert_eq!(losses_a, losses_b);
    assert_eq!(params_a.centers, params_b.centers);
    assert_eq!(params_a.widths, params_b.widths);
    assert_eq!(params_a.gains, params_b.gains);
    assert_eq!(params_a.actor, params_b.actor);
    assert_eq!(params_a.critic, params_b.critic);
}

#[test]
fn noise_only_touches_the_selected_groups() {
    let params = PlaceCellParams::uniform(32, 2, 0.1, 1.0, 1.0);
    let frozen = LearningRates {
        centers: 0.0,
        widths: 0.0,
        gains: 0.0,
        actor: 0.0,
        critic: 0.0,
    };
    let cfg = TdConfig {
        rates: frozen,
        noise: 0.01,
        noise_groups: vec![ParamGroup::Gains],
        ..TdConfig::default()
    };
    let before = params.clone();
    let mut trainer = TdTrainer::new(easy_env(), params, cfg, 3);
    trainer.episode();
    let after = trainer.params();
    assert_eq!(after.centers, before.centers);
    assert_eq!(after.widths, before.widths);
    assert_eq!(after.actor, before.actor);
    assert_eq!(after.critic, before.critic);
    assert_ne!(after.gains, before.gains, "gains should be perturbed");
}

#[test]
fn critic_learns_the_value_of_the_rewarded_region() {
    let params = PlaceCellParams::uniform(64, 2, 0.1, 1.0, 1.0);
    let mut trainer = TdTrainer::new(easy_env(), params, TdConfig::default(), 5);
    for _ in 0..100 {
        trainer.episode();
    }
    let params = trainer.params();
    let at_goal = model::value(params, &model::activations(params, 0.0));
    let far_away = model::value(params, &model::activations(params, 0.9));
    assert!(at_goal > 0.0, "value at the goal stayed at {at_goal}");
    assert!(at_goal > far_away, "{at_goal} vs {far_away}");
    assert!(
        params.actor.iter().any(|&w| w != 0.0),
        "actor weights never moved"
    );
}

#[test]
fn latency_to_a_displaced_goal_improves_with_training() {
    let env = LineNav::new(LineNavConfig {
        start: -0.2,
        goal: 0.2,
        goal_radius: 0.1,
        ..LineNavConfig::default()
    });
    let params = PlaceCellParams::uniform(64, 2, 0.1, 1.0, 1.0);
    let cfg = TdConfig {
        rates: LearningRates {
            centers: 1e-4,
            widths: 1e-4,
            gains: 1e-4,
            actor: 0.02,
            critic: 0.02,
        },
        ..TdConfig::default()
    };
    let mut trainer = TdTrainer::new(env, params, cfg, 0);
    let latencies: Vec<usize> = (0..800).map(|_| trainer.episode().latency).collect();
    let early: f32 = latencies[..100].iter().map(|&l| l as f32).sum::<f32>() / 100.0;
    let late: f32 = latencies[700..].iter().map(|&l| l as f32).sum::<f32>() / 100.0;
    eprintln!("early latency {early} late latency {late}");
    assert!(late < early, "agent should reach the goal faster after training");
}
