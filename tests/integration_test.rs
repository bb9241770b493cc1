use lander::{
    approximator::Approximator,
    config::TrainingConfig,
    env::{Environment, LanderConfig, LunarLander},
    q_network::QNetwork,
    report::{export_scores_json, plot_scores, ScoreSummary},
    trainer::{streams, EpisodeEnd, Trainer},
};
use tempfile::tempdir;

fn short_config() -> TrainingConfig {
    TrainingConfig::default()
        .stack_size(4)
        .total_episodes(6)
        .max_steps(60)
        .batch_size(16)
        .min_memory(32)
        .memory_capacity(1_000)
        .hidden_layers(&[16, 8])
        .learning_rate(0.001)
        .seed(3)
}

fn build_trainer(config: TrainingConfig) -> Trainer<LunarLander, QNetwork> {
    let env = LunarLander::new(LanderConfig::default(), config.rng(streams::ENVIRONMENT));
    let network = QNetwork::from_config(
        &config,
        env.observation_dim(),
        env.action_space(),
        &mut config.rng(streams::WEIGHTS),
    )
    .unwrap();
    Trainer::new(config, env, network).unwrap()
}

#[test]
fn test_end_to_end_training() {
    let mut trainer = build_trainer(short_config());

    let mut summaries = Vec::new();
    let outcome = trainer.run_with(|s| summaries.push(s.clone())).unwrap();

    assert!(!outcome.scores.is_empty());
    assert!(outcome.episodes() <= 6);
    assert!(outcome.scores.iter().all(|s| s.is_finite()));
    assert_eq!(summaries.len(), outcome.episodes());
    assert!(trainer.memory().len() <= 1_000);

    // Steps recorded per episode add up to the global counter.
    let steps: usize = summaries.iter().map(|s| s.steps).sum();
    assert_eq!(steps as u64, outcome.total_steps);

    // Every step but a terminal one lands in memory.
    let terminal = summaries
        .iter()
        .filter(|s| matches!(s.end, EpisodeEnd::Terminal { .. }))
        .count();
    assert_eq!(trainer.memory().len(), steps - terminal);

    if trainer.memory().len() > 32 {
        assert!(outcome.updates > 0);
        assert!(summaries.iter().filter_map(|s| s.loss).all(|l| l.is_finite()));
    }
}

#[test]
fn test_seeded_runs_match() {
    let a = build_trainer(short_config().total_episodes(3)).run().unwrap();
    let b = build_trainer(short_config().total_episodes(3)).run().unwrap();
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.total_steps, b.total_steps);
}

#[test]
fn test_boxed_approximator() {
    let config = short_config().total_episodes(2);
    let env = LunarLander::new(LanderConfig::default(), config.rng(streams::ENVIRONMENT));
    let network: Box<dyn Approximator> = Box::new(
        QNetwork::from_config(&config, env.observation_dim(), env.action_space(), &mut config.rng(streams::WEIGHTS))
            .unwrap(),
    );

    let mut trainer = Trainer::new(config, env, network).unwrap();
    let outcome = trainer.run().unwrap();
    assert_eq!(outcome.episodes(), 2);
}

#[test]
fn test_report_of_a_run() {
    let outcome = build_trainer(short_config().total_episodes(4)).run().unwrap();

    let summary = ScoreSummary::from_scores(&outcome.scores).unwrap();
    assert_eq!(summary.episodes, outcome.episodes());
    assert!(summary.best + 1e-3 >= summary.mean && summary.mean + 1e-3 >= summary.worst);

    let chart = plot_scores(&outcome.scores, 40, 10);
    assert!(chart.starts_with("Episode Scores") || chart.contains("All values are"));

    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");
    export_scores_json(&path, &outcome.scores).unwrap();
    assert!(path.exists());
}
