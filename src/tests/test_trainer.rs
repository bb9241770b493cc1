use crate::config::TrainingConfig;
use crate::error::LanderError;
use crate::exploration::EpsilonSchedule;
use crate::tests::mocks::{FixedApproximator, Script, ScriptedEnv};
use crate::trainer::{EpisodeEnd, EpisodeSummary, Trainer};

fn small_config() -> TrainingConfig {
    TrainingConfig::default()
        .stack_size(3)
        .total_episodes(10)
        .max_steps(5)
        .batch_size(2)
        .min_memory(2)
        .memory_capacity(100)
        .gamma(0.5)
        .seed(1)
}

fn approximator() -> FixedApproximator {
    FixedApproximator::new(&[0.0, 1.0, 0.0, 0.0])
}

#[test]
fn test_success_halts_run() {
    let env = ScriptedEnv::new(vec![
        Script::terminal(&[1.0, 1.0, -100.0]),
        Script::terminal(&[1.0, 250.0]),
        Script::terminal(&[1.0]),
    ]);
    let mut trainer = Trainer::new(small_config(), env, approximator()).unwrap();

    let mut summaries: Vec<EpisodeSummary> = Vec::new();
    let outcome = trainer.run_with(|s| summaries.push(s.clone())).unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.scores, vec![-98.0, 251.0]);
    assert_eq!(outcome.episodes(), 2);
    assert_eq!(trainer.env().resets, 2);
    assert_eq!(outcome.total_steps, 5);

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].end, EpisodeEnd::Terminal { success: false });
    assert!(summaries[1].success());
    // No training after the winning episode, even with enough memory.
    assert_eq!(trainer.memory().len(), 3);
    assert_eq!(summaries[1].loss, None);
    assert_eq!(trainer.approximator().train_calls, 0);
}

#[test]
fn test_terminal_transition_not_recorded() {
    let env = ScriptedEnv::new(vec![Script::terminal(&[1.0, 2.0, 3.0])]);
    let config = small_config().total_episodes(1).max_steps(10);
    let mut trainer = Trainer::new(config, env, approximator()).unwrap();
    trainer.run().unwrap();

    let rewards: Vec<f32> = trainer.memory().iter().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![1.0, 2.0]);

    let actions: Vec<usize> = trainer.memory().iter().map(|t| t.action).collect();
    assert_eq!(actions, trainer.env().actions[..2].to_vec());
}

#[test]
fn test_transitions_hold_pre_step_state() {
    let env = ScriptedEnv::new(vec![Script::open(&[0.0; 3])]);
    let config = small_config().total_episodes(1).max_steps(3);
    let mut trainer = Trainer::new(config, env, approximator()).unwrap();
    trainer.run().unwrap();

    let states: Vec<_> = trainer.memory().iter().map(|t| t.state.clone()).collect();
    assert_eq!(states.len(), 3);
    // Reset fills the stack with the first observation.
    assert!(states[0].iter().all(|&v| v == 0.0));
    // Oldest to newest along the stack axis.
    assert_eq!(states[1].row(0).to_vec(), vec![0.0, 0.0, 1.0]);
    assert_eq!(states[2].row(0).to_vec(), vec![0.0, 1.0, 2.0]);
    assert_eq!(states[2].dim(), (2, 3));
}

#[test]
fn test_max_steps_ends_episode() {
    let env = ScriptedEnv::new(vec![Script::open(&[1.0; 10])]);
    let config = small_config().total_episodes(1).max_steps(4).min_memory(4).batch_size(4);
    let mut trainer = Trainer::new(config, env, approximator()).unwrap();

    let mut ends = Vec::new();
    let outcome = trainer.run_with(|s| ends.push((s.end, s.steps))).unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.scores, vec![4.0]);
    assert_eq!(ends, vec![(EpisodeEnd::MaxStepsReached, 4)]);
    assert_eq!(trainer.memory().len(), 4);
}

#[test]
fn test_training_starts_above_min_memory() {
    let env = ScriptedEnv::new(vec![Script::open(&[0.5, 0.5])]);
    let config = small_config().total_episodes(3).max_steps(2);
    let prediction = [0.0, 2.0, 0.0, 0.0];
    let mut trainer = Trainer::new(config, env, FixedApproximator::new(&prediction)).unwrap();

    let mut losses = Vec::new();
    let outcome = trainer.run_with(|s| losses.push(s.loss)).unwrap();

    // Two transitions are not more than the threshold of two.
    assert_eq!(losses, vec![None, Some(0.5), Some(0.5)]);
    assert_eq!(outcome.updates, 2);
    assert_eq!(trainer.approximator().train_calls, 2);

    // Each row differs from the prediction only at the taken action,
    // which holds 0.5 + 0.5 * 2.0.
    let labels = trainer.approximator().last_labels.clone().unwrap();
    assert_eq!(labels.dim(), (2, 4));
    for row in labels.rows() {
        let changed: Vec<usize> = (0..4).filter(|&j| row[j] != prediction[j]).collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(row[changed[0]], 1.5);
    }
}

#[test]
fn test_epsilon_decays_across_episodes() {
    let env = ScriptedEnv::new(vec![Script::open(&[0.0; 5])]);
    let config = small_config()
        .total_episodes(4)
        .epsilon(EpsilonSchedule::new(0.05, 1.0, 0.1).unwrap());
    let mut trainer = Trainer::new(config, env, approximator()).unwrap();

    let mut epsilons = Vec::new();
    let outcome = trainer.run_with(|s| epsilons.push(s.epsilon)).unwrap();

    assert_eq!(outcome.total_steps, 20);
    assert!(epsilons.windows(2).all(|w| w[0] > w[1]));
    assert!(epsilons.iter().all(|&e| (0.05..=1.0).contains(&e)));
}

#[test]
fn test_action_space_mismatch() {
    let env = ScriptedEnv::new(vec![Script::open(&[0.0])]).with_action_space(3);
    let result = Trainer::new(small_config(), env, approximator());
    assert!(matches!(result, Err(LanderError::DimensionMismatch { .. })));
}

#[test]
fn test_invalid_config_rejected() {
    let env = ScriptedEnv::new(vec![Script::open(&[0.0])]);
    let result = Trainer::new(small_config().stack_size(0), env, approximator());
    assert!(matches!(result, Err(LanderError::InvalidParameter { .. })));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let env = ScriptedEnv::new(vec![Script::open(&[0.0; 5])]);
        let config = small_config().total_episodes(3);
        let mut trainer = Trainer::new(config, env, approximator()).unwrap();
        trainer.run().unwrap();
        trainer.env().actions.clone()
    };
    assert_eq!(run(), run());
}
