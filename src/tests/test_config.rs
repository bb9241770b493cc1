use rand::Rng;
use tempfile::tempdir;

use crate::activations::Activation;
use crate::config::TrainingConfig;
use crate::error::LanderError;
use crate::exploration::EpsilonSchedule;

#[test]
fn test_defaults() {
    let config = TrainingConfig::default();
    assert_eq!(config.stack_size, 15);
    assert_eq!(config.total_episodes, 10_000);
    assert_eq!(config.max_steps, 250);
    assert_eq!(config.batch_size, 256);
    assert_eq!(config.memory_capacity, 250_000);
    assert_eq!(config.min_memory, 500);
    assert!((config.gamma - 0.618).abs() < 1e-6);
    assert!((config.learning_rate - 0.00025).abs() < 1e-9);
    assert_eq!(config.epsilon, EpsilonSchedule::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = TrainingConfig::default()
        .total_episodes(42)
        .hidden_layers(&[32, 16])
        .hidden_activation(Activation::Tanh)
        .seed(9);
    config.save(&path).unwrap();

    let loaded = TrainingConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_fields_take_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{ "total_episodes": 3, "gamma": 0.9 }"#).unwrap();

    let loaded = TrainingConfig::load(&path).unwrap();
    assert_eq!(loaded.total_episodes, 3);
    assert!((loaded.gamma - 0.9).abs() < 1e-6);
    assert_eq!(loaded.stack_size, 15);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "gamma": 1.5 }"#).unwrap();
    assert!(matches!(TrainingConfig::load(&path), Err(LanderError::InvalidParameter { .. })));

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(TrainingConfig::load(&path), Err(LanderError::SerializationError(_))));

    let missing = dir.path().join("missing.json");
    assert!(matches!(TrainingConfig::load(missing), Err(LanderError::IoError(_))));
}

#[test]
fn test_validation_rules() {
    assert!(TrainingConfig::default().stack_size(0).validate().is_err());
    assert!(TrainingConfig::default().max_steps(0).validate().is_err());
    assert!(TrainingConfig::default().batch_size(0).validate().is_err());
    assert!(TrainingConfig::default().learning_rate(0.0).validate().is_err());
    assert!(TrainingConfig::default().gamma(-0.1).validate().is_err());
    assert!(TrainingConfig::default().hidden_layers(&[8, 0]).validate().is_err());
    // Memory threshold below the batch size.
    assert!(TrainingConfig::default().min_memory(100).validate().is_err());
    // Memory that can never exceed the threshold.
    assert!(TrainingConfig::default().memory_capacity(500).validate().is_err());
}

#[test]
fn test_seeded_streams() {
    let config = TrainingConfig::default().seed(17);
    let a: u64 = config.rng(0).gen();
    let b: u64 = config.rng(0).gen();
    let c: u64 = config.rng(1).gen();
    assert_eq!(a, b);
    assert_ne!(a, c);
}
