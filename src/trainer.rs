//! The episode/step loop tying the components together.
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;

use crate::action::ActionCodes;
use crate::approximator::Approximator;
use crate::config::TrainingConfig;
use crate::env::Environment;
use crate::error::{LanderError, Result};
use crate::exploration::ExplorationPolicy;
use crate::frame_stack::FrameStack;
use crate::replay_memory::{ReplayMemory, Transition};
use crate::targets::{build_training_batch, TrainingBatch};

/// Random stream identifiers derived from the run seed.
pub mod streams {
    pub const POLICY: u64 = 0;
    pub const SAMPLER: u64 = 1;
    pub const ENVIRONMENT: u64 = 2;
    pub const WEIGHTS: u64 = 3;
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// The environment signalled completion.
    Terminal { success: bool },
    /// The step cap was hit first.
    MaxStepsReached,
}

/// What happened in one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub score: f32,
    pub steps: usize,
    pub end: EpisodeEnd,
    /// Exploration probability at the last step of the episode.
    pub epsilon: f32,
    pub memory_len: usize,
    /// Loss of the training update that followed the episode, if one ran.
    pub loss: Option<f32>,
}

impl EpisodeSummary {
    pub fn success(&self) -> bool {
        matches!(self.end, EpisodeEnd::Terminal { success: true })
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    /// Cumulative reward of every episode, in order.
    pub scores: Vec<f32>,
    pub success: bool,
    pub total_steps: u64,
    pub updates: usize,
}

impl TrainingOutcome {
    pub fn episodes(&self) -> usize {
        self.scores.len()
    }
}

/// Drives training of an [`Approximator`] against an [`Environment`].
///
/// The trainer owns every piece of mutable state of a run: the environment,
/// the approximator, the replay memory and the frame stack.
pub struct Trainer<E: Environment, A: Approximator> {
    config: TrainingConfig,
    env: E,
    approximator: A,
    memory: ReplayMemory,
    policy: ExplorationPolicy,
    sampler_rng: StdRng,
    frames: Option<FrameStack>,
    decay_step: u64,
    scores: Vec<f32>,
    updates: usize,
    success: bool,
}

impl<E: Environment, A: Approximator> Trainer<E, A> {
    pub fn new(config: TrainingConfig, env: E, approximator: A) -> Result<Self> {
        config.validate()?;
        if env.action_space() != approximator.action_space() {
            return Err(LanderError::dimension_mismatch(
                format!("{} environment actions", env.action_space()),
                format!("{} approximator outputs", approximator.action_space()),
            ));
        }

        let codes = ActionCodes::new(env.action_space())?;
        let policy = ExplorationPolicy::new(config.epsilon, codes, config.rng(streams::POLICY));
        let sampler_rng = config.rng(streams::SAMPLER);
        let memory = ReplayMemory::new(config.memory_capacity);

        Ok(Trainer {
            config,
            env,
            approximator,
            memory,
            policy,
            sampler_rng,
            frames: None,
            decay_step: 0,
            scores: Vec::new(),
            updates: 0,
            success: false,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn approximator(&self) -> &A {
        &self.approximator
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Environment steps taken so far across all episodes.
    pub fn total_steps(&self) -> u64 {
        self.decay_step
    }

    /// Hands the approximator back once training is over.
    pub fn into_approximator(self) -> A {
        self.approximator
    }

    /// Runs until `total_episodes` or the first successful landing.
    pub fn run(&mut self) -> Result<TrainingOutcome> {
        self.run_with(|_| {})
    }

    /// Like [`Trainer::run`], calling `on_episode` after every episode.
    pub fn run_with<F: FnMut(&EpisodeSummary)>(&mut self, mut on_episode: F) -> Result<TrainingOutcome> {
        for episode in self.scores.len()..self.config.total_episodes {
            if self.success {
                break;
            }
            let summary = self.run_episode(episode)?;
            on_episode(&summary);
        }

        if self.success {
            info!("run halted after a successful landing in episode {}", self.scores.len() - 1);
        }

        Ok(TrainingOutcome {
            scores: self.scores.clone(),
            success: self.success,
            total_steps: self.decay_step,
            updates: self.updates,
        })
    }

    /// Plays one episode, records its score and, unless it succeeded, runs a
    /// training update when the memory is large enough.
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeSummary> {
        let observation = self.env.reset()?;
        let mut state = self.push_frame(observation.view(), true)?;
        let mut score = 0.0;
        let mut steps = 0;
        let mut end = EpisodeEnd::MaxStepsReached;

        for _ in 0..self.config.max_steps {
            self.decay_step += 1;

            let code = self.policy.select_action(&self.approximator, state.view(), self.decay_step)?;
            let action = code.index();

            let step = self.env.step(action)?;
            score += step.reward;
            steps += 1;

            if step.done {
                let success = step.reward >= self.config.success_reward;
                let sentinel = Array1::zeros(self.env.observation_dim());
                self.push_frame(sentinel.view(), false)?;
                // The terminal transition is not stored.
                end = EpisodeEnd::Terminal { success };
                debug!("episode {} terminal after {} steps: {:?}", episode, steps, step.info);
                break;
            }

            let next_state = self.push_frame(step.observation.view(), false)?;
            self.memory.append(Transition { state, action, reward: step.reward });
            state = next_state;
        }

        self.scores.push(score);
        let success = matches!(end, EpisodeEnd::Terminal { success: true });
        if success {
            self.success = true;
        }

        let loss = if !success && self.memory.len() > self.config.min_memory {
            Some(self.train_step()?)
        } else {
            None
        };

        let summary = EpisodeSummary {
            episode,
            score,
            steps,
            end,
            epsilon: self.policy.schedule().epsilon(self.decay_step),
            memory_len: self.memory.len(),
            loss,
        };
        info!(
            "episode {}: score {:.2}, steps {}, epsilon {:.4}, memory {}",
            episode, score, steps, summary.epsilon, summary.memory_len
        );
        Ok(summary)
    }

    /// Samples a batch, builds its targets and updates the approximator.
    fn train_step(&mut self) -> Result<f32> {
        let batch = self.memory.sample(self.config.batch_size, &mut self.sampler_rng)?;
        let TrainingBatch { features, labels } =
            build_training_batch(&self.approximator, &batch, self.config.gamma)?;
        let loss = self.approximator.train_on_batch(features.view(), labels.view())?;
        self.updates += 1;

        if !loss.is_finite() {
            warn!("training update {} produced a non-finite loss", self.updates);
        }
        debug!("training update {}: batch {}, loss {:.6}", self.updates, batch.len(), loss);
        Ok(loss)
    }

    fn push_frame(&mut self, observation: ArrayView1<f32>, new_episode: bool) -> Result<Array2<f32>> {
        let frames = self
            .frames
            .take()
            .unwrap_or_else(|| FrameStack::new(self.config.stack_size, self.env.observation_dim()));
        let (state, frames) = frames.update(observation, new_episode)?;
        self.frames = Some(frames);
        Ok(state)
    }
}
