use burn::prelude::*;

use crate::{util::check_interval, Error};

/// When the target network is overwritten with the online network's parameters
///
/// Both variants only fire during episodes whose global index is divisible by
/// [`target_sync_period`](DQNAgentConfig::target_sync_period).
#[derive(Config, Debug, PartialEq, Eq)]
pub enum SyncSchedule {
    /// Once, on the first step of a qualifying episode
    PerEpisode,
    /// On every step of a qualifying episode
    PerStep,
}

/// Hyperparameters of a [`DQNAgent`](super::DQNAgent), fixed for the agent's lifetime
#[derive(Config, Debug)]
pub struct DQNAgentConfig {
    /// Length of every state vector
    pub state_dim: usize,
    /// Number of discrete actions
    pub num_actions: usize,
    /// Maximum number of experiences kept in the replay memory
    #[config(default = 10000)]
    pub memory_capacity: usize,
    /// Number of experiences per training step
    #[config(default = 64)]
    pub batch_size: usize,
    /// The discount factor
    #[config(default = 0.99)]
    pub gamma: f32,
    #[config(default = 1.0)]
    pub epsilon_start: f32,
    #[config(default = 0.01)]
    pub epsilon_min: f32,
    /// Multiplier applied to epsilon after every executed training step
    #[config(default = 0.995)]
    pub epsilon_decay: f32,
    /// The learning rate for the approximator's optimizer
    #[config(default = 1e-3)]
    pub lr: f64,
    /// Number of episodes between target network synchronizations
    #[config(default = 10)]
    pub target_sync_period: usize,
    #[config(default = "SyncSchedule::PerEpisode")]
    pub sync_schedule: SyncSchedule,
    #[config(default = 500)]
    pub max_episodes: usize,
    #[config(default = 500)]
    pub max_steps_per_episode: usize,
    /// Moving average reward at which training stops early
    #[config(default = 195.0)]
    pub solved_threshold: f32,
    /// Number of trailing episodes in the moving average
    #[config(default = 100)]
    pub solved_window: usize,
    /// Call [`Environment::render`](crate::env::Environment::render) after every step
    #[config(default = false)]
    pub render: bool,
    /// Seed for the agent's random number generator, drawn from entropy if absent
    pub seed: Option<u64>,
}

fn ensure(ok: bool, name: &'static str, reason: &str) -> crate::Result<()> {
    ok.then_some(()).ok_or_else(|| Error::InvalidConfig {
        name,
        reason: String::from(reason),
    })
}

impl DQNAgentConfig {
    /// Check every hyperparameter against its valid range
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_exploration()?;
        self.validate_training()
    }

    /// Check the `epsilon_*` schedule
    pub fn validate_exploration(&self) -> crate::Result<()> {
        let &Self {
            epsilon_start,
            epsilon_min,
            epsilon_decay,
            ..
        } = self;

        check_interval!(epsilon_min, 0.0, 1.0);
        check_interval!(epsilon_start, epsilon_min, 1.0);
        check_interval!(epsilon_decay, 0.0, 1.0);
        Ok(())
    }

    /// Check every hyperparameter except the `epsilon_*` schedule
    pub fn validate_training(&self) -> crate::Result<()> {
        let &Self {
            state_dim,
            num_actions,
            memory_capacity,
            batch_size,
            gamma,
            lr,
            target_sync_period,
            max_steps_per_episode,
            solved_window,
            ..
        } = self;

        check_interval!(gamma, 0.0, 1.0);

        ensure(state_dim > 0, "state_dim", "must be non-zero")?;
        ensure(num_actions > 0, "num_actions", "must be non-zero")?;
        ensure(batch_size > 0, "batch_size", "must be non-zero")?;
        ensure(
            memory_capacity >= batch_size,
            "memory_capacity",
            "must hold at least one batch",
        )?;
        ensure(lr > 0.0 && lr.is_finite(), "lr", "must be positive")?;
        ensure(
            target_sync_period > 0,
            "target_sync_period",
            "must be non-zero",
        )?;
        ensure(
            max_steps_per_episode > 0,
            "max_steps_per_episode",
            "must be non-zero",
        )?;
        ensure(solved_window > 0, "solved_window", "must be non-zero")
    }
}
