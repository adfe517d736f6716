use std::path::Path;

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    approx::Approximator,
    decay::{self, Decay},
    exploration::{Choice, EpsilonGreedy},
    memory::{Exp, ReplayMemory},
    metrics::Metrics,
    util, Error, Result,
};

mod config;
mod target;
mod train;

pub use config::{DQNAgentConfig, SyncSchedule};
pub use target::{build_targets, td_target};
pub use train::{EpisodeSummary, TrainReport};

/// A Deep Q Network agent with experience replay and a periodically synchronized target network
///
/// ### Generics
/// - `S`: The state type, a fixed-length numeric vector. Its [`Clone`] should be lightweight,
///   ideally [`Copy`], since states are cloned into the replay memory.
/// - `A`: The [`Approximator`] used for both the online and the target network
/// - `D`: The [`Decay`] schedule of the exploration policy
pub struct DQNAgent<S, A, D = decay::Multiplicative>
where
    S: Clone + AsRef<[f32]>,
    A: Approximator,
    D: Decay,
{
    online: A,
    target: A,
    memory: ReplayMemory<S>,
    exploration: EpsilonGreedy<D>,
    config: DQNAgentConfig,
    metrics: Metrics,
    rng: StdRng,
    episode: usize,
    train_steps: usize,
    target_syncs: usize,
}

impl<S, A> DQNAgent<S, A>
where
    S: Clone + AsRef<[f32]>,
    A: Approximator,
{
    /// Initialize a new `DQNAgent` exploring with epsilon decayed multiplicatively per training step
    ///
    /// ### Arguments
    /// - `online` The [`Approximator`] trained on every step
    /// - `target` The [`Approximator`] used for bootstrapping; its parameters are overwritten
    ///   with `online`'s immediately
    /// - `config` A [`DQNAgentConfig`] containing hyperparameters for the agent
    pub fn new(online: A, target: A, config: DQNAgentConfig) -> Result<Self> {
        config.validate()?;
        let decay = decay::Multiplicative::new(config.epsilon_decay, config.epsilon_min)?;
        let exploration = EpsilonGreedy::new(config.epsilon_start, decay)?;
        Self::with_exploration(online, target, config, exploration)
    }
}

impl<S, A, D> DQNAgent<S, A, D>
where
    S: Clone + AsRef<[f32]>,
    A: Approximator,
    D: Decay,
{
    /// Initialize a new `DQNAgent` with a custom exploration policy
    ///
    /// The `epsilon_*` fields of `config` are neither validated nor used; the agent explores
    /// with `exploration` alone.
    pub fn with_exploration(
        online: A,
        mut target: A,
        config: DQNAgentConfig,
        exploration: EpsilonGreedy<D>,
    ) -> Result<Self> {
        config.validate_training()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        target.set_parameters(online.parameters());

        Ok(Self {
            online,
            target,
            memory: ReplayMemory::new(config.memory_capacity),
            exploration,
            metrics: Metrics::new(config.solved_window),
            config,
            rng,
            episode: 0,
            train_steps: 0,
            target_syncs: 0,
        })
    }

    pub fn config(&self) -> &DQNAgentConfig {
        &self.config
    }

    /// The current exploration probability
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    /// Number of finished training episodes
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Number of executed training steps
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Number of scheduled target network synchronizations so far
    pub fn target_syncs(&self) -> usize {
        self.target_syncs
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn memory(&self) -> &ReplayMemory<S> {
        &self.memory
    }

    pub fn online(&self) -> &A {
        &self.online
    }

    pub fn target(&self) -> &A {
        &self.target
    }

    fn check_state(&self, state: &S, what: &'static str) -> Result<()> {
        let actual = state.as_ref().len();
        if actual == self.config.state_dim {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                what,
                expected: self.config.state_dim,
                actual,
            })
        }
    }

    /// The action with the highest predicted value, ties broken by the lowest index
    pub fn greedy_action(&self, state: &S) -> Result<usize> {
        let q_values = self.online.predict(std::slice::from_ref(state))?;
        let values = q_values.first().ok_or(Error::DimensionMismatch {
            what: "prediction batch",
            expected: 1,
            actual: 0,
        })?;
        if values.len() != self.config.num_actions {
            return Err(Error::DimensionMismatch {
                what: "online prediction",
                expected: self.config.num_actions,
                actual: values.len(),
            });
        }

        util::argmax(values).ok_or_else(|| Error::Approximator("empty prediction".into()))
    }

    /// Invoke the agent's policy along with the exploration strategy to choose an action
    pub fn act(&mut self, state: &S) -> Result<usize> {
        match self.exploration.choose(&mut self.rng) {
            Choice::Explore => Ok(self.rng.gen_range(0..self.config.num_actions)),
            Choice::Exploit => self.greedy_action(state),
        }
    }

    /// Store an experience in the replay memory
    pub fn remember(&mut self, exp: Exp<S>) -> Result<()> {
        self.check_state(&exp.state, "state")?;
        self.check_state(&exp.next_state, "next state")?;
        if exp.action >= self.config.num_actions {
            return Err(Error::InvalidAction {
                action: exp.action,
                num_actions: self.config.num_actions,
            });
        }

        self.memory.push(exp);
        Ok(())
    }

    /// Perform one DQN learning step
    ///
    /// ### Returns
    /// - `None` if the memory holds fewer experiences than a batch, in which case nothing,
    ///   including epsilon, changes
    /// - `Some(loss)` otherwise
    pub fn learn(&mut self) -> Result<Option<f32>> {
        // Sample a batch of memories to train on
        let Some(batch) = self
            .memory
            .sample_zipped(self.config.batch_size, &mut self.rng)
        else {
            return Ok(None);
        };

        let q_values = self.online.predict(&batch.states)?;
        let next_q_values = self.target.predict(&batch.next_states)?;
        let targets = build_targets(
            &batch,
            q_values,
            &next_q_values,
            self.config.gamma,
            self.config.num_actions,
        )?;

        let loss = self.online.fit(&batch.states, &targets)?;

        self.exploration.decay();
        self.train_steps += 1;

        Ok(Some(loss))
    }

    /// Hard update: copy every parameter of the online network into the target network
    pub fn sync_target(&mut self) {
        self.target.set_parameters(self.online.parameters());
        self.target_syncs += 1;
        debug!(
            "synchronized target network (episode {}, training step {})",
            self.episode, self.train_steps
        );
    }

    /// Apply the synchronization schedule at step `step` of the current episode
    fn maybe_sync(&mut self, step: usize) {
        if self.episode % self.config.target_sync_period != 0 {
            return;
        }

        let fire = match self.config.sync_schedule {
            SyncSchedule::PerEpisode => step == 0,
            SyncSchedule::PerStep => true,
        };
        if fire {
            self.sync_target();
        }
    }

    /// Persist the online network's parameters
    pub fn save(&self, path: &Path) -> Result<()> {
        self.online.save(path)
    }

    /// Load the online network's parameters and copy them into the target network
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.online.load(path)?;
        self.target.set_parameters(self.online.parameters());
        Ok(())
    }
}
