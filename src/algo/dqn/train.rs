use log::info;

use super::DQNAgent;
use crate::{
    approx::Approximator, decay::Decay, env::Environment, memory::Exp, util, Error, Result,
};

/// Summary of one finished training episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    /// Global index of the episode, starting at 0
    pub episode: usize,
    pub reward: f32,
    pub steps: usize,
    /// Mean reward over the trailing window including this episode
    pub moving_average: f32,
    /// Epsilon at the end of the episode
    pub epsilon: f32,
    /// Mean loss of the training steps executed during the episode
    pub mean_loss: Option<f32>,
}

/// Outcome of [`DQNAgent::train`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainReport {
    /// Number of episodes run by this call
    pub episodes: usize,
    /// Training stopped early because the moving average reached the threshold
    pub solved: bool,
}

impl<S, A, D> DQNAgent<S, A, D>
where
    S: Clone + AsRef<[f32]>,
    A: Approximator,
    D: Decay,
{
    fn check_env<E: Environment<State = S>>(&self, env: &E) -> Result<()> {
        let actual = env.num_actions();
        if actual == self.config.num_actions {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                what: "action space",
                expected: self.config.num_actions,
                actual,
            })
        }
    }

    /// Train for up to `max_episodes` episodes, stopping early once the environment is solved
    pub fn train<E: Environment<State = S>>(&mut self, env: &mut E) -> Result<TrainReport> {
        for i in 0..self.config.max_episodes {
            let summary = self.run_episode(env)?;

            if self.metrics.is_solved(self.config.solved_threshold) {
                info!(
                    "Solved after {} episodes with a moving average reward of {:.2}",
                    i + 1,
                    summary.moving_average
                );
                return Ok(TrainReport {
                    episodes: i + 1,
                    solved: true,
                });
            }
        }

        Ok(TrainReport {
            episodes: self.config.max_episodes,
            solved: false,
        })
    }

    /// Deploy the `DQNAgent` into the environment for one training episode
    pub fn run_episode<E: Environment<State = S>>(&mut self, env: &mut E) -> Result<EpisodeSummary> {
        self.check_env(env)?;

        let mut state = env.reset();
        self.check_state(&state, "initial state")?;

        let mut reward = 0.0;
        let mut losses = Vec::new();
        let mut steps = 0;

        while steps < self.config.max_steps_per_episode {
            let action = self.act(&state)?;
            let step = env.step(action);
            if self.config.render {
                env.render();
            }
            let done = step.done();

            self.remember(Exp {
                state,
                action,
                reward: step.reward,
                next_state: step.next_state.clone(),
                done,
            })?;

            if let Some(loss) = self.learn()? {
                losses.push(loss);
            }

            self.maybe_sync(steps);

            state = step.next_state;
            reward += step.reward;
            steps += 1;

            if done {
                break;
            }
        }

        let episode = self.episode;
        self.episode += 1;

        let epsilon = self.exploration.epsilon();
        let moving_average = self.metrics.record(reward, epsilon, &losses);
        let mean_loss = util::mean(losses);

        info!(
            "Episode {} | reward {:.1} | moving average {:.2} | epsilon {:.3} | loss {}",
            episode,
            reward,
            moving_average,
            epsilon,
            mean_loss.map_or(String::from("-"), |l| format!("{:.4}", l)),
        );

        Ok(EpisodeSummary {
            episode,
            reward,
            steps,
            moving_average,
            epsilon,
            mean_loss,
        })
    }

    /// Run `episodes` greedy episodes without exploration or learning
    ///
    /// **Returns** the total reward of each episode
    pub fn evaluate<E: Environment<State = S>>(
        &self,
        env: &mut E,
        episodes: usize,
    ) -> Result<Vec<f32>> {
        self.check_env(env)?;

        (0..episodes)
            .map(|i| {
                let mut state = env.reset();
                self.check_state(&state, "initial state")?;

                let mut reward = 0.0;
                for _ in 0..self.config.max_steps_per_episode {
                    let step = env.step(self.greedy_action(&state)?);
                    if self.config.render {
                        env.render();
                    }
                    self.check_state(&step.next_state, "next state")?;

                    reward += step.reward;
                    if step.done() {
                        break;
                    }
                    state = step.next_state;
                }

                info!("Evaluation episode {} | reward {:.1}", i, reward);
                Ok(reward)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algo::dqn::{DQNAgentConfig, SyncSchedule},
        approx::tests::MockApproximator,
        env::tests::MockEnv,
    };

    fn agent(config: DQNAgentConfig) -> DQNAgent<[f32; 2], MockApproximator> {
        DQNAgent::new(
            MockApproximator::new(vec![0.1, 0.2]),
            MockApproximator::new(vec![0.1, 0.2]),
            config.with_seed(Some(1)),
        )
        .unwrap()
    }

    fn config() -> DQNAgentConfig {
        DQNAgentConfig::new(2, 2)
            .with_memory_capacity(16)
            .with_batch_size(4)
    }

    #[test]
    fn episode_collects_transitions() {
        let mut agent = agent(config());
        let mut env = MockEnv::new(3, 2.0);

        let summary = agent.run_episode(&mut env).unwrap();
        assert_eq!(summary.episode, 0);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.reward, 6.0);
        assert_eq!(summary.mean_loss, None, "too few experiences to train");
        assert_eq!(agent.memory().len(), 3);
        assert!(
            agent.memory().iter().last().is_some_and(|e| e.done),
            "last transition is terminal"
        );
        assert_eq!(agent.episode(), 1);

        let summary = agent.run_episode(&mut env).unwrap();
        assert_eq!(summary.episode, 1);
        assert_eq!(summary.mean_loss, Some(0.5), "trained once the batch fits");
        assert_eq!(agent.train_steps(), 3, "one training step per transition");
        assert_eq!(agent.metrics().losses, [None, Some(0.5)]);
    }

    #[test]
    fn episode_respects_step_cap() {
        let mut agent = agent(config().with_max_steps_per_episode(5));
        let mut env = MockEnv::new(100, 1.0);

        let summary = agent.run_episode(&mut env).unwrap();
        assert_eq!(summary.steps, 5);
        assert_eq!(summary.reward, 5.0);
        assert!(agent.memory().iter().all(|e| !e.done));
    }

    #[test]
    fn sync_once_per_qualifying_episode() {
        let mut agent = agent(config().with_target_sync_period(2));
        let mut env = MockEnv::new(3, 1.0);
        for _ in 0..4 {
            agent.run_episode(&mut env).unwrap();
        }
        assert_eq!(agent.target_syncs(), 2, "episodes 0 and 2 sync once each");
    }

    #[test]
    fn sync_every_step_of_qualifying_episode() {
        let mut agent = agent(
            config()
                .with_target_sync_period(2)
                .with_sync_schedule(SyncSchedule::PerStep),
        );
        let mut env = MockEnv::new(3, 1.0);
        for _ in 0..4 {
            agent.run_episode(&mut env).unwrap();
        }
        assert_eq!(agent.target_syncs(), 6, "every step of episodes 0 and 2");
    }

    #[test]
    fn train_stops_at_max_episodes() {
        let mut agent = agent(
            config()
                .with_max_episodes(7)
                .with_solved_window(5)
                .with_solved_threshold(100.0),
        );
        let mut env = MockEnv::new(2, 1.0);

        let report = agent.train(&mut env).unwrap();
        assert_eq!(
            report,
            TrainReport {
                episodes: 7,
                solved: false
            }
        );
        assert_eq!(agent.metrics().len(), 7);
        assert_eq!(env.resets, 7);
    }

    #[test]
    fn evaluate_leaves_training_state_alone() {
        let mut agent = agent(config());
        let mut env = MockEnv::new(4, 1.0);
        agent.run_episode(&mut env).unwrap();
        agent.run_episode(&mut env).unwrap();

        let epsilon = agent.epsilon();
        let memory_len = agent.memory().len();
        let train_steps = agent.train_steps();

        let rewards = agent.evaluate(&mut env, 3).unwrap();
        assert_eq!(rewards, [4.0, 4.0, 4.0]);
        assert_eq!(agent.epsilon(), epsilon);
        assert_eq!(agent.memory().len(), memory_len);
        assert_eq!(agent.train_steps(), train_steps);
        assert_eq!(agent.episode(), 2);
        assert_eq!(agent.metrics().len(), 2);
    }

    #[test]
    fn rejects_mismatched_environment() {
        let mut agent = DQNAgent::<[f32; 2], _>::new(
            MockApproximator::new(vec![0.0, 0.0, 0.0]),
            MockApproximator::new(vec![0.0, 0.0, 0.0]),
            DQNAgentConfig::new(2, 3),
        )
        .unwrap();
        let mut env = MockEnv::new(3, 1.0);

        assert_eq!(
            agent.run_episode(&mut env),
            Err(Error::DimensionMismatch {
                what: "action space",
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn rejects_malformed_state() {
        let mut agent = DQNAgent::<[f32; 2], _>::new(
            MockApproximator::new(vec![0.0, 0.0]),
            MockApproximator::new(vec![0.0, 0.0]),
            DQNAgentConfig::new(3, 2),
        )
        .unwrap();
        let mut env = MockEnv::new(3, 1.0);

        assert!(matches!(
            agent.run_episode(&mut env),
            Err(Error::DimensionMismatch {
                what: "initial state",
                ..
            })
        ));
    }
}
