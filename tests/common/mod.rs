#![allow(dead_code)]

use std::path::Path;

use dqn::{
    approx::Approximator,
    env::{Environment, Step},
    Error, Result,
};

/// Linear action-value model `Q(s) = W s + b` trained by plain gradient descent on the MSE
///
/// Every fit call is kept in `history` as `(states, targets)`.
#[derive(Debug, Clone)]
pub struct LinearApproximator {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub lr: f32,
    pub history: Vec<(Vec<Vec<f32>>, Vec<Vec<f32>>)>,
}

impl LinearApproximator {
    pub fn new(state_dim: usize, num_actions: usize, init: f32) -> Self {
        Self {
            weights: (0..num_actions)
                .map(|a| (0..state_dim).map(|i| init * (a + i + 1) as f32).collect())
                .collect(),
            bias: vec![0.0; num_actions],
            lr: 0.01,
            history: Vec::new(),
        }
    }

    fn forward(&self, state: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| w.iter().zip(state).map(|(w, s)| w * s).sum::<f32>() + b)
            .collect()
    }
}

impl Approximator for LinearApproximator {
    type Params = (Vec<Vec<f32>>, Vec<f32>);

    fn predict<S: AsRef<[f32]>>(&self, states: &[S]) -> Result<Vec<Vec<f32>>> {
        Ok(states.iter().map(|s| self.forward(s.as_ref())).collect())
    }

    fn fit<S: AsRef<[f32]>>(&mut self, states: &[S], targets: &[Vec<f32>]) -> Result<f32> {
        self.history.push((
            states.iter().map(|s| s.as_ref().to_vec()).collect(),
            targets.to_vec(),
        ));

        let n = (states.len() * self.bias.len()) as f32;
        let mut loss = 0.0;
        for (state, target) in states.iter().zip(targets) {
            let state = state.as_ref();
            let prediction = self.forward(state);
            for (a, (p, t)) in prediction.iter().zip(target).enumerate() {
                let err = p - t;
                loss += err * err / n;
                let grad = 2.0 * err / n;
                for (w, s) in self.weights[a].iter_mut().zip(state) {
                    *w -= self.lr * grad * s;
                }
                self.bias[a] -= self.lr * grad;
            }
        }
        Ok(loss)
    }

    fn parameters(&self) -> Self::Params {
        (self.weights.clone(), self.bias.clone())
    }

    fn set_parameters(&mut self, (weights, bias): Self::Params) {
        self.weights = weights;
        self.bias = bias;
    }

    fn save(&self, _path: &Path) -> Result<()> {
        Err(Error::Record("not supported".into()))
    }

    fn load(&mut self, _path: &Path) -> Result<()> {
        Err(Error::Record("not supported".into()))
    }
}

/// Environment replaying fixed episodes, cycling through them on every reset
///
/// Actions are ignored. Stepping past the end of a script yields a terminal step.
pub struct ScriptedEnv {
    pub initial: [f32; 2],
    pub episodes: Vec<Vec<Step<[f32; 2]>>>,
    pub resets: usize,
    episode: usize,
    t: usize,
}

impl ScriptedEnv {
    pub fn new(initial: [f32; 2], episodes: Vec<Vec<Step<[f32; 2]>>>) -> Self {
        Self {
            initial,
            episodes,
            resets: 0,
            episode: 0,
            t: 0,
        }
    }

    /// One single-step episode per reward
    pub fn from_rewards(rewards: &[f32]) -> Self {
        let episodes = rewards
            .iter()
            .map(|&reward| {
                vec![Step {
                    next_state: [1.0, 0.0],
                    reward,
                    terminated: true,
                    truncated: false,
                }]
            })
            .collect();
        Self::new([0.0, 1.0], episodes)
    }
}

impl Environment for ScriptedEnv {
    type State = [f32; 2];

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Self::State {
        self.episode = self.resets % self.episodes.len();
        self.resets += 1;
        self.t = 0;
        self.initial
    }

    fn step(&mut self, _action: usize) -> Step<Self::State> {
        let script = &self.episodes[self.episode];
        let step = script.get(self.t).cloned().unwrap_or(Step {
            next_state: self.initial,
            reward: 0.0,
            terminated: true,
            truncated: false,
        });
        self.t += 1;
        step
    }
}
