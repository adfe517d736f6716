use gym_rs::{
    core::{ActionReward, Env},
    envs::classical_control::cartpole::{CartPoleEnv, CartPoleObservation},
    spaces::BoxR,
    utils::renderer::RenderMode,
};
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{FromRepr, VariantArray};

use crate::env::{Environment, Step};

/// Bound on every component of the initial observation
const INITIAL_BOUND: f64 = 0.05;
/// Half the track length, used for rendering
const X_THRESHOLD: f32 = 2.4;

fn obs2arr(observation: CartPoleObservation) -> [f32; 4] {
    Vec::from(observation)
        .into_iter()
        .map(|x| x as f32)
        .collect::<Vec<_>>()
        .try_into()
        .expect("vec is length 4")
}

/// Actions for the [`CartPole`] environment, representing applying a left or right force to the cart
#[derive(FromRepr, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CPAction {
    Left = 0,
    Right = 1,
}

impl From<usize> for CPAction {
    fn from(value: usize) -> Self {
        Self::from_repr(value).expect("CPAction::from is only called with valid values [0, 1]")
    }
}

/// The classic CartPole reinforcement learning environment
///
/// This implementation is a thin wrapper around [gym_rs](https://github.com/MathisWellmann/gym-rs).
/// The wrapped environment only reports termination, so episodes are truncated here after
/// `max_steps` steps.
#[derive(Debug, Clone)]
pub struct CartPole {
    gym_env: CartPoleEnv,
    state: [f32; 4],
    steps: usize,
    max_steps: usize,
    rng: Option<StdRng>,
}

impl CartPole {
    /// Default step limit, matching CartPole-v1
    pub const MAX_STEPS: usize = 500;

    pub fn new(render_mode: RenderMode) -> Self {
        Self {
            gym_env: CartPoleEnv::new(render_mode),
            state: [0.0; 4],
            steps: 0,
            max_steps: Self::MAX_STEPS,
            rng: None,
        }
    }

    /// A headless CartPole whose resets are seeded from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
            ..Self::new(RenderMode::None)
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn state(&self) -> [f32; 4] {
        self.state
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new(RenderMode::None)
    }
}

impl Environment for CartPole {
    type State = [f32; 4];

    fn num_actions(&self) -> usize {
        CPAction::VARIANTS.len()
    }

    fn reset(&mut self) -> Self::State {
        let seed = self.rng.as_mut().map(|rng| rng.gen());
        let high = CartPoleObservation::new(
            INITIAL_BOUND.into(),
            INITIAL_BOUND.into(),
            INITIAL_BOUND.into(),
            INITIAL_BOUND.into(),
        );
        let (observation, _) = self
            .gym_env
            .reset(seed, false, Some(BoxR::new(-high, high)));

        self.state = obs2arr(observation);
        self.steps = 0;
        self.state
    }

    /// **Panics** if `action` is not 0 or 1
    fn step(&mut self, action: usize) -> Step<Self::State> {
        let ActionReward {
            observation,
            reward,
            done,
            ..
        } = self.gym_env.step(CPAction::from(action) as usize);

        self.state = obs2arr(observation);
        self.steps += 1;

        Step {
            next_state: self.state,
            reward: *reward as f32,
            terminated: done,
            truncated: self.steps >= self.max_steps,
        }
    }

    fn render(&mut self) {
        const WIDTH: f32 = 40.0;
        let [x, _, theta, _] = self.state;
        let col = (((x + X_THRESHOLD) / (2.0 * X_THRESHOLD)) * WIDTH).clamp(0.0, WIDTH) as usize;
        debug!(
            "|{}{}{}| theta {:+.3}",
            " ".repeat(col),
            if theta < 0.0 { '\\' } else { '/' },
            " ".repeat(WIDTH as usize - col),
            theta,
        );
    }

    fn close(&mut self) {
        self.gym_env.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obs2arr_functional() {
        let obs = CartPoleObservation::new(0.0.into(), 1.0.into(), 2.0.into(), 3.0.into());
        let arr = obs2arr(obs);
        assert_eq!(arr, [0.0, 1.0, 2.0, 3.0], "obs2arr conversion works");
    }

    #[test]
    fn reset_is_near_upright() {
        let mut env = CartPole::seeded(0);
        let state = env.reset();
        assert!(
            state.iter().all(|v| v.abs() <= INITIAL_BOUND as f32),
            "initial state in [-0.05, 0.05]"
        );
        assert_eq!(env.state(), state);
    }

    #[test]
    fn seeded_resets_repeat() {
        let mut a = CartPole::seeded(9);
        let mut b = CartPole::seeded(9);
        assert_eq!(a.reset(), b.reset());
        assert_eq!(a.reset(), b.reset(), "later resets follow the same seed sequence");
    }

    #[test]
    fn constant_push_topples_pole() {
        let mut env = CartPole::seeded(1);
        env.reset();
        let mut steps = 0;
        loop {
            let step = env.step(CPAction::Right as usize);
            steps += 1;
            assert_eq!(step.reward, 1.0);
            if step.done() {
                assert!(step.terminated, "pole falls long before truncation");
                break;
            }
        }
        assert!(steps < 100);
    }

    #[test]
    fn truncates_at_step_limit() {
        let mut env = CartPole::seeded(2).with_max_steps(3);
        env.reset();
        let mut last = env.step(0);
        assert!(!last.truncated);
        for i in 1..3 {
            last = env.step(i % 2);
        }
        assert!(last.truncated);
        assert!(!last.terminated, "pole still up after three steps");
    }
}
