/// The outcome of a single environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    /// The state after the action was applied
    pub next_state: S,
    /// The reward received for the action
    pub reward: f32,
    /// The episode reached a terminal state of the underlying MDP
    pub terminated: bool,
    /// The episode was cut short from outside the MDP, e.g. by a step limit
    pub truncated: bool,
}

impl<S> Step<S> {
    /// Whether the episode is over, for either reason
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Represents a Markov decision process with a continuous state space and a finite,
/// index-addressed action space
///
/// States are fixed-length numeric vectors; the length must not change for the lifetime of the
/// environment. Actions are integer indices in `[0, num_actions)`.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Clone + AsRef<[f32]>;

    /// The number of discrete actions available in every state
    fn num_actions(&self) -> usize;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: usize) -> Step<Self::State>;

    /// Draw the current state, if the environment supports it
    fn render(&mut self) {}

    /// Release any resources held by the environment
    fn close(&mut self) {}
}
