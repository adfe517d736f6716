/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Exp<S> {
    /// The state of the environment before taking the action
    pub state: S,
    /// The index of the action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f32,
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// Whether the episode ended with this transition, by termination or truncation
    pub done: bool,
}

/// A zipped batch of [experiences](Exp)
#[derive(Clone, Debug, PartialEq)]
pub struct ExpBatch<S> {
    pub states: Vec<S>,
    pub actions: Vec<usize>,
    pub rewards: Vec<f32>,
    pub next_states: Vec<S>,
    pub dones: Vec<bool>,
}

impl<S> ExpBatch<S> {
    /// Construct an `ExpBatch` from an iterator of [experiences](Exp) and a specified batch size
    pub fn from_iter(iter: impl IntoIterator<Item = Exp<S>>, batch_size: usize) -> Self {
        let batch = Self {
            states: Vec::with_capacity(batch_size),
            actions: Vec::with_capacity(batch_size),
            rewards: Vec::with_capacity(batch_size),
            next_states: Vec::with_capacity(batch_size),
            dones: Vec::with_capacity(batch_size),
        };

        iter.into_iter().fold(batch, |mut b, e| {
            b.states.push(e.state);
            b.actions.push(e.action);
            b.rewards.push(e.reward);
            b.next_states.push(e.next_state);
            b.dones.push(e.done);
            b
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
