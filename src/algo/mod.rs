pub mod dqn;

pub use dqn::{DQNAgent, DQNAgentConfig};
