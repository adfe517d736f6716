use std::path::Path;

use crate::Result;

mod network;

pub use network::{BurnApproximator, QNetwork};

/// A trainable function approximator mapping states to one value per action
///
/// The learning core only relies on this capability; the architecture and optimizer behind
/// it are the implementor's concern. States are passed as anything viewable as a fixed-length
/// numeric vector.
pub trait Approximator {
    /// A snapshot of every trainable parameter
    type Params: Clone;

    /// Action values for each state of the batch, one vector of length `num_actions` per state
    fn predict<S: AsRef<[f32]>>(&self, states: &[S]) -> Result<Vec<Vec<f32>>>;

    /// Perform one supervised training step towards `targets` and return the scalar loss
    fn fit<S: AsRef<[f32]>>(&mut self, states: &[S], targets: &[Vec<f32>]) -> Result<f32>;

    /// Copy out the current parameters
    fn parameters(&self) -> Self::Params;

    /// Overwrite every parameter with `params`
    fn set_parameters(&mut self, params: Self::Params);

    /// Persist the parameters to `path`
    fn save(&self, path: &Path) -> Result<()>;

    /// Replace the parameters with those persisted at `path`
    fn load(&mut self, path: &Path) -> Result<()>;
}
