/// Implemented RL algorithms
pub mod algo;

/// Function approximators mapping states to action values
pub mod approx;

/// Step-wise decay schedules for hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Experience replay
pub mod memory;

/// Training metrics
pub mod metrics;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use error::{Error, Result};
