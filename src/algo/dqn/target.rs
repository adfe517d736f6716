use crate::{memory::ExpBatch, util, Error, Result};

/// One-step bootstrapped temporal difference target
///
/// r if the transition ended the episode, otherwise r + γ max<sub>a</sub> Q′(s′, a)
pub fn td_target(reward: f32, next_values: &[f32], done: bool, gamma: f32) -> f32 {
    if done {
        reward
    } else {
        reward + gamma * util::max(next_values).unwrap_or(0.0)
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    (expected == actual)
        .then_some(())
        .ok_or(Error::DimensionMismatch {
            what,
            expected,
            actual,
        })
}

/// Build the regression targets for a batch
///
/// Each target starts as the online network's own prediction for that state, and only the
/// value of the action actually taken is replaced with its [`td_target`], so the loss only
/// moves the taken action's value.
///
/// ### Arguments
/// - `batch` The sampled experiences
/// - `q_values` Online predictions for `batch.states`
/// - `next_q_values` Target network predictions for `batch.next_states`
pub fn build_targets<S>(
    batch: &ExpBatch<S>,
    q_values: Vec<Vec<f32>>,
    next_q_values: &[Vec<f32>],
    gamma: f32,
    num_actions: usize,
) -> Result<Vec<Vec<f32>>> {
    check_len("online prediction batch", batch.len(), q_values.len())?;
    check_len("target prediction batch", batch.len(), next_q_values.len())?;

    q_values
        .into_iter()
        .zip(next_q_values)
        .enumerate()
        .map(|(i, (mut target, next_values))| {
            check_len("online prediction", num_actions, target.len())?;
            check_len("target prediction", num_actions, next_values.len())?;

            let action = batch.actions[i];
            if action >= num_actions {
                return Err(Error::InvalidAction {
                    action,
                    num_actions,
                });
            }

            target[action] = td_target(batch.rewards[i], next_values, batch.dones[i], gamma);
            Ok(target)
        })
        .collect()
}
