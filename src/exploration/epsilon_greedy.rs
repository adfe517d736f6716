use rand::Rng;

use crate::{decay::Decay, util::check_interval, Result};

use super::Choice;

/// Epsilon greedy exploration policy with a step-wise decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: f32,
    decay: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy from a starting epsilon and a decay schedule
    ///
    /// Fails if `start` is not in `[0, 1]` or lies below the schedule's floor
    pub fn new(start: f32, decay: D) -> Result<Self> {
        check_interval!(start, decay.min(), 1.0);
        Ok(Self {
            epsilon: start,
            decay,
        })
    }

    /// The current exploration probability
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Invoke epsilon greedy policy: explore when a uniform draw in `[0, 1)` is at most epsilon
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f32>() <= self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Advance the decay schedule by one step
    pub fn decay(&mut self) {
        self.epsilon = self.decay.step(self.epsilon);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay::{Constant, Multiplicative};

    #[test]
    fn extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        let always = EpsilonGreedy::new(1.0, Constant).unwrap();
        let never = EpsilonGreedy::new(0.0, Constant).unwrap();
        for _ in 0..100 {
            assert_eq!(always.choose(&mut rng), Choice::Explore);
            assert_eq!(never.choose(&mut rng), Choice::Exploit);
        }
    }

    #[test]
    fn decay_is_monotone_and_floored() {
        let mut policy = EpsilonGreedy::new(1.0, Multiplicative::new(0.9, 0.05).unwrap()).unwrap();
        let mut prev = policy.epsilon();
        for _ in 0..100 {
            policy.decay();
            assert!(policy.epsilon() <= prev, "epsilon is non-increasing");
            assert!(policy.epsilon() >= 0.05, "epsilon never drops below the floor");
            prev = policy.epsilon();
        }
        assert_eq!(policy.epsilon(), 0.05);
    }

    #[test]
    fn rejects_start_below_floor() {
        assert!(EpsilonGreedy::new(0.01, Multiplicative::new(0.9, 0.05).unwrap()).is_err());
        assert!(EpsilonGreedy::new(1.5, Constant).is_err());
    }
}
