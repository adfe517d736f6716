use crate::{ds::RingBuffer, util};

/// Per-episode training histories
///
/// The four public sequences are parallel: entry `i` of each describes the `i`-th finished
/// training episode.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total reward collected in each episode
    pub rewards: Vec<f32>,
    /// Mean reward over the trailing window, as of the end of each episode
    pub moving_averages: Vec<f32>,
    /// Exploration probability at the end of each episode
    pub epsilons: Vec<f32>,
    /// Mean training loss of each episode, `None` if no training step executed
    pub losses: Vec<Option<f32>>,
    window: RingBuffer<f32>,
}

impl Metrics {
    /// **Panics** if `window` is zero
    pub fn new(window: usize) -> Self {
        Self {
            rewards: Vec::new(),
            moving_averages: Vec::new(),
            epsilons: Vec::new(),
            losses: Vec::new(),
            window: RingBuffer::new(window),
        }
    }

    /// Number of recorded episodes
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Record a finished episode and return its trailing moving average
    pub fn record(&mut self, reward: f32, epsilon: f32, losses: &[f32]) -> f32 {
        self.window.push(reward);
        let moving_average = self.moving_average().unwrap_or(reward);

        self.rewards.push(reward);
        self.moving_averages.push(moving_average);
        self.epsilons.push(epsilon);
        self.losses.push(util::mean(losses.iter().copied()));

        moving_average
    }

    /// Mean of the rewards currently in the trailing window
    pub fn moving_average(&self) -> Option<f32> {
        util::mean(self.window.iter().copied())
    }

    /// The trailing window is full and its mean reaches `threshold`
    pub fn is_solved(&self, threshold: f32) -> bool {
        self.window.is_full() && self.moving_average().is_some_and(|avg| avg >= threshold)
    }
}
