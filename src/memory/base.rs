use rand::{seq::SliceRandom, Rng};

use crate::ds::RingBuffer;

use super::{Exp, ExpBatch};

/// A fixed-size memory storage for reinforcement learning experiences
///
/// This structure uses a ring buffer to store experiences. Once it reaches its capacity it
/// overwrites the oldest experience on every push (strict FIFO eviction).
#[derive(Debug, Clone)]
pub struct ReplayMemory<S> {
    memory: RingBuffer<Exp<S>>,
}

impl<S: Clone> ReplayMemory<S> {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        Self {
            memory: RingBuffer::new(capacity),
        }
    }

    /// Add a new experience to the memory
    pub fn push(&mut self, exp: Exp<S>) {
        self.memory.push(exp);
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// Iterate over the stored experiences from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Exp<S>> {
        self.memory.iter()
    }

    /// Sample a random batch of distinct experiences from the memory
    ///
    /// ### Returns
    /// - `Some(experiences)` if `batch_size` is less than or equal to the buffer length
    /// - `None` otherwise
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Option<Vec<Exp<S>>> {
        (batch_size <= self.memory.len()).then(|| {
            self.memory
                .view()
                .choose_multiple(rng, batch_size)
                .cloned()
                .collect()
        })
    }

    /// Sample a random batch of experiences from the memory and zip the vector of structs into
    /// a struct of vectors
    ///
    /// ### Returns
    /// - `Some(batch)` if `batch_size` is less than or equal to the buffer length
    /// - `None` otherwise
    pub fn sample_zipped<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Option<ExpBatch<S>> {
        let experiences = self.sample(batch_size, rng)?;
        Some(ExpBatch::from_iter(experiences, batch_size))
    }
}
