#![allow(clippy::len_without_is_empty)]

/// A fixed-capacity ring buffer that overwrites its oldest element once full
#[derive(Debug, Default, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Constructs an empty `RingBuffer`
    ///
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be non-zero.");
        Self {
            buffer: Vec::with_capacity(capacity),
            ix: 0,
            capacity,
        }
    }

    /// Returns the number of stored elements
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Insert an element, overwriting the oldest element if full, and return the write index
    pub fn push(&mut self, item: T) -> usize {
        let ix = self.ix;
        if ix >= self.len() {
            self.buffer.push(item);
        } else {
            self.buffer[ix] = item;
        }
        self.ix = (ix + 1) % self.capacity;
        ix
    }

    /// Get a slice view of the internal storage, in write-slot order
    pub fn view(&self) -> &[T] {
        &self.buffer
    }

    /// Iterate from the oldest to the newest element
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        // Before the first wrap `ix == len`, so the first half is empty
        self.buffer[self.ix..]
            .iter()
            .chain(self.buffer[..self.ix].iter())
    }
}
