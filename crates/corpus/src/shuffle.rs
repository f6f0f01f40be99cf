use rand::rngs::StdRng;
use rand::Rng;

/// Fixed-capacity reservoir that releases a random held item per pop.
///
/// Fill it until [`is_full`](Self::is_full) (or the input runs dry), then
/// alternate pop/push. Only `capacity` items are ever resident, so a stream
/// of any length can be approximately shuffled.
pub struct ShuffleBuffer<T> {
    items: Vec<T>,
    capacity: usize,
    rng: StdRng,
}

impl<T> ShuffleBuffer<T> {
    pub fn new(capacity: usize, rng: StdRng) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            rng,
        }
    }

    pub fn push(&mut self, item: T) {
        debug_assert!(!self.is_full());
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.items.len());
        Some(self.items.swap_remove(idx))
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}
