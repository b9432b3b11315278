use std::num::NonZeroUsize;

/// Default number of lines remembered by [`HistoryRing`].
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Fixed-capacity circular buffer of previously entered lines.
///
/// Storage never grows past `capacity`; once full, each new entry replaces (and
/// drops) the oldest one. A monotonic position counter tracks how many lines were
/// ever recorded, `position % capacity` being the next slot to write.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    slots: Box<[Option<String>]>,
    position: usize,
}

impl HistoryRing {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: vec![None; capacity.get()].into_boxed_slice(),
            position: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.position.min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Total number of lines recorded since creation.
    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Stores an owned copy of `text`, releasing whatever occupied its slot.
    pub fn record(&mut self, text: &str) {
        let slot = self.position % self.capacity();
        self.slots[slot] = Some(text.to_owned());
        self.position += 1;
    }

    /// Up to `n` most recent entries, most recent first.
    ///
    /// Never yields more than `capacity` entries nor reads a slot that was never written.
    pub fn recent(&self, n: usize) -> Vec<&str> {
        let capacity = self.capacity();
        (0..n.min(self.len()))
            .filter_map(|back| {
                let slot = (self.position - 1 - back) % capacity;
                self.slots[slot].as_deref()
            })
            .collect()
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
