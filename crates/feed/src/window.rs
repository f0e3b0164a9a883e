use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// One metric reading taken on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub sequence: u64,
    pub value: f64,
}

impl Sample {
    pub const fn new(sequence: u64, value: f64) -> Self {
        Self { sequence, value }
    }
}

/// Fixed-size FIFO of the most recent samples, oldest first.
///
/// Always holds exactly `capacity` samples: it starts pre-filled with zeros
/// numbered `0..capacity` and every [`push`](Self::push) evicts the front.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<Sample>,
}

impl RollingWindow {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let samples = (0..capacity.get() as u64)
            .map(|seq| Sample::new(seq, 0.0))
            .collect();
        Self { samples }
    }

    /// Append `value` under the next sequence number and evict the oldest
    /// sample.  Returns the sample that was appended.
    pub fn push(&mut self, value: f64) -> Sample {
        let sample = Sample::new(self.last_sequence() + 1, value);
        self.samples.push_back(sample);
        self.samples.pop_front();
        sample
    }

    pub fn last_sequence(&self) -> u64 {
        // Never empty: constructed non-empty and `push` is length-preserving.
        self.samples.back().map_or(0, |s| s.sequence)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Contiguous view of the window, oldest first.
    pub fn as_slice(&mut self) -> &[Sample] {
        self.samples.make_contiguous()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }
}
