//! Rolling queue-length statistics per lane

use std::collections::VecDeque;

use super::types::Lane;

/// Bounded FIFO of queued-vehicle counts, one per tick
#[derive(Debug, Clone)]
pub struct QueueSamples {
    samples: VecDeque<u32>,
    capacity: usize,
    sum: u64,
}

impl QueueSamples {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            sum: 0,
        }
    }

    /// Append a sample, evicting the oldest once full
    pub fn push(&mut self, count: u32) {
        self.samples.push_back(count);
        self.sum += u64::from(count);
        if self.samples.len() > self.capacity {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum -= u64::from(oldest);
            }
        }
    }

    /// Arithmetic mean of the held samples, 0 when empty
    pub fn mean(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum as f32 / self.samples.len() as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }
}

/// Moving averages of queued vehicles for the four lanes
#[derive(Debug, Clone)]
pub struct QueueEstimator {
    /// Indexed by `Lane::index`
    lanes: [QueueSamples; 4],
}

impl QueueEstimator {
    pub fn new(capacity: usize) -> Self {
        Self {
            lanes: std::array::from_fn(|_| QueueSamples::new(capacity)),
        }
    }

    pub fn record(&mut self, lane: Lane, queued: u32) {
        self.lanes[lane.index()].push(queued);
    }

    pub fn moving_average(&self, lane: Lane) -> f32 {
        self.lanes[lane.index()].mean()
    }

    pub fn samples(&self, lane: Lane) -> &QueueSamples {
        &self.lanes[lane.index()]
    }
}
