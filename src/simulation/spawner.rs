//! Spawn cadence per axis
//!
//! Each axis re-arms its timer with whatever rate is selected when it fires,
//! so a rate change takes effect on the next spawn.

use super::config::SpawnRateConfig;
use super::types::{DoubleLane, SpawnRate};

#[derive(Debug, Clone, Copy)]
struct AxisSchedule {
    rate: SpawnRate,
    next_at: f32,
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    intervals: SpawnRateConfig,
    /// Indexed horizontal, vertical
    axes: [AxisSchedule; 2],
}

fn axis_index(axis: DoubleLane) -> usize {
    match axis {
        DoubleLane::Horizontal => 0,
        DoubleLane::Vertical => 1,
    }
}

impl SpawnScheduler {
    /// Both axes start at `rate` and fire immediately
    pub fn new(intervals: SpawnRateConfig, rate: SpawnRate, now: f32) -> Self {
        let schedule = AxisSchedule { rate, next_at: now };
        Self {
            intervals,
            axes: [schedule; 2],
        }
    }

    pub fn rate(&self, axis: DoubleLane) -> SpawnRate {
        self.axes[axis_index(axis)].rate
    }

    pub fn set_rate(&mut self, axis: DoubleLane, rate: SpawnRate) {
        self.axes[axis_index(axis)].rate = rate;
    }

    pub fn interval(&self, axis: DoubleLane) -> f32 {
        self.intervals.interval_secs(self.rate(axis))
    }

    /// Axes whose timer has fired by `now`; fired timers are re-armed
    pub fn due(&mut self, now: f32) -> Vec<DoubleLane> {
        let mut fired = Vec::new();
        for axis in DoubleLane::ALL {
            let interval = self.interval(axis);
            let schedule = &mut self.axes[axis_index(axis)];
            if now >= schedule.next_at {
                schedule.next_at = now + interval;
                fired.push(axis);
            }
        }
        fired
    }
}
