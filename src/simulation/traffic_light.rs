//! A single traffic light and its phase timer

use log::debug;

use super::types::{center_of, Lane, PhaseTable, Position, SignalPhase, Size};

/// Traffic light guarding one lane
#[derive(Debug, Clone)]
pub struct TrafficLight {
    lane: Lane,
    /// Top-left corner of the light body
    position: Position,
    size: Size,
    phase: SignalPhase,
    durations: PhaseTable<f32>,
    /// Extra green time granted by the fuzzy engine; zero outside GREEN
    green_extension: f32,
    /// Simulation time at which each phase was last entered
    started_at: PhaseTable<f32>,
}

impl TrafficLight {
    pub fn new(
        lane: Lane,
        position: Position,
        size: Size,
        durations: PhaseTable<f32>,
        phase: SignalPhase,
        now: f32,
    ) -> Self {
        Self {
            lane,
            position,
            size,
            phase,
            durations,
            green_extension: 0.0,
            started_at: PhaseTable::splat(now),
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn center(&self) -> Position {
        center_of(self.position, self.size)
    }

    pub fn base_duration(&self, phase: SignalPhase) -> f32 {
        self.durations.get(phase)
    }

    pub fn extension(&self, phase: SignalPhase) -> f32 {
        match phase {
            SignalPhase::Green => self.green_extension,
            SignalPhase::Red | SignalPhase::Yellow => 0.0,
        }
    }

    pub fn green_extension(&self) -> f32 {
        self.green_extension
    }

    pub fn set_green_extension(&mut self, seconds: f32) {
        self.green_extension = seconds.max(0.0);
    }

    /// Time spent in the current phase, never negative
    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.started_at.get(self.phase)).max(0.0)
    }

    /// Signed time left in the current phase; negative once it has expired
    pub fn remaining(&self, now: f32) -> f32 {
        self.base_duration(self.phase) + self.extension(self.phase) - self.elapsed(now)
    }

    /// Time left in the current phase for display, clamped at zero
    pub fn time_left(&self, now: f32) -> f32 {
        self.remaining(now).max(0.0)
    }

    /// Force a phase and restart its timer
    pub fn change_phase(&mut self, phase: SignalPhase, now: f32) {
        if self.phase == SignalPhase::Green && phase != SignalPhase::Green {
            self.green_extension = 0.0;
        }
        self.phase = phase;
        self.started_at.set(phase, now);
    }

    /// Advance the phase timer.
    ///
    /// RED only turns GREEN when the perpendicular axis is not green and the
    /// red phase has been expired for at least `switch_gap` seconds.
    /// Returns the new phase when a transition happened.
    pub fn auto_update(
        &mut self,
        now: f32,
        perpendicular: SignalPhase,
        switch_gap: f32,
    ) -> Option<SignalPhase> {
        let remaining = self.remaining(now);
        if remaining > 0.0 {
            return None;
        }

        let next = self.phase.next();
        if self.phase == SignalPhase::Red {
            if perpendicular == SignalPhase::Green {
                return None;
            }
            if remaining.abs() < switch_gap {
                return None;
            }
        }

        debug!(
            "{} light {:?} -> {:?} at {:.2}s",
            self.lane.name(),
            self.phase,
            next,
            now
        );
        self.change_phase(next, now);
        Some(next)
    }
}
