//! When to ask the fuzzy engine for more green time
//!
//! Watches the active axis's remaining green. Once it falls to the threshold
//! the engine is consulted with the green axis's queue (arriving) and the red
//! axis's queue (waiting). A jump in remaining green means a new phase began,
//! which clears extensions and re-arms the policy.

use log::info;

use super::fuzzy::{ExtensionRound, FuzzyExtensionEngine};
use super::queue::QueueEstimator;
use super::signal_controller::SignalController;
use super::types::DoubleLane;

/// One granted extension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtensionDecision {
    pub axis: DoubleLane,
    pub round: u32,
    /// Moving average of the axis holding green
    pub arriving: f32,
    /// Moving average of the axis held at red
    pub waiting: f32,
    /// Seconds added by this decision
    pub seconds: f32,
    /// Total green extension on the axis after this decision
    pub total: f32,
    pub decided_at: f32,
}

#[derive(Debug, Clone)]
pub struct ExtensionPolicy {
    threshold: f32,
    max_rounds: u32,
    rounds_granted: u32,
    last_green_remaining: f32,
    latest: Option<ExtensionDecision>,
}

impl ExtensionPolicy {
    pub fn new(threshold: f32, max_rounds: u32, initial_green: f32) -> Self {
        Self {
            threshold,
            max_rounds,
            rounds_granted: 0,
            last_green_remaining: initial_green,
            latest: None,
        }
    }

    /// Decisions granted in the current green phase
    pub fn rounds_granted(&self) -> u32 {
        self.rounds_granted
    }

    pub fn is_extended(&self) -> bool {
        self.rounds_granted > 0
    }

    pub fn latest(&self) -> Option<&ExtensionDecision> {
        self.latest.as_ref()
    }

    /// Run the policy once for time `now`, after the lights have been updated
    pub fn evaluate(
        &mut self,
        now: f32,
        signals: &mut SignalController,
        engine: &FuzzyExtensionEngine,
        queues: &QueueEstimator,
    ) -> Option<ExtensionDecision> {
        let remaining = signals.green_remaining(now);
        let axis_changed = remaining > self.last_green_remaining;
        self.last_green_remaining = remaining;

        if axis_changed {
            if let Some(axis) = signals.active_double_lane() {
                info!("{} axis turned green at {:.2}s", axis.name(), now);
            }
            if self.rounds_granted > 0 {
                signals.clear_extension();
            }
            self.rounds_granted = 0;
        }

        if self.rounds_granted >= self.max_rounds || remaining > self.threshold {
            return None;
        }
        let axis = signals.active_double_lane()?;

        let arriving = queues.moving_average(axis.representative());
        let waiting = queues.moving_average(axis.perpendicular().representative());
        let round = self.rounds_granted;
        let seconds = engine.extend(arriving, waiting, ExtensionRound::from(round));
        let total = signals.extension_of(axis) + seconds;
        signals.apply_extension(total);

        self.rounds_granted += 1;
        // The extension itself raises remaining green; that is not a new phase.
        self.last_green_remaining = signals.green_remaining(now);

        let decision = ExtensionDecision {
            axis,
            round,
            arriving,
            waiting,
            seconds,
            total,
            decided_at: now,
        };
        info!(
            "Fuzzy decision round {} for {}: arriving {:.2}, waiting {:.2} -> +{:.2}s",
            round,
            axis.name(),
            arriving,
            waiting,
            seconds
        );
        self.latest = Some(decision);
        Some(decision)
    }

    /// Latest decision if made within the last `window` seconds
    pub fn recent(&self, now: f32, window: f32) -> Option<&ExtensionDecision> {
        self.latest
            .as_ref()
            .filter(|decision| now - decision.decided_at < window)
    }
}
