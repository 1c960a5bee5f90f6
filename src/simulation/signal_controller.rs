//! Phase controller for the four lights of the junction
//!
//! Owns one `TrafficLight` per lane, runs their timers with the anti-clash
//! guard, and applies or clears fuzzy green extensions per axis.

use log::debug;

use super::config::SimConfig;
use super::traffic_light::TrafficLight;
use super::types::{DoubleLane, Lane, Position, SignalPhase, Size};

/// A light changing phase during an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub lane: Lane,
    pub phase: SignalPhase,
}

#[derive(Debug, Clone)]
pub struct SignalController {
    /// Indexed by `Lane::index`
    lights: [TrafficLight; 4],
    switch_gap: f32,
}

impl SignalController {
    /// Build the four lights around the screen centre. The horizontal axis
    /// starts GREEN, the vertical axis RED.
    pub fn new(config: &SimConfig, now: f32) -> Self {
        let light = |lane: Lane| {
            let phase = match lane.axis() {
                DoubleLane::Horizontal => SignalPhase::Green,
                DoubleLane::Vertical => SignalPhase::Red,
            };
            TrafficLight::new(
                lane,
                light_position(config, lane),
                Size::new(config.traffic_light.body_width, config.traffic_light.body_height),
                config.traffic_light.durations(),
                phase,
                now,
            )
        };

        Self {
            lights: Lane::ALL.map(light),
            switch_gap: config.simulator.gap_between_traffic_switch,
        }
    }

    pub fn light(&self, lane: Lane) -> &TrafficLight {
        &self.lights[lane.index()]
    }

    pub fn lights(&self) -> impl Iterator<Item = &TrafficLight> {
        self.lights.iter()
    }

    pub fn lights_of(&self, axis: DoubleLane) -> [&TrafficLight; 2] {
        axis.lanes().map(|lane| self.light(lane))
    }

    pub fn phase(&self, lane: Lane) -> SignalPhase {
        self.light(lane).phase()
    }

    /// Phase of the perpendicular axis as seen by the guard for `lane`
    pub fn perpendicular_phase(&self, lane: Lane) -> SignalPhase {
        self.phase(lane.axis().perpendicular().representative())
    }

    /// Advance every light's timer at time `now`
    pub fn update(&mut self, now: f32) -> Vec<PhaseChange> {
        let mut changes = Vec::new();
        for lane in Lane::ALL {
            let perpendicular = self.perpendicular_phase(lane);
            let switch_gap = self.switch_gap;
            if let Some(phase) =
                self.lights[lane.index()].auto_update(now, perpendicular, switch_gap)
            {
                changes.push(PhaseChange { lane, phase });
            }
        }
        changes
    }

    /// Axis whose lights currently show GREEN, or `None` while in transition
    pub fn active_double_lane(&self) -> Option<DoubleLane> {
        DoubleLane::ALL
            .into_iter()
            .find(|axis| self.phase(axis.representative()) == SignalPhase::Green)
    }

    pub fn in_transition(&self) -> bool {
        self.active_double_lane().is_none()
    }

    /// Set the green extension on both lanes of the active axis.
    /// Returns the axis that received it.
    pub fn apply_extension(&mut self, seconds: f32) -> Option<DoubleLane> {
        let axis = self.active_double_lane()?;
        for lane in axis.lanes() {
            self.lights[lane.index()].set_green_extension(seconds);
        }
        debug!("Set {} green extension to {:.2}s", axis.name(), seconds);
        Some(axis)
    }

    /// Reset every green extension to zero
    pub fn clear_extension(&mut self) {
        for light in &mut self.lights {
            light.set_green_extension(0.0);
        }
        debug!("Cleared all green extensions");
    }

    /// Green extension currently set on an axis
    pub fn extension_of(&self, axis: DoubleLane) -> f32 {
        self.light(axis.representative()).green_extension()
    }

    /// Green time left on the active axis, or 0 while in transition
    pub fn green_remaining(&self, now: f32) -> f32 {
        match self.active_double_lane() {
            Some(axis) => self.light(axis.representative()).time_left(now),
            None => 0.0,
        }
    }
}

/// Top-left corner of the light body guarding `lane`
fn light_position(config: &SimConfig, lane: Lane) -> Position {
    let cx = config.simulator.screen_width / 2.0;
    let cy = config.simulator.screen_height / 2.0;
    let offset = config.traffic_light.distance_from_center;
    let w = config.traffic_light.body_width;
    let h = config.traffic_light.body_height;

    match lane {
        Lane::LeftToRight => Position::new(cx - offset.x - w, cy - offset.y - h),
        Lane::RightToLeft => Position::new(cx + offset.x, cy + offset.y),
        Lane::TopToBottom => Position::new(cx + offset.y, cy - offset.x - w),
        Lane::BottomToTop => Position::new(cx - offset.y - h, cy + offset.x),
    }
}
