//! Vehicle state and per-lane geometry
//!
//! A vehicle is tracked by its progress along the lane (distance travelled
//! from the entry point). Screen positions are derived from progress through
//! the lane's `LaneGeometry`.

use anyhow::{ensure, Result};
use ordered_float::OrderedFloat;

use super::config::SimConfig;
use super::traffic_light::TrafficLight;
use super::types::{center_of, Lane, Position, SignalPhase, Size, VehicleId};

/// Fixed layout of one lane, derived from the config and the lane's light
#[derive(Debug, Clone, PartialEq)]
pub struct LaneGeometry {
    pub lane: Lane,
    /// Top-left corner of a vehicle that has just entered
    pub entry: Position,
    /// Vehicle body as drawn in this lane
    pub vehicle_size: Size,
    /// Progress at which a vehicle halts for a non-green light
    pub stop_progress: f32,
    /// Largest progress at which a vehicle has not yet crossed the light
    pub queue_limit: f32,
    /// Screen bounds a vehicle must stay within
    pub bounds: Size,
}

impl LaneGeometry {
    pub fn new(config: &SimConfig, light: &TrafficLight) -> Self {
        let lane = light.lane();
        let width = config.simulator.screen_width;
        let height = config.simulator.screen_height;
        let bumper = config.simulator.bumper_distance;
        let length = config.vehicle.body_length;
        let breadth = config.vehicle.body_width;

        let vehicle_size = if lane.is_horizontal() {
            Size::new(length, breadth)
        } else {
            Size::new(breadth, length)
        };

        let lp = light.position();
        let ls = light.size();

        let (entry, stop_progress, queue_limit) = match lane {
            Lane::LeftToRight => (
                Position::new(0.0, height / 2.0 - breadth - bumper),
                lp.x - ls.width / 2.0 - length,
                lp.x + ls.width - length,
            ),
            Lane::RightToLeft => {
                let start = width - length;
                (
                    Position::new(start, height / 2.0 + bumper),
                    start - (lp.x + ls.width * 1.5),
                    start - (lp.x + ls.width),
                )
            }
            Lane::TopToBottom => (
                Position::new(width / 2.0 + bumper, 0.0),
                lp.y - ls.height / 2.0 - length,
                lp.y - length,
            ),
            Lane::BottomToTop => {
                let start = height - length;
                (
                    Position::new(width / 2.0 - breadth - bumper, start),
                    start - (lp.y + ls.height),
                    start - (lp.y + ls.height),
                )
            }
        };

        Self {
            lane,
            entry,
            vehicle_size,
            stop_progress,
            queue_limit,
            bounds: Size::new(width, height),
        }
    }

    /// Screen position (top-left) of a vehicle at `progress`
    pub fn position_at(&self, progress: f32) -> Position {
        match self.lane {
            Lane::LeftToRight => self.entry.offset(progress, 0.0),
            Lane::RightToLeft => self.entry.offset(-progress, 0.0),
            Lane::TopToBottom => self.entry.offset(0.0, progress),
            Lane::BottomToTop => self.entry.offset(0.0, -progress),
        }
    }

    /// Vehicle body length measured along the direction of travel
    pub fn vehicle_size_along_lane(&self) -> f32 {
        if self.lane.is_horizontal() {
            self.vehicle_size.width
        } else {
            self.vehicle_size.height
        }
    }

    /// Whether a body at `position` lies fully inside the screen
    pub fn contains(&self, position: Position) -> bool {
        (0.0..=self.bounds.width - self.vehicle_size.width).contains(&position.x)
            && (0.0..=self.bounds.height - self.vehicle_size.height).contains(&position.y)
    }
}

/// A vehicle travelling along one lane
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    lane: Lane,
    speed: f32,
    progress: OrderedFloat<f32>,
    position: Position,
    size: Size,
}

impl Vehicle {
    /// Create a vehicle at the lane entry. Fails if `light` guards a
    /// different lane.
    pub fn new(
        id: VehicleId,
        lane: Lane,
        light: &TrafficLight,
        geometry: &LaneGeometry,
        speed: f32,
    ) -> Result<Self> {
        ensure!(
            light.lane() == lane,
            "Vehicle lane {} does not match traffic light lane {}",
            lane.name(),
            light.lane().name()
        );
        ensure!(
            geometry.lane == lane,
            "Vehicle lane {} does not match geometry lane {}",
            lane.name(),
            geometry.lane.name()
        );

        Ok(Self {
            id,
            lane,
            speed,
            progress: OrderedFloat(0.0),
            position: geometry.entry,
            size: geometry.vehicle_size,
        })
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance travelled from the lane entry
    pub fn progress(&self) -> f32 {
        self.progress.into_inner()
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

    /// True until the vehicle has crossed its lane's light
    pub fn is_queued(&self, geometry: &LaneGeometry) -> bool {
        self.progress() <= geometry.queue_limit
    }

    /// Move one tick forward.
    ///
    /// `front_progress` is the progress of the vehicle directly ahead, if any;
    /// the bumper gap to it never drops below `safe_distance`. A vehicle that
    /// has not crossed a non-green light halts at the stop line and never
    /// rolls backwards to reach it.
    pub fn advance(
        &mut self,
        geometry: &LaneGeometry,
        light_phase: SignalPhase,
        front_progress: Option<f32>,
        safe_distance: f32,
    ) {
        let current = self.progress();
        let stopping = light_phase != SignalPhase::Green && self.is_queued(geometry);
        let body = geometry.vehicle_size_along_lane();

        let mut next = current + self.speed;
        if let Some(front) = front_progress {
            next = next.min(front - safe_distance - body);
        }
        if stopping {
            next = next.min(geometry.stop_progress.max(current));
        }

        self.progress = OrderedFloat(next);
        self.position = geometry.position_at(next);
    }
}
