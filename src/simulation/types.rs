//! Core types for the intersection simulation
//!
//! Closed enums for lanes, axes and signal phases, plus the small value types
//! shared by every component.

use serde::{Deserialize, Serialize};

/// One of the four directional movements through the junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Lane {
    pub const ALL: [Lane; 4] = [
        Lane::LeftToRight,
        Lane::RightToLeft,
        Lane::TopToBottom,
        Lane::BottomToTop,
    ];

    /// Stable index used for per-lane arrays
    pub fn index(self) -> usize {
        match self {
            Lane::LeftToRight => 0,
            Lane::RightToLeft => 1,
            Lane::TopToBottom => 2,
            Lane::BottomToTop => 3,
        }
    }

    /// The axis this lane belongs to
    pub fn axis(self) -> DoubleLane {
        match self {
            Lane::LeftToRight | Lane::RightToLeft => DoubleLane::Horizontal,
            Lane::TopToBottom | Lane::BottomToTop => DoubleLane::Vertical,
        }
    }

    /// Whether vehicles in this lane move along the x axis
    pub fn is_horizontal(self) -> bool {
        self.axis() == DoubleLane::Horizontal
    }

    pub fn name(self) -> &'static str {
        match self {
            Lane::LeftToRight => "left-to-right",
            Lane::RightToLeft => "right-to-left",
            Lane::TopToBottom => "top-to-bottom",
            Lane::BottomToTop => "bottom-to-top",
        }
    }
}

/// A pair of opposing lanes that share one green window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoubleLane {
    Horizontal,
    Vertical,
}

impl DoubleLane {
    pub const ALL: [DoubleLane; 2] = [DoubleLane::Horizontal, DoubleLane::Vertical];

    pub fn lanes(self) -> [Lane; 2] {
        match self {
            DoubleLane::Horizontal => [Lane::LeftToRight, Lane::RightToLeft],
            DoubleLane::Vertical => [Lane::TopToBottom, Lane::BottomToTop],
        }
    }

    /// The axis crossing this one
    pub fn perpendicular(self) -> DoubleLane {
        match self {
            DoubleLane::Horizontal => DoubleLane::Vertical,
            DoubleLane::Vertical => DoubleLane::Horizontal,
        }
    }

    /// Lane whose light and queue stand in for the whole axis.
    /// Both lanes of an axis change phase together, so either would do.
    pub fn representative(self) -> Lane {
        match self {
            DoubleLane::Horizontal => Lane::LeftToRight,
            DoubleLane::Vertical => Lane::TopToBottom,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DoubleLane::Horizontal => "horizontal",
            DoubleLane::Vertical => "vertical",
        }
    }
}

/// Signal shown by a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalPhase {
    Red,
    Green,
    Yellow,
}

impl SignalPhase {
    /// Next phase in the GREEN -> YELLOW -> RED -> GREEN cycle
    pub fn next(self) -> SignalPhase {
        match self {
            SignalPhase::Green => SignalPhase::Yellow,
            SignalPhase::Yellow => SignalPhase::Red,
            SignalPhase::Red => SignalPhase::Green,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            SignalPhase::Red => 'R',
            SignalPhase::Green => 'G',
            SignalPhase::Yellow => 'Y',
        }
    }
}

/// One value per signal phase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseTable<T> {
    pub red: T,
    pub green: T,
    pub yellow: T,
}

impl<T: Copy> PhaseTable<T> {
    pub fn new(red: T, green: T, yellow: T) -> Self {
        Self { red, green, yellow }
    }

    /// Same value for every phase
    pub fn splat(value: T) -> Self {
        Self::new(value, value, value)
    }

    pub fn get(&self, phase: SignalPhase) -> T {
        match phase {
            SignalPhase::Red => self.red,
            SignalPhase::Green => self.green,
            SignalPhase::Yellow => self.yellow,
        }
    }

    pub fn set(&mut self, phase: SignalPhase, value: T) {
        match phase {
            SignalPhase::Red => self.red = value,
            SignalPhase::Green => self.green = value,
            SignalPhase::Yellow => self.yellow = value,
        }
    }
}

/// Operator-selected spawn cadence for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpawnRate {
    Slow,
    Medium,
    Fast,
}

impl SpawnRate {
    pub const ALL: [SpawnRate; 3] = [SpawnRate::Slow, SpawnRate::Medium, SpawnRate::Fast];

    pub fn name(self) -> &'static str {
        match self {
            SpawnRate::Slow => "slow",
            SpawnRate::Medium => "medium",
            SpawnRate::Fast => "fast",
        }
    }
}

/// A unique identifier for a spawned vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub usize);

/// A point on the 2D screen plane (top-left origin, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Width and height of a rectangular body on screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Center of a body whose top-left corner sits at `position`
pub fn center_of(position: Position, size: Size) -> Position {
    position.offset(size.width / 2.0, size.height / 2.0)
}
