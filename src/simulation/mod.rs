//! Intersection control core
//!
//! Fuzzy green-time extension, the per-lane signal state machine and the
//! vehicle queueing model that feeds it. Nothing here touches a screen or
//! an event loop; renderers read the status accessors on `SimWorld`.

mod config;
mod extension_policy;
mod fuzzy;
mod queue;
mod signal_controller;
mod spawner;
mod stats;
mod traffic_light;
mod types;
mod vehicle;
mod vehicle_manager;
mod world;

pub use config::{
    Breakpoints, DomainConfig, ExtensionVariableConfig, FuzzyConfig, Offset,
    QueueVariableConfig, SimConfig, SimulatorConfig, SpawnRateConfig, TrafficLightConfig,
    VehicleConfig,
};
pub use extension_policy::{ExtensionDecision, ExtensionPolicy};
pub use fuzzy::{
    ExtensionActivation, ExtensionRound, FuzzyDomain, FuzzyExtensionEngine, QueueLevels,
    TriangularTerm,
};
pub use queue::{QueueEstimator, QueueSamples};
pub use signal_controller::{PhaseChange, SignalController};
pub use spawner::SpawnScheduler;
pub use stats::SimulationStats;
pub use traffic_light::TrafficLight;
pub use types::{
    center_of, DoubleLane, Lane, PhaseTable, Position, SignalPhase, Size, SpawnRate, VehicleId,
};
pub use vehicle::{LaneGeometry, Vehicle};
pub use vehicle_manager::{LaneTraffic, VehicleManager};
pub use world::{AxisStatus, LaneStatus, SimWorld, TickOutcome};
