//! Main simulation world that ties everything together
//!
//! `SimWorld` owns every component and runs one fixed-rate tick at a time:
//! spawn timers, vehicle movement, queue sampling, light timers, then the
//! extension policy. Each step sees the state left by the previous one.

use anyhow::Result;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};

use super::config::SimConfig;
use super::extension_policy::{ExtensionDecision, ExtensionPolicy};
use super::fuzzy::FuzzyExtensionEngine;
use super::queue::QueueEstimator;
use super::signal_controller::{PhaseChange, SignalController};
use super::spawner::SpawnScheduler;
use super::stats::SimulationStats;
use super::types::{DoubleLane, Lane, Position, SignalPhase, SpawnRate, VehicleId};
use super::vehicle_manager::VehicleManager;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub spawned: Vec<VehicleId>,
    pub exited: usize,
    pub phase_changes: Vec<PhaseChange>,
    pub decision: Option<ExtensionDecision>,
}

/// Externally visible state of one lane
#[derive(Debug, Clone)]
pub struct LaneStatus {
    pub lane: Lane,
    pub phase: SignalPhase,
    /// Time left in the current phase, extension included
    pub remaining: f32,
    pub extension: f32,
    /// Vehicle positions, front-most first
    pub vehicles: Vec<Position>,
    pub queued: usize,
}

/// Externally visible state of one axis
#[derive(Debug, Clone)]
pub struct AxisStatus {
    pub axis: DoubleLane,
    pub spawn_rate: SpawnRate,
    pub moving_average: f32,
    pub extension_active: bool,
    pub extension: f32,
}

/// The main simulation world
pub struct SimWorld {
    config: SimConfig,
    engine: FuzzyExtensionEngine,
    signals: SignalController,
    vehicles: VehicleManager,
    queues: QueueEstimator,
    policy: ExtensionPolicy,
    spawner: SpawnScheduler,
    tick_count: u64,
    phase_changes: usize,
    stats: SimulationStats,
}

impl SimWorld {
    /// Build a world from a validated config. Both axes start at the slow
    /// spawn rate.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let now = 0.0;
        let engine = FuzzyExtensionEngine::new(&config.fuzzy);
        let signals = SignalController::new(&config, now);
        let vehicles = VehicleManager::new(&config, &signals);
        let queues = QueueEstimator::new(config.simulator.sample_capacity());
        let policy = ExtensionPolicy::new(
            config.simulator.seconds_before_extension,
            config.simulator.max_extension_rounds,
            signals.green_remaining(now),
        );
        let spawner =
            SpawnScheduler::new(config.simulator.spawn_rate.clone(), SpawnRate::Slow, now);

        Ok(Self {
            config,
            engine,
            signals,
            vehicles,
            queues,
            policy,
            spawner,
            tick_count: 0,
            phase_changes: 0,
            stats: SimulationStats::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn engine(&self) -> &FuzzyExtensionEngine {
        &self.engine
    }

    pub fn signals(&self) -> &SignalController {
        &self.signals
    }

    pub fn vehicles(&self) -> &VehicleManager {
        &self.vehicles
    }

    pub fn queues(&self) -> &QueueEstimator {
        &self.queues
    }

    pub fn policy(&self) -> &ExtensionPolicy {
        &self.policy
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds at the start of the next tick
    pub fn time(&self) -> f32 {
        self.tick_count as f32 / self.config.simulator.frame_rate as f32
    }

    pub fn spawn_rate(&self, axis: DoubleLane) -> SpawnRate {
        self.spawner.rate(axis)
    }

    pub fn set_spawn_rate(&mut self, axis: DoubleLane, rate: SpawnRate) {
        if self.spawner.rate(axis) != rate {
            debug!("{} spawn rate set to {}", axis.name(), rate.name());
        }
        self.spawner.set_rate(axis, rate);
    }

    /// Request one vehicle on `lane`; `Ok(None)` when the entry is occupied
    pub fn spawn(&mut self, lane: Lane) -> Result<Option<VehicleId>> {
        self.vehicles.spawn(lane, self.signals.light(lane))
    }

    /// Spawn on both lanes of an axis, logging contract violations
    fn spawn_axis(&mut self, axis: DoubleLane) -> Vec<VehicleId> {
        let mut spawned = Vec::new();
        for lane in axis.lanes() {
            match self.spawn(lane) {
                Ok(Some(id)) => spawned.push(id),
                Ok(None) => {}
                Err(err) => warn!("Spawn on {} failed: {:#}", lane.name(), err),
            }
        }
        spawned
    }

    /// Run one simulation step
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.time();
        let mut outcome = TickOutcome::default();

        for axis in self.spawner.due(now) {
            outcome.spawned.extend(self.spawn_axis(axis));
        }

        outcome.exited = self.vehicles.reap_all();
        self.vehicles.advance_all(&self.signals);

        for lane in Lane::ALL {
            let queued = self.vehicles.queued_count(lane) as u32;
            self.queues.record(lane, queued);
        }

        outcome.phase_changes = self.signals.update(now);
        self.phase_changes += outcome.phase_changes.len();

        outcome.decision = self
            .policy
            .evaluate(now, &mut self.signals, &self.engine, &self.queues);
        if let Some(decision) = &outcome.decision {
            self.stats.record_decision(decision);
        }
        for axis in DoubleLane::ALL {
            let average = self.queues.moving_average(axis.representative());
            self.stats.record_queue(axis, average);
        }

        self.tick_count += 1;
        outcome
    }

    /// Tick until `max_ticks` have run or `stop` is raised. The flag is
    /// checked between ticks, so the current tick always completes.
    pub fn run(&mut self, max_ticks: u64, stop: &AtomicBool) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && !stop.load(Ordering::Relaxed) {
            self.tick();
            ran += 1;
        }
        ran
    }

    pub fn lane_status(&self, lane: Lane) -> LaneStatus {
        let now = self.time();
        let light = self.signals.light(lane);
        LaneStatus {
            lane,
            phase: light.phase(),
            remaining: light.time_left(now),
            extension: light.extension(light.phase()),
            vehicles: self.vehicles.positions(lane),
            queued: self.vehicles.queued_count(lane),
        }
    }

    pub fn axis_status(&self, axis: DoubleLane) -> AxisStatus {
        let extension = self.signals.extension_of(axis);
        AxisStatus {
            axis,
            spawn_rate: self.spawner.rate(axis),
            moving_average: self.queues.moving_average(axis.representative()),
            extension_active: extension > 0.0,
            extension,
        }
    }

    /// Latest extension decision while it is still worth announcing
    pub fn recent_decision(&self) -> Option<&ExtensionDecision> {
        self.policy
            .recent(self.time(), self.config.simulator.fuzzy_notification_duration)
    }

    /// Statistics for the run so far
    pub fn stats(&self) -> SimulationStats {
        let mut stats = self.stats.clone();
        stats.ticks = self.tick_count;
        stats.elapsed_time = self.time();
        stats.total_vehicles_spawned = self.vehicles.spawned_total();
        stats.rejected_spawns = self.vehicles.rejected_total();
        stats.vehicles_exited = self.vehicles.exited_total();
        stats.active_vehicles = self.vehicles.active_count();
        stats.phase_changes = self.phase_changes;
        stats
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Intersection Summary ===");
        println!("Time: {:.2}s (tick {})", self.time(), self.tick_count);
        println!(
            "Vehicles: {} on screen, {} spawned in total",
            self.vehicles.active_count(),
            self.vehicles.spawned_total()
        );
        match self.signals.active_double_lane() {
            Some(axis) => println!("Green axis: {}", axis.name()),
            None => println!("Green axis: none (in transition)"),
        }
        println!();

        println!("--- Lanes ---");
        for lane in Lane::ALL {
            let status = self.lane_status(lane);
            println!(
                "  {:<14} {:?} {:>5.1}s left (ext {:.1}s), vehicles={}, queued={}",
                lane.name(),
                status.phase,
                status.remaining,
                status.extension,
                status.vehicles.len(),
                status.queued
            );
        }

        println!("--- Axes ---");
        for axis in DoubleLane::ALL {
            let status = self.axis_status(axis);
            println!(
                "  {:<10} rate={}, queue avg={:.2}, extension={}",
                axis.name(),
                status.spawn_rate.name(),
                status.moving_average,
                if status.extension_active {
                    format!("{:.2}s", status.extension)
                } else {
                    "-".to_string()
                }
            );
        }

        if let Some(decision) = self.recent_decision() {
            println!("--- Fuzzy Extension ---");
            println!(
                "  {} green extended by {:.1}s (arriving {:.1}, waiting {:.1})",
                decision.axis.name(),
                decision.seconds,
                decision.arriving,
                decision.waiting
            );
        }
    }

    /// Draw the junction in the terminal
    pub fn draw_map(&self) {
        const COLS: usize = 40;
        const ROWS: usize = 40;
        let cell_w = self.config.simulator.screen_width / COLS as f32;
        let cell_h = self.config.simulator.screen_height / ROWS as f32;

        let to_grid = |p: Position| -> (usize, usize) {
            let col = (p.x / cell_w).max(0.0) as usize;
            let row = (p.y / cell_h).max(0.0) as usize;
            (row.min(ROWS - 1), col.min(COLS - 1))
        };

        let mut grid = vec![vec![' '; COLS]; ROWS];

        // Roads: trace every lane from entry to exit
        for lane in Lane::ALL {
            let geometry = &self.vehicles.lane(lane).geometry;
            let size = geometry.vehicle_size;
            let span = if lane.is_horizontal() {
                geometry.bounds.width
            } else {
                geometry.bounds.height
            };
            let mut progress = 0.0;
            while progress <= span {
                let pos = geometry.position_at(progress);
                let (row, col) = to_grid(pos.offset(size.width / 2.0, size.height / 2.0));
                grid[row][col] = '.';
                progress += cell_w.min(cell_h);
            }
        }

        for light in self.signals.lights() {
            let (row, col) = to_grid(light.center());
            grid[row][col] = light.phase().symbol();
        }

        for lane in Lane::ALL {
            let arrow = match lane {
                Lane::LeftToRight => '>',
                Lane::RightToLeft => '<',
                Lane::TopToBottom => 'v',
                Lane::BottomToTop => '^',
            };
            for vehicle in self.vehicles.vehicles(lane) {
                let (row, col) = to_grid(vehicle.center());
                if grid[row][col] == ' ' || grid[row][col] == '.' {
                    grid[row][col] = arrow;
                }
            }
        }

        println!("\n=== Junction Map ===");
        println!("Legend: R/G/Y=Light, >/</v/^=Vehicle, .=Lane");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line.trim_end());
        }
        println!();
    }
}
