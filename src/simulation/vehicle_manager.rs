//! Vehicle spawning, movement and removal for all lanes
//!
//! Each lane keeps its vehicles in travel order, front-most first. Spawns
//! append to the tail; vehicles leave from anywhere once off screen.

use anyhow::Result;
use log::debug;

use super::config::SimConfig;
use super::signal_controller::SignalController;
use super::traffic_light::TrafficLight;
use super::types::{Lane, Position, VehicleId};
use super::vehicle::{LaneGeometry, Vehicle};

#[derive(Debug, Clone)]
pub struct LaneTraffic {
    pub geometry: LaneGeometry,
    vehicles: Vec<Vehicle>,
}

impl LaneTraffic {
    fn new(geometry: LaneGeometry) -> Self {
        Self {
            geometry,
            vehicles: Vec::new(),
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn queued_count(&self) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.is_queued(&self.geometry))
            .count()
    }
}

/// Vehicle kinematics for the four lanes
#[derive(Debug, Clone)]
pub struct VehicleManager {
    /// Indexed by `Lane::index`
    lanes: [LaneTraffic; 4],
    speed: f32,
    safe_distance: f32,
    /// Minimum gap between the last vehicle and a new one at the entry
    spawn_clearance: f32,
    next_id: usize,
    spawned_total: usize,
    rejected_total: usize,
    exited_total: usize,
}

impl VehicleManager {
    pub fn new(config: &SimConfig, signals: &SignalController) -> Self {
        let vehicle = &config.vehicle;
        Self {
            lanes: Lane::ALL
                .map(|lane| LaneTraffic::new(LaneGeometry::new(config, signals.light(lane)))),
            speed: vehicle.speed,
            safe_distance: vehicle.safe_distance,
            spawn_clearance: vehicle.safe_distance * vehicle.safe_spawn_factor,
            next_id: 0,
            spawned_total: 0,
            rejected_total: 0,
            exited_total: 0,
        }
    }

    pub fn lane(&self, lane: Lane) -> &LaneTraffic {
        &self.lanes[lane.index()]
    }

    pub fn vehicles(&self, lane: Lane) -> &[Vehicle] {
        self.lane(lane).vehicles()
    }

    pub fn positions(&self, lane: Lane) -> Vec<Position> {
        self.vehicles(lane).iter().map(Vehicle::position).collect()
    }

    /// Vehicles currently on screen across all lanes
    pub fn active_count(&self) -> usize {
        self.lanes.iter().map(|l| l.vehicles.len()).sum()
    }

    /// Vehicles ever admitted
    pub fn spawned_total(&self) -> usize {
        self.spawned_total
    }

    /// Spawn requests dropped for lack of clearance
    pub fn rejected_total(&self) -> usize {
        self.rejected_total
    }

    /// Vehicles removed after leaving the screen
    pub fn exited_total(&self) -> usize {
        self.exited_total
    }

    pub fn is_queued(&self, vehicle: &Vehicle) -> bool {
        vehicle.is_queued(&self.lane(vehicle.lane()).geometry)
    }

    pub fn queued_count(&self, lane: Lane) -> usize {
        self.lane(lane).queued_count()
    }

    /// Try to add a vehicle at the entry of `lane`.
    ///
    /// Returns `Ok(None)` when the last vehicle in the lane is still too
    /// close to the entry point. Fails only if `light` guards another lane.
    pub fn spawn(&mut self, lane: Lane, light: &TrafficLight) -> Result<Option<VehicleId>> {
        let clearance = self.spawn_clearance;
        let traffic = &mut self.lanes[lane.index()];
        let body = traffic.geometry.vehicle_size_along_lane();

        if let Some(last) = traffic.vehicles.last() {
            let gap = last.progress() - body;
            if gap < clearance {
                debug!(
                    "Spawn on {} dropped: gap {:.1} below clearance {:.1}",
                    lane.name(),
                    gap,
                    clearance
                );
                self.rejected_total += 1;
                return Ok(None);
            }
        }

        let id = VehicleId(self.next_id);
        let vehicle = Vehicle::new(id, lane, light, &traffic.geometry, self.speed)?;
        traffic.vehicles.push(vehicle);
        self.next_id += 1;
        self.spawned_total += 1;
        Ok(Some(id))
    }

    /// Move every vehicle of `lane` one tick, front-most first
    pub fn advance(&mut self, lane: Lane, light: &TrafficLight) {
        let safe_distance = self.safe_distance;
        let traffic = &mut self.lanes[lane.index()];
        let phase = light.phase();

        let mut front: Option<f32> = None;
        for vehicle in &mut traffic.vehicles {
            vehicle.advance(&traffic.geometry, phase, front, safe_distance);
            front = Some(vehicle.progress());
        }
    }

    pub fn advance_all(&mut self, signals: &SignalController) {
        for lane in Lane::ALL {
            self.advance(lane, signals.light(lane));
        }
    }

    /// Drop vehicles that have left the screen, keeping order.
    /// Returns how many were removed.
    pub fn reap(&mut self, lane: Lane) -> usize {
        let traffic = &mut self.lanes[lane.index()];
        let before = traffic.vehicles.len();
        let geometry = &traffic.geometry;
        traffic.vehicles.retain(|v| geometry.contains(v.position()));
        let removed = before - traffic.vehicles.len();
        self.exited_total += removed;
        removed
    }

    pub fn reap_all(&mut self) -> usize {
        Lane::ALL.into_iter().map(|lane| self.reap(lane)).sum()
    }
}
