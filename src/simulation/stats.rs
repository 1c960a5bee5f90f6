//! Run statistics for the simulation

use log::info;

use super::extension_policy::ExtensionDecision;
use super::types::DoubleLane;

#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub ticks: u64,
    pub elapsed_time: f32,
    pub total_vehicles_spawned: usize,
    pub rejected_spawns: usize,
    pub vehicles_exited: usize,
    pub active_vehicles: usize,
    pub phase_changes: usize,
    pub extensions_granted: usize,
    pub total_extension_secs: f32,
    pub peak_queue_horizontal: f32,
    pub peak_queue_vertical: f32,
}

impl SimulationStats {
    pub fn record_decision(&mut self, decision: &ExtensionDecision) {
        self.extensions_granted += 1;
        self.total_extension_secs += decision.seconds;
    }

    pub fn record_queue(&mut self, axis: DoubleLane, average: f32) {
        let peak = match axis {
            DoubleLane::Horizontal => &mut self.peak_queue_horizontal,
            DoubleLane::Vertical => &mut self.peak_queue_vertical,
        };
        *peak = peak.max(average);
    }

    pub fn mean_extension(&self) -> f32 {
        if self.extensions_granted == 0 {
            0.0
        } else {
            self.total_extension_secs / self.extensions_granted as f32
        }
    }

    /// Log the final report
    pub fn log_report(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Elapsed time: {:.2}s ({} ticks)", self.elapsed_time, self.ticks);
        info!("Total vehicles spawned: {}", self.total_vehicles_spawned);
        info!("Rejected spawns: {}", self.rejected_spawns);
        info!("Vehicles exited: {}", self.vehicles_exited);
        info!("Active vehicles: {}", self.active_vehicles);
        info!("Phase changes: {}", self.phase_changes);
        info!("Extensions granted: {}", self.extensions_granted);
        info!("Mean extension: {:.2}s", self.mean_extension());
        info!(
            "Peak queue: horizontal {:.2}, vertical {:.2}",
            self.peak_queue_horizontal, self.peak_queue_vertical
        );
    }
}
