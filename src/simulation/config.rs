//! Simulation configuration
//!
//! A single immutable value built once (defaults or a JSON file) and handed by
//! reference to every component at construction.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::types::{PhaseTable, SignalPhase, SpawnRate};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub vehicle: VehicleConfig,
    pub simulator: SimulatorConfig,
    pub traffic_light: TrafficLightConfig,
    pub fuzzy: FuzzyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Distance travelled per tick
    pub speed: f32,
    /// Minimum bumper-to-bumper gap while following
    pub safe_distance: f32,
    pub body_length: f32,
    pub body_width: f32,
    /// Multiplier on `safe_distance` required at the spawn point
    pub safe_spawn_factor: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            safe_distance: 5.0,
            body_length: 30.0,
            body_width: 20.0,
            safe_spawn_factor: 1.1,
        }
    }
}

/// Spawn intervals in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRateConfig {
    pub fast: u64,
    pub medium: u64,
    pub slow: u64,
}

impl Default for SpawnRateConfig {
    fn default() -> Self {
        Self {
            fast: 400,
            medium: 1500,
            slow: 3500,
        }
    }
}

impl SpawnRateConfig {
    /// Interval for a rate in seconds
    pub fn interval_secs(&self, rate: SpawnRate) -> f32 {
        let millis = match rate {
            SpawnRate::Slow => self.slow,
            SpawnRate::Medium => self.medium,
            SpawnRate::Fast => self.fast,
        };
        millis as f32 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Lateral gap between a lane and the road centre line
    pub bumper_distance: f32,
    pub spawn_rate: SpawnRateConfig,
    /// Ticks per simulated second
    pub frame_rate: u32,
    /// Minimum all-red time before a red light may turn green
    pub gap_between_traffic_switch: f32,
    /// Length of the queue averaging window in seconds
    pub moving_averages_period: f32,
    /// Remaining green time at which the fuzzy engine is consulted
    pub seconds_before_extension: f32,
    /// How long the latest extension decision is reported as recent
    pub fuzzy_notification_duration: f32,
    /// Extension decisions allowed per green phase
    pub max_extension_rounds: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 800.0,
            bumper_distance: 5.0,
            spawn_rate: SpawnRateConfig::default(),
            frame_rate: 30,
            gap_between_traffic_switch: 2.0,
            moving_averages_period: 1.0,
            seconds_before_extension: 1.0,
            fuzzy_notification_duration: 5.0,
            max_extension_rounds: 1,
        }
    }
}

impl SimulatorConfig {
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    /// Number of samples kept by each lane's moving average
    pub fn sample_capacity(&self) -> usize {
        ((self.frame_rate as f32 * self.moving_averages_period).round() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficLightConfig {
    pub red_light_duration: f32,
    pub yellow_light_duration: f32,
    pub green_light_duration: f32,
    pub distance_from_center: Offset,
    pub body_height: f32,
    pub body_width: f32,
}

impl Default for TrafficLightConfig {
    fn default() -> Self {
        Self {
            red_light_duration: 10.0,
            yellow_light_duration: 1.5,
            green_light_duration: 10.0,
            distance_from_center: Offset { x: 40.0, y: 10.0 },
            body_height: 30.0,
            body_width: 20.0,
        }
    }
}

impl TrafficLightConfig {
    pub fn durations(&self) -> PhaseTable<f32> {
        PhaseTable::new(
            self.red_light_duration,
            self.green_light_duration,
            self.yellow_light_duration,
        )
    }
}

/// Sampled axis of a fuzzy variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// Triangle breakpoints `[left, peak, right]`
pub type Breakpoints = [f32; 3];

/// Terms of the two queue inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueVariableConfig {
    pub domain: DomainConfig,
    pub few: Breakpoints,
    pub small: Breakpoints,
    pub medium: Breakpoints,
    pub many: Breakpoints,
}

impl Default for QueueVariableConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig {
                min: -4.0,
                max: 16.0,
                step: 1.0,
            },
            few: [0.0, 0.0, 3.0],
            small: [0.0, 3.0, 6.0],
            medium: [3.0, 6.0, 9.0],
            many: [6.0, 9.0, 12.0],
        }
    }
}

/// Terms of the extension output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionVariableConfig {
    pub domain: DomainConfig,
    pub zero: Breakpoints,
    pub short: Breakpoints,
    pub medium: Breakpoints,
    pub long: Breakpoints,
}

impl Default for ExtensionVariableConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig {
                min: 0.0,
                max: 20.0,
                step: 1.0,
            },
            zero: [0.0, 0.0, 0.0],
            short: [0.0, 2.0, 4.0],
            medium: [2.0, 4.0, 6.0],
            long: [4.0, 6.0, 8.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Vehicles queued on the axis that currently has green
    pub arriving: QueueVariableConfig,
    /// Vehicles queued behind the red light of the other axis
    pub waiting: QueueVariableConfig,
    pub extension: ExtensionVariableConfig,
}

impl SimConfig {
    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: SimConfig =
            serde_json::from_str(contents).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants every component relies on
    pub fn validate(&self) -> Result<()> {
        let v = &self.vehicle;
        ensure!(v.speed > 0.0, "vehicle.speed must be positive");
        ensure!(v.safe_distance >= 0.0, "vehicle.safe_distance must not be negative");
        ensure!(
            v.body_length > 0.0 && v.body_width > 0.0,
            "vehicle body dimensions must be positive"
        );
        ensure!(v.safe_spawn_factor >= 1.0, "vehicle.safe_spawn_factor must be at least 1");

        let s = &self.simulator;
        ensure!(s.frame_rate > 0, "simulator.frame_rate must be positive");
        ensure!(
            s.screen_width > 0.0 && s.screen_height > 0.0,
            "simulator screen dimensions must be positive"
        );
        ensure!(
            s.moving_averages_period > 0.0,
            "simulator.moving_averages_period must be positive"
        );
        ensure!(
            s.gap_between_traffic_switch >= 0.0,
            "simulator.gap_between_traffic_switch must not be negative"
        );
        let rates = &s.spawn_rate;
        ensure!(
            rates.fast > 0 && rates.medium > 0 && rates.slow > 0,
            "simulator.spawn_rate intervals must be positive"
        );

        let durations = self.traffic_light.durations();
        for phase in [SignalPhase::Red, SignalPhase::Green, SignalPhase::Yellow] {
            ensure!(
                durations.get(phase) > 0.0,
                "{:?} light duration must be positive",
                phase
            );
        }

        validate_queue_variable("fuzzy.arriving", &self.fuzzy.arriving)?;
        validate_queue_variable("fuzzy.waiting", &self.fuzzy.waiting)?;
        let ext = &self.fuzzy.extension;
        validate_domain("fuzzy.extension", &ext.domain)?;
        for (term, points) in [
            ("zero", ext.zero),
            ("short", ext.short),
            ("medium", ext.medium),
            ("long", ext.long),
        ] {
            validate_breakpoints("fuzzy.extension", term, points)?;
        }
        Ok(())
    }
}

fn validate_domain(name: &str, domain: &DomainConfig) -> Result<()> {
    ensure!(domain.min < domain.max, "{name}.domain min must be below max");
    ensure!(domain.step > 0.0, "{name}.domain step must be positive");
    Ok(())
}

fn validate_breakpoints(name: &str, term: &str, points: Breakpoints) -> Result<()> {
    let [left, peak, right] = points;
    ensure!(
        left <= peak && peak <= right,
        "{name}.{term} breakpoints must be ordered left <= peak <= right"
    );
    Ok(())
}

fn validate_queue_variable(name: &str, variable: &QueueVariableConfig) -> Result<()> {
    validate_domain(name, &variable.domain)?;
    for (term, points) in [
        ("few", variable.few),
        ("small", variable.small),
        ("medium", variable.medium),
        ("many", variable.many),
    ] {
        validate_breakpoints(name, term, points)?;
    }
    Ok(())
}
