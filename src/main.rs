use anyhow::Result;
use clap::Parser;
use fuzzy_traffic::simulation::{DoubleLane, SimConfig, SimWorld, SpawnRate};
use log::{error, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

#[derive(Parser)]
#[command(name = "fuzzy_traffic")]
#[command(about = "Fuzzy-logic adaptive traffic light simulation (headless)")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1800")]
    ticks: u64,

    /// JSON file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spawn rate for the horizontal lanes
    #[arg(long, value_enum, default_value = "slow")]
    horizontal_rate: SpawnRate,

    /// Spawn rate for the vertical lanes
    #[arg(long, value_enum, default_value = "slow")]
    vertical_rate: SpawnRate,

    /// Pick a random spawn rate per axis every N simulated seconds
    #[arg(long)]
    shuffle_rates: Option<f32>,

    /// Seed for the spawn-rate shuffler
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the junction after every simulated second
    #[arg(long)]
    map: bool,

    /// Wall-clock pause between simulated seconds, in milliseconds
    #[arg(long, default_value = "0")]
    pace_ms: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run_headless(&cli) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<SimConfig> {
    match &cli.config {
        Some(path) => SimConfig::load(path),
        None => Ok(SimConfig::default()),
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ticks_per_second = u64::from(config.simulator.frame_rate);

    let mut world = SimWorld::new(config)?;
    world.set_spawn_rate(DoubleLane::Horizontal, cli.horizontal_rate);
    world.set_spawn_rate(DoubleLane::Vertical, cli.vertical_rate);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut next_shuffle = cli.shuffle_rates;

    info!(
        "Running {} ticks at {} ticks per second",
        cli.ticks, ticks_per_second
    );
    println!("Initial state:");
    world.print_summary();
    if cli.map {
        world.draw_map();
    }
    println!();

    let stop = AtomicBool::new(false);
    let mut tick = 0;
    while tick < cli.ticks {
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);
        tick += world.run(ticks_to_run, &stop);

        if let (Some(period), Some(due)) = (cli.shuffle_rates, next_shuffle) {
            if world.time() >= due {
                for axis in DoubleLane::ALL {
                    if let Some(rate) = SpawnRate::ALL.choose(&mut rng) {
                        world.set_spawn_rate(axis, *rate);
                    }
                }
                next_shuffle = Some(due + period);
            }
        }

        println!("--- After tick {} ({:.1}s simulated time) ---", tick, world.time());
        world.print_summary();
        if cli.map {
            world.draw_map();
        }
        println!();

        if cli.pace_ms > 0 && tick < cli.ticks {
            std::thread::sleep(std::time::Duration::from_millis(cli.pace_ms));
        }
    }

    world.stats().log_report();
    Ok(())
}
