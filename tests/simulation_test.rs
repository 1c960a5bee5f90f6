use std::process::Command;

fn run_simulation(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fuzzy_traffic"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute simulation")
}

/// Pull the number following `label` out of the log output
fn logged_count(stderr: &str, label: &str) -> Option<usize> {
    let line = stderr.lines().find(|line| line.contains(label))?;
    let rest = &line[line.find(label)? + label.len()..];
    rest.split_whitespace().next()?.parse().ok()
}

/// Test that the simulation runs headless and reports completion
#[test]
fn test_headless_simulation_runs() {
    let output = run_simulation(&["--ticks", "600", "--horizontal-rate", "fast"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Intersection Summary ==="));
    assert!(stdout.contains("After tick 600"));
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_simulation(&["--ticks", "600", "--horizontal-rate", "fast"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);

    let spawned = logged_count(&stderr, "Total vehicles spawned:")
        .expect("Missing 'Total vehicles spawned' statistic");
    assert!(spawned > 0, "No vehicles were spawned");

    let extensions = logged_count(&stderr, "Extensions granted:")
        .expect("Missing 'Extensions granted' statistic");
    assert!(extensions >= 1, "No green extension was granted");

    assert!(stderr.contains("Vehicles exited:"), "Missing 'Vehicles exited' statistic");
    assert!(stderr.contains("Phase changes:"), "Missing 'Phase changes' statistic");
    assert!(stderr.contains("Fuzzy decision round 0"), "Missing fuzzy decision log");
}

/// Test that the map option draws the junction
#[test]
fn test_map_is_drawn() {
    let output = run_simulation(&["--ticks", "30", "--map"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Junction Map ==="));
    assert!(stdout.contains('G'));
    assert!(stdout.contains('R'));
}

/// Test that a missing config file is reported as a failure
#[test]
fn test_missing_config_fails() {
    let output = run_simulation(&["--ticks", "30", "--config", "/nonexistent/fuzzy_traffic.json"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"), "stderr: {}", stderr);
}
