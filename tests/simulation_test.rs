use std::process::{Command, Output};

fn run_headless(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_parking_sim"))
        .args(args)
        .env("RUST_LOG", "warn,parking_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Pull the number after `label` out of the logged summary
fn logged_value(stderr: &str, label: &str) -> f32 {
    let line = stderr
        .lines()
        .find(|line| line.contains(label))
        .unwrap_or_else(|| panic!("Could not find '{}' line", label));
    let parts: Vec<&str> = line.split(label).collect();
    parts
        .get(1)
        .map(|s| s.trim().trim_end_matches(|c: char| c == '%' || c.is_alphabetic()))
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| panic!("Could not parse value from line: {}", line))
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&["--seconds", "5", "--instant", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Parking Lot ==="));
    assert!(stdout.contains("[Car Parked!]"));
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_headless(&[
        "--seconds",
        "10",
        "--arrivals",
        "5",
        "--departure-chance",
        "0",
        "--instant",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for label in [
        "Elapsed ticks:",
        "Total cars parked:",
        "Cars waiting:",
        "Average wait:",
        "Average distance:",
        "Utilization:",
    ] {
        assert!(stderr.contains(label), "Missing '{}' statistic", label);
    }

    assert_eq!(logged_value(&stderr, "Elapsed ticks:"), 10.0);
    assert_eq!(logged_value(&stderr, "Total cars parked:"), 5.0);
    assert_eq!(logged_value(&stderr, "Cars waiting:"), 0.0);

    // Five cars on a 4x6 grid take 5 of 24 slots
    let utilization = logged_value(&stderr, "Utilization:");
    assert!((utilization - 5.0 / 24.0 * 100.0).abs() < 0.1);
}

/// Test that a full lot is reported rather than crashing
#[test]
fn test_full_lot_is_reported() {
    let output = run_headless(&[
        "--rows",
        "1",
        "--cols",
        "2",
        "--arrivals",
        "2",
        "--auto",
        "--departure-chance",
        "0",
        "--seconds",
        "6",
        "--instant",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Parking Lot Full]"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(logged_value(&stderr, "Total cars parked:"), 2.0);
    assert!(stderr.contains("Parking Lot Full: No available slots"));
}

/// Test that a bad grid is refused up front
#[test]
fn test_invalid_grid_is_rejected() {
    let output = run_headless(&["--rows", "0"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid lot configuration"),
        "unexpected stderr: {}",
        stderr
    );
}

/// Test that a grid too large to build is refused instead of crashing
#[test]
fn test_oversized_grid_is_rejected() {
    let rows = (usize::MAX / 2 + 1).to_string();
    let output = run_headless(&["--rows", &rows, "--cols", "2"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid lot configuration"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(!stderr.contains("panicked"), "unexpected stderr: {}", stderr);
}

/// Test that a non-finite step is refused instead of crashing
#[test]
fn test_infinite_delta_is_rejected() {
    let output = run_headless(&["--delta", "inf", "--seconds", "1"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--delta must be a positive number of seconds"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(!stderr.contains("panicked"), "unexpected stderr: {}", stderr);
}
