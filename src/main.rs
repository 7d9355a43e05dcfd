use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use parking_sim::simulation::{GridPosition, LotConfig, Pacing, SimClock, SlotId};

#[derive(Parser)]
#[command(name = "parking_sim")]
#[command(about = "Nearest-slot parking lot simulation, run headless")]
struct Cli {
    /// Rows of parking slots
    #[arg(long, default_value = "4")]
    rows: usize,

    /// Columns of parking slots
    #[arg(long, default_value = "6")]
    cols: usize,

    /// Row of the entrance cell
    #[arg(long, default_value = "0")]
    entrance_row: usize,

    /// Column of the entrance cell
    #[arg(long, default_value = "0")]
    entrance_col: usize,

    /// Simulated seconds to run
    #[arg(long, default_value = "30")]
    seconds: u32,

    /// Time delta per step in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Cars that arrive before the clock starts
    #[arg(long, default_value = "3")]
    arrivals: usize,

    /// Enable automatic arrivals
    #[arg(long)]
    auto: bool,

    /// Chance per simulated second that a given parked car leaves
    #[arg(long, default_value = "0.05")]
    departure_chance: f64,

    /// Seed for reproducible departures
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the highlight pauses between cycle stages
    #[arg(long)]
    instant: bool,

    /// Pause between printed frames so the run can be watched
    #[arg(long)]
    realtime: bool,
}

impl Cli {
    fn lot_config(&self) -> LotConfig {
        let pacing = if self.instant {
            Pacing::instant()
        } else {
            Pacing::default()
        };
        LotConfig::new(self.rows, self.cols)
            .with_entrance(GridPosition::new(self.entrance_row, self.entrance_col))
            .with_pacing(pacing)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,parking_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    if !cli.delta.is_finite() || cli.delta <= 0.0 {
        bail!("--delta must be a positive number of seconds, got {}", cli.delta);
    }
    if !(0.0..=1.0).contains(&cli.departure_chance) {
        bail!(
            "--departure-chance must lie in [0, 1], got {}",
            cli.departure_chance
        );
    }

    let config = cli.lot_config();
    let mut clock = SimClock::new(config).context("Failed to build the parking lot")?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    println!("Running parking simulation in headless mode...");
    println!(
        "Grid: {}x{}, entrance {}, {}s simulated, delta {}s",
        config.rows, config.cols, config.entrance, cli.seconds, cli.delta
    );
    println!();

    for _ in 0..cli.arrivals {
        if clock.add_car().is_err() {
            break;
        }
    }
    if cli.auto {
        clock.toggle_auto_mode();
    }

    println!("Initial state:");
    print_frame(&mut clock);

    let step = Duration::try_from_secs_f32(cli.delta)
        .with_context(|| format!("--delta {} is not a usable step", cli.delta))?;
    for second in 1..=cli.seconds {
        clock.run_for(Duration::from_secs(1), step);
        depart_randomly(&mut clock, &mut rng, cli.departure_chance);

        println!("--- After {}s simulated time ---", second);
        print_frame(&mut clock);

        if cli.realtime && second < cli.seconds {
            std::thread::sleep(Duration::from_millis(500));
        }
    }

    let stats = clock.lot().stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed ticks: {}", clock.lot().current_tick());
    info!("Total cars parked: {}", stats.total_cars_parked);
    info!("Cars waiting: {}", clock.lot().queue().len());
    info!("Average wait: {:.2} ticks", stats.average_wait_ticks);
    info!("Average distance: {:.2}", stats.average_distance);
    info!("Utilization: {:.1}%", stats.utilization_percent());
    Ok(())
}

/// Each parked car leaves with probability `chance`
fn depart_randomly(clock: &mut SimClock, rng: &mut StdRng, chance: f64) {
    if chance <= 0.0 || clock.lot().is_cycle_in_flight() {
        return;
    }
    let occupied: Vec<SlotId> = clock
        .lot()
        .grid()
        .slots()
        .iter()
        .filter(|slot| slot.is_occupied())
        .map(|slot| slot.id)
        .collect();

    for slot in occupied {
        if rng.random_bool(chance) {
            // Nothing is in flight, so the release cannot be refused
            let _ = clock.remove_car(slot);
        }
    }
}

fn print_frame(clock: &mut SimClock) {
    for event in clock.drain_events() {
        if event.is_destructive() {
            warn!("{}", event);
        }
        println!("  [{}] {}", event.title(), event.description());
    }
    println!("{}", clock.lot().summary());
    print!("{}", clock.lot().render_map());
    println!();
}
