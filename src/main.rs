use std::path::PathBuf;

use bodies::simulation::error::SimError;
use bodies::simulation::params::Params;
use bodies::simulation::prng::Prng;
use bodies::simulation::world::World;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Headless runner for the bodies simulation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base-36 seed. A random seed is drawn when omitted.
    #[arg(short, long)]
    seed: Option<String>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 3600)]
    frames: u64,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// JSON parameter file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log a population report every N frames (0 disables)
    #[arg(long, default_value_t = 600)]
    report_every: u64,
}

fn main() -> Result<(), SimError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let params = match &args.config {
        Some(path) => Params::load_from_file(path)?,
        None => Params::default(),
    };
    let seed = args.seed.unwrap_or_else(Prng::random_seed);

    tracing::info!(seed = %seed, frames = args.frames, "starting simulation");

    let mut world = World::new(params, &seed)?;

    for frame in 1..=args.frames {
        world.step(frame as f64 * args.frame_ms);

        if args.report_every > 0 && frame % args.report_every == 0 {
            tracing::info!(
                frame,
                organisms = world.organism_count(),
                motes = world.mote_count(),
                births = world.stats.births,
                deaths = world.stats.deaths,
                "population report"
            );
        }
    }

    tracing::info!(
        seed = %seed,
        organisms = world.organism_count(),
        motes = world.mote_count(),
        births = world.stats.births,
        deaths = world.stats.deaths,
        avg_population = world.stats.avg_population(),
        peak_population = world.stats.peak_population(),
        "simulation finished"
    );

    Ok(())
}
