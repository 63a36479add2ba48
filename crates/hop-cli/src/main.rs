use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use hop_cli::ScenarioRunner;
use hop_engine::{CollisionWorld, LevelDesc, SpatialQuery};

/// Run a hop-engine level headless and print a JSON trace, one line per frame.
#[derive(Debug, Parser)]
#[command(name = "hop", version, about)]
struct Args {
    /// Level description (JSON).
    #[arg(long)]
    level: PathBuf,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 300)]
    frames: u64,
    /// Seconds per rendered frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,
    /// Print every n-th frame (frames with despawns or events are always printed).
    #[arg(long, default_value_t = 1)]
    trace_every: u64,
    /// Collider backend.
    #[arg(long, value_enum, default_value_t = Backend::Builtin)]
    backend: Backend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Builtin,
    #[cfg(feature = "physics")]
    Rapier,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let level = LevelDesc::load(&args.level)
        .with_context(|| format!("loading level {}", args.level.display()))?;
    log::info!("loaded {} ({} objects)", args.level.display(), level.objects.len());

    match args.backend {
        Backend::Builtin => run::<CollisionWorld>(level, &args),
        #[cfg(feature = "physics")]
        Backend::Rapier => run::<hop_engine::RapierQuery>(level, &args),
    }
}

fn run<Q: SpatialQuery + Default>(level: LevelDesc, args: &Args) -> anyhow::Result<()> {
    let mut runner: ScenarioRunner<Q> = ScenarioRunner::new(level).context("building level")?;
    let every = args.trace_every.max(1);
    for _ in 0..args.frames {
        let trace = runner.tick(args.frame_dt)?;
        let eventful = !trace.despawned.is_empty() || !trace.events.is_empty();
        if eventful || trace.frame % every == 0 {
            println!("{}", serde_json::to_string(&trace)?);
        }
        if runner.simulation().objects.is_empty() {
            log::info!("all objects gone after {} frames", runner.frame());
            break;
        }
    }
    Ok(())
}
