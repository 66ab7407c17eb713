//! curl-swarm headless runner
//!
//! Loads a simulation config from JSON (or a named preset), runs it for a
//! fixed number of ticks and reports what the swarm did.
//!
//! Usage: `swarm-runner [config.json] [--ticks N] [--preset NAME]`
//!
//! Set `RUST_LOG=debug` (or `trace` for per-tick output) for more detail.

use curl_swarm::prelude::*;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_TICKS: u64 = 1000;

struct Args {
    config_path: Option<PathBuf>,
    preset: Option<String>,
    ticks: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: None,
        preset: None,
        ticks: DEFAULT_TICKS,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a value")?;
                args.ticks = value
                    .parse()
                    .map_err(|_| format!("invalid tick count: {}", value))?;
            }
            "--preset" => {
                args.preset = Some(iter.next().ok_or("--preset needs a name")?);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
            path => args.config_path = Some(PathBuf::from(path)),
        }
    }

    Ok(args)
}

fn load_config(args: &Args) -> Result<SimConfig, ConfigError> {
    match (&args.config_path, &args.preset) {
        (Some(path), _) => {
            log::info!("loading config from {:?}", path);
            SimConfig::load(path)
        }
        (None, Some(name)) => SimConfig::preset(name),
        (None, None) => {
            log::info!("no config file specified, using defaults");
            Ok(SimConfig::default())
        }
    }
}

fn mean_radius(sim: &Simulation) -> f32 {
    let positions = sim.particles().positions();
    positions.iter().map(|p| p.length()).sum::<f32>() / positions.len() as f32
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: swarm-runner [config.json] [--ticks N] [--preset NAME]");
            eprintln!("Presets: {}", SimConfig::preset_names().join(", "));
            eprintln!("Noise types: {}", NoiseType::variants().join(", "));
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let report_every = (args.ticks / 10).max(1);
    for _ in 0..args.ticks {
        let stats = sim.tick();
        if stats.tick % report_every == 0 {
            log::info!(
                "tick {:>6}: {:>6} respawned, mean radius {:.4}",
                stats.tick,
                stats.respawned,
                mean_radius(&sim),
            );
        }
    }

    let finite = sim
        .particles()
        .positions()
        .iter()
        .all(|p| p.is_finite());

    let summary = serde_json::json!({
        "ticks": sim.tick_count(),
        "particles": sim.particles().len(),
        "totalRespawns": sim.total_respawns(),
        "meanRadius": mean_radius(&sim),
        "allFinite": finite,
        "noiseType": sim.config().noise_type.name(),
        "extinctionMethod": sim.config().extinction_method.name(),
    });
    println!("{}", summary);

    if finite {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
