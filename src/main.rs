//! energy-gym entry point: CLI wiring and a config-driven episode run.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use energy_gym::config::ScenarioConfig;
use energy_gym::io::export::export_csv;
use energy_gym::runner;
use energy_gym::timeseries::TimeSeries;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    time_series: Option<String>,
    seed_override: Option<u64>,
    telemetry_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("energy-gym: dispatch environment for an industrial energy site");
    eprintln!();
    eprintln!("Usage: energy-gym [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --time-series <path>     Override the time-series CSV");
    eprintln!("  --seed <u64>             Override the agent seed");
    eprintln!("  --telemetry-out <path>   Export step records to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the episode");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

fn value_of(args: &[String], i: usize, flag: &str, kind: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {kind} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        time_series: None,
        seed_override: None,
        telemetry_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(value_of(&args, i, "--scenario", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(value_of(&args, i, "--preset", "name"));
            }
            "--time-series" => {
                i += 1;
                cli.time_series = Some(value_of(&args, i, "--time-series", "path"));
            }
            "--seed" => {
                i += 1;
                let raw = value_of(&args, i, "--seed", "u64");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                cli.telemetry_out = Some(value_of(&args, i, "--telemetry-out", "path"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = value_of(&args, i, "--port", "u16");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let loaded = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };
    let mut scenario = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Some(seed) = cli.seed_override {
        scenario.episode.seed = seed;
    }
    if let Some(ref path) = cli.time_series {
        scenario.episode.time_series = PathBuf::from(path);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let ep = &scenario.episode;
    let series = match TimeSeries::load(&ep.time_series, ep.episode_length, ep.lag) {
        Ok(series) => Arc::new(series),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let run = match runner::run_with_series(&scenario, series) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    for r in &run.records {
        println!("{r}");
    }
    println!("\n{}", run.summary);

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&run.records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Step records written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;

        let state = Arc::new(energy_gym::api::AppState::from(run));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(energy_gym::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
