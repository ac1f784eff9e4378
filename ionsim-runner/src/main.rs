//! ionsim Scenario Runner
//!
//! Loads a scenario from JSON (or a built-in preset) and steps it headless,
//! logging metrics along the way.
//!
//! Usage: `ionsim-runner [config.json | preset-name] [steps]`
//!
//! Verbosity follows `RUST_LOG`; periodic reports are logged at `info`.

use ionsim_runner::{presets, ConfigError, RunSummary, ScenarioConfig, PRESETS};
use log::{error, info};
use std::env;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

fn print_usage() {
    eprintln!("Usage: ionsim-runner [config.json | preset-name] [steps]");
    eprintln!();
    eprintln!("Presets:");
    for preset in PRESETS {
        eprintln!("  {:<16} {}", preset.name, preset.description);
    }
}

/// A preset name wins over a file of the same name.
fn load_scenario(arg: Option<&str>) -> Result<ScenarioConfig, ConfigError> {
    match arg {
        None => Ok(ScenarioConfig::default()),
        Some(name) => match presets::find(name) {
            Some(preset) => Ok((preset.config)()),
            None => ScenarioConfig::load(name),
        },
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().skip(1).any(|a| a == "-h" || a == "--help") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let config = match load_scenario(args.get(1).map(String::as_str)) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load scenario {:?}: {}", args.get(1), e);
            eprintln!("Failed to load scenario: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let steps = match args.get(2) {
        None => config.steps,
        Some(s) => match s.parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Invalid step count: {}", s);
                print_usage();
                return ExitCode::from(2);
            }
        },
    };

    let mut system = match config.build() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid scenario '{}': {}", config.name, e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "running '{}': {} steps, {} of {} particles active, seed {}",
        config.name,
        steps,
        system.active_count(),
        system.capacity(),
        config.physics.seed
    );

    let summary = Arc::new(Mutex::new(RunSummary::default()));
    let sink = Arc::clone(&summary);
    let interval = config.report_interval;
    system.set_observer(move |m| {
        if interval > 0 && m.frame % interval == 0 {
            info!(
                "frame {:>6}: active {:>4}, potential {:>4}, open gates {}",
                m.frame, m.active_count, m.membrane_potential, m.open_gates
            );
        }
        if let Ok(mut s) = sink.lock() {
            s.record(m);
        }
    });

    for _ in 0..steps {
        system.update();
    }
    system.clear_observer();

    let summary = match summary.lock() {
        Ok(s) => *s,
        Err(_) => {
            eprintln!("Metrics were lost during the run");
            return ExitCode::FAILURE;
        }
    };
    println!("{}", config.name);
    println!("{}", summary);
    ExitCode::SUCCESS
}
