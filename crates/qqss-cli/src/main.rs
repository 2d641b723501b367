// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Scenario Runner
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Runs one shock scenario through the tension machine and the analytic
//! IS-LM solver, prints a per-tick table, and optionally writes the
//! trajectory as JSON lines.
//!
//! ```text
//! qqss-sim --steps 20 --shock-at 8 --magnitude 10
//! qqss-sim --config scenario.json --out run.jsonl
//! RUST_LOG=debug qqss-sim
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use qqss_core::{
    constant_policy, CurveGrid, JsonLinesSink, MemorySink, ShockSchedule, SimulationDriver,
    TeeSink, Trajectory,
};
use qqss_dynamics::TensionStateMachine;
use qqss_types::{QqssError, QqssResult, SimulationConfig};

#[derive(Parser)]
#[command(name = "qqss-sim")]
#[command(version, about = "QQSS tension + IS-LM equilibrium scenario runner", long_about = None)]
struct Cli {
    /// JSON scenario file (structural, tension, steps, policy, shocks)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks when no config file or shock list is given
    #[arg(long)]
    steps: Option<usize>,

    /// Tick of the negative stress shock (rebound follows one tick later)
    #[arg(long, default_value = "8")]
    shock_at: usize,

    /// Stress shock magnitude
    #[arg(long, default_value = "10.0")]
    magnitude: f64,

    /// Write the trajectory as JSON lines to this file
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also print the IS/LM curve grid around the nominal equilibrium
    #[arg(long)]
    curves: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(cli: &Cli) -> QqssResult<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                QqssError::Config(format!("read {}: {e}", path.display()))
            })?;
            SimulationConfig::from_json(&text)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()))
        .init();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    };

    let shocks = config
        .shocks
        .clone()
        .unwrap_or_else(|| ShockSchedule::stress_test(config.steps, cli.shock_at, cli.magnitude));
    let policies = constant_policy(config.policy, shocks.len());

    info!(
        "scenario: {} ticks, memory={}, shock_gain={}, interference_gain={}, policy_gain={}",
        shocks.len(),
        config.tension.memory,
        config.tension.shock_gain,
        config.tension.interference_gain,
        config.tension.policy_gain
    );

    let driver = SimulationDriver::analytic(config.structural);
    let mut machine = TensionStateMachine::new(config.tension);
    let trajectory = match &cli.out {
        Some(path) => {
            let json = JsonLinesSink::new(BufWriter::new(File::create(path)?));
            let mut tee = TeeSink::new(MemorySink::with_capacity(shocks.len()), json);
            driver.run_into(&mut machine, &policies, &shocks, &mut tee)?;
            let (memory, json) = tee.into_parts();
            info!("wrote {} ticks to {}", json.written(), path.display());
            Trajectory::from(memory.into_records())
        }
        None => driver.run_machine(&mut machine, &policies, &shocks)?,
    };

    println!("{}", "=".repeat(72));
    println!(" QQSS four-channel tension + IS-LM equilibrium");
    println!("{}", "-".repeat(72));
    for tick in &trajectory.ticks {
        let flag = if tick.finite { "" } else { "  [non-finite]" };
        println!(
            "t={:02} | shock={:+6.2} | z_sum={:+.3} | G_eff={:7.2} | Y={:7.2} | r={:6.2}{flag}",
            tick.t,
            tick.shock,
            tick.tension.sum(),
            tick.effective_policy.g,
            tick.equilibrium.y,
            tick.equilibrium.r,
        );
    }
    println!("{}", "-".repeat(72));

    let summary = trajectory.summary();
    match (summary.output_range, summary.rate_range) {
        (Some((y_lo, y_hi)), Some((r_lo, r_hi))) => {
            println!(" Y range: {y_lo:.2} ~ {y_hi:.2}");
            println!(" r range: {r_lo:.2} ~ {r_hi:.2}");
        }
        _ => println!(" no finite equilibria"),
    }
    if summary.non_finite_ticks > 0 {
        println!(" {} tick(s) with non-finite equilibrium", summary.non_finite_ticks);
    }
    println!("{}", "=".repeat(72));

    if cli.curves {
        let grid = CurveGrid::around(&config.policy, &config.structural, 11)?;
        println!(
            " nominal equilibrium: Y*={:.4}, r*={:.4}",
            grid.equilibrium.y, grid.equilibrium.r
        );
        for p in &grid.points {
            println!("   Y={:8.2}  r_IS={:8.2}  r_LM={:8.2}", p.y, p.r_is, p.r_lm);
        }
    }

    Ok(())
}
