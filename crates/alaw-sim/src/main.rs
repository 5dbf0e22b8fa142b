// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Simulation CLI
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `alaw-sim`: free-running vs A-Law governed Kuramoto ensembles.
//!
//! ```text
//! alaw-sim --mode compare -N 120 --steps 2500
//! alaw-sim --mode benchmark -N 100000 --steps 2000 --backend fast
//! RUST_LOG=debug alaw-sim --config run.json --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use alaw_sim::{run_benchmark, run_comparison};
use alaw_types::{
    AlawError, AlawResult, BackendMode, BenchmarkReport, ComparisonReport, SimulationConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Both ensembles side by side, sampled into frames.
    #[value(alias = "anim")]
    Compare,
    /// Governed ensemble only, timed.
    Benchmark,
}

#[derive(Debug, Parser)]
#[command(name = "alaw-sim", version, about = "Free-running vs A-Law governed Kuramoto ensembles")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Mode::Compare)]
    mode: Mode,

    /// Number of oscillators (default: 120 compare, 100000 benchmark).
    #[arg(short = 'N', long = "oscillators")]
    n: Option<usize>,

    /// Simulation steps (default: 2500 compare, 2000 benchmark).
    #[arg(long)]
    steps: Option<u64>,

    /// Execution path: auto, fast or reference.
    #[arg(long)]
    backend: Option<BackendMode>,

    #[arg(long)]
    seed: Option<u64>,

    /// Frame sampling interval in compare mode.
    #[arg(long)]
    report_every: Option<u64>,

    /// JSON configuration file; command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON instead of the summary.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn resolve_config(&self) -> AlawResult<SimulationConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    AlawError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                SimulationConfig::from_json(&text)?
            }
            None => match self.mode {
                Mode::Compare => SimulationConfig::default(),
                Mode::Benchmark => SimulationConfig::benchmark(),
            },
        };
        if let Some(n) = self.n {
            cfg.n = n;
        }
        if let Some(steps) = self.steps {
            cfg.steps = steps;
        }
        if let Some(mode) = self.backend {
            cfg.mode = mode;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(every) = self.report_every {
            cfg.report_every = every;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AlawResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AlawError::Validation(format!("JSON encode error: {e}")))
}

fn print_comparison(cfg: &SimulationConfig, report: &ComparisonReport) {
    println!(
        "Comparison mode | N={} | steps={} | backend={}",
        report.n, cfg.steps, report.backend
    );
    for f in &report.frames {
        println!(
            "Step {:04} | free ratio={:.3} r={:.3}{} | governed ratio={:.3} r={:.3}{}",
            f.step,
            f.ungoverned.reading.ratio,
            f.ungoverned.reading.order_magnitude,
            if f.ungoverned_alert { " !" } else { "" },
            f.governed.reading.ratio,
            f.governed.reading.order_magnitude,
            if f.governed.governor_active {
                "  A-LAW ACTIVE"
            } else {
                ""
            }
        );
    }
    println!("\n{:=^50}", " Final Results ");
    println!(
        "Free-running  : ratio={:.4}  r={:.4}",
        report.ungoverned.final_reading.ratio, report.ungoverned.final_reading.order_magnitude
    );
    println!(
        "A-Law governed: ratio={:.4}  r={:.4}",
        report.governed.final_reading.ratio, report.governed.final_reading.order_magnitude
    );
    println!(
        "A-Law interventions: {:.1}%",
        report.governed.intervention_fraction() * 100.0
    );
}

fn print_benchmark(report: &BenchmarkReport) {
    println!(
        "Benchmark mode | N={} | steps={} | backend={}",
        report.n, report.steps, report.backend
    );
    println!("\n{:=^50}", " Final Results ");
    println!("Time                : {:6.2} s", report.elapsed_s);
    println!("Steps/sec           : {:7.0}", report.steps_per_sec());
    println!("Oscillator updates/s: {:6.2} M", report.mega_updates_per_sec());
    println!(
        "A-Law interventions : {:.1}%",
        report.intervention_fraction() * 100.0
    );
    println!(
        "Final A-Law ratio   : {:.4}",
        report.summary.final_reading.ratio
    );
    println!(
        "Final coherence r   : {:.4}",
        report.summary.final_reading.order_magnitude
    );
}

fn run(cli: &Cli) -> AlawResult<()> {
    let cfg = cli.resolve_config()?;
    match cli.mode {
        Mode::Compare => {
            let report = run_comparison(&cfg)?;
            if cli.json {
                println!("{}", to_json(&report)?);
            } else {
                print_comparison(&cfg, &report);
            }
        }
        Mode::Benchmark => {
            let report = run_benchmark(&cfg)?;
            if cli.json {
                println!("{}", to_json(&report)?);
            } else {
                print_benchmark(&report);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
