// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Throughput Benchmark
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;
use std::time::Instant;

use alaw_physics::{select, EnsemblePair, Integrator, KernelBackend};
use alaw_types::{AlawResult, BenchmarkReport, SimulationConfig};

/// Time a governed run of `config.steps` steps over `config.n` oscillators.
///
/// Uses the governed half of the seeded pair, so the draw matches the
/// comparison run for the same seed.
pub fn run_benchmark(config: &SimulationConfig) -> AlawResult<BenchmarkReport> {
    config.validate()?;
    let backend = select(config.mode)?;
    run_benchmark_on(config, backend)
}

/// As `run_benchmark`, on an already selected backend.
pub fn run_benchmark_on(
    config: &SimulationConfig,
    backend: Arc<dyn KernelBackend>,
) -> AlawResult<BenchmarkReport> {
    let EnsemblePair { mut governed, .. } = EnsemblePair::seeded(config)?;
    let mut integrator = Integrator::with_backend(config, Arc::clone(&backend))?;

    log::info!(
        "benchmark: N={} steps={} backend={}",
        config.n,
        config.steps,
        backend.name()
    );

    let t0 = Instant::now();
    let summary = integrator.run(&mut governed, true, config.steps);
    let elapsed_s = t0.elapsed().as_secs_f64();

    let report = BenchmarkReport {
        n: config.n,
        steps: config.steps,
        backend: backend.name().to_string(),
        elapsed_s,
        summary,
    };
    log::info!(
        "benchmark done: {:.2}s, {:.0} steps/s, {:.2}M updates/s, interventions {:.1}%",
        report.elapsed_s,
        report.steps_per_sec(),
        report.mega_updates_per_sec(),
        report.intervention_fraction() * 100.0
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alaw_types::BackendMode;

    fn small(mode: BackendMode) -> SimulationConfig {
        SimulationConfig {
            n: 2000,
            steps: 150,
            mode,
            ..SimulationConfig::benchmark()
        }
    }

    #[test]
    fn test_benchmark_report_fields() {
        let report = run_benchmark(&small(BackendMode::Reference)).unwrap();
        assert_eq!(report.n, 2000);
        assert_eq!(report.steps, 150);
        assert_eq!(report.backend, "reference");
        assert_eq!(report.summary.steps, 150);
        assert!(report.elapsed_s >= 0.0);
        let frac = report.intervention_fraction();
        assert!((0.0..=1.0).contains(&frac), "fraction={frac}");
    }

    #[test]
    fn test_reference_benchmark_bit_reproducible() {
        let cfg = small(BackendMode::Reference);
        let a = run_benchmark(&cfg).unwrap();
        let b = run_benchmark(&cfg).unwrap();
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_benchmark_matches_comparison_governed_half() {
        let cfg = SimulationConfig {
            n: 120,
            steps: 200,
            mode: BackendMode::Reference,
            ..Default::default()
        };
        let bench = run_benchmark(&cfg).unwrap();
        let cmp = crate::run_comparison(&cfg).unwrap();
        assert_eq!(bench.summary, cmp.governed);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_fast_benchmark_close_to_reference() {
        // 20k oscillators: the fast path splits the reduction across tasks.
        let cfg = |mode| SimulationConfig {
            n: 20_000,
            steps: 50,
            ..small(mode)
        };
        let a = run_benchmark(&cfg(BackendMode::Reference)).unwrap();
        let b = run_benchmark(&cfg(BackendMode::Fast)).unwrap();
        assert_eq!(b.backend, "fast");
        assert_eq!(a.summary.interventions, b.summary.interventions);
        let (ra, rb) = (a.summary.final_reading, b.summary.final_reading);
        assert!((ra.order_magnitude - rb.order_magnitude).abs() < 1e-9);
        assert!((ra.ratio - rb.ratio).abs() < 1e-9);
    }

    #[test]
    #[ignore = "full benchmark scale: 100k oscillators x 2000 steps"]
    fn test_full_scale_reference_reproducible() {
        let cfg = SimulationConfig {
            mode: BackendMode::Reference,
            ..SimulationConfig::benchmark()
        };
        let a = run_benchmark(&cfg).unwrap();
        let b = run_benchmark(&cfg).unwrap();
        assert_eq!(a.summary, b.summary);
        assert!((0.0..=1.0).contains(&a.intervention_fraction()));
    }
}
