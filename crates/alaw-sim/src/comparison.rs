// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Governed vs Free-Running Comparison
// ─────────────────────────────────────────────────────────────────────
//! Side-by-side run of the two ensembles of an `EnsemblePair`.
//!
//! The ensembles never exchange state, so each runs to completion on its
//! own scoped thread; the threads join once, at the end of the run, and
//! the sampled reports are zipped into frames.

use std::sync::Arc;
use std::thread;

use alaw_physics::{select, EnsemblePair, Integrator, KernelBackend, OscillatorEnsemble};
use alaw_types::{
    AlawResult, ComparisonReport, Frame, RunSummary, SimulationConfig, StepReport,
};

/// Upper bound on the frames preallocated for one run.
const MAX_PREALLOC_FRAMES: u64 = 1 << 16;

fn sample_capacity(steps: u64, every: u64) -> usize {
    (steps / every.max(1))
        .saturating_add(1)
        .min(MAX_PREALLOC_FRAMES) as usize
}

/// Run one ensemble, keeping every `every`-th report and the last one.
fn sampled_run(
    integrator: &mut Integrator,
    ensemble: &mut OscillatorEnsemble,
    governed: bool,
    steps: u64,
    every: u64,
) -> (RunSummary, Vec<StepReport>) {
    let mut samples = Vec::with_capacity(sample_capacity(steps, every));
    let summary = integrator.run_with(ensemble, governed, steps, |report| {
        if report.step % every == 0 || report.step + 1 == steps {
            samples.push(*report);
        }
    });
    (summary, samples)
}

fn build_frames(
    config: &SimulationConfig,
    ungoverned: &[StepReport],
    governed: &[StepReport],
) -> Vec<Frame> {
    ungoverned
        .iter()
        .zip(governed)
        .map(|(free, gov)| Frame {
            step: gov.step,
            ungoverned: *free,
            governed: *gov,
            ungoverned_alert: free.reading.ratio >= config.alert_ratio,
            governed_locked: gov.reading.ratio >= config.governor.threshold,
        })
        .collect()
}

/// Run the free-running and governed ensembles side by side.
pub fn run_comparison(config: &SimulationConfig) -> AlawResult<ComparisonReport> {
    config.validate()?;
    let backend = select(config.mode)?;
    run_comparison_on(config, backend)
}

/// As `run_comparison`, on an already selected backend.
pub fn run_comparison_on(
    config: &SimulationConfig,
    backend: Arc<dyn KernelBackend>,
) -> AlawResult<ComparisonReport> {
    let EnsemblePair {
        mut ungoverned,
        mut governed,
    } = EnsemblePair::seeded(config)?;
    let mut free_integ = Integrator::with_backend(config, Arc::clone(&backend))?;
    let mut gov_integ = Integrator::with_backend(config, Arc::clone(&backend))?;

    log::info!(
        "comparison: N={} steps={} K_free={} K_gov={} backend={}",
        config.n,
        config.steps,
        config.coupling_ungoverned,
        config.coupling_governed,
        backend.name()
    );

    let ((free_summary, free_samples), (gov_summary, gov_samples)) = thread::scope(|s| {
        let free = s.spawn(|| {
            sampled_run(
                &mut free_integ,
                &mut ungoverned,
                false,
                config.steps,
                config.report_every,
            )
        });
        let gov = sampled_run(
            &mut gov_integ,
            &mut governed,
            true,
            config.steps,
            config.report_every,
        );
        let free = free
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
        (free, gov)
    });

    let frames = build_frames(config, &free_samples, &gov_samples);
    for frame in &frames {
        log::debug!(
            "step {:04} | free ratio={:.3} r={:.3} | governed ratio={:.3} r={:.3}{}",
            frame.step,
            frame.ungoverned.reading.ratio,
            frame.ungoverned.reading.order_magnitude,
            frame.governed.reading.ratio,
            frame.governed.reading.order_magnitude,
            if frame.governed.governor_active {
                "  A-LAW ACTIVE"
            } else {
                ""
            }
        );
    }
    log::info!(
        "comparison done: free r={:.4} governed r={:.4} (governor active {:.1}% of steps)",
        free_summary.final_reading.order_magnitude,
        gov_summary.final_reading.order_magnitude,
        gov_summary.intervention_fraction() * 100.0
    );

    Ok(ComparisonReport {
        n: config.n,
        backend: backend.name().to_string(),
        ungoverned: free_summary,
        governed: gov_summary,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alaw_types::{AlawError, BackendMode};

    fn reference_config() -> SimulationConfig {
        SimulationConfig {
            mode: BackendMode::Reference,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_scenarios_governed_wins() {
        // N=120, seed 123, 2500 steps: K=1.05 free vs K=1.80 governed.
        let cfg = reference_config();
        let report = run_comparison(&cfg).unwrap();
        let free = report.ungoverned.final_reading;
        let gov = report.governed.final_reading;
        assert!(
            free.order_magnitude < gov.order_magnitude,
            "free r={} governed r={}",
            free.order_magnitude,
            gov.order_magnitude
        );
        assert!(gov.order_magnitude > 0.5, "governed r={}", gov.order_magnitude);
        assert!(gov.ratio > free.ratio);
        assert_eq!(report.ungoverned.interventions, 0);
    }

    #[test]
    fn test_governed_ratio_below_ceiling() {
        // r ≤ 1 caps the ratio at K / (K + D); with the default constants the
        // ceiling sits just under the 0.59 threshold.
        let cfg = reference_config();
        let pair = EnsemblePair::seeded(&cfg).unwrap();
        let d = pair.governed.frequency_spread() + cfg.noise_floor;
        let ceiling = cfg.coupling_governed / (cfg.coupling_governed + d);

        let report = run_comparison(&cfg).unwrap();
        for frame in &report.frames {
            assert!(frame.governed.reading.ratio <= ceiling + 1e-9);
        }
        assert!(report.governed.final_reading.ratio <= ceiling + 1e-9);
    }

    #[test]
    fn test_frames_sampled() {
        let cfg = SimulationConfig {
            steps: 101,
            report_every: 25,
            ..reference_config()
        };
        let report = run_comparison(&cfg).unwrap();
        let steps: Vec<u64> = report.frames.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![0, 25, 50, 75, 100]);
        for f in &report.frames {
            assert_eq!(f.ungoverned.step, f.governed.step);
            assert_eq!(
                f.governed_locked,
                f.governed.reading.ratio >= cfg.governor.threshold
            );
            assert!(!f.ungoverned.governor_active);
        }
    }

    #[test]
    fn test_last_step_always_sampled() {
        let cfg = SimulationConfig {
            steps: 10,
            report_every: 4,
            ..reference_config()
        };
        let report = run_comparison(&cfg).unwrap();
        let steps: Vec<u64> = report.frames.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![0, 4, 8, 9]);
    }

    #[test]
    fn test_sample_capacity_bounded() {
        assert_eq!(sample_capacity(101, 25), 5);
        assert_eq!(sample_capacity(0, 50), 1);
        assert_eq!(sample_capacity(u64::MAX, 1), MAX_PREALLOC_FRAMES as usize);
        assert_eq!(sample_capacity(u64::MAX, u64::MAX), 2);
    }

    #[test]
    fn test_first_frame_identical_start() {
        // Same initial phases: the first readings differ only through K.
        let report = run_comparison(&SimulationConfig {
            steps: 1,
            ..reference_config()
        })
        .unwrap();
        let f = report.frames[0];
        assert_eq!(
            f.ungoverned.reading.order_magnitude,
            f.governed.reading.order_magnitude
        );
        assert_eq!(f.ungoverned.reading.mean_phase, f.governed.reading.mean_phase);
    }

    #[test]
    fn test_comparison_reproducible() {
        let cfg = SimulationConfig {
            steps: 300,
            ..reference_config()
        };
        let a = run_comparison(&cfg).unwrap();
        let b = run_comparison(&cfg).unwrap();
        assert_eq!(a.governed, b.governed);
        assert_eq!(a.ungoverned, b.ungoverned);
        assert_eq!(a.frames, b.frames);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = SimulationConfig {
            report_every: 0,
            ..reference_config()
        };
        assert!(matches!(run_comparison(&cfg), Err(AlawError::Config(_))));
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_fast_request_fails_without_parallel() {
        let cfg = SimulationConfig {
            mode: BackendMode::Fast,
            ..Default::default()
        };
        assert!(matches!(
            run_comparison(&cfg),
            Err(AlawError::CapabilityUnavailable { .. })
        ));
    }
}
