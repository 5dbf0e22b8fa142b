// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Kernel Report Types
// ─────────────────────────────────────────────────────────────────────
//! Per-step readings and run-level summaries handed to the reporting
//! layer. Nothing here is persisted; everything is recomputed per step.

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_unit(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_unit: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Order parameter and coherence-to-noise ratio of one ensemble state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoherenceReading {
    /// |⟨e^{iθ}⟩| ∈ [0, 1]: 1 = phase-locked, 0 = incoherent.
    pub order_magnitude: f64,
    /// arg⟨e^{iθ}⟩ ∈ (−π, π].
    pub mean_phase: f64,
    /// S / (S + D + ε) ∈ [0, 1].
    pub ratio: f64,
}

/// Outcome of one governor evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernorDecision {
    pub active: bool,
    /// Per-oscillator nudge in [−2, 2]; all zeros when inactive.
    pub correction: Vec<f64>,
}

impl GovernorDecision {
    pub fn inactive(n: usize) -> Self {
        Self {
            active: false,
            correction: vec![0.0; n],
        }
    }
}

/// Observability record returned by every integrator step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Zero-based index of the step that produced this report.
    pub step: u64,
    /// Reading taken before the update; it drove the governor decision.
    pub reading: CoherenceReading,
    pub governor_active: bool,
}

/// Aggregate statistics of a multi-step run on one ensemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u64,
    pub interventions: u64,
    /// Reading of the state left after the last step.
    pub final_reading: CoherenceReading,
}

impl RunSummary {
    pub fn intervention_fraction(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.interventions as f64 / self.steps as f64
    }
}

/// One sampled instant of a side-by-side comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: u64,
    pub ungoverned: StepReport,
    pub governed: StepReport,
    /// Free-running ensemble reached the alert ratio.
    pub ungoverned_alert: bool,
    /// Governed ensemble is at or above the governor threshold.
    pub governed_locked: bool,
}

/// Result of running both ensembles side by side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub n: usize,
    pub backend: String,
    pub ungoverned: RunSummary,
    pub governed: RunSummary,
    pub frames: Vec<Frame>,
}

/// Throughput and outcome of a governed benchmark run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub n: usize,
    pub steps: u64,
    pub backend: String,
    pub elapsed_s: f64,
    pub summary: RunSummary,
}

impl BenchmarkReport {
    pub fn steps_per_sec(&self) -> f64 {
        if self.elapsed_s <= 0.0 {
            return 0.0;
        }
        self.steps as f64 / self.elapsed_s
    }

    /// Oscillator updates per second, in millions.
    pub fn mega_updates_per_sec(&self) -> f64 {
        self.steps_per_sec() * self.n as f64 / 1e6
    }

    pub fn intervention_fraction(&self) -> f64 {
        self.summary.intervention_fraction()
    }
}
