// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Coherence Metric
// ─────────────────────────────────────────────────────────────────────
//! Kuramoto order parameter and coherence-to-noise ratio:
//!
//!   z     = ⟨e^{iθ}⟩ = (⟨cos θ⟩, ⟨sin θ⟩)
//!   r     = |z| ∈ [0, 1],   ψ = arg z
//!   S     = K · r
//!   D     = std(ω) + noise_floor
//!   ratio = S / (S + D + ε)

use std::sync::Arc;

use alaw_types::{clamp_unit, CoherenceReading};

use crate::backend::{KernelBackend, ReferenceBackend};
use crate::ensemble::OscillatorEnsemble;

/// Stabiliser in the ratio denominator.
pub const RATIO_EPSILON: f64 = 1e-12;

/// Mean unit vector of a phase population.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderParameter {
    pub mean_cos: f64,
    pub mean_sin: f64,
}

impl OrderParameter {
    pub fn from_sums(sum_sin: f64, sum_cos: f64, n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }
        let n = n as f64;
        Self {
            mean_cos: sum_cos / n,
            mean_sin: sum_sin / n,
        }
    }

    /// |z|, clamped into [0, 1] against rounding.
    pub fn magnitude(&self) -> f64 {
        clamp_unit(self.mean_cos.hypot(self.mean_sin), 0.0, 1.0)
    }

    /// arg z ∈ (−π, π].
    pub fn angle(&self) -> f64 {
        self.mean_sin.atan2(self.mean_cos)
    }
}

/// S / (S + D + ε), clamped into [0, 1].
#[inline]
pub fn coherence_ratio(signal: f64, noise: f64) -> f64 {
    clamp_unit(signal / (signal + noise + RATIO_EPSILON), 0.0, 1.0)
}

/// Computes `CoherenceReading`s on a chosen execution path.
#[derive(Debug, Clone)]
pub struct CoherenceMetric {
    noise_floor: f64,
    backend: Arc<dyn KernelBackend>,
}

impl CoherenceMetric {
    pub fn new(noise_floor: f64, backend: Arc<dyn KernelBackend>) -> Self {
        Self {
            noise_floor,
            backend,
        }
    }

    /// Reference path with the default 0.15 noise floor.
    pub fn reference() -> Self {
        Self::new(0.15, Arc::new(ReferenceBackend))
    }

    pub fn noise_floor(&self) -> f64 {
        self.noise_floor
    }

    pub fn order_parameter(&self, phases: &[f64]) -> OrderParameter {
        if phases.is_empty() {
            return OrderParameter::default();
        }
        let (sum_sin, sum_cos) = self.backend.phase_sums(phases);
        OrderParameter::from_sums(sum_sin, sum_cos, phases.len())
    }

    /// Reading for `phases` under coupling K and frequency spread std(ω).
    ///
    /// Precondition: `phases` is non-empty. An empty slice yields the
    /// all-zero reading.
    pub fn compute(
        &self,
        phases: &[f64],
        coupling_strength: f64,
        frequency_spread: f64,
    ) -> CoherenceReading {
        if phases.is_empty() {
            return CoherenceReading::default();
        }
        let z = self.order_parameter(phases);
        let order_magnitude = z.magnitude();
        let signal = coupling_strength * order_magnitude;
        let noise = frequency_spread + self.noise_floor;
        CoherenceReading {
            order_magnitude,
            mean_phase: z.angle(),
            ratio: coherence_ratio(signal, noise),
        }
    }

    pub fn compute_for(&self, ensemble: &OscillatorEnsemble) -> CoherenceReading {
        self.compute(
            ensemble.phases(),
            ensemble.coupling_strength(),
            ensemble.frequency_spread(),
        )
    }
}
