// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Phase Governor
// ─────────────────────────────────────────────────────────────────────
//! Adaptive, saturating correction toward the population mean phase.
//!
//!   active  ⇔ ratio < threshold
//!   adapt   = base_strength · (1 + 8 · (threshold − ratio))
//!   c_i     = clip(adapt · sin(ψ − θ_i), −2, 2)
//!
//! The governor is a pure function of `(phases, ratio)`: no memory of
//! earlier activations, no hysteresis.

use std::sync::Arc;

use alaw_types::{AlawResult, GovernorConfig, GovernorDecision};

use crate::backend::{KernelBackend, ReferenceBackend};
use crate::coherence::OrderParameter;

/// Gain added per unit of ratio deficit below the threshold.
pub const GAIN_SLOPE: f64 = 8.0;

/// Largest nudge a single oscillator can receive in one step.
pub const CORRECTION_LIMIT: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct PhaseGovernor {
    config: GovernorConfig,
    backend: Arc<dyn KernelBackend>,
}

impl PhaseGovernor {
    pub fn new(config: GovernorConfig, backend: Arc<dyn KernelBackend>) -> AlawResult<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn reference(config: GovernorConfig) -> AlawResult<Self> {
        Self::new(config, Arc::new(ReferenceBackend))
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn is_active(&self, ratio: f64) -> bool {
        ratio < self.config.threshold
    }

    /// Gain for a given ratio. Grows linearly as the ratio falls.
    pub fn adaptive_gain(&self, ratio: f64) -> f64 {
        self.config.base_strength * (1.0 + GAIN_SLOPE * (self.config.threshold - ratio))
    }

    /// Evaluate the governor, allocating the correction vector.
    pub fn intervene(&self, phases: &[f64], ratio: f64) -> GovernorDecision {
        let mut correction = vec![0.0; phases.len()];
        let active = self.intervene_into(phases, ratio, &mut correction);
        GovernorDecision { active, correction }
    }

    /// Evaluate the governor into caller-owned scratch.
    ///
    /// `out` must have the same length as `phases`. Returns the active flag;
    /// `out` is zero-filled when inactive.
    pub fn intervene_into(&self, phases: &[f64], ratio: f64, out: &mut [f64]) -> bool {
        if !self.is_active(ratio) {
            out.fill(0.0);
            return false;
        }
        let (sum_sin, sum_cos) = self.backend.phase_sums(phases);
        let mean_phase = OrderParameter::from_sums(sum_sin, sum_cos, phases.len()).angle();
        self.correct_toward(phases, ratio, mean_phase, out)
    }

    /// As `intervene_into`, with the mean phase already known from the
    /// coherence reading of the same phases.
    pub fn intervene_toward(
        &self,
        phases: &[f64],
        ratio: f64,
        mean_phase: f64,
        out: &mut [f64],
    ) -> bool {
        if !self.is_active(ratio) {
            out.fill(0.0);
            return false;
        }
        self.correct_toward(phases, ratio, mean_phase, out)
    }

    fn correct_toward(&self, phases: &[f64], ratio: f64, mean_phase: f64, out: &mut [f64]) -> bool {
        debug_assert_eq!(phases.len(), out.len());
        let adapt = self.adaptive_gain(ratio);
        self.backend
            .fill_correction(phases, mean_phase, adapt, CORRECTION_LIMIT, out);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn governor() -> PhaseGovernor {
        PhaseGovernor::reference(GovernorConfig::default()).unwrap()
    }

    fn spread_phases(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 2.399).rem_euclid(TAU)).collect()
    }

    #[test]
    fn test_stands_down_at_or_above_threshold() {
        let g = governor();
        let phases = spread_phases(100);
        for &ratio in &[0.59, 0.6, 0.9, 1.0] {
            let d = g.intervene(&phases, ratio);
            assert!(!d.active, "ratio={ratio}");
            assert!(d.correction.iter().all(|&c| c == 0.0));
            assert_eq!(d.correction.len(), 100);
        }
    }

    #[test]
    fn test_correction_bounded_below_threshold() {
        let g = governor();
        let phases = spread_phases(1000);
        for &ratio in &[0.0, 0.1, 0.3, 0.58] {
            let d = g.intervene(&phases, ratio);
            assert!(d.active);
            assert!(
                d.correction.iter().all(|c| (-2.0..=2.0).contains(c)),
                "ratio={ratio}"
            );
        }
    }

    #[test]
    fn test_saturates_with_large_gain() {
        let g = PhaseGovernor::reference(GovernorConfig {
            threshold: 0.59,
            base_strength: 50.0,
        })
        .unwrap();
        let d = g.intervene(&[0.0, 0.0, PI / 2.0], 0.0);
        assert!(d.correction.iter().any(|&c| c.abs() == 2.0));
        assert!(d.correction.iter().all(|c| c.abs() <= 2.0));
    }

    #[test]
    fn test_gain_formula() {
        let g = governor();
        let expected = 0.65 * (1.0 + 8.0 * (0.59 - 0.2));
        assert!((g.adaptive_gain(0.2) - expected).abs() < 1e-12);
        assert!((g.adaptive_gain(0.59) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_gain_monotone_in_deficit() {
        let g = governor();
        let mut prev = g.adaptive_gain(0.59).abs();
        for i in 1..=59 {
            let ratio = 0.59 - i as f64 * 0.01;
            let gain = g.adaptive_gain(ratio).abs();
            assert!(gain >= prev, "ratio={ratio}: {gain} < {prev}");
            prev = gain;
        }
    }

    #[test]
    fn test_correction_magnitude_monotone_in_deficit() {
        let g = governor();
        let phases = spread_phases(64);
        let shallow = g.intervene(&phases, 0.5);
        let deep = g.intervene(&phases, 0.1);
        for (a, b) in shallow.correction.iter().zip(&deep.correction) {
            assert!(b.abs() >= a.abs() - 1e-15);
        }
    }

    #[test]
    fn test_pulls_toward_mean_phase() {
        let g = governor();
        // Cluster around 1.0 with one oscillator lagging behind.
        let phases = [1.0, 1.0, 1.0, 1.0, 0.5];
        let d = g.intervene(&phases, 0.1);
        assert!(d.correction[4] > 0.0, "lagging oscillator should advance");
        assert!(d.correction[0] < 0.0, "leaders are pulled back slightly");
    }

    #[test]
    fn test_deterministic() {
        let g = governor();
        let phases = spread_phases(333);
        assert_eq!(g.intervene(&phases, 0.2), g.intervene(&phases, 0.2));
    }

    #[test]
    fn test_intervene_into_clears_stale_scratch() {
        let g = governor();
        let phases = spread_phases(10);
        let mut scratch = vec![7.0; 10];
        assert!(!g.intervene_into(&phases, 0.95, &mut scratch));
        assert!(scratch.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_toward_matches_recomputed_mean() {
        let g = governor();
        let phases = spread_phases(257);
        let (s, c) = ReferenceBackend.phase_sums(&phases);
        let psi = OrderParameter::from_sums(s, c, phases.len()).angle();
        let mut a = vec![0.0; 257];
        let mut b = vec![0.0; 257];
        g.intervene_into(&phases, 0.3, &mut a);
        g.intervene_toward(&phases, 0.3, psi, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(PhaseGovernor::reference(GovernorConfig {
            threshold: -0.1,
            base_strength: 0.65,
        })
        .is_err());
        assert!(PhaseGovernor::reference(GovernorConfig {
            threshold: 0.59,
            base_strength: f64::NAN,
        })
        .is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_fast_decision_matches_reference() {
        use crate::backend::ParallelBackend;
        let phases: Vec<f64> = (0..60_000)
            .map(|i| (1.0 + 0.8 * (i as f64 * 0.37).sin()).rem_euclid(TAU))
            .collect();
        let reference = governor();
        let fast = PhaseGovernor::new(GovernorConfig::default(), Arc::new(ParallelBackend)).unwrap();
        for &ratio in &[0.05, 0.4, 0.7] {
            let a = reference.intervene(&phases, ratio);
            let b = fast.intervene(&phases, ratio);
            assert_eq!(a.active, b.active);
            for (x, y) in a.correction.iter().zip(&b.correction) {
                assert!((x - y).abs() <= 1e-9 * x.abs().max(1.0), "{x} vs {y}");
            }
        }
    }
}
