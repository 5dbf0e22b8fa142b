// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Oscillator Ensemble
// ─────────────────────────────────────────────────────────────────────
//! Phase and natural-frequency state of one Kuramoto population.
//!
//! Natural frequencies are drawn once and shared read-only through an
//! `Arc<[f64]>`, so the governed and free-running ensembles of a
//! comparison see the same draw without copying it.

use std::f64::consts::TAU;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use alaw_types::{AlawError, AlawResult, SimulationConfig};

/// Reduce a phase into [0, 2π).
///
/// Idempotent: `wrap_phase(wrap_phase(x)) == wrap_phase(x)`.
#[inline]
pub fn wrap_phase(theta: f64) -> f64 {
    let w = theta.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly 2π
    if w >= TAU {
        0.0
    } else {
        w
    }
}

/// Population standard deviation (ddof = 0).
fn population_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 1.0 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Kuramoto population with a fixed coupling strength.
#[derive(Debug, Clone)]
pub struct OscillatorEnsemble {
    phases: Vec<f64>,
    natural_frequencies: Arc<[f64]>,
    coupling_strength: f64,
    frequency_spread: f64,
}

impl OscillatorEnsemble {
    /// Build an ensemble, wrapping the given phases into [0, 2π).
    ///
    /// Rejects empty ensembles, mismatched lengths, non-finite values and
    /// negative coupling. Nothing is constructed on error.
    pub fn new(
        phases: Vec<f64>,
        natural_frequencies: Arc<[f64]>,
        coupling_strength: f64,
    ) -> AlawResult<Self> {
        if phases.is_empty() {
            return Err(AlawError::Config(
                "ensemble needs at least one oscillator".to_string(),
            ));
        }
        if phases.len() != natural_frequencies.len() {
            return Err(AlawError::Config(format!(
                "phase/frequency length mismatch: {} vs {}",
                phases.len(),
                natural_frequencies.len()
            )));
        }
        if !coupling_strength.is_finite() || coupling_strength < 0.0 {
            return Err(AlawError::Config(format!(
                "coupling_strength must be finite and >= 0, got {coupling_strength}"
            )));
        }
        if phases.iter().any(|th| !th.is_finite()) {
            return Err(AlawError::Config(
                "initial phases contain NaN or Inf".to_string(),
            ));
        }
        if natural_frequencies.iter().any(|w| !w.is_finite()) {
            return Err(AlawError::Config(
                "natural frequencies contain NaN or Inf".to_string(),
            ));
        }

        let phases = phases.into_iter().map(wrap_phase).collect();
        let frequency_spread = population_std(&natural_frequencies);
        Ok(Self {
            phases,
            natural_frequencies,
            coupling_strength,
            frequency_spread,
        })
    }

    /// Seeded ensemble: uniform phases, normal frequencies N(0, noise_level²).
    pub fn seeded(n: usize, seed: u64, noise_level: f64, coupling_strength: f64) -> AlawResult<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let phases = draw_phases(n, &mut rng);
        let freqs = draw_frequencies(n, noise_level, &mut rng)?;
        Self::new(phases, freqs, coupling_strength)
    }

    /// Same frequencies, fresh phases and coupling.
    pub fn sibling(&self, phases: Vec<f64>, coupling_strength: f64) -> AlawResult<Self> {
        Self::new(phases, Arc::clone(&self.natural_frequencies), coupling_strength)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Phases and frequencies together, for the integrator's update loop.
    pub(crate) fn split_mut(&mut self) -> (&mut [f64], &[f64]) {
        (&mut self.phases, &self.natural_frequencies)
    }

    pub fn natural_frequencies(&self) -> &[f64] {
        &self.natural_frequencies
    }

    /// Shared handle to the frequency draw.
    pub fn frequency_draw(&self) -> Arc<[f64]> {
        Arc::clone(&self.natural_frequencies)
    }

    pub fn coupling_strength(&self) -> f64 {
        self.coupling_strength
    }

    /// Population standard deviation of the natural frequencies.
    pub fn frequency_spread(&self) -> f64 {
        self.frequency_spread
    }
}

/// Uniform initial phases in [0, 2π).
pub fn draw_phases<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(0.0..TAU)).collect()
}

/// Zero-mean normal natural frequencies with standard deviation `noise_level`.
pub fn draw_frequencies<R: Rng + ?Sized>(
    n: usize,
    noise_level: f64,
    rng: &mut R,
) -> AlawResult<Arc<[f64]>> {
    if !noise_level.is_finite() || noise_level < 0.0 {
        return Err(AlawError::Config(format!(
            "noise_level must be finite and >= 0, got {noise_level}"
        )));
    }
    let normal = Normal::new(0.0, noise_level)
        .map_err(|e| AlawError::Config(format!("noise_level {noise_level}: {e}")))?;
    Ok((0..n).map(|_| normal.sample(rng)).collect())
}

/// The two populations of a comparison run.
///
/// Both start from the same phase draw (independent copies) and share one
/// natural-frequency draw; only the coupling strength differs.
#[derive(Debug, Clone)]
pub struct EnsemblePair {
    pub ungoverned: OscillatorEnsemble,
    pub governed: OscillatorEnsemble,
}

impl EnsemblePair {
    pub fn seeded(config: &SimulationConfig) -> AlawResult<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let phases = draw_phases(config.n, &mut rng);
        let freqs = draw_frequencies(config.n, config.noise_level, &mut rng)?;

        let ungoverned =
            OscillatorEnsemble::new(phases.clone(), Arc::clone(&freqs), config.coupling_ungoverned)?;
        let governed = ungoverned.sibling(phases, config.coupling_governed)?;
        Ok(Self {
            ungoverned,
            governed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freqs(v: &[f64]) -> Arc<[f64]> {
        v.to_vec().into()
    }

    #[test]
    fn test_wrap_phase_range() {
        for &x in &[-10.0, -TAU, -1e-18, 0.0, 1.0, TAU, 3.0 * TAU + 0.5, 1e6] {
            let w = wrap_phase(x);
            assert!((0.0..TAU).contains(&w), "wrap({x}) = {w}");
        }
    }

    #[test]
    fn test_wrap_phase_idempotent() {
        for i in -200..200 {
            let x = i as f64 * 0.173;
            let once = wrap_phase(x);
            assert_eq!(wrap_phase(once), once, "x={x}");
        }
    }

    #[test]
    fn test_wrap_tiny_negative_is_zero() {
        assert_eq!(wrap_phase(-1e-18), 0.0);
    }

    #[test]
    fn test_new_wraps_phases() {
        let e = OscillatorEnsemble::new(vec![-0.5, 7.0], freqs(&[0.0, 0.0]), 1.0).unwrap();
        assert!(e.phases().iter().all(|&th| (0.0..TAU).contains(&th)));
        assert!((e.phases()[0] - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            OscillatorEnsemble::new(vec![], freqs(&[]), 1.0),
            Err(AlawError::Config(_))
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(OscillatorEnsemble::new(vec![0.0; 3], freqs(&[0.0; 4]), 1.0).is_err());
    }

    #[test]
    fn test_non_finite_coupling_rejected() {
        assert!(OscillatorEnsemble::new(vec![0.0], freqs(&[0.0]), f64::NAN).is_err());
        assert!(OscillatorEnsemble::new(vec![0.0], freqs(&[0.0]), f64::INFINITY).is_err());
        assert!(OscillatorEnsemble::new(vec![0.0], freqs(&[0.0]), -1.0).is_err());
    }

    #[test]
    fn test_nan_phase_rejected() {
        assert!(OscillatorEnsemble::new(vec![f64::NAN], freqs(&[0.0]), 1.0).is_err());
    }

    #[test]
    fn test_frequency_spread_population_std() {
        let e = OscillatorEnsemble::new(vec![0.0; 4], freqs(&[1.0, -1.0, 1.0, -1.0]), 1.0).unwrap();
        assert!((e.frequency_spread() - 1.0).abs() < 1e-12);
        let flat = OscillatorEnsemble::new(vec![0.0; 3], freqs(&[2.0; 3]), 1.0).unwrap();
        assert_eq!(flat.frequency_spread(), 0.0);
    }

    #[test]
    fn test_seeded_reproducible() {
        let a = OscillatorEnsemble::seeded(256, 7, 1.15, 1.8).unwrap();
        let b = OscillatorEnsemble::seeded(256, 7, 1.15, 1.8).unwrap();
        assert_eq!(a.phases(), b.phases());
        assert_eq!(a.natural_frequencies(), b.natural_frequencies());
        let c = OscillatorEnsemble::seeded(256, 8, 1.15, 1.8).unwrap();
        assert_ne!(a.phases(), c.phases());
    }

    #[test]
    fn test_seeded_frequency_spread_near_noise_level() {
        let e = OscillatorEnsemble::seeded(20_000, 123, 1.15, 1.8).unwrap();
        assert!(
            (e.frequency_spread() - 1.15).abs() < 0.05,
            "spread={}",
            e.frequency_spread()
        );
    }

    #[test]
    fn test_negative_noise_level_rejected() {
        assert!(matches!(
            OscillatorEnsemble::seeded(8, 1, -1.0, 1.0),
            Err(AlawError::Config(_))
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(draw_frequencies(8, -0.5, &mut rng).is_err());
        assert!(draw_frequencies(8, f64::NAN, &mut rng).is_err());
        assert!(draw_frequencies(8, f64::INFINITY, &mut rng).is_err());
    }

    #[test]
    fn test_zero_noise_level_identical_frequencies() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let freqs = draw_frequencies(8, 0.0, &mut rng).unwrap();
        assert!(freqs.iter().all(|&w| w == 0.0), "{freqs:?}");
    }

    #[test]
    fn test_pair_shares_frequencies() {
        let pair = EnsemblePair::seeded(&SimulationConfig::default()).unwrap();
        assert!(Arc::ptr_eq(
            &pair.governed.frequency_draw(),
            &pair.ungoverned.frequency_draw()
        ));
        assert_eq!(pair.governed.phases(), pair.ungoverned.phases());
        assert_eq!(pair.governed.coupling_strength(), 1.80);
        assert_eq!(pair.ungoverned.coupling_strength(), 1.05);
    }

    #[test]
    fn test_pair_invalid_config() {
        let cfg = SimulationConfig {
            n: 0,
            ..Default::default()
        };
        assert!(EnsemblePair::seeded(&cfg).is_err());
    }
}
