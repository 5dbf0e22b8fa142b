// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Mean-Field Kuramoto Integrator
// ─────────────────────────────────────────────────────────────────────
//! Forward-Euler integrator for the mean-field Kuramoto model with an
//! optional A-Law correction:
//!
//!   dθ_i/dt = ω_i + K r sin(ψ − θ_i) + c_i
//!
//! where (r, ψ) is the order parameter of the current state and c_i the
//! governor correction (zero for the free-running ensemble).
//!
//! The correction buffer is pre-allocated and reused across steps.

use std::sync::Arc;

use alaw_types::{
    AlawError, AlawResult, GovernorConfig, RunSummary, SimulationConfig, StepReport,
};

use crate::backend::{select, KernelBackend};
use crate::coherence::CoherenceMetric;
use crate::ensemble::OscillatorEnsemble;
use crate::governor::PhaseGovernor;

/// Single-step integrator bound to one execution path.
///
/// Use one integrator per ensemble: the step counter is per instance.
#[derive(Debug, Clone)]
pub struct Integrator {
    dt: f64,
    metric: CoherenceMetric,
    governor: PhaseGovernor,
    backend: Arc<dyn KernelBackend>,
    // Pre-allocated scratch
    correction: Vec<f64>,
    step_count: u64,
}

impl Integrator {
    pub fn new(
        dt: f64,
        noise_floor: f64,
        governor: GovernorConfig,
        backend: Arc<dyn KernelBackend>,
    ) -> AlawResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(AlawError::Config(format!(
                "dt must be finite and > 0, got {dt}"
            )));
        }
        if !noise_floor.is_finite() || noise_floor < 0.0 {
            return Err(AlawError::Config(format!(
                "noise_floor must be finite and >= 0, got {noise_floor}"
            )));
        }
        Ok(Self {
            dt,
            metric: CoherenceMetric::new(noise_floor, Arc::clone(&backend)),
            governor: PhaseGovernor::new(governor, Arc::clone(&backend))?,
            backend,
            correction: Vec::new(),
            step_count: 0,
        })
    }

    /// Validate `config` and bind to the backend its mode selects.
    pub fn from_config(config: &SimulationConfig) -> AlawResult<Self> {
        config.validate()?;
        let backend = select(config.mode)?;
        Self::with_backend(config, backend)
    }

    /// As `from_config`, sharing an already selected backend.
    pub fn with_backend(
        config: &SimulationConfig,
        backend: Arc<dyn KernelBackend>,
    ) -> AlawResult<Self> {
        Self::new(config.dt, config.noise_floor, config.governor, backend)
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn metric(&self) -> &CoherenceMetric {
        &self.metric
    }

    pub fn governor(&self) -> &PhaseGovernor {
        &self.governor
    }

    /// Advance `ensemble` by one step in place.
    ///
    /// The returned reading is the one taken before the update.
    pub fn step(&mut self, ensemble: &mut OscillatorEnsemble, governed: bool) -> StepReport {
        let reading = self.metric.compute_for(ensemble);
        let pull = ensemble.coupling_strength() * reading.order_magnitude;

        let active = governed && {
            self.correction.resize(ensemble.len(), 0.0);
            self.governor.intervene_toward(
                ensemble.phases(),
                reading.ratio,
                reading.mean_phase,
                &mut self.correction,
            )
        };

        let (phases, natural_frequencies) = ensemble.split_mut();
        self.backend.advance(
            phases,
            natural_frequencies,
            pull,
            reading.mean_phase,
            active.then_some(self.correction.as_slice()),
            self.dt,
        );

        let report = StepReport {
            step: self.step_count,
            reading,
            governor_active: active,
        };
        self.step_count += 1;
        log::trace!(
            "step {} r={:.4} ratio={:.4} active={}",
            report.step,
            reading.order_magnitude,
            reading.ratio,
            active
        );
        report
    }

    /// Run `steps` steps, handing every report to `observe`.
    pub fn run_with<F>(
        &mut self,
        ensemble: &mut OscillatorEnsemble,
        governed: bool,
        steps: u64,
        mut observe: F,
    ) -> RunSummary
    where
        F: FnMut(&StepReport),
    {
        let mut interventions = 0;
        for _ in 0..steps {
            let report = self.step(ensemble, governed);
            if report.governor_active {
                interventions += 1;
            }
            observe(&report);
        }
        let summary = RunSummary {
            steps,
            interventions,
            final_reading: self.metric.compute_for(ensemble),
        };
        log::debug!(
            "run done: {} steps on {} ({}), interventions {:.1}%, final r={:.4} ratio={:.4}",
            steps,
            self.backend.name(),
            if governed { "governed" } else { "ungoverned" },
            summary.intervention_fraction() * 100.0,
            summary.final_reading.order_magnitude,
            summary.final_reading.ratio
        );
        summary
    }

    pub fn run(
        &mut self,
        ensemble: &mut OscillatorEnsemble,
        governed: bool,
        steps: u64,
    ) -> RunSummary {
        self.run_with(ensemble, governed, steps, |_| {})
    }
}
