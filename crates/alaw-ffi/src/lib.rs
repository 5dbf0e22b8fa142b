// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Kernel PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied; PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the A-Law coherence kernel.
//!
//! Exposes `SimulationConfig`, `Simulation`, `PhaseGovernor`,
//! `coherence()`, `fast_available()` and `run_benchmark()`.
//!
//! # FFI Safety
//!
//! - Configs are validated before storage (`SimulationConfig::validate()`).
//! - Config and input errors raise `ValueError`; a missing backend raises
//!   `RuntimeError`.
//! - Multi-step runs release the GIL; no Python object is touched inside.
//!
//! Usage from Python:
//! ```python
//! from alaw_kernel import SimulationConfig, Simulation
//!
//! sim = Simulation(SimulationConfig(n=120, backend="reference"), governed=True)
//! summary = sim.run(2500)
//! print(summary.final_reading.ratio, summary.intervention_fraction)
//! ```

use std::sync::Arc;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use alaw_physics::{
    fast_capability, select, CoherenceMetric, EnsemblePair, Integrator, OscillatorEnsemble,
    PhaseGovernor,
};
use alaw_types::{
    AlawError, BackendMode, CoherenceReading, GovernorConfig, RunSummary, SimulationConfig,
    StepReport,
};

fn to_py_err(e: AlawError) -> PyErr {
    match e {
        AlawError::CapabilityUnavailable { .. } => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn parse_mode(backend: &str) -> PyResult<BackendMode> {
    backend.parse::<BackendMode>().map_err(to_py_err)
}

// ─── PySimulationConfig ─────────────────────────────────────────────

/// Python-visible simulation configuration.
#[pyclass(name = "SimulationConfig")]
#[derive(Clone)]
struct PySimulationConfig {
    inner: SimulationConfig,
}

#[pymethods]
impl PySimulationConfig {
    #[new]
    #[pyo3(signature = (
        n = 120,
        steps = 2500,
        seed = 123,
        dt = 0.02,
        noise_level = 1.15,
        coupling_governed = 1.80,
        coupling_ungoverned = 1.05,
        noise_floor = 0.15,
        threshold = 0.59,
        base_strength = 0.65,
        alert_ratio = 0.7,
        report_every = 50,
        backend = "auto",
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        n: usize,
        steps: u64,
        seed: u64,
        dt: f64,
        noise_level: f64,
        coupling_governed: f64,
        coupling_ungoverned: f64,
        noise_floor: f64,
        threshold: f64,
        base_strength: f64,
        alert_ratio: f64,
        report_every: u64,
        backend: &str,
    ) -> PyResult<Self> {
        let config = SimulationConfig {
            n,
            steps,
            seed,
            dt,
            noise_level,
            coupling_governed,
            coupling_ungoverned,
            noise_floor,
            governor: GovernorConfig {
                threshold,
                base_strength,
            },
            alert_ratio,
            report_every,
            mode: parse_mode(backend)?,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Benchmark defaults: 100 000 oscillators, 2000 steps.
    #[staticmethod]
    fn benchmark() -> Self {
        Self {
            inner: SimulationConfig::benchmark(),
        }
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = SimulationConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(to_py_err)
    }

    #[getter]
    fn n(&self) -> usize {
        self.inner.n
    }

    #[getter]
    fn steps(&self) -> u64 {
        self.inner.steps
    }

    #[getter]
    fn backend(&self) -> String {
        self.inner.mode.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationConfig(n={}, steps={}, seed={}, backend={})",
            self.inner.n, self.inner.steps, self.inner.seed, self.inner.mode
        )
    }
}

// ─── PyCoherenceReading ─────────────────────────────────────────────

#[pyclass(name = "CoherenceReading")]
#[derive(Clone)]
struct PyCoherenceReading {
    inner: CoherenceReading,
}

#[pymethods]
impl PyCoherenceReading {
    #[getter]
    fn order_magnitude(&self) -> f64 {
        self.inner.order_magnitude
    }

    #[getter]
    fn mean_phase(&self) -> f64 {
        self.inner.mean_phase
    }

    #[getter]
    fn ratio(&self) -> f64 {
        self.inner.ratio
    }

    fn __repr__(&self) -> String {
        format!(
            "CoherenceReading(r={:.4}, psi={:.4}, ratio={:.4})",
            self.inner.order_magnitude, self.inner.mean_phase, self.inner.ratio
        )
    }
}

// ─── PyStepReport / PyRunSummary ────────────────────────────────────

#[pyclass(name = "StepReport")]
#[derive(Clone)]
struct PyStepReport {
    inner: StepReport,
}

#[pymethods]
impl PyStepReport {
    #[getter]
    fn step(&self) -> u64 {
        self.inner.step
    }

    #[getter]
    fn reading(&self) -> PyCoherenceReading {
        PyCoherenceReading {
            inner: self.inner.reading,
        }
    }

    #[getter]
    fn governor_active(&self) -> bool {
        self.inner.governor_active
    }

    fn __repr__(&self) -> String {
        format!(
            "StepReport(step={}, ratio={:.4}, active={})",
            self.inner.step, self.inner.reading.ratio, self.inner.governor_active
        )
    }
}

#[pyclass(name = "RunSummary")]
#[derive(Clone)]
struct PyRunSummary {
    inner: RunSummary,
}

#[pymethods]
impl PyRunSummary {
    #[getter]
    fn steps(&self) -> u64 {
        self.inner.steps
    }

    #[getter]
    fn interventions(&self) -> u64 {
        self.inner.interventions
    }

    #[getter]
    fn intervention_fraction(&self) -> f64 {
        self.inner.intervention_fraction()
    }

    #[getter]
    fn final_reading(&self) -> PyCoherenceReading {
        PyCoherenceReading {
            inner: self.inner.final_reading,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RunSummary(steps={}, interventions={}, final_ratio={:.4})",
            self.inner.steps, self.inner.interventions, self.inner.final_reading.ratio
        )
    }
}

// ─── PyPhaseGovernor ────────────────────────────────────────────────

/// Stateless A-Law governor.
#[pyclass(name = "PhaseGovernor")]
struct PyPhaseGovernor {
    inner: PhaseGovernor,
}

#[pymethods]
impl PyPhaseGovernor {
    #[new]
    #[pyo3(signature = (threshold = 0.59, base_strength = 0.65, backend = "reference"))]
    fn new(threshold: f64, base_strength: f64, backend: &str) -> PyResult<Self> {
        let backend = select(parse_mode(backend)?).map_err(to_py_err)?;
        let inner = PhaseGovernor::new(
            GovernorConfig {
                threshold,
                base_strength,
            },
            backend,
        )
        .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Returns `(active, correction)`.
    fn intervene(&self, phases: Vec<f64>, ratio: f64) -> (bool, Vec<f64>) {
        let decision = self.inner.intervene(&phases, ratio);
        (decision.active, decision.correction)
    }

    fn adaptive_gain(&self, ratio: f64) -> f64 {
        self.inner.adaptive_gain(ratio)
    }
}

// ─── PySimulation ───────────────────────────────────────────────────

/// One ensemble (governed or free-running) bound to an integrator.
#[pyclass(name = "Simulation")]
struct PySimulation {
    ensemble: OscillatorEnsemble,
    integrator: Integrator,
    governed: bool,
}

#[pymethods]
impl PySimulation {
    #[new]
    #[pyo3(signature = (config, governed = true))]
    fn new(config: &PySimulationConfig, governed: bool) -> PyResult<Self> {
        let pair = EnsemblePair::seeded(&config.inner).map_err(to_py_err)?;
        let ensemble = if governed {
            pair.governed
        } else {
            pair.ungoverned
        };
        let integrator = Integrator::from_config(&config.inner).map_err(to_py_err)?;
        Ok(Self {
            ensemble,
            integrator,
            governed,
        })
    }

    fn step(&mut self) -> PyStepReport {
        PyStepReport {
            inner: self.integrator.step(&mut self.ensemble, self.governed),
        }
    }

    /// Advance `n_steps` steps with the GIL released.
    fn run(&mut self, py: Python<'_>, n_steps: u64) -> PyRunSummary {
        let Self {
            ensemble,
            integrator,
            governed,
        } = self;
        let governed = *governed;
        let inner = py.allow_threads(|| integrator.run(ensemble, governed, n_steps));
        PyRunSummary { inner }
    }

    fn coherence(&self) -> PyCoherenceReading {
        PyCoherenceReading {
            inner: self.integrator.metric().compute_for(&self.ensemble),
        }
    }

    #[getter]
    fn phases(&self) -> Vec<f64> {
        self.ensemble.phases().to_vec()
    }

    #[getter]
    fn natural_frequencies(&self) -> Vec<f64> {
        self.ensemble.natural_frequencies().to_vec()
    }

    #[getter]
    fn step_count(&self) -> u64 {
        self.integrator.step_count()
    }

    #[getter]
    fn backend(&self) -> &'static str {
        self.integrator.backend_name()
    }
}

// ─── Free functions ─────────────────────────────────────────────────

/// Coherence reading of an arbitrary phase vector.
#[pyfunction]
#[pyo3(signature = (phases, coupling_strength, frequency_spread, noise_floor = 0.15))]
fn coherence(
    phases: Vec<f64>,
    coupling_strength: f64,
    frequency_spread: f64,
    noise_floor: f64,
) -> PyResult<PyCoherenceReading> {
    if phases.is_empty() {
        return Err(PyValueError::new_err("phases must be non-empty"));
    }
    let backend = select(BackendMode::Reference).map_err(to_py_err)?;
    let metric = CoherenceMetric::new(noise_floor, Arc::clone(&backend));
    Ok(PyCoherenceReading {
        inner: metric.compute(&phases, coupling_strength, frequency_spread),
    })
}

/// Whether the parallel backend is compiled into this build.
#[pyfunction]
fn fast_available() -> bool {
    fast_capability().is_available()
}

/// Timed governed run. Returns a dict of throughput and outcome figures.
#[pyfunction]
fn run_benchmark(py: Python<'_>, config: &PySimulationConfig) -> PyResult<PyObject> {
    let cfg = config.inner.clone();
    let report = py
        .allow_threads(|| alaw_sim::run_benchmark(&cfg))
        .map_err(to_py_err)?;
    let dict = PyDict::new(py);
    dict.set_item("n", report.n)?;
    dict.set_item("steps", report.steps)?;
    dict.set_item("backend", report.backend.as_str())?;
    dict.set_item("elapsed_s", report.elapsed_s)?;
    dict.set_item("steps_per_sec", report.steps_per_sec())?;
    dict.set_item("mega_updates_per_sec", report.mega_updates_per_sec())?;
    dict.set_item("intervention_fraction", report.intervention_fraction())?;
    dict.set_item("final_ratio", report.summary.final_reading.ratio)?;
    dict.set_item("final_r", report.summary.final_reading.order_magnitude)?;
    Ok(dict.into_any().unbind())
}

// ─── Module Registration ────────────────────────────────────────────

/// A-Law kernel: Rust-accelerated Kuramoto coherence simulation.
#[pymodule]
fn alaw_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimulationConfig>()?;
    m.add_class::<PyCoherenceReading>()?;
    m.add_class::<PyStepReport>()?;
    m.add_class::<PyRunSummary>()?;
    m.add_class::<PyPhaseGovernor>()?;
    m.add_class::<PySimulation>()?;
    m.add_function(wrap_pyfunction!(coherence, m)?)?;
    m.add_function(wrap_pyfunction!(fast_available, m)?)?;
    m.add_function(wrap_pyfunction!(run_benchmark, m)?)?;
    Ok(())
}
