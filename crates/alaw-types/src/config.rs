// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AlawError, AlawResult};

/// Which execution path the integrator should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Fast path when this build provides it, reference path otherwise.
    #[default]
    Auto,
    /// Parallel path; an error if the build lacks it.
    Fast,
    /// Sequential reference path. Always available.
    Reference,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Auto => "auto",
            BackendMode::Fast => "fast",
            BackendMode::Reference => "reference",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendMode {
    type Err = AlawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendMode::Auto),
            "fast" | "parallel" => Ok(BackendMode::Fast),
            "reference" | "ref" => Ok(BackendMode::Reference),
            other => Err(AlawError::Config(format!(
                "unknown backend mode '{other}' (expected auto, fast or reference)"
            ))),
        }
    }
}

/// Policy parameters of the A-Law governor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// The governor stands down once the coherence ratio reaches this.
    /// Default: 0.59.
    pub threshold: f64,

    /// Gain applied at the threshold; grows linearly below it.
    /// Default: 0.65.
    pub base_strength: f64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.59,
            base_strength: 0.65,
        }
    }
}

impl GovernorConfig {
    pub fn validate(&self) -> AlawResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AlawError::Config(format!(
                "governor threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        if !self.base_strength.is_finite() || self.base_strength < 0.0 {
            return Err(AlawError::Config(format!(
                "governor base_strength must be finite and >= 0, got {}",
                self.base_strength
            )));
        }
        Ok(())
    }
}

/// Full configuration of a simulation run.
///
/// Every physical constant and policy knob lives here so independent
/// configurations can coexist in one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of oscillators per ensemble.
    /// Default: 120.
    pub n: usize,

    /// Number of integration steps.
    /// Default: 2500.
    pub steps: u64,

    /// Seed for the phase and natural-frequency draws.
    /// Default: 123.
    pub seed: u64,

    /// Fixed Euler step.
    /// Default: 0.02.
    pub dt: f64,

    /// Standard deviation of the natural-frequency distribution.
    /// Default: 1.15.
    pub noise_level: f64,

    /// Coupling strength of the governed ensemble.
    /// Default: 1.80.
    pub coupling_governed: f64,

    /// Coupling strength of the free-running ensemble.
    /// Default: 1.05.
    pub coupling_ungoverned: f64,

    /// Additive floor on the noise term D of the coherence ratio.
    /// Default: 0.15.
    pub noise_floor: f64,

    /// A-Law governor policy.
    pub governor: GovernorConfig,

    /// Ratio above which the free-running ensemble is flagged in frames.
    /// Default: 0.7.
    pub alert_ratio: f64,

    /// Sample a comparison frame every this many steps.
    /// Default: 50.
    pub report_every: u64,

    /// Execution path selection.
    pub mode: BackendMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n: 120,
            steps: 2500,
            seed: 123,
            dt: 0.02,
            noise_level: 1.15,
            coupling_governed: 1.80,
            coupling_ungoverned: 1.05,
            noise_floor: 0.15,
            governor: GovernorConfig::default(),
            alert_ratio: 0.7,
            report_every: 50,
            mode: BackendMode::Auto,
        }
    }
}

impl SimulationConfig {
    /// Defaults of the throughput benchmark: 100 000 oscillators, 2000 steps.
    pub fn benchmark() -> Self {
        Self {
            n: 100_000,
            steps: 2000,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> AlawResult<()> {
        if self.n < 1 {
            return Err(AlawError::Config(format!(
                "n must be >= 1, got {}",
                self.n
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(AlawError::Config(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(AlawError::Config(format!(
                "noise_level must be finite and >= 0, got {}",
                self.noise_level
            )));
        }
        for (name, k) in [
            ("coupling_governed", self.coupling_governed),
            ("coupling_ungoverned", self.coupling_ungoverned),
        ] {
            if !k.is_finite() || k < 0.0 {
                return Err(AlawError::Config(format!(
                    "{name} must be finite and >= 0, got {k}"
                )));
            }
        }
        if !self.noise_floor.is_finite() || self.noise_floor < 0.0 {
            return Err(AlawError::Config(format!(
                "noise_floor must be finite and >= 0, got {}",
                self.noise_floor
            )));
        }
        if !(0.0..=1.0).contains(&self.alert_ratio) {
            return Err(AlawError::Config(format!(
                "alert_ratio must be in [0, 1], got {}",
                self.alert_ratio
            )));
        }
        if self.report_every == 0 {
            return Err(AlawError::Config(
                "report_every must be > 0".to_string(),
            ));
        }
        self.governor.validate()
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> AlawResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AlawError::Config(format!("JSON parse error: {e}")))
    }

    pub fn to_json(&self) -> AlawResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AlawError::Config(format!("JSON encode error: {e}")))
    }
}
