// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! A-Law coherence kernel: the Kuramoto simulation that contrasts an
//! ungoverned oscillator ensemble with one steered by the A-Law governor.

pub mod config;
pub mod error;
pub mod report;

pub use config::{BackendMode, GovernorConfig, SimulationConfig};
pub use error::{AlawError, AlawResult};
pub use report::{
    clamp_unit, BenchmarkReport, CoherenceReading, ComparisonReport, Frame, GovernorDecision,
    RunSummary, StepReport,
};
