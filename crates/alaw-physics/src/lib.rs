// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Mean-field Kuramoto kernel with the A-Law governor.
//!
//! Architecture:
//!   - OscillatorEnsemble: phases + shared natural frequencies
//!   - CoherenceMetric: order parameter → coherence-to-noise ratio
//!   - PhaseGovernor: adaptive, saturating pull toward the mean phase
//!   - KernelBackend: reference (sequential) or fast (rayon) execution
//!   - Integrator: Euler step combining coupling and correction
//!
//! # Invariants
//!
//! 1. `phases.len() == natural_frequencies.len() >= 1` for every ensemble.
//! 2. Phases lie in [0, 2π) after every step.
//! 3. The governor holds no state between calls.
//! 4. Both backends run the same element-wise arithmetic; only the
//!    order of the order-parameter reduction differs.

pub mod backend;
pub mod coherence;
pub mod ensemble;
pub mod governor;
pub mod integrator;

pub use backend::{fast_capability, select, Capability, KernelBackend, ReferenceBackend};
#[cfg(feature = "parallel")]
pub use backend::ParallelBackend;
pub use coherence::{CoherenceMetric, OrderParameter};
pub use ensemble::{wrap_phase, EnsemblePair, OscillatorEnsemble};
pub use governor::PhaseGovernor;
pub use integrator::Integrator;
