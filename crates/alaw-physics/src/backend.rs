// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Kernel Execution Backends
// ─────────────────────────────────────────────────────────────────────
//! Execution paths for the three hot loops of a step:
//!
//!   1. order-parameter reduction   Σ sin θ_i, Σ cos θ_i
//!   2. governor correction         c_i = clip(a · sin(ψ − θ_i), ±L)
//!   3. Euler phase advance         θ_i ← wrap(θ_i + (ω_i + K r sin(ψ − θ_i) + c_i) dt)
//!
//! `ReferenceBackend` runs them sequentially and is the correctness
//! oracle. `ParallelBackend` (feature `parallel`) splits them across the
//! rayon pool. Loops 2 and 3 share the per-element functions below, so
//! both paths agree bit for bit there; only the summation order of loop 1
//! differs.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
use alaw_types::AlawError;
use alaw_types::{AlawResult, BackendMode};

use crate::ensemble::wrap_phase;

/// Minimum slice length handed to a single rayon task.
#[cfg(feature = "parallel")]
pub(crate) const PAR_MIN_LEN: usize = 4096;

/// Trait for kernel execution paths.
pub trait KernelBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Returns `(Σ sin θ_i, Σ cos θ_i)`.
    fn phase_sums(&self, phases: &[f64]) -> (f64, f64);

    /// Writes the saturated restoring term toward `target` into `out`.
    fn fill_correction(&self, phases: &[f64], target: f64, adapt: f64, limit: f64, out: &mut [f64]);

    /// One Euler step in place. `pull` is the mean-field coupling K·r.
    fn advance(
        &self,
        phases: &mut [f64],
        natural_frequencies: &[f64],
        pull: f64,
        target: f64,
        correction: Option<&[f64]>,
        dt: f64,
    );
}

#[inline(always)]
fn restoring(theta: f64, target: f64, adapt: f64, limit: f64) -> f64 {
    (adapt * (target - theta).sin()).clamp(-limit, limit)
}

#[inline(always)]
fn advanced(theta: f64, omega: f64, pull: f64, target: f64, correction: f64, dt: f64) -> f64 {
    let velocity = omega + pull * (target - theta).sin() + correction;
    wrap_phase(theta + velocity * dt)
}

/// Sequential reference path. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

impl KernelBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn phase_sums(&self, phases: &[f64]) -> (f64, f64) {
        phases
            .iter()
            .fold((0.0, 0.0), |(s, c), &th| (s + th.sin(), c + th.cos()))
    }

    fn fill_correction(&self, phases: &[f64], target: f64, adapt: f64, limit: f64, out: &mut [f64]) {
        for (c, &th) in out.iter_mut().zip(phases) {
            *c = restoring(th, target, adapt, limit);
        }
    }

    fn advance(
        &self,
        phases: &mut [f64],
        natural_frequencies: &[f64],
        pull: f64,
        target: f64,
        correction: Option<&[f64]>,
        dt: f64,
    ) {
        match correction {
            Some(corr) => {
                for ((th, &w), &c) in phases.iter_mut().zip(natural_frequencies).zip(corr) {
                    *th = advanced(*th, w, pull, target, c, dt);
                }
            }
            None => {
                for (th, &w) in phases.iter_mut().zip(natural_frequencies) {
                    *th = advanced(*th, w, pull, target, 0.0, dt);
                }
            }
        }
    }
}

/// Rayon-parallel path. Workers read `phases` and write disjoint slots;
/// the only combine is the final reduction of the two sums.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBackend;

#[cfg(feature = "parallel")]
impl KernelBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        "fast"
    }

    fn phase_sums(&self, phases: &[f64]) -> (f64, f64) {
        phases
            .par_iter()
            .with_min_len(PAR_MIN_LEN)
            .map(|&th| (th.sin(), th.cos()))
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1))
    }

    fn fill_correction(&self, phases: &[f64], target: f64, adapt: f64, limit: f64, out: &mut [f64]) {
        out.par_iter_mut()
            .with_min_len(PAR_MIN_LEN)
            .zip(phases.par_iter())
            .for_each(|(c, &th)| *c = restoring(th, target, adapt, limit));
    }

    fn advance(
        &self,
        phases: &mut [f64],
        natural_frequencies: &[f64],
        pull: f64,
        target: f64,
        correction: Option<&[f64]>,
        dt: f64,
    ) {
        match correction {
            Some(corr) => phases
                .par_iter_mut()
                .with_min_len(PAR_MIN_LEN)
                .zip(natural_frequencies.par_iter())
                .zip(corr.par_iter())
                .for_each(|((th, &w), &c)| *th = advanced(*th, w, pull, target, c, dt)),
            None => phases
                .par_iter_mut()
                .with_min_len(PAR_MIN_LEN)
                .zip(natural_frequencies.par_iter())
                .for_each(|(th, &w)| *th = advanced(*th, w, pull, target, 0.0, dt)),
        }
    }
}

/// Whether an execution path can run in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable { reason: &'static str },
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available)
    }
}

#[cfg(not(feature = "parallel"))]
const FAST_UNAVAILABLE: &str = "built without the `parallel` feature";

/// Capability query for the fast path.
pub fn fast_capability() -> Capability {
    #[cfg(feature = "parallel")]
    {
        Capability::Available
    }
    #[cfg(not(feature = "parallel"))]
    {
        Capability::Unavailable {
            reason: FAST_UNAVAILABLE,
        }
    }
}

#[cfg(feature = "parallel")]
fn fast_backend() -> AlawResult<Arc<dyn KernelBackend>> {
    log::info!(
        "kernel backend: fast ({} rayon threads)",
        rayon::current_num_threads()
    );
    Ok(Arc::new(ParallelBackend))
}

#[cfg(not(feature = "parallel"))]
fn fast_backend() -> AlawResult<Arc<dyn KernelBackend>> {
    Err(AlawError::CapabilityUnavailable {
        backend: "fast",
        reason: FAST_UNAVAILABLE,
    })
}

/// Resolve a backend mode to an execution path.
///
/// `Fast` fails with `CapabilityUnavailable` when the build lacks it;
/// only `Auto` falls back, and it says so in the log.
pub fn select(mode: BackendMode) -> AlawResult<Arc<dyn KernelBackend>> {
    match mode {
        BackendMode::Reference => {
            log::info!("kernel backend: reference");
            Ok(Arc::new(ReferenceBackend))
        }
        BackendMode::Fast => fast_backend(),
        BackendMode::Auto => fast_backend().or_else(|e| {
            log::warn!("kernel backend: {e}, using reference");
            Ok(Arc::new(ReferenceBackend))
        }),
    }
}
