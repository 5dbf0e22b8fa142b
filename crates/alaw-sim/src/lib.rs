// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Simulation Runner
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Drives the A-Law kernel over whole runs.
//!
//! Two modes:
//! - `run_comparison`: free-running vs governed ensemble from one seeded
//!   draw, advanced on two threads, sampled into frames.
//! - `run_benchmark`: governed ensemble only, timed for throughput.

pub mod benchmark;
pub mod comparison;

pub use benchmark::run_benchmark;
pub use comparison::run_comparison;
