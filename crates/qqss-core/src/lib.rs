// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! IS-LM equilibrium solvers and the simulation driver that couples
//! them to the QQSS tension machine.
//!
//! # Invariants
//!
//! 1. **Step precedes translation**: within a tick the driver always
//!    calls `step(shock)` before `effective_policy`, so the policy
//!    adjustment reflects that tick's shock and no other.
//!
//! 2. **Preconditions fail before mutation**: mismatched policy/shock
//!    lengths are rejected before the machine advances a single step.
//!
//! 3. **Non-finite equilibria are surfaced, never repaired**: degenerate
//!    structural parameters (`c = 1`, `P = 0`, vanishing rate
//!    denominator) yield NaN/±Inf that the driver records verbatim and
//!    flags with `finite = false`.
//!
//! 4. **Backends are chosen, not discovered**: the driver uses exactly
//!    the solver it was built with. There is no fallback path.

pub mod curves;
pub mod driver;
pub mod schedule;
pub mod sink;
pub mod solver;

pub use curves::{is_rate, lm_rate, CurveGrid, CurvePoint};
pub use driver::{SimulationDriver, TickRecord, Trajectory, TrajectorySummary};
pub use schedule::{constant_policy, ShockSchedule};
pub use sink::{JsonLinesSink, MemorySink, SharedSink, TeeSink, TrajectorySink};
pub use solver::{
    solve_equilibrium, AnalyticSolver, EquilibriumSolver, ExternalSolver, LinearApproximator,
};
