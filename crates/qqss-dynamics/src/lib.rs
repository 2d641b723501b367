// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Tension Dynamics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! QQSS four-channel tension dynamics: fixed shock and policy
//! projections, the interference matrix, and the saturating state
//! machine that turns a shock sequence into policy adjustments.

pub mod params;
pub mod tension;

pub use params::{
    build_interference_matrix, mat_vec, ChannelMatrix, POLICY_COUPLING, SHOCK_WEIGHTS,
};
pub use tension::TensionStateMachine;
