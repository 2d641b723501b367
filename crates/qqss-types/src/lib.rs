// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Value types, configuration records, and error hierarchy shared by
//! the QQSS tension state machine and the IS-LM equilibrium solver.

pub mod config;
pub mod error;
pub mod state;

pub use config::{SimulationConfig, StructuralParameters, TensionConfig};
pub use error::{QqssError, QqssResult};
pub use state::{EquilibriumPoint, PolicyVector, TensionState, CHANNEL_NAMES, N_CHANNELS};
