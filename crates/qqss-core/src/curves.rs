// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — IS and LM Curves
// ─────────────────────────────────────────────────────────────────────
//! IS and LM schedules in `(Y, r)` space, sampled on a grid around the
//! equilibrium for whatever renders them.
//!
//!   IS: r = (A − (1 − c)·Y) / b
//!   LM: r = (k·Y − M/P) / h

use serde::{Deserialize, Serialize};

use qqss_types::{EquilibriumPoint, PolicyVector, QqssError, QqssResult, StructuralParameters};

use crate::solver::{autonomous_demand, solve_equilibrium};

/// Interest rate on the IS curve at output `y`.
pub fn is_rate(y: f64, policy: &PolicyVector, params: &StructuralParameters) -> f64 {
    (autonomous_demand(policy, params) - (1.0 - params.c) * y) / params.b
}

/// Interest rate on the LM curve at output `y`.
pub fn lm_rate(y: f64, policy: &PolicyVector, params: &StructuralParameters) -> f64 {
    (params.k * y - policy.real_money()) / params.h
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub y: f64,
    pub r_is: f64,
    pub r_lm: f64,
}

/// Both curves sampled over a common output grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub equilibrium: EquilibriumPoint,
    pub points: Vec<CurvePoint>,
}

impl CurveGrid {
    pub const DEFAULT_POINTS: usize = 200;

    /// Sample `n` points over `Y ∈ [max(1e-3, 0.5·Y*), 1.5·Y*]`.
    ///
    /// Fails with `Numerical` when the equilibrium itself is non-finite,
    /// and with `Config` when fewer than two points are requested.
    pub fn around(
        policy: &PolicyVector,
        params: &StructuralParameters,
        n: usize,
    ) -> QqssResult<Self> {
        if n < 2 {
            return Err(QqssError::Config(format!(
                "curve grid needs at least 2 points, got {n}"
            )));
        }
        let equilibrium = solve_equilibrium(policy, params).check_finite()?;

        let y_min = (0.5 * equilibrium.y).max(1e-3);
        let y_max = 1.5 * equilibrium.y;
        let dy = (y_max - y_min) / (n - 1) as f64;

        let points = (0..n)
            .map(|i| {
                let y = y_min + dy * i as f64;
                CurvePoint {
                    y,
                    r_is: is_rate(y, policy, params),
                    r_lm: lm_rate(y, policy, params),
                }
            })
            .collect();

        Ok(Self {
            equilibrium,
            points,
        })
    }
}
