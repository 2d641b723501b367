// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Equilibrium Solvers
// ─────────────────────────────────────────────────────────────────────
//! Equilibrium solver trait with the closed-form IS-LM solve and two
//! approximator backends.
//!
//! The analytic solver is always available. Approximators (a fitted
//! linear map, or an external model behind a callback) are opt-in and
//! are only used when the caller hands one to the driver; nothing here
//! falls back from one backend to another.

use std::fmt;

use qqss_types::{EquilibriumPoint, PolicyVector, StructuralParameters};

/// Trait for equilibrium backends: `(G, T, M, P)` → `(Y*, r*)`.
pub trait EquilibriumSolver: Send + Sync {
    fn solve(&self, policy: &PolicyVector, params: &StructuralParameters) -> EquilibriumPoint;

    /// Short backend label for logs.
    fn name(&self) -> &str;
}

/// Closed-form IS-LM equilibrium.
///
/// ```text
/// A       = C0 − c·T + I0 + G
/// denom_r = k·b/(1 − c) + h
/// r*      = (k·A/(1 − c) − M/P) / denom_r
/// Y*      = (A − b·r*) / (1 − c)
/// ```
///
/// No clamping: `c = 1`, `P = 0` or `denom_r = 0` produce NaN/±Inf,
/// detectable through [`EquilibriumPoint::is_finite`].
#[inline]
pub fn solve_equilibrium(policy: &PolicyVector, params: &StructuralParameters) -> EquilibriumPoint {
    let one_minus_c = 1.0 - params.c;
    let a = autonomous_demand(policy, params);
    let denom_r = params.k * params.b / one_minus_c + params.h;

    let r = (params.k * a / one_minus_c - policy.real_money()) / denom_r;
    let y = (a - params.b * r) / one_minus_c;
    EquilibriumPoint::new(y, r)
}

/// Autonomous demand `A = C0 − c·T + I0 + G`.
#[inline]
pub fn autonomous_demand(policy: &PolicyVector, params: &StructuralParameters) -> f64 {
    params.c0 - params.c * policy.t + params.i0 + policy.g
}

/// The closed-form solver as a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticSolver;

impl EquilibriumSolver for AnalyticSolver {
    fn solve(&self, policy: &PolicyVector, params: &StructuralParameters) -> EquilibriumPoint {
        solve_equilibrium(policy, params)
    }

    fn name(&self) -> &str {
        "analytic"
    }
}

const INPUT_NAMES: [&str; 4] = ["G", "T", "M", "P"];
const OUTPUT_NAMES: [&str; 2] = ["Y", "r"];

/// Affine approximator `[Y, r] = W·[G, T, M, P] + bias`.
///
/// Inference only. The weights come from whatever fitted them; the
/// structural parameters passed to `solve` are ignored because a fitted
/// map already bakes them in.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearApproximator {
    weights: [[f64; 4]; 2],
    bias: [f64; 2],
}

impl LinearApproximator {
    pub fn new(weights: [[f64; 4]; 2], bias: [f64; 2]) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> &[[f64; 4]; 2] {
        &self.weights
    }

    pub fn bias(&self) -> &[f64; 2] {
        &self.bias
    }
}

impl EquilibriumSolver for LinearApproximator {
    fn solve(&self, policy: &PolicyVector, _params: &StructuralParameters) -> EquilibriumPoint {
        let x = policy.to_array();
        let mut out = self.bias;
        for (o, row) in out.iter_mut().zip(self.weights.iter()) {
            *o += row.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>();
        }
        EquilibriumPoint::new(out[0], out[1])
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// One line per output, e.g. `Y ≈ +0.5000*G -0.3000*T +0.0000*M +0.0000*P  +12.0000`.
impl fmt::Display for LinearApproximator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (j, row) in self.weights.iter().enumerate() {
            if j > 0 {
                writeln!(f)?;
            }
            write!(f, "{} ≈", OUTPUT_NAMES[j])?;
            for (w, name) in row.iter().zip(INPUT_NAMES) {
                write!(f, " {w:+.4}*{name}")?;
            }
            write!(f, "  {:+.4}", self.bias[j])?;
        }
        Ok(())
    }
}

/// External solver that calls a function pointer.
///
/// Used to plug in a model that lives outside this crate (a trained
/// network behind an inference server, say) without this crate knowing
/// anything about it.
type SolveFn = Box<dyn Fn(&PolicyVector) -> EquilibriumPoint + Send + Sync>;

pub struct ExternalSolver {
    name: String,
    solve_fn: SolveFn,
}

impl ExternalSolver {
    pub fn new(
        name: impl Into<String>,
        solve_fn: impl Fn(&PolicyVector) -> EquilibriumPoint + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            solve_fn: Box::new(solve_fn),
        }
    }
}

impl EquilibriumSolver for ExternalSolver {
    fn solve(&self, policy: &PolicyVector, _params: &StructuralParameters) -> EquilibriumPoint {
        (self.solve_fn)(policy)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
