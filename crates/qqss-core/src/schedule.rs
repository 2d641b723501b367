// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Shock and Policy Schedules
// ─────────────────────────────────────────────────────────────────────

use qqss_types::PolicyVector;

/// Builders for common shock sequences.
pub struct ShockSchedule;

impl ShockSchedule {
    /// `n` quiet ticks.
    pub fn calm(n: usize) -> Vec<f64> {
        vec![0.0; n]
    }

    /// Quiet run with a negative shock of `magnitude` at tick `at` and a
    /// positive rebound of the same size at `at + 1`. Ticks past the end
    /// are dropped.
    pub fn stress_test(n: usize, at: usize, magnitude: f64) -> Vec<f64> {
        let mut shocks = vec![0.0; n];
        if let Some(s) = shocks.get_mut(at) {
            *s = -magnitude;
        }
        if let Some(s) = at.checked_add(1).and_then(|i| shocks.get_mut(i)) {
            *s = magnitude;
        }
        shocks
    }

    /// The reference scenario: 20 ticks, ±10 at t = 8 / 9.
    pub fn reference() -> Vec<f64> {
        Self::stress_test(20, 8, 10.0)
    }
}

/// Hold one nominal policy for `n` ticks.
pub fn constant_policy(policy: PolicyVector, n: usize) -> Vec<PolicyVector> {
    vec![policy; n]
}
