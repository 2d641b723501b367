// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Four-Channel Tension State Machine
// ─────────────────────────────────────────────────────────────────────
//! Saturating update for the tension vector z:
//!
//!   z(t+1) = m·z(t) + (1 − m)·tanh(W·z(t) + g_s·s(t)·w)
//!
//! where W is the interference matrix, w the fixed shock weights,
//! g_s the shock gain and m the memory. With m ∈ [0, 1] every channel
//! satisfies |z_i(t+1)| ≤ max(|z_i(t)|, 1), so a run started at zero
//! stays inside the unit box however large the shocks get.
//!
//! Per tick, `step` must be called before `effective_policy`; the
//! adjustment always reflects the most recent step.

use qqss_types::{PolicyVector, QqssResult, TensionConfig, TensionState, N_CHANNELS};

use crate::params::{
    build_interference_matrix, mat_vec, ChannelMatrix, POLICY_COUPLING, SHOCK_WEIGHTS,
};

/// QQSS four-channel tension state machine.
///
/// Owns its tension vector exclusively. Mutation goes through `&mut self`,
/// so concurrent steps on one instance are rejected at compile time;
/// independent runs use independent machines.
#[derive(Debug, Clone)]
pub struct TensionStateMachine {
    config: TensionConfig,
    interference: ChannelMatrix,
    z: [f64; N_CHANNELS],
    step_count: u64,
}

impl Default for TensionStateMachine {
    fn default() -> Self {
        Self::new(TensionConfig::default())
    }
}

impl TensionStateMachine {
    /// Create a machine at zero tension. The interference matrix is built
    /// here once and never rebuilt.
    pub fn new(config: TensionConfig) -> Self {
        Self {
            interference: build_interference_matrix(config.interference_gain),
            config,
            z: [0.0; N_CHANNELS],
            step_count: 0,
        }
    }

    /// Create a machine starting from an explicit tension state.
    pub fn with_state(config: TensionConfig, z0: TensionState) -> Self {
        let mut machine = Self::new(config);
        machine.z = z0.0;
        machine
    }

    pub fn config(&self) -> &TensionConfig {
        &self.config
    }

    pub fn interference_matrix(&self) -> &ChannelMatrix {
        &self.interference
    }

    /// Copy of the current tension vector.
    pub fn state(&self) -> TensionState {
        TensionState(self.z)
    }

    /// Number of `step` calls since construction or the last reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Reset tension to zero, or to a copy of `z0`.
    ///
    /// `z0` must have exactly four components; otherwise the state is left
    /// untouched and `BadVectorShape` is returned.
    pub fn reset(&mut self, z0: Option<&[f64]>) -> QqssResult<()> {
        let next = match z0 {
            Some(v) => match TensionState::from_slice(v) {
                Ok(z) => z,
                Err(e) => {
                    log::error!("tension reset rejected: {e}");
                    return Err(e);
                }
            },
            None => TensionState::ZERO,
        };
        self.z = next.0;
        self.step_count = 0;
        log::info!("tension state reset: {next}");
        Ok(())
    }

    /// Project a scalar shock onto the four channels.
    #[inline]
    fn shock_to_channels(&self, shock: f64) -> [f64; N_CHANNELS] {
        let scale = self.config.shock_gain * shock;
        SHOCK_WEIGHTS.map(|w| scale * w)
    }

    /// Advance one tick under `shock` and return the new tension state.
    pub fn step(&mut self, shock: f64) -> TensionState {
        let shock_vec = self.shock_to_channels(shock);
        let mixed = mat_vec(&self.interference, &self.z);

        let m = self.config.memory;
        for i in 0..N_CHANNELS {
            let nonlinear = (mixed[i] + shock_vec[i]).tanh();
            self.z[i] = m * self.z[i] + (1.0 - m) * nonlinear;
        }
        self.step_count += 1;

        log::trace!(
            "tension step {}: shock={shock:+.4}, z={:?}",
            self.step_count,
            self.z
        );
        TensionState(self.z)
    }

    /// Additive adjustment `policy_gain · C · z` in `(G, T, M, P)` order.
    pub fn policy_adjustment(&self) -> [f64; 4] {
        let gain = self.config.policy_gain;
        mat_vec(&POLICY_COUPLING, &self.z).map(|d| gain * d)
    }

    /// Translate nominal policy into effective policy under the current
    /// tension. Reads state only.
    pub fn effective_policy(&self, nominal: &PolicyVector) -> PolicyVector {
        let adj = self.policy_adjustment();
        PolicyVector {
            g: nominal.g + adj[0],
            t: nominal.t + adj[1],
            m: nominal.m + adj[2],
            p: nominal.p + adj[3],
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_config() -> impl Strategy<Value = TensionConfig> {
        (0.0f64..=1.0, 0.0f64..10.0, -1.0f64..1.0, -5.0f64..5.0).prop_map(
            |(memory, shock_gain, interference_gain, policy_gain)| TensionConfig {
                memory,
                shock_gain,
                interference_gain,
                policy_gain,
            },
        )
    }

    fn arb_shocks() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0e3f64..1.0e3, 1..200)
    }

    proptest! {
        #[test]
        fn tension_stays_in_unit_box(config in arb_config(), shocks in arb_shocks()) {
            let mut machine = TensionStateMachine::new(config);
            for s in shocks {
                let z = machine.step(s);
                // tanh rounds to exactly ±1.0 for large arguments.
                prop_assert!(z.max_abs() <= 1.0 + 1e-12, "z={:?}", z);
            }
        }

        #[test]
        fn step_never_exceeds_previous_or_one(
            config in arb_config(),
            z0 in prop::array::uniform4(-5.0f64..5.0),
            shock in -1.0e3f64..1.0e3,
        ) {
            let mut machine = TensionStateMachine::with_state(config, TensionState::new(z0));
            let z1 = machine.step(shock);
            for i in 0..N_CHANNELS {
                let bound = z0[i].abs().max(1.0);
                prop_assert!(z1[i].abs() <= bound + 1e-12, "channel {}: {} > {}", i, z1[i], bound);
            }
        }

        #[test]
        fn identical_inputs_identical_trajectories(config in arb_config(), shocks in arb_shocks()) {
            let mut a = TensionStateMachine::new(config);
            let mut b = TensionStateMachine::new(config);
            for s in shocks {
                prop_assert_eq!(a.step(s), b.step(s));
            }
        }
    }
}
