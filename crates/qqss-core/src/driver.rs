// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Simulation Driver
// ─────────────────────────────────────────────────────────────────────
//! Threads a shock sequence through the tension machine and a solver:
//!
//!   shock → step → effective_policy → solve → record
//!
//! once per tick, in that order. Length preconditions are checked before
//! the machine is touched. Non-finite equilibria are passed through as-is
//! and flagged on the record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use qqss_dynamics::TensionStateMachine;
use qqss_types::{
    EquilibriumPoint, PolicyVector, QqssError, QqssResult, StructuralParameters, TensionConfig,
    TensionState,
};

use crate::sink::{MemorySink, TrajectorySink};
use crate::solver::{AnalyticSolver, EquilibriumSolver};

/// Everything produced at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub t: usize,
    pub shock: f64,
    /// Tension after this tick's step.
    pub tension: TensionState,
    pub nominal_policy: PolicyVector,
    pub effective_policy: PolicyVector,
    pub equilibrium: EquilibriumPoint,
    /// False when `equilibrium` holds NaN or ±Inf.
    pub finite: bool,
}

/// Range and validity summary over a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub steps: usize,
    pub non_finite_ticks: usize,
    /// (min, max) of Y over finite ticks.
    pub output_range: Option<(f64, f64)>,
    /// (min, max) of r over finite ticks.
    pub rate_range: Option<(f64, f64)>,
    pub terminal_tension: TensionState,
}

/// Ordered tick records from one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub ticks: Vec<TickRecord>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn tensions(&self) -> impl Iterator<Item = TensionState> + '_ {
        self.ticks.iter().map(|tick| tick.tension)
    }

    pub fn equilibria(&self) -> impl Iterator<Item = EquilibriumPoint> + '_ {
        self.ticks.iter().map(|tick| tick.equilibrium)
    }

    /// Ticks whose equilibrium is non-finite.
    pub fn invalid_ticks(&self) -> impl Iterator<Item = &TickRecord> {
        self.ticks.iter().filter(|tick| !tick.finite)
    }

    pub fn summary(&self) -> TrajectorySummary {
        let finite: Vec<EquilibriumPoint> = self.equilibria().filter(|e| e.is_finite()).collect();
        let range = |f: fn(&EquilibriumPoint) -> f64| {
            if finite.is_empty() {
                return None;
            }
            let lo = finite.iter().map(f).fold(f64::INFINITY, f64::min);
            let hi = finite.iter().map(f).fold(f64::NEG_INFINITY, f64::max);
            Some((lo, hi))
        };
        TrajectorySummary {
            steps: self.ticks.len(),
            non_finite_ticks: self.ticks.len() - finite.len(),
            output_range: range(|e| e.y),
            rate_range: range(|e| e.r),
            terminal_tension: self
                .ticks
                .last()
                .map(|tick| tick.tension)
                .unwrap_or_default(),
        }
    }
}

impl From<Vec<TickRecord>> for Trajectory {
    fn from(ticks: Vec<TickRecord>) -> Self {
        Self { ticks }
    }
}

/// Sequential shock-to-equilibrium driver.
///
/// Holds the structural parameters and the solver backend, both shared
/// read-only. Tension state lives in the machine passed to each run, so
/// one driver can serve any number of independent runs.
pub struct SimulationDriver {
    params: StructuralParameters,
    solver: Arc<dyn EquilibriumSolver>,
}

impl SimulationDriver {
    pub fn new(params: StructuralParameters, solver: Arc<dyn EquilibriumSolver>) -> Self {
        Self { params, solver }
    }

    /// Driver backed by the closed-form solver.
    pub fn analytic(params: StructuralParameters) -> Self {
        Self::new(params, Arc::new(AnalyticSolver))
    }

    pub fn params(&self) -> &StructuralParameters {
        &self.params
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Run from a fresh zero-tension machine built from `tension`.
    pub fn run(
        &self,
        policies: &[PolicyVector],
        shocks: &[f64],
        tension: &TensionConfig,
    ) -> QqssResult<Trajectory> {
        let mut machine = TensionStateMachine::new(*tension);
        self.run_machine(&mut machine, policies, shocks)
    }

    /// Run against a caller-owned machine, continuing from its current state.
    pub fn run_machine(
        &self,
        machine: &mut TensionStateMachine,
        policies: &[PolicyVector],
        shocks: &[f64],
    ) -> QqssResult<Trajectory> {
        let mut sink = MemorySink::with_capacity(shocks.len());
        self.run_into(machine, policies, shocks, &mut sink)?;
        Ok(Trajectory::from(sink.into_records()))
    }

    /// Run and stream every tick into `sink`. Returns the tick count.
    ///
    /// A length mismatch is rejected before the machine is stepped. A sink
    /// failure stops the run at that tick; earlier steps stay applied.
    pub fn run_into(
        &self,
        machine: &mut TensionStateMachine,
        policies: &[PolicyVector],
        shocks: &[f64],
        sink: &mut dyn TrajectorySink,
    ) -> QqssResult<usize> {
        if policies.len() != shocks.len() {
            log::error!(
                "run rejected: {} policy vectors vs {} shocks",
                policies.len(),
                shocks.len()
            );
            return Err(QqssError::LengthMismatch {
                policies: policies.len(),
                shocks: shocks.len(),
            });
        }

        let mut non_finite = 0usize;
        for (t, (nominal, &shock)) in policies.iter().zip(shocks).enumerate() {
            let tension = machine.step(shock);
            let effective_policy = machine.effective_policy(nominal);
            let equilibrium = self.solver.solve(&effective_policy, &self.params);
            let finite = equilibrium.is_finite();

            if finite {
                log::debug!(
                    "t={t:02} shock={shock:+6.2} z_sum={:+.3} G_eff={:7.2} Y={:7.2} r={:6.2}",
                    tension.sum(),
                    effective_policy.g,
                    equilibrium.y,
                    equilibrium.r
                );
            } else {
                non_finite += 1;
                log::warn!(
                    "t={t:02} non-finite equilibrium from {}: Y={}, r={}",
                    self.solver.name(),
                    equilibrium.y,
                    equilibrium.r
                );
            }

            sink.record(&TickRecord {
                t,
                shock,
                tension,
                nominal_policy: *nominal,
                effective_policy,
                equilibrium,
                finite,
            })?;
        }
        sink.finish()?;

        log::info!(
            "run complete: {} ticks via {}, {non_finite} non-finite",
            shocks.len(),
            self.solver.name()
        );
        Ok(shocks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{constant_policy, ShockSchedule};
    use crate::solver::{solve_equilibrium, LinearApproximator};

    fn driver() -> SimulationDriver {
        SimulationDriver::analytic(StructuralParameters::default())
    }

    #[test]
    fn test_run_length_and_order() {
        let shocks = ShockSchedule::reference();
        let policies = constant_policy(PolicyVector::default(), shocks.len());
        let traj = driver()
            .run(&policies, &shocks, &TensionConfig::default())
            .unwrap();
        assert_eq!(traj.len(), 20);
        for (i, tick) in traj.ticks.iter().enumerate() {
            assert_eq!(tick.t, i);
            assert_eq!(tick.shock, shocks[i]);
        }
    }

    #[test]
    fn test_quiet_ticks_reproduce_nominal_equilibrium() {
        let shocks = ShockSchedule::reference();
        let nominal = PolicyVector::default();
        let policies = constant_policy(nominal, shocks.len());
        let params = StructuralParameters::default();
        let traj = SimulationDriver::analytic(params)
            .run(&policies, &shocks, &TensionConfig::default())
            .unwrap();
        let baseline = solve_equilibrium(&nominal, &params);
        for tick in &traj.ticks[..8] {
            assert!(tick.tension.is_zero());
            assert_eq!(tick.effective_policy, nominal);
            assert_eq!(tick.equilibrium, baseline);
        }
        assert_ne!(traj.ticks[8].equilibrium, baseline);
    }

    #[test]
    fn test_length_mismatch_leaves_machine_untouched() {
        let mut machine = TensionStateMachine::default();
        machine.step(2.0);
        let before = machine.state();

        let policies = constant_policy(PolicyVector::default(), 3);
        let err = driver()
            .run_machine(&mut machine, &policies, &[1.0, 1.0])
            .unwrap_err();
        assert!(matches!(
            err,
            QqssError::LengthMismatch {
                policies: 3,
                shocks: 2
            }
        ));
        assert_eq!(machine.state(), before);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_rerun_from_fresh_machine_is_identical() {
        let shocks: Vec<f64> = (0..50).map(|i| ((i as f64) * 0.7).sin() * 4.0).collect();
        let policies = constant_policy(PolicyVector::default(), shocks.len());
        let d = driver();
        let a = d.run(&policies, &shocks, &TensionConfig::default()).unwrap();
        let b = d.run(&policies, &shocks, &TensionConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_machine_continues_state() {
        let shocks = vec![3.0; 5];
        let policies = constant_policy(PolicyVector::default(), 5);
        let d = driver();

        let mut machine = TensionStateMachine::default();
        d.run_machine(&mut machine, &policies, &shocks).unwrap();
        let second = d.run_machine(&mut machine, &policies, &shocks).unwrap();

        let fresh = d
            .run(&policies, &shocks, &TensionConfig::default())
            .unwrap();
        assert_ne!(second.ticks[0].tension, fresh.ticks[0].tension);
        assert_eq!(machine.step_count(), 10);
    }

    #[test]
    fn test_empty_run() {
        let traj = driver().run(&[], &[], &TensionConfig::default()).unwrap();
        assert!(traj.is_empty());
        let summary = traj.summary();
        assert_eq!(summary.steps, 0);
        assert!(summary.output_range.is_none());
        assert!(summary.terminal_tension.is_zero());
    }

    #[test]
    fn test_degenerate_params_flagged_not_fatal() {
        let params = StructuralParameters {
            c: 1.0,
            ..Default::default()
        };
        let policies = constant_policy(PolicyVector::default(), 4);
        let traj = SimulationDriver::analytic(params)
            .run(&policies, &[0.0, 1.0, 0.0, -1.0], &TensionConfig::default())
            .unwrap();
        assert_eq!(traj.invalid_ticks().count(), 4);
        let summary = traj.summary();
        assert_eq!(summary.non_finite_ticks, 4);
        assert!(summary.output_range.is_none());
        assert!(summary.rate_range.is_none());
    }

    #[test]
    fn test_summary_ranges() {
        let shocks = ShockSchedule::reference();
        let policies = constant_policy(PolicyVector::default(), shocks.len());
        let traj = driver()
            .run(&policies, &shocks, &TensionConfig::default())
            .unwrap();
        let summary = traj.summary();
        let (y_lo, y_hi) = summary.output_range.unwrap();
        assert!(y_lo < y_hi);
        assert!(traj.equilibria().all(|e| e.y >= y_lo && e.y <= y_hi));
        assert_eq!(summary.non_finite_ticks, 0);
        assert_eq!(summary.terminal_tension, traj.ticks[19].tension);
    }

    #[test]
    fn test_explicit_learned_backend() {
        let approx = LinearApproximator::new([[0.0; 4], [0.0; 4]], [100.0, 5.0]);
        let d = SimulationDriver::new(StructuralParameters::default(), Arc::new(approx));
        assert_eq!(d.solver_name(), "linear");
        let traj = d
            .run(
                &constant_policy(PolicyVector::default(), 3),
                &[1.0, 2.0, 3.0],
                &TensionConfig::default(),
            )
            .unwrap();
        assert!(traj
            .equilibria()
            .all(|e| e == EquilibriumPoint::new(100.0, 5.0)));
    }
}
