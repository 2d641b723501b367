// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{QqssError, QqssResult};
use crate::state::PolicyVector;

/// Gains controlling the QQSS tension dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensionConfig {
    /// State persistence in [0, 1]. Closer to 1 means more inertia.
    /// Default: 0.8.
    pub memory: f64,

    /// Scale applied to each incoming shock. Must be >= 0.
    /// Default: 0.3.
    pub shock_gain: f64,

    /// Off-diagonal coupling between channels. May be negative.
    /// Default: 0.2.
    pub interference_gain: f64,

    /// Uniform scale on the tension-to-policy adjustment.
    /// Default: 1.0.
    pub policy_gain: f64,
}

impl Default for TensionConfig {
    fn default() -> Self {
        Self {
            memory: 0.8,
            shock_gain: 0.3,
            interference_gain: 0.2,
            policy_gain: 1.0,
        }
    }
}

impl TensionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> QqssResult<()> {
        for (name, v) in [
            ("memory", self.memory),
            ("shock_gain", self.shock_gain),
            ("interference_gain", self.interference_gain),
            ("policy_gain", self.policy_gain),
        ] {
            if !v.is_finite() {
                return Err(QqssError::Config(format!("{name} must be finite, got {v}")));
            }
        }
        if !(0.0..=1.0).contains(&self.memory) {
            return Err(QqssError::Config(format!(
                "memory must be in [0, 1], got {}",
                self.memory
            )));
        }
        if self.shock_gain < 0.0 {
            return Err(QqssError::Config(format!(
                "shock_gain must be >= 0, got {}",
                self.shock_gain
            )));
        }
        Ok(())
    }
}

/// IS-LM structural constants.
///
/// IS:  Y = C0 + c·(Y − T) + I0 − b·r + G
/// LM:  M/P = k·Y − h·r
///
/// Nothing is checked on construction. Out-of-domain values reach the
/// solver as-is and come back as non-finite or meaningless equilibria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralParameters {
    /// Autonomous consumption.
    pub c0: f64,
    /// Autonomous investment.
    pub i0: f64,
    /// Marginal propensity to consume, 0 < c < 1.
    pub c: f64,
    /// Investment sensitivity to the interest rate, > 0.
    pub b: f64,
    /// Money demand sensitivity to income, > 0.
    pub k: f64,
    /// Money demand sensitivity to the interest rate, > 0.
    pub h: f64,
}

impl Default for StructuralParameters {
    fn default() -> Self {
        Self {
            c0: 50.0,
            i0: 40.0,
            c: 0.6,
            b: 2.0,
            k: 0.5,
            h: 1.0,
        }
    }
}

impl StructuralParameters {
    pub fn new(c0: f64, i0: f64, c: f64, b: f64, k: f64, h: f64) -> Self {
        Self { c0, i0, c, b, k, h }
    }

    /// Check the textbook domain. Opt-in: solvers never call this.
    pub fn validate(&self) -> QqssResult<()> {
        if self.c.is_nan() || self.c <= 0.0 || self.c >= 1.0 {
            return Err(QqssError::Config(format!(
                "marginal propensity c must be in (0, 1), got {}",
                self.c
            )));
        }
        for (name, v) in [("b", self.b), ("k", self.k), ("h", self.h)] {
            if v.is_nan() || v <= 0.0 {
                return Err(QqssError::Config(format!("{name} must be > 0, got {v}")));
            }
        }
        if !self.c0.is_finite() || !self.i0.is_finite() {
            return Err(QqssError::Config(
                "autonomous terms c0 and i0 must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// A complete shock scenario as loaded from JSON.
///
/// `shocks` is optional; when absent the runner builds a schedule of
/// `steps` ticks itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub structural: StructuralParameters,
    pub tension: TensionConfig,
    /// Number of ticks. Default: 20.
    pub steps: usize,
    /// Nominal policy held constant over the run.
    pub policy: PolicyVector,
    pub shocks: Option<Vec<f64>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            structural: StructuralParameters::default(),
            tension: TensionConfig::default(),
            steps: 20,
            policy: PolicyVector::default(),
            shocks: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> QqssResult<()> {
        self.tension.validate()?;
        self.structural.validate()?;
        if self.steps < 1 {
            return Err(QqssError::Config(format!(
                "steps must be >= 1, got {}",
                self.steps
            )));
        }
        if let Some(shocks) = &self.shocks {
            if shocks.len() != self.steps {
                return Err(QqssError::Config(format!(
                    "shocks has {} entries but steps = {}",
                    shocks.len(),
                    self.steps
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> QqssResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| QqssError::Config(format!("JSON parse error: {e}")))
    }
}
