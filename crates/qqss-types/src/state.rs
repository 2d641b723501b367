// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — State, Policy and Equilibrium Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{QqssError, QqssResult};

/// Number of tension channels tracked by the QQSS state machine.
pub const N_CHANNELS: usize = 4;

pub const CHANNEL_NAMES: [&str; N_CHANNELS] = [
    "structural",
    "cyclical",
    "policy-operational",
    "financial-expectations",
];

/// Snapshot of the four-channel tension vector `z = (z1, z2, z3, z4)`.
///
/// Handed out by value; mutating a copy never touches the owning machine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TensionState(pub [f64; N_CHANNELS]);

impl TensionState {
    pub const ZERO: Self = Self([0.0; N_CHANNELS]);

    pub fn new(z: [f64; N_CHANNELS]) -> Self {
        Self(z)
    }

    /// Build from a slice, rejecting anything that is not exactly four long.
    pub fn from_slice(z: &[f64]) -> QqssResult<Self> {
        let arr: [f64; N_CHANNELS] = z.try_into().map_err(|_| QqssError::BadVectorShape {
            expected: N_CHANNELS,
            got: z.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_array(&self) -> &[f64; N_CHANNELS] {
        &self.0
    }

    /// Value of one channel by index (0 = structural … 3 = financial).
    /// Returns `None` for `i >= N_CHANNELS`; `z[i]` panics there instead.
    pub fn channel(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied()
    }

    /// Aggregate tension across channels.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Largest absolute channel value.
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0f64, |acc, z| acc.max(z.abs()))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&z| z == 0.0)
    }
}

/// Panics if `i >= N_CHANNELS`. Use [`TensionState::channel`] for a
/// checked lookup.
impl Index<usize> for TensionState {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

/// `structural=+0.1000 cyclical=-0.0700 …`
impl fmt::Display for TensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, z)) in CHANNEL_NAMES.iter().zip(self.0.iter()).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{name}={z:+.4}")?;
        }
        Ok(())
    }
}

impl From<[f64; N_CHANNELS]> for TensionState {
    fn from(z: [f64; N_CHANNELS]) -> Self {
        Self(z)
    }
}

/// Nominal or effective policy variables `(G, T, M, P)`.
///
/// Fields missing from a JSON object take their [`Default`] values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyVector {
    /// Government spending.
    pub g: f64,
    /// Taxation.
    pub t: f64,
    /// Money supply.
    pub m: f64,
    /// Price level.
    pub p: f64,
}

impl Default for PolicyVector {
    fn default() -> Self {
        Self {
            g: 150.0,
            t: 100.0,
            m: 1.5,
            p: 1.0,
        }
    }
}

impl PolicyVector {
    pub fn new(g: f64, t: f64, m: f64, p: f64) -> Self {
        Self { g, t, m, p }
    }

    /// Components in `(G, T, M, P)` order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.g, self.t, self.m, self.p]
    }

    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Real money balance `M / P`.
    pub fn real_money(&self) -> f64 {
        self.m / self.p
    }
}

/// Equilibrium output and interest rate `(Y*, r*)`.
///
/// Degenerate structural parameters produce NaN or ±Inf here; the
/// solver never clamps them, so callers check [`is_finite`](Self::is_finite).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumPoint {
    pub y: f64,
    pub r: f64,
}

impl EquilibriumPoint {
    pub fn new(y: f64, r: f64) -> Self {
        Self { y, r }
    }

    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.r.is_finite()
    }

    /// Return `self` if both coordinates are finite, else a `Numerical` error.
    pub fn check_finite(self) -> QqssResult<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            log::warn!("non-finite equilibrium: Y={}, r={}", self.y, self.r);
            Err(QqssError::Numerical(format!(
                "non-finite equilibrium (Y={}, r={})",
                self.y, self.r
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_ok() {
        let z = TensionState::from_slice(&[0.1, -0.2, 0.3, -0.4]).unwrap();
        assert_eq!(z.0, [0.1, -0.2, 0.3, -0.4]);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        let err = TensionState::from_slice(&[1.0, 2.0, 3.0]).unwrap_err();
        match err {
            QqssError::BadVectorShape { expected, got } => {
                assert_eq!(expected, 4);
                assert_eq!(got, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(TensionState::from_slice(&[0.0; 5]).is_err());
    }

    #[test]
    fn test_sum_and_max_abs() {
        let z = TensionState::new([0.5, -0.9, 0.1, 0.2]);
        assert!((z.sum() - (-0.1)).abs() < 1e-12);
        assert!((z.max_abs() - 0.9).abs() < 1e-12);
        assert_eq!(z.channel(1), Some(-0.9));
        assert_eq!(z.channel(4), None);
    }

    #[test]
    #[should_panic]
    fn test_index_past_last_channel_panics() {
        let z = TensionState::new([0.1, 0.2, 0.3, 0.4]);
        let _ = z[std::hint::black_box(N_CHANNELS)];
    }

    #[test]
    fn test_zero_state() {
        assert!(TensionState::ZERO.is_zero());
        assert!(TensionState::default().is_zero());
        assert!(!TensionState::new([0.0, 0.0, 1e-9, 0.0]).is_zero());
    }

    #[test]
    fn test_display_names_channels() {
        let z = TensionState::new([0.1, -0.07, 0.0, 0.5]);
        assert_eq!(
            z.to_string(),
            "structural=+0.1000 cyclical=-0.0700 policy-operational=+0.0000 financial-expectations=+0.5000"
        );
    }

    #[test]
    fn test_policy_array_order() {
        let p = PolicyVector::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(p.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(PolicyVector::from_array(p.to_array()), p);
    }

    #[test]
    fn test_policy_partial_json_uses_defaults() {
        let p: PolicyVector = serde_json::from_str(r#"{"g": 200.0}"#).unwrap();
        assert_eq!(p, PolicyVector::new(200.0, 100.0, 1.5, 1.0));
    }

    #[test]
    fn test_real_money_zero_price() {
        let p = PolicyVector::new(150.0, 100.0, 1.5, 0.0);
        assert!(p.real_money().is_infinite());
    }

    #[test]
    fn test_equilibrium_finite_checks() {
        assert!(EquilibriumPoint::new(130.7, 63.8).is_finite());
        assert!(!EquilibriumPoint::new(f64::NAN, 1.0).is_finite());
        assert!(!EquilibriumPoint::new(1.0, f64::NEG_INFINITY).is_finite());
        assert!(EquilibriumPoint::new(f64::INFINITY, 0.0).check_finite().is_err());
        assert!(EquilibriumPoint::new(1.0, 2.0).check_finite().is_ok());
    }
}
