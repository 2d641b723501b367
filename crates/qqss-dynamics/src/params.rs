// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Canonical Projections
// ─────────────────────────────────────────────────────────────────────
//! Fixed weights mapping a scalar shock onto the four tension channels,
//! the coupling from tension back onto `(G, T, M, P)`, and the
//! interference matrix builder.

use qqss_types::N_CHANNELS;

/// Square matrix over the tension channels.
pub type ChannelMatrix = [[f64; N_CHANNELS]; N_CHANNELS];

/// Per-channel response to a unit shock.
///
/// Structural and policy-operational channels move with the shock;
/// cyclical and financial channels partly offset it.
pub const SHOCK_WEIGHTS: [f64; N_CHANNELS] = [
    1.0,  // structural
    -0.7, // cyclical
    0.5,  // policy-operational
    -0.3, // financial-expectations
];

/// Tension → policy adjustment. Row i gives the adjustment to the i-th
/// policy variable in `(G, T, M, P)` order.
pub const POLICY_COUPLING: ChannelMatrix = [
    [1.0, 0.2, 0.3, 0.0],  // G
    [-0.2, 1.0, 0.0, 0.3], // T
    [0.0, 0.3, 1.0, 0.2],  // M
    [0.3, 0.0, -0.2, 1.0], // P
];

/// Build the 4×4 interference matrix: unit diagonal, `gain` everywhere else.
pub fn build_interference_matrix(gain: f64) -> ChannelMatrix {
    let mut m = [[gain; N_CHANNELS]; N_CHANNELS];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

/// Matrix-vector product over the channel dimension.
#[inline]
pub fn mat_vec(m: &ChannelMatrix, v: &[f64; N_CHANNELS]) -> [f64; N_CHANNELS] {
    let mut out = [0.0; N_CHANNELS];
    for (o, row) in out.iter_mut().zip(m.iter()) {
        *o = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
    }
    out
}
