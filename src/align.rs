/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Raw error pairs to bounded alignment values, and the shared clamp.
//!
//! An alignment value is a real in the open interval (−1, 1): the sign says
//! whether a signal agrees or disagrees with the target direction, the
//! magnitude says how strongly. Every externally visible alignment value is
//! additionally clamped to `[−1+ε, 1−ε]` so that its `atanh` stretch — the
//! accumulation space used by [`crate::fusion`] — stays finite.
//!
//! # Invariants
//!
//! - **RSI-001**: no value returned by this module equals ±1 or lies outside
//!   `[−1+ε, 1−ε]` for finite input.
//! - **RSI-002**: `compress(stretch(a))` returns `clamp_align(a)` within
//!   floating-point round-off; `stretch` is finite for any finite input.
//! - Non-finite raw errors are the caller's bug: `NaN` propagates through
//!   unchanged rather than being coerced to a bound.
//! - Zero unsafe code.

use crate::tuning::Tuning;

// ─── Clamp / stretch / compress ─────────────────────────────────────────────

/// Clamp an alignment value to the closed interval `[−1+ε, 1−ε]`.
///
/// `NaN` input returns `NaN` — the clamp never invents a finite value.
pub fn clamp_align(a: f64, eps_align: f64) -> f64 {
    a.clamp(-1.0 + eps_align, 1.0 - eps_align)
}

/// Stretch a bounded alignment value onto the whole real line.
///
/// The input is clamped first, so the result is finite for any finite `a`,
/// however close to ±1.
pub fn stretch(a: f64, eps_align: f64) -> f64 {
    libm::atanh(clamp_align(a, eps_align))
}

/// Compress a stretched value back into the open interval (−1, 1).
///
/// Callers that re-expose the result clamp it again; the raw `tanh` image is
/// kept here so intermediate arithmetic is not biased by the margin.
pub fn compress(u: f64) -> f64 {
    libm::tanh(u)
}

// ─── Error pair → alignment pair ────────────────────────────────────────────

/// The two bounded alignment values produced from one raw error pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentPair {
    /// Alignment derived from the inbound error: `clamp(tanh(−c·e_in))`.
    pub inbound: f64,
    /// Alignment derived from the outbound error: `clamp(tanh(+c·e_out))`.
    pub outbound: f64,
}

/// Map a raw directional error pair to a bounded alignment pair.
///
/// The sign convention is deliberate and load-bearing: inbound error is
/// misalignment to be inverted (negated before the `tanh` map), outbound
/// error is direct alignment. `tanh` is total, so there are no error
/// conditions — a non-finite raw error propagates as a non-finite alignment
/// and is the caller's responsibility to reject upstream.
pub fn map_to_alignment(error_in: f64, error_out: f64, tuning: &Tuning) -> AlignmentPair {
    let c = tuning.sensitivity;
    AlignmentPair {
        inbound: clamp_align(libm::tanh(-c * error_in), tuning.eps_align),
        outbound: clamp_align(libm::tanh(c * error_out), tuning.eps_align),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
