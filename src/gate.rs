/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! External damping of a fused score.
//!
//! The gate factor expresses a separate "calm" condition: how much the
//! environment currently justifies acting on the fused alignment at all.
//! It rescales a fused score toward neutral without breaking its bounds.
//! The two modes are deliberately different curves and the caller always
//! chooses one explicitly — the mode is never inferred from the data.

use crate::align::clamp_align;
use crate::tuning::Tuning;

/// Which damping transform [`apply_gate`] applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateMode {
    /// Linear scaling toward zero: `clamp(g · clamp(rsi))`.
    Multiplicative,
    /// Scaling in stretched space: `clamp(tanh(g · atanh(clamp(rsi))))`.
    /// Compresses less aggressively near the bounds than the linear mode.
    Stretched,
}

/// Rescale a fused score by the gate factor `g` under the selected mode.
///
/// The input is clamped before the transform (keeping `atanh` finite in
/// stretched mode) and the output is clamped before returning, so the result
/// is always a valid alignment value for downstream classification. `g` is
/// typically in [0, 1] but is not required to be; values above 1 amplify and
/// the clamp still bounds the result.
pub fn apply_gate(rsi: f64, gate: f64, mode: GateMode, tuning: &Tuning) -> f64 {
    let x = clamp_align(rsi, tuning.eps_align);
    let y = match mode {
        GateMode::Multiplicative => gate * x,
        GateMode::Stretched => libm::tanh(gate * libm::atanh(x)),
    };
    clamp_align(y, tuning.eps_align)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
