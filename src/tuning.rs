//! Numeric tunables shared by every stage of the pipeline.
//!
//! All four knobs are process-wide defaults with no lifecycle: construct a
//! [`Tuning`] once, pass it by reference into every entry point. Tests build
//! their own instances, so alternate tolerances never leak between tests.
//!
//! # Invariants
//! - **RSI-004**: tunables are immutable once constructed; no module-level
//!   mutable state anywhere in the crate.
//! - Zero unsafe code.

/// Default clamp margin ε keeping alignment values away from ±1.
pub const EPS_ALIGN: f64 = 1e-6;

/// Default denominator guard for the fusion mean.
///
/// Raise to at least 1e-8 when accumulating in reduced precision
/// (see [`Tuning::reduced_precision`]).
pub const EPS_WEIGHT: f64 = 1e-12;

/// Default weight-derivation exponent γ.
pub const GAMMA: f64 = 1.0;

/// Default sensitivity constant c for the error-to-alignment map.
pub const SENSITIVITY: f64 = 1.0;

/// Immutable numeric configuration for the alignment pipeline.
///
/// The defaults are safe for `f64` accumulation. None of the fields interact:
/// each is consumed by exactly one stage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuning {
    /// Clamp margin ε: externally visible alignment values live in
    /// `[−1+ε, 1−ε]` so their `atanh` stretch is always finite.
    pub eps_align: f64,
    /// Denominator guard for the fusion mean: the total weight is floored at
    /// this value before dividing. Irrelevant when the total weight is
    /// comfortably positive.
    pub eps_weight: f64,
    /// Weight-derivation exponent γ: [`Tuning::weight_for`] returns |m|^γ,
    /// or the uniform weight 1 when γ = 0. Pure pass-through — the pipeline
    /// itself never reads this field.
    pub gamma: f64,
    /// Sensitivity constant c scaling raw errors before the `tanh` map.
    pub sensitivity: f64,
}

impl Tuning {
    /// Construct the default tuning (ε = 1e-6, ε_w = 1e-12, γ = 1, c = 1).
    pub fn new() -> Self {
        Self {
            eps_align: EPS_ALIGN,
            eps_weight: EPS_WEIGHT,
            gamma: GAMMA,
            sensitivity: SENSITIVITY,
        }
    }

    /// Default tuning with the denominator guard raised to 1e-8.
    ///
    /// Use when weights were accumulated in reduced-precision floats before
    /// reaching the fusion step; the larger guard absorbs the coarser
    /// rounding near zero without materially biasing well-weighted fusions.
    pub fn reduced_precision() -> Self {
        Self {
            eps_weight: 1e-8,
            ..Self::new()
        }
    }

    /// Derive an item weight from the magnitude of an external quantity.
    ///
    /// Returns `|magnitude|^γ`, or the uniform weight 1 when γ = 0 regardless
    /// of the magnitude. No other semantics: γ is a caller-owned knob.
    pub fn weight_for(&self, magnitude: f64) -> f64 {
        if self.gamma == 0.0 {
            1.0
        } else {
            libm::pow(libm::fabs(magnitude), self.gamma)
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
