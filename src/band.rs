//! Five ordered qualitative bands over a gated alignment value.
//!
//! The thresholds form a total, non-overlapping partition of the real line:
//! the extreme bands are closed toward ±1, the two inner bands abut the
//! extremes with half-open intervals at ±0.60, and everything strictly
//! between −0.60 and +0.60 is neutral. The conditions are evaluated
//! top-to-bottom, first match wins.
//!
//! | Condition          | Band            | Label |
//! |--------------------|-----------------|-------|
//! | x ≥ 0.90           | StrongAligned   | A++   |
//! | 0.60 ≤ x < 0.90    | Aligned         | A+    |
//! | −0.60 < x < 0.60   | Neutral         | A0    |
//! | −0.90 < x ≤ −0.60  | Opposed         | A-    |
//! | x ≤ −0.90          | StrongOpposed   | A--   |

/// Alignment magnitude at which the outer bands begin (A++ / A--).
pub const STRONG_THRESHOLD: f64 = 0.90;

/// Alignment magnitude at which the inner bands begin (A+ / A-).
pub const MILD_THRESHOLD: f64 = 0.60;

/// Qualitative label for a gated alignment value.
///
/// Variants are declared in ascending alignment order, so the derived `Ord`
/// agrees with the numeric order of the underlying scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Band {
    /// x ≤ −0.90 — strong misalignment ("A--").
    StrongOpposed,
    /// −0.90 < x ≤ −0.60 — mild misalignment ("A-").
    Opposed,
    /// −0.60 < x < 0.60 — no meaningful alignment either way ("A0").
    Neutral,
    /// 0.60 ≤ x < 0.90 — mild alignment ("A+").
    Aligned,
    /// x ≥ 0.90 — strong alignment ("A++").
    StrongAligned,
}

impl Band {
    /// Classify a finite alignment value into its band.
    ///
    /// Evaluated top-to-bottom with the exact boundary inequalities of the
    /// table above: 0.90 belongs to the strong band, −0.60 to the opposed
    /// band. Every finite real maps to exactly one band.
    pub fn of(x: f64) -> Band {
        if x >= STRONG_THRESHOLD {
            Band::StrongAligned
        } else if x >= MILD_THRESHOLD {
            Band::Aligned
        } else if x > -MILD_THRESHOLD {
            Band::Neutral
        } else if x > -STRONG_THRESHOLD {
            Band::Opposed
        } else {
            Band::StrongOpposed
        }
    }

    /// The fixed display label for this band.
    pub fn label(&self) -> &'static str {
        match self {
            Band::StrongOpposed => "A--",
            Band::Opposed => "A-",
            Band::Neutral => "A0",
            Band::Aligned => "A+",
            Band::StrongAligned => "A++",
        }
    }
}

impl core::fmt::Display for Band {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
