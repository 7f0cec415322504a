//! Per-candidate scoring and beam pick.
//!
//! The composition layer over the core stages: run the full pipeline once per
//! candidate, then choose the candidate with the largest gated score. No
//! state of its own — everything here is a straight composition of
//! [`crate::fusion`], [`crate::gate`], and [`crate::band`].

use crate::band::Band;
use crate::fusion::{fuse, WeightedItem};
use crate::gate::{apply_gate, GateMode};
use crate::tuning::Tuning;

/// Everything observable about one candidate after a pipeline run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateScore {
    /// The fused score before gating.
    pub rsi: f64,
    /// The fused score after gating — the value candidates compete on.
    pub gated: f64,
    /// Band of the gated score.
    pub band: Band,
}

/// Run the full pipeline for one candidate.
///
/// Fuses the candidate's items, applies the shared gate factor under the
/// selected mode, and classifies the result. An empty item list scores the
/// neutral 0 (see [`fuse`]).
pub fn evaluate(
    items: &[WeightedItem],
    gate: f64,
    mode: GateMode,
    tuning: &Tuning,
) -> CandidateScore {
    let rsi = fuse(items, tuning);
    let gated = apply_gate(rsi, gate, mode, tuning);
    CandidateScore {
        rsi,
        gated,
        band: Band::of(gated),
    }
}

/// Index of the score with the largest gated value.
///
/// Ties favor the first-listed candidate: a later candidate replaces the
/// current best only when its gated value is strictly greater. Returns
/// `None` for an empty slice.
pub fn pick(scores: &[CandidateScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, score) in scores.iter().enumerate() {
        let better = match best {
            Some(b) => score.gated > scores[b].gated,
            None => true,
        };
        if better {
            best = Some(i);
        }
    }
    best
}

/// Evaluate every candidate and pick the winner in one call.
///
/// Each candidate is an independent item list; the gate factor and mode are
/// shared. Tie-breaking matches [`pick`]. Returns `None` when `candidates`
/// is empty.
pub fn select(
    candidates: &[&[WeightedItem]],
    gate: f64,
    mode: GateMode,
    tuning: &Tuning,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, items) in candidates.iter().enumerate() {
        let gated = evaluate(items, gate, mode, tuning).gated;
        let better = match best {
            Some((_, best_gated)) => gated > best_gated,
            None => true,
        };
        if better {
            best = Some((i, gated));
        }
    }
    best.map(|(i, _)| i)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
