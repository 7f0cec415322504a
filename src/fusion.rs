/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Weighted, order-invariant fusion of alignment evidence.
//!
//! The central algorithm of the crate: stretch each bounded alignment value
//! onto the real line with `atanh`, sum the stretched values under their
//! weights, divide by the total weight, compress back with `tanh`. Because
//! the accumulation is a plain commutative sum, the fused score ("RSI") does
//! not depend on the order items arrive in, and parallel shards combine by
//! component-wise addition of their partial sums.
//!
//! # Invariants
//!
//! - **RSI-001**: the fused score is a clamped alignment value in
//!   `[−1+ε, 1−ε]`.
//! - **RSI-003**: total weight ≤ 0 yields exactly 0 — "no evidence, no
//!   alignment claim". Defined behavior, not an error.
//! - Shards merge by adding `(inbound, outbound, weight)` triples before the
//!   final division, never by averaging intermediate fused scores.
//! - Zero unsafe code.

use crate::align::{clamp_align, compress, map_to_alignment, stretch};
use crate::tuning::Tuning;

// ─── Weighted item ──────────────────────────────────────────────────────────

/// One piece of alignment evidence: a raw directional error pair plus a
/// non-negative weight.
///
/// Constructed by the caller per evaluation and consumed once by the fusion
/// accumulator. The weight is typically [`Tuning::weight_for`] applied to the
/// magnitude of an external quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedItem {
    /// Inbound raw error (misalignment; inverted by the alignment map).
    pub error_in: f64,
    /// Outbound raw error (direct alignment).
    pub error_out: f64,
    /// Non-negative weight of this item.
    pub weight: f64,
}

impl WeightedItem {
    /// Construct a weighted item from a raw error pair and weight.
    pub fn new(error_in: f64, error_out: f64, weight: f64) -> Self {
        Self {
            error_in,
            error_out,
            weight,
        }
    }
}

// ─── Fusion state ───────────────────────────────────────────────────────────

/// Running accumulation of stretched alignment evidence.
///
/// Holds the weighted sums of stretched inbound values, stretched outbound
/// values, and weights. Created empty, fed any number of items in any order,
/// then finalized once into a fused score. Partial states from parallel
/// shards combine with [`FusionState::merge`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FusionState {
    /// Weighted sum of stretched inbound alignments (U_in).
    pub inbound: f64,
    /// Weighted sum of stretched outbound alignments (V_out).
    pub outbound: f64,
    /// Sum of weights (W). Never negative when fed non-negative weights.
    pub weight: f64,
}

impl FusionState {
    /// Construct an empty accumulation.
    pub fn new() -> Self {
        Self {
            inbound: 0.0,
            outbound: 0.0,
            weight: 0.0,
        }
    }

    /// Absorb one item: map its error pair to alignments, stretch both, and
    /// add them under the item's weight.
    pub fn absorb(&mut self, item: &WeightedItem, tuning: &Tuning) {
        let pair = map_to_alignment(item.error_in, item.error_out, tuning);
        self.inbound += item.weight * libm::atanh(pair.inbound);
        self.outbound += item.weight * libm::atanh(pair.outbound);
        self.weight += item.weight;
    }

    /// Combine a partial accumulation from another shard into this one.
    ///
    /// Component-wise addition — the only correct way to join parallel
    /// partial fusions. Averaging two finished scores is a different (and
    /// wrong) operation.
    pub fn merge(&mut self, other: &FusionState) {
        self.inbound += other.inbound;
        self.outbound += other.outbound;
        self.weight += other.weight;
    }

    /// Finalize into the fused score.
    ///
    /// Total weight ≤ 0 returns the neutral score 0 (RSI-003). Otherwise the
    /// net stretched evidence `(outbound − inbound)` is divided by the total
    /// weight (floored at the denominator guard) and compressed back into the
    /// clamped alignment interval.
    pub fn finish(&self, tuning: &Tuning) -> f64 {
        if self.weight <= 0.0 {
            return 0.0;
        }
        let mean = (self.outbound - self.inbound) / self.weight.max(tuning.eps_weight);
        clamp_align(compress(mean), tuning.eps_align)
    }
}

impl Default for FusionState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Fuse / pool entry points ───────────────────────────────────────────────

/// Fuse a collection of weighted items into one alignment score.
///
/// Equivalent to absorbing every item into a fresh [`FusionState`] and
/// finalizing it. The result is invariant to the order of `items` up to
/// floating-point summation error.
pub fn fuse(items: &[WeightedItem], tuning: &Tuning) -> f64 {
    let mut state = FusionState::new();
    for item in items {
        state.absorb(item, tuning);
    }
    state.finish(tuning)
}

/// Pool already-bounded alignment values into one representative value,
/// uniform weight 1 each.
///
/// The same stretch-sum-compress fusion, applied directly to alignment
/// values rather than through the inbound/outbound error split. An empty
/// pool returns the neutral score 0.
pub fn pool(values: &[f64], tuning: &Tuning) -> f64 {
    let mut sum = 0.0;
    let mut weight: f64 = 0.0;
    for &a in values {
        sum += stretch(a, tuning.eps_align);
        weight += 1.0;
    }
    if weight <= 0.0 {
        return 0.0;
    }
    clamp_align(compress(sum / weight.max(tuning.eps_weight)), tuning.eps_align)
}

/// Pool alignment values under per-value weights.
///
/// `pairs` holds `(alignment, weight)` tuples. Zero total weight returns the
/// neutral score 0, matching [`fuse`] (RSI-003).
pub fn pool_weighted(pairs: &[(f64, f64)], tuning: &Tuning) -> f64 {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for &(a, w) in pairs {
        sum += w * stretch(a, tuning.eps_align);
        weight += w;
    }
    if weight <= 0.0 {
        return 0.0;
    }
    clamp_align(compress(sum / weight.max(tuning.eps_weight)), tuning.eps_align)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::new()
    }

    // ── Neutral fallback ──────────────────────────────────────────────────

    #[test]
    fn test_empty_fusion_is_exactly_neutral() {
        // RSI-003: W = 0 is defined behavior, not division by zero.
        assert_eq!(fuse(&[], &tuning()), 0.0);
    }

    #[test]
    fn test_zero_weight_items_are_neutral() {
        let items = [
            WeightedItem::new(0.2, 0.5, 0.0),
            WeightedItem::new(-0.7, 0.1, 0.0),
        ];
        assert_eq!(fuse(&items, &tuning()), 0.0);
    }

    #[test]
    fn test_empty_pool_is_neutral() {
        assert_eq!(pool(&[], &tuning()), 0.0);
        assert_eq!(pool_weighted(&[], &tuning()), 0.0);
        assert_eq!(pool_weighted(&[(0.5, 0.0)], &tuning()), 0.0);
    }

    // ── Chooser formula ───────────────────────────────────────────────────

    #[test]
    fn test_single_item_chooser_formula() {
        // e_in = 0.2 stretches to U_in = −0.2, e_out = 0.5 to V_out = 0.5;
        // RSI = tanh((0.5 − (−0.2)) / 1) = tanh(0.7) ≈ 0.604368.
        let items = [WeightedItem::new(0.2, 0.5, 1.0)];
        let rsi = fuse(&items, &tuning());
        assert!(
            (rsi - libm::tanh(0.7)).abs() < 1e-9,
            "rsi={} expected tanh(0.7)={}",
            rsi,
            libm::tanh(0.7)
        );
        assert!((rsi - 0.604368).abs() < 1e-6);
    }

    #[test]
    fn test_finish_from_raw_accumulators() {
        // U_in = −0.2, V_out = 0.5, W = 1 straight into the finalizer.
        let state = FusionState {
            inbound: -0.2,
            outbound: 0.5,
            weight: 1.0,
        };
        let rsi = state.finish(&tuning());
        assert!((rsi - 0.604368).abs() < 1e-6, "rsi={}", rsi);
    }

    // ── Order invariance ──────────────────────────────────────────────────

    #[test]
    fn test_fusion_is_order_invariant() {
        let t = tuning();
        let a = WeightedItem::new(0.2, 0.5, 1.0);
        let b = WeightedItem::new(-0.3, 0.1, 2.0);
        let c = WeightedItem::new(0.8, -0.4, 0.5);

        let forward = fuse(&[a, b, c], &t);
        let reversed = fuse(&[c, b, a], &t);
        let rotated = fuse(&[b, c, a], &t);

        assert!(
            (forward - reversed).abs() <= 1e-12,
            "forward={} reversed={}",
            forward,
            reversed
        );
        assert!(
            (forward - rotated).abs() <= 1e-12,
            "forward={} rotated={}",
            forward,
            rotated
        );
    }

    #[test]
    fn test_weights_scale_contribution() {
        let t = tuning();
        // Doubling an item's weight equals supplying the item twice.
        let doubled = fuse(&[WeightedItem::new(0.2, 0.5, 2.0)], &t);
        let twice = fuse(
            &[
                WeightedItem::new(0.2, 0.5, 1.0),
                WeightedItem::new(0.2, 0.5, 1.0),
            ],
            &t,
        );
        assert!(
            (doubled - twice).abs() <= 1e-12,
            "doubled={} twice={}",
            doubled,
            twice
        );
    }

    // ── Sharded merge ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_matches_whole_set_fusion() {
        let t = tuning();
        let items = [
            WeightedItem::new(0.2, 0.5, 1.0),
            WeightedItem::new(-0.3, 0.1, 2.0),
            WeightedItem::new(0.8, -0.4, 0.5),
            WeightedItem::new(0.0, 0.9, 1.5),
        ];

        let whole = fuse(&items, &t);

        let mut left = FusionState::new();
        left.absorb(&items[0], &t);
        left.absorb(&items[1], &t);
        let mut right = FusionState::new();
        right.absorb(&items[2], &t);
        right.absorb(&items[3], &t);

        let mut combined = left;
        combined.merge(&right);
        let sharded = combined.finish(&t);

        assert!(
            (whole - sharded).abs() <= 1e-12,
            "whole={} sharded={}",
            whole,
            sharded
        );
    }

    #[test]
    fn test_merge_with_empty_shard_is_identity() {
        let t = tuning();
        let mut state = FusionState::new();
        state.absorb(&WeightedItem::new(0.2, 0.5, 1.0), &t);
        let before = state;
        state.merge(&FusionState::new());
        assert_eq!(state, before);
    }

    // ── Pooling ───────────────────────────────────────────────────────────

    #[test]
    fn test_pool_two_values_in_stretched_space() {
        // a1 = tanh(0.2), a2 = tanh(0.4): pooled = tanh((0.2+0.4)/2) = tanh(0.3).
        let t = tuning();
        let a1 = libm::tanh(0.2);
        let a2 = libm::tanh(0.4);
        let pooled = pool(&[a1, a2], &t);
        assert!(
            (pooled - libm::tanh(0.3)).abs() < 1e-9,
            "pooled={} expected tanh(0.3)={}",
            pooled,
            libm::tanh(0.3)
        );
        assert!((pooled - 0.291313).abs() < 1e-6);
    }

    #[test]
    fn test_pool_weighted_uniform_matches_pool() {
        let t = tuning();
        let values = [libm::tanh(0.2), libm::tanh(0.4), -0.3];
        let pairs = [(values[0], 1.0), (values[1], 1.0), (values[2], 1.0)];
        let a = pool(&values, &t);
        let b = pool_weighted(&pairs, &t);
        assert!((a - b).abs() <= 1e-12, "pool={} pool_weighted={}", a, b);
    }

    #[test]
    fn test_pool_single_value_round_trips() {
        let t = tuning();
        let a = 0.37;
        let pooled = pool(&[a], &t);
        assert!((pooled - a).abs() < 1e-9, "pooled={} a={}", pooled, a);
    }

    // ── Stretched-space additivity golden values ──────────────────────────

    #[test]
    fn test_stretched_sum_and_difference_golden() {
        // Adding and subtracting in stretched space: tanh(0.5 ± 0.2).
        let sum = compress(0.5 + 0.2);
        let diff = compress(0.5 - 0.2);
        assert!((sum - 0.604368).abs() < 1e-6, "sum={}", sum);
        assert!((diff - 0.291313).abs() < 1e-6, "diff={}", diff);
    }

    // ── Bounds ────────────────────────────────────────────────────────────

    #[test]
    fn test_fused_score_always_clamped() {
        let t = tuning();
        // Overwhelming one-sided evidence still lands inside the margin.
        let items = [WeightedItem::new(50.0, 50.0, 1.0)];
        let rsi = fuse(&items, &t);
        assert!(rsi <= 1.0 - t.eps_align, "rsi={}", rsi);
        assert!(rsi >= -1.0 + t.eps_align);
    }
}
