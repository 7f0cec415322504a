//! End-to-end pipeline scenarios: error pairs through fusion, gating,
//! banding, and beam selection.

use rsi_core::band::Band;
use rsi_core::fusion::{fuse, pool, WeightedItem};
use rsi_core::gate::GateMode;
use rsi_core::select::{evaluate, pick};
use rsi_core::tuning::Tuning;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn tuning() -> Tuning {
    Tuning::new()
}

// ── Worked scenarios ─────────────────────────────────────────────────────────

#[test]
fn test_chooser_formula_scenario() {
    // U_in = −0.2, V_out = +0.5, W = 1 ⇒ RSI = tanh(0.7) ≈ 0.604368.
    let rsi = fuse(&[WeightedItem::new(0.2, 0.5, 1.0)], &tuning());
    assert!((rsi - 0.604368).abs() < 1e-6, "rsi={}", rsi);
}

#[test]
fn test_pooling_scenario() {
    // a1 = tanh(0.2), a2 = tanh(0.4), equal weight ⇒ tanh(0.3) ≈ 0.291313.
    let t = tuning();
    let pooled = pool(&[libm::tanh(0.2), libm::tanh(0.4)], &t);
    assert!((pooled - 0.291313).abs() < 1e-6, "pooled={}", pooled);
}

#[test]
fn test_beam_pick_scenario() {
    // Candidate A [(0.2, 0.5, 1.0)] vs candidate B [(0.3, 0.4, 1.0)] under a
    // shared gate of 0.81, multiplicative mode. The rule: largest gated score
    // wins, ties favor the first-listed candidate.
    let t = tuning();
    let g = 0.81;

    let score_a = evaluate(&[WeightedItem::new(0.2, 0.5, 1.0)], g, GateMode::Multiplicative, &t);
    let score_b = evaluate(&[WeightedItem::new(0.3, 0.4, 1.0)], g, GateMode::Multiplicative, &t);

    // Both candidates carry the same net stretched evidence (0.7), so their
    // scores agree to floating-point round-off.
    assert!(
        (score_a.rsi - score_b.rsi).abs() < 1e-12,
        "rsi_a={} rsi_b={}",
        score_a.rsi,
        score_b.rsi
    );

    let expected = if score_b.gated > score_a.gated { 1 } else { 0 };
    assert_eq!(pick(&[score_a, score_b]), Some(expected));

    // Observability: both candidates report RSI, gated score, and band.
    assert!((score_a.gated - score_a.rsi * g).abs() < 1e-12);
    assert_eq!(score_a.band, Band::of(score_a.gated));
    assert_eq!(score_b.band, Band::of(score_b.gated));
}

#[test]
fn test_full_pipeline_band_progression() {
    // Stronger outbound evidence moves the gated score through the bands.
    let t = tuning();
    let g = 1.0;

    let weak = evaluate(&[WeightedItem::new(0.0, 0.1, 1.0)], g, GateMode::Multiplicative, &t);
    let mild = evaluate(&[WeightedItem::new(0.0, 0.8, 1.0)], g, GateMode::Multiplicative, &t);
    let strong = evaluate(&[WeightedItem::new(0.0, 2.0, 1.0)], g, GateMode::Multiplicative, &t);

    assert_eq!(weak.band, Band::Neutral, "gated={}", weak.gated);
    assert_eq!(mild.band, Band::Aligned, "gated={}", mild.gated);
    assert_eq!(strong.band, Band::StrongAligned, "gated={}", strong.gated);
    assert!(weak.band < mild.band && mild.band < strong.band);
}

#[test]
fn test_gate_damping_can_change_the_band() {
    let t = tuning();
    let items = [WeightedItem::new(0.0, 1.2, 1.0)];

    let open = evaluate(&items, 1.0, GateMode::Multiplicative, &t);
    let damped = evaluate(&items, 0.5, GateMode::Multiplicative, &t);

    assert_eq!(open.band, Band::Aligned, "gated={}", open.gated);
    assert_eq!(damped.band, Band::Neutral, "gated={}", damped.gated);
    assert_eq!(open.rsi, damped.rsi, "gating must not touch the raw RSI");
}

#[test]
fn test_stretched_gate_preserves_more_than_multiplicative() {
    let t = tuning();
    let items = [WeightedItem::new(0.0, 2.5, 1.0)];

    let linear = evaluate(&items, 0.5, GateMode::Multiplicative, &t);
    let stretched = evaluate(&items, 0.5, GateMode::Stretched, &t);

    assert!(
        stretched.gated > linear.gated,
        "stretched={} linear={}",
        stretched.gated,
        linear.gated
    );
}
