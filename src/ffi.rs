//! Python FFI bindings via PyO3.
//!
//! Exposes the four core operations plus beam selection to Python. All
//! tunables are keyword arguments with the crate defaults, so the Python
//! surface mirrors the Rust one without a configuration object.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from rsi_core import map_to_alignment, fuse, apply_gate, band_of, select
//!
//! a_in, a_out = map_to_alignment(0.2, 0.5)
//! rsi = fuse([(0.2, 0.5, 1.0)])
//! gated = apply_gate(rsi, 0.81, mode="multiplicative")
//! print(band_of(gated))                      # "A+"
//! print(select([[(0.2, 0.5, 1.0)], [(0.3, 0.4, 1.0)]], 0.81))  # 0
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::band::Band;
use crate::fusion::{self, WeightedItem};
use crate::gate::{self, GateMode};
use crate::select as selection;
use crate::tuning::Tuning;
use crate::align;

fn tuning_with(eps_align: f64, eps_weight: f64, sensitivity: f64) -> Tuning {
    Tuning {
        eps_align,
        eps_weight,
        sensitivity,
        ..Tuning::new()
    }
}

/// Accepts `"multiplicative"` (or the short `"mul"`) and `"stretched"`.
fn mode_from_str(mode: &str) -> PyResult<GateMode> {
    match mode {
        "multiplicative" | "mul" => Ok(GateMode::Multiplicative),
        "stretched" => Ok(GateMode::Stretched),
        other => Err(PyValueError::new_err(format!(
            "unknown gate mode {other:?}; use \"multiplicative\" or \"stretched\""
        ))),
    }
}

/// Map a raw directional error pair to a clamped alignment pair.
///
/// Returns `(a_in, a_out)`.
#[pyfunction]
#[pyo3(signature = (error_in, error_out, sensitivity=1.0, eps_align=1e-6))]
fn map_to_alignment(
    error_in: f64,
    error_out: f64,
    sensitivity: f64,
    eps_align: f64,
) -> (f64, f64) {
    let t = tuning_with(eps_align, crate::tuning::EPS_WEIGHT, sensitivity);
    let pair = align::map_to_alignment(error_in, error_out, &t);
    (pair.inbound, pair.outbound)
}

/// Fuse `(error_in, error_out, weight)` items into one alignment score.
///
/// An empty list returns the neutral score 0.0.
#[pyfunction]
#[pyo3(signature = (items, eps_weight=1e-12, eps_align=1e-6))]
fn fuse(items: Vec<(f64, f64, f64)>, eps_weight: f64, eps_align: f64) -> f64 {
    let t = tuning_with(eps_align, eps_weight, crate::tuning::SENSITIVITY);
    let items: Vec<WeightedItem> = items
        .into_iter()
        .map(|(e_in, e_out, w)| WeightedItem::new(e_in, e_out, w))
        .collect();
    fusion::fuse(&items, &t)
}

/// Pool already-bounded alignment values, uniform weight 1 each.
#[pyfunction]
#[pyo3(signature = (values, eps_weight=1e-12, eps_align=1e-6))]
fn pool(values: Vec<f64>, eps_weight: f64, eps_align: f64) -> f64 {
    let t = tuning_with(eps_align, eps_weight, crate::tuning::SENSITIVITY);
    fusion::pool(&values, &t)
}

/// Rescale a fused score by the gate factor under the selected mode.
#[pyfunction]
#[pyo3(signature = (rsi, gate, mode="multiplicative", eps_align=1e-6))]
fn apply_gate(rsi: f64, gate: f64, mode: &str, eps_align: f64) -> PyResult<f64> {
    let t = tuning_with(eps_align, crate::tuning::EPS_WEIGHT, crate::tuning::SENSITIVITY);
    Ok(gate::apply_gate(rsi, gate, mode_from_str(mode)?, &t))
}

/// Band label ("A--" … "A++") for an alignment value.
#[pyfunction]
fn band_of(x: f64) -> &'static str {
    Band::of(x).label()
}

/// Index of the candidate with the largest gated score, or `None` for an
/// empty candidate list. Ties favor the first-listed candidate.
#[pyfunction]
#[pyo3(signature = (candidates, gate, mode="multiplicative", eps_weight=1e-12, eps_align=1e-6))]
fn select(
    candidates: Vec<Vec<(f64, f64, f64)>>,
    gate: f64,
    mode: &str,
    eps_weight: f64,
    eps_align: f64,
) -> PyResult<Option<usize>> {
    let t = tuning_with(eps_align, eps_weight, crate::tuning::SENSITIVITY);
    let mode = mode_from_str(mode)?;
    let owned: Vec<Vec<WeightedItem>> = candidates
        .into_iter()
        .map(|items| {
            items
                .into_iter()
                .map(|(e_in, e_out, w)| WeightedItem::new(e_in, e_out, w))
                .collect()
        })
        .collect();
    let borrowed: Vec<&[WeightedItem]> = owned.iter().map(|v| v.as_slice()).collect();
    Ok(selection::select(&borrowed, gate, mode, &t))
}

/// The `rsi_core` Python module.
#[pymodule]
fn rsi_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(map_to_alignment, m)?)?;
    m.add_function(wrap_pyfunction!(fuse, m)?)?;
    m.add_function(wrap_pyfunction!(pool, m)?)?;
    m.add_function(wrap_pyfunction!(apply_gate, m)?)?;
    m.add_function(wrap_pyfunction!(band_of, m)?)?;
    m.add_function(wrap_pyfunction!(select, m)?)?;
    Ok(())
}
