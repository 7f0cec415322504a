//! # rsi-core
//!
//! Relative state indicators — bounded, order-invariant alignment fusion for
//! ranking and pooling candidate outputs.
//!
//! ---
//!
//! ## This is not a statistical model. It is deterministic arithmetic.
//!
//! Every score this crate produces comes from three closed-form moves applied
//! in a fixed order. No fitting, no calibration, no hidden state.
//!
//! **Stretch, sum, compress** — bounded alignment values live in (−1, 1).
//! Fusing them there directly would make the result depend on how many values
//! arrive and in what order. Instead each value is stretched onto the whole
//! real line with `atanh`, summed linearly under its weight, and compressed
//! back with `tanh`. The sum is commutative, so the fused score is the same
//! for any arrival order, and `tanh` guarantees it lands back inside the
//! bounds.
//!
//! **The clamp margin** — `atanh` blows up at ±1. Every externally visible
//! alignment value is clamped to `[−1+ε, 1−ε]` before it is stretched, so the
//! round trip through stretched space is always finite.
//!
//! **The gate** — an external damping factor rescales a fused score toward
//! neutral without breaking its bounds, either linearly or in stretched space.
//!
//! > "No evidence means no alignment claim." — fusing an empty or zero-weight
//! > collection yields exactly 0, the neutral score, never an error.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! (e_in, e_out) pairs → align → WeightedItem → fusion → RSI
//!                                                        │
//!                                     gate (calm factor g)│
//!                                                        ▼
//!                                          RSI_env → band → A--…A++
//! ```
//!
//! A caller runs the pipeline once per candidate and picks the candidate with
//! the largest gated score ([`select`]), or pools several alignment
//! observations into one representative value ([`fusion::pool`]).
//!
//! ## Module overview
//!
//! | Module | Key items | What it does |
//! |--------|-----------|--------------|
//! | [`tuning`] | [`tuning::Tuning`] | Clamp margin, denominator guard, weight exponent, sensitivity |
//! | [`align`] | [`align::map_to_alignment`], [`align::clamp_align`] | Raw error pair → bounded alignment pair |
//! | [`fusion`] | [`fusion::FusionState`], [`fusion::fuse`], [`fusion::pool`] | Weighted order-invariant stretch-sum-compress fusion |
//! | [`gate`] | [`gate::GateMode`], [`gate::apply_gate`] | External damping of a fused score |
//! | [`band`] | [`band::Band`] | Five ordered qualitative labels |
//! | [`select`] | [`select::evaluate`], [`select::pick`] | Per-candidate scoring and beam pick |
//! | [`vendor`] | [`vendor::SheetRecord`] | Vendor sheet normalizer (requires `vendor` feature) |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default with no heap required; `tanh` and
//! `atanh` come from [`libm`] on every target so results agree across builds.
//! Enable the `std` feature for host-side helpers. Enable the `serde` feature
//! for serialisation support on the public data types. The `vendor` feature
//! pulls in `std` for the sheet normalizer.
//!
//! ## Concurrency
//!
//! Every operation is a pure function over immutable inputs. Parallel callers
//! shard items across workers, accumulate one [`fusion::FusionState`] each,
//! and combine them with [`fusion::FusionState::merge`] — component-wise
//! addition of partial sums, never averaging of intermediate scores.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.
//! Commercial production use requires a license from Flout Labs
//! (cbyrne@floutlabs.com).

#![cfg_attr(not(any(feature = "std", feature = "python-ffi")), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Pull in std when the feature is enabled (vendor normalizer, FFI, etc.)
#[cfg(any(feature = "std", feature = "python-ffi"))]
extern crate std;

pub mod align;
pub mod band;
pub mod fusion;
pub mod gate;
pub mod select;
pub mod tuning;

#[cfg(feature = "vendor")]
pub mod vendor;

#[cfg(feature = "python-ffi")]
pub mod ffi;
