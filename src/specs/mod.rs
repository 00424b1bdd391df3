// src/specs/mod.rs
//! # Page “specs”
//!
//! One module per upstream page. Each encodes *where the release identifiers
//! live in the HTML* and *how to pull them out* without a DOM.
//!
//! ## What lives here
//! - **Pure parsing** of an already-fetched document into a
//!   [`RawObservation`](crate::model::RawObservation).
//! - **Selector choice & precedence** (e.g. newest article wins on Apple's
//!   release feed; highest `YYH#` wins on Windows release health).
//! - **Tolerant extraction** with `core::html` helpers (case-insensitive tag
//!   blocks, text nodes, entity/whitespace cleanup) plus a regex per product.
//!
//! ## What does **not** live here
//! - **Networking**: `scrape` owns the HTTP client and the worker pool.
//! - **Sentinels, date formats, history**: the normalizer decides what an
//!   unusable value becomes. Specs report *missing* (`None`) or *broken*
//!   (`RawValue::Error`) and leave it there.
//!
//! ## Typical call chain
//! ```text
//! runner → scrape::collect → Source::fetch → Http::get
//!                                         ↘ specs::<page>::extract(doc)
//! ```
//!
//! ## Testing notes
//! Specs are tested offline against small captured fragments. Keep them
//! resilient to whitespace, attribute order, and harmless markup noise.
pub mod apple;
pub mod chrome;
pub mod windows;
