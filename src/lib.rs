//! Interactive restaurant map engine.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It draws
//! restaurants from a CSV table on a projected map and lets the user filter
//! them with two draggable, resizable circles and a price-tier multi-select.
//! Every interaction reruns a full pass over the records that recomputes each
//! marker's style and the count of restaurants inside both circles.
//!
//! All state lives in [`engine::EngineCore`], which has no browser
//! dependencies and is tested natively. The `hydrate` feature adds the
//! [`web`] entry point that loads data and wires DOM events to the engine.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`projection`] | Conformal conic projection fitted to the map frame |
//! | [`records`] | Restaurant records and CSV loading |
//! | [`region`] | The two draggable, resizable regions |
//! | [`price_filter`] | Price tier multi-select state |
//! | [`recompute`] | The per-interaction classification pass |
//! | [`tooltip`] | Hover tooltip content and placement |
//! | [`hit`] | Hit-testing markers and regions |
//! | [`input`] | Mouse buttons, cursors and the drag state machine |
//! | [`render`] | Scene rendering to a 2D canvas |
//! | [`config`] | Map configuration and defaults |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared colors and sizes |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod price_filter;
pub mod projection;
pub mod recompute;
pub mod records;
pub mod region;
pub mod render;
pub mod tooltip;
#[cfg(feature = "hydrate")]
pub mod web;
