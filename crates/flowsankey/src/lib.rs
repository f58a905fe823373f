#![forbid(unsafe_code)]

//! `flowsankey` turns material-flow records into sankey graphs for interactive diagrams.
//!
//! This crate re-exports [`flowsankey_core`] and adds optional output formats.
//!
//! # Features
//!
//! - `raster`: PNG snapshots of the rendered diagram via pure-Rust SVG rasterization

pub use flowsankey_core::*;

#[cfg(feature = "raster")]
pub mod raster;
