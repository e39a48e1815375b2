//! Rendering of fetched results for the terminal.
//!
//! # Submodules
//!
//! - [`text`]: Human-readable listing of articles and weather
//! - [`json`]: Pretty-printed JSON of the same data

pub mod json;
pub mod text;
