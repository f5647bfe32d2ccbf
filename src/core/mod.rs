//! Core module
//!
//! This module contains:
//! - The `Annotator` a chart instance owns
//! - The `ChartHost` trait the chart implements for coordinate conversion

pub mod engine;
pub mod host;
