//! Drawing rendering module
//!
//! This module contains:
//! - Geometry calculations shared between scene building, painting and hit testing
//! - Per-shape primitive builders
//! - Image rendering using tiny-skia
//! - The render pass that repaints a frame when the annotator changes

pub mod geometry;
pub mod image;
pub mod pass;
pub mod shapes;
