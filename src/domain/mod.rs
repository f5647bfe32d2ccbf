//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the crate.
//! Types here carry no rendering or host dependencies.

pub mod drawing;
pub mod geometry;

pub use drawing::*;
pub use geometry::*;
