//! Pointer handling and hit testing for drawings
//!
//! This module provides:
//! - Control point and body hit testing over the drawing store
//! - Pointer handlers driving the interaction state machine

pub mod handlers;
