//! Interactive drawing tools for financial charts
//!
//! A host chart owns an [`Annotator`], feeds it pointer events and asks a
//! [`RenderPass`] for a frame whenever the annotator's revision changes.

pub mod annotations;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod session;
pub mod shapes;

pub use crate::annotations::hit_test::ControlPointHit;
pub use crate::config::{AnnotatorConfig, PALETTE, ShapeColor};
pub use crate::core::engine::Annotator;
pub use crate::core::host::{ChartHost, FixedSurface, LinearChart};
pub use crate::domain::{DrawingId, DrawingObject, Point, ShapeType, SurfaceSize, Tool};
pub use crate::render::pass::{RenderPass, Scene};
pub use crate::session::{AnnotatorEvent, Interaction, PointerEvent};
