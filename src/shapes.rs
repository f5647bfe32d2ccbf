//! Shape handler table
//!
//! One entry per shape type ties together its point contract, how the pointer
//! places those points, how it is drawn and how it is hit-tested. Adding a
//! shape means adding a `ShapeType` variant and a row here.

use crate::annotations::hit_test::{self, HitFn};
use crate::domain::{Placement, ShapeType};
use crate::render::shapes::{self as draw, RenderFn};

/// How a click is matched against a drawing's body
#[derive(Clone, Copy)]
pub enum BodyHit {
    /// Always matched against the body
    Body(HitFn),
    /// Matched against the body only when full-body hit testing is enabled,
    /// otherwise by control point proximity
    Extended(HitFn),
}

/// Everything the engine needs to know about one shape type
#[derive(Clone, Copy)]
pub struct ShapeHandler {
    pub min_points: usize,
    pub placement: Placement,
    pub render: RenderFn,
    pub body_hit: BodyHit,
}

const fn row(
    min_points: usize,
    placement: Placement,
    render: RenderFn,
    body_hit: BodyHit,
) -> ShapeHandler {
    ShapeHandler {
        min_points,
        placement,
        render,
        body_hit,
    }
}

static TREND_LINE: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_trend_line,
    BodyHit::Body(hit_test::hit_segment),
);
static RAY: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_ray,
    BodyHit::Body(hit_test::hit_segment),
);
static EXTENDED_LINE: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_extended_line,
    BodyHit::Body(hit_test::hit_segment),
);
static HORIZONTAL_LINE: ShapeHandler = row(
    1,
    Placement::Follow,
    draw::render_horizontal_line,
    BodyHit::Body(hit_test::hit_horizontal),
);
static VERTICAL_LINE: ShapeHandler = row(
    1,
    Placement::Follow,
    draw::render_vertical_line,
    BodyHit::Body(hit_test::hit_vertical),
);
static HORIZONTAL_RAY: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_horizontal_ray,
    BodyHit::Body(hit_test::hit_segment),
);
static CROSS_LINE: ShapeHandler = row(
    1,
    Placement::Follow,
    draw::render_cross_line,
    BodyHit::Extended(hit_test::hit_cross),
);
static TREND_ANGLE: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_trend_angle,
    BodyHit::Body(hit_test::hit_segment),
);
static INFO_LINE: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_info_line,
    BodyHit::Body(hit_test::hit_segment),
);
static PARALLEL_CHANNEL: ShapeHandler = row(
    3,
    Placement::Clicks,
    draw::render_parallel_channel,
    BodyHit::Extended(hit_test::hit_parallel_channel),
);
static FLAT_CHANNEL: ShapeHandler = row(
    2,
    Placement::Drag,
    draw::render_flat_channel,
    BodyHit::Extended(hit_test::hit_flat_channel),
);
static PITCHFORK: ShapeHandler = row(
    3,
    Placement::Clicks,
    draw::render_pitchfork,
    BodyHit::Extended(hit_test::hit_pitchfork),
);

/// Handler for a shape type
pub fn handler(shape: ShapeType) -> &'static ShapeHandler {
    match shape {
        ShapeType::TrendLine => &TREND_LINE,
        ShapeType::Ray => &RAY,
        ShapeType::ExtendedLine => &EXTENDED_LINE,
        ShapeType::HorizontalLine => &HORIZONTAL_LINE,
        ShapeType::VerticalLine => &VERTICAL_LINE,
        ShapeType::HorizontalRay => &HORIZONTAL_RAY,
        ShapeType::CrossLine => &CROSS_LINE,
        ShapeType::TrendAngle => &TREND_ANGLE,
        ShapeType::InfoLine => &INFO_LINE,
        ShapeType::ParallelChannel => &PARALLEL_CHANNEL,
        ShapeType::FlatChannel => &FLAT_CHANNEL,
        ShapeType::Pitchfork => &PITCHFORK,
    }
}
