//! Per-shape geometry: turns a drawing into paintable primitives
//!
//! Every builder tolerates drawings that are still short of their final
//! point count, so in-progress previews render whatever is already defined.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::geometry;
use crate::config::{AnnotatorConfig, ShapeColor};
use crate::core::host::ChartHost;
use crate::domain::{DrawingObject, Point, SurfaceSize};
use crate::shapes;

/// One paintable element of a drawing
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Straight stroke between two points
    Segment {
        from: Point,
        to: Point,
        width: f32,
        color: ShapeColor,
        dashed: bool,
    },
    /// Full-width translucent fill between two heights
    Band {
        top: f32,
        bottom: f32,
        color: ShapeColor,
        opacity: f32,
    },
    /// Circular arc stroke, angles in radians
    Arc {
        center: Point,
        radius: f32,
        start: f32,
        sweep: f32,
        width: f32,
        color: ShapeColor,
    },
    /// Control point marker on a selected drawing
    Handle {
        center: Point,
        radius: f32,
        fill: ShapeColor,
        border: ShapeColor,
    },
    /// Text derived from the drawing (price, time, angle, change)
    Label {
        anchor: Point,
        text: String,
        color: ShapeColor,
    },
}

/// What a shape builder may consult besides the drawing itself
pub struct ShapeContext<'a> {
    pub surface: SurfaceSize,
    pub host: &'a dyn ChartHost,
    pub config: &'a AnnotatorConfig,
}

impl<'a> ShapeContext<'a> {
    pub fn new(host: &'a dyn ChartHost, config: &'a AnnotatorConfig) -> Self {
        Self {
            surface: host.surface_size(),
            host,
            config,
        }
    }

    /// Price label at `y`, or None if the host cannot convert it
    fn price_label(&self, y: f32) -> Option<String> {
        match self.host.coordinate_to_price(y) {
            Ok(price) if price.is_finite() => {
                Some(format!("{:.*}", self.config.price_decimals, price))
            }
            Ok(price) => {
                log::debug!("Price label omitted, non-finite price {price} at y = {y}");
                None
            }
            Err(err) => {
                log::debug!("Price label omitted at y = {y}: {err:#}");
                None
            }
        }
    }

    /// Time label at `x`, or None if the host cannot convert it
    fn time_label(&self, x: f32) -> Option<String> {
        match self.host.coordinate_to_time(x) {
            Ok(time) => format_time(time, &self.config.time_format),
            Err(err) => {
                log::debug!("Time label omitted at x = {x}: {err:#}");
                None
            }
        }
    }
}

/// Format a timestamp, None if the format string is invalid
fn format_time(time: DateTime<Utc>, format: &str) -> Option<String> {
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_err() {
        log::debug!("Time label omitted, invalid format {format:?}");
        return None;
    }
    Some(out)
}

/// Signature of a per-shape builder
pub type RenderFn = fn(&DrawingObject, &ShapeContext<'_>, &mut Vec<Primitive>);

/// Primitives for one drawing, handles included when it is selected
pub fn build_primitives(drawing: &DrawingObject, ctx: &ShapeContext<'_>) -> Vec<Primitive> {
    let mut out = Vec::new();
    (shapes::handler(drawing.shape).render)(drawing, ctx, &mut out);
    if drawing.selected {
        let border = drawing.color.contrasting();
        out.extend(drawing.points.iter().map(|&center| Primitive::Handle {
            center,
            radius: ctx.config.handle_radius,
            fill: drawing.color,
            border,
        }));
    }
    out
}

fn segment(drawing: &DrawingObject, from: Point, to: Point) -> Primitive {
    Primitive::Segment {
        from,
        to,
        width: drawing.stroke_width(),
        color: drawing.color,
        dashed: false,
    }
}

fn dashed(drawing: &DrawingObject, from: Point, to: Point) -> Primitive {
    Primitive::Segment {
        from,
        to,
        width: drawing.stroke_width(),
        color: drawing.color,
        dashed: true,
    }
}

fn label(drawing: &DrawingObject, anchor: Point, text: String) -> Primitive {
    Primitive::Label {
        anchor,
        text,
        color: drawing.color,
    }
}

fn horizontal(drawing: &DrawingObject, y: f32, surface: SurfaceSize) -> Primitive {
    segment(drawing, Point::new(0.0, y), Point::new(surface.width, y))
}

fn vertical(drawing: &DrawingObject, x: f32, surface: SurfaceSize) -> Primitive {
    segment(drawing, Point::new(x, 0.0), Point::new(x, surface.height))
}

pub fn render_trend_line(
    drawing: &DrawingObject,
    _ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    if let [a, b, ..] = drawing.points[..] {
        out.push(segment(drawing, a, b));
    }
}

pub fn render_ray(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    if let [a, b, ..] = drawing.points[..] {
        let (from, to) = geometry::extend_ray(a, b, &ctx.surface.bounds());
        out.push(segment(drawing, from, to));
    }
}

pub fn render_extended_line(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    if let [a, b, ..] = drawing.points[..] {
        let (from, to) = geometry::extend_line(a, b, &ctx.surface.bounds());
        out.push(segment(drawing, from, to));
    }
}

pub fn render_horizontal_line(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    let Some(p) = drawing.point(0) else {
        return;
    };
    out.push(horizontal(drawing, p.y, ctx.surface));
    if let Some(text) = ctx.price_label(p.y) {
        out.push(label(drawing, Point::new(ctx.surface.width, p.y), text));
    }
}

pub fn render_vertical_line(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    let Some(p) = drawing.point(0) else {
        return;
    };
    out.push(vertical(drawing, p.x, ctx.surface));
    if let Some(text) = ctx.time_label(p.x) {
        out.push(label(drawing, Point::new(p.x, ctx.surface.height), text));
    }
}

pub fn render_horizontal_ray(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    let Some(origin) = drawing.point(0) else {
        return;
    };
    // Extends right until a second point says otherwise
    let rightward = drawing.point(1).is_none_or(|p| p.x > origin.x);
    let edge = if rightward { ctx.surface.width } else { 0.0 };
    out.push(segment(drawing, origin, Point::new(edge, origin.y)));
}

pub fn render_cross_line(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    let Some(p) = drawing.point(0) else {
        return;
    };
    out.push(horizontal(drawing, p.y, ctx.surface));
    out.push(vertical(drawing, p.x, ctx.surface));
}

pub fn render_trend_angle(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    let [a, b, ..] = drawing.points[..] else {
        return;
    };
    out.push(segment(drawing, a, b));
    if (b - a).is_zero() {
        return;
    }

    let degrees = geometry::angle_degrees(a, b);
    let radius = ctx.config.angle_arc_radius;
    out.push(Primitive::Arc {
        center: a,
        radius,
        start: 0.0,
        sweep: degrees.to_radians(),
        width: drawing.line_width,
        color: drawing.color,
    });
    // Reference leg the arc is measured from
    out.push(dashed(drawing, a, Point::new(a.x + radius, a.y)));
    out.push(label(
        drawing,
        Point::new(a.x + radius + geometry::label::PADDING, a.y),
        format!("{degrees:.1}°"),
    ));
}

pub fn render_info_line(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    let [a, b, ..] = drawing.points[..] else {
        return;
    };
    out.push(segment(drawing, a, b));
    if let Some(text) = price_change_label(ctx, a, b) {
        out.push(label(drawing, a.midpoint(b), text));
    }
}

/// "+1.50 (+3.00%)" style change between the prices at two points
fn price_change_label(ctx: &ShapeContext<'_>, a: Point, b: Point) -> Option<String> {
    let start = ctx.host.coordinate_to_price(a.y);
    let end = ctx.host.coordinate_to_price(b.y);
    let (start, end) = match (start, end) {
        (Ok(start), Ok(end)) if start.is_finite() && end.is_finite() => (start, end),
        (Err(err), _) | (_, Err(err)) => {
            log::debug!("Change label omitted: {err:#}");
            return None;
        }
        _ => return None,
    };

    let delta = end - start;
    let decimals = ctx.config.price_decimals;
    if start == 0.0 {
        return Some(format!("{delta:+.decimals$}"));
    }
    let percent = delta / start * 100.0;
    Some(format!("{delta:+.decimals$} ({percent:+.2}%)"))
}

pub fn render_parallel_channel(
    drawing: &DrawingObject,
    _ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    match drawing.points[..] {
        [a, b, c, ..] => {
            let offset = c - a;
            let d = b + offset;
            out.push(segment(drawing, a, b));
            out.push(segment(drawing, c, d));
            out.push(dashed(drawing, a, c));
            out.push(dashed(drawing, b, d));
        }
        [a, b] => out.push(segment(drawing, a, b)),
        _ => {}
    }
}

pub fn render_flat_channel(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    match drawing.points[..] {
        [a, b, ..] => {
            out.push(Primitive::Band {
                top: a.y.min(b.y),
                bottom: a.y.max(b.y),
                color: drawing.color,
                opacity: ctx.config.channel_fill_opacity,
            });
            out.push(horizontal(drawing, a.y, ctx.surface));
            out.push(horizontal(drawing, b.y, ctx.surface));
        }
        [a] => out.push(horizontal(drawing, a.y, ctx.surface)),
        [] => {}
    }
}

/// Median ray from point 0 through the midpoint of points 1 and 2, tines
/// parallel to it from points 1 and 2, and the base joining points 1 and 2
pub fn render_pitchfork(
    drawing: &DrawingObject,
    ctx: &ShapeContext<'_>,
    out: &mut Vec<Primitive>,
) {
    match drawing.points[..] {
        [handle, left, right, ..] => {
            let bounds = ctx.surface.bounds();
            let mid = left.midpoint(right);
            let dir = mid - handle;

            let (from, to) = geometry::extend_ray(handle, mid, &bounds);
            out.push(segment(drawing, from, to));
            out.push(segment(drawing, left, right));
            if !dir.is_zero() {
                for tine in [left, right] {
                    let (from, to) = geometry::extend_ray(tine, tine + dir, &bounds);
                    out.push(segment(drawing, from, to));
                }
            }
        }
        [handle, left] => out.push(segment(drawing, handle, left)),
        _ => {}
    }
}
