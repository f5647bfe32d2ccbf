//! Shared geometry calculations for drawings
//!
//! This module contains constants and the line extension math shared between
//! scene building, painting and hit testing.

use crate::domain::{Bounds, Point};

/// Handle (control point marker) constants
pub mod handle {
    /// Border width around a selected drawing's handles
    pub const BORDER: f32 = 1.5;
}

/// Label text and backdrop constants
pub mod label {
    /// Pixel size of the label font
    pub const FONT_SIZE: f32 = 11.0;
    /// Glyph advance of the monospaced label font at `FONT_SIZE`, rounded up
    pub const CHAR_WIDTH: f32 = 7.0;
    /// Backdrop box height
    pub const HEIGHT: f32 = 16.0;
    /// Horizontal padding inside the backdrop box
    pub const PADDING: f32 = 4.0;
    /// Backdrop alpha
    pub const OPACITY: f32 = 0.85;
}

/// Dashed connector constants
pub mod dash {
    /// Dash and gap lengths in pixels
    pub const PATTERN: [f32; 2] = [6.0, 4.0];
}

/// Arc flattening constants
pub mod arc {
    /// Segments used for a full turn; shorter arcs use a proportional share
    pub const SEGMENTS_PER_TURN: usize = 64;
}

/// Where a line crosses one side of the surface
#[derive(Clone, Copy, Debug)]
struct Crossing {
    t: f32,
    point: Point,
}

/// Entry and exit crossings of the infinite line `origin + t * dir` with `bounds`
///
/// Points are snapped exactly onto the side they cross. Returns None when the
/// line misses the bounds or `dir` is zero.
fn crossings(origin: Point, dir: Point, bounds: &Bounds) -> Option<(Crossing, Crossing)> {
    let mut enter: Option<Crossing> = None;
    let mut exit: Option<Crossing> = None;

    if dir.x != 0.0 {
        let (near, far) = if dir.x > 0.0 {
            (bounds.min_x, bounds.max_x)
        } else {
            (bounds.max_x, bounds.min_x)
        };
        let t_near = (near - origin.x) / dir.x;
        let t_far = (far - origin.x) / dir.x;
        enter = later(enter, Crossing {
            t: t_near,
            point: Point::new(near, origin.y + dir.y * t_near),
        });
        exit = earlier(exit, Crossing {
            t: t_far,
            point: Point::new(far, origin.y + dir.y * t_far),
        });
    } else if origin.x < bounds.min_x || origin.x > bounds.max_x {
        return None;
    }

    if dir.y != 0.0 {
        let (near, far) = if dir.y > 0.0 {
            (bounds.min_y, bounds.max_y)
        } else {
            (bounds.max_y, bounds.min_y)
        };
        let t_near = (near - origin.y) / dir.y;
        let t_far = (far - origin.y) / dir.y;
        enter = later(enter, Crossing {
            t: t_near,
            point: Point::new(origin.x + dir.x * t_near, near),
        });
        exit = earlier(exit, Crossing {
            t: t_far,
            point: Point::new(origin.x + dir.x * t_far, far),
        });
    } else if origin.y < bounds.min_y || origin.y > bounds.max_y {
        return None;
    }

    let (enter, exit) = (enter?, exit?);
    if enter.t > exit.t {
        return None;
    }
    Some((enter, exit))
}

fn later(current: Option<Crossing>, candidate: Crossing) -> Option<Crossing> {
    match current {
        Some(c) if c.t >= candidate.t => Some(c),
        _ => Some(candidate),
    }
}

fn earlier(current: Option<Crossing>, candidate: Crossing) -> Option<Crossing> {
    match current {
        Some(c) if c.t <= candidate.t => Some(c),
        _ => Some(candidate),
    }
}

/// Extend the line through `a` and `b` to both sides of `bounds`
///
/// Falls back to the plain segment when the points coincide or the line never
/// crosses the bounds.
pub fn extend_line(a: Point, b: Point, bounds: &Bounds) -> (Point, Point) {
    let dir = b - a;
    if dir.is_zero() {
        return (a, b);
    }
    match crossings(a, dir, bounds) {
        Some((enter, exit)) => (enter.point, exit.point),
        None => (a, b),
    }
}

/// Extend from `origin` through `through` up to the side of `bounds` it exits
///
/// The result always starts at `origin`. Falls back to the plain segment when
/// the points coincide or the ray never reaches the bounds.
pub fn extend_ray(origin: Point, through: Point, bounds: &Bounds) -> (Point, Point) {
    let dir = through - origin;
    if dir.is_zero() {
        return (origin, through);
    }
    match crossings(origin, dir, bounds) {
        Some((_, exit)) if exit.t >= 0.0 => (origin, exit.point),
        _ => (origin, through),
    }
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`
pub fn distance_to_line(p: Point, a: Point, b: Point) -> f32 {
    let seg = b - a;
    let len = seg.length();
    if len < 0.01 {
        return p.distance(a);
    }
    let cross = seg.x * (p.y - a.y) - seg.y * (p.x - a.x);
    cross.abs() / len
}

/// Angle of the direction from `from` to `to`, in degrees
pub fn angle_degrees(from: Point, to: Point) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}

/// Flatten a circular arc into a polyline
///
/// `start` and `sweep` are in radians; a negative sweep runs the other way.
pub fn arc_points(center: Point, radius: f32, start: f32, sweep: f32) -> Vec<Point> {
    let share = sweep.abs() / std::f32::consts::TAU;
    let segments = ((arc::SEGMENTS_PER_TURN as f32 * share).ceil() as usize).max(2);
    (0..=segments)
        .map(|i| {
            let a = start + sweep * i as f32 / segments as f32;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Whether `p` lies exactly on a side of `bounds`
pub fn on_boundary(p: Point, bounds: &Bounds) -> bool {
    p.x == bounds.min_x || p.x == bounds.max_x || p.y == bounds.min_y || p.y == bounds.max_y
}

/// Backdrop rectangle for a label centred on `anchor`, kept inside `surface`
pub fn label_box(anchor: Point, text: &str, surface: &Bounds) -> Bounds {
    let width = text.chars().count() as f32 * label::CHAR_WIDTH + label::PADDING * 2.0;
    let height = label::HEIGHT;
    let left = (anchor.x - width / 2.0)
        .min(surface.max_x - width)
        .max(surface.min_x);
    let top = (anchor.y - height / 2.0)
        .min(surface.max_y - height)
        .max(surface.min_y);
    Bounds::new(left, top, left + width, top + height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Bounds {
        Bounds::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_extend_line_hits_boundary() {
        let (a, b) = extend_line(Point::new(50.0, 50.0), Point::new(60.0, 55.0), &surface());
        assert!(on_boundary(a, &surface()));
        assert!(on_boundary(b, &surface()));
        assert_eq!(a, Point::new(0.0, 25.0));
        assert_eq!(b, Point::new(150.0, 100.0));
    }

    #[test]
    fn test_extend_line_vertical_and_horizontal() {
        let (a, b) = extend_line(Point::new(40.0, 10.0), Point::new(40.0, 20.0), &surface());
        assert_eq!((a, b), (Point::new(40.0, 0.0), Point::new(40.0, 100.0)));

        let (a, b) = extend_line(Point::new(30.0, 70.0), Point::new(10.0, 70.0), &surface());
        assert_eq!((a, b), (Point::new(200.0, 70.0), Point::new(0.0, 70.0)));
    }

    #[test]
    fn test_extend_line_degenerate_falls_back_to_segment() {
        let p = Point::new(20.0, 20.0);
        assert_eq!(extend_line(p, p, &surface()), (p, p));
    }

    #[test]
    fn test_extend_line_outside_surface_falls_back() {
        let a = Point::new(-10.0, 150.0);
        let b = Point::new(-5.0, 160.0);
        assert_eq!(extend_line(a, b, &surface()), (a, b));
    }

    #[test]
    fn test_ray_keeps_origin_and_direction() {
        let origin = Point::new(50.0, 50.0);
        let (start, end) = extend_ray(origin, Point::new(70.0, 50.0), &surface());
        assert_eq!(start, origin);
        assert_eq!(end, Point::new(200.0, 50.0));

        let (start, end) = extend_ray(origin, Point::new(40.0, 40.0), &surface());
        assert_eq!(start, origin);
        assert_eq!(end, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_ray_never_extends_behind_origin() {
        let origin = Point::new(20.0, 80.0);
        let (start, end) = extend_ray(origin, Point::new(30.0, 70.0), &surface());
        assert_eq!(start, origin);
        assert!(end.x >= origin.x);
        assert!(on_boundary(end, &surface()));
    }

    #[test]
    fn test_ray_zero_direction() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(extend_ray(p, p, &surface()), (p, p));
    }

    #[test]
    fn test_angle_degrees() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(angle_degrees(o, Point::new(10.0, 0.0)), 0.0);
        assert!((angle_degrees(o, Point::new(10.0, 10.0)) - 45.0).abs() < 1e-4);
        assert!((angle_degrees(o, Point::new(-10.0, 0.0)) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_arc_points_span() {
        let pts = arc_points(Point::new(0.0, 0.0), 10.0, 0.0, std::f32::consts::FRAC_PI_2);
        assert!(pts.len() >= 3);
        assert!((pts[0].x - 10.0).abs() < 1e-4);
        let last = pts[pts.len() - 1];
        assert!(last.x.abs() < 1e-4 && (last.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_label_box_stays_on_surface() {
        let bounds = surface();
        let right = label_box(Point::new(200.0, 50.0), "100.00", &bounds);
        assert_eq!(right.max_x, 200.0);
        assert_eq!(right.width(), 6.0 * label::CHAR_WIDTH + label::PADDING * 2.0);

        let corner = label_box(Point::new(3.0, 100.0), "x", &bounds);
        assert_eq!(corner.max_y, 100.0);
        assert_eq!(corner.min_x, 0.0);

        let centred = label_box(Point::new(100.0, 50.0), "ab", &bounds);
        assert_eq!(centred.min_x + centred.width() / 2.0, 100.0);
    }
}
