//! Image rendering for drawings using tiny-skia
//!
//! Paints scene primitives onto an RgbaImage, either for the host to blit over
//! its chart or for saving to disk.

use ab_glyph::{Font, FontRef, ScaleFont, point};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke,
    StrokeDash, Transform,
};

use super::geometry::{self, dash, handle, label};
use super::shapes::Primitive;
use crate::config::ShapeColor;
use crate::domain::{Bounds, Point, SurfaceSize};

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
}

/// Blank canvas for a surface, None if the surface is empty
pub fn new_canvas(size: SurfaceSize, background: [u8; 4]) -> Option<RgbaImage> {
    let (w, h) = size.pixels()?;
    Some(RgbaImage::from_pixel(w, h, Rgba(background)))
}

fn paint_for(color: ShapeColor, alpha: f32) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8_with_alpha(alpha);
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke_for(width: f32, dashed: bool) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: if dashed {
            StrokeDash::new(dash::PATTERN.to_vec(), 0.0)
        } else {
            None
        },
        ..Default::default()
    }
}

fn polyline(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

fn rect_of(bounds: &Bounds) -> Option<Rect> {
    Rect::from_ltrb(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y)
}

/// Monospaced font embedded for label text
fn label_font() -> Option<FontRef<'static>> {
    match FontRef::try_from_slice(epaint_default_fonts::HACK_REGULAR) {
        Ok(font) => Some(font),
        Err(err) => {
            log::warn!("Label font unavailable, painting backdrops only: {err}");
            None
        }
    }
}

/// Source-over blend of one pixel of coverage onto premultiplied pixmap data
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, rgb: [u8; 4], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let a = coverage.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let index = (y as u32 * pixmap.width() + x as u32) as usize;
    let Some(dst) = pixmap.pixels_mut().get_mut(index) else {
        return;
    };

    let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
    let alpha = mix(255, dst.alpha());
    let r = mix(rgb[0], dst.red()).min(alpha);
    let g = mix(rgb[1], dst.green()).min(alpha);
    let b = mix(rgb[2], dst.blue()).min(alpha);
    if let Some(color) = PremultipliedColorU8::from_rgba(r, g, b, alpha) {
        *dst = color;
    }
}

/// Rasterize `text` left-aligned and vertically centred inside `backdrop`
fn draw_text(
    pixmap: &mut Pixmap,
    font: &FontRef<'_>,
    backdrop: &Bounds,
    text: &str,
    color: ShapeColor,
) {
    let scaled = font.as_scaled(label::FONT_SIZE);
    let baseline = backdrop.min_y + (backdrop.height() + scaled.ascent() + scaled.descent()) / 2.0;
    let mut caret = point(backdrop.min_x + label::PADDING, baseline);
    let rgb = color.to_rgba_u8();

    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        let Some(outlined) = scaled.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, coverage| {
            let px = x as i32 + bounds.min.x as i32;
            let py = y as i32 + bounds.min.y as i32;
            blend_pixel(pixmap, px, py, rgb, coverage);
        });
    }
}

fn paint_primitive(
    pixmap: &mut Pixmap,
    primitive: &Primitive,
    surface: &Bounds,
    font: Option<&FontRef<'_>>,
) {
    match primitive {
        Primitive::Segment {
            from,
            to,
            width,
            color,
            dashed,
        } => {
            if from == to {
                return;
            }
            if let Some(path) = polyline(&[*from, *to]) {
                let paint = paint_for(*color, 1.0);
                let stroke = stroke_for(*width, *dashed);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Primitive::Band {
            top,
            bottom,
            color,
            opacity,
        } => {
            let band = Bounds::new(
                surface.min_x,
                top.min(*bottom),
                surface.max_x,
                top.max(*bottom),
            );
            if let Some(rect) = rect_of(&band) {
                let paint = paint_for(*color, *opacity);
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
        Primitive::Arc {
            center,
            radius,
            start,
            sweep,
            width,
            color,
        } => {
            if *radius <= 0.0 || *sweep == 0.0 {
                return;
            }
            let points = geometry::arc_points(*center, *radius, *start, *sweep);
            if let Some(path) = polyline(&points) {
                let paint = paint_for(*color, 1.0);
                let stroke = stroke_for(*width, false);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Primitive::Handle {
            center,
            radius,
            fill,
            border,
        } => {
            let Some(path) = PathBuilder::from_circle(center.x, center.y, *radius) else {
                return;
            };
            pixmap.fill_path(
                &path,
                &paint_for(*fill, 1.0),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            let stroke = stroke_for(handle::BORDER, false);
            pixmap.stroke_path(
                &path,
                &paint_for(*border, 1.0),
                &stroke,
                Transform::identity(),
                None,
            );
        }
        Primitive::Label { anchor, text, color } => {
            let backdrop = geometry::label_box(*anchor, text, surface);
            if let Some(rect) = rect_of(&backdrop) {
                let paint = paint_for(*color, label::OPACITY);
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
            if let Some(font) = font {
                draw_text(pixmap, font, &backdrop, text, color.contrasting());
            }
        }
    }
}

/// Paint primitives onto an image in order, later ones on top
pub fn draw_primitives_on_image(img: &mut RgbaImage, primitives: &[Primitive]) {
    if primitives.is_empty() {
        return;
    }

    let surface = Bounds::new(0.0, 0.0, img.width() as f32, img.height() as f32);
    let font = primitives
        .iter()
        .any(|p| matches!(p, Primitive::Label { .. }))
        .then(label_font)
        .flatten();
    with_pixmap(img, |pixmap| {
        for primitive in primitives {
            paint_primitive(pixmap, primitive, &surface, font.as_ref());
        }
    });
}
