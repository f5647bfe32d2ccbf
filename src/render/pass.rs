//! Render pass: turns the store and the in-progress drawing into a frame
//!
//! Painting is idempotent. A frame is only repainted when the annotator's
//! revision or the surface size changed since the last one.

use image::RgbaImage;

use super::image::{draw_primitives_on_image, new_canvas};
use super::shapes::{Primitive, ShapeContext, build_primitives};
use crate::config::AnnotatorConfig;
use crate::core::engine::Annotator;
use crate::core::host::ChartHost;
use crate::domain::{DrawingObject, Point, SurfaceSize};

/// Chart background behind the drawings
pub const DEFAULT_BACKGROUND: [u8; 4] = [19, 23, 34, 255];

/// Everything visible in one frame, in paint order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub size: SurfaceSize,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// Label texts and anchors, for hosts that draw their own text
    pub fn labels(&self) -> impl Iterator<Item = (Point, &str)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { anchor, text, .. } => Some((*anchor, text.as_str())),
            _ => None,
        })
    }
}

/// Scene for committed drawings in store order, then the drawing in progress
pub fn build_scene(
    drawings: &[DrawingObject],
    in_progress: Option<&DrawingObject>,
    host: &dyn ChartHost,
    config: &AnnotatorConfig,
) -> Scene {
    let ctx = ShapeContext::new(host, config);
    let primitives = drawings
        .iter()
        .chain(in_progress)
        .flat_map(|drawing| build_primitives(drawing, &ctx))
        .collect();
    Scene {
        size: ctx.surface,
        primitives,
    }
}

/// Cached frame for one annotator
#[derive(Debug)]
pub struct RenderPass {
    background: [u8; 4],
    painted: Option<(u64, SurfaceSize)>,
    frame: Option<RgbaImage>,
}

impl Default for RenderPass {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND)
    }
}

impl RenderPass {
    pub fn new(background: [u8; 4]) -> Self {
        Self {
            background,
            painted: None,
            frame: None,
        }
    }

    /// Scene for the annotator's current state
    pub fn scene(annotator: &Annotator, host: &dyn ChartHost) -> Scene {
        build_scene(
            annotator.drawings(),
            annotator.in_progress(),
            host,
            annotator.config(),
        )
    }

    /// Whether the last frame is stale
    pub fn is_dirty(&self, annotator: &Annotator, host: &dyn ChartHost) -> bool {
        self.painted != Some((annotator.revision(), host.surface_size()))
    }

    /// Repaint the whole frame unconditionally
    pub fn render(&mut self, annotator: &Annotator, host: &dyn ChartHost) -> Option<&RgbaImage> {
        let scene = Self::scene(annotator, host);
        self.painted = Some((annotator.revision(), scene.size));

        let Some(mut frame) = new_canvas(scene.size, self.background) else {
            log::debug!("Skipping paint of empty surface {:?}", scene.size);
            self.frame = None;
            return None;
        };
        draw_primitives_on_image(&mut frame, &scene.primitives);
        log::trace!(
            "Painted {} primitives at revision {}",
            scene.primitives.len(),
            annotator.revision()
        );
        self.frame = Some(frame);
        self.frame.as_ref()
    }

    /// Repaint only when something changed; None when the frame is current
    pub fn render_if_dirty(
        &mut self,
        annotator: &Annotator,
        host: &dyn ChartHost,
    ) -> Option<&RgbaImage> {
        if !self.is_dirty(annotator, host) {
            return None;
        }
        self.render(annotator, host)
    }

    /// Last painted frame
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }
}
