use egui::{Color32, Painter, Pos2, Rect, Stroke, TextureHandle};

use crate::annotation::AnnotationStore;
use crate::config::OverlayStyle;
use crate::viewport::Viewport;

/// One overlay primitive in canvas-local screen space, in paint order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayShape {
    Marker(Pos2),
    Segment(Pos2, Pos2),
}

/// Lay out the point overlay. Every segment is followed by markers for both
/// of its ends so they sit on top of the line; later shapes cover earlier ones.
pub fn overlay_shapes(points: &[Pos2], viewport: &Viewport) -> Vec<OverlayShape> {
    let mut shapes = Vec::with_capacity(points.len() * 3);
    let mut previous: Option<Pos2> = None;
    for p in points {
        let current = viewport.image_to_screen(*p);
        match previous {
            None => shapes.push(OverlayShape::Marker(current)),
            Some(before) => {
                shapes.push(OverlayShape::Segment(before, current));
                shapes.push(OverlayShape::Marker(current));
                shapes.push(OverlayShape::Marker(before));
            }
        }
        previous = Some(current);
    }
    shapes
}

pub struct Renderer {
    style: OverlayStyle,
}

impl Renderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Paint one frame into `canvas`. Clamps the viewport for the canvas size first.
    pub fn draw(
        &self,
        painter: &Painter,
        canvas: Rect,
        texture: Option<&TextureHandle>,
        viewport: &mut Viewport,
        annotations: &AnnotationStore,
    ) {
        let painter = painter.with_clip_rect(canvas);
        painter.rect_filled(canvas, 0.0, Color32::from_gray(self.style.background_gray));

        viewport.clamp_for_display(canvas.width(), canvas.height());
        let origin = canvas.min.to_vec2();

        if let (Some(tex), Some(img_rect)) = (texture, viewport.image_rect()) {
            painter.image(
                tex.id(),
                img_rect.translate(origin),
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let marker = self.style.marker_color.to_egui();
        let line = Stroke::new(self.style.line_width, self.style.line_color.to_egui());
        for shape in overlay_shapes(annotations.points(), viewport) {
            match shape {
                OverlayShape::Marker(p) => {
                    painter.circle_filled(p + origin, self.style.marker_radius, marker);
                }
                OverlayShape::Segment(a, b) => {
                    painter.line_segment([a + origin, b + origin], line);
                }
            }
        }
    }
}
