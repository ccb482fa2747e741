//! Screen <-> image mapping with scale bounds and edge clamping.
//!
//! `screen = image * scale + offset`. Screen positions are relative to the
//! top-left corner of the canvas the image is drawn in.
//!
//! Picks are valid on the inclusive span `[0, width-1] x [0, height-1]` and
//! the scale floor measures the image by that span. The display clamp works
//! on the drawn raster, `width x height` scaled pixels, so the last row and
//! column can always be panned into view. Images one pixel wide or tall have
//! no span and are never fitted; every mutation on them is a no-op.

use egui::{Pos2, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Where a pan gesture started and the offset at that moment.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PanAnchor {
    press: Pos2,
    offset: Vec2,
}

#[derive(Clone, Debug)]
pub struct Viewport {
    /// Pixel dimensions of the current image, if one is set.
    image_size: Option<Vec2>,
    /// Zero until the first resize after an image is set.
    scale: f32,
    min_scale: f32,
    max_scale: f32,
    zoom_step: f32,
    offset: Vec2,
    pan: Option<PanAnchor>,
}

impl Viewport {
    pub fn new(max_scale: f32, zoom_step: f32) -> Self {
        Self {
            image_size: None,
            scale: 0.0,
            min_scale: 0.0,
            max_scale: max_scale.max(1.0),
            zoom_step,
            offset: Vec2::ZERO,
            pan: None,
        }
    }

    /// Start over for a freshly loaded image. The next resize fits it.
    pub fn set_image(&mut self, width: u32, height: u32) {
        self.image_size = Some(Vec2::new(width as f32, height as f32));
        self.scale = 0.0;
        self.min_scale = 0.0;
        self.offset = Vec2::ZERO;
        self.pan = None;
        if !self.is_displayable() {
            tracing::warn!(width, height, "image too small to display");
        }
    }

    pub fn clear_image(&mut self) {
        self.image_size = None;
        self.scale = 0.0;
        self.min_scale = 0.0;
        self.offset = Vec2::ZERO;
        self.pan = None;
    }

    /// Fix the scale ceiling for the session.
    pub fn set_max_scale(&mut self, max_scale: f32) {
        self.max_scale = max_scale.max(1.0);
        if self.scale > self.max_scale {
            self.scale = self.max_scale;
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn is_displayable(&self) -> bool {
        self.extent().is_some()
    }

    /// Displayable and sized for a window at least once.
    pub fn is_fitted(&self) -> bool {
        self.is_displayable() && self.scale > 0.0
    }

    fn extent(&self) -> Option<Vec2> {
        self.image_size
            .filter(|s| s.x > 1.0 && s.y > 1.0)
            .map(|s| s - Vec2::splat(1.0))
    }

    /// Convert screen-space coords to image-space. No bounds check.
    pub fn screen_to_image(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    /// Convert image-space coords to screen-space.
    pub fn image_to_screen(&self, image: Pos2) -> Pos2 {
        (image.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// Screen rectangle covered by the whole raster at the current transform.
    pub fn image_rect(&self) -> Option<Rect> {
        if !self.is_fitted() {
            return None;
        }
        let size = self.image_size?;
        Some(Rect::from_min_size(self.offset.to_pos2(), size * self.scale))
    }

    pub fn on_resize(&mut self, window_width: f32, window_height: f32) {
        let Some(extent) = self.extent() else {
            return;
        };
        if window_width <= 0.0 || window_height <= 0.0 {
            return;
        }
        let ratio_w = window_width / extent.x;
        let ratio_h = window_height / extent.y;
        if ratio_w >= 1.0 && ratio_h >= 1.0 {
            // Fits at native size: never shrink below 1:1.
            self.min_scale = 1.0;
            self.scale = 1.0;
        } else {
            self.min_scale = ratio_w.min(ratio_h);
            self.scale = self.scale.max(self.min_scale);
        }
        tracing::debug!(
            window_width,
            window_height,
            scale = self.scale,
            min_scale = self.min_scale,
            "viewport resized"
        );
    }

    /// Zoom one step around `pivot`, keeping the image point under it fixed.
    pub fn on_zoom(&mut self, pivot: Pos2, direction: ZoomDirection) {
        if !self.is_fitted() {
            return;
        }
        let anchor = self.screen_to_image(pivot);
        let scale = match direction {
            ZoomDirection::In => self.scale * self.zoom_step,
            ZoomDirection::Out => self.scale / self.zoom_step,
        };
        self.scale = scale.max(self.min_scale).min(self.max_scale);
        self.offset = pivot.to_vec2() - anchor.to_vec2() * self.scale;
        if let Some(pan) = &mut self.pan {
            *pan = PanAnchor {
                press: pivot,
                offset: self.offset,
            };
        }
        tracing::debug!(scale = self.scale, ?direction, "zoom");
    }

    pub fn on_pan_start(&mut self, screen: Pos2) {
        if !self.is_fitted() {
            return;
        }
        self.pan = Some(PanAnchor {
            press: screen,
            offset: self.offset,
        });
    }

    pub fn on_pan_move(&mut self, screen: Pos2) {
        if let Some(anchor) = self.pan {
            self.offset = anchor.offset + (screen - anchor.press);
        }
    }

    pub fn on_pan_end(&mut self) {
        self.pan = None;
    }

    /// Center the image on any axis where it is smaller than the window,
    /// otherwise keep the window covered edge to edge. Run once per redraw.
    pub fn clamp_for_display(&mut self, window_width: f32, window_height: f32) {
        if !self.is_fitted() {
            return;
        }
        let Some(size) = self.image_size else {
            return;
        };
        let shown = size * self.scale;
        self.offset.x = clamp_axis(self.offset.x, shown.x, window_width);
        self.offset.y = clamp_axis(self.offset.y, shown.y, window_height);
    }
}

fn clamp_axis(offset: f32, shown: f32, window: f32) -> f32 {
    if shown < window {
        window / 2.0 - shown / 2.0
    } else if offset > 0.0 {
        0.0
    } else if shown + offset < window {
        window - shown
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use egui::pos2;

    fn fitted(image: (u32, u32), window: (f32, f32)) -> Viewport {
        let mut viewport = Viewport::new(384.0, 1.2);
        viewport.set_image(image.0, image.1);
        viewport.on_resize(window.0, window.1);
        viewport
    }

    #[test]
    fn large_image_fits_window() {
        let viewport = fitted((800, 600), (400.0, 300.0));
        assert_relative_eq!(viewport.min_scale(), 400.0 / 799.0);
        assert_relative_eq!(viewport.scale(), viewport.min_scale());
    }

    #[test]
    fn small_image_stays_native() {
        let viewport = fitted((100, 100), (400.0, 300.0));
        assert_eq!(viewport.min_scale(), 1.0);
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn resize_keeps_zoom_above_new_floor() {
        let mut viewport = fitted((800, 600), (400.0, 300.0));
        for _ in 0..3 {
            viewport.on_zoom(pos2(10.0, 10.0), ZoomDirection::In);
        }
        let zoomed = viewport.scale();

        viewport.on_resize(600.0, 450.0);
        assert_relative_eq!(viewport.scale(), zoomed);

        // Floor rises past the current zoom and pulls it up.
        viewport.on_resize(790.0, 590.0);
        assert_relative_eq!(viewport.scale(), 590.0 / 599.0);
    }

    #[test]
    fn zoom_in_around_pivot() {
        let mut viewport = fitted((100, 100), (400.0, 300.0));
        assert_eq!(viewport.screen_to_image(pos2(50.0, 50.0)), pos2(50.0, 50.0));

        viewport.on_zoom(pos2(50.0, 50.0), ZoomDirection::In);
        assert_relative_eq!(viewport.scale(), 1.2);
        assert_relative_eq!(viewport.offset().x, -10.0, epsilon = 1e-4);
        assert_relative_eq!(viewport.offset().y, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn zoom_keeps_pivot_anchored() {
        let mut viewport = fitted((1000, 800), (500.0, 400.0));
        let pivots = [pos2(0.0, 0.0), pos2(123.0, 77.0), pos2(499.0, 399.0), pos2(250.0, 10.0)];
        for (i, pivot) in pivots.iter().cycle().take(40).enumerate() {
            let direction = if i % 7 < 4 { ZoomDirection::In } else { ZoomDirection::Out };
            let before = viewport.screen_to_image(*pivot);
            viewport.on_zoom(*pivot, direction);
            let after = viewport.screen_to_image(*pivot);
            assert_relative_eq!(before.x, after.x, epsilon = 1e-2, max_relative = 1e-4);
            assert_relative_eq!(before.y, after.y, epsilon = 1e-2, max_relative = 1e-4);
        }
    }

    #[test]
    fn zoom_stays_within_bounds() {
        let mut viewport = fitted((800, 600), (400.0, 300.0));
        viewport.set_max_scale(4.0);
        for _ in 0..50 {
            viewport.on_zoom(pos2(200.0, 150.0), ZoomDirection::In);
            assert!(viewport.scale() <= viewport.max_scale());
        }
        assert_eq!(viewport.scale(), 4.0);
        for _ in 0..50 {
            viewport.on_zoom(pos2(200.0, 150.0), ZoomDirection::Out);
            assert!(viewport.scale() >= viewport.min_scale());
        }
        assert_eq!(viewport.scale(), viewport.min_scale());
    }

    #[test]
    fn pan_is_relative_to_press() {
        let mut viewport = fitted((1000, 1000), (400.0, 300.0));
        viewport.on_zoom(pos2(0.0, 0.0), ZoomDirection::In);
        let start = viewport.offset();

        viewport.on_pan_start(pos2(100.0, 100.0));
        viewport.on_pan_move(pos2(90.0, 80.0));
        viewport.on_pan_move(pos2(70.0, 60.0));
        assert_eq!(viewport.offset(), start + Vec2::new(-30.0, -40.0));

        viewport.on_pan_end();
        viewport.on_pan_move(pos2(0.0, 0.0));
        assert_eq!(viewport.offset(), start + Vec2::new(-30.0, -40.0));
    }

    #[test]
    fn pan_is_not_clamped_mid_gesture() {
        let mut viewport = fitted((1000, 1000), (300.0, 300.0));
        viewport.on_zoom(pos2(0.0, 0.0), ZoomDirection::In);
        viewport.on_pan_start(pos2(0.0, 0.0));
        viewport.on_pan_move(pos2(500.0, 500.0));
        assert_eq!(viewport.offset(), Vec2::new(500.0, 500.0));

        viewport.clamp_for_display(300.0, 300.0);
        assert_eq!(viewport.offset(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn clamp_centers_short_axis() {
        let mut viewport = fitted((100, 50), (400.0, 300.0));
        viewport.clamp_for_display(400.0, 300.0);
        assert_eq!(viewport.offset(), Vec2::new(150.0, 125.0));

        let drawn = viewport.image_rect().unwrap();
        assert_eq!(drawn.center(), pos2(200.0, 150.0));
    }

    #[test]
    fn clamp_aligns_far_edge() {
        let mut viewport = fitted((1001, 1001), (400.0, 400.0));
        viewport.set_max_scale(10.0);
        viewport.on_zoom(pos2(0.0, 0.0), ZoomDirection::In);
        viewport.on_pan_start(pos2(0.0, 0.0));
        viewport.on_pan_move(pos2(-5000.0, -5000.0));
        viewport.clamp_for_display(400.0, 400.0);

        let shown = 1001.0 * viewport.scale();
        assert_relative_eq!(viewport.offset().x, 400.0 - shown);
        assert_relative_eq!(viewport.offset().y, 400.0 - shown);

        let drawn = viewport.image_rect().unwrap();
        assert_relative_eq!(drawn.max.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(drawn.max.y, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn last_pixel_is_reachable_at_high_zoom() {
        let mut viewport = fitted((100, 100), (300.0, 300.0));
        for _ in 0..13 {
            viewport.on_zoom(pos2(150.0, 150.0), ZoomDirection::In);
        }
        viewport.on_pan_start(pos2(0.0, 0.0));
        viewport.on_pan_move(pos2(-1.0e6, -1.0e6));
        viewport.clamp_for_display(300.0, 300.0);

        let drawn = viewport.image_rect().unwrap();
        assert_relative_eq!(drawn.max.x, 300.0, epsilon = 1e-2);
        assert_relative_eq!(drawn.max.y, 300.0, epsilon = 1e-2);

        let corner = viewport.screen_to_image(pos2(299.5, 299.5));
        assert!(corner.x > 99.0 && corner.y > 99.0, "far pixel hidden: {corner:?}");
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut viewport = fitted((800, 600), (400.0, 300.0));
        viewport.on_zoom(pos2(300.0, 20.0), ZoomDirection::In);
        viewport.on_pan_start(pos2(0.0, 0.0));
        viewport.on_pan_move(pos2(37.0, -400.0));

        viewport.clamp_for_display(400.0, 300.0);
        let first = viewport.offset();
        viewport.clamp_for_display(400.0, 300.0);
        assert_eq!(first, viewport.offset());
    }

    #[test]
    fn degenerate_image_is_never_fitted() {
        for (w, h) in [(0, 0), (1, 500), (500, 1)] {
            let mut viewport = fitted((w, h), (400.0, 300.0));
            viewport.on_zoom(pos2(10.0, 10.0), ZoomDirection::In);
            viewport.clamp_for_display(400.0, 300.0);
            assert!(!viewport.is_displayable());
            assert_eq!(viewport.scale(), 0.0);
            assert_eq!(viewport.offset(), Vec2::ZERO);
            assert!(viewport.image_rect().is_none());
        }
    }

    #[test]
    fn unfitted_viewport_ignores_gestures() {
        let mut viewport = Viewport::new(384.0, 1.2);
        viewport.set_image(800, 600);
        viewport.on_zoom(pos2(10.0, 10.0), ZoomDirection::In);
        viewport.on_pan_start(pos2(0.0, 0.0));
        viewport.on_pan_move(pos2(50.0, 50.0));
        assert_eq!(viewport.scale(), 0.0);
        assert_eq!(viewport.offset(), Vec2::ZERO);
    }

    #[test]
    fn zero_window_is_ignored() {
        let mut viewport = fitted((800, 600), (400.0, 300.0));
        let before = viewport.scale();
        viewport.on_resize(0.0, 0.0);
        assert_eq!(viewport.scale(), before);
        assert!(viewport.min_scale() > 0.0);
    }
}
