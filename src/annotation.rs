//! Ordered corner picks in image space.
//!
//! Up to four picked points; releasing the fourth closes the loop by
//! appending a copy of the first, for five entries total. A pick on a closed
//! loop starts a new sequence.

use egui::Pos2;

/// Number of corners in a complete quadrilateral.
pub const CORNERS: usize = 4;

#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    points: Vec<Pos2>,
    /// Largest valid coordinate on each axis: `(width-1, height-1)`.
    limit: Option<(f32, f32)>,
}

impl AnnotationStore {
    pub fn new(width: u32, height: u32) -> Self {
        let mut store = Self::default();
        store.set_bounds(width, height);
        store
    }

    /// Adopt the bounds of a newly loaded image and drop every point.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.points.clear();
        self.limit = (width > 0 && height > 0)
            .then(|| ((width - 1) as f32, (height - 1) as f32));
    }

    pub fn contains(&self, p: Pos2) -> bool {
        match self.limit {
            Some((max_x, max_y)) => (0.0..=max_x).contains(&p.x) && (0.0..=max_y).contains(&p.y),
            None => false,
        }
    }

    /// Append a pick. Returns `false` (and changes nothing) when out of bounds.
    pub fn begin_point(&mut self, p: Pos2) -> bool {
        if !self.contains(p) {
            return false;
        }
        if self.is_closed() {
            self.points.clear();
        }
        self.points.push(p);
        true
    }

    /// Move the point being placed. Out-of-bounds positions keep the old value.
    pub fn update_last_point(&mut self, p: Pos2) {
        if !self.contains(p) || self.is_closed() {
            return;
        }
        if let Some(last) = self.points.last_mut() {
            *last = p;
        }
    }

    /// Finish the current pick; closes the loop once four corners exist.
    pub fn end_point(&mut self) {
        if self.points.len() == CORNERS {
            self.points.push(self.points[0]);
            tracing::info!(points = ?&self.points[..CORNERS], "corner loop closed");
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() == CORNERS + 1
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The four corners, once the loop is closed.
    pub fn corners(&self) -> Option<&[Pos2]> {
        self.is_closed().then(|| &self.points[..CORNERS])
    }
}
