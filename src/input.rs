//! Decoded input events and the interaction state machine that routes them.
//!
//! Left button pans, right button places corner points, the wheel zooms
//! around the pointer. Enter saves a closed loop, Escape drops all points.

use std::path::{Path, PathBuf};

use egui::Pos2;

use crate::annotation::AnnotationStore;
use crate::export;
use crate::viewport::{Viewport, ZoomDirection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// Positions are screen-space, relative to the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Resize { width: f32, height: f32 },
    Wheel { pos: Pos2, direction: ZoomDirection },
    ButtonDown { button: MouseButton, pos: Pos2 },
    ButtonMove { pos: Pos2 },
    ButtonUp { button: MouseButton, pos: Pos2 },
    KeyDown(Key),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Left button held.
    Panning,
    /// Right button held over the point being placed.
    Pointing,
}

/// Everything an event may mutate, borrowed for one dispatch.
pub struct Targets<'a> {
    pub viewport: &'a mut Viewport,
    pub annotations: &'a mut AnnotationStore,
    /// Directory of the loaded image, if it came from a file.
    pub image_dir: Option<&'a Path>,
}

#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub redraw: bool,
    pub exported: Option<PathBuf>,
}

pub struct InputController {
    state: Interaction,
    points_file_name: String,
}

impl InputController {
    pub fn new(points_file_name: impl Into<String>) -> Self {
        Self {
            state: Interaction::Idle,
            points_file_name: points_file_name.into(),
        }
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    /// Drop any gesture in progress, e.g. when a new image replaces the old one.
    pub fn reset(&mut self) {
        self.state = Interaction::Idle;
    }

    pub fn dispatch(&mut self, event: InputEvent, targets: &mut Targets<'_>) -> Outcome {
        use self::InputEvent::*;
        use self::Interaction::*;

        let mut outcome = Outcome {
            redraw: true,
            exported: None,
        };
        let before = self.state;

        match (self.state, event) {
            (_, Resize { width, height }) => targets.viewport.on_resize(width, height),
            (_, Wheel { pos, direction }) => targets.viewport.on_zoom(pos, direction),

            (Idle, ButtonDown { button: MouseButton::Left, pos }) => {
                targets.viewport.on_pan_start(pos);
                self.state = Panning;
            }
            (Panning, ButtonMove { pos }) => targets.viewport.on_pan_move(pos),
            (Panning, ButtonUp { button: MouseButton::Left, .. }) => {
                targets.viewport.on_pan_end();
                self.state = Idle;
            }

            (Idle, ButtonDown { button: MouseButton::Right, pos }) => {
                if !targets.viewport.is_fitted() {
                    outcome.redraw = false;
                } else if targets
                    .annotations
                    .begin_point(targets.viewport.screen_to_image(pos))
                {
                    self.state = Pointing;
                } else {
                    outcome.redraw = false;
                }
            }
            (Pointing, ButtonMove { pos }) => {
                let image_pos = targets.viewport.screen_to_image(pos);
                targets.annotations.update_last_point(image_pos);
            }
            (Pointing, ButtonUp { button: MouseButton::Right, .. }) => {
                targets.annotations.end_point();
                self.state = Idle;
            }

            (_, KeyDown(Key::Enter)) => {
                outcome.redraw = false;
                if targets.annotations.is_closed() {
                    match export::export_corners(targets.annotations, targets.image_dir, &self.points_file_name) {
                        Ok(path) => outcome.exported = Some(path),
                        Err(err) => tracing::warn!(%err, "export skipped"),
                    }
                } else {
                    tracing::debug!(count = targets.annotations.len(), "enter ignored, loop not closed");
                }
            }
            (state, KeyDown(Key::Escape)) => {
                if state == Panning {
                    targets.viewport.on_pan_end();
                }
                targets.annotations.clear();
                self.state = Idle;
            }

            _ => outcome.redraw = false,
        }

        if before != self.state {
            tracing::debug!(from = ?before, to = ?self.state, "interaction");
        }
        outcome
    }
}
