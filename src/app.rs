use std::path::{Path, PathBuf};

use eframe::egui;

use crate::annotation::{AnnotationStore, CORNERS};
use crate::config::ViewerConfig;
use crate::document::ImageDocument;
use crate::input::{InputController, InputEvent, Key, MouseButton, Targets};
use crate::render::Renderer;
use crate::viewport::{Viewport, ZoomDirection};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

pub fn window_title(file_name: Option<&str>) -> String {
    match file_name {
        Some(name) => format!("Image Viewer — {name}"),
        None => "Image Viewer".to_owned(),
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct ViewerApp {
    config: ViewerConfig,
    document: Option<ImageDocument>,
    texture: Option<egui::TextureHandle>,

    viewport: Viewport,
    annotations: AnnotationStore,
    controller: InputController,
    renderer: Renderer,

    max_scale_resolved: bool,
    /// Last canvas size sent as a resize; `None` forces one next frame.
    canvas_size: Option<egui::Vec2>,
    title_dirty: bool,
    last_export: Option<PathBuf>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig, image_path: Option<PathBuf>) -> Self {
        let viewport = Viewport::new(config.resolve_max_scale(None), config.zoom_step);
        let mut app = Self {
            controller: InputController::new(config.points_file_name.clone()),
            renderer: Renderer::new(config.overlay.clone()),
            config,
            document: None,
            texture: None,
            viewport,
            annotations: AnnotationStore::default(),
            max_scale_resolved: false,
            canvas_size: None,
            title_dirty: false,
            last_export: None,
        };
        if let Some(path) = image_path {
            app.load_image(&path);
        }
        app
    }

    fn load_image(&mut self, path: &Path) {
        match ImageDocument::open(path) {
            Ok(document) => self.install(document),
            Err(err) => tracing::error!(path = %path.display(), %err, "failed to load image"),
        }
    }

    /// Replace the current image and reset everything derived from it.
    fn install(&mut self, document: ImageDocument) {
        let (width, height) = document.size();
        self.viewport.set_image(width, height);
        self.annotations.set_bounds(width, height);
        self.controller.reset();
        self.texture = None;
        self.canvas_size = None;
        self.title_dirty = true;
        self.last_export = None;
        self.document = Some(document);
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_image(&path);
        }
    }

    /// The scale ceiling is fixed from the first known monitor width.
    fn resolve_max_scale(&mut self, ctx: &egui::Context) {
        if self.max_scale_resolved {
            return;
        }
        if let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) {
            let max_scale = self.config.resolve_max_scale(Some(monitor.x));
            self.viewport.set_max_scale(max_scale);
            self.max_scale_resolved = true;
            tracing::debug!(max_scale, "resolved scale ceiling");
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref document) = self.document {
            let rgba = document.pixels();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    /// Turn this frame's raw egui input into canvas-local viewer events.
    fn collect_events(&mut self, ctx: &egui::Context, response: &egui::Response) -> Vec<InputEvent> {
        let canvas = response.rect;
        let mut events = Vec::new();

        if self.canvas_size != Some(canvas.size()) {
            self.canvas_size = Some(canvas.size());
            events.push(InputEvent::Resize {
                width: canvas.width(),
                height: canvas.height(),
            });
        }

        let origin = canvas.min.to_vec2();
        let hovered = response.hovered();
        ctx.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed,
                        ..
                    } => {
                        let Some(button) = map_button(*button) else {
                            continue;
                        };
                        let pos = *pos - origin;
                        if !*pressed {
                            events.push(InputEvent::ButtonUp { button, pos });
                        } else if canvas.contains(pos + origin) {
                            events.push(InputEvent::ButtonDown { button, pos });
                        }
                    }
                    egui::Event::PointerMoved(pos) => {
                        events.push(InputEvent::ButtonMove { pos: *pos - origin });
                    }
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => events.push(InputEvent::KeyDown(map_key(*key))),
                    _ => {}
                }
            }

            let scroll = i.raw_scroll_delta.y;
            if hovered && scroll != 0.0 {
                if let Some(pos) = i.pointer.hover_pos() {
                    let direction = if scroll > 0.0 {
                        ZoomDirection::In
                    } else {
                        ZoomDirection::Out
                    };
                    events.push(InputEvent::Wheel {
                        pos: pos - origin,
                        direction,
                    });
                }
            }
        });
        events
    }

    fn dispatch(&mut self, ctx: &egui::Context, event: InputEvent) {
        let mut targets = Targets {
            viewport: &mut self.viewport,
            annotations: &mut self.annotations,
            image_dir: self.document.as_ref().and_then(ImageDocument::directory),
        };
        let outcome = self.controller.dispatch(event, &mut targets);
        if let Some(path) = outcome.exported {
            self.last_export = Some(path);
        }
        if outcome.redraw {
            ctx.request_repaint();
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                self.open_dialog();
            }
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", self.viewport.scale() * 100.0));
            ui.separator();
            let picked = self.annotations.len().min(CORNERS);
            if self.annotations.is_closed() {
                ui.label(format!("Points: {picked}/{CORNERS} (closed, Enter to save)"));
            } else {
                ui.label(format!("Points: {picked}/{CORNERS}"));
            }
            if let Some(ref path) = self.last_export {
                ui.separator();
                ui.label(format!("Saved {}", path.display()));
            }
        });
    }
}

fn map_button(button: egui::PointerButton) -> Option<MouseButton> {
    match button {
        egui::PointerButton::Primary => Some(MouseButton::Left),
        egui::PointerButton::Secondary => Some(MouseButton::Right),
        egui::PointerButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

fn map_key(key: egui::Key) -> Key {
    match key {
        egui::Key::Enter => Key::Enter,
        egui::Key::Escape => Key::Escape,
        _ => Key::Other,
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.resolve_max_scale(ctx);
        self.ensure_texture(ctx);

        if self.title_dirty {
            let title = window_title(self.document.as_ref().and_then(ImageDocument::file_name));
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
            self.title_dirty = false;
        }

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::O)) {
            self.open_dialog();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

            for event in self.collect_events(ctx, &response) {
                self.dispatch(ctx, event);
            }
            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            self.renderer.draw(
                &painter,
                response.rect,
                self.texture.as_ref(),
                &mut self.viewport,
                &self.annotations,
            );
        });
    }
}
