//! `StarApp`: the eframe host.
//!
//! - `overlay`: egui implementation of the presentation adapter
//! - `debug`: F3 state overlay
//!
//! Each egui frame: translate raw input into [`InputEvent`]s, dispatch them,
//! paint the frame list, then the overlays, and ask for the next repaint.
//! egui events carry no timestamps, so each frame's moves are coalesced into
//! a single sample stamped with the frame time.

pub mod debug;
pub mod overlay;

use std::time::Instant;

use eframe::egui;
use glam::Vec2;

use stellate::config::StarConfig;
use stellate::geometry::Viewport;
use stellate::input::{coalesce_moves, InputEvent};
use stellate::interaction::{StarController, StartupError};
use stellate::render::painter::{paint_frame, Theme};

use self::overlay::EguiPresenter;

// ─── Application state ───────────────────────────────────────────────────────

pub struct StarApp {
    controller: StarController<EguiPresenter>,
    dark_mode: bool,
    show_debug: bool,
    /// Last (width, height, pixels_per_point) handed to the controller
    last_surface: Option<(f32, f32, f32)>,
    /// A finger is down; emulated pointer events are ignored meanwhile
    touch_id: Option<egui::TouchId>,
}

impl StarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: StarConfig) -> Result<Self, StartupError> {
        let size = cc.egui_ctx.screen_rect().size();
        let viewport = if size.x > 0.0 && size.y > 0.0 {
            Viewport::new(size.x, size.y, cc.egui_ctx.pixels_per_point())
        } else {
            Viewport::default()
        };
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let controller = StarController::new(config, EguiPresenter::new(), viewport)?;
        Ok(Self {
            controller,
            dark_mode: true,
            show_debug: false,
            last_surface: None,
            touch_id: None,
        })
    }

    /// Raw egui events → core input events, canvas-relative.
    fn collect_input(&mut self, ctx: &egui::Context, canvas: egui::Rect, layer: egui::LayerId) -> Vec<InputEvent> {
        let origin = canvas.min;
        let local = |p: egui::Pos2| Vec2::new(p.x - origin.x, p.y - origin.y);
        // Presses over another egui layer (the legend) belong to that layer
        let on_canvas = |p: egui::Pos2| ctx.layer_id_at(p).map_or(true, |l| l == layer);

        let events = ctx.input(|i| i.events.clone());
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => match phase {
                    egui::TouchPhase::Start if self.touch_id.is_none() && on_canvas(pos) => {
                        self.touch_id = Some(id);
                        out.push(InputEvent::TouchStart(local(pos)));
                    }
                    egui::TouchPhase::Move if self.touch_id == Some(id) => {
                        out.push(InputEvent::TouchMove(local(pos)));
                    }
                    egui::TouchPhase::End | egui::TouchPhase::Cancel if self.touch_id == Some(id) => {
                        self.touch_id = None;
                        out.push(InputEvent::TouchEnd);
                    }
                    _ => {}
                },
                _ if self.touch_id.is_some() => {}
                egui::Event::PointerMoved(pos) => out.push(InputEvent::PointerMove(local(pos))),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if !pressed {
                        out.push(InputEvent::PointerUp);
                    } else if on_canvas(pos) {
                        out.push(InputEvent::PointerDown(local(pos)));
                    }
                }
                egui::Event::PointerGone => out.push(InputEvent::PointerLeave),
                _ => {}
            }
        }
        coalesce_moves(out)
    }

    fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::night()
        } else {
            Theme::paper()
        }
    }
}

impl eframe::App for StarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if ctx.input(|i| i.key_pressed(egui::Key::F3)) {
            self.show_debug = !self.show_debug;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F2)) {
            self.dark_mode = !self.dark_mode;
            ctx.set_visuals(if self.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
        }
        let theme = self.theme();

        if let Some(index) = self.controller.presenter_mut().show_legend(ctx, &theme) {
            self.controller.activate_vertex(index, now);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let canvas = ui.max_rect();
                let surface = (canvas.width(), canvas.height(), ctx.pixels_per_point());
                if self.last_surface != Some(surface) {
                    self.last_surface = Some(surface);
                    self.controller.handle(
                        InputEvent::Resize {
                            width: surface.0,
                            height: surface.1,
                            pixel_density: surface.2,
                        },
                        now,
                    );
                }

                for event in self.collect_input(ctx, canvas, ui.layer_id()) {
                    self.controller.handle(event, now);
                }

                let list = self.controller.frame(now);
                paint_frame(ui.painter(), canvas, &list, &theme);
                self.controller
                    .presenter_mut()
                    .show_overlays(ctx, canvas, &theme, now);
            });

        if self.show_debug {
            let open_menus = self.controller.presenter().open_menu_count();
            debug::show(ctx, &self.controller.debug_snapshot(now), open_menus);
        }

        // The star never stops moving: repaint at display rate
        ctx.request_repaint();
    }
}
