//! `EguiPresenter`: legend, menus, toasts and ripples drawn with egui.
//!
//! Menus are painted on a foreground layer without egui widgets: the core
//! hit-tests their items through [`Presenter::item_bounds`], so the layout
//! here is fixed-size and computable without a font pass.

use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke};
use glam::{Vec2, Vec3};
use url::Url;

use stellate::presentation::{ItemBounds, MenuHandle, Presenter};
use stellate::render::painter::{fade, Theme};
use stellate::scene::{LegendEntry, MenuDescriptor};

const MENU_OFFSET: Vec2 = Vec2::new(18.0, -12.0);
const MENU_WIDTH: f32 = 180.0;
const TITLE_HEIGHT: f32 = 26.0;
const ROW_HEIGHT: f32 = 24.0;
const MENU_FADE: Duration = Duration::from_millis(150);
const TOAST_LIFETIME: Duration = Duration::from_millis(3000);
const RIPPLE_LIFETIME: Duration = Duration::from_millis(600);
const RIPPLE_RADIUS: f32 = 40.0;

struct MenuView {
    handle: MenuHandle,
    vertex: usize,
    descriptor: MenuDescriptor,
    /// Canvas-relative anchor, set by the first reposition
    at: Option<Vec2>,
    since: Instant,
}

impl MenuView {
    fn origin(&self) -> Option<Vec2> {
        self.at.map(|a| a + MENU_OFFSET)
    }

    fn bounds(&self) -> Vec<ItemBounds> {
        let Some(o) = self.origin() else {
            return Vec::new();
        };
        (0..self.descriptor.items.len())
            .map(|i| {
                let top = o.y + TITLE_HEIGHT + i as f32 * ROW_HEIGHT;
                ItemBounds {
                    index: i,
                    left: o.x,
                    right: o.x + MENU_WIDTH,
                    top,
                    bottom: top + ROW_HEIGHT,
                    depth: None,
                }
            })
            .collect()
    }
}

struct Toast {
    text: String,
    since: Instant,
}

struct Ripple {
    at: Vec2,
    since: Instant,
}

#[derive(Default)]
pub struct EguiPresenter {
    legend: Vec<LegendEntry>,
    highlighted: Option<usize>,
    menus: Vec<MenuView>,
    closing: Vec<(MenuView, Instant)>,
    toasts: Vec<Toast>,
    ripples: Vec<Ripple>,
    links: Vec<Url>,
    next_handle: u64,
}

impl EguiPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Draw the legend as a clickable list. Returns the selected entry.
    pub fn show_legend(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<usize> {
        let mut clicked = None;
        egui::Area::new(egui::Id::new("stellate_legend"))
            .anchor(Align2::LEFT_BOTTOM, [16.0, -16.0])
            .show(ctx, |ui| {
                for entry in &self.legend {
                    let active = self.highlighted == Some(entry.index);
                    let color = if active {
                        theme.label
                    } else {
                        fade(theme.word, 0.55)
                    };
                    let text = egui::RichText::new(format!("{:>4}  {}", entry.numeral, entry.title))
                        .monospace()
                        .size(11.0)
                        .color(color);
                    let response = ui.add(egui::Label::new(text).sense(egui::Sense::click()));
                    if response.hovered() {
                        ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    if response.clicked() {
                        clicked = Some(entry.index);
                    }
                }
            });
        clicked
    }

    /// Paint menus, toasts and ripples; flush pending link openings.
    pub fn show_overlays(&mut self, ctx: &egui::Context, canvas: Rect, theme: &Theme, now: Instant) {
        for url in self.links.drain(..) {
            ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
        }

        self.closing
            .retain(|(_, closed)| now.saturating_duration_since(*closed) < MENU_FADE);
        self.toasts
            .retain(|t| now.saturating_duration_since(t.since) < TOAST_LIFETIME);
        self.ripples
            .retain(|r| now.saturating_duration_since(r.since) < RIPPLE_LIFETIME);

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("stellate_overlay"),
        ));
        let origin = canvas.min;
        let hover = ctx.pointer_hover_pos();

        for r in &self.ripples {
            let t = progress(now, r.since, RIPPLE_LIFETIME);
            painter.circle_stroke(
                to_pos(origin, r.at),
                RIPPLE_RADIUS * t,
                Stroke::new(theme.line_width, fade(theme.ring, 1.0 - t)),
            );
        }

        for m in &self.menus {
            let alpha = progress(now, m.since, MENU_FADE);
            paint_menu(&painter, origin, m, alpha, hover);
        }
        for (m, closed) in &self.closing {
            let alpha = 1.0 - progress(now, *closed, MENU_FADE);
            paint_menu(&painter, origin, m, alpha, None);
        }

        for (i, t) in self.toasts.iter().enumerate() {
            let age = now.saturating_duration_since(t.since);
            let left = TOAST_LIFETIME.saturating_sub(age);
            let alpha = (left.as_secs_f32() / 0.3).min(1.0);
            let pos = Pos2::new(canvas.center().x, canvas.max.y - 48.0 - i as f32 * 28.0);
            let galley_rect = painter.text(
                pos,
                Align2::CENTER_CENTER,
                &t.text,
                FontId::monospace(11.0),
                fade(theme.edge, alpha),
            );
            painter.rect_stroke(
                galley_rect.expand2(egui::vec2(10.0, 5.0)),
                Rounding::same(3.0),
                Stroke::new(1.0, fade(theme.word, alpha * 0.6)),
            );
        }
    }
}

impl Presenter for EguiPresenter {
    fn present_legend(&mut self, entries: &[LegendEntry]) {
        self.legend = entries.to_vec();
    }

    fn highlight_legend(&mut self, index: Option<usize>) {
        self.highlighted = index;
    }

    fn open_menu(&mut self, vertex: usize, _anchor: Vec3, menu: &MenuDescriptor) -> MenuHandle {
        self.next_handle += 1;
        let handle = MenuHandle(self.next_handle);
        self.menus.push(MenuView {
            handle,
            vertex,
            descriptor: menu.clone(),
            at: None,
            since: Instant::now(),
        });
        handle
    }

    fn close_menu(&mut self, handle: MenuHandle) {
        match self.menus.iter().position(|m| m.handle == handle) {
            Some(i) => {
                let view = self.menus.remove(i);
                log::debug!("menu {:?} for vertex {} fading out", handle, view.vertex);
                self.closing.push((view, Instant::now()));
            }
            None => log::debug!("close of unknown menu {:?} ignored", handle),
        }
    }

    fn reposition_menu(&mut self, handle: MenuHandle, screen: Vec2) {
        if let Some(m) = self.menus.iter_mut().find(|m| m.handle == handle) {
            m.at = Some(screen);
        }
    }

    fn item_bounds(&self, handle: MenuHandle) -> Vec<ItemBounds> {
        self.menus
            .iter()
            .find(|m| m.handle == handle)
            .map(MenuView::bounds)
            .unwrap_or_default()
    }

    fn show_notification(&mut self, text: &str) {
        self.toasts.push(Toast {
            text: text.to_string(),
            since: Instant::now(),
        });
    }

    fn spawn_ripple(&mut self, screen: Vec2) {
        self.ripples.push(Ripple {
            at: screen,
            since: Instant::now(),
        });
    }

    fn open_link(&mut self, url: &Url) {
        self.links.push(url.clone());
    }
}

fn paint_menu(painter: &egui::Painter, origin: Pos2, m: &MenuView, alpha: f32, hover: Option<Pos2>) {
    let Some(o) = m.origin() else {
        return;
    };
    let height = TITLE_HEIGHT + m.descriptor.items.len() as f32 * ROW_HEIGHT;
    let rect = Rect::from_min_size(to_pos(origin, o), egui::vec2(MENU_WIDTH, height));

    painter.rect_filled(rect, Rounding::same(2.0), fade(Color32::from_black_alpha(220), alpha));
    painter.rect_stroke(rect, Rounding::same(2.0), Stroke::new(1.0, fade(Color32::WHITE, alpha * 0.6)));
    painter.text(
        rect.min + egui::vec2(10.0, TITLE_HEIGHT * 0.5),
        Align2::LEFT_CENTER,
        m.descriptor.title.to_uppercase(),
        FontId::monospace(11.0),
        fade(Color32::WHITE, alpha),
    );

    for (b, item) in m.bounds().iter().zip(&m.descriptor.items) {
        let row = Rect::from_min_max(
            to_pos(origin, Vec2::new(b.left, b.top)),
            to_pos(origin, Vec2::new(b.right, b.bottom)),
        );
        let hovered = hover.map_or(false, |p| row.contains(p));
        if hovered {
            painter.rect_filled(row, Rounding::ZERO, fade(Color32::WHITE, alpha * 0.12));
        }
        painter.text(
            row.left_center() + egui::vec2(14.0, 0.0),
            Align2::LEFT_CENTER,
            &item.label,
            FontId::monospace(10.0),
            fade(Color32::from_gray(if hovered { 255 } else { 200 }), alpha),
        );
    }
}

fn to_pos(origin: Pos2, p: Vec2) -> Pos2 {
    Pos2::new(origin.x + p.x, origin.y + p.y)
}

/// Fraction of `span` elapsed since `since`, in [0, 1].
fn progress(now: Instant, since: Instant, span: Duration) -> f32 {
    (now.saturating_duration_since(since).as_secs_f32() / span.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellate::scene::MenuItem;

    fn descriptor() -> MenuDescriptor {
        MenuDescriptor {
            title: "Data".into(),
            items: vec![
                MenuItem::new("Projects", "https://example.org/projects"),
                MenuItem::new("Say hi", "notify:hi"),
            ],
        }
    }

    #[test]
    fn test_item_bounds_follow_reposition() {
        let mut p = EguiPresenter::new();
        let h = p.open_menu(2, Vec3::ZERO, &descriptor());
        assert!(p.item_bounds(h).is_empty(), "not placed yet");

        p.reposition_menu(h, Vec2::new(100.0, 200.0));
        let b = p.item_bounds(h);
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].left, 118.0);
        assert_eq!(b[0].top, 188.0 + TITLE_HEIGHT);
        assert_eq!(b[1].top, b[0].bottom);
        assert!(b.iter().all(|i| i.depth.is_none()));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut p = EguiPresenter::new();
        let h = p.open_menu(0, Vec3::ZERO, &descriptor());
        p.close_menu(h);
        p.close_menu(h);
        p.close_menu(MenuHandle(77));
        assert_eq!(p.open_menu_count(), 0);
        assert!(p.item_bounds(h).is_empty());
        assert_eq!(p.closing.len(), 1, "fades out once");
    }

    #[test]
    fn test_newer_menu_wins() {
        let mut p = EguiPresenter::new();
        let a = p.open_menu(0, Vec3::ZERO, &descriptor());
        p.close_menu(a);
        let b = p.open_menu(1, Vec3::ZERO, &descriptor());
        // Late close of the old handle must not touch the new menu
        p.close_menu(a);
        assert_eq!(p.open_menu_count(), 1);
        p.reposition_menu(b, Vec2::ZERO);
        assert_eq!(p.item_bounds(b).len(), 2);
    }
}
