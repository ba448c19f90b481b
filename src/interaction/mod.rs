//! Interaction controller: owns every piece of mutable state of the widget
//! and drives it from input events and display frames.
//!
//! The mode is a single tagged union. Which vertex is active, whether the
//! word field is locked and what the spin target is are all derived from it:
//!
//! - **AutoRotating**: default spin, nothing active
//! - **Stopped**: spin easing to zero, momentum coasting, idle timer may run
//! - **Hovering(v)**: pointer ray selects `v`; `v` active
//! - **Pressing**: button/finger down on a vertex or menu item, not yet moved
//!   past the tap threshold
//! - **Dragging**: pointer rotates the star; hit-testing suspended
//! - **MenuOpen**: a menu is shown for its vertex; word field locked
//!
//! Pressing and Dragging remember the menu that was open when the press
//! started, so dragging with a menu open keeps it (and the lock) alive.

pub mod hit;
pub mod motion;
pub mod timer;

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};

use crate::config::StarConfig;
use crate::geometry::{outward_offset, Perspective, Rotation, Viewport};
use crate::input::gesture::{Gesture, PressTracker};
use crate::input::InputEvent;
use crate::presentation::{MenuHandle, Presenter};
use crate::render::frame::{FrameList, TextKind};
use crate::render::words::WordField;
use crate::scene::catalog::roman;
use crate::scene::{MenuAction, Scene};

use self::hit::{menu_item_at, probe_vertices};
use self::motion::{Momentum, RotationState};
use self::timer::IdleTimer;

/// Ring opacity below which the indicator is not drawn.
const RING_VISIBLE: f32 = 0.01;
/// Share of the eased ring opacity that reaches the screen.
const RING_ALPHA: f32 = 0.95;

// ── Errors ──

/// Controller construction failure, tagged with the step that failed.
#[derive(Debug, Clone)]
pub struct StartupError {
    pub phase: &'static str,
    pub message: String,
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "startup failed during {}: {}", self.phase, self.message)
    }
}

impl std::error::Error for StartupError {}

// ── Mode ──

/// A menu currently shown by the presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenMenu {
    pub vertex: usize,
    pub handle: MenuHandle,
    /// Scaled model-space point the menu follows
    pub anchor: Vec3,
}

/// What a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Vertex(usize),
    MenuItem(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    AutoRotating,
    Stopped,
    Hovering(usize),
    Pressing {
        target: PressTarget,
        press: PressTracker,
        menu: Option<OpenMenu>,
    },
    Dragging {
        press: PressTracker,
        /// Most recent velocity sample, px/ms
        velocity: Vec2,
        menu: Option<OpenMenu>,
    },
    MenuOpen(OpenMenu),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::AutoRotating => "auto-rotating",
            Mode::Stopped => "stopped",
            Mode::Hovering(_) => "hovering",
            Mode::Pressing { .. } => "pressing",
            Mode::Dragging { .. } => "dragging",
            Mode::MenuOpen(_) => "menu-open",
        }
    }

    /// The open menu, wherever the mode keeps it.
    pub fn menu(&self) -> Option<OpenMenu> {
        match self {
            Mode::MenuOpen(m) => Some(*m),
            Mode::Pressing { menu, .. } | Mode::Dragging { menu, .. } => *menu,
            _ => None,
        }
    }

    fn press(&self) -> Option<&PressTracker> {
        match self {
            Mode::Pressing { press, .. } | Mode::Dragging { press, .. } => Some(press),
            _ => None,
        }
    }
}

/// Read-only view of the controller for the debug overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugSnapshot {
    pub mode: &'static str,
    pub angles: Vec3,
    /// Magnitude of the current angular velocity (rad/frame)
    pub angular_speed: f32,
    pub momentum: Vec2,
    pub ring_opacity: f32,
    pub active_vertex: Option<usize>,
    pub word_field_locked: bool,
    pub idle_remaining: Option<Duration>,
    pub scale: f32,
}

// ── Controller ──

pub struct StarController<P: Presenter> {
    config: StarConfig,
    perspective: Perspective,
    viewport: Viewport,
    scene: Scene,
    words: WordField,
    rotation: RotationState,
    momentum: Momentum,
    idle: IdleTimer,
    mode: Mode,
    ring_opacity: f32,
    /// Vertex the ring is drawn at while it fades out
    ring_vertex: Option<usize>,
    pointer: Option<Vec2>,
    presenter: P,
}

impl<P: Presenter> StarController<P> {
    pub fn new(config: StarConfig, presenter: P, viewport: Viewport) -> Result<Self, StartupError> {
        config.validate().map_err(|e| StartupError {
            phase: "config",
            message: e.to_string(),
        })?;
        let scale = config.scale_for_viewport(viewport.width, viewport.height);
        let scene = Scene::star(scale).map_err(|e| StartupError {
            phase: "scene",
            message: e.to_string(),
        })?;
        let words = WordField::new(&config, scene.global_words().clone());

        let mut controller = Self {
            perspective: Perspective::new(config.perspective_distance),
            viewport,
            words,
            rotation: RotationState::spinning(config.default_spin),
            momentum: Momentum::default(),
            idle: IdleTimer::new(config.idle_delay),
            mode: Mode::AutoRotating,
            ring_opacity: 0.0,
            ring_vertex: None,
            pointer: None,
            scene,
            config,
            presenter,
        };
        let legend = controller.scene.legend();
        controller.presenter.present_legend(&legend);
        log::info!(
            "star ready: {}x{} viewport, scale {:.3}, {} words, {:?} profile",
            viewport.width,
            viewport.height,
            scale,
            controller.words.len(),
            controller.config.profile
        );
        Ok(controller)
    }

    // ── Accessors ──

    pub fn config(&self) -> &StarConfig {
        &self.config
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn words(&self) -> &WordField {
        &self.words
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn angles(&self) -> Vec3 {
        self.rotation.angles
    }

    pub fn momentum(&self) -> Vec2 {
        self.momentum.velocity
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn active_vertex(&self) -> Option<usize> {
        self.scene.active()
    }

    pub fn idle_timer_armed(&self) -> bool {
        self.idle.is_armed()
    }

    /// Word field ignores pointer-driven reassignment while a menu is open.
    pub fn word_field_locked(&self) -> bool {
        self.mode.menu().is_some()
    }

    pub fn debug_snapshot(&self, now: Instant) -> DebugSnapshot {
        DebugSnapshot {
            mode: self.mode.name(),
            angles: self.rotation.angles,
            angular_speed: self.rotation.current.length(),
            momentum: self.momentum.velocity,
            ring_opacity: self.ring_opacity,
            active_vertex: self.scene.active(),
            word_field_locked: self.word_field_locked(),
            idle_remaining: self.idle.remaining(now),
            scale: self.scene.scale(),
        }
    }

    // ── Input ──

    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::PointerMove(p) => self.pointer_move(p, now),
            InputEvent::PointerDown(p) => self.pointer_down(p, now),
            InputEvent::PointerUp => self.pointer_up(now),
            InputEvent::PointerLeave => self.pointer_leave(now),
            InputEvent::TouchStart(p) => self.touch_start(p, now),
            InputEvent::TouchMove(p) => self.touch_move(p, now),
            InputEvent::TouchEnd => self.touch_end(now),
            InputEvent::Resize {
                width,
                height,
                pixel_density,
            } => self.resize(width, height, pixel_density, now),
        }
    }

    pub fn pointer_move(&mut self, at: Vec2, now: Instant) {
        self.pointer = Some(at);
        match self.mode {
            Mode::Pressing { .. } | Mode::Dragging { .. } => self.drag_to(at, now),
            Mode::MenuOpen(_) => {}
            Mode::AutoRotating | Mode::Stopped | Mode::Hovering(_) => self.hover(at, now),
        }
    }

    pub fn pointer_down(&mut self, at: Vec2, now: Instant) {
        self.pointer = Some(at);
        self.press(at, now, false);
    }

    pub fn pointer_up(&mut self, now: Instant) {
        self.release(now);
    }

    /// Pointer left the surface: any press ends, and so does any hover.
    pub fn pointer_leave(&mut self, now: Instant) {
        match self.mode {
            Mode::Dragging { .. } => self.release(now),
            Mode::Pressing { menu, .. } => {
                log::debug!("press abandoned at surface edge");
                self.settle(menu, now);
            }
            _ => {}
        }
        if let Mode::Hovering(v) = self.mode {
            self.unhover(v, now);
        }
        self.pointer = None;
    }

    pub fn touch_start(&mut self, at: Vec2, now: Instant) {
        self.press(at, now, true);
    }

    pub fn touch_move(&mut self, at: Vec2, now: Instant) {
        if self.mode.press().is_some() {
            self.drag_to(at, now);
        }
    }

    pub fn touch_end(&mut self, now: Instant) {
        self.release(now);
    }

    /// New surface size. Any open menu is closed since its anchor geometry is
    /// stale, and hit circles are forgotten until the next frame.
    pub fn resize(&mut self, width: f32, height: f32, pixel_density: f32, now: Instant) {
        self.viewport = Viewport::new(width, height, pixel_density);
        let scale = self.config.scale_for_viewport(width, height);
        if (scale - self.scene.scale()).abs() > f32::EPSILON {
            self.scene.set_scale(scale);
            self.words.reset();
        }
        self.scene.clear_screen_positions();

        match std::mem::replace(&mut self.mode, Mode::Stopped) {
            Mode::MenuOpen(m) => {
                self.presenter.close_menu(m.handle);
                self.deactivate_and_arm(now);
            }
            Mode::Pressing { menu, .. } => {
                if let Some(m) = menu {
                    self.presenter.close_menu(m.handle);
                }
                self.deactivate_and_arm(now);
            }
            Mode::Dragging {
                press,
                velocity,
                menu,
            } => {
                if let Some(m) = menu {
                    self.presenter.close_menu(m.handle);
                    self.set_active(None);
                }
                self.mode = Mode::Dragging {
                    press,
                    velocity,
                    menu: None,
                };
            }
            other => self.mode = other,
        }

        log::info!(
            "resized to {}x{} @{}x, scale {:.3}",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_density,
            self.scene.scale()
        );
    }

    /// Select hot vertex `index` from outside the surface (the legend).
    /// Behaves like a confirmed click on that vertex.
    pub fn activate_vertex(&mut self, index: usize, now: Instant) {
        if self.scene.hot_vertex(index).is_none() {
            log::warn!("activate_vertex: no hot vertex {}", index);
            return;
        }
        let menu = match self.mode {
            Mode::Pressing { .. } | Mode::Dragging { .. } => {
                log::debug!("legend selection ignored during a press");
                return;
            }
            Mode::MenuOpen(m) => Some(m),
            _ => None,
        };
        let at = self
            .scene
            .hot_vertex(index)
            .and_then(|h| h.screen())
            .map(|c| c.center);
        self.click_vertex(index, menu, at, now);
    }

    // ── Frame ──

    /// Compose one frame and advance the simulation by one display frame.
    pub fn frame(&mut self, now: Instant) -> FrameList {
        if self.idle.poll(now) {
            self.idle_elapsed();
        }

        let rotation = Rotation::new(self.rotation.angles);
        let scale = self.scene.scale();
        let persp = self.perspective;
        let vp = self.viewport;
        let mut list = FrameList::new(vp);

        for (a, b) in self.scene.all_edges() {
            list.line(
                persp.project(rotation.apply(a), &vp),
                persp.project(rotation.apply(b), &vp),
                1.0,
            );
        }

        for w in self.words.project_sorted(&rotation, &persp, scale, &vp) {
            list.text(TextKind::Word, w.text, w.screen, 1.0, w.opacity);
        }

        for i in 0..self.scene.hot_count() {
            let Some(pos) = self.scene.hot_position(i) else {
                continue;
            };
            let rotated = rotation.apply(pos);
            let s = persp.scale(rotated.z);
            let screen = persp.project(rotated, &vp);
            self.scene
                .set_screen_position(i, screen.x, screen.y, self.config.hit_circle_radius * s);

            let offset = outward_offset(rotated.truncate(), self.config.label_offset * s);
            let label_at = persp.project(rotated + offset.extend(0.0), &vp);
            list.text(
                TextKind::Label,
                roman(i + 1),
                label_at,
                1.0,
                persp.depth_opacity(rotated.z),
            );
        }

        let active = self.scene.active();
        let target = if active.is_some() { 1.0 } else { 0.0 };
        self.ring_opacity += (target - self.ring_opacity) * self.config.ring_ease;
        if active.is_some() {
            self.ring_vertex = active;
        }
        if self.ring_opacity > RING_VISIBLE {
            if let Some(pos) = self.ring_vertex.and_then(|v| self.scene.hot_position(v)) {
                let rotated = rotation.apply(pos);
                list.ring(
                    persp.project(rotated, &vp),
                    self.config.ring_radius,
                    persp.depth_opacity(rotated.z) * self.ring_opacity * RING_ALPHA,
                );
            }
        } else if active.is_none() {
            self.ring_vertex = None;
        }

        if let Some(m) = self.mode.menu() {
            let screen = persp.project(rotation.apply(m.anchor), &vp);
            self.presenter.reposition_menu(m.handle, screen);
        }

        self.words.update(1.0);
        self.step_physics(now);
        list
    }

    fn step_physics(&mut self, now: Instant) {
        self.rotation.target = match self.mode {
            Mode::AutoRotating => self.config.default_spin,
            _ => Vec3::ZERO,
        };
        match self.mode {
            Mode::Dragging { .. } => {}
            Mode::AutoRotating => {
                self.rotation.blend(self.config.rotation_catch_up);
                self.rotation.step();
            }
            _ => {
                self.rotation.blend(self.config.rotation_catch_up);
                self.momentum.apply(
                    &mut self.rotation,
                    self.config.momentum_gain,
                    self.config.momentum_decay,
                );
                self.rotation.step();
                if matches!(self.mode, Mode::Stopped)
                    && !self.idle.is_armed()
                    && self.momentum.is_settled(self.config.momentum_epsilon)
                {
                    self.idle.arm(now);
                }
            }
        }
    }

    fn idle_elapsed(&mut self) {
        if matches!(self.mode, Mode::Stopped)
            && self.momentum.is_settled(self.config.momentum_epsilon)
        {
            log::debug!("idle delay elapsed, resuming auto-rotation");
            self.momentum.stop();
            self.mode = Mode::AutoRotating;
        } else {
            log::debug!("idle delay elapsed in {} mode, ignored", self.mode.name());
        }
    }

    // ── Transitions ──

    fn hover(&mut self, at: Vec2, now: Instant) {
        let rotation = Rotation::new(self.rotation.angles);
        let rotated: Vec<Vec3> = (0..self.scene.hot_count())
            .filter_map(|i| self.scene.hot_position(i))
            .map(|p| rotation.apply(p))
            .collect();
        let ray = self.perspective.pointer_ray(
            at,
            self.config.ray_near_depth,
            self.config.ray_far_depth,
            &self.viewport,
        );
        let probe = probe_vertices(
            &ray,
            &rotated,
            &self.perspective,
            self.config.detection_radius,
            self.config.selection_ratio,
        );

        let hovered = match self.mode {
            Mode::Hovering(v) => Some(v),
            _ => None,
        };
        match (probe.selected, hovered) {
            (Some(v), Some(current)) if current == v => {}
            (Some(v), _) => {
                self.idle.cancel();
                self.mode = Mode::Hovering(v);
                self.set_active(Some(v));
                log::debug!("hovering vertex {}", v);
            }
            (None, Some(v)) => self.unhover(v, now),
            (None, None) => {}
        }
    }

    fn unhover(&mut self, vertex: usize, now: Instant) {
        log::debug!("left vertex {}", vertex);
        self.mode = Mode::Stopped;
        self.set_active(None);
        self.idle.cancel();
        self.idle.arm(now);
    }

    fn press(&mut self, at: Vec2, now: Instant, touch: bool) {
        self.idle.cancel();
        self.momentum.stop();

        let threshold = self.config.tap_threshold_for(touch);
        let press = PressTracker::start(at, now, threshold, touch);
        let menu = self.mode.menu();

        let item = menu.and_then(|m| menu_item_at(at, &self.presenter.item_bounds(m.handle)));
        let target = match item {
            Some(i) => Some(PressTarget::MenuItem(i)),
            None => self.scene.hit_circle_at(at).map(PressTarget::Vertex),
        };

        match target {
            Some(target) => {
                log::debug!("press on {:?}", target);
                self.mode = Mode::Pressing {
                    target,
                    press,
                    menu,
                };
            }
            None => {
                if menu.is_none() && self.scene.active().is_some() {
                    self.set_active(None);
                }
                log::debug!("drag started");
                self.mode = Mode::Dragging {
                    press,
                    velocity: Vec2::ZERO,
                    menu,
                };
            }
        }
    }

    fn drag_to(&mut self, at: Vec2, now: Instant) {
        let mode = std::mem::replace(&mut self.mode, Mode::Stopped);
        self.mode = match mode {
            Mode::Pressing {
                target,
                mut press,
                menu,
            } => {
                let motion = press.move_to(at, now);
                if press.exceeded() {
                    if menu.is_none() && self.scene.active().is_some() {
                        self.set_active(None);
                    }
                    log::debug!("press on {:?} became a drag", target);
                    self.rotation
                        .drag_by(motion.delta, self.config.drag_sensitivity_for(press.is_touch()));
                    Mode::Dragging {
                        velocity: motion.velocity().unwrap_or(Vec2::ZERO),
                        press,
                        menu,
                    }
                } else {
                    Mode::Pressing {
                        target,
                        press,
                        menu,
                    }
                }
            }
            Mode::Dragging {
                mut press,
                velocity,
                menu,
            } => {
                let motion = press.move_to(at, now);
                self.rotation
                    .drag_by(motion.delta, self.config.drag_sensitivity_for(press.is_touch()));
                Mode::Dragging {
                    velocity: motion.velocity().unwrap_or(velocity),
                    press,
                    menu,
                }
            }
            other => other,
        };
    }

    fn release(&mut self, now: Instant) {
        match std::mem::replace(&mut self.mode, Mode::Stopped) {
            Mode::Pressing {
                target: PressTarget::Vertex(v),
                press,
                menu,
            } => self.click_vertex(v, menu, Some(press.last()), now),
            Mode::Pressing {
                target: PressTarget::MenuItem(i),
                menu,
                ..
            } => match menu {
                Some(m) => self.choose_item(m, i, now),
                None => self.settle(None, now),
            },
            Mode::Dragging {
                press,
                velocity,
                menu,
            } => {
                self.momentum.velocity = velocity;
                let tapped = matches!(press.finish(), Gesture::Tap { .. });
                if tapped && press.is_touch() {
                    self.presenter.spawn_ripple(press.last());
                }
                let menu = match menu {
                    Some(m) if tapped => {
                        log::debug!("tap outside menu {:?}", m.handle);
                        self.presenter.close_menu(m.handle);
                        self.set_active(None);
                        None
                    }
                    other => other,
                };
                log::debug!("drag ended, momentum {:?}", velocity);
                self.settle(menu, now);
                if !press.is_touch() && matches!(self.mode, Mode::Stopped) {
                    self.hover(press.last(), now);
                }
            }
            other => self.mode = other,
        }
    }

    /// Return to rest after a press: back to the menu if one is still open,
    /// otherwise stopped, with the idle timer armed once momentum allows.
    fn settle(&mut self, menu: Option<OpenMenu>, now: Instant) {
        match menu {
            Some(m) => self.mode = Mode::MenuOpen(m),
            None => {
                self.mode = Mode::Stopped;
                if self.scene.active().is_some() {
                    self.set_active(None);
                }
                if self.momentum.is_settled(self.config.momentum_epsilon) {
                    self.idle.arm(now);
                }
            }
        }
    }

    fn click_vertex(&mut self, vertex: usize, menu: Option<OpenMenu>, at: Option<Vec2>, now: Instant) {
        if let Some(p) = at {
            self.presenter.spawn_ripple(p);
        }
        match menu {
            Some(m) if m.vertex == vertex => {
                log::info!("menu for vertex {} closed", vertex);
                self.presenter.close_menu(m.handle);
                self.deactivate_and_arm(now);
            }
            Some(m) => {
                self.presenter.close_menu(m.handle);
                self.open_menu(vertex, now);
            }
            None => self.open_menu(vertex, now),
        }
    }

    fn open_menu(&mut self, vertex: usize, now: Instant) {
        let anchor = self.scene.hot_position(vertex);
        let descriptor = self.scene.hot_vertex(vertex).map(|h| h.menu.clone());
        let (Some(anchor), Some(descriptor)) = (anchor, descriptor) else {
            log::warn!("open_menu: no hot vertex {}", vertex);
            self.deactivate_and_arm(now);
            return;
        };
        self.idle.cancel();
        let handle = self.presenter.open_menu(vertex, anchor, &descriptor);
        self.mode = Mode::MenuOpen(OpenMenu {
            vertex,
            handle,
            anchor,
        });
        self.set_active(Some(vertex));
        log::info!("menu '{}' opened for vertex {}", descriptor.title, vertex);
    }

    fn choose_item(&mut self, menu: OpenMenu, index: usize, now: Instant) {
        let action = self
            .scene
            .hot_vertex(menu.vertex)
            .and_then(|h| h.menu.items.get(index))
            .map(|item| item.parse_action());
        match action {
            Some(MenuAction::Navigate(url)) => {
                log::info!("menu item {} navigates to {}", index, url);
                self.presenter.open_link(&url);
            }
            Some(MenuAction::Notify(text)) => self.presenter.show_notification(&text),
            Some(MenuAction::Unsupported(token)) => {
                log::warn!("menu item {} has unsupported action '{}'", index, token);
            }
            None => log::warn!("menu item {} out of range", index),
        }
        self.presenter.close_menu(menu.handle);
        self.deactivate_and_arm(now);
    }

    fn deactivate_and_arm(&mut self, now: Instant) {
        self.mode = Mode::Stopped;
        self.set_active(None);
        if self.momentum.is_settled(self.config.momentum_epsilon) {
            self.idle.arm(now);
        }
    }

    /// Change the active vertex; the word field and legend follow.
    fn set_active(&mut self, index: Option<usize>) {
        if self.scene.active() == index {
            return;
        }
        let set = self.scene.activate(index);
        self.words.set_available_words(&set);
        self.presenter.highlight_legend(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::coalesce_moves;
    use crate::presentation::recording::{Call, RecordingPresenter};
    use crate::presentation::ItemBounds;
    use crate::render::frame::DrawCommand;

    const FRAME: Duration = Duration::from_millis(16);

    fn controller() -> (StarController<RecordingPresenter>, Instant) {
        let cfg = StarConfig::default().with_seed(42).with_word_count(40);
        let c = StarController::new(cfg, RecordingPresenter::default(), Viewport::default()).unwrap();
        (c, Instant::now())
    }

    fn hit_center(c: &StarController<RecordingPresenter>, vertex: usize) -> Vec2 {
        c.scene().hot_vertex(vertex).unwrap().screen().unwrap().center
    }

    fn click(c: &mut StarController<RecordingPresenter>, at: Vec2, now: Instant) {
        c.pointer_down(at, now);
        c.pointer_up(now + Duration::from_millis(30));
    }

    fn click_vertex(c: &mut StarController<RecordingPresenter>, vertex: usize, now: Instant) {
        let at = hit_center(c, vertex);
        click(c, at, now);
    }

    /// Frames at 16 ms until `until`; returns the time after the last frame.
    fn run_frames(c: &mut StarController<RecordingPresenter>, from: Instant, until: Instant) -> Instant {
        let mut t = from;
        while t < until {
            t += FRAME;
            c.frame(t);
        }
        t
    }

    #[test]
    fn test_starts_auto_rotating_with_legend() {
        let (mut c, t0) = controller();
        assert_eq!(c.mode(), &Mode::AutoRotating);
        assert_eq!(c.presenter().calls.first(), Some(&Call::Legend(6)));
        let before = c.angles();
        c.frame(t0);
        let after = c.angles();
        assert!((after - before - Vec3::new(0.005, 0.007, 0.003)).length() < 1e-6);
    }

    #[test]
    fn test_invalid_config_reports_phase() {
        let mut cfg = StarConfig::default();
        cfg.momentum_decay = 1.5;
        let err = StarController::new(cfg, RecordingPresenter::default(), Viewport::default())
            .err()
            .unwrap();
        assert_eq!(err.phase, "config");
        assert!(err.to_string().contains("momentum_decay"));
    }

    #[test]
    fn test_frame_draw_order() {
        let (mut c, t0) = controller();
        let f = c.frame(t0);
        assert_eq!(f.lines().count(), 34);
        assert_eq!(f.texts(TextKind::Label).count(), 6);
        assert!(f.ring_command().is_none());

        // Edges first, then words, then labels
        let first_word = f
            .commands
            .iter()
            .position(|cmd| matches!(cmd, DrawCommand::Text { kind: TextKind::Word, .. }))
            .unwrap();
        let first_label = f
            .commands
            .iter()
            .position(|cmd| matches!(cmd, DrawCommand::Text { kind: TextKind::Label, .. }))
            .unwrap();
        assert_eq!(first_word, 34);
        assert!(first_label > first_word);

        for i in 0..6 {
            assert!(c.scene().hot_vertex(i).unwrap().screen().is_some());
        }
    }

    #[test]
    fn test_click_opens_menu_and_locks_words() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let at = hit_center(&c, 0);
        click(&mut c, at, t0 + FRAME);

        match c.mode() {
            Mode::MenuOpen(m) => assert_eq!(m.vertex, 0),
            other => panic!("expected MenuOpen, got {:?}", other),
        }
        assert!(c.word_field_locked());
        assert_eq!(c.active_vertex(), Some(0));
        let labels = c.scene().hot_vertex(0).unwrap().labels.clone();
        assert!(c.words().available().same_as(&labels));
        assert!(!c.idle_timer_armed());
        assert_eq!(c.presenter().opened(), 1);
        assert!(c.presenter().calls.contains(&Call::Ripple(at)));
        assert!(c.presenter().calls.contains(&Call::Highlight(Some(0))));

        c.frame(t0 + FRAME * 3);
        assert_eq!(c.rotation().target, Vec3::ZERO);
        assert!(c.presenter().last_reposition().is_some());
    }

    #[test]
    fn test_second_click_closes_and_rearms() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);
        let t1 = t0 + FRAME * 4;
        c.frame(t1);
        click_vertex(&mut c, 0, t1);

        assert_eq!(c.mode(), &Mode::Stopped);
        assert_eq!(c.presenter().closed(), 1);
        assert!(!c.word_field_locked());
        assert_eq!(c.active_vertex(), None);
        assert!(c.words().available().same_as(c.scene().global_words()));
        assert!(c.idle_timer_armed());

        // No further input: auto-rotation resumes after the idle delay
        let t = run_frames(&mut c, t1, t1 + Duration::from_millis(2400));
        assert_eq!(c.mode(), &Mode::Stopped);
        run_frames(&mut c, t, t1 + Duration::from_millis(2600));
        assert_eq!(c.mode(), &Mode::AutoRotating);
    }

    #[test]
    fn test_click_other_vertex_replaces_menu() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);
        let t1 = t0 + FRAME * 2;
        c.frame(t1);
        click_vertex(&mut c, 2, t1);

        match c.mode() {
            Mode::MenuOpen(m) => assert_eq!(m.vertex, 2),
            other => panic!("expected MenuOpen, got {:?}", other),
        }
        assert_eq!(c.presenter().opened(), 2);
        assert_eq!(c.presenter().closed(), 1);
        assert_eq!(c.presenter().open.len(), 1);
    }

    #[test]
    fn test_idle_timer_waits_for_momentum() {
        let (mut c, t0) = controller();
        c.frame(t0);
        c.pointer_down(Vec2::new(20.0, 20.0), t0);
        c.pointer_move(Vec2::new(220.0, 20.0), t0 + Duration::from_millis(10));
        let release = t0 + Duration::from_millis(20);
        c.pointer_up(release);
        assert!(c.momentum().x > 19.0);
        assert!(!c.idle_timer_armed());

        let mut t = release;
        let mut settled_at = None;
        let mut auto_at = None;
        for _ in 0..600 {
            t += FRAME;
            c.frame(t);
            if settled_at.is_none() && c.momentum().x.abs() < 0.001 {
                settled_at = Some(t);
            }
            if c.mode() == &Mode::AutoRotating {
                auto_at = Some(t);
                break;
            }
        }
        let settled_at = settled_at.unwrap();
        let auto_at = auto_at.unwrap();
        // The idle delay elapsed long before momentum settled
        assert!(settled_at > release + Duration::from_millis(2500));
        assert!(auto_at >= settled_at + Duration::from_millis(2500) - FRAME);
    }

    #[test]
    fn test_drag_momentum_matches_last_sample() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let mut at = Vec2::new(100.0, 100.0);
        c.pointer_down(at, t0);
        let mut t = t0;
        for _ in 0..50 {
            t += Duration::from_millis(10);
            at += Vec2::new(5.0, 0.0);
            c.pointer_move(at, t);
        }
        assert!(matches!(c.mode(), Mode::Dragging { .. }));
        c.pointer_up(t);
        let v0 = c.momentum();
        assert!((v0 - Vec2::new(0.5, 0.0)).length() < 1e-3);

        let mut prev = v0.x;
        let mut frames = 0;
        while c.momentum().x.abs() >= 0.001 {
            t += FRAME;
            c.frame(t);
            let ratio = c.momentum().x / prev;
            assert!((ratio - 0.95).abs() < 1e-4);
            prev = c.momentum().x;
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(c.idle_timer_armed());
    }

    #[test]
    fn test_coalesced_frame_batch_keeps_fling_speed() {
        let (mut c, t0) = controller();
        c.frame(t0);
        c.pointer_down(Vec2::new(100.0, 100.0), t0);
        let t1 = t0 + FRAME;
        let batch = [
            InputEvent::PointerMove(Vec2::new(104.0, 100.0)),
            InputEvent::PointerMove(Vec2::new(112.0, 100.0)),
            InputEvent::PointerMove(Vec2::new(116.0, 100.0)),
        ];
        for event in coalesce_moves(batch) {
            c.handle(event, t1);
        }
        c.pointer_up(t1);
        assert!((c.momentum() - Vec2::new(1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_drag_rotates_by_sensitivity() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let before = c.angles();
        c.pointer_down(Vec2::new(50.0, 50.0), t0);
        c.pointer_move(Vec2::new(150.0, 30.0), t0 + FRAME);
        let d = c.angles() - before;
        assert!((d.y - 0.5).abs() < 1e-5);
        assert!((d.x + 0.1).abs() < 1e-5);

        // No physics while dragging
        let held = c.angles();
        c.frame(t0 + FRAME * 2);
        assert_eq!(c.angles(), held);
    }

    #[test]
    fn test_dragging_over_vertex_does_not_hover() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let over = hit_center(&c, 0);
        c.pointer_down(Vec2::new(10.0, 10.0), t0 + FRAME);
        c.pointer_move(Vec2::new(40.0, 10.0), t0 + FRAME * 2);
        assert!(matches!(c.mode(), Mode::Dragging { .. }));

        c.pointer_move(over, t0 + FRAME * 3);
        assert!(matches!(c.mode(), Mode::Dragging { .. }));
        assert_eq!(c.active_vertex(), None);
        assert!(!c.presenter().calls.contains(&Call::Highlight(Some(0))));
    }

    #[test]
    fn test_hover_selects_and_leaving_rearms() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let at = hit_center(&c, 0);
        c.pointer_move(at, t0 + FRAME);
        assert_eq!(c.mode(), &Mode::Hovering(0));
        assert_eq!(c.active_vertex(), Some(0));
        assert!(!c.word_field_locked());
        let labels = c.scene().hot_vertex(0).unwrap().labels.clone();
        assert!(c.words().available().same_as(&labels));

        c.pointer_move(Vec2::new(5.0, 5.0), t0 + FRAME * 2);
        assert_eq!(c.mode(), &Mode::Stopped);
        assert_eq!(c.active_vertex(), None);
        assert!(c.idle_timer_armed());
        assert!(c.words().available().same_as(c.scene().global_words()));
    }

    #[test]
    fn test_menu_suppresses_hover() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);
        let t1 = t0 + FRAME * 2;
        c.frame(t1);
        let over = hit_center(&c, 2);
        c.pointer_move(over, t1);
        assert!(matches!(c.mode(), Mode::MenuOpen(m) if m.vertex == 0));
        assert_eq!(c.active_vertex(), Some(0));
    }

    #[test]
    fn test_menu_item_runs_action_and_closes() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);
        c.presenter_mut().bounds = vec![
            ItemBounds {
                index: 0,
                left: 0.0,
                right: 120.0,
                top: 0.0,
                bottom: 24.0,
                depth: None,
            },
            ItemBounds {
                index: 1,
                left: 0.0,
                right: 120.0,
                top: 24.0,
                bottom: 48.0,
                depth: None,
            },
        ];

        click(&mut c, Vec2::new(60.0, 30.0), t0 + FRAME * 2);
        assert!(c
            .presenter()
            .calls
            .contains(&Call::Link("https://example.org/research".to_string())));
        assert_eq!(c.presenter().closed(), 1);
        assert_eq!(c.mode(), &Mode::Stopped);
        assert!(c.idle_timer_armed());
    }

    #[test]
    fn test_notify_item() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);
        c.presenter_mut().bounds = vec![ItemBounds {
            index: 0,
            left: 0.0,
            right: 120.0,
            top: 0.0,
            bottom: 24.0,
            depth: Some(0.0),
        }];
        click(&mut c, Vec2::new(10.0, 10.0), t0 + FRAME * 2);
        assert!(c
            .presenter()
            .calls
            .iter()
            .any(|call| matches!(call, Call::Notify(text) if text.starts_with("Systems programmer"))));
    }

    #[test]
    fn test_tap_outside_closes_menu_but_drag_keeps_it() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);

        // Drag: the menu stays and follows
        c.pointer_down(Vec2::new(10.0, 10.0), t0 + FRAME * 2);
        c.pointer_move(Vec2::new(80.0, 10.0), t0 + FRAME * 3);
        assert!(c.word_field_locked());
        c.pointer_up(t0 + FRAME * 4);
        assert!(matches!(c.mode(), Mode::MenuOpen(_)));
        assert_eq!(c.presenter().closed(), 0);

        // Tap: the menu closes
        click(&mut c, Vec2::new(10.0, 10.0), t0 + FRAME * 5);
        assert_eq!(c.presenter().closed(), 1);
        assert_eq!(c.active_vertex(), None);
        assert!(!c.word_field_locked());
    }

    #[test]
    fn test_resize_closes_menu() {
        let (mut c, t0) = controller();
        c.frame(t0);
        click_vertex(&mut c, 0, t0 + FRAME);
        c.resize(600.0, 500.0, 2.0, t0 + FRAME * 2);

        assert_eq!(c.presenter().closed(), 1);
        assert_eq!(c.mode(), &Mode::Stopped);
        assert!(!c.word_field_locked());
        assert!(c.scene().hot_vertex(0).unwrap().screen().is_none());
        assert!((c.scene().scale() - 0.6 * 500.0 / 900.0).abs() < 1e-4);
        assert_eq!(c.viewport().pixel_density, 2.0);
    }

    #[test]
    fn test_legend_activation_acts_as_click() {
        let (mut c, t0) = controller();
        c.frame(t0);
        c.activate_vertex(3, t0);
        assert!(matches!(c.mode(), Mode::MenuOpen(m) if m.vertex == 3));
        assert!(!c.idle_timer_armed());
        c.activate_vertex(3, t0 + FRAME);
        assert_eq!(c.mode(), &Mode::Stopped);
        assert!(c.idle_timer_armed());

        // Selecting a vertex cancels the pending timer
        c.activate_vertex(1, t0 + FRAME * 2);
        assert!(!c.idle_timer_armed());

        c.activate_vertex(99, t0 + FRAME * 3);
        assert!(matches!(c.mode(), Mode::MenuOpen(m) if m.vertex == 1));
    }

    #[test]
    fn test_touch_tap_ripples_and_drags() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let at = Vec2::new(30.0, 40.0);
        c.touch_start(at, t0);
        c.touch_move(Vec2::new(34.0, 40.0), t0 + FRAME);
        c.touch_end(t0 + FRAME * 2);
        assert!(c.presenter().calls.contains(&Call::Ripple(Vec2::new(34.0, 40.0))));
        assert_eq!(c.mode(), &Mode::Stopped);

        // Touch drags use the reduced sensitivity
        let before = c.angles();
        c.touch_start(at, t0 + FRAME * 3);
        c.touch_move(at + Vec2::new(100.0, 0.0), t0 + FRAME * 4);
        assert!(((c.angles() - before).y - 0.3).abs() < 1e-5);
        c.touch_end(t0 + FRAME * 5);
    }

    #[test]
    fn test_touch_tap_on_vertex_opens_menu() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let at = hit_center(&c, 1);
        c.handle(InputEvent::TouchStart(at), t0 + FRAME);
        c.handle(InputEvent::TouchEnd, t0 + FRAME * 2);
        assert!(matches!(c.mode(), Mode::MenuOpen(m) if m.vertex == 1));
    }

    #[test]
    fn test_pointer_leave_ends_drag() {
        let (mut c, t0) = controller();
        c.frame(t0);
        c.handle(InputEvent::PointerDown(Vec2::new(10.0, 10.0)), t0);
        c.handle(InputEvent::PointerMove(Vec2::new(60.0, 10.0)), t0 + FRAME);
        c.handle(InputEvent::PointerLeave, t0 + FRAME * 2);
        assert_eq!(c.mode(), &Mode::Stopped);
        assert!(c.momentum().x > 0.0);
        assert_eq!(c.pointer(), None);
    }

    #[test]
    fn test_ring_eases_in_and_out() {
        let (mut c, t0) = controller();
        c.frame(t0);
        c.activate_vertex(0, t0);
        c.frame(t0 + FRAME);
        let snap = c.debug_snapshot(t0 + FRAME);
        assert!((snap.ring_opacity - 0.1).abs() < 1e-5);

        let mut t = t0 + FRAME;
        for _ in 0..60 {
            t += FRAME;
            c.frame(t);
        }
        assert!(c.debug_snapshot(t).ring_opacity > 0.99);

        c.activate_vertex(0, t);
        t += FRAME;
        let f = c.frame(t);
        assert!(f.ring_command().is_some(), "ring fades out rather than vanishing");
        assert!(c.debug_snapshot(t).ring_opacity < 0.95);
    }

    #[test]
    fn test_debug_snapshot() {
        let (mut c, t0) = controller();
        c.frame(t0);
        let snap = c.debug_snapshot(t0);
        assert_eq!(snap.mode, "auto-rotating");
        assert_eq!(snap.active_vertex, None);
        assert_eq!(snap.idle_remaining, None);
        assert!(snap.angular_speed > 0.0);
    }
}
