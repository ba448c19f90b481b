//! Presentation adapter: the seam between the engine and whatever draws
//! legends, menus and notifications.
//!
//! The engine calls into a [`Presenter`]; it never inspects presentation
//! state except for the item bounds of an open menu, which it needs for its
//! own hit-testing.

use glam::{Vec2, Vec3};
use url::Url;

use crate::scene::{LegendEntry, MenuDescriptor};

/// Opaque identifier of one opened menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub u64);

/// Screen bounds of one menu item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    /// Position in the menu's item list
    pub index: usize,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Depth for overlap priority; smaller is nearer. Not every host knows it.
    pub depth: Option<f32>,
}

impl ItemBounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

pub trait Presenter {
    fn present_legend(&mut self, entries: &[LegendEntry]);
    fn highlight_legend(&mut self, index: Option<usize>);

    /// Show `menu` for hot vertex `vertex`, anchored at a model-space point.
    fn open_menu(&mut self, vertex: usize, anchor: Vec3, menu: &MenuDescriptor) -> MenuHandle;
    /// Close a menu. Closing an unknown or already-closed handle is a no-op.
    fn close_menu(&mut self, handle: MenuHandle);
    fn reposition_menu(&mut self, handle: MenuHandle, screen: Vec2);
    /// Bounds of the items of an open menu, in any order.
    fn item_bounds(&self, handle: MenuHandle) -> Vec<ItemBounds>;

    fn show_notification(&mut self, text: &str);
    fn spawn_ripple(&mut self, screen: Vec2);
    fn open_link(&mut self, url: &Url);
}

#[cfg(test)]
pub(crate) mod recording {
    //! Presenter that records every call, for engine tests.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Legend(usize),
        Highlight(Option<usize>),
        Open { vertex: usize, handle: MenuHandle },
        Close(MenuHandle),
        Reposition(MenuHandle, Vec2),
        Notify(String),
        Ripple(Vec2),
        Link(String),
    }

    #[derive(Debug, Default)]
    pub struct RecordingPresenter {
        pub calls: Vec<Call>,
        pub open: Vec<MenuHandle>,
        /// Bounds handed back for whichever menu is open
        pub bounds: Vec<ItemBounds>,
        next: u64,
    }

    impl RecordingPresenter {
        pub fn opened(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Open { .. }))
                .count()
        }

        pub fn closed(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Close(_)))
                .count()
        }

        pub fn last_reposition(&self) -> Option<Vec2> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Reposition(_, p) => Some(*p),
                _ => None,
            })
        }
    }

    impl Presenter for RecordingPresenter {
        fn present_legend(&mut self, entries: &[LegendEntry]) {
            self.calls.push(Call::Legend(entries.len()));
        }

        fn highlight_legend(&mut self, index: Option<usize>) {
            self.calls.push(Call::Highlight(index));
        }

        fn open_menu(&mut self, vertex: usize, _anchor: Vec3, _menu: &MenuDescriptor) -> MenuHandle {
            self.next += 1;
            let handle = MenuHandle(self.next);
            self.open.push(handle);
            self.calls.push(Call::Open { vertex, handle });
            handle
        }

        fn close_menu(&mut self, handle: MenuHandle) {
            self.open.retain(|h| *h != handle);
            self.calls.push(Call::Close(handle));
        }

        fn reposition_menu(&mut self, handle: MenuHandle, screen: Vec2) {
            self.calls.push(Call::Reposition(handle, screen));
        }

        fn item_bounds(&self, handle: MenuHandle) -> Vec<ItemBounds> {
            if self.open.contains(&handle) {
                self.bounds.clone()
            } else {
                Vec::new()
            }
        }

        fn show_notification(&mut self, text: &str) {
            self.calls.push(Call::Notify(text.to_string()));
        }

        fn spawn_ripple(&mut self, screen: Vec2) {
            self.calls.push(Call::Ripple(screen));
        }

        fn open_link(&mut self, url: &Url) {
            self.calls.push(Call::Link(url.to_string()));
        }
    }
}
