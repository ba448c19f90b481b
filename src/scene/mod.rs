//! Scene model: the static star polyhedron and its six hot vertices.
//!
//! Geometry is stored unscaled; the device scale factor is applied on read so
//! a resize only has to swap one number. Hot vertices additionally carry a
//! screen-space hit circle that the render loop refreshes every frame and the
//! input handlers read on the next event.

pub mod catalog;

use std::sync::Arc;

use glam::{Vec2, Vec3};
use url::Url;

use self::catalog::{roman, GLOBAL_WORDS, HOT_VERTICES, STAR_EDGES, STAR_POINTS};

/// Error while assembling a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneError {
    pub message: String,
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SceneError {}

// ── Word sets ──

/// Shared, immutable list of words.
///
/// Identity matters: two sets are "the same" only if they share storage, so
/// handing the field the set it already uses is free.
#[derive(Debug, Clone)]
pub struct WordSet(Arc<[String]>);

impl WordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect::<Vec<_>>().into())
    }

    /// Same backing storage (not just equal contents).
    pub fn same_as(&self, other: &WordSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }
}

// ── Menus ──

/// What a menu item does when selected.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    /// Open a link in the host
    Navigate(Url),
    /// Show a transient notification
    Notify(String),
    /// Token the host cannot act on
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    /// `notify:<text>` or an absolute URL
    pub action: String,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }

    pub fn parse_action(&self) -> MenuAction {
        let token = self.action.trim();
        if let Some(text) = token.strip_prefix("notify:") {
            return MenuAction::Notify(text.trim().to_string());
        }
        match Url::parse(token) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "mailto") => {
                MenuAction::Navigate(url)
            }
            _ => MenuAction::Unsupported(token.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuDescriptor {
    pub title: String,
    pub items: Vec<MenuItem>,
}

// ── Hot vertices ──

/// Screen-space click target, refreshed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl ScreenCircle {
    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) < self.radius * self.radius
    }
}

#[derive(Debug, Clone)]
pub struct HotVertex {
    /// Index into the polyhedron's vertex list
    pub vertex_index: usize,
    pub labels: WordSet,
    pub menu: MenuDescriptor,
    screen: Option<ScreenCircle>,
    active: bool,
}

impl HotVertex {
    pub fn new(vertex_index: usize, labels: WordSet, menu: MenuDescriptor) -> Self {
        Self {
            vertex_index,
            labels,
            menu,
            screen: None,
            active: false,
        }
    }

    /// Hit circle from the most recent frame (`None` before the first frame).
    pub fn screen(&self) -> Option<ScreenCircle> {
        self.screen
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Legend caption: first label up to its `-` suffix, upper-cased.
    pub fn title(&self) -> String {
        self.labels
            .first()
            .map(|w| w.split('-').next().unwrap_or(w).to_uppercase())
            .unwrap_or_else(|| self.menu.title.to_uppercase())
    }
}

/// One row of the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub index: usize,
    pub numeral: &'static str,
    pub title: String,
}

// ── Polyhedron ──

/// Fixed vertex list plus undirected edges.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    vertices: Vec<Vec3>,
    edges: Vec<(usize, usize)>,
}

impl Polyhedron {
    /// Build from raw parts. Edges are normalised to `(lo, hi)` and
    /// de-duplicated; an index past the vertex list is an error.
    pub fn new(vertices: Vec<Vec3>, edges: &[(usize, usize)]) -> Result<Self, SceneError> {
        let mut unique: Vec<(usize, usize)> = Vec::with_capacity(edges.len());
        for &(a, b) in edges {
            if a >= vertices.len() || b >= vertices.len() {
                return Err(SceneError {
                    message: format!(
                        "edge ({}, {}) references a vertex past {}",
                        a,
                        b,
                        vertices.len()
                    ),
                });
            }
            if a == b {
                return Err(SceneError {
                    message: format!("edge ({}, {}) is a self-loop", a, b),
                });
            }
            let pair = (a.min(b), a.max(b));
            if !unique.contains(&pair) {
                unique.push(pair);
            }
        }
        if unique.len() < edges.len() {
            log::debug!("folded {} repeated edges", edges.len() - unique.len());
        }
        Ok(Self {
            vertices,
            edges: unique,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

// ── Scene ──

#[derive(Debug, Clone)]
pub struct Scene {
    polyhedron: Polyhedron,
    hot: Vec<HotVertex>,
    global_words: WordSet,
    scale: f32,
}

impl Scene {
    pub fn new(
        polyhedron: Polyhedron,
        hot: Vec<HotVertex>,
        global_words: WordSet,
        scale: f32,
    ) -> Result<Self, SceneError> {
        if let Some(bad) = hot
            .iter()
            .find(|h| h.vertex_index >= polyhedron.vertices().len())
        {
            return Err(SceneError {
                message: format!("hot vertex points at missing vertex {}", bad.vertex_index),
            });
        }
        Ok(Self {
            polyhedron,
            hot,
            global_words,
            scale,
        })
    }

    /// The six-tipped star from the built-in catalog.
    pub fn star(scale: f32) -> Result<Self, SceneError> {
        let vertices = STAR_POINTS.iter().map(|p| Vec3::from_array(*p)).collect();
        let polyhedron = Polyhedron::new(vertices, &STAR_EDGES)?;
        let hot = HOT_VERTICES
            .iter()
            .map(|spec| {
                HotVertex::new(
                    spec.vertex_index,
                    WordSet::new(spec.labels.iter().copied()),
                    MenuDescriptor {
                        title: spec.menu_title.to_string(),
                        items: spec
                            .menu_items
                            .iter()
                            .map(|(label, action)| MenuItem::new(*label, *action))
                            .collect(),
                    },
                )
            })
            .collect();
        Self::new(
            polyhedron,
            hot,
            WordSet::new(GLOBAL_WORDS.iter().copied()),
            scale,
        )
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    pub fn polyhedron(&self) -> &Polyhedron {
        &self.polyhedron
    }

    /// Scaled vertex position.
    pub fn vertex(&self, i: usize) -> Option<Vec3> {
        self.polyhedron.vertices.get(i).map(|v| *v * self.scale)
    }

    /// Scaled endpoints of every edge.
    pub fn all_edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let v = &self.polyhedron.vertices;
        let s = self.scale;
        self.polyhedron
            .edges
            .iter()
            .map(move |&(a, b)| (v[a] * s, v[b] * s))
    }

    pub fn hot_count(&self) -> usize {
        self.hot.len()
    }

    pub fn hot_vertex(&self, i: usize) -> Option<&HotVertex> {
        self.hot.get(i)
    }

    pub fn hot_vertices(&self) -> &[HotVertex] {
        &self.hot
    }

    /// Scaled model position of hot vertex `i`.
    pub fn hot_position(&self, i: usize) -> Option<Vec3> {
        self.hot.get(i).and_then(|h| self.vertex(h.vertex_index))
    }

    pub fn global_words(&self) -> &WordSet {
        &self.global_words
    }

    /// Record where hot vertex `i` landed on screen this frame.
    pub fn set_screen_position(&mut self, i: usize, x: f32, y: f32, radius: f32) {
        if let Some(h) = self.hot.get_mut(i) {
            h.screen = Some(ScreenCircle {
                center: Vec2::new(x, y),
                radius,
            });
        }
    }

    /// Forget all hit circles (their geometry is stale after a resize).
    pub fn clear_screen_positions(&mut self) {
        for h in &mut self.hot {
            h.screen = None;
        }
    }

    /// Make exactly `index` active (or none). Returns the word set the field
    /// should adopt: the vertex's labels, or the global words.
    pub fn activate(&mut self, index: Option<usize>) -> WordSet {
        let index = index.filter(|&i| i < self.hot.len());
        for (i, h) in self.hot.iter_mut().enumerate() {
            h.active = Some(i) == index;
        }
        self.words_for(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.hot.iter().position(|h| h.active)
    }

    pub fn words_for(&self, index: Option<usize>) -> WordSet {
        index
            .and_then(|i| self.hot.get(i))
            .map(|h| h.labels.clone())
            .unwrap_or_else(|| self.global_words.clone())
    }

    /// Hot vertex whose hit circle contains `point`; nearest center wins.
    pub fn hit_circle_at(&self, point: Vec2) -> Option<usize> {
        self.hot
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.screen.map(|c| (i, c)))
            .filter(|(_, c)| c.contains(point))
            .min_by(|(_, a), (_, b)| {
                a.center
                    .distance_squared(point)
                    .total_cmp(&b.center.distance_squared(point))
            })
            .map(|(i, _)| i)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.hot
            .iter()
            .enumerate()
            .map(|(i, h)| LegendEntry {
                index: i,
                numeral: roman(i + 1),
                title: h.title(),
            })
            .collect()
    }
}
