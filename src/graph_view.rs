use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, warn};
use unordered_pair::UnorderedPair;

use crate::explorer::Explorer;
use crate::layout::{ForceLayout, LayoutConfig};
use crate::node::NodeId;
use crate::point::Vec2;
use crate::puzzle::Puzzle;
use crate::render::{self, Canvas, DrawOptions};
use crate::view::{Gesture, InteractionMode, ViewConfig, ViewTransform};

type JumpCallback<P> = Box<dyn FnMut(&P)>;

/// The interactive picture of an explored graph: force layout, camera and pointer handling.
///
/// Pointer coordinates are screen pixels relative to the drawing surface.
/// Nothing here ever mutates the explorer except draining its reveal queue.
pub struct GraphView<P: Puzzle> {
    layout: ForceLayout,
    transform: ViewTransform,
    config: ViewConfig,
    mode: InteractionMode,
    gesture: Gesture,
    options: DrawOptions,
    on_jump: Option<JumpCallback<P>>,
}

impl<P: Puzzle> GraphView<P> {
    /// A zoom range that is empty or not strictly positive falls back to the default range.
    pub fn new(layout: LayoutConfig, mut config: ViewConfig, viewport: Vec2) -> Self {
        if !config.has_valid_zoom_range() {
            let fallback = ViewConfig::default();
            warn!(min = config.min_zoom, max = config.max_zoom, "invalid zoom range, using defaults");
            config.min_zoom = fallback.min_zoom;
            config.max_zoom = fallback.max_zoom;
        }

        Self {
            layout: ForceLayout::new(layout),
            transform: ViewTransform::new(viewport),
            config,
            mode: InteractionMode::Normal,
            gesture: Gesture::Idle,
            options: DrawOptions::default(),
            on_jump: None,
        }
    }

    /// Drop every visible node and recenter the camera. Mode, options and the jump callback survive.
    pub fn reset(&mut self) {
        self.layout.reset();
        self.transform = ViewTransform::new(self.transform.viewport);
        self.gesture = Gesture::Idle;
    }

    pub fn layout(&self) -> &ForceLayout {
        &self.layout
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn options_mut(&mut self) -> &mut DrawOptions {
        &mut self.options
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.transform.resize(viewport);
    }

    /// Register the function called with a node's state when it is tapped in [`InteractionMode::Jump`].
    pub fn set_jump_callback(&mut self, callback: impl FnMut(&P) + 'static) {
        self.on_jump = Some(Box::new(callback));
    }

    /// See [`ForceLayout::reveal_batch`].
    pub fn reveal_batch(&mut self, explorer: &mut Explorer<P>, n: usize) -> bool {
        self.layout.reveal_batch(explorer, n)
    }

    pub fn physics_tick(&mut self, explorer: &Explorer<P>) {
        self.layout.tick(explorer);
    }

    pub fn project_to_screen(&self, world: Vec2) -> Vec2 {
        self.transform.project(world)
    }

    pub fn unproject_from_screen(&self, screen: Vec2) -> Vec2 {
        self.transform.unproject(screen)
    }

    /// The visible node nearest to a screen point, however far away it is.
    pub fn find_nearest_node(&self, screen: Vec2) -> Option<NodeId> {
        self.layout.nearest(self.unproject_from_screen(screen))
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch modes, abandoning whatever gesture is in progress.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "interaction mode");
        }
        self.cancel_gesture();
        self.mode = mode;
    }

    /// Abandon the current gesture without completing it, as when the pointer leaves the surface.
    pub fn cancel_gesture(&mut self) {
        self.layout.release();
        self.gesture = Gesture::Idle;
    }

    pub fn on_pointer_down(&mut self, at: Vec2) {
        self.layout.release();
        self.gesture = match self.mode {
            InteractionMode::Normal => Gesture::Panning { last: at },
            InteractionMode::Drag => match self.find_nearest_node(at) {
                Some(node) => {
                    self.layout.hold(node);
                    Gesture::Dragging { node, last: at }
                }
                None => Gesture::Idle,
            },
            InteractionMode::Jump => Gesture::PendingTap { origin: at, last: at, panning: false },
        };
    }

    pub fn on_pointer_move(&mut self, at: Vec2) {
        self.gesture = match self.gesture {
            Gesture::Panning { last } => {
                self.transform.pan_by(at - last);
                Gesture::Panning { last: at }
            }
            Gesture::Dragging { node, last } => {
                self.layout.drag_by(node, (at - last) / self.transform.zoom);
                Gesture::Dragging { node, last: at }
            }
            Gesture::PendingTap { origin, last, panning } => {
                if panning || origin.distance(at) > self.config.tap_threshold {
                    self.transform.pan_by(at - last);
                    Gesture::PendingTap { origin, last: at, panning: true }
                } else {
                    Gesture::PendingTap { origin, last, panning }
                }
            }
            other => other,
        };
    }

    /// Finish the current gesture. A jump-mode tap returns the tapped node after handing its state to the jump callback.
    pub fn on_pointer_up(&mut self, explorer: &Explorer<P>, at: Vec2) -> Option<NodeId> {
        let gesture = std::mem::take(&mut self.gesture);
        self.layout.release();

        let Gesture::PendingTap { origin, panning: false, .. } = gesture else {
            return None;
        };
        if origin.distance(at) > self.config.tap_threshold {
            return None;
        }

        if !self.layout.tracks(explorer) {
            return None;
        }
        let node = self.find_nearest_node(at)?;
        debug!(%node, key = %explorer[node].key(), "jump");
        if let Some(callback) = self.on_jump.as_mut() {
            callback(explorer[node].state());
        }
        Some(node)
    }

    /// Zoom one wheel notch anchored at the pointer. Positive `delta_y` zooms out.
    pub fn on_wheel(&mut self, at: Vec2, delta_y: f64) {
        let factor = if delta_y > 0.0 { self.config.wheel_zoom_out } else { self.config.wheel_zoom_in };
        self.zoom_at(at, factor);
    }

    pub fn zoom_at(&mut self, anchor: Vec2, factor: f64) {
        self.transform.zoom_at(anchor, factor, self.config.min_zoom, self.config.max_zoom);
    }

    /// Begin a two-pointer gesture, abandoning any single-pointer one.
    pub fn on_pinch_start(&mut self, a: Vec2, b: Vec2) {
        self.layout.release();
        self.gesture = Gesture::Pinching { distance: a.distance(b), midpoint: a.midpoint(b) };
    }

    /// Pan by the motion of the midpoint and zoom by the change in spread, anchored at the new midpoint.
    pub fn on_pinch_move(&mut self, a: Vec2, b: Vec2) {
        let Gesture::Pinching { distance, midpoint } = self.gesture else {
            return self.on_pinch_start(a, b);
        };

        let spread = a.distance(b);
        let center = a.midpoint(b);
        self.transform.pan_by(center - midpoint);
        if distance > 0.0 && spread > 0.0 {
            self.zoom_at(center, spread / distance);
        }
        self.gesture = Gesture::Pinching { distance: spread, midpoint: center };
    }

    pub fn on_pinch_end(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Paint visible edges and nodes, markers for the start, goal and current states, and the path to the goal.
    pub fn draw(&self, explorer: &Explorer<P>, canvas: &mut impl Canvas) {
        canvas.clear(self.transform.viewport);
        if self.layout.is_empty() || !self.layout.tracks(explorer) {
            return;
        }

        let on_path: HashSet<UnorderedPair<NodeId>> = match (self.options.shortest_path, explorer.current(), explorer.goal()) {
            (true, Some(current), Some(goal)) if explorer.has_goal_distances() => explorer
                .shortest_path(current, goal)
                .map(|path| {
                    path.into_iter()
                        .tuple_windows::<(NodeId, NodeId)>()
                        .map(|(a, b)| UnorderedPair(a, b))
                        .collect()
                })
                .unwrap_or_default(),
            _ => HashSet::new(),
        };

        let screen = |id: NodeId| self.layout.position(id).map(|world| self.project_to_screen(world));

        for (a, b, transition) in explorer.adjacency().all_edges() {
            let (Some(from), Some(to)) = (screen(a), screen(b)) else { continue };

            if on_path.contains(&UnorderedPair(a, b)) {
                canvas.line(from, to, &render::PATH_EDGE, render::MARKER_WIDTH);
            } else {
                let color = transition.any().map(P::edge_color).unwrap_or(render::LABEL);
                canvas.line(from, to, &color, 1.0);
            }
        }

        for (id, body) in self.layout.bodies() {
            let at = self.project_to_screen(body.position);
            let node = &explorer[id];
            canvas.circle(at, render::NODE_RADIUS, Some(&node.state().node_color()), Some((&render::NODE_OUTLINE, 1.0)));

            if self.options.goal_distances {
                if let Some(distance) = node.goal_distance() {
                    canvas.text(at + Vec2::new(render::MARKER_RADIUS, 0.0), &distance.to_string(), &render::LABEL);
                }
            }
        }

        let markers = [
            (explorer.start(), render::MARKER_RADIUS, render::START_MARKER),
            (explorer.goal(), render::MARKER_RADIUS, render::GOAL_MARKER),
            (explorer.current(), render::CURRENT_RADIUS, render::CURRENT_MARKER),
        ];
        for (id, radius, color) in markers {
            if let Some(at) = id.and_then(screen) {
                canvas.circle(at, radius, None, Some((&color, render::MARKER_WIDTH)));
            }
        }
    }
}
