use strum::{Display as StrumDisplay, EnumString, VariantArray};

use crate::node::NodeId;
use crate::point::Vec2;

/// Camera and gesture tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom multiplier for one wheel notch toward the screen.
    pub wheel_zoom_in: f64,
    /// Zoom multiplier for one wheel notch away from the screen.
    pub wheel_zoom_out: f64,
    /// A jump-mode press that travels further than this many pixels becomes a pan.
    pub tap_threshold: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            tap_threshold: 10.0,
        }
    }
}

impl ViewConfig {
    /// `0 < min_zoom <= max_zoom`.
    pub fn has_valid_zoom_range(&self) -> bool {
        self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom
    }
}

/// Maps world coordinates of the layout to screen pixels.
///
/// `screen = center + pan + zoom * world`, where `center` is the middle of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan: Vec2,
    pub viewport: Vec2,
}

impl ViewTransform {
    pub fn new(viewport: Vec2) -> Self {
        Self { zoom: 1.0, pan: Vec2::ZERO, viewport }
    }

    pub fn center(&self) -> Vec2 {
        self.viewport / 2.0
    }

    pub fn project(&self, world: Vec2) -> Vec2 {
        self.center() + self.pan + world * self.zoom
    }

    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        (screen - self.center() - self.pan) / self.zoom
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Multiply the zoom by `factor`, clamped to `[min, max]`, keeping the world point under `anchor` fixed on screen.
    /// An inverted range does not panic; `max` wins.
    pub fn zoom_at(&mut self, anchor: Vec2, factor: f64, min: f64, max: f64) {
        let world = self.unproject(anchor);
        self.zoom = (self.zoom * factor).max(min).min(max);
        self.pan = anchor - self.center() - world * self.zoom;
    }

    /// Change the viewport size without moving the view center.
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }
}

/// What a single-pointer gesture on the graph does.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, VariantArray, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InteractionMode {
    /// Dragging pans the camera.
    #[default]
    Normal,
    /// Pressing picks up the nearest node and dragging moves it.
    Drag,
    /// Tapping a node jumps the puzzle to that state; dragging still pans.
    Jump,
}

/// The gesture in progress.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning { last: Vec2 },
    Dragging { node: NodeId, last: Vec2 },
    /// A jump-mode press not yet known to be a tap or a pan.
    PendingTap { origin: Vec2, last: Vec2, panning: bool },
    Pinching { distance: f64, midpoint: Vec2 },
}
