use crate::point::Vec2;
use crate::puzzle::Color;

/// A 2D drawing surface in screen pixels.
///
/// [`GraphView::draw`](crate::graph_view::GraphView::draw) does all projection itself, so implementations only paint.
pub trait Canvas {
    fn clear(&mut self, viewport: Vec2);
    fn line(&mut self, from: Vec2, to: Vec2, color: &Color, width: f64);
    fn circle(&mut self, center: Vec2, radius: f64, fill: Option<&Color>, stroke: Option<(&Color, f64)>);
    fn text(&mut self, at: Vec2, text: &str, color: &Color);
}

/// What to paint besides nodes and edges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DrawOptions {
    /// Label each node with its goal distance once known.
    pub goal_distances: bool,
    /// Highlight the shortest path from the current node to the goal.
    pub shortest_path: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self { goal_distances: false, shortest_path: true }
    }
}

pub(crate) const NODE_RADIUS: f64 = 2.5;
pub(crate) const MARKER_RADIUS: f64 = 8.0;
pub(crate) const CURRENT_RADIUS: f64 = 5.0;
pub(crate) const MARKER_WIDTH: f64 = 3.0;
pub(crate) const NODE_OUTLINE: Color = Color::named("#333");
pub(crate) const START_MARKER: Color = Color::named("green");
pub(crate) const GOAL_MARKER: Color = Color::named("red");
pub(crate) const CURRENT_MARKER: Color = Color::named("yellow");
pub(crate) const PATH_EDGE: Color = Color::named("#00ff88");
pub(crate) const LABEL: Color = Color::named("white");

/// A recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear { viewport: Vec2 },
    Line { from: Vec2, to: Vec2, color: Color, width: f64 },
    Circle { center: Vec2, radius: f64, fill: Option<Color>, stroke: Option<(Color, f64)> },
    Text { at: Vec2, text: String, color: Color },
}

/// A [`Canvas`] that records instead of painting, for replay on another surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList(pub Vec<DrawCommand>);

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.0
    }

    pub fn circles_with_stroke<'a>(&'a self, color: &'a Color) -> impl Iterator<Item = Vec2> + 'a {
        self.0.iter().filter_map(move |command| match command {
            DrawCommand::Circle { center, stroke: Some((stroke, _)), .. } if stroke == color => Some(*center),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, viewport: Vec2) {
        self.0.clear();
        self.0.push(DrawCommand::Clear { viewport });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: &Color, width: f64) {
        self.0.push(DrawCommand::Line { from, to, color: color.clone(), width });
    }

    fn circle(&mut self, center: Vec2, radius: f64, fill: Option<&Color>, stroke: Option<(&Color, f64)>) {
        self.0.push(DrawCommand::Circle {
            center,
            radius,
            fill: fill.cloned(),
            stroke: stroke.map(|(color, width)| (color.clone(), width)),
        });
    }

    fn text(&mut self, at: Vec2, text: &str, color: &Color) {
        self.0.push(DrawCommand::Text { at, text: text.to_owned(), color: color.clone() });
    }
}
