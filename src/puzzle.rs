use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use strum::VariantArray;

/// Identity of a puzzle state within an explored graph.
///
/// Two states with equal keys are the same vertex. Implementations must make the key a pure function of the state;
/// distinct states sharing a key would be silently merged, so keys should encode every field that affects legal moves.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateKey(String);

impl StateKey {
    /// Wrap an already rendered key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as rendered by the puzzle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A CSS color, as handed to a [`Canvas`](crate::render::Canvas).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Color(pub Cow<'static, str>);

impl Color {
    /// A color known at compile time.
    pub const fn named(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the explorer and the graph view need from a puzzle.
///
/// A state is treated as an immutable value: [`apply`](Puzzle::apply) produces a new state and never mutates `self`.
/// The set of possible moves is the static array [`VariantArray::VARIANTS`] on [`Puzzle::Move`];
/// exploration tries each of them, in that order, from every state.
///
/// [`Hanoi`](crate::hanoi::Hanoi) and [`Iwahswap`](crate::iwahswap::Iwahswap) are built-in implementations.
pub trait Puzzle: Clone + Debug {
    /// One direction in which the puzzle may be moved.
    type Move: Copy + Eq + Hash + Debug + Display + VariantArray;

    /// Attempt `mv` from this state, returning the resulting state or [`None`] if the move is not legal here.
    fn apply(&self, mv: Self::Move) -> Option<Self>;
    /// Render the identity of this state.
    fn key(&self) -> StateKey;
    /// Whether this state solves the puzzle.
    fn is_goal(&self) -> bool;

    /// Fill color of this state's vertex.
    fn node_color(&self) -> Color {
        Color::named("#ffffff")
    }

    /// Stroke color of an edge produced by `mv`.
    fn edge_color(_mv: Self::Move) -> Color {
        Color::named("rgba(255, 255, 255, 0.3)")
    }

    /// Number of directions tried from every state.
    fn num_directions() -> usize {
        Self::Move::VARIANTS.len()
    }

    /// Look up a direction by its position in [`VariantArray::VARIANTS`].
    fn direction(index: usize) -> Option<Self::Move> {
        Self::Move::VARIANTS.get(index).copied()
    }
}
