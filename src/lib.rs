//! # `puzzlegraph`
//!
//! Explore the state space of a puzzle breadth-first and watch its graph unfold.
//! Implement [`Puzzle`] for a state type, or use one of the bundled puzzles, [`Hanoi`] and [`Iwahswap`].
//! Assemble a [`Session`] with a [`SessionBuilder`], start it, then call [`Session::advance`] from a timer or frame loop.
//!
//! # Internals
//! A session interleaves three periodic tasks on the caller's thread.
//!
//! 1. The [`Explorer`] expands a bounded batch of states, adding every state it discovers to an arena and
//! every legal move between two states to an undirected edge set. Newly discovered states queue up to be revealed.
//! Once exploration runs dry, a breadth-first search outward from the goal labels every state with its distance to the goal.
//! 2. The [`ForceLayout`] pulls a batch of discovered states from that queue and gives each a position
//! just below the current picture.
//! 3. The layout takes one step of a force simulation: every pair of states repels, states joined by a move attract,
//! everything drifts toward the centroid and deeper states sink.
//!
//! Drawing goes through the [`Canvas`] trait; [`DrawList`] records commands for replay elsewhere.
//! With the `wasm` feature, `wasm::HanoiGraph` and `wasm::IwahswapGraph` drive the same machinery from a browser.

pub use builder::{ConfigInvalidReason, SessionBuilder};
pub use error::ExploreError;
pub use explorer::{ExploreStats, Explorer, Phase};
pub use graph_view::GraphView;
pub use hanoi::{Hanoi, HanoiMove};
pub use iwahswap::{Iwahswap, IwahswapMove, IwahswapRules};
pub use layout::{Body, ForceLayout, LayoutConfig};
pub use node::{Distance, ExploredNode, NodeId, NodeKind, Transition};
pub use point::Vec2;
pub use puzzle::{Color, Puzzle, StateKey};
pub use render::{Canvas, DrawCommand, DrawList, DrawOptions};
pub use session::{Cadence, ScheduleConfig, Scheduler, Session, Task, TickReport};
pub use view::{Gesture, InteractionMode, ViewConfig, ViewTransform};

pub mod builder;
pub mod error;
pub mod explorer;
pub mod graph_view;
pub mod hanoi;
pub mod iwahswap;
pub mod layout;
pub mod node;
pub mod point;
pub mod puzzle;
pub mod render;
pub mod session;
mod tests;
pub mod view;
#[cfg(feature = "wasm")]
pub mod wasm;
