use std::fmt::{Display, Formatter};

use strum::Display as StrumDisplay;

use crate::puzzle::{Puzzle, StateKey};

/// BFS hop count, either from the start or to the goal.
pub type Distance = u32;

/// Index of a discovered state in the explorer's arena.
///
/// Ids are handed out in discovery order, so a lower id was discovered earlier.
#[derive(Copy, Clone, Hash, PartialEq, Eq, Ord, PartialOrd, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Start,
    Goal,
    #[default]
    Normal,
}

/// A discovered state together with what exploration learned about it.
///
/// Everything here except `goal_distance` is fixed at discovery.
/// Layout data lives with the [`ForceLayout`](crate::layout::ForceLayout), not here.
#[derive(Clone, Debug)]
pub struct ExploredNode<P: Puzzle> {
    pub(crate) state: P,
    pub(crate) key: StateKey,
    pub(crate) depth: Distance,
    pub(crate) goal_distance: Option<Distance>,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
}

impl<P: Puzzle> ExploredNode<P> {
    pub(crate) fn new(state: P, depth: Distance, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            key: state.key(),
            state,
            depth,
            goal_distance: None,
            kind,
            parent,
        }
    }

    pub fn state(&self) -> &P {
        &self.state
    }

    pub fn key(&self) -> &StateKey {
        &self.key
    }

    /// Hops from the start at the moment this node was first discovered.
    pub fn depth(&self) -> Distance {
        self.depth
    }

    /// Hops to the goal, once [`compute_goal_distances`](crate::explorer::Explorer::compute_goal_distances) has labeled this node.
    pub fn goal_distance(&self) -> Option<Distance> {
        self.goal_distance
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node being expanded when this one was discovered.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// The moves along one undirected edge.
///
/// Like the edge set itself, this is keyed from the lower indexed endpoint:
/// `low_to_high` is the move the lower [`NodeId`] makes to reach the higher one, and `high_to_low` the reverse.
/// A side stays [`None`] until exploration has actually tried that move from that endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Transition<M> {
    pub low_to_high: Option<M>,
    pub high_to_low: Option<M>,
}

impl<M: Copy> Transition<M> {
    pub(crate) fn new(from: NodeId, to: NodeId, mv: M) -> Self {
        let mut transition = Self { low_to_high: None, high_to_low: None };
        transition.record(from, to, mv);
        transition
    }

    pub(crate) fn record(&mut self, from: NodeId, to: NodeId, mv: M) {
        if from < to {
            self.low_to_high = Some(mv);
        } else {
            self.high_to_low = Some(mv);
        }
    }

    /// The move that leads from `from` across this edge to `to`, if it has been seen.
    pub fn from_endpoint(&self, from: NodeId, to: NodeId) -> Option<M> {
        if from < to { self.low_to_high } else { self.high_to_low }
    }

    /// Any known move along this edge, preferring the lower endpoint's.
    pub fn any(&self) -> Option<M> {
        self.low_to_high.or(self.high_to_low)
    }
}
