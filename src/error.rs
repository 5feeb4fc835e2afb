use thiserror::Error;

use crate::node::{Distance, NodeId};

/// Reasons a query against the explored graph may fail.
///
/// None of these are fatal to a session; the infallible entry points log them and fall back to an empty result.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExploreError {
    /// No goal state has been discovered (yet).
    #[error("no goal state has been discovered")]
    NoGoal,
    /// Goal distances were never computed, or do not reach the requested node.
    #[error("goal distance of {0} is not known; run compute_goal_distances after exploration finishes")]
    DistancesNotComputed(NodeId),
    /// The id does not belong to the current graph.
    #[error("{0} is not part of the explored graph")]
    UnknownNode(NodeId),
    /// No neighbor is closer to the goal, which means the labels are inconsistent with the edges.
    /// This should never happen once exploration is exhausted.
    #[error("no neighbor of {at} is closer to the goal than {distance}")]
    DeadEnd { at: NodeId, distance: Distance },
}
