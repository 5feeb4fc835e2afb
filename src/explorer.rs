use std::collections::{HashMap, VecDeque};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use strum::{Display as StrumDisplay, VariantArray};
use tracing::{debug, error, info, warn};

use crate::error::ExploreError;
use crate::node::{Distance, ExploredNode, NodeId, NodeKind, Transition};
use crate::puzzle::{Puzzle, StateKey};

/// Where an [`Explorer`] is in its life.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Never initialized.
    #[default]
    Idle,
    /// The frontier still holds unexpanded states.
    Exploring,
    /// Every reachable state has been expanded.
    Exhausted,
}

/// A snapshot of exploration progress.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ExploreStats {
    pub discovered: usize,
    pub edges: usize,
    pub frontier: usize,
    pub pending_reveal: usize,
    pub phase: Phase,
}

/// Breadth-first explorer of a puzzle's state graph.
///
/// Exploration is incremental: [`run_batch`](Self::run_batch) expands a bounded number of states per call,
/// so it can share a thread with layout and drawing.
/// Every newly discovered state is queued twice, once on the frontier to be expanded and once on the reveal queue,
/// from which a [`ForceLayout`](crate::layout::ForceLayout) pulls states in discovery order.
///
/// Nodes are kept in an arena indexed by [`NodeId`]; the edge set is an undirected [`UnGraphMap`] over those ids.
/// The graph only ever grows until the next [`initialize`](Self::initialize).
pub struct Explorer<P: Puzzle> {
    nodes: Vec<ExploredNode<P>>,
    edges: UnGraphMap<NodeId, Transition<P::Move>>,
    index: HashMap<StateKey, NodeId>,
    frontier: VecDeque<NodeId>,
    reveal: VecDeque<NodeId>,
    start: Option<NodeId>,
    goal: Option<NodeId>,
    current: Option<NodeId>,
    phase: Phase,
    generation: u64,
}

impl<P: Puzzle> Default for Explorer<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: UnGraphMap::new(),
            index: HashMap::new(),
            frontier: VecDeque::new(),
            reveal: VecDeque::new(),
            start: None,
            goal: None,
            current: None,
            phase: Phase::Idle,
            generation: 0,
        }
    }
}

impl<P: Puzzle> Explorer<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An explorer already seeded with `start`.
    pub fn starting_from(start: P) -> Self {
        let mut explorer = Self::new();
        explorer.initialize(start);
        explorer
    }

    /// Discard everything discovered so far and seed exploration with `start`.
    ///
    /// The start node is placed on both the frontier and the reveal queue and becomes the current node.
    /// If `start` is already solved it is also recorded as the goal, but keeps [`NodeKind::Start`].
    /// Ids handed out before this call are invalidated, which [`generation`](Self::generation) records.
    pub fn initialize(&mut self, start: P) {
        self.generation = self.generation.wrapping_add(1);
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.frontier.clear();
        self.reveal.clear();
        self.goal = None;

        let is_goal = start.is_goal();
        let id = self.insert(ExploredNode::new(start, 0, NodeKind::Start, None));
        if is_goal {
            self.goal = Some(id);
        }

        self.start = Some(id);
        self.current = Some(id);
        self.phase = Phase::Exploring;
    }

    /// Bumped by every [`initialize`](Self::initialize). Ids are only meaningful within one generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn insert(&mut self, node: ExploredNode<P>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.index.insert(node.key.clone(), id);
        self.edges.add_node(id);
        self.nodes.push(node);
        self.frontier.push_back(id);
        self.reveal.push_back(id);
        id
    }

    /// Expand the state at the front of the frontier, trying every move from it.
    ///
    /// Returns `false` without doing anything once the frontier is empty.
    pub fn expand_one(&mut self) -> bool {
        let Some(id) = self.frontier.pop_front() else {
            if self.phase == Phase::Exploring {
                self.phase = Phase::Exhausted;
                info!(nodes = self.nodes.len(), edges = self.edges.edge_count(), "exploration exhausted");
            }
            return false;
        };

        let depth = self.nodes[id.index()].depth;
        let successors = P::Move::VARIANTS.iter()
            .filter_map(|mv| self.nodes[id.index()].state.apply(*mv).map(|next| (*mv, next)))
            .collect_vec();

        for (mv, next) in successors {
            let known = self.index.get(&next.key()).copied();

            match known {
                Some(existing) => {
                    // a second path to a known state; join it up without duplicating the node
                    match self.edges.edge_weight_mut(id, existing) {
                        Some(transition) => transition.record(id, existing, mv),
                        None => {
                            self.edges.add_edge(id, existing, Transition::new(id, existing, mv));
                        }
                    }
                }
                None => {
                    let is_goal = next.is_goal();
                    let kind = if is_goal && self.goal.is_none() { NodeKind::Goal } else { NodeKind::Normal };
                    let new = self.insert(ExploredNode::new(next, depth + 1, kind, Some(id)));

                    if kind == NodeKind::Goal {
                        self.goal = Some(new);
                        info!(depth = depth + 1, discovered = self.nodes.len(), "goal found");
                    }

                    self.edges.add_edge(id, new, Transition::new(id, new, mv));
                }
            }
        }

        true
    }

    /// Expand up to `max_steps` states. Returns how many were expanded; zero means exploration is exhausted.
    pub fn run_batch(&mut self, max_steps: usize) -> usize {
        let mut count = 0;
        while count < max_steps && self.expand_one() {
            count += 1;
        }

        debug!(
            expanded = count,
            discovered = self.nodes.len(),
            frontier = self.frontier.len(),
            pending_reveal = self.reveal.len(),
            "exploration batch"
        );
        count
    }

    /// Expand everything that remains. Returns the number of states expanded.
    pub fn run_to_exhaustion(&mut self) -> usize {
        let mut total = 0;
        while self.expand_one() {
            total += 1;
        }
        total
    }

    /// Point the current-position marker at `state`.
    ///
    /// A state that has not been discovered clears the marker instead of failing.
    pub fn update_current_position(&mut self, state: &P) -> Option<NodeId> {
        let key = state.key();
        self.current = self.index.get(&key).copied();
        if self.current.is_none() {
            warn!(key = %key, "current state is not part of the explored graph");
        }
        self.current
    }

    /// Label every node with its hop count to the goal by breadth-first search outward from the goal.
    ///
    /// Returns the number of labeled nodes, or zero, with a warning, if no goal has been found.
    /// Run before exploration is exhausted, the labels only describe the part of the graph discovered so far.
    pub fn compute_goal_distances(&mut self) -> usize {
        let Some(goal) = self.goal else {
            warn!(discovered = self.nodes.len(), "goal distances requested but no goal has been found");
            return 0;
        };

        if self.phase != Phase::Exhausted {
            warn!(discovered = self.nodes.len(), frontier = self.frontier.len(), "computing goal distances over a partial graph");
        }

        for node in &mut self.nodes {
            node.goal_distance = None;
        }

        let mut labeled = 1;
        let mut queue = VecDeque::from([(goal, 0)]);
        self.nodes[goal.index()].goal_distance = Some(0);

        while let Some((id, distance)) = queue.pop_front() {
            for next in self.edges.neighbors(id) {
                let node = &mut self.nodes[next.index()];
                if node.goal_distance.is_none() {
                    node.goal_distance = Some(distance + 1);
                    labeled += 1;
                    queue.push_back((next, distance + 1));
                }
            }
        }

        info!(labeled, discovered = self.nodes.len(), "goal distances computed");
        labeled
    }

    /// Whether [`compute_goal_distances`](Self::compute_goal_distances) has labeled the goal.
    pub fn has_goal_distances(&self) -> bool {
        self.goal.is_some_and(|goal| self.nodes[goal.index()].goal_distance == Some(0))
    }

    fn distance_of(&self, id: NodeId) -> Result<Distance, ExploreError> {
        self.get(id)
            .ok_or(ExploreError::UnknownNode(id))?
            .goal_distance
            .ok_or(ExploreError::DistancesNotComputed(id))
    }

    /// The neighbor of `id` closest to the goal, if it is strictly closer than `id`.
    fn closer_neighbor(&self, id: NodeId, distance: Distance) -> Option<(NodeId, Distance)> {
        self.edges.neighbors(id)
            .filter_map(|next| self.nodes[next.index()].goal_distance.map(|d| (next, d)))
            .min_by_key(|(_, d)| *d)
            .filter(|(_, d)| *d < distance)
    }

    /// Walk greedily from `from` to `to` along strictly decreasing goal distances.
    ///
    /// The returned path starts with `from` and ends with `to`, so it holds one more node than there are moves.
    /// Requires goal distances; see [`compute_goal_distances`](Self::compute_goal_distances).
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Result<Vec<NodeId>, ExploreError> {
        if self.goal.is_none() {
            return Err(ExploreError::NoGoal);
        }
        self.distance_of(to)?;

        let mut at = from;
        let mut distance = self.distance_of(from)?;
        let mut path = Vec::with_capacity(distance as usize + 1);
        path.push(at);

        while at != to {
            let Some((next, next_distance)) = self.closer_neighbor(at, distance) else {
                return Err(ExploreError::DeadEnd { at, distance });
            };

            path.push(next);
            at = next;
            distance = next_distance;
        }

        Ok(path)
    }

    /// [`shortest_path`](Self::shortest_path), logging failures and returning an empty path instead.
    pub fn reconstruct_shortest_path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        self.shortest_path(from, to).unwrap_or_else(|err| {
            error!(%from, %to, %err, "cannot reconstruct shortest path");
            Vec::new()
        })
    }

    /// One move closer to the goal from `from`: the neighbor with the smallest known goal distance.
    ///
    /// [`None`] at the goal, or when `from` has no labeled distance.
    pub fn step_toward_goal(&self, from: NodeId) -> Option<NodeId> {
        let distance = self.get(from)?.goal_distance?;
        self.closer_neighbor(from, distance).map(|(next, _)| next)
    }

    pub fn get(&self, id: NodeId) -> Option<&ExploredNode<P>> {
        self.nodes.get(id.index())
    }

    /// Look up a state by its key.
    pub fn id_of(&self, key: &StateKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Every discovered node, in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ExploredNode<P>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Neighbors of `id`, each with the move `id` makes to reach it if that move has been tried.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, Option<P::Move>)> + '_ {
        self.edges.edges(id).map(move |(a, b, transition)| {
            let other = if a == id { b } else { a };
            (other, transition.from_endpoint(id, other))
        })
    }

    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains_edge(a, b)
    }

    /// The undirected edge set.
    pub fn adjacency(&self) -> &UnGraphMap<NodeId, Transition<P::Move>> {
        &self.edges
    }

    /// Number of states discovered so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// The first goal state discovered. Later goal states are not tracked here.
    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub(crate) fn set_current(&mut self, id: Option<NodeId>) {
        self.current = id;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of discovered states that solve the puzzle, including any after the first.
    pub fn goal_states(&self) -> usize {
        self.nodes.iter().filter(|node| node.state.is_goal()).count()
    }

    /// Take the oldest node still waiting to be revealed.
    pub fn next_to_reveal(&mut self) -> Option<NodeId> {
        self.reveal.pop_front()
    }

    pub fn pending_reveal(&self) -> usize {
        self.reveal.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn stats(&self) -> ExploreStats {
        ExploreStats {
            discovered: self.nodes.len(),
            edges: self.edges.edge_count(),
            frontier: self.frontier.len(),
            pending_reveal: self.reveal.len(),
            phase: self.phase,
        }
    }
}

impl<P: Puzzle> std::ops::Index<NodeId> for Explorer<P> {
    type Output = ExploredNode<P>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}
