use std::collections::HashMap;

use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::explorer::Explorer;
use crate::node::NodeId;
use crate::point::Vec2;
use crate::puzzle::Puzzle;

/// Tuning of the force-directed layout. The defaults suit graphs of up to a few thousand states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Strength of the inverse-square push between every pair of nodes.
    pub repulsion: f64,
    /// Extra push between nodes of equal depth, scaled by the square root of how many share that depth.
    pub same_depth_boost: f64,
    /// Spring constant along edges.
    pub attraction: f64,
    /// Pull toward the centroid of the visible nodes.
    pub centering: f64,
    /// Downward force per unit of depth, so the layout reads top to bottom.
    pub depth_gravity: f64,
    /// Fraction of velocity kept each tick.
    pub damping: f64,
    pub max_velocity: f64,
    /// Floor on pair distances.
    pub distance_epsilon: f64,
    /// Newly revealed nodes spawn up to this far either side of the centroid.
    pub spawn_jitter: f64,
    /// Newly revealed nodes spawn this far below the lowest node.
    pub spawn_gap: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 3000.0,
            same_depth_boost: 0.5,
            attraction: 0.0025,
            centering: 0.00125,
            depth_gravity: 0.0625,
            damping: 0.9,
            max_velocity: 50.0,
            distance_epsilon: 0.1,
            spawn_jitter: 50.0,
            spawn_gap: 20.0,
            seed: 0x5eed,
        }
    }
}

/// Physical state of one visible node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub force: Vec2,
    /// Excluded from integration. Only the first node ever revealed is anchored.
    pub anchored: bool,
}

/// The visible subset of an explored graph, embedded in the plane by a force simulation.
///
/// Nodes join in the order the [`Explorer`] discovered them and never leave until [`reset`](Self::reset).
/// All positions and velocities live here; the explorer is only ever read.
///
/// The layout remembers which [`Explorer::generation`] its ids belong to. Re-initializing the explorer
/// empties the layout on its next reveal or tick.
pub struct ForceLayout {
    config: LayoutConfig,
    ids: Vec<NodeId>,
    bodies: Vec<Body>,
    slots: HashMap<NodeId, usize>,
    held: Option<NodeId>,
    rng: SmallRng,
    generation: Option<u64>,
}

impl ForceLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ids: Vec::new(),
            bodies: Vec::new(),
            slots: HashMap::new(),
            held: None,
            rng: SmallRng::seed_from_u64(config.seed),
            generation: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Forget every visible node.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.bodies.clear();
        self.slots.clear();
        self.held = None;
        self.rng = SmallRng::seed_from_u64(self.config.seed);
        self.generation = None;
    }

    /// Whether every visible id refers to a node of `explorer` as it is now.
    pub fn tracks<P: Puzzle>(&self, explorer: &Explorer<P>) -> bool {
        self.generation.map_or(true, |generation| generation == explorer.generation())
    }

    fn sync<P: Puzzle>(&mut self, explorer: &Explorer<P>) {
        if !self.tracks(explorer) {
            if !self.ids.is_empty() {
                warn!(stale = self.ids.len(), "explorer was re-initialized, dropping visible nodes");
            }
            self.reset();
        }
        self.generation = Some(explorer.generation());
    }

    /// Move up to `n` nodes from the explorer's reveal queue into the layout.
    ///
    /// Returns whether anything was added; `false` means the reveal queue was empty.
    pub fn reveal_batch<P: Puzzle>(&mut self, explorer: &mut Explorer<P>, n: usize) -> bool {
        self.sync(explorer);
        let mut added = 0;
        while added < n {
            let Some(id) = explorer.next_to_reveal() else { break };
            self.place(id);
            added += 1;
        }

        if added > 0 {
            debug!(added, visible = self.ids.len(), discovered = explorer.len(), "reveal batch");
        }
        added > 0
    }

    fn place(&mut self, id: NodeId) {
        if self.slots.contains_key(&id) {
            return;
        }

        let body = if self.bodies.is_empty() {
            Body { anchored: true, ..Body::default() }
        } else {
            let lowest = self.bodies.iter().map(|body| body.position.y).fold(f64::NEG_INFINITY, f64::max);
            let jitter = self.config.spawn_jitter;
            let x = self.centroid().x + self.rng.random_range(-jitter..=jitter);
            Body {
                position: Vec2::new(x, lowest + self.config.spawn_gap),
                ..Body::default()
            }
        };

        self.slots.insert(id, self.bodies.len());
        self.ids.push(id);
        self.bodies.push(body);
    }

    fn centroid(&self) -> Vec2 {
        if self.bodies.is_empty() {
            return Vec2::ZERO;
        }

        let sum = self.bodies.iter().fold(Vec2::ZERO, |acc, body| acc + body.position);
        sum / self.bodies.len() as f64
    }

    /// Advance the simulation by one step.
    pub fn tick<P: Puzzle>(&mut self, explorer: &Explorer<P>) {
        self.sync(explorer);
        let n = self.bodies.len();
        if n == 0 {
            return;
        }

        let cfg = self.config;
        let depths = self.ids.iter().map(|id| explorer[*id].depth()).collect_vec();
        let per_depth = depths.iter().copied().counts();

        for body in &mut self.bodies {
            body.force = Vec2::ZERO;
        }

        // pairwise repulsion
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.bodies[j].position - self.bodies[i].position;
                let raw = delta.length();
                let (direction, dist) = if raw < cfg.distance_epsilon {
                    // coincident; push apart along x
                    (Vec2::new(1.0, 0.0), cfg.distance_epsilon)
                } else {
                    (delta / raw, raw)
                };

                let mut strength = cfg.repulsion / (dist * dist);
                if depths[i] == depths[j] {
                    let siblings = per_depth.get(&depths[i]).copied().unwrap_or(1) as f64;
                    strength += cfg.repulsion * siblings.sqrt() * cfg.same_depth_boost / (dist * dist);
                }

                self.bodies[i].force -= direction * strength;
                self.bodies[j].force += direction * strength;
            }
        }

        // springs along edges with both ends visible
        for i in 0..n {
            let here = self.bodies[i].position;
            let pull = explorer.adjacency().neighbors(self.ids[i])
                .filter_map(|other| self.slots.get(&other))
                .fold(Vec2::ZERO, |acc, slot| acc + (self.bodies[*slot].position - here));
            self.bodies[i].force += pull * cfg.attraction;
        }

        let center = self.centroid();
        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.force += (center - body.position) * cfg.centering;
            body.force.y += f64::from(depths[i]) * cfg.depth_gravity;

            if body.anchored || self.held == Some(self.ids[i]) {
                body.velocity = Vec2::ZERO;
                continue;
            }

            body.velocity = (body.velocity + body.force) * cfg.damping;
            let speed = body.velocity.length();
            if speed > cfg.max_velocity {
                body.velocity = body.velocity * (cfg.max_velocity / speed);
            }
            body.position += body.velocity;
        }
    }

    /// Start dragging `id`; it stops integrating until [`release`](Self::release).
    pub fn hold(&mut self, id: NodeId) {
        if self.slots.contains_key(&id) {
            self.held = Some(id);
        }
    }

    pub fn release(&mut self) {
        self.held = None;
    }

    pub fn held(&self) -> Option<NodeId> {
        self.held
    }

    /// Move `id` directly by `delta` world units, zeroing its velocity.
    pub fn drag_by(&mut self, id: NodeId, delta: Vec2) {
        if let Some(body) = self.slots.get(&id).map(|slot| &mut self.bodies[*slot]) {
            body.position += delta;
            body.velocity = Vec2::ZERO;
        }
    }

    /// The visible node closest to `world`, with no distance cutoff.
    pub fn nearest(&self, world: Vec2) -> Option<NodeId> {
        self.ids.iter().zip(&self.bodies)
            .min_by(|(_, a), (_, b)| a.position.distance(world).total_cmp(&b.position.distance(world)))
            .map(|(id, _)| *id)
    }

    pub fn body(&self, id: NodeId) -> Option<&Body> {
        self.slots.get(&id).map(|slot| &self.bodies[*slot])
    }

    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.body(id).map(|body| body.position)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Visible nodes in reveal order.
    pub fn bodies(&self) -> impl Iterator<Item = (NodeId, &Body)> {
        self.ids.iter().copied().zip(&self.bodies)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
