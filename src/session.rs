use std::time::Duration;

use strum::{Display as StrumDisplay, VariantArray};
use tracing::{debug, info, warn};

use crate::explorer::Explorer;
use crate::graph_view::GraphView;
use crate::layout::LayoutConfig;
use crate::node::NodeId;
use crate::point::Vec2;
use crate::puzzle::Puzzle;
use crate::render::Canvas;
use crate::view::{InteractionMode, ViewConfig};

/// The periodic activities of a session, in the order they run within one [`Session::advance`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, VariantArray, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Task {
    Explore,
    Reveal,
    Physics,
}

impl Task {
    fn slot(self) -> usize {
        self as usize
    }
}

/// How often a task runs and how much work it does each time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cadence {
    pub period: Duration,
    pub batch: usize,
}

impl Cadence {
    pub const fn new(period: Duration, batch: usize) -> Self {
        Self { period, batch }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScheduleConfig {
    /// States expanded per exploration tick.
    pub explore: Cadence,
    /// Nodes revealed per reveal tick.
    pub reveal: Cadence,
    /// Physics steps per physics tick.
    pub physics: Cadence,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            explore: Cadence::new(Duration::from_millis(100), 100),
            reveal: Cadence::new(Duration::from_millis(50), 25),
            physics: Cadence::new(Duration::from_millis(50), 1),
        }
    }
}

impl ScheduleConfig {
    pub fn cadence(&self, task: Task) -> Cadence {
        match task {
            Task::Explore => self.explore,
            Task::Reveal => self.reveal,
            Task::Physics => self.physics,
        }
    }
}

/// Three periodic timers on a clock supplied by the caller.
///
/// A stopped task has no due time. Timers never fire on their own; [`Session::advance`] polls them.
#[derive(Clone, Debug)]
pub struct Scheduler {
    config: ScheduleConfig,
    due: [Option<Duration>; 3],
}

impl Scheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config, due: [None; 3] }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Arm every task to fire at `now`.
    pub fn start_all(&mut self, now: Duration) {
        self.due = [Some(now); 3];
    }

    pub fn stop(&mut self, task: Task) {
        self.due[task.slot()] = None;
    }

    pub fn stop_all(&mut self) {
        self.due = [None; 3];
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.due[task.slot()].is_some()
    }

    /// Whether no task is armed.
    pub fn is_idle(&self) -> bool {
        self.due.iter().all(Option::is_none)
    }

    pub fn is_due(&self, task: Task, now: Duration) -> bool {
        self.due[task.slot()].is_some_and(|due| due <= now)
    }

    /// Record that `task` ran at `now`. Missed periods are skipped rather than replayed.
    fn ran(&mut self, task: Task, now: Duration) {
        if let Some(due) = self.due[task.slot()].as_mut() {
            *due = now + self.config.cadence(task).period;
        }
    }
}

/// Work done by one [`Session::advance`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TickReport {
    pub expanded: usize,
    pub revealed: bool,
    pub physics_steps: usize,
}

/// A puzzle being played alongside the live picture of its state graph.
///
/// The session owns the explorer, the graph view and the scheduler that interleaves them,
/// plus the player's position and undo history.
/// Everything runs on the caller's thread inside [`advance`](Self::advance) and the input handlers,
/// so stopping and restarting can never race a stale tick.
pub struct Session<P: Puzzle> {
    explorer: Explorer<P>,
    view: GraphView<P>,
    scheduler: Scheduler,
    initial: P,
    state: P,
    history: Vec<P>,
}

impl<P: Puzzle> Session<P> {
    pub(crate) fn new(initial: P, layout: LayoutConfig, view: ViewConfig, schedule: ScheduleConfig, viewport: Vec2) -> Self {
        Self {
            explorer: Explorer::new(),
            view: GraphView::new(layout, view, viewport),
            scheduler: Scheduler::new(schedule),
            state: initial.clone(),
            initial,
            history: Vec::new(),
        }
    }

    pub fn explorer(&self) -> &Explorer<P> {
        &self.explorer
    }

    pub fn view(&self) -> &GraphView<P> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut GraphView<P> {
        &mut self.view
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The player's current position.
    pub fn state(&self) -> &P {
        &self.state
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Start exploring from the player's current position, discarding any earlier graph and its picture.
    pub fn start(&mut self, now: Duration) {
        self.scheduler.stop_all();
        info!(key = %self.state.key(), "starting exploration");
        self.explorer.initialize(self.state.clone());
        self.view.reset();
        self.scheduler.start_all(now);
    }

    /// Play from `start` instead: it becomes both the current position and the one [`reset`](Self::reset)
    /// returns to, the history is dropped, and exploration begins afresh from it.
    pub fn restart(&mut self, start: P, now: Duration) {
        self.initial = start.clone();
        self.state = start;
        self.history.clear();
        self.start(now);
    }

    /// Stop every task. The explored graph and layout are kept as they are.
    pub fn stop(&mut self) {
        self.scheduler.stop_all();
    }

    /// Run every task that is due at `now`, exploration first.
    pub fn advance(&mut self, now: Duration) -> TickReport {
        let mut report = TickReport::default();
        let config = *self.scheduler.config();

        if self.scheduler.is_due(Task::Explore, now) {
            report.expanded = self.explorer.run_batch(config.explore.batch);
            self.scheduler.ran(Task::Explore, now);

            if report.expanded == 0 {
                self.scheduler.stop(Task::Explore);
                self.explorer.compute_goal_distances();
            }
        }

        if self.scheduler.is_due(Task::Reveal, now) {
            report.revealed = self.view.reveal_batch(&mut self.explorer, config.reveal.batch);
            self.scheduler.ran(Task::Reveal, now);

            if !report.revealed && !self.scheduler.is_running(Task::Explore) {
                self.scheduler.stop(Task::Reveal);
                debug!(visible = self.view.layout().len(), "reveal complete");
            }
        }

        if self.scheduler.is_due(Task::Physics, now) {
            for _ in 0..config.physics.batch {
                self.view.physics_tick(&self.explorer);
            }
            report.physics_steps = config.physics.batch;
            self.scheduler.ran(Task::Physics, now);
        }

        report
    }

    /// Advance on a clock stepping by each task's period until exploration and reveal have both finished,
    /// or `max_ticks` ticks have passed. Returns the clock at which it stopped.
    pub fn run_until_settled(&mut self, mut now: Duration, max_ticks: usize) -> Duration {
        let step = Task::VARIANTS.iter()
            .map(|task| self.scheduler.config().cadence(*task).period)
            .min()
            .unwrap_or(Duration::from_millis(1));

        for _ in 0..max_ticks {
            if !self.scheduler.is_running(Task::Explore) && !self.scheduler.is_running(Task::Reveal) {
                break;
            }
            self.advance(now);
            now += step;
        }
        now
    }

    fn set_state(&mut self, next: P) {
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push(previous);
        self.sync_position();
    }

    fn sync_position(&mut self) {
        if !self.explorer.is_empty() {
            self.explorer.update_current_position(&self.state);
        }
    }

    /// Play `mv` from the current position. Returns whether it was legal.
    pub fn apply_move(&mut self, mv: P::Move) -> bool {
        match self.state.apply(mv) {
            Some(next) => {
                self.set_state(next);
                true
            }
            None => false,
        }
    }

    /// Move the player to a discovered state.
    pub fn jump_to(&mut self, id: NodeId) -> bool {
        let Some(node) = self.explorer.get(id) else {
            warn!(%id, "jump target is not part of the explored graph");
            return false;
        };

        let next = node.state().clone();
        self.set_state(next);
        self.explorer.set_current(Some(id));
        true
    }

    /// Return to the position before the last move or jump.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.sync_position();
                true
            }
            None => false,
        }
    }

    /// Return to the initial position. The move is undoable unless the player was already there.
    pub fn reset(&mut self) {
        if self.state.key() != self.initial.key() {
            self.set_state(self.initial.clone());
        }
    }

    /// Take one move along a shortest path to the goal. Needs goal distances.
    pub fn step_toward_goal(&mut self) -> bool {
        let Some(here) = self.explorer.id_of(&self.state.key()) else {
            debug!("current state not found in graph");
            return false;
        };

        match self.explorer[here].goal_distance() {
            None => {
                debug!("goal distances not calculated yet");
                false
            }
            Some(0) => {
                debug!("already at goal");
                false
            }
            Some(_) => match self.explorer.step_toward_goal(here) {
                Some(next) => self.jump_to(next),
                None => {
                    debug!("no better neighbor found");
                    false
                }
            },
        }
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_goal()
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.view.set_mode(mode);
    }

    pub fn pointer_down(&mut self, at: Vec2) {
        self.view.on_pointer_down(at);
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        self.view.on_pointer_move(at);
    }

    /// Finish a gesture. A jump-mode tap moves the player to the tapped state, which is returned.
    pub fn pointer_up(&mut self, at: Vec2) -> Option<NodeId> {
        let target = self.view.on_pointer_up(&self.explorer, at)?;
        self.jump_to(target).then_some(target)
    }

    pub fn pointer_leave(&mut self) {
        self.view.cancel_gesture();
    }

    pub fn wheel(&mut self, at: Vec2, delta_y: f64) {
        self.view.on_wheel(at, delta_y);
    }

    pub fn pinch_start(&mut self, a: Vec2, b: Vec2) {
        self.view.on_pinch_start(a, b);
    }

    pub fn pinch_move(&mut self, a: Vec2, b: Vec2) {
        self.view.on_pinch_move(a, b);
    }

    pub fn pinch_end(&mut self) {
        self.view.on_pinch_end();
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        self.view.draw(&self.explorer, canvas);
    }
}
