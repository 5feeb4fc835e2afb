use std::time::Duration;

use crate::layout::LayoutConfig;
use crate::point::Vec2;
use crate::puzzle::Puzzle;
use crate::session::{Cadence, ScheduleConfig, Session, Task};
use crate::view::ViewConfig;

/// Reasons a [`SessionBuilder`] may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigInvalidReason {
    /// A task was given a batch size of zero, so it could never make progress.
    ZeroBatch(Task),
    /// A task was given a zero period, so it would be due on every poll forever.
    ZeroPeriod(Task),
    /// The minimum zoom was not positive or exceeded the maximum.
    BadZoomRange,
    /// Damping outside `(0, 1]` either freezes the layout or lets it gain energy.
    NonPositiveDamping,
}

/// Assembles a [`Session`] for a puzzle from explicit settings, falling back to defaults for anything left unset.
///
/// Setters mutate the builder and return it for chaining. The first invalid setting is recorded and
/// every later setter becomes a no-op, so the reported reason always names the first mistake.
/// Builders can be [`Clone`]d to save their state at some point.
#[derive(Clone)]
pub struct SessionBuilder<P: Puzzle> {
    initial: P,
    layout: LayoutConfig,
    view: ViewConfig,
    schedule: ScheduleConfig,
    viewport: Vec2,
    invalid_reasons: Vec<ConfigInvalidReason>,
}

impl<P: Puzzle> SessionBuilder<P> {
    /// Start from `initial`, the position the player begins at and returns to on [`Session::reset`].
    pub fn new(initial: P) -> Self {
        Self {
            initial,
            layout: LayoutConfig::default(),
            view: ViewConfig::default(),
            schedule: ScheduleConfig::default(),
            viewport: Vec2::new(800.0, 600.0),
            invalid_reasons: Default::default(),
        }
    }

    /// Size of the drawing surface in pixels.
    pub fn viewport(&mut self, width: f64, height: f64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.viewport = Vec2::new(width, height);
        self
    }

    /// How often `task` runs and how much it does per run.
    ///
    /// May cause the builder to enter a [`ZeroBatch`](ConfigInvalidReason::ZeroBatch) or
    /// [`ZeroPeriod`](ConfigInvalidReason::ZeroPeriod) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn cadence(&mut self, task: Task, period: Duration, batch: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if batch == 0 {
            self.invalid_reasons.push(ConfigInvalidReason::ZeroBatch(task));
            return self;
        }
        if period.is_zero() {
            self.invalid_reasons.push(ConfigInvalidReason::ZeroPeriod(task));
            return self;
        }

        let cadence = Cadence::new(period, batch);
        match task {
            Task::Explore => self.schedule.explore = cadence,
            Task::Reveal => self.schedule.reveal = cadence,
            Task::Physics => self.schedule.physics = cadence,
        }
        self
    }

    /// Shorthand for [`Self::cadence`] on [`Task::Explore`].
    pub fn explore_batch(&mut self, period: Duration, batch: usize) -> &mut Self {
        self.cadence(Task::Explore, period, batch)
    }

    /// Shorthand for [`Self::cadence`] on [`Task::Reveal`].
    pub fn reveal_batch(&mut self, period: Duration, batch: usize) -> &mut Self {
        self.cadence(Task::Reveal, period, batch)
    }

    /// Bounds on the camera zoom.
    ///
    /// May cause the builder to enter a [`BadZoomRange`](ConfigInvalidReason::BadZoomRange) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn zoom_range(&mut self, min: f64, max: f64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let view = ViewConfig { min_zoom: min, max_zoom: max, ..self.view };
        if !view.has_valid_zoom_range() {
            self.invalid_reasons.push(ConfigInvalidReason::BadZoomRange);
            return self;
        }

        self.view = view;
        self
    }

    /// Fraction of velocity the layout keeps each tick.
    ///
    /// May cause the builder to enter a [`NonPositiveDamping`](ConfigInvalidReason::NonPositiveDamping) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !(damping > 0.0 && damping <= 1.0) {
            self.invalid_reasons.push(ConfigInvalidReason::NonPositiveDamping);
            return self;
        }

        self.layout.damping = damping;
        self
    }

    /// Seed for the spawn jitter of newly revealed nodes.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.layout.seed = seed;
        self
    }

    /// Replace every layout constant at once. Damping is still checked.
    pub fn layout(&mut self, layout: LayoutConfig) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let damping = layout.damping;
        self.layout = layout;
        self.damping(damping)
    }

    /// Replace every camera setting at once. The zoom range is still checked.
    pub fn view(&mut self, view: ViewConfig) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.view = view;
        self.zoom_range(view.min_zoom, view.max_zoom)
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<ConfigInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<ConfigInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Produce an unstarted [`Session`]; call [`Session::start`] to begin exploring.
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`ConfigInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Session<P>, &Vec<ConfigInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(Session::new(self.initial.clone(), self.layout, self.view, self.schedule, self.viewport))
    }
}
