//! Test utilities for cascade resolution.
//!
//! This module provides [`CascadeTester`], a testing harness that drives a
//! [`CascadeResolver`] over a fixture board, and [`RecordingObserver`], which
//! captures every notification for later inspection.
//!
//! # Example
//!
//! ```
//! # use gemfall_engine::testing::CascadeTester;
//! CascadeTester::from_str(
//!     "
//!     BCB
//!     AAA
//!     ",
//!     "CBC",
//! )
//! .run_until_stable()
//! .assert_cycles(1)
//! .assert_grid(
//!     "
//!     CBC
//!     BCB
//!     ",
//! );
//! ```

use gemfall_core::{Grid, Position};
use gemfall_generator::SequenceGemSource;

use crate::{
    CascadeObserver, CascadeResolver, CascadeStats, CascadeStep, ClearedGem, GemMove, MatchSet,
    SpawnedGem,
};

/// A notification captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum CascadeEvent {
    /// [`CascadeObserver::on_matched`]
    Matched(MatchSet),
    /// [`CascadeObserver::on_cleared`]
    Cleared(Vec<ClearedGem>),
    /// [`CascadeObserver::on_settled`]
    Settled(Vec<GemMove>),
    /// [`CascadeObserver::on_spawned`]
    Spawned(Vec<SpawnedGem>),
    /// [`CascadeObserver::on_cascade_complete`]
    Complete(CascadeStats),
}

impl CascadeEvent {
    /// Returns the short name of the notification, for order assertions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matched(_) => "matched",
            Self::Cleared(_) => "cleared",
            Self::Settled(_) => "settled",
            Self::Spawned(_) => "spawned",
            Self::Complete(_) => "complete",
        }
    }
}

/// An observer that records every notification in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Vec<CascadeEvent>,
}

impl RecordingObserver {
    /// Creates an observer with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[CascadeEvent] {
        &self.events
    }

    /// Returns the names of the recorded events.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(CascadeEvent::name).collect()
    }

    /// Removes and returns the recorded events.
    pub fn take_events(&mut self) -> Vec<CascadeEvent> {
        std::mem::take(&mut self.events)
    }
}

impl CascadeObserver for RecordingObserver {
    fn on_matched(&mut self, matches: &MatchSet) {
        self.events.push(CascadeEvent::Matched(matches.clone()));
    }

    fn on_cleared(&mut self, cleared: &[ClearedGem]) {
        self.events.push(CascadeEvent::Cleared(cleared.to_vec()));
    }

    fn on_settled(&mut self, moves: &[GemMove]) {
        self.events.push(CascadeEvent::Settled(moves.to_vec()));
    }

    fn on_spawned(&mut self, spawned: &[SpawnedGem]) {
        self.events.push(CascadeEvent::Spawned(spawned.to_vec()));
    }

    fn on_cascade_complete(&mut self, stats: &CascadeStats) {
        self.events.push(CascadeEvent::Complete(*stats));
    }
}

/// A test harness for cascade scenarios.
///
/// `CascadeTester` keeps the initial board next to a resolver refilling from a
/// scripted [`SequenceGemSource`], so assertions can compare gem identities
/// before and after a cascade.
///
/// # Method Chaining
///
/// All methods return `self`, enabling fluent method chaining for readable tests.
///
/// # Panics
///
/// All methods panic with detailed messages on failure, using
/// `#[track_caller]` to report the correct source location.
#[derive(Debug)]
pub struct CascadeTester {
    initial: Grid,
    resolver: CascadeResolver<SequenceGemSource>,
    observer: RecordingObserver,
}

impl CascadeTester {
    /// Creates a tester from a board and the letters refills are drawn from.
    ///
    /// The board uses the [`Grid`] text format, top row first. Refill letters
    /// are drawn in order and repeat when exhausted.
    ///
    /// # Panics
    ///
    /// Panics if either string cannot be parsed, or if the board holds kinds
    /// the refill letters never reach.
    #[track_caller]
    pub fn from_str(grid: &str, refill: &str) -> Self {
        let initial: Grid = grid.parse().unwrap();
        let source = SequenceGemSource::from_letters(refill).unwrap();
        Self {
            resolver: CascadeResolver::new(initial.clone(), source).unwrap(),
            initial,
            observer: RecordingObserver::new(),
        }
    }

    /// Returns the resolver.
    #[must_use]
    pub fn resolver(&self) -> &CascadeResolver<SequenceGemSource> {
        &self.resolver
    }

    /// Returns the observer.
    #[must_use]
    pub fn observer(&self) -> &RecordingObserver {
        &self.observer
    }

    /// Starts a cascade if the resolver is idle.
    #[must_use]
    pub fn begin(mut self) -> Self {
        self.resolver.begin_cascade_if_idle();
        self
    }

    /// Advances the resolver once and asserts the kind of step taken.
    ///
    /// # Panics
    ///
    /// Panics if the resolver returns an error or `check` rejects the step.
    #[track_caller]
    pub fn advance_expecting<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&CascadeStep) -> bool,
    {
        let step = self.resolver.advance(&mut self.observer).unwrap();
        assert!(
            check(&step),
            "Unexpected step {step:?} in state {}",
            self.resolver.state()
        );
        self
    }

    /// Runs the cascade to completion.
    ///
    /// # Panics
    ///
    /// Panics if the resolver returns an error.
    #[track_caller]
    pub fn run_until_stable(mut self) -> Self {
        self.resolver
            .run_until_stable(&mut self.observer, None)
            .unwrap();
        self
    }

    /// Asserts that the board matches `expected`, given in the text format.
    ///
    /// # Panics
    ///
    /// Panics if `expected` cannot be parsed or the boards differ.
    #[track_caller]
    pub fn assert_grid(self, expected: &str) -> Self {
        let expected: Grid = expected.parse().unwrap();
        let expected = expected.to_string();
        let actual = self.resolver.grid().to_string();
        assert_eq!(
            actual, expected,
            "Expected board\n{expected}\nbut found\n{actual}"
        );
        self
    }

    /// Asserts the number of completed cycles.
    ///
    /// # Panics
    ///
    /// Panics if the cycle count differs.
    #[track_caller]
    pub fn assert_cycles(self, cycles: usize) -> Self {
        let actual = self.resolver.stats().cycles;
        assert_eq!(
            actual, cycles,
            "Expected {cycles} cycles, but the cascade ran {actual}"
        );
        self
    }

    /// Asserts the statistics of the current cascade.
    ///
    /// # Panics
    ///
    /// Panics if the statistics differ.
    #[track_caller]
    pub fn assert_stats(self, stats: CascadeStats) -> Self {
        assert_eq!(self.resolver.stats(), &stats);
        self
    }

    /// Asserts that the resolver is idle on a full board without matches.
    ///
    /// # Panics
    ///
    /// Panics if the board is not stable.
    #[track_caller]
    pub fn assert_stable(self) -> Self {
        let grid = self.resolver.grid();
        assert!(
            self.resolver.is_idle(),
            "Expected resolver to be idle, but it is {}",
            self.resolver.state()
        );
        assert!(
            grid.is_full(),
            "Expected a full board, but {} cells are empty:\n{grid}",
            grid.empty_count()
        );
        let matches = crate::MatchDetector::new().detect(grid);
        assert!(
            matches.is_empty(),
            "Expected no matches, but found {matches:?} in\n{grid}"
        );
        self
    }

    /// Asserts the order in which notifications arrived.
    ///
    /// # Panics
    ///
    /// Panics if the recorded notification names differ from `names`.
    #[track_caller]
    pub fn assert_events(self, names: &[&str]) -> Self {
        let actual = self.observer.event_names();
        assert_eq!(actual, names, "Unexpected notification order");
        self
    }

    /// Asserts that the gem initially at `from` is now at `to`, with the same
    /// identity.
    ///
    /// # Panics
    ///
    /// Panics if `from` was initially empty or a different gem is at `to`.
    #[track_caller]
    pub fn assert_gem_moved(self, from: Position, to: Position) -> Self {
        let Some(gem) = self.initial.get(from).unwrap() else {
            panic!("Expected a gem at {from} initially, but the cell was empty");
        };
        let current = self.resolver.grid().get(to).unwrap();
        assert_eq!(
            current,
            Some(gem),
            "Expected gem {} from {from} to be at {to}, but found {current:?}",
            gem.id()
        );
        self
    }
}
