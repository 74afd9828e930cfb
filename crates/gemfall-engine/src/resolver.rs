use std::time::Duration;

use gemfall_core::Grid;
use gemfall_generator::{GemSource, fits_palette, populate};

use crate::{CascadeConfig, CascadeError, CascadeObserver, ConfigError, MatchDetector, MatchSet, gravity};

/// The phase of the cascade state machine.
///
/// ```text
/// Idle --begin--> Detecting --matches--> Clearing --> Collapsing --> Refilling
///                   ^   |                                               |
///                   |   +--no matches--> Idle                           |
///                   +---------------------------------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum CascadeState {
    /// No cascade is in flight; the grid is stable and may be read or edited.
    Idle,
    /// The next advance scans the grid for matches.
    Detecting,
    /// Matches were found; the next advance removes them.
    Clearing,
    /// The next advance applies gravity.
    Collapsing,
    /// The next advance fills empty cells.
    Refilling,
}

/// What a single [`CascadeResolver::advance`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeStep {
    /// Nothing happened because no cascade is in flight.
    Idle,
    /// Matches were found. The driver should wait `pause` before advancing so
    /// the presentation can highlight them.
    Matched {
        /// The matched positions, cleared on the next advance.
        matches: MatchSet,
        /// Configured clear delay.
        pause: Duration,
    },
    /// Matched gems were removed.
    Cleared {
        /// Number of removed gems.
        count: usize,
    },
    /// Gravity was applied.
    Collapsed {
        /// Number of gems that fell.
        moved: usize,
    },
    /// Empty cells were refilled; detection runs next.
    Refilled {
        /// Number of spawned gems.
        spawned: usize,
    },
    /// No matches remain. The cascade is complete and the resolver is idle.
    Stable(CascadeStats),
}

/// Counters for one cascade, from start request to fixed point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStats {
    /// Completed detect, clear, collapse and refill cycles.
    pub cycles: usize,
    /// Gems removed by matches.
    pub cleared: usize,
    /// Gems moved by gravity.
    pub moved: usize,
    /// Gems spawned by refills.
    pub spawned: usize,
}

impl CascadeStats {
    /// Returns `true` if the cascade changed the board.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.cycles > 0
    }
}

/// Drives a grid through detect, clear, collapse and refill until no matches remain.
///
/// The resolver owns the [`Grid`] and the [`GemSource`] it refills from. At
/// most one cascade is in flight at a time: [`begin_cascade_if_idle`] drops
/// requests made while one is running. Each [`advance`] call performs exactly
/// one state transition and reports the resulting grid changes to a
/// [`CascadeObserver`], so a presentation layer can pace and animate the
/// cascade without the engine ever waiting on a clock.
///
/// [`begin_cascade_if_idle`]: CascadeResolver::begin_cascade_if_idle
/// [`advance`]: CascadeResolver::advance
///
/// # Examples
///
/// ```
/// use gemfall_engine::{CascadeConfig, CascadeResolver, NoopObserver};
/// use gemfall_generator::RandomGemSource;
///
/// let config = CascadeConfig::default().with_size(7, 7).with_palette_size(4)?;
/// let source = RandomGemSource::new(config.palette);
/// let mut resolver = CascadeResolver::initialize(config, source)?;
///
/// let stats = resolver.run_until_stable(&mut NoopObserver, None)?;
/// assert!(resolver.is_idle());
/// assert!(resolver.grid().is_full());
/// println!("settled after {} cycles", stats.cycles);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct CascadeResolver<S> {
    grid: Grid,
    source: S,
    config: CascadeConfig,
    detector: MatchDetector,
    state: CascadeState,
    pending: MatchSet,
    stats: CascadeStats,
}

impl<S> CascadeResolver<S>
where
    S: GemSource,
{
    /// Creates a board from `config` and fills every cell from `source`.
    ///
    /// The initial board is drawn cell by cell without looking at neighbours,
    /// so it may already contain matches. The resolver starts idle.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Config`] if the configuration is invalid or the
    /// source draws from a different palette.
    pub fn initialize(config: CascadeConfig, mut source: S) -> Result<Self, CascadeError> {
        config.validate()?;
        let actual = source.palette();
        if actual != config.palette {
            return Err(ConfigError::PaletteMismatch {
                expected: config.palette.size(),
                actual: actual.size(),
            }
            .into());
        }
        let mut grid = Grid::new(config.width, config.height)?;
        populate(&mut grid, &mut source)?;
        log::debug!(
            "initialized {}x{} board with {} kinds",
            config.width,
            config.height,
            config.palette.size()
        );
        Ok(Self::with_config(grid, source, config))
    }

    /// Wraps an existing grid.
    ///
    /// The configuration is derived from the grid size and the source palette,
    /// with the default clear delay. The grid may contain empty cells; the
    /// next cascade collapses and refills them before looking for matches.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ForeignKinds`] if the grid holds a kind outside
    /// the source palette.
    pub fn new(grid: Grid, source: S) -> Result<Self, CascadeError> {
        let palette = source.palette();
        if !fits_palette(&grid, palette) {
            return Err(ConfigError::ForeignKinds {
                palette_size: palette.size(),
            }
            .into());
        }
        let config = CascadeConfig {
            width: grid.width(),
            height: grid.height(),
            palette,
            clear_delay: CascadeConfig::DEFAULT_CLEAR_DELAY,
        };
        Ok(Self::with_config(grid, source, config))
    }

    fn with_config(grid: Grid, source: S, config: CascadeConfig) -> Self {
        Self {
            grid,
            source,
            config,
            detector: MatchDetector::new(),
            state: CascadeState::Idle,
            pending: MatchSet::new(),
            stats: CascadeStats::default(),
        }
    }

    /// Returns the resolver with a different clear delay.
    #[must_use]
    pub fn with_clear_delay(mut self, clear_delay: Duration) -> Self {
        self.config.clear_delay = clear_delay;
        self
    }

    /// Returns the board.
    ///
    /// Between [`advance`](Self::advance) calls the grid is consistent with the
    /// notifications delivered so far.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns mutable access to the board while no cascade is in flight.
    ///
    /// Returns `None` if a cascade is running.
    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        self.state.is_idle().then_some(&mut self.grid)
    }

    /// Returns the gem source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Returns the current phase.
    #[must_use]
    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// Returns `true` if no cascade is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Returns `true` if a cascade is in flight.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        !self.state.is_idle()
    }

    /// Returns the counters of the current or most recent cascade.
    #[must_use]
    pub fn stats(&self) -> &CascadeStats {
        &self.stats
    }

    /// Returns the matches waiting to be cleared.
    ///
    /// Empty unless the resolver is in [`CascadeState::Clearing`].
    #[must_use]
    pub fn pending_matches(&self) -> &MatchSet {
        &self.pending
    }

    /// Consumes the resolver and returns the grid and source.
    #[must_use]
    pub fn into_parts(self) -> (Grid, S) {
        (self.grid, self.source)
    }

    /// Starts a cascade if none is in flight.
    ///
    /// Returns `false`, and changes nothing, if a cascade is already running.
    /// Requests are never queued.
    pub fn begin_cascade_if_idle(&mut self) -> bool {
        if self.is_resolving() {
            log::warn!("cascade start dropped, already {}", self.state);
            return false;
        }
        self.stats = CascadeStats::default();
        self.state = CascadeState::Detecting;
        log::debug!("cascade started");
        true
    }

    /// Performs one state transition.
    ///
    /// Clearing always precedes collapsing, which precedes refilling, which
    /// precedes the next detection. Calling this while idle does nothing and
    /// returns [`CascadeStep::Idle`].
    ///
    /// Detection on a board with empty cells finds nothing to clear and moves
    /// straight to collapsing, reporting an empty [`CascadeStep::Cleared`], so
    /// a cascade never completes with holes left in the board.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError`] if the grid is found in an inconsistent state.
    /// The cascade cannot be continued after an error.
    pub fn advance<O>(&mut self, observer: &mut O) -> Result<CascadeStep, CascadeError>
    where
        O: CascadeObserver + ?Sized,
    {
        let step = match self.state {
            CascadeState::Idle => CascadeStep::Idle,
            CascadeState::Detecting if !self.grid.is_full() => {
                log::debug!("{} empty cells before detection", self.grid.empty_count());
                observer.on_cleared(&[]);
                self.state = CascadeState::Collapsing;
                CascadeStep::Cleared { count: 0 }
            }
            CascadeState::Detecting => {
                let matches = self.detector.detect(&self.grid);
                if matches.is_empty() {
                    self.state = CascadeState::Idle;
                    log::debug!(
                        "cascade stable after {} cycles ({} cleared)",
                        self.stats.cycles,
                        self.stats.cleared
                    );
                    observer.on_cascade_complete(&self.stats);
                    CascadeStep::Stable(self.stats)
                } else {
                    log::debug!("cycle {}: {} gems matched", self.stats.cycles + 1, matches.len());
                    observer.on_matched(&matches);
                    self.pending = matches.clone();
                    self.state = CascadeState::Clearing;
                    CascadeStep::Matched {
                        matches,
                        pause: self.config.clear_delay,
                    }
                }
            }
            CascadeState::Clearing => {
                let matches = std::mem::take(&mut self.pending);
                let cleared = gravity::clear(&mut self.grid, &matches)?;
                self.stats.cleared += cleared.len();
                observer.on_cleared(&cleared);
                self.state = CascadeState::Collapsing;
                CascadeStep::Cleared {
                    count: cleared.len(),
                }
            }
            CascadeState::Collapsing => {
                let moves = gravity::collapse(&mut self.grid)?;
                self.stats.moved += moves.len();
                observer.on_settled(&moves);
                self.state = CascadeState::Refilling;
                CascadeStep::Collapsed { moved: moves.len() }
            }
            CascadeState::Refilling => {
                let spawned = gravity::refill(&mut self.grid, &mut self.source)?;
                self.stats.spawned += spawned.len();
                self.stats.cycles += 1;
                observer.on_spawned(&spawned);
                self.state = CascadeState::Detecting;
                CascadeStep::Refilled {
                    spawned: spawned.len(),
                }
            }
        };
        Ok(step)
    }

    /// Stops the cascade if `max_cycles` cycles have completed and another
    /// round of matches is waiting to be cleared.
    ///
    /// Drivers call this after each [`CascadeStep::Matched`]. When the limit is
    /// reached the pending matches are dropped uncleared and the resolver goes
    /// idle, so the board is full but not stable. Does nothing in any other
    /// state or without a limit.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::CycleLimitExceeded`] when the cascade was stopped.
    pub fn check_cycle_limit(&mut self, max_cycles: Option<usize>) -> Result<(), CascadeError> {
        let cycles = self.stats.cycles;
        if !self.state.is_clearing() || !max_cycles.is_some_and(|max| cycles >= max) {
            return Ok(());
        }
        log::warn!("cascade stopped after {cycles} cycles with matches remaining");
        self.pending = MatchSet::new();
        self.state = CascadeState::Idle;
        Err(CascadeError::CycleLimitExceeded { cycles })
    }

    /// Starts a cascade if idle and advances it to completion without pausing.
    ///
    /// With `max_cycles` set, the cascade is stopped before clearing once that
    /// many cycles have completed, as described for
    /// [`check_cycle_limit`](Self::check_cycle_limit).
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::CycleLimitExceeded`] when the cycle limit is
    /// reached, or any error raised by [`advance`](Self::advance).
    pub fn run_until_stable<O>(
        &mut self,
        observer: &mut O,
        max_cycles: Option<usize>,
    ) -> Result<CascadeStats, CascadeError>
    where
        O: CascadeObserver + ?Sized,
    {
        self.begin_cascade_if_idle();
        loop {
            match self.advance(observer)? {
                CascadeStep::Stable(stats) => return Ok(stats),
                CascadeStep::Matched { .. } => self.check_cycle_limit(max_cycles)?,
                CascadeStep::Idle => return Ok(self.stats),
                _ => {}
            }
        }
    }

    /// Stops the cascade in flight, leaving a full board.
    ///
    /// Any pending clear, collapse and refill are completed (and reported)
    /// first, so no cell is left empty. No further detection runs, so the board
    /// may still contain matches. Observers receive `on_cascade_complete` as if
    /// the cascade had settled. Returns `false` if the resolver was idle.
    ///
    /// # Errors
    ///
    /// Returns any error raised while completing the pending steps.
    pub fn cancel<O>(&mut self, observer: &mut O) -> Result<bool, CascadeError>
    where
        O: CascadeObserver + ?Sized,
    {
        if self.is_idle() {
            return Ok(false);
        }
        while !matches!(self.state, CascadeState::Detecting) {
            self.advance(observer)?;
        }
        self.state = CascadeState::Idle;
        log::warn!("cascade cancelled after {} cycles", self.stats.cycles);
        observer.on_cascade_complete(&self.stats);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use gemfall_core::{Palette, Position};
    use gemfall_generator::{RandomGemSource, SequenceGemSource};

    use super::*;
    use crate::NoopObserver;

    const SEED: &str = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";

    fn resolver(grid: &str, refill: &str) -> CascadeResolver<SequenceGemSource> {
        CascadeResolver::new(
            grid.parse().unwrap(),
            SequenceGemSource::from_letters(refill).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_fills_board() {
        let config = CascadeConfig::default().with_size(5, 4).with_palette_size(3).unwrap();
        let source = RandomGemSource::with_seed(config.palette, SEED.parse().unwrap());
        let resolver = CascadeResolver::initialize(config, source).unwrap();

        assert!(resolver.is_idle());
        assert!(resolver.grid().is_full());
        assert_eq!(resolver.grid().width(), 5);
        assert_eq!(resolver.grid().height(), 4);
        assert_eq!(resolver.config(), &config);
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let config = CascadeConfig::default().with_size(0, 4);
        let source = RandomGemSource::new(config.palette);
        assert_eq!(
            CascadeResolver::initialize(config, source).unwrap_err(),
            CascadeError::Config(ConfigError::ZeroDimension {
                width: 0,
                height: 4
            })
        );

        let config = CascadeConfig::default().with_palette_size(4).unwrap();
        let source = RandomGemSource::new(Palette::new(6).unwrap());
        assert_eq!(
            CascadeResolver::initialize(config, source).unwrap_err(),
            CascadeError::Config(ConfigError::PaletteMismatch {
                expected: 4,
                actual: 6
            })
        );
    }

    #[test]
    fn test_advance_while_idle_does_nothing() {
        let mut resolver = resolver("AAA", "B");
        assert_eq!(resolver.advance(&mut NoopObserver).unwrap(), CascadeStep::Idle);
        assert_eq!(resolver.grid().to_string(), "AAA");
    }

    #[test]
    fn test_state_sequence() {
        let mut resolver = resolver("AAAB", "C").with_clear_delay(Duration::from_millis(300));
        let mut observer = NoopObserver;
        assert!(resolver.begin_cascade_if_idle());
        assert_eq!(resolver.state(), CascadeState::Detecting);

        let step = resolver.advance(&mut observer).unwrap();
        let expected: MatchSet = (0..3).map(|x| Position::new(x, 0)).collect();
        assert_eq!(
            step,
            CascadeStep::Matched {
                matches: expected.clone(),
                pause: Duration::from_millis(300),
            }
        );
        assert_eq!(resolver.state(), CascadeState::Clearing);
        assert_eq!(resolver.pending_matches(), &expected);
        assert_eq!(resolver.grid().to_string(), "AAAB");

        assert_eq!(
            resolver.advance(&mut observer).unwrap(),
            CascadeStep::Cleared { count: 3 }
        );
        assert_eq!(resolver.state(), CascadeState::Collapsing);
        assert_eq!(resolver.grid().to_string(), "...B");
        assert!(resolver.pending_matches().is_empty());

        assert_eq!(
            resolver.advance(&mut observer).unwrap(),
            CascadeStep::Collapsed { moved: 0 }
        );
        assert_eq!(resolver.state(), CascadeState::Refilling);

        assert_eq!(
            resolver.advance(&mut observer).unwrap(),
            CascadeStep::Refilled { spawned: 3 }
        );
        assert_eq!(resolver.state(), CascadeState::Detecting);
        assert_eq!(resolver.grid().to_string(), "CCCB");

        assert!(matches!(
            resolver.advance(&mut observer).unwrap(),
            CascadeStep::Matched { .. }
        ));
    }

    #[test]
    fn test_second_start_is_dropped() {
        let mut resolver = resolver("AAAB", "BCB");
        assert!(resolver.begin_cascade_if_idle());
        resolver.advance(&mut NoopObserver).unwrap();
        assert_eq!(resolver.state(), CascadeState::Clearing);

        assert!(!resolver.begin_cascade_if_idle());
        assert_eq!(resolver.state(), CascadeState::Clearing);
        assert_eq!(resolver.pending_matches().len(), 3);
        assert!(resolver.grid_mut().is_none());
    }

    #[test]
    fn test_stable_board_completes_immediately() {
        let mut resolver = resolver("ABAB\nBABA", "C");
        let stats = resolver.run_until_stable(&mut NoopObserver, None).unwrap();
        assert_eq!(stats, CascadeStats::default());
        assert!(!stats.has_progress());
        assert!(resolver.is_idle());
        assert!(resolver.grid_mut().is_some());
    }

    #[test]
    fn test_run_until_stable_counts() {
        let mut resolver = resolver(
            "
            BCB
            AAA
            ",
            "CBC",
        );
        let stats = resolver.run_until_stable(&mut NoopObserver, None).unwrap();
        assert_eq!(
            stats,
            CascadeStats {
                cycles: 1,
                cleared: 3,
                moved: 3,
                spawned: 3,
            }
        );
        assert_eq!(resolver.grid().to_string(), "CBC\nBCB");
        assert_eq!(resolver.stats(), &stats);
    }

    #[test]
    fn test_cycle_limit_leaves_full_board() {
        let mut resolver = resolver("AAA", "A");
        let err = resolver
            .run_until_stable(&mut NoopObserver, Some(3))
            .unwrap_err();
        assert_eq!(err, CascadeError::CycleLimitExceeded { cycles: 3 });
        assert!(resolver.is_idle());
        assert!(resolver.grid().is_full());
        assert_eq!(resolver.grid().to_string(), "AAA");
    }

    #[test]
    fn test_cycle_limit_not_hit_when_last_cycle_settles() {
        let mut resolver = resolver("AAA", "ABA");
        let stats = resolver.run_until_stable(&mut NoopObserver, Some(1)).unwrap();
        assert_eq!(stats.cycles, 1);
        assert_eq!(resolver.grid().to_string(), "ABA");
    }

    #[test]
    fn test_cancel_completes_pending_steps() {
        let mut resolver = resolver("AAAB", "CBC");
        let mut observer = NoopObserver;
        assert!(!resolver.cancel(&mut observer).unwrap());

        resolver.begin_cascade_if_idle();
        resolver.advance(&mut observer).unwrap();
        assert_eq!(resolver.state(), CascadeState::Clearing);

        assert!(resolver.cancel(&mut observer).unwrap());
        assert!(resolver.is_idle());
        assert!(resolver.grid().is_full());
        assert_eq!(resolver.grid().to_string(), "CBCB");
        assert_eq!(resolver.stats().cycles, 1);
    }

    #[test]
    fn test_into_parts() {
        let resolver = resolver("AB", "C");
        let (grid, source) = resolver.into_parts();
        assert_eq!(grid.to_string(), "AB");
        assert_eq!(source.drawn(), 0);
    }

    #[test]
    fn test_holes_are_filled_before_completing() {
        let mut resolver = resolver(
            "
            A.
            BC
            ",
            "D",
        );
        let stats = resolver.run_until_stable(&mut NoopObserver, None).unwrap();
        assert!(resolver.grid().is_full());
        assert_eq!(resolver.grid().to_string(), "AD\nBC");
        assert_eq!(
            stats,
            CascadeStats {
                cycles: 1,
                cleared: 0,
                moved: 0,
                spawned: 1,
            }
        );
    }

    #[test]
    fn test_holes_collapse_before_refill() {
        let mut resolver = resolver(
            "
            B
            .
            A
            ",
            "C",
        );
        resolver.begin_cascade_if_idle();
        assert_eq!(
            resolver.advance(&mut NoopObserver).unwrap(),
            CascadeStep::Cleared { count: 0 }
        );
        assert_eq!(
            resolver.advance(&mut NoopObserver).unwrap(),
            CascadeStep::Collapsed { moved: 1 }
        );
        resolver.run_until_stable(&mut NoopObserver, None).unwrap();
        assert_eq!(resolver.grid().to_string(), "C\nB\nA");
    }

    #[test]
    fn test_new_rejects_foreign_kinds() {
        let grid: Grid = "AE".parse().unwrap();
        let source = SequenceGemSource::from_letters("AB").unwrap();
        assert_eq!(
            CascadeResolver::new(grid, source).unwrap_err(),
            CascadeError::Config(ConfigError::ForeignKinds { palette_size: 2 })
        );
    }

    #[test]
    fn test_zero_cycle_limit_clears_nothing() {
        let mut resolver = resolver("AAA", "B");
        let err = resolver
            .run_until_stable(&mut NoopObserver, Some(0))
            .unwrap_err();
        assert_eq!(err, CascadeError::CycleLimitExceeded { cycles: 0 });
        assert!(resolver.is_idle());
        assert!(resolver.pending_matches().is_empty());
        assert_eq!(resolver.grid().to_string(), "AAA");
        assert_eq!(resolver.stats().cleared, 0);
    }

    #[test]
    fn test_check_cycle_limit_outside_clearing() {
        let mut resolver = resolver("AAA", "A");
        assert_eq!(resolver.check_cycle_limit(Some(0)), Ok(()));
        resolver.begin_cascade_if_idle();
        assert_eq!(resolver.check_cycle_limit(Some(0)), Ok(()));
        resolver.advance(&mut NoopObserver).unwrap();
        assert_eq!(resolver.check_cycle_limit(None), Ok(()));
        assert_eq!(resolver.check_cycle_limit(Some(1)), Ok(()));
        assert!(resolver.check_cycle_limit(Some(0)).is_err());
    }
}
