//! Notifications from the cascade resolver to a presentation layer.
//!
//! The resolver mutates the grid synchronously and reports each change through
//! a [`CascadeObserver`], so a renderer can animate from the old positions it
//! already knows to the new ones it is told about.

use gemfall_core::{Gem, Position};

use crate::{CascadeStats, MatchSet};

/// A gem removed from the board because it was part of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedGem {
    /// Cell the gem was removed from.
    pub position: Position,
    /// The removed gem.
    pub gem: Gem,
}

/// A gem that fell to a lower cell of its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemMove {
    /// The moved gem. Its identity is unchanged by the move.
    pub gem: Gem,
    /// Cell the gem left.
    pub from: Position,
    /// Cell the gem came to rest in.
    pub to: Position,
}

/// A gem created to fill an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedGem {
    /// Cell the gem was spawned into.
    pub position: Position,
    /// The new gem.
    pub gem: Gem,
}

/// Receives cascade notifications.
///
/// All methods default to doing nothing. Within one cycle notifications
/// arrive in the order `on_matched`, `on_cleared`, `on_settled`,
/// `on_spawned`; `on_cascade_complete` follows the detection pass that finds
/// no matches. A cycle that only fills holes left in the board skips
/// `on_matched` and reports an empty `on_cleared`.
pub trait CascadeObserver {
    /// Matches were found and will be cleared on the next advance.
    ///
    /// Drivers that pace presentation wait for the configured clear delay
    /// before advancing again.
    fn on_matched(&mut self, _matches: &MatchSet) {}

    /// Matched gems were removed and their cells are now empty.
    fn on_cleared(&mut self, _cleared: &[ClearedGem]) {}

    /// Gravity was applied. `moves` is empty when no gem had to fall.
    fn on_settled(&mut self, _moves: &[GemMove]) {}

    /// Empty cells were filled with new gems.
    fn on_spawned(&mut self, _spawned: &[SpawnedGem]) {}

    /// The board reached a fixed point and the resolver is idle again.
    fn on_cascade_complete(&mut self, _stats: &CascadeStats) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CascadeObserver for NoopObserver {}

impl<O> CascadeObserver for &mut O
where
    O: CascadeObserver + ?Sized,
{
    fn on_matched(&mut self, matches: &MatchSet) {
        (**self).on_matched(matches);
    }

    fn on_cleared(&mut self, cleared: &[ClearedGem]) {
        (**self).on_cleared(cleared);
    }

    fn on_settled(&mut self, moves: &[GemMove]) {
        (**self).on_settled(moves);
    }

    fn on_spawned(&mut self, spawned: &[SpawnedGem]) {
        (**self).on_spawned(spawned);
    }

    fn on_cascade_complete(&mut self, stats: &CascadeStats) {
        (**self).on_cascade_complete(stats);
    }
}
