use gemfall_engine::{CascadeObserver, CascadeStats, ClearedGem, GemMove, MatchSet, SpawnedGem};

/// Writes every cascade notification to the log.
///
/// Summaries go to `info`, per-gem detail to `debug`.
#[derive(Debug, Default)]
pub(crate) struct LogObserver {
    cycle: usize,
}

impl CascadeObserver for LogObserver {
    fn on_matched(&mut self, matches: &MatchSet) {
        self.cycle += 1;
        let positions = matches
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        log::info!("cycle {}: matched {} gems", self.cycle, matches.len());
        log::debug!("  {positions}");
    }

    fn on_cleared(&mut self, cleared: &[ClearedGem]) {
        log::info!("cycle {}: cleared {} gems", self.cycle, cleared.len());
        for c in cleared {
            log::debug!("  {} {} at {}", c.gem.kind(), c.gem.id(), c.position);
        }
    }

    fn on_settled(&mut self, moves: &[GemMove]) {
        log::info!("cycle {}: {} gems fell", self.cycle, moves.len());
        for m in moves {
            log::debug!("  {} {} {} -> {}", m.gem.kind(), m.gem.id(), m.from, m.to);
        }
    }

    fn on_spawned(&mut self, spawned: &[SpawnedGem]) {
        log::info!("cycle {}: spawned {} gems", self.cycle, spawned.len());
        for s in spawned {
            log::debug!("  {} {} at {}", s.gem.kind(), s.gem.id(), s.position);
        }
    }

    fn on_cascade_complete(&mut self, stats: &CascadeStats) {
        log::info!(
            "cascade complete: {} cycles, {} cleared, {} moved, {} spawned",
            stats.cycles,
            stats.cleared,
            stats.moved,
            stats.spawned
        );
        self.cycle = 0;
    }
}
