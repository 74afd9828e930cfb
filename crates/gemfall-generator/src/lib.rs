//! Gem sources for spawning and refilling boards.
//!
//! The cascade engine never calls a random number generator directly. It draws
//! every new gem kind from a [`GemSource`], which keeps board evolution
//! reproducible:
//!
//! - [`RandomGemSource`] draws uniformly from a [`Palette`] with a seeded PCG
//!   generator. The [`GemSeed`] can be printed and fed back to replay a board.
//! - [`SequenceGemSource`] replays a scripted list of kinds, for tests and
//!   tutorials.
//!
//! [`populate`] fills every cell of a grid from a source, which is how initial
//! boards are set up. Initial boards are drawn cell by cell with no regard for
//! neighbours, so they may already contain matches.
//!
//! # Examples
//!
//! ```
//! use gemfall_core::{Grid, Palette};
//! use gemfall_generator::{GemSeed, RandomGemSource, populate};
//!
//! let seed: GemSeed = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef".parse()?;
//! let mut source = RandomGemSource::with_seed(Palette::new(4)?, seed);
//!
//! let mut grid = Grid::new(6, 6)?;
//! populate(&mut grid, &mut source)?;
//! assert!(grid.is_full());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use gemfall_core::{Gem, Grid, GridError, Palette, Position};

pub use self::{
    random::{GemSeed, GemSeedError, RandomGemSource},
    sequence::{SequenceGemSource, SequenceSourceError},
    source::GemSource,
};

mod random;
mod sequence;
mod source;

/// Spawns a gem from `source` into every cell of `grid`, column by column from
/// the bottom up, and returns the spawned gems in that order.
///
/// Existing gems are replaced.
///
/// # Errors
///
/// Returns [`GridError`] only if the grid reports an out-of-bounds access,
/// which would indicate a broken grid implementation.
pub fn populate<S>(grid: &mut Grid, source: &mut S) -> Result<Vec<(Position, Gem)>, GridError>
where
    S: GemSource + ?Sized,
{
    let positions: Vec<_> = grid.positions().collect();
    let mut spawned = Vec::with_capacity(positions.len());
    for pos in positions {
        let gem = grid.spawn(pos, source.next_kind())?;
        spawned.push((pos, gem));
    }
    log::debug!(
        "populated {}x{} grid with {} gems",
        grid.width(),
        grid.height(),
        spawned.len()
    );
    Ok(spawned)
}

/// Returns `true` if every gem on `grid` belongs to `palette`.
#[must_use]
pub fn fits_palette(grid: &Grid, palette: Palette) -> bool {
    grid.positions().all(|pos| {
        grid.kind_at(pos)
            .ok()
            .flatten()
            .is_none_or(|kind| palette.contains(kind))
    })
}

#[cfg(test)]
mod tests {
    use gemfall_core::GemKind;

    use super::*;

    #[test]
    fn test_populate_fills_column_major() {
        let mut grid = Grid::new(2, 2).unwrap();
        let mut source = SequenceGemSource::from_letters("ABCD").unwrap();

        let spawned = populate(&mut grid, &mut source).unwrap();

        assert!(grid.is_full());
        let order: Vec<_> = spawned.iter().map(|(pos, _)| *pos).collect();
        assert_eq!(
            order,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
        assert_eq!(grid.to_string(), "BD\nAC");
    }

    #[test]
    fn test_populate_replaces_existing_gems() {
        let mut grid: Grid = "AA".parse().unwrap();
        let before = grid.get(Position::new(0, 0)).unwrap().unwrap();
        let mut source = SequenceGemSource::from_letters("B").unwrap();

        populate(&mut grid, &mut source).unwrap();

        let after = grid.get(Position::new(0, 0)).unwrap().unwrap();
        assert_ne!(before.id(), after.id());
        assert_eq!(grid.to_string(), "BB");
    }

    #[test]
    fn test_fits_palette() {
        let grid: Grid = "AB.\nCAB".parse().unwrap();
        assert!(fits_palette(&grid, Palette::new(3).unwrap()));
        assert!(!fits_palette(&grid, Palette::new(2).unwrap()));
        assert!(Palette::new(2).unwrap().contains(GemKind::new(1)));
    }
}
