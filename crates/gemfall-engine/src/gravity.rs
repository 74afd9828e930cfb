//! The grid mutations of one cascade cycle: clearing, collapsing and refilling.
//!
//! Each function settles in a single synchronous step and returns what it
//! changed, so the resolver can forward it to a presentation layer.

use gemfall_core::{Grid, Position};
use gemfall_generator::GemSource;

use crate::{CascadeError, ClearedGem, GemMove, InvariantViolation, MatchSet, SpawnedGem};

/// Empties every matched cell and returns the removed gems.
///
/// # Errors
///
/// Returns [`InvariantViolation::MissingGem`] if a matched cell is already
/// empty, and [`CascadeError::Grid`] if a match lies outside the grid.
pub fn clear(grid: &mut Grid, matches: &MatchSet) -> Result<Vec<ClearedGem>, CascadeError> {
    let mut cleared = Vec::with_capacity(matches.len());
    for position in matches {
        let gem = grid
            .take(position)?
            .ok_or(InvariantViolation::MissingGem { position })?;
        cleared.push(ClearedGem { position, gem });
    }
    Ok(cleared)
}

/// Lets gems fall so that every column is packed against the bottom row.
///
/// Columns are processed independently. Scanning upwards, each empty cell
/// takes the lowest gem above it, so every gem moves at most once and the
/// relative order within a column is preserved.
///
/// # Errors
///
/// Returns [`InvariantViolation::GapAfterCollapse`] if a column is still not
/// packed afterwards.
///
/// # Examples
///
/// ```
/// use gemfall_core::Grid;
/// use gemfall_engine::gravity;
///
/// let mut grid: Grid = "
///     A B
///     . C
///     B .
///     . A
/// "
/// .parse()?;
///
/// let moves = gravity::collapse(&mut grid)?;
/// assert_eq!(moves.len(), 4);
/// assert_eq!(grid.to_string(), "..\n.B\nAC\nBA");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn collapse(grid: &mut Grid) -> Result<Vec<GemMove>, CascadeError> {
    let mut moves = Vec::new();
    for x in 0..grid.width() {
        let mut above = 0;
        for to in grid.column(x) {
            if !grid.is_empty(to)? {
                continue;
            }
            above = above.max(to.y() + 1);
            let Some(from) = lowest_gem_from(grid, x, above)? else {
                break;
            };
            if let Some(gem) = grid.take(from)? {
                grid.set(to, Some(gem))?;
                log::trace!("gem {} fell from {from} to {to}", gem.id());
                moves.push(GemMove { gem, from, to });
            }
            above = from.y() + 1;
        }
    }
    check_packed(grid)?;
    Ok(moves)
}

fn lowest_gem_from(grid: &Grid, x: usize, y: usize) -> Result<Option<Position>, CascadeError> {
    for pos in grid.column(x).skip(y) {
        if !grid.is_empty(pos)? {
            return Ok(Some(pos));
        }
    }
    Ok(None)
}

/// Checks that no column has a gem above an empty cell.
///
/// # Errors
///
/// Returns [`InvariantViolation::GapAfterCollapse`] naming the lowest
/// floating gem of the first offending column.
pub fn check_packed(grid: &Grid) -> Result<(), CascadeError> {
    for x in 0..grid.width() {
        let mut seen_empty = false;
        for position in grid.column(x) {
            let empty = grid.is_empty(position)?;
            if seen_empty && !empty {
                return Err(InvariantViolation::GapAfterCollapse { position }.into());
            }
            seen_empty |= empty;
        }
    }
    Ok(())
}

/// Spawns a gem from `source` into every empty cell, column by column from
/// the bottom up, and returns the new gems.
///
/// # Errors
///
/// Returns [`InvariantViolation::UnknownKind`] if the source produces a kind
/// outside its palette, and [`InvariantViolation::EmptyAfterRefill`] if a cell
/// is still empty afterwards.
pub fn refill<S>(grid: &mut Grid, source: &mut S) -> Result<Vec<SpawnedGem>, CascadeError>
where
    S: GemSource + ?Sized,
{
    let empty: Vec<_> = grid.empty_positions().collect();
    let palette = source.palette();
    let mut spawned = Vec::with_capacity(empty.len());
    for position in empty {
        let kind = source.next_kind();
        if !palette.contains(kind) {
            return Err(InvariantViolation::UnknownKind {
                kind,
                palette_size: palette.size(),
            }
            .into());
        }
        let gem = grid.spawn(position, kind)?;
        log::trace!("spawned {} gem {} at {position}", gem.kind(), gem.id());
        spawned.push(SpawnedGem { position, gem });
    }
    if let Some(position) = grid.empty_positions().next() {
        return Err(InvariantViolation::EmptyAfterRefill { position }.into());
    }
    Ok(spawned)
}
