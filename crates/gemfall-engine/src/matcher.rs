use std::{
    collections::{BTreeSet, btree_set},
    iter,
};

use gemfall_core::{GemKind, Grid, Position};

/// The deduplicated set of positions that take part in at least one match.
///
/// Positions iterate in column-major order. A fresh set is produced by every
/// detection pass; nothing is carried over between passes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchSet {
    positions: BTreeSet<Position>,
}

impl MatchSet {
    /// Creates an empty match set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of matched positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no position matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns `true` if `pos` is part of a match.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Returns an iterator over the matched positions.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    fn insert_run(&mut self, run: [Position; 3]) {
        self.positions.extend(run);
    }
}

impl FromIterator<Position> for MatchSet {
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = Position;
    type IntoIter = iter::Copied<btree_set::Iter<'a, Position>>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter().copied()
    }
}

impl IntoIterator for MatchSet {
    type Item = Position;
    type IntoIter = btree_set::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.into_iter()
    }
}

/// Finds runs of three or more gems of the same kind along a row or column.
///
/// Every cell with a neighbour on both sides of an axis is checked as the
/// centre of a three-cell run. Longer runs are covered by their overlapping
/// triples, and cells shared by crossing runs are reported once.
///
/// Cells on the border are never centres along the axis they border, but can
/// still be flanks. A board narrower (or shorter) than three cells therefore
/// never matches horizontally (or vertically).
///
/// # Examples
///
/// ```
/// use gemfall_core::{Grid, Position};
/// use gemfall_engine::MatchDetector;
///
/// let grid: Grid = "
///     B C A C B
///     A A A B C
/// "
/// .parse()?;
///
/// let matches = MatchDetector::new().detect(&grid);
/// let positions: Vec<_> = matches.iter().collect();
/// assert_eq!(
///     positions,
///     [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
/// );
/// # Ok::<(), gemfall_core::GridError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchDetector;

impl MatchDetector {
    /// Creates a new detector.
    #[must_use]
    pub const fn new() -> Self {
        MatchDetector
    }

    /// Returns every position that belongs to a run of three or more.
    ///
    /// An empty result means the grid is at a fixed point.
    #[must_use]
    pub fn detect(&self, grid: &Grid) -> MatchSet {
        let mut matches = MatchSet::new();
        for center in grid.positions() {
            let Some(kind) = kind_at(grid, center) else {
                continue;
            };
            if let Some(run) = horizontal_run(grid, center, kind) {
                matches.insert_run(run);
            }
            if let Some(run) = vertical_run(grid, center, kind) {
                matches.insert_run(run);
            }
        }
        matches
    }

    /// Returns `true` if the grid contains at least one match.
    #[must_use]
    pub fn has_matches(&self, grid: &Grid) -> bool {
        grid.positions().any(|center| {
            kind_at(grid, center).is_some_and(|kind| {
                horizontal_run(grid, center, kind).is_some()
                    || vertical_run(grid, center, kind).is_some()
            })
        })
    }
}

fn kind_at(grid: &Grid, pos: Position) -> Option<GemKind> {
    grid.kind_at(pos).ok().flatten()
}

fn horizontal_run(grid: &Grid, center: Position, kind: GemKind) -> Option<[Position; 3]> {
    let left = center.left()?;
    let right = center.right();
    (kind_at(grid, left) == Some(kind) && kind_at(grid, right) == Some(kind))
        .then_some([left, center, right])
}

fn vertical_run(grid: &Grid, center: Position, kind: GemKind) -> Option<[Position; 3]> {
    let below = center.down()?;
    let above = center.up();
    (kind_at(grid, below) == Some(kind) && kind_at(grid, above) == Some(kind))
        .then_some([below, center, above])
}
