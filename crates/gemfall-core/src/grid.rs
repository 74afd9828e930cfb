//! The fixed-size gem board.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{Gem, GemId, GemKind, Position};

/// Errors raised by [`Grid`] construction, access and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// A position outside `[0, width) x [0, height)` was accessed.
    #[display("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected position.
        position: Position,
        /// Width of the grid.
        width: usize,
        /// Height of the grid.
        height: usize,
    },
    /// A grid was requested with a zero width or height.
    #[display("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// A grid was requested with more cells than can be addressed.
    #[display("grid of {width}x{height} cells is too large")]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// Grid text contained no rows.
    #[display("grid text is empty")]
    EmptyText,
    /// A row in grid text had a different width than the first row.
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index in the text (top row first).
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Grid text contained a character that is neither a kind letter nor an empty marker.
    #[display("invalid cell character {character:?}")]
    InvalidCell {
        /// The rejected character.
        character: char,
    },
}

/// A `width` x `height` board of cells, each empty or holding one [`Gem`].
///
/// The grid is plain data: it enforces bounds but no game rules. Match
/// detection, gravity and refilling live in the engine crate.
///
/// Every gem placed through [`Grid::spawn`] receives a fresh [`GemId`].
/// Moving a gem with [`Grid::take`] and [`Grid::set`] keeps its identity.
///
/// # Text format
///
/// Grids parse from and display as one line per row, **top row first**.
/// Letters `A`-`Z` are gem kinds and `.` or `_` mark empty cells. Other
/// whitespace inside a line is ignored, and blank lines are skipped.
///
/// ```
/// use gemfall_core::{GemKind, Grid, Position};
///
/// let grid: Grid = "
///     B . C
///     A A B
/// "
/// .parse()?;
///
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.kind_at(Position::new(0, 0))?, Some(GemKind::new(0)));
/// assert!(grid.is_empty(Position::new(1, 1))?);
/// assert_eq!(grid.to_string(), "B.C\nAAB");
/// # Ok::<(), gemfall_core::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Gem>>,
    next_id: u64,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroDimension`] if `width` or `height` is zero, and
    /// [`GridError::TooLarge`] if the cell count overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![None; len],
            next_id: 0,
        })
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if `pos` lies on the board.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x() < self.width && pos.y() < self.height
    }

    fn index(&self, pos: Position) -> Result<usize, GridError> {
        if self.contains(pos) {
            Ok(pos.y() * self.width + pos.x())
        } else {
            Err(GridError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Returns the content of the cell at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `pos` is outside the grid.
    pub fn get(&self, pos: Position) -> Result<Option<Gem>, GridError> {
        let index = self.index(pos)?;
        Ok(self.cells[index])
    }

    /// Returns the kind of the gem at `pos`, or `None` if the cell is empty.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `pos` is outside the grid.
    pub fn kind_at(&self, pos: Position) -> Result<Option<GemKind>, GridError> {
        Ok(self.get(pos)?.map(Gem::kind))
    }

    /// Returns `true` if the cell at `pos` holds no gem.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `pos` is outside the grid.
    pub fn is_empty(&self, pos: Position) -> Result<bool, GridError> {
        Ok(self.get(pos)?.is_none())
    }

    /// Overwrites the cell at `pos` and returns its previous content.
    ///
    /// The write is unconditional; the caller is responsible for any gem it
    /// replaces.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, cell: Option<Gem>) -> Result<Option<Gem>, GridError> {
        let index = self.index(pos)?;
        Ok(std::mem::replace(&mut self.cells[index], cell))
    }

    /// Empties the cell at `pos` and returns the gem it held.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `pos` is outside the grid.
    pub fn take(&mut self, pos: Position) -> Result<Option<Gem>, GridError> {
        self.set(pos, None)
    }

    /// Places a newly created gem of `kind` at `pos` and returns it.
    ///
    /// Any gem previously at `pos` is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `pos` is outside the grid.
    pub fn spawn(&mut self, pos: Position, kind: GemKind) -> Result<Gem, GridError> {
        let index = self.index(pos)?;
        let gem = Gem::new(GemId::new(self.next_id), kind);
        self.next_id += 1;
        self.cells[index] = Some(gem);
        Ok(gem)
    }

    /// Returns all positions in column-major order (left to right, bottom to top).
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    /// Returns the positions of column `x` from bottom to top.
    ///
    /// Yields nothing if `x` is outside the grid.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Position> + use<> {
        let height = if x < self.width { self.height } else { 0 };
        (0..height).map(move |y| Position::new(x, y))
    }

    /// Returns the empty positions in column-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions()
            .filter(|&pos| self.cells[pos.y() * self.width + pos.x()].is_none())
    }

    /// Returns the number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Returns `true` if every cell holds a gem.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(gem) => write!(f, "{}", gem.kind())?,
                    None => write!(f, ".")?,
                }
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for line in s.lines() {
            let mut row = Vec::new();
            for ch in line.chars().filter(|ch| !ch.is_whitespace()) {
                let cell = match ch {
                    '.' | '_' => None,
                    _ => Some(
                        GemKind::from_letter(ch).ok_or(GridError::InvalidCell { character: ch })?,
                    ),
                };
                row.push(cell);
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }

        let width = rows.first().ok_or(GridError::EmptyText)?.len();
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(GridError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        let height = rows.len();
        let mut grid = Self::new(width, height)?;
        for x in 0..width {
            for (y, row) in rows.iter().rev().enumerate() {
                if let Some(kind) = row[x] {
                    grid.spawn(Position::new(x, y), kind)?;
                }
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(letter: char) -> GemKind {
        GemKind::from_letter(letter).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            Grid::new(0, 3),
            Err(GridError::ZeroDimension {
                width: 0,
                height: 3
            })
        );
        assert!(Grid::new(3, 0).is_err());
        assert_eq!(
            Grid::new(usize::MAX, 2),
            Err(GridError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );

        let grid = Grid::new(4, 2).unwrap();
        assert_eq!(grid.empty_count(), 8);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = Grid::new(3, 2).unwrap();
        let err = GridError::OutOfBounds {
            position: Position::new(3, 0),
            width: 3,
            height: 2,
        };
        assert_eq!(grid.get(Position::new(3, 0)), Err(err));
        assert_eq!(grid.set(Position::new(3, 0), None), Err(err));
        assert_eq!(grid.spawn(Position::new(3, 0), kind('A')), Err(err));
        assert!(grid.is_empty(Position::new(0, 2)).is_err());
        assert_eq!(
            err.to_string(),
            "position (3, 0) is outside the 3x2 grid"
        );
    }

    #[test]
    fn test_spawn_assigns_fresh_ids() {
        let mut grid = Grid::new(2, 2).unwrap();
        let first = grid.spawn(Position::new(0, 0), kind('A')).unwrap();
        let second = grid.spawn(Position::new(0, 0), kind('B')).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(grid.get(Position::new(0, 0)).unwrap(), Some(second));
    }

    #[test]
    fn test_take_and_set_preserve_identity() {
        let mut grid = Grid::new(1, 3).unwrap();
        let gem = grid.spawn(Position::new(0, 2), kind('C')).unwrap();

        let taken = grid.take(Position::new(0, 2)).unwrap();
        assert_eq!(taken, Some(gem));
        assert!(grid.is_empty(Position::new(0, 2)).unwrap());

        let previous = grid.set(Position::new(0, 0), taken).unwrap();
        assert_eq!(previous, None);
        assert_eq!(grid.get(Position::new(0, 0)).unwrap(), Some(gem));
    }

    #[test]
    fn test_parse_and_display() {
        let grid: Grid = "
            A B .
            C _ A
        "
        .parse()
        .unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.kind_at(Position::new(0, 1)).unwrap(), Some(kind('A')));
        assert_eq!(grid.kind_at(Position::new(0, 0)).unwrap(), Some(kind('C')));
        assert_eq!(grid.kind_at(Position::new(2, 1)).unwrap(), None);
        assert_eq!(grid.empty_count(), 2);
        assert_eq!(grid.to_string(), "AB.\nC.A");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(GridError::EmptyText));
        assert_eq!("  \n \n".parse::<Grid>(), Err(GridError::EmptyText));
        assert_eq!(
            "AB\nABC".parse::<Grid>(),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            "A1".parse::<Grid>(),
            Err(GridError::InvalidCell { character: '1' })
        );
    }

    #[test]
    fn test_positions_are_column_major() {
        let grid = Grid::new(2, 3).unwrap();
        let positions: Vec<_> = grid.positions().collect();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[2], Position::new(0, 2));
        assert_eq!(positions[3], Position::new(1, 0));

        let column: Vec<_> = grid.column(1).collect();
        assert_eq!(
            column,
            vec![Position::new(1, 0), Position::new(1, 1), Position::new(1, 2)]
        );
        assert_eq!(grid.column(2).count(), 0);
    }

    #[test]
    fn test_empty_positions() {
        let grid: Grid = "
            A.
            .B
        "
        .parse()
        .unwrap();
        let empty: Vec<_> = grid.empty_positions().collect();
        assert_eq!(empty, vec![Position::new(0, 0), Position::new(1, 1)]);
    }
}
