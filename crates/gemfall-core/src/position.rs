//! Board position representation.

use std::fmt::{self, Display};

/// A cell coordinate on the board.
///
/// `x` grows to the right and `y` grows upwards: row `0` is the bottom of the
/// board, which is where gems come to rest after gravity is applied.
///
/// Positions order column-major (by `x`, then `y`), which is the order the
/// engine visits cells when collapsing and refilling.
///
/// # Examples
///
/// ```
/// use gemfall_core::Position;
///
/// let pos = Position::new(2, 0);
/// assert_eq!(pos.up(), Position::new(2, 1));
/// assert_eq!(pos.down(), None);
/// assert_eq!(pos.left(), Some(Position::new(1, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    x: usize,
    y: usize,
}

impl Position {
    /// Creates a new position from column `x` and row `y`.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the column of this position.
    #[must_use]
    pub const fn x(self) -> usize {
        self.x
    }

    /// Returns the row of this position.
    #[must_use]
    pub const fn y(self) -> usize {
        self.y
    }

    /// Returns the position one row above.
    ///
    /// The result may lie outside the board; bounds are checked by [`Grid`].
    ///
    /// [`Grid`]: crate::Grid
    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    /// Returns the position one row below, or `None` on the bottom row.
    #[must_use]
    pub const fn down(self) -> Option<Self> {
        match self.y.checked_sub(1) {
            Some(y) => Some(Self::new(self.x, y)),
            None => None,
        }
    }

    /// Returns the position one column to the left, or `None` on the first column.
    #[must_use]
    pub const fn left(self) -> Option<Self> {
        match self.x.checked_sub(1) {
            Some(x) => Some(Self::new(x, self.y)),
            None => None,
        }
    }

    /// Returns the position one column to the right.
    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors() {
        let pos = Position::new(1, 1);
        assert_eq!(pos.up(), Position::new(1, 2));
        assert_eq!(pos.down(), Some(Position::new(1, 0)));
        assert_eq!(pos.left(), Some(Position::new(0, 1)));
        assert_eq!(pos.right(), Position::new(2, 1));

        let origin = Position::new(0, 0);
        assert_eq!(origin.down(), None);
        assert_eq!(origin.left(), None);
    }

    #[test]
    fn test_column_major_order() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 2),
            Position::new(0, 0),
            Position::new(1, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 2),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 4).to_string(), "(3, 4)");
        assert_eq!(Position::from((2, 5)), Position::new(2, 5));
    }
}
