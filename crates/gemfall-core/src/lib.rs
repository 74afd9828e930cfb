//! Core data structures for the gemfall tile-matching engine.
//!
//! This crate provides the board representation shared by the generator, the
//! cascade engine and any presentation layer built on top of them.
//!
//! # Overview
//!
//! - [`position`]: Board coordinates. `y = 0` is the bottom row; gravity pulls
//!   gems towards smaller `y`.
//! - [`gem`]: Gem kinds, the palette they are drawn from and spawned gems with a
//!   stable identity.
//! - [`grid`]: The fixed-size board itself, with bounds-checked access and a
//!   compact text format used by fixtures and the command line driver.
//!
//! # Examples
//!
//! ```
//! use gemfall_core::{GemKind, Grid, Position};
//!
//! let mut grid = Grid::new(3, 3)?;
//! let gem = grid.spawn(Position::new(1, 0), GemKind::new(0))?;
//!
//! assert_eq!(grid.get(Position::new(1, 0))?, Some(gem));
//! assert!(grid.is_empty(Position::new(1, 1))?);
//! # Ok::<(), gemfall_core::GridError>(())
//! ```

pub mod gem;
pub mod grid;
pub mod position;

pub use self::{
    gem::{Gem, GemId, GemKind, Palette, PaletteError},
    grid::{Grid, GridError},
    position::Position,
};
