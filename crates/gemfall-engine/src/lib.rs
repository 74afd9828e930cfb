//! Cascade resolution for the gemfall tile-matching engine.
//!
//! A cascade repeatedly detects runs of three or more same-kind gems, clears
//! them, lets the remaining gems fall and refills the board, until no run is
//! left. [`CascadeResolver`] drives that loop one step at a time so a
//! presentation layer can pace it, and reports every grid change through a
//! [`CascadeObserver`].
//!
//! # Overview
//!
//! - [`MatchDetector`]: Finds every cell belonging to a horizontal or vertical
//!   run of length three or more.
//! - [`gravity`]: The clear, collapse and refill mutations of one cycle.
//! - [`CascadeResolver`]: The state machine tying them together.
//! - [`testing`]: A chaining harness and a recording observer for tests.
//!
//! # Examples
//!
//! ```
//! use gemfall_core::Grid;
//! use gemfall_engine::{CascadeResolver, NoopObserver};
//! use gemfall_generator::SequenceGemSource;
//!
//! let grid: Grid = "
//!     BCB
//!     AAA
//! "
//! .parse()?;
//! let source = SequenceGemSource::from_letters("CBC")?;
//! let mut resolver = CascadeResolver::new(grid, source)?;
//!
//! let stats = resolver.run_until_stable(&mut NoopObserver, None)?;
//! assert_eq!(stats.cycles, 1);
//! assert_eq!(resolver.grid().to_string(), "CBC\nBCB");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{config::*, error::*, matcher::*, observer::*, resolver::*};

mod config;
mod error;
pub mod gravity;
mod matcher;
mod observer;
mod resolver;
pub mod testing;
