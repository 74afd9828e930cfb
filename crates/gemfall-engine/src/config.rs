use std::time::Duration;

use gemfall_core::{Palette, PaletteError};

/// Errors that can occur when validating a [`CascadeConfig`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum ConfigError {
    /// The board would have no cells.
    #[display("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// The palette size is not supported.
    #[display("{_0}")]
    #[from]
    Palette(PaletteError),
    /// The gem source draws from a different palette than configured.
    #[display("gem source palette has {actual} kinds, configuration expects {expected}")]
    PaletteMismatch {
        /// Palette size in the configuration.
        expected: usize,
        /// Palette size reported by the gem source.
        actual: usize,
    },
    /// The grid holds gems the gem source could never spawn.
    #[display("grid contains gem kinds outside the source palette of {palette_size}")]
    ForeignKinds {
        /// Palette size reported by the gem source.
        palette_size: usize,
    },
}

/// Board and pacing settings for a cascade resolver.
///
/// The clear delay only paces presentation: [`CascadeResolver::advance`]
/// reports it when matches are found, and a headless driver may ignore it
/// without changing the outcome.
///
/// [`CascadeResolver::advance`]: crate::CascadeResolver::advance
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use gemfall_engine::CascadeConfig;
///
/// let config = CascadeConfig::default()
///     .with_size(6, 9)
///     .with_palette_size(4)?
///     .with_clear_delay(Duration::ZERO);
/// config.validate()?;
/// assert_eq!(config.palette.size(), 4);
/// # Ok::<(), gemfall_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Kinds gems are drawn from.
    pub palette: Palette,
    /// Pause between highlighting matches and removing them.
    pub clear_delay: Duration,
}

impl CascadeConfig {
    /// Default pause between highlighting matched gems and removing them.
    pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(500);

    /// Returns the configuration with a different board size.
    #[must_use]
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns the configuration with a different palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Returns the configuration with a palette of `size` kinds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Palette`] if `size` is not a valid palette size.
    pub fn with_palette_size(self, size: usize) -> Result<Self, ConfigError> {
        Ok(self.with_palette(Palette::new(size)?))
    }

    /// Returns the configuration with a different clear delay.
    #[must_use]
    pub fn with_clear_delay(mut self, clear_delay: Duration) -> Self {
        self.clear_delay = clear_delay;
        self
    }

    /// Checks that the configuration describes a usable board.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDimension`] if the width or height is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            palette: Palette::default(),
            clear_delay: Self::DEFAULT_CLEAR_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CascadeConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!((config.width, config.height), (8, 8));
        assert_eq!(config.palette.size(), 5);
        assert_eq!(config.clear_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = CascadeConfig::default().with_size(0, 4);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDimension {
                width: 0,
                height: 4
            })
        );
        assert!(CascadeConfig::default().with_size(4, 0).validate().is_err());
    }

    #[test]
    fn test_palette_size_rejected() {
        assert_eq!(
            CascadeConfig::default().with_palette_size(0),
            Err(ConfigError::Palette(PaletteError { size: 0 }))
        );
        let small = CascadeConfig::default().with_palette_size(1).unwrap();
        assert_eq!(small.validate(), Ok(()));
    }
}
