use std::{
    fmt::{self, Display},
    str::FromStr,
};

use gemfall_core::{GemKind, Palette};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;

use crate::GemSource;

/// A 256-bit seed for [`RandomGemSource`].
///
/// Seeds are written as 64 hexadecimal digits, so a run can be reproduced by
/// passing the printed seed back in.
///
/// # Examples
///
/// ```
/// use gemfall_generator::GemSeed;
///
/// let text = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";
/// let seed: GemSeed = text.parse()?;
/// assert_eq!(seed.to_string(), text);
/// # Ok::<(), gemfall_generator::GemSeedError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GemSeed([u8; 32]);

/// Errors that can occur when parsing a [`GemSeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GemSeedError {
    /// The text did not contain exactly 64 hexadecimal digits.
    #[display("seed must be 64 hexadecimal digits, got {len}")]
    InvalidLength {
        /// Number of characters found.
        len: usize,
    },
    /// The text contained a non-hexadecimal character.
    #[display("invalid hexadecimal digit {character:?} in seed")]
    InvalidDigit {
        /// The rejected character.
        character: char,
    },
}

impl GemSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::rng().random())
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for GemSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for GemSeed {
    type Err = GemSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != 64 {
            return Err(GemSeedError::InvalidLength { len });
        }
        let mut bytes = [0; 32];
        let mut digits = s.chars().map(|character| {
            character
                .to_digit(16)
                .ok_or(GemSeedError::InvalidDigit { character })
        });
        for byte in &mut bytes {
            let (Some(high), Some(low)) = (digits.next(), digits.next()) else {
                unreachable!("length checked above");
            };
            #[expect(clippy::cast_possible_truncation)]
            let value = ((high? << 4) | low?) as u8;
            *byte = value;
        }
        Ok(Self(bytes))
    }
}

/// A source that draws kinds uniformly at random from a palette.
///
/// The generator is a PCG seeded from a [`GemSeed`], so two sources created
/// with the same palette and seed produce identical sequences.
///
/// # Examples
///
/// ```
/// use gemfall_core::Palette;
/// use gemfall_generator::{GemSeed, GemSource, RandomGemSource};
///
/// let palette = Palette::new(3)?;
/// let seed = GemSeed::random();
/// let mut a = RandomGemSource::with_seed(palette, seed);
/// let mut b = RandomGemSource::with_seed(palette, seed);
///
/// for _ in 0..16 {
///     let kind = a.next_kind();
///     assert!(palette.contains(kind));
///     assert_eq!(kind, b.next_kind());
/// }
/// # Ok::<(), gemfall_core::PaletteError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RandomGemSource {
    palette: Palette,
    seed: GemSeed,
    rng: Pcg64,
}

impl RandomGemSource {
    /// Creates a source with a freshly drawn seed.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self::with_seed(palette, GemSeed::random())
    }

    /// Creates a source that replays the sequence determined by `seed`.
    #[must_use]
    pub fn with_seed(palette: Palette, seed: GemSeed) -> Self {
        log::debug!("gem source seeded with {seed} for {} kinds", palette.size());
        Self {
            palette,
            seed,
            rng: Pcg64::from_seed(seed.0),
        }
    }

    /// Returns the seed this source was created with.
    #[must_use]
    pub fn seed(&self) -> GemSeed {
        self.seed
    }
}

impl GemSource for RandomGemSource {
    fn palette(&self) -> Palette {
        self.palette
    }

    fn next_kind(&mut self) -> GemKind {
        GemKind::new(self.rng.random_range(0..self.palette.count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3";

    #[test]
    fn test_seed_parse_display() {
        let seed: GemSeed = SEED.parse().unwrap();
        assert_eq!(seed.as_bytes()[0], 0xa2);
        assert_eq!(seed.as_bytes()[31], 0xb3);
        assert_eq!(seed.to_string(), SEED);

        let upper: GemSeed = SEED.to_uppercase().parse().unwrap();
        assert_eq!(upper, seed);
    }

    #[test]
    fn test_seed_parse_errors() {
        assert_eq!(
            "abc".parse::<GemSeed>(),
            Err(GemSeedError::InvalidLength { len: 3 })
        );
        let bad = format!("{}g", &SEED[..63]);
        assert_eq!(
            bad.parse::<GemSeed>(),
            Err(GemSeedError::InvalidDigit { character: 'g' })
        );
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let palette = Palette::new(6).unwrap();
        let seed: GemSeed = SEED.parse().unwrap();
        let mut a = RandomGemSource::with_seed(palette, seed);
        let mut b = RandomGemSource::with_seed(palette, seed);
        let xs: Vec<_> = (0..64).map(|_| a.next_kind()).collect();
        let ys: Vec<_> = (0..64).map(|_| b.next_kind()).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.seed(), seed);
    }

    #[test]
    fn test_draws_cover_palette() {
        let palette = Palette::new(3).unwrap();
        let mut source = RandomGemSource::with_seed(palette, SEED.parse().unwrap());
        let mut seen = [false; 3];
        for _ in 0..300 {
            let kind = source.next_kind();
            assert!(palette.contains(kind));
            seen[usize::from(kind.index())] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_single_kind_palette() {
        let palette = Palette::new(1).unwrap();
        let mut source = RandomGemSource::new(palette);
        assert!((0..10).all(|_| source.next_kind() == GemKind::new(0)));
    }
}
