//! Gem kinds, palettes and spawned gems.

use std::fmt::{self, Display};

/// The kind (colour) of a gem.
///
/// Two gems match when their kinds are equal. Kinds are identified by a
/// zero-based index into a [`Palette`] and are written as the letters `A`-`Z`
/// in the text format.
///
/// # Examples
///
/// ```
/// use gemfall_core::GemKind;
///
/// let kind = GemKind::new(2);
/// assert_eq!(kind.index(), 2);
/// assert_eq!(kind.letter(), 'C');
/// assert_eq!(GemKind::from_letter('C'), Some(kind));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GemKind(u8);

impl GemKind {
    /// Creates a gem kind from its palette index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Palette::MAX_SIZE`].
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!(index < Palette::MAX_SIZE, "gem kind index out of range");
        Self(index)
    }

    /// Returns the zero-based palette index of this kind.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the letter used for this kind in the text format.
    #[must_use]
    pub const fn letter(self) -> char {
        (b'A' + self.0) as char
    }

    /// Parses a kind from its text-format letter (`A`-`Z`, case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        let byte = u8::try_from(letter.to_ascii_uppercase()).ok()?;
        byte.is_ascii_uppercase().then(|| Self(byte - b'A'))
    }
}

impl Display for GemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The set of gem kinds a board draws from.
///
/// A palette holds the kinds `0..size`. Palettes with fewer than three kinds are
/// valid but degenerate: matches become hard or impossible to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Palette {
    size: u8,
}

/// Error returned when a palette size is outside `1..=Palette::MAX_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("palette size must be between 1 and {}, got {size}", Palette::MAX_SIZE)]
pub struct PaletteError {
    /// The rejected size.
    pub size: usize,
}

impl Palette {
    /// The largest palette that can be written in the text format.
    pub const MAX_SIZE: u8 = 26;

    /// Creates a palette with `size` kinds.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError`] if `size` is zero or larger than [`Palette::MAX_SIZE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use gemfall_core::Palette;
    ///
    /// let palette = Palette::new(5)?;
    /// assert_eq!(palette.size(), 5);
    /// assert!(Palette::new(0).is_err());
    /// # Ok::<(), gemfall_core::PaletteError>(())
    /// ```
    pub fn new(size: usize) -> Result<Self, PaletteError> {
        match u8::try_from(size) {
            Ok(size) if (1..=Self::MAX_SIZE).contains(&size) => Ok(Self { size }),
            _ => Err(PaletteError { size }),
        }
    }

    /// Returns the number of kinds in the palette.
    #[must_use]
    pub const fn size(self) -> usize {
        self.size as usize
    }

    /// Returns the number of kinds as the index type of [`GemKind`].
    ///
    /// Every index in `0..count()` is a valid [`GemKind::new`] argument.
    #[must_use]
    pub const fn count(self) -> u8 {
        self.size
    }

    /// Returns `true` if `kind` belongs to this palette.
    #[must_use]
    pub const fn contains(self, kind: GemKind) -> bool {
        kind.0 < self.size
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self { size: 5 }
    }
}

/// Identity of a spawned gem.
///
/// Identifiers are handed out in spawn order by the owning [`Grid`] and never
/// reused, so a renderer can keep one visual object per gem while it falls.
///
/// [`Grid`]: crate::Grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GemId(u64);

impl GemId {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for GemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A gem occupying one cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gem {
    id: GemId,
    kind: GemKind,
}

impl Gem {
    pub(crate) const fn new(id: GemId, kind: GemKind) -> Self {
        Self { id, kind }
    }

    /// Returns the identity of this gem.
    #[must_use]
    pub const fn id(self) -> GemId {
        self.id
    }

    /// Returns the kind of this gem.
    #[must_use]
    pub const fn kind(self) -> GemKind {
        self.kind
    }
}
