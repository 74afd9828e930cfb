use gemfall_core::{GemKind, Palette};

use crate::GemSource;

/// Errors that can occur when building a [`SequenceGemSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SequenceSourceError {
    /// The scripted sequence contained no kinds.
    #[display("gem sequence is empty")]
    Empty,
    /// The scripted text contained a character that is not a kind letter.
    #[display("invalid gem letter {letter:?}")]
    InvalidLetter {
        /// The rejected character.
        letter: char,
    },
}

/// A deterministic source that replays a scripted sequence of kinds.
///
/// Once the script is exhausted it starts over from the beginning, so the
/// source never runs dry.
///
/// # Examples
///
/// ```
/// use gemfall_core::GemKind;
/// use gemfall_generator::{GemSource, SequenceGemSource};
///
/// let mut source = SequenceGemSource::from_letters("AB")?;
/// assert_eq!(source.next_kind(), GemKind::new(0));
/// assert_eq!(source.next_kind(), GemKind::new(1));
/// assert_eq!(source.next_kind(), GemKind::new(0));
/// assert_eq!(source.drawn(), 3);
/// # Ok::<(), gemfall_generator::SequenceSourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SequenceGemSource {
    kinds: Vec<GemKind>,
    palette: Palette,
    drawn: usize,
}

impl SequenceGemSource {
    /// Creates a source that replays `kinds` in order.
    ///
    /// The palette is the smallest one containing every scripted kind.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceSourceError::Empty`] if `kinds` yields nothing.
    pub fn new<I>(kinds: I) -> Result<Self, SequenceSourceError>
    where
        I: IntoIterator<Item = GemKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        let max = kinds
            .iter()
            .map(|kind| kind.index())
            .max()
            .ok_or(SequenceSourceError::Empty)?;
        let palette = Palette::new(usize::from(max) + 1)
            .map_err(|_| SequenceSourceError::Empty)?;
        Ok(Self {
            kinds,
            palette,
            drawn: 0,
        })
    }

    /// Creates a source from kind letters such as `"AABAC"`.
    ///
    /// Whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceSourceError::InvalidLetter`] for characters other than
    /// `A`-`Z`, and [`SequenceSourceError::Empty`] if no letters remain.
    pub fn from_letters(letters: &str) -> Result<Self, SequenceSourceError> {
        let kinds = letters
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|letter| {
                GemKind::from_letter(letter).ok_or(SequenceSourceError::InvalidLetter { letter })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(kinds)
    }

    /// Returns the number of kinds drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl GemSource for SequenceGemSource {
    fn palette(&self) -> Palette {
        self.palette
    }

    fn next_kind(&mut self) -> GemKind {
        let kind = self.kinds[self.drawn % self.kinds.len()];
        self.drawn += 1;
        kind
    }
}
