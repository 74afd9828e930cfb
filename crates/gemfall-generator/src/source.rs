use gemfall_core::{GemKind, Palette};

/// A supplier of gem kinds for spawning and refilling.
///
/// Implementations must always produce a kind; the engine calls
/// [`next_kind`](GemSource::next_kind) once per empty cell.
pub trait GemSource {
    /// Returns the palette this source draws from.
    fn palette(&self) -> Palette;

    /// Draws the next gem kind.
    fn next_kind(&mut self) -> GemKind;
}

impl<S> GemSource for &mut S
where
    S: GemSource + ?Sized,
{
    fn palette(&self) -> Palette {
        (**self).palette()
    }

    fn next_kind(&mut self) -> GemKind {
        (**self).next_kind()
    }
}

impl<S> GemSource for Box<S>
where
    S: GemSource + ?Sized,
{
    fn palette(&self) -> Palette {
        (**self).palette()
    }

    fn next_kind(&mut self) -> GemKind {
        (**self).next_kind()
    }
}
