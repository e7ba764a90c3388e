use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use crate::core::PieceKind;

/// Supplies the kind of each newly generated piece.
///
/// The session asks for exactly one kind per spawn. Implement this to drive
/// a session with a scripted sequence.
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

impl<S> PieceSource for &mut S
where
    S: PieceSource + ?Sized,
{
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

impl<S> PieceSource for Box<S>
where
    S: PieceSource + ?Sized,
{
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Uniformly random piece kinds, each with probability 1/7.
#[derive(Debug, Clone)]
pub struct RandomPieceSource<R = Pcg64Mcg> {
    rng: R,
}

impl RandomPieceSource {
    /// Creates a source seeded from the OS's random data source.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(Pcg64Mcg::from_os_rng())
    }

    /// Creates a reproducible source.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(Pcg64Mcg::seed_from_u64(seed))
    }
}

impl<R> RandomPieceSource<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> PieceSource for RandomPieceSource<R>
where
    R: Rng,
{
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Repeats a fixed list of kinds forever.
///
/// ```
/// use blockfall_engine::{PieceKind, PieceSource, SequencePieceSource};
///
/// let mut source = SequencePieceSource::new([PieceKind::O, PieceKind::I]);
/// assert_eq!(source.next_kind(), PieceKind::O);
/// assert_eq!(source.next_kind(), PieceKind::I);
/// assert_eq!(source.next_kind(), PieceKind::O);
/// ```
#[derive(Debug, Clone)]
pub struct SequencePieceSource {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceSource {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, index: 0 }
    }
}

impl PieceSource for SequencePieceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.index];
        self.index = (self.index + 1) % self.kinds.len();
        kind
    }
}
