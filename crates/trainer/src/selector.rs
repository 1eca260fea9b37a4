use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use fretdrill_domain::{ChordProvider, ChordQuality, ChordSelection, Note};

/// Redraws allowed before `pick_distinct_pair` forces a different quality.
pub const MAX_PAIR_RETRIES: usize = 64;

/// Uniform draws used by the selector.
pub trait UniformSource {
    /// An index in `0..len`. Callers never pass 0.
    fn index(&mut self, len: usize) -> usize;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

/// `UniformSource` over any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R>(R);

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl RngSource<ChaCha8Rng> {
    /// Reproducible draws for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len.max(1))
    }
}

/// Picks random chords from a provider.
pub struct ChordSelector<P, R> {
    provider: P,
    rng: R,
}

impl<P: ChordProvider, R: UniformSource> ChordSelector<P, R> {
    pub fn new(provider: P, rng: R) -> Self {
        Self { provider, rng }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn draw(&mut self, len: usize) -> usize {
        let len = len.max(1);
        self.rng.index(len) % len
    }

    /// Note and quality are drawn independently, then a variant among the
    /// provider's fingerings. Chords without data get variant 0.
    pub fn pick_random(&mut self) -> ChordSelection {
        let note = Note::ALL[self.draw(Note::ALL.len())];
        let quality = ChordQuality::ALL[self.draw(ChordQuality::ALL.len())];
        let count = self.provider.variant_count(note, quality).max(1);
        let variant = self.draw(count);
        let selection = ChordSelection::new(note, quality, variant);
        debug!(?selection, count, "picked chord");
        selection
    }

    /// Two selections that differ in at least one field.
    ///
    /// The second draw is repeated until it differs from the first. After
    /// `MAX_PAIR_RETRIES` collisions, which only a degenerate source
    /// produces, the second chord's quality is advanced instead; that path
    /// favours the next quality in order and is the only source of bias.
    pub fn pick_distinct_pair(&mut self) -> (ChordSelection, ChordSelection) {
        let first = self.pick_random();
        for _ in 0..MAX_PAIR_RETRIES {
            let second = self.pick_random();
            if second != first {
                return (first, second);
            }
        }
        warn!(?first, "random source kept repeating, forcing a distinct quality");
        let quality = first.quality.cycled();
        let count = self.provider.variant_count(first.note, quality).max(1);
        let second = ChordSelection::new(first.note, quality, first.variant.min(count - 1));
        (first, second)
    }
}
