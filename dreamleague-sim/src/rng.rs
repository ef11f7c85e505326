//! Seeded random streams for match simulation.
//!
//! Every stochastic component takes `&mut impl Rng`, so any generator can be injected. The
//! bundle here is the canonical way to turn a single user-visible seed into independent,
//! reproducible streams: drawing more events never shifts the per-player statistics, and so on.

use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;

/// Independent RNG streams derived from one match seed.
#[derive(Debug, Clone)]
pub struct MatchRng {
    performance: CountingRng<ChaCha8Rng>,
    events: CountingRng<ChaCha8Rng>,
    score: CountingRng<ChaCha8Rng>,
    stats: CountingRng<ChaCha8Rng>,
    commentary: CountingRng<ChaCha8Rng>,
    progression: CountingRng<ChaCha8Rng>,
}

impl MatchRng {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            performance: CountingRng::new(derive_stream_seed(seed, b"performance")),
            events: CountingRng::new(derive_stream_seed(seed, b"events")),
            score: CountingRng::new(derive_stream_seed(seed, b"score")),
            stats: CountingRng::new(derive_stream_seed(seed, b"stats")),
            commentary: CountingRng::new(derive_stream_seed(seed, b"commentary")),
            progression: CountingRng::new(derive_stream_seed(seed, b"progression")),
        }
    }

    /// Team performance jitter stream.
    pub fn performance(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.performance
    }

    /// Event generation stream.
    pub fn events(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.events
    }

    /// Final score upset stream.
    pub fn score(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.score
    }

    /// Per-player statistics stream.
    pub fn stats(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.stats
    }

    /// Commentary phrase stream.
    pub fn commentary(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.commentary
    }

    /// Post-match progression stream.
    pub fn progression(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.progression
    }

    /// Total draws across every stream.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.performance
            .draws()
            .saturating_add(self.events.draws())
            .saturating_add(self.score.draws())
            .saturating_add(self.stats.draws())
            .saturating_add(self.commentary.draws())
            .saturating_add(self.progression.draws())
    }
}

/// Named random stream a simulation stage draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Performance,
    Events,
    Score,
    Stats,
    Commentary,
    Progression,
}

/// Source of per-stage random streams for the simulation pipeline.
pub trait MatchStreams {
    fn stream(&mut self, stream: Stream) -> &mut dyn RngCore;
}

impl MatchStreams for MatchRng {
    fn stream(&mut self, stream: Stream) -> &mut dyn RngCore {
        match stream {
            Stream::Performance => &mut self.performance,
            Stream::Events => &mut self.events,
            Stream::Score => &mut self.score,
            Stream::Stats => &mut self.stats,
            Stream::Commentary => &mut self.commentary,
            Stream::Progression => &mut self.progression,
        }
    }
}

/// Serves every stage from one injected generator, in call order.
#[derive(Debug)]
pub struct SingleStream<'r, R>(pub &'r mut R);

impl<R: RngCore> MatchStreams for SingleStream<'_, R> {
    fn stream(&mut self, _stream: Stream) -> &mut dyn RngCore {
        &mut *self.0
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha8Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Derive a sub-seed for `domain_tag` from a user seed.
///
/// Also used to fan a tournament round seed out into per-match seeds.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so construction cannot fail for an 8-byte key.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
