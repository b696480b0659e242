pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;

// =============================================================================
// First-round pairing strategy, implemented by the crates under pairers/
// =============================================================================

/// Strategy producing the round-1 pairing, before any results exist.
///
/// This allows swapping the uniform random pairer for a seeded one in tests,
/// or for a rating-based seeding scheme.
pub trait FirstRoundPairer: Send {
    /// Pair every competitor exactly once.
    ///
    /// With an odd roster exactly one competitor must receive a
    /// [`Pairing::Bye`]. The first id of each [`Pairing::Pair`] plays White.
    fn pair(&mut self, competitors: &[CompetitorId]) -> Vec<Pairing>;

    /// Returns the strategy's name for logs and error messages
    fn name(&self) -> &str;
}
