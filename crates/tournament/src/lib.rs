//! Swiss Tournament Director
//!
//! This crate provides infrastructure for:
//! - Pairing rounds (random first round, constrained search afterwards)
//! - Recording results and deriving scores, Buchholz and standings
//! - Moving safely forward and backward through rounds, with an audit trail
//!
//! # Usage
//!
//! ```bash
//! # Start a tournament and pair round 1
//! cargo run -p swiss_tournament -- init --title "Club Open" --description "Rapid" \
//!     --competitor Alice --competitor Bob --competitor Carol --competitor Dave
//! cargo run -p swiss_tournament -- next
//!
//! # Enter results, then pair the next round
//! cargo run -p swiss_tournament -- record 1 A_WIN
//! cargo run -p swiss_tournament -- standings
//! ```

pub mod audit;
pub mod config;
pub mod lifecycle;
pub mod pairing;
pub mod recompute;
pub mod standings;
pub mod store;

pub use config::{load_config, parse_config, ConfigError};
pub use lifecycle::*;
pub use pairing::PairingEngine;
pub use store::{JsonFileStore, StoreError, TournamentStore};
pub use swiss_core;
