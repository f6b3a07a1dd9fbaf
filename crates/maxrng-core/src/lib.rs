//! # maxrng-core
//!
//! **Entropy aggregation and key expansion from eight system noise sources.**
//!
//! `maxrng-core` samples the hardware RNG instruction, CPU timestamp, process
//! memory counters, a high-resolution timer, filesystem statistics, microphone
//! noise, power-supply gauges and network counters, mixes them into one digest
//! and stretches that digest into as many output bytes as requested.
//!
//! ## Quick Start
//!
//! ```no_run
//! use maxrng_core::{OutputMode, RngConfig, generate_to_vec};
//!
//! let config = RngConfig::secure().with_output(OutputMode::Hex);
//! let hex = generate_to_vec(16, &config).expect("generation failed");
//! assert_eq!(hex.len(), 32);
//! ```
//!
//! ## Architecture
//!
//! Sources → Mixer (digest) → Expander (stream) → Encoder → caller buffer
//!
//! Every stage is a small strategy chosen by one config field:
//! - [`HashAlgorithm`] → [`HashProvider`]: SHA-256, SHA-384 or SHA-512.
//! - [`MixingMode`] → [`Mixer`]: chained per-round digests or one running hash.
//! - [`ExpansionMode`] → [`Expander`]: counter, HKDF, HMAC stream, or XOF.
//! - [`OutputMode`] → [`OutputEncoder`]: raw, hex or base64.
//! - [`ThreadingMode`] → [`ThreadGuard`]: none, internal mutex, or caller locks.
//!
//! A [`SecurityPreset`] fills whichever of sources, hash and mixing the caller
//! left unset and enforces a minimum round count.

pub mod config;
pub mod encoder;
pub mod error;
pub mod expander;
pub mod generator;
pub mod guard;
pub mod hash;
pub mod mixer;
pub mod preset;
pub mod source;
pub mod sources;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Complexity, RngConfig, SourceToggles};
pub use encoder::{OutputEncoder, OutputMode};
pub use error::{Result, RngError};
pub use expander::{CounterExpander, ExpandParams, Expander, ExpansionMode};
pub use generator::{
    Generator, fill_bytes, fill_bytes_threadsafe, fill_bytes_with_complexity, generate,
    generate_to_vec,
};
pub use guard::{LockCallbacks, ThreadGuard, ThreadingMode, init_threading, threading_available};
pub use hash::{EntropyDigest, HashAlgorithm, HashContext, HashProvider, MAX_DIGEST_LEN};
pub use mixer::{Mixer, MixingMode};
pub use preset::{PresetDefaults, ResolvedConfig, SecurityPreset, resolve};
pub use source::{EntropySource, SourceCategory, SourceId, SourceInfo};
pub use sources::hardware::hardware_rng_available;
pub use sources::{SourceRegistry, all_sources};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
