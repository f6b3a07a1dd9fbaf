//! Aggregation of source samples into one fixed-length digest.
//!
//! Both strategies query the enabled sources `rounds` times in registry
//! order. They differ only in where hash contexts begin and end:
//!
//! - [`RoundMixer`] opens a fresh context per round and chains the previous
//!   round's digest in front of the new samples.
//! - [`ContinuousMixer`] keeps a single context open across all rounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Complexity, SourceToggles};
use crate::error::{Result, RngError};
use crate::hash::{EntropyDigest, HashProvider};
use crate::sources::SourceRegistry;

/// How rounds of source samples are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixingMode {
    /// One finalized digest per round, chained into the next.
    #[default]
    RoundBased,
    /// One digest over every round.
    Continuous,
}

impl MixingMode {
    pub fn mixer(self) -> &'static dyn Mixer {
        match self {
            Self::RoundBased => &RoundMixer,
            Self::Continuous => &ContinuousMixer,
        }
    }
}

impl fmt::Display for MixingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundBased => write!(f, "round_based"),
            Self::Continuous => write!(f, "continuous"),
        }
    }
}

/// Strategy turning repeated source samples into an IKM digest.
pub trait Mixer: Send + Sync {
    fn mix(
        &self,
        registry: &SourceRegistry,
        toggles: &SourceToggles,
        provider: &dyn HashProvider,
        rounds: Complexity,
    ) -> Result<EntropyDigest>;
}

fn ensure_gathered(total: usize) -> Result<()> {
    if total == 0 {
        return Err(RngError::SourceUnavailable("no enabled source produced data"));
    }
    Ok(())
}

/// Fresh context per round, seeded with the prior digest.
pub struct RoundMixer;

impl Mixer for RoundMixer {
    fn mix(
        &self,
        registry: &SourceRegistry,
        toggles: &SourceToggles,
        provider: &dyn HashProvider,
        rounds: Complexity,
    ) -> Result<EntropyDigest> {
        let mut digest = EntropyDigest::zeroed(provider.digest_len())?;
        let mut gathered = 0usize;
        for round in 0..rounds.get() {
            let mut ctx = provider.hash()?;
            if round > 0 {
                ctx.update(digest.as_bytes())?;
            }
            gathered += registry.sample_into(toggles, ctx.as_mut())?;
            ctx.finalize_into(digest.as_mut_bytes())?;
        }
        ensure_gathered(gathered)?;
        Ok(digest)
    }
}

/// Single context across all rounds.
pub struct ContinuousMixer;

impl Mixer for ContinuousMixer {
    fn mix(
        &self,
        registry: &SourceRegistry,
        toggles: &SourceToggles,
        provider: &dyn HashProvider,
        rounds: Complexity,
    ) -> Result<EntropyDigest> {
        let mut digest = EntropyDigest::zeroed(provider.digest_len())?;
        let mut ctx = provider.hash()?;
        let mut gathered = 0usize;
        for _ in 0..rounds.get() {
            gathered += registry.sample_into(toggles, ctx.as_mut())?;
        }
        ensure_gathered(gathered)?;
        ctx.finalize_into(digest.as_mut_bytes())?;
        Ok(digest)
    }
}
