//! Stretching the mixed digest into an output stream of any length.
//!
//! All strategies emit `hash_len`-byte blocks indexed by a 32-bit big-endian
//! counter starting at 1 and truncate the last block. Per-call state (the
//! counter and the previous block) lives in [`ExpansionState`], which is wiped
//! on drop together with every intermediate key.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, RngError};
use crate::hash::{HashProvider, MAX_DIGEST_LEN, mac_parts};

/// Key-stretching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMode {
    /// `H(IKM ‖ seed ‖ ctr)`.
    #[default]
    Counter,
    /// RFC 5869 extract-then-expand.
    Hkdf,
    /// Chained HMAC keyed by the seed or the IKM.
    HmacStream,
    /// Extendable-output style; same construction as HKDF.
    Xof,
}

impl ExpansionMode {
    pub const ALL: [ExpansionMode; 4] = [Self::Counter, Self::Hkdf, Self::HmacStream, Self::Xof];

    pub fn expander(self) -> &'static dyn Expander {
        match self {
            Self::Counter => &CounterExpander,
            Self::Hkdf => &HkdfExpander,
            Self::HmacStream => &HmacStreamExpander,
            Self::Xof => &XofExpander,
        }
    }
}

impl fmt::Display for ExpansionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counter => write!(f, "counter"),
            Self::Hkdf => write!(f, "hkdf"),
            Self::HmacStream => write!(f, "hmac_stream"),
            Self::Xof => write!(f, "xof"),
        }
    }
}

/// Optional caller inputs to expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandParams<'a> {
    pub seed: Option<&'a [u8]>,
    pub info: Option<&'a [u8]>,
}

/// Strategy producing exactly `out.len()` bytes from an IKM.
pub trait Expander: Send + Sync {
    fn expand(
        &self,
        provider: &dyn HashProvider,
        ikm: &[u8],
        params: &ExpandParams<'_>,
        out: &mut [u8],
    ) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Counter and previous block for one expansion call.
#[derive(Zeroize, ZeroizeOnDrop)]
struct ExpansionState {
    counter: u64,
    block: [u8; MAX_DIGEST_LEN],
    block_len: usize,
}

impl ExpansionState {
    fn starting_at(counter: u32) -> Self {
        Self {
            counter: u64::from(counter),
            block: [0u8; MAX_DIGEST_LEN],
            block_len: 0,
        }
    }

    /// Current counter as big-endian bytes, then advance.
    fn take_counter(&mut self) -> Result<[u8; 4]> {
        let current = u32::try_from(self.counter)
            .map_err(|_| RngError::InvalidArgument("expansion counter overflow"))?;
        self.counter += 1;
        Ok(current.to_be_bytes())
    }

    fn previous(&self) -> &[u8] {
        &self.block[..self.block_len]
    }

    fn store(&mut self, block: &[u8]) {
        self.block[..block.len()].copy_from_slice(block);
        self.block_len = block.len();
    }
}

/// Reject requests whose block indices would not fit the 32-bit counter.
pub(crate) fn check_block_budget(out_len: usize, hash_len: usize, first_counter: u32) -> Result<()> {
    if hash_len == 0 || hash_len > MAX_DIGEST_LEN {
        return Err(RngError::InvalidArgument("digest length out of range"));
    }
    if first_counter == 0 {
        return Err(RngError::InvalidArgument("counters start at 1"));
    }
    let blocks = out_len.div_ceil(hash_len) as u64;
    if blocks > 0 && u64::from(first_counter) + blocks - 1 > u64::from(u32::MAX) {
        return Err(RngError::InvalidArgument("expansion counter overflow"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Counter
// ---------------------------------------------------------------------------

/// `block_i = H(IKM ‖ seed? ‖ ctr_i)`.
pub struct CounterExpander;

impl CounterExpander {
    /// Produce the blocks numbered from `first_counter` onward.
    ///
    /// Calling this for consecutive block ranges yields the same bytes as one
    /// call over the whole range.
    pub fn expand_from(
        &self,
        provider: &dyn HashProvider,
        ikm: &[u8],
        seed: Option<&[u8]>,
        first_counter: u32,
        out: &mut [u8],
    ) -> Result<()> {
        let hash_len = provider.digest_len();
        check_block_budget(out.len(), hash_len, first_counter)?;

        let mut state = ExpansionState::starting_at(first_counter);
        let mut block = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
        for chunk in out.chunks_mut(hash_len) {
            let ctr = state.take_counter()?;
            let mut ctx = provider.hash()?;
            ctx.update(ikm)?;
            if let Some(seed) = seed {
                ctx.update(seed)?;
            }
            ctx.update(&ctr)?;
            ctx.finalize_into(&mut block[..hash_len])?;
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        Ok(())
    }
}

impl Expander for CounterExpander {
    fn expand(
        &self,
        provider: &dyn HashProvider,
        ikm: &[u8],
        params: &ExpandParams<'_>,
        out: &mut [u8],
    ) -> Result<()> {
        self.expand_from(provider, ikm, params.seed, 1, out)
    }
}

// ---------------------------------------------------------------------------
// HKDF
// ---------------------------------------------------------------------------

/// Extract `PRK = HMAC(salt, IKM)`, then
/// `block_i = HMAC(PRK, block_{i-1} ‖ info ‖ ctr_i)`.
///
/// The salt is the seed, or `hash_len` zero bytes without one. With a one-byte
/// counter this is exactly RFC 5869; the counter here is four bytes wide.
pub struct HkdfExpander;

impl Expander for HkdfExpander {
    fn expand(
        &self,
        provider: &dyn HashProvider,
        ikm: &[u8],
        params: &ExpandParams<'_>,
        out: &mut [u8],
    ) -> Result<()> {
        let hash_len = provider.digest_len();
        check_block_budget(out.len(), hash_len, 1)?;

        let zero_salt = [0u8; MAX_DIGEST_LEN];
        let salt = params.seed.unwrap_or(&zero_salt[..hash_len]);
        let info = params.info.unwrap_or(&[]);

        let mut prk = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
        mac_parts(provider, salt, &[ikm], &mut prk[..hash_len])?;

        let mut state = ExpansionState::starting_at(1);
        let mut next = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
        for chunk in out.chunks_mut(hash_len) {
            let ctr = state.take_counter()?;
            mac_parts(
                provider,
                &prk[..hash_len],
                &[state.previous(), info, &ctr],
                &mut next[..hash_len],
            )?;
            state.store(&next[..hash_len]);
            chunk.copy_from_slice(&next[..chunk.len()]);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HMAC stream
// ---------------------------------------------------------------------------

/// `block_i = HMAC(key, block_{i-1} ‖ ctr_i)`.
///
/// With a seed, the seed is the key and `block_0` is the IKM. Without one, the
/// IKM is the key and `block_0` is empty.
pub struct HmacStreamExpander;

impl Expander for HmacStreamExpander {
    fn expand(
        &self,
        provider: &dyn HashProvider,
        ikm: &[u8],
        params: &ExpandParams<'_>,
        out: &mut [u8],
    ) -> Result<()> {
        let hash_len = provider.digest_len();
        check_block_budget(out.len(), hash_len, 1)?;

        let (key, initial): (&[u8], &[u8]) = match params.seed {
            Some(seed) => (seed, ikm),
            None => (ikm, &[][..]),
        };

        let mut state = ExpansionState::starting_at(1);
        let mut next = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
        for (i, chunk) in out.chunks_mut(hash_len).enumerate() {
            let ctr = state.take_counter()?;
            let previous = if i == 0 { initial } else { state.previous() };
            mac_parts(provider, key, &[previous, &ctr], &mut next[..hash_len])?;
            state.store(&next[..hash_len]);
            chunk.copy_from_slice(&next[..chunk.len()]);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// XOF
// ---------------------------------------------------------------------------

/// Extendable-output mode. Shares the HKDF construction, so identical inputs
/// give identical output under both modes.
pub struct XofExpander;

impl Expander for XofExpander {
    fn expand(
        &self,
        provider: &dyn HashProvider,
        ikm: &[u8],
        params: &ExpandParams<'_>,
        out: &mut [u8],
    ) -> Result<()> {
        HkdfExpander.expand(provider, ikm, params, out)
    }
}
