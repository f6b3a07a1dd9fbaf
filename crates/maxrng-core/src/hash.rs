//! Hash and HMAC primitives behind a small object-safe interface.
//!
//! The pipeline only needs init/update/finalize, keyed and unkeyed, with a
//! fixed output length per algorithm. [`HashProvider`] is that seam; the
//! built-in provider wraps RustCrypto `sha2` and `hmac`. Every operation
//! returns a `Result` so providers backed by fallible hardware or OS APIs fit
//! the same interface.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, RngError};

/// Longest digest any built-in algorithm produces.
pub const MAX_DIGEST_LEN: usize = 64;

/// Hash algorithm selector, by digest size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// 32-byte digest. Fastest.
    #[default]
    Sha256,
    /// 48-byte digest.
    Sha384,
    /// 64-byte digest. Strongest.
    Sha512,
}

impl HashAlgorithm {
    /// Output length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// The built-in provider for this algorithm.
    pub fn provider(self) -> &'static dyn HashProvider {
        match self {
            Self::Sha256 => &SHA256_PROVIDER,
            Self::Sha384 => &SHA384_PROVIDER,
            Self::Sha512 => &SHA512_PROVIDER,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha384 => write!(f, "sha384"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

/// An open hash or HMAC computation.
pub trait HashContext: Send {
    /// Absorb more input.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Finish and write exactly the provider's digest length into `out`.
    fn finalize_into(self: Box<Self>, out: &mut [u8]) -> Result<()>;
}

/// Factory for keyed and unkeyed hash contexts with a fixed output length.
pub trait HashProvider: Send + Sync {
    /// Output length of every context this provider opens.
    fn digest_len(&self) -> usize;

    /// Open an unkeyed hash context.
    fn hash(&self) -> Result<Box<dyn HashContext>>;

    /// Open an HMAC context keyed with `key`.
    fn hmac(&self, key: &[u8]) -> Result<Box<dyn HashContext>>;
}

/// Hash the concatenation of `parts` into `out`.
pub fn digest_parts(provider: &dyn HashProvider, parts: &[&[u8]], out: &mut [u8]) -> Result<()> {
    let mut ctx = provider.hash()?;
    for part in parts {
        ctx.update(part)?;
    }
    ctx.finalize_into(out)
}

/// HMAC the concatenation of `parts` under `key` into `out`.
pub fn mac_parts(
    provider: &dyn HashProvider,
    key: &[u8],
    parts: &[&[u8]],
    out: &mut [u8],
) -> Result<()> {
    let mut ctx = provider.hmac(key)?;
    for part in parts {
        ctx.update(part)?;
    }
    ctx.finalize_into(out)
}

// ---------------------------------------------------------------------------
// Digest value
// ---------------------------------------------------------------------------

/// Fixed-length digest produced by the mixer; the IKM fed to expansion.
///
/// Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EntropyDigest {
    bytes: [u8; MAX_DIGEST_LEN],
    len: usize,
}

impl EntropyDigest {
    /// All-zero digest of `len` bytes.
    pub fn zeroed(len: usize) -> Result<Self> {
        if len == 0 || len > MAX_DIGEST_LEN {
            return Err(RngError::InvalidArgument("digest length out of range"));
        }
        Ok(Self {
            bytes: [0u8; MAX_DIGEST_LEN],
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }
}

impl fmt::Debug for EntropyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyDigest")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SHA-2 provider
// ---------------------------------------------------------------------------

/// Built-in provider over RustCrypto SHA-2 and HMAC.
#[derive(Debug, Clone, Copy)]
pub struct Sha2Provider {
    algorithm: HashAlgorithm,
}

static SHA256_PROVIDER: Sha2Provider = Sha2Provider {
    algorithm: HashAlgorithm::Sha256,
};
static SHA384_PROVIDER: Sha2Provider = Sha2Provider {
    algorithm: HashAlgorithm::Sha384,
};
static SHA512_PROVIDER: Sha2Provider = Sha2Provider {
    algorithm: HashAlgorithm::Sha512,
};

impl Sha2Provider {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl HashProvider for Sha2Provider {
    fn digest_len(&self) -> usize {
        self.algorithm.digest_len()
    }

    fn hash(&self) -> Result<Box<dyn HashContext>> {
        let ctx = match self.algorithm {
            HashAlgorithm::Sha256 => Sha2Context::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => Sha2Context::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => Sha2Context::Sha512(Sha512::new()),
        };
        Ok(Box::new(ctx))
    }

    fn hmac(&self, key: &[u8]) -> Result<Box<dyn HashContext>> {
        let init_failed = |_| RngError::PrimitiveFailure("hmac init");
        let ctx = match self.algorithm {
            HashAlgorithm::Sha256 => {
                Sha2Context::HmacSha256(<Hmac<Sha256> as Mac>::new_from_slice(key).map_err(init_failed)?)
            }
            HashAlgorithm::Sha384 => {
                Sha2Context::HmacSha384(<Hmac<Sha384> as Mac>::new_from_slice(key).map_err(init_failed)?)
            }
            HashAlgorithm::Sha512 => {
                Sha2Context::HmacSha512(<Hmac<Sha512> as Mac>::new_from_slice(key).map_err(init_failed)?)
            }
        };
        Ok(Box::new(ctx))
    }
}

enum Sha2Context {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    HmacSha256(Hmac<Sha256>),
    HmacSha384(Hmac<Sha384>),
    HmacSha512(Hmac<Sha512>),
}

impl Sha2Context {
    fn output_len(&self) -> usize {
        match self {
            Self::Sha256(_) | Self::HmacSha256(_) => 32,
            Self::Sha384(_) | Self::HmacSha384(_) => 48,
            Self::Sha512(_) | Self::HmacSha512(_) => 64,
        }
    }
}

impl HashContext for Sha2Context {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Self::Sha256(h) => Digest::update(h, data),
            Self::Sha384(h) => Digest::update(h, data),
            Self::Sha512(h) => Digest::update(h, data),
            Self::HmacSha256(m) => Mac::update(m, data),
            Self::HmacSha384(m) => Mac::update(m, data),
            Self::HmacSha512(m) => Mac::update(m, data),
        }
        Ok(())
    }

    fn finalize_into(self: Box<Self>, out: &mut [u8]) -> Result<()> {
        if out.len() != self.output_len() {
            return Err(RngError::PrimitiveFailure("hash finalize"));
        }
        match *self {
            Sha2Context::Sha256(h) => out.copy_from_slice(&h.finalize()),
            Sha2Context::Sha384(h) => out.copy_from_slice(&h.finalize()),
            Sha2Context::Sha512(h) => out.copy_from_slice(&h.finalize()),
            Sha2Context::HmacSha256(m) => out.copy_from_slice(&m.finalize().into_bytes()),
            Sha2Context::HmacSha384(m) => out.copy_from_slice(&m.finalize().into_bytes()),
            Sha2Context::HmacSha512(m) => out.copy_from_slice(&m.finalize().into_bytes()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_lengths() {
        for alg in [HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512] {
            assert_eq!(alg.provider().digest_len(), alg.digest_len());
        }
        assert_eq!(HashAlgorithm::Sha512.digest_len(), MAX_DIGEST_LEN);
    }

    #[test]
    fn test_sha256_known_answer() {
        let mut out = [0u8; 32];
        digest_parts(HashAlgorithm::Sha256.provider(), &[b"ab", b"c"], &mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hmac_sha256_rfc4231_case2() {
        let mut out = [0u8; 32];
        mac_parts(
            HashAlgorithm::Sha256.provider(),
            b"Jefe",
            &[b"what do ya want ", b"for nothing?"],
            &mut out,
        )
        .unwrap();
        assert_eq!(
            hex::encode(out),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_finalize_rejects_wrong_length() {
        let ctx = HashAlgorithm::Sha384.provider().hash().unwrap();
        let mut out = [0u8; 32];
        assert_eq!(
            ctx.finalize_into(&mut out),
            Err(RngError::PrimitiveFailure("hash finalize"))
        );
    }

    #[test]
    fn test_hmac_accepts_empty_and_long_keys() {
        let provider = HashAlgorithm::Sha512.provider();
        assert!(provider.hmac(&[]).is_ok());
        assert!(provider.hmac(&[0xAB; 300]).is_ok());
    }

    #[test]
    fn test_entropy_digest_bounds() {
        assert!(EntropyDigest::zeroed(0).is_err());
        assert!(EntropyDigest::zeroed(65).is_err());
        let d = EntropyDigest::zeroed(48).unwrap();
        assert_eq!(d.as_bytes().len(), 48);
        assert!(!format!("{d:?}").contains("bytes"));
    }

    #[test]
    fn test_entropy_digest_zeroize() {
        let mut d = EntropyDigest::zeroed(32).unwrap();
        d.as_mut_bytes().fill(0xAA);
        d.zeroize();
        assert_eq!(d.len(), 0);
        assert!(d.as_bytes().is_empty());
    }
}
