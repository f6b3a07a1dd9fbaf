//! The generation pipeline and its public entry points.
//!
//! resolve → validate → guard → mix → expand → encode.
//!
//! Every check that depends only on the arguments happens before the guard is
//! entered, so a bad request never blocks on a lock or touches a source. The
//! caller's buffer is written only by the final encode step.

use std::sync::OnceLock;

use zeroize::Zeroizing;

use crate::config::RngConfig;
use crate::encoder::OutputEncoder;
use crate::error::{Result, RngError};
use crate::expander::{ExpandParams, check_block_budget};
use crate::preset::{ResolvedConfig, resolve};
use crate::sources::SourceRegistry;

/// Owns a source registry and runs generation requests against it.
///
/// The registry is immutable after construction, so a `Generator` can be
/// shared freely between threads; serialization is the config's business.
pub struct Generator {
    registry: SourceRegistry,
}

impl Generator {
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    /// Generator over the eight system sources.
    pub fn system() -> Self {
        Self::new(SourceRegistry::system())
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Produce `raw_len` random bytes, encode them per `config` into `out`,
    /// and return the number of bytes written.
    ///
    /// `out` must hold at least the encoded length. On error nothing has been
    /// written to `out`.
    pub fn try_generate(&self, raw_len: usize, config: &RngConfig, out: &mut [u8]) -> Result<usize> {
        if raw_len == 0 {
            return Err(RngError::InvalidArgument("zero-length request"));
        }
        let resolved = resolve(config)?;
        let encoder = resolved.output.encoder();
        let needed = encoder
            .encoded_len(raw_len)
            .ok_or(RngError::InvalidArgument("encoded length overflows"))?;
        check_block_budget(raw_len, resolved.hash.digest_len(), 1)?;
        if out.len() < needed {
            return Err(RngError::InvalidArgument("output buffer too small"));
        }
        if resolved.sources.enabled_count() == 0 {
            return Err(RngError::InvalidArgument("no entropy source enabled"));
        }

        log::debug!(
            "generate: {} bytes, preset={}, hash={}, mixing={}, expansion={}, rounds={}, output={}, threading={}",
            raw_len,
            config.preset,
            resolved.hash,
            resolved.mixing,
            resolved.expansion,
            resolved.complexity.get(),
            resolved.output,
            resolved.guard.mode()
        );

        resolved
            .guard
            .run(|| self.run_pipeline(raw_len, &resolved, encoder, &mut out[..needed]))
    }

    fn run_pipeline(
        &self,
        raw_len: usize,
        resolved: &ResolvedConfig<'_>,
        encoder: &dyn OutputEncoder,
        out: &mut [u8],
    ) -> Result<usize> {
        let provider = resolved.hash.provider();
        let digest = resolved.mixing.mixer().mix(
            &self.registry,
            &resolved.sources,
            provider,
            resolved.complexity,
        )?;

        let mut raw = Zeroizing::new(vec![0u8; raw_len]);
        let params = ExpandParams {
            seed: resolved.seed,
            info: resolved.info,
        };
        resolved
            .expansion
            .expander()
            .expand(provider, digest.as_bytes(), &params, &mut raw)?;

        encoder.encode(&raw, out)
    }

    /// Opaque form of [`Generator::try_generate`]: `None` on any failure.
    pub fn generate(&self, raw_len: usize, config: &RngConfig, out: &mut [u8]) -> Option<usize> {
        match self.try_generate(raw_len, config, out) {
            Ok(written) => Some(written),
            Err(err) => {
                log::debug!("generate failed: {}", err.kind());
                None
            }
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::system()
    }
}

fn system_generator() -> &'static Generator {
    static SYSTEM: OnceLock<Generator> = OnceLock::new();
    SYSTEM.get_or_init(Generator::system)
}

/// Generate with the system sources into `out`.
///
/// Returns the number of bytes written (`raw_len` for raw output, the encoded
/// length for hex and base64) or `None`. No failure detail is exposed.
pub fn generate(raw_len: usize, config: &RngConfig, out: &mut [u8]) -> Option<usize> {
    system_generator().generate(raw_len, config, out)
}

/// Like [`generate`], allocating a buffer of exactly the encoded length.
pub fn generate_to_vec(raw_len: usize, config: &RngConfig) -> Option<Vec<u8>> {
    let needed = config.output.encoder().encoded_len(raw_len)?;
    let mut out = vec![0u8; needed];
    let written = generate(raw_len, config, &mut out)?;
    out.truncate(written);
    Some(out)
}

// ---------------------------------------------------------------------------
// Classic fill-buffer API
// ---------------------------------------------------------------------------

/// Fill `buf` using every source, SHA-256 and a single round.
pub fn fill_bytes(buf: &mut [u8]) -> bool {
    generate(buf.len(), &RngConfig::standard(), buf).is_some()
}

/// Fill `buf` with `complexity` chained rounds, clamped to 1..=10.
pub fn fill_bytes_with_complexity(buf: &mut [u8], complexity: i32) -> bool {
    let config = RngConfig::standard().with_complexity(i64::from(complexity));
    generate(buf.len(), &config, buf).is_some()
}

/// [`fill_bytes`] under the process-wide internal lock.
pub fn fill_bytes_threadsafe(buf: &mut [u8]) -> bool {
    let config = RngConfig::standard().with_threading(crate::guard::ThreadingMode::Internal);
    generate(buf.len(), &config, buf).is_some()
}
