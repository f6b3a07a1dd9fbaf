//! HardwareRngSource: the CPU's on-die random number generator (RDRAND).
//!
//! Availability is probed once via CPUID and cached in a process-wide atomic.
//! Concurrent first callers may all probe; the compare-and-swap keeps the
//! first stored answer and every prober computes the same one anyway.
//!
//! Each word is read with up to ten retries; RDRAND may transiently report
//! underflow when its conditioner is drained.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

#[cfg(target_arch = "x86")]
use std::arch::x86::_rdrand32_step;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::_rdrand32_step;

const UNPROBED: u8 = 0;
const ABSENT: u8 = 1;
const PRESENT: u8 = 2;

static PROBE: AtomicU8 = AtomicU8::new(UNPROBED);

/// Attempts per 32-bit word before giving up.
const RETRIES: usize = 10;

/// 32-bit words gathered per sample.
const WORDS_PER_SAMPLE: usize = 4;

/// Whether the RDRAND instruction is usable on this CPU. Cached after the
/// first call.
pub fn hardware_rng_available() -> bool {
    match PROBE.load(Ordering::Acquire) {
        PRESENT => true,
        ABSENT => false,
        _ => {
            let found = if detect() { PRESENT } else { ABSENT };
            match PROBE.compare_exchange(UNPROBED, found, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => found == PRESENT,
                Err(stored) => stored == PRESENT,
            }
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect() -> bool {
    std::arch::is_x86_feature_detected!("rdrand")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn detect() -> bool {
    false
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "rdrand")]
#[allow(unused_unsafe)] // the intrinsic is safe inside `rdrand` code on newer toolchains
unsafe fn rdrand32_step(val: &mut u32) -> bool {
    // SAFETY: the caller guarantees RDRAND support; `val` is a valid &mut.
    unsafe { _rdrand32_step(val) == 1 }
}

/// Read one 32-bit word, retrying on transient underflow.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn rdrand32() -> Option<u32> {
    if !hardware_rng_available() {
        return None;
    }
    for _ in 0..RETRIES {
        let mut val = 0u32;
        // SAFETY: support was confirmed by the CPUID probe above.
        if unsafe { rdrand32_step(&mut val) } {
            return Some(val);
        }
    }
    log::trace!("rdrand exhausted {RETRIES} retries");
    None
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub fn rdrand32() -> Option<u32> {
    None
}

static HARDWARE_RNG_INFO: SourceInfo = SourceInfo {
    id: SourceId::HardwareRng,
    description: "On-die hardware RNG instruction (RDRAND)",
    physics: "Thermal noise in a metastable latch on the CPU die is sampled, health-tested \
              and conditioned in hardware before being exposed through the RDRAND \
              instruction.",
    category: SourceCategory::Hardware,
    slow: false,
};

/// Entropy source backed by the RDRAND instruction.
pub struct HardwareRngSource;

impl EntropySource for HardwareRngSource {
    fn info(&self) -> &SourceInfo {
        &HARDWARE_RNG_INFO
    }

    fn is_available(&self) -> bool {
        hardware_rng_available()
    }

    fn produce(&self) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(WORDS_PER_SAMPLE * 4);
        for _ in 0..WORDS_PER_SAMPLE {
            match rdrand32() {
                Some(word) => out.extend_from_slice(&word.to_le_bytes()),
                None => break,
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}
