//! CpuSource: CPU identification and timestamp counter.
//!
//! On x86 this hashes CPUID leaves 0 and 1 (vendor, family, APIC id of the
//! core the thread happens to be on) and the raw TSC. Elsewhere it falls back
//! to the monotonic and wall clocks plus the current thread id.

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

use super::helpers::{monotonic_ns, wall_clock_ns};

static CPU_INFO: SourceInfo = SourceInfo {
    id: SourceId::Cpu,
    description: "CPUID leaves and timestamp counter",
    physics: "The TSC advances at the core's reference clock; its low bits at the moment \
              of sampling reflect pipeline, cache and interrupt timing. CPUID leaf 1 \
              exposes the initial APIC id, which varies with scheduler placement.",
    category: SourceCategory::Timing,
    slow: false,
};

/// Entropy source reading CPU identification and the cycle counter.
pub struct CpuSource;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[allow(unused_unsafe)] // `__cpuid` is a safe fn on newer toolchains
fn sample() -> Vec<u8> {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::{__cpuid, _rdtsc};
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::{__cpuid, _rdtsc};

    let mut out = Vec::with_capacity(40);
    for leaf in [0u32, 1] {
        // SAFETY: CPUID leaves 0 and 1 exist on every x86 CPU that runs Rust.
        let r = unsafe { __cpuid(leaf) };
        for reg in [r.eax, r.ebx, r.ecx, r.edx] {
            out.extend_from_slice(&reg.to_le_bytes());
        }
    }
    // SAFETY: RDTSC is unprivileged unless the OS sets CR4.TSD, which no
    // supported target does.
    let tsc = unsafe { _rdtsc() };
    out.extend_from_slice(&tsc.to_le_bytes());
    out
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn sample() -> Vec<u8> {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut out = Vec::with_capacity(32);
    out.extend_from_slice(&monotonic_ns().to_le_bytes());
    out.extend_from_slice(&wall_clock_ns().to_le_bytes());
    let mut h = DefaultHasher::new();
    std::thread::current().id().hash(&mut h);
    out.extend_from_slice(&h.finish().to_le_bytes());
    out
}

impl EntropySource for CpuSource {
    fn info(&self) -> &SourceInfo {
        &CPU_INFO
    }

    fn is_available(&self) -> bool {
        true
    }

    fn produce(&self) -> Option<Vec<u8>> {
        let mut out = sample();
        // Wall clock ties the sample to this call even when the TSC is virtualized.
        out.extend_from_slice(&wall_clock_ns().to_le_bytes());
        out.extend_from_slice(&monotonic_ns().to_le_bytes());
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_always_produces() {
        let data = CpuSource.produce().unwrap();
        assert!(data.len() >= 24);
    }

    #[test]
    fn cpu_samples_differ() {
        let a = CpuSource.produce().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let b = CpuSource.produce().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn cpu_info() {
        assert_eq!(CpuSource.name(), "cpu");
        assert_eq!(CpuSource.info().category, SourceCategory::Timing);
    }
}
