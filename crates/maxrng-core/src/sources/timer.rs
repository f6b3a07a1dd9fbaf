//! PerfCounterSource: high-resolution monotonic counter.

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

use super::helpers::monotonic_ns;

static PERF_COUNTER_INFO: SourceInfo = SourceInfo {
    id: SourceId::PerfCounter,
    description: "High-resolution monotonic clock reading",
    physics: "The nanosecond digits of a monotonic clock read at an arbitrary point in \
              the program depend on everything that ran before it: interrupts, cache \
              misses, frequency scaling.",
    category: SourceCategory::Timing,
    slow: false,
};

/// Entropy source reading the monotonic performance counter.
pub struct PerfCounterSource;

#[cfg(unix)]
fn clock_monotonic() -> Option<(i64, i64)> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec.
    if unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) } == 0 {
        Some((ts.tv_sec as i64, ts.tv_nsec as i64))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn clock_monotonic() -> Option<(i64, i64)> {
    None
}

impl EntropySource for PerfCounterSource {
    fn info(&self) -> &SourceInfo {
        &PERF_COUNTER_INFO
    }

    fn is_available(&self) -> bool {
        true
    }

    fn produce(&self) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(24);
        if let Some((sec, nsec)) = clock_monotonic() {
            out.extend_from_slice(&sec.to_le_bytes());
            out.extend_from_slice(&nsec.to_le_bytes());
        }
        out.extend_from_slice(&monotonic_ns().to_le_bytes());
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perf_counter_produces() {
        let data = PerfCounterSource.produce().unwrap();
        assert!(data.len() >= 8);
    }

    #[test]
    #[cfg(unix)]
    fn clock_monotonic_available_on_unix() {
        let (sec, nsec) = clock_monotonic().unwrap();
        assert!(sec >= 0);
        assert!((0..1_000_000_000).contains(&nsec));
    }
}
