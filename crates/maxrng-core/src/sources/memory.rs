//! ProcessMemorySource: resource-usage counters of the current process.
//!
//! `getrusage(RUSAGE_SELF)` supplies CPU time, fault and context-switch
//! counters; on Linux `/proc/self/statm` adds resident/shared page counts.

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

#[cfg(target_os = "linux")]
use super::helpers::read_nonempty;

static PROCESS_MEMORY_INFO: SourceInfo = SourceInfo {
    id: SourceId::ProcessMemory,
    description: "Process resource usage and memory page counters",
    physics: "User/system CPU time at microsecond resolution, minor fault counts and \
              involuntary context switches all depend on allocator state, page cache \
              contention and scheduler decisions made outside this process.",
    category: SourceCategory::System,
    slow: false,
};

/// Entropy source sampling this process's resource usage.
pub struct ProcessMemorySource;

#[cfg(unix)]
fn rusage_bytes(out: &mut Vec<u8>) -> bool {
    // SAFETY: rusage is plain old data; all-zero is a valid bit pattern.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: `usage` is a valid, writable rusage struct.
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } != 0 {
        return false;
    }
    let fields = [
        usage.ru_utime.tv_sec as i64,
        usage.ru_utime.tv_usec as i64,
        usage.ru_stime.tv_sec as i64,
        usage.ru_stime.tv_usec as i64,
        usage.ru_maxrss as i64,
        usage.ru_minflt as i64,
        usage.ru_majflt as i64,
        usage.ru_nvcsw as i64,
        usage.ru_nivcsw as i64,
    ];
    for f in fields {
        out.extend_from_slice(&f.to_le_bytes());
    }
    true
}

#[cfg(not(unix))]
fn rusage_bytes(_out: &mut Vec<u8>) -> bool {
    false
}

#[cfg(target_os = "linux")]
fn statm_bytes(out: &mut Vec<u8>) -> bool {
    match read_nonempty("/proc/self/statm") {
        Some(statm) => {
            out.extend_from_slice(&statm);
            true
        }
        None => false,
    }
}

#[cfg(not(target_os = "linux"))]
fn statm_bytes(_out: &mut Vec<u8>) -> bool {
    false
}

impl EntropySource for ProcessMemorySource {
    fn info(&self) -> &SourceInfo {
        &PROCESS_MEMORY_INFO
    }

    fn is_available(&self) -> bool {
        cfg!(unix)
    }

    fn produce(&self) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(128);
        let rusage_ok = rusage_bytes(&mut out);
        let statm_ok = statm_bytes(&mut out);
        if rusage_ok || statm_ok { Some(out) } else { None }
    }
}
