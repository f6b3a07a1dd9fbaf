//! Shared helpers used by multiple entropy source implementations.
//!
//! High-resolution timestamps, bounded subprocess capture, best-effort file
//! reads and nibble packing.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Nanoseconds since a process-local epoch.
pub fn monotonic_ns() -> u64 {
    use std::sync::OnceLock;
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_nanos() as u64
}

/// Wall-clock nanoseconds since the Unix epoch (0 if the clock is before it).
pub fn wall_clock_ns() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

// ---------------------------------------------------------------------------
// Subprocess utilities
// ---------------------------------------------------------------------------

/// Check if a command exists by running `which`.
pub fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Poll interval while waiting on a bounded child process.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run a command and return its stdout, killing it if it outlives `limit`.
///
/// Returns `None` on spawn failure, non-zero exit, or timeout. The child's
/// output must fit in the pipe buffer (64 KiB on Linux), which holds for
/// every caller in this crate.
pub fn run_command_bounded(program: &str, args: &[&str], limit: Duration) -> Option<Vec<u8>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + limit;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                log::trace!("{program} exceeded {limit:?}, killed");
                return None;
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    };

    if !status.success() {
        return None;
    }

    let mut stdout = Vec::new();
    child.stdout.take()?.read_to_end(&mut stdout).ok()?;
    Some(stdout)
}

// ---------------------------------------------------------------------------
// Filesystem probes
// ---------------------------------------------------------------------------

/// Read a whole file, `None` if it is missing, unreadable or empty.
pub fn read_nonempty(path: impl AsRef<std::path::Path>) -> Option<Vec<u8>> {
    std::fs::read(path).ok().filter(|b| !b.is_empty())
}

// ---------------------------------------------------------------------------
// Nibble packing
// ---------------------------------------------------------------------------

/// Pack pairs of 4-bit nibbles into bytes, high nibble first.
///
/// Returns at most `max_bytes` output bytes. A trailing odd nibble is kept in
/// the high half of a final byte.
pub fn pack_nibbles(nibbles: impl Iterator<Item = u8>, max_bytes: usize) -> Vec<u8> {
    let mut output = Vec::with_capacity(max_bytes);
    let mut pending: Option<u8> = None;

    for nibble in nibbles {
        if output.len() >= max_bytes {
            break;
        }
        match pending.take() {
            None => pending = Some((nibble & 0x0F) << 4),
            Some(high) => output.push(high | (nibble & 0x0F)),
        }
    }

    match pending {
        Some(high) if output.len() < max_bytes => output.push(high),
        _ => {}
    }
    output
}
