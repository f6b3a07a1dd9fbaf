//! Mutual exclusion around the generation pipeline.
//!
//! Three modes: no locking, a process-wide internal lock, or caller-supplied
//! enter/leave callbacks. The internal lock is a static `Mutex` that is ready
//! before any caller can observe it; [`init_threading`] only records that
//! threaded use was requested.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RngError};

/// How concurrent callers are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadingMode {
    /// Caller guarantees exclusive use.
    #[default]
    None,
    /// Process-wide lock owned by this crate.
    Internal,
    /// Caller's own enter/leave callbacks.
    External,
}

impl fmt::Display for ThreadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
        }
    }
}

type LockFn = dyn Fn() + Send + Sync;

/// Caller-supplied critical-section hooks for [`ThreadingMode::External`].
#[derive(Clone)]
pub struct LockCallbacks {
    enter: Arc<LockFn>,
    leave: Arc<LockFn>,
}

impl LockCallbacks {
    pub fn new(
        enter: impl Fn() + Send + Sync + 'static,
        leave: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            enter: Arc::new(enter),
            leave: Arc::new(leave),
        }
    }
}

impl fmt::Debug for LockCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockCallbacks").finish_non_exhaustive()
    }
}

impl PartialEq for LockCallbacks {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.enter, &other.enter) && Arc::ptr_eq(&self.leave, &other.leave)
    }
}

// ---------------------------------------------------------------------------
// Process-wide state
// ---------------------------------------------------------------------------

static INTERNAL_LOCK: Mutex<()> = Mutex::new(());
static THREADING_READY: AtomicBool = AtomicBool::new(false);

/// Mark internal threading as initialized.
///
/// Idempotent and safe to race: exactly one caller observes `true`.
pub fn init_threading() -> bool {
    THREADING_READY
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

/// Whether [`init_threading`] has run, directly or through an internal-mode
/// call.
pub fn threading_available() -> bool {
    THREADING_READY.load(Ordering::Acquire)
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// A resolved locking strategy, ready to wrap one pipeline run.
#[derive(Debug, Clone)]
pub enum ThreadGuard {
    None,
    Internal,
    External(LockCallbacks),
}

struct LeaveOnDrop<'a>(&'a LockCallbacks);

impl Drop for LeaveOnDrop<'_> {
    fn drop(&mut self) {
        (self.0.leave)();
    }
}

impl ThreadGuard {
    pub fn from_mode(mode: ThreadingMode, callbacks: Option<&LockCallbacks>) -> Result<Self> {
        match (mode, callbacks) {
            (ThreadingMode::None, _) => Ok(Self::None),
            (ThreadingMode::Internal, _) => Ok(Self::Internal),
            (ThreadingMode::External, Some(cb)) => Ok(Self::External(cb.clone())),
            (ThreadingMode::External, None) => Err(RngError::InvalidArgument(
                "external threading requires lock callbacks",
            )),
        }
    }

    pub fn mode(&self) -> ThreadingMode {
        match self {
            Self::None => ThreadingMode::None,
            Self::Internal => ThreadingMode::Internal,
            Self::External(_) => ThreadingMode::External,
        }
    }

    /// Run `f` inside the critical section. The section is left on every
    /// exit path, unwinding included.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        match self {
            Self::None => f(),
            Self::Internal => {
                init_threading();
                let _held = INTERNAL_LOCK.lock().unwrap_or_else(|poisoned| {
                    log::warn!("internal generator lock poisoned; recovering");
                    INTERNAL_LOCK.clear_poison();
                    poisoned.into_inner()
                });
                f()
            }
            Self::External(callbacks) => {
                (callbacks.enter)();
                let _leave = LeaveOnDrop(callbacks);
                f()
            }
        }
    }
}
