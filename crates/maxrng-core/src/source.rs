//! Abstract entropy source trait and source identities.
//!
//! Every entropy source implements the [`EntropySource`] trait, which provides
//! metadata via [`SourceInfo`], availability checking, and best-effort sample
//! production. The eight sources the engine knows about are named by
//! [`SourceId`]; its declaration order is the fixed query order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one of the eight toggleable sources.
///
/// Declaration order is the order sources are queried every round. The order
/// only matters for reproducible testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// On-die hardware RNG instruction (RDRAND).
    HardwareRng,
    /// CPU identification leaves and the timestamp counter.
    Cpu,
    /// Resource usage and memory counters of this process.
    ProcessMemory,
    /// High-resolution monotonic counter.
    PerfCounter,
    /// Filesystem free/total block and inode counts.
    Disk,
    /// Microphone ADC noise, with a timing fallback.
    Audio,
    /// Power-supply gauges.
    Battery,
    /// TCP statistics and adapter counters.
    Network,
}

impl SourceId {
    /// All ids in query order.
    pub const ALL: [SourceId; 8] = [
        Self::HardwareRng,
        Self::Cpu,
        Self::ProcessMemory,
        Self::PerfCounter,
        Self::Disk,
        Self::Audio,
        Self::Battery,
        Self::Network,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::HardwareRng => "hardware_rng",
            Self::Cpu => "cpu",
            Self::ProcessMemory => "process_memory",
            Self::PerfCounter => "perf_counter",
            Self::Disk => "disk",
            Self::Audio => "audio",
            Self::Battery => "battery",
            Self::Network => "network",
        }
    }

    /// Look up an id by its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Position in the fixed query order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of entropy source based on physical mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    /// Dedicated hardware noise circuit.
    Hardware,
    /// CPU/clock timing.
    Timing,
    /// OS counters and state.
    System,
    /// Storage statistics.
    IO,
    /// Network counters.
    Network,
    /// Analog sensor readings.
    Sensor,
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware => write!(f, "hardware"),
            Self::Timing => write!(f, "timing"),
            Self::System => write!(f, "system"),
            Self::IO => write!(f, "io"),
            Self::Network => write!(f, "network"),
            Self::Sensor => write!(f, "sensor"),
        }
    }
}

/// Metadata about an entropy source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Which of the eight slots this source fills.
    pub id: SourceId,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Where the unpredictability comes from.
    pub physics: &'static str,
    /// Source category for classification.
    pub category: SourceCategory,
    /// Whether collection may block for a noticeable, bounded time.
    pub slow: bool,
}

/// Trait that every entropy source must implement.
///
/// `produce` is best-effort: it either contributes bytes or returns `None`.
/// It must not block without bound. Panics are caught by the registry, but
/// implementations should not rely on that.
pub trait EntropySource: Send + Sync {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Check if this source can plausibly produce data on this machine.
    fn is_available(&self) -> bool;

    /// Produce one sample, or `None` if nothing could be gathered.
    fn produce(&self) -> Option<Vec<u8>>;

    /// Convenience: id from info.
    fn id(&self) -> SourceId {
        self.info().id
    }

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().id.name()
    }
}
