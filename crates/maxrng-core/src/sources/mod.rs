//! The eight system entropy sources and the registry that queries them.

pub mod helpers;

pub mod audio;
pub mod battery;
pub mod cpu;
pub mod disk;
pub mod hardware;
pub mod memory;
pub mod network;
pub mod timer;

use std::panic::{AssertUnwindSafe, catch_unwind};

use zeroize::Zeroize;

use crate::config::SourceToggles;
use crate::error::Result;
use crate::hash::HashContext;
use crate::source::EntropySource;

/// All system source constructors, in query order.
pub fn all_sources() -> Vec<Box<dyn EntropySource>> {
    vec![
        Box::new(hardware::HardwareRngSource),
        Box::new(cpu::CpuSource),
        Box::new(memory::ProcessMemorySource),
        Box::new(timer::PerfCounterSource),
        Box::new(disk::DiskSource),
        Box::new(audio::AudioSource::new()),
        Box::new(battery::BatterySource),
        Box::new(network::NetworkSource),
    ]
}

/// Ordered set of entropy sources, filtered per call by [`SourceToggles`].
pub struct SourceRegistry {
    sources: Vec<Box<dyn EntropySource>>,
}

impl SourceRegistry {
    /// Registry over the eight system sources.
    pub fn system() -> Self {
        Self::with_sources(all_sources())
    }

    /// Registry over caller-supplied sources.
    ///
    /// Sources are ordered by [`crate::SourceId`]; several sources may share
    /// an id, in which case one toggle controls all of them and their relative
    /// order is preserved.
    pub fn with_sources(mut sources: Vec<Box<dyn EntropySource>>) -> Self {
        sources.sort_by_key(|s| s.id());
        Self { sources }
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// All registered sources in query order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn EntropySource> {
        self.sources.iter().map(|s| s.as_ref())
    }

    /// Sources switched on by `toggles`, in query order.
    pub fn enabled<'a>(
        &'a self,
        toggles: &'a SourceToggles,
    ) -> impl Iterator<Item = &'a dyn EntropySource> + 'a {
        self.iter().filter(move |s| toggles.is_enabled(s.id()))
    }

    /// Feed one sample from every enabled source into `ctx`.
    ///
    /// A source that returns nothing (or panics) is skipped. Returns the
    /// number of bytes fed. Only a failing hash context aborts the round.
    pub fn sample_into(&self, toggles: &SourceToggles, ctx: &mut dyn HashContext) -> Result<usize> {
        let mut fed = 0usize;
        for source in self.enabled(toggles) {
            match catch_unwind(AssertUnwindSafe(|| source.produce())) {
                Ok(Some(mut bytes)) if !bytes.is_empty() => {
                    let update = ctx.update(&bytes);
                    fed += bytes.len();
                    bytes.zeroize();
                    update?;
                    log::trace!("{} contributed", source.name());
                }
                Ok(_) => log::trace!("{} produced nothing", source.name()),
                Err(_) => log::trace!("{} panicked during produce", source.name()),
            }
        }
        Ok(fed)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;
    use crate::source::{SourceCategory, SourceId, SourceInfo};
    use crate::testing::{FixedSource, PanickingSource, SilentSource};

    #[test]
    fn all_sources_in_query_order() {
        let ids: Vec<SourceId> = all_sources().iter().map(|s| s.id()).collect();
        assert_eq!(ids, SourceId::ALL.to_vec());
    }

    #[test]
    fn with_sources_sorts_by_id() {
        let reg = SourceRegistry::with_sources(vec![
            Box::new(FixedSource::new(SourceId::Network, vec![3])),
            Box::new(FixedSource::new(SourceId::HardwareRng, vec![1])),
            Box::new(FixedSource::new(SourceId::Disk, vec![2])),
        ]);
        let ids: Vec<SourceId> = reg.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![SourceId::HardwareRng, SourceId::Disk, SourceId::Network]);
    }

    #[test]
    fn enabled_respects_toggles() {
        let reg = SourceRegistry::with_sources(vec![
            Box::new(FixedSource::new(SourceId::Cpu, vec![1])),
            Box::new(FixedSource::new(SourceId::Audio, vec![2])),
        ]);
        let mut toggles = SourceToggles::all();
        toggles.set(SourceId::Audio, false);
        let names: Vec<&str> = reg.enabled(&toggles).map(|s| s.name()).collect();
        assert_eq!(names, vec!["cpu"]);
    }

    #[test]
    fn sample_into_skips_silent_and_panicking_sources() {
        let reg = SourceRegistry::with_sources(vec![
            Box::new(SilentSource::new(SourceId::HardwareRng)),
            Box::new(PanickingSource::new(SourceId::Cpu)),
            Box::new(FixedSource::new(SourceId::Disk, vec![7; 10])),
        ]);
        let provider = HashAlgorithm::Sha256.provider();
        let mut ctx = provider.hash().unwrap();
        let fed = reg.sample_into(&SourceToggles::all(), ctx.as_mut()).unwrap();
        assert_eq!(fed, 10);
    }

    #[test]
    fn sample_into_with_nothing_enabled() {
        let reg = SourceRegistry::with_sources(vec![Box::new(FixedSource::new(
            SourceId::Cpu,
            vec![1, 2, 3],
        ))]);
        let provider = HashAlgorithm::Sha256.provider();
        let mut ctx = provider.hash().unwrap();
        let fed = reg.sample_into(&SourceToggles::none(), ctx.as_mut()).unwrap();
        assert_eq!(fed, 0);
    }

    #[test]
    fn system_registry_has_eight_sources() {
        let reg = SourceRegistry::system();
        assert_eq!(reg.len(), 8);
        for source in reg.iter() {
            let info: &SourceInfo = source.info();
            assert!(!info.description.is_empty());
            assert!(!info.physics.is_empty());
        }
        let slow: Vec<SourceCategory> = reg
            .iter()
            .filter(|s| s.info().slow)
            .map(|s| s.info().category)
            .collect();
        assert_eq!(slow, vec![SourceCategory::Sensor]);
    }
}
