//! Security presets and resolution of a caller config into effective settings.
//!
//! A preset supplies defaults for whatever the caller left unset and a
//! complexity floor that is always enforced. Resolution never mutates the
//! caller's [`RngConfig`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Complexity, RngConfig, SourceToggles};
use crate::encoder::OutputMode;
use crate::error::Result;
use crate::expander::ExpansionMode;
use crate::guard::ThreadGuard;
use crate::hash::HashAlgorithm;
use crate::mixer::MixingMode;
use crate::source::SourceId;

/// Named trade-off between speed and mixing strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPreset {
    /// SHA-256, one round minimum, slow sources off.
    Fast,
    /// SHA-384, two rounds minimum, every source.
    #[default]
    Balanced,
    /// SHA-512, three chained rounds minimum, every source.
    Secure,
}

/// What a preset contributes to resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetDefaults {
    pub sources: SourceToggles,
    pub hash: HashAlgorithm,
    pub mixing: MixingMode,
    pub complexity_floor: Complexity,
}

impl SecurityPreset {
    pub const ALL: [SecurityPreset; 3] = [Self::Fast, Self::Balanced, Self::Secure];

    pub fn defaults(self) -> PresetDefaults {
        match self {
            Self::Fast => PresetDefaults {
                sources: SourceToggles::all()
                    .with(SourceId::Audio, false)
                    .with(SourceId::Network, false)
                    .with(SourceId::Disk, false),
                hash: HashAlgorithm::Sha256,
                mixing: MixingMode::Continuous,
                complexity_floor: Complexity::clamped(1),
            },
            Self::Balanced => PresetDefaults {
                sources: SourceToggles::all(),
                hash: HashAlgorithm::Sha384,
                mixing: MixingMode::Continuous,
                complexity_floor: Complexity::clamped(2),
            },
            Self::Secure => PresetDefaults {
                sources: SourceToggles::all(),
                hash: HashAlgorithm::Sha512,
                mixing: MixingMode::RoundBased,
                complexity_floor: Complexity::clamped(3),
            },
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "balanced" => Some(Self::Balanced),
            "secure" => Some(Self::Secure),
            _ => None,
        }
    }
}

impl fmt::Display for SecurityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Balanced => write!(f, "balanced"),
            Self::Secure => write!(f, "secure"),
        }
    }
}

/// Effective settings for one call, borrowing seed and info from the config.
#[derive(Debug, Clone)]
pub struct ResolvedConfig<'a> {
    pub sources: SourceToggles,
    pub hash: HashAlgorithm,
    pub mixing: MixingMode,
    pub expansion: ExpansionMode,
    pub guard: ThreadGuard,
    pub complexity: Complexity,
    pub output: OutputMode,
    pub seed: Option<&'a [u8]>,
    pub info: Option<&'a [u8]>,
}

/// Fill unset fields from the preset and apply the complexity floor.
///
/// Empty seed or info byte strings count as absent. External threading
/// without callbacks is rejected here, before any work.
pub fn resolve(config: &RngConfig) -> Result<ResolvedConfig<'_>> {
    let defaults = config.preset.defaults();
    let guard = ThreadGuard::from_mode(config.threading, config.lock_callbacks.as_ref())?;

    Ok(ResolvedConfig {
        sources: config.sources.unwrap_or(defaults.sources),
        hash: config.hash.unwrap_or(defaults.hash),
        mixing: config.mixing.unwrap_or(defaults.mixing),
        expansion: config.expansion,
        guard,
        complexity: Complexity::clamped(config.complexity).at_least(defaults.complexity_floor),
        output: config.output,
        seed: non_empty(config.seed.as_deref()),
        info: non_empty(config.info.as_deref()),
    })
}

fn non_empty(bytes: Option<&[u8]>) -> Option<&[u8]> {
    bytes.filter(|b| !b.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{LockCallbacks, ThreadingMode};

    #[test]
    fn test_secure_raises_complexity() {
        let config = RngConfig::secure().with_complexity(1);
        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.complexity.get(), 3);
        assert_eq!(resolved.hash, HashAlgorithm::Sha512);
        assert_eq!(resolved.mixing, MixingMode::RoundBased);
    }

    #[test]
    fn test_standard_resolves_to_one_round() {
        let config = RngConfig::standard();
        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.complexity.get(), 1);
        assert_eq!(resolved.hash, HashAlgorithm::Sha256);
        assert_eq!(resolved.mixing, MixingMode::RoundBased);
        assert_eq!(resolved.sources, SourceToggles::all());
    }

    #[test]
    fn test_fast_keeps_higher_complexity() {
        let config = RngConfig::fast().with_complexity(9);
        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.complexity.get(), 9);
    }

    #[test]
    fn test_complexity_clamped_before_floor() {
        let low = RngConfig::balanced().with_complexity(-40);
        assert_eq!(resolve(&low).unwrap().complexity.get(), 2);
        let high = RngConfig::balanced().with_complexity(400);
        assert_eq!(resolve(&high).unwrap().complexity.get(), 10);
    }

    #[test]
    fn test_preset_fills_only_unset_fields() {
        let config = RngConfig::fast()
            .with_hash(HashAlgorithm::Sha512)
            .with_sources(SourceToggles::none().with(SourceId::Cpu, true));
        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.hash, HashAlgorithm::Sha512);
        assert_eq!(resolved.sources.enabled_ids(), vec![SourceId::Cpu]);
        // mixing was unset
        assert_eq!(resolved.mixing, MixingMode::Continuous);
    }

    #[test]
    fn test_fast_disables_slow_sources() {
        let sources = SecurityPreset::Fast.defaults().sources;
        assert!(!sources.audio && !sources.network && !sources.disk);
        assert!(sources.hardware_rng && sources.cpu);
    }

    #[test]
    fn test_resolve_does_not_mutate_config() {
        let config = RngConfig::secure().with_complexity(0);
        let before = config.clone();
        let _ = resolve(&config).unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_empty_seed_is_absent() {
        let config = RngConfig::default().with_seed(Vec::new()).with_info(b"x".to_vec());
        let resolved = resolve(&config).unwrap();
        assert!(resolved.seed.is_none());
        assert_eq!(resolved.info, Some(&b"x"[..]));
    }

    #[test]
    fn test_external_without_callbacks_rejected() {
        let config = RngConfig::default().with_threading(ThreadingMode::External);
        assert!(resolve(&config).is_err());

        let config = RngConfig::default().with_external_lock(LockCallbacks::new(|| {}, || {}));
        assert!(resolve(&config).is_ok());
    }

    #[test]
    fn test_preset_names() {
        for preset in SecurityPreset::ALL {
            assert_eq!(SecurityPreset::from_name(&preset.to_string()), Some(preset));
        }
        assert_eq!(SecurityPreset::from_name("SECURE"), Some(SecurityPreset::Secure));
        assert_eq!(SecurityPreset::from_name("paranoid"), None);
    }
}
