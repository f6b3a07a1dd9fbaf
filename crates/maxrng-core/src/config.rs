//! Caller-facing generation settings.
//!
//! An [`RngConfig`] is built per call, either field by field or from a preset
//! factory, and only ever borrowed by the pipeline. Source toggles, hash and
//! mixing are optional: whatever the caller leaves unset is filled from the
//! [`SecurityPreset`] at resolution time.

use serde::{Deserialize, Serialize};

use crate::encoder::OutputMode;
use crate::expander::ExpansionMode;
use crate::guard::{LockCallbacks, ThreadingMode};
use crate::hash::HashAlgorithm;
use crate::mixer::MixingMode;
use crate::preset::SecurityPreset;
use crate::source::SourceId;

// ---------------------------------------------------------------------------
// Source toggles
// ---------------------------------------------------------------------------

/// One switch per system source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceToggles {
    pub hardware_rng: bool,
    pub cpu: bool,
    pub process_memory: bool,
    pub perf_counter: bool,
    pub disk: bool,
    pub audio: bool,
    pub battery: bool,
    pub network: bool,
}

impl SourceToggles {
    /// Every source on.
    pub const fn all() -> Self {
        Self {
            hardware_rng: true,
            cpu: true,
            process_memory: true,
            perf_counter: true,
            disk: true,
            audio: true,
            battery: true,
            network: true,
        }
    }

    /// Every source off.
    pub const fn none() -> Self {
        Self {
            hardware_rng: false,
            cpu: false,
            process_memory: false,
            perf_counter: false,
            disk: false,
            audio: false,
            battery: false,
            network: false,
        }
    }

    pub fn is_enabled(&self, id: SourceId) -> bool {
        match id {
            SourceId::HardwareRng => self.hardware_rng,
            SourceId::Cpu => self.cpu,
            SourceId::ProcessMemory => self.process_memory,
            SourceId::PerfCounter => self.perf_counter,
            SourceId::Disk => self.disk,
            SourceId::Audio => self.audio,
            SourceId::Battery => self.battery,
            SourceId::Network => self.network,
        }
    }

    fn slot(&mut self, id: SourceId) -> &mut bool {
        match id {
            SourceId::HardwareRng => &mut self.hardware_rng,
            SourceId::Cpu => &mut self.cpu,
            SourceId::ProcessMemory => &mut self.process_memory,
            SourceId::PerfCounter => &mut self.perf_counter,
            SourceId::Disk => &mut self.disk,
            SourceId::Audio => &mut self.audio,
            SourceId::Battery => &mut self.battery,
            SourceId::Network => &mut self.network,
        }
    }

    pub fn set(&mut self, id: SourceId, enabled: bool) {
        *self.slot(id) = enabled;
    }

    /// Builder form of [`SourceToggles::set`].
    pub fn with(mut self, id: SourceId, enabled: bool) -> Self {
        self.set(id, enabled);
        self
    }

    /// Enabled ids in query order.
    pub fn enabled_ids(&self) -> Vec<SourceId> {
        SourceId::ALL
            .into_iter()
            .filter(|&id| self.is_enabled(id))
            .collect()
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_ids().len()
    }
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self::all()
    }
}

// ---------------------------------------------------------------------------
// Complexity
// ---------------------------------------------------------------------------

/// Round count for the mixer, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Complexity(u8);

impl Complexity {
    pub const MIN: Complexity = Complexity(1);
    pub const MAX: Complexity = Complexity(10);

    /// Clamp any integer into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Raise to `floor` if below it; never lowers.
    pub fn at_least(self, floor: Complexity) -> Self {
        self.max(floor)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Self::MIN
    }
}

// ---------------------------------------------------------------------------
// RngConfig
// ---------------------------------------------------------------------------

/// Settings for one `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RngConfig {
    /// Source switches; `None` takes the preset's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourceToggles>,
    /// Hash algorithm; `None` takes the preset's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<HashAlgorithm>,
    /// Mixing strategy; `None` takes the preset's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixing: Option<MixingMode>,
    pub expansion: ExpansionMode,
    pub threading: ThreadingMode,
    /// Required when `threading` is [`ThreadingMode::External`].
    #[serde(skip)]
    pub lock_callbacks: Option<LockCallbacks>,
    pub preset: SecurityPreset,
    /// Round count; clamped to 1..=10 and raised to the preset floor.
    pub complexity: i64,
    pub output: OutputMode,
    /// Caller seed: counter-mode input, HKDF salt, or HMAC-stream key.
    #[serde(with = "hex_bytes", skip_serializing_if = "Option::is_none")]
    pub seed: Option<Vec<u8>>,
    /// Context bytes for HKDF/XOF domain separation.
    #[serde(with = "hex_bytes", skip_serializing_if = "Option::is_none")]
    pub info: Option<Vec<u8>>,
}

impl Default for RngConfig {
    fn default() -> Self {
        Self {
            sources: None,
            hash: None,
            mixing: None,
            expansion: ExpansionMode::default(),
            threading: ThreadingMode::default(),
            lock_callbacks: None,
            preset: SecurityPreset::default(),
            complexity: 1,
            output: OutputMode::default(),
            seed: None,
            info: None,
        }
    }
}

impl RngConfig {
    /// Everything left to `preset`.
    pub fn from_preset(preset: SecurityPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    pub fn fast() -> Self {
        Self::from_preset(SecurityPreset::Fast)
    }

    pub fn balanced() -> Self {
        Self::from_preset(SecurityPreset::Balanced)
    }

    pub fn secure() -> Self {
        Self::from_preset(SecurityPreset::Secure)
    }

    /// The classic behaviour: all sources, SHA-256, chained rounds, counter
    /// expansion, raw output. Runs exactly the requested round count (1 by
    /// default); the fast preset only contributes its floor of 1.
    pub fn standard() -> Self {
        Self {
            sources: Some(SourceToggles::all()),
            hash: Some(HashAlgorithm::Sha256),
            mixing: Some(MixingMode::RoundBased),
            preset: SecurityPreset::Fast,
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_sources(mut self, sources: SourceToggles) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = Some(hash);
        self
    }

    pub fn with_mixing(mut self, mixing: MixingMode) -> Self {
        self.mixing = Some(mixing);
        self
    }

    pub fn with_expansion(mut self, expansion: ExpansionMode) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_threading(mut self, threading: ThreadingMode) -> Self {
        self.threading = threading;
        self
    }

    /// Switch to external locking through `callbacks`.
    pub fn with_external_lock(mut self, callbacks: LockCallbacks) -> Self {
        self.threading = ThreadingMode::External;
        self.lock_callbacks = Some(callbacks);
        self
    }

    pub fn with_preset(mut self, preset: SecurityPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_complexity(mut self, complexity: i64) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Vec<u8>>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Optional byte strings as lowercase hex in serialized form.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&hex::encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(d)?;
        text.map(|t| hex::decode(t).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_set_and_query() {
        let mut t = SourceToggles::none();
        assert_eq!(t.enabled_count(), 0);
        t.set(SourceId::Battery, true);
        assert!(t.is_enabled(SourceId::Battery));
        assert!(!t.is_enabled(SourceId::Audio));
        assert_eq!(t.enabled_ids(), vec![SourceId::Battery]);
    }

    #[test]
    fn test_toggles_with_builder() {
        let t = SourceToggles::all()
            .with(SourceId::Audio, false)
            .with(SourceId::Disk, false);
        assert_eq!(t.enabled_count(), 6);
        assert!(!t.audio && !t.disk);
    }

    #[test]
    fn test_complexity_clamps() {
        assert_eq!(Complexity::clamped(-5).get(), 1);
        assert_eq!(Complexity::clamped(0).get(), 1);
        assert_eq!(Complexity::clamped(7).get(), 7);
        assert_eq!(Complexity::clamped(11).get(), 10);
        assert_eq!(Complexity::clamped(i64::MAX).get(), 10);
    }

    #[test]
    fn test_complexity_floor_never_lowers() {
        let nine = Complexity::clamped(9);
        assert_eq!(nine.at_least(Complexity::clamped(3)).get(), 9);
        assert_eq!(Complexity::MIN.at_least(Complexity::clamped(3)).get(), 3);
    }

    #[test]
    fn test_default_config() {
        let c = RngConfig::default();
        assert_eq!(c.preset, SecurityPreset::Balanced);
        assert_eq!(c.complexity, 1);
        assert!(c.sources.is_none() && c.hash.is_none() && c.mixing.is_none());
        assert_eq!(c.output, OutputMode::Raw);
    }

    #[test]
    fn test_standard_config_is_explicit() {
        let c = RngConfig::standard();
        assert_eq!(c.sources, Some(SourceToggles::all()));
        assert_eq!(c.hash, Some(HashAlgorithm::Sha256));
        assert_eq!(c.mixing, Some(MixingMode::RoundBased));
        assert_eq!(c.preset, SecurityPreset::Fast);
    }

    #[test]
    fn test_json_roundtrip_with_seed() {
        let c = RngConfig::secure()
            .with_seed(vec![0xde, 0xad])
            .with_info(b"ctx".to_vec())
            .with_output(OutputMode::Hex);
        let json = c.to_json().unwrap();
        assert!(json.contains("\"dead\""));
        let back = RngConfig::from_json(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_json_partial_document() {
        let c = RngConfig::from_json(
            r#"{"preset":"fast","complexity":4,"expansion":"hkdf","sources":{"audio":false}}"#,
        )
        .unwrap();
        assert_eq!(c.preset, SecurityPreset::Fast);
        assert_eq!(c.complexity, 4);
        assert_eq!(c.expansion, ExpansionMode::Hkdf);
        let sources = c.sources.unwrap();
        assert!(!sources.audio);
        assert!(sources.cpu);
    }

    #[test]
    fn test_json_rejects_bad_hex() {
        assert!(RngConfig::from_json(r#"{"seed":"zz"}"#).is_err());
    }
}
