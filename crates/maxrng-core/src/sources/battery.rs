//! BatterySource: power-supply gauges from sysfs.
//!
//! Concatenates the fast-moving gauges (voltage, current, power, energy,
//! charge, temperature) of every supply under `/sys/class/power_supply`.
//! Desktop machines without a battery usually still expose an AC adapter,
//! whose `online` flag alone carries little entropy; that is acceptable for a
//! best-effort contributor.

use std::path::Path;

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

use super::helpers::read_nonempty;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Gauge files read from each supply directory, when present.
const GAUGES: &[&str] = &[
    "voltage_now",
    "current_now",
    "power_now",
    "energy_now",
    "charge_now",
    "capacity",
    "temp",
    "status",
    "online",
];

static BATTERY_INFO: SourceInfo = SourceInfo {
    id: SourceId::Battery,
    description: "Power-supply voltage, current and charge gauges",
    physics: "Fuel-gauge ADCs sample cell voltage and current draw, which follow the \
              instantaneous load of the whole machine, plus measurement noise.",
    category: SourceCategory::Sensor,
    slow: false,
};

/// Entropy source sampling power-supply gauges.
pub struct BatterySource;

fn read_supplies(root: &Path) -> Option<Vec<u8>> {
    let mut entries: Vec<_> = std::fs::read_dir(root)
        .ok()?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    let mut out = Vec::new();
    for supply in entries {
        for gauge in GAUGES {
            if let Some(value) = read_nonempty(supply.join(gauge)) {
                out.extend_from_slice(&value);
            }
        }
    }
    if out.is_empty() { None } else { Some(out) }
}

impl EntropySource for BatterySource {
    fn info(&self) -> &SourceInfo {
        &BATTERY_INFO
    }

    fn is_available(&self) -> bool {
        Path::new(POWER_SUPPLY_DIR).is_dir()
    }

    fn produce(&self) -> Option<Vec<u8>> {
        read_supplies(Path::new(POWER_SUPPLY_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_none() {
        assert!(read_supplies(Path::new("/no/such/power_supply")).is_none());
    }

    #[test]
    fn reads_gauges_from_fake_tree() {
        let dir = tempfile::tempdir().unwrap();
        let bat = dir.path().join("BAT0");
        std::fs::create_dir_all(&bat).unwrap();
        std::fs::write(bat.join("voltage_now"), b"12345678\n").unwrap();
        std::fs::write(bat.join("capacity"), b"87\n").unwrap();
        std::fs::write(bat.join("unrelated"), b"ignored\n").unwrap();

        let data = read_supplies(dir.path()).unwrap();
        assert_eq!(data, b"12345678\n87\n".to_vec());
    }

    #[test]
    fn battery_info() {
        assert_eq!(BatterySource.name(), "battery");
    }
}
