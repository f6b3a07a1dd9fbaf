//! NetworkSource: TCP statistics and per-interface counters.
//!
//! Reads `/proc/net/snmp` (segments in/out, retransmits, active opens) and
//! `/proc/net/dev` (bytes, packets, drops per adapter). Both move with all
//! traffic on the host.

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

use super::helpers::read_nonempty;

const SNMP_PATH: &str = "/proc/net/snmp";
const DEV_PATH: &str = "/proc/net/dev";

static NETWORK_INFO: SourceInfo = SourceInfo {
    id: SourceId::Network,
    description: "TCP statistics and network adapter counters",
    physics: "Packet and byte counters are driven by remote peers, NIC interrupt \
              coalescing and retransmission timers, none of which a local observer \
              controls.",
    category: SourceCategory::Network,
    slow: false,
};

/// Entropy source sampling kernel network counters.
pub struct NetworkSource;

/// Keep only the `Tcp:` lines of an snmp dump.
fn tcp_lines(snmp: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(snmp);
    let mut out = Vec::new();
    for line in text.lines().filter(|l| l.starts_with("Tcp:")) {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    out
}

impl EntropySource for NetworkSource {
    fn info(&self) -> &SourceInfo {
        &NETWORK_INFO
    }

    fn is_available(&self) -> bool {
        std::path::Path::new(DEV_PATH).exists()
    }

    fn produce(&self) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(snmp) = read_nonempty(SNMP_PATH) {
            out.extend(tcp_lines(&snmp));
        }
        if let Some(dev) = read_nonempty(DEV_PATH) {
            out.extend(dev);
        }
        if out.is_empty() { None } else { Some(out) }
    }
}
