pub mod analyze;
pub mod bench;
pub mod dump;
pub mod generate;
pub mod probe;

use maxrng_core::{
    ExpansionMode, HashAlgorithm, MixingMode, OutputMode, SecurityPreset, SourceId, ThreadingMode,
};

/// Parse an output format string.
pub fn parse_format(s: &str) -> OutputMode {
    match s {
        "raw" | "bin" => OutputMode::Raw,
        "hex" => OutputMode::Hex,
        "base64" | "b64" => OutputMode::Base64,
        _ => {
            eprintln!("Unknown format '{s}', using hex");
            OutputMode::Hex
        }
    }
}

/// Parse a preset name.
pub fn parse_preset(s: &str) -> SecurityPreset {
    SecurityPreset::from_name(s).unwrap_or_else(|| {
        eprintln!("Unknown preset '{s}', using balanced");
        SecurityPreset::Balanced
    })
}

/// Parse a hash algorithm name.
pub fn parse_hash(s: &str) -> HashAlgorithm {
    match s {
        "sha256" | "sha-256" => HashAlgorithm::Sha256,
        "sha384" | "sha-384" => HashAlgorithm::Sha384,
        "sha512" | "sha-512" => HashAlgorithm::Sha512,
        _ => {
            eprintln!("Unknown hash '{s}', using sha256");
            HashAlgorithm::Sha256
        }
    }
}

/// Parse a mixing strategy name.
pub fn parse_mixing(s: &str) -> MixingMode {
    match s {
        "rounds" | "round_based" | "round-based" => MixingMode::RoundBased,
        "continuous" => MixingMode::Continuous,
        _ => {
            eprintln!("Unknown mixing mode '{s}', using rounds");
            MixingMode::RoundBased
        }
    }
}

/// Parse an expansion strategy name.
pub fn parse_expansion(s: &str) -> ExpansionMode {
    match s {
        "counter" | "ctr" => ExpansionMode::Counter,
        "hkdf" => ExpansionMode::Hkdf,
        "hmac-stream" | "hmac_stream" | "hmac" => ExpansionMode::HmacStream,
        "xof" => ExpansionMode::Xof,
        _ => {
            eprintln!("Unknown expansion mode '{s}', using counter");
            ExpansionMode::Counter
        }
    }
}

/// Parse a threading mode name. External locking needs host callbacks and is
/// not reachable from the command line.
pub fn parse_threading(s: &str) -> ThreadingMode {
    match s {
        "none" => ThreadingMode::None,
        "internal" => ThreadingMode::Internal,
        _ => {
            eprintln!("Unknown threading mode '{s}', using none");
            ThreadingMode::None
        }
    }
}

/// Parse a comma-separated list of source names.
pub fn parse_source_list(s: &str) -> Result<Vec<SourceId>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            SourceId::from_name(&name.to_lowercase()).ok_or_else(|| {
                let known: Vec<&str> = SourceId::ALL.iter().map(|id| id.name()).collect();
                format!("unknown source '{name}' (known: {})", known.join(", "))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // enum parsers
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_format_variants() {
        assert_eq!(parse_format("raw"), OutputMode::Raw);
        assert_eq!(parse_format("hex"), OutputMode::Hex);
        assert_eq!(parse_format("b64"), OutputMode::Base64);
        assert_eq!(parse_format("nope"), OutputMode::Hex);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(parse_preset("fast"), SecurityPreset::Fast);
        assert_eq!(parse_preset("Secure"), SecurityPreset::Secure);
        assert_eq!(parse_preset(""), SecurityPreset::Balanced);
    }

    #[test]
    fn test_parse_hash_variants() {
        assert_eq!(parse_hash("sha256"), HashAlgorithm::Sha256);
        assert_eq!(parse_hash("sha-384"), HashAlgorithm::Sha384);
        assert_eq!(parse_hash("sha512"), HashAlgorithm::Sha512);
        assert_eq!(parse_hash("md5"), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_parse_mixing_and_expansion() {
        assert_eq!(parse_mixing("rounds"), MixingMode::RoundBased);
        assert_eq!(parse_mixing("continuous"), MixingMode::Continuous);
        assert_eq!(parse_expansion("hmac-stream"), ExpansionMode::HmacStream);
        assert_eq!(parse_expansion("xof"), ExpansionMode::Xof);
        assert_eq!(parse_expansion("HKDF"), ExpansionMode::Counter); // case-sensitive
    }

    #[test]
    fn test_parse_threading() {
        assert_eq!(parse_threading("internal"), ThreadingMode::Internal);
        assert_eq!(parse_threading("external"), ThreadingMode::None);
    }

    // -----------------------------------------------------------------------
    // source lists
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_source_list() {
        assert_eq!(
            parse_source_list("audio, Network,,disk").unwrap(),
            vec![SourceId::Audio, SourceId::Network, SourceId::Disk]
        );
        assert!(parse_source_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_source_list_rejects_unknown() {
        let err = parse_source_list("audio,camera").unwrap_err();
        assert!(err.contains("camera"));
        assert!(err.contains("hardware_rng"));
    }
}
