//! Integration tests for maxrng-core.
//!
//! These run the full pipeline against the real system sources:
//! preset resolution → guard → mixing → expansion → encoding.
//! Presets that include the audio source are slow and marked `#[ignore]`.

use maxrng_core::{
    ExpansionMode, HashAlgorithm, MixingMode, OutputMode, RngConfig, SourceId, SourceToggles,
    ThreadingMode, fill_bytes, fill_bytes_threadsafe, fill_bytes_with_complexity, generate,
    generate_to_vec, hardware_rng_available, init_threading, threading_available,
};

/// Fast sources only, so tests stay quick on any machine.
fn quick_sources() -> SourceToggles {
    SourceToggles::all()
        .with(SourceId::Audio, false)
        .with(SourceId::Network, false)
}

#[test]
fn scenario_continuous_sha384_counter_raw() {
    let config = RngConfig::default()
        .with_sources(quick_sources())
        .with_complexity(1)
        .with_mixing(MixingMode::Continuous)
        .with_hash(HashAlgorithm::Sha384)
        .with_expansion(ExpansionMode::Counter)
        .with_output(OutputMode::Raw);

    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    assert_eq!(generate(32, &config, &mut a), Some(32));
    assert_eq!(generate(32, &config, &mut b), Some(32));
    assert!(a.iter().any(|&x| x != 0), "output was all zero");
    assert_ne!(a, b, "two calls returned identical output");
}

#[test]
fn scenario_hex_sixteen_bytes() {
    let config = RngConfig::fast().with_output(OutputMode::Hex);
    let out = generate_to_vec(16, &config).unwrap();
    assert_eq!(out.len(), 32);
    assert!(
        out.iter().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(c)),
        "non-hex output: {:?}",
        String::from_utf8_lossy(&out)
    );
}

#[test]
fn scenario_base64_ten_bytes() {
    let config = RngConfig::fast().with_output(OutputMode::Base64);
    let out = generate_to_vec(10, &config).unwrap();
    assert_eq!(out.len(), 16);
    assert!(out.ends_with(b"=="));
    assert!(!out[..14].contains(&b'='));
}

#[test]
fn exact_length_law() {
    for raw_len in [1usize, 2, 3, 31, 32, 33, 100, 4096] {
        for output in OutputMode::ALL {
            let config = RngConfig::fast().with_output(output);
            let expected = match output {
                OutputMode::Raw => raw_len,
                OutputMode::Hex => raw_len * 2,
                OutputMode::Base64 => raw_len.div_ceil(3) * 4,
            };
            let mut out = vec![0u8; expected + 8];
            assert_eq!(
                generate(raw_len, &config, &mut out),
                Some(expected),
                "raw_len={raw_len} output={output}"
            );
        }
    }
}

#[test]
fn boundary_requests_fail_without_writing() {
    let config = RngConfig::fast();
    let mut out = [0x42u8; 16];
    assert_eq!(generate(0, &config, &mut out), None);
    assert_eq!(generate(16, &config, &mut []), None);
    assert_eq!(generate(17, &config, &mut out), None);
    assert!(out.iter().all(|&b| b == 0x42));
    assert!(generate_to_vec(0, &config).is_none());
}

#[test]
fn config_is_not_mutated() {
    let config = RngConfig::secure()
        .with_sources(quick_sources())
        .with_complexity(0)
        .with_seed(b"seed".to_vec());
    let before = config.clone();
    let mut out = [0u8; 64];
    generate(64, &config, &mut out).unwrap();
    generate(64, &config, &mut out).unwrap();
    assert_eq!(config, before);
}

#[test]
fn seeded_output_still_varies() {
    for expansion in ExpansionMode::ALL {
        let config = RngConfig::fast()
            .with_expansion(expansion)
            .with_seed(vec![7u8; 32])
            .with_info(b"integration".to_vec());
        let a = generate_to_vec(48, &config).unwrap();
        let b = generate_to_vec(48, &config).unwrap();
        assert_ne!(a, b, "{expansion} repeated output");
    }
}

#[test]
fn internal_threading_across_threads() {
    let config = RngConfig::fast().with_threading(ThreadingMode::Internal);
    let outputs: Vec<Vec<u8>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| generate_to_vec(32, &config).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(threading_available());
    for i in 0..outputs.len() {
        for j in i + 1..outputs.len() {
            assert_ne!(outputs[i], outputs[j]);
        }
    }
}

#[test]
fn startup_hooks_are_idempotent() {
    init_threading();
    assert!(!init_threading());
    assert!(threading_available());
    assert_eq!(hardware_rng_available(), hardware_rng_available());
}

#[test]
#[ignore] // All sources, including the bounded audio capture.
fn classic_fill_api() {
    let mut a = [0u8; 64];
    let mut b = [0u8; 64];
    assert!(fill_bytes(&mut a));
    assert!(fill_bytes_with_complexity(&mut b, 42));
    assert_ne!(a, b);
    assert!(fill_bytes_threadsafe(&mut a));
    assert!(!fill_bytes(&mut []));
}

#[test]
#[ignore] // Secure preset enables every source.
fn secure_preset_end_to_end() {
    let out = generate_to_vec(1024, &RngConfig::secure()).unwrap();
    assert_eq!(out.len(), 1024);
    let distinct: std::collections::HashSet<u8> = out.iter().copied().collect();
    assert!(distinct.len() > 200, "only {} distinct byte values", distinct.len());
}
