//! Basic generation example.
//!
//! Probes the hardware RNG, then generates 32 bytes under each preset and
//! prints them in every output encoding.
//!
//! Run: `cargo run --example basic`

use maxrng_core::{OutputMode, RngConfig, SecurityPreset, generate_to_vec, hardware_rng_available};

fn main() {
    env_logger::init();

    println!("Hardware RNG available: {}", hardware_rng_available());

    for preset in SecurityPreset::ALL {
        let config = RngConfig::from_preset(preset).with_output(OutputMode::Hex);
        match generate_to_vec(32, &config) {
            Some(hex) => println!("{preset:>9}: {}", String::from_utf8_lossy(&hex)),
            None => println!("{preset:>9}: generation failed"),
        }
    }

    let config = RngConfig::fast().with_output(OutputMode::Base64);
    if let Some(b64) = generate_to_vec(24, &config) {
        println!("   base64: {}", String::from_utf8_lossy(&b64));
    }

    // Seeded HKDF with a context label
    let config = RngConfig::fast()
        .with_expansion(maxrng_core::ExpansionMode::Hkdf)
        .with_seed(b"example salt".to_vec())
        .with_info(b"session keys".to_vec());
    if let Some(raw) = generate_to_vec(16, &config) {
        print!("     hkdf: ");
        for b in &raw {
            print!("{b:02x}");
        }
        println!();
    }
}
