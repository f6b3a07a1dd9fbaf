use std::time::Instant;

use maxrng_core::{SourceRegistry, hardware_rng_available, threading_available};

struct SourceProbe {
    name: &'static str,
    category: String,
    available: bool,
    slow: bool,
    sample_bytes: Option<usize>,
    millis: f64,
}

fn probe_sources(registry: &SourceRegistry) -> Vec<SourceProbe> {
    registry
        .iter()
        .map(|src| {
            let info = src.info();
            let t0 = Instant::now();
            let sample = src.produce();
            SourceProbe {
                name: src.name(),
                category: info.category.to_string(),
                available: src.is_available(),
                slow: info.slow,
                sample_bytes: sample.map(|s| s.len()),
                millis: t0.elapsed().as_secs_f64() * 1000.0,
            }
        })
        .collect()
}

pub fn run(json: bool) {
    let registry = SourceRegistry::system();
    let probes = probe_sources(&registry);

    if json {
        let sources: Vec<serde_json::Value> = probes
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "category": p.category,
                    "available": p.available,
                    "slow": p.slow,
                    "sample_bytes": p.sample_bytes,
                    "ms": p.millis,
                })
            })
            .collect();
        let report = serde_json::json!({
            "version": maxrng_core::VERSION,
            "hardware_rng": hardware_rng_available(),
            "threading_initialized": threading_available(),
            "sources": sources,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("maxrng {}", maxrng_core::VERSION);
    println!("  Hardware RNG:          {}", yes_no(hardware_rng_available()));
    println!("  Threading initialized: {}", yes_no(threading_available()));
    println!();
    println!(
        "{:<16} {:<10} {:>9} {:>8} {:>9}",
        "Source", "Category", "Available", "Sample", "Time"
    );
    println!("{}", "-".repeat(56));
    for p in &probes {
        let sample = match p.sample_bytes {
            Some(n) => format!("{n}B"),
            None => "-".to_string(),
        };
        let name = if p.slow {
            format!("{}*", p.name)
        } else {
            p.name.to_string()
        };
        println!(
            "{:<16} {:<10} {:>9} {:>8} {:>7.1}ms",
            name,
            p.category,
            yes_no(p.available),
            sample,
            p.millis
        );
    }
    println!("\n* slow source (bounded capture window)");
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
