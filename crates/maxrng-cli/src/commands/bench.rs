use std::time::{Duration, Instant};

use maxrng_core::{Complexity, RngConfig, generate};

struct Timing {
    label: String,
    per_call: Duration,
    failures: usize,
}

fn time_calls(iterations: usize, mut call: impl FnMut() -> bool) -> (Duration, usize) {
    let mut failures = 0;
    let t0 = Instant::now();
    for _ in 0..iterations {
        if !call() {
            failures += 1;
        }
    }
    let per_call = match u32::try_from(iterations) {
        Ok(0) => Duration::ZERO,
        Ok(n) => t0.elapsed() / n,
        Err(_) => t0.elapsed().div_f64(iterations as f64),
    };
    (per_call, failures)
}

pub fn run(bytes: usize, iterations: usize, preset: &str) {
    let base = RngConfig::from_preset(super::parse_preset(preset));
    let floor = base.preset.defaults().complexity_floor.get();
    let mut buf = vec![0u8; bytes];
    let mut timings = Vec::new();

    println!("Benchmarking {bytes}B x {iterations} calls per level ({preset} preset)...\n");

    for level in Complexity::MIN.get()..=Complexity::MAX.get() {
        let config = base.clone().with_complexity(i64::from(level));
        let (per_call, failures) =
            time_calls(iterations, || generate(bytes, &config, &mut buf).is_some());
        let label = if level < floor {
            format!("complexity {level} (floor {floor})")
        } else {
            format!("complexity {level}")
        };
        println!("  {label:<26} {:>10.3} ms", per_call.as_secs_f64() * 1000.0);
        timings.push(Timing {
            label,
            per_call,
            failures,
        });
    }

    let (os_per_call, os_failures) =
        time_calls(iterations, || getrandom::fill(&mut buf).is_ok());
    timings.push(Timing {
        label: "OS CSPRNG (getrandom)".to_string(),
        per_call: os_per_call,
        failures: os_failures,
    });

    println!("\n{}", "=".repeat(62));
    println!("{:<28} {:>12} {:>12} {:>6}", "Mode", "ms/call", "KiB/s", "Fail");
    println!("{}", "-".repeat(62));
    for t in &timings {
        let secs = t.per_call.as_secs_f64();
        let rate = if secs > 0.0 {
            bytes as f64 / 1024.0 / secs
        } else {
            f64::INFINITY
        };
        println!(
            "{:<28} {:>12.3} {:>12.1} {:>6}",
            t.label,
            secs * 1000.0,
            rate,
            t.failures
        );
    }
}
