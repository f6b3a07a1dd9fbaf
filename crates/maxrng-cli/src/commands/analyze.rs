use std::time::Instant;

use maxrng_core::{RngConfig, generate_to_vec};
use maxrng_tests::{TestResult, calculate_quality_score, run_all_tests};

pub fn run(input: Option<&str>, bytes: usize, preset: &str) {
    let data = match input {
        Some(path) => match std::fs::read(path) {
            Ok(data) => {
                println!("Read {} bytes from {path}", data.len());
                data
            }
            Err(e) => {
                eprintln!("Error reading {path}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            let config = RngConfig::from_preset(super::parse_preset(preset));
            let t0 = Instant::now();
            let Some(data) = generate_to_vec(bytes, &config) else {
                eprintln!("Error: generation failed");
                std::process::exit(1);
            };
            println!(
                "Generated {} bytes ({preset}) in {:.2}s",
                data.len(),
                t0.elapsed().as_secs_f64()
            );
            data
        }
    };

    if data.is_empty() {
        eprintln!("No data to analyze.");
        std::process::exit(1);
    }

    let results = run_all_tests(&data);
    print_results(&results);
}

fn print_results(results: &[TestResult]) {
    println!();
    println!("{:<26} {:>5} {:>10}  Details", "Test", "Grade", "p-value");
    println!("{}", "-".repeat(78));
    for r in results {
        let p = match r.p_value {
            Some(p) => format!("{p:.4}"),
            None => "-".to_string(),
        };
        let mark = if r.passed { "✓" } else { "✗" };
        println!("{mark} {:<24} {:>5} {:>10}  {}", r.name, r.grade, p, r.details);
    }
    let passed = results.iter().filter(|r| r.passed).count();
    println!("{}", "-".repeat(78));
    println!(
        "Score: {:.0}/100 ({passed}/{} passed)",
        calculate_quality_score(results),
        results.len()
    );
}
