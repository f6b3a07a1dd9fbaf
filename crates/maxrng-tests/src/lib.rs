//! Statistical randomness battery for generator output.
//!
//! Nine checks covering frequency, runs, correlation, bit-position bias,
//! entropy and compressibility. Each returns a [`TestResult`] with a p-value
//! where one exists, a pass/fail determination and a letter grade (A–F).

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single randomness test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Letter grade from a p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Pass when the p-value reaches `threshold`.
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }

    /// Grade a ratio in [0, 1] where 1 is ideal.
    fn from_ratio(name: &str, ratio: f64, statistic: f64, details: String) -> Self {
        let grade = if ratio > 0.95 {
            'A'
        } else if ratio > 0.85 {
            'B'
        } else if ratio > 0.7 {
            'C'
        } else if ratio > 0.5 {
            'D'
        } else {
            'F'
        };
        Self {
            name: name.to_string(),
            passed: ratio > 0.85,
            p_value: None,
            statistic,
            details,
            grade,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Unpack bytes into bits, MSB first.
fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: need {needed}, got {got}"),
        grade: 'F',
    }
}

fn failed(name: &str, details: &str) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: Some(0.0),
        statistic: 0.0,
        details: details.to_string(),
        grade: 'F',
    }
}

/// Upper tail of the chi-squared distribution.
fn chi2_sf(df: f64, statistic: f64) -> Option<f64> {
    ChiSquared::new(df).ok().map(|d| d.sf(statistic))
}

/// Two-sided normal tail for a z-score.
fn normal_two_sided(z: f64) -> f64 {
    erfc(z.abs() / 2.0_f64.sqrt())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Frequency
// ═══════════════════════════════════════════════════════════════════════════════

/// Proportion of ones over all bits should be one half.
pub fn monobit_frequency(data: &[u8]) -> TestResult {
    let name = "Monobit Frequency";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let ones = bits.iter().filter(|&&b| b == 1).count();
    let zeros = n - ones;
    let s = ones as i64 - zeros as i64;
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = normal_two_sided(s_obs);
    TestResult::from_p(name, p, s_obs, format!("ones={ones}, zeros={zeros}, n={n}"))
}

/// Chi-squared over the 256 byte values.
pub fn byte_frequency(data: &[u8]) -> TestResult {
    let name = "Byte Frequency";
    let n = data.len();
    if n < 256 {
        return insufficient(name, 256, n);
    }
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    let expected = n as f64 / 256.0;
    let chi2: f64 = hist
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();
    match chi2_sf(255.0, chi2) {
        Some(p) => TestResult::from_p(name, p, chi2, format!("n={n}, expected_per_bin={expected:.1}")),
        None => failed(name, "chi-squared distribution unavailable"),
    }
}

/// Each of the eight bit positions should be set in half the bytes.
///
/// Position 0 is the least significant bit. The eight deviations are combined
/// into one chi-squared statistic with 8 degrees of freedom.
pub fn bit_position_frequency(data: &[u8]) -> TestResult {
    let name = "Bit Position Frequency";
    let n = data.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let mut counts = [0u64; 8];
    for &b in data {
        for (i, count) in counts.iter_mut().enumerate() {
            if b & (1 << i) != 0 {
                *count += 1;
            }
        }
    }
    let half = n as f64 / 2.0;
    let quarter = n as f64 / 4.0;
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let diff = c as f64 - half;
            diff * diff / quarter
        })
        .sum();
    let freqs: Vec<String> = counts
        .iter()
        .map(|&c| format!("{:.3}", c as f64 / n as f64))
        .collect();
    match chi2_sf(8.0, chi2) {
        Some(p) => TestResult::from_p(name, p, chi2, format!("set-bit freq by position: [{}]", freqs.join(", "))),
        None => failed(name, "chi-squared distribution unavailable"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runs
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of uninterrupted runs of identical bits.
pub fn runs_test(data: &[u8]) -> TestResult {
    let name = "Runs Test";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let ones = bits.iter().filter(|&&b| b == 1).count();
    let prop = ones as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return failed(name, &format!("Pre-test failed: proportion={prop:.4}"));
    }

    let mut runs = 1usize;
    let mut longest = 1usize;
    let mut current = 1usize;
    for pair in bits.windows(2) {
        if pair[0] == pair[1] {
            current += 1;
        } else {
            runs += 1;
            current = 1;
        }
        longest = longest.max(current);
    }

    let expected = 2.0 * n as f64 * prop * (1.0 - prop) + 1.0;
    let std = 2.0 * (2.0 * n as f64).sqrt() * prop * (1.0 - prop);
    if std < 1e-10 {
        return failed(name, "Zero variance");
    }
    let z = (runs as f64 - expected).abs() / std;
    let p = normal_two_sided(z);
    TestResult::from_p(
        name,
        p,
        z,
        format!(
            "runs={runs}, expected={expected:.0}, avg_len={:.2}, max_len={longest}",
            n as f64 / runs as f64
        ),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Correlation
// ═══════════════════════════════════════════════════════════════════════════════

/// Fraction of bit pairs `lag` apart that are equal; one half for random data.
pub fn autocorrelation(data: &[u8], lag: usize) -> TestResult {
    let name = format!("Autocorrelation (lag {lag})");
    let bits = to_bits(data);
    let n = bits.len();
    if lag == 0 || n < lag + 100 {
        return insufficient(&name, lag.max(1) + 100, n);
    }
    let pairs = n - lag;
    let matches = bits
        .iter()
        .zip(&bits[lag..])
        .filter(|(a, b)| a == b)
        .count();
    let fraction = matches as f64 / pairs as f64;
    let z = (matches as f64 - pairs as f64 / 2.0) / ((pairs as f64).sqrt() / 2.0);
    let p = normal_two_sided(z);
    TestResult::from_p(&name, p, fraction, format!("matches={matches}/{pairs} ({fraction:.4})"))
}

/// Adjacent-bit correlation.
pub fn autocorrelation_lag1(data: &[u8]) -> TestResult {
    autocorrelation(data, 1)
}

/// Same bit of adjacent bytes.
pub fn autocorrelation_lag8(data: &[u8]) -> TestResult {
    autocorrelation(data, 8)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entropy
// ═══════════════════════════════════════════════════════════════════════════════

/// Shannon entropy in bits per byte (max 8.0).
pub fn shannon_entropy(data: &[u8]) -> TestResult {
    let name = "Shannon Entropy";
    let n = data.len();
    if n < 16 {
        return insufficient(name, 16, n);
    }
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    let h: f64 = hist
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n as f64;
            -p * p.log2()
        })
        .sum();
    let ratio = h / 8.0;
    TestResult::from_ratio(
        name,
        ratio,
        h,
        format!("{h:.4} / 8.0 bits ({:.1}%)", ratio * 100.0),
    )
}

/// zlib compressed size over input size; random data does not compress.
pub fn compression_ratio(data: &[u8]) -> TestResult {
    let name = "Compression Ratio";
    let n = data.len();
    if n < 32 {
        return insufficient(name, 32, n);
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    let compressed = match encoder.write_all(data).and_then(|_| encoder.finish()) {
        Ok(c) => c,
        Err(e) => return failed(name, &format!("compression failed: {e}")),
    };
    let ratio = compressed.len() as f64 / n as f64;
    TestResult::from_ratio(
        name,
        ratio,
        ratio,
        format!("{}/{n} = {ratio:.4}", compressed.len()),
    )
}

/// Share of distinct 16-byte chunks; repeated chunks point at a stuck or
/// reseeding-free generator.
pub fn chunk_uniqueness(data: &[u8]) -> TestResult {
    let name = "Chunk Uniqueness";
    let chunks: Vec<&[u8]> = data.chunks_exact(16).collect();
    if chunks.len() < 16 {
        return insufficient(name, 256, data.len());
    }
    let distinct: std::collections::HashSet<&[u8]> = chunks.iter().copied().collect();
    let ratio = distinct.len() as f64 / chunks.len() as f64;
    TestResult::from_ratio(
        name,
        ratio,
        ratio,
        format!("{}/{} distinct 16-byte chunks", distinct.len(), chunks.len()),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run every test on `data`.
pub fn run_all_tests(data: &[u8]) -> Vec<TestResult> {
    let tests: [fn(&[u8]) -> TestResult; 9] = [
        shannon_entropy,
        monobit_frequency,
        byte_frequency,
        runs_test,
        autocorrelation_lag1,
        autocorrelation_lag8,
        bit_position_frequency,
        compression_ratio,
        chunk_uniqueness,
    ];
    tests.iter().map(|test| test(data)).collect()
}

/// Overall score 0–100: A=100, B=75, C=50, D=25, F=0, averaged.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn uniform(n: usize) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut data = vec![0u8; n];
        rng.fill(&mut data[..]);
        data
    }

    #[test]
    fn test_to_bits() {
        assert_eq!(to_bits(&[0b1011_0001]), vec![1, 0, 1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_grade_from_p() {
        assert_eq!(TestResult::grade_from_p(Some(0.5)), 'A');
        assert_eq!(TestResult::grade_from_p(Some(0.05)), 'B');
        assert_eq!(TestResult::grade_from_p(Some(0.005)), 'C');
        assert_eq!(TestResult::grade_from_p(Some(0.0005)), 'D');
        assert_eq!(TestResult::grade_from_p(Some(1e-8)), 'F');
        assert_eq!(TestResult::grade_from_p(None), 'F');
    }

    #[test]
    fn test_insufficient_data() {
        let result = monobit_frequency(&[0u8; 5]);
        assert!(!result.passed);
        assert!(result.details.contains("Insufficient"));
        assert!(!autocorrelation(&[0u8; 4], 8).passed);
        assert!(!autocorrelation(&[0u8; 400], 0).passed);
    }

    #[test]
    fn test_constant_data_fails() {
        let results = run_all_tests(&vec![0u8; 4096]);
        let passed = results.iter().filter(|r| r.passed).count();
        assert!(passed < results.len() / 2, "{passed}/{} passed", results.len());
    }

    #[test]
    fn test_uniform_data_passes() {
        let results = run_all_tests(&uniform(20_000));
        let passed = results.iter().filter(|r| r.passed).count();
        assert!(
            passed > results.len() / 2,
            "only {passed}/{} tests passed",
            results.len()
        );
        let score = calculate_quality_score(&results);
        assert!(score > 50.0, "score {score}");
    }

    #[test]
    fn test_shannon_uniform_near_eight() {
        let r = shannon_entropy(&uniform(65_536));
        assert!(r.statistic > 7.99, "{}", r.statistic);
        assert_eq!(r.grade, 'A');
    }

    #[test]
    fn test_alternating_bits_fail_lag1() {
        let r = autocorrelation(&vec![0b0101_0101u8; 1000], 1);
        assert_eq!(r.statistic, 0.0);
        assert!(!r.passed);
    }

    #[test]
    fn test_repeated_byte_fails_lag8() {
        let r = autocorrelation(&vec![0xA7u8; 1000], 8);
        assert_eq!(r.statistic, 1.0);
        assert!(!r.passed);
        // lag 1 on the same stream is not fooled into a perfect score
        assert!(autocorrelation(&vec![0xA7u8; 1000], 1).statistic < 1.0);
    }

    #[test]
    fn test_bit_position_detects_stuck_bit() {
        let data: Vec<u8> = uniform(10_000).into_iter().map(|b| b | 0x01).collect();
        let r = bit_position_frequency(&data);
        assert!(!r.passed);
        assert!(r.details.starts_with("set-bit freq by position: [1.000"));
    }

    #[test]
    fn test_compression_detects_repetition() {
        let r = compression_ratio(&b"abcd".repeat(1000));
        assert!(!r.passed);
        let r = compression_ratio(&uniform(4096));
        assert!(r.statistic > 0.95);
    }

    #[test]
    fn test_chunk_uniqueness() {
        assert!(chunk_uniqueness(&uniform(4096)).passed);
        assert!(!chunk_uniqueness(&vec![7u8; 4096]).passed);
    }

    #[test]
    fn test_quality_score_average() {
        let mk = |grade: char| TestResult {
            name: String::new(),
            passed: grade == 'A',
            p_value: None,
            statistic: 0.0,
            details: String::new(),
            grade,
        };
        assert_eq!(calculate_quality_score(&[mk('A'), mk('F')]), 50.0);
        assert_eq!(calculate_quality_score(&[mk('B'), mk('C'), mk('D')]), 50.0);
        assert_eq!(calculate_quality_score(&[]), 0.0);
    }
}
