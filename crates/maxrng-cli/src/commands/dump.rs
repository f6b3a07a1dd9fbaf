use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use maxrng_core::{RngConfig, ThreadingMode, generate_to_vec, init_threading};

pub fn run(
    output: &str,
    total_bytes: usize,
    chunk_size: usize,
    threads: Option<usize>,
    preset: Option<&str>,
) {
    let threads = threads
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1);
    let config = match preset {
        Some(p) => RngConfig::from_preset(super::parse_preset(p)),
        None => RngConfig::standard(),
    };

    println!("Writing {total_bytes} bytes to {output} ({threads} threads, {chunk_size}B chunks)...");
    let t0 = Instant::now();
    match dump_to(Path::new(output), total_bytes, chunk_size, threads, &config) {
        Ok(written) => {
            let secs = t0.elapsed().as_secs_f64();
            println!(
                "Saved {written} bytes in {secs:.2}s ({:.1} KiB/s)",
                written as f64 / 1024.0 / secs.max(1e-9)
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Generate `total_bytes` into `path`, `threads` chunks at a time, in order.
///
/// Every call runs under the internal lock regardless of `config.threading`.
pub fn dump_to(
    path: &Path,
    total_bytes: usize,
    chunk_size: usize,
    threads: usize,
    config: &RngConfig,
) -> std::io::Result<usize> {
    if chunk_size == 0 || threads == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "chunk size and thread count must be positive",
        ));
    }
    init_threading();
    let config = config.clone().with_threading(ThreadingMode::Internal);

    let mut out = BufWriter::new(File::create(path)?);
    let mut written = 0usize;
    while written < total_bytes {
        let remaining = total_bytes - written;
        let batch = threads.min(remaining.div_ceil(chunk_size));
        let sizes: Vec<usize> = (0..batch)
            .map(|i| chunk_size.min(remaining - i * chunk_size))
            .collect();

        let chunks: Vec<Option<Vec<u8>>> = std::thread::scope(|s| {
            let handles: Vec<_> = sizes
                .iter()
                .map(|&size| {
                    let config = &config;
                    s.spawn(move || generate_to_vec(size, config))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().ok().flatten())
                .collect()
        });

        for chunk in chunks {
            let chunk = chunk.ok_or_else(|| std::io::Error::other("generation failed"))?;
            out.write_all(&chunk)?;
            written += chunk.len();
        }
        log::debug!("dump: {written}/{total_bytes} bytes");
    }
    out.flush()?;
    Ok(written)
}
