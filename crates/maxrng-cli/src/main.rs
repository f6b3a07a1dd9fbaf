//! CLI for maxrng: multi-source random bytes, mixed, stretched, encoded.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "maxrng")]
#[command(about = "maxrng: random bytes from eight system noise sources")]
#[command(version = maxrng_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random bytes to stdout
    Generate {
        /// Number of raw random bytes
        #[arg(long, default_value = "32")]
        bytes: usize,

        /// Output encoding (default: hex, unless the config file sets one)
        #[arg(long, value_parser = ["raw", "hex", "base64"])]
        format: Option<String>,

        /// Security preset supplying unset hash, mixing and sources
        #[arg(long, value_parser = ["fast", "balanced", "secure"])]
        preset: Option<String>,

        /// Mixing rounds (clamped to 1-10, raised to the preset floor)
        #[arg(long)]
        complexity: Option<i64>,

        /// Hash algorithm
        #[arg(long, value_parser = ["sha256", "sha384", "sha512"])]
        hash: Option<String>,

        /// Mixing strategy
        #[arg(long, value_parser = ["rounds", "continuous"])]
        mixing: Option<String>,

        /// Expansion strategy
        #[arg(long, value_parser = ["counter", "hkdf", "hmac-stream", "xof"])]
        expansion: Option<String>,

        /// Locking around the call
        #[arg(long, value_parser = ["none", "internal"])]
        threading: Option<String>,

        /// Seed bytes as hex
        #[arg(long)]
        seed: Option<String>,

        /// Context label for HKDF/XOF
        #[arg(long)]
        info: Option<String>,

        /// Comma-separated sources to switch off (e.g. audio,network)
        #[arg(long)]
        disable: Option<String>,

        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<String>,
    },

    /// Report hardware RNG, threading and per-source availability
    Probe {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write random bytes to a file from several threads under the internal lock
    Dump {
        /// Output file
        #[arg(long, default_value = "rng_output.bin")]
        output: String,

        /// Total bytes to write
        #[arg(long, default_value = "10000000")]
        bytes: usize,

        /// Bytes per generate call
        #[arg(long, default_value = "1024")]
        chunk_size: usize,

        /// Worker threads (default: available parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Security preset (default: classic all-source SHA-256 rounds)
        #[arg(long, value_parser = ["fast", "balanced", "secure"])]
        preset: Option<String>,
    },

    /// Run the statistical battery on a file or on fresh output
    Analyze {
        /// Read bytes from this file instead of generating
        #[arg(long)]
        input: Option<String>,

        /// Bytes to generate when no input file is given
        #[arg(long, default_value = "100000")]
        bytes: usize,

        /// Security preset for generated input
        #[arg(long, default_value = "fast", value_parser = ["fast", "balanced", "secure"])]
        preset: String,
    },

    /// Time every complexity level against the OS CSPRNG
    Bench {
        /// Bytes per generate call
        #[arg(long, default_value = "1024")]
        bytes: usize,

        /// Calls per complexity level
        #[arg(long, default_value = "10")]
        iterations: usize,

        /// Security preset
        #[arg(long, default_value = "fast", value_parser = ["fast", "balanced", "secure"])]
        preset: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            bytes,
            format,
            preset,
            complexity,
            hash,
            mixing,
            expansion,
            threading,
            seed,
            info,
            disable,
            config,
        } => commands::generate::run(commands::generate::GenerateCommandConfig {
            bytes,
            format: format.as_deref(),
            preset: preset.as_deref(),
            complexity,
            hash: hash.as_deref(),
            mixing: mixing.as_deref(),
            expansion: expansion.as_deref(),
            threading: threading.as_deref(),
            seed: seed.as_deref(),
            info: info.as_deref(),
            disable: disable.as_deref(),
            config_path: config.as_deref(),
        }),
        Commands::Probe { json } => commands::probe::run(json),
        Commands::Dump {
            output,
            bytes,
            chunk_size,
            threads,
            preset,
        } => commands::dump::run(&output, bytes, chunk_size, threads, preset.as_deref()),
        Commands::Analyze {
            input,
            bytes,
            preset,
        } => commands::analyze::run(input.as_deref(), bytes, &preset),
        Commands::Bench {
            bytes,
            iterations,
            preset,
        } => commands::bench::run(bytes, iterations, &preset),
    }
}
