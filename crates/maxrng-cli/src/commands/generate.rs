use std::io::Write;

use maxrng_core::{OutputMode, RngConfig, SourceToggles, generate_to_vec};

pub struct GenerateCommandConfig<'a> {
    pub bytes: usize,
    pub format: Option<&'a str>,
    pub preset: Option<&'a str>,
    pub complexity: Option<i64>,
    pub hash: Option<&'a str>,
    pub mixing: Option<&'a str>,
    pub expansion: Option<&'a str>,
    pub threading: Option<&'a str>,
    pub seed: Option<&'a str>,
    pub info: Option<&'a str>,
    pub disable: Option<&'a str>,
    pub config_path: Option<&'a str>,
}

pub fn run(cmd: GenerateCommandConfig<'_>) {
    let config = match build_config(&cmd) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let Some(data) = generate_to_vec(cmd.bytes, &config) else {
        eprintln!("Error: generation failed (set RUST_LOG=debug for the reason)");
        std::process::exit(1);
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut result = out.write_all(&data);
    if config.output != OutputMode::Raw {
        result = result.and_then(|_| out.write_all(b"\n"));
    }
    if result.and_then(|_| out.flush()).is_err() {
        std::process::exit(1);
    }
}

/// File values first, then any flag given on the command line.
///
/// Output is hex unless `--format` or the file's `output` field says otherwise.
pub fn build_config(cmd: &GenerateCommandConfig<'_>) -> Result<RngConfig, String> {
    let (mut config, file_sets_output) = match cmd.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
            let doc: serde_json::Value =
                serde_json::from_str(&text).map_err(|e| format!("parsing {path}: {e}"))?;
            let sets_output = doc.get("output").is_some();
            let config = RngConfig::from_json(&text).map_err(|e| format!("parsing {path}: {e}"))?;
            (config, sets_output)
        }
        None => (RngConfig::default(), false),
    };

    match cmd.format {
        Some(format) => config.output = super::parse_format(format),
        None if !file_sets_output => config.output = OutputMode::Hex,
        None => {}
    }
    if let Some(preset) = cmd.preset {
        config.preset = super::parse_preset(preset);
    }
    if let Some(complexity) = cmd.complexity {
        config.complexity = complexity;
    }
    if let Some(hash) = cmd.hash {
        config.hash = Some(super::parse_hash(hash));
    }
    if let Some(mixing) = cmd.mixing {
        config.mixing = Some(super::parse_mixing(mixing));
    }
    if let Some(expansion) = cmd.expansion {
        config.expansion = super::parse_expansion(expansion);
    }
    if let Some(threading) = cmd.threading {
        config.threading = super::parse_threading(threading);
    }
    if let Some(seed) = cmd.seed {
        config.seed = Some(hex::decode(seed).map_err(|e| format!("--seed is not hex: {e}"))?);
    }
    if let Some(info) = cmd.info {
        config.info = Some(info.as_bytes().to_vec());
    }
    if let Some(disable) = cmd.disable {
        let base = config
            .sources
            .unwrap_or_else(|| config.preset.defaults().sources);
        let toggles = super::parse_source_list(disable)?
            .into_iter()
            .fold(base, |t, id| t.with(id, false));
        config.sources = Some(toggles);
    }
    Ok(config)
}
