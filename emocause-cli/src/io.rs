use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use emocause::config::{Config, TomlRead};
use emocause::pattern::PatternSet;

/// Load and validate a configuration file.
///
/// Paths in the configuration are made relative to the directory of
/// the configuration file.
pub fn load_config(config_path: &str) -> Result<Config> {
    let config_file = File::open(config_path)
        .context(format!("Cannot open configuration file '{}'", &config_path))?;
    let mut config = Config::from_toml_read(config_file)
        .context(format!("Cannot parse configuration file: {}", config_path))?;
    config.relativize_paths(config_path).context(format!(
        "Cannot relativize paths in configuration file: {}",
        config_path
    ))?;

    Ok(config)
}

pub fn load_patterns(patterns_path: &str) -> Result<PatternSet> {
    let f = File::open(patterns_path)
        .context(format!("Cannot open pattern file: {}", patterns_path))?;
    let patterns = PatternSet::from_read(BufReader::new(f))
        .context(format!("Cannot read patterns from: {}", patterns_path))?;

    log::info!(
        "Loaded {} trigger patterns from {}",
        patterns.len(),
        patterns_path
    );

    Ok(patterns)
}
