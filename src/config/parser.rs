//! Reading `config.toml`
//!
//! The file is read once per load. Its hash and the parsed configuration
//! always come from the same bytes.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and validates the configuration file at `path`
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitemap_usage::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Index: {}", config.sitemap.index_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Loads the configuration together with the SHA-256 of the file it came from
///
/// The hash goes into the crawl report so two runs can be compared.
///
/// # Returns
///
/// * `Ok((Config, String))` - Validated configuration and hex-encoded hash
/// * `Err(ConfigError)` - The file could not be read, parsed or validated
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let hash = config_hash(&content);
    let config = parse_config(&content)?;

    tracing::debug!("Loaded {} (sha256 {})", path.display(), hash);
    Ok((config, hash))
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 of configuration text
pub fn config_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
