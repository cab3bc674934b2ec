use crate::config::types::RuleSet;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a ruleset file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML ruleset file
///
/// # Returns
///
/// * `Ok(RuleSet)` - Successfully loaded and validated ruleset
/// * `Err(ConfigError)` - Failed to load, parse, or validate the ruleset
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scroll::config::load_ruleset;
///
/// let rules = load_ruleset(Path::new("config.toml")).unwrap();
/// println!("Base URL: {}", rules.base_url);
/// ```
pub fn load_ruleset(path: &Path) -> Result<RuleSet, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_ruleset(&content)
}

/// Parses and validates a ruleset from TOML text
pub fn parse_ruleset(content: &str) -> Result<RuleSet, ConfigError> {
    let rules: RuleSet = toml::from_str(content)?;
    validate(&rules)?;
    Ok(rules)
}

/// Computes a SHA-256 hash of the ruleset file content
///
/// Logged at startup so an output document can be traced back to the exact
/// ruleset that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Loads a ruleset and returns both the ruleset and its hash
pub fn load_ruleset_with_hash(path: &Path) -> Result<(RuleSet, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let rules = parse_ruleset(&content)?;
    Ok((rules, hash_content(&content)))
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
