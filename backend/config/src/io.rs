//! Config file location and loading.

use crate::schema::SchemaforgeConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the schemaforge config directory.
/// Priority: `SCHEMAFORGE_CONFIG_DIR` env > `~/.schemaforge/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SCHEMAFORGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".schemaforge"),
        None => PathBuf::from(".schemaforge"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file as an untyped value.
///
/// Returns an empty mapping if the file doesn't exist.
pub fn load_raw(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    // A comment-only document parses to null.
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

/// Load and parse the config from disk, without env substitution.
pub fn load_config(path: &Path) -> Result<SchemaforgeConfig> {
    let value = load_raw(path)?;
    let config: SchemaforgeConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;
    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemberOrder;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.yaml")).unwrap();
        assert!(cfg.compiler.is_none());
        assert!(cfg.logging.is_none());
    }

    #[test]
    fn parses_camel_case_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        fs::write(
            &path,
            "compiler:\n  memberOrder: lexical\n  fetchTimeoutSecs: 12\nlogging:\n  level: debug\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        let compiler = cfg.compiler.unwrap();
        assert_eq!(compiler.member_order, Some(MemberOrder::Lexical));
        assert_eq!(compiler.fetch_timeout_secs, Some(12));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("debug"));
    }

    #[test]
    fn empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        fs::write(&path, "").unwrap();
        assert!(load_config(&path).unwrap().compiler.is_none());
    }

    #[test]
    fn rejects_unknown_member_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        fs::write(&path, "compiler:\n  memberOrder: random\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
