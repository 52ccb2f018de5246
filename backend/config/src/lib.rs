//! `schemaforge-config` - runtime configuration for the schema compiler.
//!
//! Provides:
//! - Typed config schema (compiler and logging sections)
//! - YAML loading from `~/.schemaforge/config.yaml`
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with field paths

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, load_raw};
pub use schema::{CompilerConfig, LoggingConfig, MemberOrder, SchemaforgeConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, apply env substitution, apply defaults and validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub fn load_and_prepare(path: &Path) -> Result<SchemaforgeConfig> {
    let value = load_raw(path)?;

    // Substitute ${VAR} env vars.
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: SchemaforgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn prepare_fills_defaults_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_and_prepare(&dir.path().join("config.yaml")).unwrap();
        let compiler = cfg.compiler.unwrap();
        assert_eq!(compiler.fetch_timeout_secs, Some(defaults::DEFAULT_FETCH_TIMEOUT_SECS));
        assert_eq!(compiler.member_order, Some(MemberOrder::Declaration));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "compiler:\n  fetchTimeoutSecs: 0\n").unwrap();
        let err = load_and_prepare(&path).unwrap_err();
        assert!(err.to_string().contains("fetchTimeoutSecs"));
    }
}
