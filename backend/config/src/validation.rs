//! Config validation with field paths and user-friendly messages.

use crate::schema::SchemaforgeConfig;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return every error and warning found.
pub fn validate(config: &SchemaforgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_compiler(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_compiler(config: &SchemaforgeConfig, report: &mut ValidationReport) {
    let Some(compiler) = &config.compiler else { return };

    if compiler.fetch_timeout_secs == Some(0) {
        report.error("compiler.fetchTimeoutSecs", "fetchTimeoutSecs must be > 0");
    }
    if compiler.user_agent.as_deref().is_some_and(|ua| ua.trim().is_empty()) {
        report.warn(
            "compiler.userAgent",
            "Empty user agent; some servers reject anonymous requests",
        );
    }
    if let Some(dir) = &compiler.definitions_dir {
        if !dir.is_dir() {
            report.warn(
                "compiler.definitionsDir",
                format!("{} is not a directory; file-backed definitions will fail", dir.display()),
            );
        }
    }
}

fn validate_logging(config: &SchemaforgeConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if logging.level.as_deref().is_some_and(|l| l.trim().is_empty()) {
        report.error("logging.level", "level must not be empty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompilerConfig, LoggingConfig};

    #[test]
    fn default_config_is_valid() {
        let report = validate(&SchemaforgeConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_timeout_is_an_error() {
        let cfg = SchemaforgeConfig {
            compiler: Some(CompilerConfig {
                fetch_timeout_secs: Some(0),
                ..Default::default()
            }),
            logging: None,
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "compiler.fetchTimeoutSecs");
    }

    #[test]
    fn missing_definitions_dir_warns() {
        let cfg = SchemaforgeConfig {
            compiler: Some(CompilerConfig {
                definitions_dir: Some("/definitely/not/here".into()),
                user_agent: Some("  ".into()),
                ..Default::default()
            }),
            logging: None,
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn empty_log_level_is_an_error() {
        let cfg = SchemaforgeConfig {
            compiler: None,
            logging: Some(LoggingConfig {
                level: Some(" ".into()),
                dir: None,
            }),
        };
        assert!(!validate(&cfg).is_valid());
    }
}
