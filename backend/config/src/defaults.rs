//! Config defaults: fills every unset field of a freshly loaded config.

use crate::schema::{CompilerConfig, LoggingConfig, MemberOrder, SchemaforgeConfig};
use std::path::PathBuf;

/// Default timeout for URL-backed display definitions.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_LOG_DIR: &str = "logs";

pub fn default_user_agent() -> String {
    format!("schemaforge/{}", env!("CARGO_PKG_VERSION"))
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SchemaforgeConfig) -> SchemaforgeConfig {
    let config = apply_compiler_defaults(config);
    apply_logging_defaults(config)
}

fn apply_compiler_defaults(mut config: SchemaforgeConfig) -> SchemaforgeConfig {
    let compiler = config.compiler.get_or_insert_with(CompilerConfig::default);
    compiler.member_order.get_or_insert(MemberOrder::Declaration);
    compiler
        .fetch_timeout_secs
        .get_or_insert(DEFAULT_FETCH_TIMEOUT_SECS);
    compiler.user_agent.get_or_insert_with(default_user_agent);
    config
}

fn apply_logging_defaults(mut config: SchemaforgeConfig) -> SchemaforgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.dir.get_or_insert_with(|| PathBuf::from(DEFAULT_LOG_DIR));
    config
}
