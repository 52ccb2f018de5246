//! Structured logging for schemaforge.
//!
//! Handles subscriber initialisation (console plus rolling NDJSON file) and
//! redaction of credentials before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{build_filter, init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
