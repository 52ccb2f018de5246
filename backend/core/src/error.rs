use thiserror::Error;

/// The single error kind raised while compiling a client into commands.
///
/// Every variant carries enough context (command, parameter key, field, raw
/// value) for the author to find the offending annotation directly.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("attempted to create a parameter without a key (command '{command}')")]
    MissingKey { command: String },

    #[error("invalid parameter '{key}' for command '{command}': {message}")]
    InvalidParameter {
        command: String,
        key: String,
        message: String,
    },

    #[error("invalid choices for parameter '{key}': {message}")]
    InvalidChoices { key: String, message: String },

    #[error("invalid choices definition for parameter '{key}' - unable to parse '{raw}'")]
    ChoicesSyntax { key: String, raw: String },

    #[error("parameter '{key}' does not match the signature of '{command}': {message}")]
    Signature {
        command: String,
        key: String,
        message: String,
    },

    #[error("error reading {field} definition from '{raw}' for command '{command}': {message}")]
    Display {
        command: String,
        field: String,
        raw: String,
        message: String,
    },

    #[error("{field} specified for command '{command}' was not a definition, file path, or URL")]
    DisplayShape { command: String, field: String },

    #[error("invalid {kind} '{value}' - valid options are {allowed}")]
    InvalidTag {
        kind: &'static str,
        value: String,
        allowed: String,
    },

    #[error("invalid definition for '{name}': {message}")]
    Definition { name: String, message: String },
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

impl SchemaError {
    pub fn definition(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Definition {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn choices(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidChoices {
            key: key.into(),
            message: message.into(),
        }
    }
}
