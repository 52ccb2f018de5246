use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::choices::tag_list;
use crate::error::SchemaError;
use crate::parameter::{Parameter, ParameterSpec};

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandType {
    #[default]
    Action,
    Info,
    Ephemeral,
    Admin,
}

impl CommandType {
    pub const ALL: [CommandType; 4] = [
        CommandType::Action,
        CommandType::Info,
        CommandType::Ephemeral,
        CommandType::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Action => "ACTION",
            CommandType::Info => "INFO",
            CommandType::Ephemeral => "EPHEMERAL",
            CommandType::Admin => "ADMIN",
        }
    }
}

impl FromStr for CommandType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::InvalidTag {
                kind: "command type",
                value: s.to_string(),
                allowed: tag_list(Self::ALL.iter().map(|t| t.as_str())),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputType {
    #[default]
    String,
    Json,
    Xml,
    Html,
    Js,
    Css,
}

impl OutputType {
    pub const ALL: [OutputType; 6] = [
        OutputType::String,
        OutputType::Json,
        OutputType::Xml,
        OutputType::Html,
        OutputType::Js,
        OutputType::Css,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::String => "STRING",
            OutputType::Json => "JSON",
            OutputType::Xml => "XML",
            OutputType::Html => "HTML",
            OutputType::Js => "JS",
            OutputType::Css => "CSS",
        }
    }
}

impl FromStr for OutputType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::InvalidTag {
                kind: "output type",
                value: s.to_string(),
                allowed: tag_list(Self::ALL.iter().map(|t| t.as_str())),
            })
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Raw command annotation
// ---------------------------------------------------------------------------

/// The command annotation attached to a method. The name is never written
/// here; it always comes from the method itself.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandSpec {
    pub description: Option<String>,
    pub parameters: Vec<ParameterSpec>,
    pub command_type: CommandType,
    pub output_type: OutputType,
    /// Inline mapping, file path or URL.
    pub schema: Option<Value>,
    /// Inline mapping, list of fields, file path or URL.
    pub form: Option<Value>,
    /// Inline text, file path or URL.
    pub template: Option<Value>,
    pub icon_name: Option<String>,
    pub hidden: bool,
}

impl CommandSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameter(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn command_type(mut self, command_type: CommandType) -> Self {
        self.command_type = command_type;
        self
    }

    pub fn output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    pub fn schema(mut self, schema: impl Into<Value>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn form(mut self, form: impl Into<Value>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn template(mut self, template: impl Into<Value>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn icon_name(mut self, icon: impl Into<String>) -> Self {
        self.icon_name = Some(icon.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

// ---------------------------------------------------------------------------
// Canonical command
// ---------------------------------------------------------------------------

/// A compiled, immutable description of one invokable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub command_type: CommandType,
    pub output_type: OutputType,
    pub schema: Option<Value>,
    pub form: Option<Value>,
    pub template: Option<Value>,
    pub icon_name: Option<String>,
    pub hidden: bool,
}

impl Command {
    pub fn parameter_keys(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.key.as_str())
    }

    pub fn get_parameter_by_key(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_defaults() {
        let spec = CommandSpec::new();
        assert_eq!(spec.command_type, CommandType::Action);
        assert_eq!(spec.output_type, OutputType::String);
        assert!(!spec.hidden);
    }

    #[test]
    fn spec_rejects_unknown_command_type() {
        let result: Result<CommandSpec, _> =
            serde_json::from_value(json!({"command_type": "BATCH"}));
        assert!(result.is_err());

        let spec: CommandSpec =
            serde_json::from_value(json!({"command_type": "INFO", "output_type": "JSON"}))
                .unwrap();
        assert_eq!(spec.command_type, CommandType::Info);
        assert_eq!(spec.output_type, OutputType::Json);
    }

    #[test]
    fn tags_from_str() {
        assert_eq!("ADMIN".parse::<CommandType>().unwrap(), CommandType::Admin);
        assert!("admin".parse::<CommandType>().is_err());
        assert_eq!("HTML".parse::<OutputType>().unwrap(), OutputType::Html);
    }
}
