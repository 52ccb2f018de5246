use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::command::Command;

pub const DEFAULT_INSTANCE_NAME: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
}

/// Identifying data for a system, supplied by the host program.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemSpec {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub icon_name: Option<String>,
    pub metadata: Map<String, Value>,
    pub instance_name: Option<String>,
    pub max_instances: Option<u32>,
}

impl SystemSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn icon_name(mut self, icon: impl Into<String>) -> Self {
        self.icon_name = Some(icon.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    pub fn max_instances(mut self, max: u32) -> Self {
        self.max_instances = Some(max);
        self
    }
}

/// The registration payload: a named, versioned set of compiled commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub icon_name: Option<String>,
    pub metadata: Map<String, Value>,
    pub instances: Vec<Instance>,
    pub max_instances: u32,
    pub commands: Vec<Command>,
}

impl System {
    pub fn get_command_by_name(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn has_instance(&self, name: &str) -> bool {
        self.instances.iter().any(|i| i.name == name)
    }
}
