//! Choices: how the allowed values of a parameter are obtained and displayed.
//!
//! [`ChoicesSpec`] is the raw annotation shape (string, mapping, list). The
//! compiler resolves it into a canonical [`Choices`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Where the allowed values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoicesType {
    Static,
    Url,
    Command,
    Reference,
}

impl ChoicesType {
    pub const ALL: [ChoicesType; 4] = [
        ChoicesType::Static,
        ChoicesType::Url,
        ChoicesType::Command,
        ChoicesType::Reference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChoicesType::Static => "static",
            ChoicesType::Url => "url",
            ChoicesType::Command => "command",
            ChoicesType::Reference => "reference",
        }
    }
}

impl fmt::Display for ChoicesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoicesType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::InvalidTag {
                kind: "choices type",
                value: s.to_string(),
                allowed: tag_list(Self::ALL.iter().map(|t| t.as_str())),
            })
    }
}

/// How the UI presents the allowed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoicesDisplay {
    Select,
    Typeahead,
}

impl ChoicesDisplay {
    pub const ALL: [ChoicesDisplay; 2] = [ChoicesDisplay::Select, ChoicesDisplay::Typeahead];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChoicesDisplay::Select => "select",
            ChoicesDisplay::Typeahead => "typeahead",
        }
    }
}

impl fmt::Display for ChoicesDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoicesDisplay {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| SchemaError::InvalidTag {
                kind: "choices display",
                value: s.to_string(),
                allowed: tag_list(Self::ALL.iter().map(|d| d.as_str())),
            })
    }
}

pub(crate) fn tag_list<'a>(tags: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = tags.map(|t| format!("'{t}'")).collect();
    format!("[{}]", quoted.join(", "))
}

// ---------------------------------------------------------------------------
// Parsed details
// ---------------------------------------------------------------------------

/// A parsed command invocation: `name(arg=${param}, ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub name: String,
    /// `(argument name, referenced parameter key)` pairs in source order.
    pub args: Vec<(String, String)>,
}

/// A parsed URL with `${param}` query references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRef {
    pub address: String,
    pub args: Vec<(String, String)>,
}

/// Resolved structure of a choices value. Always consistent with the
/// owning [`Choices::choices_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoicesDetails {
    Command(FunctionRef),
    Url(UrlRef),
    /// Static or reference choices. Serializes as `{}` when there is no key reference.
    Static {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_reference: Option<String>,
    },
}

impl ChoicesDetails {
    pub fn empty() -> Self {
        Self::Static {
            key_reference: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical choices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choices {
    #[serde(rename = "type")]
    pub choices_type: ChoicesType,
    pub display: ChoicesDisplay,
    pub value: Value,
    pub strict: bool,
    pub details: ChoicesDetails,
}

// ---------------------------------------------------------------------------
// Raw annotation shape
// ---------------------------------------------------------------------------

/// The choices shapes an author may write.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ChoicesSpec {
    /// A URL or a command reference.
    Text(String),
    /// `{value, type?, display?, strict?, key_reference?}`
    Mapping(Map<String, Value>),
    /// A literal list of allowed values.
    Values(Vec<Value>),
    /// Already compiled; passes through resolution untouched.
    Resolved(Choices),
    /// Anything else. Falsy scalars count as absent, the rest are rejected.
    Other(Value),
}

impl ChoicesSpec {
    /// Mirrors truthiness of the written value: empty strings, lists and
    /// mappings, `null`, `false` and zero all mean "no choices".
    pub fn is_empty(&self) -> bool {
        match self {
            ChoicesSpec::Text(s) => s.is_empty(),
            ChoicesSpec::Mapping(m) => m.is_empty(),
            ChoicesSpec::Values(v) => v.is_empty(),
            ChoicesSpec::Resolved(_) => false,
            ChoicesSpec::Other(v) => match v {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
                _ => false,
            },
        }
    }
}

impl From<Value> for ChoicesSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ChoicesSpec::Text(s),
            Value::Object(m) => ChoicesSpec::Mapping(m),
            Value::Array(v) => ChoicesSpec::Values(v),
            other => ChoicesSpec::Other(other),
        }
    }
}

impl From<&str> for ChoicesSpec {
    fn from(s: &str) -> Self {
        ChoicesSpec::Text(s.to_string())
    }
}

impl From<String> for ChoicesSpec {
    fn from(s: String) -> Self {
        ChoicesSpec::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for ChoicesSpec {
    fn from(values: Vec<T>) -> Self {
        ChoicesSpec::Values(values.into_iter().map(Into::into).collect())
    }
}

impl From<Choices> for ChoicesSpec {
    fn from(choices: Choices) -> Self {
        ChoicesSpec::Resolved(choices)
    }
}
