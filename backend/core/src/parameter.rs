//! Parameter types: the raw [`ParameterSpec`] an author writes and the
//! canonical [`Parameter`] the compiler emits.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::choices::{Choices, ChoicesSpec};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Host-language primitive kinds a signature or annotation can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Str,
    Int,
    Float,
    Bool,
    Map,
}

/// Rust types that map onto a [`NativeType`].
pub trait HostType {
    const NATIVE: NativeType;
}

macro_rules! host_type {
    ($native:ident: $($ty:ty),+) => {
        $(impl HostType for $ty {
            const NATIVE: NativeType = NativeType::$native;
        })+
    };
}

host_type!(Str: String, &str);
host_type!(Int: i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
host_type!(Float: f32, f64);
host_type!(Bool: bool);
host_type!(Map: Map<String, Value>);

impl<V> HostType for HashMap<String, V> {
    const NATIVE: NativeType = NativeType::Map;
}

impl<V> HostType for BTreeMap<String, V> {
    const NATIVE: NativeType = NativeType::Map;
}

/// Canonical parameter type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
    Dictionary,
    Bytes,
    DateTime,
    Date,
    Base64,
    Any,
    /// Any other title-cased tag.
    Custom(String),
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "String",
            ParamType::Integer => "Integer",
            ParamType::Float => "Float",
            ParamType::Boolean => "Boolean",
            ParamType::Dictionary => "Dictionary",
            ParamType::Bytes => "Bytes",
            ParamType::DateTime => "DateTime",
            ParamType::Date => "Date",
            ParamType::Base64 => "Base64",
            ParamType::Any => "Any",
            ParamType::Custom(tag) => tag,
        }
    }
}

impl From<NativeType> for ParamType {
    fn from(native: NativeType) -> Self {
        match native {
            NativeType::Str => ParamType::String,
            NativeType::Int => ParamType::Integer,
            NativeType::Float => ParamType::Float,
            NativeType::Bool => ParamType::Boolean,
            NativeType::Map => ParamType::Dictionary,
        }
    }
}

impl From<String> for ParamType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "String" => ParamType::String,
            "Integer" => ParamType::Integer,
            "Float" => ParamType::Float,
            "Boolean" => ParamType::Boolean,
            "Dictionary" => ParamType::Dictionary,
            "Bytes" => ParamType::Bytes,
            "DateTime" => ParamType::DateTime,
            "Date" => ParamType::Date,
            "Base64" => ParamType::Base64,
            "Any" => ParamType::Any,
            _ => ParamType::Custom(tag),
        }
    }
}

impl From<ParamType> for String {
    fn from(t: ParamType) -> Self {
        match t {
            ParamType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type an author declared, before canonicalisation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum TypeSpec {
    Native(NativeType),
    /// A free-form tag such as `"file"`, `"string"` or `"DateTime"`.
    Name(String),
    Canonical(ParamType),
}

impl TypeSpec {
    pub fn of<T: HostType>() -> Self {
        TypeSpec::Native(T::NATIVE)
    }
}

impl From<String> for TypeSpec {
    fn from(s: String) -> Self {
        TypeSpec::Name(s)
    }
}

impl From<&str> for TypeSpec {
    fn from(s: &str) -> Self {
        TypeSpec::Name(s.to_string())
    }
}

impl From<NativeType> for TypeSpec {
    fn from(n: NativeType) -> Self {
        TypeSpec::Native(n)
    }
}

impl From<ParamType> for TypeSpec {
    fn from(t: ParamType) -> Self {
        TypeSpec::Canonical(t)
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// A reusable, already-defined parameter tree. Only consumed during
/// normalisation; never part of a compiled [`Parameter`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub name: String,
    pub parameters: Vec<NestedSpec>,
}

impl Model {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterSpec>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().map(NestedSpec::Parameter).collect(),
        }
    }
}

/// One entry of a nested parameter list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ParameterSpec")]
pub enum NestedSpec {
    Parameter(ParameterSpec),
    /// Deprecated: a whole model listed in place of its parameters.
    Model(Arc<Model>),
}

impl From<ParameterSpec> for NestedSpec {
    fn from(p: ParameterSpec) -> Self {
        NestedSpec::Parameter(p)
    }
}

impl From<Arc<Model>> for NestedSpec {
    fn from(m: Arc<Model>) -> Self {
        NestedSpec::Model(m)
    }
}

// ---------------------------------------------------------------------------
// Raw parameter
// ---------------------------------------------------------------------------

/// A parameter annotation as written by the author. Every field is optional;
/// unset means "infer" (from the signature, the type, or the model).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub param_type: Option<TypeSpec>,
    pub multi: Option<bool>,
    pub display_name: Option<String>,
    pub optional: Option<bool>,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub choices: Option<ChoicesSpec>,
    #[serde(default)]
    pub parameters: Vec<NestedSpec>,
    pub nullable: Option<bool>,
    pub maximum: Option<Number>,
    pub minimum: Option<Number>,
    pub regex: Option<String>,
    pub form_input_type: Option<String>,
    pub type_info: Option<Map<String, Value>>,
    pub is_kwarg: Option<bool>,
    #[serde(skip)]
    pub model: Option<Arc<Model>>,
}

impl ParameterSpec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn param_type(mut self, t: impl Into<TypeSpec>) -> Self {
        self.param_type = Some(t.into());
        self
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = Some(multi);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn choices(mut self, choices: impl Into<ChoicesSpec>) -> Self {
        self.choices = Some(choices.into());
        self
    }

    pub fn parameter(mut self, child: impl Into<NestedSpec>) -> Self {
        self.parameters.push(child.into());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn maximum(mut self, max: impl Into<Number>) -> Self {
        self.maximum = Some(max.into());
        self
    }

    pub fn minimum(mut self, min: impl Into<Number>) -> Self {
        self.minimum = Some(min.into());
        self
    }

    pub fn regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    pub fn form_input_type(mut self, input: impl Into<String>) -> Self {
        self.form_input_type = Some(input.into());
        self
    }

    pub fn is_kwarg(mut self, is_kwarg: bool) -> Self {
        self.is_kwarg = Some(is_kwarg);
        self
    }

    pub fn model(mut self, model: Arc<Model>) -> Self {
        self.model = Some(model);
        self
    }

    /// `default`, treating an explicit `null` as absent.
    pub fn explicit_default(&self) -> Option<&Value> {
        self.default.as_ref().filter(|v| !v.is_null())
    }
}

// ---------------------------------------------------------------------------
// Canonical parameter
// ---------------------------------------------------------------------------

/// A fully normalised parameter. Non-empty `parameters` implies
/// `param_type == Dictionary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub multi: bool,
    pub display_name: Option<String>,
    pub optional: Option<bool>,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub choices: Option<Choices>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub nullable: Option<bool>,
    pub maximum: Option<Number>,
    pub minimum: Option<Number>,
    pub regex: Option<String>,
    pub form_input_type: Option<String>,
    #[serde(default)]
    pub type_info: Map<String, Value>,
    pub is_kwarg: Option<bool>,
}

impl From<Parameter> for ParameterSpec {
    fn from(p: Parameter) -> Self {
        ParameterSpec {
            key: Some(p.key),
            param_type: Some(TypeSpec::Canonical(p.param_type)),
            multi: Some(p.multi),
            display_name: p.display_name,
            optional: p.optional,
            default: p.default,
            description: p.description,
            choices: p.choices.map(ChoicesSpec::Resolved),
            parameters: p
                .parameters
                .into_iter()
                .map(|child| NestedSpec::Parameter(child.into()))
                .collect(),
            nullable: p.nullable,
            maximum: p.maximum,
            minimum: p.minimum,
            regex: p.regex,
            form_input_type: p.form_input_type,
            type_info: (!p.type_info.is_empty()).then_some(p.type_info),
            is_kwarg: p.is_kwarg,
            model: None,
        }
    }
}
