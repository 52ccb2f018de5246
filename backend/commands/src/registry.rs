//! Explicit command registration and the metadata collector.
//!
//! A [`Client`] is an ordered list of [`Method`]s, each carrying its formal
//! signature and whatever command/parameter annotations the author attached.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, trace};

use schemaforge_config::MemberOrder;
use schemaforge_core::{CommandSpec, ParameterSpec, Result, SchemaError, Signature};

/// One registered method: its identity, signature and annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub doc: Option<String>,
    pub signature: Signature,
    pub command: Option<CommandSpec>,
    /// `parameter` annotations, in the order they were attached.
    pub parameters: Vec<ParameterSpec>,
    /// Directory that relative schema/form/template paths resolve against.
    pub source_dir: Option<PathBuf>,
}

impl Method {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            doc: None,
            signature,
            command: None,
            parameters: Vec::new(),
            source_dir: None,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.command = Some(spec);
        self
    }

    pub fn parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Attach several parameters at once from keyword mappings, e.g. ones
    /// loaded from a JSON or YAML file.
    pub fn parameters_from_values(
        mut self,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        for (index, value) in values.into_iter().enumerate() {
            if !value.is_object() {
                return Err(SchemaError::definition(
                    &self.name,
                    format!("parameter #{index} must be a dictionary of parameter keywords"),
                ));
            }
            let key = value
                .get("key")
                .and_then(Value::as_str)
                .map_or_else(|| format!("#{index}"), str::to_string);
            let spec: ParameterSpec =
                serde_json::from_value(value).map_err(|e| SchemaError::InvalidParameter {
                    command: self.name.clone(),
                    key,
                    message: e.to_string(),
                })?;
            self.parameters.push(spec);
        }
        Ok(self)
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Carries command or parameter metadata.
    pub fn is_annotated(&self) -> bool {
        self.command.is_some() || !self.parameters.is_empty()
    }
}

/// The object whose methods become commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Client {
    pub doc: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub source_dir: Option<PathBuf>,
    methods: Vec<Method>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// System name and version used when the system spec leaves them unset.
    pub fn named(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.version = Some(version.into());
        self
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Also register the built-in helper commands.
    pub fn with_default_commands(self) -> Self {
        self.method(crate::defaults::read_log_method())
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn get_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A method selected for compilation, with its raw command. The command's
/// parameter list is the command annotation's own parameters followed by the
/// separately attached ones.
#[derive(Debug, Clone)]
pub struct Collected<'a> {
    pub method: &'a Method,
    pub command: CommandSpec,
}

impl Collected<'_> {
    /// Directory for relative display definition paths.
    pub fn source_dir<'b>(&'b self, client: &'b Client, fallback: Option<&'b Path>) -> Option<&'b Path> {
        self.method
            .source_dir
            .as_deref()
            .or(client.source_dir.as_deref())
            .or(fallback)
    }
}

/// Select the annotated methods of `client` in the requested order.
///
/// Methods without a receiver are free functions, not bound methods, and are
/// never collected.
pub fn collect(client: &Client, order: MemberOrder) -> Vec<Collected<'_>> {
    let mut methods: Vec<&Method> = client.methods.iter().collect();
    if order == MemberOrder::Lexical {
        methods.sort_by(|a, b| a.name.cmp(&b.name));
    }

    methods
        .into_iter()
        .filter(|method| {
            if !method.is_annotated() {
                trace!(method = %method.name, "Skipping method without metadata");
                return false;
            }
            if !method.signature.has_receiver() {
                debug!(method = %method.name, "Skipping annotated function without a receiver");
                return false;
            }
            true
        })
        .map(|method| {
            let mut command = method.command.clone().unwrap_or_default();
            command.parameters.extend(method.parameters.iter().cloned());
            Collected { method, command }
        })
        .collect()
}

/// First line of a doc string, if it has any text.
pub(crate) fn first_line(doc: Option<&str>) -> Option<String> {
    doc.and_then(|d| d.lines().next())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
