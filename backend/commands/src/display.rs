//! Schema, form and template resolution from inline values, files or URLs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use once_cell::sync::OnceCell;
use serde_json::{json, Value};
use tracing::{debug, info};

use schemaforge_core::{Result, SchemaError};
use schemaforge_logging::redact_sensitive_data;

use crate::choices::is_url;

/// A fetched remote definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub content_type: Option<String>,
    pub body: String,
}

impl Fetched {
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
    }
}

/// Retrieves URL-backed display definitions.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> anyhow::Result<Fetched>;
}

/// Blocking HTTP fetcher. The client is built on first use.
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
    client: OnceCell<reqwest::blocking::Client>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> anyhow::Result<&reqwest::blocking::Client> {
        self.client.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(self.user_agent.clone())
                .build()
                .context("Failed to build HTTP client")
        })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Fetched> {
        let response = self.client()?.get(url).send()?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;
        Ok(Fetched { content_type, body })
    }
}

/// One of a command's display definition fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayField {
    Schema,
    Form,
    Template,
}

impl DisplayField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayField::Schema => "schema",
            DisplayField::Form => "form",
            DisplayField::Template => "template",
        }
    }
}

impl fmt::Display for DisplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Materialised schema, form and template of one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayDefinitions {
    pub schema: Option<Value>,
    pub form: Option<Value>,
    pub template: Option<Value>,
}

/// Resolves display definitions for commands defined in `base_dir`.
pub struct DisplayResolver<'a> {
    base_dir: Option<&'a Path>,
    fetcher: &'a dyn Fetcher,
}

impl<'a> DisplayResolver<'a> {
    pub fn new(base_dir: Option<&'a Path>, fetcher: &'a dyn Fetcher) -> Self {
        Self { base_dir, fetcher }
    }

    pub fn resolve(
        &self,
        command: &str,
        schema: Option<Value>,
        form: Option<Value>,
        template: Option<Value>,
    ) -> Result<DisplayDefinitions> {
        Ok(DisplayDefinitions {
            schema: self.resolve_field(command, DisplayField::Schema, schema)?,
            form: self.resolve_field(command, DisplayField::Form, form)?,
            template: self.resolve_field(command, DisplayField::Template, template)?,
        })
    }

    pub fn resolve_field(
        &self,
        command: &str,
        field: DisplayField,
        value: Option<Value>,
    ) -> Result<Option<Value>> {
        let shape_error = || SchemaError::DisplayShape {
            command: command.to_string(),
            field: field.to_string(),
        };

        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => self
                .load(command, field, &raw)
                .map(Some)
                .map_err(|e| SchemaError::Display {
                    command: command.to_string(),
                    field: field.to_string(),
                    raw,
                    message: format!("{e:#}"),
                }),
            Some(Value::Object(map)) if field != DisplayField::Template => {
                Ok(Some(Value::Object(map)))
            }
            Some(Value::Array(items)) if field == DisplayField::Form => {
                Ok(Some(json!({"type": "fieldset", "items": items})))
            }
            Some(_) => Err(shape_error()),
        }
    }

    fn load(&self, command: &str, field: DisplayField, raw: &str) -> anyhow::Result<Value> {
        if is_url(raw) {
            debug!(command, field = %field, url = %redact_sensitive_data(raw), "Fetching display definition");
            let fetched = self.fetcher.fetch(raw)?;
            return if fetched.is_json() {
                serde_json::from_str(&fetched.body).context("Response is not valid JSON")
            } else {
                Ok(Value::String(fetched.body))
            };
        }

        if raw.starts_with('/') || raw.starts_with('.') {
            let path = self.path_for(raw);
            info!(command, field = %field, path = %path.display(), "Loading display definition");
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return if field == DisplayField::Template {
                Ok(Value::String(contents))
            } else {
                serde_json::from_str(&contents)
                    .with_context(|| format!("{} is not valid JSON", path.display()))
            };
        }

        if field == DisplayField::Template {
            return Ok(Value::String(raw.to_string()));
        }

        Err(anyhow!(SchemaError::DisplayShape {
            command: command.to_string(),
            field: field.to_string(),
        }))
    }

    /// Absolute paths are used as-is; relative ones resolve against the
    /// defining source's directory, or the working directory when none is known.
    fn path_for(&self, raw: &str) -> PathBuf {
        match self.base_dir {
            Some(base) => base.join(raw),
            None => PathBuf::from(raw),
        }
    }
}
