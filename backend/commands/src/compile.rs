//! The compiler entry points: client in, ordered commands out.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use schemaforge_config::defaults::{default_user_agent, DEFAULT_FETCH_TIMEOUT_SECS};
use schemaforge_config::{CompilerConfig, MemberOrder};
use schemaforge_core::{Command, Result, SchemaError};

use crate::display::{DisplayResolver, Fetcher, HttpFetcher};
use crate::merge::merge_signature;
use crate::normalize::initialize_parameter;
use crate::registry::{collect, Client, Collected};

/// Knobs for one compilation.
#[derive(Clone)]
pub struct CompileOptions {
    pub member_order: MemberOrder,
    /// Base directory for relative display definition paths when neither the
    /// method nor the client names one.
    pub base_dir: Option<PathBuf>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            member_order: MemberOrder::default(),
            base_dir: None,
            fetcher: Arc::new(HttpFetcher::new(
                Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
                default_user_agent(),
            )),
        }
    }
}

impl std::fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileOptions")
            .field("member_order", &self.member_order)
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl CompileOptions {
    pub fn from_config(config: &CompilerConfig) -> Self {
        let timeout = config.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let user_agent = config.user_agent.clone().unwrap_or_else(default_user_agent);
        Self {
            member_order: config.member_order.unwrap_or_default(),
            base_dir: config.definitions_dir.clone(),
            fetcher: Arc::new(HttpFetcher::new(Duration::from_secs(timeout), user_agent)),
        }
    }

    pub fn member_order(mut self, order: MemberOrder) -> Self {
        self.member_order = order;
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }
}

/// Compile `client` with default options.
pub fn parse_client(client: &Client) -> Result<Vec<Command>> {
    compile_client(client, &CompileOptions::default())
}

/// Compile every annotated method of `client`. Fails on the first error.
pub fn compile_client(client: &Client, options: &CompileOptions) -> Result<Vec<Command>> {
    let commands = collect(client, options.member_order)
        .iter()
        .map(|collected| compile_command(client, collected, options))
        .collect::<Result<Vec<_>>>()?;

    info!(commands = commands.len(), "Compiled client");
    Ok(commands)
}

/// Merge, resolve and normalise a single collected method.
pub fn compile_command(
    client: &Client,
    collected: &Collected<'_>,
    options: &CompileOptions,
) -> Result<Command> {
    let merged = merge_signature(collected);
    let name = merged.name;
    let spec = merged.spec;
    debug!(command = %name, parameters = spec.parameters.len(), "Compiling command");

    let base_dir = collected.source_dir(client, options.base_dir.as_deref());
    if base_dir.is_none() {
        debug!(
            command = %name,
            "No source directory set; relative definition paths resolve against the working directory"
        );
    }
    let display = DisplayResolver::new(base_dir, options.fetcher.as_ref()).resolve(
        &name,
        spec.schema,
        spec.form,
        spec.template,
    )?;

    let signature = &collected.method.signature;
    let parameters = spec
        .parameters
        .into_iter()
        .map(|param| initialize_parameter(param, &name, Some(signature)))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    if let Some(dup) = parameters.iter().find(|p| !seen.insert(p.key.as_str())) {
        return Err(SchemaError::definition(
            &name,
            format!("duplicate parameter key '{}'", dup.key),
        ));
    }

    Ok(Command {
        name,
        description: spec.description,
        parameters,
        command_type: spec.command_type,
        output_type: spec.output_type,
        schema: display.schema,
        form: display.form,
        template: display.template,
        icon_name: spec.icon_name,
        hidden: spec.hidden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Method;
    use schemaforge_core::{CommandSpec, ParameterSpec, Signature};
    use serde_json::json;

    #[test]
    fn options_from_config() {
        let config = CompilerConfig {
            definitions_dir: Some("/defs".into()),
            member_order: Some(MemberOrder::Lexical),
            fetch_timeout_secs: Some(3),
            user_agent: None,
        };
        let options = CompileOptions::from_config(&config);
        assert_eq!(options.member_order, MemberOrder::Lexical);
        assert_eq!(options.base_dir, Some(PathBuf::from("/defs")));
    }

    #[test]
    fn duplicate_keys_fail() {
        let client = Client::new().method(
            Method::new("m", Signature::method().arg("a"))
                .parameter(ParameterSpec::new("a"))
                .parameter(ParameterSpec::new("a")),
        );
        let err = parse_client(&client).unwrap_err();
        assert!(err.to_string().contains("duplicate parameter key 'a'"));
    }

    #[test]
    fn first_error_aborts() {
        let client = Client::new()
            .method(Method::new("ok", Signature::method()).command(CommandSpec::new()))
            .method(
                Method::new("bad", Signature::method())
                    .parameter(ParameterSpec::new("typo").is_kwarg(false)),
            );
        let err = parse_client(&client).unwrap_err();
        assert!(matches!(err, SchemaError::Signature { ref command, .. } if command == "bad"));
    }

    #[test]
    fn relative_paths_fall_back_to_working_directory() {
        let client = Client::new().method(
            Method::new("render", Signature::method())
                .command(CommandSpec::new().template("./Cargo.toml")),
        );
        let commands = parse_client(&client).unwrap();
        let template = commands[0].template.as_ref().and_then(|t| t.as_str()).unwrap();
        assert!(template.contains("schemaforge-commands"));
    }

    #[test]
    fn compiles_command_fields() {
        let client = Client::new().method(
            Method::new("echo", Signature::method().typed::<String>("message"))
                .doc("Echo a message.")
                .command(
                    CommandSpec::new()
                        .output_type(schemaforge_core::OutputType::Json)
                        .icon_name("fa-beer")
                        .form(json!(["message"])),
                ),
        );
        let commands = parse_client(&client).unwrap();
        let echo = &commands[0];
        assert_eq!(echo.name, "echo");
        assert_eq!(echo.description.as_deref(), Some("Echo a message."));
        assert_eq!(echo.icon_name.as_deref(), Some("fa-beer"));
        assert_eq!(echo.form, Some(json!({"type": "fieldset", "items": ["message"]})));
        let message = echo.get_parameter_by_key("message").unwrap();
        assert_eq!(message.param_type, schemaforge_core::ParamType::String);
        assert_eq!(message.optional, Some(false));
    }
}
