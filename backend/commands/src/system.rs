//! System assembly: wraps a compiled client into a registrable [`System`].

use std::collections::HashSet;

use tracing::info;

use schemaforge_core::{
    Command, Instance, Result, SchemaError, System, SystemSpec, DEFAULT_INSTANCE_NAME,
};

use crate::compile::{compile_client, CompileOptions};
use crate::registry::{first_line, Client};

/// Build a [`System`] from already compiled commands.
///
/// Name and version come from `spec`, else from the client. The description
/// defaults to the first line of the client's doc text.
pub fn build_system(client: &Client, spec: SystemSpec, commands: Vec<Command>) -> Result<System> {
    let name = spec
        .name
        .or_else(|| client.name.clone())
        .ok_or_else(|| SchemaError::definition("system", "a system name is required"))?;
    let version = spec
        .version
        .or_else(|| client.version.clone())
        .ok_or_else(|| {
            SchemaError::definition(&name, "a system version is required")
        })?;

    let mut seen = HashSet::new();
    if let Some(dup) = commands.iter().find(|c| !seen.insert(c.name.as_str())) {
        return Err(SchemaError::definition(
            &name,
            format!("duplicate command name '{}'", dup.name),
        ));
    }

    let instance_name = spec
        .instance_name
        .unwrap_or_else(|| DEFAULT_INSTANCE_NAME.to_string());

    let system = System {
        description: spec
            .description
            .or_else(|| first_line(client.doc.as_deref())),
        display_name: spec.display_name,
        icon_name: spec.icon_name,
        metadata: spec.metadata,
        instances: vec![Instance {
            name: instance_name,
        }],
        max_instances: spec.max_instances.filter(|n| *n > 0).unwrap_or(1),
        commands,
        name,
        version,
    };

    info!(
        system = %system.name,
        version = %system.version,
        commands = system.commands.len(),
        "Assembled system"
    );
    Ok(system)
}

/// Compile `client` and assemble the result into a [`System`].
pub fn compile_system(client: &Client, spec: SystemSpec, options: &CompileOptions) -> Result<System> {
    let commands = compile_client(client, options)?;
    build_system(client, spec, commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Method;
    use schemaforge_core::{CommandSpec, Signature};

    fn client() -> Client {
        Client::new()
            .doc("Says hello.\nAnd more.")
            .named("hello", "1.0.0")
            .method(Method::new("greet", Signature::method()).command(CommandSpec::new()))
    }

    #[test]
    fn defaults_come_from_client() {
        let client = client();
        let system = compile_system(&client, SystemSpec::default(), &CompileOptions::default())
            .unwrap();
        assert_eq!(system.name, "hello");
        assert_eq!(system.version, "1.0.0");
        assert_eq!(system.description.as_deref(), Some("Says hello."));
        assert_eq!(system.instances, vec![Instance { name: "default".into() }]);
        assert_eq!(system.max_instances, 1);
        assert!(system.get_command_by_name("greet").is_some());
    }

    #[test]
    fn spec_overrides_client() {
        let spec = SystemSpec::new("other", "2.0")
            .description("Explicit")
            .instance_name("i1")
            .max_instances(3)
            .metadata("team", "ops");
        let system = build_system(&client(), spec, vec![]).unwrap();
        assert_eq!(system.name, "other");
        assert_eq!(system.description.as_deref(), Some("Explicit"));
        assert!(system.has_instance("i1"));
        assert_eq!(system.max_instances, 3);
        assert_eq!(system.metadata["team"], "ops");
    }

    #[test]
    fn name_and_version_required() {
        let err = build_system(&Client::new(), SystemSpec::default(), vec![]).unwrap_err();
        assert!(err.to_string().contains("name is required"));

        let spec = SystemSpec {
            name: Some("x".into()),
            ..Default::default()
        };
        let err = build_system(&Client::new(), spec, vec![]).unwrap_err();
        assert!(err.to_string().contains("version is required"));
    }

    #[test]
    fn duplicate_command_names_fail() {
        let client = client();
        let commands = compile_client(&client, &CompileOptions::default()).unwrap();
        let doubled = [commands.clone(), commands].concat();
        let err = build_system(&client, SystemSpec::default(), doubled).unwrap_err();
        assert!(err.to_string().contains("duplicate command name 'greet'"));
    }
}
