//! Reconciles a collected command's declared parameters with the method's
//! formal signature.

use schemaforge_core::{CommandSpec, ParameterSpec, TypeSpec};

use crate::registry::{first_line, Collected};

/// A command after signature merging, before parameter normalisation.
#[derive(Debug, Clone)]
pub struct MergedCommand {
    pub name: String,
    pub spec: CommandSpec,
}

/// Name the command after its method, default the description from the doc
/// string, and make sure every named formal has a parameter.
pub fn merge_signature(collected: &Collected<'_>) -> MergedCommand {
    let method = collected.method;
    let signature = &method.signature;
    let mut spec = collected.command.clone();

    if spec.description.is_none() {
        spec.description = first_line(method.doc.as_deref());
    }

    for param in &mut spec.parameters {
        let Some(formal) = param.key.as_deref().and_then(|key| signature.find(key)) else {
            continue;
        };
        if !formal.is_named() {
            continue;
        }
        if param.optional.is_none() && formal.default_value().is_none() {
            param.optional = Some(false);
        }
        if param.param_type.is_none() {
            param.param_type = formal.annotation.map(TypeSpec::Native);
        }
    }

    let declared: Vec<String> = spec.parameters.iter().filter_map(|p| p.key.clone()).collect();
    for formal in signature.named() {
        if declared.iter().any(|key| key == &formal.name) {
            continue;
        }
        let mut synthesized = ParameterSpec::new(formal.name.clone()).optional(false);
        synthesized.param_type = formal.annotation.map(TypeSpec::Native);
        spec.parameters.push(synthesized);
    }

    MergedCommand {
        name: method.name.clone(),
        spec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{collect, Client, Method};
    use schemaforge_config::MemberOrder;
    use schemaforge_core::{NativeType, Signature};

    fn merged(method: Method) -> MergedCommand {
        let client = Client::new().method(method);
        let collected = collect(&client, MemberOrder::Declaration);
        merge_signature(&collected[0])
    }

    #[test]
    fn synthesizes_missing_formals_in_order() {
        let m = merged(
            Method::new("add", Signature::method().arg("a").arg_default("b", 5))
                .doc("Add two numbers.\nLonger text")
                .command(CommandSpec::new()),
        );
        assert_eq!(m.name, "add");
        assert_eq!(m.spec.description.as_deref(), Some("Add two numbers."));
        let keys: Vec<_> = m.spec.parameters.iter().map(|p| p.key.clone().unwrap()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(m.spec.parameters.iter().all(|p| p.optional == Some(false)));
        // Defaults are adopted later, during normalisation.
        assert!(m.spec.parameters[1].default.is_none());
    }

    #[test]
    fn declared_first_then_leftovers() {
        let m = merged(
            Method::new("m", Signature::method().arg("a").arg("b").arg_default("c", 1))
                .parameter(ParameterSpec::new("c"))
                .parameter(ParameterSpec::new("b").optional(true)),
        );
        let keys: Vec<_> = m.spec.parameters.iter().map(|p| p.key.clone().unwrap()).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
        // Defaulted formal keeps an unset optional; explicit value wins.
        assert_eq!(m.spec.parameters[0].optional, None);
        assert_eq!(m.spec.parameters[1].optional, Some(true));
        assert_eq!(m.spec.parameters[2].optional, Some(false));
    }

    #[test]
    fn required_formal_marks_declared_required() {
        let m = merged(Method::new("m", Signature::method().arg("a")).parameter(ParameterSpec::new("a")));
        assert_eq!(m.spec.parameters[0].optional, Some(false));
    }

    #[test]
    fn receiver_and_variadics_are_not_synthesized() {
        let m = merged(
            Method::new("m", Signature::method().var_args("args").var_kwargs("kwargs"))
                .command(CommandSpec::new()),
        );
        assert!(m.spec.parameters.is_empty());
    }

    #[test]
    fn annotations_fill_missing_types() {
        let m = merged(
            Method::new("m", Signature::method().typed::<i64>("n").typed::<String>("s"))
                .parameter(ParameterSpec::new("s").param_type("Base64")),
        );
        assert_eq!(m.spec.parameters[0].param_type, Some("Base64".into()));
        assert_eq!(
            m.spec.parameters[1].param_type,
            Some(TypeSpec::Native(NativeType::Int))
        );
    }

    #[test]
    fn explicit_description_wins() {
        let m = merged(
            Method::new("m", Signature::method())
                .doc("From doc")
                .command(CommandSpec::new().description("Explicit")),
        );
        assert_eq!(m.spec.description.as_deref(), Some("Explicit"));
    }
}
