//! Parameter normalisation: canonical types, kwarg validation, type fix-ups
//! and recursive expansion of nested parameters and models.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use schemaforge_core::{
    NestedSpec, ParamKind, ParamType, Parameter, ParameterSpec, Result, SchemaError, Signature,
    TypeSpec,
};

use crate::choices::resolve_choices;

/// Canonical type tag for a declared type.
pub fn format_type(declared: Option<&TypeSpec>) -> ParamType {
    match declared {
        None => ParamType::Any,
        Some(TypeSpec::Native(native)) => (*native).into(),
        Some(TypeSpec::Canonical(canonical)) => canonical.clone(),
        Some(TypeSpec::Name(name)) => match name.to_lowercase().as_str() {
            "" => ParamType::Any,
            "file" => ParamType::Bytes,
            "datetime" => ParamType::DateTime,
            _ => ParamType::from(title_case(name)),
        },
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Normalise one parameter of `command`.
///
/// `signature` is only given for top-level parameters; it enables the kwarg
/// consistency check and default adoption.
pub fn initialize_parameter(
    spec: ParameterSpec,
    command: &str,
    signature: Option<&Signature>,
) -> Result<Parameter> {
    let Some(key) = spec.key.clone() else {
        return Err(SchemaError::MissingKey {
            command: command.to_string(),
        });
    };

    let mut param_type = format_type(spec.param_type.as_ref());
    let choices = resolve_choices(spec.choices.clone(), &key)?;

    let mut default = spec.explicit_default().cloned();
    if let Some(signature) = signature {
        let signature_default = validate_kwargness(&spec, &key, command, signature)?;
        if default.is_none() {
            default = signature_default;
        }
    }

    let mut type_info = spec.type_info.clone().unwrap_or_default();
    if param_type == ParamType::Bytes {
        type_info = gridfs_type_info();
    }
    if param_type == ParamType::Base64 {
        default = None;
    }

    let mut parameters = Vec::new();
    if !spec.parameters.is_empty() {
        param_type = ParamType::Dictionary;
        parameters = generate_nested_params(spec.parameters, command)?;
    } else if let Some(model) = &spec.model {
        param_type = ParamType::Dictionary;
        parameters = generate_nested_params(model.parameters.clone(), command)?;

        if !spec.nullable.unwrap_or(false) && default.is_none() {
            default = Some(model_default(&parameters));
        }
    }

    debug!(command, key = %key, param_type = %param_type, "Normalized parameter");

    Ok(Parameter {
        key,
        param_type,
        multi: spec.multi.unwrap_or(false),
        display_name: spec.display_name,
        optional: spec.optional,
        default,
        description: spec.description,
        choices,
        parameters,
        nullable: spec.nullable,
        maximum: spec.maximum,
        minimum: spec.minimum,
        regex: spec.regex,
        form_input_type: spec.form_input_type,
        type_info,
        is_kwarg: spec.is_kwarg,
    })
}

fn gridfs_type_info() -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("storage".to_string(), json!("gridfs"));
    info
}

/// Default for a model-backed parameter: each child's own default, keyed by
/// child key. Children without a default are left out, as are nested children
/// whose own synthesised default came out empty.
fn model_default(children: &[Parameter]) -> Value {
    let defaults: Map<String, Value> = children
        .iter()
        .filter_map(|child| {
            child
                .default
                .as_ref()
                .filter(|d| !d.is_null())
                .filter(|d| !(is_empty_mapping(d) && !child.parameters.is_empty()))
                .map(|d| (child.key.clone(), d.clone()))
        })
        .collect();
    Value::Object(defaults)
}

fn is_empty_mapping(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

/// Normalise a nested parameter list. Models listed in place of parameters
/// are spliced in with a deprecation warning.
pub fn generate_nested_params(entries: Vec<NestedSpec>, command: &str) -> Result<Vec<Parameter>> {
    let mut initialized = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            NestedSpec::Parameter(spec) => {
                initialized.push(initialize_parameter(spec, command, None)?);
            }
            NestedSpec::Model(model) => {
                warn!(
                    command,
                    model = %model.name,
                    "Constructing a nested parameters list using a model is deprecated; \
                     pass the model's parameter list directly"
                );
                initialized.extend(generate_nested_params(model.parameters.clone(), command)?);
            }
        }
    }
    Ok(initialized)
}

/// Check a top-level parameter against its method signature. Returns the
/// signature default to adopt, if any.
pub fn validate_kwargness(
    spec: &ParameterSpec,
    key: &str,
    command: &str,
    signature: &Signature,
) -> Result<Option<Value>> {
    let mismatch = |message: &str| SchemaError::Signature {
        command: command.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    };

    let Some(formal) = signature.find(key) else {
        if spec.is_kwarg == Some(false) {
            return Err(mismatch(
                "parameter was not marked as part of kwargs and wasn't found in the method \
                 signature (should is_kwarg be true?)",
            ));
        }
        if !signature.has_var_keyword() {
            return Err(mismatch(
                "parameter is not in the method signature and the signature does not \
                 declare a **kwargs parameter",
            ));
        }
        return Ok(None);
    };

    if spec.is_kwarg == Some(true) {
        return Err(mismatch(
            "parameter was marked as part of kwargs but was found in the method signature \
             (should is_kwarg be false?)",
        ));
    }
    if formal.kind == ParamKind::PositionalOnly {
        return Err(mismatch("positional-only parameters are not supported"));
    }

    Ok(formal.default_value().cloned())
}
