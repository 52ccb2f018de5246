//! Choices resolution: turns a raw [`ChoicesSpec`] into canonical [`Choices`].

pub mod grammar;

pub use grammar::{parse, parse_function, parse_reference, parse_url, GrammarError, ParseHint, Parsed};

use serde_json::{Map, Value};
use tracing::trace;

use schemaforge_core::{
    Choices, ChoicesDetails, ChoicesDisplay, ChoicesSpec, ChoicesType, Result, SchemaError,
};

/// Collections up to this size render as a select box, larger ones as a typeahead.
pub const SELECT_DISPLAY_LIMIT: usize = 50;

/// Resolve a parameter's choices. Absent or falsy input yields `None`.
pub fn resolve_choices(spec: Option<ChoicesSpec>, key: &str) -> Result<Option<Choices>> {
    let Some(spec) = spec.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let (value, choices_type, choices_display, strict, key_reference) = match spec {
        ChoicesSpec::Resolved(choices) => return Ok(Some(choices)),
        ChoicesSpec::Mapping(map) => from_mapping(map, key)?,
        ChoicesSpec::Text(text) => {
            let value = Value::String(text);
            let choices_type = infer_type(&value);
            (value, choices_type, ChoicesDisplay::Typeahead, true, None)
        }
        ChoicesSpec::Values(values) => {
            let value = Value::Array(values);
            let display = infer_display(&value);
            (value, ChoicesType::Static, display, true, None)
        }
        ChoicesSpec::Other(_) => {
            return Err(SchemaError::choices(
                key,
                "invalid 'choices': must be a string, dictionary, or list",
            ))
        }
    };

    let details = resolve_details(key, choices_type, &value, key_reference)?;
    trace!(key, choices_type = %choices_type, display = %choices_display, "Resolved choices");

    Ok(Some(Choices {
        choices_type,
        display: choices_display,
        value,
        strict,
        details,
    }))
}

type Resolved = (Value, ChoicesType, ChoicesDisplay, bool, Option<Value>);

fn from_mapping(mut map: Map<String, Value>, key: &str) -> Result<Resolved> {
    let value = match map.remove("value") {
        Some(v) if is_truthy(&v) => v,
        _ => {
            return Err(SchemaError::choices(
                key,
                "no 'value' provided for choices. You must at least provide valid values.",
            ))
        }
    };
    if !matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_)) {
        return Err(SchemaError::choices(
            key,
            format!("invalid choices value '{value}' - must be a string, list or dictionary"),
        ));
    }

    let choices_type = match map.get("type") {
        None | Some(Value::Null) => infer_type(&value),
        Some(raw) => {
            let choices_type: ChoicesType = tag(raw)
                .parse()
                .map_err(|e: SchemaError| SchemaError::choices(key, e.to_string()))?;
            check_value_shape(key, choices_type, &value)?;
            choices_type
        }
    };

    let display = match map.get("display") {
        None | Some(Value::Null) => infer_display(&value),
        Some(raw) => tag(raw)
            .parse()
            .map_err(|e: SchemaError| SchemaError::choices(key, e.to_string()))?,
    };

    let strict = map.get("strict").map_or(true, is_truthy);

    Ok((value, choices_type, display, strict, map.remove("key_reference")))
}

/// Non-string tags are rendered as JSON so they fail the allow-list check.
fn tag(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn infer_display(value: &Value) -> ChoicesDisplay {
    let len = match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => return ChoicesDisplay::Typeahead,
    };
    if len <= SELECT_DISPLAY_LIMIT {
        ChoicesDisplay::Select
    } else {
        ChoicesDisplay::Typeahead
    }
}

fn infer_type(value: &Value) -> ChoicesType {
    match value {
        Value::String(s) if is_url(s) => ChoicesType::Url,
        Value::String(_) => ChoicesType::Command,
        Value::Object(map) if map.contains_key("command") => ChoicesType::Command,
        _ => ChoicesType::Static,
    }
}

pub(crate) fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn check_value_shape(key: &str, choices_type: ChoicesType, value: &Value) -> Result<()> {
    let (ok, allowed) = match choices_type {
        ChoicesType::Command => (
            matches!(value, Value::String(_) | Value::Object(_)),
            "('string', 'dictionary')",
        ),
        ChoicesType::Url => (matches!(value, Value::String(_)), "('string')"),
        ChoicesType::Static => (
            matches!(value, Value::Array(_) | Value::Object(_)),
            "('list', 'dictionary')",
        ),
        ChoicesType::Reference => (matches!(value, Value::String(_)), "('string')"),
    };
    if ok {
        return Ok(());
    }
    Err(SchemaError::choices(
        key,
        format!(
            "invalid choices value type '{}' - valid value types for choice type '{choices_type}' are {allowed}",
            shape_name(value)
        ),
    ))
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dictionary",
    }
}

fn resolve_details(
    key: &str,
    choices_type: ChoicesType,
    value: &Value,
    key_reference: Option<Value>,
) -> Result<ChoicesDetails> {
    let syntax = |raw: &str| SchemaError::ChoicesSyntax {
        key: key.to_string(),
        raw: raw.to_string(),
    };

    match (choices_type, value) {
        (ChoicesType::Command, Value::String(raw)) => parse_function(raw)
            .map(ChoicesDetails::Command)
            .map_err(|_| syntax(raw)),
        (ChoicesType::Command, Value::Object(map)) => match map.get("command") {
            Some(Value::String(raw)) => parse_function(raw)
                .map(ChoicesDetails::Command)
                .map_err(|_| syntax(raw)),
            _ => Err(SchemaError::choices(
                key,
                "a command choices dictionary requires a string 'command' entry",
            )),
        },
        (ChoicesType::Url, Value::String(raw)) => parse_url(raw)
            .map(ChoicesDetails::Url)
            .map_err(|_| syntax(raw)),
        (ChoicesType::Reference, Value::String(raw)) => parse_reference(raw)
            .map(|path| ChoicesDetails::Static {
                key_reference: Some(path),
            })
            .map_err(|_| syntax(raw)),
        (ChoicesType::Static, Value::Object(_)) => match key_reference {
            Some(Value::String(raw)) => parse_reference(&raw)
                .map(|path| ChoicesDetails::Static {
                    key_reference: Some(path),
                })
                .map_err(|_| syntax(&raw)),
            Some(other) => Err(syntax(&other.to_string())),
            None => Err(SchemaError::choices(
                key,
                "specifying a static choices dictionary requires a \"key_reference\" field \
                 with a reference to another parameter (\"key_reference\": \"${param_key}\")",
            )),
        },
        (ChoicesType::Static, _) => Ok(ChoicesDetails::empty()),
        (choices_type, value) => Err(SchemaError::choices(
            key,
            format!(
                "choice type '{choices_type}' cannot be built from a {} value",
                shape_name(value)
            ),
        )),
    }
}

/// Truthiness of a written value: `null`, `false`, zero and empty
/// strings or collections are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
