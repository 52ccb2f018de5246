//! `pest` parsers for the three choices sub-grammars.

use pest::iterators::Pair;
use pest::Parser;
use thiserror::Error;

use schemaforge_core::{FunctionRef, UrlRef};

#[derive(pest_derive::Parser)]
#[grammar = "choices/choices.pest"] // Path relative to src/
struct ChoicesParser;

/// Which sub-grammar to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseHint {
    Func,
    Url,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse '{input}': {reason}")]
pub struct GrammarError {
    pub input: String,
    pub reason: String,
}

/// Result of an unhinted or hinted parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Func(FunctionRef),
    Url(UrlRef),
    Reference(String),
}

/// Parse `input` with the hinted grammar. Without a hint the URL grammar is
/// tried first, then the command grammar.
pub fn parse(input: &str, hint: Option<ParseHint>) -> Result<Parsed, GrammarError> {
    match hint {
        Some(ParseHint::Func) => parse_function(input).map(Parsed::Func),
        Some(ParseHint::Url) => parse_url(input).map(Parsed::Url),
        Some(ParseHint::Reference) => parse_reference(input).map(Parsed::Reference),
        None => parse_url(input)
            .map(Parsed::Url)
            .or_else(|_| parse_function(input).map(Parsed::Func)),
    }
}

/// `name`, `name()` or `name(arg=${ref}, ...)`.
pub fn parse_function(input: &str) -> Result<FunctionRef, GrammarError> {
    let func = parse_rule(Rule::func_input, input)?;
    let mut inner = func.into_inner();
    let name = inner.next().map(|p| p.as_str().to_string()).unwrap_or_default();
    Ok(FunctionRef {
        name,
        args: arguments(inner.next()),
    })
}

/// `http(s)://address` with optional `?p=${ref}&...` query references.
pub fn parse_url(input: &str) -> Result<UrlRef, GrammarError> {
    let url = parse_rule(Rule::url_input, input)?;
    let mut inner = url.into_inner();
    let address = inner.next().map(|p| p.as_str().to_string()).unwrap_or_default();
    Ok(UrlRef {
        address,
        args: arguments(inner.next()),
    })
}

/// Exactly `${name}` or `${name.path}`; returns the inner path.
pub fn parse_reference(input: &str) -> Result<String, GrammarError> {
    let reference = parse_rule(Rule::reference_input, input)?;
    Ok(reference_path(reference))
}

/// Runs `rule` (one of the `*_input` entry points) and returns its single
/// payload pair.
fn parse_rule(rule: Rule, input: &str) -> Result<Pair<'_, Rule>, GrammarError> {
    let mut pairs = ChoicesParser::parse(rule, input).map_err(|e| GrammarError {
        input: input.to_string(),
        reason: e.variant.message().into_owned(),
    })?;

    pairs
        .next()
        .and_then(|entry| entry.into_inner().next())
        .ok_or_else(|| GrammarError {
            input: input.to_string(),
            reason: "empty input".to_string(),
        })
}

/// `func_args` / `url_args` into `(name, referenced path)` pairs.
fn arguments(args: Option<Pair<'_, Rule>>) -> Vec<(String, String)> {
    args.into_iter()
        .flat_map(|args| args.into_inner())
        .filter_map(|arg| {
            let mut inner = arg.into_inner();
            let name = inner.next()?.as_str().to_string();
            let reference = reference_path(inner.next()?);
            Some((name, reference))
        })
        .collect()
}

fn reference_path(reference: Pair<'_, Rule>) -> String {
    reference
        .into_inner()
        .next()
        .map(|path| path.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, args: &[(&str, &str)]) -> FunctionRef {
        FunctionRef {
            name: name.into(),
            args: args.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect(),
        }
    }

    fn url(address: &str, args: &[(&str, &str)]) -> UrlRef {
        UrlRef {
            address: address.into(),
            args: args.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect(),
        }
    }

    #[test]
    fn parses_functions() {
        assert_eq!(parse_function("f").unwrap(), func("f", &[]));
        assert_eq!(parse_function("f()").unwrap(), func("f", &[]));
        assert_eq!(
            parse_function("f(single=${arg})").unwrap(),
            func("f", &[("single", "arg")])
        );
        assert_eq!(
            parse_function("f(single=${arg.nest})").unwrap(),
            func("f", &[("single", "arg.nest")])
        );
        assert_eq!(
            parse_function("f(first=${arg_param}, another=${arg})").unwrap(),
            func("f", &[("first", "arg_param"), ("another", "arg")])
        );
    }

    #[test]
    fn rejects_malformed_functions() {
        for input in [
            "",
            "f(",
            "f(single)",
            "f(single=)",
            "f(single=arg)",
            "f(single=$arg)",
            "f(single=${arg)",
            "f(single=$arg})",
            "f(single=${arg},)",
            "f(single=$arg, another=$arg)",
            "f(single=${arg}, another=$arg)",
            "f(single=${arg}, another=${arg}",
        ] {
            assert!(parse_function(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn parses_urls() {
        assert_eq!(parse_url("http://bg").unwrap(), url("http://bg", &[]));
        assert_eq!(parse_url("http://bg:1234").unwrap(), url("http://bg:1234", &[]));
        assert_eq!(parse_url("https://bg").unwrap(), url("https://bg", &[]));
        assert_eq!(
            parse_url("https://bg:1234?p1=${arg}").unwrap(),
            url("https://bg:1234", &[("p1", "arg")])
        );
        assert_eq!(
            parse_url("https://bg?p1=${arg}&p2=${arg2}").unwrap(),
            url("https://bg", &[("p1", "arg"), ("p2", "arg2")])
        );
    }

    #[test]
    fn rejects_malformed_urls() {
        for input in [
            "",
            "htp://address",
            "http://address?",
            "http://address?param",
            "http://address?param=",
            "http://address?param=literal",
            "http://address?param=$arg",
            "http://address?param=${arg",
            "http://address?param=${arg}&",
            "http://address?param=${arg}&param_2",
            "http://address?param=${arg}&param_2=",
            "http://address?param=${arg}&param_2=arg2",
            "http://address?param=${arg}&param_2=$arg2",
            "http://address?param=${arg}&param_2=${arg2",
        ] {
            assert!(parse_url(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn parses_references() {
        assert_eq!(parse_reference("${index}").unwrap(), "index");
        for input in [
            "", "$", "${", "$}", "${}", "{index}", "$index}", "${index", "a${index}",
            "${index}a", "${index} ${index2}",
        ] {
            assert!(parse_reference(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn unhinted_tries_url_then_function() {
        assert_eq!(
            parse("http://address", None).unwrap(),
            Parsed::Url(url("http://address", &[]))
        );
        assert_eq!(parse("f", None).unwrap(), Parsed::Func(func("f", &[])));
        assert!(parse("", None).is_err());
    }

    #[test]
    fn error_names_input() {
        let err = parse_function("f(").unwrap_err();
        assert_eq!(err.input, "f(");
        assert!(err.to_string().starts_with("unable to parse 'f('"));
    }
}
