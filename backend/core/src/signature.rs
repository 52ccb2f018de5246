//! Formal call signatures, declared explicitly next to each registered method.

use serde_json::Value;

use crate::parameter::{HostType, NativeType};

/// How a formal parameter binds arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// The implicit instance receiver (`self`).
    Receiver,
    PositionalOnly,
    PositionalOrKeyword,
    /// `*args`
    VarPositional,
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParam {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
    pub annotation: Option<NativeType>,
}

impl FormalParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: None,
            annotation: None,
        }
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn annotated(mut self, native: NativeType) -> Self {
        self.annotation = Some(native);
        self
    }

    /// The declared default, with `null` treated as "no default".
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref().filter(|v| !v.is_null())
    }

    /// Named formals that a caller supplies a value for.
    pub fn is_named(&self) -> bool {
        matches!(
            self.kind,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
        )
    }
}

/// An ordered list of formal parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    params: Vec<FormalParam>,
}

impl Signature {
    /// A free function signature (no receiver).
    pub fn new() -> Self {
        Self::default()
    }

    /// A method signature: starts with the `self` receiver.
    pub fn method() -> Self {
        Self::new().param(FormalParam::new("self").kind(ParamKind::Receiver))
    }

    pub fn param(mut self, param: FormalParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn arg(self, name: impl Into<String>) -> Self {
        self.param(FormalParam::new(name))
    }

    pub fn arg_default(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.param(FormalParam::new(name).default(default))
    }

    /// A named argument annotated with a Rust type, e.g. `typed::<i64>("count")`.
    pub fn typed<T: HostType>(self, name: impl Into<String>) -> Self {
        self.param(FormalParam::new(name).annotated(T::NATIVE))
    }

    pub fn positional_only(self, name: impl Into<String>) -> Self {
        self.param(FormalParam::new(name).kind(ParamKind::PositionalOnly))
    }

    pub fn keyword_only(self, name: impl Into<String>) -> Self {
        self.param(FormalParam::new(name).kind(ParamKind::KeywordOnly))
    }

    pub fn var_args(self, name: impl Into<String>) -> Self {
        self.param(FormalParam::new(name).kind(ParamKind::VarPositional))
    }

    pub fn var_kwargs(self, name: impl Into<String>) -> Self {
        self.param(FormalParam::new(name).kind(ParamKind::VarKeyword))
    }

    pub fn params(&self) -> &[FormalParam] {
        &self.params
    }

    pub fn has_receiver(&self) -> bool {
        self.params.iter().any(|p| p.kind == ParamKind::Receiver)
    }

    pub fn has_var_keyword(&self) -> bool {
        self.params.iter().any(|p| p.kind == ParamKind::VarKeyword)
    }

    /// Look up a formal by name, ignoring the receiver.
    pub fn find(&self, name: &str) -> Option<&FormalParam> {
        self.params
            .iter()
            .find(|p| p.kind != ParamKind::Receiver && p.name == name)
    }

    /// Named formals in declaration order (no receiver, no variadics).
    pub fn named(&self) -> impl Iterator<Item = &FormalParam> {
        self.params.iter().filter(|p| p.is_named())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_signature_excludes_receiver_from_named() {
        let sig = Signature::method().arg("a").arg_default("b", 5).var_kwargs("kwargs");
        let names: Vec<&str> = sig.named().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(sig.has_receiver());
        assert!(sig.has_var_keyword());
        assert!(sig.find("self").is_none());
    }

    #[test]
    fn null_default_means_none() {
        let p = FormalParam::new("x").default(Value::Null);
        assert!(p.default_value().is_none());
        let p = FormalParam::new("x").default(json!(0));
        assert_eq!(p.default_value(), Some(&json!(0)));
    }

    #[test]
    fn typed_records_annotation() {
        let sig = Signature::new().typed::<f64>("ratio");
        assert_eq!(sig.params()[0].annotation, Some(NativeType::Float));
    }
}
