//! `schemaforge-core` - the command schema data model.
//!
//! Raw annotation shapes (`*Spec`) and the canonical values the compiler
//! produces from them: [`Command`], [`Parameter`], [`Choices`] and [`System`].

pub mod choices;
pub mod command;
pub mod error;
pub mod parameter;
pub mod signature;
pub mod system;

pub use choices::{
    Choices, ChoicesDetails, ChoicesDisplay, ChoicesSpec, ChoicesType, FunctionRef, UrlRef,
};
pub use command::{Command, CommandSpec, CommandType, OutputType};
pub use error::{Result, SchemaError};
pub use parameter::{
    HostType, Model, NativeType, NestedSpec, ParamType, Parameter, ParameterSpec, TypeSpec,
};
pub use signature::{FormalParam, ParamKind, Signature};
pub use system::{Instance, System, SystemSpec, DEFAULT_INSTANCE_NAME};
