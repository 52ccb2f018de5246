//! `schemaforge-commands` - the schema compiler.
//!
//! Turns a [`Client`]'s registered methods into validated [`Command`]s:
//! collect annotated methods, merge them with their signatures, normalise
//! every parameter (types, choices, nested models) and resolve schema, form
//! and template definitions.
//!
//! [`Command`]: schemaforge_core::Command

pub mod choices;
pub mod compile;
pub mod defaults;
pub mod display;
pub mod merge;
pub mod normalize;
pub mod registry;
pub mod system;

pub use choices::{resolve_choices, GrammarError, ParseHint, Parsed};
pub use compile::{compile_client, compile_command, parse_client, CompileOptions};
pub use defaults::{read_log_lines, read_log_method, READ_LOG_COMMAND};
pub use display::{DisplayDefinitions, DisplayField, DisplayResolver, Fetched, Fetcher, HttpFetcher};
pub use merge::{merge_signature, MergedCommand};
pub use normalize::{format_type, generate_nested_params, initialize_parameter, validate_kwargness};
pub use registry::{collect, Client, Collected, Method};
pub use system::{build_system, compile_system};
