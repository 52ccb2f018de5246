//! Built-in helper commands every client may opt into.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use schemaforge_core::{CommandSpec, ParameterSpec, Signature};

use crate::registry::Method;

pub const READ_LOG_COMMAND: &str = "_read_log";

const DEFAULT_LINE_START: u64 = 0;
const DEFAULT_LINE_END: u64 = 50;

/// The `_read_log` helper: returns a window of lines from the process log file.
pub fn read_log_method() -> Method {
    let line = |key: &str, display_name: &str, description: &str, default: u64| {
        ParameterSpec::new(key)
            .param_type("Integer")
            .description(description)
            .multi(false)
            .display_name(display_name)
            .optional(false)
            .default_value(default)
            .nullable(false)
    };

    Method::new(
        READ_LOG_COMMAND,
        Signature::method()
            .arg_default("line_start", DEFAULT_LINE_START)
            .arg_default("line_end", DEFAULT_LINE_END),
    )
    .command(CommandSpec::new().description(
        "Auto-Generated helper command to aid in viewing remote logs. \
         If logs are written to a file.",
    ))
    .parameter(line(
        "line_start",
        "Start Line",
        "Line to begin reading log file",
        DEFAULT_LINE_START,
    ))
    .parameter(line(
        "line_end",
        "End Line",
        "Line to stop reading log file",
        DEFAULT_LINE_END,
    ))
}

/// Lines `[line_start, line_end)` of `log_file`. Failures are reported as
/// lines so the caller can always return them to the requester.
pub fn read_log_lines(log_file: Option<&Path>, line_start: usize, line_end: usize) -> Vec<String> {
    let Some(path) = log_file else {
        return vec![
            "Unable to determine log file name. Please check with the system administrator \
             to verify the plugin is writing to a log file."
                .to_string(),
        ];
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return io_failure(&e),
    };

    let mut lines = Vec::new();
    for line in BufReader::new(file)
        .lines()
        .skip(line_start)
        .take(line_end.saturating_sub(line_start))
    {
        match line {
            Ok(line) => lines.push(line),
            Err(e) => return io_failure(&e),
        }
    }
    lines
}

fn io_failure(e: &std::io::Error) -> Vec<String> {
    vec!["Unable to read log file".to_string(), format!("I/O error: {e}")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::parse_client;
    use crate::registry::Client;
    use schemaforge_core::ParamType;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn read_log_compiles() {
        let client = Client::new().with_default_commands();
        let commands = parse_client(&client).unwrap();
        let cmd = &commands[0];
        assert_eq!(cmd.name, READ_LOG_COMMAND);
        assert!(cmd.description.as_deref().unwrap().starts_with("Auto-Generated"));

        let keys: Vec<&str> = cmd.parameter_keys().collect();
        assert_eq!(keys, vec!["line_start", "line_end"]);

        let start = &cmd.parameters[0];
        assert_eq!(start.param_type, ParamType::Integer);
        assert_eq!(start.default, Some(json!(0)));
        assert_eq!(start.display_name.as_deref(), Some("Start Line"));
        assert_eq!(start.optional, Some(false));
        assert_eq!(start.nullable, Some(false));
        assert_eq!(cmd.parameters[1].default, Some(json!(50)));
    }

    #[test]
    fn reads_line_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..10 {
            writeln!(file, "line {i}").unwrap();
        }
        let lines = read_log_lines(Some(file.path()), 2, 5);
        assert_eq!(lines, vec!["line 2", "line 3", "line 4"]);
        assert!(read_log_lines(Some(file.path()), 5, 2).is_empty());
    }

    #[test]
    fn reports_failures_as_lines() {
        assert_eq!(read_log_lines(None, 0, 50).len(), 1);
        let missing = read_log_lines(Some(Path::new("/no/such/log")), 0, 50);
        assert_eq!(missing[0], "Unable to read log file");
    }
}
