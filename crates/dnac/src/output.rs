//! Output formatting: JSON, YAML, table.
//!
//! Renders data in the format selected by `--output`. Structured formats
//! use serde; table flattens the top level into key/value rows via `tabled`.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use dnac_api::Outcome;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render any serde-serializable value in the chosen format.
pub fn render<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Table => render_table(&serde_json::to_value(data)?),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// One-line changed/ok summary of an outcome on stderr.
pub fn print_status(outcome: &Outcome, quiet: bool) {
    if quiet {
        return;
    }
    let color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let label = match (outcome.changed, color) {
        (true, true) => "changed".yellow().bold().to_string(),
        (false, true) => "ok".green().bold().to_string(),
        (true, false) => "changed".to_string(),
        (false, false) => "ok".to_string(),
    };
    eprintln!("{label}: {}", outcome.message);
}

// ── Table rendering ──────────────────────────────────────────────────

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn render_table(value: &Value) -> String {
    let rows: Vec<Row> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Row {
                field: k.clone(),
                value: cell(v),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| Row {
                field: format!("[{i}]"),
                value: cell(v),
            })
            .collect(),
        scalar => vec![Row {
            field: "value".into(),
            value: cell(scalar),
        }],
    };
    Table::new(rows).with(Style::rounded()).to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn compact_json_is_single_line() {
        let out = render(OutputFormat::JsonCompact, &json!({"a": [1, 2]})).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn table_lists_outcome_fields() {
        let outcome = Outcome::unchanged("Already in desired state.");
        let out = render(OutputFormat::Table, &outcome).unwrap();
        assert!(out.contains("changed"));
        assert!(out.contains("false"));
        assert!(out.contains("Already in desired state."));
        // previous/proposed are skipped when unset
        assert!(!out.contains("proposed"));
    }

    #[test]
    fn yaml_renders_nested_values() {
        let out = render(OutputFormat::Yaml, &json!({"response": {"id": "x"}})).unwrap();
        assert!(out.contains("response:"));
        assert!(out.contains("id: x"));
    }
}
