//! Output formatters for CLI commands.
//!
//! Every report can be rendered as JSON, as plain text lines, or as a
//! colorized tree of values for humans.

use anyhow::Result;
use colored::Colorize;
use nsroute_core::cli::OutputFormat;
use serde::Serialize;
use std::fmt::Display;

/// Format a report according to the specified output format.
///
/// Text output uses the report's `Display` implementation, which is meant
/// for piping into line-oriented tools.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use nsroute_cli::formatters::format_output;
/// use nsroute_core::cli::OutputFormat;
/// use serde::Serialize;
/// use std::fmt;
///
/// #[derive(Serialize)]
/// struct Hit {
///     path: String,
/// }
///
/// impl fmt::Display for Hit {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(&self.path)
///     }
/// }
///
/// let hit = Hit { path: "/apps".to_string() };
/// assert!(format_output(&hit, OutputFormat::Json)?.contains("\"path\""));
/// assert_eq!(format_output(&hit, OutputFormat::Text)?, "/apps");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize + Display>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => Ok(data.to_string()),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Format data as colorized, indented key/value lines.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&value, 0, &mut out);
        Ok(out.trim_end().to_string())
    }

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::Null => Some("-".dimmed().to_string()),
            Value::Bool(b) => Some(b.to_string().yellow().to_string()),
            Value::Number(n) => Some(n.to_string().cyan().to_string()),
            Value::String(s) => Some(s.green().to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn write_value(value: &Value, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    match scalar(item) {
                        Some(text) => {
                            out.push_str(&format!("{pad}{}: {text}\n", key.blue().bold()));
                        }
                        None => {
                            out.push_str(&format!("{pad}{}:\n", key.blue().bold()));
                            write_value(item, indent + 1, out);
                        }
                    }
                }
            }
            Value::Array(items) => {
                if items.is_empty() {
                    out.push_str(&format!("{pad}{}\n", "(none)".dimmed()));
                }
                for item in items {
                    match scalar(item) {
                        Some(text) => out.push_str(&format!("{pad}- {text}\n")),
                        None => {
                            out.push_str(&format!("{pad}-\n"));
                            write_value(item, indent + 1, out);
                        }
                    }
                }
            }
            scalar_value => {
                if let Some(text) = scalar(scalar_value) {
                    out.push_str(&format!("{pad}{text}\n"));
                }
            }
        }
    }
}
