// crates/meridian-cli/src/output.rs
//
// Output formatting for the Meridian CLI: styled status lines, tables,
// and pretty JSON.

use console::style;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Print a green success line.
pub fn success(message: &str) {
    println!("{}", style(message).green());
}

/// Print a dim informational line.
pub fn note(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a highlighted label/value pair.
pub fn kv(label: &str, value: &str) {
    println!("{} {}", style(label).cyan().bold(), style(value).bold());
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data)
        .unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
