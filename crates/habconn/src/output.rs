//! Output formatting: plain text or JSON, selected by `--output`.

use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Color only on an interactive stdout and when `NO_COLOR` is unset.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Render a serializable value: JSON via serde, plain via `detail_fn`.
pub fn render<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Plain => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
    })
}

pub fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}

/// `label: value` line for plain detail views.
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    if should_color() {
        format!("{:<10} {value}", format!("{label}:").bold())
    } else {
        format!("{:<10} {value}", format!("{label}:"))
    }
}

/// Green "yes" / red "no".
pub fn yes_no(value: bool) -> String {
    match (value, should_color()) {
        (true, true) => "yes".green().to_string(),
        (false, true) => "no".red().to_string(),
        (true, false) => "yes".into(),
        (false, false) => "no".into(),
    }
}
