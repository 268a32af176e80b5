//! Shared styling utilities for the CLI.

use console::Style;

use ghprojects_core::settings::Source;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold, white).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// Label for a settings source: CLI in blue, VS Code in magenta.
pub fn source(source: Source) -> String {
    let style = match source {
        Source::Cli => Style::new().blue().bold(),
        Source::Editor => Style::new().magenta().bold(),
    };
    style.apply_to(source.label()).to_string()
}

/// Label for a copy direction, e.g. `CLI → VS Code`.
pub fn direction(from: Source) -> String {
    format!("{} → {}", self::source(from), self::source(from.opposite()))
}
