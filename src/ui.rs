use colored::Colorize;
use serde_json::Value;

/// Width of section rules.
const RULE_WIDTH: usize = 50;

/// Print an info message
pub fn info(msg: &str) {
    println!("  {} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg.green());
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg.red());
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a numbered step header framed by heavy rules
pub fn header(title: &str) {
    let rule = "━".repeat(RULE_WIDTH);
    println!();
    println!("{}", rule.cyan().bold());
    println!("  {}", title.cyan().bold());
    println!("{}", rule.cyan().bold());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair with the key padded to a fixed column
pub fn kv(key: &str, value: &str) {
    println!("  {:<19}{}", format!("{key}:"), value);
}

/// Print a thin rule inside a section
pub fn rule(width: usize) {
    println!("  {}", "─".repeat(width).dimmed());
}

/// Print the closing banner
pub fn banner(title: &str) {
    let rule = "═".repeat(RULE_WIDTH);
    println!();
    println!("{}", rule.green().bold());
    println!("  {}", title.green().bold());
    println!("{}", rule.green().bold());
}

// ============================================================================
// Formatting
// ============================================================================

/// Render a JSON value for display, `N/A` when absent.
///
/// Strings are shown without quotes.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Truncate text to `max_chars` characters, appending `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

// ============================================================================
// Tests
// ============================================================================
