//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_audit_report, display_config_entries, display_config_value, display_error,
    display_recent_lines, display_status, display_success, display_version,
    display_version_change, display_warning, format_value, Theme,
};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive). Enter, EOF or anything else
/// means no.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let response = read_answer(&format!("{} (y/N): ", prompt))?;
    Ok(parse_confirmation(&response))
}

/// Prompts for a single line of free text. EOF reads as an empty answer.
pub fn prompt_line(prompt: &str) -> Result<String> {
    read_answer(&format!("{}: ", prompt))
}

fn read_answer(prompt: &str) -> Result<String> {
    print!("\n{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn parse_confirmation(response: &str) -> bool {
    let response = response.trim().to_lowercase();
    response == "y" || response == "yes"
}
