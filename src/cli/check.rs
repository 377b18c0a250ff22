use crate::models::RuleSet;
use crate::validator::RichTextValidator;
use crate::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// JSON output for the check command
#[derive(Serialize)]
struct CheckJsonOutput {
    valid: bool,
    errors: Vec<String>,
}

/// Run the check command: validate a markup document from a file or stdin
pub fn run(input: Option<&Path>, json: bool) -> Result<()> {
    let markup = read_markup(input)?;

    let validator = RichTextValidator::new(RuleSet::default());
    let errors = validator.validate(&markup);

    // For JSON output, the verdict lives in the payload and the exit code
    // stays zero so callers can parse it.
    if json {
        let output = CheckJsonOutput {
            valid: errors.is_empty(),
            errors,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if errors.is_empty() {
        println!("{}", "✅ Markup is valid.".green().bold());
        return Ok(());
    }

    println!("{}", "❌ Markup failed validation!".red().bold());
    println!();
    println!("{}", "📝 Errors:".yellow());
    for error in &errors {
        println!("   • {}", error);
    }

    anyhow::bail!("{} validation error(s) found", errors.len())
}

/// Read the markup from a path, or from stdin when the path is absent
/// or given as `-`.
fn read_markup(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read markup from {}", path.display())),
        _ => {
            let mut markup = String::new();
            std::io::stdin()
                .read_to_string(&mut markup)
                .context("Failed to read markup from stdin")?;
            Ok(markup)
        }
    }
}
