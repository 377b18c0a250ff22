// Richlint - structural validator for the Asana rich text markup dialect
// Checks formatted task and comment bodies against the closed grammar the
// API accepts, reporting every violation instead of rewriting the input.

pub mod cli;
pub mod models;
pub mod parser;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{ChildPolicy, RuleSet};
pub use parser::ParseFailure;
pub use validator::RichTextValidator;
