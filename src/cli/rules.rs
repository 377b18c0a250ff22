use crate::models::RuleSet;
use crate::Result;
use colored::Colorize;
use std::collections::BTreeSet;

/// Run the rules command: print the grammar rule table
pub fn run(json: bool) -> Result<()> {
    let rules = RuleSet::default();

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{}", "📋 Asana rich text grammar".cyan().bold());
    println!();

    println!("{}", "Allowed tags:".yellow());
    println!("   {}", format_tags(&rules.allowed_tags));
    println!();

    println!("{}", "Tags that may carry attributes:".yellow());
    for (tag, attributes) in &rules.allowed_attributes {
        println!(
            "   <{}>: {}",
            tag,
            attributes.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    println!();

    println!("{}", "Tags that must be empty:".yellow());
    println!("   {}", format_tags(&rules.empty_tags));
    println!();

    println!("{}", "Allowed child elements:".yellow());
    for (parent, children) in &rules.allowed_child_tags {
        if children.is_empty() {
            println!("   <{}>: (text only, no child elements)", parent);
        } else {
            println!("   <{}>: {}", parent, format_tags(children));
        }
    }
    println!("   (unlisted tags accept any allowed tag)");
    println!();

    println!("{}", "Required parents:".yellow());
    for (tag, parents) in &rules.required_parents {
        println!("   <{}> must sit directly inside {}", tag, format_tags(parents));
    }
    println!();

    println!("{}", "Tags that forbid direct text:".yellow());
    println!("   {}", format_tags(&rules.no_direct_text_tags));

    Ok(())
}

fn format_tags(tags: &BTreeSet<String>) -> String {
    tags.iter()
        .map(|tag| format!("<{}>", tag))
        .collect::<Vec<_>>()
        .join(" ")
}
