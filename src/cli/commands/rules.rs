//! Rules command implementation
//!
//! Prints the compiled-in rule tables. The table is static and versioned
//! with the tool; this is its only runtime-visible surface.

use crate::cli::Output;
use crate::scanner::rules::{CONTENT_RULES, FILENAME_RULES, RuleCategory, SCAN_EXCLUSIONS};
use anyhow::Result;
use std::process::ExitCode;

/// Execute the rules command
pub fn execute(output: &Output) -> Result<ExitCode> {
    output.header("Filename rules (block on staged path)");
    for rule in FILENAME_RULES {
        output.list_item(&format!("{:<20} {}", rule.id, rule.globs.join(", ")));
    }

    output.header("Content rules (block on added lines)");
    for rule in CONTENT_RULES.iter() {
        let tag = match rule.category {
            RuleCategory::ContentHeuristic => " (heuristic)",
            _ => "",
        };
        output.list_item(&format!("{}{}", rule.id, tag));
    }

    output.header("Content-scan exclusions");
    for glob in SCAN_EXCLUSIONS {
        output.list_item(glob);
    }

    Ok(ExitCode::SUCCESS)
}
