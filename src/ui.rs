use console::style;

use crate::ledger::LedgerEntry;
use crate::version::VersionComponents;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold().for_stderr(), message);
}

/// Render the components as the three `Key: value` lines printed by `verbeat components`
pub fn format_components(components: &VersionComponents) -> String {
    format!(
        "Manual: {}\nDate: {}\nCommits: {}",
        components.milestone, components.calendar_tag, components.commit_count
    )
}

pub fn display_components(components: &VersionComponents) {
    println!("{}", format_components(components));
}

/// One line per entry, milestone first, comment dimmed when stdout is a terminal
pub fn display_history(entries: &[LedgerEntry]) {
    if entries.is_empty() {
        println!("{}", style("No milestones recorded").dim());
        return;
    }

    let width = entries
        .iter()
        .map(|entry| entry.milestone.to_string().len())
        .max()
        .unwrap_or(1);

    for entry in entries {
        let milestone = format!("{:>width$}", entry.milestone, width = width);
        if entry.comment.is_empty() {
            println!("{}", style(milestone).bold());
        } else {
            println!("{}  {}", style(milestone).bold(), style(&entry.comment).dim());
        }
    }
}
