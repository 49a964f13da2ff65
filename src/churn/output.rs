use crate::model::{AuthorEntry, TallyOutput};
use anyhow::Result;
use console::style;

const TABLE_LIMIT: usize = 50;
const CHART_WIDTH: u64 = 40;

pub fn output_json(output: &TallyOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_ndjson(entries: &[AuthorEntry]) -> Result<()> {
    for entry in entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

pub fn output_table(entries: &[AuthorEntry]) -> Result<()> {
    if entries.is_empty() {
        println!("No commits in range");
        return Ok(());
    }

    println!(
        "{:<30} {:<32} {:>7} {:>12} {:>8} {:>8}",
        style("Author").bold(),
        style("Email").bold(),
        style("Commits").bold(),
        style("Contribution").bold(),
        style("Churn").bold(),
        style("Net").bold()
    );
    println!("{}", "─".repeat(102));
    for e in entries.iter().take(TABLE_LIMIT) {
        println!(
            "{:<30} {:<32} {:>7} {:>12} {:>8} {:>8}",
            truncate(&e.name, 30),
            truncate(&e.email, 32),
            e.commit_count,
            style(e.contribution).green(),
            style(e.churn).red(),
            e.net
        );
    }
    if entries.len() > TABLE_LIMIT {
        println!("\n... and {} more authors", entries.len() - TABLE_LIMIT);
    }

    let skipped: usize = entries.iter().map(|e| e.skipped.len()).sum();
    if skipped > 0 {
        println!(
            "\n{} {} commit(s) had malformed hunk headers and were only partially counted",
            style("warning:").yellow().bold(),
            skipped
        );
    }
    Ok(())
}

/// Stacked bar per author: contribution to the left of the axis, churn to
/// the right. Authors with neither are left out.
pub fn output_chart(entries: &[AuthorEntry]) -> Result<()> {
    let shown: Vec<&AuthorEntry> = entries
        .iter()
        .filter(|e| e.contribution != 0 || e.churn != 0)
        .collect();
    if shown.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let max = shown
        .iter()
        .map(|e| e.contribution.max(e.churn))
        .max()
        .unwrap_or(1)
        .max(1);

    println!("\n{}", style("Contribution vs. Churn").bold());
    println!("{}", "─".repeat(50));

    for e in shown {
        let contribution = bar_len(e.contribution, max);
        let churn = bar_len(e.churn, max);
        println!(
            "{:<20} {:>width$}│{:<width$} {:+}",
            truncate(&e.name, 20),
            style("█".repeat(contribution)).green(),
            style("░".repeat(churn)).red(),
            e.net,
            width = CHART_WIDTH as usize
        );
    }

    println!("\n{}", style("Legend").bold());
    println!("  {} contribution", style("█").green());
    println!("  {} churn", style("░").red());
    Ok(())
}

fn bar_len(value: u64, max: u64) -> usize {
    if value == 0 {
        return 0;
    }
    // never let a non-zero value vanish
    ((value * CHART_WIDTH) / max).max(1) as usize
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
