//! Output formatting and progress spinners for the CLI

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Result, dataset::StateRecord};

/// Create a spinner for long-running steps
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| crate::Error::ProgressBarTemplate {
                message: e.to_string(),
            })?,
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// `part` as a percentage of `total`, one decimal
pub fn format_percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print a record's board followed by its features
pub fn print_record(index: usize, record: &StateRecord) {
    print_subsection(&format!("#{index}  {}", record.state.encode()));
    for line in record.state.board().to_string().lines() {
        println!("  {line}");
    }
    print_stats_table(&[
        ("ply", record.ply.to_string()),
        ("to move", record.current_player.to_string()),
        ("chain (mover)", record.chain_self.to_string()),
        ("chain (opponent)", record.chain_opponent.to_string()),
        ("free cells", record.free_cells.to_string()),
        ("outcome", record.outcome.to_string()),
        ("terminal", record.state.is_terminal().to_string()),
    ]);
}
