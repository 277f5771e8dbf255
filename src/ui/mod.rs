//! Terminal output: status lines and the analysis progress bar.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Source icons for the supported preprint servers.
pub fn source_icon(source: &str) -> &'static str {
    match source.to_lowercase().as_str() {
        "arxiv" => "📝",
        "biorxiv" => "🧬",
        _ => "📄",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Truncate to `max` characters, appending an ellipsis when cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Progress bar over the sequential analysis loop
#[derive(Debug, Clone)]
pub struct AnalysisProgress {
    pb: ProgressBar,
}

impl AnalysisProgress {
    /// Create a bar for `total` papers; hidden unless `visible`
    pub fn new(total: usize, visible: bool) -> Self {
        let pb = ProgressBar::new(total as u64);
        if !visible {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.cyan} [{pos}/{len}] {wide_bar:.cyan/blue} {msg}",
        ) {
            pb.set_style(style.progress_chars("█▉ "));
        }
        Self { pb }
    }

    /// A bar that never draws
    pub fn hidden(total: usize) -> Self {
        Self::new(total, false)
    }

    /// Show the paper currently being analyzed
    pub fn start(&self, title: &str) {
        self.pb
            .set_message(format!("Analyzing: {}", truncate_with_ellipsis(title, 40)));
    }

    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }
}
