//! Output formatting and terminal rendering
//!
//! Colored banners, assistant replies and classification tables.

use athena::{intent::CategoryScore, ClassificationResult, MatchMethod};
use colored::Colorize;

/// Output handler for terminal display
#[derive(Debug, Default)]
pub struct OutputHandler;

impl OutputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Print the welcome banner
    pub fn print_banner(&self, wake_word: Option<&str>) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════════╗"
                .bright_cyan()
        );
        println!(
            "{}",
            "║             Athena Voice Assistant                            ║"
                .bright_cyan()
        );
        println!(
            "{}",
            "╠═══════════════════════════════════════════════════════════════╣"
                .bright_cyan()
        );
        if let Some(wake_word) = wake_word {
            println!(
                "{}  Wake word: {:<48}{}",
                "║".bright_cyan(),
                wake_word.bright_white(),
                "║".bright_cyan()
            );
        }
        println!(
            "{}  {}                 {}",
            "║".bright_cyan(),
            "Type what you would say. Ctrl-D or 'exit' quits.".dimmed(),
            "║".bright_cyan()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════════╝"
                .bright_cyan()
        );
        println!();
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Print an info message
    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    /// Print something the assistant says
    pub fn print_reply(&self, text: &str) {
        println!("{} {}", "Athena:".bright_magenta().bold(), text.bright_white());
    }

    pub fn print_classification(&self, text: &str, result: &ClassificationResult) {
        let method = match result.method {
            MatchMethod::Pattern => "pattern".bright_green(),
            MatchMethod::Scored => "scored".bright_yellow(),
            MatchMethod::Unmatched => "unmatched".dimmed(),
        };
        println!("  {} {}", "Input:".dimmed(), text);
        println!("  {} {}", "Category:".dimmed(), result.category.bright_white().bold());
        println!("  {} {:.3}", "Confidence:".dimmed(), result.confidence);
        println!("  {} {}", "Method:".dimmed(), method);
    }

    /// Print per-category score breakdown, highest first
    pub fn print_scores_table(&self, scores: &[CategoryScore], threshold: f64) {
        let mut ranked: Vec<&CategoryScore> = scores.iter().collect();
        ranked.sort_by(|a, b| b.total.total_cmp(&a.total));

        println!();
        println!(
            "{}",
            format!(
                "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8}",
                "Category", "Keyword", "Synonym", "Phrase", "Context", "Total"
            )
            .bright_white()
            .bold()
        );
        println!("{}", "─".repeat(62).dimmed());

        for score in ranked.into_iter().filter(|score| score.total > 0.0) {
            let total = format!("{:>8.3}", score.total);
            let total = if score.total > threshold {
                total.bright_green()
            } else {
                total.normal()
            };
            println!(
                "{:<16} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {}",
                score.category,
                score.keyword,
                score.synonym,
                score.phrase,
                score.context_bonus,
                total
            );
        }
        println!();
    }
}
