//! CLI UI utilities for terminal output.
//!
//! Colored status lines, the loading spinner, the informational message box,
//! and the result card table.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::{SearchCategory, SearchRequest};
use crate::render::ResultCard;
use crate::utils::{card_table_columns, display_width, terminal_width, truncate_with_ellipsis};

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Icon for a search category.
pub fn category_icon(category: SearchCategory) -> &'static str {
    match category {
        SearchCategory::Title => "📖",
        SearchCategory::Author => "✍",
        SearchCategory::Subject => "🏷",
    }
}

/// Print a styled status line.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Welcome banner shown before the first search.
pub fn print_welcome(text: &str) {
    let version = env!("CARGO_PKG_VERSION");

    println!();
    println!(
        "{} {}",
        "📚 Open Library Search".bold().cyan(),
        format!("v{}", version).dimmed()
    );
    println!("{}", text);
    println!();
    println!("{}", "Examples:".bold());
    println!("  openlibrary-search search \"the left hand of darkness\"");
    println!("  openlibrary-search search tolkien --category author");
    println!("  openlibrary-search search space --category subject");
    println!();
}

/// Print an informational message in a box.
///
/// Used for both transport failures and empty results.
pub fn print_message_box(text: &str) {
    let inner = display_width(text) + 4;
    let rule = "─".repeat(inner);

    println!();
    println!("┌{}┐", rule);
    println!("│  {} {} │", status_icon(Status::Info).cyan().bold(), text);
    println!("└{}┘", rule);
    println!();
}

/// Print the line above a result grid.
pub fn print_search_header(request: &SearchRequest, count: usize, duration: Duration) {
    println!();
    println!(
        "{} {} \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        format!("{} {}:", category_icon(request.category), request.category).dimmed(),
        request.text.cyan().bold()
    );
    println!(
        "{} Found {} books in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Render result cards as a table sized to the terminal.
pub fn cards_table(cards: &[ResultCard], width: usize) -> Table {
    let (title_w, authors_w) = card_table_columns(width);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width.min(u16::MAX as usize) as u16)
        .set_header(vec!["#", "Title", "Authors", "Link"]);

    for (i, card) in cards.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(truncate_with_ellipsis(&card.title, title_w)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&card.authors, authors_w)),
            Cell::new(&card.link),
        ]);
    }

    table
}

/// Print result cards as a table.
pub fn print_cards_table(cards: &[ResultCard]) {
    println!("{}", cards_table(cards, terminal_width()));
}

/// Print result cards as plain text, one block per card.
pub fn print_cards_plain(cards: &[ResultCard]) {
    for card in cards {
        println!("{} - {}", card.title, card.authors);
        println!("  Link:  {}", card.link);
        println!("  Cover: {}", card.cover.src());
        println!();
    }
}

/// Loading spinner shown while a search is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

fn spinner_style(template: &str, ticks: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
        .tick_chars(ticks)
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(spinner_style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Remove the spinner without leaving a line behind.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}
