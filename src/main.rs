use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use openlibrary_search::config::{default_config_path, find_config_file, load_config, Config};
use openlibrary_search::controller::{ResultState, SearchController};
use openlibrary_search::models::{SearchCategory, SearchRequest};
use openlibrary_search::render::{apply_cover_fallbacks, render, CatalogLinks, View};
use openlibrary_search::sources::{CatalogSource, OpenLibrarySource};
use openlibrary_search::ui::{self, Status};
use openlibrary_search::utils::is_terminal;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Open Library Search - Find books by title, author, or subject
#[derive(Parser, Debug)]
#[command(name = "openlibrary-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the Open Library book catalog by title, author, or subject", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress log output entirely
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Catalog field to search
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Category {
    /// Match book titles
    Title,
    /// Match author names
    Author,
    /// Match subjects
    Subject,
}

impl From<Category> for SearchCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Title => SearchCategory::Title,
            Category::Author => SearchCategory::Author,
            Category::Subject => SearchCategory::Subject,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalog once and print the results
    #[command(alias = "s")]
    Search {
        /// Search text
        query: String,

        /// Field to search (default: from config, else title)
        #[arg(long, short, value_enum)]
        category: Option<Category>,

        /// Check every cover image and fall back to the placeholder when it cannot be loaded
        #[arg(long)]
        verify_covers: bool,
    },

    /// Search repeatedly from a prompt
    #[command(alias = "i")]
    Interactive {
        /// Initial field to search (default: from config, else title)
        #[arg(long, short, value_enum)]
        category: Option<Category>,

        /// Check every cover image and fall back to the placeholder when it cannot be loaded
        #[arg(long)]
        verify_covers: bool,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Where to write (default: user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Open Library Search - Environment Variables");
    println!();
    println!("API Settings:");
    println!("  OPENLIBRARY_SEARCH_API__BASE_URL               Catalog base URL (default: https://openlibrary.org)");
    println!("  OPENLIBRARY_SEARCH_API__COVERS_URL             Cover image host (default: https://covers.openlibrary.org)");
    println!("  OPENLIBRARY_SEARCH_API__PLACEHOLDER_COVER_URL  Image used when a cover is missing");
    println!("  OPENLIBRARY_SEARCH_API__TIMEOUT_SECS           Request timeout in seconds (default: transport default)");
    println!("  OPENLIBRARY_SEARCH_API__USER_AGENT             Custom User-Agent header");
    println!();
    println!("Display Settings:");
    println!("  OPENLIBRARY_SEARCH_DISPLAY__DEFAULT_CATEGORY   title, author or subject (default: title)");
    println!();
    println!("Global Proxy Settings:");
    println!("  HTTP_PROXY                  HTTP proxy URL (e.g., http://proxy:8080)");
    println!("  HTTPS_PROXY                 HTTPS proxy URL (e.g., https://proxy:8080)");
    println!("  NO_PROXY                    Comma-separated list of hosts to bypass proxy");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    std::process::exit(0);
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if quiet { "off" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("openlibrary_search={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Everything needed to run and display searches
struct Session<'a> {
    source: &'a dyn CatalogSource,
    links: CatalogLinks,
    format: OutputFormat,
    verify_covers: bool,
}

impl Session<'_> {
    /// Submit the controller's form and show the outcome.
    ///
    /// Returns whether a search was started.
    async fn search(&self, controller: &mut SearchController) -> Result<bool> {
        let Some(pending) = controller.submit() else {
            return Ok(false);
        };

        let request = pending.request.clone();
        let spinner = self.present(&render(controller.state(), &self.links), &request, None)?;

        let started = Instant::now();
        controller.run(self.source, pending).await;

        let mut view = render(controller.state(), &self.links);
        if self.verify_covers {
            if let Some(cards) = view.cards_mut() {
                let replaced = apply_cover_fallbacks(cards, self.source).await;
                tracing::debug!(replaced, "Cover check complete");
            }
        }

        if let Some(spinner) = spinner {
            spinner.clear();
        }
        self.present(&view, &request, Some(started.elapsed()))?;
        Ok(true)
    }

    /// Print a view. The loading branch starts a spinner instead, which the
    /// caller clears once the search settles.
    fn present(
        &self,
        view: &View,
        request: &SearchRequest,
        elapsed: Option<Duration>,
    ) -> Result<Option<ui::Spinner>> {
        if self.format == OutputFormat::Json {
            if !matches!(view, View::Loading) {
                println!("{}", serde_json::to_string_pretty(view)?);
            }
            return Ok(None);
        }

        match view {
            View::Loading => {
                if is_terminal() {
                    return Ok(Some(ui::Spinner::new(&format!(
                        "Searching {} for \"{}\"...",
                        request.category, request.text
                    ))));
                }
            }
            View::Message { text } => ui::print_message_box(text),
            View::Grid { cards } => {
                ui::print_search_header(request, cards.len(), elapsed.unwrap_or_default());
                if self.format == OutputFormat::Plain {
                    ui::print_cards_plain(cards);
                } else {
                    ui::print_cards_table(cards);
                }
            }
            View::Welcome { text } => ui::print_welcome(text),
        }
        Ok(None)
    }

    fn welcome(&self, controller: &SearchController) -> Result<()> {
        let view = render(controller.state(), &self.links);
        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else if let View::Welcome { text } = &view {
            ui::print_welcome(text);
        }
        Ok(())
    }
}

fn print_interactive_help() {
    println!("Type search text and press Enter. Commands:");
    println!("  :title | :author | :subject   switch the search category");
    println!("  :state                        show the current search");
    println!("  :help                         show this help");
    println!("  :quit                         exit");
}

/// One line of input at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum InteractiveCommand {
    Quit,
    Help,
    State,
    SetCategory(SearchCategory),
    /// `:` followed by something that is not a command
    Unknown(String),
    Blank,
    Search(String),
}

fn parse_line(line: &str) -> InteractiveCommand {
    let line = line.trim();
    match line {
        "" => InteractiveCommand::Blank,
        ":quit" | ":q" | ":exit" => InteractiveCommand::Quit,
        ":help" => InteractiveCommand::Help,
        ":state" => InteractiveCommand::State,
        _ => match line.strip_prefix(':') {
            Some(name) => name
                .parse::<SearchCategory>()
                .map(InteractiveCommand::SetCategory)
                .unwrap_or_else(|_| InteractiveCommand::Unknown(name.to_string())),
            None => InteractiveCommand::Search(line.to_string()),
        },
    }
}

/// Text for the `:state` command
fn describe_committed(controller: &SearchController) -> String {
    match controller.committed() {
        Some(request) => format!("{}: \"{}\"", request.category, request.text),
        None => "No search yet".to_string(),
    }
}

/// Text shown when a submission repeats the committed search
fn repeat_notice(state: &ResultState) -> &'static str {
    match state {
        ResultState::Ready(_) => "Already showing results for that search",
        _ => "That search was already run; change the query or category to search again",
    }
}

/// Read prompt lines until `:quit` or end of input.
///
/// Returns the controller so its final state can be inspected.
async fn run_interactive<R>(
    session: &Session<'_>,
    mut controller: SearchController,
    input: R,
) -> Result<SearchController>
where
    R: AsyncBufRead + Unpin,
{
    session.welcome(&controller)?;
    if session.format != OutputFormat::Json {
        print_interactive_help();
    }

    let mut lines = input.lines();

    loop {
        if session.format != OutputFormat::Json {
            print!("[{}]> ", controller.category());
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse_line(&line) {
            InteractiveCommand::Quit => break,
            InteractiveCommand::Blank => {}
            InteractiveCommand::Help => print_interactive_help(),
            InteractiveCommand::State => {
                ui::print_status(Status::Info, &describe_committed(&controller))
            }
            InteractiveCommand::SetCategory(category) => {
                controller.set_category(category);
                ui::print_status(Status::Success, &format!("Searching by {}", category));
            }
            InteractiveCommand::Unknown(name) => {
                ui::print_status(Status::Error, &format!("Unknown command: :{}", name))
            }
            InteractiveCommand::Search(text) => {
                controller.set_input(text);
                if !session.search(&mut controller).await? {
                    ui::print_status(Status::Info, repeat_notice(controller.state()));
                }
            }
        }
    }

    Ok(controller)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    init_tracing(cli.verbose, cli.quiet);

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Search {
            query,
            category,
            verify_covers,
        }) => {
            let source = OpenLibrarySource::from_config(&config.api)?;
            let session = Session {
                source: &source,
                links: CatalogLinks::from(&config.api),
                format: cli.output.resolve(),
                verify_covers,
            };

            let category = category
                .map(SearchCategory::from)
                .unwrap_or(config.display.default_category);
            let mut controller = SearchController::with_category(category);
            controller.set_input(query);

            if !session.search(&mut controller).await? {
                // blank query: nothing submitted, so the welcome view still holds
                session.welcome(&controller)?;
            }
        }

        Some(Commands::Interactive {
            category,
            verify_covers,
        }) => {
            let source = OpenLibrarySource::from_config(&config.api)?;
            let session = Session {
                source: &source,
                links: CatalogLinks::from(&config.api),
                format: cli.output.resolve(),
                verify_covers,
            };

            let category = category
                .map(SearchCategory::from)
                .unwrap_or(config.display.default_category);
            tracing::debug!(source = source.name(), %category, "Starting interactive session");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_interactive(&session, SearchController::with_category(category), stdin).await?;
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Init { path, force } => {
                let path = path
                    .or_else(default_config_path)
                    .context("Could not determine a config directory; pass --path")?;
                if path.exists() && !force {
                    anyhow::bail!(
                        "Config file already exists at {} (use --force to overwrite)",
                        path.display()
                    );
                }
                Config::default().save(&path)?;
                ui::print_status(
                    Status::Success,
                    &format!("Wrote default configuration to {}", path.display()),
                );
            }
        },

        None => {
            let controller = SearchController::with_category(config.display.default_category);
            let session_links = CatalogLinks::from(&config.api);
            if let View::Welcome { text } = render(controller.state(), &session_links) {
                ui::print_welcome(&text);
            }
            println!("Common commands:");
            println!("  search <query>   - Search once");
            println!("  interactive      - Search from a prompt");
            println!("  config init      - Write a default config file");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openlibrary_search::controller::SearchFailure;
    use openlibrary_search::sources::{make_record, MockSource};

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["openlibrary-search"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["openlibrary-search", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["openlibrary-search", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["openlibrary-search", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["openlibrary-search", "--output", "plain"]);
        assert_eq!(cli.output, OutputFormat::Plain);
    }

    #[test]
    fn test_explicit_format_not_resolved_away() {
        assert_eq!(OutputFormat::Table.resolve(), OutputFormat::Table);
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_ne!(OutputFormat::Auto.resolve(), OutputFormat::Auto);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from(["openlibrary-search", "search", "the hobbit"]);
        match &cli.command {
            Some(Commands::Search {
                query,
                category,
                verify_covers,
            }) => {
                assert_eq!(query, "the hobbit");
                assert!(category.is_none());
                assert!(!verify_covers);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_with_category() {
        let cli = Cli::parse_from([
            "openlibrary-search",
            "s",
            "space",
            "--category",
            "subject",
            "--verify-covers",
        ]);
        match &cli.command {
            Some(Commands::Search {
                category,
                verify_covers,
                ..
            }) => {
                assert_eq!(*category, Some(Category::Subject));
                assert!(*verify_covers);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(SearchCategory::from(Category::Title), SearchCategory::Title);
        assert_eq!(SearchCategory::from(Category::Author), SearchCategory::Author);
        assert_eq!(SearchCategory::from(Category::Subject), SearchCategory::Subject);
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from([
            "openlibrary-search",
            "config",
            "init",
            "--path",
            "/tmp/ol.toml",
            "--force",
        ]);
        match &cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Init { path, force },
            }) => {
                assert_eq!(path.as_deref(), Some(std::path::Path::new("/tmp/ol.toml")));
                assert!(*force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(parse_line(":quit"), InteractiveCommand::Quit);
        assert_eq!(parse_line(":q"), InteractiveCommand::Quit);
        assert_eq!(parse_line(" :exit "), InteractiveCommand::Quit);
        assert_eq!(parse_line(":help"), InteractiveCommand::Help);
        assert_eq!(parse_line(":state"), InteractiveCommand::State);
        assert_eq!(
            parse_line(":author"),
            InteractiveCommand::SetCategory(SearchCategory::Author)
        );
        assert_eq!(
            parse_line(":subject"),
            InteractiveCommand::SetCategory(SearchCategory::Subject)
        );
        assert_eq!(parse_line(":foo"), InteractiveCommand::Unknown("foo".to_string()));
    }

    #[test]
    fn test_parse_line_text() {
        assert_eq!(parse_line(""), InteractiveCommand::Blank);
        assert_eq!(parse_line("   \t"), InteractiveCommand::Blank);
        assert_eq!(
            parse_line("  the dispossessed "),
            InteractiveCommand::Search("the dispossessed".to_string())
        );
    }

    #[test]
    fn test_describe_committed() {
        let mut controller = SearchController::new();
        assert_eq!(describe_committed(&controller), "No search yet");

        controller.set_category(SearchCategory::Subject);
        controller.set_input("space");
        controller.submit();
        assert_eq!(describe_committed(&controller), "subject: \"space\"");
    }

    #[test]
    fn test_repeat_notice_depends_on_state() {
        assert_eq!(
            repeat_notice(&ResultState::Ready(Vec::new())),
            "Already showing results for that search"
        );
        let failed = repeat_notice(&ResultState::Error(SearchFailure::Transport));
        assert!(failed.contains("already run"));
        assert_eq!(
            repeat_notice(&ResultState::Error(SearchFailure::EmptyResult)),
            failed
        );
    }

    fn plain_session(source: &MockSource) -> Session<'_> {
        Session {
            source,
            links: CatalogLinks::default(),
            format: OutputFormat::Plain,
            verify_covers: false,
        }
    }

    #[tokio::test]
    async fn test_interactive_commands_do_not_search() {
        let source = MockSource::with_records(vec![make_record("OL1W", "Dune")]);
        let session = plain_session(&source);

        let input: &[u8] = b":author\n\n   \n:state\n:foo\n:help\n:quit\nignored after quit\n";
        let controller = run_interactive(&session, SearchController::new(), input)
            .await
            .unwrap();

        assert_eq!(controller.category(), SearchCategory::Author);
        assert_eq!(controller.state(), &ResultState::Idle);
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_interactive_searches_until_eof() {
        let source = MockSource::with_records(vec![make_record("OL1W", "Dune")]);
        let session = plain_session(&source);

        let input: &[u8] = b"dune\ndune\n:subject\ndune\n";
        let controller = run_interactive(&session, SearchController::new(), input)
            .await
            .unwrap();

        assert_eq!(source.request_count(), 2);
        let categories: Vec<_> = source.queries().iter().map(|q| q.category).collect();
        assert_eq!(categories, [SearchCategory::Title, SearchCategory::Subject]);
        assert!(controller.state().records().is_some());
    }

    #[test]
    fn test_cli_interactive_alias() {
        let cli = Cli::parse_from(["openlibrary-search", "i", "-c", "author"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Interactive {
                category: Some(Category::Author),
                ..
            })
        ));
    }
}
