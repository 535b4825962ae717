mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lingo-cli", about = "Vocabulary review scheduler", version)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Validate generated vocabulary JSON and cache it under a topic
    Import {
        /// Topic name
        topic: String,
        /// JSON file (use "-" to read from stdin)
        file: PathBuf,
    },

    /// Show a topic's items in review order
    Queue {
        /// Topic name
        topic: String,
        /// Only items due now
        #[arg(long)]
        due: bool,
        /// Maximum items
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Grade an item (hard, medium or easy)
    Grade {
        /// Item id or word
        item: String,
        /// Difficulty label; unknown labels count as medium
        difficulty: String,
    },

    /// Show an item's scheduling record
    Show {
        /// Item id or word
        item: String,
    },

    /// Show the interval each difficulty would give an item
    Preview {
        /// Item id or word
        item: String,
    },

    /// Review statistics
    Stats {
        /// Limit to one topic
        topic: Option<String>,
    },

    /// List cached topics
    Topics,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Import { topic, file } => {
            commands::import::run(&app, &topic, &file, &cli.format)?;
        }
        Command::Queue { topic, due, limit } => {
            commands::queue::run(&app, &topic, due, limit, &cli.format, use_color)?;
        }
        Command::Grade { item, difficulty } => {
            commands::review::run_grade(&app, &item, &difficulty, &cli.format)?;
        }
        Command::Show { item } => {
            commands::review::run_show(&app, &item, &cli.format)?;
        }
        Command::Preview { item } => {
            commands::review::run_preview(&app, &item, &cli.format)?;
        }
        Command::Stats { topic } => {
            commands::stats::run(&app, topic.as_deref(), &cli.format)?;
        }
        Command::Topics => {
            commands::stats::run_topics(&app, &cli.format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
