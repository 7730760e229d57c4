//! flashdeck - Themed flashcards with recall practice
//!
//! Everything lives in one local storage file; no server, no sync.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "flashdeck")]
#[command(about = "Themed flashcards with recall practice")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Storage file (overrides the configured one)
    #[arg(long, global = true, env = "FLASHDECK_DATA")]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage themes
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },

    /// Manage cards in a theme
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },

    /// Practice recalling words from their descriptions
    Practice {
        /// Theme ID (all themes if omitted)
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Show answer statistics for every practiced card
    Stats,

    /// Show or set the interface language (es, en)
    Lang {
        /// Two-letter language code
        code: Option<String>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// List themes with card counts
    List,

    /// Create a theme
    Add {
        /// Theme name
        name: String,
    },

    /// Rename a theme
    Rename {
        /// Theme ID
        id: String,

        /// New name
        name: String,
    },

    /// Delete a theme and all of its cards
    Rm {
        /// Theme ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CardCommands {
    /// List the cards of a theme
    List {
        /// Theme ID
        theme: String,
    },

    /// Add a card to a theme
    Add {
        /// Theme ID
        theme: String,

        /// The word to recall
        word: String,

        /// Description shown as the prompt
        description: String,
    },

    /// Delete a card
    Rm {
        /// Theme ID
        theme: String,

        /// Card ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
    /// Reset to default configuration
    Reset,
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.data, cli.json)?;

    match cli.command {
        Commands::Theme { command } => match command {
            ThemeCommands::List => commands::theme_list(&ctx),
            ThemeCommands::Add { name } => commands::theme_add(&ctx, &name),
            ThemeCommands::Rename { id, name } => commands::theme_rename(&ctx, &id, &name),
            ThemeCommands::Rm { id } => commands::theme_rm(&ctx, &id),
        },
        Commands::Card { command } => match command {
            CardCommands::List { theme } => commands::card_list(&ctx, &theme),
            CardCommands::Add {
                theme,
                word,
                description,
            } => commands::card_add(&ctx, &theme, &word, &description),
            CardCommands::Rm { theme, id } => commands::card_rm(&ctx, &theme, &id),
        },
        Commands::Practice { theme } => commands::practice(&ctx, theme),
        Commands::Stats => commands::stats(&ctx),
        Commands::Lang { code } => commands::lang(&ctx, code),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(&ctx),
            Some(ConfigCommands::Path) => commands::config_path(&ctx),
            Some(ConfigCommands::Reset) => commands::config_reset(&ctx),
        },
    }
}
