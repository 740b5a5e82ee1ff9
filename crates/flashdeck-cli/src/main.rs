use clap::{Parser, Subcommand};
use flashdeck_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "flashdeck", version, about = "Spaced-repetition flashcards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deck management
    Deck {
        #[command(subcommand)]
        action: commands::deck::DeckAction,
    },
    /// Card management
    Card {
        #[command(subcommand)]
        action: commands::card::CardAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Review forecast and history
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Show the next interval for every rating
    Preview(commands::preview::PreviewArgs),
    /// Study due cards interactively
    Study(commands::study::StudyArgs),
}

/// Log filter: `FLASHDECK_LOG` wins over the configured `log.filter`.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("FLASHDECK_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&Config::load_or_default());

    let result = match cli.command {
        Commands::Deck { action } => commands::deck::run(action),
        Commands::Card { action } => commands::card::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Study(args) => commands::study::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
