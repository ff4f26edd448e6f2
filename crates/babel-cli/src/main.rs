//! babel CLI — terminal vocabulary quiz.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "babel", version, about = "Terminal vocabulary quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive quiz
    Play {
        /// Language to start with (defaults to `default_language` from config)
        #[arg(long)]
        language: Option<String>,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Where `say` writes the pronunciation audio
        #[arg(long, default_value = "pronunciation.mp3")]
        audio_out: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the languages in the vocabulary catalog
    Catalog {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the rank for an amount of xp
    Rank {
        /// Experience points
        #[arg(long)]
        xp: u64,
    },

    /// Create a starter config and example word list
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("babel=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            language,
            seed,
            audio_out,
            config,
        } => commands::play::execute(language, seed, audio_out, config).await,
        Commands::Catalog { config } => commands::catalog::execute(config).await,
        Commands::Rank { xp } => commands::rank::execute(xp),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
