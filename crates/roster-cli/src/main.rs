mod cmd;

use clap::{Parser, Subcommand};
use roster_core::config::{self, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Chat bot keeping a shared list of names, with duplicate checks against a similarity oracle",
    version,
    propagate_version = true
)]
struct Cli {
    /// Record store path (.json for a flat file, .db/.sqlite for SQLite)
    #[arg(long, global = true, env = "ROSTER_STORE_PATH")]
    store: Option<PathBuf>,

    /// Similarity oracle base URL
    #[arg(long, global = true, env = "ROSTER_ORACLE_URL")]
    oracle_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chat webhook server
    Serve {
        /// Address to bind
        #[arg(long, env = "ROSTER_LISTEN")]
        listen: Option<String>,
    },

    /// Run a single chat message through the bot and print the reply
    Send {
        /// Conversation scope the message belongs to
        #[arg(long, default_value = "cli")]
        scope: String,
        /// Message text, e.g. '!add "Cafe X"'
        text: String,
    },

    /// Chat with the bot line by line on stdin
    Repl {
        /// Conversation scope for the session
        #[arg(long, default_value = "cli")]
        scope: String,
    },

    /// Ask the oracle whether a name duplicates the current list
    Check { name: String },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Repl { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Serve { listen } => cmd::serve::run(config, listen),
        Commands::Send { scope, text } => cmd::send::run(&config, &scope, &text, cli.json),
        Commands::Repl { scope } => cmd::repl::run(&config, &scope),
        Commands::Check { name } => cmd::check::run(&config, &name, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Environment config with command-line flags taking precedence.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let overrides = [
        (
            config::ENV_STORE_PATH,
            cli.store.as_ref().map(|p| p.display().to_string()),
        ),
        (config::ENV_ORACLE_URL, cli.oracle_url.clone()),
    ];
    let config = Config::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.clone())
            .or_else(|| std::env::var(key).ok())
    })?;
    Ok(config)
}
