use clap::{Parser, Subcommand};
use studygroup_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studygroup-cli", version, about = "Study group organizer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an in-memory session driven by commands on stdin
    Shell(commands::shell::ShellArgs),
    /// Print study suggestions for a subject
    Suggest(commands::suggest::SuggestArgs),
    /// Score two groups against each other
    MatchScore(commands::suggest::MatchScoreArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("STUDYGROUP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    // Read-only: stateless commands never create the config file.
    let config = Config::read().unwrap_or_else(|e| {
        eprintln!("warning: {e}; using default configuration");
        Config::default()
    });
    init_tracing(&config);

    let result = match cli.command {
        Commands::Shell(args) => commands::shell::run(args, &config),
        Commands::Suggest(args) => commands::suggest::run_suggest(args),
        Commands::MatchScore(args) => commands::suggest::run_match_score(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
