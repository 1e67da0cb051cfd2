use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ocdian", version, about = "OCD symptom journal and guided exercises")]
struct Cli {
    /// Log timer transitions and storage activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Obsession / compulsion log
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Mood check-ins
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Mood insights
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Guided exercises
    Exercise(commands::exercise::ExerciseArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// List the mood trigger catalog
    Triggers {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("OCDIAN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: failed to initialize logging: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Log { action } => commands::log::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Exercise(args) => commands::exercise::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Triggers { json } => commands::mood::list_triggers(json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
