use clap::{Parser, Subcommand};
use habitrack_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitrack-cli", version, about = "Habitrack CLI")]
struct Cli {
    /// Acting user id
    #[arg(long, global = true, env = "HABITRACK_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User registration
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Streak status and maintenance
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Habit statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Points leaderboard
    Leaderboard {
        /// Show only the top N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Profile and notification settings
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    init_logging(&config);

    if let Commands::Config { action } = cli.command {
        return commands::config::run(action);
    }

    let app = commands::App::open(config, cli.user)?;
    match cli.command {
        Commands::User { action } => commands::user::run(&app, action),
        Commands::Habit { action } => commands::habit::run(&app, action),
        Commands::Streak { action } => commands::streak::run(&app, action),
        Commands::Stats { action } => commands::stats::run(&app, action),
        Commands::Leaderboard { limit } => commands::leaderboard::run(&app, limit),
        Commands::Profile { action } => commands::profile::run(&app, action),
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
