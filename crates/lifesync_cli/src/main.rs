//! LifeSync CLI: inspect and edit the local goal store.
//!
//! # Responsibility
//! - Wire `lifesync_core` to a file-backed SQLite store.
//! - Expose goal mutations and health sync as subcommands.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use lifesync_core::{
    default_log_level, init_logging, resolve_db_path, AppSettings, AppState, EngineConfig,
    SqliteKvStore, SyncOutcome,
};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "lifesync", version, about = "Daily goal and habit tracker")]
struct Cli {
    /// SQLite database file (defaults to `LIFESYNC_DB_PATH` or the temp dir).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the completion headline.
    Summary,

    /// List goals grouped by domain.
    List,

    /// Pull readings from the health source into auto-tracked goals.
    Sync,

    /// Record a manual progress value.
    Progress {
        /// Goal id.
        id: String,
        /// New current value.
        value: f64,
    },

    /// Replace a goal's note.
    Note {
        /// Goal id.
        id: String,
        /// Note text.
        text: String,
    },

    /// Reorder goals; every goal id must be listed exactly once.
    Reorder {
        /// Goal ids in the new display order.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Connect or disconnect the health source.
    Connect {
        state: Toggle,
        /// Use the enhanced (Garmin) source when connected.
        #[arg(long)]
        garmin: bool,
    },

    /// Mark onboarding as complete.
    Onboard,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.log_dir.clone());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult {
    let db_path = cli.db.unwrap_or_else(resolve_db_path);
    let store = SqliteKvStore::open(&db_path)?;
    let state = AppState::with_defaults(store, EngineConfig::from_env());

    match cli.command {
        Commands::Summary => println!("{}", state.summary()),
        Commands::List => print_goals(&state),
        Commands::Sync => {
            println!("Updating Health Data...");
            match state.request_sync().await {
                SyncOutcome::Completed { updated, .. } => {
                    println!("synced {} goal(s)", updated.len());
                    print_goals(&state);
                }
                SyncOutcome::Skipped(reason) => println!("sync skipped: {}", reason.as_str()),
                SyncOutcome::TimedOut => return Err("health sync timed out".into()),
                SyncOutcome::Failed(err) => return Err(err.into()),
            }
        }
        Commands::Progress { id, value } => {
            state.update_progress(&id, value)?;
            println!("{}", state.summary());
        }
        Commands::Note { id, text } => {
            state.update_note(&id, text)?;
        }
        Commands::Reorder { ids } => {
            state.reorder_goals(&ids)?;
            print_goals(&state);
        }
        Commands::Connect { state: toggle, garmin } => {
            let current = state.snapshot().settings.clone();
            let connected = matches!(toggle, Toggle::On);
            state.update_settings(AppSettings {
                is_health_connected: connected,
                is_garmin_enhanced: connected && garmin,
                ..current
            })?;
            println!("health source connected={connected}");
        }
        Commands::Onboard => {
            state.complete_onboarding()?;
            println!("onboarding complete");
        }
    }
    Ok(())
}

fn print_goals(state: &AppState<SqliteKvStore>) {
    for (domain, goals) in state.goals_by_domain() {
        println!("{}", domain.as_str());
        for goal in goals {
            let mark = if goal.is_complete() { "x" } else { " " };
            println!(
                "  [{mark}] {:>3}  {:<22} {} / {} {}  ({}, streak {})",
                goal.id,
                goal.title,
                goal.current,
                goal.target,
                goal.unit.as_deref().unwrap_or(""),
                goal.source.as_str(),
                goal.streak
            );
        }
    }
}

fn setup_logging(log_dir: Option<PathBuf>) {
    let log_dir = log_dir.unwrap_or_else(|| std::env::temp_dir().join("lifesync-logs"));
    let Some(log_dir) = log_dir.to_str() else {
        eprintln!("warning: log directory is not valid UTF-8; logging disabled");
        return;
    };
    if let Err(err) = init_logging(default_log_level(), log_dir) {
        eprintln!("warning: logging disabled: {err}");
        return;
    }
    info!("event=cli_start module=cli status=ok");
}
