use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use syncrotate::cli::{
    handle_history_command, handle_prune_command, handle_workflow_command, PruneArgs, WorkflowArgs,
};
use syncrotate::config::{RotatePaths, Settings};
use syncrotate::history::HistoryLogger;
use syncrotate::models::Workflow;
use syncrotate::services::SystemClock;
use syncrotate::transfer::RcloneTool;

#[derive(Parser)]
#[command(
    name = "syncrotate",
    version,
    about = "Directory sync with rotating dated backups",
    long_about = "syncrotate keeps a local directory in sync with a remote through \
                  rclone, snapshots the local side into a dated backup directory on \
                  every run, and deletes old backups by age or by count."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Transfer tool executable (overrides the configured one)
    #[arg(long, env = "SYNCROTATE_TOOL", global = true, value_name = "BINARY")]
    tool: Option<String>,

    /// Exit with status 1 when any step failed
    #[arg(long, global = true)]
    strict: bool,

    /// Do not append this run to the history log
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bidirectional sync, then snapshot the local directory
    Bisync(WorkflowArgs),

    /// Make the remote identical to the local directory, then snapshot
    Mirror(WorkflowArgs),

    /// Copy local changes to the remote without deleting, then snapshot
    Push(WorkflowArgs),

    /// Snapshot the local directory, then make it identical to the remote
    Pull(WorkflowArgs),

    /// Apply the retention policy to a backup root without syncing
    Prune(PruneArgs),

    /// Show recent runs
    History {
        /// Number of runs to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Write a default settings file if none exists
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = RotatePaths::new()?;
    let settings = Settings::load_or_default(&paths)?;
    let tool = RcloneTool::new(
        cli.tool
            .clone()
            .unwrap_or_else(|| settings.tool_binary.clone()),
    );
    let history = (settings.record_history && !cli.no_history)
        .then(|| HistoryLogger::new(paths.history_log()));
    let clock = SystemClock;
    let workflow = |kind, args| {
        handle_workflow_command(&tool, &clock, &settings, history.as_ref(), kind, args)
    };

    let failed = match cli.command {
        Commands::Bisync(args) => workflow(Workflow::Bisync, args)?,
        Commands::Mirror(args) => workflow(Workflow::Mirror, args)?,
        Commands::Push(args) => workflow(Workflow::Push, args)?,
        Commands::Pull(args) => workflow(Workflow::Pull, args)?,
        Commands::Prune(args) => {
            handle_prune_command(&tool, &clock, &settings, history.as_ref(), args)?
        }
        Commands::History { limit } => {
            handle_history_command(&HistoryLogger::new(paths.history_log()), limit)?;
            false
        }
        Commands::Init => {
            if paths.settings_file().exists() {
                println!(
                    "Settings already exist at {}",
                    paths.settings_file().display()
                );
            } else {
                settings.save(&paths)?;
                println!("Wrote default settings to {}", paths.settings_file().display());
            }
            false
        }
        Commands::Config => {
            print_config(&paths, &settings, tool.binary());
            false
        }
    };

    if failed && cli.strict {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_config(paths: &RotatePaths, settings: &Settings, tool: &str) {
    println!("syncrotate Configuration");
    println!("========================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("History log:      {}", paths.history_log().display());
    println!();
    println!("Settings:");
    println!("  Transfer tool:      {}", tool);
    println!("  Default extra args: {:?}", settings.default_extra_args);
    println!("  Backup retention:   {}", settings.backup_retention);
    println!("  Record history:     {}", settings.record_history);
}
