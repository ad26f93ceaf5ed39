use crate::server;
use clap::{Args, Parser, Subcommand};
use school_connect::config::AppConfig;
use school_connect::error::AppError;
use school_connect::store::SchoolStore;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "School Connect",
    about = "Serve the School Connect API and inspect its stored data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with store snapshot files
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// Print the row count of every table in a snapshot
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load and persist the store at this path instead of APP_DATA_FILE
    #[arg(long)]
    pub(crate) data_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Snapshot to read; defaults to APP_DATA_FILE
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Snapshot {
            command: SnapshotCommand::Inspect(args),
        } => inspect_snapshot(args),
    }
}

fn inspect_snapshot(args: InspectArgs) -> Result<(), AppError> {
    let path = match args.path {
        Some(path) => path,
        None => AppConfig::load()?.storage.data_file.ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no snapshot path given and APP_DATA_FILE is unset",
            )
        })?,
    };
    let store = SchoolStore::load(&path)?;
    let counts = store.row_counts().map_err(std::io::Error::other)?;

    println!("Snapshot {}", path.display());
    let total: usize = counts.values().sum();
    for (table, rows) in &counts {
        println!("  {table:<28} {rows:>6}");
    }
    println!("  {:<28} {total:>6}", "total");
    Ok(())
}
