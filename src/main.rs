use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use expense_tracker::cli::{
    handle_expense_command, handle_export_command, handle_import_command, ExpenseCommands,
};
use expense_tracker::config::{ExpensePaths, Settings};
use expense_tracker::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "EXPENSE_LOG";

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Personal expense tracker",
    long_about = "Record, browse, filter and total personal expenses kept in a local \
                  JSON file. Supports CSV export and JSON import."
)]
struct Cli {
    /// Use this expenses file instead of the one in the data directory
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Export all expenses to CSV
    Export {
        /// Output file (defaults to the configured export file)
        output: Option<PathBuf>,
    },

    /// Import expenses from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Initialize the data directory with default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let mut paths = ExpensePaths::new()?;
    if let Some(file) = cli.file {
        paths = paths.with_expenses_file(file);
    }
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all();

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Export { output }) => {
            handle_export_command(&mut storage, &settings, output)?;
        }
        Some(Commands::Import { file }) => {
            handle_import_command(&mut storage, &file)?;
        }
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            if !paths.expenses_file().exists() {
                storage.save_all()?;
            }
            println!("Initialization complete!");
            println!();
            println!("Run 'expense add <amount> -c <category>' to record your first expense.");
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Expenses file:  {}", paths.expenses_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Default category: {}", settings.default_category);
            println!("  Export file:      {}", settings.export_file);
            println!("  List limit:       {}", settings.list_limit);
        }
        None => {
            println!("Expense Tracker - personal expense records");
            println!();
            println!("Run 'expense --help' for usage information.");
        }
    }

    Ok(())
}
