use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::cli::{
    handle_backup_command, handle_export_command, handle_finance_command, handle_import_command,
    handle_project_command,
};
use folio::config::{paths::FolioPaths, settings::Settings};
use folio::storage::Storage;

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Personal project and finance tracker",
    long_about = "Folio keeps track of your projects (with progress entries, \
                  attachments and links) and your income and expenses, and \
                  turns them into summaries and reports from the command line."
)]
struct Cli {
    /// Base directory for data, backups and settings
    #[arg(long, global = true, env = "FOLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income and expense commands
    #[command(subcommand)]
    Finance(folio::cli::FinanceCommands),

    /// Project commands
    #[command(subcommand)]
    Project(folio::cli::ProjectCommands),

    /// Export data to files
    #[command(subcommand)]
    Export(folio::cli::ExportCommands),

    /// Import data from files
    #[command(subcommand)]
    Import(folio::cli::ImportCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(folio::cli::BackupCommands),

    /// Show current configuration and paths, writing default settings on first use
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("FOLIO_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FolioPaths::with_base_dir(dir),
        None => FolioPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::open(&paths)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Finance(cmd)) => handle_finance_command(&storage, &settings, cmd)?,
        Some(Commands::Project(cmd)) => handle_project_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&storage, &settings, cmd)?,
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &paths.backup_dir(), &settings, cmd)?
        }
        Some(Commands::Config) => {
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            println!("Folio Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!(
                "  Backups kept:    {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
            println!("  Link previews:   {:?}", settings.link_preview.mode);
        }
        None => {
            println!("Folio - personal project and finance tracker");
            println!();
            println!("Run 'folio --help' for usage information.");
        }
    }

    Ok(())
}
