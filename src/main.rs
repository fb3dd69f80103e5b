use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fatura::cli::{
    handle_card_command, handle_credit_command, handle_installment_command, handle_invoice_command,
    handle_purchase_command, CardCommands, InstallmentCommands, InvoiceCommands, PurchaseCommands,
};
use fatura::config::{FaturaPaths, Settings};
use fatura::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fatura",
    version,
    about = "Credit card invoice tracker",
    long_about = "Fatura tracks credit card purchases and installment plans, groups \
                  them into monthly invoices by each card's closing and due days, \
                  and shows how much credit is still available."
)]
struct Cli {
    /// Directory holding settings, records and the audit log
    #[arg(long, global = true, env = "FATURA_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Card management commands
    #[command(subcommand)]
    Card(CardCommands),

    /// Purchase commands
    #[command(subcommand, alias = "buy")]
    Purchase(PurchaseCommands),

    /// Installment commands
    #[command(subcommand)]
    Installment(InstallmentCommands),

    /// Invoice commands
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// Show available credit
    Credit {
        /// Card name or ID (all cards when omitted)
        card: Option<String>,
    },

    /// Show recent entries from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) if !dir.as_os_str().is_empty() => FaturaPaths::with_base_dir(dir),
        _ => FaturaPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;
    fatura::init_tracing(&settings.log_level);

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Card(cmd)) => handle_card_command(&storage, &settings, cmd)?,
        Some(Commands::Purchase(cmd)) => handle_purchase_command(&storage, &settings, cmd)?,
        Some(Commands::Installment(cmd)) => handle_installment_command(&storage, &settings, cmd)?,
        Some(Commands::Invoice(cmd)) => handle_invoice_command(&storage, &settings, cmd)?,
        Some(Commands::Credit { card }) => handle_credit_command(&storage, &settings, card)?,
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("Audit log is empty.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing Fatura at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Add your first card with:");
            println!("  fatura card add <name> --limit <limit> --closing <day> --due <day>");
        }
        Some(Commands::Config) => {
            println!("Fatura Configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Log level:           {}", settings.log_level);
            println!("  Default closing day: {}", settings.default_closing_day);
            println!("  Default due day:     {}", settings.default_due_day);
        }
        None => {
            println!("Fatura - credit card invoice tracker");
            println!();
            println!("Run 'fatura --help' for usage information.");
        }
    }

    Ok(())
}
