use clap::{Parser, Subcommand, ValueEnum};
use shopsimapp::model::RecordId;
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shopsim", bin_name = "shopsim", version, disable_help_subcommand = true)]
#[command(about = "Inspect and maintain a shopsim data directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to $SHOPSIM_DATA, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose logging on stderr (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every record of a kind
    #[command(alias = "ls")]
    List { kind: RecordKind },

    /// Show one record
    Show { kind: RecordKind, id: RecordId },

    /// Add a record from JSON (id 0 or absent assigns the next id)
    Add { kind: RecordKind, json: String },

    /// Remove a record
    #[command(alias = "rm")]
    Remove { kind: RecordKind, id: RecordId },

    /// Print the file a receipt is stored in
    ReceiptPath { id: RecordId },

    /// Validate every stored record
    Check,

    /// Write every collection back to disk
    Flush,

    /// Print the resolved configuration
    Config,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Client,
    Cashier,
    Product,
    Store,
    Receipt,
    CashDesk,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Client,
        RecordKind::Cashier,
        RecordKind::Product,
        RecordKind::Store,
        RecordKind::Receipt,
        RecordKind::CashDesk,
    ];
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Client => "client",
            RecordKind::Cashier => "cashier",
            RecordKind::Product => "product",
            RecordKind::Store => "store",
            RecordKind::Receipt => "receipt",
            RecordKind::CashDesk => "cash-desk",
        };
        f.write_str(name)
    }
}
