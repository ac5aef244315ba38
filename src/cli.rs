use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::RecordId;
use crate::tui::components::{InputSize, InputVariant};

#[derive(Parser)]
#[command(name = "formgrid")]
#[command(about = "Terminal input field and sortable, selectable data table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive demo (default)
    Demo {
        /// CSV or JSON file shown in the table instead of the sample users
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Initial input variant (filled, outlined, ghost)
        #[arg(long)]
        variant: Option<InputVariant>,

        /// Initial input size (sm, md, lg)
        #[arg(long)]
        size: Option<InputSize>,
    },

    /// Print a data file as a table and exit
    Table {
        /// CSV or JSON file to print
        #[arg(short, long)]
        data: PathBuf,

        /// Column key to sort by
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Comma separated ids of rows to mark as selected
        #[arg(long, value_delimiter = ',')]
        select: Vec<RecordId>,
    },
}
