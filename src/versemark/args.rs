use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "versemark")]
#[command(about = "Study-note generation that survives regeneration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Corpus directory (defaults to the user data dir)
    #[arg(short, long, global = true)]
    pub corpus: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a scraped JSON export into the corpus
    #[command(alias = "i")]
    Ingest {
        /// Path to the export file (array of documents)
        file: PathBuf,
    },

    /// Generate or refresh note files from the corpus
    #[command(alias = "gen")]
    Generate {
        /// Directory to write note files into
        dir: PathBuf,

        /// Only references under this prefix (e.g. alma.32)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Re-synchronize an existing folder of notes against the corpus
    Sync {
        /// Directory of note files
        dir: PathBuf,
    },

    /// Permanently remove entries from the corpus
    Prune {
        /// References to remove (e.g. alma.32.21)
        #[arg(required = true, num_args = 1..)]
        references: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., note-ext)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
