use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vigil", version, author, about = "A quiet terminal companion for keeping a small group's prayer requests")]
pub struct Cli {
    /// Use this database file instead of the one in the data directory
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a prayer request
    Add {
        /// Who the request is for
        member: String,
        /// What to pray for
        details: String,
        /// health, family, work, spiritual, praise or other
        #[arg(long, short)]
        category: Option<String>,
        /// Optional notes
        #[arg(long, short)]
        notes: Option<String>,
    },
    /// List requests in one tab, optionally filtered
    List {
        /// this-week, praying, answered, praises or archived
        #[arg(long, short, default_value = "this-week")]
        tab: String,
        /// Match member name, details or notes (case-insensitive)
        #[arg(long, short)]
        search: Option<String>,
        /// Category, or "all"
        #[arg(long, short, default_value = "all")]
        category: String,
        /// Member name, or "all"
        #[arg(long, short, default_value = "all")]
        member: String,
    },
    /// Edit fields of an existing request
    Edit {
        /// Request id (see `list`)
        id: String,
        #[arg(long)]
        member: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        details: Option<String>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        /// Remove the notes
        #[arg(long)]
        clear_notes: bool,
        /// praying, answered or archived
        #[arg(long)]
        status: Option<String>,
        /// Mark the request for sharing with the group
        #[arg(long, conflicts_with = "unhighlight")]
        highlight: bool,
        /// Remove the sharing mark
        #[arg(long)]
        unhighlight: bool,
    },
    /// Delete a request
    Delete {
        /// Request id
        id: String,
    },
    /// Show every member name on record
    Members,
    /// Show request counts
    Stats,
    /// Export all data
    Export {
        /// json or text
        #[arg(long, short, default_value = "json")]
        format: String,
        /// Output file, "-" for stdout [default: prayer-tracker-<date>.<ext>]
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all data with an exported JSON file ("-" reads stdin)
    Import {
        file: String,
    },
    /// Show the config file location and current settings
    Config {
        /// Write a config file with the defaults if none exists
        #[arg(long)]
        init: bool,
    },
}
