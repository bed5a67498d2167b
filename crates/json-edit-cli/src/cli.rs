use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "json-edit", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the result without writing it back to --file
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Pretty-print the response
    #[arg(long, global = true)]
    pub pretty: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the document comes from. With neither option it is read from stdin.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Inline JSON document; takes precedence over --file
    #[arg(long, global = true, value_name = "TEXT")]
    pub json: Option<String>,

    /// JSON file to read, and to write back after a successful edit
    #[arg(short, long, global = true, env = "JSON_EDIT_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Find scalar values containing a text, ignoring case
    Search {
        #[arg(required = true)]
        needle: String,
    },
    /// Print the values matched by a path
    Query {
        #[arg(required = true)]
        path: String,
    },
    /// Overwrite every match
    Replace {
        #[arg(required = true)]
        path: String,
        /// New value as JSON text
        #[arg(required = true)]
        value: String,
    },
    /// Push a value onto every matched array
    Append {
        #[arg(required = true)]
        path: String,
        /// Value as JSON text
        #[arg(required = true)]
        value: String,
    },
    /// Update the first match, or create the final property if nothing matches
    Set {
        #[arg(required = true)]
        path: String,
        /// Value as JSON text
        #[arg(required = true)]
        value: String,
        /// Update every match instead of the first
        #[arg(long)]
        all: bool,
    },
    /// Remove every match
    Delete {
        #[arg(required = true)]
        path: String,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Search { .. } => "search",
            Commands::Query { .. } => "query",
            Commands::Replace { .. } => "replace",
            Commands::Append { .. } => "append",
            Commands::Set { .. } => "set",
            Commands::Delete { .. } => "delete",
        }
    }
}
