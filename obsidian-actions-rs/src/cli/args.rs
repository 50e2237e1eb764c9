//! CLI argument definitions using clap.

use crate::types::Period;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "obsidian-actions")]
#[command(author, version, about = "Drive Obsidian through the Actions URI plugin", long_about = None)]
pub struct Cli {
    /// Vault name (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<String>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run any plugin route, e.g. `call note get -p file=Todo`
    Call(CallArgs),

    /// Show plugin and Obsidian information
    Info,

    /// List notes in the vault
    Notes,

    /// Note actions
    #[command(subcommand)]
    Note(NoteCommands),

    /// List tags used in the vault
    Tags,

    /// List command palette commands
    Commands,

    /// Execute commands by id
    Exec(ExecArgs),

    /// List files in the vault
    Files,

    /// List folders in the vault
    Folders,

    /// Search notes
    Search(SearchArgs),

    /// Get the current periodic note, creating it if missing
    Periodic(PeriodicArgs),

    /// Build and run a Dataview query
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Route segments after `actions-uri`
    #[arg(required = true)]
    pub actions: Vec<String>,

    /// Keyword argument as key=value (repeatable)
    #[arg(short = 'p', long = "param")]
    pub params: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Print a note's path, content, body, front matter and properties
    Get(NoteGetArgs),

    /// Create a note
    Create(NoteCreateArgs),

    /// Append content to a note
    Append(NoteInsertArgs),

    /// Prepend content to a note (after front matter)
    Prepend(NoteInsertArgs),

    /// Search and replace inside a note
    Replace(NoteReplaceArgs),

    /// Delete a note
    Delete(NoteArgs),

    /// Move a note to the trash
    Trash(NoteArgs),

    /// Open a note in Obsidian
    Open(NoteArgs),

    /// List notes linking to a note
    Incoming(NoteArgs),

    /// List notes a note links to
    Outgoing(NoteArgs),
}

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Vault-relative note path
    pub name: String,
}

#[derive(Args, Debug)]
pub struct NoteGetArgs {
    /// Note path, or a file name with --first-named
    pub name: String,

    /// Use the first note with this file name
    #[arg(long)]
    pub first_named: bool,

    /// Don't open the note in Obsidian
    #[arg(long)]
    pub silent: bool,
}

#[derive(Args, Debug)]
pub struct NoteCreateArgs {
    /// Vault-relative note path
    pub name: String,

    /// Initial content
    #[arg(long, conflicts_with = "template")]
    pub content: Option<String>,

    /// Template to apply
    #[arg(long)]
    pub template: Option<String>,

    /// Overwrite an existing note
    #[arg(long)]
    pub overwrite: bool,

    /// Don't open the note in Obsidian
    #[arg(long)]
    pub silent: bool,
}

#[derive(Args, Debug)]
pub struct NoteInsertArgs {
    /// Vault-relative note path
    pub name: String,

    /// Content to insert
    pub content: String,

    /// Insert below this exact headline line
    #[arg(long)]
    pub below_headline: Option<String>,

    /// Create the note if it doesn't exist
    #[arg(long)]
    pub create: bool,

    /// Make sure the note ends with a newline
    #[arg(long)]
    pub ensure_newline: bool,

    /// Don't open the note in Obsidian
    #[arg(long)]
    pub silent: bool,
}

#[derive(Args, Debug)]
pub struct NoteReplaceArgs {
    /// Vault-relative note path
    pub name: String,

    /// Text (or pattern with --regex) to search for
    pub search: String,

    /// Replacement text
    pub replace: String,

    /// Treat the search as a regular expression
    #[arg(long)]
    pub regex: bool,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command ids, run in order
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Seconds to pause between commands
    #[arg(long)]
    pub pause: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Show the results in Obsidian instead of printing them
    #[arg(long)]
    pub open: bool,
}

#[derive(Args, Debug)]
pub struct PeriodicArgs {
    #[arg(value_enum)]
    pub period: Period,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Output fields; makes this a TABLE query
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Tag source (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Folder source (repeatable)
    #[arg(long)]
    pub folder: Vec<String>,

    /// Notes linking to this note (repeatable)
    #[arg(long)]
    pub incoming: Vec<String>,

    /// Notes this note links to (repeatable)
    #[arg(long)]
    pub outgoing: Vec<String>,

    /// Combine sources with AND
    #[arg(long, conflicts_with = "or")]
    pub and: bool,

    /// Combine sources with OR
    #[arg(long)]
    pub or: bool,

    /// WHERE condition (repeatable)
    #[arg(long = "where")]
    pub conditions: Vec<String>,

    /// FLATTEN field (repeatable)
    #[arg(long)]
    pub flatten: Vec<String>,

    /// GROUP BY field (repeatable)
    #[arg(long)]
    pub group_by: Vec<String>,

    /// Sort ascending by field (repeatable)
    #[arg(long)]
    pub sort: Vec<String>,

    /// Sort descending by field (repeatable)
    #[arg(long)]
    pub sort_desc: Vec<String>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the query text instead of running it
    #[arg(long)]
    pub dry_run: bool,
}
