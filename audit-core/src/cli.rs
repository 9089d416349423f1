//! src/cli.rs
//! ============================================================================
//! # CLI: Command-Line Surface for the `audit` Binary
//!
//! Global flags override the config file; each subcommand maps to one
//! checklist action or one read-only view.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use audit_core::model::{Priority, PriorityFilter, StatusFilter};

#[derive(Debug, Parser)]
#[command(name = "audit")]
#[command(about = "File-audit checklist: check off, annotate and prioritize files", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory holding the checklist (overrides the config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Mirror log output to stderr
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List records in the current folder scope
    List {
        #[arg(long)]
        status: Option<StatusFilter>,

        #[arg(long)]
        priority: Option<PriorityFilter>,

        /// Case-insensitive path search ("" clears it)
        #[arg(long)]
        search: Option<String>,

        /// Scope to the direct children of a folder
        #[arg(long, conflicts_with = "all_files")]
        folder: Option<String>,

        /// Drop the folder scope
        #[arg(long)]
        all_files: bool,
    },
    /// Print the folder tree
    Tree,
    /// Print every folder that directly holds a file
    Folders,
    /// Print overall progress
    Stats,
    /// Add a file by path
    Add { path: String },
    /// Add a file inside a folder
    AddIn { folder: String, name: String },
    /// Create an (empty) folder
    Mkdir { name: String },
    /// Mark a file as checked
    Check { id: String },
    /// Mark a file as unchecked
    Uncheck { id: String },
    /// Flip a file's checked flag
    Toggle { id: String },
    /// Replace a file's notes
    Note { id: String, text: String },
    /// Set a file's priority
    Priority { id: String, level: Priority },
    /// Set or clear a file's "changed since last audit" flag
    Changed {
        id: String,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
    /// Delete a file
    Rm { id: String },
    /// Delete every file
    Clear,
    /// Give a file a new path
    Rename { id: String, path: String },
    /// Rename a folder and everything under it
    RenameFolder { old: String, new: String },
    /// Move a file (or, with --folder, a folder) into a target folder
    Mv {
        source: String,
        target: String,

        /// Treat the source as a folder path
        #[arg(long)]
        folder: bool,
    },
    /// Scope listings to a folder
    Select {
        #[arg(required_unless_present = "all")]
        folder: Option<String>,

        /// Back to "All Files"
        #[arg(long, conflicts_with = "folder")]
        all: bool,
    },
    /// Expand a folder in the tree
    Expand { folder: String },
    /// Collapse every folder
    CollapseAll,
    /// Reset selection and reopen the top-level folders
    Refresh,
    /// Select a file's folder and open its ancestors
    Reveal { id: String },
    /// Replace the checklist from a JSON export
    Import { file: PathBuf },
    /// Write the visible records as JSON
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
