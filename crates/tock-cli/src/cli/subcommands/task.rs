use clap::Subcommand;

/// Task commands. A `<TASK>` is a numeric id or an exact synopsis.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create {
        synopsis: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a task.
    Get {
        task: String,
        #[arg(long)]
        include_deleted: bool,
    },
    /// Update a task.
    Update {
        task: String,
        #[arg(long)]
        synopsis: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Restore a deleted task.
        #[arg(long)]
        undelete: bool,
    },
    /// Soft-delete a task. Its timesheets are kept.
    Delete { task: String },
    /// List or search tasks.
    List {
        /// Substring to match in synopsis or description.
        #[arg(long)]
        search: Option<String>,
        /// Match the search text against the synopsis only.
        #[arg(long, requires = "search")]
        synopsis_only: bool,
        #[arg(long, conflicts_with = "search")]
        include_deleted: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
}
